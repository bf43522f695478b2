use leptos::prelude::*;

use crate::classes::ClassKind;
use crate::constants::START_XP_TO_NEXT;
use crate::game_loop;
use crate::network::SharedNetwork;
use crate::state::{Phase, SharedState};
use crate::upgrades::UpgradeOption;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HudInfo {
    pub level: u32,
    pub experience: u32,
    pub threshold: u32,
}

impl Default for HudInfo {
    fn default() -> Self {
        Self { level: 1, experience: 0, threshold: START_XP_TO_NEXT }
    }
}

impl HudInfo {
    pub fn percent(&self) -> f64 {
        if self.threshold == 0 {
            return 0.0;
        }
        (self.experience as f64 / self.threshold as f64 * 100.0).min(100.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpgradePrompt {
    pub level: u32,
    pub options: Vec<UpgradeOption>,
}

/// Reactive handles the frame loop and socket write into.
#[derive(Clone, Copy)]
pub struct UiSignals {
    pub phase: RwSignal<Phase>,
    pub hud: RwSignal<HudInfo>,
    pub upgrades: RwSignal<Option<UpgradePrompt>>,
    pub status: RwSignal<String>,
}

impl UiSignals {
    pub fn new() -> Self {
        Self {
            phase: RwSignal::new(Phase::ClassSelect),
            hud: RwSignal::new(HudInfo::default()),
            upgrades: RwSignal::new(None),
            status: RwSignal::new(String::new()),
        }
    }
}

#[component]
pub fn ClassSelect(state: SharedState, net: SharedNetwork, ui: UiSignals) -> impl IntoView {
    let buttons = ClassKind::ALL
        .into_iter()
        .map(|kind| {
            let profile = kind.profile();
            let state = state.clone();
            let net = net.clone();
            let on_pick = move |_: web_sys::MouseEvent| {
                game_loop::start_round(&state, &net, ui, kind);
            };
            view! {
                <button class="btn io-class" style:border-color=profile.color on:click=on_pick>
                    <strong>{profile.name}</strong>
                </button>
            }
        })
        .collect::<Vec<_>>();

    view! {
        <div id="io-start-screen" class="io-overlay">
            <h2>"Choose your class"</h2>
            <div class="io-class-list">{buttons}</div>
        </div>
    }
}

#[component]
pub fn Hud(ui: UiSignals) -> impl IntoView {
    view! {
        <div class="io-hud">
            <span>"Level "<span id="io-level">{move || ui.hud.get().level}</span></span>
            <div class="io-xp">
                <div id="io-xp-bar" style:width=move || format!("{}%", ui.hud.get().percent())></div>
            </div>
        </div>
    }
}

#[component]
pub fn UpgradeModal(state: SharedState, ui: UiSignals) -> impl IntoView {
    let state = send_wrapper::SendWrapper::new(state);

    view! {
        <div id="upgrade-modal" class="modal" class:active=move || ui.upgrades.get().is_some()>
            <div id="upgrade-options" class="modal-box">
                {move || {
                    let prompt = ui.upgrades.get()?;
                    let buttons = prompt.options.into_iter().map(|opt| {
                        let state = state.clone();
                        let on_choose = move |_: web_sys::MouseEvent| {
                            state.borrow_mut().upgrade_inbox.push(opt.upgrade);
                            ui.upgrades.set(None);
                        };
                        view! {
                            <button class="btn" on:click=on_choose>
                                <strong>{opt.name}</strong><br/><small>{opt.description}</small>
                            </button>
                        }
                    }).collect::<Vec<_>>();
                    Some(view! {
                        <h3>{format!("Level {} upgrade", prompt.level)}</h3>
                        {buttons}
                    })
                }}
            </div>
        </div>
    }
}

#[component]
pub fn RoundOver(ui: UiSignals) -> impl IntoView {
    let level = move || ui.hud.get().level;
    view! {
        <div class="io-overlay">
            <h2>"Round over"</h2>
            <p>{move || format!("You reached level {}", level())}</p>
        </div>
    }
}

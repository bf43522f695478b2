use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use tracing::{info, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::CanvasRenderingContext2d;

use crate::canvas;
use crate::classes::ClassKind;
use crate::network::{Network, SharedNetwork};
use crate::renderer;
use crate::simulation::{self, Effect, FrameInput, Tick};
use crate::state::{GameState, Phase, SharedState};
use crate::ui::{HudInfo, UiSignals, UpgradePrompt};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverStatus {
    Running,
    Stopped,
}

/// Turns animation-frame timestamps into ticks until the room locks.
#[derive(Debug, Clone)]
pub struct FrameDriver {
    status: DriverStatus,
    last_timestamp: Option<f64>,
}

impl FrameDriver {
    pub fn new() -> Self {
        Self { status: DriverStatus::Running, last_timestamp: None }
    }

    pub fn status(&self) -> DriverStatus {
        self.status
    }

    /// `None` once stopped; a stopped driver never runs again.
    pub fn begin_frame(&mut self, timestamp: f64, room_locked: bool) -> Option<Tick> {
        if self.status == DriverStatus::Stopped {
            return None;
        }
        if room_locked {
            self.status = DriverStatus::Stopped;
            return None;
        }
        let dt_ms = self.last_timestamp.map_or(0.0, |last| timestamp - last);
        self.last_timestamp = Some(timestamp);
        Some(Tick { now_ms: timestamp, dt_ms })
    }
}

/// Run one simulation step against the shared state, consuming queued upgrade picks.
pub fn advance(state: &mut GameState, tick: Tick) -> Vec<Effect> {
    let choices = std::mem::take(&mut state.upgrade_inbox);
    let viewport = state.viewport();
    let GameState { world, input, .. } = state;
    let frame = FrameInput { input, viewport, choices: &choices };
    simulation::step(world, &frame, tick)
}

fn dispatch(effects: Vec<Effect>, net: &SharedNetwork, ui: UiSignals) {
    for effect in effects {
        match effect {
            Effect::OrbConsumed { id } => Network::send_orb_consumed(net, &id),
            Effect::LevelUp { level } => ui.hud.update(|h| h.level = level),
            Effect::Experience { experience, threshold } => ui.hud.update(|h| {
                h.experience = experience;
                h.threshold = threshold;
            }),
            Effect::OfferUpgrades { level, options } => {
                ui.upgrades.set(Some(UpgradePrompt { level, options }));
            }
        }
    }
}

/// Class picked on the start screen: reset the round and start drawing.
pub fn start_round(state: &SharedState, net: &SharedNetwork, ui: UiSignals, class: ClassKind) {
    {
        let mut s = state.borrow_mut();
        if s.phase != Phase::ClassSelect {
            return;
        }
        s.start_round(class);
    }
    info!(?class, "round started");
    ui.hud.set(HudInfo::default());
    ui.upgrades.set(None);
    ui.phase.set(Phase::Playing);

    let ctx = match canvas::find_canvas().and_then(|c| canvas::context_2d(&c)) {
        Ok(ctx) => ctx,
        Err(err) => {
            warn!(%err, "no drawing surface");
            ui.status.set(err.to_string());
            return;
        }
    };
    start_game_loop(state.clone(), net.clone(), ui, ctx);
}

pub fn start_game_loop(state: SharedState, net: SharedNetwork, ui: UiSignals, ctx: CanvasRenderingContext2d) {
    let Some(window) = web_sys::window() else { return };

    let f: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
    let g = f.clone();
    let mut driver = FrameDriver::new();

    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |timestamp: f64| {
        let locked = state.borrow().room_locked;
        let Some(tick) = driver.begin_frame(timestamp, locked) else {
            state.borrow_mut().phase = Phase::Stopped;
            ui.upgrades.set(None);
            ui.phase.set(Phase::Stopped);
            info!("room locked, frame loop stopped");
            return;
        };

        let effects = advance(&mut state.borrow_mut(), tick);
        dispatch(effects, &net, ui);

        {
            let s = state.borrow();
            renderer::render(&ctx, &s.world, s.viewport());
        }

        // Request next frame
        if let Some(window) = web_sys::window() {
            if let Some(cb) = f.borrow().as_ref() {
                let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
            };
        }
    }) as Box<dyn FnMut(f64)>));

    if let Some(cb) = g.borrow().as_ref() {
        let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upgrades::Upgrade;

    #[test]
    fn first_frame_has_zero_dt() {
        let mut driver = FrameDriver::new();
        let tick = driver.begin_frame(1234.0, false).unwrap();
        assert_eq!(tick.now_ms, 1234.0);
        assert_eq!(tick.dt_ms, 0.0);

        let tick = driver.begin_frame(1250.5, false).unwrap();
        assert_eq!(tick.dt_ms, 16.5);
    }

    #[test]
    fn lock_stops_the_driver_for_good() {
        let mut driver = FrameDriver::new();
        driver.begin_frame(0.0, false);
        assert!(driver.begin_frame(16.0, true).is_none());
        assert_eq!(driver.status(), DriverStatus::Stopped);
        assert!(driver.begin_frame(32.0, false).is_none());
    }

    #[test]
    fn advance_drains_the_upgrade_inbox() {
        let mut state = GameState::new();
        state.screen_w = 800.0;
        state.screen_h = 600.0;
        state.start_round(ClassKind::Fighter);
        state.upgrade_inbox.push(Upgrade::DamageBoost);

        let effects = advance(&mut state, Tick { now_ms: 0.0, dt_ms: 16.0 });
        assert!(state.upgrade_inbox.is_empty());
        // nothing was on offer, so the pick is dropped
        assert!(state.world.player.upgrades.is_empty());
        assert!(effects.is_empty());
    }
}

use leptos::prelude::*;
use tracing::{info, warn};

use crate::canvas;
use crate::config::ClientConfig;
use crate::constants::CANVAS_ID;
use crate::error::SetupError;
use crate::input;
use crate::network::{self, Network, SharedNetwork};
use crate::state::{self, Phase, SharedState};
use crate::ui::{ClassSelect, Hud, RoundOver, UiSignals, UpgradeModal};

#[component]
pub fn App() -> impl IntoView {
    let game_state = state::new_shared_state();
    let ui = UiSignals::new();
    let net = Network::new(game_state.clone(), ui);

    match ClientConfig::from_page() {
        Ok(config) => join_room(net.clone(), config, ui),
        Err(err) => {
            warn!(%err, "not joining a room");
            ui.status.set(err.to_string());
        }
    }

    view! { <GameView state=game_state net=net ui=ui /> }
}

/// Check the room over HTTP, then open its socket.
fn join_room(net: SharedNetwork, config: ClientConfig, ui: UiSignals) {
    ui.status.set(format!("Joining room {}...", config.room_id));
    wasm_bindgen_futures::spawn_local(async move {
        let joined = match network::check_room(&config).await {
            Ok(check) => {
                info!(room = %config.room_id, mode = ?check.mode, "room found");
                Network::connect(&net, &config)
            }
            Err(err) => Err(err),
        };
        if let Err(err) = joined {
            warn!(%err, "could not join room");
            ui.status.set(err.to_string());
        }
    });
}

fn mount_canvas(state: &SharedState) -> Result<(), SetupError> {
    let canvas = canvas::find_canvas()?;
    canvas::resize(state, &canvas);
    canvas::setup_resize_handler(state.clone(), canvas.clone())?;
    input::setup_input(state.clone(), &canvas)
}

#[component]
fn GameView(state: SharedState, net: SharedNetwork, ui: UiSignals) -> impl IntoView {
    let state_clone = send_wrapper::SendWrapper::new(state.clone());
    let net_clone = send_wrapper::SendWrapper::new(net);

    // Setup canvas once mounted
    let state_for_mount = send_wrapper::SendWrapper::new(state);
    Effect::new(move |_| {
        if let Err(err) = mount_canvas(&state_for_mount) {
            warn!(%err, "canvas setup failed");
            ui.status.set(err.to_string());
        }
    });

    view! {
        <canvas id=CANVAS_ID></canvas>
        <div class="io-status">{move || ui.status.get()}</div>

        {move || match ui.phase.get() {
            Phase::ClassSelect => view! {
                <ClassSelect state=(*state_clone).clone() net=(*net_clone).clone() ui=ui />
            }.into_any(),
            Phase::Playing => view! {
                <Hud ui=ui />
                <UpgradeModal state=(*state_clone).clone() ui=ui />
            }.into_any(),
            Phase::Stopped => view! { <RoundOver ui=ui /> }.into_any(),
        }}
    }
}

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::Set;
use tracing::{debug, info, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CloseEvent, ErrorEvent, MessageEvent, WebSocket};

use crate::config::ClientConfig;
use crate::error::SetupError;
use crate::protocol::{self, Incoming, OrbConsumedMsg, RoomCheck, ServerMsg};
use crate::state::{GameState, Orb, Phase, SharedState};
use crate::ui::UiSignals;

/// What a server message changed, for the UI to mirror.
#[derive(Debug, Default, PartialEq)]
pub struct Applied {
    pub locked: Option<bool>,
    pub orbs_loaded: Option<usize>,
    pub back_to_select: bool,
}

pub fn apply_server_msg(state: &mut GameState, msg: ServerMsg) -> Applied {
    let mut applied = Applied::default();
    let locked = match msg {
        ServerMsg::StateSync { locked, mode, orbs, map_size } => {
            if let Some(orbs) = orbs {
                let count = orbs.len();
                let orbs: Vec<Orb> = orbs.into_iter().map(Orb::from).collect();
                if state.load_session(orbs, map_size) {
                    info!(count, ?map_size, ?mode, "arena session loaded");
                    applied.orbs_loaded = Some(count);
                } else {
                    warn!(count, "session init after round start, ignored");
                }
            }
            locked
        }
        ServerMsg::ScoreboardUpdate { locked } => locked,
        ServerMsg::Victory { player_name } => {
            info!(%player_name, "round won");
            Some(true)
        }
        ServerMsg::Other => None,
    };

    if let Some(locked) = locked {
        state.room_locked = locked;
        applied.locked = Some(locked);
        // A room reset reopens class selection after a finished round.
        if !locked && state.phase == Phase::Stopped {
            state.phase = Phase::ClassSelect;
            applied.back_to_select = true;
        }
    }
    applied
}

pub async fn check_room(config: &ClientConfig) -> Result<RoomCheck, SetupError> {
    let resp = gloo_net::http::Request::get(&config.check_path())
        .send()
        .await
        .map_err(|e| SetupError::Http(e.to_string()))?;
    if !resp.ok() {
        return Err(SetupError::Http(format!("status {}", resp.status())));
    }
    let check: RoomCheck = resp.json().await.map_err(|e| SetupError::Http(e.to_string()))?;
    if !check.exists {
        return Err(SetupError::RoomNotFound(config.room_id.clone()));
    }
    Ok(check)
}

pub struct Network {
    ws: Option<WebSocket>,
    pub state: SharedState,
    ui: UiSignals,
    // Store closures to prevent them from being dropped
    _on_open: Option<Closure<dyn FnMut()>>,
    _on_message: Option<Closure<dyn FnMut(MessageEvent)>>,
    _on_close: Option<Closure<dyn FnMut(CloseEvent)>>,
    _on_error: Option<Closure<dyn FnMut(ErrorEvent)>>,
}

pub type SharedNetwork = Rc<RefCell<Network>>;

impl Network {
    pub fn new(state: SharedState, ui: UiSignals) -> SharedNetwork {
        Rc::new(RefCell::new(Network {
            ws: None,
            state,
            ui,
            _on_open: None,
            _on_message: None,
            _on_close: None,
            _on_error: None,
        }))
    }

    pub fn connect(net: &SharedNetwork, config: &ClientConfig) -> Result<(), SetupError> {
        let url = config.ws_url();
        let ws = WebSocket::new(&url).map_err(|e| SetupError::Socket(format!("{e:?}")))?;
        let ui = net.borrow().ui;

        // on open
        let room_id = config.room_id.clone();
        let on_open = Closure::wrap(Box::new(move || {
            info!(%room_id, "room socket connected");
            ui.status.set(format!("Connected to room {room_id}"));
        }) as Box<dyn FnMut()>);

        // on message
        let state = net.borrow().state.clone();
        let on_message = Closure::wrap(Box::new(move |e: MessageEvent| {
            let Some(text) = e.data().as_string() else { return };
            match protocol::decode(&text) {
                Ok(Incoming::Error(err)) => {
                    warn!(error = %err.error, message = ?err.message, "server rejected message");
                }
                Ok(Incoming::Server(msg)) => {
                    let applied = apply_server_msg(&mut state.borrow_mut(), msg);
                    if let Some(count) = applied.orbs_loaded {
                        ui.status.set(format!("{count} orbs in the arena"));
                    }
                    if applied.back_to_select {
                        ui.phase.set(Phase::ClassSelect);
                    }
                }
                Err(err) => debug!(%err, "dropping malformed server message"),
            }
        }) as Box<dyn FnMut(MessageEvent)>);

        // on close
        let on_close = Closure::wrap(Box::new(move |e: CloseEvent| {
            info!(code = e.code(), "room socket closed");
            ui.status.set("Disconnected".to_string());
        }) as Box<dyn FnMut(CloseEvent)>);

        // on error
        let on_error = Closure::wrap(Box::new(move |e: ErrorEvent| {
            warn!(message = %e.message(), "room socket error");
        }) as Box<dyn FnMut(ErrorEvent)>);

        ws.set_onopen(Some(on_open.as_ref().unchecked_ref()));
        ws.set_onmessage(Some(on_message.as_ref().unchecked_ref()));
        ws.set_onclose(Some(on_close.as_ref().unchecked_ref()));
        ws.set_onerror(Some(on_error.as_ref().unchecked_ref()));

        let mut net_mut = net.borrow_mut();
        net_mut.ws = Some(ws);
        net_mut._on_open = Some(on_open);
        net_mut._on_message = Some(on_message);
        net_mut._on_close = Some(on_close);
        net_mut._on_error = Some(on_error);
        Ok(())
    }

    /// Fire-and-forget: nothing is retried and local state keeps the gain.
    pub fn send_orb_consumed(net: &SharedNetwork, orb_id: &str) {
        let net_ref = net.borrow();
        let Some(ws) = &net_ref.ws else { return };
        if ws.ready_state() != WebSocket::OPEN {
            debug!(orb_id, "socket not open, orb notification dropped");
            return;
        }
        match serde_json::to_string(&OrbConsumedMsg::new(orb_id)) {
            Ok(text) => {
                if ws.send_with_str(&text).is_err() {
                    debug!(orb_id, "orb notification send failed");
                }
            }
            Err(err) => debug!(%err, "orb notification not encodable"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classes::ClassKind;
    use crate::protocol::{OrbDescriptor, OrbId};

    fn descriptor(id: &str) -> OrbDescriptor {
        OrbDescriptor {
            id: OrbId::Text(id.into()),
            x: 5.0,
            y: 5.0,
            radius: 6.0,
            color: "#fff".into(),
            value: 3,
        }
    }

    fn sync(locked: Option<bool>, orbs: Option<Vec<OrbDescriptor>>) -> ServerMsg {
        ServerMsg::StateSync { locked, mode: None, orbs, map_size: Some(2500.0) }
    }

    #[test]
    fn state_sync_loads_orbs_before_round() {
        let mut state = GameState::new();
        let applied = apply_server_msg(&mut state, sync(Some(false), Some(vec![descriptor("a")])));
        assert_eq!(applied.orbs_loaded, Some(1));
        assert_eq!(state.world.orbs[0].id, "a");
        assert_eq!(state.world.map_size, 2500.0);
        assert!(!state.room_locked);
    }

    #[test]
    fn late_session_init_does_not_replace_orbs() {
        let mut state = GameState::new();
        apply_server_msg(&mut state, sync(None, Some(vec![descriptor("a")])));
        state.start_round(ClassKind::Fighter);
        let applied = apply_server_msg(&mut state, sync(None, Some(vec![descriptor("b"), descriptor("c")])));
        assert_eq!(applied.orbs_loaded, None);
        assert_eq!(state.world.orbs.len(), 1);
    }

    #[test]
    fn victory_locks_the_room() {
        let mut state = GameState::new();
        let applied = apply_server_msg(&mut state, ServerMsg::Victory { player_name: "ada".into() });
        assert_eq!(applied.locked, Some(true));
        assert!(state.room_locked);
    }

    #[test]
    fn scoreboard_without_lock_field_keeps_flag() {
        let mut state = GameState::new();
        state.room_locked = true;
        apply_server_msg(&mut state, ServerMsg::ScoreboardUpdate { locked: None });
        assert!(state.room_locked);
        apply_server_msg(&mut state, ServerMsg::ScoreboardUpdate { locked: Some(false) });
        assert!(!state.room_locked);
    }

    #[test]
    fn unlock_after_stopped_round_reopens_class_select() {
        let mut state = GameState::new();
        state.start_round(ClassKind::Tank);
        state.phase = Phase::Stopped;
        let applied = apply_server_msg(&mut state, sync(Some(false), None));
        assert!(applied.back_to_select);
        assert_eq!(state.phase, Phase::ClassSelect);
    }

    #[test]
    fn other_messages_change_nothing() {
        let mut state = GameState::new();
        assert_eq!(apply_server_msg(&mut state, ServerMsg::Other), Applied::default());
    }
}

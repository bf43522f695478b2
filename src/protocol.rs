use serde::{Deserialize, Serialize};

use crate::state::Orb;

// Server -> Client: room socket messages, keyed by "type"
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMsg {
    StateSync {
        #[serde(default)]
        locked: Option<bool>,
        #[serde(default)]
        mode: Option<String>,
        // Present when the room hosts the arena: the session init.
        #[serde(default)]
        orbs: Option<Vec<OrbDescriptor>>,
        #[serde(default)]
        map_size: Option<f64>,
    },
    ScoreboardUpdate {
        #[serde(default)]
        locked: Option<bool>,
    },
    Victory {
        #[serde(default)]
        player_name: String,
    },
    // guess, chat_message and anything newer
    #[serde(other)]
    Other,
}

// Server -> Client: rejected action
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ErrorMsg {
    pub error: String,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Incoming {
    Error(ErrorMsg),
    Server(ServerMsg),
}

pub fn decode(text: &str) -> Result<Incoming, serde_json::Error> {
    let value: serde_json::Value = serde_json::from_str(text)?;
    if value.get("error").is_some() {
        serde_json::from_value(value).map(Incoming::Error)
    } else {
        serde_json::from_value(value).map(Incoming::Server)
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum OrbId {
    Text(String),
    Number(serde_json::Number),
}

impl From<OrbId> for String {
    fn from(id: OrbId) -> Self {
        match id {
            OrbId::Text(s) => s,
            OrbId::Number(n) => n.to_string(),
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct OrbDescriptor {
    pub id: OrbId,
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub color: String,
    pub value: u32,
}

impl From<OrbDescriptor> for Orb {
    fn from(d: OrbDescriptor) -> Self {
        Orb {
            id: d.id.into(),
            x: d.x,
            y: d.y,
            radius: d.radius,
            color: d.color,
            value: d.value,
        }
    }
}

// Client -> Server: orb pickup, carried on the hub's guess message
#[derive(Serialize, Debug)]
pub struct OrbConsumedMsg<'a> {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub word: &'a str,
    pub player_name: &'static str,
}

impl<'a> OrbConsumedMsg<'a> {
    pub fn new(orb_id: &'a str) -> Self {
        Self { kind: "guess", word: orb_id, player_name: "system" }
    }
}

// HTTP: GET /rooms/{id}/check
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct RoomCheck {
    pub exists: bool,
    #[serde(default)]
    pub mode: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_sync_carries_session_init() {
        let text = r##"{
            "type": "state_sync", "mode": "coop", "locked": false,
            "history": [], "scoreboard": [],
            "orbs": [
                {"id": "a1", "x": 10, "y": 20.5, "radius": 8, "color": "#f1c40f", "value": 10},
                {"id": 7, "x": 0, "y": 0, "radius": 8, "color": "#2ecc71", "value": 25}
            ],
            "map_size": 3000
        }"##;
        let Incoming::Server(ServerMsg::StateSync { locked, orbs, map_size, .. }) = decode(text).unwrap() else {
            panic!("expected state_sync");
        };
        assert_eq!(locked, Some(false));
        assert_eq!(map_size, Some(3000.0));

        let orbs: Vec<Orb> = orbs.unwrap().into_iter().map(Orb::from).collect();
        assert_eq!(orbs[0].id, "a1");
        assert_eq!(orbs[0].y, 20.5);
        assert_eq!(orbs[1].id, "7");
        assert_eq!(orbs[1].value, 25);
    }

    #[test]
    fn plain_word_room_sync_has_no_orbs() {
        let msg = decode(r#"{"type":"state_sync","mode":"race","locked":true}"#).unwrap();
        assert_eq!(
            msg,
            Incoming::Server(ServerMsg::StateSync {
                locked: Some(true),
                mode: Some("race".into()),
                orbs: None,
                map_size: None,
            })
        );
    }

    #[test]
    fn scoreboard_update_without_lock_field() {
        let msg = decode(r#"{"type":"scoreboard_update","scoreboard":[]}"#).unwrap();
        assert_eq!(msg, Incoming::Server(ServerMsg::ScoreboardUpdate { locked: None }));
    }

    #[test]
    fn unhandled_types_decode_as_other() {
        let chat = decode(r#"{"type":"chat_message","player_name":"a","content":"hi"}"#).unwrap();
        assert_eq!(chat, Incoming::Server(ServerMsg::Other));
        let guess = decode(r#"{"type":"guess","word":"chat","temperature":12.0}"#).unwrap();
        assert_eq!(guess, Incoming::Server(ServerMsg::Other));
    }

    #[test]
    fn error_payloads_are_recognised() {
        let msg = decode(r#"{"error":"room_locked","message":"locked"}"#).unwrap();
        assert_eq!(
            msg,
            Incoming::Error(ErrorMsg { error: "room_locked".into(), message: Some("locked".into()) })
        );
    }

    #[test]
    fn garbage_is_an_error() {
        assert!(decode("not json").is_err());
        assert!(decode(r#"{"no_type": 1}"#).is_err());
    }

    #[test]
    fn orb_consumption_uses_guess_envelope() {
        let json = serde_json::to_value(OrbConsumedMsg::new("orb-9")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"type": "guess", "word": "orb-9", "player_name": "system"})
        );
    }
}

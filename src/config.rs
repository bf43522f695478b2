use tracing::Level;

use crate::error::SetupError;

// Runtime settings read from the page. Gameplay tuning lives in `constants` and `classes`.

const DEFAULT_PLAYER_NAME: &str = "Pilot";
const PLAYER_NAME_KEY: &str = "player_name";
const LOG_LEVEL_KEY: &str = "spaceio_log";

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub room_id: String,
    pub player_name: String,
    /// `"https:"` or `"http:"`, as reported by `location.protocol`.
    pub page_protocol: String,
    pub host: String,
}

impl ClientConfig {
    pub fn from_page() -> Result<Self, SetupError> {
        let window = web_sys::window().ok_or(SetupError::NoWindow)?;
        let location = window.location();
        let hash = location.hash().unwrap_or_default();
        let search = location.search().unwrap_or_default();

        let storage = window.local_storage().ok().flatten();
        let stored = |key: &str| storage.as_ref().and_then(|s| s.get_item(key).ok().flatten());

        let room_id = room_from_hash(&hash)
            .or_else(|| room_from_search(&search))
            .ok_or(SetupError::MissingRoom)?;

        Ok(Self {
            room_id,
            player_name: player_name_or_default(stored(PLAYER_NAME_KEY)),
            page_protocol: location.protocol().unwrap_or_default(),
            host: location.host().unwrap_or_default(),
        })
    }

    pub fn ws_url(&self) -> String {
        let ws_proto = if self.page_protocol == "https:" { "wss:" } else { "ws:" };
        format!(
            "{}//{}/rooms/{}/ws?player_name={}",
            ws_proto,
            self.host,
            self.room_id,
            String::from(js_sys::encode_uri_component(&self.player_name)),
        )
    }

    pub fn check_path(&self) -> String {
        format!("/rooms/{}/check", self.room_id)
    }
}

/// Log level stored for this origin, readable before the rest of the config.
pub fn stored_log_level() -> Level {
    let value = web_sys::window()
        .and_then(|w| w.local_storage().ok().flatten())
        .and_then(|s| s.get_item(LOG_LEVEL_KEY).ok().flatten());
    parse_log_level(value.as_deref())
}

/// Reads `#room=<id>`; other `&`-separated hash params are skipped.
pub fn room_from_hash(hash: &str) -> Option<String> {
    hash.trim_start_matches('#')
        .split('&')
        .find_map(|pair| pair.strip_prefix("room="))
        .filter(|id| !id.is_empty())
        .map(str::to_string)
}

fn room_from_search(search: &str) -> Option<String> {
    let params = web_sys::UrlSearchParams::new_with_str(search).ok()?;
    params.get("room").filter(|id| !id.is_empty())
}

pub fn player_name_or_default(stored: Option<String>) -> String {
    stored
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| DEFAULT_PLAYER_NAME.to_string())
}

pub fn parse_log_level(value: Option<&str>) -> Level {
    match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
        Some("trace") => Level::TRACE,
        Some("debug") => Level::DEBUG,
        Some("warn") => Level::WARN,
        Some("error") => Level::ERROR,
        _ => Level::INFO,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn room_is_read_from_hash() {
        assert_eq!(room_from_hash("#room=ab12"), Some("ab12".to_string()));
        assert_eq!(room_from_hash("#tab=chat&room=xyz"), Some("xyz".to_string()));
        assert_eq!(room_from_hash("#room="), None);
        assert_eq!(room_from_hash(""), None);
    }

    #[test]
    fn blank_player_name_falls_back() {
        assert_eq!(player_name_or_default(None), "Pilot");
        assert_eq!(player_name_or_default(Some("   ".into())), "Pilot");
        assert_eq!(player_name_or_default(Some(" Ada ".into())), "Ada");
    }

    #[test]
    fn log_level_defaults_to_info() {
        assert_eq!(parse_log_level(None), Level::INFO);
        assert_eq!(parse_log_level(Some("DEBUG")), Level::DEBUG);
        assert_eq!(parse_log_level(Some("loud")), Level::INFO);
    }
}

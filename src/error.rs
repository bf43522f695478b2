use std::fmt;

// Failures while wiring the game into the page. The frame loop itself has none.
#[derive(Debug, Clone, PartialEq)]
pub enum SetupError {
    NoWindow,
    MissingElement(&'static str),
    NoContext2d,
    MissingRoom,
    RoomNotFound(String),
    Socket(String),
    Http(String),
}

impl fmt::Display for SetupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetupError::NoWindow => write!(f, "no browser window"),
            SetupError::MissingElement(id) => write!(f, "element #{id} not found"),
            SetupError::NoContext2d => write!(f, "canvas has no 2d context"),
            SetupError::MissingRoom => write!(f, "no room in the page URL"),
            SetupError::RoomNotFound(id) => write!(f, "room {id} does not exist"),
            SetupError::Socket(msg) => write!(f, "websocket: {msg}"),
            SetupError::Http(msg) => write!(f, "http: {msg}"),
        }
    }
}

impl std::error::Error for SetupError {}

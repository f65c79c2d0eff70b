//! Error kinds for the game core.
//!
//! Neither kind ever reaches the player: persistence problems are logged and
//! recovered locally, and invalid transitions are dropped by
//! [`GameSession::handle`](crate::session::GameSession::handle).

use crate::session::{GameEvent, SessionState};
use std::fmt;
use std::io;

#[derive(Debug, Clone, PartialEq)]
pub enum CoreError {
    /// The settings backend could not be read or written.
    PersistenceUnavailable(String),
    /// An event arrived in a state that defines no transition for it.
    InvalidTransitionRequest {
        state: SessionState,
        event: GameEvent,
    },
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PersistenceUnavailable(reason) => {
                write!(f, "settings persistence unavailable: {}", reason)
            }
            Self::InvalidTransitionRequest { state, event } => {
                write!(f, "no transition for {:?} in state {:?}", event, state)
            }
        }
    }
}

impl std::error::Error for CoreError {}

impl From<io::Error> for CoreError {
    fn from(err: io::Error) -> Self {
        Self::PersistenceUnavailable(err.to_string())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::PersistenceUnavailable(err.to_string())
    }
}

pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_maps_to_persistence() {
        let err: CoreError = io::Error::new(io::ErrorKind::PermissionDenied, "read-only").into();
        assert!(matches!(err, CoreError::PersistenceUnavailable(_)));
        assert!(err.to_string().contains("read-only"));
    }

    #[test]
    fn test_invalid_transition_display() {
        let err = CoreError::InvalidTransitionRequest {
            state: SessionState::Start,
            event: GameEvent::PauseRequest,
        };
        let text = err.to_string();
        assert!(text.contains("PauseRequest"));
        assert!(text.contains("Start"));
    }
}

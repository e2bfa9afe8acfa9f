//! Error handling for the roast timeline session runtime
//!
//! The engine functions never fail; errors only come from the session
//! controller and replay file handling.

use serde::Serialize;
use shared::EventInputError;
use thiserror::Error;
use uuid::Uuid;

/// Session runtime error types
#[derive(Error, Debug)]
pub enum SessionError {
    // Input errors
    #[error("Invalid event: {message}")]
    InvalidEvent { field: String, message: String },

    #[error("Event not found: {0}")]
    EventNotFound(Uuid),

    // Lifecycle errors
    #[error("Roast {roast_id} is {status}")]
    SessionClosed { roast_id: Uuid, status: &'static str },

    #[error("No active roast session")]
    NoActiveSession,

    // Runtime errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<EventInputError> for SessionError {
    fn from(err: EventInputError) -> Self {
        SessionError::InvalidEvent {
            field: err.field(),
            message: err.to_string(),
        }
    }
}

/// Error body handed to clients
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl SessionError {
    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            SessionError::InvalidEvent { .. } => "INVALID_EVENT",
            SessionError::EventNotFound(_) => "EVENT_NOT_FOUND",
            SessionError::SessionClosed { .. } => "SESSION_CLOSED",
            SessionError::NoActiveSession => "NO_ACTIVE_SESSION",
            SessionError::Io(_) => "IO_ERROR",
            SessionError::Json(_) => "MALFORMED_JSON",
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        let field = match self {
            SessionError::InvalidEvent { field, .. } if !field.is_empty() => Some(field.clone()),
            _ => None,
        };

        ErrorResponse {
            error: ErrorDetail {
                code: self.code().to_string(),
                message: self.to_string(),
                field,
            },
        }
    }
}

/// Result type alias for session operations
pub type SessionResult<T> = Result<T, SessionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(SessionError::NoActiveSession.code(), "NO_ACTIVE_SESSION");
        assert_eq!(SessionError::EventNotFound(Uuid::nil()).code(), "EVENT_NOT_FOUND");
    }

    #[test]
    fn test_invalid_event_response_names_field() {
        let err = SessionError::InvalidEvent {
            field: "fan_level".to_string(),
            message: "out of range".to_string(),
        };
        let body = serde_json::to_value(err.to_response()).unwrap();
        assert_eq!(body["error"]["code"], "INVALID_EVENT");
        assert_eq!(body["error"]["field"], "fan_level");
    }

    #[test]
    fn test_response_omits_missing_field() {
        let body = serde_json::to_value(SessionError::NoActiveSession.to_response()).unwrap();
        assert!(body["error"].get("field").is_none());
    }
}

//! Error types for the planner core.

use thiserror::Error;

/// Errors that can occur while loading the catalog or editing timetables.
///
/// The type is `Clone` so a single failed catalog request can be handed to every
/// caller that was waiting on it.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PlannerError {
    /// Network/HTTP request failed
    #[error("Network error: {message}")]
    Network { message: String },

    /// Catalog server returned a non-success status
    #[error("Unexpected response ({status}): {message}")]
    UnexpectedResponse { status: u16, message: String },

    /// Catalog payload could not be decoded
    #[error("Decode error: {message}")]
    Decode { message: String },

    /// Configuration could not be loaded or is invalid
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// A store capability was used after the owning store was dropped
    #[error("Schedule store is not initialized or has been torn down")]
    StoreUnavailable,

    /// Write targeted a table key the store does not know about
    #[error("Unknown timetable: {key}")]
    UnknownTable { key: String },

    /// A content subscription outlived its table
    #[error("Timetable {key} was removed")]
    TableRemoved { key: String },

    /// Drag item identifier is not of the form `<tableKey>:<index>`
    #[error("Invalid drag item id: {id}")]
    InvalidDragId { id: String },
}

impl PlannerError {
    /// Returns true if this error is potentially transient and retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            PlannerError::Network { .. } | PlannerError::UnexpectedResponse { .. }
        )
    }

    /// Returns true if this error means the planner was wired up incorrectly.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            PlannerError::StoreUnavailable | PlannerError::Config { .. }
        )
    }
}

impl From<reqwest::Error> for PlannerError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return PlannerError::Decode {
                message: err.to_string(),
            };
        }
        match err.status() {
            Some(status) => PlannerError::UnexpectedResponse {
                status: status.as_u16(),
                message: err.to_string(),
            },
            None => PlannerError::Network {
                message: err.to_string(),
            },
        }
    }
}

impl From<url::ParseError> for PlannerError {
    fn from(err: url::ParseError) -> Self {
        PlannerError::Config {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for PlannerError {
    fn from(err: serde_json::Error) -> Self {
        PlannerError::Decode {
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for PlannerError {
    fn from(err: std::io::Error) -> Self {
        PlannerError::Config {
            message: err.to_string(),
        }
    }
}

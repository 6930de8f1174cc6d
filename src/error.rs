//! Error types for the Q&A server
//!
//! Defines store-level (business) errors and transport-level errors.
//! Uses thiserror for ergonomic error definitions.

use thiserror::Error;

/// Store operation failures
///
/// Every variant is detected under the store lock before anything is
/// mutated, so a failed operation leaves the state untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Room name does not match the room grammar
    #[error("Invalid room name: {0}")]
    InvalidRoomName(String),

    /// A room with this (case-folded) name already exists
    #[error("Room already exists: {0}")]
    RoomAlreadyExists(String),

    /// No room with the given name
    #[error("Room not found: {0}")]
    RoomNotFound(String),

    /// User id is unknown or bound to another room
    #[error("Must be registered to room")]
    Unauthorized,

    /// Registered, but not the room owner
    #[error("Must be the owner of the room")]
    Forbidden,

    /// Room no longer accepts questions
    #[error("Room is closed")]
    RoomClosed,

    /// Question text shorter than the minimum
    #[error("Question too short: {len} characters, at least {min} required")]
    QuestionTooShort { len: usize, min: usize },

    /// Question id is unreadable or not present in the room
    #[error("No question with id {0}")]
    InvalidQuestionId(String),

    /// Vote value outside of -1, 0, 1
    #[error("Vote must be -1, 0 or 1, got {0}")]
    InvalidVoteValue(String),
}

/// Application-level errors
///
/// Failures of the transport itself. Store errors never end a
/// connection; they are answered with an error frame.
#[derive(Debug, Error)]
pub enum AppError {
    /// WebSocket protocol error (fatal)
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// JSON serialization/deserialization error
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

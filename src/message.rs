//! Message protocol definitions
//!
//! JSON-based request/response protocol using Serde's tagged enum
//! for type-safe serialization/deserialization. Every client message
//! gets exactly one server message back.

use serde::{Deserialize, Serialize};

use crate::error::{AppError, StoreError};
use crate::question::Question;
use crate::types::{QuestionId, RawInt, RoomName, UserId};

/// Client → Server message
///
/// Uses tagged enum with snake_case naming. Requests that act on behalf
/// of a user carry the token issued by `create_room` or `register`.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Create a room; the caller becomes its owner
    CreateRoom { room: String },
    /// Register with a room, optionally presenting a previous token
    Register {
        room: String,
        user_id: Option<String>,
    },
    /// Submit a question
    PublishQuestion {
        room: String,
        user_id: String,
        question: String,
    },
    /// Vote on a question (-1, 0 or 1)
    ///
    /// Both numbers are checked by the store, after the room and user.
    Vote {
        room: String,
        user_id: String,
        #[serde(default)]
        question_id: RawInt,
        #[serde(default)]
        value: RawInt,
    },
    /// Close a room (owner only)
    CloseRoom { room: String, user_id: String },
    /// List all room names
    ListRooms,
    /// Fetch a room's questions
    GetQuestions { room: String },
    /// Fetch the questions the caller published
    MyQuestions { room: String, user_id: String },
}

/// Server → Client message
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Connection accepted
    Connected,
    /// Room created, owner token issued
    RoomCreated { room: RoomName, user_id: UserId },
    /// Registration accepted
    Registered { room: RoomName, user_id: UserId },
    /// Question stored
    QuestionPublished { question: Question },
    /// Vote applied
    Voted {
        question_id: QuestionId,
        vote_count: i64,
    },
    /// Room closed
    RoomClosed { room: RoomName },
    /// All rooms
    RoomList { rooms: Vec<RoomName> },
    /// Questions of a room
    Questions {
        room: RoomName,
        questions: Vec<Question>,
        is_closed: bool,
    },
    /// Questions published by the caller
    MyQuestions {
        room: RoomName,
        questions: Vec<Question>,
    },
    /// Error occurred
    Error { code: ErrorCode, message: String },
}

/// Error codes for ServerMessage::Error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    InvalidRoomName,
    RoomAlreadyExists,
    RoomNotFound,
    /// Not registered to the room
    Unauthorized,
    /// Registered, but not the owner
    Forbidden,
    RoomClosed,
    QuestionTooShort,
    InvalidQuestionId,
    InvalidVoteValue,
    /// Frame could not be parsed as a request
    InvalidMessage,
}

impl From<&StoreError> for ErrorCode {
    fn from(err: &StoreError) -> Self {
        match err {
            StoreError::InvalidRoomName(_) => ErrorCode::InvalidRoomName,
            StoreError::RoomAlreadyExists(_) => ErrorCode::RoomAlreadyExists,
            StoreError::RoomNotFound(_) => ErrorCode::RoomNotFound,
            StoreError::Unauthorized => ErrorCode::Unauthorized,
            StoreError::Forbidden => ErrorCode::Forbidden,
            StoreError::RoomClosed => ErrorCode::RoomClosed,
            StoreError::QuestionTooShort { .. } => ErrorCode::QuestionTooShort,
            StoreError::InvalidQuestionId(_) => ErrorCode::InvalidQuestionId,
            StoreError::InvalidVoteValue(_) => ErrorCode::InvalidVoteValue,
        }
    }
}

/// Convert StoreError to ServerMessage for client notification
impl From<StoreError> for ServerMessage {
    fn from(err: StoreError) -> Self {
        ServerMessage::Error {
            code: ErrorCode::from(&err),
            message: err.to_string(),
        }
    }
}

/// Convert AppError to ServerMessage for client notification
impl From<AppError> for ServerMessage {
    fn from(err: AppError) -> Self {
        match err {
            AppError::Json(e) => ServerMessage::Error {
                code: ErrorCode::InvalidMessage,
                message: format!("Invalid message format: {}", e),
            },
            // Fatal errors are not typically converted (connection closes)
            AppError::WebSocket(_) => ServerMessage::Error {
                code: ErrorCode::InvalidMessage,
                message: "Internal error".to_string(),
            },
        }
    }
}

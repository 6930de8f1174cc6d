//! Basic type definitions for the Q&A server
//!
//! Provides newtype wrappers for type safety:
//! - `UserId`: opaque UUID-based user token
//! - `RoomName`: validated, lowercase room name
//! - `QuestionId`: process-wide question number
//! - `VoteValue`: a single user's vote on a question (-1, 0 or 1)
//! - `RawInt`: an integer request field before it has been checked

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::StoreError;

/// Opaque user token (newtype pattern)
///
/// Issued once per registration and handed back by clients as a bearer
/// value. Borrows as `str` so maps keyed by `UserId` can be queried with
/// whatever string a client supplied.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Generate a fresh random user token
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for UserId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Check a candidate room name against the room grammar
///
/// One or more ASCII alphanumeric runs, joined by a single `-` or `_`.
pub fn is_valid_room_name(value: &str) -> bool {
    let mut prev_separator = true;
    for ch in value.chars() {
        if ch.is_ascii_alphanumeric() {
            prev_separator = false;
        } else if ch == '-' || ch == '_' {
            if prev_separator {
                return false;
            }
            prev_separator = true;
        } else {
            return false;
        }
    }
    // Also rejects the empty string: no run was ever started.
    !prev_separator
}

/// Fold a room name for lookup and storage
pub fn normalize_room_name(value: &str) -> String {
    value.to_ascii_lowercase()
}

/// Room name (validated, lowercase)
///
/// Only produced by [`RoomName::parse`], so every stored room key has
/// passed the grammar check and is case-folded.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RoomName(String);

impl RoomName {
    pub fn parse(value: &str) -> Result<Self, StoreError> {
        if !is_valid_room_name(value) {
            return Err(StoreError::InvalidRoomName(value.to_string()));
        }
        Ok(Self(normalize_room_name(value)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for RoomName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Question identifier, unique across all rooms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct QuestionId(pub u64);

impl QuestionId {
    /// Read a question id from a request field; negative or non-integer fields have none
    pub fn from_raw(raw: &RawInt) -> Option<Self> {
        raw.as_int()
            .and_then(|id| u64::try_from(id).ok())
            .map(QuestionId)
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A single user's vote on a question
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VoteValue {
    Down,
    #[default]
    Neutral,
    Up,
}

impl VoteValue {
    pub fn as_i64(self) -> i64 {
        match self {
            VoteValue::Down => -1,
            VoteValue::Neutral => 0,
            VoteValue::Up => 1,
        }
    }
}

impl TryFrom<i64> for VoteValue {
    type Error = StoreError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(VoteValue::Down),
            0 => Ok(VoteValue::Neutral),
            1 => Ok(VoteValue::Up),
            other => Err(StoreError::InvalidVoteValue(other.to_string())),
        }
    }
}

impl TryFrom<&RawInt> for VoteValue {
    type Error = StoreError;

    fn try_from(raw: &RawInt) -> Result<Self, Self::Error> {
        match raw {
            RawInt::Int(value) => VoteValue::try_from(*value),
            RawInt::Other(_) => Err(StoreError::InvalidVoteValue(raw.to_string())),
        }
    }
}

/// Integer field of a request, as the client sent it
///
/// Keeping non-integers around lets the store reject them at the point
/// where the field is checked, after the room and user.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawInt {
    Int(i64),
    /// String, float, null, out-of-range number, ...
    Other(serde_json::Value),
}

impl RawInt {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            RawInt::Int(value) => Some(*value),
            RawInt::Other(_) => None,
        }
    }
}

// A missing field reads as null.
impl Default for RawInt {
    fn default() -> Self {
        RawInt::Other(serde_json::Value::Null)
    }
}

impl From<i64> for RawInt {
    fn from(value: i64) -> Self {
        RawInt::Int(value)
    }
}

impl From<i32> for RawInt {
    fn from(value: i32) -> Self {
        RawInt::Int(value.into())
    }
}

impl From<u64> for RawInt {
    fn from(value: u64) -> Self {
        i64::try_from(value)
            .map(RawInt::Int)
            .unwrap_or_else(|_| RawInt::Other(value.into()))
    }
}

impl fmt::Display for RawInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawInt::Int(value) => value.fmt(f),
            RawInt::Other(value) => value.fmt(f),
        }
    }
}

//! Question struct definition

use serde::Serialize;

use crate::types::QuestionId;

/// Minimum question length, in characters
pub const MIN_QUESTION_LEN: usize = 5;

/// A submitted question with its aggregate vote tally
///
/// Serialized as-is in question listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Question {
    pub id: QuestionId,
    pub text: String,
    /// Sum of every user's current vote; may be negative
    pub vote_count: i64,
}

impl Question {
    pub fn new(id: QuestionId, text: String) -> Self {
        Self {
            id,
            text,
            vote_count: 0,
        }
    }

    /// Apply a vote delta and return the new tally
    pub fn apply_delta(&mut self, delta: i64) -> i64 {
        self.vote_count += delta;
        self.vote_count
    }
}

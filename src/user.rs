//! User struct definition
//!
//! A registered participant bound to exactly one room, with the last vote
//! they cast on each question.

use std::collections::HashMap;

use crate::types::{QuestionId, RoomName, UserId, VoteValue};

/// Registered user information
#[derive(Debug)]
pub struct User {
    /// Unique token handed to the client
    pub id: UserId,
    /// The room this user registered with
    pub room: RoomName,
    /// Last vote per question; a missing entry counts as neutral
    pub vote_data: HashMap<QuestionId, VoteValue>,
    /// Questions published by this user, oldest first
    pub authored: Vec<QuestionId>,
    /// Created together with the room; may close it
    pub is_owner: bool,
}

impl User {
    /// Create a participant bound to `room`
    pub fn new(id: UserId, room: RoomName) -> Self {
        Self {
            id,
            room,
            vote_data: HashMap::new(),
            authored: Vec::new(),
            is_owner: false,
        }
    }

    /// Create the owner of a freshly created room
    pub fn owner(id: UserId, room: RoomName) -> Self {
        Self {
            is_owner: true,
            ..Self::new(id, room)
        }
    }

    /// Check if this user is bound to the given (normalized) room
    pub fn belongs_to(&self, room: &str) -> bool {
        self.room.as_str() == room
    }

    /// Record a vote and return how much the question tally must change
    ///
    /// Repeating the same vote yields 0; switching from up to down yields -2.
    pub fn record_vote(&mut self, question: QuestionId, value: VoteValue) -> i64 {
        let previous = self.vote_on(question);
        self.vote_data.insert(question, value);
        value.as_i64() - previous.as_i64()
    }

    /// Last vote this user cast on a question
    pub fn vote_on(&self, question: QuestionId) -> VoteValue {
        self.vote_data.get(&question).copied().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User::new(UserId::generate(), RoomName::parse("demo").unwrap())
    }

    #[test]
    fn test_user_creation() {
        let user = user();
        assert!(!user.is_owner);
        assert!(user.vote_data.is_empty());
        assert!(user.authored.is_empty());
        assert!(user.belongs_to("demo"));
        assert!(!user.belongs_to("other"));
    }

    #[test]
    fn test_owner_creation() {
        let owner = User::owner(UserId::generate(), RoomName::parse("demo").unwrap());
        assert!(owner.is_owner);
    }

    #[test]
    fn test_vote_delta() {
        let mut user = user();
        let q = QuestionId(1);

        assert_eq!(user.vote_on(q), VoteValue::Neutral);
        assert_eq!(user.record_vote(q, VoteValue::Up), 1);
        assert_eq!(user.record_vote(q, VoteValue::Up), 0);
        assert_eq!(user.record_vote(q, VoteValue::Down), -2);
        assert_eq!(user.record_vote(q, VoteValue::Neutral), 1);
        assert_eq!(user.vote_on(q), VoteValue::Neutral);
    }

    #[test]
    fn test_vote_delta_per_question() {
        let mut user = user();
        assert_eq!(user.record_vote(QuestionId(1), VoteValue::Down), -1);
        assert_eq!(user.record_vote(QuestionId(2), VoteValue::Up), 1);
        assert_eq!(user.vote_on(QuestionId(1)), VoteValue::Down);
        assert_eq!(user.vote_on(QuestionId(2)), VoteValue::Up);
    }
}

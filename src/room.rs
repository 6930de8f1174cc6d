//! Room struct definition
//!
//! Represents a Q&A room: its questions and whether it still accepts them.

use std::collections::HashMap;

use crate::question::Question;
use crate::types::{QuestionId, RoomName};

/// Q&A Room
///
/// Owns its questions. Once closed a room stays closed; closing only
/// stops new questions, voting and listing keep working.
#[derive(Debug)]
pub struct Room {
    /// Room name (lowercase, unique)
    pub name: RoomName,
    /// Questions by id
    pub questions: HashMap<QuestionId, Question>,
    /// Closed flag (false -> true only)
    pub is_closed: bool,
}

impl Room {
    /// Create a new open room with no questions
    pub fn new(name: RoomName) -> Self {
        Self {
            name,
            questions: HashMap::new(),
            is_closed: false,
        }
    }

    /// Stop accepting new questions
    pub fn close(&mut self) {
        self.is_closed = true;
    }

    pub fn insert_question(&mut self, question: Question) {
        self.questions.insert(question.id, question);
    }

    pub fn question(&self, id: QuestionId) -> Option<&Question> {
        self.questions.get(&id)
    }

    pub fn question_mut(&mut self, id: QuestionId) -> Option<&mut Question> {
        self.questions.get_mut(&id)
    }

    /// All questions, ordered by id
    pub fn sorted_questions(&self) -> Vec<Question> {
        let mut questions: Vec<Question> = self.questions.values().cloned().collect();
        questions.sort_by_key(|q| q.id);
        questions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room(name: &str) -> Room {
        Room::new(RoomName::parse(name).unwrap())
    }

    #[test]
    fn test_room_creation() {
        let room = room("Demo");

        assert_eq!(room.name.as_str(), "demo");
        assert!(!room.is_closed);
        assert_eq!(room.questions.len(), 0);
    }

    #[test]
    fn test_room_close_is_sticky() {
        let mut room = room("demo");
        room.close();
        assert!(room.is_closed);
        room.close();
        assert!(room.is_closed);
    }

    #[test]
    fn test_room_questions_sorted() {
        let mut room = room("demo");
        room.insert_question(Question::new(QuestionId(9), "Ninth one".to_string()));
        room.insert_question(Question::new(QuestionId(2), "Second one".to_string()));
        room.insert_question(Question::new(QuestionId(5), "Fifth one".to_string()));

        let ids: Vec<u64> = room.sorted_questions().iter().map(|q| q.id.0).collect();
        assert_eq!(ids, vec![2, 5, 9]);
    }

    #[test]
    fn test_room_question_lookup() {
        let mut room = room("demo");
        room.insert_question(Question::new(QuestionId(1), "Hello there".to_string()));

        assert!(room.question(QuestionId(1)).is_some());
        assert!(room.question(QuestionId(2)).is_none());

        if let Some(q) = room.question_mut(QuestionId(1)) {
            q.apply_delta(1);
        }
        assert_eq!(room.question(QuestionId(1)).map(|q| q.vote_count), Some(1));
    }
}

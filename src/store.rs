//! Room/user/question state store
//!
//! All rooms, users and the global question counter live behind one
//! `Mutex`. Every operation holds the lock for its whole body: validate
//! first, then mutate, so a rejected operation never leaves a trace.
//! Logging happens after the guard is released.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, info};

use crate::error::StoreError;
use crate::question::{Question, MIN_QUESTION_LEN};
use crate::room::Room;
use crate::types::{normalize_room_name, QuestionId, RawInt, RoomName, UserId, VoteValue};
use crate::user::User;

/// Result of a successful room creation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomCreated {
    pub room: RoomName,
    /// Owner token; the only user allowed to close the room
    pub owner: UserId,
}

/// Result of a registration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub room: RoomName,
    pub user_id: UserId,
    /// True when the supplied id was already bound to this room
    pub reused: bool,
}

/// Result of an applied vote
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteTally {
    pub question_id: QuestionId,
    /// New aggregate for the question
    pub vote_count: i64,
}

/// Snapshot of (some of) a room's questions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionList {
    pub room: RoomName,
    /// Ordered by question id
    pub questions: Vec<Question>,
    pub is_closed: bool,
}

/// Everything guarded by the store lock
#[derive(Debug, Default)]
struct State {
    rooms: HashMap<RoomName, Room>,
    users: HashMap<UserId, User>,
    /// Last allocated question id, shared by all rooms
    last_question_id: u64,
}

/// The in-memory Q&A state store
///
/// Share it between connection tasks behind an `Arc`.
#[derive(Debug, Default)]
pub struct QaStore {
    state: Mutex<State>,
}

impl QaStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    // Poisoning is ignored: no operation mutates before its last check.
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Create a room and its owner
    pub fn create_room(&self, name: &str) -> Result<RoomCreated, StoreError> {
        let result = self.lock().create_room(name);
        match &result {
            Ok(created) => {
                info!("Created room {}", created.room);
                debug!("Room {} owner is {}", created.room, created.owner);
            }
            Err(e) => debug!("Create room '{}' rejected: {}", name, e),
        }
        result
    }

    /// Register a user with a room, reusing `supplied` when it already belongs there
    pub fn register_user(
        &self,
        room: &str,
        supplied: Option<&str>,
    ) -> Result<Registration, StoreError> {
        let result = self.lock().register_user(room, supplied);
        match &result {
            Ok(reg) if reg.reused => debug!("User {} re-registered with room {}", reg.user_id, reg.room),
            Ok(reg) => {
                info!("Registered new user with room {}", reg.room);
                debug!("User {} registered with room {}", reg.user_id, reg.room);
            }
            Err(e) => debug!("Register with room '{}' rejected: {}", room, e),
        }
        result
    }

    /// Publish a new question to an open room
    pub fn publish_question(
        &self,
        room: &str,
        user_id: &str,
        text: &str,
    ) -> Result<Question, StoreError> {
        let result = self.lock().publish_question(room, user_id, text);
        match &result {
            Ok(question) => info!("Added question {} to room {}", question.id, normalize_room_name(room)),
            Err(e) => debug!("Publish to room '{}' rejected: {}", room, e),
        }
        result
    }

    /// Apply a user's vote on a question and return the new tally
    ///
    /// `question_id` and `value` are taken as sent; an unreadable id or
    /// value is reported only once the room and user have been checked.
    pub fn vote(
        &self,
        room: &str,
        user_id: &str,
        question_id: impl Into<RawInt>,
        value: impl Into<RawInt>,
    ) -> Result<VoteTally, StoreError> {
        let value = value.into();
        let result = self.lock().vote(room, user_id, &question_id.into(), &value);
        match &result {
            Ok(tally) => debug!(
                "Voted question {}/{} by {} (now {})",
                normalize_room_name(room),
                tally.question_id,
                value,
                tally.vote_count
            ),
            Err(e) => debug!("Vote in room '{}' rejected: {}", room, e),
        }
        result
    }

    /// Close a room; only its owner may do this
    pub fn close_room(&self, room: &str, user_id: &str) -> Result<RoomName, StoreError> {
        let result = self.lock().close_room(room, user_id);
        match &result {
            Ok(name) => info!("Closed room {}", name),
            Err(e) => debug!("Close room '{}' rejected: {}", room, e),
        }
        result
    }

    /// Names of all rooms, sorted
    pub fn list_rooms(&self) -> Vec<RoomName> {
        self.lock().list_rooms()
    }

    /// All questions of a room plus its closed flag
    pub fn get_questions(&self, room: &str) -> Result<QuestionList, StoreError> {
        self.lock().get_questions(room)
    }

    /// Questions a user published in their room, oldest first
    pub fn authored_questions(
        &self,
        room: &str,
        user_id: &str,
    ) -> Result<QuestionList, StoreError> {
        self.lock().authored_questions(room, user_id)
    }
}

/// Resolve a room and a user registered to it
///
/// Fails with `RoomNotFound` before `Unauthorized`.
fn authorize<'a>(
    rooms: &'a mut HashMap<RoomName, Room>,
    users: &'a mut HashMap<UserId, User>,
    room_name: &str,
    user_id: &str,
) -> Result<(&'a mut Room, &'a mut User), StoreError> {
    let key = normalize_room_name(room_name);
    let room = rooms
        .get_mut(key.as_str())
        .ok_or_else(|| StoreError::RoomNotFound(key.clone()))?;
    let user = users
        .get_mut(user_id)
        .filter(|user| user.belongs_to(&key))
        .ok_or(StoreError::Unauthorized)?;
    Ok((room, user))
}

impl State {
    fn room(&self, room_name: &str) -> Result<&Room, StoreError> {
        let key = normalize_room_name(room_name);
        self.rooms
            .get(key.as_str())
            .ok_or(StoreError::RoomNotFound(key))
    }

    fn create_room(&mut self, name: &str) -> Result<RoomCreated, StoreError> {
        let name = RoomName::parse(name)?;
        if self.rooms.contains_key(&name) {
            return Err(StoreError::RoomAlreadyExists(name.to_string()));
        }

        let owner = UserId::generate();
        self.rooms.insert(name.clone(), Room::new(name.clone()));
        self.users
            .insert(owner.clone(), User::owner(owner.clone(), name.clone()));

        Ok(RoomCreated { room: name, owner })
    }

    fn register_user(
        &mut self,
        room_name: &str,
        supplied: Option<&str>,
    ) -> Result<Registration, StoreError> {
        let room = self.room(room_name)?.name.clone();

        let existing = supplied
            .and_then(|id| self.users.get(id))
            .filter(|user| user.belongs_to(room.as_str()));
        if let Some(user) = existing {
            return Ok(Registration {
                room,
                user_id: user.id.clone(),
                reused: true,
            });
        }

        // Ids bound to another room are left alone; the caller gets a new one.
        let user_id = UserId::generate();
        self.users
            .insert(user_id.clone(), User::new(user_id.clone(), room.clone()));

        Ok(Registration {
            room,
            user_id,
            reused: false,
        })
    }

    fn publish_question(
        &mut self,
        room_name: &str,
        user_id: &str,
        text: &str,
    ) -> Result<Question, StoreError> {
        let State {
            rooms,
            users,
            last_question_id,
        } = self;
        let (room, user) = authorize(rooms, users, room_name, user_id)?;

        if room.is_closed {
            return Err(StoreError::RoomClosed);
        }

        let len = text.chars().count();
        if len < MIN_QUESTION_LEN {
            return Err(StoreError::QuestionTooShort {
                len,
                min: MIN_QUESTION_LEN,
            });
        }

        *last_question_id += 1;
        let question = Question::new(QuestionId(*last_question_id), text.to_string());
        room.insert_question(question.clone());
        user.authored.push(question.id);

        Ok(question)
    }

    fn vote(
        &mut self,
        room_name: &str,
        user_id: &str,
        question_id: &RawInt,
        value: &RawInt,
    ) -> Result<VoteTally, StoreError> {
        let (room, user) = authorize(&mut self.rooms, &mut self.users, room_name, user_id)?;

        let (question_id, question) = QuestionId::from_raw(question_id)
            .and_then(|id| room.question_mut(id).map(|question| (id, question)))
            .ok_or_else(|| StoreError::InvalidQuestionId(question_id.to_string()))?;
        let value = VoteValue::try_from(value)?;

        let delta = user.record_vote(question_id, value);
        Ok(VoteTally {
            question_id,
            vote_count: question.apply_delta(delta),
        })
    }

    fn close_room(&mut self, room_name: &str, user_id: &str) -> Result<RoomName, StoreError> {
        let (room, user) = authorize(&mut self.rooms, &mut self.users, room_name, user_id)?;

        if !user.is_owner {
            return Err(StoreError::Forbidden);
        }

        room.close();
        Ok(room.name.clone())
    }

    fn list_rooms(&self) -> Vec<RoomName> {
        let mut names: Vec<RoomName> = self.rooms.keys().cloned().collect();
        names.sort();
        names
    }

    fn get_questions(&self, room_name: &str) -> Result<QuestionList, StoreError> {
        let room = self.room(room_name)?;
        Ok(QuestionList {
            room: room.name.clone(),
            questions: room.sorted_questions(),
            is_closed: room.is_closed,
        })
    }

    fn authored_questions(
        &mut self,
        room_name: &str,
        user_id: &str,
    ) -> Result<QuestionList, StoreError> {
        let (room, user) = authorize(&mut self.rooms, &mut self.users, room_name, user_id)?;
        let questions = user
            .authored
            .iter()
            .filter_map(|id| room.question(*id).cloned())
            .collect();
        Ok(QuestionList {
            room: room.name.clone(),
            questions,
            is_closed: room.is_closed,
        })
    }
}

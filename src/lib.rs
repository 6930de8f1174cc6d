//! Live Audience Q&A Server Library
//!
//! Organizers create a room, participants register with it, publish
//! questions and vote them up or down. A closed room stops taking new
//! questions but keeps its votes and listings.
//!
//! # Features
//! - Room creation with validated, case-insensitive names
//! - Owner-only room closing
//! - Idempotent user registration
//! - Question publishing with globally unique ids
//! - Vote reconciliation by delta: repeating a vote is a no-op
//! - WebSocket JSON protocol, one reply per request
//!
//! # Architecture
//! - `QaStore` owns every room, user and the question counter behind a
//!   single `Mutex`; each operation holds it for its whole body
//! - Each connection has a `handler` task that parses requests and calls
//!   the store synchronously
//!
//! # Example
//! ```ignore
//! use std::sync::Arc;
//! use tokio::net::TcpListener;
//! use qa_rooms::{serve, QaStore};
//!
//! #[tokio::main]
//! async fn main() {
//!     let listener = TcpListener::bind("127.0.0.1:8080").await.unwrap();
//!     serve(listener, Arc::new(QaStore::new())).await;
//! }
//! ```

pub mod config;
pub mod error;
pub mod handler;
pub mod message;
pub mod question;
pub mod room;
pub mod server;
pub mod store;
pub mod types;
pub mod user;

// Re-export main types for convenience
pub use config::Config;
pub use error::{AppError, StoreError};
pub use handler::{dispatch, handle_connection};
pub use message::{ClientMessage, ErrorCode, ServerMessage};
pub use question::Question;
pub use room::Room;
pub use server::serve;
pub use store::{QaStore, QuestionList, Registration, RoomCreated, VoteTally};
pub use types::{QuestionId, RawInt, RoomName, UserId, VoteValue};
pub use user::User;

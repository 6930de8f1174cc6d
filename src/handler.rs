//! WebSocket connection handler
//!
//! Handles individual client connections: WebSocket handshake,
//! request parsing, and one reply per request from the shared store.

use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, info, warn};

use crate::error::AppError;
use crate::message::{ClientMessage, ServerMessage};
use crate::store::QaStore;

/// Handle a new TCP connection
///
/// Performs the WebSocket handshake, then answers text frames until the
/// client closes the connection or the socket fails.
pub async fn handle_connection(stream: TcpStream, store: Arc<QaStore>) -> Result<(), AppError> {
    let peer_addr = stream
        .peer_addr()
        .map(|a| a.to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    debug!("New TCP connection from {}", peer_addr);

    // WebSocket handshake
    let ws_stream = tokio_tungstenite::accept_async(stream).await?;
    let (mut ws_sender, mut ws_receiver) = ws_stream.split();

    info!("Client connected from {}", peer_addr);

    let json = serde_json::to_string(&ServerMessage::Connected)?;
    ws_sender.send(Message::Text(json.into())).await?;

    while let Some(msg_result) = ws_receiver.next().await {
        match msg_result {
            Ok(Message::Text(text)) => {
                let reply = handle_text(&store, &text);
                let json = serde_json::to_string(&reply)?;
                ws_sender.send(Message::Text(json.into())).await?;
            }
            Ok(Message::Close(_)) => {
                debug!("Client {} sent close frame", peer_addr);
                break;
            }
            Ok(Message::Ping(_)) => {
                // Pong is handled automatically by tungstenite
                debug!("Ping from {}", peer_addr);
            }
            Ok(_) => {
                // Binary or other message types - ignore
            }
            Err(e) => {
                error!("WebSocket error for {}: {}", peer_addr, e);
                break;
            }
        }
    }

    info!("Client {} disconnected", peer_addr);

    Ok(())
}

/// Parse one text frame and run it against the store
pub fn handle_text(store: &QaStore, text: &str) -> ServerMessage {
    match serde_json::from_str::<ClientMessage>(text) {
        Ok(msg) => dispatch(store, msg),
        Err(e) => {
            warn!("Invalid JSON request: {}", e);
            AppError::from(e).into()
        }
    }
}

/// Run a single request against the store
///
/// Each request maps to exactly one store operation.
pub fn dispatch(store: &QaStore, msg: ClientMessage) -> ServerMessage {
    let result = match msg {
        ClientMessage::CreateRoom { room } => store
            .create_room(&room)
            .map(|created| ServerMessage::RoomCreated {
                room: created.room,
                user_id: created.owner,
            }),
        ClientMessage::Register { room, user_id } => store
            .register_user(&room, user_id.as_deref())
            .map(|reg| ServerMessage::Registered {
                room: reg.room,
                user_id: reg.user_id,
            }),
        ClientMessage::PublishQuestion {
            room,
            user_id,
            question,
        } => store
            .publish_question(&room, &user_id, &question)
            .map(|question| ServerMessage::QuestionPublished { question }),
        ClientMessage::Vote {
            room,
            user_id,
            question_id,
            value,
        } => store
            .vote(&room, &user_id, question_id, value)
            .map(|tally| ServerMessage::Voted {
                question_id: tally.question_id,
                vote_count: tally.vote_count,
            }),
        ClientMessage::CloseRoom { room, user_id } => store
            .close_room(&room, &user_id)
            .map(|room| ServerMessage::RoomClosed { room }),
        ClientMessage::ListRooms => Ok(ServerMessage::RoomList {
            rooms: store.list_rooms(),
        }),
        ClientMessage::GetQuestions { room } => store
            .get_questions(&room)
            .map(|list| ServerMessage::Questions {
                room: list.room,
                questions: list.questions,
                is_closed: list.is_closed,
            }),
        ClientMessage::MyQuestions { room, user_id } => store
            .authored_questions(&room, &user_id)
            .map(|list| ServerMessage::MyQuestions {
                room: list.room,
                questions: list.questions,
            }),
    };

    result.unwrap_or_else(ServerMessage::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::ErrorCode;
    use crate::types::RawInt;

    fn expect_error(msg: ServerMessage) -> ErrorCode {
        match msg {
            ServerMessage::Error { code, .. } => code,
            other => panic!("Expected error, got {other:?}"),
        }
    }

    fn owner_token(store: &QaStore, room: &str) -> String {
        match handle_text(store, &format!(r#"{{"type":"create_room","room":"{room}"}}"#)) {
            ServerMessage::RoomCreated { user_id, .. } => user_id.to_string(),
            other => panic!("Wrong variant: {other:?}"),
        }
    }

    #[test]
    fn test_dispatch_create_and_list() {
        let store = QaStore::new();
        owner_token(&store, "Demo");

        match dispatch(&store, ClientMessage::ListRooms) {
            ServerMessage::RoomList { rooms } => {
                assert_eq!(rooms.len(), 1);
                assert_eq!(rooms[0].as_str(), "demo");
            }
            other => panic!("Wrong variant: {other:?}"),
        }
    }

    #[test]
    fn test_dispatch_duplicate_room() {
        let store = QaStore::new();
        owner_token(&store, "demo");
        let reply = dispatch(
            &store,
            ClientMessage::CreateRoom {
                room: "DEMO".to_string(),
            },
        );
        assert_eq!(expect_error(reply), ErrorCode::RoomAlreadyExists);
    }

    #[test]
    fn test_dispatch_publish_and_vote() {
        let store = QaStore::new();
        let owner = owner_token(&store, "demo");

        let reply = dispatch(
            &store,
            ClientMessage::PublishQuestion {
                room: "demo".to_string(),
                user_id: owner.clone(),
                question: "Is this thing on?".to_string(),
            },
        );
        let question_id = match reply {
            ServerMessage::QuestionPublished { question } => question.id.0,
            other => panic!("Wrong variant: {other:?}"),
        };

        let reply = dispatch(
            &store,
            ClientMessage::Vote {
                room: "demo".to_string(),
                user_id: owner,
                question_id: question_id.into(),
                value: RawInt::Int(-1),
            },
        );
        assert!(matches!(reply, ServerMessage::Voted { vote_count: -1, .. }));
    }

    #[test]
    fn test_dispatch_my_questions() {
        let store = QaStore::new();
        let owner = owner_token(&store, "Demo");
        store
            .publish_question("demo", &owner, "Owner question")
            .unwrap();

        let reply = dispatch(
            &store,
            ClientMessage::MyQuestions {
                room: "DEMO".to_string(),
                user_id: owner,
            },
        );
        match reply {
            ServerMessage::MyQuestions { room, questions } => {
                assert_eq!(room.as_str(), "demo");
                assert_eq!(questions.len(), 1);
            }
            other => panic!("Wrong variant: {other:?}"),
        }
    }

    #[test]
    fn test_dispatch_errors() {
        let store = QaStore::new();
        owner_token(&store, "demo");

        let reply = dispatch(
            &store,
            ClientMessage::GetQuestions {
                room: "missing".to_string(),
            },
        );
        assert_eq!(expect_error(reply), ErrorCode::RoomNotFound);

        let reply = dispatch(
            &store,
            ClientMessage::CloseRoom {
                room: "demo".to_string(),
                user_id: "nobody".to_string(),
            },
        );
        assert_eq!(expect_error(reply), ErrorCode::Unauthorized);
    }

    fn vote_frame(room: &str, user: &str, question_id: &str) -> String {
        format!(
            r#"{{"type":"vote","room":"{room}","user_id":"{user}","question_id":{question_id},"value":1}}"#
        )
    }

    #[test]
    fn test_vote_bad_question_id_after_room_and_user() {
        let store = QaStore::new();
        let owner = owner_token(&store, "demo");

        let reply = handle_text(&store, &vote_frame("demo", &owner, "-1"));
        assert_eq!(expect_error(reply), ErrorCode::InvalidQuestionId);

        let reply = handle_text(&store, &vote_frame("demo", &owner, r#""one""#));
        assert_eq!(expect_error(reply), ErrorCode::InvalidQuestionId);

        let reply = handle_text(&store, &vote_frame("nope", &owner, r#""one""#));
        assert_eq!(expect_error(reply), ErrorCode::RoomNotFound);

        let reply = handle_text(&store, &vote_frame("demo", "nobody", r#""one""#));
        assert_eq!(expect_error(reply), ErrorCode::Unauthorized);
    }

    #[test]
    fn test_vote_bad_value() {
        let store = QaStore::new();
        let owner = owner_token(&store, "demo");
        store
            .publish_question("demo", &owner, "Up or down?")
            .unwrap();

        let frame = format!(
            r#"{{"type":"vote","room":"demo","user_id":"{owner}","question_id":1,"value":"up"}}"#
        );
        assert_eq!(
            expect_error(handle_text(&store, &frame)),
            ErrorCode::InvalidVoteValue
        );
    }

    #[test]
    fn test_handle_text_invalid_json() {
        let store = QaStore::new();
        assert_eq!(
            expect_error(handle_text(&store, "{not json")),
            ErrorCode::InvalidMessage
        );
        assert_eq!(
            expect_error(handle_text(&store, r#"{"type":"launch_rockets"}"#)),
            ErrorCode::InvalidMessage
        );
    }
}

//! WebSocket protocol
//!
//! Each text frame carries one JSON object. Inbound frames are
//! [`UserGameCommand`]s; outbound frames are [`ServerMessage`]s tagged by
//! `serverMessageType`.

use crate::error::{ProtocolError, ProtocolResult};
use chess_engine::{Game, Move};
use serde::{Deserialize, Serialize};

pub type GameId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommandType {
    Connect,
    MakeMove,
    Leave,
    Resign,
}

/// A command as it arrives on the socket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserGameCommand {
    pub command_type: CommandType,
    pub auth_token: String,
    #[serde(rename = "gameID")]
    pub game_id: GameId,
    #[serde(rename = "move", default, skip_serializing_if = "Option::is_none")]
    pub mv: Option<Move>,
}

/// The closed set of game commands, with the move already required where it belongs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameCommand {
    Connect,
    Leave,
    Resign,
    MakeMove(Move),
}

impl UserGameCommand {
    pub fn new(command_type: CommandType, auth_token: impl Into<String>, game_id: GameId) -> Self {
        UserGameCommand {
            command_type,
            auth_token: auth_token.into(),
            game_id,
            mv: None,
        }
    }

    pub fn connect(auth_token: impl Into<String>, game_id: GameId) -> Self {
        Self::new(CommandType::Connect, auth_token, game_id)
    }

    pub fn leave(auth_token: impl Into<String>, game_id: GameId) -> Self {
        Self::new(CommandType::Leave, auth_token, game_id)
    }

    pub fn resign(auth_token: impl Into<String>, game_id: GameId) -> Self {
        Self::new(CommandType::Resign, auth_token, game_id)
    }

    pub fn make_move(auth_token: impl Into<String>, game_id: GameId, mv: Move) -> Self {
        UserGameCommand {
            mv: Some(mv),
            ..Self::new(CommandType::MakeMove, auth_token, game_id)
        }
    }

    /// Decode one inbound text frame
    pub fn from_json(text: &str) -> ProtocolResult<Self> {
        serde_json::from_str(text).map_err(|e| ProtocolError::Malformed(e.to_string()))
    }

    /// Narrow the frame to a [`GameCommand`].
    ///
    /// A move attached to anything but MAKE_MOVE is ignored.
    pub fn command(&self) -> ProtocolResult<GameCommand> {
        Ok(match self.command_type {
            CommandType::Connect => GameCommand::Connect,
            CommandType::Leave => GameCommand::Leave,
            CommandType::Resign => GameCommand::Resign,
            CommandType::MakeMove => {
                GameCommand::MakeMove(self.mv.ok_or(ProtocolError::MissingMove)?)
            }
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "serverMessageType", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServerMessage {
    LoadGame {
        game: Game,
    },
    Notification {
        message: String,
    },
    Error {
        #[serde(rename = "errorMessage")]
        error_message: String,
    },
}

impl ServerMessage {
    pub fn load(game: Game) -> Self {
        ServerMessage::LoadGame { game }
    }

    pub fn notification(message: impl Into<String>) -> Self {
        ServerMessage::Notification {
            message: message.into(),
        }
    }

    pub fn error(error_message: impl Into<String>) -> Self {
        ServerMessage::Error {
            error_message: error_message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ServerMessage::Error { .. })
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_engine::{PieceType, Position};
    use serde_json::json;

    #[test]
    fn test_connect_command_decodes() {
        let cmd = UserGameCommand::from_json(
            r#"{"commandType":"CONNECT","authToken":"abc","gameID":3}"#,
        )
        .expect("Should decode");
        assert_eq!(cmd, UserGameCommand::connect("abc", 3));
        assert_eq!(cmd.command(), Ok(GameCommand::Connect));
    }

    #[test]
    fn test_make_move_command_carries_move() {
        let mv = Move::with_promotion(Position::new(7, 5), Position::new(8, 5), PieceType::Queen);
        let cmd = UserGameCommand::make_move("abc", 3, mv);

        let value = serde_json::to_value(&cmd).expect("Should serialize");
        assert_eq!(value["commandType"], "MAKE_MOVE");
        assert_eq!(value["move"]["promotion"], "QUEEN");

        let decoded = UserGameCommand::from_json(&value.to_string()).expect("Should decode");
        assert_eq!(decoded.command(), Ok(GameCommand::MakeMove(mv)));
    }

    #[test]
    fn test_make_move_without_move_rejected() {
        let cmd = UserGameCommand::new(CommandType::MakeMove, "abc", 3);
        assert_eq!(cmd.command(), Err(ProtocolError::MissingMove));
    }

    #[test]
    fn test_malformed_frames_rejected() {
        for frame in [
            "not json",
            r#"{"commandType":"DANCE","authToken":"abc","gameID":3}"#,
            r#"{"commandType":"CONNECT","gameID":3}"#,
        ] {
            assert!(
                matches!(UserGameCommand::from_json(frame), Err(ProtocolError::Malformed(_))),
                "{frame} should be rejected"
            );
        }
    }

    #[test]
    fn test_server_message_tags() {
        let note = serde_json::to_value(ServerMessage::notification("hello")).unwrap();
        assert_eq!(note, json!({"serverMessageType": "NOTIFICATION", "message": "hello"}));

        let error = serde_json::to_value(ServerMessage::error("Error: nope")).unwrap();
        assert_eq!(error, json!({"serverMessageType": "ERROR", "errorMessage": "Error: nope"}));
    }

    #[test]
    fn test_load_game_carries_state() {
        let msg = ServerMessage::load(Game::new());
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["serverMessageType"], "LOAD_GAME");
        assert_eq!(value["game"]["turn"], "WHITE");
        assert_eq!(value["game"]["status"], "PENDING");

        let decoded: ServerMessage = serde_json::from_value(value).unwrap();
        assert_eq!(decoded, msg);
    }
}

//! Service error taxonomy
//!
//! Every failure the server reports is one [`ServiceError`]. Lower layers
//! convert into it with `?`; the socket path turns it into an ERROR message
//! for the sender, the HTTP path into a status code via [`ErrorKind`].

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chess_engine::RulesError;
use serde_json::json;
use shared::ProtocolError;
use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Unauthorized,
    NotFound,
    IllegalMove,
    Conflict,
    Persistence,
}

impl ErrorKind {
    pub fn status_code(self) -> StatusCode {
        match self {
            ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::IllegalMove => StatusCode::BAD_REQUEST,
            ErrorKind::Conflict => StatusCode::FORBIDDEN,
            ErrorKind::Persistence => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("unauthorized.")]
    Unauthorized,

    #[error("no game with that ID in database.")]
    NotFound,

    #[error("{0}")]
    IllegalMove(String),

    #[error("{0}")]
    Conflict(String),

    /// The detail is logged, never shown to clients
    #[error("could not update game data.")]
    Persistence(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    pub fn illegal(reason: impl Into<String>) -> Self {
        ServiceError::IllegalMove(reason.into())
    }

    pub fn conflict(reason: impl Into<String>) -> Self {
        ServiceError::Conflict(reason.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ServiceError::Unauthorized => ErrorKind::Unauthorized,
            ServiceError::NotFound => ErrorKind::NotFound,
            ServiceError::IllegalMove(_) => ErrorKind::IllegalMove,
            ServiceError::Conflict(_) => ErrorKind::Conflict,
            ServiceError::Persistence(_) => ErrorKind::Persistence,
        }
    }

    /// Text of the ERROR message sent back to the client
    pub fn client_message(&self) -> String {
        format!("Error: {self}")
    }
}

impl From<RulesError> for ServiceError {
    fn from(err: RulesError) -> Self {
        match err {
            RulesError::InvalidMove { .. } => ServiceError::illegal("invalid move."),
            RulesError::WrongTurn { color } => {
                ServiceError::illegal(format!("it is not {color}'s turn."))
            }
            RulesError::GameOver { .. } => ServiceError::conflict("the game is already over."),
            other => ServiceError::illegal(other.to_string()),
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => ServiceError::NotFound,
            StoreError::SeatTaken { .. } | StoreError::SeatEmpty { .. } => {
                ServiceError::Conflict(err.to_string())
            }
            StoreError::Backend(detail) => ServiceError::Persistence(detail),
        }
    }
}

impl From<ProtocolError> for ServiceError {
    fn from(err: ProtocolError) -> Self {
        ServiceError::IllegalMove(err.to_string())
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.kind().status_code();
        (status, Json(json!({ "message": self.client_message() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_engine::{Color, GameStatus};

    #[test]
    fn test_kind_status_table() {
        assert_eq!(ServiceError::Unauthorized.kind().status_code(), 401);
        assert_eq!(ServiceError::NotFound.kind().status_code(), 404);
        assert_eq!(ServiceError::illegal("x").kind().status_code(), 400);
        assert_eq!(ServiceError::conflict("x").kind().status_code(), 403);
        assert_eq!(
            ServiceError::Persistence("disk".into()).kind().status_code(),
            500
        );
    }

    #[test]
    fn test_rules_errors_map_to_kinds() {
        let wrong_turn: ServiceError = RulesError::WrongTurn {
            color: Color::Black,
        }
        .into();
        assert_eq!(wrong_turn.kind(), ErrorKind::IllegalMove);

        let over: ServiceError = RulesError::GameOver {
            status: GameStatus::WhiteWon,
        }
        .into();
        assert_eq!(over.kind(), ErrorKind::Conflict);
    }

    #[test]
    fn test_store_errors_map_to_kinds() {
        let taken: ServiceError = StoreError::SeatTaken {
            game_id: 1,
            color: Color::White,
        }
        .into();
        assert_eq!(taken.kind(), ErrorKind::Conflict);
        assert_eq!(ServiceError::from(StoreError::NotFound(9)), ServiceError::NotFound);
        assert_eq!(
            ServiceError::from(StoreError::Backend("gone".into())).kind(),
            ErrorKind::Persistence
        );
    }

    #[test]
    fn test_persistence_detail_hidden_from_clients() {
        let err = ServiceError::Persistence("connection reset by peer".into());
        assert_eq!(err.client_message(), "Error: could not update game data.");
    }
}

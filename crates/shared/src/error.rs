use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("MAKE_MOVE command carries no move")]
    MissingMove,

    #[error("malformed command: {0}")]
    Malformed(String),
}

pub type ProtocolResult<T> = Result<T, ProtocolError>;

//! Messages exchanged between the chess server and its clients.
//!
//! - [`protocol`]: WebSocket traffic. Clients send [`UserGameCommand`] frames,
//!   the server answers with [`ServerMessage`] frames.
//! - [`lobby`]: request and response bodies of the HTTP game lobby.
//!
//! Everything here is JSON with camelCase field names, matching what
//! existing clients already speak.

pub mod error;
pub mod lobby;
pub mod protocol;

pub use error::{ProtocolError, ProtocolResult};
pub use protocol::{CommandType, GameCommand, GameId, ServerMessage, UserGameCommand};

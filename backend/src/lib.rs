//! Chess game server.
//!
//! The [`session::SessionCoordinator`] turns authenticated socket commands
//! into rules-engine transitions and fans the results out to every
//! subscriber of a game. Games live behind the [`store::GameStore`] contract
//! and usernames are resolved through [`auth::AuthService`]; [`api`] wires
//! both into an axum router.

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod session;
pub mod store;

pub use error::{ErrorKind, ServiceError, ServiceResult};

//! Game persistence contract and the in-process store

use async_trait::async_trait;
use chess_engine::{Color, Game};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use shared::lobby::GameSummary;
use shared::GameId;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU32, Ordering};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("no game with ID {0}")]
    NotFound(GameId),

    #[error("the {color} seat of game {game_id} is already taken.")]
    SeatTaken { game_id: GameId, color: Color },

    #[error("the {color} seat of game {game_id} is already empty.")]
    SeatEmpty { game_id: GameId, color: Color },

    #[error("storage backend failure: {0}")]
    Backend(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    pub game_id: GameId,
    pub white_username: Option<String>,
    pub black_username: Option<String>,
    pub name: String,
    pub game: Game,
}

impl GameRecord {
    pub fn new(game_id: GameId, name: impl Into<String>) -> Self {
        GameRecord {
            game_id,
            white_username: None,
            black_username: None,
            name: name.into(),
            game: Game::new(),
        }
    }

    pub fn seat(&self, color: Color) -> Option<&str> {
        match color {
            Color::White => self.white_username.as_deref(),
            Color::Black => self.black_username.as_deref(),
        }
    }

    fn seat_mut(&mut self, color: Color) -> &mut Option<String> {
        match color {
            Color::White => &mut self.white_username,
            Color::Black => &mut self.black_username,
        }
    }

    pub fn plays(&self, username: &str, color: Color) -> bool {
        self.seat(color) == Some(username)
    }

    /// Seats held by `username`, white first. A user may hold both.
    pub fn seats_of(&self, username: &str) -> Vec<Color> {
        Color::ALL
            .into_iter()
            .filter(|&color| self.plays(username, color))
            .collect()
    }

    pub fn summary(&self) -> GameSummary {
        GameSummary {
            game_id: self.game_id,
            white_username: self.white_username.clone(),
            black_username: self.black_username.clone(),
            game_name: self.name.clone(),
        }
    }
}

/// Where games live between commands.
///
/// The coordinator treats whatever it loads as a working copy; the store's
/// version is authoritative.
#[async_trait]
pub trait GameStore: Send + Sync {
    async fn create(&self, name: &str) -> StoreResult<GameId>;

    async fn get(&self, game_id: GameId) -> StoreResult<GameRecord>;

    async fn list(&self) -> StoreResult<Vec<GameRecord>>;

    async fn update(&self, game_id: GameId, game: &Game) -> StoreResult<()>;

    async fn claim_seat(&self, game_id: GameId, color: Color, username: &str) -> StoreResult<()>;

    async fn vacate_seat(&self, game_id: GameId, color: Color) -> StoreResult<()>;
}

/// Process-lifetime store. IDs start at 1 and are never reused.
#[derive(Debug)]
pub struct MemoryGameStore {
    games: RwLock<BTreeMap<GameId, GameRecord>>,
    next_id: AtomicU32,
}

impl Default for MemoryGameStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryGameStore {
    pub fn new() -> Self {
        MemoryGameStore {
            games: RwLock::new(BTreeMap::new()),
            next_id: AtomicU32::new(1),
        }
    }

    fn with_record<T>(
        &self,
        game_id: GameId,
        f: impl FnOnce(&mut GameRecord) -> StoreResult<T>,
    ) -> StoreResult<T> {
        let mut games = self.games.write();
        let record = games.get_mut(&game_id).ok_or(StoreError::NotFound(game_id))?;
        f(record)
    }
}

#[async_trait]
impl GameStore for MemoryGameStore {
    async fn create(&self, name: &str) -> StoreResult<GameId> {
        let game_id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.games
            .write()
            .insert(game_id, GameRecord::new(game_id, name));
        Ok(game_id)
    }

    async fn get(&self, game_id: GameId) -> StoreResult<GameRecord> {
        self.games
            .read()
            .get(&game_id)
            .cloned()
            .ok_or(StoreError::NotFound(game_id))
    }

    async fn list(&self) -> StoreResult<Vec<GameRecord>> {
        Ok(self.games.read().values().cloned().collect())
    }

    async fn update(&self, game_id: GameId, game: &Game) -> StoreResult<()> {
        self.with_record(game_id, |record| {
            record.game = game.clone();
            Ok(())
        })
    }

    async fn claim_seat(&self, game_id: GameId, color: Color, username: &str) -> StoreResult<()> {
        self.with_record(game_id, |record| {
            let seat = record.seat_mut(color);
            if seat.is_some() {
                return Err(StoreError::SeatTaken { game_id, color });
            }
            *seat = Some(username.to_string());
            Ok(())
        })
    }

    async fn vacate_seat(&self, game_id: GameId, color: Color) -> StoreResult<()> {
        self.with_record(game_id, |record| {
            record
                .seat_mut(color)
                .take()
                .map(|_| ())
                .ok_or(StoreError::SeatEmpty { game_id, color })
        })
    }
}

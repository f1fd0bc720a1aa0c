//! # Session Coordinator
//!
//! Turns authenticated user commands into [`Game`](chess_engine::Game)
//! transitions and fans the results out to every connection attached to the
//! game.
//!
//! ## Session state
//!
//! - username → live [`Connection`]
//! - game id → ordered list of attached usernames (players and observers)
//! - username → the game it is currently attached to
//!
//! All three sit behind one short-lived lock that is never held across an
//! `.await`.
//!
//! ## Serialization
//!
//! Commands for the same game run one at a time: each takes that game's async
//! lock before loading it and releases it only after the broadcast, so the
//! next command always loads the state the previous one persisted. Commands
//! for different games run concurrently. A game's lock entry is dropped as
//! soon as no command holds or awaits it.
//!
//! ## Delivery
//!
//! Every connection owns an unbounded channel drained by its socket writer.
//! Sends never wait on the peer; a send to a connection that has gone away
//! is logged and skipped. Within one move, every subscriber receives the new
//! state, then the move notification, then any check, checkmate or stalemate
//! notification, in that order.

use chess_engine::{Color, GameStatus, Move};
use parking_lot::Mutex;
use shared::{GameCommand, GameId, ServerMessage, UserGameCommand};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex as AsyncMutex, OwnedMutexGuard};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::auth::AuthService;
use crate::error::{ServiceError, ServiceResult};
use crate::store::GameStore;

/// What a socket writer is asked to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    Message(ServerMessage),
    Close,
}

/// Sending half of one client connection
#[derive(Debug, Clone)]
pub struct Connection {
    id: Uuid,
    tx: mpsc::UnboundedSender<Outbound>,
}

impl Connection {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Outbound>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let conn = Connection {
            id: Uuid::new_v4(),
            tx,
        };
        (conn, rx)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn send(&self, message: ServerMessage) {
        if self.tx.send(Outbound::Message(message)).is_err() {
            warn!(conn = %self.id, "dropping message for closed connection");
        }
    }

    pub fn close(&self) {
        if self.tx.send(Outbound::Close).is_err() {
            debug!(conn = %self.id, "connection already closed");
        }
    }
}

#[derive(Debug, Default)]
struct Sessions {
    connections: HashMap<String, Connection>,
    subscribers: HashMap<GameId, Vec<String>>,
    attached: HashMap<String, GameId>,
}

impl Sessions {
    /// Register `username` on `game_id`, returning the game it was attached to before
    fn attach(&mut self, username: &str, conn: &Connection, game_id: GameId) -> Option<GameId> {
        self.connections.insert(username.to_string(), conn.clone());
        let previous = match self.attached.get(username) {
            Some(&current) if current == game_id => None,
            Some(_) => self.detach(username),
            None => None,
        };
        self.attached.insert(username.to_string(), game_id);
        let users = self.subscribers.entry(game_id).or_default();
        if !users.iter().any(|user| user == username) {
            users.push(username.to_string());
        }
        previous
    }

    fn detach(&mut self, username: &str) -> Option<GameId> {
        let game_id = self.attached.remove(username)?;
        if let Some(users) = self.subscribers.get_mut(&game_id) {
            users.retain(|user| user != username);
            if users.is_empty() {
                self.subscribers.remove(&game_id);
            }
        }
        Some(game_id)
    }

    /// Forget `username` on `game_id` and drop its connection entry if it is still `conn_id`
    fn leave(&mut self, username: &str, conn_id: Uuid, game_id: GameId) {
        if self.attached.get(username) == Some(&game_id) {
            self.detach(username);
        }
        if self.connections.get(username).map(Connection::id) == Some(conn_id) {
            self.connections.remove(username);
        }
    }

    /// Remove every username registered through `conn_id`
    fn drop_connection(&mut self, conn_id: Uuid) -> Vec<(String, Option<GameId>)> {
        let usernames: Vec<String> = self
            .connections
            .iter()
            .filter(|(_, conn)| conn.id == conn_id)
            .map(|(username, _)| username.clone())
            .collect();
        usernames
            .into_iter()
            .map(|username| {
                self.connections.remove(&username);
                let game_id = self.detach(&username);
                (username, game_id)
            })
            .collect()
    }

    fn audience(&self, game_id: GameId, except: Option<&str>) -> Vec<Connection> {
        self.subscribers
            .get(&game_id)
            .into_iter()
            .flatten()
            .filter(|user| Some(user.as_str()) != except)
            .filter_map(|user| self.connections.get(user).cloned())
            .collect()
    }
}

type GameLocks = Mutex<HashMap<GameId, Arc<AsyncMutex<()>>>>;

/// Exclusive access to one game; releasing it prunes the lock entry if unused
struct GameTurn<'a> {
    game_id: GameId,
    locks: &'a GameLocks,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for GameTurn<'_> {
    fn drop(&mut self) {
        // Waiters clone the Arc under the map lock, so a count of one here
        // means nobody holds or awaits this game.
        let mut locks = self.locks.lock();
        drop(self.guard.take());
        if locks
            .get(&self.game_id)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            locks.remove(&self.game_id);
        }
    }
}

pub struct SessionCoordinator {
    store: Arc<dyn GameStore>,
    auth: Arc<dyn AuthService>,
    sessions: Mutex<Sessions>,
    game_locks: GameLocks,
    closed: AtomicBool,
}

impl SessionCoordinator {
    pub fn new(store: Arc<dyn GameStore>, auth: Arc<dyn AuthService>) -> Self {
        SessionCoordinator {
            store,
            auth,
            sessions: Mutex::new(Sessions::default()),
            game_locks: Mutex::new(HashMap::new()),
            closed: AtomicBool::new(false),
        }
    }

    /// Run one inbound command. Any failure becomes an ERROR on `conn` only.
    #[tracing::instrument(
        name = "command",
        skip_all,
        fields(conn = %conn.id(), game_id = command.game_id, kind = ?command.command_type)
    )]
    pub async fn handle(&self, conn: &Connection, command: UserGameCommand) {
        if let Err(err) = self.dispatch(conn, &command).await {
            match &err {
                ServiceError::Persistence(detail) => warn!(%detail, "game update failed"),
                _ => warn!(%err, "command rejected"),
            }
            conn.send(ServerMessage::error(err.client_message()));
        }
    }

    /// Clean up after a socket that went away without LEAVE.
    ///
    /// The user keeps any seat. Remaining subscribers hear about seated
    /// players only.
    pub async fn disconnect(&self, conn_id: Uuid) {
        let dropped = self.sessions.lock().drop_connection(conn_id);
        for (username, game_id) in dropped {
            info!(%conn_id, %username, "connection dropped");
            let Some(game_id) = game_id else { continue };

            let _turn = self.lock_game(game_id).await;
            match self.store.get(game_id).await {
                Ok(record) => {
                    if let Some(color) = record.seats_of(&username).first() {
                        self.broadcast(
                            game_id,
                            None,
                            ServerMessage::notification(format!(
                                "The {color} player {username} has disconnected."
                            )),
                        );
                    }
                }
                Err(err) => debug!(%err, game_id, "game of dropped connection unavailable"),
            }
        }
    }

    /// Refuse further commands, close every registered connection and forget
    /// all session state.
    ///
    /// Commands already holding a game lock finish; their broadcasts reach
    /// nobody.
    pub fn shutdown(&self) {
        self.closed.store(true, Ordering::SeqCst);
        let sessions = std::mem::take(&mut *self.sessions.lock());
        for conn in sessions.connections.values() {
            conn.close();
        }
        info!(
            connections = sessions.connections.len(),
            "session coordinator shut down"
        );
    }

    /// Usernames attached to `game_id`, in the order they connected
    pub fn subscribers(&self, game_id: GameId) -> Vec<String> {
        self.sessions
            .lock()
            .subscribers
            .get(&game_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn is_connected(&self, username: &str) -> bool {
        self.sessions.lock().connections.contains_key(username)
    }

    pub fn is_shut_down(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn ensure_open(&self) -> ServiceResult<()> {
        if self.is_shut_down() {
            return Err(ServiceError::conflict("the server is shutting down."));
        }
        Ok(())
    }

    async fn dispatch(&self, conn: &Connection, command: &UserGameCommand) -> ServiceResult<()> {
        self.ensure_open()?;
        let username = self.auth.resolve_username(&command.auth_token).await?;
        let game_command = command.command()?;
        let game_id = command.game_id;

        let _turn = self.lock_game(game_id).await;
        self.ensure_open()?;
        match game_command {
            GameCommand::Connect => self.connect(conn, &username, game_id).await,
            GameCommand::MakeMove(mv) => self.make_move(&username, game_id, mv).await,
            GameCommand::Resign => self.resign(&username, game_id).await,
            GameCommand::Leave => self.leave(conn, &username, game_id).await,
        }
    }

    async fn connect(&self, conn: &Connection, username: &str, game_id: GameId) -> ServiceResult<()> {
        let record = self.store.get(game_id).await?;

        let previous = {
            let mut sessions = self.sessions.lock();
            // shutdown() flips the flag before it empties the sessions
            self.ensure_open()?;
            sessions.attach(username, conn, game_id)
        };
        if let Some(previous) = previous {
            debug!(%username, previous, "switched games");
        }

        conn.send(ServerMessage::load(record.game.clone()));
        let role = match record.seats_of(username).first() {
            Some(color) => format!("the {color} player"),
            None => "an observer".to_string(),
        };
        self.broadcast(
            game_id,
            Some(username),
            ServerMessage::notification(format!("{username} has joined the game as {role}.")),
        );
        info!(%username, %role, "joined game");
        Ok(())
    }

    async fn make_move(&self, username: &str, game_id: GameId, mv: Move) -> ServiceResult<()> {
        let record = self.store.get(game_id).await?;
        let seats = record.seats_of(username);
        if seats.is_empty() {
            return Err(ServiceError::illegal("you aren't playing this game."));
        }

        let mut game = record.game;
        if game.is_over() {
            return Err(ServiceError::conflict("the game is already over."));
        }
        if let Some(piece) = game.board().piece(mv.start()) {
            if !seats.contains(&piece.color()) {
                return Err(ServiceError::illegal("cannot move for opponent."));
            }
        }
        let color = game.turn();
        if !seats.contains(&color) {
            return Err(ServiceError::illegal("it is not your turn."));
        }

        game.make_move(&mv)?;
        self.store.update(game_id, &game).await?;

        let status = game.status();
        let to_move = game.turn();
        info!(%username, side = %color.abbreviation(), %mv, %status, "move applied");
        self.broadcast(game_id, None, ServerMessage::load(game));
        self.broadcast(
            game_id,
            None,
            ServerMessage::notification(format!("{username} ({color}) made the move {mv}")),
        );
        if let Some(notice) = status_notice(status, to_move) {
            self.broadcast(game_id, None, ServerMessage::notification(notice));
        }
        Ok(())
    }

    async fn resign(&self, username: &str, game_id: GameId) -> ServiceResult<()> {
        let record = self.store.get(game_id).await?;
        let seats = record.seats_of(username);
        let mut game = record.game;
        let color = match seats.as_slice() {
            [] => return Err(ServiceError::illegal("you aren't playing this game.")),
            [only] => *only,
            _ => game.turn(),
        };
        if game.is_over() {
            return Err(ServiceError::conflict("Cannot resign after game is over."));
        }

        game.resign(color)?;
        self.store.update(game_id, &game).await?;

        info!(%username, %color, "resigned");
        self.broadcast(
            game_id,
            None,
            ServerMessage::notification(format!(
                "The {color} player, {username}, has resigned."
            )),
        );
        Ok(())
    }

    async fn leave(&self, conn: &Connection, username: &str, game_id: GameId) -> ServiceResult<()> {
        let record = self.store.get(game_id).await?;
        let seats = record.seats_of(username);
        self.vacate_all(username, game_id, &seats).await?;

        self.sessions.lock().leave(username, conn.id(), game_id);
        let notice = match seats.first() {
            Some(color) => format!("The {color} player {username} has left the game."),
            None => format!("The observer {username} has left the game."),
        };
        self.broadcast(game_id, None, ServerMessage::notification(notice));
        conn.close();
        info!(%username, "left game");
        Ok(())
    }

    fn broadcast(&self, game_id: GameId, except: Option<&str>, message: ServerMessage) {
        let audience = self.sessions.lock().audience(game_id, except);
        debug!(game_id, recipients = audience.len(), "broadcast");
        for conn in audience {
            conn.send(message.clone());
        }
    }

    /// Vacate every seat in `seats`, or none of them.
    ///
    /// When one vacate fails, seats already vacated are claimed back for
    /// `username` before the error is returned.
    async fn vacate_all(&self, username: &str, game_id: GameId, seats: &[Color]) -> ServiceResult<()> {
        for (done, &color) in seats.iter().enumerate() {
            if let Err(err) = self.store.vacate_seat(game_id, color).await {
                for &vacated in &seats[..done] {
                    if let Err(restore) = self.store.claim_seat(game_id, vacated, username).await {
                        warn!(%restore, %vacated, %username, "could not restore seat");
                    }
                }
                return Err(err.into());
            }
        }
        Ok(())
    }

    async fn lock_game(&self, game_id: GameId) -> GameTurn<'_> {
        let lock = self.game_locks.lock().entry(game_id).or_default().clone();
        let guard = lock.lock_owned().await;
        GameTurn {
            game_id,
            locks: &self.game_locks,
            guard: Some(guard),
        }
    }
}

/// Follow-up notification for a status reached by a move; `to_move` is the side now on move
fn status_notice(status: GameStatus, to_move: Color) -> Option<String> {
    if let Some(winner) = status.winner() {
        return Some(format!("### Checkmate! ### {winner} wins."));
    }
    if status.is_check() {
        return Some(format!("+++ Check +++ {to_move} is in check."));
    }
    (status == GameStatus::Stalemate).then(|| "=== Stalemate === The game is a draw.".to_string())
}

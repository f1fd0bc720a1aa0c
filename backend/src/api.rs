use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Json, State,
    },
    http::{header::AUTHORIZATION, HeaderMap},
    response::IntoResponse,
    routing::get,
    Router,
};
use futures::{SinkExt, StreamExt};
use serde_json::{json, Value};
use shared::lobby::{
    CreateGameRequest, CreateGameResponse, JoinGameRequest, ListGamesResponse,
};
use shared::{ServerMessage, UserGameCommand};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::auth::AuthService;
use crate::error::{ServiceError, ServiceResult};
use crate::session::{Connection, Outbound, SessionCoordinator};
use crate::store::GameStore;

#[derive(Clone)]
pub struct AppState {
    pub coordinator: Arc<SessionCoordinator>,
    pub store: Arc<dyn GameStore>,
    pub auth: Arc<dyn AuthService>,
}

impl AppState {
    /// Build the state and a coordinator sharing the same store and auth
    pub fn new(store: Arc<dyn GameStore>, auth: Arc<dyn AuthService>) -> Self {
        let coordinator = Arc::new(SessionCoordinator::new(store.clone(), auth.clone()));
        AppState {
            coordinator,
            store,
            auth,
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/ws", get(open_socket))
        .route("/game", get(list_games).post(create_game).put(join_game))
        .with_state(state)
}

/// Resolve the `Authorization` header, with or without a `Bearer ` prefix
async fn authorize(state: &AppState, headers: &HeaderMap) -> ServiceResult<String> {
    let token = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.strip_prefix("Bearer ").unwrap_or(value))
        .ok_or(ServiceError::Unauthorized)?;
    state.auth.resolve_username(token).await
}

async fn create_game(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CreateGameRequest>,
) -> ServiceResult<Json<CreateGameResponse>> {
    let username = authorize(&state, &headers).await?;
    let name = payload.game_name.trim();
    if name.is_empty() {
        return Err(ServiceError::illegal("bad request."));
    }

    let game_id = state.store.create(name).await?;
    info!(%username, game_id, name, "game created");
    Ok(Json(CreateGameResponse { game_id }))
}

async fn list_games(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ServiceResult<Json<ListGamesResponse>> {
    authorize(&state, &headers).await?;
    let games = state
        .store
        .list()
        .await?
        .iter()
        .map(|record| record.summary())
        .collect();
    Ok(Json(ListGamesResponse { games }))
}

async fn join_game(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<JoinGameRequest>,
) -> ServiceResult<Json<Value>> {
    let username = authorize(&state, &headers).await?;
    state
        .store
        .claim_seat(payload.game_id, payload.player_color, &username)
        .await?;
    info!(%username, game_id = payload.game_id, color = %payload.player_color, "seat claimed");
    Ok(Json(json!({})))
}

async fn open_socket(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| serve_socket(socket, state.coordinator))
}

/// Pump one socket: commands in, [`Outbound`] items out, until either side closes
async fn serve_socket(socket: WebSocket, coordinator: Arc<SessionCoordinator>) {
    let (mut sink, mut stream) = socket.split();
    let (conn, mut outbound) = Connection::new();
    let conn_id = conn.id();
    debug!(%conn_id, "socket opened");

    let writer = tokio::spawn(async move {
        while let Some(item) = outbound.recv().await {
            match item {
                Outbound::Message(message) => {
                    let text = match message.to_json() {
                        Ok(text) => text,
                        Err(err) => {
                            warn!(%err, "failed to encode server message");
                            continue;
                        }
                    };
                    if sink.send(Message::Text(text.into())).await.is_err() {
                        break;
                    }
                }
                Outbound::Close => {
                    let _ = sink.send(Message::Close(None)).await;
                    break;
                }
            }
        }
    });

    while let Some(frame) = stream.next().await {
        match frame {
            Ok(Message::Text(text)) => match UserGameCommand::from_json(text.as_str()) {
                Ok(command) => coordinator.handle(&conn, command).await,
                Err(err) => {
                    debug!(%conn_id, %err, "malformed frame");
                    conn.send(ServerMessage::error(
                        ServiceError::from(err).client_message(),
                    ));
                }
            },
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(err) => {
                debug!(%conn_id, %err, "socket error");
                break;
            }
        }
    }

    coordinator.disconnect(conn_id).await;
    drop(conn);
    if let Err(err) = writer.await {
        warn!(%conn_id, %err, "socket writer failed");
    }
    debug!(%conn_id, "socket closed");
}

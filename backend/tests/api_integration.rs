//! Backend API Integration Tests
//!
//! Tests for the Axum HTTP endpoints using Router::oneshot pattern.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use backend::api::{self, AppState};
use backend::auth::TokenTable;
use backend::store::MemoryGameStore;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

/// Helper to create a test router plus a token for each of alice and bob
fn test_router() -> (Router, String, String) {
    let tokens = Arc::new(TokenTable::new());
    let alice = tokens.issue("alice");
    let bob = tokens.issue("bob");
    let state = AppState::new(Arc::new(MemoryGameStore::new()), tokens);
    (api::router(state), alice, bob)
}

async fn call(
    app: &Router,
    method: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri("/game");
    if let Some(token) = token {
        request = request.header("authorization", token);
    }
    let request = match body {
        Some(body) => request
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

#[tokio::test]
async fn test_create_game_returns_id() {
    let (app, alice, _) = test_router();

    let (status, body) = call(&app, "POST", Some(alice.as_str()), Some(json!({"gameName": "first"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"gameID": 1}));

    let (_, body) = call(&app, "POST", Some(alice.as_str()), Some(json!({"gameName": "second"}))).await;
    assert_eq!(body["gameID"], 2);
}

#[tokio::test]
async fn test_create_game_requires_auth() {
    let (app, _, _) = test_router();

    let (status, body) = call(&app, "POST", None, Some(json!({"gameName": "g"}))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Error: unauthorized.");

    let (status, _) = call(&app, "POST", Some("forged"), Some(json!({"gameName": "g"}))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_game_rejects_blank_name() {
    let (app, alice, _) = test_router();

    let (status, body) = call(&app, "POST", Some(alice.as_str()), Some(json!({"gameName": "  "}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Error: bad request.");
}

#[tokio::test]
async fn test_list_games_shows_seats() {
    let (app, alice, bob) = test_router();
    call(&app, "POST", Some(alice.as_str()), Some(json!({"gameName": "friday"}))).await;

    let (status, _) = call(
        &app,
        "PUT",
        Some(bob.as_str()),
        Some(json!({"playerColor": "BLACK", "gameID": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = call(&app, "GET", Some(alice.as_str()), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"games": [{
            "gameID": 1,
            "whiteUsername": null,
            "blackUsername": "bob",
            "gameName": "friday"
        }]})
    );
}

#[tokio::test]
async fn test_join_taken_seat_is_forbidden() {
    let (app, alice, bob) = test_router();
    call(&app, "POST", Some(alice.as_str()), Some(json!({"gameName": "g"}))).await;

    let join = json!({"playerColor": "WHITE", "gameID": 1});
    let (status, body) = call(&app, "PUT", Some(alice.as_str()), Some(join.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({}));

    let (status, body) = call(&app, "PUT", Some(bob.as_str()), Some(join)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(
        body["message"],
        "Error: the WHITE seat of game 1 is already taken."
    );
}

#[tokio::test]
async fn test_join_unknown_game_is_not_found() {
    let (app, alice, _) = test_router();

    let (status, body) = call(
        &app,
        "PUT",
        Some(alice.as_str()),
        Some(json!({"playerColor": "WHITE", "gameID": 42})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Error: no game with that ID in database.");
}

#[tokio::test]
async fn test_bearer_prefix_accepted() {
    let (app, alice, _) = test_router();
    let bearer = format!("Bearer {alice}");

    let (status, body) = call(&app, "GET", Some(bearer.as_str()), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"games": []}));
}

#[tokio::test]
async fn test_socket_route_requires_upgrade() {
    let (app, _, _) = test_router();

    let response = app
        .oneshot(Request::builder().uri("/ws").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert!(response.status().is_client_error());
}

//! REST API tests driving the router directly.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use reversi::Turn;
use reversi_server::{MemoryStore, ReversiService, api};

fn app() -> Router {
    api::router(ReversiService::new(MemoryStore::new()))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("Router failed");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("Body read failed")
        .to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("Body is not JSON")
    };
    (status, body)
}

async fn start_game(app: &Router) -> StatusCode {
    let request = Request::builder()
        .method("POST")
        .uri("/api/games")
        .body(Body::empty())
        .expect("Request build failed");
    send(app, request).await.0
}

async fn get_turn(app: &Router, turn_count: impl std::fmt::Display) -> (StatusCode, Value) {
    let request = Request::builder()
        .uri(format!("/api/games/latest/turns/{}", turn_count))
        .body(Body::empty())
        .expect("Request build failed");
    send(app, request).await
}

async fn post_json(app: &Router, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/api/games/latest/turns")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("Request build failed");
    send(app, request).await
}

async fn post_turn(app: &Router, turn_count: u32, disc: i32, x: i32, y: i32) -> (StatusCode, Value) {
    let body = json!({
        "turnCount": turn_count,
        "move": { "disc": disc, "x": x, "y": y },
    });
    post_json(app, body).await
}

#[tokio::test]
async fn test_start_game_and_read_first_turn() {
    let app = app();
    assert_eq!(start_game(&app).await, StatusCode::CREATED);

    let (status, body) = get_turn(&app, 0).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["turnCount"], 0);
    assert_eq!(body["nextDisc"], 1);
    assert_eq!(body["winnerDisc"], Value::Null);
    assert_eq!(body["board"][3], json!([0, 0, 0, 2, 1, 0, 0, 0]));
    assert_eq!(body["board"][4], json!([0, 0, 0, 1, 2, 0, 0, 0]));
}

#[tokio::test]
async fn test_register_turn_and_read_back() {
    let app = app();
    start_game(&app).await;

    let (status, body) = post_turn(&app, 1, 1, 2, 3).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, Value::Null);

    let (status, body) = get_turn(&app, 1).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["turnCount"], 1);
    assert_eq!(body["nextDisc"], 2);
    assert_eq!(body["board"][3], json!([0, 0, 1, 1, 1, 0, 0, 0]));
}

#[tokio::test]
async fn test_missing_game_and_turn_are_not_found() {
    let app = app();

    let (status, body) = get_turn(&app, 0).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "LatestGameNotFound");

    start_game(&app).await;
    let (status, body) = get_turn(&app, 7).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "TurnNotFound");
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_illegal_moves_are_bad_requests() {
    let app = app();
    start_game(&app).await;

    let cases = [
        ((1, 1, 3, 3), "CellOccupied"),
        ((1, 1, 0, 0), "NoDiscsToFlip"),
        ((1, 2, 2, 4), "NotPlayersTurn"),
        ((1, 3, 2, 3), "InvalidDisc"),
        ((1, 0, 2, 3), "InvalidDisc"),
        ((1, 1, -1, 3), "PointOutOfRange"),
        ((1, 1, 8, 3), "PointOutOfRange"),
        ((0, 1, 2, 3), "InvalidTurnCount"),
    ];

    for ((turn_count, disc, x, y), kind) in cases {
        let (status, body) = post_turn(&app, turn_count, disc, x, y).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "case {}", kind);
        assert_eq!(body["error"], kind);
    }

    let (status, _) = get_turn(&app, 1).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let app = app();
    start_game(&app).await;

    let bodies = [
        json!({ "turnCount": -1, "move": { "disc": 1, "x": 2, "y": 3 } }),
        json!({ "turnCount": 1 }),
        json!({ "turnCount": 1, "move": { "disc": "dark", "x": 2, "y": 3 } }),
    ];

    for body in bodies {
        let (status, response) = post_json(&app, body.clone()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body {}", body);
        assert_eq!(response["error"], "InvalidRequest");
        assert!(response["message"].is_string());
    }

    let (status, _) = get_turn(&app, 1).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_turn_count_in_path_is_bad_request() {
    let app = app();
    start_game(&app).await;

    for segment in ["-1", "abc", "4294967296"] {
        let (status, body) = get_turn(&app, segment).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "segment {}", segment);
        assert_eq!(body["error"], "InvalidRequest");
        assert!(body["message"].is_string());
    }
}

#[tokio::test]
async fn test_conflicting_turn_is_rejected() {
    let app = app();
    start_game(&app).await;

    assert_eq!(post_turn(&app, 1, 1, 2, 3).await.0, StatusCode::CREATED);
    assert_eq!(post_turn(&app, 1, 1, 2, 3).await.0, StatusCode::CREATED);

    let (status, body) = post_turn(&app, 1, 1, 3, 2).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Conflict");
}

#[tokio::test]
async fn test_full_game_reports_winner_and_summary() {
    let app = app();
    start_game(&app).await;

    // Mirror the game locally to pick legal moves.
    let mut turn = Turn::first(1, chrono::Utc::now().naive_utc());
    while let Some(disc) = turn.next_disc() {
        let point = turn.board().valid_moves(disc)[0];
        let (status, _) = post_turn(
            &app,
            turn.turn_count() + 1,
            i32::from(disc.code()),
            i32::from(point.x()),
            i32::from(point.y()),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        turn = turn.place_next(disc, point).expect("Legal move rejected");
    }

    let (status, body) = get_turn(&app, turn.turn_count()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["nextDisc"], Value::Null);

    let expected = turn
        .winner_disc()
        .expect("ended")
        .map(|d| json!(d.code()))
        .unwrap_or(Value::Null);
    assert_eq!(body["winnerDisc"], expected);

    let request = Request::builder()
        .uri("/api/games")
        .body(Body::empty())
        .expect("Request build failed");
    let (status, games) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(games[0]["gameId"], 1);
    assert_eq!(games[0]["winnerDisc"], expected);
    assert!(games[0]["endAt"].is_string());
    assert_eq!(
        games[0]["darkMoveCount"].as_u64().expect("count")
            + games[0]["lightMoveCount"].as_u64().expect("count"),
        u64::from(turn.turn_count())
    );
}

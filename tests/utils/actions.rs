use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt; // for `oneshot`

pub async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

/// Registers a player and walks them through approval and payment
/// verification. Returns the player id.
pub async fn register_eligible_player(
    app: &Router,
    name: &str,
    mobile: &str,
    ratings: (u8, u8, u8),
) -> String {
    let (status, player) = post_json(
        app,
        "/players",
        json!({
            "name": name,
            "mobile": mobile,
            "role": "all_rounder",
            "batting_rating": ratings.0,
            "bowling_rating": ratings.1,
            "fielding_rating": ratings.2,
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "register {}: {}", name, player);
    let player_id = player["id"].as_str().unwrap().to_string();

    let (status, _) = post_json(
        app,
        &format!("/players/{}/approve", player_id),
        Value::Null,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = post_json(
        app,
        &format!("/players/{}/verify-payment", player_id),
        Value::Null,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    player_id
}

/// Creates a team with the default budget and returns its id.
pub async fn create_team(app: &Router, name: &str, short_name: &str) -> String {
    let (status, team) = post_json(
        app,
        "/teams",
        json!({
            "name": name,
            "short_name": short_name,
            "primary_color": "#ff6b35",
            "secondary_color": "#1a1a1a",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "create team {}: {}", name, team);
    team["id"].as_str().unwrap().to_string()
}

/// Records one delivery, asserting it was accepted, and returns the response.
pub async fn record_ball(app: &Router, match_id: &str, body: Value) -> Value {
    let (status, response) = post_json(app, &format!("/matches/{}/ball", match_id), body).await;
    assert_eq!(status, StatusCode::OK, "ball rejected: {}", response);
    response
}

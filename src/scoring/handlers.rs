use axum::{
    extract::{Path, State},
    Json,
};
use tracing::instrument;

use super::{
    models::{BallEvent, Match, PlayerMatchStats},
    types::{
        BallRequest, BallResponse, NewBatsmanRequest, PowerOverRequest, SetBatsmenRequest,
        SetBowlerRequest, StartMatchRequest,
    },
};
use crate::shared::{AppError, AppState};

/// POST /matches/:id/start
#[instrument(name = "start_match", skip(state, request))]
pub async fn start_match(
    State(state): State<AppState>,
    Path(match_id): Path<String>,
    Json(request): Json<StartMatchRequest>,
) -> Result<Json<Match>, AppError> {
    Ok(Json(
        state
            .scoring_service
            .start_match(&match_id, &request.toss_winner_id, request.toss_decision)
            .await?,
    ))
}

/// POST /matches/:id/batsmen
#[instrument(name = "set_batsmen", skip(state, request))]
pub async fn set_batsmen(
    State(state): State<AppState>,
    Path(match_id): Path<String>,
    Json(request): Json<SetBatsmenRequest>,
) -> Result<Json<Match>, AppError> {
    Ok(Json(
        state
            .scoring_service
            .set_batsmen(&match_id, &request.striker_id, &request.non_striker_id)
            .await?,
    ))
}

/// POST /matches/:id/bowler
#[instrument(name = "set_bowler", skip(state, request))]
pub async fn set_bowler(
    State(state): State<AppState>,
    Path(match_id): Path<String>,
    Json(request): Json<SetBowlerRequest>,
) -> Result<Json<Match>, AppError> {
    Ok(Json(
        state
            .scoring_service
            .set_bowler(&match_id, &request.bowler_id)
            .await?,
    ))
}

/// POST /matches/:id/new-batsman
#[instrument(name = "new_batsman", skip(state, request))]
pub async fn new_batsman(
    State(state): State<AppState>,
    Path(match_id): Path<String>,
    Json(request): Json<NewBatsmanRequest>,
) -> Result<Json<Match>, AppError> {
    Ok(Json(
        state
            .scoring_service
            .new_batsman(&match_id, &request.player_id, request.replace_striker)
            .await?,
    ))
}

/// POST /matches/:id/power-over
#[instrument(name = "set_power_over", skip(state, request))]
pub async fn set_power_over(
    State(state): State<AppState>,
    Path(match_id): Path<String>,
    Json(request): Json<PowerOverRequest>,
) -> Result<Json<Match>, AppError> {
    Ok(Json(
        state
            .scoring_service
            .set_power_over(&match_id, request.over_number, request.innings)
            .await?,
    ))
}

/// POST /matches/:id/ball
#[instrument(name = "record_ball", skip(state, request))]
pub async fn record_ball(
    State(state): State<AppState>,
    Path(match_id): Path<String>,
    Json(request): Json<BallRequest>,
) -> Result<Json<BallResponse>, AppError> {
    let (match_state, event) = state
        .scoring_service
        .record_ball(&match_id, request.into())
        .await?;
    Ok(Json(BallResponse { match_state, event }))
}

/// GET /matches/:id/stats
#[instrument(name = "match_stats", skip(state))]
pub async fn match_stats(
    State(state): State<AppState>,
    Path(match_id): Path<String>,
) -> Result<Json<Vec<PlayerMatchStats>>, AppError> {
    Ok(Json(state.scoring_service.match_stats(&match_id).await?))
}

/// GET /matches/:id/events
#[instrument(name = "match_events", skip(state))]
pub async fn match_events(
    State(state): State<AppState>,
    Path(match_id): Path<String>,
) -> Result<Json<Vec<BallEvent>>, AppError> {
    Ok(Json(state.scoring_service.match_events(&match_id).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        Router,
    };
    use tower::ServiceExt; // for `oneshot`

    use crate::scoring::models::Stage;
    use crate::scoring::repository::MatchRepository;

    async fn app_with_scheduled_match() -> (Router, String) {
        let state = AppState::in_memory();
        let m = crate::scoring::models::Match::new(
            1,
            "t1".to_string(),
            "t2".to_string(),
            Stage::Group,
            None,
        );
        state.match_repository.create_match(&m).await.unwrap();

        let app = Router::new()
            .route("/matches/:id/start", axum::routing::post(start_match))
            .route("/matches/:id/ball", axum::routing::post(record_ball))
            .with_state(state);
        (app, m.id)
    }

    #[tokio::test]
    async fn start_match_handler_goes_live() {
        let (app, match_id) = app_with_scheduled_match().await;

        let request = Request::builder()
            .method("POST")
            .uri(format!("/matches/{}/start", match_id))
            .header("content-type", "application/json")
            .body(Body::from(
                r#"{"toss_winner_id": "t1", "toss_decision": "bat"}"#,
            ))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let m: Match = serde_json::from_slice(&body).unwrap();
        assert_eq!(m.status, crate::scoring::models::MatchStatus::Live);
    }

    #[tokio::test]
    async fn ball_on_scheduled_match_is_a_bad_request() {
        let (app, match_id) = app_with_scheduled_match().await;

        let request = Request::builder()
            .method("POST")
            .uri(format!("/matches/{}/ball", match_id))
            .header("content-type", "application/json")
            .body(Body::from(r#"{"runs": 4}"#))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn ball_on_unknown_match_is_not_found() {
        let (app, _) = app_with_scheduled_match().await;

        let request = Request::builder()
            .method("POST")
            .uri("/matches/missing/ball")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"runs": 0}"#))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}

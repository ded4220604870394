use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    routing::{get, post},
};
use serde::Serialize;
use serde_json::{Value, json};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use data_access::{Advisor, Course, DataStore};

use crate::error::ApiError;
use crate::orchestrator::RankingOrchestrator;
use crate::request::RecommendRequest;

#[derive(Serialize)]
pub struct RecommendResponse {
    pub recommendations: Vec<Course>,
}

/// Build the HTTP app around an orchestrator.
pub fn router(orchestrator: RankingOrchestrator) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/courses", get(courses_handler))
        .route("/advisors", get(advisors_handler))
        .route("/recommend", post(recommend_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(orchestrator)
}

pub async fn health_handler() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn courses_handler(
    State(orchestrator): State<RankingOrchestrator>,
) -> Result<Json<Vec<Course>>, ApiError> {
    let courses = orchestrator.store().fetch_all_courses().await?;
    Ok(Json(courses))
}

pub async fn advisors_handler(
    State(orchestrator): State<RankingOrchestrator>,
) -> Result<Json<Vec<Advisor>>, ApiError> {
    let advisors = orchestrator.store().fetch_all_advisors().await?;
    Ok(Json(advisors))
}

pub async fn recommend_handler(
    State(orchestrator): State<RankingOrchestrator>,
    body: Bytes,
) -> Result<Json<RecommendResponse>, ApiError> {
    let request = RecommendRequest::from_slice(&body)?;
    info!(
        "Recommend request: student_id={} interests={:?} limit={}",
        request.student_id, request.interests, request.limit
    );

    let recommendations = orchestrator
        .recommend(request.student_id, &request.interests, request.limit)
        .await?;

    Ok(Json(RecommendResponse {
        recommendations: recommendations.into_iter().map(|r| r.course).collect(),
    }))
}

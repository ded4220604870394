use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use data_access::DataAccessError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::orchestrator::RecommendError;

#[derive(Error, Debug)]
pub enum ApiError {
    /// The request body is missing or has a bad field
    #[error("{0}")]
    Validation(String),

    /// The data store failed; nothing was computed
    #[error("{0}")]
    Upstream(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<DataAccessError> for ApiError {
    fn from(e: DataAccessError) -> Self {
        error!("Data access failed: {}", e);
        ApiError::Upstream(e.to_string())
    }
}

impl From<RecommendError> for ApiError {
    fn from(e: RecommendError) -> Self {
        match e {
            RecommendError::DataAccess(inner) => inner.into(),
            RecommendError::Internal(message) => {
                error!("Unexpected error while ranking: {}", message);
                ApiError::Internal(message)
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "detail": self.to_string() }))).into_response()
    }
}

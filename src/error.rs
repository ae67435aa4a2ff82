use crate::ops::StakingError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Internal server error: {0}")]
    Internal(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Conflict: {0}")]
    Conflict(String),
}

impl From<StakingError> for AppError {
    fn from(err: StakingError) -> Self {
        let msg = err.to_string();
        match err {
            StakingError::OnlyAdmin | StakingError::OnlyManager => AppError::Forbidden(msg),
            StakingError::StakingNotInitiated | StakingError::NotInitiatedRound => {
                AppError::NotFound(msg)
            }
            StakingError::RoundConflicted
            | StakingError::Finished
            | StakingError::Closed
            | StakingError::Emergency => AppError::Conflict(msg),
            StakingError::InvalidAmount
            | StakingError::NotEnoughPrincipal
            | StakingError::ZeroPrincipal
            | StakingError::ZeroReward
            | StakingError::Custody(_) => AppError::BadRequest(msg),
            StakingError::Math(_) => AppError::Internal(msg),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Config(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

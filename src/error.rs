use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Venue is still loading")]
    VenueLoading,
    #[error("Failed to load venue: {0}")]
    VenueLoadFailed(String),
    #[error("Seat {0} not found")]
    SeatNotFound(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("Session state is unavailable")]
    SessionPoisoned,
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::VenueLoading | AppError::VenueLoadFailed(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            AppError::SeatNotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::SessionPoisoned | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }
        (
            status,
            Json(json!({
                "success": false,
                "error": self.to_string()
            })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_status_codes() {
        assert_eq!(AppError::VenueLoading.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(AppError::SeatNotFound("A-1-01".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::BadRequest("bad".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::VenueLoadFailed("boom".into()).to_string(),
            "Failed to load venue: boom"
        );
    }
}

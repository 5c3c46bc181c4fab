//! Mapping pipeline failures onto HTTP responses.

use crate::extract::ExtractError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Extract(#[from] ExtractError),
    #[error("failed to fetch page: {0}")]
    Fetch(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Extract(ExtractError::Busy) => StatusCode::CONFLICT,
            ApiError::Extract(ExtractError::NotPlaylist(_) | ExtractError::DegradedPage) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Extract(ExtractError::NoElements | ExtractError::NoValidTracks { .. }) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ApiError::Fetch(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::Extract(ExtractError::Busy).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::Extract(ExtractError::NotPlaylist("x".into())).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Extract(ExtractError::NoValidTracks { invalid: 3 }).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ApiError::Fetch("timeout".into()).status(),
            StatusCode::BAD_GATEWAY
        );
    }
}

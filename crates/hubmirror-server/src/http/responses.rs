//! HTTP error responses.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Errors answered before the status stream opens.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("image not passed")]
    MissingImage,

    #[error("❌ Invalid image: {0}. Image name must be valid docker hub image with version tag. For example: postgres:16")]
    InvalidReference(String),

    #[error("❌ Image not found in dockerhub: {0}")]
    NotFound(String),

    #[error("❌ Could not reach dockerhub to check image: {0}")]
    RegistryUnavailable(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingImage | Self::InvalidReference(_) | Self::NotFound(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::RegistryUnavailable(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status_code(),
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            format!("{}\n", self),
        )
            .into_response()
    }
}

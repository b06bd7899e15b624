use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use verso_core::{ErrorKind, SkippedRecord, TransformError};
use verso_index::IndexError;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("failed to bind {0}: {1}")]
    Bind(String, std::io::Error),
    #[error("server error: {0}")]
    Server(String),
}

/// Request-level failure, rendered as a plain-text response.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Forbidden")]
    Forbidden,

    #[error("indexing is not enabled")]
    Disabled,

    #[error("Needs JSON")]
    NotJson,

    #[error("No valid request body detected")]
    EmptyBody,

    #[error("invalid post: {0}")]
    InvalidDocument(serde_json::Error),

    #[error(transparent)]
    Transform(#[from] TransformError),

    /// The post's only record failed extraction under the skip policy.
    #[error("post {:?} could not be indexed: {}", .0.slug, .0.reason)]
    Unindexable(SkippedRecord),

    #[error(transparent)]
    Index(#[from] IndexError),
}

impl ApiError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        let kind = match self {
            Self::Forbidden => return StatusCode::FORBIDDEN,
            Self::Disabled | Self::NotJson | Self::EmptyBody | Self::InvalidDocument(_) => ErrorKind::Validation,
            Self::Transform(e) => e.kind(),
            Self::Unindexable(_) => ErrorKind::Parse,
            Self::Index(e) => e.kind(),
        };
        match kind {
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::Parse | ErrorKind::ExternalService => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), "webhook failed: {}", self);
        } else {
            tracing::warn!(status = status.as_u16(), "webhook rejected: {}", self);
        }
        (status, self.to_string()).into_response()
    }
}

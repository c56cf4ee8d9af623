//! API Error Handling
//!
//! Unified error types and conversion for API responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use bolt_client::ClientError;
use bolt_core::CompileError;

use crate::service::workflow_service::WorkflowError;

/// API error type
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Submission(ClientError),
    InternalError(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Submission(err) => {
                tracing::error!("Submission error: {:?}", err);
                // Upstream 4xx (conflict, forbidden, invalid spec) pass through
                let status = err
                    .status()
                    .filter(|_| err.is_client_error())
                    .and_then(|s| StatusCode::from_u16(s).ok())
                    .unwrap_or(StatusCode::BAD_GATEWAY);
                (status, err.to_string())
            }
            ApiError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

impl From<WorkflowError> for ApiError {
    fn from(err: WorkflowError) -> Self {
        match err {
            WorkflowError::Compile(CompileError::Configuration(e)) => {
                ApiError::BadRequest(e.to_string())
            }
            WorkflowError::Compile(e @ CompileError::Invariant(_)) => {
                ApiError::InternalError(e.to_string())
            }
            WorkflowError::Submission(e) => ApiError::Submission(e),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use bolt_core::ConfigurationError;

    fn status(err: ApiError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_compile_errors() {
        let bad = WorkflowError::Compile(ConfigurationError::NegativeUsers(-1).into());
        assert_eq!(status(bad.into()), StatusCode::BAD_REQUEST);

        let broken = WorkflowError::Compile(CompileError::Invariant("cycle".to_string()));
        assert_eq!(status(broken.into()), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_submission_errors() {
        let conflict = ApiError::Submission(ClientError::api_error(409, "already exists"));
        assert_eq!(status(conflict), StatusCode::CONFLICT);

        let unavailable = ApiError::Submission(ClientError::api_error(503, "unavailable"));
        assert_eq!(status(unavailable), StatusCode::BAD_GATEWAY);

        let unparsable = ApiError::Submission(ClientError::ParseError("eof".to_string()));
        assert_eq!(status(unparsable), StatusCode::BAD_GATEWAY);
    }
}

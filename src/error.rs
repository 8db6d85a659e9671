use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application error types.
///
/// Every variant is reported to clients the same way (400 with an `error`
/// message); only the message text tells the classes apart.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid parameter: {0}")]
    BadRequest(String),

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Numerical error: {0}")]
    NonFinite(String),

    #[error("Model error: {0}")]
    Model(String),

    #[error("External API error: {0}")]
    ExternalApi(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),
}

impl AppError {
    /// True for failures that originate upstream of the pipeline.
    pub fn is_upstream(&self) -> bool {
        matches!(self, AppError::ExternalApi(_) | AppError::Reqwest(_))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::BAD_REQUEST;
        let body = Json(json!({
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_their_class() {
        assert_eq!(
            AppError::InsufficientData("got 1 bar".into()).to_string(),
            "Insufficient data: got 1 bar"
        );
        assert_eq!(
            AppError::BadRequest("unknown period 7y".into()).to_string(),
            "Invalid parameter: unknown period 7y"
        );
        assert_eq!(
            AppError::NonFinite("prediction is NaN".into()).to_string(),
            "Numerical error: prediction is NaN"
        );
    }

    #[test]
    fn test_every_error_is_a_client_error() {
        let errors = vec![
            AppError::BadRequest("x".into()),
            AppError::InsufficientData("x".into()),
            AppError::NonFinite("x".into()),
            AppError::Model("x".into()),
            AppError::ExternalApi("x".into()),
            AppError::Internal("x".into()),
        ];
        for error in errors {
            assert_eq!(error.into_response().status(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn test_is_upstream() {
        assert!(AppError::ExternalApi("down".into()).is_upstream());
        assert!(!AppError::BadRequest("x".into()).is_upstream());
    }
}

//! Mapping of usecase errors to HTTP responses.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::{
    infrastructure::dto::http::ErrorDto,
    usecase::{ChatError, StartStreamError, StopStreamError},
};

/// Error returned by HTTP handlers as `{ "error": ... }`
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    ServiceUnavailable(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }
        (
            status,
            Json(ErrorDto {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<StartStreamError> for ApiError {
    fn from(err: StartStreamError) -> Self {
        match err {
            StartStreamError::MediaUnavailable => ApiError::ServiceUnavailable(
                "Media server unavailable. Start the media server first.".to_string(),
            ),
            StartStreamError::InvalidUsername(_) => {
                ApiError::BadRequest("Username is required".to_string())
            }
            StartStreamError::AlreadyLive { .. } => ApiError::Conflict(err.to_string()),
            StartStreamError::Session(e) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<StopStreamError> for ApiError {
    fn from(err: StopStreamError) -> Self {
        match err {
            StopStreamError::NotLive => ApiError::NotFound(err.to_string()),
            StopStreamError::Session(e) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<ChatError> for ApiError {
    fn from(err: ChatError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usecase_errors_map_to_status_codes() {
        // テスト項目: ユースケースのエラーが適切なステータスコードに変換される
        let cases = [
            (
                ApiError::from(StartStreamError::MediaUnavailable),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                ApiError::from(StartStreamError::AlreadyLive {
                    owner: "alice".to_string(),
                }),
                StatusCode::CONFLICT,
            ),
            (
                ApiError::from(StopStreamError::NotLive),
                StatusCode::NOT_FOUND,
            ),
            (
                ApiError::from(ChatError::Decode("eof".to_string())),
                StatusCode::BAD_REQUEST,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.status(), expected);
        }
    }

    #[test]
    fn test_conflict_message_names_owner() {
        // テスト項目: 409 のメッセージに現在のオーナー名が含まれる
        let error = ApiError::from(StartStreamError::AlreadyLive {
            owner: "alice".to_string(),
        });
        assert!(error.to_string().contains("alice"));
    }
}

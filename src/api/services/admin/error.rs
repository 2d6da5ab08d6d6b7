//! Management API 错误类型
//!
//! Handlers return `Result<HttpResponse, ApiError>`; actix turns the error
//! into a plain-text response through [`ResponseError`].

use std::fmt;

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use tracing::error;

use crate::errors::ShortkeyError;

/// Generic message for server-side failures; details stay in the log.
pub const DB_ERROR_MESSAGE: &str = "Db error";

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
    source: Option<String>,
}

impl ApiError {
    /// Missing or empty required input.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
            source: None,
        }
    }

    /// Absent key. Rendered with an empty body.
    pub fn not_found() -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: String::new(),
            source: None,
        }
    }

    /// Server fault; `source` is logged, never sent to the client.
    pub fn internal(source: impl fmt::Display) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: DB_ERROR_MESSAGE.to_string(),
            source: Some(source.to_string()),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            Some(source) => write!(f, "{} ({})", self.message, source),
            None => write!(f, "{}", self.message),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        self.status
    }

    fn error_response(&self) -> HttpResponse {
        // 只记录服务端错误，客户端错误不进日志
        if self.status.is_server_error() {
            error!(
                "Management request failed: {}",
                self.source.as_deref().unwrap_or(&self.message)
            );
        }

        HttpResponse::build(self.status)
            .content_type("text/plain; charset=utf-8")
            .body(self.message.clone())
    }
}

impl From<ShortkeyError> for ApiError {
    fn from(err: ShortkeyError) -> Self {
        if err.is_server_fault() {
            return ApiError::internal(err);
        }
        match err {
            ShortkeyError::NotFound(_) => ApiError::not_found(),
            other => ApiError::bad_request(other.message()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_maps_to_400() {
        let err = ApiError::from(ShortkeyError::validation("Empty 'link' argument"));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message(), "Empty 'link' argument");
    }

    #[test]
    fn test_store_error_hides_detail() {
        let err = ApiError::from(ShortkeyError::store_operation("page 42 checksum mismatch"));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message(), DB_ERROR_MESSAGE);
        assert!(err.to_string().contains("checksum"));
    }

    #[test]
    fn test_writer_timeout_is_server_fault() {
        let err = ApiError::from(ShortkeyError::writer_timeout("1000ms"));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_not_found_detail_is_dropped() {
        let err = ApiError::from(ShortkeyError::not_found("2401zzzzzzzz"));
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert!(err.message().is_empty());
    }

    #[test]
    fn test_file_error_maps_to_500() {
        let err = ApiError::from(ShortkeyError::file_operation("scratch file vanished"));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message(), DB_ERROR_MESSAGE);
    }

    #[test]
    fn test_not_found_has_empty_body() {
        let err = ApiError::not_found();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert!(err.message().is_empty());
    }
}

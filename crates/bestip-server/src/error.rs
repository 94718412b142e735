//! Request error mapping
//!
//! Missing datasets are a normal 404. Everything else is a 500 whose body
//! is the error's description text, including panics caught by the router.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use bestip_records::ParseError;
use bestip_store::StoreError;
use std::any::Any;
use thiserror::Error;

/// Errors raised while handling a request
#[derive(Error, Debug)]
pub enum ServerError {
    /// Requested dataset is absent from the store
    #[error("{0}")]
    NotFound(String),

    /// Store read failed
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Dataset rejected in strict mode
    #[error(transparent)]
    Parse(#[from] ParseError),
}

pub type Result<T> = std::result::Result<T, ServerError>;

impl ServerError {
    /// HTTP status for this error
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::NotFound(_) => StatusCode::NOT_FOUND,
            ServerError::Store(_) | ServerError::Parse(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::warn!(error = %self, "dataset missing");
        }
        (status, self.to_string()).into_response()
    }
}

/// Turn a caught panic into a 500 carrying the panic message
pub fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Internal server error".to_string()
    };

    tracing::error!(error = %message, "request handler panicked");
    (StatusCode::INTERNAL_SERVER_ERROR, message).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_status() {
        let err = ServerError::NotFound("No IPv4 data found".to_string());
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "No IPv4 data found");
    }

    #[test]
    fn test_parse_error_is_internal() {
        let err = ServerError::from(ParseError::FieldCount { row: 3, found: 2 });
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "Row 3: expected 6-8 fields, found 2");
    }

    #[test]
    fn test_store_error_is_internal() {
        let err = ServerError::from(StoreError::InvalidKey("../x".to_string()));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_panic_response_carries_message() {
        let response = panic_response(Box::new("backend exploded"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], b"backend exploded");
    }

    #[test]
    fn test_panic_response_formatted_and_opaque_payloads() {
        let response = panic_response(Box::new(format!("row {}", 7)));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let response = panic_response(Box::new(42_u32));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}

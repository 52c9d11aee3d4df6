//! Error types for the one-time secret client.
//!
//! # Design
//! Callers branch on the kind of failure, so each source keeps its own
//! variant: the transport's error and serde's errors are carried unchanged
//! (`transparent`), while a non-200 response becomes an [`ApiError`] with
//! the service's message and status code.

use std::fmt;

use thiserror::Error;

use crate::http::TransportError;

/// A non-200 response from the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// Message from the error payload. Empty when the service sent none.
    pub message: String,
    pub status_code: u16,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            write!(f, "api error (status code {})", self.status_code)
        } else {
            write!(
                f,
                "api error: {:?} (status code {})",
                self.message, self.status_code
            )
        }
    }
}

impl std::error::Error for ApiError {}

/// Errors returned by the client and the façade.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request could not be sent or the connection failed.
    #[error(transparent)]
    Transport(TransportError),

    /// The service answered with a non-200 status.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// A response body, or a scalar inside it, could not be decoded.
    #[error(transparent)]
    Decode(#[from] serde_json::Error),

    /// Form parameters could not be encoded into a request body.
    #[error(transparent)]
    Encode(serde_qs::Error),
}

impl ClientError {
    /// HTTP status of an API error.
    pub fn status_code(&self) -> Option<u16> {
        self.api_error().map(|e| e.status_code)
    }

    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            ClientError::Api(e) => Some(e),
            _ => None,
        }
    }
}

pub type Result<T, E = ClientError> = std::result::Result<T, E>;

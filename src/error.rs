//! Top-level error type for the service layers.
//!
//! The decoder itself is total and has no error type; everything here
//! originates in its collaborators (key handling, storage, transport).

use serde::{Deserialize, Serialize};
use warp::http::StatusCode;
use warp::reject::Reject;

/// Errors occurring in key provisioning, record storage, and request
/// handling.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Filesystem failure while touching key material or the record log
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The settings file could not be read or parsed
    #[error("configuration error: {0}")]
    Config(String),

    /// Sealing or opening a record failed, or key material is malformed
    #[error("cryptographic failure: {0}")]
    Crypto(String),

    /// A stored record or response body could not be (de)serialized
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The request was missing a required parameter or otherwise malformed
    #[error("invalid request: {0}")]
    BadRequest(String),
}

impl Error {
    /// Maps the error onto the HTTP status and message the API reports.
    pub fn as_http_response(&self) -> (StatusCode, String) {
        match self {
            Error::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Error::Crypto(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Unable to decrypt data".to_string(),
            ),
            Error::Io(_) | Error::Config(_) | Error::Serialization(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        }
    }
}

impl Reject for Error {}

/// JSON body returned for every rejected request.
#[derive(Serialize, Deserialize, Debug)]
pub struct ErrorResponse {
    pub message: String,
}

//! Fetch failures.

use thiserror::Error;

/// Why a fetch did not produce a usable response.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The request could not be built or sent.
    #[error("request failed: {0}")]
    RequestError(String),

    /// The host refused or dropped the connection.
    #[error("could not connect: {0}")]
    ConnectionError(String),

    #[error("invalid url: {0}")]
    InvalidUrl(String),

    /// The server answered with a non-2xx status. `message` holds the start
    /// of the body.
    #[error("server returned {status}: {message}")]
    HttpError { status: u16, message: String },

    /// The body did not decode into the expected shape.
    #[error("unexpected response body: {0}")]
    ParseError(String),

    #[error("request timed out")]
    Timeout,
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout
        } else if e.is_connect() {
            FetchError::ConnectionError(e.to_string())
        } else if e.is_builder() {
            FetchError::InvalidUrl(e.to_string())
        } else if e.is_decode() {
            FetchError::ParseError(e.to_string())
        } else {
            FetchError::RequestError(e.to_string())
        }
    }
}

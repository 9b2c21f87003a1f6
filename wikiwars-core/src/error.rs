//! Error types for wikiwars-core

use thiserror::Error;

/// Main error type for the wikiwars-core library
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Fetching from the MediaWiki API failed
    #[error("fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// An aggregate that needs at least one row was handed an empty table.
    ///
    /// Callers are expected to rule out `NotFound` and empty tables first,
    /// so reaching this is a programming error rather than a user-facing case.
    #[error("cannot aggregate an empty revision table")]
    EmptyTable,

    /// Recent-articles history error
    #[error("history error: {0}")]
    History(String),

    /// Forecasting collaborator error
    #[error("forecast error: {0}")]
    Forecast(String),
}

/// Why a single fetch attempt against the MediaWiki API failed.
///
/// Fetches are never retried; the cause is reported as-is.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The request (or the whole paginated fetch) ran out of time
    #[error("request timed out")]
    Timeout,

    /// Connection-level failure before a response arrived
    #[error("HTTP request failed: {0}")]
    Transport(String),

    /// The server answered with a non-2xx status
    #[error("API error ({status}): {body}")]
    Status { status: u16, body: String },

    /// The body was not the JSON shape we expect
    #[error("malformed response body: {0}")]
    MalformedBody(String),

    /// The API answered 200 but reported an error object
    #[error("API reported {code}: {info}")]
    Api { code: String, info: String },
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else if err.is_decode() {
            FetchError::MalformedBody(err.to_string())
        } else if let Some(status) = err.status() {
            FetchError::Status {
                status: status.as_u16(),
                body: err.to_string(),
            }
        } else {
            FetchError::Transport(err.to_string())
        }
    }
}

/// Result type alias for wikiwars-core
pub type Result<T> = std::result::Result<T, Error>;

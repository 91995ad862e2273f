//! Feed client error types.

use std::fmt;

/// Errors from the prediction feed client.
#[derive(Debug)]
pub enum FeedError {
    /// HTTP request failed (network error, timeout, etc.)
    Http(reqwest::Error),

    /// Feed returned an error status code
    Api { status: u16, message: String },

    /// Local fixture data could not be loaded (mock client)
    Fixture { message: String },
}

impl fmt::Display for FeedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedError::Http(e) => write!(f, "HTTP error: {e}"),
            FeedError::Api { status, message } => {
                write!(f, "feed error {status}: {message}")
            }
            FeedError::Fixture { message } => write!(f, "fixture error: {message}"),
        }
    }
}

impl std::error::Error for FeedError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FeedError::Http(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for FeedError {
    fn from(err: reqwest::Error) -> Self {
        FeedError::Http(err)
    }
}

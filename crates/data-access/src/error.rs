//! Error types for the data-access crate.
//!
//! Every fetch against the data store either yields data (possibly empty) or
//! one of these errors. An empty table is never reported as an error.

use thiserror::Error;

/// Errors that can occur while reading from the data store
#[derive(Error, Debug)]
pub enum DataAccessError {
    /// The HTTP request never produced a response (connect, timeout, TLS, ...)
    #[error("{what} fetch failed: {source}")]
    Request {
        what: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// The data store answered with a non-success status
    #[error("{what} fetch failed: HTTP {status}: {body}")]
    Status {
        what: &'static str,
        status: u16,
        body: String,
    },

    /// The response body was not the JSON shape we expected
    #[error("{what} fetch failed: invalid payload: {source}")]
    Decode {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// A fixture file could not be read
    #[error("Failed to read fixture {path}: {source}")]
    Fixture {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The store could not serve the read at all (offline, disabled, ...)
    #[error("{what} fetch failed: {reason}")]
    Unavailable { what: &'static str, reason: String },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, DataAccessError>;

//! Error types shared by the heuristic, the validator and the HTTP adapters.

use thiserror::Error;

/// Failure of a single distance or trip lookup.
#[derive(Debug, Error)]
pub enum OracleError {
    /// The provider answered but had no usable route for this pair.
    #[error("no route: {0}")]
    NoRoute(String),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("provider returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("could not decode provider response: {0}")]
    Decode(String),
    /// Something went wrong that the caller must see. Never recovered locally.
    #[error("fatal oracle error: {0}")]
    Fatal(String),
}

impl OracleError {
    pub fn is_fatal(&self) -> bool {
        matches!(self, OracleError::Fatal(_))
    }
}

/// Why the nearest-neighbor heuristic gave up.
#[derive(Debug, Error)]
pub enum OptimizeError {
    /// No destination could be reached from the origin.
    #[error("oracle returned no distance for any destination from the origin")]
    Unreachable,
    /// A later round found no reachable candidate and the policy says fail.
    #[error("no reachable candidate among {remaining} remaining destination(s)")]
    Starved { remaining: usize },
    #[error("too many destinations: {count} (limit {limit})")]
    TooManyDestinations { count: usize, limit: usize },
    #[error("invalid location: {0}")]
    InvalidLocation(String),
    #[error(transparent)]
    Oracle(OracleError),
}

/// Failure talking to the hub directory or schedule store.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("store returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("could not decode store response: {0}")]
    Decode(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
    #[error("failed to build http client: {0}")]
    Client(#[from] reqwest::Error),
}

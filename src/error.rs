// src/error.rs
// =============================================================================
// Error types for everything that can go wrong while serving a page.
//
// Each stage has its own small enum so callers can tell a network failure
// from a bad payload from a broken commit record. They all convert into
// DocError, which is what a request handler ends up holding.
//
// Rust concepts:
// - thiserror: derive Display and Error for our enums
// - #[from]: lets the ? operator convert one error type into another
// =============================================================================

use thiserror::Error;

// Failures of the Remote API Client
#[derive(Debug, Error)]
pub enum FetchError {
    /// Connection, TLS, or body read failed
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Server answered, but not with a 2xx status (the body is discarded)
    #[error("request to {url} returned HTTP {status}")]
    UnexpectedStatus { url: String, status: u16 },
}

// The JSON payload did not match the expected shape
#[derive(Debug, Error)]
#[error("failed to decode response: {0}")]
pub struct DecodeError(#[from] pub serde_json::Error);

// Failures while turning commit records into changelog entries
#[derive(Debug, Error, PartialEq)]
pub enum HistoryError {
    #[error("commit identifier '{0}' is shorter than 7 characters")]
    MalformedIdentifier(String),

    #[error("cannot parse commit timestamp '{0}'")]
    UnparsableTimestamp(String),
}

#[derive(Debug, Error, PartialEq)]
pub enum RouteError {
    #[error("no page at '{0}'")]
    NotFound(String),

    #[error("'{0}' is not a 40-character commit hash")]
    InvalidRevision(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid base URL '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("repository must be given as 'owner/name'")]
    MissingRepository,

    /// A path with "." or ".." segments
    #[error("path '{0}' may not contain '.' or '..' segments")]
    InvalidPath(String),
}

// Everything a single document or index request can fail with
#[derive(Debug, Error)]
pub enum DocError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    History(#[from] HistoryError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

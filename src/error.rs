// Error type shared by the library modules.
// The binary wraps these in `anyhow` at the top level; library code keeps
// them typed so callers can tell a structured store error apart from a
// transport failure.

use thiserror::Error;

use crate::model::ApiError;

/// Errors that can occur while talking to the store or resolving rows.
#[derive(Error, Debug)]
pub enum CodaError {
    /// The store answered with a non-success status and a decodable body.
    #[error("remote error ({status}): {error}")]
    Remote { status: u16, error: ApiError },

    /// No usable response: connection, TLS or body read failure.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("could not decode {what}: {source}")]
    Decode {
        what: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("no candidates available in table {table}")]
    NoCandidates { table: String },

    #[error("prompt failed: {0}")]
    Prompt(#[from] std::io::Error),

    #[error("config error: {message}")]
    Config { message: String },
}

/// Convenience alias for results using `CodaError`.
pub type Result<T> = std::result::Result<T, CodaError>;

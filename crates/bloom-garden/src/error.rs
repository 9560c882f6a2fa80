#![forbid(unsafe_code)]

//! Error types for the store, session and startup.

use thiserror::Error;

use bloom_canvas::SurfaceError;

use crate::config::ConfigError;

/// Failure reported by the flower store collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The request never produced a response (connect, TLS, timeout).
    #[error("store unreachable: {0}")]
    Transport(String),

    /// The store answered and refused the request.
    #[error("{message}")]
    Rejected { status: u16, message: String },

    /// The response could not be understood.
    #[error("malformed store response: {0}")]
    Decode(String),
}

impl StoreError {
    #[must_use]
    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        Self::Rejected {
            status,
            message: message.into(),
        }
    }
}

#[cfg(feature = "rest")]
impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

/// Conditions the session converts store and surface failures into.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Loading the collection failed; the garden continues empty.
    #[error("failed to load flowers: {0}")]
    Load(StoreError),

    /// The store refused a new flower; the drawing is kept for a retry.
    #[error("Failed to plant flower: {0}. Make sure the database table is created with a 'data_url' column!")]
    Publish(StoreError),

    /// A caller broke a precondition, such as publishing an empty drawing.
    #[error("precondition violated: {0}")]
    Precondition(#[from] SurfaceError),
}

/// Why a host could not bring a garden up.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to build store client: {0}")]
    Store(#[from] StoreError),
}

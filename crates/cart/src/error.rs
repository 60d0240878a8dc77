//! Error types for the cart crate.
//!
//! These errors cross the storage and identity ports. The cart manager
//! itself swallows them (logging via `tracing`) so that cart mutations
//! stay fail-soft; they surface only to code that talks to a backend
//! directly.

use thiserror::Error;

/// Failure in a [`crate::CartStorage`] backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem I/O failed for the given key.
    #[error("storage I/O for key '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// The backend cannot serve requests at all.
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
}

/// Failure while resolving the per-installation user identity.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// The identity provider's backing store failed.
    #[error("identity storage: {0}")]
    Storage(#[from] StorageError),

    /// Any other provider-specific failure.
    #[error("identity resolution: {0}")]
    Resolution(String),
}

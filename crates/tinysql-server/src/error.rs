//! Server-level error types (transport only; SQL errors stay in
//! [`tinysql_core::EngineError`] and are encoded into the wire envelope
//! directly rather than propagated as a `ServerError`).

use thiserror::Error;

/// Failures that can abort the server binary itself.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The listen address could not be bound.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        /// The address that failed to bind.
        addr: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for server-binary operations.
pub type Result<T> = std::result::Result<T, ServerError>;

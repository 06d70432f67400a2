//! Error types for the server binary.

/// Errors that stop the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Binding, accepting or reading the map file failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The configured map does not parse.
    #[error("invalid map: {0}")]
    Map(#[from] xa_core::CoreError),

    /// An outbound message could not be encoded.
    #[error("encoding error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

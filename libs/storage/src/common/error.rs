/// Unified error type for every storage operation
///
/// Transport and protocol failures are carried verbatim in `Redis`. The
/// not-found sentinel is its own variant so callers never have to confuse an
/// absent key with a broken connection.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Redis transport/protocol errors, surfaced as the driver reported them
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// No pooled connection could be checked out in time
    #[error("Connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    /// The key or member does not exist
    #[error("Key not found")]
    NotFound,

    /// The liveness check failed while constructing the client
    #[error("Backing store unavailable: {0}")]
    Unavailable(#[source] Box<StorageError>),

    /// The reset-on-start flush failed while constructing the client
    #[error("Reset on start failed: {0}")]
    ResetFailed(#[source] Box<StorageError>),

    /// None of the sentinels could report the current master
    #[error("No sentinel knows master '{0}'")]
    MasterNotFound(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The server answered with something the call cannot interpret
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    /// The call was rejected before reaching the server
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl StorageError {
    /// Whether this is the not-found sentinel rather than a real failure
    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::NotFound)
    }

    /// Whether retrying the same command on a fresh connection may succeed
    pub fn is_transient(&self) -> bool {
        match self {
            StorageError::Redis(err) => {
                err.is_io_error() || err.is_timeout() || err.is_connection_dropped()
            }
            _ => false,
        }
    }
}

/// Result type alias for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

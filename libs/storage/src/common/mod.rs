//! Common utilities shared by the storage facades

pub mod error;
pub mod logging;
pub mod retry;

pub use error::{StorageError, StorageResult};
pub use logging::with_sink;
pub use retry::{RetryConfig, retry_with_backoff};

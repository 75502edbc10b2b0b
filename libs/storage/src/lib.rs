//! Storage library wrapping Redis behind a small cache facade
//!
//! Connects to a single node, a cluster or a sentinel-managed master from one
//! configuration record, and exposes two facades over a shared, thread-safe
//! connection pool:
//!
//! - [`RedisStorage`](redis::RedisStorage): `get`/`set`/`delete`/`reset` on raw bytes
//! - [`RedisCommands`](redis::RedisCommands): strings, hashes, lists, sets,
//!   sorted sets and geo, each with a plain and a `*_with_err` form
//!
//! # Features
//!
//! - `config` (default) - load [`RedisConfig`](redis::RedisConfig) with `core_config::FromEnv`
//!
//! # Example
//!
//! ```ignore
//! use std::time::Duration;
//! use storage::redis::{RedisConfig, RedisStorage};
//!
//! let storage = RedisStorage::new(Some(RedisConfig::new("127.0.0.1:6379")))?;
//! storage.set("greeting", b"hello", Duration::from_secs(30))?;
//!
//! let commands = storage.commands();
//! commands.hset("user:1", "name", "ada");
//! let name = commands.hget("user:1", "name")?;
//! ```

pub mod common;
pub mod redis;

// Re-exports for convenience
pub use self::common::{StorageError, StorageResult};
pub use self::redis::{RedisCommands, RedisConfig, RedisStorage};

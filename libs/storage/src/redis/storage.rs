use std::time::Duration;

use redis::{Cmd, ToRedisArgs};
use tracing::{Dispatch, info};

use super::commands::RedisCommands;
use super::config::RedisConfig;
use super::connector::connect_from_config;
use super::health::{HealthStatus, check_health_detailed};
use super::pool::ClientHandle;
use crate::common::StorageResult;

/// Byte-oriented cache over one Redis client handle
///
/// Empty keys (and, for `set`, empty values) are accepted as no-ops, and a
/// missing key reads as `None` rather than an error.
///
/// # Example
/// ```ignore
/// use std::time::Duration;
/// use storage::redis::{RedisConfig, RedisStorage};
///
/// let storage = RedisStorage::new(Some(RedisConfig::new("127.0.0.1:6379")))?;
/// storage.set("session:42", b"payload", Duration::from_secs(60))?;
/// assert_eq!(storage.get("session:42")?, Some(b"payload".to_vec()));
/// storage.close()?;
/// ```
pub struct RedisStorage {
    client: ClientHandle,
}

impl RedisStorage {
    /// Connect with `config`, or with the default config when `None`
    pub fn new(config: Option<RedisConfig>) -> StorageResult<Self> {
        Self::with_logger(config, None)
    }

    /// Connect and send this storage's events to `logger`
    ///
    /// The process-wide subscriber is left untouched.
    pub fn with_logger(config: Option<RedisConfig>, logger: Option<Dispatch>) -> StorageResult<Self> {
        Ok(Self {
            client: connect_from_config(config, logger)?,
        })
    }

    /// Get value by key
    pub fn get(&self, key: &str) -> StorageResult<Option<Vec<u8>>> {
        if key.is_empty() {
            return Ok(None);
        }
        self.client.query(redis::cmd("GET").arg(key))
    }

    /// Set key with value. A zero `ttl` means no expiration.
    pub fn set(&self, key: &str, value: &[u8], ttl: Duration) -> StorageResult<()> {
        if key.is_empty() || value.is_empty() {
            return Ok(());
        }
        self.client.query(&set_command(key, value, ttl))
    }

    /// Delete key by key
    pub fn delete(&self, key: &str) -> StorageResult<()> {
        if key.is_empty() {
            return Ok(());
        }
        self.client.query(redis::cmd("DEL").arg(key))
    }

    /// Reset all keys in the selected database
    pub fn reset(&self) -> StorageResult<()> {
        self.client.query(&redis::cmd("FLUSHDB"))
    }

    /// Release the pool
    pub fn close(self) -> StorageResult<()> {
        self.client.in_scope(|| info!("Closing Redis storage"));
        drop(self.client);
        Ok(())
    }

    /// The underlying client handle, for commands the facades do not cover
    pub fn connection(&self) -> &ClientHandle {
        &self.client
    }

    /// Typed command view over the same handle
    pub fn commands(&self) -> RedisCommands<'_> {
        RedisCommands::new(&self.client)
    }

    /// Ping the server and report the round-trip time
    pub fn health(&self) -> HealthStatus {
        check_health_detailed(&self.client)
    }
}

/// `SET key value [PX ttl]`; sub-millisecond TTLs round up to 1ms
pub(crate) fn set_command<V: ToRedisArgs>(key: &str, value: V, ttl: Duration) -> Cmd {
    let mut cmd = redis::cmd("SET");
    cmd.arg(key).arg(value);
    if !ttl.is_zero() {
        cmd.arg("PX").arg(ttl_millis(ttl));
    }
    cmd
}

pub(crate) fn ttl_millis(ttl: Duration) -> u64 {
    u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX).max(1)
}

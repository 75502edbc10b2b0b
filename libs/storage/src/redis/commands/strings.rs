use std::time::Duration;

use redis::{ToRedisArgs, Value};

use super::{RedisCommands, fill_absent};
use crate::common::{StorageError, StorageResult};
use crate::redis::storage::{set_command, ttl_millis};

impl RedisCommands<'_> {
    /// String value of `key`; empty when missing or on failure
    pub fn get(&self, key: &str) -> String {
        self.get_with_err(key).unwrap_or_default()
    }

    /// String value of `key`, or `NotFound`
    pub fn get_with_err(&self, key: &str) -> StorageResult<String> {
        self.query::<Option<String>>(redis::cmd("GET").arg(key))?
            .ok_or(StorageError::NotFound)
    }

    /// Raw bytes of `key`; a missing key is an empty vector, not an error
    pub fn get_raw(&self, key: &str) -> StorageResult<Vec<u8>> {
        Ok(self
            .query::<Option<Vec<u8>>>(redis::cmd("GET").arg(key))?
            .unwrap_or_default())
    }

    /// Set `key`; a zero `expire` means no expiration
    pub fn set<V: ToRedisArgs>(&self, key: &str, value: V, expire: Duration) -> bool {
        self.set_with_err(key, value, expire).is_ok()
    }

    pub fn set_with_err<V: ToRedisArgs>(
        &self,
        key: &str,
        value: V,
        expire: Duration,
    ) -> StorageResult<()> {
        self.query(&set_command(key, value, expire))
    }

    /// Set `key` only if it does not exist yet; `true` when it was set
    pub fn set_nx<V: ToRedisArgs>(&self, key: &str, value: V, expire: Duration) -> bool {
        self.set_nx_with_err(key, value, expire).unwrap_or(false)
    }

    pub fn set_nx_with_err<V: ToRedisArgs>(
        &self,
        key: &str,
        value: V,
        expire: Duration,
    ) -> StorageResult<bool> {
        let mut cmd = set_command(key, value, expire);
        cmd.arg("NX");
        let reply: Value = self.query_once(&cmd)?;
        Ok(!matches!(reply, Value::Nil))
    }

    /// Remaining time to live; zero when missing, persistent or on failure
    pub fn ttl(&self, key: &str) -> Duration {
        self.ttl_with_err(key).ok().flatten().unwrap_or_default()
    }

    /// Remaining time to live, `None` for a key without expiration, or
    /// `NotFound` for a missing key
    pub fn ttl_with_err(&self, key: &str) -> StorageResult<Option<Duration>> {
        match self.query::<i64>(redis::cmd("PTTL").arg(key))? {
            -2 => Err(StorageError::NotFound),
            ms if ms < 0 => Ok(None),
            ms => Ok(Some(Duration::from_millis(ms as u64))),
        }
    }

    /// Values of `keys` in request order, absent keys as empty strings
    pub fn mget(&self, keys: &[&str]) -> StorageResult<Vec<String>> {
        Ok(fill_absent(self.mgets(keys)?))
    }

    /// Values of `keys` in request order, absent keys as `None`
    pub fn mgets(&self, keys: &[&str]) -> StorageResult<Vec<Option<String>>> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }
        let mut cmd = redis::cmd("MGET");
        for key in keys {
            cmd.arg(*key);
        }
        self.query(&cmd)
    }

    /// Increment `key` by one; `true` on success
    pub fn incr(&self, key: &str) -> bool {
        self.incr_with_err(key).is_ok()
    }

    pub fn incr_with_err(&self, key: &str) -> StorageResult<i64> {
        self.query_once(redis::cmd("INCR").arg(key))
    }

    /// Add `increment` to `key`, returning the new value
    pub fn incr_by(&self, key: &str, increment: i64) -> StorageResult<i64> {
        self.query_once(redis::cmd("INCRBY").arg(key).arg(increment))
    }

    /// Decrement `key` by one; `true` on success
    pub fn decr(&self, key: &str) -> bool {
        self.decr_with_err(key).is_ok()
    }

    pub fn decr_with_err(&self, key: &str) -> StorageResult<i64> {
        self.query_once(redis::cmd("DECR").arg(key))
    }

    /// Type name of the value at `key` (`"none"` when missing)
    pub fn key_type(&self, key: &str) -> StorageResult<String> {
        self.query(redis::cmd("TYPE").arg(key))
    }

    /// Set a timeout on `key`; `false` when the key does not exist
    pub fn expire(&self, key: &str, expiration: Duration) -> StorageResult<bool> {
        self.query(redis::cmd("PEXPIRE").arg(key).arg(ttl_millis(expiration)))
    }

    /// Delete `key`, returning how many keys were removed (0 on failure)
    pub fn del(&self, key: &str) -> i64 {
        self.del_with_err(key).unwrap_or_default()
    }

    pub fn del_with_err(&self, key: &str) -> StorageResult<i64> {
        self.query(redis::cmd("DEL").arg(key))
    }

    /// Whether `key` exists; `false` on failure
    pub fn exists(&self, key: &str) -> bool {
        self.exists_with_err(key).unwrap_or(false)
    }

    pub fn exists_with_err(&self, key: &str) -> StorageResult<bool> {
        Ok(self.query::<i64>(redis::cmd("EXISTS").arg(key))? == 1)
    }
}

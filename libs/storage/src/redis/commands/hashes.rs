use std::collections::HashMap;
use std::time::Duration;

use redis::ToRedisArgs;

use super::{RedisCommands, fill_absent, zip_fields};
use crate::common::{StorageError, StorageResult};

impl RedisCommands<'_> {
    /// All fields of the hash at `key`; empty when missing or on failure
    pub fn hget_all(&self, key: &str) -> HashMap<String, String> {
        self.query(redis::cmd("HGETALL").arg(key))
            .unwrap_or_default()
    }

    /// One field; a missing field reads as an empty string
    pub fn hget(&self, key: &str, field: &str) -> StorageResult<String> {
        Ok(self
            .query::<Option<String>>(redis::cmd("HGET").arg(key).arg(field))?
            .unwrap_or_default())
    }

    /// Values of `fields` in request order, absent fields as empty strings
    ///
    /// Returns an empty vector on failure.
    pub fn hmget(&self, key: &str, fields: &[&str]) -> Vec<String> {
        self.hmget_values(key, fields)
            .map(fill_absent)
            .unwrap_or_default()
    }

    /// Like [`hmget`](Self::hmget) but keyed by field name
    pub fn hmget_map(&self, key: &str, fields: &[&str]) -> HashMap<String, String> {
        self.hmget_values(key, fields)
            .map(|values| zip_fields(fields, values))
            .unwrap_or_default()
    }

    fn hmget_values(&self, key: &str, fields: &[&str]) -> StorageResult<Vec<Option<String>>> {
        if fields.is_empty() {
            return Ok(Vec::new());
        }
        let mut cmd = redis::cmd("HMGET");
        cmd.arg(key);
        for field in fields {
            cmd.arg(*field);
        }
        self.query(&cmd)
    }

    /// Write several fields, then apply `expire` to the whole hash when it
    /// is non-zero; `true` only if both steps succeed
    pub fn hmset<I, F, V>(&self, key: &str, fields: I, expire: Duration) -> bool
    where
        I: IntoIterator<Item = (F, V)>,
        F: ToRedisArgs,
        V: ToRedisArgs,
    {
        self.hmset_with_err(key, fields, expire).is_ok()
    }

    pub fn hmset_with_err<I, F, V>(&self, key: &str, fields: I, expire: Duration) -> StorageResult<()>
    where
        I: IntoIterator<Item = (F, V)>,
        F: ToRedisArgs,
        V: ToRedisArgs,
    {
        let mut cmd = redis::cmd("HSET");
        cmd.arg(key);
        let mut written = 0usize;
        for (field, value) in fields {
            cmd.arg(field).arg(value);
            written += 1;
        }
        if written == 0 {
            return Err(StorageError::InvalidArgument(
                "hmset requires at least one field".to_string(),
            ));
        }

        self.query::<()>(&cmd)?;
        if !expire.is_zero() {
            self.expire(key, expire)?;
        }
        Ok(())
    }

    /// Write one field; `true` on success
    pub fn hset<V: ToRedisArgs>(&self, key: &str, field: &str, value: V) -> bool {
        self.hset_with_err(key, field, value).is_ok()
    }

    /// Write one field, returning 1 if it was created and 0 if updated
    pub fn hset_with_err<V: ToRedisArgs>(&self, key: &str, field: &str, value: V) -> StorageResult<i64> {
        self.query(redis::cmd("HSET").arg(key).arg(field).arg(value))
    }

    /// Remove fields; `true` on success
    pub fn hdel(&self, key: &str, fields: &[&str]) -> bool {
        self.hdel_with_err(key, fields).is_ok()
    }

    /// Remove fields, returning how many existed
    pub fn hdel_with_err(&self, key: &str, fields: &[&str]) -> StorageResult<i64> {
        let mut cmd = redis::cmd("HDEL");
        cmd.arg(key);
        for field in fields {
            cmd.arg(*field);
        }
        self.query(&cmd)
    }

    pub fn hincr_by(&self, key: &str, field: &str, increment: i64) -> bool {
        self.hincr_by_with_err(key, field, increment).is_ok()
    }

    /// Add `increment` to a field, returning the new value
    pub fn hincr_by_with_err(&self, key: &str, field: &str, increment: i64) -> StorageResult<i64> {
        self.query_once(redis::cmd("HINCRBY").arg(key).arg(field).arg(increment))
    }

    pub fn hkeys(&self, key: &str) -> StorageResult<Vec<String>> {
        self.query(redis::cmd("HKEYS").arg(key))
    }

    pub fn hlen(&self, key: &str) -> StorageResult<i64> {
        self.query(redis::cmd("HLEN").arg(key))
    }
}

use redis::ToRedisArgs;

use super::RedisCommands;
use crate::common::{StorageError, StorageResult};

impl RedisCommands<'_> {
    /// Prepend values, returning the new list length
    pub fn lpush<V: ToRedisArgs>(&self, key: &str, values: &[V]) -> StorageResult<i64> {
        self.query_once(redis::cmd("LPUSH").arg(key).arg(values))
    }

    /// Append values, returning the new list length
    pub fn rpush<V: ToRedisArgs>(&self, key: &str, values: &[V]) -> StorageResult<i64> {
        self.query_once(redis::cmd("RPUSH").arg(key).arg(values))
    }

    /// Remove and return the last element, or `NotFound` for an empty list
    pub fn rpop(&self, key: &str) -> StorageResult<String> {
        self.query_once::<Option<String>>(redis::cmd("RPOP").arg(key))?
            .ok_or(StorageError::NotFound)
    }

    /// Elements from `start` to `stop` inclusive; negative indexes count from the tail
    pub fn lrange(&self, key: &str, start: i64, stop: i64) -> StorageResult<Vec<String>> {
        self.query(redis::cmd("LRANGE").arg(key).arg(start).arg(stop))
    }

    /// List length; 0 when missing or on failure
    pub fn llen(&self, key: &str) -> i64 {
        self.llen_with_err(key).unwrap_or_default()
    }

    pub fn llen_with_err(&self, key: &str) -> StorageResult<i64> {
        self.query(redis::cmd("LLEN").arg(key))
    }

    /// Remove up to `count` occurrences of `value` (all when 0, from the tail
    /// when negative), returning how many were removed
    pub fn lrem<V: ToRedisArgs>(&self, key: &str, count: i64, value: V) -> StorageResult<i64> {
        self.query_once(redis::cmd("LREM").arg(key).arg(count).arg(value))
    }

    /// Element at `index`, or `NotFound` when out of range
    pub fn lindex(&self, key: &str, index: i64) -> StorageResult<String> {
        self.query::<Option<String>>(redis::cmd("LINDEX").arg(key).arg(index))?
            .ok_or(StorageError::NotFound)
    }

    /// Keep only the elements from `start` to `stop` inclusive
    pub fn ltrim(&self, key: &str, start: i64, stop: i64) -> StorageResult<()> {
        self.query(redis::cmd("LTRIM").arg(key).arg(start).arg(stop))
    }
}

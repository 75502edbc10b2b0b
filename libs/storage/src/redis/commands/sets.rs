use redis::ToRedisArgs;

use super::RedisCommands;
use crate::common::StorageResult;

impl RedisCommands<'_> {
    /// Add members, returning how many were not already present
    pub fn sadd<V: ToRedisArgs>(&self, key: &str, members: &[V]) -> StorageResult<i64> {
        self.query(redis::cmd("SADD").arg(key).arg(members))
    }

    pub fn smembers(&self, key: &str) -> StorageResult<Vec<String>> {
        self.query(redis::cmd("SMEMBERS").arg(key))
    }

    pub fn sismember<V: ToRedisArgs>(&self, key: &str, member: V) -> StorageResult<bool> {
        self.query(redis::cmd("SISMEMBER").arg(key).arg(member))
    }

    /// Set cardinality; 0 for a missing key
    pub fn scard(&self, key: &str) -> StorageResult<i64> {
        self.query(redis::cmd("SCARD").arg(key))
    }
}

use redis::{Cmd, ToRedisArgs};

use super::RedisCommands;
use crate::common::{StorageError, StorageResult};
use crate::redis::types::{ScoreRange, ScoredMember};

impl RedisCommands<'_> {
    /// Members from `start` to `stop` by descending score
    pub fn zrevrange(&self, key: &str, start: i64, stop: i64) -> StorageResult<Vec<String>> {
        self.query(redis::cmd("ZREVRANGE").arg(key).arg(start).arg(stop))
    }

    pub fn zrevrange_with_scores(
        &self,
        key: &str,
        start: i64,
        stop: i64,
    ) -> StorageResult<Vec<ScoredMember>> {
        self.scored(
            redis::cmd("ZREVRANGE")
                .arg(key)
                .arg(start)
                .arg(stop)
                .arg("WITHSCORES"),
        )
    }

    /// Members from `start` to `stop` by ascending score
    pub fn zrange(&self, key: &str, start: i64, stop: i64) -> StorageResult<Vec<String>> {
        self.query(redis::cmd("ZRANGE").arg(key).arg(start).arg(stop))
    }

    /// Rank of `member` with the highest score at 0; `None` when absent
    pub fn zrevrank<V: ToRedisArgs>(&self, key: &str, member: V) -> StorageResult<Option<i64>> {
        self.query(redis::cmd("ZREVRANK").arg(key).arg(member))
    }

    pub fn zrevrange_by_score(&self, key: &str, range: &ScoreRange) -> StorageResult<Vec<String>> {
        self.query(&rev_by_score(key, range, false))
    }

    pub fn zrevrange_by_score_with_scores(
        &self,
        key: &str,
        range: &ScoreRange,
    ) -> StorageResult<Vec<ScoredMember>> {
        self.scored(&rev_by_score(key, range, true))
    }

    pub fn zcard(&self, key: &str) -> StorageResult<i64> {
        self.query(redis::cmd("ZCARD").arg(key))
    }

    /// Score of `member`, or `NotFound` when absent
    pub fn zscore<V: ToRedisArgs>(&self, key: &str, member: V) -> StorageResult<f64> {
        self.query::<Option<f64>>(redis::cmd("ZSCORE").arg(key).arg(member))?
            .ok_or(StorageError::NotFound)
    }

    /// Add or update members, returning how many were newly added
    pub fn zadd(&self, key: &str, members: &[ScoredMember]) -> StorageResult<i64> {
        let mut cmd = redis::cmd("ZADD");
        cmd.arg(key);
        for entry in members {
            cmd.arg(entry.score).arg(&entry.member);
        }
        self.query(&cmd)
    }

    /// Number of members with a score between `min` and `max`
    pub fn zcount(&self, key: &str, min: &str, max: &str) -> StorageResult<i64> {
        self.query(redis::cmd("ZCOUNT").arg(key).arg(min).arg(max))
    }

    /// Add `increment` to the score of `member`, returning the new score
    pub fn zincr_by<V: ToRedisArgs>(&self, key: &str, member: V, increment: f64) -> StorageResult<f64> {
        self.query_once(redis::cmd("ZINCRBY").arg(key).arg(increment).arg(member))
    }

    /// Remove members ranked from `start` to `stop` (ascending), returning the count
    pub fn zrem_range_by_rank(&self, key: &str, start: i64, stop: i64) -> StorageResult<i64> {
        self.query_once(redis::cmd("ZREMRANGEBYRANK").arg(key).arg(start).arg(stop))
    }

    pub fn zrem<V: ToRedisArgs>(&self, key: &str, members: &[V]) -> StorageResult<i64> {
        self.query(redis::cmd("ZREM").arg(key).arg(members))
    }

    fn scored(&self, cmd: &Cmd) -> StorageResult<Vec<ScoredMember>> {
        let pairs: Vec<(String, f64)> = self.query(cmd)?;
        Ok(pairs.into_iter().map(ScoredMember::from).collect())
    }
}

/// `ZREVRANGEBYSCORE key max min [WITHSCORES] [LIMIT offset count]`
fn rev_by_score(key: &str, range: &ScoreRange, with_scores: bool) -> Cmd {
    let mut cmd = redis::cmd("ZREVRANGEBYSCORE");
    cmd.arg(key).arg(&range.max).arg(&range.min);
    if with_scores {
        cmd.arg("WITHSCORES");
    }
    if let Some((offset, count)) = range.limit_args() {
        cmd.arg("LIMIT").arg(offset).arg(count);
    }
    cmd
}

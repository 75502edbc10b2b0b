//! Shared test utilities for storage testing
//!
//! This crate provides reusable test infrastructure:
//! - `TestRedis`: Redis container with automatic cleanup (feature: "redis")
//! - `TestDataBuilder`: Deterministic, per-test key names (always available)
//! - `assertions`: Custom assertion helpers (always available)
//!
//! # Features
//!
//! - `redis` (default): Enables Redis test infrastructure
//!
//! # Usage
//!
//! ```rust,ignore
//! use test_utils::{TestDataBuilder, TestRedis};
//!
//! #[test]
//! #[ignore] // Requires Docker
//! fn my_redis_test() {
//!     let redis = TestRedis::new();
//!     let builder = TestDataBuilder::from_test_name("my_redis_test");
//!
//!     let key = builder.key("session", "main");
//!     // connect to redis.address() and use `key`
//! }
//! ```

#[cfg(feature = "redis")]
mod redis;

#[cfg(feature = "redis")]
pub use self::redis::TestRedis;

/// Builder for test data with deterministic randomization
///
/// This ensures tests are reproducible by using seeded random data.
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    /// Create a new builder with a seed (for deterministic tests)
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Create from test name (generates seed from test name hash)
    ///
    /// This is the recommended way to create a builder for consistent test data.
    ///
    /// # Example
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::from_test_name("test_create_resource");
    /// ```
    pub fn from_test_name(name: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// Generate a Redis key namespaced to this test
    ///
    /// Tests sharing one server cannot see each other's keys.
    ///
    /// # Example
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::from_test_name("my_test");
    /// let key = builder.key("user", "42");
    /// assert!(key.starts_with("test:"));
    /// assert!(key.ends_with(":user:42"));
    /// ```
    pub fn key(&self, prefix: &str, suffix: &str) -> String {
        format!("test:{}:{}:{}", self.seed, prefix, suffix)
    }
}

/// Test assertion helpers
pub mod assertions {
    /// Assert that an optional value is Some
    pub fn assert_some<T>(value: Option<T>, context: &str) -> T {
        value.unwrap_or_else(|| panic!("{}: expected Some, got None", context))
    }

    /// Assert that two byte payloads are equal, printing them as text on failure
    pub fn assert_bytes_eq(actual: &[u8], expected: &[u8], context: &str) {
        assert_eq!(
            actual,
            expected,
            "{}: expected {:?}, got {:?}",
            context,
            String::from_utf8_lossy(expected),
            String::from_utf8_lossy(actual)
        );
    }
}

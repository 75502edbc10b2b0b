//! Redis test infrastructure
//!
//! Provides a `TestRedis` helper that creates a Redis container for testing.

use redis::Client;
use testcontainers::runners::SyncRunner;
use testcontainers::{Container, ImageExt};
use testcontainers_modules::redis::Redis;

/// Test Redis wrapper that ensures proper cleanup
///
/// The container is automatically stopped and removed when this struct is dropped.
///
/// # Example
///
/// ```no_run
/// use test_utils::TestRedis;
///
/// let redis = TestRedis::new();
/// let mut conn = redis.client().get_connection().unwrap();
///
/// let _: () = redis::cmd("SET").arg("key").arg("value").query(&mut conn).unwrap();
/// let value: String = redis::cmd("GET").arg("key").query(&mut conn).unwrap();
/// assert_eq!(value, "value");
/// ```
pub struct TestRedis {
    #[allow(dead_code)]
    container: Container<Redis>,
    client: Client,
    address: String,
    pub connection_string: String,
}

impl TestRedis {
    /// Create a new test Redis instance
    ///
    /// Uses Redis 8 Alpine image by default.
    pub fn new() -> Self {
        // Use Redis 8 Alpine (latest stable, lightweight)
        let container = Redis::default()
            .with_tag("8-alpine")
            .start()
            .expect("Failed to start Redis container");

        let host_port = container
            .get_host_port_ipv4(6379)
            .expect("Failed to get Redis port");

        let address = format!("127.0.0.1:{}", host_port);
        let connection_string = format!("redis://{}", address);

        let client =
            Client::open(connection_string.clone()).expect("Failed to create Redis client");

        tracing::info!(port = host_port, "Test Redis ready (Redis 8-alpine)");

        Self {
            container,
            client,
            address,
            connection_string,
        }
    }

    /// `host:port` of the container, the endpoint form storage configs take
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Driver client bypassing any facade, for checking state from the outside
    pub fn client(&self) -> Client {
        self.client.clone()
    }

    /// Get the connection string for manual client creation
    pub fn connection_string(&self) -> &str {
        &self.connection_string
    }
}

impl Default for TestRedis {
    fn default() -> Self {
        Self::new()
    }
}

// Container is automatically cleaned up when TestRedis is dropped
impl Drop for TestRedis {
    fn drop(&mut self) {
        tracing::debug!("Cleaning up test Redis container");
    }
}

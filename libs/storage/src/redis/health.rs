use tracing::debug;

use super::pool::ClientHandle;
use crate::common::{StorageError, StorageResult};

/// Check Redis health
///
/// Executes a single `PING` against the pool, without retrying. This is the
/// liveness check run while constructing a client.
///
/// # Returns
/// * `Ok(())` if Redis answered `PONG`
/// * `Err(StorageError)` otherwise
pub fn check_health(client: &ClientHandle) -> StorageResult<()> {
    client.in_scope(|| debug!("Running Redis health check"));

    let response: String = client.query_once(&redis::cmd("PING"))?;

    if response != "PONG" {
        return Err(StorageError::UnexpectedResponse(format!(
            "Redis PING returned unexpected response: {}",
            response
        )));
    }

    client.in_scope(|| debug!("Redis health check passed"));
    Ok(())
}

/// Health check result for detailed status reporting
#[derive(Debug, Clone)]
pub struct HealthStatus {
    /// Whether Redis is healthy
    pub healthy: bool,

    /// Optional error message if unhealthy
    pub message: Option<String>,

    /// Response time in milliseconds
    pub response_time_ms: u64,
}

impl HealthStatus {
    /// Create a healthy status
    pub fn healthy(response_time_ms: u64) -> Self {
        Self {
            healthy: true,
            message: None,
            response_time_ms,
        }
    }

    /// Create an unhealthy status
    pub fn unhealthy(message: String, response_time_ms: u64) -> Self {
        Self {
            healthy: false,
            message: Some(message),
            response_time_ms,
        }
    }
}

/// Check Redis health with detailed status
///
/// Returns detailed health status including response time.
///
/// # Example
/// ```ignore
/// let status = check_health_detailed(storage.connection());
/// println!("Redis healthy: {}, response time: {}ms",
///     status.healthy,
///     status.response_time_ms
/// );
/// ```
pub fn check_health_detailed(client: &ClientHandle) -> HealthStatus {
    let start = std::time::Instant::now();

    match check_health(client) {
        Ok(_) => {
            let elapsed = start.elapsed().as_millis() as u64;
            HealthStatus::healthy(elapsed)
        }
        Err(e) => {
            let elapsed = start.elapsed().as_millis() as u64;
            HealthStatus::unhealthy(e.to_string(), elapsed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::redis::config::{RedisConfig, resolve};
    use crate::redis::pool::build_pool;
    use std::time::Duration;

    #[test]
    fn test_health_status_healthy() {
        let status = HealthStatus::healthy(15);
        assert!(status.healthy);
        assert_eq!(status.response_time_ms, 15);
        assert!(status.message.is_none());
    }

    #[test]
    fn test_health_status_unhealthy() {
        let status = HealthStatus::unhealthy("connection timeout".to_string(), 5000);
        assert!(!status.healthy);
        assert_eq!(status.response_time_ms, 5000);
        assert_eq!(status.message, Some("connection timeout".to_string()));
    }

    #[test]
    fn test_check_health_detailed_unreachable() {
        let config = RedisConfig {
            dial_timeout: Duration::from_millis(200),
            pool_timeout: Duration::from_millis(500),
            pool_size: 1,
            ..RedisConfig::new("127.0.0.1:1")
        };
        let resolved = resolve(Some(config));
        let client = ClientHandle::new(build_pool(&resolved).unwrap(), &resolved, None);

        let status = check_health_detailed(&client);
        assert!(!status.healthy);
        assert!(status.message.is_some());
    }
}

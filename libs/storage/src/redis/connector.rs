use tracing::{Dispatch, debug, info, warn};

use super::config::{RedisConfig, ResolvedConfig, resolve};
use super::health::check_health;
use super::pool::{ClientHandle, build_pool};
use crate::common::{StorageError, StorageResult, with_sink};

/// Connect to Redis and return a live client handle
///
/// Builds the pool for the resolved topology, runs one liveness check and,
/// when `reset` is set, flushes the selected database. Neither step is
/// retried. A failed check is [`StorageError::Unavailable`], a failed flush is
/// [`StorageError::ResetFailed`]; the caller decides whether to abort.
///
/// Events are sent to `sink` when one is given.
///
/// # Example
/// ```ignore
/// use storage::redis::{connect, resolve, RedisConfig};
///
/// let resolved = resolve(Some(RedisConfig::new("127.0.0.1:6379")));
/// let client = connect(&resolved, None)?;
/// ```
pub fn connect(resolved: &ResolvedConfig, sink: Option<Dispatch>) -> StorageResult<ClientHandle> {
    let config = resolved.config();

    let pool = with_sink(sink.as_ref(), || {
        info!(
            topology = %resolved.topology(),
            addrs = ?config.addrs,
            database = config.database,
            "Attempting to connect to Redis"
        );

        let reserved = config.reserved_options();
        if !reserved.is_empty() {
            debug!(options = ?reserved, "Reserved Redis options are not applied");
        }

        build_pool(resolved)
    })?;

    let client = ClientHandle::new(pool, resolved, sink);

    if let Err(e) = check_health(&client) {
        client.in_scope(|| warn!(error = %e, "Redis liveness check failed"));
        return Err(StorageError::Unavailable(Box::new(e)));
    }

    if config.reset {
        client.in_scope(|| warn!(database = config.database, "Flushing Redis database on start"));
        client
            .query_once::<()>(&redis::cmd("FLUSHDB"))
            .map_err(|e| StorageError::ResetFailed(Box::new(e)))?;
    }

    client.in_scope(|| info!("Successfully connected to Redis"));
    Ok(client)
}

/// Resolve a user config and connect
///
/// # Example
/// ```ignore
/// use storage::redis::{connect_from_config, RedisConfig};
///
/// let client = connect_from_config(Some(RedisConfig::new("127.0.0.1:6379")), None)?;
/// ```
///
/// With FromEnv (requires `config` feature):
/// ```ignore
/// use core_config::FromEnv;
///
/// let client = connect_from_config(Some(RedisConfig::from_env()?), None)?;
/// ```
pub fn connect_from_config(
    config: Option<RedisConfig>,
    sink: Option<Dispatch>,
) -> StorageResult<ClientHandle> {
    connect(&resolve(config), sink)
}

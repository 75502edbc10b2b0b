use std::time::Duration;

use r2d2::{ManageConnection, Pool, PooledConnection};
use redis::cluster::{ClusterClient, ClusterConnection};
use redis::{Cmd, ConnectionLike, FromRedisValue};
use tracing::{Dispatch, debug, warn};

use super::config::{ResolvedConfig, Topology};
use crate::common::{RetryConfig, StorageError, StorageResult, retry_with_backoff, with_sink};

/// Per-connection socket timeouts. `None` means wait forever.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Timeouts {
    pub dial: Option<Duration>,
    pub read: Option<Duration>,
    pub write: Option<Duration>,
}

fn non_zero(duration: Duration) -> Option<Duration> {
    (!duration.is_zero()).then_some(duration)
}

impl Timeouts {
    pub fn from_config(resolved: &ResolvedConfig) -> Self {
        let config = resolved.config();
        Self {
            dial: non_zero(config.dial_timeout),
            read: non_zero(config.read_timeout),
            write: non_zero(config.write_timeout),
        }
    }
}

enum Transport {
    Single(redis::Client),
    Cluster(ClusterClient),
    Sentinel {
        sentinels: Vec<redis::Client>,
        master_name: String,
        resolved: ResolvedConfig,
    },
}

/// One pooled connection, whichever topology produced it
pub enum Connection {
    Node(redis::Connection),
    Cluster(ClusterConnection),
}

impl Connection {
    /// Borrow the connection as a driver connection for arbitrary commands
    pub fn as_dyn(&mut self) -> &mut dyn ConnectionLike {
        match self {
            Connection::Node(conn) => conn,
            Connection::Cluster(conn) => conn,
        }
    }

    fn is_open(&self) -> bool {
        match self {
            Connection::Node(conn) => conn.is_open(),
            Connection::Cluster(conn) => conn.is_open(),
        }
    }
}

/// r2d2 connection manager for every supported topology
///
/// Sentinel-managed pools look up the current master each time a new
/// connection is opened, so a failover is picked up as connections recycle.
pub struct TransportManager {
    transport: Transport,
    timeouts: Timeouts,
}

impl TransportManager {
    /// Build the transport described by a resolved config
    pub fn new(resolved: &ResolvedConfig) -> StorageResult<Self> {
        let config = resolved.config();
        let timeouts = Timeouts::from_config(resolved);

        let transport = match resolved.topology() {
            Topology::Single => {
                let addr = config
                    .addrs
                    .first()
                    .ok_or_else(|| StorageError::ConfigError("no endpoint configured".into()))?;
                Transport::Single(open_client(&config.node_url(addr))?)
            }
            Topology::Cluster => {
                if config.database != 0 {
                    warn!(
                        database = config.database,
                        "Cluster topology only serves database 0, ignoring database index"
                    );
                }

                let urls: Vec<String> = config
                    .addrs
                    .iter()
                    .map(|addr| config.cluster_url(addr))
                    .collect();

                let mut builder = ClusterClient::builder(urls).retries(config.max_retries);
                if !config.min_retry_backoff.is_zero() {
                    builder = builder.min_retry_wait(config.min_retry_backoff.as_millis() as u64);
                }
                if !config.max_retry_backoff.is_zero() {
                    builder = builder.max_retry_wait(config.max_retry_backoff.as_millis() as u64);
                }
                if let Some(dial) = timeouts.dial {
                    builder = builder.connection_timeout(dial);
                }
                if let Some(read) = timeouts.read {
                    builder = builder.response_timeout(read);
                }
                if config.read_only {
                    builder = builder.read_from_replicas();
                }

                Transport::Cluster(builder.build().map_err(config_error)?)
            }
            Topology::SentinelFailover => {
                let master_name = config
                    .master_name()
                    .ok_or_else(|| {
                        StorageError::ConfigError(
                            "sentinel failover requires a master name".into(),
                        )
                    })?
                    .to_string();

                let sentinels = config
                    .addrs
                    .iter()
                    .map(|addr| open_client(&config.sentinel_url(addr)))
                    .collect::<StorageResult<Vec<_>>>()?;

                Transport::Sentinel {
                    sentinels,
                    master_name,
                    resolved: resolved.clone(),
                }
            }
        };

        Ok(Self {
            transport,
            timeouts,
        })
    }

    fn open(&self, client: &redis::Client) -> StorageResult<redis::Connection> {
        let conn = match self.timeouts.dial {
            Some(timeout) => client.get_connection_with_timeout(timeout)?,
            None => client.get_connection()?,
        };
        conn.set_read_timeout(self.timeouts.read)?;
        conn.set_write_timeout(self.timeouts.write)?;
        Ok(conn)
    }

    /// Ask the sentinels, in order, where the master currently lives
    fn master_client(
        &self,
        sentinels: &[redis::Client],
        master_name: &str,
        resolved: &ResolvedConfig,
    ) -> StorageResult<redis::Client> {
        for sentinel in sentinels {
            let reply = self.open(sentinel).and_then(|mut conn| {
                redis::cmd("SENTINEL")
                    .arg("get-master-addr-by-name")
                    .arg(master_name)
                    .query::<Option<(String, u16)>>(&mut conn)
                    .map_err(StorageError::from)
            });

            match reply {
                Ok(Some((host, port))) => {
                    let addr = if host.contains(':') {
                        format!("[{}]:{}", host, port)
                    } else {
                        format!("{}:{}", host, port)
                    };
                    debug!(master = master_name, %addr, "Sentinel reported master");
                    return open_client(&resolved.config().node_url(&addr));
                }
                Ok(None) => debug!(master = master_name, "Sentinel does not know master"),
                Err(e) => debug!(error = %e, "Sentinel unreachable, trying next"),
            }
        }

        Err(StorageError::MasterNotFound(master_name.to_string()))
    }
}

fn open_client(url: &str) -> StorageResult<redis::Client> {
    redis::Client::open(url).map_err(config_error)
}

fn config_error(err: redis::RedisError) -> StorageError {
    StorageError::ConfigError(err.to_string())
}

impl ManageConnection for TransportManager {
    type Connection = Connection;
    type Error = StorageError;

    fn connect(&self) -> StorageResult<Connection> {
        match &self.transport {
            Transport::Single(client) => self.open(client).map(Connection::Node),
            Transport::Cluster(client) => Ok(Connection::Cluster(client.get_connection()?)),
            Transport::Sentinel {
                sentinels,
                master_name,
                resolved,
            } => {
                let master = self.master_client(sentinels, master_name, resolved)?;
                self.open(&master).map(Connection::Node)
            }
        }
    }

    fn is_valid(&self, conn: &mut Connection) -> StorageResult<()> {
        redis::cmd("PING")
            .query::<()>(conn.as_dyn())
            .map_err(StorageError::from)
    }

    fn has_broken(&self, conn: &mut Connection) -> bool {
        !conn.is_open()
    }
}

/// Routes pool errors (failed background connects) to tracing
#[derive(Debug)]
struct LogErrors;

impl r2d2::HandleError<StorageError> for LogErrors {
    fn handle_error(&self, error: StorageError) {
        warn!(error = %error, "Redis pool failed to open a connection");
    }
}

/// Build the connection pool for a resolved config
///
/// No connection is opened here; the first checkout dials.
pub fn build_pool(resolved: &ResolvedConfig) -> StorageResult<Pool<TransportManager>> {
    let config = resolved.config();
    let manager = TransportManager::new(resolved)?;

    let max_size = if config.pool_size == 0 {
        super::config::default_pool_size()
    } else {
        config.pool_size
    };

    let min_idle = if config.min_idle_conns > max_size {
        warn!(
            min_idle = config.min_idle_conns,
            max_size, "min_idle_conns exceeds pool size, clamping"
        );
        max_size
    } else {
        config.min_idle_conns
    };

    let mut builder = Pool::builder()
        .max_size(max_size)
        .min_idle(Some(min_idle))
        .max_lifetime(non_zero(config.max_conn_age))
        .idle_timeout(non_zero(config.idle_timeout))
        .test_on_check_out(false)
        .error_handler(Box::new(LogErrors));
    if let Some(timeout) = non_zero(config.pool_timeout) {
        builder = builder.connection_timeout(timeout);
    }

    Ok(builder.build_unchecked(manager))
}

/// Shared, thread-safe handle to the connection pool
///
/// Every command checks a connection out, performs one round trip and hands
/// it back. The handle is owned by the [`RedisStorage`](super::RedisStorage)
/// that created it.
pub struct ClientHandle {
    pool: Pool<TransportManager>,
    topology: Topology,
    retry: RetryConfig,
    sink: Option<Dispatch>,
}

/// Snapshot of the pool
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PoolState {
    /// Open connections, idle or checked out
    pub connections: u32,
    /// Connections waiting in the pool
    pub idle_connections: u32,
}

impl ClientHandle {
    pub(crate) fn new(
        pool: Pool<TransportManager>,
        resolved: &ResolvedConfig,
        sink: Option<Dispatch>,
    ) -> Self {
        let config = resolved.config();

        // The cluster client retries on its own.
        let retry = match resolved.topology() {
            Topology::Cluster => RetryConfig::new(),
            _ => RetryConfig::new()
                .with_max_retries(config.max_retries)
                .with_initial_delay(config.min_retry_backoff.as_millis() as u64)
                .with_max_delay(config.max_retry_backoff.as_millis() as u64),
        };

        Self {
            pool,
            topology: resolved.topology(),
            retry,
            sink,
        }
    }

    pub fn topology(&self) -> Topology {
        self.topology
    }

    pub fn state(&self) -> PoolState {
        let state = self.pool.state();
        PoolState {
            connections: state.connections,
            idle_connections: state.idle_connections,
        }
    }

    /// Check a raw connection out of the pool
    ///
    /// # Example
    /// ```ignore
    /// let mut conn = storage.connection().connection()?;
    /// let info: String = redis::cmd("INFO").query(conn.as_dyn())?;
    /// ```
    pub fn connection(&self) -> StorageResult<PooledConnection<TransportManager>> {
        Ok(self.pool.get()?)
    }

    /// Run `f` with the injected log sink, if any, as the default dispatcher
    pub(crate) fn in_scope<R>(&self, f: impl FnOnce() -> R) -> R {
        with_sink(self.sink.as_ref(), f)
    }

    /// Run one command, retrying transient failures per the retry settings
    ///
    /// Only for idempotent commands. A timeout can arrive after the server
    /// applied the command, so a retried INCR or LPUSH would apply twice.
    /// Use [`query_once`](Self::query_once) for those.
    pub fn query<T: FromRedisValue>(&self, cmd: &Cmd) -> StorageResult<T> {
        self.in_scope(|| {
            retry_with_backoff(|| self.round_trip(cmd), &self.retry, StorageError::is_transient)
                .inspect_err(|err| debug!(error = %err, "Redis command failed"))
        })
    }

    /// Run one command exactly once
    pub fn query_once<T: FromRedisValue>(&self, cmd: &Cmd) -> StorageResult<T> {
        self.in_scope(|| {
            self.round_trip(cmd)
                .inspect_err(|err| debug!(error = %err, "Redis command failed"))
        })
    }

    fn round_trip<T: FromRedisValue>(&self, cmd: &Cmd) -> StorageResult<T> {
        let mut conn = self.pool.get()?;
        Ok(cmd.query(conn.as_dyn())?)
    }
}

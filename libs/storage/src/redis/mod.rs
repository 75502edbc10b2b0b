//! Redis storage
//!
//! [`RedisStorage`] is the byte-oriented cache facade; [`RedisStorage::commands`]
//! exposes the typed command set over the same pool.

mod commands;
mod config;
mod connector;
mod health;
mod pool;
mod storage;
mod types;

pub use commands::RedisCommands;
pub use config::{
    DEFAULT_ADDR, RedisConfig, ResolvedConfig, TlsConfig, Topology, default_pool_size, resolve,
};
pub use connector::{connect, connect_from_config};
pub use health::{HealthStatus, check_health, check_health_detailed};
pub use pool::{ClientHandle, Connection, PoolState, Timeouts, TransportManager, build_pool};
pub use storage::RedisStorage;
pub use types::{GeoLocation, GeoRadiusQuery, GeoSort, GeoUnit, ScoreRange, ScoredMember};

// Re-export redis types for convenience
pub use redis::{Cmd, FromRedisValue, RedisError, ToRedisArgs, Value};

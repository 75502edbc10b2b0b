use crate::Environment;
use tracing::Dispatch;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{EnvFilter, Layer, Registry, prelude::*};

/// Build a tracing sink with environment-aware formatting and error span capture.
///
/// The result is not installed anywhere. Hand it to a component that accepts
/// an injected logger, or install it with `tracing::dispatcher::set_global_default`.
///
/// - **Production** (`APP_ENV=production`):
///   - JSON format (for log aggregation tools like ELK, Datadog, CloudWatch)
///   - Defaults to `warn`
///
/// - **Development** (default):
///   - Pretty-printed format (human-readable)
///   - Defaults to `debug`
///
/// Both include `tracing_error::ErrorLayer`, so errors can carry span traces.
///
/// Environment variables:
/// - `RUST_LOG`: Override log levels (e.g., "debug", "storage=trace")
///
/// # Example
///
/// ```ignore
/// use core_config::{Environment, tracing::build_dispatch};
/// use storage::redis::{RedisConfig, RedisStorage};
///
/// let logger = build_dispatch(&Environment::from_env());
/// let storage = RedisStorage::with_logger(Some(RedisConfig::defaults()), Some(logger))?;
/// ```
pub fn build_dispatch(environment: &Environment) -> Dispatch {
    dispatch_with_writer(environment, std::io::stdout)
}

fn dispatch_with_writer<W>(environment: &Environment, writer: W) -> Dispatch
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let is_production = environment.is_production();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if is_production {
            EnvFilter::new("warn")
        } else {
            EnvFilter::new("debug")
        }
    });

    let format: Box<dyn Layer<Registry> + Send + Sync> = if is_production {
        tracing_subscriber::fmt::layer()
            .with_writer(writer)
            .json()
            .with_target(false) // Hide module paths in production
            .flatten_event(true)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_writer(writer)
            .with_ansi(false)
            .with_target(true)
            .with_file(false)
            .with_line_number(false)
            .pretty()
            .boxed()
    };

    let subscriber = tracing_subscriber::registry()
        .with(format)
        .with(tracing_error::ErrorLayer::default()) // Capture span traces on errors
        .with(filter);

    Dispatch::new(subscriber)
}

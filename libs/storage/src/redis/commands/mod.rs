//! Typed command facade
//!
//! Each command is implemented once, returning `StorageResult`. Where a plain
//! variant exists next to a `*_with_err` one, the plain variant only collapses
//! the error channel: to `false` for writes, to the zero value for reads.
//! Failures swallowed that way are still logged at debug level by the client
//! handle.
//!
//! Reads of absent keys return the zero value (`""`, empty collection, `0`)
//! unless the command documents that it reports [`StorageError::NotFound`].
//!
//! [`StorageError::NotFound`]: crate::common::StorageError::NotFound

mod geo;
mod hashes;
mod lists;
mod sets;
mod sorted_sets;
mod strings;

use std::collections::HashMap;

use redis::{Cmd, FromRedisValue};

use super::pool::ClientHandle;
use crate::common::StorageResult;

/// Command view over the client handle of a [`RedisStorage`](super::RedisStorage)
///
/// Holds no state of its own; it shares the storage's pool.
///
/// # Example
/// ```ignore
/// let commands = storage.commands();
/// commands.incr("visits");
/// let top = commands.zrevrange_with_scores("leaderboard", 0, 9)?;
/// ```
#[derive(Clone, Copy)]
pub struct RedisCommands<'a> {
    client: &'a ClientHandle,
}

impl<'a> RedisCommands<'a> {
    pub(crate) fn new(client: &'a ClientHandle) -> Self {
        Self { client }
    }

    fn query<T: FromRedisValue>(&self, cmd: &Cmd) -> StorageResult<T> {
        self.client.query(cmd)
    }

    /// For commands that change state relative to what is stored (counters,
    /// pushes, pops). A timed-out attempt may already have been applied.
    fn query_once<T: FromRedisValue>(&self, cmd: &Cmd) -> StorageResult<T> {
        self.client.query_once(cmd)
    }
}

/// Replace absent entries with empty strings, keeping every position
fn fill_absent(values: Vec<Option<String>>) -> Vec<String> {
    values.into_iter().map(Option::unwrap_or_default).collect()
}

/// Pair requested fields with their positional replies
fn zip_fields(fields: &[&str], values: Vec<Option<String>>) -> HashMap<String, String> {
    fields
        .iter()
        .map(|field| field.to_string())
        .zip(fill_absent(values))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::io::{Read, Write};
    use std::net::{TcpListener, TcpStream};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use super::*;
    use crate::common::StorageError;
    use crate::redis::config::{RedisConfig, resolve};
    use crate::redis::pool::build_pool;

    /// Fake server that answers `+OK` to every command and hangs up without a
    /// reply whenever it receives `command`. Returns its address and a hit counter.
    fn hang_up_on(command: &'static str) -> (String, Arc<AtomicUsize>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        let hits = Arc::new(AtomicUsize::new(0));

        let counter = hits.clone();
        std::thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                let counter = counter.clone();
                std::thread::spawn(move || serve(stream, command, &counter));
            }
        });
        (addr, hits)
    }

    fn serve(mut stream: TcpStream, command: &str, hits: &AtomicUsize) {
        let needle = format!("${}\r\n{}\r\n", command.len(), command);
        let mut buf = [0u8; 4096];
        loop {
            let n = match stream.read(&mut buf) {
                Ok(0) | Err(_) => return,
                Ok(n) => n,
            };
            let chunk = String::from_utf8_lossy(&buf[..n]);
            if chunk.contains(&needle) {
                hits.fetch_add(1, Ordering::SeqCst);
                return;
            }
            let frames = chunk.split("\r\n").filter(|line| line.starts_with('*')).count();
            if stream.write_all("+OK\r\n".repeat(frames).as_bytes()).is_err() {
                return;
            }
        }
    }

    fn retrying_client(addr: String) -> ClientHandle {
        let config = RedisConfig {
            pool_size: 1,
            max_retries: 2,
            min_retry_backoff: Duration::from_millis(1),
            max_retry_backoff: Duration::from_millis(2),
            dial_timeout: Duration::from_millis(500),
            read_timeout: Duration::from_millis(500),
            ..RedisConfig::new(addr)
        };
        let resolved = resolve(Some(config));
        ClientHandle::new(build_pool(&resolved).unwrap(), &resolved, None)
    }

    #[test]
    fn test_incr_is_sent_once_when_connection_drops() {
        let (addr, hits) = hang_up_on("INCR");
        let client = retrying_client(addr);

        let result = RedisCommands::new(&client).incr_with_err("counter");

        assert!(matches!(result, Err(StorageError::Redis(_))));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_idempotent_read_is_retried_when_connection_drops() {
        let (addr, hits) = hang_up_on("GET");
        let client = retrying_client(addr);

        let result = RedisCommands::new(&client).get_with_err("counter");

        assert!(result.is_err());
        assert!(hits.load(Ordering::SeqCst) > 1);
    }

    #[test]
    fn test_fill_absent_preserves_positions() {
        let values = vec![Some("a".to_string()), None, Some("c".to_string()), None];
        assert_eq!(fill_absent(values), vec!["a", "", "c", ""]);
    }

    #[test]
    fn test_zip_fields_maps_absent_to_empty() {
        let map = zip_fields(&["name", "age"], vec![Some("ada".to_string()), None]);
        assert_eq!(map.len(), 2);
        assert_eq!(map["name"], "ada");
        assert_eq!(map["age"], "");
    }

    #[test]
    fn test_zip_fields_duplicate_field_keeps_one_entry() {
        let map = zip_fields(
            &["name", "name"],
            vec![Some("ada".to_string()), Some("ada".to_string())],
        );
        assert_eq!(map.len(), 1);
    }
}

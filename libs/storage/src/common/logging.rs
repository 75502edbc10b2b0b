use tracing::Dispatch;

/// Run `f` with `sink` as the default dispatcher for the current thread
///
/// Without a sink, events go wherever the process-wide subscriber sends them.
/// The global default is never replaced.
pub fn with_sink<R>(sink: Option<&Dispatch>, f: impl FnOnce() -> R) -> R {
    match sink {
        Some(dispatch) => tracing::dispatcher::with_default(dispatch, f),
        None => f(),
    }
}

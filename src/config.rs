//! Traversal configuration.
//!
//! A [`TraversalConfig`] can be built in code, deserialized (missing fields take
//! their defaults) or overlaid from `PARWALK_*` environment variables.

use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TraversalError};

/// Default number of frontier nodes a BFS worker claims at once.
pub const DEFAULT_CHUNK_SIZE: usize = 64;

/// Default stack size for DFS task threads and pool workers.
pub const DEFAULT_STACK_SIZE: usize = 8 * 1024 * 1024;

/// Smallest accepted stack size.
pub const MIN_STACK_SIZE: usize = 64 * 1024;

/// Default DFS task permits per worker thread.
pub(crate) const TASKS_PER_THREAD: usize = 4;

/// Environment variable overriding [`TraversalConfig::threads`].
pub const ENV_THREADS: &str = "PARWALK_THREADS";
/// Environment variable overriding [`TraversalConfig::chunk_size`].
pub const ENV_CHUNK_SIZE: &str = "PARWALK_CHUNK_SIZE";
/// Environment variable overriding [`TraversalConfig::max_tasks`].
pub const ENV_MAX_TASKS: &str = "PARWALK_MAX_TASKS";
/// Environment variable overriding [`TraversalConfig::stack_size`].
pub const ENV_STACK_SIZE: &str = "PARWALK_STACK_SIZE";

/// Knobs shared by both traversal engines.
///
/// | Field | Used by |
/// |-------|---------|
/// | `threads` | BFS worker count, rayon pool size |
/// | `chunk_size` | BFS frontier chunking |
/// | `max_tasks` | DFS cap on concurrently spawned tasks |
/// | `stack_size` | DFS task threads, rayon workers |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraversalConfig {
    /// Number of worker threads.
    pub threads: usize,
    /// Frontier nodes claimed per worker step.
    pub chunk_size: usize,
    /// Upper bound on DFS tasks running on their own thread. `0` runs DFS inline.
    pub max_tasks: usize,
    /// Stack size in bytes for spawned threads.
    pub stack_size: usize,
}

impl Default for TraversalConfig {
    fn default() -> Self {
        let threads = std::thread::available_parallelism()
            .map(NonZeroUsize::get)
            .unwrap_or(1);
        Self {
            threads,
            chunk_size: DEFAULT_CHUNK_SIZE,
            max_tasks: threads * TASKS_PER_THREAD,
            stack_size: DEFAULT_STACK_SIZE,
        }
    }
}

impl TraversalConfig {
    /// Creates the default configuration (one worker per available core).
    pub fn new() -> Self {
        Self::default()
    }

    /// A single-worker configuration: BFS on the calling thread, DFS fully inline.
    pub fn sequential() -> Self {
        Self {
            threads: 1,
            max_tasks: 0,
            ..Self::default()
        }
    }

    /// Sets the worker count.
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    /// Sets the BFS chunk size.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Sets the DFS task cap.
    pub fn with_max_tasks(mut self, max_tasks: usize) -> Self {
        self.max_tasks = max_tasks;
        self
    }

    /// Sets the stack size for spawned threads.
    pub fn with_stack_size(mut self, stack_size: usize) -> Self {
        self.stack_size = stack_size;
        self
    }

    /// Checks that every field is usable.
    pub fn validate(&self) -> Result<()> {
        if self.threads == 0 {
            return Err(TraversalError::InvalidConfig("threads must be > 0".into()));
        }
        if self.chunk_size == 0 {
            return Err(TraversalError::InvalidConfig(
                "chunk_size must be > 0".into(),
            ));
        }
        if self.stack_size < MIN_STACK_SIZE {
            return Err(TraversalError::InvalidConfig(format!(
                "stack_size must be at least {MIN_STACK_SIZE} bytes, got {}",
                self.stack_size
            )));
        }
        Ok(())
    }

    /// Default configuration overlaid with `PARWALK_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::default().overlay(|key| std::env::var(key).ok())
    }

    /// Overlays values produced by `lookup` (keyed by the `ENV_*` names) onto `self`.
    pub fn overlay(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let parse = |key: &str| -> Result<Option<usize>> {
            match lookup(key) {
                None => Ok(None),
                Some(raw) => raw.trim().parse::<usize>().map(Some).map_err(|e| {
                    TraversalError::InvalidConfig(format!("{key}={raw:?}: {e}"))
                }),
            }
        };

        if let Some(threads) = parse(ENV_THREADS)? {
            self.threads = threads;
        }
        if let Some(chunk_size) = parse(ENV_CHUNK_SIZE)? {
            self.chunk_size = chunk_size;
        }
        if let Some(max_tasks) = parse(ENV_MAX_TASKS)? {
            self.max_tasks = max_tasks;
        }
        if let Some(stack_size) = parse(ENV_STACK_SIZE)? {
            self.stack_size = stack_size;
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn default_is_valid() {
        let cfg = TraversalConfig::default();
        assert!(cfg.threads >= 1);
        assert_eq!(cfg.max_tasks, cfg.threads * TASKS_PER_THREAD);
        cfg.validate().unwrap();
        TraversalConfig::sequential().validate().unwrap();
    }

    #[test]
    fn rejects_zero_threads_and_chunks() {
        let err = TraversalConfig::new().with_threads(0).validate().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert!(TraversalConfig::new()
            .with_chunk_size(0)
            .validate()
            .is_err());
        assert!(TraversalConfig::new()
            .with_stack_size(1024)
            .validate()
            .is_err());
        // A zero task cap is a valid "never spawn" setting.
        TraversalConfig::new().with_max_tasks(0).validate().unwrap();
    }

    #[test]
    fn deserialize_fills_defaults() {
        let cfg: TraversalConfig = serde_json::from_str(r#"{ "threads": 3 }"#).unwrap();
        assert_eq!(cfg.threads, 3);
        assert_eq!(cfg.chunk_size, DEFAULT_CHUNK_SIZE);
        assert_eq!(cfg.stack_size, DEFAULT_STACK_SIZE);
    }

    #[test]
    fn overlay_reads_lookup() {
        let cfg = TraversalConfig::sequential()
            .overlay(|key| match key {
                ENV_THREADS => Some("6".into()),
                ENV_MAX_TASKS => Some(" 12 ".into()),
                _ => None,
            })
            .unwrap();
        assert_eq!(cfg.threads, 6);
        assert_eq!(cfg.max_tasks, 12);
        assert_eq!(cfg.chunk_size, DEFAULT_CHUNK_SIZE);

        let err = TraversalConfig::new()
            .overlay(|key| (key == ENV_CHUNK_SIZE).then(|| "lots".to_string()))
            .unwrap_err();
        assert!(matches!(err, TraversalError::InvalidConfig(_)));
    }
}

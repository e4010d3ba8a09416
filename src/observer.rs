//! Diagnostic observers for resolution traceability.
//!
//! Hooks for observing resolution events: what identifier is being
//! resolved, how long it took, and how it failed. Observers are called
//! synchronously during resolution, so implementations should stay
//! lightweight.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::error::ContainerError;

/// Observer trait for container resolution events.
///
/// # Examples
///
/// ```rust
/// use latchkey::{ContainerError, ContainerObserver};
/// use std::time::Duration;
///
/// struct TracingObserver;
///
/// impl ContainerObserver for TracingObserver {
///     fn resolving(&self, id: &str) {
///         println!("resolving: {}", id);
///     }
///     fn resolved(&self, id: &str, duration: Duration) {
///         println!("resolved {} in {:?}", id, duration);
///     }
///     fn failed(&self, id: &str, error: &ContainerError) {
///         eprintln!("failed {}: {}", id, error);
///     }
/// }
/// ```
pub trait ContainerObserver: Send + Sync {
    /// A resolution request entered the engine (cache misses only).
    fn resolving(&self, id: &str);

    /// A resolution request completed successfully.
    fn resolved(&self, id: &str, duration: Duration);

    /// A resolution request failed.
    fn failed(&self, id: &str, error: &ContainerError);
}

/// Fan-out over all installed observers.
#[derive(Default, Clone)]
pub(crate) struct Observers {
    observers: Vec<Arc<dyn ContainerObserver>>,
}

impl Observers {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add(&mut self, observer: Arc<dyn ContainerObserver>) {
        self.observers.push(observer);
    }

    /// Whether any observer is installed; the engine skips timing
    /// entirely when this is false.
    #[inline]
    pub(crate) fn has_observers(&self) -> bool {
        !self.observers.is_empty()
    }

    pub(crate) fn resolving(&self, id: &str) {
        for obs in &self.observers {
            obs.resolving(id);
        }
    }

    pub(crate) fn resolved(&self, id: &str, duration: Duration) {
        for obs in &self.observers {
            obs.resolved(id, duration);
        }
    }

    pub(crate) fn failed(&self, id: &str, error: &ContainerError) {
        for obs in &self.observers {
            obs.failed(id, error);
        }
    }
}

/// Observer that prints resolution events to stderr.
///
/// # Examples
///
/// ```rust
/// use latchkey::{ContainerBuilder, LoggingObserver};
/// use std::sync::Arc;
///
/// let mut builder = ContainerBuilder::new();
/// builder.observer(Arc::new(LoggingObserver::with_prefix("di")));
/// let container = builder.build();
/// let _ = container.get("missing"); // logs the failure
/// ```
pub struct LoggingObserver {
    prefix: String,
}

impl LoggingObserver {
    /// Creates a logging observer with the default prefix.
    pub fn new() -> Self {
        Self::with_prefix("latchkey")
    }

    /// Creates a logging observer with a custom prefix.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl Default for LoggingObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl ContainerObserver for LoggingObserver {
    fn resolving(&self, id: &str) {
        eprintln!("[{}] resolving: {}", self.prefix, id);
    }

    fn resolved(&self, id: &str, duration: Duration) {
        eprintln!("[{}] resolved: {} ({:?})", self.prefix, id, duration);
    }

    fn failed(&self, id: &str, error: &ContainerError) {
        eprintln!("[{}] failed: {} ({})", self.prefix, id, error);
    }
}

/// Observer that aggregates resolution counters.
///
/// # Examples
///
/// ```rust
/// use latchkey::{ContainerBuilder, MetricsObserver};
/// use std::sync::Arc;
///
/// let metrics = Arc::new(MetricsObserver::new());
/// let mut builder = ContainerBuilder::new();
/// builder.observer(metrics.clone());
/// builder.factory("svc", |_| 11u8);
/// let container = builder.build();
///
/// let _ = container.get("svc").unwrap();
/// let _ = container.get("svc").unwrap(); // cache hit, not observed
/// assert_eq!(metrics.resolution_count(), 1);
/// ```
#[derive(Default)]
pub struct MetricsObserver {
    resolutions: AtomicU64,
    failures: AtomicU64,
    total_nanos: AtomicU64,
}

impl MetricsObserver {
    /// Creates a metrics observer with zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful (non-cache-hit) resolutions observed.
    pub fn resolution_count(&self) -> u64 {
        self.resolutions.load(Ordering::Relaxed)
    }

    /// Number of failed resolutions observed.
    pub fn failure_count(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }

    /// Mean duration of successful resolutions, if any were observed.
    pub fn average_resolution_time(&self) -> Option<Duration> {
        let count = self.resolutions.load(Ordering::Relaxed);
        if count == 0 {
            return None;
        }
        Some(Duration::from_nanos(
            self.total_nanos.load(Ordering::Relaxed) / count,
        ))
    }

    /// Zeroes all counters.
    pub fn reset(&self) {
        self.resolutions.store(0, Ordering::Relaxed);
        self.failures.store(0, Ordering::Relaxed);
        self.total_nanos.store(0, Ordering::Relaxed);
    }
}

impl ContainerObserver for MetricsObserver {
    fn resolving(&self, _id: &str) {}

    fn resolved(&self, _id: &str, duration: Duration) {
        self.resolutions.fetch_add(1, Ordering::Relaxed);
        self.total_nanos
            .fetch_add(duration.as_nanos() as u64, Ordering::Relaxed);
    }

    fn failed(&self, _id: &str, _error: &ContainerError) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }
}

//! Service lifecycle definitions.

/// Service lifecycles controlling instance caching behavior
///
/// Defines whether the container caches a resolved instance for its whole
/// lifetime or re-runs the factory/auto-wiring path on every request.
///
/// # Examples
///
/// ```rust
/// use latchkey::Container;
/// use std::sync::Arc;
///
/// struct Session { id: u64 }
///
/// let container = Container::new();
/// let counter = std::sync::Mutex::new(0u64);
/// container.set_factory("session", move |_| {
///     let mut n = counter.lock().unwrap();
///     *n += 1;
///     Session { id: *n }
/// });
///
/// // Singleton is the default: one cached instance.
/// let a = container.get("session").unwrap();
/// let b = container.get("session").unwrap();
/// assert!(Arc::ptr_eq(&a, &b));
///
/// // Marking it transient re-runs the factory each time.
/// container.transient("session");
/// let c = container.get_as::<Session>("session").unwrap();
/// let d = container.get_as::<Session>("session").unwrap();
/// assert_ne!(c.id, d.id);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// Single instance, cached on first resolution until explicitly reset
    ///
    /// The first resolution writes the instance cache; every later request
    /// for the identifier returns the same value without re-invoking the
    /// factory or auto-wiring path. This is the default for every
    /// identifier not marked otherwise.
    Singleton,
    /// New instance per resolution, never cached
    ///
    /// Every request re-runs the factory or auto-wiring path. Transient
    /// identifiers never touch the instance cache, so they also survive
    /// `reset()` unchanged.
    Transient,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Lifecycle::Singleton
    }
}

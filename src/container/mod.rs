//! The container: registration surface, instance cache, and tag index.
//!
//! This module holds the [`Container`] handle and its administrative
//! operations. The resolution engine itself lives in `resolve.rs`.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, Weak};

use crate::definition::{erase_fallible, shared, Definition, FactoryFn, SharedValue};
use crate::error::{BoxError, DiResult, ResolutionError};
use crate::identifier::{id_of, Identifier};
use crate::introspect::{Introspector, NoIntrospection};
use crate::observer::Observers;
use crate::store::DefinitionStore;

mod resolve;

/// String-keyed service locator with descriptor-driven auto-wiring.
///
/// A `Container` maps identifiers to definitions (factories or pre-built
/// values), redirects abstract identifiers through bindings, caches
/// singleton resolutions, groups identifiers under tags, and falls back to
/// constructor auto-wiring for identifiers its [`Introspector`] knows how
/// to build.
///
/// Cloning the handle is cheap (`Arc` internally); all clones share one
/// registry. Mutation is allowed at runtime and invalidates the affected
/// cache entries, so overriding a definition after construction takes
/// effect on the next `get`.
///
/// # Examples
///
/// ```rust
/// use latchkey::Container;
/// use std::sync::Arc;
///
/// struct Config { url: String }
/// struct Client { config: Arc<Config> }
///
/// let container = Container::new();
/// container.set_value("config", Config { url: "https://api".into() });
/// container.set_factory("client", |c| Client {
///     config: c.get_as::<Config>("config").unwrap(),
/// });
///
/// let client = container.get_as::<Client>("client").unwrap();
/// assert_eq!(client.config.url, "https://api");
///
/// // Singleton by default: same instance on the second request.
/// let again = container.get_as::<Client>("client").unwrap();
/// assert!(Arc::ptr_eq(&client, &again));
/// ```
pub struct Container {
    pub(crate) inner: Arc<ContainerInner>,
}

pub(crate) struct ContainerInner {
    pub(crate) store: Mutex<DefinitionStore>,
    pub(crate) cache: Mutex<HashMap<Identifier, SharedValue>>,
    pub(crate) tags: Mutex<HashMap<Identifier, Vec<Identifier>>>,
    pub(crate) introspector: Box<dyn Introspector>,
    pub(crate) observers: Observers,
    /// Non-owning back-reference handed out for self-resolution. The
    /// cache holds this handle, so a strong reference here would cycle
    /// the container into itself.
    pub(crate) handle: Arc<ContainerHandle>,
}

/// Weak handle to a container, cached under the container's own
/// identifiers.
///
/// Injected wherever a constructor parameter declares the container's
/// self type, and resolvable as `get("container")`. Upgrading fails only
/// once the container itself has been dropped.
///
/// # Examples
///
/// ```rust
/// use latchkey::{Container, ContainerHandle};
///
/// let container = Container::new();
/// container.set_value("port", 8080u16);
///
/// let handle = container.get_as::<ContainerHandle>(Container::SELF_ID).unwrap();
/// let revived = handle.upgrade().unwrap();
/// assert_eq!(*revived.get_as::<u16>("port").unwrap(), 8080);
/// ```
pub struct ContainerHandle {
    inner: Weak<ContainerInner>,
}

impl ContainerHandle {
    /// Upgrades to a full container handle, if the container still lives.
    pub fn upgrade(&self) -> Option<Container> {
        self.inner.upgrade().map(|inner| Container { inner })
    }
}

impl Container {
    /// Well-known identifier the container registers itself under.
    pub const SELF_ID: &'static str = "container";

    /// Creates a container with no introspection capability.
    ///
    /// Only explicit definitions and bindings resolve; auto-wiring is
    /// inert until an introspector is supplied via
    /// [`with_introspector`](Self::with_introspector) or
    /// [`ContainerBuilder`](crate::ContainerBuilder).
    pub fn new() -> Self {
        Self::with_introspector(NoIntrospection)
    }

    /// Creates a container backed by the given introspector.
    pub fn with_introspector<I: Introspector + 'static>(introspector: I) -> Self {
        Self::from_parts(Box::new(introspector), Observers::new())
    }

    pub(crate) fn from_parts(introspector: Box<dyn Introspector>, observers: Observers) -> Self {
        let inner = Arc::new_cyclic(|weak: &Weak<ContainerInner>| ContainerInner {
            store: Mutex::new(DefinitionStore::default()),
            cache: Mutex::new(HashMap::new()),
            tags: Mutex::new(HashMap::new()),
            introspector,
            observers,
            handle: Arc::new(ContainerHandle {
                inner: weak.clone(),
            }),
        });

        let container = Container { inner };
        {
            let mut cache = container.inner.cache.lock().unwrap();
            container.seed_self_entries(&mut cache);
        }
        container
    }

    /// True for the identifiers the container registers itself under.
    pub(crate) fn is_self_id(id: &str) -> bool {
        id == Self::SELF_ID || id == id_of::<Container>()
    }

    fn seed_self_entries(&self, cache: &mut HashMap<Identifier, SharedValue>) {
        let handle = self.self_handle();
        cache.insert(Self::SELF_ID.to_string(), handle.clone());
        cache.insert(id_of::<Container>().to_string(), handle);
    }

    pub(crate) fn self_handle(&self) -> SharedValue {
        self.inner.handle.clone() as SharedValue
    }

    pub(crate) fn frame_key(&self) -> usize {
        Arc::as_ptr(&self.inner) as usize
    }

    // ----- Registration -----

    /// Installs or replaces a definition.
    ///
    /// Invalidates any cached instance under `id`, and removes any binding
    /// previously installed under `id` so the new definition wins on the
    /// next `get`.
    pub fn set(&self, id: impl Into<Identifier>, definition: Definition) {
        let id = id.into();
        self.inner
            .store
            .lock()
            .unwrap()
            .set(id.clone(), definition);
        self.invalidate(&id);
    }

    /// Registers a pre-built value under an identifier.
    pub fn set_value<T: Send + Sync + 'static>(&self, id: impl Into<Identifier>, value: T) {
        self.set(id, Definition::Value(shared(value)));
    }

    /// Registers an already-shared value under an identifier.
    pub fn set_shared(&self, id: impl Into<Identifier>, value: SharedValue) {
        self.set(id, Definition::Value(value));
    }

    /// Registers a factory invoked with the container handle.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use latchkey::Container;
    ///
    /// let container = Container::new();
    /// container.set_factory("greeting", |_| "hello".to_string());
    /// assert_eq!(*container.get_as::<String>("greeting").unwrap(), "hello");
    /// ```
    pub fn set_factory<T, F>(&self, id: impl Into<Identifier>, factory: F)
    where
        T: Send + Sync + 'static,
        F: Fn(&Container) -> T + Send + Sync + 'static,
    {
        let erased: FactoryFn = Arc::new(move |c| Ok(shared(factory(c))));
        self.set(id, Definition::Factory(erased));
    }

    /// Registers a fallible factory.
    ///
    /// Container errors the factory propagates with `?` (a missing
    /// dependency, a detected cycle) surface to the caller of `get`
    /// untouched; any other error the factory fails with is wrapped as
    /// [`ResolutionError::Factory`] naming this identifier.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use latchkey::{Container, ContainerError, ResolutionError};
    ///
    /// let container = Container::new();
    /// container.set_value("port.raw", "7070".to_string());
    /// container.set_try_factory::<u16, _>("port", |c| {
    ///     let raw = c.get_as::<String>("port.raw")?;
    ///     Ok(raw.parse::<u16>()?)
    /// });
    /// assert_eq!(*container.get_as::<u16>("port").unwrap(), 7070);
    ///
    /// container.set_value("port.raw", "not-a-number".to_string());
    /// container.set_try_factory::<u16, _>("port", |c| {
    ///     let raw = c.get_as::<String>("port.raw")?;
    ///     Ok(raw.parse::<u16>()?)
    /// });
    /// match container.get("port") {
    ///     Err(ContainerError::Resolution(ResolutionError::Factory { id, .. })) => {
    ///         assert_eq!(id, "port");
    ///     }
    ///     _ => unreachable!(),
    /// }
    /// ```
    pub fn set_try_factory<T, F>(&self, id: impl Into<Identifier>, factory: F)
    where
        T: Send + Sync + 'static,
        F: Fn(&Container) -> Result<T, BoxError> + Send + Sync + 'static,
    {
        let id = id.into();
        let erased = erase_fallible(id.clone(), factory);
        self.set(id, Definition::Factory(erased));
    }

    /// Installs or replaces a binding from an abstract identifier to a
    /// concrete one; invalidates any cached instance under the abstract
    /// identifier.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use latchkey::Container;
    ///
    /// let container = Container::new();
    /// container.set_value("postgres", "pg://localhost".to_string());
    /// container.bind("database", "postgres");
    ///
    /// assert_eq!(*container.get_as::<String>("database").unwrap(), "pg://localhost");
    /// ```
    pub fn bind(&self, abstract_id: impl Into<Identifier>, concrete_id: impl Into<Identifier>) {
        let abstract_id = abstract_id.into();
        self.inner
            .store
            .lock()
            .unwrap()
            .bind(abstract_id.clone(), concrete_id.into());
        self.invalidate(&abstract_id);
    }

    /// Marks an identifier transient going forward; invalidates any
    /// cached instance under it.
    pub fn transient(&self, id: impl Into<Identifier>) {
        let id = id.into();
        self.inner.store.lock().unwrap().set_transient(id.clone());
        self.invalidate(&id);
    }

    /// Appends `id` to each named tag's list, skipping tags it is already
    /// under. Membership order is registration/discovery order.
    pub fn tag<I, S>(&self, id: &str, tags: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<Identifier>,
    {
        let mut index = self.inner.tags.lock().unwrap();
        for tag in tags {
            let members = index.entry(tag.into()).or_default();
            if !members.iter().any(|m| m == id) {
                members.push(id.to_string());
            }
        }
    }

    /// Clears the instance cache except the container's self entries.
    ///
    /// Definitions, bindings, tags, and transient flags are untouched;
    /// every non-self identifier re-resolves on its next `get`.
    pub fn reset(&self) {
        let mut cache = self.inner.cache.lock().unwrap();
        cache.clear();
        self.seed_self_entries(&mut cache);
    }

    fn invalidate(&self, id: &str) {
        self.inner.cache.lock().unwrap().remove(id);
    }

    // ----- Introspection / export -----

    /// Snapshot of the definition map, consumed by external tooling that
    /// pre-serializes resolvable factories.
    pub fn definitions(&self) -> HashMap<Identifier, Definition> {
        self.inner.store.lock().unwrap().definitions()
    }

    /// True if `id` is cached, resolves through a definition or binding
    /// chain, or names a constructible type.
    ///
    /// Mirrors the resolution engine so that `has` agrees with "`get`
    /// would not fail with `NotFound`": bindings are followed to the same
    /// identifier `get` ends up resolving, with `get`'s precedence at each
    /// hop (cache, binding, definition, constructible type). A binding
    /// loop reports `true`, because `get` fails it as circular, not as
    /// `NotFound`.
    pub fn has(&self, id: &str) -> bool {
        if self.inner.cache.lock().unwrap().contains_key(id) {
            return true;
        }

        let store = self.inner.store.lock().unwrap();
        let mut current: &str = id;
        let mut visited: Vec<&str> = Vec::new();
        loop {
            if current != id && self.inner.cache.lock().unwrap().contains_key(current) {
                return true;
            }
            if let Some(next) = store.binding(current) {
                if next.as_str() == current || visited.iter().any(|v| *v == next.as_str()) {
                    return true;
                }
                visited.push(current);
                current = next.as_str();
                continue;
            }
            if store.has_definition(current) {
                return true;
            }
            return self.inner.introspector.is_constructible(current);
        }
    }

    /// Resolves an identifier and downcasts to a concrete type.
    pub fn get_as<T: Send + Sync + 'static>(&self, id: &str) -> DiResult<Arc<T>> {
        let value = self.get(id)?;
        value.downcast::<T>().map_err(|_| {
            ResolutionError::Downcast {
                id: id.to_string(),
                expected: std::any::type_name::<T>(),
            }
            .into()
        })
    }

    /// Resolves every identifier under a tag, in registration order.
    ///
    /// Each member goes through the full resolution engine, so tagged
    /// entries still respect lifecycle and caching. An unknown tag yields
    /// an empty vec, never an error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use latchkey::Container;
    ///
    /// let container = Container::new();
    /// container.set_value("handler.auth", "auth".to_string());
    /// container.set_value("handler.audit", "audit".to_string());
    /// container.tag("handler.auth", ["handler"]);
    /// container.tag("handler.audit", ["handler"]);
    ///
    /// let handlers = container.get_tagged("handler").unwrap();
    /// assert_eq!(handlers.len(), 2);
    /// assert!(container.get_tagged("unknown").unwrap().is_empty());
    /// ```
    pub fn get_tagged(&self, tag: &str) -> DiResult<Vec<SharedValue>> {
        let members: Vec<Identifier> = self
            .inner
            .tags
            .lock()
            .unwrap()
            .get(tag)
            .cloned()
            .unwrap_or_default();

        let mut values = Vec::with_capacity(members.len());
        for id in &members {
            values.push(self.get(id)?);
        }
        Ok(values)
    }

    #[cfg(feature = "diagnostics")]
    pub fn to_debug_string(&self) -> String {
        let mut s = String::new();
        s.push_str("=== Container Debug ===\n");
        s.push_str("Definitions:\n");
        let store = self.inner.store.lock().unwrap();
        for (id, def) in store.definitions() {
            s.push_str(&format!("  {}: {:?}\n", id, def));
        }
        s.push_str("Bindings:\n");
        for (abstract_id, concrete_id) in store.bindings() {
            s.push_str(&format!("  {} -> {}\n", abstract_id, concrete_id));
        }
        drop(store);
        s.push_str("Tags:\n");
        for (tag, members) in self.inner.tags.lock().unwrap().iter() {
            s.push_str(&format!("  {}: {:?}\n", tag, members));
        }
        s.push_str(&format!(
            "Cached instances: {}\n",
            self.inner.cache.lock().unwrap().len()
        ));
        s
    }
}

impl Clone for Container {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

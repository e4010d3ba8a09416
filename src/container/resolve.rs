//! The resolution engine.
//!
//! Strict precedence per request: instance cache, binding redirect,
//! explicit definition, constructor auto-wiring, `NotFound`. Factories and
//! constructors run with no lock held; cache writes are double-checked so
//! a racing resolution keeps the first-written instance.

use std::time::Instant;

use crate::definition::{Definition, SharedValue};
use crate::error::{ContainerError, DiResult, ResolutionError};
use crate::internal::FrameGuard;
use crate::introspect::{Argument, DefaultValue, ParameterSpec};
use crate::lifecycle::Lifecycle;

use super::Container;

impl Container {
    /// Resolves an identifier to a value.
    ///
    /// Fails with [`ContainerError::NotFound`] when no definition, binding,
    /// or constructible type exists for `id`, and with
    /// [`ContainerError::Resolution`] for structural failures: dependency
    /// cycles, non-constructible types, unresolvable constructor
    /// parameters, failing factories.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use latchkey::Container;
    ///
    /// let container = Container::new();
    /// container.set_value("answer", 42u32);
    ///
    /// let value = container.get("answer").unwrap();
    /// assert_eq!(*value.downcast::<u32>().unwrap(), 42);
    /// assert!(container.get("question").unwrap_err().is_not_found());
    /// ```
    pub fn get(&self, id: &str) -> DiResult<SharedValue> {
        if let Some(value) = self.cached(id) {
            return Ok(value);
        }

        let observers = &self.inner.observers;
        if observers.has_observers() {
            observers.resolving(id);
            let start = Instant::now();
            match self.resolve_uncached(id) {
                Ok(value) => {
                    observers.resolved(id, start.elapsed());
                    Ok(value)
                }
                Err(error) => {
                    observers.failed(id, &error);
                    Err(error)
                }
            }
        } else {
            self.resolve_uncached(id)
        }
    }

    fn cached(&self, id: &str) -> Option<SharedValue> {
        self.inner.cache.lock().unwrap().get(id).cloned()
    }

    fn resolve_uncached(&self, id: &str) -> DiResult<SharedValue> {
        let lookup = self.inner.store.lock().unwrap().lookup(id);

        // Binding redirect. The abstract identifier joins the frame so a
        // binding that loops back onto itself fails as circular instead of
        // recursing forever.
        if let Some(concrete) = lookup.binding {
            let guard = FrameGuard::enter(self.frame_key(), id)?;
            let value = self.get(&concrete)?;
            drop(guard);
            if !lookup.transient {
                return Ok(self.cache_insert(id, value));
            }
            return Ok(value);
        }

        if let Some(definition) = lookup.definition {
            return match definition {
                // Pre-built values cannot recurse; no cycle tracking, and
                // no cache copy since the store entry is already permanent.
                Definition::Value(value) => Ok(value),
                Definition::Factory(factory) => {
                    let guard = FrameGuard::enter(self.frame_key(), id)?;
                    let value = factory(self)?;
                    drop(guard);
                    if !lookup.transient {
                        Ok(self.cache_insert(id, value))
                    } else {
                        Ok(value)
                    }
                }
            };
        }

        if self.inner.introspector.is_constructible(id) {
            let (value, declared) = self.autowire(id)?;
            let transient = lookup.transient || declared == Some(Lifecycle::Transient);
            if !transient {
                return Ok(self.cache_insert(id, value));
            }
            return Ok(value);
        }

        Err(ContainerError::NotFound(id.to_string()))
    }

    /// Double-checked singleton cache write: the first written instance
    /// wins, so a lost race costs a duplicate construction but never two
    /// live instances under one identifier.
    fn cache_insert(&self, id: &str, value: SharedValue) -> SharedValue {
        let mut cache = self.inner.cache.lock().unwrap();
        if let Some(existing) = cache.get(id) {
            return existing.clone();
        }
        cache.insert(id.to_string(), value.clone());
        value
    }

    /// Reflectively constructs a type by resolving its constructor
    /// parameters in declared order. Returns the value together with the
    /// lifecycle the type declares about itself, which the caller consults
    /// before the cache write.
    fn autowire(&self, id: &str) -> DiResult<(SharedValue, Option<Lifecycle>)> {
        let introspector = &*self.inner.introspector;
        if !introspector.is_constructible(id) {
            return Err(ResolutionError::NotConstructible(id.to_string()).into());
        }

        let lifecycle = introspector.declared_lifecycle(id);
        let tags = introspector.declared_tags(id);
        if !tags.is_empty() {
            self.tag(id, tags);
        }

        // The type joins the frame itself: it can be reached both as an
        // explicit definition target and as a dependency of another type,
        // and the frame must cover both uniformly. The guard pops on every
        // exit path, so a failed branch never poisons a later attempt.
        let _guard = FrameGuard::enter(self.frame_key(), id)?;

        let params = introspector.constructor_parameters(id);
        let mut args: Vec<Argument> = Vec::with_capacity(params.len());
        for param in &params {
            args.push(self.resolve_parameter(id, param)?);
        }

        let value = introspector.construct(id, &args)?;
        Ok((value, lifecycle))
    }

    /// Ordered parameter resolution: explicit-injection override, declared
    /// service types first-match, declared default, null-if-nullable,
    /// typed failure naming the parameter and its owner.
    fn resolve_parameter(&self, owner: &str, param: &ParameterSpec) -> DiResult<Argument> {
        if let Some(target) = &param.inject {
            return Ok(Some(self.get(target)?));
        }

        for candidate in &param.declared_types {
            if Container::is_self_id(candidate) {
                return Ok(Some(self.self_handle()));
            }
            if self.has(candidate) {
                return Ok(Some(self.get(candidate)?));
            }
        }

        match &param.default {
            DefaultValue::Value(value) => return Ok(Some(value.clone())),
            DefaultValue::Null => return Ok(None),
            DefaultValue::None => {}
        }

        if param.allows_null {
            return Ok(None);
        }

        let declared = if param.declared_types.is_empty() {
            "untyped".to_string()
        } else {
            param.declared_types.join("|")
        };
        Err(ResolutionError::Parameter {
            name: param.name.clone(),
            declared,
            owner: owner.to_string(),
        }
        .into())
    }
}

//! Service definition types.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::error::{BoxError, ContainerError, DiResult, ResolutionError};
use crate::identifier::Identifier;

/// Type-erased shared value handed out by the container.
///
/// Every resolved service is an `Arc<dyn Any + Send + Sync>`; callers
/// downcast with [`Container::get_as`](crate::Container::get_as) or
/// [`SharedValue::downcast`](std::sync::Arc::downcast) when they know the
/// concrete type.
pub type SharedValue = Arc<dyn Any + Send + Sync>;

/// Factory signature: the container handle in, a type-erased value out.
pub type FactoryFn = Arc<dyn Fn(&crate::Container) -> DiResult<SharedValue> + Send + Sync>;

/// Wraps a concrete value as a [`SharedValue`].
///
/// # Examples
///
/// ```rust
/// use latchkey::shared;
///
/// let value = shared(42u32);
/// assert_eq!(*value.downcast::<u32>().unwrap(), 42);
/// ```
#[inline]
pub fn shared<T: Send + Sync + 'static>(value: T) -> SharedValue {
    Arc::new(value)
}

/// What is registered under an identifier
///
/// Either a factory invoked with the container handle, or a pre-built value
/// returned as-is. The tagged split removes any runtime is-it-callable
/// ambiguity: a registered closure is always a factory, a registered value
/// is never invoked.
///
/// # Examples
///
/// ```rust
/// use latchkey::{shared, Definition};
/// use std::sync::Arc;
///
/// let value = Definition::Value(shared("ready".to_string()));
/// assert!(!value.is_factory());
///
/// let factory = Definition::Factory(Arc::new(|_c: &latchkey::Container| {
///     Ok(latchkey::shared(1u8))
/// }));
/// assert!(factory.is_factory());
/// ```
#[derive(Clone)]
pub enum Definition {
    /// A function from the container to a value, run on (re-)resolution
    Factory(FactoryFn),
    /// A pre-built value, returned without invocation or cycle tracking
    Value(SharedValue),
}

impl Definition {
    /// True if this definition is a factory.
    pub fn is_factory(&self) -> bool {
        matches!(self, Definition::Factory(_))
    }
}

impl fmt::Debug for Definition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Definition::Factory(_) => f.write_str("Definition::Factory(..)"),
            Definition::Value(_) => f.write_str("Definition::Value(..)"),
        }
    }
}

/// Erases a fallible factory. Container errors coming back out of the
/// closure (a dependency that failed to resolve, a detected cycle) pass
/// through unchanged; anything else is the factory's own failure and is
/// wrapped as [`ResolutionError::Factory`] under the registered identifier.
pub(crate) fn erase_fallible<T, F>(id: Identifier, factory: F) -> FactoryFn
where
    T: Send + Sync + 'static,
    F: Fn(&crate::Container) -> Result<T, BoxError> + Send + Sync + 'static,
{
    Arc::new(move |c| match factory(c) {
        Ok(value) => Ok(shared(value)),
        Err(error) => Err(match error.downcast::<ContainerError>() {
            Ok(container_error) => *container_error,
            Err(other) => ResolutionError::Factory {
                id: id.clone(),
                message: other.to_string(),
            }
            .into(),
        }),
    })
}

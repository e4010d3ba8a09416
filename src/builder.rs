//! Fluent container configuration.

use std::sync::Arc;

use crate::container::Container;
use crate::definition::{erase_fallible, shared, Definition, FactoryFn, SharedValue};
use crate::error::BoxError;
use crate::identifier::Identifier;
use crate::introspect::DescriptorTable;
use crate::observer::{ContainerObserver, Observers};

/// Accumulates registrations and builds a [`Container`].
///
/// Pure data accumulation: nothing resolves until the built container's
/// first `get`. Everything the builder accepts can also be done on a live
/// container; the builder just keeps bootstrap code in one place.
///
/// # Examples
///
/// ```rust
/// use latchkey::ContainerBuilder;
///
/// struct Mailer { from: String }
///
/// let mut builder = ContainerBuilder::new();
/// builder
///     .value("mail.from", "noreply@example.com".to_string())
///     .factory("mailer", |c| Mailer {
///         from: c.get_as::<String>("mail.from").unwrap().as_ref().clone(),
///     })
///     .bind("outbound", "mailer")
///     .tag("mailer", ["service"]);
///
/// let container = builder.build();
/// let mailer = container.get_as::<Mailer>("outbound").unwrap();
/// assert_eq!(mailer.from, "noreply@example.com");
/// ```
#[derive(Default)]
pub struct ContainerBuilder {
    definitions: Vec<(Identifier, Definition)>,
    bindings: Vec<(Identifier, Identifier)>,
    tags: Vec<(Identifier, Vec<Identifier>)>,
    transients: Vec<Identifier>,
    types: Option<DescriptorTable>,
    observers: Observers,
}

impl ContainerBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a raw definition.
    pub fn set(&mut self, id: impl Into<Identifier>, definition: Definition) -> &mut Self {
        self.definitions.push((id.into(), definition));
        self
    }

    /// Registers a pre-built value.
    pub fn value<T: Send + Sync + 'static>(
        &mut self,
        id: impl Into<Identifier>,
        value: T,
    ) -> &mut Self {
        self.set(id, Definition::Value(shared(value)))
    }

    /// Registers an already-shared value.
    pub fn shared(&mut self, id: impl Into<Identifier>, value: SharedValue) -> &mut Self {
        self.set(id, Definition::Value(value))
    }

    /// Registers a factory invoked with the container handle.
    pub fn factory<T, F>(&mut self, id: impl Into<Identifier>, factory: F) -> &mut Self
    where
        T: Send + Sync + 'static,
        F: Fn(&Container) -> T + Send + Sync + 'static,
    {
        let erased: FactoryFn = Arc::new(move |c| Ok(shared(factory(c))));
        self.set(id, Definition::Factory(erased))
    }

    /// Registers a fallible factory.
    ///
    /// Container errors propagate untouched; the factory's own errors are
    /// wrapped as [`ResolutionError::Factory`](crate::ResolutionError::Factory),
    /// as with [`Container::set_try_factory`].
    pub fn try_factory<T, F>(&mut self, id: impl Into<Identifier>, factory: F) -> &mut Self
    where
        T: Send + Sync + 'static,
        F: Fn(&Container) -> Result<T, BoxError> + Send + Sync + 'static,
    {
        let id = id.into();
        let erased = erase_fallible(id.clone(), factory);
        self.set(id, Definition::Factory(erased))
    }

    /// Binds an abstract identifier to a concrete one.
    pub fn bind(
        &mut self,
        abstract_id: impl Into<Identifier>,
        concrete_id: impl Into<Identifier>,
    ) -> &mut Self {
        self.bindings.push((abstract_id.into(), concrete_id.into()));
        self
    }

    /// Tags an identifier.
    pub fn tag<I, S>(&mut self, id: impl Into<Identifier>, tags: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Identifier>,
    {
        self.tags
            .push((id.into(), tags.into_iter().map(Into::into).collect()));
        self
    }

    /// Marks an identifier transient.
    pub fn transient(&mut self, id: impl Into<Identifier>) -> &mut Self {
        self.transients.push(id.into());
        self
    }

    /// Supplies the declaration table backing auto-wiring.
    pub fn types(&mut self, types: DescriptorTable) -> &mut Self {
        self.types = Some(types);
        self
    }

    /// Installs a resolution observer.
    pub fn observer(&mut self, observer: Arc<dyn ContainerObserver>) -> &mut Self {
        self.observers.add(observer);
        self
    }

    /// Builds the container, applying all accumulated registrations in
    /// the order they were added.
    pub fn build(self) -> Container {
        let container = match self.types {
            Some(types) => Container::from_parts(Box::new(types), self.observers),
            None => Container::from_parts(
                Box::new(crate::introspect::NoIntrospection),
                self.observers,
            ),
        };

        for (id, definition) in self.definitions {
            container.set(id, definition);
        }
        for (abstract_id, concrete_id) in self.bindings {
            container.bind(abstract_id, concrete_id);
        }
        for (id, tags) in self.tags {
            container.tag(&id, tags);
        }
        for id in self.transients {
            container.transient(id);
        }

        container
    }
}

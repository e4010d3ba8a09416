//! # latchkey
//!
//! String-keyed dependency injection service locator for Rust with
//! descriptor-driven auto-wiring.
//!
//! ## Features
//!
//! - **String identifiers**: services key on opaque strings, so aliases,
//!   interface names, and generated identifiers all share one namespace
//! - **Lifecycles**: Singleton (cached, the default) and Transient services
//! - **Bindings**: redirect an abstract identifier to a concrete one
//! - **Auto-wiring**: constructor-based wiring from a declaration table,
//!   with ordered parameter inference, defaults, and nullable fallbacks
//! - **Circular dependency detection**: detailed error paths, no poisoned
//!   state after a failed attempt
//! - **Tags**: group identifiers and resolve a whole group in order
//! - **Runtime overrides**: `set`/`bind` after construction invalidate the
//!   affected cache entries and win on the next `get`
//!
//! ## Quick Start
//!
//! ```rust
//! use latchkey::Container;
//! use std::sync::Arc;
//!
//! struct Database {
//!     connection_string: String,
//! }
//!
//! struct UserService {
//!     db: Arc<Database>,
//! }
//!
//! let container = Container::new();
//! container.set_value("database", Database {
//!     connection_string: "postgres://localhost".to_string(),
//! });
//! container.set_factory("user_service", |c| UserService {
//!     db: c.get_as::<Database>("database").unwrap(),
//! });
//!
//! let users = container.get_as::<UserService>("user_service").unwrap();
//! assert_eq!(users.db.connection_string, "postgres://localhost");
//! ```
//!
//! ## Auto-Wiring
//!
//! Rust has no runtime reflection, so constructible types are declared once
//! in a [`DescriptorTable`] and the engine wires them on demand:
//!
//! ```rust
//! use latchkey::{argument, Container, DescriptorTable, ParameterSpec, TypeDescriptor};
//! use std::sync::Arc;
//!
//! struct Clock;
//! struct Scheduler {
//!     clock: Arc<Clock>,
//! }
//!
//! let mut types = DescriptorTable::new();
//! types.declare("Clock", TypeDescriptor::new(|_| Clock));
//! types.declare(
//!     "Scheduler",
//!     TypeDescriptor::new(|args| Scheduler {
//!         clock: argument::<Clock>(args, 0).expect("clock"),
//!     })
//!     .param(ParameterSpec::service("clock", "Clock")),
//! );
//!
//! let container = Container::with_introspector(types);
//! let scheduler = container.get_as::<Scheduler>("Scheduler").unwrap();
//! let again = container.get_as::<Scheduler>("Scheduler").unwrap();
//! assert!(Arc::ptr_eq(&scheduler, &again)); // singleton by default
//! ```
//!
//! ## Bindings and Tags
//!
//! ```rust
//! use latchkey::Container;
//!
//! let container = Container::new();
//! container.set_value("cache.memory", "memory".to_string());
//! container.set_value("cache.redis", "redis".to_string());
//! container.bind("cache", "cache.redis");
//! container.tag("cache.memory", ["cache-backend"]);
//! container.tag("cache.redis", ["cache-backend"]);
//!
//! assert_eq!(*container.get_as::<String>("cache").unwrap(), "redis");
//! assert_eq!(container.get_tagged("cache-backend").unwrap().len(), 2);
//! ```

// Module declarations
pub mod builder;
pub mod container;
pub mod definition;
pub mod error;
pub mod identifier;
pub mod introspect;
pub mod lifecycle;
pub mod observer;

#[cfg(feature = "export")]
pub mod manifest;

// Internal modules
mod internal;
mod store;

// Re-export core types
pub use builder::ContainerBuilder;
pub use container::{Container, ContainerHandle};
pub use definition::{shared, Definition, FactoryFn, SharedValue};
pub use error::{BoxError, ContainerError, DiResult, ResolutionError};
pub use identifier::{id_of, Identifier};
pub use introspect::{
    argument, Argument, ConstructFn, DefaultValue, DescriptorTable, Introspector,
    NoIntrospection, ParameterSpec, TypeDescriptor,
};
pub use lifecycle::Lifecycle;
pub use observer::{ContainerObserver, LoggingObserver, MetricsObserver};

#[cfg(feature = "export")]
pub use manifest::{ContainerManifest, DefinitionKind, ManifestEntry};

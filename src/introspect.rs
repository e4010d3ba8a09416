//! Constructor introspection capability.
//!
//! The resolution engine does not know how to build concrete types on its
//! own; it asks an [`Introspector`] whether an identifier is constructible,
//! what its ordered constructor parameters look like, what lifecycle and
//! tags the type declares, and finally hands back a positional argument
//! list for instantiation. Rust has no runtime reflection, so the shipped
//! adapter is a declaration table ([`DescriptorTable`]) the host populates
//! with one [`TypeDescriptor`] per constructible type, typically from
//! bootstrap code or a build-time generation step.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::definition::{shared, SharedValue};
use crate::error::{DiResult, ResolutionError};
use crate::identifier::{id_of, Identifier};
use crate::lifecycle::Lifecycle;

/// One resolved constructor argument; `None` is the null/absence value.
pub type Argument = Option<SharedValue>;

/// Constructor signature: positional arguments in, a type-erased value out.
pub type ConstructFn = Arc<dyn Fn(&[Argument]) -> DiResult<SharedValue> + Send + Sync>;

/// Declared default for a constructor parameter.
#[derive(Clone)]
pub enum DefaultValue {
    /// No default declared; the parameter is required unless nullable
    None,
    /// The stated default is null
    Null,
    /// A concrete default value, used verbatim
    Value(SharedValue),
}

impl fmt::Debug for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefaultValue::None => f.write_str("DefaultValue::None"),
            DefaultValue::Null => f.write_str("DefaultValue::Null"),
            DefaultValue::Value(_) => f.write_str("DefaultValue::Value(..)"),
        }
    }
}

/// Descriptor for one constructor parameter
///
/// Carries everything the parameter resolution rule needs: the declared
/// service type candidates in declaration order, default-value presence,
/// nullability, and an optional explicit-injection target that bypasses
/// type inference entirely.
///
/// `declared_types` lists *resolvable service identifiers* only. Scalar
/// parameters (numbers, strings, flags) are expressed through a default or
/// an explicit injection target instead of a type candidate.
///
/// # Examples
///
/// ```rust
/// use latchkey::ParameterSpec;
///
/// // A required service dependency.
/// let db = ParameterSpec::service("db", "Database");
///
/// // Accepts either of two service types, first match wins.
/// let log = ParameterSpec::service("log", "FileLogger").or_type("ConsoleLogger");
///
/// // A scalar with a default.
/// let retries = ParameterSpec::value("retries").default_to(3u32);
///
/// // Wired to a specific identifier regardless of type.
/// let replica = ParameterSpec::service("replica", "Database").inject("db.replica");
/// assert_eq!(replica.inject.as_deref(), Some("db.replica"));
/// # let _ = (db, log, retries);
/// ```
#[derive(Clone, Debug)]
pub struct ParameterSpec {
    /// Parameter name as declared, used in diagnostics
    pub name: Identifier,
    /// Candidate service types in declaration order
    pub declared_types: Vec<Identifier>,
    /// Declared default, if any
    pub default: DefaultValue,
    /// Whether the parameter accepts the absence of a value
    pub allows_null: bool,
    /// Explicit-injection target overriding type inference
    pub inject: Option<Identifier>,
}

impl ParameterSpec {
    /// Parameter with a single declared service type.
    pub fn service(name: impl Into<Identifier>, declared: impl Into<Identifier>) -> Self {
        Self {
            name: name.into(),
            declared_types: vec![declared.into()],
            default: DefaultValue::None,
            allows_null: false,
            inject: None,
        }
    }

    /// Parameter with no declared service type (scalar or injected-only).
    pub fn value(name: impl Into<Identifier>) -> Self {
        Self {
            name: name.into(),
            declared_types: Vec::new(),
            default: DefaultValue::None,
            allows_null: false,
            inject: None,
        }
    }

    /// Appends another accepted service type; candidate order is preserved.
    pub fn or_type(mut self, declared: impl Into<Identifier>) -> Self {
        self.declared_types.push(declared.into());
        self
    }

    /// Declares a default value, used when no type candidate resolves.
    pub fn default_to<T: Send + Sync + 'static>(mut self, value: T) -> Self {
        self.default = DefaultValue::Value(shared(value));
        self
    }

    /// Declares null as the default value.
    pub fn default_null(mut self) -> Self {
        self.default = DefaultValue::Null;
        self
    }

    /// Marks the parameter as accepting the absence of a value.
    pub fn nullable(mut self) -> Self {
        self.allows_null = true;
        self
    }

    /// Wires the parameter to a specific identifier, bypassing inference.
    pub fn inject(mut self, target: impl Into<Identifier>) -> Self {
        self.inject = Some(target.into());
        self
    }
}

/// Declarative description of a constructible type
///
/// The declaration-table analog of a constructor signature: ordered
/// parameters, the lifecycle and tags the type declares about itself, and
/// the closure that instantiates it from a positional argument list.
///
/// # Examples
///
/// ```rust
/// use latchkey::{argument, ParameterSpec, TypeDescriptor};
///
/// struct Database { url: String }
/// struct UserService { db: std::sync::Arc<Database> }
///
/// let descriptor = TypeDescriptor::new(|args| UserService {
///     db: argument::<Database>(args, 0).expect("db argument"),
/// })
/// .param(ParameterSpec::service("db", "Database"))
/// .tag("repository");
///
/// assert_eq!(descriptor.parameters().len(), 1);
/// ```
#[derive(Clone)]
pub struct TypeDescriptor {
    params: Vec<ParameterSpec>,
    lifecycle: Option<Lifecycle>,
    tags: Vec<Identifier>,
    construct: ConstructFn,
}

impl TypeDescriptor {
    /// Descriptor for a type with an infallible constructor.
    pub fn new<T, F>(construct: F) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn(&[Argument]) -> T + Send + Sync + 'static,
    {
        Self {
            params: Vec::new(),
            lifecycle: None,
            tags: Vec::new(),
            construct: Arc::new(move |args| Ok(shared(construct(args)))),
        }
    }

    /// Descriptor for a type whose constructor can fail.
    pub fn new_fallible<T, F>(construct: F) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn(&[Argument]) -> DiResult<T> + Send + Sync + 'static,
    {
        Self {
            params: Vec::new(),
            lifecycle: None,
            tags: Vec::new(),
            construct: Arc::new(move |args| construct(args).map(|v| shared(v))),
        }
    }

    /// Appends a constructor parameter; declaration order is positional order.
    pub fn param(mut self, spec: ParameterSpec) -> Self {
        self.params.push(spec);
        self
    }

    /// Declares the type transient; the engine then never caches it.
    pub fn transient(mut self) -> Self {
        self.lifecycle = Some(Lifecycle::Transient);
        self
    }

    /// Declares a tag; discovered and indexed on first auto-wire.
    pub fn tag(mut self, tag: impl Into<Identifier>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// The ordered constructor parameters.
    pub fn parameters(&self) -> &[ParameterSpec] {
        &self.params
    }

    /// The declared lifecycle, if the type states one.
    pub fn lifecycle(&self) -> Option<Lifecycle> {
        self.lifecycle
    }

    /// The declared tags, in declaration order.
    pub fn tags(&self) -> &[Identifier] {
        &self.tags
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("params", &self.params)
            .field("lifecycle", &self.lifecycle)
            .field("tags", &self.tags)
            .finish_non_exhaustive()
    }
}

/// Downcasts a positional constructor argument.
///
/// Returns `None` when the argument is absent, null, or of another type.
///
/// # Examples
///
/// ```rust
/// use latchkey::{argument, shared, Argument};
///
/// let args: Vec<Argument> = vec![Some(shared(7u32)), None];
/// assert_eq!(*argument::<u32>(&args, 0).unwrap(), 7);
/// assert!(argument::<u32>(&args, 1).is_none());
/// assert!(argument::<String>(&args, 0).is_none());
/// ```
pub fn argument<T: Send + Sync + 'static>(args: &[Argument], index: usize) -> Option<Arc<T>> {
    args.get(index)
        .and_then(|a| a.clone())
        .and_then(|v| v.downcast::<T>().ok())
}

/// Capability interface the resolution engine requires from its environment
///
/// Supplies constructibility, ordered parameter descriptors, declarative
/// per-type metadata, and instantiation. Implementations must answer
/// synchronously; the engine calls them mid-resolution.
pub trait Introspector: Send + Sync {
    /// Whether the identifier names a type this introspector can construct.
    fn is_constructible(&self, id: &str) -> bool;

    /// Ordered constructor parameter descriptors; empty for no-argument
    /// constructors and for unknown identifiers.
    fn constructor_parameters(&self, id: &str) -> Vec<ParameterSpec>;

    /// Lifecycle the type declares about itself, if any.
    fn declared_lifecycle(&self, id: &str) -> Option<Lifecycle>;

    /// Tags the type declares about itself, in declaration order.
    fn declared_tags(&self, id: &str) -> Vec<Identifier>;

    /// Instantiates the type from a positional argument list.
    fn construct(&self, id: &str, args: &[Argument]) -> DiResult<SharedValue>;
}

/// Declaration-table introspector
///
/// Maps identifiers to [`TypeDescriptor`]s. This is the default adapter:
/// bootstrap code declares each constructible type once, and the engine
/// reads constructibility, parameters, metadata, and the constructor from
/// the table.
///
/// # Examples
///
/// ```rust
/// use latchkey::{Container, DescriptorTable, TypeDescriptor};
///
/// struct Clock;
///
/// let mut types = DescriptorTable::new();
/// types.declare("Clock", TypeDescriptor::new(|_| Clock));
///
/// let container = Container::with_introspector(types);
/// assert!(container.has("Clock"));
/// ```
#[derive(Default)]
pub struct DescriptorTable {
    types: HashMap<Identifier, TypeDescriptor>,
}

impl DescriptorTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares (or replaces) the descriptor for an identifier.
    pub fn declare(&mut self, id: impl Into<Identifier>, descriptor: TypeDescriptor) -> &mut Self {
        self.types.insert(id.into(), descriptor);
        self
    }

    /// Declares a descriptor under a Rust type's own name.
    pub fn declare_type<T: 'static>(&mut self, descriptor: TypeDescriptor) -> &mut Self {
        self.declare(id_of::<T>(), descriptor)
    }

    /// Looks up the descriptor for an identifier.
    pub fn describe(&self, id: &str) -> Option<&TypeDescriptor> {
        self.types.get(id)
    }

    /// Number of declared types.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// True when no types are declared.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl Introspector for DescriptorTable {
    fn is_constructible(&self, id: &str) -> bool {
        self.types.contains_key(id)
    }

    fn constructor_parameters(&self, id: &str) -> Vec<ParameterSpec> {
        self.types
            .get(id)
            .map(|d| d.params.clone())
            .unwrap_or_default()
    }

    fn declared_lifecycle(&self, id: &str) -> Option<Lifecycle> {
        self.types.get(id).and_then(|d| d.lifecycle)
    }

    fn declared_tags(&self, id: &str) -> Vec<Identifier> {
        self.types
            .get(id)
            .map(|d| d.tags.clone())
            .unwrap_or_default()
    }

    fn construct(&self, id: &str, args: &[Argument]) -> DiResult<SharedValue> {
        match self.types.get(id) {
            Some(d) => (d.construct)(args),
            None => Err(ResolutionError::NotConstructible(id.to_string()).into()),
        }
    }
}

/// Introspector that knows no types at all.
///
/// Installed when the host supplies no declaration table; auto-wiring is
/// then effectively disabled and only explicit definitions and bindings
/// resolve.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoIntrospection;

impl Introspector for NoIntrospection {
    fn is_constructible(&self, _id: &str) -> bool {
        false
    }

    fn constructor_parameters(&self, _id: &str) -> Vec<ParameterSpec> {
        Vec::new()
    }

    fn declared_lifecycle(&self, _id: &str) -> Option<Lifecycle> {
        None
    }

    fn declared_tags(&self, _id: &str) -> Vec<Identifier> {
        Vec::new()
    }

    fn construct(&self, id: &str, _args: &[Argument]) -> DiResult<SharedValue> {
        Err(ResolutionError::NotConstructible(id.to_string()).into())
    }
}

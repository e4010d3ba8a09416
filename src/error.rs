//! Error types for the service locator.

use std::fmt;

/// Container errors
///
/// Exactly two kinds of failure are surfaced to callers: the identifier has
/// no path to a value at all (`NotFound`), or the resolution process itself
/// broke down (`Resolution`). Neither is ever retried; a failure is fixed by
/// reconfiguring the container, not by calling again.
///
/// # Examples
///
/// ```rust
/// use latchkey::{Container, ContainerError};
///
/// let container = Container::new();
/// match container.get("UnknownService") {
///     Err(ContainerError::NotFound(id)) => {
///         assert_eq!(id, "UnknownService");
///         println!("Service not found: {}", id);
///     }
///     _ => unreachable!(),
/// }
/// ```
#[derive(Debug, Clone)]
pub enum ContainerError {
    /// No definition, binding, or constructible type exists for the identifier
    NotFound(String),
    /// The resolution process failed structurally
    Resolution(ResolutionError),
}

/// Structural failures during the resolution process
///
/// Everything that can go wrong *after* a resolution path was found:
/// dependency cycles, types that cannot be constructed, constructor
/// parameters with no applicable rule, factories that fail internally.
///
/// # Examples
///
/// ```rust
/// use latchkey::ResolutionError;
///
/// let circular = ResolutionError::Circular(vec!["A".into(), "B".into(), "A".into()]);
/// assert_eq!(circular.to_string(), "circular dependency: A -> B -> A");
///
/// let param = ResolutionError::Parameter {
///     name: "db".into(),
///     declared: "Database".into(),
///     owner: "UserService".into(),
/// };
/// assert!(param.to_string().contains("UserService"));
/// ```
#[derive(Debug, Clone)]
pub enum ResolutionError {
    /// Dependency cycle detected (includes the full path)
    Circular(Vec<String>),
    /// The identifier names a type the introspector cannot construct
    NotConstructible(String),
    /// No parameter rule applied for a constructor parameter
    Parameter {
        /// Parameter name as declared
        name: String,
        /// Declared service type(s), joined for display
        declared: String,
        /// The type whose constructor owns the parameter
        owner: String,
    },
    /// A fallible factory failed with an error of its own
    ///
    /// Container errors raised while the factory resolved its dependencies
    /// propagate untouched; only the factory's foreign errors are wrapped
    /// into this variant.
    Factory {
        /// Identifier whose factory failed
        id: String,
        /// Failure description reported by the factory
        message: String,
    },
    /// A resolved value was not of the requested Rust type
    Downcast {
        /// Identifier that resolved successfully
        id: String,
        /// The Rust type the caller asked for
        expected: &'static str,
    },
    /// Maximum recursion depth exceeded
    DepthExceeded(usize),
}

impl fmt::Display for ContainerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContainerError::NotFound(id) => write!(f, "service '{}' not found", id),
            ContainerError::Resolution(err) => write!(f, "{}", err),
        }
    }
}

impl fmt::Display for ResolutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolutionError::Circular(path) => {
                write!(f, "circular dependency: {}", path.join(" -> "))
            }
            ResolutionError::NotConstructible(id) => {
                write!(f, "type '{}' is not constructible", id)
            }
            ResolutionError::Parameter { name, declared, owner } => {
                write!(
                    f,
                    "cannot resolve constructor parameter '{}' ({}) for {}",
                    name, declared, owner
                )
            }
            ResolutionError::Factory { id, message } => {
                write!(f, "factory for '{}' failed: {}", id, message)
            }
            ResolutionError::Downcast { id, expected } => {
                write!(f, "service '{}' is not a {}", id, expected)
            }
            ResolutionError::DepthExceeded(depth) => write!(f, "max depth {} exceeded", depth),
        }
    }
}

impl std::error::Error for ContainerError {}
impl std::error::Error for ResolutionError {}

impl From<ResolutionError> for ContainerError {
    fn from(err: ResolutionError) -> Self {
        ContainerError::Resolution(err)
    }
}

impl ContainerError {
    /// True for the `NotFound` kind.
    ///
    /// `Container::has` is defined as "`get` would not fail with `NotFound`",
    /// so callers distinguishing absence from breakage branch on this.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ContainerError::NotFound(_))
    }
}

/// Boxed error type fallible factories fail with.
///
/// Lets a factory propagate container errors with `?` and report its own
/// failures with any error type; see
/// [`Container::set_try_factory`](crate::Container::set_try_factory) for
/// how each kind surfaces.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Result type for container operations
///
/// A convenience alias for `Result<T, ContainerError>` used throughout the
/// crate, following the common Rust pattern of a crate-specific Result type.
///
/// # Examples
///
/// ```rust
/// use latchkey::{DiResult, ContainerError};
///
/// fn lookup() -> DiResult<String> {
///     Err(ContainerError::NotFound("logger".to_string()))
/// }
///
/// assert!(lookup().unwrap_err().is_not_found());
/// ```
pub type DiResult<T> = Result<T, ContainerError>;

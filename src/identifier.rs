//! Service identifier helpers.

/// Key naming a resolvable service.
///
/// Identifiers are opaque strings. By convention they are a type's name
/// (see [`id_of`]) but any alias works; the definition store, bindings,
/// the instance cache, and the tag index all key on the same string space.
pub type Identifier = String;

/// Identifier for a Rust type, derived from its type name.
///
/// Convenient when registering Rust types under their own names so that
/// descriptor declarations and `get_as::<T>` calls agree on the key.
///
/// # Examples
///
/// ```rust
/// use latchkey::id_of;
///
/// struct Widget;
///
/// let id = id_of::<Widget>();
/// assert!(id.ends_with("Widget"));
///
/// // Stable within a build: two calls agree.
/// assert_eq!(id_of::<Widget>(), id_of::<Widget>());
/// ```
#[inline]
pub fn id_of<T: 'static>() -> &'static str {
    std::any::type_name::<T>()
}

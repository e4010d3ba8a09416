//! Definition-store manifest export.
//!
//! A serializable snapshot of the container's registration state, built
//! from the same store the [`Container::definitions`] hook exposes.
//! External tooling that pre-serializes resolvable factories consumes this
//! to know what exists without running any factory; the factories
//! themselves are code and are not serialized.

use serde::{Deserialize, Serialize};

use crate::container::Container;
use crate::definition::Definition;
use crate::identifier::Identifier;

/// The registration kind behind an identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefinitionKind {
    /// A factory function, run on resolution
    Factory,
    /// A pre-built value
    Value,
}

/// One exported registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// The registered identifier
    pub id: Identifier,
    /// Factory or pre-built value
    pub kind: DefinitionKind,
    /// Whether the identifier is flagged transient
    pub transient: bool,
}

/// Serializable snapshot of a container's registration state.
///
/// # Examples
///
/// ```rust
/// use latchkey::{Container, ContainerManifest};
///
/// let container = Container::new();
/// container.set_value("config", 1u8);
/// container.set_factory("service", |_| "svc".to_string());
/// container.bind("api", "service");
/// container.tag("service", ["boot"]);
///
/// let manifest = ContainerManifest::from_container(&container);
/// assert_eq!(manifest.entries.len(), 2);
/// assert_eq!(manifest.bindings.get("api").map(String::as_str), Some("service"));
///
/// let json = manifest.to_json().unwrap();
/// assert!(json.contains("\"service\""));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContainerManifest {
    /// Exported registrations, sorted by identifier for stable output
    pub entries: Vec<ManifestEntry>,
    /// Abstract-to-concrete bindings
    pub bindings: std::collections::HashMap<Identifier, Identifier>,
    /// Tag membership, in registration/discovery order
    pub tags: std::collections::HashMap<Identifier, Vec<Identifier>>,
    /// All identifiers flagged transient, defined or not, sorted
    pub transients: Vec<Identifier>,
}

impl ContainerManifest {
    /// Snapshots a container's registration state.
    pub fn from_container(container: &Container) -> Self {
        let store = container.inner.store.lock().unwrap();
        let mut entries: Vec<ManifestEntry> = store
            .definitions()
            .into_iter()
            .map(|(id, definition)| ManifestEntry {
                transient: store.is_transient(&id),
                kind: match definition {
                    Definition::Factory(_) => DefinitionKind::Factory,
                    Definition::Value(_) => DefinitionKind::Value,
                },
                id,
            })
            .collect();
        let bindings = store.bindings();
        let mut transients = store.transients();
        drop(store);
        entries.sort_by(|a, b| a.id.cmp(&b.id));
        transients.sort();

        let tags = container.inner.tags.lock().unwrap().clone();

        Self {
            entries,
            bindings,
            tags,
            transients,
        }
    }

    /// Serializes the manifest as pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

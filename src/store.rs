//! Definition store: the registration half of the container.

use std::collections::{HashMap, HashSet};

use crate::definition::Definition;
use crate::identifier::Identifier;

/// Pure registration data, mutated only by the container's admin operations.
///
/// Three mappings share one identifier space: explicit definitions,
/// abstract-to-concrete bindings, and transient lifecycle flags. The
/// resolution engine only reads snapshots out of here; it never holds the
/// store lock across a factory call.
#[derive(Default)]
pub(crate) struct DefinitionStore {
    definitions: HashMap<Identifier, Definition>,
    bindings: HashMap<Identifier, Identifier>,
    transients: HashSet<Identifier>,
}

/// Per-identifier snapshot the engine resolves from.
pub(crate) struct Lookup {
    pub binding: Option<Identifier>,
    pub definition: Option<Definition>,
    pub transient: bool,
}

impl DefinitionStore {
    /// Installs or replaces a definition. Any binding under the same
    /// identifier is removed so the definition wins on the next `get`.
    pub fn set(&mut self, id: Identifier, definition: Definition) {
        self.bindings.remove(&id);
        self.definitions.insert(id, definition);
    }

    /// Installs or replaces a binding from an abstract identifier to a
    /// concrete one.
    pub fn bind(&mut self, abstract_id: Identifier, concrete_id: Identifier) {
        self.bindings.insert(abstract_id, concrete_id);
    }

    /// Marks an identifier transient going forward.
    pub fn set_transient(&mut self, id: Identifier) {
        self.transients.insert(id);
    }

    #[cfg_attr(not(feature = "export"), allow(dead_code))]
    pub fn is_transient(&self, id: &str) -> bool {
        self.transients.contains(id)
    }

    pub fn has_definition(&self, id: &str) -> bool {
        self.definitions.contains_key(id)
    }

    pub fn binding(&self, id: &str) -> Option<&Identifier> {
        self.bindings.get(id)
    }

    /// Everything the engine needs about one identifier, cloned out so the
    /// store lock can be released before any factory runs.
    pub fn lookup(&self, id: &str) -> Lookup {
        Lookup {
            binding: self.bindings.get(id).cloned(),
            definition: self.definitions.get(id).cloned(),
            transient: self.transients.contains(id),
        }
    }

    /// Snapshot of the definition map, for the export hook.
    pub fn definitions(&self) -> HashMap<Identifier, Definition> {
        self.definitions.clone()
    }

    /// Snapshot of the binding map.
    #[cfg_attr(not(any(feature = "export", feature = "diagnostics")), allow(dead_code))]
    pub fn bindings(&self) -> HashMap<Identifier, Identifier> {
        self.bindings.clone()
    }

    /// Snapshot of the transient flag set.
    #[cfg_attr(not(feature = "export"), allow(dead_code))]
    pub fn transients(&self) -> Vec<Identifier> {
        self.transients.iter().cloned().collect()
    }
}

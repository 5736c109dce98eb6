//! Named registries for plugin renderers and path decorators

use std::collections::HashMap;
use std::fmt;

use tracing::debug;

/// Entries keyed by the type-selector value they handle
pub struct Registry<T: ?Sized> {
    entries: HashMap<String, Box<T>>,
}

impl<T: ?Sized> Registry<T> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Register an entry, replacing any previous one of the same name
    pub fn register(&mut self, name: impl Into<String>, entry: Box<T>) {
        let name = name.into();
        if self.entries.insert(name.clone(), entry).is_some() {
            debug!(name = %name, "replaced registry entry");
        }
    }

    pub fn get(&self, name: &str) -> Option<&T> {
        self.entries.get(name).map(Box::as_ref)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Registered names in sorted order
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T: ?Sized> Default for Registry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> fmt::Debug for Registry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.names()).finish()
    }
}

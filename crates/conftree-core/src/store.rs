//! Fragment storage with lazy namespace ordering.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::collate::locale_cmp;
use crate::Object;

/// One loaded configuration object and the namespace it is addressed by.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fragment {
    /// Dotted namespace; empty for the root namespace
    pub name: String,

    /// Parsed file contents
    pub data: Object,

    /// File the fragment was loaded from (None when added programmatically)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<PathBuf>,

    /// SHA-256 of the raw file bytes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
}

impl Fragment {
    pub fn new(name: impl Into<String>, data: Object) -> Self {
        Self {
            name: name.into(),
            data,
            source: None,
            digest: None,
        }
    }

    /// Record where the fragment came from
    pub fn with_source(mut self, source: PathBuf, digest: Option<String>) -> Self {
        self.source = Some(source);
        self.digest = digest;
        self
    }

    pub fn is_root(&self) -> bool {
        self.name.is_empty()
    }
}

/// Fragments kept in namespace order.
///
/// Appending only marks the store dirty; the sort runs once on the next
/// read that needs ordering.
#[derive(Debug, Clone)]
pub struct FragmentStore {
    items: Vec<Fragment>,
    dirty: bool,
}

impl Default for FragmentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FragmentStore {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            dirty: false,
        }
    }

    pub fn add(&mut self, fragment: Fragment) {
        self.items.push(fragment);
        self.dirty = true;
    }

    /// Whether fragments were added since the last sort
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Sort by namespace if anything was added since the last sort.
    ///
    /// The sort is stable, so fragments sharing a namespace keep the order
    /// they were added in.
    pub fn ensure_sorted(&mut self) {
        if !self.dirty {
            return;
        }
        self.items.sort_by(|a, b| locale_cmp(&a.name, &b.name));
        self.dirty = false;
        tracing::trace!(fragments = self.items.len(), "sorted fragment store");
    }

    /// Fragments in namespace order
    pub fn sorted(&mut self) -> &[Fragment] {
        self.ensure_sorted();
        &self.items
    }

    /// Fragments in their current order (namespace order unless dirty)
    pub fn fragments(&self) -> &[Fragment] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fragment(name: &str, value: serde_json::Value) -> Fragment {
        match value {
            serde_json::Value::Object(map) => Fragment::new(name, map),
            other => panic!("not an object: {}", other),
        }
    }

    fn names(store: &FragmentStore) -> Vec<&str> {
        store.fragments().iter().map(|f| f.name.as_str()).collect()
    }

    #[test]
    fn test_new_store_is_clean() {
        let store = FragmentStore::new();
        assert!(store.is_empty());
        assert!(!store.is_dirty());
    }

    #[test]
    fn test_add_defers_sort() {
        let mut store = FragmentStore::new();
        store.add(fragment("server", json!({})));
        store.add(fragment("client", json!({})));

        assert!(store.is_dirty());
        assert_eq!(names(&store), vec!["server", "client"]);

        store.ensure_sorted();
        assert!(!store.is_dirty());
        assert_eq!(names(&store), vec!["client", "server"]);
    }

    #[test]
    fn test_sort_is_stable_for_duplicates() {
        let mut store = FragmentStore::new();
        store.add(fragment("x", json!({"n": 1})));
        store.add(fragment("", json!({})));
        store.add(fragment("x", json!({"n": 2})));

        let sorted = store.sorted();
        assert_eq!(sorted[0].name, "");
        assert_eq!(sorted[1].data["n"], 1);
        assert_eq!(sorted[2].data["n"], 2);
    }

    #[test]
    fn test_ensure_sorted_idempotent() {
        let mut store = FragmentStore::new();
        store.add(fragment("b", json!({})));
        store.add(fragment("a", json!({})));

        store.ensure_sorted();
        let first: Vec<Fragment> = store.fragments().to_vec();
        store.ensure_sorted();
        assert_eq!(store.fragments(), first.as_slice());
    }

    #[test]
    fn test_fragment_source() {
        let f = fragment("db", json!({"a": 1}))
            .with_source(PathBuf::from("/etc/db.yml"), Some("abc".to_string()));
        assert_eq!(f.source.as_deref(), Some(std::path::Path::new("/etc/db.yml")));
        assert_eq!(f.digest.as_deref(), Some("abc"));
        assert!(!f.is_root());
    }
}

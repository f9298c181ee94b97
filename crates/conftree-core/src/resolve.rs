//! Key resolution across namespaced fragments
//!
//! A fragment applies to a key when its namespace is empty (root), equal to
//! the key, or a dotted prefix of the key. Applicable fragments are visited in
//! namespace order and each defined value is folded over the running result,
//! so later namespaces override earlier ones for object members and replace
//! them outright for everything else.

use serde_json::Value;

use crate::merge::{merge_values, MergeStrategy};
use crate::path::resolve_path;
use crate::store::{Fragment, FragmentStore};

/// A fragment that yields a value for a key.
#[derive(Debug, Clone, PartialEq)]
pub struct Contribution<'a> {
    pub fragment: &'a Fragment,

    /// Path looked up inside the fragment; empty when the whole fragment applies
    pub remainder: String,

    pub value: Value,
}

/// Read-only lookups over a sorted fragment store.
pub struct Resolver<'a> {
    fragments: &'a [Fragment],
    strategy: &'a dyn MergeStrategy,
}

impl<'a> Resolver<'a> {
    /// Resolve over the store's current order.
    ///
    /// Precondition: the store is sorted (no adds since the last
    /// [`FragmentStore::ensure_sorted`]); otherwise fragments are folded in
    /// insertion order. Use [`Resolver::sorting`] when holding the store
    /// mutably.
    pub fn new(store: &'a FragmentStore, strategy: &'a dyn MergeStrategy) -> Self {
        Self {
            fragments: store.fragments(),
            strategy,
        }
    }

    /// Sort the store if needed, then resolve over it.
    pub fn sorting(store: &'a mut FragmentStore, strategy: &'a dyn MergeStrategy) -> Self {
        Self {
            fragments: store.sorted(),
            strategy,
        }
    }

    /// Resolve one key.
    pub fn get(&self, key: &str) -> Option<Value> {
        let mut output = None;
        for fragment in self.fragments {
            let Some(remainder) = remainder_for(fragment, key) else {
                continue;
            };
            if let Some(value) = extract(fragment, remainder) {
                output = merge_values(Some(value), output, self.strategy);
            }
        }
        output
    }

    /// Resolve several keys, later keys taking precedence.
    pub fn get_many<I, S>(&self, keys: I) -> Option<Value>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        keys.into_iter().fold(None, |output, key| {
            merge_values(self.get(key.as_ref()), output, self.strategy)
        })
    }

    /// Every fragment that yields a defined value for `key`, in fold order.
    pub fn contributions(&self, key: &str) -> Vec<Contribution<'a>> {
        self.fragments
            .iter()
            .filter_map(|fragment| {
                let remainder = remainder_for(fragment, key)?;
                let value = extract(fragment, remainder)?;
                Some(Contribution {
                    fragment,
                    remainder: remainder.to_string(),
                    value,
                })
            })
            .collect()
    }
}

/// Path left over inside `fragment` for `key`, or None if it does not apply.
fn remainder_for<'k>(fragment: &Fragment, key: &'k str) -> Option<&'k str> {
    if fragment.is_root() {
        return Some(key);
    }
    if key == fragment.name {
        return Some("");
    }
    key.strip_prefix(fragment.name.as_str())?.strip_prefix('.')
}

fn extract(fragment: &Fragment, remainder: &str) -> Option<Value> {
    if remainder.is_empty() {
        Some(Value::Object(fragment.data.clone()))
    } else {
        resolve_path(&fragment.data, remainder).cloned()
    }
}

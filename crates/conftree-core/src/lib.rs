//! Namespace resolution engine for hierarchical configuration fragments.
//!
//! A fragment is one parsed configuration object addressed under a dotted
//! namespace derived from its filename. Lookups match a requested key against
//! every fragment whose namespace is equal to, or a dotted prefix of, the key,
//! pull the remaining path out of each fragment and fold the results together
//! in namespace order.
//!
//! This crate performs no I/O. Discovery and parsing live in `conftree`.

mod collate;
mod merge;
mod namespace;
mod path;
mod resolve;
mod store;

pub use collate::locale_cmp;
pub use merge::{deep_merge, is_structured, merge_values, DeepMerge, MergeStrategy};
pub use namespace::derive_namespace;
pub use path::resolve_path;
pub use resolve::{Contribution, Resolver};
pub use store::{Fragment, FragmentStore};

/// A parsed configuration object.
pub type Object = serde_json::Map<String, serde_json::Value>;

//! The configuration container
//!
//! Owns the normalized options and the fragment store. Loading takes
//! `&mut self`; lookups take `&self` and sort the store lazily on first use
//! after a load.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::thread;

use conftree_core::{derive_namespace, Fragment, FragmentStore, Object, Resolver};

use crate::discovery::Discovery;
use crate::error::{Error, Result};
use crate::loader::Loaded;
use crate::options::{NormalizedOptions, Options};

/// A fragment that contributed to a lookup
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Contributor {
    /// Namespace of the fragment
    pub namespace: String,

    /// Path looked up inside the fragment (empty for the whole fragment)
    pub remainder: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<PathBuf>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,

    /// Value the fragment yielded before merging
    pub value: Value,
}

/// Aggregates namespaced configuration fragments.
pub struct Container {
    options: NormalizedOptions,
    store: RwLock<FragmentStore>,
}

impl std::fmt::Debug for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Container")
            .field("options", &self.options)
            .field("fragments", &self.len())
            .finish()
    }
}

impl Container {
    pub fn new(options: Options) -> Result<Self> {
        Ok(Self {
            options: options.normalize()?,
            store: RwLock::new(FragmentStore::new()),
        })
    }

    pub fn options(&self) -> &NormalizedOptions {
        &self.options
    }

    /// Discover and load config files from one directory (default: `cwd`).
    pub fn load(&mut self, directory: Option<&Path>) -> Result<()> {
        match directory {
            Some(directory) => self.load_dirs([directory]),
            None => self.load_dirs(std::iter::empty::<&Path>()),
        }
    }

    /// Discover and load config files from several directories.
    ///
    /// Relative directories are resolved against `cwd`; an empty list
    /// searches `cwd` itself.
    pub fn load_dirs<I, P>(&mut self, directories: I) -> Result<()>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut directories: Vec<PathBuf> = directories
            .into_iter()
            .map(|d| self.options.resolve_path(d.as_ref()))
            .collect();
        if directories.is_empty() {
            directories.push(self.options.cwd.clone());
        }

        let discovery = Discovery::new(
            self.options.prefix.as_deref(),
            self.options.suffix.as_deref(),
            &self.options.extensions,
        )?;
        let files = discovery.find_files(&directories)?;

        self.load_files(files)
    }

    /// Load one file by absolute or `cwd`-relative path.
    ///
    /// Files that do not parse to an object are ignored.
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = self.options.resolve_path(path.as_ref());
        let loaded = self.options.loader.load(&path)?;
        self.insert(path, loaded);
        Ok(())
    }

    /// Load several files concurrently.
    ///
    /// Every file is parsed before anything is added. Files that parsed are
    /// added even when another file failed; the first failure in input order
    /// is returned and nothing is rolled back.
    pub fn load_files<I, P>(&mut self, paths: I) -> Result<()>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let paths: Vec<PathBuf> = paths
            .into_iter()
            .map(|p| self.options.resolve_path(p.as_ref()))
            .collect();

        let loader = self.options.loader.as_ref();
        let results: Vec<Result<Loaded>> = thread::scope(|scope| {
            let handles: Vec<_> = paths
                .iter()
                .map(|path| scope.spawn(move || loader.load(path)))
                .collect();
            handles
                .into_iter()
                .map(|handle| handle.join().unwrap_or_else(|panic| std::panic::resume_unwind(panic)))
                .collect()
        });

        let mut first_error = None;
        for (path, result) in paths.into_iter().zip(results) {
            match result {
                Ok(loaded) => self.insert(path, loaded),
                Err(err) => {
                    tracing::debug!(path = %path.display(), error = %err, "failed to load config file");
                    if first_error.is_none() {
                        first_error = Some(err);
                    }
                }
            }
        }

        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Add a fragment that did not come from a file
    pub fn add_fragment(&mut self, name: impl Into<String>, data: Object) {
        self.store_mut().add(Fragment::new(name, data));
    }

    fn insert(&mut self, path: PathBuf, loaded: Loaded) {
        let Value::Object(data) = loaded.value else {
            tracing::debug!(path = %path.display(), "ignoring config file without an object body");
            return;
        };

        let name = derive_namespace(
            &path,
            self.options.prefix.as_deref(),
            self.options.suffix.as_deref(),
        );
        tracing::debug!(path = %path.display(), namespace = %name, "loaded config fragment");

        self.store_mut()
            .add(Fragment::new(name, data).with_source(path, loaded.digest));
    }

    /// Look up one key.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.with_resolver(|resolver| resolver.get(key))
    }

    /// Look up several keys and merge the results, later keys winning.
    pub fn get_many<I, S>(&self, keys: I) -> Option<Value>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.with_resolver(|resolver| resolver.get_many(keys))
    }

    /// Look up one key and deserialize it.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        self.get(key).map(|value| deserialize(key, value)).transpose()
    }

    /// Look up several keys, merge, and deserialize the result.
    pub fn get_many_as<T, I, S>(&self, keys: I) -> Result<Option<T>>
    where
        T: DeserializeOwned,
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keys: Vec<S> = keys.into_iter().collect();
        let label = keys.iter().map(|k| k.as_ref()).collect::<Vec<_>>().join(",");
        self.get_many(keys)
            .map(|value| deserialize(&label, value))
            .transpose()
    }

    pub fn get_str(&self, key: &str) -> Option<String> {
        match self.get(key)? {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn get_u64(&self, key: &str) -> Option<u64> {
        self.get(key).and_then(|v| v.as_u64())
    }

    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(|v| v.as_i64())
    }

    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(|v| v.as_f64())
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(|v| v.as_bool())
    }

    /// Fragments that yield a value for `key`, in merge order
    pub fn contributors(&self, key: &str) -> Vec<Contributor> {
        self.with_resolver(|resolver| {
            resolver
                .contributions(key)
                .into_iter()
                .map(|c| Contributor {
                    namespace: c.fragment.name.clone(),
                    remainder: c.remainder,
                    source: c.fragment.source.clone(),
                    digest: c.fragment.digest.clone(),
                    value: c.value,
                })
                .collect()
        })
    }

    /// Snapshot of all fragments in namespace order
    pub fn fragments(&self) -> Vec<Fragment> {
        self.sort_if_dirty();
        self.read_store().fragments().to_vec()
    }

    pub fn len(&self) -> usize {
        self.read_store().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read_store().is_empty()
    }

    fn sort_if_dirty(&self) {
        let dirty = self.read_store().is_dirty();
        if dirty {
            self.write_store().ensure_sorted();
        }
    }

    fn with_resolver<R>(&self, f: impl FnOnce(&Resolver<'_>) -> R) -> R {
        self.sort_if_dirty();
        let store = self.read_store();
        let resolver = Resolver::new(&store, self.options.merge.as_ref());
        f(&resolver)
    }

    fn read_store(&self) -> RwLockReadGuard<'_, FragmentStore> {
        self.store.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_store(&self) -> RwLockWriteGuard<'_, FragmentStore> {
        self.store.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn store_mut(&mut self) -> &mut FragmentStore {
        self.store.get_mut().unwrap_or_else(PoisonError::into_inner)
    }
}

fn deserialize<T: DeserializeOwned>(key: &str, value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(|source| Error::Deserialize {
        key: key.to_string(),
        source,
    })
}

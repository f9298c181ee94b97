//! Container options
//!
//! Options are supplied through `with_*` builders or read from a TOML file,
//! then normalized once when the container is created.

use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use conftree_core::{DeepMerge, MergeStrategy};

use crate::error::{Error, Result};
use crate::loader::{FileLoader, Loader};

/// Extensions searched when none are configured.
///
/// Includes script module formats that [`FileLoader`] rejects with
/// [`Error::UnsupportedFormat`]; pair them with a custom loader via
/// [`Options::with_loader`], or narrow the list with
/// [`Options::with_extensions`].
pub const DEFAULT_EXTENSIONS: &[&str] = &["conf", "js", "mjs", "cjs", "ts", "mts", "yml", "yaml"];

/// User-facing options; every field is optional.
#[derive(Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Options {
    /// Base for relative paths (default: process working directory)
    #[serde(default)]
    pub cwd: Option<PathBuf>,

    /// Filename prefix stripped from namespaces and required by discovery
    #[serde(default)]
    pub prefix: Option<String>,

    /// Filename suffix stripped from namespaces and required by discovery
    #[serde(default)]
    pub suffix: Option<String>,

    /// Recognized extensions, with or without a leading dot
    /// (default: [`DEFAULT_EXTENSIONS`])
    #[serde(default)]
    pub extensions: Vec<String>,

    #[serde(skip)]
    pub merge: Option<Arc<dyn MergeStrategy>>,

    #[serde(skip)]
    pub loader: Option<Arc<dyn Loader>>,
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("cwd", &self.cwd)
            .field("prefix", &self.prefix)
            .field("suffix", &self.suffix)
            .field("extensions", &self.extensions)
            .field("custom_merge", &self.merge.is_some())
            .field("custom_loader", &self.loader.is_some())
            .finish()
    }
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read options from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Parse options from a TOML string
    pub fn from_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| Error::Options(e.to_string()))
    }

    pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = Some(suffix.into());
        self
    }

    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the object merge used when fragments overlap
    pub fn with_merge(mut self, merge: impl MergeStrategy + 'static) -> Self {
        self.merge = Some(Arc::new(merge));
        self
    }

    /// Replace the file loader
    pub fn with_loader(mut self, loader: impl Loader + 'static) -> Self {
        self.loader = Some(Arc::new(loader));
        self
    }

    /// Fill in defaults.
    ///
    /// A relative `cwd` is anchored at the process working directory; empty
    /// prefix/suffix strings count as unset.
    pub fn normalize(self) -> Result<NormalizedOptions> {
        let cwd = match self.cwd {
            Some(cwd) if cwd.is_absolute() => cwd,
            Some(cwd) => current_dir()?.join(cwd),
            None => current_dir()?,
        };

        let extensions = if self.extensions.is_empty() {
            DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect()
        } else {
            self.extensions
                .into_iter()
                .map(|e| match e.strip_prefix('.') {
                    Some(stripped) => stripped.to_string(),
                    None => e,
                })
                .collect()
        };

        Ok(NormalizedOptions {
            cwd,
            prefix: self.prefix.filter(|p| !p.is_empty()),
            suffix: self.suffix.filter(|s| !s.is_empty()),
            extensions,
            merge: self.merge.unwrap_or_else(|| Arc::new(DeepMerge)),
            loader: self.loader.unwrap_or_else(|| Arc::new(FileLoader)),
        })
    }
}

fn current_dir() -> Result<PathBuf> {
    std::env::current_dir().map_err(Error::WorkingDirectory)
}

/// Options with every default applied
#[derive(Clone)]
pub struct NormalizedOptions {
    pub cwd: PathBuf,
    pub prefix: Option<String>,
    pub suffix: Option<String>,
    pub extensions: Vec<String>,
    pub merge: Arc<dyn MergeStrategy>,
    pub loader: Arc<dyn Loader>,
}

impl fmt::Debug for NormalizedOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NormalizedOptions")
            .field("cwd", &self.cwd)
            .field("prefix", &self.prefix)
            .field("suffix", &self.suffix)
            .field("extensions", &self.extensions)
            .finish_non_exhaustive()
    }
}

impl NormalizedOptions {
    /// Anchor a relative path at `cwd`
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.cwd.join(path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use conftree_core::Object;

    #[test]
    fn test_defaults() {
        let options = Options::new().normalize().unwrap();

        assert_eq!(options.cwd, std::env::current_dir().unwrap());
        assert_eq!(options.extensions, DEFAULT_EXTENSIONS);
        assert!(options.prefix.is_none());
        assert!(options.suffix.is_none());
    }

    #[test]
    fn test_extension_dots_stripped() {
        let options = Options::new()
            .with_extensions([".yml", "json", "..x"])
            .normalize()
            .unwrap();

        assert_eq!(options.extensions, vec!["yml", "json", ".x"]);
    }

    #[test]
    fn test_empty_prefix_unset() {
        let options = Options::new().with_prefix("").with_suffix("").normalize().unwrap();
        assert!(options.prefix.is_none());
        assert!(options.suffix.is_none());
    }

    #[test]
    fn test_relative_cwd_anchored() {
        let options = Options::new().with_cwd("conf/data").normalize().unwrap();
        assert_eq!(options.cwd, std::env::current_dir().unwrap().join("conf/data"));
        assert_eq!(options.resolve_path(Path::new("a.yml")), options.cwd.join("a.yml"));
        assert_eq!(options.resolve_path(Path::new("/etc/a.yml")), PathBuf::from("/etc/a.yml"));
    }

    #[test]
    fn test_from_toml_str() {
        let options = Options::from_toml_str(
            r#"
cwd = "/srv/app"
prefix = "project"
extensions = ["yml", ".json"]
"#,
        )
        .unwrap();

        assert_eq!(options.cwd, Some(PathBuf::from("/srv/app")));
        assert_eq!(options.prefix.as_deref(), Some("project"));
        assert!(options.suffix.is_none());

        let normalized = options.normalize().unwrap();
        assert_eq!(normalized.extensions, vec!["yml", "json"]);
    }

    #[test]
    fn test_from_toml_str_rejects_unknown_keys() {
        let result = Options::from_toml_str("watch = true\n");
        assert!(matches!(result, Err(Error::Options(_))));
    }

    #[test]
    fn test_custom_merge_kept() {
        let options = Options::new()
            .with_merge(|primary: &Object, _: &Object| primary.clone())
            .normalize()
            .unwrap();
        let a: Object = serde_json::from_str(r#"{"a": 1}"#).unwrap();
        let b: Object = serde_json::from_str(r#"{"b": 2}"#).unwrap();
        assert_eq!(options.merge.merge(&a, &b), a);
    }
}

//! File loaders
//!
//! A loader turns one file path into a parsed value. The container decides
//! whether that value becomes a fragment; loaders only read and parse.

mod format;

pub use format::Format;

use serde_json::Value;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// Parsed file contents plus provenance
#[derive(Debug, Clone, PartialEq)]
pub struct Loaded {
    /// The parsed value (the default export for module formats that have one)
    pub value: Value,

    /// Hex SHA-256 of the raw bytes, when the loader read them
    pub digest: Option<String>,
}

impl Loaded {
    pub fn new(value: Value) -> Self {
        Self {
            value,
            digest: None,
        }
    }
}

/// Reads and parses one configuration file.
///
/// Called from several threads at once during batch loads. Module formats
/// return their default export as the value.
///
/// Script modules need a loader of their own, typically one that hands data
/// formats back to [`FileLoader`]:
///
/// ```
/// use std::path::Path;
/// use conftree::{Container, FileLoader, Loaded, Loader, Options, Result};
///
/// struct ModuleLoader;
///
/// impl Loader for ModuleLoader {
///     fn load(&self, path: &Path) -> Result<Loaded> {
///         match path.extension().and_then(|e| e.to_str()) {
///             Some("js" | "mjs" | "cjs" | "ts" | "mts") => {
///                 // evaluate the module and return its default export
///                 Ok(Loaded::new(serde_json::json!({})))
///             }
///             _ => FileLoader.load(path),
///         }
///     }
/// }
///
/// let container = Container::new(Options::new().with_loader(ModuleLoader))?;
/// # Ok::<(), conftree::Error>(())
/// ```
pub trait Loader: Send + Sync {
    fn load(&self, path: &Path) -> Result<Loaded>;
}

/// Default loader for data formats (JSON, YAML, TOML, `.conf`).
///
/// Script module formats (`js`, `ts`, ...) have no parser here and fail with
/// [`Error::UnsupportedFormat`]. They are part of [`crate::DEFAULT_EXTENSIONS`],
/// so discovery without a prefix fails on a directory holding a stray `.js`
/// or `.ts` file unless a custom [`Loader`] is plugged in or the extension
/// list is narrowed with [`crate::Options::with_extensions`].
#[derive(Debug, Clone, Copy, Default)]
pub struct FileLoader;

impl Loader for FileLoader {
    fn load(&self, path: &Path) -> Result<Loaded> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_string();

        let format = Format::from_extension(&extension).ok_or_else(|| Error::UnsupportedFormat {
            path: path.to_path_buf(),
            extension,
        })?;

        let bytes = fs::read(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let digest = hex::encode(Sha256::digest(&bytes));

        let value = format.parse(&bytes).map_err(|message| Error::Parse {
            path: path.to_path_buf(),
            message,
        })?;

        tracing::trace!(path = %path.display(), ?format, "parsed config file");

        Ok(Loaded {
            value,
            digest: Some(digest),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_load_yaml() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "project.client.web.yml", "host: 1.1.1.2\nport: 4000\n");

        let loaded = FileLoader.load(&path).unwrap();
        assert_eq!(loaded.value, json!({"host": "1.1.1.2", "port": 4000}));
    }

    #[test]
    fn test_load_conf_json_body() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "project.conf", r#"{"db": {"host": "127.0.0.1"}}"#);

        let loaded = FileLoader.load(&path).unwrap();
        assert_eq!(loaded.value["db"]["host"], "127.0.0.1");
    }

    #[test]
    fn test_load_json_and_toml() {
        let dir = TempDir::new().unwrap();
        let json_path = write(&dir, "a.json", r#"{"list": [1, 2]}"#);
        let toml_path = write(&dir, "b.toml", "[server]\nport = 80\n");

        assert_eq!(FileLoader.load(&json_path).unwrap().value, json!({"list": [1, 2]}));
        assert_eq!(
            FileLoader.load(&toml_path).unwrap().value,
            json!({"server": {"port": 80}})
        );
    }

    #[test]
    fn test_digest_is_sha256_of_bytes() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "a.yml", "a: 1\n");

        let loaded = FileLoader.load(&path).unwrap();
        let expected = hex::encode(Sha256::digest(b"a: 1\n"));
        assert_eq!(loaded.digest, Some(expected));
    }

    #[test]
    fn test_script_formats_unsupported() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "project.js", "module.exports = {}");

        let err = FileLoader.load(&path).unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat { ref extension, .. } if extension == "js"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let err = FileLoader.load(&dir.path().join("absent.yml")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn test_invalid_yaml_is_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "bad.yaml", "a: [1, 2\n");

        let err = FileLoader.load(&path).unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
        assert!(err.to_string().contains("bad.yaml"));
    }
}

//! conftree - hierarchical configuration aggregator
//!
//! Configuration fragments are discovered in one or more directories, each
//! addressed under a dotted namespace derived from its filename
//! (`project.server.conf` with prefix `project` becomes `server`). Lookups
//! merge every fragment whose namespace covers the requested key:
//!
//! ```no_run
//! use conftree::{Container, Options};
//!
//! let mut container = Container::new(Options::new().with_prefix("project"))?;
//! container.load(None)?;
//! let port = container.get_u64("server.core.port");
//! # Ok::<(), conftree::Error>(())
//! ```

pub mod container;
pub mod discovery;
pub mod error;
pub mod loader;
pub mod options;

pub use container::{Container, Contributor};
pub use error::{Error, Result};
pub use loader::{FileLoader, Format, Loaded, Loader};
pub use options::{NormalizedOptions, Options, DEFAULT_EXTENSIONS};

pub use conftree_core::{
    deep_merge, derive_namespace, is_structured, DeepMerge, Fragment, MergeStrategy, Object,
};

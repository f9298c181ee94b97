//! Config file discovery
//!
//! Candidate files are matched by name directly inside each search
//! directory. The patterns follow the prefix/suffix table:
//!
//! | prefix | suffix | patterns                                   |
//! |--------|--------|--------------------------------------------|
//! | set    | set    | `<prefix>.**.<suffix>.{ext}`               |
//! | set    | unset  | `<prefix>.{ext}`, `<prefix>.**.{ext}`      |
//! | unset  | set    | `<suffix>.{ext}`, `**.<suffix>.{ext}`      |
//! | unset  | unset  | `**.{ext}`                                 |
//!
//! Within a file name `**` matches like `*`. As with shell globs, a leading
//! wildcard never matches a hidden (dot-prefixed) name.

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;
use walkdir::{DirEntry, WalkDir};

use crate::error::Result;

/// Build the discovery patterns for the given prefix, suffix and extensions
pub fn patterns(prefix: Option<&str>, suffix: Option<&str>, extensions: &[String]) -> Vec<String> {
    let extension = format!("{{{}}}", extensions.join(","));

    match (prefix, suffix) {
        (Some(prefix), Some(suffix)) => vec![format!("{prefix}.**.{suffix}.{extension}")],
        (Some(prefix), None) => vec![
            format!("{prefix}.{extension}"),
            format!("{prefix}.**.{extension}"),
        ],
        (None, Some(suffix)) => vec![
            format!("{suffix}.{extension}"),
            format!("**.{suffix}.{extension}"),
        ],
        (None, None) => vec![format!("**.{extension}")],
    }
}

/// Compiled discovery patterns
#[derive(Debug)]
pub struct Discovery {
    /// Patterns starting with a literal
    literal: GlobSet,
    /// Patterns starting with a wildcard
    wildcard: GlobSet,
}

impl Discovery {
    pub fn new(prefix: Option<&str>, suffix: Option<&str>, extensions: &[String]) -> Result<Self> {
        let mut literal = GlobSetBuilder::new();
        let mut wildcard = GlobSetBuilder::new();

        for pattern in patterns(prefix, suffix, extensions) {
            let glob = GlobBuilder::new(&pattern.replace("**", "*"))
                .literal_separator(true)
                .build()?;
            if pattern.starts_with('*') {
                wildcard.add(glob);
            } else {
                literal.add(glob);
            }
        }

        Ok(Self {
            literal: literal.build()?,
            wildcard: wildcard.build()?,
        })
    }

    /// Check a bare file name against the patterns
    pub fn matches(&self, file_name: &str) -> bool {
        self.literal.is_match(file_name)
            || (!file_name.starts_with('.') && self.wildcard.is_match(file_name))
    }

    /// Find matching files in each directory (not recursive).
    ///
    /// Directories that do not exist contribute nothing. Results keep the
    /// directory order, sorted by file name within a directory, without
    /// duplicates.
    pub fn find_files(&self, directories: &[PathBuf]) -> Result<Vec<PathBuf>> {
        let mut seen = BTreeSet::new();
        let mut files = Vec::new();

        for directory in directories {
            if !directory.is_dir() {
                tracing::debug!(directory = %directory.display(), "skipping missing search directory");
                continue;
            }

            for entry in WalkDir::new(directory)
                .min_depth(1)
                .max_depth(1)
                .follow_links(false)
                .sort_by(|a, b| a.file_name().cmp(b.file_name()))
            {
                let entry = entry?;
                let Some(name) = entry.file_name().to_str() else {
                    continue;
                };
                if !self.matches(name) {
                    continue;
                }
                if !is_regular_file(&entry) {
                    continue;
                }

                let path = entry.into_path();
                if seen.insert(path.clone()) {
                    files.push(path);
                }
            }
        }

        tracing::debug!(count = files.len(), "discovered config files");
        Ok(files)
    }
}

/// Regular files, or symlinks that resolve to one; dangling links are skipped
fn is_regular_file(entry: &DirEntry) -> bool {
    let file_type = entry.file_type();
    if !file_type.is_symlink() {
        return file_type.is_file();
    }
    match fs::metadata(entry.path()) {
        Ok(metadata) => metadata.is_file(),
        Err(err) => {
            tracing::debug!(path = %entry.path().display(), error = %err, "skipping unresolvable symlink");
            false
        }
    }
}

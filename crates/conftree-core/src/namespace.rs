//! Namespace derivation from configuration filenames.

use std::path::Path;

/// Compute the dotted namespace for a configuration file.
///
/// The base name is taken with `\` treated as `/`, the final extension is
/// dropped, then `prefix` (plus one following `.`) and `suffix` (plus one
/// preceding `.`) are stripped when present. The result may be empty, which
/// addresses the root namespace.
pub fn derive_namespace(file_path: &Path, prefix: Option<&str>, suffix: Option<&str>) -> String {
    let normalized = file_path.to_string_lossy().replace('\\', "/");
    let base = match normalized.rfind('/') {
        Some(idx) => &normalized[idx + 1..],
        None => normalized.as_str(),
    };

    let mut name = match base.rfind('.') {
        Some(idx) => &base[..idx],
        None => "",
    };

    if let Some(prefix) = prefix.filter(|p| !p.is_empty()) {
        if let Some(rest) = name.strip_prefix(prefix) {
            name = rest.strip_prefix('.').unwrap_or(rest);
        }
    }

    if let Some(suffix) = suffix.filter(|s| !s.is_empty()) {
        if let Some(rest) = name.strip_suffix(suffix) {
            name = rest.strip_suffix('.').unwrap_or(rest);
        }
    }

    name.to_string()
}

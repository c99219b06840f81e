//! Shared utilities for operations across coursevault crates.
//!
//! Provides helpers for:
//! - Serialization with consistent error handling
//! - Path validation against a course root
//! - Content-type lookup for served attachments

use crate::{Error, Result};
use std::path::{Component, Path, PathBuf};

/// Generic JSON serialization with consistent error handling
/// Works with any type that implements Serialize (including slices)
pub fn to_json_string<T: serde::Serialize + ?Sized>(data: &T, context: &str) -> Result<String> {
    serde_json::to_string_pretty(data).map_err(|e| {
        Error::config_error(format!("Failed to serialize {} as JSON: {}", context, e))
    })
}

/// Content type served for a file, by extension.
pub fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("pdf") => "application/pdf",
        _ => "application/octet-stream",
    }
}

/// Lowercased extension of a reference or file name, if any.
pub fn extension_of(name: &str) -> Option<String> {
    let file = name.rsplit('/').next().unwrap_or(name);
    let (stem, ext) = file.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// Render a relative path with `/` separators regardless of platform.
pub fn to_slash(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Path validation helpers
pub struct PathValidator;

impl PathValidator {
    /// Lexically normalize a path: drop `.`, apply `..` by popping.
    ///
    /// Returns `None` if `..` would climb above the first component of a
    /// relative path (or above the root of an absolute one).
    pub fn normalize(path: &Path) -> Option<PathBuf> {
        let mut normalized = PathBuf::new();
        let mut depth = 0usize;

        for component in path.components() {
            match component {
                Component::ParentDir => {
                    if depth == 0 {
                        return None;
                    }
                    normalized.pop();
                    depth -= 1;
                }
                Component::Normal(name) => {
                    normalized.push(name);
                    depth += 1;
                }
                Component::RootDir | Component::Prefix(_) => {
                    normalized.push(component.as_os_str());
                }
                Component::CurDir => {}
            }
        }

        Some(normalized)
    }

    /// Join `relative` onto `root`, refusing anything that escapes the root.
    ///
    /// Leading `/` on `relative` is ignored so URL-ish paths stay inside.
    pub fn join_within(root: &Path, relative: &Path) -> Result<PathBuf> {
        let relative = relative.strip_prefix("/").unwrap_or(relative);
        let normalized = Self::normalize(relative)
            .ok_or_else(|| Error::path_traversal(root.join(relative)))?;
        Ok(root.join(normalized))
    }

    /// Resolve `relative` against `base`, a directory inside `root`, without
    /// ever leaving `root`.
    pub fn resolve_within(root: &Path, base: &Path, relative: &Path) -> Result<PathBuf> {
        let base_rel = base.strip_prefix(root).map_err(|_| {
            Error::invalid_path(format!(
                "{} is not inside {}",
                base.display(),
                root.display()
            ))
        })?;
        Self::join_within(root, &base_rel.join(relative))
    }

    /// Path of `path` relative to `root`, if it is inside it.
    pub fn relative_to(root: &Path, path: &Path) -> Option<PathBuf> {
        path.strip_prefix(root).ok().map(Path::to_path_buf)
    }
}

/*!
 * Utility functions for codegatherer
 */

use std::fs;
use std::path::{Component, Path, PathBuf};

/// Format a human-readable file size
pub fn format_file_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{} bytes", size)
    }
}

/// Join the components of a relative path with `/`
pub fn slash_path(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            Component::ParentDir => Some("..".to_string()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Resolve `.` and `..` components without touching the filesystem
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match normalized.components().next_back() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => normalized.push(".."),
            },
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

/// Path of `path` relative to `base`, `/`-separated.
///
/// Both paths are normalized first. Paths outside `base` get leading `..`
/// segments; the full path is used only when the two share no root.
pub fn relative_display(path: &Path, base: &Path) -> String {
    let path = normalize_path(path);
    let base = normalize_path(base);

    if let Ok(rel) = path.strip_prefix(&base) {
        return slash_path(rel);
    }

    if let (Ok(abs), Ok(abs_base)) = (fs::canonicalize(&path), fs::canonicalize(&base)) {
        if let Ok(rel) = abs.strip_prefix(&abs_base) {
            return slash_path(rel);
        }
    }

    if path.is_absolute() && base.is_absolute() {
        let parts: Vec<Component> = path.components().collect();
        let base_parts: Vec<Component> = base.components().collect();
        let common = parts
            .iter()
            .zip(&base_parts)
            .take_while(|(a, b)| a == b)
            .count();

        if common > 0 {
            let mut rel = PathBuf::new();
            for _ in common..base_parts.len() {
                rel.push("..");
            }
            rel.extend(&parts[common..]);
            return slash_path(&rel);
        }
    }

    path.to_string_lossy().into_owned()
}

/// File name of a path as an owned string
pub fn file_name_of(path: &Path) -> String {
    path.file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string()
}

/*!
 * Core types and data structures for the llmprint application
 */

use std::cmp::Ordering;
use std::path::{Path, PathBuf};

use walkdir::DirEntry;

/// What the invocation renders
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// ASCII tree of names only
    Structure,
    /// File bodies prefixed with their relative paths
    Contents,
}

/// A filesystem entry as seen during one visit
///
/// Entries are derived live from the filesystem and never cached between
/// visits; `is_dir` follows symlinks unless built from a walk entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Full path of the entry
    pub path: PathBuf,
    /// Whether the entry is classified as a directory
    pub is_dir: bool,
}

impl Entry {
    /// Create an entry with an explicit classification
    pub fn new(path: impl Into<PathBuf>, is_dir: bool) -> Self {
        Self {
            path: path.into(),
            is_dir,
        }
    }

    /// Classify a path by querying the filesystem (symlinks are followed)
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let is_dir = path.is_dir();
        Self { path, is_dir }
    }

    /// Classify a walk entry; a symlink counts as a directory when its
    /// target is one
    pub fn from_dir_entry(entry: &DirEntry) -> Self {
        let is_dir = entry.file_type().is_dir() || (entry.path_is_symlink() && entry.path().is_dir());
        Self::new(entry.path(), is_dir)
    }

    /// Base name of the entry, lossily decoded
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Path of the entry
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Listing order shared by both renderers: files before directories, each
/// group ascending by name.
pub fn listing_order(a: &Entry, b: &Entry) -> Ordering {
    a.is_dir
        .cmp(&b.is_dir)
        .then_with(|| a.path.file_name().cmp(&b.path.file_name()))
}

/// A piece of rendered output headed for the sinks
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    /// Rendered text: a tree line, a tree header, or a file block
    Text(String),
    /// An include target that does not exist
    NotFound(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_order_puts_files_first() {
        let mut entries = vec![
            Entry::new("/p/z", true),
            Entry::new("/p/b.txt", false),
            Entry::new("/p/a", true),
            Entry::new("/p/a.txt", false),
        ];
        entries.sort_by(listing_order);

        let names: Vec<String> = entries.iter().map(Entry::name).collect();
        assert_eq!(names, vec!["a.txt", "b.txt", "a", "z"]);
    }

    #[test]
    fn test_entry_name_of_root_is_empty() {
        assert_eq!(Entry::new("/", true).name(), "");
    }
}

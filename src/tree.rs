/*!
 * ASCII tree rendering
 *
 * `TreeLines` walks a directory depth-first in pre-order and yields one line
 * per visible entry. Nothing is read until the iterator is advanced past the
 * directory that holds it.
 */

use std::borrow::Cow;
use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::matcher::IgnoreSet;
use crate::types::{listing_order, Entry};

/// Connector for an entry that has later siblings
pub const BRANCH: &str = "├── ";
/// Connector for the last entry of a directory
pub const LAST_BRANCH: &str = "└── ";
/// Prefix continuation beneath an interior entry
pub const PIPE_PADDING: &str = "│   ";
/// Prefix continuation beneath a last entry
pub const BLANK_PADDING: &str = "    ";

/// A listed child and whether the walk descends into it
struct Listed {
    entry: Entry,
    expand: bool,
}

/// One open directory on the traversal path
struct Frame {
    entries: Vec<Listed>,
    next: usize,
    prefix: String,
}

/// Lazy iterator over the lines of a rendered tree
pub struct TreeLines<'a> {
    ignore: Cow<'a, IgnoreSet>,
    stack: Vec<Frame>,
}

impl<'a> TreeLines<'a> {
    /// Start rendering the tree below `root`
    ///
    /// An excluded root renders nothing at all.
    pub fn new(root: &Path, ignore: &'a IgnoreSet) -> Self {
        let mut lines = Self {
            ignore: ignore.scoped_to(root),
            stack: Vec::new(),
        };

        let root = Entry::from_path(root);
        if lines.ignore.should_ignore(&root) {
            debug!("Root {} is excluded", root.path.display());
        } else {
            lines.push_frame(&root.path, String::new());
        }
        lines
    }

    fn push_frame(&mut self, dir: &Path, prefix: String) {
        let entries = self.list(dir);
        self.stack.push(Frame {
            entries,
            next: 0,
            prefix,
        });
    }

    /// List a directory's visible children in render order
    ///
    /// Excluded files are dropped. Excluded directories stay in the listing
    /// but are never expanded.
    fn list(&self, dir: &Path) -> Vec<Listed> {
        let read = match fs::read_dir(dir) {
            Ok(read) => read,
            Err(e) => {
                warn!("Cannot list directory {}: {}", dir.display(), e);
                return Vec::new();
            }
        };

        let mut entries: Vec<Entry> = read
            .filter_map(|item| match item {
                Ok(item) => Some(Entry::from_path(item.path())),
                Err(e) => {
                    warn!("Skipping unreadable entry in {}: {}", dir.display(), e);
                    None
                }
            })
            .collect();
        entries.sort_by(listing_order);

        entries
            .into_iter()
            .filter_map(|entry| {
                let excluded = self.ignore.should_ignore(&entry);
                match (entry.is_dir, excluded) {
                    (false, true) => None,
                    (is_dir, excluded) => Some(Listed {
                        expand: is_dir && !excluded,
                        entry,
                    }),
                }
            })
            .collect()
    }
}

impl Iterator for TreeLines<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        loop {
            let frame = self.stack.last_mut()?;
            if frame.next >= frame.entries.len() {
                self.stack.pop();
                continue;
            }

            let index = frame.next;
            frame.next += 1;
            let is_last = index + 1 == frame.entries.len();
            let listed = &frame.entries[index];

            let connector = if is_last { LAST_BRANCH } else { BRANCH };
            let line = format!("{}{}{}\n", frame.prefix, connector, listed.entry.name());

            if listed.expand {
                let padding = if is_last { BLANK_PADDING } else { PIPE_PADDING };
                let prefix = format!("{}{}", frame.prefix, padding);
                let dir = listed.entry.path.clone();
                self.push_frame(&dir, prefix);
            }

            return Some(line);
        }
    }
}

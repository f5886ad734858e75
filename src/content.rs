/*!
 * File content dumping
 *
 * Every non-excluded file under the scope becomes one block:
 *
 * ```text
 * <relative path>
 * ----------------------------------------
 * <body>
 * ========================================
 * ```
 */

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, trace, warn};
use walkdir::{DirEntry, WalkDir};

use crate::matcher::IgnoreSet;
use crate::types::{Entry, Fragment};
use crate::utils::{normalize_path, relative_display};

/// Rule printed below a block header
pub const HEADER_RULE: &str = "----------------------------------------";
/// Rule closing a block
pub const FOOTER_RULE: &str = "========================================";

type Walk<'a> = Box<dyn Iterator<Item = walkdir::Result<DirEntry>> + 'a>;

/// Lazy iterator over content blocks for a set of include targets
///
/// Overlapping or repeated targets never produce the same file twice.
pub struct ContentBlocks<'a> {
    base: &'a Path,
    ignore: &'a IgnoreSet,
    targets: std::vec::IntoIter<String>,
    walk: Option<Walk<'a>>,
    emitted: HashSet<PathBuf>,
}

impl<'a> ContentBlocks<'a> {
    /// Dump the targets, or the whole base when `targets` is empty
    pub fn new(base: &'a Path, targets: &[String], ignore: &'a IgnoreSet) -> Self {
        let mut blocks = Self {
            base,
            ignore,
            targets: targets.to_vec().into_iter(),
            walk: None,
            emitted: HashSet::new(),
        };
        if targets.is_empty() {
            blocks.walk = Some(blocks.walk_from(normalize_path(base)));
        }
        blocks
    }

    /// Walk a directory, pruning excluded subdirectories before descending
    ///
    /// The walk root itself is not tested against the rules.
    fn walk_from(&self, root: PathBuf) -> Walk<'a> {
        debug!("Walking {}", root.display());
        let ignore = self.ignore.scoped_to(&root);
        let walk = WalkDir::new(root)
            .sort_by(|a, b| {
                a.file_type()
                    .is_dir()
                    .cmp(&b.file_type().is_dir())
                    .then_with(|| a.file_name().cmp(b.file_name()))
            })
            .into_iter()
            .filter_entry(move |entry| entry.depth() == 0 || !ignore.should_ignore(&Entry::from_dir_entry(entry)));
        Box::new(walk)
    }

    /// Resolve the next include target into a fragment or a new walk
    fn open_target(&mut self, target: String) -> Option<Fragment> {
        let path = normalize_path(&self.base.join(&target));
        if path.is_file() {
            if self.ignore.scoped_to(&path).should_ignore(&Entry::new(&path, false)) {
                debug!("Include target {} is excluded", target);
                return None;
            }
            return self.block_once(&path);
        }
        if path.is_dir() {
            self.walk = Some(self.walk_from(path));
            return None;
        }

        warn!("Include target not found: {}", target);
        Some(Fragment::NotFound(target))
    }

    /// Pull the next block out of the active walk, if any
    fn next_from_walk(&mut self) -> Option<Fragment> {
        let walk = self.walk.as_mut()?;
        for item in walk.by_ref() {
            match item {
                Ok(entry) if is_readable_file(&entry) => {
                    if !self.emitted.insert(entry.path().to_path_buf()) {
                        debug!("Already dumped {}", entry.path().display());
                        continue;
                    }
                    return Some(Fragment::Text(render_block(entry.path(), self.base)));
                }
                Ok(_) => {}
                Err(e) => warn!("Skipping unreadable path: {}", e),
            }
        }
        self.walk = None;
        None
    }

    /// Render `path` unless an earlier target already dumped it
    fn block_once(&mut self, path: &Path) -> Option<Fragment> {
        if !self.emitted.insert(path.to_path_buf()) {
            debug!("Already dumped {}", path.display());
            return None;
        }
        Some(Fragment::Text(render_block(path, self.base)))
    }
}

impl Iterator for ContentBlocks<'_> {
    type Item = Fragment;

    fn next(&mut self) -> Option<Fragment> {
        loop {
            if let Some(fragment) = self.next_from_walk() {
                return Some(fragment);
            }

            let target = self.targets.next()?;
            if let Some(fragment) = self.open_target(target) {
                return Some(fragment);
            }
        }
    }
}

/// Regular files and symlinks to regular files; symlinked directories are
/// neither emitted nor descended.
fn is_readable_file(entry: &DirEntry) -> bool {
    entry.file_type().is_file() || (entry.path_is_symlink() && entry.path().is_file())
}

/// Render one file as a block
pub fn render_block(path: &Path, base: &Path) -> String {
    trace!("Rendering {}", path.display());
    let body = match read_text(path) {
        Ok(text) => text,
        Err(e) => format!("Error reading file: {}", e),
    };

    format!(
        "{}\n{}\n{}\n{}\n",
        relative_display(path, base),
        HEADER_RULE,
        body,
        FOOTER_RULE
    )
}

/// Read a file as text, dropping byte sequences that are not valid UTF-8
pub fn read_text(path: &Path) -> io::Result<String> {
    let bytes = fs::read(path)?;
    Ok(decode_lossy(&bytes))
}

/// Decode UTF-8, dropping invalid sequences and normalizing line endings
pub fn decode_lossy(bytes: &[u8]) -> String {
    let mut text = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        text.push_str(chunk.valid());
    }

    if text.contains('\r') {
        text = text.replace("\r\n", "\n").replace('\r', "\n");
    }
    text
}

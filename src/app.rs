/*!
 * Invocation driver: renders the configured scope and handles the copy
 */

use std::io::Write;
use std::iter;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::clipboard::Clipboard;
use crate::config::Config;
use crate::content::ContentBlocks;
use crate::error::Result;
use crate::matcher::IgnoreSet;
use crate::output::{copy_confirmation, copy_failure, OutputSink};
use crate::tree::TreeLines;
use crate::types::{Entry, Fragment, Mode};
use crate::utils::{directory_label, normalize_path, relative_display};

/// Lazily render every fragment for the configured mode and scope
pub fn fragments<'a>(config: &'a Config, ignore: &'a IgnoreSet) -> Box<dyn Iterator<Item = Fragment> + 'a> {
    let base = config.base_dir.as_path();
    match config.mode {
        Mode::Contents => Box::new(ContentBlocks::new(base, &config.include_paths, ignore)),
        Mode::Structure if config.include_paths.is_empty() => {
            let header = format!("{}/\n", directory_label(base));
            Box::new(iter::once(Fragment::Text(header)).chain(TreeLines::new(base, ignore).map(Fragment::Text)))
        }
        Mode::Structure => Box::new(
            distinct_targets(base, &config.include_paths, ignore)
                .into_iter()
                .flat_map(move |target| structure_of_target(base, target, ignore)),
        ),
    }
}

/// Structure targets that are not already shown by another target
///
/// A repeated path keeps its first occurrence. A path inside another
/// target's expanded tree is dropped wherever it appears in the list.
fn distinct_targets<'t>(base: &Path, targets: &'t [String], ignore: &IgnoreSet) -> Vec<&'t str> {
    let resolved: Vec<(&str, PathBuf)> = targets
        .iter()
        .map(|target| (target.as_str(), normalize_path(&base.join(target))))
        .collect();
    let expanded: Vec<&PathBuf> = resolved
        .iter()
        .map(|(_, path)| path)
        .filter(|path| path.is_dir() && !ignore.scoped_to(path).should_ignore(&Entry::new(path.as_path(), true)))
        .collect();

    resolved
        .iter()
        .enumerate()
        .filter(|(i, (target, path))| {
            let repeated = resolved[..*i].iter().any(|(_, earlier)| earlier == path);
            let nested = expanded.iter().any(|dir| path != *dir && path.starts_with(dir));
            if repeated || nested {
                debug!("Include target {} is already rendered by another target", target);
            }
            !(repeated || nested)
        })
        .map(|(_, (target, _))| *target)
        .collect()
}

/// Header plus tree for one include target
///
/// A file target renders as its own path without a tree beneath it.
fn structure_of_target<'a>(base: &Path, target: &str, ignore: &'a IgnoreSet) -> Box<dyn Iterator<Item = Fragment> + 'a> {
    let path = normalize_path(&base.join(target));
    if path.is_dir() {
        let header = format!("{}/\n", relative_display(&path, base));
        return Box::new(iter::once(Fragment::Text(header)).chain(TreeLines::new(&path, ignore).map(Fragment::Text)));
    }
    if path.exists() {
        if ignore.scoped_to(&path).should_ignore(&Entry::from_path(&path)) {
            debug!("Include target {} is excluded", target);
            return Box::new(iter::empty());
        }
        return Box::new(iter::once(Fragment::Text(format!("{}\n", relative_display(&path, base)))));
    }

    warn!("Include target not found: {}", target);
    Box::new(iter::once(Fragment::NotFound(target.to_string())))
}

/// Run one invocation, writing user-facing output to `stdout`
///
/// Rendering problems are reported inline; only a failing `stdout` is an
/// error.
pub fn run<W: Write>(config: &Config, clipboard: &dyn Clipboard, stdout: W) -> Result<()> {
    let ignore = IgnoreSet::new(&config.base_dir, &config.exclude_patterns);
    debug!(
        "Rendering {:?} of {} with {} ignore rules",
        config.mode,
        config.base_dir.display(),
        ignore.rules().len()
    );

    let mut sink = OutputSink::new(stdout, config.quiet(), config.copy);
    for fragment in fragments(config, &ignore) {
        sink.emit(fragment)?;
    }

    let (mut stdout, session) = sink.finish()?;
    if let Some(session) = session {
        let message = match session.copy(clipboard) {
            Ok(stats) => copy_confirmation(config.mode, &config.include_paths, stats),
            Err(e) => {
                warn!("Clipboard copy failed: {}", e);
                copy_failure(&e)
            }
        };
        stdout.write_all(message.as_bytes())?;
        stdout.flush()?;
    }

    Ok(())
}

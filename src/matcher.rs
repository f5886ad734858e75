/*!
 * Exclusion matching for llmprint
 *
 * An entry is excluded when any built-in or user rule matches it. Rules are
 * combined as a flat OR, so their order never changes the outcome.
 */

use std::borrow::Cow;
use std::path::{Component, Path, PathBuf};

use glob_match::glob_match;
use thiserror::Error;
use tracing::{debug, trace};

use crate::types::Entry;

/// Common .gitignore-style patterns applied to every invocation
pub const DEFAULT_IGNORE_PATTERNS: &[&str] = &[
    // Python
    "__pycache__",
    "*.pyc",
    "*.pyo",
    "*.pyd",
    ".Python",
    "env/",
    "venv/",
    ".venv/",
    "pip-log.txt",
    "pip-delete-this-directory.txt",
    ".ipynb_checkpoints",
    ".tox/",
    ".nox/",
    ".coverage",
    ".cache",
    "build/",
    "dist/",
    "*.egg-info/",
    "*.egg",
    // Node.js
    "node_modules/",
    "npm-debug.log",
    "yarn-debug.log",
    "yarn-error.log",
    "yarn.lock",
    "package-lock.json",
    // JVM
    "*.class",
    "*.jar",
    "*.war",
    "*.ear",
    "*.iml",
    "*.ipr",
    "*.iws",
    ".gradle/",
    "target/",
    ".idea/",
    ".project",
    // Native builds
    "*.o",
    "*.out",
    "*.obj",
    "*.exe",
    "*.dll",
    "*.so",
    "*.dylib",
    "Debug/",
    "Release/",
    // Logs, editors, backups
    "*.log",
    "*.tmp",
    "*.swp",
    "*.sublime-workspace",
    "*.bak",
    "*.orig",
    "*.rej",
    "*~",
    // OS files
    ".DS_Store",
    ".AppleDouble",
    "._*",
    "Thumbs.db",
    "ehthumbs.db",
    "Desktop.ini",
    "$RECYCLE.BIN/",
    // Version control
    ".git",
    ".gitignore",
    ".gitattributes",
    ".gitmodules",
    ".gitkeep",
    // IDEs
    ".vscode/",
    ".vs/",
    "*.code-workspace",
    // Misc
    ".env",
    ".pytest_cache/",
    ".mypy_cache/",
    "coverage.xml",
    "*.sqlite3",
    "*.db",
    "*.lock",
    "tmp/",
    "cache/",
    ".svn/",
];

/// Error raised while evaluating a single rule against a path
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    /// The pattern is empty once its trailing separators are removed
    #[error("empty pattern")]
    Empty,

    /// A `[` or `{` group is never closed
    #[error("unclosed '{delimiter}' in pattern '{pattern}'")]
    Unbalanced { pattern: String, delimiter: char },
}

/// A single glob-style exclusion rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IgnoreRule {
    /// The pattern as written
    raw: String,
    /// The pattern without its trailing separators
    glob: String,
    /// `*/` + glob
    one_level: String,
    /// `**/` + glob
    any_depth: String,
    /// Whether the rule only applies to directories
    dir_only: bool,
}

impl IgnoreRule {
    /// Create a rule; a trailing `/` marks it directory-only
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let glob = raw.trim_end_matches('/').trim_start_matches("./").to_string();
        Self {
            dir_only: raw.ends_with('/'),
            one_level: format!("*/{}", glob),
            any_depth: format!("**/{}", glob),
            glob,
            raw,
        }
    }

    /// The pattern as written
    pub fn pattern(&self) -> &str {
        &self.raw
    }

    /// Evaluate the rule against a candidate path
    fn evaluate(&self, candidate: &Candidate) -> Result<bool, PatternError> {
        if !candidate.is_dir && self.dir_only {
            return Ok(false);
        }
        self.check_syntax()?;

        let relative = candidate.relative.as_str();
        if glob_match(&self.glob, relative)
            || glob_match(&self.one_level, relative)
            || glob_match(&self.any_depth, relative)
            || candidate.name() == self.raw
        {
            return Ok(true);
        }

        Ok(candidate.is_dir && candidate.segments.iter().any(|segment| *segment == self.glob))
    }

    fn check_syntax(&self) -> Result<(), PatternError> {
        if self.glob.is_empty() {
            return Err(PatternError::Empty);
        }

        let mut open: Option<char> = None;
        let mut braces = 0usize;
        let mut chars = self.glob.chars();
        while let Some(c) = chars.next() {
            match (open, c) {
                (_, '\\') => {
                    chars.next();
                }
                (None, '[') => open = Some('['),
                (Some('['), ']') => open = None,
                (None, '{') => braces += 1,
                (None, '}') => braces = braces.saturating_sub(1),
                _ => {}
            }
        }

        let unclosed = match (open, braces) {
            (Some(delimiter), _) => Some(delimiter),
            (None, 0) => None,
            (None, _) => Some('{'),
        };
        match unclosed {
            Some(delimiter) => Err(PatternError::Unbalanced {
                pattern: self.raw.clone(),
                delimiter,
            }),
            None => Ok(()),
        }
    }
}

/// The path facts every rule is evaluated against
struct Candidate {
    /// Path relative to the base, `/`-separated
    relative: String,
    /// Normal components of the relative path
    segments: Vec<String>,
    is_dir: bool,
}

impl Candidate {
    fn new(entry: &Entry, base: &Path) -> Self {
        let relative = entry.path.strip_prefix(base).unwrap_or(entry.path.as_path());
        let segments: Vec<String> = relative
            .components()
            .filter_map(|component| match component {
                Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect();

        Self {
            relative: segments.join("/"),
            segments,
            is_dir: entry.is_dir,
        }
    }

    fn name(&self) -> &str {
        self.segments.last().map(String::as_str).unwrap_or_default()
    }
}

/// The exclusion predicate for one invocation: the built-in rules followed by
/// the user's rules, resolved against a base directory.
#[derive(Debug, Clone)]
pub struct IgnoreSet {
    base: PathBuf,
    rules: Vec<IgnoreRule>,
}

impl IgnoreSet {
    /// Build the set from the built-in defaults plus `extra` patterns
    pub fn new(base: impl Into<PathBuf>, extra: &[String]) -> Self {
        let rules = DEFAULT_IGNORE_PATTERNS
            .iter()
            .map(|pattern| IgnoreRule::new(*pattern))
            .chain(extra.iter().map(IgnoreRule::new))
            .collect();
        Self::with_rules(base, rules)
    }

    /// Build the set from an explicit list of rules (no defaults)
    pub fn with_rules(base: impl Into<PathBuf>, rules: Vec<IgnoreRule>) -> Self {
        Self {
            base: base.into(),
            rules,
        }
    }

    /// The set to use for a traversal rooted at `root`
    ///
    /// Roots under the base share this set. A root outside the base gets the
    /// same rules resolved against the root's parent, so directories above
    /// the root (such as `/tmp`) never take part in matching.
    pub fn scoped_to(&self, root: &Path) -> Cow<'_, IgnoreSet> {
        if root.starts_with(&self.base) {
            return Cow::Borrowed(self);
        }

        let base = root.parent().unwrap_or(root);
        debug!("Matching {} relative to {}", root.display(), base.display());
        Cow::Owned(Self::with_rules(base, self.rules.clone()))
    }

    /// Rules in evaluation order
    pub fn rules(&self) -> &[IgnoreRule] {
        &self.rules
    }

    /// Check whether an entry is excluded
    ///
    /// The base directory itself is never excluded. A rule that fails to
    /// evaluate counts as not matching.
    pub fn should_ignore(&self, entry: &Entry) -> bool {
        let candidate = Candidate::new(entry, &self.base);
        if candidate.segments.is_empty() {
            return false;
        }

        self.rules.iter().any(|rule| match rule.evaluate(&candidate) {
            Ok(matched) => matched,
            Err(e) => {
                trace!("Skipping pattern '{}': {}", rule.pattern(), e);
                false
            }
        })
    }
}

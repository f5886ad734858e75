/*!
 * llmprint - Print directory structures and file contents for LLM context
 *
 * Renders a directory either as an ASCII tree of names or as a sequence of
 * path-headed file blocks, skipping common build and tooling artifacts, and
 * optionally copies the result to the system clipboard.
 */

pub mod app;
pub mod clipboard;
pub mod config;
pub mod content;
pub mod error;
pub mod logger;
pub mod matcher;
pub mod output;
pub mod tree;
pub mod types;
pub mod utils;

#[cfg(test)]
mod tests;

// Re-export main components for easier access
pub use clipboard::{Clipboard, SystemClipboard};
pub use config::{Args, Config};
pub use content::ContentBlocks;
pub use error::{LlmPrintError, Result};
pub use matcher::{IgnoreRule, IgnoreSet, DEFAULT_IGNORE_PATTERNS};
pub use tree::TreeLines;
pub use types::{Entry, Fragment, Mode};

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

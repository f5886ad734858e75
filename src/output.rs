/*!
 * Output dispatch for llmprint
 *
 * Rendered fragments go to stdout (unless quiet) and, when a copy was
 * requested, into a buffer that is handed to the clipboard at the end.
 */

use std::io::{self, Write};

use crate::clipboard::{Clipboard, ClipboardError};
use crate::types::{Fragment, Mode};
use crate::utils::format_count;

/// Forwards fragments to the active sinks in traversal order
pub struct OutputSink<W: Write> {
    stdout: W,
    quiet: bool,
    buffer: Option<String>,
}

impl<W: Write> OutputSink<W> {
    /// Create a sink; `capture` enables the copy buffer
    pub fn new(stdout: W, quiet: bool, capture: bool) -> Self {
        Self {
            stdout,
            quiet,
            buffer: capture.then(String::new),
        }
    }

    /// Write one fragment to every active sink
    ///
    /// Missing-path notices are shown on stdout but never copied.
    pub fn emit(&mut self, fragment: Fragment) -> io::Result<()> {
        match fragment {
            Fragment::Text(text) => {
                if !self.quiet {
                    self.stdout.write_all(text.as_bytes())?;
                }
                if let Some(buffer) = self.buffer.as_mut() {
                    buffer.push_str(&text);
                }
            }
            Fragment::NotFound(target) => {
                if !self.quiet {
                    writeln!(self.stdout, "Path not found: {}", target)?;
                }
            }
        }
        Ok(())
    }

    /// Stop rendering; returns stdout and the copy session, if any
    pub fn finish(mut self) -> io::Result<(W, Option<CopySession>)> {
        self.stdout.flush()?;
        Ok((self.stdout, self.buffer.map(CopySession::new)))
    }
}

/// Owns the copy buffer for one invocation
///
/// `copy` consumes the session, so the buffer is released whether or not the
/// clipboard accepted it.
#[derive(Debug)]
pub struct CopySession {
    buffer: String,
}

impl CopySession {
    fn new(buffer: String) -> Self {
        Self { buffer }
    }

    #[cfg(test)]
    fn text(&self) -> &str {
        &self.buffer
    }

    /// Send the buffer to the clipboard and return its size
    pub fn copy(self, clipboard: &dyn Clipboard) -> Result<CopyStats, ClipboardError> {
        clipboard.copy_to_clipboard(&self.buffer)?;
        Ok(CopyStats::of(&self.buffer))
    }
}

/// Size of the copied text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CopyStats {
    /// Number of newline characters
    pub lines: usize,
    /// Number of characters
    pub chars: usize,
}

impl CopyStats {
    pub fn of(text: &str) -> Self {
        Self {
            lines: text.matches('\n').count(),
            chars: text.chars().count(),
        }
    }
}

/// Confirmation shown after a successful copy
pub fn copy_confirmation(mode: Mode, targets: &[String], stats: CopyStats) -> String {
    let what = match mode {
        Mode::Structure => "tree structure of",
        Mode::Contents => "contents of",
    };
    let scope = if targets.is_empty() {
        format!("Copied {} current directory", what)
    } else {
        format!("Copied {}: {}", what, targets.join(", "))
    };

    format!(
        "\n{}\n({} lines, {} characters copied to clipboard)\n",
        scope,
        format_count(stats.lines),
        format_count(stats.chars)
    )
}

/// Message shown when the clipboard rejected the copy
pub fn copy_failure(error: &ClipboardError) -> String {
    format!("\nFailed to copy to clipboard: {}\n", error)
}

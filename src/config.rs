/*!
 * Configuration handling for llmprint
 */

use std::env;
use std::path::PathBuf;

use clap::Parser;
use clap_complete::Shell;

use crate::error::Result;
use crate::types::Mode;

const EXAMPLES: &str = "\
Examples:
  Print directory structure:    $ llmprint -s
  Print specific directories:   $ llmprint -i src/ tests/
  Exclude directories:          $ llmprint -i . -e node_modules dist
  Exclude by pattern:           $ llmprint -s -e \"*.md\" \"*.pyc\"
  Print tree structure:         $ llmprint
  Print all files in current:   $ llmprint .
  Copy to clipboard:            $ llmprint -s -c
  Copy and also print:          $ llmprint -s -c -p";

/// Command-line arguments for llmprint
#[derive(Parser, Debug, Clone, Default)]
#[clap(
    name = "llmprint",
    version = crate::VERSION,
    about = "Print directory structures and file contents in a clean, LLM-friendly format",
    long_about = "Prints directory structures and file contents in a clean, LLM-friendly format. \
                  Perfect for generating context when working with chatbots or code assistants. \
                  By default, it skips common development artifacts using .gitignore-style rules.",
    after_help = EXAMPLES
)]
pub struct Args {
    /// Paths to process when no --include flag is specified. If empty, uses current directory
    pub paths: Vec<String>,

    /// Paths to include in the output; files or directories. Takes precedence over positional paths
    #[clap(short, long, num_args = 0..)]
    pub include: Vec<String>,

    /// Patterns to exclude from the output. Supports glob patterns (e.g., *.pyc, __pycache__)
    #[clap(short, long, num_args = 0..)]
    pub exclude: Vec<String>,

    /// Only print the directory structure as a tree, without file contents
    #[clap(short, long)]
    pub structure: bool,

    /// Copy the output to clipboard (suppresses stdout by default)
    #[clap(short, long)]
    pub copy: bool,

    /// Print to stdout (when using --copy, output is suppressed by default)
    #[clap(short, long)]
    pub print: bool,

    /// Generate shell completions
    #[clap(long = "generate", value_enum)]
    pub generate: Option<Shell>,
}

impl Args {
    /// True when no flag or positional argument was given at all
    pub fn is_bare(&self) -> bool {
        self.paths.is_empty()
            && self.include.is_empty()
            && self.exclude.is_empty()
            && !self.structure
            && !self.copy
            && !self.print
    }
}

/// Application configuration
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Directory that relative paths are resolved against
    pub base_dir: PathBuf,

    /// Include targets; empty means the whole base directory
    pub include_paths: Vec<String>,

    /// User patterns added to the built-in ignore list
    pub exclude_patterns: Vec<String>,

    /// What to render
    pub mode: Mode,

    /// Send the output to the clipboard
    pub copy: bool,

    /// Print to stdout even when copying
    pub print: bool,
}

impl Config {
    /// Create configuration from command-line arguments, rooted at the
    /// current working directory
    pub fn from_args(args: Args) -> Result<Self> {
        Ok(Self::from_args_in(args, env::current_dir()?))
    }

    /// Create configuration from command-line arguments and a base directory
    pub fn from_args_in(args: Args, base_dir: PathBuf) -> Self {
        let mode = if args.structure || args.is_bare() {
            Mode::Structure
        } else {
            Mode::Contents
        };
        let include_paths = if args.include.is_empty() {
            args.paths
        } else {
            args.include
        };

        Self {
            base_dir,
            include_paths,
            exclude_patterns: args.exclude,
            mode,
            copy: args.copy,
            print: args.print,
        }
    }

    /// Whether stdout output is suppressed
    pub fn quiet(&self) -> bool {
        self.copy && !self.print
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        crate::ensure!(
            self.base_dir.is_dir(),
            PathNotFound,
            "{}",
            self.base_dir.display()
        );
        Ok(())
    }
}

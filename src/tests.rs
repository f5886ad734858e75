/*!
 * End-to-end tests for llmprint invocations
 */

use std::cell::RefCell;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;

use clap::Parser;
use tempfile::tempdir;

use crate::app;
use crate::clipboard::{self, Clipboard, ClipboardError};
use crate::config::{Args, Config};
use crate::types::Mode;

/// Clipboard double that records what it was given
#[derive(Default)]
struct RecordingClipboard {
    copied: RefCell<Option<String>>,
}

impl Clipboard for RecordingClipboard {
    fn copy_to_clipboard(&self, text: &str) -> clipboard::Result<()> {
        *self.copied.borrow_mut() = Some(text.to_string());
        Ok(())
    }
}

/// Clipboard double that always fails
struct BrokenClipboard;

impl Clipboard for BrokenClipboard {
    fn copy_to_clipboard(&self, _text: &str) -> clipboard::Result<()> {
        Err(ClipboardError::NoClipboardFound)
    }
}

// Helper function to create a small project tree
fn setup_project() -> io::Result<tempfile::TempDir> {
    let temp_dir = tempdir()?;
    let root = temp_dir.path();

    fs::create_dir_all(root.join("src").join("bin"))?;
    fs::create_dir_all(root.join("node_modules").join("pkg"))?;
    fs::create_dir_all(root.join(".git").join("objects"))?;

    let mut readme = File::create(root.join("README.md"))?;
    writeln!(readme, "# Project")?;
    fs::write(root.join("src").join("lib.rs"), "pub fn answer() -> u32 { 42 }\n")?;
    fs::write(root.join("src").join("bin").join("cli.rs"), "fn main() {}\n")?;
    fs::write(root.join("node_modules").join("pkg.js"), "module.exports = {};\n")?;
    fs::write(root.join("node_modules").join("pkg").join("index.js"), "")?;
    fs::write(root.join(".git").join("HEAD"), "ref: refs/heads/main\n")?;
    fs::write(root.join("app.pyc"), [0u8, 1, 2])?;

    Ok(temp_dir)
}

fn config_for(root: &Path, argv: &[&str]) -> Config {
    let args = Args::try_parse_from(std::iter::once("llmprint").chain(argv.iter().copied()))
        .expect("arguments parse");
    Config::from_args_in(args, root.to_path_buf())
}

fn run_with(config: &Config, clipboard: &dyn Clipboard) -> io::Result<String> {
    let mut stdout = Vec::new();
    app::run(config, clipboard, &mut stdout)?;
    Ok(String::from_utf8_lossy(&stdout).into_owned())
}

fn run(root: &Path, argv: &[&str]) -> io::Result<String> {
    run_with(&config_for(root, argv), &RecordingClipboard::default())
}

fn dir_name(root: &Path) -> String {
    root.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[test]
fn test_empty_directory_prints_only_its_name() -> io::Result<()> {
    let temp_dir = tempdir()?;
    let output = run(temp_dir.path(), &[])?;
    assert_eq!(output, format!("{}/\n", dir_name(temp_dir.path())));
    Ok(())
}

#[test]
fn test_structure_of_project() -> io::Result<()> {
    let temp_dir = setup_project()?;
    let output = run(temp_dir.path(), &["-s"])?;

    let expected = [
        format!("{}/", dir_name(temp_dir.path())).as_str(),
        "├── README.md",
        "├── .git",
        "├── node_modules",
        "└── src",
        "    ├── lib.rs",
        "    └── bin",
        "        └── cli.rs",
        "",
    ]
    .join("\n");
    assert_eq!(output, expected);
    Ok(())
}

#[test]
fn test_structure_is_idempotent() -> io::Result<()> {
    let temp_dir = setup_project()?;
    assert_eq!(run(temp_dir.path(), &[])?, run(temp_dir.path(), &[])?);
    Ok(())
}

#[test]
fn test_structure_of_include_targets() -> io::Result<()> {
    let temp_dir = setup_project()?;
    let output = run(temp_dir.path(), &["-s", "-i", "src/", "README.md"])?;
    assert_eq!(output, "src/\n├── lib.rs\n└── bin\n    └── cli.rs\nREADME.md\n");
    Ok(())
}

#[test]
fn test_structure_of_excluded_target_prints_header_only() -> io::Result<()> {
    let temp_dir = setup_project()?;
    let output = run(temp_dir.path(), &["-s", "-i", "node_modules"])?;
    assert_eq!(output, "node_modules/\n");
    Ok(())
}

#[test]
fn test_missing_include_target() -> io::Result<()> {
    let temp_dir = tempdir()?;
    assert_eq!(run(temp_dir.path(), &["-i", "missing_dir"])?, "Path not found: missing_dir\n");
    assert_eq!(run(temp_dir.path(), &["-s", "-i", "missing_dir"])?, "Path not found: missing_dir\n");
    Ok(())
}

#[test]
fn test_overlapping_content_targets_dump_once() -> io::Result<()> {
    let temp_dir = setup_project()?;
    let output = run(temp_dir.path(), &["-i", "src", "src/lib.rs", "./src/bin/"])?;

    let header = format!("src/lib.rs\n{}\n", "-".repeat(40));
    assert_eq!(output.matches(&header).count(), 1);
    assert_eq!(output.matches("src/bin/cli.rs\n").count(), 1);
    Ok(())
}

#[test]
fn test_repeated_structure_targets_render_once() -> io::Result<()> {
    let temp_dir = setup_project()?;
    let output = run(temp_dir.path(), &["-s", "-i", "src", "src/", "src/bin", "src/lib.rs"])?;
    assert_eq!(output, "src/\n├── lib.rs\n└── bin\n    └── cli.rs\n");

    let reversed = run(temp_dir.path(), &["-s", "-i", "src/bin", "README.md", "src"])?;
    assert_eq!(reversed, "README.md\nsrc/\n├── lib.rs\n└── bin\n    └── cli.rs\n");
    Ok(())
}

#[test]
fn test_structure_of_target_outside_base() -> io::Result<()> {
    let temp_dir = tempdir()?;
    let base = temp_dir.path().join("proj");
    let outside = temp_dir.path().join("tmp").join("x");
    fs::create_dir_all(&base)?;
    fs::create_dir_all(outside.join("src"))?;
    fs::write(outside.join("src").join("a.rs"), "")?;

    let target = outside.display().to_string();
    let output = run(&base, &["-s", "-i", &target])?;
    assert_eq!(output, format!("{}/\n└── src\n    └── a.rs\n", target));
    Ok(())
}

#[test]
fn test_contents_skip_default_exclusions() -> io::Result<()> {
    let temp_dir = tempdir()?;
    let root = temp_dir.path();
    fs::create_dir(root.join("node_modules"))?;
    fs::write(root.join("README.md"), "hello")?;
    fs::write(root.join("node_modules").join("pkg.js"), "ignored")?;

    let output = run(root, &["."])?;
    let expected = format!("README.md\n{}\nhello\n{}\n", "-".repeat(40), "=".repeat(40));
    assert_eq!(output, expected);
    Ok(())
}

#[test]
fn test_contents_of_project() -> io::Result<()> {
    let temp_dir = setup_project()?;
    let output = run(temp_dir.path(), &["-i", "."])?;

    let headers: Vec<&str> = output
        .split(&format!("{}\n", "=".repeat(40)))
        .filter_map(|block| block.lines().next())
        .collect();
    assert_eq!(headers, vec!["README.md", "src/lib.rs", "src/bin/cli.rs"]);
    assert!(output.contains("pub fn answer() -> u32 { 42 }\n\n"));
    Ok(())
}

#[test]
fn test_user_exclusions_extend_defaults() -> io::Result<()> {
    let temp_dir = setup_project()?;
    let output = run(temp_dir.path(), &["-e", "*.md", "bin", "-i", "."])?;

    assert!(output.starts_with("src/lib.rs\n"));
    assert!(!output.contains("README.md"));
    assert!(!output.contains("cli.rs"));
    Ok(())
}

#[test]
fn test_copy_without_print_is_quiet() -> io::Result<()> {
    let temp_dir = tempdir()?;
    let root = temp_dir.path();
    File::create(root.join("a.txt"))?;
    File::create(root.join("b.txt"))?;

    let config = config_for(root, &["-s", "-c"]);
    assert!(config.quiet());
    assert_eq!(config.mode, Mode::Structure);

    let clipboard = RecordingClipboard::default();
    let output = run_with(&config, &clipboard)?;

    let copied = clipboard.copied.borrow().clone().expect("text was copied");
    let expected_copy = format!("{}/\n├── a.txt\n└── b.txt\n", dir_name(root));
    assert_eq!(copied, expected_copy);

    let expected_output = format!(
        "\nCopied tree structure of current directory\n(3 lines, {} characters copied to clipboard)\n",
        expected_copy.chars().count()
    );
    assert_eq!(output, expected_output);
    Ok(())
}

#[test]
fn test_copy_with_print_writes_both() -> io::Result<()> {
    let temp_dir = tempdir()?;
    let root = temp_dir.path();
    fs::write(root.join("notes.txt"), "note")?;

    let clipboard = RecordingClipboard::default();
    let output = run_with(&config_for(root, &["-c", "-p", "notes.txt"]), &clipboard)?;

    let copied = clipboard.copied.borrow().clone().expect("text was copied");
    assert!(output.starts_with(&copied));
    assert!(output.ends_with(&format!(
        "\nCopied contents of: notes.txt\n(4 lines, {} characters copied to clipboard)\n",
        copied.chars().count()
    )));
    Ok(())
}

#[test]
fn test_clipboard_failure_is_reported_not_fatal() -> io::Result<()> {
    let temp_dir = tempdir()?;
    fs::write(temp_dir.path().join("notes.txt"), "note")?;

    let output = run_with(&config_for(temp_dir.path(), &["-c"]), &BrokenClipboard)?;
    assert_eq!(output, "\nFailed to copy to clipboard: No suitable clipboard mechanism found\n");
    Ok(())
}

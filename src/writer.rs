//! The indentation-tracking line buffer behind each generated artifact.
//! Two writers coexist per run: one for the script template, one (optional)
//! for the separate utility functions file.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

/// Where a writer's merged content ends up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// Print to the terminal, framed by labeled banners.
    Stdout,
    /// Overwrite the given file.
    File(PathBuf),
}

impl Destination {
    pub fn path(&self) -> Option<&Path> {
        match self {
            Destination::File(path) => Some(path),
            Destination::Stdout => None,
        }
    }
}

/// Number of spaces forming one indentation unit in authored blocks.
/// Fragment text is written once with this unit and converted to the
/// user-chosen width on registration.
const AUTHORED_INDENT: usize = 4;

static INDENT_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^( {4})+").expect("Invalid indentation regex"));

/// Preferences regarding indentation and so on, with the current state in
/// that regard, plus the buffered output lines.
#[derive(Debug)]
pub struct ScriptWriter {
    lines: Vec<String>,
    // May drop below zero on unbalanced unindent calls; that is a caller
    // bug, and negative depths simply indent nothing, as zero does.
    indent_steps: isize,
    indent_size: usize,
    destination: Destination,
}

impl ScriptWriter {
    pub fn new(indent_size: usize, destination: Destination) -> Self {
        Self { lines: Vec::new(), indent_steps: 0, indent_size, destination }
    }

    pub fn destination(&self) -> &Destination {
        &self.destination
    }

    pub fn indent_size(&self) -> usize {
        self.indent_size
    }

    /// Changes the width used for subsequent lines. The usage fragment
    /// narrows the width inside the help here-document and restores it.
    pub fn set_indent_size(&mut self, indent_size: usize) {
        self.indent_size = indent_size;
    }

    /// Increases the current indent level.
    pub fn indent(&mut self, levels: usize) {
        self.indent_steps += levels as isize;
    }

    /// Decreases the current indent level.
    pub fn unindent(&mut self, levels: usize) {
        self.indent_steps -= levels as isize;
    }

    /// Registers an automatically indented line. The argument is not
    /// expected to contain a newline character. A blank argument leaves an
    /// empty line, with no indentation spaces at all.
    pub fn push_line(&mut self, line: &str) {
        if line.trim().is_empty() {
            self.lines.push(String::new());
        } else {
            let depth = self.indent_steps.max(0) as usize;
            let prefix = " ".repeat(depth * self.indent_size);
            self.lines.push(format!("{}{}", prefix, line));
        }
    }

    /// Registers a blank, unindented line.
    pub fn blank(&mut self) {
        self.push_line("");
    }

    /// Registers multiple lines at once. Indentation in the input is
    /// expected to be done via four-space units and is converted to the
    /// configured width.
    ///
    /// Unless `keep_indentation` is set, the block is first uniformly
    /// de-indented to its minimum common margin. Keeping the indentation is
    /// useful to append a small conditional piece inside a larger block
    /// registered just before.
    pub fn push_block(&mut self, text: &str, keep_indentation: bool) {
        let text = if keep_indentation { text.to_string() } else { dedent(text) };
        let unit = " ".repeat(self.indent_size);
        for line in text.lines() {
            let converted = INDENT_RUN.replace(line, |caps: &regex::Captures| {
                unit.repeat(caps[0].len() / AUTHORED_INDENT)
            });
            self.push_line(&converted);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Inserts raw lines before everything registered so far.
    /// Used to add the shebang to the utility file at the last moment.
    pub fn prepend(&mut self, lines: &[&str]) {
        let mut prefixed: Vec<String> = lines.iter().map(|line| line.to_string()).collect();
        prefixed.append(&mut self.lines);
        self.lines = prefixed;
    }

    /// Removes potential trailing empty lines.
    pub fn trim_trailing_blanks(&mut self) {
        while self.lines.last().is_some_and(|line| line.is_empty()) {
            self.lines.pop();
        }
    }

    /// Merges the buffered lines into the final text, without a trailing
    /// newline.
    pub fn render(&self) -> String {
        self.lines.join("\n")
    }
}

/// Strips the minimum common leading-space margin from every line.
/// Lines consisting solely of whitespace are ignored when computing the
/// margin and normalized to empty lines.
fn dedent(text: &str) -> String {
    let margin = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.len() - line.trim_start_matches(' ').len())
        .min()
        .unwrap_or(0);

    text.lines()
        .map(|line| if line.trim().is_empty() { "" } else { &line[margin..] })
        .collect::<Vec<_>>()
        .join("\n")
}

//! Terminal rendering of evaluation results.

use anyhow::Context as _;
use colored::Colorize;
use serde::Serialize;
use serde_json::Value;
use std::io::{self, ErrorKind, Write};

use crate::path::{EvalError, FetchResult, JSONPointer, format_location};

// ==============================================================================
// Colorized JSON Output
// ==============================================================================

/// Write a single match (location header + colorized JSON value) to `writer`.
/// Silently returns `Ok(())` on broken pipe so that piping to tools like
/// `less` or `head` exits cleanly.
///
/// # Errors
///
/// Returns an error if writing to `writer` fails.
pub fn write_colored_match<W: Write>(
    writer: &mut W,
    found: &JSONPointer,
    pretty: bool,
    show_path: bool,
) -> anyhow::Result<()> {
    let location = found.location();

    let result = (|| -> io::Result<()> {
        if show_path && !location.is_empty() {
            writeln!(writer, "{}:", location.bold().magenta())?;
        }
        Painter { writer: &mut *writer, pretty }.value(found.value, 0)?;
        writeln!(writer)
    })();

    ignore_broken_pipe(result).context("write colorized JSON to stdout")
}

/// Write a branch error to `writer`, e.g. `error: not found`.
///
/// # Errors
///
/// Returns an error if writing to `writer` fails.
pub fn write_colored_error<W: Write>(
    writer: &mut W,
    err: &EvalError,
) -> anyhow::Result<()> {
    let result = writeln!(writer, "{}: {err}", "error".red().bold());
    ignore_broken_pipe(result).context("write error to stderr")
}

fn ignore_broken_pipe(result: io::Result<()>) -> io::Result<()> {
    match result {
        Err(err) if err.kind() == ErrorKind::BrokenPipe => Ok(()),
        other => other,
    }
}

/// Writes JSON values with syntax highlighting.
struct Painter<'w, W: Write> {
    writer: &'w mut W,
    pretty: bool,
}

impl<W: Write> Painter<'_, W> {
    fn value(&mut self, value: &Value, indent: usize) -> io::Result<()> {
        match value {
            Value::Null => write!(self.writer, "{}", "null".red().dimmed()),
            Value::Bool(b) => {
                write!(self.writer, "{}", b.to_string().yellow().bold())
            }
            Value::Number(n) => {
                write!(self.writer, "{}", n.to_string().yellow())
            }
            Value::String(s) => write!(self.writer, "{}", quote(s).green()),
            Value::Array(items) => self.container(
                ('[', ']'),
                items.iter().map(|v| (None::<&str>, v)),
                indent,
            ),
            Value::Object(map) => self.container(
                ('{', '}'),
                map.iter().map(|(k, v)| (Some(k.as_str()), v)),
                indent,
            ),
        }
    }

    /// Writes the entries of an array (no keys) or object (keys).
    fn container<'v>(
        &mut self,
        (open, close): (char, char),
        entries: impl ExactSizeIterator<Item = (Option<&'v str>, &'v Value)>,
        indent: usize,
    ) -> io::Result<()> {
        let inner = indent + 2;
        let empty = entries.len() == 0;

        write!(self.writer, "{open}")?;
        for (i, (key, value)) in entries.enumerate() {
            if i > 0 {
                write!(self.writer, ",")?;
            }
            self.newline(inner)?;
            if let Some(key) = key {
                let separator = if self.pretty { ": " } else { ":" };
                write!(self.writer, "{}{separator}", quote(key).cyan())?;
            }
            self.value(value, inner)?;
        }
        if !empty {
            self.newline(indent)?;
        }
        write!(self.writer, "{close}")
    }

    fn newline(&mut self, indent: usize) -> io::Result<()> {
        if self.pretty {
            write!(self.writer, "\n{:indent$}", "")?;
        }
        Ok(())
    }
}

/// JSON-quotes a string, escaping as needed.
fn quote(s: &str) -> String {
    Value::from(s).to_string()
}

/// One line of the machine-readable `--json` report.
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    /// Location of the match, absent for errors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// The matched value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<&'a Value>,
    /// Message of the error that ended the branch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<'a> From<&FetchResult<'a>> for Report<'a> {
    fn from(item: &FetchResult<'a>) -> Self {
        match item {
            Ok(found) => Self {
                path: Some(format_location(&found.path)),
                value: Some(found.value),
                error: None,
            },
            Err(err) => {
                Self { path: None, value: None, error: Some(err.to_string()) }
            }
        }
    }
}

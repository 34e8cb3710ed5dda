//! Text transforms over LAMMPS control scripts.
//!
//! - [`template`] fills `variable` declarations of a control-script template.
//! - [`submit`] renders the batch submission script from its field template.
//! - [`restart`] turns a cold-start control script into a continuation script.
//!
//! Every transform preserves the lines it does not target verbatim and in order.

pub mod restart;
pub mod submit;
pub mod template;

use thiserror::Error;

/// A control-script or submission template lacks a structure a transform relies on.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum TemplateError {
    #[error("Malformed template: marker line '{marker}' not found")]
    MissingMarker { marker: &'static str },

    #[error("Malformed template: block starting at '{start}' is not closed by '{end}'")]
    UnterminatedBlock {
        start: &'static str,
        end: &'static str,
    },

    #[error("Malformed template: no '{directive}' directive found")]
    MissingDirective { directive: &'static str },

    #[error("Malformed template: unknown field '{{{field}}}'")]
    UnknownField { field: String },

    #[error("Malformed template: unbalanced brace at byte {position}")]
    UnbalancedBrace { position: usize },
}

/// Splits text on `\n` and remembers whether it ended with a newline.
///
/// The `\r` of a CRLF ending stays on its line, so joining with `\n` restores the
/// original bytes.
pub(crate) fn split_lines(text: &str) -> (Vec<String>, bool) {
    let lines = text
        .split_inclusive('\n')
        .map(|l| l.strip_suffix('\n').unwrap_or(l).to_string())
        .collect();
    (lines, text.ends_with('\n'))
}

/// Carriage return a line written in place of `line` needs to keep its ending.
pub(crate) fn carriage_return(line: &str) -> &'static str {
    if line.ends_with('\r') { "\r" } else { "" }
}

pub(crate) fn join_lines(lines: &[String], trailing_newline: bool) -> String {
    let mut out = lines.join("\n");
    if trailing_newline && !lines.is_empty() {
        out.push('\n');
    }
    out
}

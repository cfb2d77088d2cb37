//! Error types for recfile parsing and writing.
//!
//! Two things can go wrong: the underlying I/O fails, or the text violates
//! the recfile grammar. I/O errors are propagated verbatim from [`std::io`];
//! format errors carry the 1-based raw line number where the violation was
//! detected, so an error message points straight at the offending line of the
//! source file.
//!
//! End of input is *not* an error. The parser treats it as the expected
//! terminator of a well-formed file, and callers of [`crate::load`] never see
//! it.
//!
//! ## Examples
//!
//! ```rust
//! use recfile::{from_str, Error};
//!
//! let result = from_str("\n+continuation with nothing before it\n");
//! match result {
//!     Err(Error::InvalidLineWrap { line }) => assert_eq!(line, 2),
//!     other => panic!("expected invalid line wrap, got {:?}", other),
//! }
//! ```

use thiserror::Error;

/// All errors reported by this crate.
///
/// The first malformed line aborts the whole load; there is no
/// skip-and-continue policy for bad input.
#[derive(Debug, Error)]
pub enum Error {
    /// Failure in the underlying I/O layer, propagated verbatim.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A continuation line (`+`) with no preceding content to extend.
    #[error("invalid line wrap marker at line {line}")]
    InvalidLineWrap { line: usize },

    /// A non-empty line that does not split into exactly a name and a value
    /// on the `": "` separator.
    #[error("invalid field at line {line}")]
    InvalidField { line: usize },

    /// A field name outside the `[a-zA-Z%][a-zA-Z0-9_]*` grammar.
    #[error("invalid field name {name:?} at line {line}")]
    InvalidFieldName { line: usize, name: String },

    /// A known descriptor property whose value fails its syntax rule.
    #[error("invalid value for property {name:?} at line {line}: {reason}")]
    InvalidProperty {
        line: usize,
        name: String,
        reason: String,
    },

    /// A second `%rec:` line inside one descriptor block.
    #[error("multiple record types at line {line}")]
    MultipleRecordTypes { line: usize },

    /// A descriptor block that ended without any `%rec:` line.
    #[error("missing record type at line {line}")]
    MissingRecordType { line: usize },

    /// Write-time guard: a record set with the default (empty) type may not
    /// carry special fields.
    #[error("invalid record set descriptor: untyped record set with special fields")]
    InvalidDescriptor,
}

impl Error {
    /// Creates an [`Error::InvalidProperty`] for the given property name.
    pub(crate) fn property(line: usize, name: &str, reason: impl Into<String>) -> Self {
        Error::InvalidProperty {
            line,
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

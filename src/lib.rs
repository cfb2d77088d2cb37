//! # recfile
//!
//! A reader and writer for GNU recutils-style recfiles: plain-text,
//! human-editable databases.
//!
//! ## What is a recfile?
//!
//! A recfile is a line-oriented text database. Records are groups of
//! `Name: Value` field lines separated by blank lines; record sets group
//! records under an optional descriptor block (`%rec: Type` plus metadata
//! properties); `#` lines are comments and `+` lines continue the previous
//! line:
//!
//! ```text
//! %rec: Book
//! %mandatory: Title
//!
//! Title: The Sound and the Fury
//! Author: William Faulkner
//!
//! Title: Ficciones
//! Author: Jorge Luis Borges
//! ```
//!
//! ## Key features
//!
//! - **Hand-written parser**: single-pass, peek-before-consume reading over
//!   one buffered stream; no grammar engine
//! - **Order preserving**: field, property, record, and record set order
//!   survive a round trip exactly
//! - **Descriptor validation**: the fixed recutils property vocabulary is
//!   syntax-checked; unknown `%` fields pass through untouched
//! - **Precise errors**: every format error carries the raw line number
//! - **No unsafe code**: written entirely in safe Rust
//!
//! ## Quick start
//!
//! ```rust
//! use recfile::from_str;
//!
//! let db = from_str(concat!(
//!     "%rec: Book\n",
//!     "%mandatory: Title\n",
//!     "\n",
//!     "Title: Ficciones\n",
//!     "Author: Jorge Luis Borges\n",
//! )).unwrap();
//!
//! let books = db.record_set("Book").unwrap();
//! assert_eq!(books.records[0].get("Author"), Some("Jorge Luis Borges"));
//! ```
//!
//! Reading and writing files:
//!
//! ```rust,no_run
//! let mut db = recfile::load("books.rec").unwrap();
//! if let Some(books) = db.record_set_mut("Book") {
//!     let mut record = recfile::Record::new();
//!     record.push("Title", "Pedro Páramo");
//!     books.records.push(record);
//! }
//! db.save("books.rec").unwrap();
//! ```
//!
//! ## Scope
//!
//! This crate parses and writes the format; it does not enforce the
//! constraints the descriptor declares. `%mandatory: Title` is carried as
//! data — whether every record actually has a `Title` is for the caller (or
//! a layer above) to check. Sorting, indexing, and querying are likewise out
//! of scope.
//!
//! ## Safety guarantees
//!
//! - No `unsafe` code blocks
//! - No panics in the public API
//! - Proper error propagation with `Result` types; the first malformed line
//!   aborts the load

pub mod error;
pub mod model;
pub mod parser;
pub mod spec;
pub mod writer;

pub use error::{Error, Result};
pub use model::{Database, Descriptor, Field, Property, Record, RecordSet};
pub use parser::Parser;

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Loads a recfile from `path` into a [`Database`].
///
/// The file is opened read-only, parsed to completion over one buffered
/// stream, and closed on every exit path. End of input terminates parsing
/// normally and is never surfaced as an error.
///
/// # Examples
///
/// ```rust,no_run
/// let db = recfile::load("books.rec").unwrap();
/// for set in &db.record_sets {
///     println!("{}: {} records", set.rec_type(), set.records.len());
/// }
/// ```
///
/// # Errors
///
/// Returns [`Error::Io`] for open/read failures and a format error for the
/// first grammar violation encountered.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn load(path: impl AsRef<Path>) -> Result<Database> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let database = from_reader(BufReader::new(file))?;
    log::debug!(
        "loaded {} record sets from {}",
        database.record_sets.len(),
        path.display()
    );
    Ok(database)
}

/// Parses a [`Database`] from a string of recfile text.
///
/// # Examples
///
/// ```rust
/// let db = recfile::from_str("Title: Ficciones\n").unwrap();
/// assert_eq!(db.record_sets.len(), 1);
/// ```
///
/// # Errors
///
/// Returns a format error for the first grammar violation encountered.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str(input: &str) -> Result<Database> {
    from_reader(input.as_bytes())
}

/// Parses a [`Database`] from any buffered reader of recfile text.
///
/// # Examples
///
/// ```rust
/// use std::io::Cursor;
///
/// let db = recfile::from_reader(Cursor::new(b"Title: Ficciones\n")).unwrap();
/// assert_eq!(db.record_sets.len(), 1);
/// ```
///
/// # Errors
///
/// Returns [`Error::Io`] if reading fails (including invalid UTF-8) and a
/// format error for the first grammar violation encountered.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader<R: BufRead>(reader: R) -> Result<Database> {
    Parser::new(reader).database()
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOOKS: &str = concat!(
        "%rec: Book\n",
        "%mandatory: Title\n",
        "\n",
        "Title: Foo\n",
        "Author: Bar\n",
        "\n",
        "Title: Baz\n",
    );

    #[test]
    fn test_end_to_end_books() {
        let db = from_str(BOOKS).unwrap();
        assert_eq!(db.record_sets.len(), 1);

        let set = &db.record_sets[0];
        assert_eq!(set.rec_type(), "Book");
        assert_eq!(set.descriptor.special_fields.len(), 1);
        assert_eq!(set.descriptor.special_fields[0].name, "mandatory");
        assert_eq!(set.descriptor.special_fields[0].value, "Title");
        assert_eq!(set.records.len(), 2);
        assert_eq!(set.records[0].get("Author"), Some("Bar"));
        assert_eq!(set.records[1].get("Title"), Some("Baz"));

        // Writing the parsed database reproduces the input byte for byte,
        // blank-line placement included.
        assert_eq!(db.to_rec_string().unwrap(), BOOKS);
    }

    #[test]
    fn test_multiple_sets_render_without_inter_set_blank() {
        let input = concat!(
            "Plain: record\n",
            "\n",
            "%rec: Book\n",
            "\n",
            "Title: Foo\n",
            "\n",
            "%rec: Magazine\n",
            "%unique: Issue\n",
            "\n",
            "Issue: 12\n",
        );
        let db = from_str(input).unwrap();
        assert_eq!(db.record_sets.len(), 3);

        // Inter-set spacing comes only from the next set's descriptor block,
        // so no blank line precedes a %rec line.
        assert_eq!(
            db.to_rec_string().unwrap(),
            concat!(
                "Plain: record\n",
                "%rec: Book\n",
                "\n",
                "Title: Foo\n",
                "%rec: Magazine\n",
                "%unique: Issue\n",
                "\n",
                "Issue: 12\n",
            )
        );
    }

    #[test]
    fn test_from_reader_matches_from_str() {
        let a = from_str(BOOKS).unwrap();
        let b = from_reader(std::io::Cursor::new(BOOKS.as_bytes())).unwrap();
        assert_eq!(a, b);
    }
}

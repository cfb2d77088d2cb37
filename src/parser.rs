//! Recfile parsing.
//!
//! The parser is a hand-written, state-based reader layered over a single
//! buffered, peekable byte stream. Four read operations cooperate, each built
//! on the one below it:
//!
//! 1. **Logical line assembly** — strips comment lines and joins `+`
//!    continuation lines into one logical line.
//! 2. **Record extraction** — collects `Name: Value` lines until a blank
//!    line.
//! 3. **Descriptor extraction** — same loop, but names are stripped of their
//!    `%` marker and known properties are syntax-checked.
//! 4. **Record set / database assembly** — peeks a single byte to decide
//!    whether the next block is a comment, a descriptor (and whether that
//!    descriptor opens a *new* record set), or a record.
//!
//! The peek-before-consume discipline is what makes the boundary rules work:
//! a `%` line seen after any record belongs to the next record set and must
//! not be consumed by the current one. End of input is modeled as `None`
//! everywhere and only the top-level database loop turns it into success.
//!
//! ## Usage
//!
//! Most callers want the crate-level entry points:
//!
//! ```rust
//! let db = recfile::from_str("%rec: Book\n\nTitle: Ficciones\n").unwrap();
//! assert_eq!(db.record_sets[0].rec_type(), "Book");
//! assert_eq!(db.record_sets[0].records[0].get("Title"), Some("Ficciones"));
//! ```

use std::io::BufRead;

use crate::error::{Error, Result};
use crate::model::{Database, Descriptor, Field, Property, Record, RecordSet};
use crate::spec::{
    self, COMMENT_PREFIX, FIELD_SEPARATOR, KEY_PROPERTY, LINE_DELIMITER, LINE_WRAP_PREFIX,
    REC_PROPERTY, SIZE_PROPERTY, SPECIAL_FIELD_PREFIX, TYPEDEF_PROPERTY, TYPE_PROPERTY,
};

/// The recfile parser.
///
/// Wraps any [`BufRead`] source and assembles a [`Database`] with
/// [`Parser::database`]. Created directly or via the crate-level
/// [`load`](crate::load) / [`from_str`](crate::from_str) /
/// [`from_reader`](crate::from_reader) functions.
pub struct Parser<R: BufRead> {
    reader: R,
    line_no: usize,
}

impl<R: BufRead> Parser<R> {
    pub fn new(reader: R) -> Self {
        Parser { reader, line_no: 0 }
    }

    /// Looks at the first byte of the unread input without consuming it.
    /// `None` means end of input.
    fn peek_byte(&mut self) -> Result<Option<u8>> {
        let buffer = self.reader.fill_buf()?;
        Ok(buffer.first().copied())
    }

    /// Reads one raw line, including its terminator if present. `None` means
    /// end of input; a final line without a terminator is still returned.
    fn read_raw_line(&mut self) -> Result<Option<String>> {
        let mut raw = String::new();
        if self.reader.read_line(&mut raw)? == 0 {
            return Ok(None);
        }
        self.line_no += 1;
        Ok(Some(raw))
    }

    /// Assembles the next logical line: the first non-comment raw line,
    /// extended by any `+` continuation lines that follow it. Comment lines
    /// may appear between a line and its continuation and are discarded.
    ///
    /// `None` means end of input, the expected terminator.
    fn next_logical_line(&mut self) -> Result<Option<String>> {
        let mut line = loop {
            match self.read_raw_line()? {
                None => return Ok(None),
                Some(raw) if raw.starts_with(COMMENT_PREFIX) => continue,
                Some(raw) => break unwrap_terminator(raw),
            }
        };

        loop {
            match self.peek_byte()? {
                Some(byte) if byte == COMMENT_PREFIX as u8 => {
                    if self.read_raw_line()?.is_none() {
                        break;
                    }
                }
                Some(byte) if byte == LINE_WRAP_PREFIX as u8 => {
                    // A continuation must have something to continue.
                    if line.is_empty() {
                        return Err(Error::InvalidLineWrap {
                            line: self.line_no + 1,
                        });
                    }
                    let raw = match self.read_raw_line()? {
                        Some(raw) => raw,
                        None => break,
                    };
                    line.push_str(&unwrap_terminator(raw.replacen(LINE_WRAP_PREFIX, "", 1)));
                }
                _ => break,
            }
        }

        Ok(Some(line))
    }

    /// Reads one record: logical lines up to a blank line or end of input.
    /// The returned record may be empty; callers decide whether to keep it.
    fn next_record(&mut self) -> Result<Record> {
        let mut record = Record::new();

        while let Some(line) = self.next_logical_line()? {
            if line.is_empty() {
                break;
            }
            let (name, value) = self.split_field_line(&line)?;
            if !spec::is_valid_field_name(name) {
                return Err(Error::InvalidFieldName {
                    line: self.line_no,
                    name: name.to_string(),
                });
            }
            record.fields.push(Field::new(name, value));
        }

        Ok(record)
    }

    /// Reads one record set descriptor: logical lines up to a blank line or
    /// end of input, each a `%`-prefixed property. Exactly one `rec` property
    /// must appear; it becomes the descriptor's type and is not kept among
    /// the special fields.
    fn next_descriptor(&mut self) -> Result<Descriptor> {
        let mut descriptor = Descriptor::default();
        let mut saw_rec = false;

        while let Some(line) = self.next_logical_line()? {
            if line.is_empty() {
                break;
            }
            let (raw_name, value) = self.split_field_line(&line)?;
            let name = raw_name
                .strip_prefix(SPECIAL_FIELD_PREFIX)
                .unwrap_or(raw_name);

            // Unknown property names pass through unvalidated; recutils
            // allows user-defined % fields.
            if spec::is_known_property(name) {
                validate_property(self.line_no, name, value)?;
            }

            if name == REC_PROPERTY {
                if saw_rec {
                    return Err(Error::MultipleRecordTypes { line: self.line_no });
                }
                descriptor.rec_type = value.to_string();
                saw_rec = true;
            } else {
                descriptor.special_fields.push(Property::new(name, value));
            }
        }

        if !saw_rec {
            return Err(Error::MissingRecordType { line: self.line_no });
        }

        Ok(descriptor)
    }

    /// Reads one record set. The set starts with an implicit default
    /// descriptor; a `%` line may replace it only while the set is still
    /// pristine. A `%` line seen after any record (or after a descriptor)
    /// belongs to the next record set and is left unconsumed.
    fn next_record_set(&mut self) -> Result<RecordSet> {
        let mut set = RecordSet::default();

        loop {
            match self.peek_byte()? {
                None => break,
                Some(byte) if byte == COMMENT_PREFIX as u8 => {
                    if self.read_raw_line()?.is_none() {
                        break;
                    }
                }
                Some(byte) if byte == SPECIAL_FIELD_PREFIX as u8 => {
                    if !set.records.is_empty() || !set.descriptor.is_default() {
                        break;
                    }
                    set.descriptor = self.next_descriptor()?;
                }
                Some(_) => {
                    let record = self.next_record()?;
                    if !record.is_empty() {
                        set.records.push(record);
                    }
                }
            }
        }

        Ok(set)
    }

    /// Parses the whole input into a [`Database`].
    ///
    /// Record sets with no records and no declared type are discarded, which
    /// absorbs leading and trailing blank regions of the file. End of input
    /// is success here; any other condition is a fatal error.
    pub fn database(&mut self) -> Result<Database> {
        let mut database = Database::new();

        loop {
            let set = self.next_record_set()?;
            if !set.records.is_empty() || !set.descriptor.is_default() {
                log::trace!(
                    "parsed record set type={:?} with {} records",
                    set.rec_type(),
                    set.records.len()
                );
                database.record_sets.push(set);
            }
            if self.peek_byte()?.is_none() {
                break;
            }
        }

        Ok(database)
    }

    /// Splits a logical line on the `": "` separator into exactly a name and
    /// a value. Any other part count — no separator, or a value containing
    /// the separator itself — is invalid.
    fn split_field_line<'a>(&self, line: &'a str) -> Result<(&'a str, &'a str)> {
        let mut parts = line.split(FIELD_SEPARATOR);
        match (parts.next(), parts.next(), parts.next()) {
            (Some(name), Some(value), None) => Ok((name, value)),
            _ => Err(Error::InvalidField { line: self.line_no }),
        }
    }
}

/// Removes the first newline occurrence from a raw line. Raw lines carry at
/// most one terminator, so this is the inverse of what the writer emits.
fn unwrap_terminator(raw: String) -> String {
    raw.replacen(LINE_DELIMITER, "", 1)
}

/// Syntax-checks the value of a known descriptor property. The value is
/// tokenized on whitespace; each property has its own token-count rule.
fn validate_property(line: usize, name: &str, value: &str) -> Result<()> {
    let tokens: Vec<&str> = value.split_whitespace().collect();

    match name {
        REC_PROPERTY => {
            if tokens.is_empty() {
                return Err(Error::property(line, name, "no property value found"));
            }
            if tokens.len() == 2 {
                validate_url_token(line, name, tokens[1])?;
            }
        }
        KEY_PROPERTY => {
            if tokens.len() != 1 {
                return Err(Error::property(line, name, "expected exactly one field name"));
            }
        }
        TYPEDEF_PROPERTY => {
            if tokens.len() < 2 {
                return Err(Error::property(
                    line,
                    name,
                    "missing type name and/or type description",
                ));
            }
            if !spec::is_valid_type_name(tokens[0]) {
                return Err(Error::property(line, name, "invalid type name"));
            }
        }
        TYPE_PROPERTY => {
            if tokens.len() < 2 {
                return Err(Error::property(
                    line,
                    name,
                    "missing field list, type name, or type description",
                ));
            }
        }
        SIZE_PROPERTY => {
            if tokens.is_empty() {
                return Err(Error::property(line, name, "no property value found"));
            }
            if tokens.len() > 2 {
                return Err(Error::property(line, name, "too many arguments found"));
            }
            if tokens[tokens.len() - 1].parse::<i64>().is_err() {
                return Err(Error::property(line, name, "expected an integer bound"));
            }
            // A recognized operator in the first slot is rejected; any other
            // token passes.
            if tokens.len() == 2 && spec::is_relational_operator(tokens[0]) {
                return Err(Error::property(line, name, "found invalid relational operator"));
            }
        }
        spec::DOC_PROPERTY | spec::CONFIDENTIAL_PROPERTY => {}
        // mandatory, allowed, prohibit, unique, auto, sort, constraint
        _ => {
            if tokens.is_empty() {
                return Err(Error::property(line, name, "no property value found"));
            }
        }
    }

    Ok(())
}

/// Accepts anything a lenient URL parser would; only ASCII control
/// characters are rejected.
fn validate_url_token(line: usize, name: &str, token: &str) -> Result<()> {
    if token.chars().any(|c| c.is_ascii_control()) {
        return Err(Error::property(line, name, "invalid URL"));
    }
    Ok(())
}

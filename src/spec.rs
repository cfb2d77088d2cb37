//! Recfile format constants and name grammars.
//!
//! This module is the single source of truth for the byte-level shape of the
//! recfile format. Both the [`parser`](crate::parser) and the
//! [`writer`](crate::writer) build on the constants defined here, so the two
//! sides can never drift apart.
//!
//! # The recfile format
//!
//! A recfile is a plain-text database made of *record sets*. Each record set
//! may start with a *descriptor* — a block of `%`-prefixed special fields
//! declaring the set's type and metadata — followed by blank-line-separated
//! *records* of `Name: Value` field lines:
//!
//! ```text
//! # Books I own.
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
//! **Rules**:
//! - A line whose first character is `#` is a comment and contributes nothing.
//! - A line whose first character is `+` continues the previous logical line;
//!   the `+` and the preceding newline are removed when joining.
//! - Field lines split on the literal `": "` (colon, one space). A value
//!   containing `": "` is not representable and is rejected on read.
//! - Field names match `[a-zA-Z%][a-zA-Z0-9_]*`; type names match
//!   `[a-zA-Z][a-zA-Z0-9_]*`. Both patterns come from the GNU recutils
//!   documentation.
//! - An empty line terminates a record. A descriptor line (`%`) after any
//!   record begins the next record set.
//!
//! # Descriptor properties
//!
//! The descriptor's special fields use a fixed vocabulary. Names outside this
//! vocabulary are accepted without validation, since recutils allows
//! user-defined `%` fields:
//!
//! | Property | Meaning |
//! |----------|---------|
//! | `rec` | record set type, required exactly once per descriptor |
//! | `mandatory` | fields every record must carry |
//! | `allowed` | the only fields records may carry |
//! | `prohibit` | fields records may not carry |
//! | `unique` | fields whose values may not repeat |
//! | `key` | primary key field |
//! | `doc` | free-text documentation |
//! | `typedef` | named type definition |
//! | `type` | field type declaration |
//! | `auto` | auto-generated fields |
//! | `sort` | sorting criteria |
//! | `size` | record count bound, e.g. `%size: 10` or `%size: <= 10` |
//! | `constraint` | selection expression constraint |
//! | `confidential` | fields holding encrypted values |
//!
//! This crate validates property *syntax* only (token counts and shapes per
//! property); enforcing `mandatory`/`unique`/`key` across records is the
//! caller's business.

use once_cell::sync::Lazy;
use regex::Regex;

/// Terminates every raw line.
pub const LINE_DELIMITER: char = '\n';

/// First character of a comment line.
pub const COMMENT_PREFIX: char = '#';

/// Literal separator between a field name and its value.
pub const FIELD_SEPARATOR: &str = ": ";

/// First character of a continuation line.
pub const LINE_WRAP_PREFIX: char = '+';

/// First character of a descriptor (special field) line.
pub const SPECIAL_FIELD_PREFIX: char = '%';

/// Sentinel type of a record set with no `%rec:` declaration.
pub const DEFAULT_RECORD_TYPE: &str = "";

pub const REC_PROPERTY: &str = "rec";
pub const MANDATORY_PROPERTY: &str = "mandatory";
pub const ALLOWED_PROPERTY: &str = "allowed";
pub const PROHIBIT_PROPERTY: &str = "prohibit";
pub const UNIQUE_PROPERTY: &str = "unique";
pub const KEY_PROPERTY: &str = "key";
pub const DOC_PROPERTY: &str = "doc";
pub const TYPEDEF_PROPERTY: &str = "typedef";
pub const TYPE_PROPERTY: &str = "type";
pub const AUTO_PROPERTY: &str = "auto";
pub const SORT_PROPERTY: &str = "sort";
pub const SIZE_PROPERTY: &str = "size";
pub const CONSTRAINT_PROPERTY: &str = "constraint";
pub const CONFIDENTIAL_PROPERTY: &str = "confidential";

/// The fixed vocabulary of descriptor properties this crate knows how to
/// syntax-check. Names outside this set pass through unvalidated.
pub const KNOWN_PROPERTIES: &[&str] = &[
    REC_PROPERTY,
    MANDATORY_PROPERTY,
    ALLOWED_PROPERTY,
    PROHIBIT_PROPERTY,
    UNIQUE_PROPERTY,
    KEY_PROPERTY,
    DOC_PROPERTY,
    TYPEDEF_PROPERTY,
    TYPE_PROPERTY,
    AUTO_PROPERTY,
    SORT_PROPERTY,
    SIZE_PROPERTY,
    CONSTRAINT_PROPERTY,
    CONFIDENTIAL_PROPERTY,
];

/// Relational operators recognized in a two-token `%size` value.
pub const RELATIONAL_OPERATORS: &[&str] = &["<", "<=", ">", ">="];

// Patterns from the GNU recutils documentation, anchored to the full name.
static FIELD_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z%][a-zA-Z0-9_]*$").expect("field name pattern"));
static TYPE_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z][a-zA-Z0-9_]*$").expect("type name pattern"));

/// Returns `true` if `name` is a valid recfile field name.
pub fn is_valid_field_name(name: &str) -> bool {
    FIELD_NAME_RE.is_match(name)
}

/// Returns `true` if `name` is a valid recfile type name.
pub fn is_valid_type_name(name: &str) -> bool {
    TYPE_NAME_RE.is_match(name)
}

/// Returns `true` if `name` is in the known descriptor property vocabulary.
pub fn is_known_property(name: &str) -> bool {
    KNOWN_PROPERTIES.contains(&name)
}

/// Returns `true` if `token` is one of the recognized relational operators.
pub fn is_relational_operator(token: &str) -> bool {
    RELATIONAL_OPERATORS.contains(&token)
}

//! The recfile data model.
//!
//! A [`Database`] is an ordered sequence of [`RecordSet`]s; each record set
//! pairs one [`Descriptor`] with an ordered sequence of [`Record`]s; each
//! record is an ordered sequence of [`Field`]s. Everything is opaque text —
//! the model imposes no typing on values and never reorders, deduplicates,
//! or sorts anything.
//!
//! The whole model is plain owned data. A `Database` returned by
//! [`crate::load`] belongs entirely to the caller, may be mutated freely, and
//! can be written back with [`Database::save`](crate::Database::save). All
//! types derive `Serialize`/`Deserialize` so a database can be re-encoded in
//! another format (JSON, etc.) by callers that need it.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::spec::DEFAULT_RECORD_TYPE;

/// One `Name: Value` line of a record.
///
/// Both halves are opaque text. The name is expected to match the field-name
/// grammar `[a-zA-Z%][a-zA-Z0-9_]*`; the parser enforces this on read, but a
/// hand-built `Field` is not checked until it round-trips through a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub value: String,
}

impl Field {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Field {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// One line of a record set descriptor, e.g. `%mandatory: Title`.
///
/// Structurally identical to a [`Field`]; the name is stored *without* the
/// leading `%` marker.
pub type Property = Field;

/// The metadata block heading a record set.
///
/// `rec_type` holds the value of the `%rec:` line; the empty string is the
/// sentinel for an untyped (default) record set. All descriptor lines other
/// than `%rec:` itself accumulate in `special_fields`, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Descriptor {
    pub rec_type: String,
    pub special_fields: Vec<Property>,
}

impl Descriptor {
    /// A descriptor declaring the given record set type.
    pub fn new(rec_type: impl Into<String>) -> Self {
        Descriptor {
            rec_type: rec_type.into(),
            special_fields: Vec::new(),
        }
    }

    /// Returns `true` if no `%rec:` declaration is present.
    pub fn is_default(&self) -> bool {
        self.rec_type == DEFAULT_RECORD_TYPE
    }
}

/// An ordered sequence of fields.
///
/// A record with zero fields is never materialized by the parser and is
/// skipped by the writer's record loop only in the sense that it produces no
/// field lines; callers building databases by hand should not add empty
/// records if they expect clean round-trips.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub fields: Vec<Field>,
}

impl Record {
    pub fn new() -> Self {
        Record::default()
    }

    pub fn from_fields(fields: Vec<Field>) -> Self {
        Record { fields }
    }

    /// Appends a field, preserving insertion order.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.push(Field::new(name, value));
    }

    /// The value of the first field named `name`, if any.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.value.as_str())
    }

    /// The values of every field named `name`, in order. Recfiles allow a
    /// name to repeat within a record.
    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> {
        self.fields
            .iter()
            .filter(move |f| f.name == name)
            .map(|f| f.value.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }
}

/// One descriptor plus the records sharing it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSet {
    pub descriptor: Descriptor,
    pub records: Vec<Record>,
}

impl RecordSet {
    pub fn new(descriptor: Descriptor) -> Self {
        RecordSet {
            descriptor,
            records: Vec::new(),
        }
    }

    /// The record set's type name, empty for an untyped set.
    pub fn rec_type(&self) -> &str {
        &self.descriptor.rec_type
    }
}

/// An ordered sequence of record sets, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Database {
    pub record_sets: Vec<RecordSet>,
}

impl Database {
    pub fn new() -> Self {
        Database::default()
    }

    pub fn is_empty(&self) -> bool {
        self.record_sets.is_empty()
    }

    pub fn len(&self) -> usize {
        self.record_sets.len()
    }

    /// The first record set with the given type name, if any.
    pub fn record_set(&self, rec_type: &str) -> Option<&RecordSet> {
        self.record_sets
            .iter()
            .find(|set| set.rec_type() == rec_type)
    }

    /// Mutable access to the first record set with the given type name.
    pub fn record_set_mut(&mut self, rec_type: &str) -> Option<&mut RecordSet> {
        self.record_sets
            .iter_mut()
            .find(|set| set.rec_type() == rec_type)
    }

    /// Groups record sets by type name, in first-seen order.
    ///
    /// A file may hold several record sets of the same type (untyped sets all
    /// group under the empty string), so each entry maps to every matching
    /// set in file order.
    pub fn by_type(&self) -> IndexMap<&str, Vec<&RecordSet>> {
        let mut groups: IndexMap<&str, Vec<&RecordSet>> = IndexMap::new();
        for set in &self.record_sets {
            groups.entry(set.rec_type()).or_default().push(set);
        }
        groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(title: &str, author: &str) -> Record {
        let mut record = Record::new();
        record.push("Title", title);
        record.push("Author", author);
        record
    }

    #[test]
    fn test_record_accessors() {
        let mut record = book("Ficciones", "Borges");
        record.push("Author", "J. L. Borges");

        assert_eq!(record.get("Title"), Some("Ficciones"));
        assert_eq!(record.get("Author"), Some("Borges"));
        assert_eq!(record.get("Missing"), None);
        assert_eq!(
            record.get_all("Author").collect::<Vec<_>>(),
            vec!["Borges", "J. L. Borges"]
        );
        assert_eq!(record.len(), 3);
    }

    #[test]
    fn test_descriptor_default() {
        assert!(Descriptor::default().is_default());
        assert!(!Descriptor::new("Book").is_default());
    }

    #[test]
    fn test_database_lookup() {
        let mut db = Database::new();
        let mut books = RecordSet::new(Descriptor::new("Book"));
        books.records.push(book("Ficciones", "Borges"));
        db.record_sets.push(books);
        db.record_sets
            .push(RecordSet::new(Descriptor::new("Magazine")));
        db.record_sets.push(RecordSet::new(Descriptor::new("Book")));

        assert_eq!(db.len(), 3);
        assert_eq!(
            db.record_set("Book").map(|s| s.records.len()),
            Some(1)
        );
        assert!(db.record_set("Newspaper").is_none());

        let groups = db.by_type();
        assert_eq!(groups.keys().collect::<Vec<_>>(), vec![&"Book", &"Magazine"]);
        assert_eq!(groups["Book"].len(), 2);
    }

    #[test]
    fn test_serde_derives() {
        let mut db = Database::new();
        let mut set = RecordSet::new(Descriptor::new("Book"));
        set.descriptor
            .special_fields
            .push(Property::new("mandatory", "Title"));
        set.records.push(book("Ficciones", "Borges"));
        db.record_sets.push(set);

        let json = serde_json::to_string(&db).unwrap();
        let back: Database = serde_json::from_str(&json).unwrap();
        assert_eq!(db, back);
    }
}

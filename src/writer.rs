//! Recfile writing.
//!
//! The writer is the exact inverse of the parser's model: it emits descriptor
//! blocks and records with the same format constants the parser reads by, so
//! a database with no empty records and no raw newlines in values reads back
//! field-for-field identical.
//!
//! Blank-line placement follows the format's asymmetric rules: a descriptor
//! block is followed by one blank line; records are separated by one blank
//! line with none after the set's last record; an untyped set emits no
//! descriptor block and therefore no leading separator at all — two untyped
//! sets in a row run together.
//!
//! [`Database::save`] opens its target read-write without truncation. A save
//! that writes fewer bytes than the file already holds leaves the tail in
//! place, and a save that fails mid-database leaves the earlier record sets'
//! bytes on disk. Callers wanting atomic replacement should write to a fresh
//! path.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use crate::error::{Error, Result};
use crate::model::{Database, RecordSet};
use crate::spec::{FIELD_SEPARATOR, LINE_DELIMITER, REC_PROPERTY, SPECIAL_FIELD_PREFIX};

impl Database {
    /// Writes the database to `path` in recfile format.
    ///
    /// The target is opened read-write and created if missing, but **not**
    /// truncated: content beyond the written bytes survives.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::Io`] on open/write failures and with
    /// [`Error::InvalidDescriptor`] if a record set carries special fields
    /// without a declared type. Record sets already written stay on disk.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let mut target = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .open(path)?;
        self.to_writer(&mut target)?;
        log::debug!(
            "saved {} record sets to {}",
            self.record_sets.len(),
            path.display()
        );
        Ok(())
    }

    /// Writes the database to any [`Write`] sink in recfile format.
    pub fn to_writer<W: Write>(&self, mut writer: W) -> Result<()> {
        for set in &self.record_sets {
            write_record_set(&mut writer, set)?;
        }
        Ok(())
    }

    /// Renders the database as a recfile string.
    pub fn to_rec_string(&self) -> Result<String> {
        let mut buffer = Vec::new();
        self.to_writer(&mut buffer)?;
        // The writer only ever emits what it was given plus ASCII framing.
        String::from_utf8(buffer)
            .map_err(|e| Error::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
    }
}

fn write_record_set<W: Write>(writer: &mut W, set: &RecordSet) -> Result<()> {
    // Every record set must contain one, and only one, descriptor type; an
    // untyped set may not carry special fields.
    if set.descriptor.is_default() && !set.descriptor.special_fields.is_empty() {
        return Err(Error::InvalidDescriptor);
    }

    let mut wrote_descriptor = false;
    if !set.descriptor.is_default() {
        write!(
            writer,
            "{}{}{}{}{}",
            SPECIAL_FIELD_PREFIX, REC_PROPERTY, FIELD_SEPARATOR, set.descriptor.rec_type,
            LINE_DELIMITER
        )?;
        wrote_descriptor = true;

        for property in &set.descriptor.special_fields {
            write!(
                writer,
                "{}{}{}{}{}",
                SPECIAL_FIELD_PREFIX, property.name, FIELD_SEPARATOR, property.value,
                LINE_DELIMITER
            )?;
        }
    }

    // No separator when there was no descriptor block.
    if wrote_descriptor {
        write!(writer, "{}", LINE_DELIMITER)?;
    }

    for (index, record) in set.records.iter().enumerate() {
        for field in &record.fields {
            write!(
                writer,
                "{}{}{}{}",
                field.name, FIELD_SEPARATOR, field.value, LINE_DELIMITER
            )?;
        }
        if index != set.records.len() - 1 {
            write!(writer, "{}", LINE_DELIMITER)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Descriptor, Property, Record};

    fn record(pairs: &[(&str, &str)]) -> Record {
        let mut record = Record::new();
        for (name, value) in pairs {
            record.push(*name, *value);
        }
        record
    }

    #[test]
    fn test_typed_set_layout() {
        let mut set = RecordSet::new(Descriptor::new("Book"));
        set.descriptor
            .special_fields
            .push(Property::new("mandatory", "Title"));
        set.records.push(record(&[("Title", "Foo"), ("Author", "Bar")]));
        set.records.push(record(&[("Title", "Baz")]));

        let db = Database {
            record_sets: vec![set],
        };
        assert_eq!(
            db.to_rec_string().unwrap(),
            "%rec: Book\n%mandatory: Title\n\nTitle: Foo\nAuthor: Bar\n\nTitle: Baz\n"
        );
    }

    #[test]
    fn test_untyped_set_has_no_descriptor_block() {
        let mut set = RecordSet::default();
        set.records.push(record(&[("Title", "Foo")]));
        let db = Database {
            record_sets: vec![set],
        };
        assert_eq!(db.to_rec_string().unwrap(), "Title: Foo\n");
    }

    #[test]
    fn test_consecutive_untyped_sets_run_together() {
        let mut first = RecordSet::default();
        first.records.push(record(&[("A", "1")]));
        let mut second = RecordSet::default();
        second.records.push(record(&[("B", "2")]));
        let db = Database {
            record_sets: vec![first, second],
        };
        assert_eq!(db.to_rec_string().unwrap(), "A: 1\nB: 2\n");
    }

    #[test]
    fn test_untyped_set_with_special_fields_is_rejected() {
        let mut set = RecordSet::default();
        set.descriptor
            .special_fields
            .push(Property::new("mandatory", "Title"));
        let db = Database {
            record_sets: vec![set],
        };
        assert!(matches!(
            db.to_writer(Vec::new()),
            Err(Error::InvalidDescriptor)
        ));
    }

    #[test]
    fn test_earlier_sets_stay_written_on_failure() {
        let mut good = RecordSet::new(Descriptor::new("Book"));
        good.records.push(record(&[("Title", "Foo")]));
        let mut bad = RecordSet::default();
        bad.descriptor
            .special_fields
            .push(Property::new("mandatory", "Title"));
        let db = Database {
            record_sets: vec![good, bad],
        };

        let mut buffer = Vec::new();
        assert!(db.to_writer(&mut buffer).is_err());
        assert_eq!(buffer, b"%rec: Book\n\nTitle: Foo\n");
    }
}

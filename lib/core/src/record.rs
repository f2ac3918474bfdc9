use crate::normalize::normalize_field;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Stable record identifier: the 0-based data row position in the source file.
pub type RecordId = usize;

/// A normalized row: field name -> value, `None` when the value is absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: BTreeMap<String, Option<String>>,
}

impl Record {
    /// Build a record from raw header/value pairs, normalizing every value.
    pub fn from_raw<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let fields = pairs
            .into_iter()
            .map(|(name, raw)| (name.to_string(), normalize_field(raw)))
            .collect();
        Self { fields }
    }

    /// Value of a field; `None` when the field is absent or missing.
    #[inline]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).and_then(|v| v.as_deref())
    }

    pub fn contains_field(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn fields(&self) -> &BTreeMap<String, Option<String>> {
        &self.fields
    }
}

impl FromIterator<(String, Option<String>)> for Record {
    fn from_iter<T: IntoIterator<Item = (String, Option<String>)>>(iter: T) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

/// All records of one input file, keyed by row position.
///
/// Records are created once and never mutated. Column order follows the
/// source header.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    columns: Vec<String>,
    records: Vec<Record>,
}

impl Dataset {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            records: Vec::new(),
        }
    }

    /// Append a record; its ID is the next row position.
    pub fn push(&mut self, record: Record) -> RecordId {
        self.records.push(record);
        self.records.len() - 1
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[inline]
    pub fn get(&self, id: RecordId) -> Option<&Record> {
        self.records.get(id)
    }

    pub fn record(&self, id: RecordId) -> Result<&Record> {
        self.records.get(id).ok_or(Error::RecordNotFound(id))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate `(id, record)` in row order.
    pub fn iter(&self) -> impl Iterator<Item = (RecordId, &Record)> {
        self.records.iter().enumerate()
    }
}

//! Blocking predicates
//!
//! A predicate maps a record to zero or more block keys. Two records that
//! share a key under some predicate become a candidate pair, so only
//! plausibly similar records are ever compared.

use crate::schema::FieldSchema;
use dedupx_core::Record;
use serde::{Deserialize, Serialize};

/// How a block key is derived from a field value
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PredicateKind {
    /// The whole normalized value
    WholeField,
    /// The first whitespace-separated token
    FirstToken,
    /// The first three characters
    FirstThreeChars,
    /// The set of tokens, sorted and re-joined
    SortedTokens,
    /// The first run of ASCII digits (street numbers, zip codes)
    LeadingDigits,
}

impl PredicateKind {
    pub const ALL: [PredicateKind; 5] = [
        PredicateKind::WholeField,
        PredicateKind::FirstToken,
        PredicateKind::FirstThreeChars,
        PredicateKind::SortedTokens,
        PredicateKind::LeadingDigits,
    ];
}

/// A blocking predicate over one field
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Predicate {
    pub field: String,
    pub kind: PredicateKind,
}

impl Predicate {
    pub fn new(field: impl Into<String>, kind: PredicateKind) -> Self {
        Self {
            field: field.into(),
            kind,
        }
    }

    /// Block key for a record, `None` when the field is absent or yields nothing
    pub fn key(&self, record: &Record) -> Option<String> {
        let value = record.get(&self.field)?;

        let key = match self.kind {
            PredicateKind::WholeField => Some(value.to_string()),
            PredicateKind::FirstToken => value.split_whitespace().next().map(str::to_string),
            PredicateKind::FirstThreeChars => {
                let prefix: String = value.chars().take(3).collect();
                (prefix.chars().count() == 3).then_some(prefix)
            }
            PredicateKind::SortedTokens => {
                let mut tokens: Vec<&str> = value.split_whitespace().collect();
                tokens.sort_unstable();
                tokens.dedup();
                Some(tokens.join(" "))
            }
            PredicateKind::LeadingDigits => {
                let digits: String = value
                    .chars()
                    .skip_while(|c| !c.is_ascii_digit())
                    .take_while(|c| c.is_ascii_digit())
                    .collect();
                Some(digits)
            }
        };

        key.filter(|k| !k.is_empty())
    }

    /// Whether both records fall into the same block under this predicate
    pub fn covers(&self, a: &Record, b: &Record) -> bool {
        match (self.key(a), self.key(b)) {
            (Some(x), Some(y)) => x == y,
            _ => false,
        }
    }
}

impl std::fmt::Display for Predicate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}({})", self.kind, self.field)
    }
}

/// Every predicate that can be learned for a schema, in a stable order
pub fn candidate_predicates(schema: &FieldSchema) -> Vec<Predicate> {
    schema
        .field_names()
        .flat_map(|field| PredicateKind::ALL.iter().map(move |&kind| Predicate::new(field, kind)))
        .collect()
}

/// Whole-value predicates for every field, used before any match is labeled
pub fn default_predicates(schema: &FieldSchema) -> Vec<Predicate> {
    schema
        .field_names()
        .map(|field| Predicate::new(field, PredicateKind::WholeField))
        .collect()
}

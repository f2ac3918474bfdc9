//! # dedupx Similarity
//!
//! Schema-driven comparison of record pairs.
//!
//! ## Features
//!
//! - **Field Schema**: Declarative list of compared fields and their types
//! - **Comparators**: Per-type string similarity (Jaro-Winkler, edit distance, trigrams, prices)
//! - **Feature Vectors**: Fixed-length pair features for the pair classifier
//! - **Blocking Predicates**: Cheap block keys that limit which pairs are compared
//!
//! ## Example
//!
//! ```rust
//! use dedupx_core::Record;
//! use dedupx_similarity::{Comparator, FieldDefinition, FieldSchema};
//!
//! let schema = FieldSchema::new(vec![
//!     FieldDefinition::string("name"),
//!     FieldDefinition::string("city"),
//! ]);
//! schema.validate().unwrap();
//!
//! let a = Record::from_raw([("name", "Arnie Morton's of Chicago"), ("city", "Los Angeles")]);
//! let b = Record::from_raw([("name", "Arnie Morton's"), ("city", "LA")]);
//!
//! let comparator = Comparator::new(schema);
//! let features = comparator.features(&a, &b);
//! assert_eq!(features.len(), 2);
//! ```

pub mod schema;
pub mod distance;
pub mod comparator;
pub mod predicate;

// Re-export main types for convenience
pub use schema::{FieldSchema, FieldDefinition, FieldType, SchemaError};
pub use comparator::{Comparator, FieldComparison};
pub use predicate::{Predicate, PredicateKind, candidate_predicates, default_predicates};

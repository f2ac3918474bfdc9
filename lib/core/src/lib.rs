//! # dedupx Core
//!
//! Core types for the dedupx deduplication pipeline.
//!
//! - [`Record`] - A normalized row keyed by field name
//! - [`Dataset`] - All records of an input file, keyed by row position
//! - [`normalize_field`] - Field value cleaning applied before matching
//! - [`TrainingData`] - Labeled record pairs for the pair classifier
//!
//! ## Example
//!
//! ```rust
//! use dedupx_core::{Dataset, Record};
//!
//! let mut dataset = Dataset::new(vec!["name".to_string(), "city".to_string()]);
//! let id = dataset.push(Record::from_raw([("name", " Art's Deli "), ("city", "NA")]));
//!
//! let record = dataset.record(id).unwrap();
//! assert_eq!(record.get("name"), Some("art's deli"));
//! assert_eq!(record.get("city"), None);
//! ```

pub mod error;
pub mod normalize;
pub mod record;
pub mod training;

pub use error::{Error, Result};
pub use normalize::normalize_field;
pub use record::{Dataset, Record, RecordId};
pub use training::{Label, RecordPair, TrainingData};

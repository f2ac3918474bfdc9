//! Pair comparator
//!
//! Turns a pair of records into the feature vector consumed by the
//! pair classifier, with an optional per-field breakdown for display.

use crate::distance::field_similarity;
use crate::schema::FieldSchema;
use dedupx_core::Record;

/// Per-field comparison result for one record pair
#[derive(Debug, Clone, PartialEq)]
pub struct FieldComparison {
    pub field: String,
    /// Similarity in [0, 1], `None` when either side is absent
    pub similarity: Option<f32>,
}

/// Computes pair features according to a field schema
#[derive(Debug, Clone)]
pub struct Comparator {
    schema: FieldSchema,
}

impl Comparator {
    /// Create a new comparator with the given schema
    pub fn new(schema: FieldSchema) -> Self {
        Self { schema }
    }

    /// Get a reference to the schema
    pub fn schema(&self) -> &FieldSchema {
        &self.schema
    }

    /// Length of the vectors returned by [`Comparator::features`]
    pub fn dim(&self) -> usize {
        self.schema.feature_dim()
    }

    /// Feature vector for a record pair
    ///
    /// One similarity per field in schema order. Absent values contribute 0.
    /// Fields declared with `has_missing` add a second feature that is 1
    /// when either side is absent.
    pub fn features(&self, a: &Record, b: &Record) -> Vec<f32> {
        let mut features = Vec::with_capacity(self.dim());

        for def in &self.schema.fields {
            let similarity = match (a.get(&def.field), b.get(&def.field)) {
                (Some(x), Some(y)) => Some(field_similarity(x, y, def.field_type)),
                _ => None,
            };

            features.push(similarity.unwrap_or(0.0));
            if def.has_missing {
                features.push(if similarity.is_none() { 1.0 } else { 0.0 });
            }
        }

        features
    }

    /// Per-field breakdown of a record pair
    pub fn explain(&self, a: &Record, b: &Record) -> Vec<FieldComparison> {
        self.schema
            .fields
            .iter()
            .map(|def| FieldComparison {
                field: def.field.clone(),
                similarity: match (a.get(&def.field), b.get(&def.field)) {
                    (Some(x), Some(y)) => Some(field_similarity(x, y, def.field_type)),
                    _ => None,
                },
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FieldDefinition, FieldType};

    fn create_test_schema() -> FieldSchema {
        FieldSchema::new(vec![
            FieldDefinition::string("name"),
            FieldDefinition::new("city", FieldType::Exact),
            FieldDefinition::string("cuisine").with_missing(),
        ])
    }

    fn create_test_record(name: &str, city: &str, cuisine: &str) -> Record {
        Record::from_raw([("name", name), ("city", city), ("cuisine", cuisine)])
    }

    #[test]
    fn test_identical_records_full_score() {
        let comparator = Comparator::new(create_test_schema());
        let a = create_test_record("Art's Deli", "Studio City", "Delis");
        let features = comparator.features(&a, &a.clone());

        assert_eq!(features.len(), comparator.dim());
        assert_eq!(features, vec![1.0, 1.0, 1.0, 0.0]);
    }

    #[test]
    fn test_missing_value_indicator() {
        let comparator = Comparator::new(create_test_schema());
        let a = create_test_record("Art's Deli", "Studio City", "NA");
        let b = create_test_record("Art's Deli", "Studio City", "Delis");

        let features = comparator.features(&a, &b);
        assert_eq!(features[2], 0.0);
        assert_eq!(features[3], 1.0);
    }

    #[test]
    fn test_na_variants_compare_like_empty() {
        let comparator = Comparator::new(create_test_schema());
        let reference = create_test_record("Art's Deli", "Studio City", "Delis");
        let with_na = create_test_record("Art's Deli", "Studio City", "  N/A  ");
        let with_empty = create_test_record("Art's Deli", "Studio City", "");

        assert_eq!(
            comparator.features(&reference, &with_na),
            comparator.features(&reference, &with_empty)
        );
    }

    #[test]
    fn test_explain_breakdown() {
        let comparator = Comparator::new(create_test_schema());
        let a = create_test_record("Art's Deli", "Studio City", "");
        let b = create_test_record("Arts Deli", "Los Angeles", "Delis");

        let explained = comparator.explain(&a, &b);
        assert_eq!(explained.len(), 3);
        assert!(explained[0].similarity.unwrap() > 0.8);
        assert_eq!(explained[1].similarity, Some(0.0));
        assert_eq!(explained[2].similarity, None);
    }
}

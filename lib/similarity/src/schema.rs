//! Field schema definitions
//!
//! Declares which columns take part in pair comparison and how each one
//! is compared. The schema is stored inside the learned settings so a
//! static run compares fields exactly the way the training run did.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Field schema: the ordered list of compared fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldSchema {
    /// Schema version for future compatibility
    #[serde(default = "default_version")]
    pub version: u32,

    /// Field definitions, in feature order
    pub fields: Vec<FieldDefinition>,
}

fn default_version() -> u32 {
    1
}

impl FieldSchema {
    /// Create a new schema with the given fields
    pub fn new(fields: Vec<FieldDefinition>) -> Self {
        Self { version: 1, fields }
    }

    /// Validate the schema on its own
    /// - At least one field
    /// - No field declared twice
    pub fn validate(&self) -> Result<(), SchemaError> {
        if self.fields.is_empty() {
            return Err(SchemaError::EmptySchema);
        }

        let mut seen = HashSet::new();
        for def in &self.fields {
            if !seen.insert(def.field.as_str()) {
                return Err(SchemaError::DuplicateField(def.field.clone()));
            }
        }

        Ok(())
    }

    /// Validate the schema against the columns of an input file
    pub fn validate_columns(&self, columns: &[String]) -> Result<(), SchemaError> {
        self.validate()?;
        for def in &self.fields {
            if !columns.iter().any(|c| c == &def.field) {
                return Err(SchemaError::FieldNotFound(def.field.clone()));
            }
        }
        Ok(())
    }

    /// Number of features produced for one record pair
    pub fn feature_dim(&self) -> usize {
        self.fields
            .iter()
            .map(|f| if f.has_missing { 2 } else { 1 })
            .sum()
    }

    /// Compared field names in schema order
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.field.as_str())
    }
}

/// Configuration for a single compared field
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldDefinition {
    /// Column name in the input file
    pub field: String,

    /// How values of this field are compared
    #[serde(rename = "type")]
    pub field_type: FieldType,

    /// Add an extra feature flagging pairs where either side is absent
    #[serde(default)]
    pub has_missing: bool,
}

impl FieldDefinition {
    pub fn new(field: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            field: field.into(),
            field_type,
            has_missing: false,
        }
    }

    /// Create a `String` field definition
    pub fn string(field: impl Into<String>) -> Self {
        Self::new(field, FieldType::String)
    }

    pub fn with_missing(mut self) -> Self {
        self.has_missing = true;
        self
    }
}

/// Comparison type for a field
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum FieldType {
    /// Jaro-Winkler similarity, suited to names and addresses
    #[default]
    String,
    /// Normalized Damerau-Levenshtein similarity for short codes
    ShortString,
    /// Character trigram overlap for longer free text
    Text,
    /// 1 if equal, 0 otherwise
    Exact,
    /// Relative numeric distance: 1 - |a - b| / max(|a|, |b|)
    Price,
}

/// Errors that can occur during schema validation
#[derive(Debug, Clone, thiserror::Error)]
pub enum SchemaError {
    #[error("Schema cannot be empty")]
    EmptySchema,

    #[error("Field '{0}' is declared more than once")]
    DuplicateField(String),

    #[error("Field '{0}' not found in input columns")]
    FieldNotFound(String),
}

impl From<SchemaError> for dedupx_core::Error {
    fn from(e: SchemaError) -> Self {
        match e {
            SchemaError::FieldNotFound(name) => dedupx_core::Error::UnknownField(name),
            other => dedupx_core::Error::InvalidConfig(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn restaurant_schema() -> FieldSchema {
        FieldSchema::new(vec![
            FieldDefinition::string("name"),
            FieldDefinition::string("address"),
            FieldDefinition::string("city"),
            FieldDefinition::string("cuisine").with_missing(),
        ])
    }

    #[test]
    fn test_schema_creation() {
        let schema = restaurant_schema();
        assert_eq!(schema.version, 1);
        assert_eq!(schema.fields.len(), 4);
        assert_eq!(schema.feature_dim(), 5);
        assert!(schema.validate().is_ok());
    }

    #[test]
    fn test_empty_schema_error() {
        let schema = FieldSchema::new(Vec::new());
        assert!(matches!(schema.validate(), Err(SchemaError::EmptySchema)));
    }

    #[test]
    fn test_duplicate_field_error() {
        let schema = FieldSchema::new(vec![FieldDefinition::string("name"), FieldDefinition::string("name")]);
        assert!(matches!(schema.validate(), Err(SchemaError::DuplicateField(ref f)) if f == "name"));
    }

    #[test]
    fn test_missing_column_error() {
        let schema = restaurant_schema();
        let columns = vec!["name".to_string(), "address".to_string(), "city".to_string()];
        assert!(matches!(
            schema.validate_columns(&columns),
            Err(SchemaError::FieldNotFound(ref f)) if f == "cuisine"
        ));
    }

    #[test]
    fn test_definition_json_format() {
        let json = r#"[{"field": "name", "type": "String"}, {"field": "phone", "type": "Exact", "has_missing": true}]"#;
        let defs: Vec<FieldDefinition> = serde_json::from_str(json).unwrap();
        assert_eq!(defs[0], FieldDefinition::string("name"));
        assert_eq!(defs[1].field_type, FieldType::Exact);
        assert!(defs[1].has_missing);
    }

    #[test]
    fn test_serde_roundtrip() {
        let schema = restaurant_schema();
        let json = serde_json::to_string(&schema).unwrap();
        let parsed: FieldSchema = serde_json::from_str(&json).unwrap();
        assert_eq!(schema, parsed);
    }
}

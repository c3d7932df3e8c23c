//! Target Schema

use std::collections::HashMap;

/// Number of feature columns the production model was trained on.
pub const TRAINED_FEATURE_COUNT: usize = 312;

/// The ordered list of feature columns fixed at training time. Every encoded
/// vector is index-aligned to this order; the schema never changes after
/// load.
#[derive(Debug, Clone)]
pub struct TargetSchema {
    columns: Vec<String>,
    index: HashMap<String, usize>,
}

impl TargetSchema {
    /// Build a schema from an ordered column list. Column names are unique
    /// by construction at training time; on a duplicate the first position
    /// wins.
    pub fn new(columns: Vec<String>) -> Self {
        let mut index = HashMap::with_capacity(columns.len());
        for (i, name) in columns.iter().enumerate() {
            index.entry(name.clone()).or_insert(i);
        }
        Self { columns, index }
    }

    /// Number of columns
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Whether the schema is empty
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Position of a column by name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Whether the schema contains a column
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Column names in schema order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_matches_order() {
        let schema = TargetSchema::new(vec![
            "Age Group_50-69".to_string(),
            "Age Group_70+".to_string(),
            "LOS_per_MDC".to_string(),
        ]);
        assert_eq!(schema.len(), 3);
        assert_eq!(schema.column_index("Age Group_70+"), Some(1));
        assert_eq!(schema.column_index("LOS_per_MDC"), Some(2));
        assert_eq!(schema.column_index("Gender_F"), None);
    }

    #[test]
    fn test_duplicate_keeps_first_position() {
        let schema = TargetSchema::new(vec![
            "Gender_F".to_string(),
            "Gender_F".to_string(),
        ]);
        assert_eq!(schema.column_index("Gender_F"), Some(0));
        assert_eq!(schema.len(), 2);
    }
}

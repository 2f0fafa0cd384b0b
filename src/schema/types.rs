use serde::{Deserialize, Serialize};

/// Declarative description of a raw batch: the full expected column list,
/// the columns removed before modeling, and the columns that get IQR
/// outlier capping. Loaded once per run and read-only afterwards.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct SchemaSpec {
    pub columns: Vec<String>,
    #[serde(default)]
    pub drop_columns: Vec<String>,
    #[serde(default)]
    pub outlier_columns: Vec<String>,
}

impl SchemaSpec {
    pub fn expected_column_count(&self) -> usize {
        self.columns.len()
    }
}

use anyhow::{Context, Result};
use std::fs::File;
use std::path::PathBuf;

use super::{SchemaProvider, SchemaSpec};
use crate::error::PipelineError;

/// Schema provider backed by a YAML file on disk.
pub struct YamlSchemaProvider {
    path: PathBuf,
}

impl YamlSchemaProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SchemaProvider for YamlSchemaProvider {
    fn load(&self) -> Result<SchemaSpec> {
        let read = || -> Result<SchemaSpec> {
            let file = File::open(&self.path)
                .with_context(|| format!("opening schema file {}", self.path.display()))?;
            let spec: SchemaSpec = serde_yaml::from_reader(file)
                .with_context(|| format!("parsing schema file {}", self.path.display()))?;
            Ok(spec)
        };
        read().map_err(|e| PipelineError::validation_input(&self.path, e).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_schema_from_yaml() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("schema.yaml");
        let mut f = File::create(&path)?;
        writeln!(
            f,
            "columns:\n  - DATE\n  - WindSpeed\n  - quality\ndrop_columns:\n  - DATE\noutlier_columns:\n  - WindSpeed"
        )?;

        let spec = YamlSchemaProvider::new(&path).load()?;
        assert_eq!(spec.expected_column_count(), 3);
        assert_eq!(spec.drop_columns, vec!["DATE"]);
        assert_eq!(spec.outlier_columns, vec!["WindSpeed"]);
        Ok(())
    }

    #[test]
    fn missing_schema_surfaces_as_validation_input() {
        let err = YamlSchemaProvider::new("nope/schema.yaml")
            .load()
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PipelineError>(),
            Some(PipelineError::ValidationInput { .. })
        ));
    }
}

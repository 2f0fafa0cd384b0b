pub mod types;
pub mod yaml;

pub use types::SchemaSpec;
pub use yaml::YamlSchemaProvider;

use anyhow::Result;

/// Capability seam for schema loading; implementations may read YAML, a
/// database, or anything else without the core caring.
pub trait SchemaProvider {
    fn load(&self) -> Result<SchemaSpec>;
}

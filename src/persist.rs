use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{self, File};
use std::path::Path;

/// Capability seam for persisting fitted objects (the scaler, today).
/// Swapping the storage backend must not touch core logic.
pub trait ObjectStore {
    fn save<T: Serialize>(&self, path: &Path, value: &T) -> Result<()>;
    fn load<T: DeserializeOwned>(&self, path: &Path) -> Result<T>;
}

/// JSON-on-disk object store. Creates parent directories on save.
pub struct JsonObjectStore;

impl ObjectStore for JsonObjectStore {
    fn save<T: Serialize>(&self, path: &Path, value: &T) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let file =
            File::create(path).with_context(|| format!("creating {}", path.display()))?;
        serde_json::to_writer_pretty(file, value)
            .with_context(|| format!("serializing to {}", path.display()))
    }

    fn load<T: DeserializeOwned>(&self, path: &Path) -> Result<T> {
        let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
        serde_json::from_reader(file)
            .with_context(|| format!("deserializing from {}", path.display()))
    }
}

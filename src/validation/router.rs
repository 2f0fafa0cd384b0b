use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};

use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::schema::SchemaSpec;
use crate::validation::rules::FileValidator;

/// Routes every raw batch file into the validated or invalid directory
/// based on the conjunction of the per-file checks. Files are physically
/// moved, so the raw source directory is consumed by a routing pass.
pub struct BatchValidationRouter<'a> {
    raw_data_dir: PathBuf,
    valid_data_dir: PathBuf,
    invalid_data_dir: PathBuf,
    validator: FileValidator<'a>,
}

impl<'a> BatchValidationRouter<'a> {
    pub fn new(
        raw_data_dir: impl Into<PathBuf>,
        config: &PipelineConfig,
        schema: &'a SchemaSpec,
    ) -> Self {
        Self {
            raw_data_dir: raw_data_dir.into(),
            valid_data_dir: config.valid_data_dir(),
            invalid_data_dir: config.invalid_data_dir(),
            validator: FileValidator::new(schema),
        }
    }

    /// Validates and routes every file in the raw directory. Returns true
    /// iff at least one file landed in the validated directory.
    #[instrument(level = "info", skip(self), fields(raw = %self.raw_data_dir.display()))]
    pub fn validate_raw_files(&self) -> Result<bool> {
        let raw_files = self.raw_batch_file_paths()?;
        info!(count = raw_files.len(), "validating raw batch files");

        let mut validated_files = 0usize;
        for path in &raw_files {
            let verdict = self.validator.verdict(path)?;
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            if verdict.is_valid() {
                self.move_to(path, &self.valid_data_dir)?;
                validated_files += 1;
                info!(file = %name, "routed to validated");
            } else {
                self.move_to(path, &self.invalid_data_dir)?;
                warn!(file = %name, ?verdict, "routed to invalid");
            }
        }

        Ok(validated_files > 0)
    }

    /// Runs the routing pass and returns the validated directory, or stops
    /// the pipeline when nothing validated.
    pub fn initiate_data_validation(&self) -> Result<PathBuf> {
        info!("initiating data validation");
        if self.validate_raw_files()? {
            Ok(self.valid_data_dir.clone())
        } else {
            Err(PipelineError::NoValidData.into())
        }
    }

    /// Non-recursive listing of regular files, in filesystem order.
    fn raw_batch_file_paths(&self) -> Result<Vec<PathBuf>> {
        let entries = fs::read_dir(&self.raw_data_dir)
            .with_context(|| format!("listing raw directory {}", self.raw_data_dir.display()))?;
        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.with_context(|| {
                format!("reading entry of {}", self.raw_data_dir.display())
            })?;
            if entry.file_type()?.is_file() {
                paths.push(entry.path());
            }
        }
        Ok(paths)
    }

    /// Moves `src` into `dest_dir`, creating the directory on demand. A
    /// name collision at the destination aborts the pass.
    fn move_to(&self, src: &Path, dest_dir: &Path) -> Result<()> {
        fs::create_dir_all(dest_dir)
            .with_context(|| format!("creating {}", dest_dir.display()))?;
        let name = src
            .file_name()
            .ok_or_else(|| anyhow!("raw file {} has no file name", src.display()))?;
        let dest = dest_dir.join(name);
        if dest.exists() {
            return Err(PipelineError::RoutingCollision {
                name: name.to_string_lossy().into_owned(),
                dest: dest_dir.to_path_buf(),
            }
            .into());
        }
        if fs::rename(src, &dest).is_err() {
            // Cross-device fallback: copy then remove the source.
            fs::copy(src, &dest)
                .with_context(|| format!("copying {} to {}", src.display(), dest.display()))?;
            fs::remove_file(src)
                .with_context(|| format!("removing {}", src.display()))?;
        }
        Ok(())
    }
}

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::info;

use crate::error::PipelineError;
use crate::frame::Frame;

/// Reads every file in the validated directory and concatenates them
/// row-wise, in filesystem listing order. Callers must not depend on any
/// particular ordering beyond that.
pub fn get_merged_batch_data(valid_data_dir: &Path) -> Result<Frame> {
    let entries = fs::read_dir(valid_data_dir)
        .with_context(|| format!("listing validated directory {}", valid_data_dir.display()))?;

    let mut merged = Frame::default();
    let mut file_count = 0usize;
    for entry in entries {
        let entry = entry
            .with_context(|| format!("reading entry of {}", valid_data_dir.display()))?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let path = entry.path();
        let frame = Frame::read_csv(&path)
            .map_err(|e| PipelineError::transformation_with(
                format!("reading validated file {}", path.display()),
                e,
            ))?;
        merged
            .append(frame)
            .map_err(|e| PipelineError::transformation_with(
                format!("merging validated file {}", path.display()),
                e,
            ))?;
        file_count += 1;
    }

    if file_count == 0 {
        return Err(PipelineError::transformation(format!(
            "no batch files found in {}",
            valid_data_dir.display()
        ))
        .into());
    }

    info!(
        files = file_count,
        rows = merged.n_rows(),
        cols = merged.n_cols(),
        "merged validated batch data"
    );
    Ok(merged)
}

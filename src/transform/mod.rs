pub mod clean;
pub mod merge;
pub mod scale;

pub use clean::DataCleaner;
pub use scale::StandardScaler;

use anyhow::{Context, Result};
use ndarray::{Array2, Axis};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

use crate::config::{PipelineConfig, TARGET_COLUMN, TEST_FRACTION};
use crate::error::PipelineError;
use crate::persist::ObjectStore;
use crate::schema::SchemaSpec;

/// Second pipeline stage: merges the validated batch, cleans it per the
/// schema, splits, scales, and persists the artifacts.
pub struct DataTransformation<S: ObjectStore> {
    valid_data_dir: PathBuf,
    config: PipelineConfig,
    schema: SchemaSpec,
    store: S,
}

impl<S: ObjectStore> DataTransformation<S> {
    pub fn new(
        valid_data_dir: impl Into<PathBuf>,
        config: PipelineConfig,
        schema: SchemaSpec,
        store: S,
    ) -> Self {
        Self {
            valid_data_dir: valid_data_dir.into(),
            config,
            schema,
            store,
        }
    }

    /// Runs merge → drop → cap → split → scale, persists the fitted scaler
    /// and both matrices, and returns `(train, test, scaler_path)`. The
    /// last column of each matrix is the unscaled target.
    #[instrument(level = "info", skip(self), fields(valid = %self.valid_data_dir.display()))]
    pub fn initiate_data_transformation(
        &self,
    ) -> Result<(Array2<f64>, Array2<f64>, PathBuf)> {
        info!("initiating data transformation");

        let frame = merge::get_merged_batch_data(&self.valid_data_dir)?;
        let cleaner = DataCleaner::new(&self.schema);
        let frame = cleaner.drop_schema_columns(frame)?;
        let mut frame = cleaner.apply_outliers_capping(frame)?;

        let target = frame.take_column(TARGET_COLUMN).ok_or_else(|| {
            PipelineError::transformation(format!(
                "target column {TARGET_COLUMN} missing from merged data"
            ))
        })?;
        let y: Vec<f64> = target
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                cell.as_num().ok_or_else(|| {
                    PipelineError::transformation(format!(
                        "non-numeric target value at row {i}"
                    ))
                })
            })
            .collect::<Result<_, _>>()?;

        let x = frame
            .to_matrix()
            .map_err(|e| PipelineError::transformation_with("building feature matrix", e))?;

        let (train_idx, test_idx) =
            scale::train_test_split(x.nrows(), TEST_FRACTION, self.config.split_seed)?;
        let x_train = x.select(Axis(0), &train_idx);
        let x_test = x.select(Axis(0), &test_idx);
        let y_train: Vec<f64> = train_idx.iter().map(|&i| y[i]).collect();
        let y_test: Vec<f64> = test_idx.iter().map(|&i| y[i]).collect();

        let scaler = StandardScaler::fit(&x_train)?;
        let x_train_scaled = scaler.transform(&x_train)?;
        let x_test_scaled = scaler.transform(&x_test)?;

        let scaler_path = self.config.preprocessor_path();
        self.store
            .save(&scaler_path, &scaler)
            .map_err(|e| PipelineError::transformation_with("saving fitted scaler", e))?;

        let train_arr = with_target_column(x_train_scaled, &y_train);
        let test_arr = with_target_column(x_test_scaled, &y_test);
        write_matrix(&self.config.train_file_path(), &train_arr)?;
        write_matrix(&self.config.test_file_path(), &test_arr)?;

        info!(
            train_rows = train_arr.nrows(),
            test_rows = test_arr.nrows(),
            features = train_arr.ncols() - 1,
            scaler = %scaler_path.display(),
            "data transformation complete"
        );
        Ok((train_arr, test_arr, scaler_path))
    }
}

/// Appends the unscaled target as the final column of a scaled feature matrix.
fn with_target_column(x: Array2<f64>, y: &[f64]) -> Array2<f64> {
    let (rows, cols) = x.dim();
    let mut out = Array2::zeros((rows, cols + 1));
    out.slice_mut(ndarray::s![.., ..cols]).assign(&x);
    for (i, v) in y.iter().enumerate() {
        out[[i, cols]] = *v;
    }
    out
}

fn write_matrix(path: &Path, matrix: &Array2<f64>) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
    }
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("creating {}", path.display()))?;
    for row in matrix.outer_iter() {
        let record: Vec<String> = row.iter().map(|v| v.to_string()).collect();
        writer
            .write_record(&record)
            .with_context(|| format!("writing {}", path.display()))?;
    }
    writer
        .flush()
        .with_context(|| format!("flushing {}", path.display()))?;
    Ok(())
}

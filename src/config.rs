use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

/// Name of the label column; must be present in every merged dataset.
pub const TARGET_COLUMN: &str = "quality";

/// Leading segment every raw batch file name must carry.
pub const RAW_FILE_PREFIX: &str = "visibility";
/// Digits in the file name's date stamp segment, e.g. `08012020`.
pub const LENGTH_OF_DATE_STAMP: usize = 8;
/// Digits in the file name's time stamp segment, e.g. `120000`.
pub const LENGTH_OF_TIME_STAMP: usize = 6;

/// Fraction of rows held out for the test split.
pub const TEST_FRACTION: f64 = 0.2;

/// Run-scoped configuration: one artifact root keyed by the run timestamp,
/// with every output path derived from it. Constructed once in `main` and
/// passed to each component, never ambient.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    artifact_root: PathBuf,
    /// Fixed seed for the train/test shuffle; `None` means unseeded.
    pub split_seed: Option<u64>,
}

impl PipelineConfig {
    pub fn new(artifact_root: impl Into<PathBuf>) -> Self {
        Self {
            artifact_root: artifact_root.into(),
            split_seed: None,
        }
    }

    /// Artifact root `artifacts/<MM_DD_YYYY_HH_MM_SS>` for a run started at `now`.
    pub fn for_run_at(now: DateTime<Utc>) -> Self {
        let stamp = now.format("%m_%d_%Y_%H_%M_%S").to_string();
        Self::new(Path::new("artifacts").join(stamp))
    }

    pub fn artifact_root(&self) -> &Path {
        &self.artifact_root
    }

    pub fn data_validation_dir(&self) -> PathBuf {
        self.artifact_root.join("data_validation")
    }

    pub fn valid_data_dir(&self) -> PathBuf {
        self.data_validation_dir().join("validated")
    }

    pub fn invalid_data_dir(&self) -> PathBuf {
        self.data_validation_dir().join("invalid")
    }

    pub fn data_transformation_dir(&self) -> PathBuf {
        self.artifact_root.join("data_transformation")
    }

    pub fn train_file_path(&self) -> PathBuf {
        self.data_transformation_dir().join("train.csv")
    }

    pub fn test_file_path(&self) -> PathBuf {
        self.data_transformation_dir().join("test.csv")
    }

    pub fn preprocessor_path(&self) -> PathBuf {
        self.data_transformation_dir().join("preprocessing.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn paths_hang_off_the_artifact_root() {
        let cfg = PipelineConfig::new("artifacts/run1");
        assert_eq!(
            cfg.valid_data_dir(),
            Path::new("artifacts/run1/data_validation/validated")
        );
        assert_eq!(
            cfg.invalid_data_dir(),
            Path::new("artifacts/run1/data_validation/invalid")
        );
        assert_eq!(
            cfg.preprocessor_path(),
            Path::new("artifacts/run1/data_transformation/preprocessing.json")
        );
    }

    #[test]
    fn run_root_is_timestamp_keyed() {
        let now = Utc.with_ymd_and_hms(2020, 1, 8, 12, 0, 0).unwrap();
        let cfg = PipelineConfig::for_run_at(now);
        assert_eq!(
            cfg.artifact_root(),
            Path::new("artifacts/01_08_2020_12_00_00")
        );
    }
}

use anyhow::Result;
use std::path::Path;

use crate::config::{LENGTH_OF_DATE_STAMP, LENGTH_OF_TIME_STAMP, RAW_FILE_PREFIX};
use crate::error::PipelineError;
use crate::frame::Frame;
use crate::schema::SchemaSpec;

/// Per-file outcome of the three independent checks. Exists only while a
/// routing pass runs; never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationVerdict {
    pub name_ok: bool,
    pub column_count_ok: bool,
    pub no_all_null_columns_ok: bool,
}

impl ValidationVerdict {
    pub fn is_valid(&self) -> bool {
        self.name_ok && self.column_count_ok && self.no_all_null_columns_ok
    }
}

/// Applies the three schema-driven predicates to a single raw file.
pub struct FileValidator<'a> {
    schema: &'a SchemaSpec,
}

impl<'a> FileValidator<'a> {
    pub fn new(schema: &'a SchemaSpec) -> Self {
        Self { schema }
    }

    /// Structured check of the `<prefix>_<8 digits>_<6 digits>[...].csv`
    /// convention. Pure and infallible: a malformed name is just `false`.
    pub fn validate_file_name(&self, path: &Path) -> bool {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            return false;
        };
        let Some(stem) = name.strip_suffix(".csv") else {
            return false;
        };
        let segments: Vec<&str> = stem.split('_').collect();
        if segments.len() < 3 {
            return false;
        }
        segments[0] == RAW_FILE_PREFIX
            && is_digit_run(segments[1], LENGTH_OF_DATE_STAMP)
            && is_digit_run(segments[2], LENGTH_OF_TIME_STAMP)
    }

    /// True iff the file's column count equals the schema's expected count.
    pub fn validate_no_of_columns(&self, path: &Path) -> Result<bool> {
        let frame = self.read(path)?;
        Ok(frame.n_cols() == self.schema.expected_column_count())
    }

    /// True iff the file has no column whose values are all null.
    pub fn validate_missing_values_in_whole_column(&self, path: &Path) -> Result<bool> {
        let frame = self.read(path)?;
        Ok(frame.fully_null_column_count() == 0)
    }

    /// Runs all three checks. Read failures surface as `ValidationInput`;
    /// a failing predicate is just a `false` in the verdict.
    pub fn verdict(&self, path: &Path) -> Result<ValidationVerdict> {
        Ok(ValidationVerdict {
            name_ok: self.validate_file_name(path),
            column_count_ok: self.validate_no_of_columns(path)?,
            no_all_null_columns_ok: self.validate_missing_values_in_whole_column(path)?,
        })
    }

    fn read(&self, path: &Path) -> Result<Frame> {
        Frame::read_csv(path).map_err(|e| PipelineError::validation_input(path, e).into())
    }
}

fn is_digit_run(segment: &str, len: usize) -> bool {
    segment.len() == len && segment.bytes().all(|b| b.is_ascii_digit())
}

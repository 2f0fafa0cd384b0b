use anyhow::Result;
use tracing::{debug, warn};

use crate::error::PipelineError;
use crate::frame::{Cell, Frame};
use crate::schema::SchemaSpec;

/// Applies the schema-driven cleanup to the merged dataset: column drops
/// followed by per-column IQR outlier capping.
pub struct DataCleaner<'a> {
    schema: &'a SchemaSpec,
}

impl<'a> DataCleaner<'a> {
    pub fn new(schema: &'a SchemaSpec) -> Self {
        Self { schema }
    }

    /// Removes exactly the schema's `drop_columns`. An absent column is an
    /// error, not a skip.
    pub fn drop_schema_columns(&self, mut frame: Frame) -> Result<Frame> {
        frame
            .drop_columns(&self.schema.drop_columns)
            .map_err(|e| PipelineError::transformation_with("dropping schema columns", e))?;
        Ok(frame)
    }

    /// Clamps each configured column to `[P25 - 1.5*IQR, P75 + 1.5*IQR]`,
    /// with the percentiles taken from that column's pre-capping values.
    /// Columns are independent, so processing order does not matter.
    pub fn apply_outliers_capping(&self, mut frame: Frame) -> Result<Frame> {
        for name in &self.schema.outlier_columns {
            let col = frame.column(name).ok_or_else(|| {
                PipelineError::transformation(format!(
                    "outlier column {name} missing from merged data"
                ))
            })?;

            let mut values: Vec<f64> = col.iter().filter_map(Cell::as_num).collect();
            if values.is_empty() {
                warn!(column = %name, "no numeric values, skipping outlier capping");
                continue;
            }
            values.sort_by(f64::total_cmp);

            let p25 = quantile(&values, 0.25);
            let p75 = quantile(&values, 0.75);
            let iqr = p75 - p25;
            let lower = p25 - 1.5 * iqr;
            let upper = p75 + 1.5 * iqr;
            debug!(column = %name, p25, p75, lower, upper, "capping outliers");

            if let Some(col) = frame.column_mut(name) {
                for cell in col.iter_mut() {
                    if let Cell::Num(v) = cell {
                        *v = v.clamp(lower, upper);
                    }
                }
            }
        }
        Ok(frame)
    }
}

/// Quantile with linear interpolation over sorted values, matching the
/// pandas/numpy default method.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }
    let pos = q * (n - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    fn frame_from(content: &str) -> Frame {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.csv");
        fs::write(&path, content).unwrap();
        Frame::read_csv(Path::new(&path)).unwrap()
    }

    #[test]
    fn quantiles_use_linear_interpolation() {
        let values = [1.0, 2.0, 3.0, 4.0];
        assert!((quantile(&values, 0.25) - 1.75).abs() < 1e-12);
        assert!((quantile(&values, 0.75) - 3.25).abs() < 1e-12);
        assert_eq!(quantile(&[5.0], 0.75), 5.0);
    }

    #[test]
    fn drops_exactly_the_schema_columns() -> Result<()> {
        let schema = SchemaSpec {
            columns: vec!["DATE".into(), "a".into(), "quality".into()],
            drop_columns: vec!["DATE".into()],
            outlier_columns: vec![],
        };
        let cleaner = DataCleaner::new(&schema);
        let frame = frame_from("DATE,a,quality\n20200108,1,10\n");
        let frame = cleaner.drop_schema_columns(frame)?;
        assert_eq!(frame.names(), ["a", "quality"]);
        Ok(())
    }

    #[test]
    fn dropping_an_absent_column_is_an_error() {
        let schema = SchemaSpec {
            columns: vec!["a".into()],
            drop_columns: vec!["DATE".into()],
            outlier_columns: vec![],
        };
        let cleaner = DataCleaner::new(&schema);
        let frame = frame_from("a,quality\n1,10\n");
        let err = cleaner.drop_schema_columns(frame).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PipelineError>(),
            Some(PipelineError::Transformation { .. })
        ));
    }

    #[test]
    fn capping_bounds_hold_after_the_pass() -> Result<()> {
        let schema = SchemaSpec {
            columns: vec!["a".into(), "quality".into()],
            drop_columns: vec![],
            outlier_columns: vec!["a".into()],
        };
        let cleaner = DataCleaner::new(&schema);
        // 100.0 and -100.0 are far outside the IQR fences of the rest.
        let frame =
            frame_from("a,quality\n1,0\n2,0\n3,0\n4,0\n100,0\n-100,0\n");

        // Fences from the pre-capping distribution.
        let mut pre: Vec<f64> = frame
            .column("a")
            .unwrap()
            .iter()
            .filter_map(Cell::as_num)
            .collect();
        pre.sort_by(f64::total_cmp);
        let iqr = quantile(&pre, 0.75) - quantile(&pre, 0.25);
        let upper = quantile(&pre, 0.75) + 1.5 * iqr;
        let lower = quantile(&pre, 0.25) - 1.5 * iqr;

        let capped = cleaner.apply_outliers_capping(frame)?;
        let post: Vec<f64> = capped
            .column("a")
            .unwrap()
            .iter()
            .filter_map(Cell::as_num)
            .collect();
        assert!(post.iter().all(|v| *v <= upper && *v >= lower));
        // In-range values are untouched.
        assert_eq!(post[1], 2.0);
        // Out-of-range values land exactly on the fences.
        assert_eq!(post[4], upper);
        assert_eq!(post[5], lower);
        Ok(())
    }

    #[test]
    fn capping_a_missing_column_is_an_error() {
        let schema = SchemaSpec {
            columns: vec!["a".into()],
            drop_columns: vec![],
            outlier_columns: vec!["gone".into()],
        };
        let cleaner = DataCleaner::new(&schema);
        let frame = frame_from("a,quality\n1,0\n");
        assert!(cleaner.apply_outliers_capping(frame).is_err());
    }

    #[test]
    fn nulls_pass_through_capping_untouched() -> Result<()> {
        let schema = SchemaSpec {
            columns: vec!["a".into(), "quality".into()],
            drop_columns: vec![],
            outlier_columns: vec!["a".into()],
        };
        let cleaner = DataCleaner::new(&schema);
        let frame = frame_from("a,quality\n1,0\n,0\n2,0\n3,0\n");
        let capped = cleaner.apply_outliers_capping(frame)?;
        assert!(capped.column("a").unwrap()[1].is_null());
        Ok(())
    }
}

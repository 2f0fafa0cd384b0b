use anyhow::Result;
use ndarray::{Array2, Axis};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

/// Zero-mean/unit-variance feature scaler. Fit on training features only;
/// the test split must never influence the statistics.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl StandardScaler {
    /// Fits per-feature mean and population standard deviation. A feature
    /// with zero variance scales by 1 so it maps to a constant zero.
    pub fn fit(x: &Array2<f64>) -> Result<Self> {
        let mean = x.mean_axis(Axis(0)).ok_or_else(|| {
            PipelineError::transformation("cannot fit scaler on an empty training set")
        })?;
        let std = x.std_axis(Axis(0), 0.0);
        let scale: Vec<f64> = std.iter().map(|s| if *s == 0.0 { 1.0 } else { *s }).collect();
        Ok(Self {
            mean: mean.to_vec(),
            scale,
        })
    }

    pub fn transform(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        if x.ncols() != self.mean.len() {
            return Err(PipelineError::transformation(format!(
                "scaler fitted on {} features, got {}",
                self.mean.len(),
                x.ncols()
            ))
            .into());
        }
        let mut out = x.clone();
        for (j, mut col) in out.axis_iter_mut(Axis(1)).enumerate() {
            let (m, s) = (self.mean[j], self.scale[j]);
            col.mapv_inplace(|v| (v - m) / s);
        }
        Ok(out)
    }
}

/// Shuffled row split into (train, test) index sets. The test count is
/// `ceil(n * test_fraction)`, matching sklearn. Unseeded by default; a
/// fixed seed makes the split reproducible.
pub fn train_test_split(
    n_rows: usize,
    test_fraction: f64,
    seed: Option<u64>,
) -> Result<(Vec<usize>, Vec<usize>)> {
    if n_rows == 0 {
        return Err(PipelineError::transformation("cannot split an empty dataset").into());
    }
    let mut indices: Vec<usize> = (0..n_rows).collect();
    match seed {
        Some(s) => indices.shuffle(&mut StdRng::seed_from_u64(s)),
        None => indices.shuffle(&mut rand::thread_rng()),
    }
    let n_test = ((n_rows as f64) * test_fraction).ceil() as usize;
    let (test, train) = indices.split_at(n_test.min(n_rows));
    if train.is_empty() {
        return Err(PipelineError::transformation(format!(
            "training split is empty ({n_rows} rows, test fraction {test_fraction})"
        ))
        .into());
    }
    Ok((train.to_vec(), test.to_vec()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn fit_computes_population_statistics() -> Result<()> {
        let x = array![[1.0, 10.0], [3.0, 10.0]];
        let scaler = StandardScaler::fit(&x)?;
        assert_eq!(scaler.mean, vec![2.0, 10.0]);
        // Population std of [1, 3] is 1; zero-variance feature scales by 1.
        assert_eq!(scaler.scale, vec![1.0, 1.0]);
        Ok(())
    }

    #[test]
    fn transformed_training_features_are_centered() -> Result<()> {
        let x = array![[1.0, 4.0], [2.0, 6.0], [3.0, 8.0]];
        let scaler = StandardScaler::fit(&x)?;
        let scaled = scaler.transform(&x)?;
        let means = scaled.mean_axis(Axis(0)).unwrap();
        for m in means.iter() {
            assert!(m.abs() < 1e-12);
        }
        let stds = scaled.std_axis(Axis(0), 0.0);
        for s in stds.iter() {
            assert!((s - 1.0).abs() < 1e-12);
        }
        Ok(())
    }

    #[test]
    fn transform_rejects_wrong_width() -> Result<()> {
        let scaler = StandardScaler::fit(&array![[1.0], [2.0]])?;
        assert!(scaler.transform(&array![[1.0, 2.0]]).is_err());
        Ok(())
    }

    #[test]
    fn split_is_a_partition_of_the_rows() -> Result<()> {
        let (train, test) = train_test_split(10, 0.2, Some(7))?;
        assert_eq!(test.len(), 2);
        assert_eq!(train.len(), 8);
        let mut all: Vec<usize> = train.iter().chain(test.iter()).copied().collect();
        all.sort_unstable();
        assert_eq!(all, (0..10).collect::<Vec<_>>());
        Ok(())
    }

    #[test]
    fn seeded_split_is_reproducible() -> Result<()> {
        let a = train_test_split(50, 0.2, Some(42))?;
        let b = train_test_split(50, 0.2, Some(42))?;
        assert_eq!(a, b);
        Ok(())
    }

    #[test]
    fn degenerate_splits_are_errors() {
        assert!(train_test_split(0, 0.2, None).is_err());
        // One row: the single row goes to test, leaving training empty.
        assert!(train_test_split(1, 0.2, None).is_err());
    }
}

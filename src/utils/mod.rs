//! Utility functions for preprocessing

/// Feature standardization
pub mod scaling {
    use crate::core::{LearnerError, Result};

    /// Per-feature mean and population standard deviation
    ///
    /// Statistics are accumulated in `f64` and stored as `f32`, the
    /// precision the feature table is read in.
    #[derive(Debug, Clone, PartialEq)]
    pub struct NormalizationStats {
        pub average: Vec<f32>,
        pub std: Vec<f32>,
    }

    impl NormalizationStats {
        /// Compute statistics over every row
        pub fn fit(rows: &[Vec<f32>]) -> Result<Self> {
            let first = rows.first().ok_or(LearnerError::EmptyDataset)?;
            let n_features = first.len();
            if let Some(row) = rows.iter().find(|row| row.len() != n_features) {
                return Err(LearnerError::DimensionMismatch {
                    expected: n_features,
                    actual: row.len(),
                });
            }

            let n = rows.len() as f64;
            let mut sums = vec![0.0f64; n_features];
            for row in rows {
                for (sum, &value) in sums.iter_mut().zip(row.iter()) {
                    *sum += f64::from(value);
                }
            }
            let means: Vec<f64> = sums.iter().map(|&s| s / n).collect();

            let mut squares = vec![0.0f64; n_features];
            for row in rows {
                for ((acc, &value), &mean) in squares.iter_mut().zip(row.iter()).zip(&means) {
                    let diff = f64::from(value) - mean;
                    *acc += diff * diff;
                }
            }

            Ok(Self {
                average: means.iter().map(|&m| m as f32).collect(),
                std: squares.iter().map(|&sq| (sq / n).sqrt() as f32).collect(),
            })
        }

        /// Number of features the statistics cover
        pub fn n_features(&self) -> usize {
            self.average.len()
        }

        /// Standardize one row: `(value - mean) / std`
        ///
        /// A zero standard deviation is not guarded and yields NaN or
        /// infinite values.
        pub fn transform_row(&self, row: &[f32]) -> Vec<f32> {
            row.iter()
                .zip(self.average.iter().zip(self.std.iter()))
                .map(|(&value, (&mean, &std))| (value - mean) / std)
                .collect()
        }

        /// Standardize every row
        pub fn transform(&self, rows: &[Vec<f32>]) -> Vec<Vec<f32>> {
            rows.iter().map(|row| self.transform_row(row)).collect()
        }

        /// Indices of columns whose standard deviation is zero
        pub fn zero_variance_columns(&self) -> Vec<usize> {
            self.std
                .iter()
                .enumerate()
                .filter(|&(_, &std)| std == 0.0)
                .map(|(i, _)| i)
                .collect()
        }
    }

    /// Convenience function: fit and transform in one step
    pub fn fit_transform(rows: &[Vec<f32>]) -> Result<(Vec<Vec<f32>>, NormalizationStats)> {
        let stats = NormalizationStats::fit(rows)?;
        let transformed = stats.transform(rows);
        Ok((transformed, stats))
    }
}

/// Seeded train/test partitioning
pub mod split {
    use crate::core::{LearnerError, Result};
    use rand::seq::SliceRandom;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    /// Row indices of the two sides of a split
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct TrainTestSplit {
        pub train: Vec<usize>,
        pub test: Vec<usize>,
    }

    /// Shuffle `0..n` with a seeded generator and cut off the test rows
    ///
    /// The test side holds `ceil(n * test_fraction)` rows.
    pub fn train_test_split(n: usize, test_fraction: f64, seed: u64) -> Result<TrainTestSplit> {
        if !(test_fraction > 0.0 && test_fraction < 1.0) {
            return Err(LearnerError::InvalidParameter(format!(
                "Test fraction must be between 0 and 1, got: {test_fraction}"
            )));
        }

        let n_test = (n as f64 * test_fraction).ceil() as usize;
        let n_train = n.saturating_sub(n_test);
        if n_test == 0 || n_train == 0 {
            return Err(LearnerError::InvalidDataset(format!(
                "Cannot split {n} samples with test fraction {test_fraction}: \
                 one side would be empty"
            )));
        }

        let mut permutation: Vec<usize> = (0..n).collect();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        permutation.shuffle(&mut rng);

        let train = permutation.split_off(n_test);
        Ok(TrainTestSplit {
            train,
            test: permutation,
        })
    }
}

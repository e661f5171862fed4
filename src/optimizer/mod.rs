//! One-vs-rest training on top of the binary solver
//!
//! A K-class problem becomes K binary problems, one per class against the
//! rest. Two-class problems collapse into a single classifier whose positive
//! class is id 1.

use crate::core::{Classifier, Dataset, LearnerError, Prediction, Result, Sample, SolverConfig};
use crate::kernel::dot_product;
use crate::solver::DualCoordinateDescent;
use log::{debug, warn};

/// Multi-class optimizer that trains one binary classifier per class
pub struct OneVsRestOptimizer {
    config: SolverConfig,
}

impl OneVsRestOptimizer {
    /// Create a new optimizer with the given solver configuration
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    /// Get the solver configuration
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Train on every sample of a dataset
    pub fn train<D: Dataset>(&self, dataset: &D) -> Result<LinearModel> {
        let samples: Vec<Sample> = (0..dataset.len())
            .map(|i| dataset.get_sample(i).clone())
            .collect();
        self.train_samples(&samples, dataset.n_classes())
    }

    /// Train on samples whose class ids lie in `[0, n_classes)`
    pub fn train_samples(&self, samples: &[Sample], n_classes: usize) -> Result<LinearModel> {
        if samples.is_empty() {
            return Err(LearnerError::EmptyDataset);
        }
        if n_classes < 2 {
            return Err(LearnerError::InvalidDataset(format!(
                "At least 2 classes are required, got {n_classes}"
            )));
        }

        let mut counts = vec![0usize; n_classes];
        for sample in samples {
            let slot = counts.get_mut(sample.class).ok_or_else(|| {
                LearnerError::InvalidDataset(format!(
                    "Class id {} out of range for {n_classes} classes",
                    sample.class
                ))
            })?;
            *slot += 1;
        }
        let missing: Vec<usize> = (0..n_classes).filter(|&k| counts[k] == 0).collect();
        if !missing.is_empty() {
            warn!("Classes {missing:?} have no training samples; their classifiers only see negatives");
        }

        let positives: Vec<usize> = if n_classes == 2 {
            vec![1]
        } else {
            (0..n_classes).collect()
        };

        let solver = DualCoordinateDescent::new(self.config.clone());
        let mut coef = Vec::with_capacity(positives.len());
        let mut intercept = Vec::with_capacity(positives.len());
        let mut iterations = Vec::with_capacity(positives.len());

        for positive in positives {
            let targets: Vec<f64> = samples
                .iter()
                .map(|s| if s.class == positive { 1.0 } else { -1.0 })
                .collect();
            let result = solver.solve(samples, &targets)?;
            debug!(
                "Class {positive} vs rest: {} passes, bias {:.6}",
                result.iterations, result.bias
            );
            coef.push(result.weights);
            intercept.push(result.bias);
            iterations.push(result.iterations);
        }

        Ok(LinearModel {
            coef,
            intercept,
            n_classes,
            iterations,
        })
    }
}

/// Trained linear decision functions, one row per binary classifier
#[derive(Debug, Clone)]
pub struct LinearModel {
    coef: Vec<Vec<f64>>,
    intercept: Vec<f64>,
    n_classes: usize,
    iterations: Vec<usize>,
}

impl LinearModel {
    /// Rebuild a model from exported weights
    ///
    /// Two classes use a single row; more classes use one row per class.
    pub fn from_parts(coef: Vec<Vec<f64>>, intercept: Vec<f64>, n_classes: usize) -> Result<Self> {
        let expected_rows = if n_classes == 2 { 1 } else { n_classes };
        if n_classes < 2 || coef.len() != expected_rows {
            return Err(LearnerError::InvalidParameter(format!(
                "{} coefficient rows do not fit {n_classes} classes",
                coef.len()
            )));
        }
        if intercept.len() != coef.len() {
            return Err(LearnerError::DimensionMismatch {
                expected: coef.len(),
                actual: intercept.len(),
            });
        }
        let n_features = coef[0].len();
        if let Some(row) = coef.iter().find(|row| row.len() != n_features) {
            return Err(LearnerError::DimensionMismatch {
                expected: n_features,
                actual: row.len(),
            });
        }
        let iterations = vec![0; coef.len()];
        Ok(Self {
            coef,
            intercept,
            n_classes,
            iterations,
        })
    }

    /// Weight rows, one per binary classifier
    pub fn coef(&self) -> &[Vec<f64>] {
        &self.coef
    }

    /// Intercepts, one per binary classifier
    pub fn intercept(&self) -> &[f64] {
        &self.intercept
    }

    /// Number of features each row weights
    pub fn n_features(&self) -> usize {
        self.coef.first().map_or(0, Vec::len)
    }

    /// Solver passes used per row (zero for rebuilt models)
    pub fn iterations(&self) -> &[usize] {
        &self.iterations
    }
}

impl Classifier for LinearModel {
    fn decision_values(&self, features: &[f64]) -> Vec<f64> {
        self.coef
            .iter()
            .zip(self.intercept.iter())
            .map(|(row, &b)| dot_product(row, features) + b)
            .collect()
    }

    fn predict(&self, features: &[f64]) -> Prediction {
        let scores = self.decision_values(features);
        if scores.len() == 1 {
            let class = if scores[0] > 0.0 { 1 } else { 0 };
            return Prediction::new(class, scores[0]);
        }

        let mut best = 0;
        for (k, &score) in scores.iter().enumerate().skip(1) {
            if score > scores[best] {
                best = k;
            }
        }
        Prediction::new(best, scores[best])
    }

    fn n_classes(&self) -> usize {
        self.n_classes
    }
}

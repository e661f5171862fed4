//! Core type definitions for the linear classifier

/// Prediction result containing the class id and its decision value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    /// Predicted class id in `[0, K)`
    pub class: usize,
    /// Decision value of the winning classifier
    pub decision_value: f64,
}

impl Prediction {
    /// Create a new prediction
    pub fn new(class: usize, decision_value: f64) -> Self {
        Self {
            class,
            decision_value,
        }
    }
}

/// Training sample with dense features and an encoded class id
#[derive(Clone, Debug, PartialEq)]
pub struct Sample {
    /// Feature vector, one value per column
    pub features: Vec<f64>,
    /// Encoded class id
    pub class: usize,
}

impl Sample {
    /// Create a new sample
    pub fn new(features: Vec<f64>, class: usize) -> Self {
        Self { features, class }
    }

    /// Number of features
    pub fn dim(&self) -> usize {
        self.features.len()
    }
}

/// Result of a single binary optimization
#[derive(Debug, Clone)]
pub struct OptimizationResult {
    /// Primal weight vector, one entry per feature
    pub weights: Vec<f64>,
    /// Bias term (already multiplied by the intercept scaling)
    pub bias: f64,
    /// Number of passes over the active set
    pub iterations: usize,
    /// Whether the stopping tolerance was reached before the pass cap
    pub converged: bool,
}

/// Configuration for the dual coordinate descent solver
#[derive(Debug, Clone)]
pub struct SolverConfig {
    /// Regularization parameter: loss weight relative to the margin term
    pub c: f64,
    /// Stopping tolerance on the projected gradient spread
    pub tolerance: f64,
    /// Maximum number of passes over the data
    pub max_iterations: usize,
    /// Learn a bias through an appended constant feature
    pub fit_intercept: bool,
    /// Value of the appended constant feature
    pub intercept_scaling: f64,
    /// Seed for the per-pass coordinate shuffle
    pub seed: u64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            c: 1.0,
            tolerance: 1e-4,
            max_iterations: 1000,
            fit_intercept: true,
            intercept_scaling: 1.0,
            seed: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prediction() {
        let pred = Prediction::new(2, 2.5);
        assert_eq!(pred.class, 2);
        assert_eq!(pred.decision_value, 2.5);
    }

    #[test]
    fn test_sample() {
        let sample = Sample::new(vec![1.0, 0.0, 3.0], 1);
        assert_eq!(sample.class, 1);
        assert_eq!(sample.dim(), 3);
    }

    #[test]
    fn test_solver_config_default() {
        let config = SolverConfig::default();
        assert_eq!(config.c, 1.0);
        assert_eq!(config.tolerance, 1e-4);
        assert_eq!(config.max_iterations, 1000);
        assert!(config.fit_intercept);
        assert_eq!(config.intercept_scaling, 1.0);
        assert_eq!(config.seed, 0);
    }
}

//! High-level API for linear SVM training and evaluation
//!
//! This module provides a builder over the one-vs-rest solver, mirroring the
//! usual estimator workflow: configure, fit, score.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use au_learner::api::LinearSVC;
//! use au_learner::data::{EncodedDataset, FeatureTable, LabelEncoder};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let table = FeatureTable::from_file("features.csv")?;
//! let (encoder, classes) = LabelEncoder::fit_transform(table.labels())?;
//! let dataset = EncodedDataset::from_rows(table.features(), &classes, encoder.n_classes())?;
//!
//! let model = LinearSVC::new()
//!     .with_c(1.5)
//!     .with_max_iterations(2000)
//!     .fit(&dataset)?;
//!
//! println!("Accuracy: {:.2}%", model.score(&dataset) * 100.0);
//! # Ok(())
//! # }
//! ```

use crate::core::{Classifier, Dataset, Prediction, Result, Sample, SolverConfig};
use crate::metrics::{accuracy, ConfusionMatrix};
use crate::optimizer::{LinearModel, OneVsRestOptimizer};

/// Linear support vector classifier with builder pattern
#[derive(Debug, Clone, Default)]
pub struct LinearSVC {
    config: SolverConfig,
}

impl LinearSVC {
    /// Create a classifier with default parameters
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a classifier from a full solver configuration
    pub fn with_config(config: SolverConfig) -> Self {
        Self { config }
    }

    /// Set regularization parameter C
    pub fn with_c(mut self, c: f64) -> Self {
        self.config.c = c;
        self
    }

    /// Set maximum number of solver passes
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.config.max_iterations = max_iterations;
        self
    }

    /// Set convergence tolerance
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.config.tolerance = tolerance;
        self
    }

    /// Enable or disable the learned intercept
    pub fn with_fit_intercept(mut self, fit_intercept: bool) -> Self {
        self.config.fit_intercept = fit_intercept;
        self
    }

    /// Set the constant feature used to learn the intercept
    pub fn with_intercept_scaling(mut self, intercept_scaling: f64) -> Self {
        self.config.intercept_scaling = intercept_scaling;
        self
    }

    /// Set the seed of the coordinate shuffle
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    /// Get the solver configuration
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Train on a dataset
    pub fn fit<D: Dataset>(&self, dataset: &D) -> Result<TrainedModel> {
        let model = OneVsRestOptimizer::new(self.config.clone()).train(dataset)?;
        Ok(TrainedModel {
            model,
            config: self.config.clone(),
        })
    }

    /// Train on samples labeled in `[0, n_classes)`
    pub fn fit_samples(&self, samples: &[Sample], n_classes: usize) -> Result<TrainedModel> {
        let model = OneVsRestOptimizer::new(self.config.clone()).train_samples(samples, n_classes)?;
        Ok(TrainedModel {
            model,
            config: self.config.clone(),
        })
    }
}

/// Trained classifier with high-level prediction interface
#[derive(Debug, Clone)]
pub struct TrainedModel {
    model: LinearModel,
    config: SolverConfig,
}

impl TrainedModel {
    /// Predict a single feature vector
    pub fn predict(&self, features: &[f64]) -> Prediction {
        self.model.predict(features)
    }

    /// Predict every sample of a dataset
    pub fn predict_dataset<D: Dataset>(&self, dataset: &D) -> Vec<Prediction> {
        (0..dataset.len())
            .map(|i| self.model.predict(&dataset.get_sample(i).features))
            .collect()
    }

    /// Mean accuracy on a dataset
    pub fn score<D: Dataset>(&self, dataset: &D) -> f64 {
        let predicted: Vec<usize> = self
            .predict_dataset(dataset)
            .iter()
            .map(|p| p.class)
            .collect();
        accuracy(&predicted, &dataset.get_classes())
    }

    /// Confusion matrix over the full label space
    pub fn confusion_matrix<D: Dataset>(&self, dataset: &D) -> Result<ConfusionMatrix> {
        let predicted: Vec<usize> = self
            .predict_dataset(dataset)
            .iter()
            .map(|p| p.class)
            .collect();
        ConfusionMatrix::new(&dataset.get_classes(), &predicted, self.model.n_classes())
    }

    /// Get model information
    pub fn info(&self) -> ModelInfo {
        ModelInfo {
            n_classes: self.model.n_classes(),
            n_features: self.model.n_features(),
            n_classifiers: self.model.coef().len(),
            c: self.config.c,
            max_iterations: self.config.max_iterations,
            iterations: self.model.iterations().to_vec(),
        }
    }

    /// Get the solver configuration the model was trained with
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Get the underlying linear model
    pub fn inner(&self) -> &LinearModel {
        &self.model
    }
}

/// Model information
#[derive(Debug, Clone)]
pub struct ModelInfo {
    pub n_classes: usize,
    pub n_features: usize,
    pub n_classifiers: usize,
    pub c: f64,
    pub max_iterations: usize,
    pub iterations: Vec<usize>,
}

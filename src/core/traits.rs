//! Core traits for the training pipeline

use crate::core::{Prediction, Sample};

/// Dataset abstraction for encoded, numeric samples
pub trait Dataset: Send + Sync {
    /// Number of samples in the dataset
    fn len(&self) -> usize;

    /// Number of features (dimensionality)
    fn dim(&self) -> usize;

    /// Number of classes in the label space, including classes with no samples here
    fn n_classes(&self) -> usize;

    /// Get a single sample by index
    ///
    /// # Panics
    /// Panics if index >= len()
    fn get_sample(&self, i: usize) -> &Sample;

    /// Get multiple samples
    fn get_batch(&self, indices: &[usize]) -> Vec<Sample> {
        indices.iter().map(|&i| self.get_sample(i).clone()).collect()
    }

    /// Get all class ids as a vector
    fn get_classes(&self) -> Vec<usize> {
        (0..self.len()).map(|i| self.get_sample(i).class).collect()
    }

    /// Check if the dataset is empty
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Trained multi-class classifier
pub trait Classifier: Send + Sync {
    /// Raw decision values, one per classifier row
    fn decision_values(&self, features: &[f64]) -> Vec<f64>;

    /// Predict a single feature vector
    fn predict(&self, features: &[f64]) -> Prediction;

    /// Predict multiple samples
    fn predict_batch(&self, samples: &[Sample]) -> Vec<Prediction> {
        samples.iter().map(|s| self.predict(&s.features)).collect()
    }

    /// Number of classes the classifier distinguishes
    fn n_classes(&self) -> usize;
}

//! In-memory encoded dataset

use crate::core::{Dataset, LearnerError, Result, Sample};

/// Dataset of normalized feature rows with encoded class ids
#[derive(Debug, Clone)]
pub struct EncodedDataset {
    samples: Vec<Sample>,
    dimensions: usize,
    n_classes: usize,
}

impl EncodedDataset {
    /// Build a dataset from samples sharing one label space of `n_classes`
    pub fn new(samples: Vec<Sample>, n_classes: usize) -> Result<Self> {
        let dimensions = samples.first().map(Sample::dim).unwrap_or(0);

        if let Some(sample) = samples.iter().find(|s| s.dim() != dimensions) {
            return Err(LearnerError::DimensionMismatch {
                expected: dimensions,
                actual: sample.dim(),
            });
        }
        if let Some(sample) = samples.iter().find(|s| s.class >= n_classes) {
            return Err(LearnerError::InvalidDataset(format!(
                "Class id {} out of range for {n_classes} classes",
                sample.class
            )));
        }

        Ok(Self {
            samples,
            dimensions,
            n_classes,
        })
    }

    /// Build a dataset from `f32` rows and class ids
    pub fn from_rows(rows: &[Vec<f32>], classes: &[usize], n_classes: usize) -> Result<Self> {
        if rows.len() != classes.len() {
            return Err(LearnerError::DimensionMismatch {
                expected: rows.len(),
                actual: classes.len(),
            });
        }
        let samples = rows
            .iter()
            .zip(classes.iter())
            .map(|(row, &class)| Sample::new(row.iter().map(|&v| f64::from(v)).collect(), class))
            .collect();
        Self::new(samples, n_classes)
    }

    /// Select rows by index, keeping the label space
    pub fn subset(&self, indices: &[usize]) -> Self {
        Self {
            samples: self.get_batch(indices),
            dimensions: self.dimensions,
            n_classes: self.n_classes,
        }
    }

    /// Borrow all samples
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Number of samples per class id
    pub fn class_counts(&self) -> Vec<usize> {
        let mut counts = vec![0; self.n_classes];
        for sample in &self.samples {
            counts[sample.class] += 1;
        }
        counts
    }
}

impl Dataset for EncodedDataset {
    fn len(&self) -> usize {
        self.samples.len()
    }

    fn dim(&self) -> usize {
        self.dimensions
    }

    fn n_classes(&self) -> usize {
        self.n_classes
    }

    fn get_sample(&self, i: usize) -> &Sample {
        &self.samples[i]
    }
}

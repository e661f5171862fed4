//! Classification metrics: accuracy and the confusion matrix

use crate::core::{LearnerError, Result};
use std::fmt;

/// Fraction of predictions equal to the true class
pub fn accuracy(predicted: &[usize], actual: &[usize]) -> f64 {
    if actual.is_empty() {
        return 0.0;
    }
    let correct = predicted
        .iter()
        .zip(actual.iter())
        .filter(|(p, a)| p == a)
        .count();
    correct as f64 / actual.len() as f64
}

/// Counts of (true class, predicted class) pairs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfusionMatrix {
    counts: Vec<Vec<usize>>,
}

impl ConfusionMatrix {
    /// Tally predictions over `n_classes` classes
    pub fn new(actual: &[usize], predicted: &[usize], n_classes: usize) -> Result<Self> {
        if actual.len() != predicted.len() {
            return Err(LearnerError::DimensionMismatch {
                expected: actual.len(),
                actual: predicted.len(),
            });
        }
        let mut counts = vec![vec![0; n_classes]; n_classes];
        for (&a, &p) in actual.iter().zip(predicted.iter()) {
            if a >= n_classes || p >= n_classes {
                return Err(LearnerError::InvalidParameter(format!(
                    "Class pair ({a}, {p}) out of range for {n_classes} classes"
                )));
            }
            counts[a][p] += 1;
        }
        Ok(Self { counts })
    }

    /// Number of classes (rows and columns)
    pub fn n_classes(&self) -> usize {
        self.counts.len()
    }

    /// Raw counts, indexed `[true][predicted]`
    pub fn counts(&self) -> &[Vec<usize>] {
        &self.counts
    }

    /// Total number of tallied samples
    pub fn total(&self) -> usize {
        self.counts.iter().flatten().sum()
    }

    /// Accuracy: diagonal over total
    pub fn accuracy(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        let diagonal: usize = (0..self.n_classes()).map(|k| self.counts[k][k]).sum();
        diagonal as f64 / total as f64
    }

    /// Row-normalized proportions; rows without samples are all zeros
    pub fn normalized(&self) -> Vec<Vec<f64>> {
        self.counts
            .iter()
            .map(|row| {
                let support: usize = row.iter().sum();
                row.iter()
                    .map(|&c| {
                        if support == 0 {
                            0.0
                        } else {
                            c as f64 / support as f64
                        }
                    })
                    .collect()
            })
            .collect()
    }

    /// Render the normalized matrix as a text table with the given labels
    pub fn display<'a>(&'a self, labels: &'a [&'a str]) -> ConfusionMatrixDisplay<'a> {
        ConfusionMatrixDisplay {
            matrix: self,
            labels,
        }
    }
}

/// Text rendering of a row-normalized confusion matrix
pub struct ConfusionMatrixDisplay<'a> {
    matrix: &'a ConfusionMatrix,
    labels: &'a [&'a str],
}

impl fmt::Display for ConfusionMatrixDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = self.matrix.n_classes();
        let names: Vec<String> = (0..n)
            .map(|k| {
                self.labels
                    .get(k)
                    .map_or_else(|| k.to_string(), |label| label.to_string())
            })
            .collect();
        let label_width = names
            .iter()
            .map(|s| s.chars().count())
            .chain(std::iter::once("true \\ predicted".len()))
            .max()
            .unwrap_or(0);
        let cell_width = names
            .iter()
            .map(|s| s.chars().count())
            .max()
            .unwrap_or(0)
            .max(4);

        write!(f, "{:<label_width$}", "true \\ predicted")?;
        for name in &names {
            write!(f, " {name:>cell_width$}")?;
        }
        writeln!(f)?;

        for (name, row) in names.iter().zip(self.matrix.normalized()) {
            write!(f, "{name:<label_width$}")?;
            for value in row {
                write!(f, " {value:>cell_width$.2}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

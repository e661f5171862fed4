//! Label encoding
//!
//! Maps arbitrary label strings to dense class ids in `[0, K)`. Ids follow
//! the sorted order of the distinct labels: numeric order when every label
//! parses as a number, lexicographic order otherwise.

use crate::core::{LearnerError, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Class id to original label mapping
///
/// Iteration order is the order in which labels first appear in the data,
/// which is also the key order of the exported JSON object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassMap {
    entries: IndexMap<usize, String>,
}

impl ClassMap {
    /// Number of classes
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map holds no class
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Label for a class id
    pub fn get(&self, class: usize) -> Option<&str> {
        self.entries.get(&class).map(String::as_str)
    }

    /// `(class id, label)` pairs in first-appearance order
    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.entries.iter().map(|(&id, label)| (id, label.as_str()))
    }

    /// Labels ordered by class id
    pub fn labels_sorted(&self) -> Vec<&str> {
        let mut pairs: Vec<(usize, &str)> = self.iter().collect();
        pairs.sort_by_key(|&(id, _)| id);
        pairs.into_iter().map(|(_, label)| label).collect()
    }
}

/// Label encoder fitted on a label column
#[derive(Debug, Clone)]
pub struct LabelEncoder {
    classes: Vec<String>,
    index: HashMap<String, usize>,
}

impl LabelEncoder {
    /// Fit the encoder on a label column
    pub fn fit(labels: &[String]) -> Result<Self> {
        if labels.is_empty() {
            return Err(LearnerError::EmptyDataset);
        }

        let mut classes: Vec<String> = labels.to_vec();
        classes.sort();
        classes.dedup();

        let numeric: Option<Vec<f64>> = classes
            .iter()
            .map(|label| label.trim().parse::<f64>().ok().filter(|v| !v.is_nan()))
            .collect();

        if let Some(values) = numeric {
            let mut keyed: Vec<(f64, String)> = values.into_iter().zip(classes).collect();
            keyed.sort_by(|a, b| {
                a.0.partial_cmp(&b.0)
                    .unwrap_or(Ordering::Equal)
                    .then_with(|| a.1.cmp(&b.1))
            });
            classes = keyed.into_iter().map(|(_, label)| label).collect();
        }

        let index = classes
            .iter()
            .enumerate()
            .map(|(id, label)| (label.clone(), id))
            .collect();

        Ok(Self { classes, index })
    }

    /// Encode labels to class ids
    pub fn transform(&self, labels: &[String]) -> Result<Vec<usize>> {
        labels
            .iter()
            .map(|label| {
                self.index.get(label).copied().ok_or_else(|| {
                    LearnerError::InvalidParameter(format!("Unknown label: {label:?}"))
                })
            })
            .collect()
    }

    /// Fit on a label column and encode it in one step
    pub fn fit_transform(labels: &[String]) -> Result<(Self, Vec<usize>)> {
        let encoder = Self::fit(labels)?;
        let encoded = encoder.transform(labels)?;
        Ok((encoder, encoded))
    }

    /// Label for a class id
    pub fn inverse_transform(&self, class: usize) -> Option<&str> {
        self.classes.get(class).map(String::as_str)
    }

    /// Distinct labels ordered by class id
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Number of distinct labels
    pub fn n_classes(&self) -> usize {
        self.classes.len()
    }

    /// Build the class map with entries in first-appearance order of `labels`
    pub fn class_map(&self, labels: &[String]) -> ClassMap {
        let mut entries = IndexMap::with_capacity(self.classes.len());
        for label in labels {
            if let Some(&id) = self.index.get(label) {
                entries.entry(id).or_insert_with(|| label.clone());
            }
        }
        ClassMap { entries }
    }
}

/// Encode a label column, returning class ids and the class map
pub fn encode(labels: &[String]) -> Result<(LabelEncoder, Vec<usize>, ClassMap)> {
    let (encoder, encoded) = LabelEncoder::fit_transform(labels)?;
    let class_map = encoder.class_map(labels);
    Ok((encoder, encoded, class_map))
}

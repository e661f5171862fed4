//! CSV feature table loader
//!
//! Supports loading feature tables from CSV files where:
//! - The first non-empty line is a header and is always consumed
//! - The last column is the label (quoted or bare text)
//! - All other columns are numeric features, read as `f32`

use crate::core::{LearnerError, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// In-memory feature table: `N` rows of `F` features plus one label column
#[derive(Debug, Clone)]
pub struct FeatureTable {
    header: Vec<String>,
    features: Vec<Vec<f32>>,
    labels: Vec<String>,
}

impl FeatureTable {
    /// Load a feature table from a CSV file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path).map_err(LearnerError::IoError)?;
        let reader = BufReader::new(file);
        Self::from_reader(reader)
    }

    /// Load a feature table from a reader
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut header: Option<Vec<String>> = None;
        let mut features = Vec::new();
        let mut labels = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.map_err(LearnerError::IoError)?;
            let line_num = line_num + 1;

            if line.trim().is_empty() {
                continue;
            }

            let fields = split_fields(&line).map_err(|e| {
                LearnerError::ParseError(format!("Error parsing line {line_num}: {e}"))
            })?;

            let expected = match &header {
                None => {
                    if fields.len() < 2 {
                        return Err(LearnerError::InvalidDataset(format!(
                            "Header must name at least one feature and a label, got {} column(s)",
                            fields.len()
                        )));
                    }
                    header = Some(fields);
                    continue;
                }
                Some(names) => names.len(),
            };

            if fields.len() != expected {
                return Err(LearnerError::ParseError(format!(
                    "Error parsing line {line_num}: expected {expected} fields, got {}",
                    fields.len()
                )));
            }

            let (label, feature_fields) = fields
                .split_last()
                .ok_or_else(|| LearnerError::ParseError(format!("Empty line {line_num}")))?;

            let row = feature_fields
                .iter()
                .enumerate()
                .map(|(col, field)| {
                    field.trim().parse::<f32>().map_err(|_| {
                        LearnerError::ParseError(format!(
                            "Invalid feature value at line {line_num}, column {}: {:?}",
                            col + 1,
                            field
                        ))
                    })
                })
                .collect::<Result<Vec<f32>>>()?;

            features.push(row);
            labels.push(label.clone());
        }

        let header = header.ok_or(LearnerError::EmptyDataset)?;
        if features.is_empty() {
            return Err(LearnerError::EmptyDataset);
        }

        Ok(FeatureTable {
            header,
            features,
            labels,
        })
    }

    /// Build a table from already parsed parts
    pub fn from_parts(
        header: Vec<String>,
        features: Vec<Vec<f32>>,
        labels: Vec<String>,
    ) -> Result<Self> {
        if header.len() < 2 {
            return Err(LearnerError::InvalidDataset(
                "Header must name at least one feature and a label".to_string(),
            ));
        }
        if features.is_empty() {
            return Err(LearnerError::EmptyDataset);
        }
        if features.len() != labels.len() {
            return Err(LearnerError::DimensionMismatch {
                expected: features.len(),
                actual: labels.len(),
            });
        }
        let n_features = header.len() - 1;
        if let Some(row) = features.iter().find(|row| row.len() != n_features) {
            return Err(LearnerError::DimensionMismatch {
                expected: n_features,
                actual: row.len(),
            });
        }
        Ok(FeatureTable {
            header,
            features,
            labels,
        })
    }

    /// Number of data rows
    pub fn n_rows(&self) -> usize {
        self.features.len()
    }

    /// Number of feature columns (label column excluded)
    pub fn n_features(&self) -> usize {
        self.header.len() - 1
    }

    /// `(rows, columns)` including the label column
    pub fn shape(&self) -> (usize, usize) {
        (self.n_rows(), self.header.len())
    }

    /// Column names as read from the header
    pub fn header(&self) -> &[String] {
        &self.header
    }

    /// Feature rows
    pub fn features(&self) -> &[Vec<f32>] {
        &self.features
    }

    /// Label column
    pub fn labels(&self) -> &[String] {
        &self.labels
    }
}

/// Split one CSV line into fields, honoring double quotes
///
/// A quoted field may contain commas and `""` escapes. Quoted fields
/// spanning several lines are not supported.
fn split_fields(line: &str) -> std::result::Result<Vec<String>, String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        if in_quotes {
            if ch == '"' {
                if chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                current.push(ch);
            }
        } else {
            match ch {
                ',' => fields.push(std::mem::take(&mut current)),
                '"' if current.trim().is_empty() => {
                    current.clear();
                    in_quotes = true;
                }
                _ => current.push(ch),
            }
        }
    }

    if in_quotes {
        return Err("unterminated quoted field".to_string());
    }
    fields.push(current);
    Ok(fields)
}

//! Hyperparameter grid search with stratified k-fold cross-validation
//!
//! Every `(C, max_iter)` pair of a [`SearchGrid`] is scored by the mean
//! fold accuracy. The highest mean wins; ties keep the candidate enumerated
//! first (C outer, max_iter inner).

use crate::core::{Classifier, Dataset, LearnerError, Result, SolverConfig};
use crate::data::EncodedDataset;
use crate::metrics::accuracy;
use crate::optimizer::OneVsRestOptimizer;
use log::{debug, info, warn};
use std::fmt;

/// Candidate regularization strengths and pass caps
#[derive(Debug, Clone, PartialEq)]
pub struct SearchGrid {
    pub c_values: Vec<f64>,
    pub max_iter_values: Vec<usize>,
}

impl Default for SearchGrid {
    /// `C` in 1, 1.5, ..., 6.5 and `max_iter` in 1500, 2000
    fn default() -> Self {
        Self {
            c_values: (0..12).map(|i| 1.0 + 0.5 * f64::from(i)).collect(),
            max_iter_values: vec![1500, 2000],
        }
    }
}

impl SearchGrid {
    /// Create a grid, rejecting empty axes and non-positive values
    pub fn new(c_values: Vec<f64>, max_iter_values: Vec<usize>) -> Result<Self> {
        if c_values.is_empty() || max_iter_values.is_empty() {
            return Err(LearnerError::InvalidParameter(
                "Search grid axes must not be empty".to_string(),
            ));
        }
        if let Some(c) = c_values.iter().find(|&&c| !(c > 0.0 && c.is_finite())) {
            return Err(LearnerError::InvalidParameter(format!(
                "C must be positive and finite, got: {c}"
            )));
        }
        if max_iter_values.contains(&0) {
            return Err(LearnerError::InvalidParameter(
                "max_iter must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            c_values,
            max_iter_values,
        })
    }

    /// Cartesian product, `C` varying slowest
    pub fn candidates(&self) -> Vec<Candidate> {
        self.c_values
            .iter()
            .flat_map(|&c| {
                self.max_iter_values
                    .iter()
                    .map(move |&max_iter| Candidate { c, max_iter })
            })
            .collect()
    }

    /// Number of candidates
    pub fn len(&self) -> usize {
        self.c_values.len() * self.max_iter_values.len()
    }

    /// Whether the grid has no candidate
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One point of the search space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub c: f64,
    pub max_iter: usize,
}

impl Candidate {
    /// Solver configuration for this candidate on top of `base`
    pub fn apply(&self, base: &SolverConfig) -> SolverConfig {
        SolverConfig {
            c: self.c,
            max_iterations: self.max_iter,
            ..base.clone()
        }
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LinearSVC(C={}, max_iter={})", self.c, self.max_iter)
    }
}

/// Train/test row indices of one fold
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fold {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Stratified k-fold splitter without shuffling
///
/// Samples are ordered by class (classes in order of first appearance) and
/// dealt to folds round-robin; each class's share is then handed to its
/// samples in their original order.
#[derive(Debug, Clone, Copy)]
pub struct StratifiedKFold {
    n_splits: usize,
}

impl StratifiedKFold {
    /// Create a splitter with `n_splits >= 2`
    pub fn new(n_splits: usize) -> Result<Self> {
        if n_splits < 2 {
            return Err(LearnerError::InvalidParameter(format!(
                "Cross-validation needs at least 2 folds, got {n_splits}"
            )));
        }
        Ok(Self { n_splits })
    }

    /// Number of folds
    pub fn n_splits(&self) -> usize {
        self.n_splits
    }

    /// Split rows labeled by `classes` into folds
    pub fn split(&self, classes: &[usize]) -> Result<Vec<Fold>> {
        let n = classes.len();
        let k = self.n_splits;
        if k > n {
            return Err(LearnerError::InvalidParameter(format!(
                "Cannot have {k} folds with only {n} samples"
            )));
        }

        // Re-index classes by first appearance
        let mut order: Vec<usize> = Vec::new();
        let encoded: Vec<usize> = classes
            .iter()
            .map(|class| match order.iter().position(|c| c == class) {
                Some(pos) => pos,
                None => {
                    order.push(*class);
                    order.len() - 1
                }
            })
            .collect();
        let n_classes = order.len();

        let mut counts = vec![0usize; n_classes];
        for &e in &encoded {
            counts[e] += 1;
        }
        if counts.iter().all(|&c| k > c) {
            return Err(LearnerError::InvalidDataset(format!(
                "{k} folds cannot be greater than the number of members in each class"
            )));
        }
        let smallest = counts.iter().copied().min().unwrap_or(0);
        if k > smallest {
            warn!("The least populated class has only {smallest} members, fewer than {k} folds");
        }

        let mut sorted = encoded.clone();
        sorted.sort_unstable();
        let mut allocation = vec![vec![0usize; n_classes]; k];
        for (pos, &e) in sorted.iter().enumerate() {
            allocation[pos % k][e] += 1;
        }

        let mut test_fold = vec![0usize; n];
        for class in 0..n_classes {
            let mut folds_for_class =
                (0..k).flat_map(|fold| std::iter::repeat(fold).take(allocation[fold][class]));
            for (row, _) in encoded.iter().enumerate().filter(|&(_, &e)| e == class) {
                if let Some(fold) = folds_for_class.next() {
                    test_fold[row] = fold;
                }
            }
        }

        Ok((0..k)
            .map(|fold| {
                let (test, train): (Vec<usize>, Vec<usize>) =
                    (0..n).partition(|&row| test_fold[row] == fold);
                Fold { train, test }
            })
            .collect())
    }
}

/// Cross-validation outcome of one candidate
#[derive(Debug, Clone)]
pub struct CandidateScore {
    pub candidate: Candidate,
    pub fold_scores: Vec<f64>,
    pub mean_score: f64,
}

/// Outcome of a full grid search
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub scores: Vec<CandidateScore>,
    pub best_index: usize,
}

impl SearchResult {
    /// Best-scoring candidate
    pub fn best(&self) -> &CandidateScore {
        &self.scores[self.best_index]
    }
}

/// Exhaustive grid search driver
pub struct GridSearch {
    grid: SearchGrid,
    base: SolverConfig,
    n_folds: usize,
}

impl GridSearch {
    /// Search `grid` with 5 folds, inheriting every other solver setting from `base`
    pub fn new(grid: SearchGrid, base: SolverConfig) -> Self {
        Self {
            grid,
            base,
            n_folds: 5,
        }
    }

    /// Set the number of cross-validation folds
    pub fn with_folds(mut self, n_folds: usize) -> Self {
        self.n_folds = n_folds;
        self
    }

    /// Score every candidate on `dataset`
    pub fn fit(&self, dataset: &EncodedDataset) -> Result<SearchResult> {
        if self.grid.is_empty() {
            return Err(LearnerError::InvalidParameter(
                "Search grid has no candidate".to_string(),
            ));
        }

        let folds = StratifiedKFold::new(self.n_folds)?.split(&dataset.get_classes())?;
        let fold_data: Vec<(EncodedDataset, EncodedDataset)> = folds
            .iter()
            .map(|fold| (dataset.subset(&fold.train), dataset.subset(&fold.test)))
            .collect();

        info!(
            "Grid search over {} candidates x {} folds",
            self.grid.len(),
            fold_data.len()
        );

        let mut scores = Vec::with_capacity(self.grid.len());
        for candidate in self.grid.candidates() {
            let optimizer = OneVsRestOptimizer::new(candidate.apply(&self.base));
            let mut fold_scores = Vec::with_capacity(fold_data.len());

            for (train, test) in &fold_data {
                let model = optimizer.train(train)?;
                let predicted: Vec<usize> = model
                    .predict_batch(test.samples())
                    .iter()
                    .map(|p| p.class)
                    .collect();
                fold_scores.push(accuracy(&predicted, &test.get_classes()));
            }

            let mean_score = fold_scores.iter().sum::<f64>() / fold_scores.len() as f64;
            debug!("{candidate}: fold accuracies {fold_scores:?}");
            info!("{candidate}: mean accuracy {:.4}", mean_score);
            scores.push(CandidateScore {
                candidate,
                fold_scores,
                mean_score,
            });
        }

        let mut best_index = 0;
        for (i, score) in scores.iter().enumerate().skip(1) {
            if score.mean_score > scores[best_index].mean_score {
                best_index = i;
            }
        }

        Ok(SearchResult { scores, best_index })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Sample;

    #[test]
    fn test_default_grid() {
        let grid = SearchGrid::default();
        assert_eq!(grid.c_values.len(), 12);
        assert_eq!(grid.c_values[0], 1.0);
        assert_eq!(grid.c_values[11], 6.5);
        assert_eq!(grid.max_iter_values, vec![1500, 2000]);
        assert_eq!(grid.len(), 24);
    }

    #[test]
    fn test_candidate_order() {
        let grid = SearchGrid::new(vec![1.0, 2.0], vec![10, 20]).unwrap();
        let candidates = grid.candidates();
        assert_eq!(
            candidates,
            vec![
                Candidate { c: 1.0, max_iter: 10 },
                Candidate { c: 1.0, max_iter: 20 },
                Candidate { c: 2.0, max_iter: 10 },
                Candidate { c: 2.0, max_iter: 20 },
            ]
        );
        assert_eq!(candidates[1].to_string(), "LinearSVC(C=1, max_iter=20)");
    }

    #[test]
    fn test_invalid_grid() {
        assert!(SearchGrid::new(vec![], vec![10]).is_err());
        assert!(SearchGrid::new(vec![1.0], vec![]).is_err());
        assert!(SearchGrid::new(vec![-1.0], vec![10]).is_err());
        assert!(SearchGrid::new(vec![1.0], vec![0]).is_err());
    }

    #[test]
    fn test_stratified_folds_balanced() {
        // 10 of class 0 then 5 of class 1
        let classes: Vec<usize> = std::iter::repeat(0)
            .take(10)
            .chain(std::iter::repeat(1).take(5))
            .collect();
        let folds = StratifiedKFold::new(5).unwrap().split(&classes).unwrap();

        assert_eq!(folds.len(), 5);
        for fold in &folds {
            assert_eq!(fold.test.len(), 3);
            assert_eq!(fold.train.len(), 12);
            let ones = fold.test.iter().filter(|&&i| classes[i] == 1).count();
            assert_eq!(ones, 1);
        }
        // Without shuffling the first fold takes the earliest rows of each class
        assert_eq!(folds[0].test, vec![0, 1, 10]);
    }

    #[test]
    fn test_stratified_folds_partition_rows() {
        let classes = vec![2, 0, 1, 0, 2, 1, 1, 0, 2, 2, 0];
        let folds = StratifiedKFold::new(3).unwrap().split(&classes).unwrap();

        let mut seen: Vec<usize> = folds.iter().flat_map(|f| f.test.clone()).collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..classes.len()).collect::<Vec<_>>());
        for fold in &folds {
            assert_eq!(fold.train.len() + fold.test.len(), classes.len());
        }
    }

    #[test]
    fn test_stratified_folds_errors() {
        assert!(StratifiedKFold::new(1).is_err());
        let splitter = StratifiedKFold::new(5).unwrap();
        assert!(matches!(
            splitter.split(&[0, 1, 0]),
            Err(LearnerError::InvalidParameter(_))
        ));
        assert!(matches!(
            splitter.split(&[0, 0, 0, 0, 1, 1, 1, 1]),
            Err(LearnerError::InvalidDataset(_))
        ));
    }

    fn blobs() -> EncodedDataset {
        let samples = (0..20)
            .map(|i| {
                let class = i % 2;
                let sign = if class == 1 { 1.0 } else { -1.0 };
                let jitter = (i as f64) * 0.01;
                Sample::new(vec![sign * (1.0 + jitter), sign * 0.5 - jitter], class)
            })
            .collect();
        EncodedDataset::new(samples, 2).unwrap()
    }

    #[test]
    fn test_grid_search_scores_every_candidate() {
        let grid = SearchGrid::new(vec![1.0, 2.0, 3.0], vec![100, 200]).unwrap();
        let result = GridSearch::new(grid, SolverConfig::default())
            .fit(&blobs())
            .expect("Search should succeed");

        assert_eq!(result.scores.len(), 6);
        for score in &result.scores {
            assert_eq!(score.fold_scores.len(), 5);
            assert!((0.0..=1.0).contains(&score.mean_score));
        }
        // Separable data: every candidate is perfect, so the first one wins
        assert_eq!(result.best().mean_score, 1.0);
        assert_eq!(result.best_index, 0);
    }

    #[test]
    fn test_grid_search_custom_folds() {
        let grid = SearchGrid::new(vec![1.0], vec![100]).unwrap();
        let result = GridSearch::new(grid, SolverConfig::default())
            .with_folds(4)
            .fit(&blobs())
            .unwrap();
        assert_eq!(result.best().fold_scores.len(), 4);
    }
}

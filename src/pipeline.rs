//! End-to-end training pipeline
//!
//! Load, encode, normalize, split, search, refit, evaluate, export.

use crate::api::{LinearSVC, TrainedModel};
use crate::core::{Result, SolverConfig};
use crate::data::{encode, ClassMap, EncodedDataset, FeatureTable};
use crate::metrics::ConfusionMatrix;
use crate::persistence::ExportedModel;
use crate::search::{Candidate, GridSearch, SearchGrid, SearchResult};
use crate::utils::scaling;
use crate::utils::split::train_test_split;
use log::{info, warn};
use std::path::Path;

/// Fixed constants of a training run
#[derive(Debug, Clone)]
pub struct TrainingConfig {
    /// Fraction of rows held out for the final evaluation
    pub test_fraction: f64,
    /// Seed of the train/test shuffle
    pub split_seed: u64,
    /// Cross-validation folds per candidate
    pub n_folds: usize,
    /// Base solver settings; `c` and `max_iterations` come from the grid
    pub solver: SolverConfig,
    pub grid: SearchGrid,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            test_fraction: 0.25,
            split_seed: 0,
            n_folds: 5,
            solver: SolverConfig::default(),
            grid: SearchGrid::default(),
        }
    }
}

/// Everything a training run produced
#[derive(Debug, Clone)]
pub struct TrainingReport {
    pub shape: (usize, usize),
    pub class_map: ClassMap,
    pub n_train: usize,
    pub n_test: usize,
    pub zero_variance_columns: Vec<usize>,
    pub search: SearchResult,
    pub model: TrainedModel,
    /// Accuracy on the held-out rows, in `[0, 1]`
    pub accuracy: f64,
    pub confusion: ConfusionMatrix,
    pub export: ExportedModel,
}

impl TrainingReport {
    /// Hyperparameters selected by the search
    pub fn best_candidate(&self) -> &Candidate {
        &self.search.best().candidate
    }

    /// Labels ordered by class id
    pub fn labels(&self) -> Vec<&str> {
        self.class_map.labels_sorted()
    }
}

/// Train on a loaded table without touching the filesystem
pub fn train_from_table(table: &FeatureTable, config: &TrainingConfig) -> Result<TrainingReport> {
    let shape = table.shape();
    info!("Data set shape: {shape:?}");

    let (encoder, classes, class_map) = encode(table.labels())?;
    info!("Classes: {:?}", encoder.classes());

    let (normalized, stats) = scaling::fit_transform(table.features())?;
    let zero_variance_columns = stats.zero_variance_columns();
    if !zero_variance_columns.is_empty() {
        let names: Vec<&str> = zero_variance_columns
            .iter()
            .filter_map(|&i| table.header().get(i).map(String::as_str))
            .collect();
        warn!(
            "Constant feature columns {names:?}: normalized values are not finite, \
             the exported weights will be null"
        );
    }
    let dataset = EncodedDataset::from_rows(&normalized, &classes, encoder.n_classes())?;

    let split = train_test_split(dataset.samples().len(), config.test_fraction, config.split_seed)?;
    let train_set = dataset.subset(&split.train);
    let test_set = dataset.subset(&split.test);
    info!(
        "Train: {} rows, test: {} rows, classes in train: {:?}",
        split.train.len(),
        split.test.len(),
        train_set.class_counts()
    );

    let search = GridSearch::new(config.grid.clone(), config.solver.clone())
        .with_folds(config.n_folds)
        .fit(&train_set)?;
    let best = search.best();
    info!("Best {} with mean accuracy {:.4}", best.candidate, best.mean_score);

    let model = LinearSVC::with_config(best.candidate.apply(&config.solver)).fit(&train_set)?;
    let accuracy = model.score(&test_set);
    let confusion = model.confusion_matrix(&test_set)?;
    let export = ExportedModel::new(model.inner(), &stats, &class_map)?;

    Ok(TrainingReport {
        shape,
        class_map,
        n_train: split.train.len(),
        n_test: split.test.len(),
        zero_variance_columns,
        search,
        model,
        accuracy,
        confusion,
        export,
    })
}

/// Train on the CSV at `input` and write the exported model to `output`
pub fn run_training<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output: Q,
    config: &TrainingConfig,
) -> Result<TrainingReport> {
    let table = FeatureTable::from_file(input)?;
    let report = train_from_table(&table, config)?;
    report.export.save_to_file(&output)?;
    info!("Model written to {}", output.as_ref().display());
    Ok(report)
}

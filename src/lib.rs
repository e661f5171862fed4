//! Linear support vector classification for audio feature tables
//!
//! Trains a one-vs-rest, squared-hinge linear SVM with a cross-validated
//! grid search over `C` and `max_iter`, then exports the decision functions
//! together with the feature normalisation as JSON.

pub mod api;
pub mod core;
pub mod data;
pub mod kernel;
pub mod metrics;
pub mod optimizer;
pub mod persistence;
pub mod pipeline;
pub mod search;
pub mod solver;
pub mod utils;

// Re-export main types for convenience
pub use crate::api::{LinearSVC, ModelInfo, TrainedModel};
pub use crate::core::traits::*;
pub use crate::core::types::*;
pub use crate::core::{LearnerError, Result};
pub use crate::data::{ClassMap, EncodedDataset, FeatureTable, LabelEncoder};
pub use crate::metrics::ConfusionMatrix;
pub use crate::optimizer::{LinearModel, OneVsRestOptimizer};
pub use crate::persistence::ExportedModel;
pub use crate::pipeline::{run_training, TrainingConfig, TrainingReport};
pub use crate::search::{GridSearch, SearchGrid};
pub use crate::utils::scaling::NormalizationStats;

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//! Data loading and encoding
//!
//! This module reads CSV feature tables, encodes the label column and
//! holds the numeric samples consumed by the solver.

pub mod csv;
pub mod dataset;
pub mod encoding;

pub use self::csv::*;
pub use self::dataset::*;
pub use self::encoding::*;

//! Linear SVM solver implementations
//!
//! This module implements dual coordinate descent for the L2-regularized,
//! squared-hinge-loss linear SVM, with active-set shrinking.

pub mod dcd;
pub mod shrinking;

pub use self::dcd::*;
pub use self::shrinking::*;

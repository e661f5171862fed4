//! Vector primitives for the linear kernel

pub mod linear;

pub use self::linear::*;

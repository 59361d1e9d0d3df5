//! Public API surface: the session facade tying datasets, metadata and
//! parameters to feature and plot generation.

pub mod calculator;

pub use calculator::Calculator;

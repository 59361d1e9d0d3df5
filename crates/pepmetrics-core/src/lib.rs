//! # PepMetrics Core Library
//!
//! A library for computing physicochemical features of peptide sequences
//! and rendering parameterized analysis figures over peptidomics datasets.
//!
//! ## Architectural Philosophy
//!
//! The library is designed with a strict three-layer architecture to ensure a
//! clear separation of concerns, making it modular, testable, and extensible.
//!
//! - **[`core`]: The Foundation.** Contains the constant tables (residue
//!   masses, pKa values, hydropathy and instability scales), sequence
//!   utilities, the tabular data model (`DataTable`) and the stateless
//!   feature functions themselves.
//!
//! - **[`engine`]: The Logic Core.** Holds the feature and plot registries
//!   together with their dispatch engines, the rank statistics behind the
//!   group comparisons and the figure rendering built on plotters.
//!
//! - **[`workflows`]: The Public API.** The highest-level, user-facing layer.
//!   The [`workflows::Calculator`] session facade ties datasets, metadata and
//!   parameter sets to feature computation and plot generation.

pub mod core;
pub mod engine;
pub mod workflows;

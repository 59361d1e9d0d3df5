//! Logic core: the feature and plot registries, their dispatch engines,
//! the statistics helpers and figure rendering.

pub mod error;
pub mod features;
pub mod figures;
pub mod plots;
pub mod stats;

use crate::core::descriptors::DescriptorError;
use crate::core::features::FeatureError;
use crate::core::sequence::SequenceError;
use crate::core::table::TableError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Feature(#[from] FeatureError),

    #[error(transparent)]
    Table(#[from] TableError),

    #[error(
        "The following information is not available: {}. Please execute the corresponding set methods first.",
        attributes.join(", ")
    )]
    MissingPrerequisites { attributes: Vec<&'static str> },

    #[error(
        "Feature '{feature}' could not be found in the dataset. Please make sure to compute it first."
    )]
    MissingFeature { feature: String },

    #[error(
        "Not enough values: {group_a}={count_a}, {group_b}={count_b} (at least 2 per group required)"
    )]
    InsufficientSamples {
        group_a: String,
        count_a: usize,
        group_b: String,
        count_b: usize,
    },

    #[error("Not enough distinct values for '{group_by}' in metadata, but 2 are required")]
    NotEnoughGroups { group_by: String },

    #[error("Figure rendering failed: {0}")]
    Render(String),
}

impl From<SequenceError> for EngineError {
    fn from(err: SequenceError) -> Self {
        Self::Feature(err.into())
    }
}

impl From<DescriptorError> for EngineError {
    fn from(err: DescriptorError) -> Self {
        Self::Feature(err.into())
    }
}

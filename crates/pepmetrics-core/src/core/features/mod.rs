//! Pure feature functions over validated peptide sequences.

pub mod physicochemical;
pub mod sequence;

use super::descriptors::DescriptorError;
use super::sequence::SequenceError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeatureError {
    #[error(transparent)]
    Sequence(#[from] SequenceError),

    #[error(transparent)]
    Descriptor(#[from] DescriptorError),

    #[error("Unknown option for {parameter}: '{value}'")]
    UnknownOption {
        parameter: &'static str,
        value: String,
    },
}

pub(crate) fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10_f64.powi(places as i32);
    (value * factor).round() / factor
}

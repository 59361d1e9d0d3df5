//! Physicochemical features backed by the descriptor provider.

use super::sequence::molecular_weight_raw;
use super::{FeatureError, round_to};
use crate::core::constants::{EXTINCTION_CYSTINE, EXTINCTION_TRP, EXTINCTION_TYR};
use crate::core::descriptors::{self, PiEstimator};
use crate::core::sequence::validate_non_empty;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Strategy for isoelectric point estimation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PiMethod {
    /// Closed-form Henderson-Hasselbalch titration (default).
    #[default]
    Titration,
    /// Pretrained regression model loaded from a weights file.
    Model,
}

impl PiMethod {
    pub fn label(self) -> &'static str {
        match self {
            Self::Titration => "titration",
            Self::Model => "model",
        }
    }
}

impl FromStr for PiMethod {
    type Err = FeatureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "titration" => Ok(Self::Titration),
            "model" => Ok(Self::Model),
            other => Err(FeatureError::UnknownOption {
                parameter: "isoelectric point method",
                value: other.to_string(),
            }),
        }
    }
}

/// Net charge at the given pH, rounded to 3 decimal places.
pub fn charge_at_ph(seq: &str, ph: f64) -> Result<f64, FeatureError> {
    validate_non_empty(seq, "charge at pH")?;
    Ok(round_to(descriptors::net_charge(seq, ph), 3))
}

/// Charge density: net charge divided by molecular weight, rounded to 6
/// decimal places (the quotient lives around 1e-3).
pub fn charge_density(seq: &str, ph: f64) -> Result<f64, FeatureError> {
    validate_non_empty(seq, "charge density")?;
    let charge = descriptors::net_charge(seq, ph);
    let weight = molecular_weight_raw(seq)?;
    Ok(round_to(charge / weight, 6))
}

/// Theoretical isoelectric point via the given estimation strategy,
/// rounded to 3 decimal places.
pub fn isoelectric_point(
    seq: &str,
    estimator: &dyn PiEstimator,
) -> Result<f64, FeatureError> {
    validate_non_empty(seq, "isoelectric point")?;
    Ok(round_to(estimator.isoelectric_point(seq)?, 3))
}

/// Boman index (Boman, 2003), rounded to 3 decimal places.
pub fn boman_index(seq: &str) -> Result<f64, FeatureError> {
    validate_non_empty(seq, "Boman index")?;
    Ok(round_to(descriptors::boman_index(seq), 3))
}

/// Aliphatic index (Ikai, 1980): relative volume of aliphatic side
/// chains, rounded to 3 decimal places.
pub fn aliphatic_index(seq: &str) -> Result<f64, FeatureError> {
    validate_non_empty(seq, "aliphatic index")?;
    let n = seq.chars().count() as f64;
    let mut a = 0.0;
    let mut v = 0.0;
    let mut il = 0.0;
    for aa in seq.chars() {
        match aa {
            'A' => a += 1.0,
            'V' => v += 1.0,
            'I' | 'L' => il += 1.0,
            _ => {}
        }
    }
    Ok(round_to((a + 2.9 * v + 3.9 * il) * 100.0 / n, 3))
}

/// Molar extinction coefficient at 280 nm (Gill and von Hippel, 1989;
/// Pace et al., 1995). With `oxidized` every Cys pair counts as a
/// cystine bridge.
pub fn extinction_coefficient(seq: &str, oxidized: bool) -> Result<u32, FeatureError> {
    validate_non_empty(seq, "extinction coefficient")?;
    let trp = seq.chars().filter(|&aa| aa == 'W').count() as u32;
    let tyr = seq.chars().filter(|&aa| aa == 'Y').count() as u32;
    let mut extinction = trp * EXTINCTION_TRP + tyr * EXTINCTION_TYR;
    if oxidized {
        let cys = seq.chars().filter(|&aa| aa == 'C').count() as u32;
        extinction += (cys / 2) * EXTINCTION_CYSTINE;
    }
    Ok(extinction)
}

/// Instability index (Guruprasad et al., 1990), rounded to 3 decimal
/// places.
pub fn instability_index(seq: &str) -> Result<f64, FeatureError> {
    validate_non_empty(seq, "instability index")?;
    Ok(round_to(descriptors::instability_index(seq), 3))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::descriptors::{RegressionPiEstimator, TitrationPiEstimator};

    #[test]
    fn charge_is_monotonically_decreasing_in_ph() {
        let low = charge_at_ph("SVIDQSRVLNLGPITR", 2.0).unwrap();
        let mid = charge_at_ph("SVIDQSRVLNLGPITR", 7.0).unwrap();
        let high = charge_at_ph("SVIDQSRVLNLGPITR", 12.0).unwrap();
        assert!(low > mid && mid > high);
    }

    #[test]
    fn charge_density_is_charge_over_weight() {
        let seq = "PEPTIDE";
        let density = charge_density(seq, 7.0).unwrap();
        let expected = descriptors::net_charge(seq, 7.0) / molecular_weight_raw(seq).unwrap();
        assert!((density - round_to(expected, 6)).abs() < 1e-12);
    }

    #[test]
    fn isoelectric_point_uses_the_given_strategy() {
        let pi = isoelectric_point("DDDDD", &TitrationPiEstimator).unwrap();
        assert!(pi < 4.0);
    }

    #[test]
    fn model_strategy_surfaces_missing_model_as_error() {
        let estimator = RegressionPiEstimator::new("/nonexistent/pi.json");
        assert!(isoelectric_point("PEPTIDE", &estimator).is_err());
    }

    #[test]
    fn aliphatic_index_weights_side_chain_volumes() {
        // One of each: (1 + 2.9 + 3.9 * 2) * 100 / 4
        assert_eq!(aliphatic_index("AVIL").unwrap(), round_to(1170.0 / 4.0, 3));
        assert_eq!(aliphatic_index("GGGG").unwrap(), 0.0);
    }

    #[test]
    fn extinction_coefficient_counts_trp_tyr_and_cystines() {
        assert_eq!(extinction_coefficient("W", false).unwrap(), 5500);
        assert_eq!(extinction_coefficient("WYY", false).unwrap(), 8480);
        assert_eq!(extinction_coefficient("CCCC", false).unwrap(), 0);
        assert_eq!(extinction_coefficient("CCCC", true).unwrap(), 250);
        assert_eq!(extinction_coefficient("CCC", true).unwrap(), 125);
    }

    #[test]
    fn empty_sequence_is_rejected_across_the_board() {
        assert!(charge_at_ph("", 7.0).is_err());
        assert!(boman_index("").is_err());
        assert!(aliphatic_index("").is_err());
        assert!(instability_index("").is_err());
    }

    #[test]
    fn unknown_pi_method_is_a_usage_error() {
        let err = "bjellqvist".parse::<PiMethod>().unwrap_err();
        assert!(err.to_string().contains("bjellqvist"));
    }
}

//! Molecular-descriptor provider: titration chemistry and the empirical
//! indices that the feature layer delegates to.

use super::constants::{
    AA_ORDER, BOMAN_SCALE, DIPEPTIDE_INSTABILITY, PKA_ARG, PKA_ASP, PKA_CTERM, PKA_CYS, PKA_GLU,
    PKA_HIS, PKA_LYS, PKA_NTERM, PKA_TYR, aa_index,
};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DescriptorError {
    #[error("Isoelectric point model could not be found at '{path}'", path = path.display())]
    ModelUnavailable { path: PathBuf },

    #[error("Failed to read isoelectric point model '{path}': {source}", path = path.display())]
    ModelRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed isoelectric point model '{path}': {reason}", path = path.display())]
    ModelFormat { path: PathBuf, reason: String },
}

/// Net charge of a peptide at a given pH via Henderson-Hasselbalch,
/// using the EMBOSS pKa set. Assumes a validated sequence.
pub fn net_charge(seq: &str, ph: f64) -> f64 {
    let mut charge = 0.0;

    // Termini
    charge += 1.0 / (1.0 + 10_f64.powf(ph - PKA_NTERM));
    charge -= 1.0 / (1.0 + 10_f64.powf(PKA_CTERM - ph));

    for aa in seq.chars() {
        match aa {
            'D' => charge -= 1.0 / (1.0 + 10_f64.powf(PKA_ASP - ph)),
            'E' => charge -= 1.0 / (1.0 + 10_f64.powf(PKA_GLU - ph)),
            'C' => charge -= 1.0 / (1.0 + 10_f64.powf(PKA_CYS - ph)),
            'Y' => charge -= 1.0 / (1.0 + 10_f64.powf(PKA_TYR - ph)),
            'H' => charge += 1.0 / (1.0 + 10_f64.powf(ph - PKA_HIS)),
            'K' => charge += 1.0 / (1.0 + 10_f64.powf(ph - PKA_LYS)),
            'R' => charge += 1.0 / (1.0 + 10_f64.powf(ph - PKA_ARG)),
            _ => {}
        }
    }
    charge
}

/// Boman index: mean free energy of transfer over the sequence
/// (Boman, 2003). Negative values indicate membrane preference.
pub fn boman_index(seq: &str) -> f64 {
    let sum: f64 = seq.chars().filter_map(|aa| BOMAN_SCALE.get(&aa)).sum();
    sum / seq.chars().count() as f64
}

/// Instability index (Guruprasad et al., 1990): 10/L times the sum of
/// dipeptide instability weights along the sequence.
pub fn instability_index(seq: &str) -> f64 {
    let residues: Vec<usize> = seq.chars().filter_map(aa_index).collect();
    let sum: f64 = residues
        .windows(2)
        .map(|w| DIPEPTIDE_INSTABILITY[w[0]][w[1]])
        .sum();
    10.0 / residues.len() as f64 * sum
}

/// Strategy interface for isoelectric point estimation.
pub trait PiEstimator {
    fn isoelectric_point(&self, seq: &str) -> Result<f64, DescriptorError>;
}

/// Closed-form pI: bisection on the Henderson-Hasselbalch charge equation.
/// Converges to |charge| < 0.001 within ~47 iterations.
#[derive(Debug, Clone, Copy, Default)]
pub struct TitrationPiEstimator;

impl PiEstimator for TitrationPiEstimator {
    fn isoelectric_point(&self, seq: &str) -> Result<f64, DescriptorError> {
        let mut lo = 0.0_f64;
        let mut hi = 14.0_f64;
        for _ in 0..100 {
            let mid = (lo + hi) / 2.0;
            let charge = net_charge(seq, mid);
            if charge.abs() < 0.001 {
                return Ok(mid);
            }
            if charge > 0.0 {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        Ok((lo + hi) / 2.0)
    }
}

#[derive(Debug, Deserialize)]
struct LinearModel {
    weights: Vec<f64>,
    bias: f64,
}

impl LinearModel {
    fn load(path: &Path) -> Result<Self, DescriptorError> {
        if !path.exists() {
            return Err(DescriptorError::ModelUnavailable {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path).map_err(|e| DescriptorError::ModelRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let model: Self =
            serde_json::from_str(&content).map_err(|e| DescriptorError::ModelFormat {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        if model.weights.len() != AA_ORDER.len() {
            return Err(DescriptorError::ModelFormat {
                path: path.to_path_buf(),
                reason: format!(
                    "expected {} composition weights, found {}",
                    AA_ORDER.len(),
                    model.weights.len()
                ),
            });
        }
        Ok(model)
    }

    fn predict(&self, seq: &str) -> f64 {
        let n = seq.chars().count() as f64;
        let mut fractions = [0.0_f64; 20];
        for aa in seq.chars() {
            if let Some(i) = aa_index(aa) {
                fractions[i] += 1.0 / n;
            }
        }
        self.bias
            + self
                .weights
                .iter()
                .zip(fractions)
                .map(|(w, x)| w * x)
                .sum::<f64>()
    }
}

/// Pretrained regression pI: composition-based linear model loaded lazily
/// from a JSON weights file and cached for the lifetime of the estimator.
/// A missing or malformed file is a configuration error, never a silent
/// fallback to the closed-form method.
#[derive(Debug, Default)]
pub struct RegressionPiEstimator {
    path: PathBuf,
    model: OnceLock<LinearModel>,
}

impl RegressionPiEstimator {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            model: OnceLock::new(),
        }
    }

    fn model(&self) -> Result<&LinearModel, DescriptorError> {
        if let Some(model) = self.model.get() {
            return Ok(model);
        }
        let loaded = LinearModel::load(&self.path)?;
        Ok(self.model.get_or_init(|| loaded))
    }
}

impl PiEstimator for RegressionPiEstimator {
    fn isoelectric_point(&self, seq: &str) -> Result<f64, DescriptorError> {
        Ok(self.model()?.predict(seq))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn net_charge_is_positive_at_low_ph_and_negative_at_high_ph() {
        assert!(net_charge("PEPTIDE", 1.0) > 0.0);
        assert!(net_charge("PEPTIDE", 13.0) < 0.0);
    }

    #[test]
    fn acidic_peptides_have_low_isoelectric_point() {
        let pi = TitrationPiEstimator
            .isoelectric_point("DDDDD")
            .unwrap();
        assert!(pi < 4.0);
    }

    #[test]
    fn basic_peptides_have_high_isoelectric_point() {
        let pi = TitrationPiEstimator
            .isoelectric_point("KKKKK")
            .unwrap();
        assert!(pi > 9.0);
    }

    #[test]
    fn isoelectric_point_has_near_zero_charge() {
        let pi = TitrationPiEstimator
            .isoelectric_point("SVIDQSRVLNLGPITR")
            .unwrap();
        assert!(net_charge("SVIDQSRVLNLGPITR", pi).abs() < 0.001);
    }

    #[test]
    fn boman_index_is_negative_for_hydrophobic_sequences() {
        assert!(boman_index("LLLL") < -4.0);
        assert!(boman_index("DDDD") > 8.0);
    }

    #[test]
    fn instability_index_scales_with_the_dipeptide_table() {
        // A homopolymer reduces to 10 * (L-1)/L * w(X, X).
        let expected = 10.0 * 3.0 / 4.0 * -1.88;
        assert!((instability_index("MMMM") - expected).abs() < 1e-9);
    }

    #[test]
    fn regression_estimator_fails_without_model_file() {
        let estimator = RegressionPiEstimator::new("/nonexistent/model.json");
        let err = estimator.isoelectric_point("PEPTIDE").unwrap_err();
        assert!(matches!(err, DescriptorError::ModelUnavailable { .. }));
    }

    #[test]
    fn regression_estimator_predicts_from_composition_weights() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        let mut file = std::fs::File::create(&path).unwrap();
        // Uniform weights make the prediction bias + mean weight.
        let weights = vec![7.0; 20];
        write!(
            file,
            "{}",
            serde_json::json!({ "weights": weights, "bias": 0.5 })
        )
        .unwrap();

        let estimator = RegressionPiEstimator::new(&path);
        let pi = estimator.isoelectric_point("PEPTIDE").unwrap();
        assert!((pi - 7.5).abs() < 1e-9);
    }
}

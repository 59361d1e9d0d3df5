//! Feature registry and the dispatch engine that evaluates selected
//! features over a dataset or a single sequence.

use super::error::EngineError;
use crate::core::descriptors::{PiEstimator, RegressionPiEstimator, TitrationPiEstimator};
use crate::core::features::physicochemical::{self, PiMethod};
use crate::core::features::sequence as seqfeat;
use crate::core::table::{DataTable, Value};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

/// Closed enumeration of every feature the engine can compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureId {
    MolecularWeight,
    ThreeLetterCode,
    MolecularFormula,
    SeqLength,
    Aromaticity,
    AliphaticIndex,
    ChargeAtPh,
    ChargeDensity,
    IsoelectricPoint,
    Gravy,
    ExtinctionCoefficient,
    BomanIndex,
    InstabilityIndex,
}

/// Registry entry: identifier, external key, display label (the resulting
/// column name) and whether the value participates in quantitative
/// comparisons.
#[derive(Debug, Clone, Copy)]
pub struct FeatureSpec {
    pub id: FeatureId,
    pub key: &'static str,
    pub label: &'static str,
    pub numeric: bool,
}

/// The feature registry. Labels are unique; numeric entries feed the
/// cross-feature comparison menus.
pub static FEATURES: &[FeatureSpec] = &[
    FeatureSpec {
        id: FeatureId::MolecularWeight,
        key: "molecular_weight",
        label: "Molecular weight",
        numeric: true,
    },
    FeatureSpec {
        id: FeatureId::ThreeLetterCode,
        key: "three_letter_code",
        label: "Three letter code",
        numeric: false,
    },
    FeatureSpec {
        id: FeatureId::MolecularFormula,
        key: "molecular_formula",
        label: "Molecular formula",
        numeric: false,
    },
    FeatureSpec {
        id: FeatureId::SeqLength,
        key: "seq_length",
        label: "Sequence length",
        numeric: true,
    },
    FeatureSpec {
        id: FeatureId::Aromaticity,
        key: "aromaticity",
        label: "Aromaticity",
        numeric: true,
    },
    FeatureSpec {
        id: FeatureId::AliphaticIndex,
        key: "aliphatic_index",
        label: "Aliphatic index",
        numeric: true,
    },
    FeatureSpec {
        id: FeatureId::ChargeAtPh,
        key: "charge_at_ph",
        label: "Charge",
        numeric: true,
    },
    FeatureSpec {
        id: FeatureId::ChargeDensity,
        key: "charge_density",
        label: "Charge density",
        numeric: true,
    },
    FeatureSpec {
        id: FeatureId::IsoelectricPoint,
        key: "isoelectric_point",
        label: "Isoelectric point",
        numeric: true,
    },
    FeatureSpec {
        id: FeatureId::Gravy,
        key: "gravy",
        label: "GRAVY",
        numeric: true,
    },
    FeatureSpec {
        id: FeatureId::ExtinctionCoefficient,
        key: "extinction_coefficient",
        label: "Extinction coefficient",
        numeric: true,
    },
    FeatureSpec {
        id: FeatureId::BomanIndex,
        key: "boman_index",
        label: "Boman index",
        numeric: true,
    },
    FeatureSpec {
        id: FeatureId::InstabilityIndex,
        key: "instability_index",
        label: "Instability index",
        numeric: true,
    },
];

/// Selection flags and per-feature options. Unset flags mean "not
/// selected"; `select_all` picks every feature with its defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureParams {
    pub select_all: bool,
    pub molecular_weight: bool,
    pub three_letter_code: bool,
    pub molecular_formula: bool,
    pub seq_length: bool,
    pub aromaticity: bool,
    pub aliphatic_index: bool,
    pub charge_at_ph: bool,
    pub charge_at_ph_level: f64,
    pub charge_density: bool,
    pub charge_density_level: f64,
    pub isoelectric_point: bool,
    pub isoelectric_point_method: PiMethod,
    /// Weights file for [`PiMethod::Model`]; ignored by the titration
    /// strategy.
    pub pi_model_path: Option<PathBuf>,
    pub gravy: bool,
    pub extinction_coefficient: bool,
    pub extinction_coefficient_oxidized: bool,
    pub boman_index: bool,
    pub instability_index: bool,
}

impl Default for FeatureParams {
    fn default() -> Self {
        Self {
            select_all: false,
            molecular_weight: false,
            three_letter_code: false,
            molecular_formula: false,
            seq_length: false,
            aromaticity: false,
            aliphatic_index: false,
            charge_at_ph: false,
            charge_at_ph_level: 7.0,
            charge_density: false,
            charge_density_level: 7.0,
            isoelectric_point: false,
            isoelectric_point_method: PiMethod::default(),
            pi_model_path: None,
            gravy: false,
            extinction_coefficient: false,
            extinction_coefficient_oxidized: false,
            boman_index: false,
            instability_index: false,
        }
    }
}

impl FeatureParams {
    /// All features with default options.
    pub fn all() -> Self {
        Self {
            select_all: true,
            ..Self::default()
        }
    }

    pub fn is_selected(&self, id: FeatureId) -> bool {
        if self.select_all {
            return true;
        }
        match id {
            FeatureId::MolecularWeight => self.molecular_weight,
            FeatureId::ThreeLetterCode => self.three_letter_code,
            FeatureId::MolecularFormula => self.molecular_formula,
            FeatureId::SeqLength => self.seq_length,
            FeatureId::Aromaticity => self.aromaticity,
            FeatureId::AliphaticIndex => self.aliphatic_index,
            FeatureId::ChargeAtPh => self.charge_at_ph,
            FeatureId::ChargeDensity => self.charge_density,
            FeatureId::IsoelectricPoint => self.isoelectric_point,
            FeatureId::Gravy => self.gravy,
            FeatureId::ExtinctionCoefficient => self.extinction_coefficient,
            FeatureId::BomanIndex => self.boman_index,
            FeatureId::InstabilityIndex => self.instability_index,
        }
    }

    fn pi_estimator(&self) -> Box<dyn PiEstimator> {
        match self.isoelectric_point_method {
            PiMethod::Titration => Box::new(TitrationPiEstimator),
            PiMethod::Model => {
                let path = self
                    .pi_model_path
                    .clone()
                    .unwrap_or_else(|| PathBuf::from("pi-model.json"));
                Box::new(RegressionPiEstimator::new(path))
            }
        }
    }
}

/// Input of a feature computation: a full dataset with a discoverable
/// sequence column, or one sequence of interest.
#[derive(Debug, Clone, Copy)]
pub enum FeatureInput<'a> {
    Dataset(&'a DataTable),
    Sequence(&'a str),
}

fn compute_value(
    id: FeatureId,
    seq: &str,
    params: &FeatureParams,
    estimator: &dyn PiEstimator,
) -> Result<Value, EngineError> {
    let value = match id {
        FeatureId::MolecularWeight => Value::Float(seqfeat::molecular_weight(seq)?),
        FeatureId::ThreeLetterCode => Value::Text(seqfeat::three_letter_code(seq)?),
        FeatureId::MolecularFormula => Value::Text(seqfeat::molecular_formula(seq)?),
        FeatureId::SeqLength => Value::Int(seqfeat::seq_length(seq)? as i64),
        FeatureId::Aromaticity => Value::Float(seqfeat::aromaticity(seq)?),
        FeatureId::AliphaticIndex => Value::Float(physicochemical::aliphatic_index(seq)?),
        FeatureId::ChargeAtPh => {
            Value::Float(physicochemical::charge_at_ph(seq, params.charge_at_ph_level)?)
        }
        FeatureId::ChargeDensity => Value::Float(physicochemical::charge_density(
            seq,
            params.charge_density_level,
        )?),
        FeatureId::IsoelectricPoint => {
            Value::Float(physicochemical::isoelectric_point(seq, estimator)?)
        }
        FeatureId::Gravy => Value::Float(seqfeat::gravy(seq)?),
        FeatureId::ExtinctionCoefficient => Value::Int(i64::from(
            physicochemical::extinction_coefficient(seq, params.extinction_coefficient_oxidized)?,
        )),
        FeatureId::BomanIndex => Value::Float(physicochemical::boman_index(seq)?),
        FeatureId::InstabilityIndex => Value::Float(physicochemical::instability_index(seq)?),
    };
    Ok(value)
}

/// Computes every selected feature once per distinct sequence and joins
/// the result back onto the input rows by sequence equality, so repeated
/// sequences share one evaluation and identical values.
pub fn compute_features(
    params: &FeatureParams,
    input: FeatureInput<'_>,
) -> Result<DataTable, EngineError> {
    let single;
    let (dataset, seq_col) = match input {
        FeatureInput::Dataset(df) => {
            let col = df.find_column("sequence")?.to_string();
            (df, col)
        }
        FeatureInput::Sequence(seq) => {
            let mut df = DataTable::new(vec!["Sequence".to_string()]);
            df.push_row(vec![Value::Text(seq.to_string())])?;
            single = df;
            (&single, "Sequence".to_string())
        }
    };

    let distinct = dataset.distinct_text(&seq_col)?;
    debug!(
        distinct = distinct.len(),
        rows = dataset.n_rows(),
        "computing features over distinct sequences"
    );

    let mut features = DataTable::new(vec![seq_col.clone()]);
    for seq in &distinct {
        features.push_row(vec![Value::Text(seq.clone())])?;
    }

    let estimator = params.pi_estimator();
    for spec in FEATURES {
        if !params.is_selected(spec.id) {
            continue;
        }
        let mut column = Vec::with_capacity(distinct.len());
        for seq in &distinct {
            column.push(compute_value(spec.id, seq, params, estimator.as_ref())?);
        }
        features.add_column(spec.label, column)?;
    }

    Ok(dataset.left_join(&features, &seq_col)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset() -> DataTable {
        let mut df = DataTable::new(vec![
            "Sample".into(),
            "Peptide Sequence".into(),
            "Intensity".into(),
        ]);
        df.push_row(vec!["s1".into(), "PEPTIDE".into(), Value::Float(900.0)])
            .unwrap();
        df.push_row(vec!["s2".into(), "PEPTIDE".into(), Value::Float(1100.0)])
            .unwrap();
        df.push_row(vec!["s3".into(), "GRAVY".into(), Value::Float(400.0)])
            .unwrap();
        df
    }

    #[test]
    fn registry_labels_and_keys_are_unique() {
        for (i, a) in FEATURES.iter().enumerate() {
            for b in &FEATURES[i + 1..] {
                assert_ne!(a.label, b.label);
                assert_ne!(a.key, b.key);
                assert_ne!(a.id, b.id);
            }
        }
    }

    #[test]
    fn gravy_only_selection_adds_exactly_one_column() {
        let params = FeatureParams {
            gravy: true,
            ..FeatureParams::default()
        };
        let table = compute_features(&params, FeatureInput::Dataset(&dataset())).unwrap();

        assert!(table.has_column("GRAVY"));
        assert!(!table.has_column("Molecular weight"));
        assert_eq!(table.n_rows(), 3);
        // Repeated sequence rows share one computed value.
        assert_eq!(table.cell(0, "GRAVY"), table.cell(1, "GRAVY"));
        assert_eq!(table.cell(0, "GRAVY"), Some(&Value::Float(-1.414)));
    }

    #[test]
    fn select_all_adds_every_registry_label() {
        let table =
            compute_features(&FeatureParams::all(), FeatureInput::Dataset(&dataset())).unwrap();
        for spec in FEATURES {
            assert!(table.has_column(spec.label), "missing {}", spec.label);
        }
    }

    #[test]
    fn single_sequence_input_yields_one_row() {
        let params = FeatureParams {
            molecular_weight: true,
            seq_length: true,
            ..FeatureParams::default()
        };
        let table = compute_features(&params, FeatureInput::Sequence("PEPTIDE")).unwrap();
        assert_eq!(table.n_rows(), 1);
        assert_eq!(
            table.cell(0, "Molecular weight"),
            Some(&Value::Float(799.832))
        );
        assert_eq!(table.cell(0, "Sequence length"), Some(&Value::Int(7)));
    }

    #[test]
    fn missing_sequence_column_is_a_usage_error() {
        let df = DataTable::new(vec!["Sample".into(), "Intensity".into()]);
        let err = compute_features(&FeatureParams::all(), FeatureInput::Dataset(&df)).unwrap_err();
        assert!(err.to_string().contains("Sample"));
    }

    #[test]
    fn computing_twice_is_idempotent() {
        let params = FeatureParams {
            gravy: true,
            isoelectric_point: true,
            ..FeatureParams::default()
        };
        let a = compute_features(&params, FeatureInput::Dataset(&dataset())).unwrap();
        let b = compute_features(&params, FeatureInput::Dataset(&dataset())).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn charge_level_option_is_forwarded() {
        let acidic = FeatureParams {
            charge_at_ph: true,
            charge_at_ph_level: 2.0,
            ..FeatureParams::default()
        };
        let basic = FeatureParams {
            charge_at_ph: true,
            charge_at_ph_level: 12.0,
            ..FeatureParams::default()
        };
        let low = compute_features(&acidic, FeatureInput::Sequence("PEPTIDE")).unwrap();
        let high = compute_features(&basic, FeatureInput::Sequence("PEPTIDE")).unwrap();
        let low_charge = low.cell(0, "Charge").unwrap().as_f64().unwrap();
        let high_charge = high.cell(0, "Charge").unwrap().as_f64().unwrap();
        assert!(low_charge > high_charge);
    }
}

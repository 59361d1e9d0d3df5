//! Compositional features: counts, codes, formula, hydropathy averages.

use super::{FeatureError, round_to};
use crate::core::constants::{
    AA_FORMULA, AA_ORDER, AA_WEIGHTS, CHARGE_CLASSES, CHEMICAL_CLASSES, HYDROPATHY_INDEX,
    ONE_LETTER_CODES, THREE_LETTER_CODES, WATER_MASS,
};
use crate::core::sequence::{SequenceError, validate, validate_non_empty};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

/// Number of residues in the sequence.
pub fn seq_length(seq: &str) -> Result<usize, FeatureError> {
    validate(seq)?;
    Ok(seq.chars().count())
}

/// Occurrence count for every letter of the alphabet, zero-filled for
/// letters absent from the sequence.
pub fn aa_frequency(seq: &str) -> Result<BTreeMap<char, usize>, FeatureError> {
    validate(seq)?;
    let mut freq: BTreeMap<char, usize> = AA_ORDER.iter().map(|&aa| (aa, 0)).collect();
    for aa in seq.chars() {
        if let Some(count) = freq.get_mut(&aa) {
            *count += 1;
        }
    }
    Ok(freq)
}

pub(crate) fn molecular_weight_raw(seq: &str) -> Result<f64, FeatureError> {
    validate_non_empty(seq, "molecular weight")?;
    let n = seq.chars().count() as f64;
    let sum: f64 = seq.chars().filter_map(|aa| AA_WEIGHTS.get(&aa)).sum();
    Ok(sum - (n - 1.0) * WATER_MASS)
}

/// Average molecular weight in Da: residue masses minus one water per
/// peptide bond, rounded to 3 decimal places.
pub fn molecular_weight(seq: &str) -> Result<f64, FeatureError> {
    Ok(round_to(molecular_weight_raw(seq)?, 3))
}

/// Concatenated three-letter code representation.
pub fn three_letter_code(seq: &str) -> Result<String, FeatureError> {
    validate(seq)?;
    Ok(seq
        .chars()
        .filter_map(|aa| THREE_LETTER_CODES.get(&aa))
        .copied()
        .collect())
}

/// Parses concatenated three-letter codes back into one-letter form.
/// Separators make the chunking ambiguous and are rejected outright;
/// unknown chunks are reported individually.
pub fn one_letter_code(codes: &str) -> Result<String, FeatureError> {
    if codes
        .chars()
        .any(|c| c.is_whitespace() || c.is_ascii_punctuation())
    {
        return Err(SequenceError::CodeSeparator.into());
    }
    let chars: Vec<char> = codes.chars().collect();
    let mut seq = String::with_capacity(chars.len() / 3);
    for chunk in chars.chunks(3) {
        let code: String = chunk.iter().collect();
        match ONE_LETTER_CODES.get(code.as_str()) {
            Some(aa) => seq.push(*aa),
            None => return Err(SequenceError::UnknownCode { chunk: code }.into()),
        }
    }
    Ok(seq)
}

/// GRAVY: mean Kyte-Doolittle hydropathy over the sequence.
pub fn gravy(seq: &str) -> Result<f64, FeatureError> {
    validate_non_empty(seq, "GRAVY")?;
    let n = seq.chars().count() as f64;
    let sum: f64 = seq.chars().filter_map(|aa| HYDROPATHY_INDEX.get(&aa)).sum();
    Ok(round_to(sum / n, 3))
}

/// Molecular formula after peptide-bond condensation, rendered in fixed
/// C,H,N,O,S order with counts of 1 omitted.
pub fn molecular_formula(seq: &str) -> Result<String, FeatureError> {
    validate_non_empty(seq, "molecular formula")?;
    let mut c = 0_i64;
    let mut h = 0_i64;
    let mut n = 0_i64;
    let mut o = 0_i64;
    let mut s = 0_i64;
    for aa in seq.chars() {
        if let Some(atoms) = AA_FORMULA.get(&aa) {
            c += i64::from(atoms.c);
            h += i64::from(atoms.h);
            n += i64::from(atoms.n);
            o += i64::from(atoms.o);
            s += i64::from(atoms.s);
        }
    }
    let bonds = seq.chars().count() as i64 - 1;
    h -= 2 * bonds;
    o -= bonds;

    let mut formula = String::new();
    for (element, count) in [("C", c), ("H", h), ("N", n), ("O", o), ("S", s)] {
        if count <= 0 {
            continue;
        }
        formula.push_str(element);
        if count > 1 {
            formula.push_str(&count.to_string());
        }
    }
    Ok(formula)
}

/// Aromaticity (Lobry and Gautier, 1994): proportion of F, Y and W.
pub fn aromaticity(seq: &str) -> Result<f64, FeatureError> {
    validate_non_empty(seq, "aromaticity")?;
    let n = seq.chars().count() as f64;
    let aromatic = seq.chars().filter(|aa| matches!(aa, 'F' | 'Y' | 'W')).count() as f64;
    Ok(round_to(aromatic / n, 3))
}

/// Residue class taxonomy used by classification and figure ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Taxonomy {
    #[default]
    Chemical,
    Charge,
}

impl Taxonomy {
    pub fn label(self) -> &'static str {
        match self {
            Self::Chemical => "chemical",
            Self::Charge => "charge",
        }
    }

    pub fn classes(self) -> &'static [(&'static str, &'static [char])] {
        match self {
            Self::Chemical => CHEMICAL_CLASSES,
            Self::Charge => CHARGE_CLASSES,
        }
    }
}

impl FromStr for Taxonomy {
    type Err = FeatureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "chemical" => Ok(Self::Chemical),
            "charge" => Ok(Self::Charge),
            other => Err(FeatureError::UnknownOption {
                parameter: "classification taxonomy",
                value: other.to_string(),
            }),
        }
    }
}

/// Absolute residue count per class of the chosen taxonomy (Pommié et
/// al., 2004), in the taxonomy's fixed class order.
pub fn classification(
    seq: &str,
    taxonomy: Taxonomy,
) -> Result<Vec<(&'static str, usize)>, FeatureError> {
    let freq = aa_frequency(seq)?;
    Ok(taxonomy
        .classes()
        .iter()
        .map(|(class, members)| (*class, members.iter().map(|aa| freq[aa]).sum()))
        .collect())
}

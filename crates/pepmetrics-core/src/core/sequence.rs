use super::constants::AA_LETTERS;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SequenceError {
    #[error("Invalid amino acid symbol: {symbols}")]
    InvalidResidues { symbols: String },

    #[error("Empty sequence: '{operation}' requires at least one residue")]
    Empty { operation: &'static str },

    #[error("Invalid input: Separators between codes are not allowed")]
    CodeSeparator,

    #[error("Invalid three letter code: '{chunk}'")]
    UnknownCode { chunk: String },
}

/// Uppercases a raw sequence and drops every character outside the
/// 20-letter amino acid alphabet.
pub fn sanitize(raw: &str) -> String {
    raw.chars()
        .flat_map(char::to_uppercase)
        .filter(|c| AA_LETTERS.contains(c))
        .collect()
}

/// Checks that every residue belongs to the alphabet. The error lists all
/// offending symbols, sorted and de-duplicated.
pub fn validate(seq: &str) -> Result<(), SequenceError> {
    let mut invalid: Vec<char> = seq.chars().filter(|c| !AA_LETTERS.contains(c)).collect();
    if invalid.is_empty() {
        return Ok(());
    }
    invalid.sort_unstable();
    invalid.dedup();
    let symbols = invalid
        .iter()
        .map(|c| format!("'{c}'"))
        .collect::<Vec<_>>()
        .join(", ");
    Err(SequenceError::InvalidResidues { symbols })
}

/// Validates a sequence and additionally rejects the empty one, for
/// features that divide by the residue count.
pub fn validate_non_empty(seq: &str, operation: &'static str) -> Result<(), SequenceError> {
    validate(seq)?;
    if seq.is_empty() {
        return Err(SequenceError::Empty { operation });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_uppercases_and_strips_foreign_characters() {
        assert_eq!(sanitize("pep tide!"), "PEPTIDE");
        assert_eq!(sanitize("A1B2C3"), "AC");
        assert_eq!(sanitize(""), "");
    }

    #[test]
    fn validate_accepts_the_full_alphabet() {
        assert!(validate("ACDEFGHIKLMNPQRSTVWY").is_ok());
    }

    #[test]
    fn validate_lists_every_offending_symbol_once_sorted() {
        let err = validate("PEPXTIDEZX").unwrap_err();
        assert_eq!(
            err,
            SequenceError::InvalidResidues {
                symbols: "'X', 'Z'".to_string()
            }
        );
    }

    #[test]
    fn empty_sequence_is_rejected_for_length_dependent_operations() {
        let err = validate_non_empty("", "GRAVY").unwrap_err();
        assert!(matches!(err, SequenceError::Empty { operation: "GRAVY" }));
    }
}

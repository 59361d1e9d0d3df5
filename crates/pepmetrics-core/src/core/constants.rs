use phf::{Map, Set, phf_map, phf_set};

// IUPAC-IUB 1983 one-letter amino acid alphabet.
// https://doi.org/10.1351/pac198456050595
pub static AA_LETTERS: Set<char> = phf_set! {
    'A', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'K', 'L',
    'M', 'N', 'P', 'Q', 'R', 'S', 'T', 'V', 'W', 'Y',
};

pub static THREE_LETTER_CODES: Map<char, &'static str> = phf_map! {
    'A' => "Ala",
    'C' => "Cys",
    'D' => "Asp",
    'E' => "Glu",
    'F' => "Phe",
    'G' => "Gly",
    'H' => "His",
    'I' => "Ile",
    'K' => "Lys",
    'L' => "Leu",
    'M' => "Met",
    'N' => "Asn",
    'P' => "Pro",
    'Q' => "Gln",
    'R' => "Arg",
    'S' => "Ser",
    'T' => "Thr",
    'V' => "Val",
    'W' => "Trp",
    'Y' => "Tyr",
};

pub static ONE_LETTER_CODES: Map<&'static str, char> = phf_map! {
    "Ala" => 'A',
    "Cys" => 'C',
    "Asp" => 'D',
    "Glu" => 'E',
    "Phe" => 'F',
    "Gly" => 'G',
    "His" => 'H',
    "Ile" => 'I',
    "Lys" => 'K',
    "Leu" => 'L',
    "Met" => 'M',
    "Asn" => 'N',
    "Pro" => 'P',
    "Gln" => 'Q',
    "Arg" => 'R',
    "Ser" => 'S',
    "Thr" => 'T',
    "Val" => 'V',
    "Trp" => 'W',
    "Tyr" => 'Y',
};

/// Atomic composition of a free (non-condensed) amino acid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResidueAtoms {
    pub c: u32,
    pub h: u32,
    pub n: u32,
    pub o: u32,
    pub s: u32,
}

pub static AA_FORMULA: Map<char, ResidueAtoms> = phf_map! {
    'A' => ResidueAtoms { c: 3, h: 7, n: 1, o: 2, s: 0 },
    'C' => ResidueAtoms { c: 3, h: 7, n: 1, o: 2, s: 1 },
    'D' => ResidueAtoms { c: 4, h: 7, n: 1, o: 4, s: 0 },
    'E' => ResidueAtoms { c: 5, h: 9, n: 1, o: 4, s: 0 },
    'F' => ResidueAtoms { c: 9, h: 11, n: 1, o: 2, s: 0 },
    'G' => ResidueAtoms { c: 2, h: 5, n: 1, o: 2, s: 0 },
    'H' => ResidueAtoms { c: 6, h: 9, n: 3, o: 2, s: 0 },
    'I' => ResidueAtoms { c: 6, h: 13, n: 1, o: 2, s: 0 },
    'K' => ResidueAtoms { c: 6, h: 14, n: 2, o: 2, s: 0 },
    'L' => ResidueAtoms { c: 6, h: 13, n: 1, o: 2, s: 0 },
    'M' => ResidueAtoms { c: 5, h: 11, n: 1, o: 2, s: 1 },
    'N' => ResidueAtoms { c: 4, h: 8, n: 2, o: 3, s: 0 },
    'P' => ResidueAtoms { c: 5, h: 9, n: 1, o: 2, s: 0 },
    'Q' => ResidueAtoms { c: 5, h: 10, n: 2, o: 3, s: 0 },
    'R' => ResidueAtoms { c: 6, h: 14, n: 4, o: 2, s: 0 },
    'S' => ResidueAtoms { c: 3, h: 7, n: 1, o: 3, s: 0 },
    'T' => ResidueAtoms { c: 4, h: 9, n: 1, o: 3, s: 0 },
    'V' => ResidueAtoms { c: 5, h: 11, n: 1, o: 2, s: 0 },
    'W' => ResidueAtoms { c: 11, h: 12, n: 2, o: 2, s: 0 },
    'Y' => ResidueAtoms { c: 9, h: 11, n: 1, o: 3, s: 0 },
};

// Average masses of free amino acids in Da, IUPAC Standards Online Database.
// https://doi.org/10.1515/iupac
pub static AA_WEIGHTS: Map<char, f64> = phf_map! {
    'A' => 89.094,
    'C' => 121.154,
    'D' => 133.103,
    'E' => 147.130,
    'F' => 165.192,
    'G' => 75.067,
    'H' => 155.157,
    'I' => 131.175,
    'K' => 146.190,
    'L' => 131.175,
    'M' => 149.208,
    'N' => 132.119,
    'P' => 115.132,
    'Q' => 146.146,
    'R' => 174.204,
    'S' => 105.093,
    'T' => 119.12,
    'V' => 117.148,
    'W' => 204.229,
    'Y' => 181.191,
};

/// Mass of one water molecule, lost per peptide bond.
pub const WATER_MASS: f64 = 18.015;

// Kyte and Doolittle, 1982. https://doi.org/10.1016/0022-2836(82)90515-0
pub static HYDROPATHY_INDEX: Map<char, f64> = phf_map! {
    'A' => 1.8,
    'C' => 2.5,
    'D' => -3.5,
    'E' => -3.5,
    'F' => 2.8,
    'G' => -0.4,
    'H' => -3.2,
    'I' => 4.5,
    'K' => -3.9,
    'L' => 3.8,
    'M' => 1.9,
    'N' => -3.5,
    'P' => -1.6,
    'Q' => -3.5,
    'R' => -4.5,
    'S' => -0.8,
    'T' => -0.7,
    'V' => 4.2,
    'W' => -0.9,
    'Y' => -1.3,
};

// Class taxonomies from Pommié et al., 2004. https://doi.org/10.1002/jmr.647
// The class order is fixed and drives axis ordering in figures.
pub static CHEMICAL_CLASSES: &[(&str, &[char])] = &[
    ("Aliphatic", &['I', 'L', 'V', 'A']),
    ("Sulfur", &['M', 'C']),
    ("Hydroxyl", &['T', 'S']),
    ("Basic", &['K', 'R', 'H']),
    ("Acidic", &['E', 'D']),
    ("Amide", &['Q', 'N']),
    ("Other", &['F', 'W', 'Y', 'P', 'G']),
];

pub static CHARGE_CLASSES: &[(&str, &[char])] = &[
    ("Non-polar", &['F', 'W', 'I', 'L', 'M', 'V', 'C', 'P', 'A', 'G']),
    ("Uncharged", &['Y', 'T', 'S', 'Q', 'N']),
    ("Charged", &['K', 'R', 'H', 'E', 'D']),
];

// Free energies of transfer (kcal/mol), Boman 2003.
// https://doi.org/10.1046/j.1365-2796.2003.01228.x
pub static BOMAN_SCALE: Map<char, f64> = phf_map! {
    'L' => -4.92,
    'I' => -4.92,
    'V' => -4.04,
    'F' => -2.98,
    'M' => -2.35,
    'W' => -2.33,
    'A' => -1.81,
    'C' => -1.28,
    'G' => -0.94,
    'Y' => -0.14,
    'P' => 0.0,
    'T' => 2.57,
    'S' => 3.40,
    'H' => 4.66,
    'Q' => 5.54,
    'K' => 5.55,
    'N' => 6.64,
    'E' => 6.81,
    'D' => 8.72,
    'R' => 14.92,
};

// pKa values (EMBOSS set) for Henderson-Hasselbalch titration.
pub const PKA_NTERM: f64 = 9.69;
pub const PKA_CTERM: f64 = 2.34;
pub const PKA_ASP: f64 = 3.65;
pub const PKA_GLU: f64 = 4.25;
pub const PKA_CYS: f64 = 8.18;
pub const PKA_TYR: f64 = 10.07;
pub const PKA_HIS: f64 = 6.00;
pub const PKA_LYS: f64 = 10.53;
pub const PKA_ARG: f64 = 12.48;

// Molar extinction contributions at 280 nm (Pace et al., 1995).
pub const EXTINCTION_TRP: u32 = 5500;
pub const EXTINCTION_TYR: u32 = 1490;
pub const EXTINCTION_CYSTINE: u32 = 125;

/// Canonical residue order used to index the dipeptide instability table.
pub const AA_ORDER: [char; 20] = [
    'A', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'K', 'L', 'M', 'N', 'P', 'Q', 'R', 'S', 'T', 'V', 'W',
    'Y',
];

/// Index of a residue within [`AA_ORDER`]. None for non-standard symbols.
pub fn aa_index(aa: char) -> Option<usize> {
    AA_ORDER.iter().position(|&c| c == aa)
}

// Dipeptide instability weight values (Guruprasad et al., 1990).
// Rows follow AA_ORDER for the first residue, columns for the second.
#[rustfmt::skip]
pub static DIPEPTIDE_INSTABILITY: [[f64; 20]; 20] = [
    // A      C      D      E      F      G      H      I      K      L      M      N      P      Q      R      S      T      V      W      Y
    [  1.0,  44.94, -7.49,  1.0,   1.0,   1.0,  -7.49,  1.0,   1.0,   1.0,   1.0,   1.0,  20.26,  1.0,   1.0,   1.0,   1.0,   1.0,   1.0,   1.0 ], // A
    [  1.0,   1.0,  20.26,  1.0,   1.0,   1.0,  33.6,   1.0,   1.0,  20.26, 33.6,   1.0,  20.26, -6.54,  1.0,   1.0,  33.6,  -6.54, 24.68,  1.0 ], // C
    [  1.0,   1.0,   1.0,   1.0,  -6.54,  1.0,   1.0,   1.0,  -7.49,  1.0,   1.0,   1.0,   1.0,   1.0,  -6.54, 20.26,-14.03,  1.0,   1.0,   1.0 ], // D
    [  1.0,  44.94, 20.26, 33.6,   1.0,   1.0,  -6.54, 20.26,  1.0,   1.0,   1.0,   1.0,  20.26, 20.26,  1.0,  20.26,  1.0,   1.0, -14.03,  1.0 ], // E
    [  1.0,   1.0,  13.34,  1.0,   1.0,   1.0,   1.0,   1.0, -14.03,  1.0,   1.0,   1.0,  20.26,  1.0,   1.0,   1.0,   1.0,   1.0,   1.0,  33.6 ], // F
    [ -7.49,  1.0,   1.0,  -6.54,  1.0,  13.34,  1.0,  -7.49, -7.49,  1.0,   1.0,  -7.49,  1.0,   1.0,   1.0,   1.0,  -7.49,  1.0,  13.34, -7.49], // G
    [  1.0,   1.0,   1.0,   1.0,  -9.37, -9.37,  1.0,  44.94, 24.68,  1.0,   1.0,  24.68, -1.88,  1.0,   1.0,   1.0,  -6.54,  1.0,  -1.88, 44.94], // H
    [  1.0,   1.0,   1.0,  44.94,  1.0,   1.0,  13.34,  1.0,  -7.49, 20.26,  1.0,   1.0,  -1.88,  1.0,   1.0,   1.0,   1.0,  -7.49,  1.0,   1.0 ], // I
    [  1.0,   1.0,   1.0,   1.0,   1.0,  -7.49,  1.0,  -7.49,  1.0,  -7.49, 33.6,   1.0,  -6.54, 24.64, 33.6,   1.0,   1.0,  -7.49,  1.0,   1.0 ], // K
    [  1.0,   1.0,   1.0,   1.0,   1.0,   1.0,   1.0,   1.0,  -7.49,  1.0,   1.0,   1.0,  20.26, 33.6,  20.26,  1.0,   1.0,   1.0,  24.68,  1.0 ], // L
    [ 13.34,  1.0,   1.0,   1.0,   1.0,   1.0,  58.28,  1.0,   1.0,   1.0,  -1.88,  1.0,  44.94, -6.54, -6.54, 44.94, -1.88,  1.0,   1.0,  24.68], // M
    [  1.0,  -1.88,  1.0,   1.0, -14.03,-14.03,  1.0,  44.94, 24.68,  1.0,   1.0,   1.0,  -1.88, -6.54,  1.0,   1.0,  -7.49,  1.0,  -9.37,  1.0 ], // N
    [ 20.26, -6.54, -6.54, 18.38, 20.26,  1.0,   1.0,   1.0,   1.0,   1.0,  -6.54,  1.0,  20.26, 20.26, -6.54, 20.26,  1.0,  20.26, -1.88,  1.0 ], // P
    [  1.0,  -6.54, 20.26, 20.26, -6.54,  1.0,   1.0,   1.0,   1.0,   1.0,   1.0,   1.0,  20.26, 20.26,  1.0,  44.94,  1.0,  -6.54,  1.0,  -6.54], // Q
    [  1.0,   1.0,   1.0,   1.0,   1.0,  -7.49, 20.26,  1.0,   1.0,   1.0,   1.0,  13.34, 20.26, 20.26, 58.28, 44.94,  1.0,   1.0,  58.28, -6.54], // R
    [  1.0,  33.6,   1.0,  20.26,  1.0,   1.0,   1.0,   1.0,   1.0,   1.0,   1.0,   1.0,  44.94, 20.26, 20.26, 20.26,  1.0,   1.0,   1.0,   1.0 ], // S
    [  1.0,   1.0,   1.0,  20.26, 13.34, -7.49,  1.0,   1.0,   1.0,   1.0,   1.0, -14.03,  1.0,  -6.54,  1.0,   1.0,   1.0,   1.0, -14.03,  1.0 ], // T
    [  1.0,   1.0, -14.03,  1.0,   1.0,  -7.49,  1.0,   1.0,  -1.88,  1.0,   1.0,   1.0,  20.26,  1.0,   1.0,   1.0,  -7.49,  1.0,   1.0,  -6.54], // V
    [-14.03,  1.0,   1.0,   1.0,   1.0,  -9.37, 24.68,  1.0,   1.0,  13.34, 24.68, 13.34,  1.0,   1.0,   1.0,   1.0, -14.03, -7.49,  1.0,   1.0 ], // W
    [ 24.68,  1.0,  24.68, -6.54,  1.0,  -7.49, 13.34,  1.0,   1.0,   1.0,  44.94,  1.0,  13.34,  1.0, -15.91,  1.0,  -7.49,  1.0,  -9.37, 13.34], // Y
];

/// Categorical color palette shared by all figures.
pub const PALETTE: [(u8, u8, u8); 7] = [
    (0xCE, 0x5A, 0x5A),
    (0x4A, 0x53, 0x6A),
    (0x87, 0xA8, 0xB9),
    (0xF1, 0xA7, 0x65),
    (0xA7, 0xA1, 0xB2),
    (0x8E, 0x3F, 0x25),
    (0x51, 0x1D, 0x43),
];

pub const COLOR_DARK_GRAY: (u8, u8, u8) = (0x69, 0x69, 0x69);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alphabet_has_twenty_letters() {
        assert_eq!(AA_LETTERS.len(), 20);
        assert_eq!(AA_ORDER.len(), 20);
        for aa in &AA_ORDER {
            assert!(AA_LETTERS.contains(aa));
        }
    }

    #[test]
    fn three_and_one_letter_codes_are_inverse() {
        for (aa, code) in THREE_LETTER_CODES.entries() {
            assert_eq!(ONE_LETTER_CODES.get(code), Some(aa));
        }
        assert_eq!(ONE_LETTER_CODES.len(), 20);
    }

    #[test]
    fn every_residue_has_weight_formula_and_hydropathy() {
        for aa in &AA_ORDER {
            assert!(AA_WEIGHTS.contains_key(aa));
            assert!(AA_FORMULA.contains_key(aa));
            assert!(HYDROPATHY_INDEX.contains_key(aa));
            assert!(BOMAN_SCALE.contains_key(aa));
        }
    }

    #[test]
    fn class_tables_partition_the_alphabet() {
        let chemical: usize = CHEMICAL_CLASSES.iter().map(|(_, aas)| aas.len()).sum();
        let charge: usize = CHARGE_CLASSES.iter().map(|(_, aas)| aas.len()).sum();
        assert_eq!(chemical, 20);
        assert_eq!(charge, 20);
    }

    #[test]
    fn aa_index_covers_the_alphabet_in_order() {
        assert_eq!(aa_index('A'), Some(0));
        assert_eq!(aa_index('Y'), Some(19));
        assert_eq!(aa_index('X'), None);
    }
}

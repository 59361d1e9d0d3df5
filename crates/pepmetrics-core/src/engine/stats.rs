//! Rank statistics and density estimation backing the comparison figures.

use crate::core::features::FeatureError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Alternative hypothesis of the Mann-Whitney U test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Alternative {
    /// The distributions differ in either direction.
    #[default]
    TwoSided,
    /// The first sample is stochastically greater.
    Greater,
    /// The first sample is stochastically less.
    Less,
}

impl Alternative {
    pub fn label(self) -> &'static str {
        match self {
            Self::TwoSided => "two-sided",
            Self::Greater => "greater",
            Self::Less => "less",
        }
    }
}

impl FromStr for Alternative {
    type Err = FeatureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "two-sided" => Ok(Self::TwoSided),
            "greater" => Ok(Self::Greater),
            "less" => Ok(Self::Less),
            other => Err(FeatureError::UnknownOption {
                parameter: "alternative hypothesis",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MannWhitneyResult {
    /// U statistic of the first sample.
    pub u: f64,
    pub p_value: f64,
}

/// Average ranks (1-based) of the values, ties sharing their mean rank.
fn average_ranks(values: &[f64]) -> Vec<f64> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let mut ranks = vec![0.0; values.len()];
    let mut i = 0;
    while i < order.len() {
        let mut j = i;
        while j + 1 < order.len() && values[order[j + 1]] == values[order[i]] {
            j += 1;
        }
        // Positions i..=j hold tied values; each gets the mean rank.
        let rank = (i + j) as f64 / 2.0 + 1.0;
        for &idx in &order[i..=j] {
            ranks[idx] = rank;
        }
        i = j + 1;
    }
    ranks
}

fn erf(x: f64) -> f64 {
    // Abramowitz and Stegun 7.1.26, max absolute error 1.5e-7.
    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let x = x.abs();
    let t = 1.0 / (1.0 + 0.3275911 * x);
    let poly = t
        * (0.254829592
            + t * (-0.284496736 + t * (1.421413741 + t * (-1.453152027 + t * 1.061405429))));
    sign * (1.0 - poly * (-x * x).exp())
}

fn normal_sf(z: f64) -> f64 {
    0.5 * (1.0 - erf(z / std::f64::consts::SQRT_2))
}

/// Mann-Whitney U test with normal approximation, tie correction and
/// continuity correction. Both samples must be non-empty; with fewer
/// than roughly 8 values per group the approximation gets coarse but
/// stays usable for annotation purposes.
pub fn mann_whitney_u(x: &[f64], y: &[f64], alternative: Alternative) -> MannWhitneyResult {
    let nx = x.len() as f64;
    let ny = y.len() as f64;
    let n = nx + ny;

    let mut combined = Vec::with_capacity(x.len() + y.len());
    combined.extend_from_slice(x);
    combined.extend_from_slice(y);
    let ranks = average_ranks(&combined);

    let r1: f64 = ranks[..x.len()].iter().sum();
    let u1 = r1 - nx * (nx + 1.0) / 2.0;
    let u2 = nx * ny - u1;

    let mean = nx * ny / 2.0;

    // Tie correction term over the pooled sample.
    let mut sorted = combined.clone();
    sorted.sort_by(f64::total_cmp);
    let mut tie_term = 0.0;
    let mut i = 0;
    while i < sorted.len() {
        let mut j = i;
        while j + 1 < sorted.len() && sorted[j + 1] == sorted[i] {
            j += 1;
        }
        let t = (j - i + 1) as f64;
        tie_term += t * t * t - t;
        i = j + 1;
    }
    let sigma = (nx * ny / 12.0 * ((n + 1.0) - tie_term / (n * (n - 1.0)))).sqrt();

    if sigma == 0.0 {
        // Every pooled value is tied; no evidence either way.
        return MannWhitneyResult { u: u1, p_value: 1.0 };
    }

    let p_value = match alternative {
        Alternative::TwoSided => {
            let u = u1.max(u2);
            (2.0 * normal_sf((u - mean - 0.5) / sigma)).min(1.0)
        }
        Alternative::Greater => normal_sf((u1 - mean - 0.5) / sigma),
        Alternative::Less => normal_sf((u2 - mean - 0.5) / sigma),
    };

    MannWhitneyResult { u: u1, p_value }
}

/// First quartile, median and third quartile by linear interpolation of
/// the sorted sample. Empty input yields zeros.
pub fn quartiles(values: &[f64]) -> (f64, f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0, 0.0);
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let at = |q: f64| -> f64 {
        let pos = q * (sorted.len() - 1) as f64;
        let lo = pos.floor() as usize;
        let hi = pos.ceil() as usize;
        let frac = pos - lo as f64;
        sorted[lo] * (1.0 - frac) + sorted[hi] * frac
    };
    (at(0.25), at(0.5), at(0.75))
}

fn std_dev(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    (values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n).sqrt()
}

/// Gaussian kernel density estimate evaluated on `points` equidistant
/// positions over the sample range, Silverman bandwidth. Degenerate
/// samples (constant or singleton) get a narrow synthetic bandwidth so
/// the silhouette still renders.
pub fn gaussian_kde(values: &[f64], points: usize) -> Vec<(f64, f64)> {
    if values.is_empty() || points == 0 {
        return Vec::new();
    }
    let n = values.len() as f64;
    let sd = std_dev(values);
    let (q1, _, q3) = quartiles(values);
    let iqr = q3 - q1;

    let mut spread = if iqr > 0.0 { sd.min(iqr / 1.34) } else { sd };
    if spread == 0.0 {
        let magnitude = values[0].abs();
        spread = if magnitude > 0.0 { magnitude * 0.01 } else { 0.01 };
    }
    let bandwidth = 0.9 * spread * n.powf(-0.2);

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let lo = min - 2.0 * bandwidth;
    let hi = max + 2.0 * bandwidth;
    let step = if points > 1 {
        (hi - lo) / (points - 1) as f64
    } else {
        0.0
    };

    let norm = 1.0 / (n * bandwidth * (2.0 * std::f64::consts::PI).sqrt());
    (0..points)
        .map(|i| {
            let x = lo + step * i as f64;
            let density: f64 = values
                .iter()
                .map(|v| {
                    let z = (x - v) / bandwidth;
                    (-0.5 * z * z).exp()
                })
                .sum();
            (x, density * norm)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() < tol
    }

    #[test]
    fn ranks_average_over_ties() {
        let ranks = average_ranks(&[1.0, 2.0, 2.0, 3.0]);
        assert_eq!(ranks, vec![1.0, 2.5, 2.5, 4.0]);
    }

    #[test]
    fn u_statistic_counts_pairwise_wins() {
        // Every x beats every y: U1 = nx * ny.
        let result = mann_whitney_u(&[5.0, 6.0, 7.0], &[1.0, 2.0], Alternative::TwoSided);
        assert_eq!(result.u, 6.0);
    }

    #[test]
    fn clearly_separated_groups_give_small_p() {
        let x = [10.0, 11.0, 12.0, 13.0, 14.0, 15.0, 16.0, 17.0];
        let y = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0];
        let result = mann_whitney_u(&x, &y, Alternative::TwoSided);
        assert!(result.p_value < 0.01, "p = {}", result.p_value);
    }

    #[test]
    fn identical_groups_give_large_p() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let result = mann_whitney_u(&x, &x, Alternative::TwoSided);
        assert!(result.p_value > 0.5, "p = {}", result.p_value);
    }

    #[test]
    fn fully_tied_sample_is_inconclusive() {
        let result = mann_whitney_u(&[3.0, 3.0], &[3.0, 3.0, 3.0], Alternative::TwoSided);
        assert_eq!(result.p_value, 1.0);
    }

    #[test]
    fn one_sided_alternatives_are_complementary_in_direction() {
        let x = [10.0, 11.0, 12.0, 13.0];
        let y = [1.0, 2.0, 3.0, 4.0];
        let greater = mann_whitney_u(&x, &y, Alternative::Greater);
        let less = mann_whitney_u(&x, &y, Alternative::Less);
        assert!(greater.p_value < 0.05);
        assert!(less.p_value > 0.9);
    }

    #[test]
    fn quartiles_interpolate_linearly() {
        let (q1, median, q3) = quartiles(&[1.0, 2.0, 3.0, 4.0]);
        assert!(close(q1, 1.75, 1e-12));
        assert!(close(median, 2.5, 1e-12));
        assert!(close(q3, 3.25, 1e-12));
    }

    #[test]
    fn kde_integrates_to_roughly_one() {
        let values = [1.0, 2.0, 2.5, 3.0, 4.0, 4.2, 5.0];
        let curve = gaussian_kde(&values, 200);
        let step = curve[1].0 - curve[0].0;
        let integral: f64 = curve.iter().map(|&(_, d)| d * step).sum();
        assert!(close(integral, 1.0, 0.05), "integral = {integral}");
    }

    #[test]
    fn kde_handles_constant_samples() {
        let curve = gaussian_kde(&[2.0, 2.0, 2.0], 50);
        assert_eq!(curve.len(), 50);
        assert!(curve.iter().all(|&(_, d)| d.is_finite()));
    }

    #[test]
    fn unknown_alternative_is_a_usage_error() {
        let err = "both".parse::<Alternative>().unwrap_err();
        assert!(err.to_string().contains("both"));
    }
}

//! Figure primitives shared by the plot implementations. Every figure is
//! rendered into an in-memory SVG string so the engine stays free of
//! filesystem concerns.

pub mod comparison;
pub mod distribution;
pub mod profile;
pub mod raincloud;

use super::error::EngineError;
use crate::core::constants::{COLOR_DARK_GRAY, PALETTE};
use crate::core::table::{DataTable, Value};
use plotters::style::RGBColor;

pub(crate) const FIGURE_WIDTH: u32 = 800;
pub(crate) const FIGURE_HEIGHT: u32 = 600;

/// A rendered figure: display title plus the SVG document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Figure {
    pub title: String,
    pub svg: String,
}

pub(crate) fn render_err<E: std::fmt::Display>(err: E) -> EngineError {
    EngineError::Render(err.to_string())
}

/// Categorical color for the i-th group, cycling through the palette.
pub(crate) fn palette_color(index: usize) -> RGBColor {
    let (r, g, b) = PALETTE[index % PALETTE.len()];
    RGBColor(r, g, b)
}

pub(crate) fn dark_gray() -> RGBColor {
    let (r, g, b) = COLOR_DARK_GRAY;
    RGBColor(r, g, b)
}

/// Linear interpolation between the first two palette colors, used for
/// continuous color scales. `t` is clamped to [0, 1].
pub(crate) fn gradient_color(t: f64) -> RGBColor {
    let t = t.clamp(0.0, 1.0);
    let (r0, g0, b0) = PALETTE[2];
    let (r1, g1, b1) = PALETTE[0];
    let mix = |a: u8, b: u8| -> u8 { (f64::from(a) + (f64::from(b) - f64::from(a)) * t) as u8 };
    RGBColor(mix(r0, r1), mix(g0, g1), mix(b0, b1))
}

/// Group label of a row: the text value of the group column, or "None"
/// for rows the metadata join left unmatched.
pub(crate) fn group_label(value: Option<&Value>) -> String {
    match value {
        Some(Value::Null) | None => "None".to_string(),
        Some(v) => v.to_string(),
    }
}

/// Requires a computed feature column, distinguishing "feature was never
/// computed" from the generic keyword lookup failure.
pub(crate) fn require_feature<'a>(
    df: &'a DataTable,
    feature: &str,
) -> Result<&'a str, EngineError> {
    df.columns()
        .iter()
        .find(|c| c.as_str() == feature)
        .map(String::as_str)
        .ok_or_else(|| EngineError::MissingFeature {
            feature: feature.to_string(),
        })
}

/// Numeric values of a column paired with their group labels, skipping
/// rows where the value is missing or non-numeric.
pub(crate) fn grouped_values(
    df: &DataTable,
    value_col: &str,
    group_col: &str,
) -> Result<Vec<(String, f64)>, EngineError> {
    let values = df.column_values(value_col)?;
    let groups = df.column_values(group_col)?;
    Ok(values
        .iter()
        .zip(groups)
        .filter_map(|(value, group)| value.as_f64().map(|v| (group_label(Some(group)), v)))
        .collect())
}

/// Retains rows whose intensity meets the threshold. The intensity
/// column is discovered by keyword.
pub(crate) fn apply_intensity_threshold(
    df: &DataTable,
    threshold: Option<f64>,
) -> Result<DataTable, EngineError> {
    let Some(threshold) = threshold else {
        return Ok(df.clone());
    };
    let col = df.find_column("intensity")?.to_string();
    let idx = df
        .column_index(&col)
        .ok_or_else(|| EngineError::MissingFeature { feature: col })?;
    Ok(df.filter_rows(|row| row[idx].as_f64().is_some_and(|v| v >= threshold)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_cycles_past_its_length() {
        assert_eq!(palette_color(0), palette_color(PALETTE.len()));
    }

    #[test]
    fn gradient_endpoints_hit_the_palette() {
        let (r, g, b) = PALETTE[2];
        assert_eq!(gradient_color(0.0), RGBColor(r, g, b));
        let (r, g, b) = PALETTE[0];
        assert_eq!(gradient_color(1.0), RGBColor(r, g, b));
    }

    #[test]
    fn null_groups_are_surfaced_as_none() {
        assert_eq!(group_label(Some(&Value::Null)), "None");
        assert_eq!(group_label(Some(&Value::Text("CTRL".into()))), "CTRL");
    }
}

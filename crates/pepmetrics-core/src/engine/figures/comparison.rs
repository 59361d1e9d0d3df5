//! Cross-feature and cross-group comparison figures over a computed
//! feature table.

use super::{
    FIGURE_HEIGHT, FIGURE_WIDTH, Figure, apply_intensity_threshold, dark_gray, grouped_values,
    group_label, palette_color, render_err, require_feature,
};
use crate::core::table::DataTable;
use crate::engine::error::EngineError;
use crate::engine::stats::{self, Alternative};
use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;
use std::collections::HashSet;
use tracing::warn;

/// Vertical gap between the taller box and the significance bracket, as
/// a fraction of the value span.
const BOX_BRACKET_GAP: f64 = 0.05;
/// Bracket arm height as a fraction of the value span.
const BRACKET_HEIGHT: f64 = 0.03;
const BOX_HALF_WIDTH: f64 = 0.15;

fn numeric_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for v in values {
        min = min.min(v);
        max = max.max(v);
    }
    if min > max {
        (0.0, 1.0)
    } else if min == max {
        (min - 0.5, max + 0.5)
    } else {
        (min, max)
    }
}

fn grouping(
    df: &DataTable,
    group_by: Option<&str>,
) -> Result<Vec<String>, EngineError> {
    match group_by {
        Some(group_by) => {
            let col = df.find_column(group_by)?;
            Ok(df
                .column_values(col)?
                .iter()
                .map(|v| group_label(Some(*v)))
                .collect())
        }
        None => Ok(vec!["All".to_string(); df.n_rows()]),
    }
}

fn distinct_in_order(labels: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    labels
        .iter()
        .filter(|l| seen.insert(l.as_str()))
        .cloned()
        .collect()
}

/// Scatter of two computed features, one color and marker per group.
/// When GRAVY lands on the y-axis a dashed neutral line separates
/// hydrophobic from hydrophilic peptides.
pub fn compare_features(
    df: &DataTable,
    feature_a: &str,
    feature_b: &str,
    group_by: Option<&str>,
    intensity_threshold: Option<f64>,
) -> Result<Figure, EngineError> {
    require_feature(df, feature_a)?;
    require_feature(df, feature_b)?;
    let df = apply_intensity_threshold(df, intensity_threshold)?;
    let groups = grouping(&df, group_by)?;
    let title = format!("{feature_a} vs {feature_b}");

    let xs = df.column_values(feature_a)?;
    let ys = df.column_values(feature_b)?;
    let mut points: Vec<(String, f64, f64)> = Vec::new();
    for ((x, y), group) in xs.iter().zip(&ys).zip(&groups) {
        if let (Some(x), Some(y)) = (x.as_f64(), y.as_f64()) {
            points.push((group.clone(), x, y));
        }
    }
    let distinct = distinct_in_order(&groups);

    let (x_min, x_max) = numeric_range(points.iter().map(|&(_, x, _)| x));
    let (y_min, y_max) = numeric_range(points.iter().map(|&(_, _, y)| y));
    let x_pad = (x_max - x_min) * 0.05;
    let y_pad = (y_max - y_min) * 0.05;

    let mut svg = String::new();
    {
        let root =
            SVGBackend::with_string(&mut svg, (FIGURE_WIDTH, FIGURE_HEIGHT)).into_drawing_area();
        root.fill(&WHITE).map_err(render_err)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(&title, ("sans-serif", 24))
            .margin(20)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d(
                (x_min - x_pad)..(x_max + x_pad),
                (y_min - y_pad)..(y_max + y_pad),
            )
            .map_err(render_err)?;

        chart
            .configure_mesh()
            .x_desc(feature_a)
            .y_desc(feature_b)
            .draw()
            .map_err(render_err)?;

        if feature_b == "GRAVY" {
            chart
                .draw_series(DashedLineSeries::new(
                    [(x_min - x_pad, 0.0), (x_max + x_pad, 0.0)],
                    5,
                    5,
                    dark_gray().stroke_width(1),
                ))
                .map_err(render_err)?;
        }

        for (i, group) in distinct.iter().enumerate() {
            let color = palette_color(i);
            let members: Vec<(f64, f64)> = points
                .iter()
                .filter(|(g, _, _)| g == group)
                .map(|&(_, x, y)| (x, y))
                .collect();
            chart
                .draw_series(members.iter().map(move |&p| match i % 3 {
                    0 => Circle::new(p, 4, color.filled()).into_dyn(),
                    1 => TriangleMarker::new(p, 5, color.filled()).into_dyn(),
                    _ => Cross::new(p, 4, color.stroke_width(2)).into_dyn(),
                }))
                .map_err(render_err)?
                .label(group)
                .legend(move |(x, y)| Circle::new((x, y), 4, color.filled()));
        }

        chart
            .configure_series_labels()
            .border_style(BLACK)
            .background_style(WHITE.mix(0.8))
            .draw()
            .map_err(render_err)?;

        root.present().map_err(render_err)?;
    }

    Ok(Figure { title, svg })
}

/// One feature as a box plot per group.
pub fn compare_feature(
    df: &DataTable,
    feature: &str,
    group_by: Option<&str>,
    intensity_threshold: Option<f64>,
) -> Result<Figure, EngineError> {
    require_feature(df, feature)?;
    let df = apply_intensity_threshold(df, intensity_threshold)?;
    let group_col = match group_by {
        Some(group_by) => df.find_column(group_by)?.to_string(),
        None => {
            let pairs: Vec<(String, f64)> = df
                .column_values(feature)?
                .iter()
                .filter_map(|v| v.as_f64())
                .map(|v| ("All".to_string(), v))
                .collect();
            return box_figure(format!("{feature} by group"), feature, &pairs);
        }
    };
    let pairs = grouped_values(&df, feature, &group_col)?;
    box_figure(format!("{feature} by group"), feature, &pairs)
}

fn box_figure(
    title: String,
    feature: &str,
    pairs: &[(String, f64)],
) -> Result<Figure, EngineError> {
    let labels: Vec<String> = pairs.iter().map(|(g, _)| g.clone()).collect();
    let distinct = distinct_in_order(&labels);
    let (y_min, y_max) = numeric_range(pairs.iter().map(|&(_, v)| v));
    let pad = (y_max - y_min) * 0.1;

    let mut svg = String::new();
    {
        let root =
            SVGBackend::with_string(&mut svg, (FIGURE_WIDTH, FIGURE_HEIGHT)).into_drawing_area();
        root.fill(&WHITE).map_err(render_err)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(&title, ("sans-serif", 24))
            .margin(20)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d(0.0..distinct.len() as f64, (y_min - pad)..(y_max + pad))
            .map_err(render_err)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(distinct.len())
            .x_label_formatter(&|x| {
                let idx = *x as usize;
                distinct.get(idx).cloned().unwrap_or_default()
            })
            .y_desc(feature)
            .draw()
            .map_err(render_err)?;

        for (i, group) in distinct.iter().enumerate() {
            let values: Vec<f64> = pairs
                .iter()
                .filter(|(g, _)| g == group)
                .map(|&(_, v)| v)
                .collect();
            draw_box(&mut chart, i as f64 + 0.5, &values, palette_color(i))?;
        }

        root.present().map_err(render_err)?;
    }

    Ok(Figure { title, svg })
}

type BoxChart<'a, 'b> =
    ChartContext<'b, SVGBackend<'a>, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

/// Box with median bar and min/max whiskers centered on `x`.
fn draw_box(
    chart: &mut BoxChart<'_, '_>,
    x: f64,
    values: &[f64],
    color: RGBColor,
) -> Result<(), EngineError> {
    if values.is_empty() {
        return Ok(());
    }
    let (q1, median, q3) = stats::quartiles(values);
    let lo = values.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    chart
        .draw_series(std::iter::once(Rectangle::new(
            [(x - BOX_HALF_WIDTH, q1), (x + BOX_HALF_WIDTH, q3)],
            color.mix(0.4).filled(),
        )))
        .map_err(render_err)?;
    chart
        .draw_series(std::iter::once(Rectangle::new(
            [(x - BOX_HALF_WIDTH, q1), (x + BOX_HALF_WIDTH, q3)],
            color.stroke_width(1),
        )))
        .map_err(render_err)?;
    chart
        .draw_series([
            PathElement::new(
                vec![(x - BOX_HALF_WIDTH, median), (x + BOX_HALF_WIDTH, median)],
                color.stroke_width(2),
            ),
            PathElement::new(vec![(x, q3), (x, hi)], color.stroke_width(1)),
            PathElement::new(vec![(x, lo), (x, q1)], color.stroke_width(1)),
        ])
        .map_err(render_err)?;
    Ok(())
}

/// Compares one feature between two groups with a Mann-Whitney U test.
/// Observations are deduplicated by group and sequence; unspecified
/// groups default to the first two encountered.
pub fn mann_whitney(
    df: &DataTable,
    feature: &str,
    group_by: &str,
    group_a: Option<&str>,
    group_b: Option<&str>,
    alternative: Alternative,
) -> Result<Figure, EngineError> {
    require_feature(df, feature)?;
    let group_col = df.find_column(group_by)?.to_string();
    let seq_col = df.find_column("sequence")?.to_string();

    // One observation per (group, sequence) pair.
    let groups = df.column_values(&group_col)?;
    let seqs = df.column_values(&seq_col)?;
    let values = df.column_values(feature)?;
    let mut seen = HashSet::new();
    let mut observations: Vec<(String, f64)> = Vec::new();
    for ((group, seq), value) in groups.iter().zip(&seqs).zip(&values) {
        let group = group_label(Some(*group));
        if let Some(v) = value.as_f64() {
            if seen.insert((group.clone(), seq.to_string())) {
                observations.push((group, v));
            }
        }
    }

    let labels: Vec<String> = observations.iter().map(|(g, _)| g.clone()).collect();
    let distinct = distinct_in_order(&labels);
    if distinct.len() < 2 && (group_a.is_none() || group_b.is_none()) {
        return Err(EngineError::NotEnoughGroups {
            group_by: group_by.to_string(),
        });
    }

    let (name_a, name_b) = match (group_a, group_b) {
        (Some(a), Some(b)) => (a.to_string(), b.to_string()),
        _ => {
            let a = group_a.map(str::to_string).unwrap_or_else(|| distinct[0].clone());
            let b = group_b
                .map(str::to_string)
                .unwrap_or_else(|| distinct.iter().find(|g| **g != a).cloned().unwrap_or_else(|| distinct[1].clone()));
            warn!(
                group_a = %a,
                group_b = %b,
                "comparison groups not specified, defaulting to the first two"
            );
            (a, b)
        }
    };

    let extract = |name: &str| -> Vec<f64> {
        observations
            .iter()
            .filter(|(g, _)| g == name)
            .map(|&(_, v)| v)
            .collect()
    };
    let sample_a = extract(&name_a);
    let sample_b = extract(&name_b);
    if sample_a.len() < 2 || sample_b.len() < 2 {
        return Err(EngineError::InsufficientSamples {
            group_a: name_a,
            count_a: sample_a.len(),
            group_b: name_b,
            count_b: sample_b.len(),
        });
    }

    let result = stats::mann_whitney_u(&sample_a, &sample_b, alternative);
    let title = format!("{feature}: {name_a} vs {name_b}");

    let (y_min, y_max) =
        numeric_range(sample_a.iter().chain(&sample_b).copied());
    let span = (y_max - y_min).max(1.0);
    let bracket_base = y_max + BOX_BRACKET_GAP * span;
    let bracket_top = bracket_base + BRACKET_HEIGHT * span;

    let mut svg = String::new();
    {
        let root =
            SVGBackend::with_string(&mut svg, (FIGURE_WIDTH, FIGURE_HEIGHT)).into_drawing_area();
        root.fill(&WHITE).map_err(render_err)?;

        let names = [name_a.clone(), name_b.clone()];
        let mut chart = ChartBuilder::on(&root)
            .caption(&title, ("sans-serif", 24))
            .margin(20)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d(
                0.0..2.0,
                (y_min - BOX_BRACKET_GAP * span)..(bracket_top + BRACKET_HEIGHT * 3.0 * span),
            )
            .map_err(render_err)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(2)
            .x_label_formatter(&|x| {
                let idx = *x as usize;
                names.get(idx).cloned().unwrap_or_default()
            })
            .y_desc(feature)
            .draw()
            .map_err(render_err)?;

        draw_box(&mut chart, 0.5, &sample_a, palette_color(0))?;
        draw_box(&mut chart, 1.5, &sample_b, palette_color(1))?;

        chart
            .draw_series(std::iter::once(PathElement::new(
                vec![
                    (0.5, bracket_base),
                    (0.5, bracket_top),
                    (1.5, bracket_top),
                    (1.5, bracket_base),
                ],
                dark_gray().stroke_width(1),
            )))
            .map_err(render_err)?;
        chart
            .draw_series(std::iter::once(Text::new(
                format!("p = {:.4}", result.p_value),
                (0.85, bracket_top + BRACKET_HEIGHT * span),
                ("sans-serif", 16),
            )))
            .map_err(render_err)?;

        root.present().map_err(render_err)?;
    }

    Ok(Figure { title, svg })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::table::Value;

    fn feature_table() -> DataTable {
        let mut df = DataTable::new(vec![
            "Sample".into(),
            "Peptide Sequence".into(),
            "Intensity".into(),
            "Group".into(),
            "GRAVY".into(),
            "Molecular weight".into(),
        ]);
        let rows: Vec<(&str, &str, f64, &str, f64, f64)> = vec![
            ("s1", "AAAA", 900.0, "CTR", 1.8, 302.3),
            ("s2", "DDDD", 1200.0, "CTR", -3.5, 478.4),
            ("s3", "KKKK", 800.0, "T1D", -3.9, 530.7),
            ("s4", "LLLL", 1500.0, "T1D", 3.8, 470.6),
            ("s5", "GGGG", 700.0, "CTR", -0.4, 246.2),
            ("s6", "PPPP", 1100.0, "T1D", -1.6, 406.5),
        ];
        for (sample, seq, intensity, group, gravy, weight) in rows {
            df.push_row(vec![
                sample.into(),
                seq.into(),
                Value::Float(intensity),
                group.into(),
                Value::Float(gravy),
                Value::Float(weight),
            ])
            .unwrap();
        }
        df
    }

    #[test]
    fn scatter_requires_computed_features() {
        let df = feature_table();
        let err = compare_features(&df, "Boman index", "GRAVY", None, None).unwrap_err();
        assert!(matches!(err, EngineError::MissingFeature { .. }));
    }

    #[test]
    fn scatter_renders_with_groups_and_threshold() {
        let df = feature_table();
        let figure =
            compare_features(&df, "Molecular weight", "GRAVY", Some("Group"), Some(750.0))
                .unwrap();
        assert!(figure.svg.contains("<svg"));
        assert_eq!(figure.title, "Molecular weight vs GRAVY");
    }

    #[test]
    fn box_plot_renders_per_group() {
        let df = feature_table();
        let figure = compare_feature(&df, "GRAVY", Some("Group"), None).unwrap();
        assert!(figure.svg.contains("<svg"));
    }

    #[test]
    fn mann_whitney_auto_picks_first_two_groups() {
        let df = feature_table();
        let figure =
            mann_whitney(&df, "GRAVY", "Group", None, None, Alternative::TwoSided).unwrap();
        assert_eq!(figure.title, "GRAVY: CTR vs T1D");
        assert!(figure.svg.contains("p ="));
    }

    #[test]
    fn mann_whitney_requires_two_observations_per_group() {
        let mut df = feature_table();
        df.push_row(vec![
            "s7".into(),
            "WWWW".into(),
            Value::Float(1000.0),
            "NEW".into(),
            Value::Float(-0.9),
            Value::Float(763.0),
        ])
        .unwrap();
        let err = mann_whitney(
            &df,
            "GRAVY",
            "Group",
            Some("CTR"),
            Some("NEW"),
            Alternative::TwoSided,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            EngineError::InsufficientSamples { count_b: 1, .. }
        ));
    }

    #[test]
    fn mann_whitney_deduplicates_repeated_sequences() {
        let mut df = feature_table();
        // The same peptide observed twice in the same group counts once.
        df.push_row(vec![
            "s8".into(),
            "AAAA".into(),
            Value::Float(950.0),
            "CTR".into(),
            Value::Float(1.8),
            Value::Float(302.3),
        ])
        .unwrap();
        let figure =
            mann_whitney(&df, "GRAVY", "Group", None, None, Alternative::TwoSided).unwrap();
        assert!(figure.svg.contains("<svg"));
    }

    #[test]
    fn single_group_without_explicit_pair_is_an_error() {
        let df = feature_table().filter_rows(|row| matches!(&row[3], Value::Text(g) if g == "CTR"));
        let err =
            mann_whitney(&df, "GRAVY", "Group", None, None, Alternative::TwoSided).unwrap_err();
        assert!(matches!(err, EngineError::NotEnoughGroups { .. }));
    }
}

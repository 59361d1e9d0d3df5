//! Raincloud figure: per-group intensity distribution as a one-sided
//! violin, a jittered scatter colored by a feature, and a slim box.

use super::{
    FIGURE_HEIGHT, FIGURE_WIDTH, Figure, dark_gray, gradient_color, group_label, palette_color,
    render_err, require_feature,
};
use crate::core::table::DataTable;
use crate::engine::error::EngineError;
use crate::engine::stats;
use plotters::prelude::*;
use rand::Rng;

const VIOLIN_WIDTH: f64 = 0.5;
const PANEL_Y_MIN: f64 = -0.8;
const PANEL_Y_MAX: f64 = 0.7;
const BOX_HALF_HEIGHT: f64 = 0.075 / 2.0;
const BOX_CENTER: f64 = -0.043;
const JITTER_LOW: f64 = -0.3;
const JITTER_HIGH: f64 = -0.1;
const KDE_POINTS: usize = 200;

/// Renders one stacked panel per group. Intensities are optionally
/// log10-scaled (non-positive values are dropped in that case) and the
/// scatter colors follow a shared scale over the feature's global range.
pub fn raincloud(
    df: &DataTable,
    feature: &str,
    group_by: Option<&str>,
    log_scaled: bool,
) -> Result<Figure, EngineError> {
    require_feature(df, feature)?;
    let intensity_col = df.find_column("intensity")?.to_string();
    let title = format!("Intensity raincloud colored by {feature}");

    let group_labels: Vec<String> = match group_by {
        Some(group_by) => {
            let col = df.find_column(group_by)?;
            df.column_values(col)?
                .iter()
                .map(|v| group_label(Some(*v)))
                .collect()
        }
        None => vec!["All".to_string(); df.n_rows()],
    };

    let intensities = df.column_values(&intensity_col)?;
    let features = df.column_values(feature)?;
    let mut points: Vec<(String, f64, f64)> = Vec::new();
    for ((group, intensity), feat) in group_labels.iter().zip(&intensities).zip(&features) {
        let (Some(intensity), Some(feat)) = (intensity.as_f64(), feat.as_f64()) else {
            continue;
        };
        let intensity = if log_scaled {
            if intensity <= 0.0 {
                continue;
            }
            intensity.log10()
        } else {
            intensity
        };
        points.push((group.clone(), intensity, feat));
    }

    let mut groups: Vec<String> = Vec::new();
    for (group, _, _) in &points {
        if !groups.contains(group) {
            groups.push(group.clone());
        }
    }

    let x_min = points.iter().map(|&(_, x, _)| x).fold(f64::INFINITY, f64::min);
    let x_max = points
        .iter()
        .map(|&(_, x, _)| x)
        .fold(f64::NEG_INFINITY, f64::max);
    let (x_min, x_max) = if x_min > x_max {
        (0.0, 1.0)
    } else if x_min == x_max {
        (x_min - 0.5, x_max + 0.5)
    } else {
        let pad = (x_max - x_min) * 0.05;
        (x_min - pad, x_max + pad)
    };

    let feat_min = points.iter().map(|&(_, _, f)| f).fold(f64::INFINITY, f64::min);
    let feat_max = points
        .iter()
        .map(|&(_, _, f)| f)
        .fold(f64::NEG_INFINITY, f64::max);
    let feat_span = if feat_max > feat_min {
        feat_max - feat_min
    } else {
        1.0
    };

    let x_desc = if log_scaled {
        "log10(Intensity)"
    } else {
        "Intensity"
    };

    let mut rng = rand::thread_rng();
    let mut svg = String::new();
    {
        let root =
            SVGBackend::with_string(&mut svg, (FIGURE_WIDTH, FIGURE_HEIGHT)).into_drawing_area();
        root.fill(&WHITE).map_err(render_err)?;
        let body = root.titled(&title, ("sans-serif", 24)).map_err(render_err)?;

        let panels = body.split_evenly((groups.len().max(1), 1));
        for (i, (panel, group)) in panels.iter().zip(&groups).enumerate() {
            let values: Vec<(f64, f64)> = points
                .iter()
                .filter(|(g, _, _)| g == group)
                .map(|&(_, x, f)| (x, f))
                .collect();
            let xs: Vec<f64> = values.iter().map(|&(x, _)| x).collect();

            let mut chart = ChartBuilder::on(panel)
                .caption(group, ("sans-serif", 16))
                .margin(5)
                .x_label_area_size(30)
                .y_label_area_size(40)
                .build_cartesian_2d(x_min..x_max, PANEL_Y_MIN..PANEL_Y_MAX)
                .map_err(render_err)?;

            chart
                .configure_mesh()
                .disable_y_mesh()
                .disable_y_axis()
                .x_desc(x_desc)
                .draw()
                .map_err(render_err)?;

            // One-sided violin above the axis line.
            let kde = stats::gaussian_kde(&xs, KDE_POINTS);
            let peak = kde
                .iter()
                .map(|&(_, d)| d)
                .fold(f64::NEG_INFINITY, f64::max);
            if peak > 0.0 {
                let scale = VIOLIN_WIDTH / peak;
                let mut outline: Vec<(f64, f64)> =
                    kde.iter().map(|&(x, d)| (x, d * scale)).collect();
                outline.push((kde[kde.len() - 1].0, 0.0));
                outline.push((kde[0].0, 0.0));
                chart
                    .draw_series(std::iter::once(Polygon::new(
                        outline,
                        palette_color(i).mix(0.5).filled(),
                    )))
                    .map_err(render_err)?;
            }

            // Jittered scatter below, colored by the feature value.
            chart
                .draw_series(values.iter().map(|&(x, feat)| {
                    let y = rng.gen_range(JITTER_LOW..JITTER_HIGH);
                    let t = (feat - feat_min) / feat_span;
                    Circle::new((x, y), 3, gradient_color(t).filled())
                }))
                .map_err(render_err)?;

            // Slim box between violin and scatter.
            if !xs.is_empty() {
                let (q1, median, q3) = stats::quartiles(&xs);
                let lo = xs.iter().copied().fold(f64::INFINITY, f64::min);
                let hi = xs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                chart
                    .draw_series(std::iter::once(Rectangle::new(
                        [
                            (q1, BOX_CENTER - BOX_HALF_HEIGHT),
                            (q3, BOX_CENTER + BOX_HALF_HEIGHT),
                        ],
                        dark_gray().mix(0.6).filled(),
                    )))
                    .map_err(render_err)?;
                chart
                    .draw_series([
                        PathElement::new(
                            vec![
                                (median, BOX_CENTER - BOX_HALF_HEIGHT),
                                (median, BOX_CENTER + BOX_HALF_HEIGHT),
                            ],
                            WHITE.stroke_width(2),
                        ),
                        PathElement::new(
                            vec![(lo, BOX_CENTER), (q1, BOX_CENTER)],
                            dark_gray().stroke_width(1),
                        ),
                        PathElement::new(
                            vec![(q3, BOX_CENTER), (hi, BOX_CENTER)],
                            dark_gray().stroke_width(1),
                        ),
                    ])
                    .map_err(render_err)?;
            }
        }

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
            "Peptide Sequence".into(),
            "Intensity".into(),
            "Group".into(),
            "GRAVY".into(),
        ]);
        let rows: Vec<(&str, f64, &str, f64)> = vec![
            ("AAAA", 900.0, "CTR", 1.8),
            ("DDDD", 1200.0, "CTR", -3.5),
            ("KKKK", 800.0, "T1D", -3.9),
            ("LLLL", 1500.0, "T1D", 3.8),
            ("GGGG", 700.0, "CTR", -0.4),
        ];
        for (seq, intensity, group, gravy) in rows {
            df.push_row(vec![
                seq.into(),
                Value::Float(intensity),
                group.into(),
                Value::Float(gravy),
            ])
            .unwrap();
        }
        df
    }

    #[test]
    fn raincloud_renders_one_panel_per_group() {
        let figure = raincloud(&feature_table(), "GRAVY", Some("Group"), false).unwrap();
        assert!(figure.svg.contains("<svg"));
        assert!(figure.svg.contains("CTR"));
        assert!(figure.svg.contains("T1D"));
    }

    #[test]
    fn log_scaling_drops_non_positive_intensities() {
        let mut df = feature_table();
        df.push_row(vec![
            "PPPP".into(),
            Value::Float(0.0),
            "CTR".into(),
            Value::Float(-1.6),
        ])
        .unwrap();
        assert!(raincloud(&df, "GRAVY", Some("Group"), true).is_ok());
    }

    #[test]
    fn raincloud_requires_the_feature_column() {
        let err = raincloud(&feature_table(), "Boman index", None, false).unwrap_err();
        assert!(matches!(err, EngineError::MissingFeature { .. }));
    }
}

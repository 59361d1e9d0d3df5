//! Per-position and per-pH line figures for a single sequence.

use super::{FIGURE_HEIGHT, FIGURE_WIDTH, Figure, dark_gray, palette_color, render_err};
use crate::core::constants::HYDROPATHY_INDEX;
use crate::core::descriptors::net_charge;
use crate::core::sequence::validate_non_empty;
use crate::engine::error::EngineError;
use plotters::prelude::*;

const TITRATION_PH_STEP: f64 = 0.1;
const TITRATION_PH_STEPS: usize = 141;
/// A pH matches an integer charge when the charge is within this
/// absolute distance of it.
const CROSSING_TOLERANCE: f64 = 0.05;

/// Kyte-Doolittle hydropathy per residue position, anchored with a
/// baseline point at position zero and a dashed neutral line.
pub fn hydropathy_profile(seq: &str) -> Result<Figure, EngineError> {
    validate_non_empty(seq, "hydropathy profile")?;
    let title = "Hydropathy profile".to_string();

    let mut points = vec![(0.0, 0.0)];
    for (i, aa) in seq.chars().enumerate() {
        if let Some(&h) = HYDROPATHY_INDEX.get(&aa) {
            points.push(((i + 1) as f64, h));
        }
    }
    let y_min = points.iter().map(|&(_, y)| y).fold(f64::INFINITY, f64::min) - 0.5;
    let y_max = points
        .iter()
        .map(|&(_, y)| y)
        .fold(f64::NEG_INFINITY, f64::max)
        + 0.5;
    let x_max = (points.len() - 1) as f64;

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
            .build_cartesian_2d(0.0..x_max, y_min..y_max)
            .map_err(render_err)?;

        chart
            .configure_mesh()
            .x_desc("Position")
            .y_desc("Hydropathy")
            .draw()
            .map_err(render_err)?;

        chart
            .draw_series(DashedLineSeries::new(
                [(0.0, 0.0), (x_max, 0.0)],
                5,
                5,
                dark_gray().stroke_width(1),
            ))
            .map_err(render_err)?;
        chart
            .draw_series(LineSeries::new(
                points.iter().copied(),
                palette_color(1).stroke_width(2),
            ))
            .map_err(render_err)?;
        chart
            .draw_series(
                points
                    .iter()
                    .map(|&p| Circle::new(p, 3, palette_color(1).filled())),
            )
            .map_err(render_err)?;

        root.present().map_err(render_err)?;
    }

    Ok(Figure { title, svg })
}

/// Net charge over the full pH range, with every integer charge level
/// the curve passes annotated at the median matching pH.
pub fn titration_curve(seq: &str) -> Result<Figure, EngineError> {
    validate_non_empty(seq, "titration curve")?;
    let title = "Titration curve".to_string();

    let curve: Vec<(f64, f64)> = (0..TITRATION_PH_STEPS)
        .map(|i| {
            let ph = i as f64 * TITRATION_PH_STEP;
            (ph, net_charge(seq, ph))
        })
        .collect();

    let min_charge = curve.iter().map(|&(_, c)| c).fold(f64::INFINITY, f64::min);
    let max_charge = curve
        .iter()
        .map(|&(_, c)| c)
        .fold(f64::NEG_INFINITY, f64::max);

    // Median matching pH per integer charge level the curve touches.
    let mut crossings: Vec<(f64, f64)> = Vec::new();
    let mut level = min_charge.ceil();
    while level <= max_charge.floor() {
        let matching: Vec<f64> = curve
            .iter()
            .filter(|&&(_, c)| (c - level).abs() < CROSSING_TOLERANCE)
            .map(|&(ph, _)| ph)
            .collect();
        if !matching.is_empty() {
            crossings.push((matching[matching.len() / 2], level));
        }
        level += 1.0;
    }

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
            .build_cartesian_2d(0.0..14.0, (min_charge - 0.5)..(max_charge + 0.5))
            .map_err(render_err)?;

        chart
            .configure_mesh()
            .x_desc("pH")
            .y_desc("Net charge")
            .draw()
            .map_err(render_err)?;

        chart
            .draw_series(DashedLineSeries::new(
                [(0.0, 0.0), (14.0, 0.0)],
                5,
                5,
                dark_gray().stroke_width(1),
            ))
            .map_err(render_err)?;
        chart
            .draw_series(LineSeries::new(
                curve.iter().copied(),
                palette_color(0).stroke_width(2),
            ))
            .map_err(render_err)?;

        chart
            .draw_series(
                crossings
                    .iter()
                    .map(|&p| Circle::new(p, 4, palette_color(1).filled())),
            )
            .map_err(render_err)?;
        chart
            .draw_series(crossings.iter().map(|&(ph, level)| {
                Text::new(
                    format!("{level:+.0} at pH {ph:.1}"),
                    (ph + 0.2, level),
                    ("sans-serif", 14),
                )
            }))
            .map_err(render_err)?;

        root.present().map_err(render_err)?;
    }

    Ok(Figure { title, svg })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hydropathy_profile_renders_svg() {
        let figure = hydropathy_profile("PEPTIDE").unwrap();
        assert_eq!(figure.title, "Hydropathy profile");
        assert!(figure.svg.contains("<svg"));
    }

    #[test]
    fn hydropathy_profile_rejects_empty_input() {
        assert!(hydropathy_profile("").is_err());
    }

    #[test]
    fn titration_curve_renders_for_charged_sequences() {
        let figure = titration_curve("DDKKRE").unwrap();
        assert!(figure.svg.contains("<svg"));
        // The zero-charge crossing is annotated.
        assert!(figure.svg.contains("at pH"));
    }

    #[test]
    fn crossing_detection_finds_the_neutral_point() {
        // A sequence with both acidic and basic residues crosses zero.
        let curve: Vec<(f64, f64)> = (0..TITRATION_PH_STEPS)
            .map(|i| {
                let ph = i as f64 * TITRATION_PH_STEP;
                (ph, net_charge("DDKKRE", ph))
            })
            .collect();
        assert!(
            curve
                .iter()
                .any(|&(_, c)| c.abs() < CROSSING_TOLERANCE)
        );
    }
}

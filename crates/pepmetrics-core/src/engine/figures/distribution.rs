//! Composition figures: amino-acid distribution and residue
//! classification.

use super::{FIGURE_HEIGHT, FIGURE_WIDTH, Figure, palette_color, render_err};
use crate::core::constants::{AA_WEIGHTS, HYDROPATHY_INDEX};
use crate::core::features::FeatureError;
use crate::core::features::sequence::{Taxonomy, aa_frequency, classification};
use crate::engine::error::EngineError;
use plotters::prelude::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Bar ordering of the amino-acid distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Ordering {
    #[default]
    #[serde(rename = "frequency")]
    Frequency,
    #[serde(rename = "alphabetical")]
    Alphabetical,
    /// Side-by-side panels per chemical class.
    #[serde(rename = "classes chemical")]
    ClassesChemical,
    /// Side-by-side panels per charge class.
    #[serde(rename = "classes charge")]
    ClassesCharge,
    #[serde(rename = "hydropathy")]
    Hydropathy,
    #[serde(rename = "weight")]
    Weight,
}

impl Ordering {
    pub fn label(self) -> &'static str {
        match self {
            Self::Frequency => "frequency",
            Self::Alphabetical => "alphabetical",
            Self::ClassesChemical => "classes chemical",
            Self::ClassesCharge => "classes charge",
            Self::Hydropathy => "hydropathy",
            Self::Weight => "weight",
        }
    }
}

impl FromStr for Ordering {
    type Err = FeatureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "frequency" => Ok(Self::Frequency),
            "alphabetical" => Ok(Self::Alphabetical),
            "classes chemical" => Ok(Self::ClassesChemical),
            "classes charge" => Ok(Self::ClassesCharge),
            "hydropathy" => Ok(Self::Hydropathy),
            "weight" => Ok(Self::Weight),
            other => Err(FeatureError::UnknownOption {
                parameter: "distribution ordering",
                value: other.to_string(),
            }),
        }
    }
}

fn draw_bars(
    area: &DrawingArea<SVGBackend<'_>, plotters::coord::Shift>,
    caption: Option<&str>,
    entries: &[(char, usize)],
    max_count: usize,
    color_offset: usize,
) -> Result<(), EngineError> {
    let labels: Vec<char> = entries.iter().map(|&(aa, _)| aa).collect();
    let mut builder = ChartBuilder::on(area);
    builder
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(40);
    if let Some(caption) = caption {
        builder.caption(caption, ("sans-serif", 16));
    }
    let mut chart = builder
        .build_cartesian_2d(0.0..entries.len() as f64, 0.0..(max_count + 1) as f64)
        .map_err(render_err)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(entries.len())
        .x_label_formatter(&|x| {
            let idx = *x as usize;
            labels
                .get(idx)
                .map(char::to_string)
                .unwrap_or_default()
        })
        .y_desc("Count")
        .draw()
        .map_err(render_err)?;

    chart
        .draw_series(entries.iter().enumerate().map(|(i, &(_, count))| {
            Rectangle::new(
                [(i as f64 + 0.1, 0.0), (i as f64 + 0.9, count as f64)],
                palette_color(color_offset).filled(),
            )
        }))
        .map_err(render_err)?;
    Ok(())
}

/// Amino-acid occurrence counts as a bar chart. Class orderings render
/// one panel per class, panel widths proportional to the number of bars
/// shown; classes without any bar are omitted. `show_all` keeps
/// zero-count residues visible.
pub fn aa_distribution(
    seq: &str,
    order_by: Ordering,
    show_all: bool,
) -> Result<Figure, EngineError> {
    let freq = aa_frequency(seq)?;
    let title = "Amino acid distribution".to_string();

    // Layout is decided before any drawing: visible bars per panel for
    // class orderings, one sorted panel otherwise. Absent classes drop
    // out and panel widths follow bar counts.
    let panels: Vec<(Option<&str>, Vec<(char, usize)>)> = match order_by {
        Ordering::ClassesChemical | Ordering::ClassesCharge => {
            let taxonomy = if order_by == Ordering::ClassesChemical {
                Taxonomy::Chemical
            } else {
                Taxonomy::Charge
            };
            taxonomy
                .classes()
                .iter()
                .filter_map(|(class, members)| {
                    let entries: Vec<(char, usize)> = members
                        .iter()
                        .map(|&aa| (aa, freq[&aa]))
                        .filter(|&(_, count)| show_all || count > 0)
                        .collect();
                    (!entries.is_empty()).then_some((Some(*class), entries))
                })
                .collect()
        }
        _ => {
            let mut entries: Vec<(char, usize)> = freq
                .iter()
                .map(|(&aa, &count)| (aa, count))
                .filter(|&(_, count)| show_all || count > 0)
                .collect();
            match order_by {
                Ordering::Frequency => {
                    entries.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
                }
                Ordering::Alphabetical => entries.sort_by_key(|&(aa, _)| aa),
                Ordering::Hydropathy => {
                    entries
                        .sort_by(|a, b| HYDROPATHY_INDEX[&a.0].total_cmp(&HYDROPATHY_INDEX[&b.0]));
                }
                Ordering::Weight => {
                    entries.sort_by(|a, b| AA_WEIGHTS[&a.0].total_cmp(&AA_WEIGHTS[&b.0]));
                }
                Ordering::ClassesChemical | Ordering::ClassesCharge => unreachable!(),
            }
            if entries.is_empty() {
                Vec::new()
            } else {
                vec![(None, entries)]
            }
        }
    };
    let total_bars: usize = panels.iter().map(|(_, e)| e.len()).sum();
    let max_count = freq.values().copied().max().unwrap_or(0);

    let mut svg = String::new();
    {
        let root =
            SVGBackend::with_string(&mut svg, (FIGURE_WIDTH, FIGURE_HEIGHT)).into_drawing_area();
        root.fill(&WHITE).map_err(render_err)?;
        let body = root.titled(&title, ("sans-serif", 24)).map_err(render_err)?;

        if total_bars > 0 {
            let mut breakpoints = Vec::new();
            let mut acc = 0usize;
            for (_, entries) in &panels[..panels.len() - 1] {
                acc += entries.len();
                breakpoints.push((FIGURE_WIDTH as f64 * acc as f64 / total_bars as f64) as u32);
            }
            let areas = body.split_by_breakpoints(&breakpoints[..], &[] as &[u32]);
            for (i, (area, (class, entries))) in areas.iter().zip(&panels).enumerate() {
                draw_bars(area, *class, entries, max_count, i)?;
            }
        }

        root.present().map_err(render_err)?;
    }

    Ok(Figure { title, svg })
}

/// Residue counts per class of the chosen taxonomy as a bar chart.
pub fn classification_chart(seq: &str, taxonomy: Taxonomy) -> Result<Figure, EngineError> {
    let classes = classification(seq, taxonomy)?;
    let title = format!("Classification ({})", taxonomy.label());

    let mut svg = String::new();
    {
        let root =
            SVGBackend::with_string(&mut svg, (FIGURE_WIDTH, FIGURE_HEIGHT)).into_drawing_area();
        root.fill(&WHITE).map_err(render_err)?;

        let max_count = classes.iter().map(|&(_, c)| c).max().unwrap_or(0);
        let labels: Vec<&str> = classes.iter().map(|&(c, _)| c).collect();

        let mut chart = ChartBuilder::on(&root)
            .caption(&title, ("sans-serif", 24))
            .margin(20)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d(0.0..classes.len() as f64, 0.0..(max_count + 1) as f64)
            .map_err(render_err)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(classes.len())
            .x_label_formatter(&|x| {
                let idx = *x as usize;
                labels.get(idx).map(|s| (*s).to_string()).unwrap_or_default()
            })
            .y_desc("Count")
            .draw()
            .map_err(render_err)?;

        chart
            .draw_series(classes.iter().enumerate().map(|(i, &(_, count))| {
                Rectangle::new(
                    [(i as f64 + 0.1, 0.0), (i as f64 + 0.9, count as f64)],
                    palette_color(i).filled(),
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
    fn distribution_renders_for_every_ordering() {
        for order in [
            Ordering::Frequency,
            Ordering::Alphabetical,
            Ordering::ClassesChemical,
            Ordering::ClassesCharge,
            Ordering::Hydropathy,
            Ordering::Weight,
        ] {
            let figure = aa_distribution("PEPTIDE", order, false).unwrap();
            assert!(figure.svg.contains("<svg"), "{:?}", order);
        }
    }

    #[test]
    fn show_all_keeps_zero_count_bars() {
        let sparse = aa_distribution("AAA", Ordering::Alphabetical, false).unwrap();
        let full = aa_distribution("AAA", Ordering::Alphabetical, true).unwrap();
        // The full variant draws 20 labelled bars, the sparse one just A.
        assert!(full.svg.len() > sparse.svg.len());
    }

    #[test]
    fn classification_chart_renders_for_both_taxonomies() {
        assert!(classification_chart("PEPTIDE", Taxonomy::Chemical).is_ok());
        assert!(classification_chart("PEPTIDE", Taxonomy::Charge).is_ok());
    }

    #[test]
    fn ordering_labels_round_trip_through_from_str() {
        for order in [
            Ordering::Frequency,
            Ordering::Alphabetical,
            Ordering::ClassesChemical,
            Ordering::ClassesCharge,
            Ordering::Hydropathy,
            Ordering::Weight,
        ] {
            assert_eq!(order.label().parse::<Ordering>().unwrap(), order);
        }
        assert!("molar".parse::<Ordering>().is_err());
    }

    #[test]
    fn invalid_sequences_are_rejected_before_rendering() {
        assert!(aa_distribution("PEP#TIDE", Ordering::Frequency, false).is_err());
    }
}

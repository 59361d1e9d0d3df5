//! The `plots` command: render the selected figures and write one SVG
//! file per figure into the output directory.

use crate::cli::PlotsArgs;
use crate::config;
use crate::data;
use crate::error::{CliError, Result};
use pepmetrics::engine::features::FeatureParams;
use pepmetrics::engine::figures::Figure;
use pepmetrics::workflows::Calculator;
use std::fs;
use std::path::Path;
use tracing::info;

/// Figure titles become filesystem-safe snake_case SVG names.
fn file_name(title: &str) -> String {
    let mut name: String = title
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect();
    while name.contains("__") {
        name = name.replace("__", "_");
    }
    format!("{}.svg", name.trim_matches('_'))
}

fn write_figures(dir: &Path, figures: &[Figure]) -> Result<()> {
    for figure in figures {
        let path = dir.join(file_name(&figure.title));
        fs::write(&path, &figure.svg)?;
        info!(path = %path.display(), title = %figure.title, "figure written");
    }
    Ok(())
}

pub fn run(args: PlotsArgs) -> Result<()> {
    let plot_params = config::plot_params(&args)?;
    // Dataset plots read feature columns, so the file's feature selection
    // applies; with no file every feature is computed.
    let feature_params = {
        let from_file = config::load(args.config.as_deref())?.features;
        if from_file == FeatureParams::default() {
            FeatureParams::all()
        } else {
            from_file
        }
    };

    let mut calc = Calculator::new();
    calc.set_feature_params(feature_params);
    calc.set_plot_params(plot_params);
    if let Some(path) = &args.dataset {
        calc.set_dataset(data::load_table(path)?);
    }
    if let Some(path) = &args.metadata {
        calc.set_metadata(data::load_table(path)?);
    }
    if let Some(seq) = &args.seq {
        calc.set_seq(seq)?;
    }

    let (seq_figures, data_figures) = match (&args.seq, &args.dataset) {
        (Some(_), Some(_)) => calc.get_plots()?,
        (Some(_), None) => (calc.get_peptide_plots()?, Vec::new()),
        (None, Some(_)) => (Vec::new(), calc.get_dataset_plots()?),
        (None, None) => {
            return Err(CliError::Argument(
                "provide a dataset (--dataset) or a sequence (--seq)".to_string(),
            ));
        }
    };

    fs::create_dir_all(&args.output_dir)?;
    write_figures(&args.output_dir, &seq_figures)?;
    write_figures(&args.output_dir, &data_figures)?;
    info!(
        figures = seq_figures.len() + data_figures.len(),
        dir = %args.output_dir.display(),
        "all figures written"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn figure_titles_become_safe_file_names() {
        assert_eq!(file_name("Amino acid distribution"), "amino_acid_distribution.svg");
        assert_eq!(file_name("GRAVY: CTR vs T1D"), "gravy_ctr_vs_t1d.svg");
        assert_eq!(
            file_name("Intensity raincloud colored by GRAVY"),
            "intensity_raincloud_colored_by_gravy.svg"
        );
    }

    #[test]
    fn command_end_to_end_writes_svg_files() {
        use std::io::Write;

        let mut dataset = tempfile::NamedTempFile::new().unwrap();
        writeln!(dataset, "Sample,Peptide Sequence,Intensity").unwrap();
        for (sample, seq, intensity) in [
            ("s1", "AAAA", 900.0),
            ("s2", "DDDD", 1200.0),
            ("s3", "KKKK", 800.0),
            ("s4", "LLLL", 1500.0),
        ] {
            writeln!(dataset, "{sample},{seq},{intensity}").unwrap();
        }
        let out = tempfile::tempdir().unwrap();

        let args = PlotsArgs {
            dataset: Some(dataset.path().to_path_buf()),
            metadata: None,
            seq: Some("PEPTIDE".into()),
            output_dir: out.path().to_path_buf(),
            config: None,
            all: false,
            plots: vec!["hydropathy_profile".into(), "compare_features".into()],
            order_by: None,
            show_all: false,
            classify_by: None,
            feature_a: Some("Molecular weight".into()),
            feature_b: Some("GRAVY".into()),
            group_by: None,
            intensity_threshold: None,
            log_scaled: false,
            group_a: None,
            group_b: None,
            alternative: None,
        };
        run(args).unwrap();

        assert!(out.path().join("hydropathy_profile.svg").exists());
        assert!(out.path().join("molecular_weight_vs_gravy.svg").exists());
    }
}

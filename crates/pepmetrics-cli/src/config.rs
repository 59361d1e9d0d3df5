//! Parameter resolution: TOML parameter files merged with command-line
//! overrides, flags taking precedence.

use crate::cli::{FeaturesArgs, PlotsArgs};
use crate::error::{CliError, Result};
use pepmetrics::engine::features::{FEATURES, FeatureParams};
use pepmetrics::engine::plots::{PLOTS, PlotParams};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ParamsFile {
    pub features: FeatureParams,
    pub plots: PlotParams,
}

pub fn load(path: Option<&Path>) -> Result<ParamsFile> {
    let Some(path) = path else {
        return Ok(ParamsFile::default());
    };
    let text = std::fs::read_to_string(path).map_err(|e| CliError::FileParsing {
        path: path.to_path_buf(),
        source: e.into(),
    })?;
    toml::from_str(&text).map_err(|e| CliError::FileParsing {
        path: path.to_path_buf(),
        source: anyhow::anyhow!(e),
    })
}

fn select_feature(params: &mut FeatureParams, key: &str) -> Result<()> {
    match key {
        "molecular_weight" => params.molecular_weight = true,
        "three_letter_code" => params.three_letter_code = true,
        "molecular_formula" => params.molecular_formula = true,
        "seq_length" => params.seq_length = true,
        "aromaticity" => params.aromaticity = true,
        "aliphatic_index" => params.aliphatic_index = true,
        "charge_at_ph" => params.charge_at_ph = true,
        "charge_density" => params.charge_density = true,
        "isoelectric_point" => params.isoelectric_point = true,
        "gravy" => params.gravy = true,
        "extinction_coefficient" => params.extinction_coefficient = true,
        "boman_index" => params.boman_index = true,
        "instability_index" => params.instability_index = true,
        other => {
            return Err(CliError::Argument(format!(
                "unknown feature key '{other}', expected one of: {}",
                FEATURES
                    .iter()
                    .map(|s| s.key)
                    .collect::<Vec<_>>()
                    .join(", ")
            )));
        }
    }
    Ok(())
}

fn select_plot(params: &mut PlotParams, key: &str) -> Result<()> {
    match key {
        "aa_distribution" => params.aa_distribution = true,
        "hydropathy_profile" => params.hydropathy_profile = true,
        "classification" => params.classification = true,
        "titration_curve" => params.titration_curve = true,
        "compare_features" => params.compare_features = true,
        "compare_feature" => params.compare_feature = true,
        "raincloud" => params.raincloud = true,
        "mann_whitney" => params.mann_whitney = true,
        other => {
            return Err(CliError::Argument(format!(
                "unknown plot key '{other}', expected one of: {}",
                PLOTS.iter().map(|s| s.key).collect::<Vec<_>>().join(", ")
            )));
        }
    }
    Ok(())
}

/// Feature parameters from the optional TOML file with flag overrides
/// applied on top.
pub fn feature_params(args: &FeaturesArgs) -> Result<FeatureParams> {
    let mut params = load(args.config.as_deref())?.features;

    if args.all {
        params.select_all = true;
    }
    for key in &args.features {
        select_feature(&mut params, key)?;
    }
    if let Some(ph) = args.ph {
        params.charge_at_ph_level = ph;
    }
    if let Some(ph) = args.density_ph {
        params.charge_density_level = ph;
    }
    if let Some(method) = &args.pi_method {
        params.isoelectric_point_method = method.parse()?;
    }
    if let Some(path) = &args.pi_model {
        params.pi_model_path = Some(path.clone());
    }
    if args.oxidized {
        params.extinction_coefficient_oxidized = true;
    }
    Ok(params)
}

/// Plot parameters from the optional TOML file with flag overrides
/// applied on top. Options shared by several plots (grouping column,
/// intensity threshold, feature labels) fan out to every plot that
/// takes them.
pub fn plot_params(args: &PlotsArgs) -> Result<PlotParams> {
    let mut params = load(args.config.as_deref())?.plots;

    if args.all {
        params.select_all = true;
    }
    for key in &args.plots {
        select_plot(&mut params, key)?;
    }
    if let Some(order) = &args.order_by {
        params.aa_distribution_order_by = order.parse()?;
    }
    if args.show_all {
        params.aa_distribution_show_all = true;
    }
    if let Some(taxonomy) = &args.classify_by {
        params.classification_classify_by = taxonomy.parse()?;
    }
    if let Some(feature) = &args.feature_a {
        params.compare_features_a = Some(feature.clone());
        params.compare_feature_a = Some(feature.clone());
        params.raincloud_feature = Some(feature.clone());
        params.mann_whitney_feature = Some(feature.clone());
    }
    if let Some(feature) = &args.feature_b {
        params.compare_features_b = Some(feature.clone());
    }
    if let Some(group_by) = &args.group_by {
        params.compare_features_group_by = Some(group_by.clone());
        params.compare_feature_group_by = Some(group_by.clone());
        params.raincloud_group_by = Some(group_by.clone());
        params.mann_whitney_group_by = Some(group_by.clone());
    }
    if let Some(threshold) = args.intensity_threshold {
        params.compare_features_intensity_threshold = Some(threshold);
        params.compare_feature_intensity_threshold = Some(threshold);
    }
    if args.log_scaled {
        params.raincloud_log_scaled = true;
    }
    if let Some(group) = &args.group_a {
        params.mann_whitney_group_a = Some(group.clone());
    }
    if let Some(group) = &args.group_b {
        params.mann_whitney_group_b = Some(group.clone());
    }
    if let Some(alternative) = &args.alternative {
        params.mann_whitney_alternative = alternative.parse()?;
    }
    Ok(params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pepmetrics::core::features::physicochemical::PiMethod;
    use pepmetrics::engine::stats::Alternative;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn params_file_parses_both_sections() {
        let file = write_config(
            r#"
[features]
gravy = true
charge_at_ph = true
charge_at_ph_level = 5.0
isoelectric_point_method = "model"

[plots]
raincloud = true
raincloud_log_scaled = true
mann_whitney_alternative = "greater"
"#,
        );
        let params = load(Some(file.path())).unwrap();
        assert!(params.features.gravy);
        assert_eq!(params.features.charge_at_ph_level, 5.0);
        assert_eq!(params.features.isoelectric_point_method, PiMethod::Model);
        assert!(params.plots.raincloud);
        assert!(params.plots.raincloud_log_scaled);
        assert_eq!(params.plots.mann_whitney_alternative, Alternative::Greater);
    }

    #[test]
    fn missing_config_yields_defaults() {
        let params = load(None).unwrap();
        assert_eq!(params, ParamsFile::default());
    }

    #[test]
    fn cli_flags_override_file_values() {
        let file = write_config("[features]\ncharge_at_ph_level = 3.0\n");
        let args = FeaturesArgs {
            dataset: None,
            metadata: None,
            seq: Some("PEPTIDE".into()),
            output: None,
            config: Some(file.path().to_path_buf()),
            all: false,
            features: vec!["charge_at_ph".into()],
            ph: Some(9.0),
            density_ph: None,
            pi_method: None,
            pi_model: None,
            oxidized: false,
        };
        let params = feature_params(&args).unwrap();
        assert!(params.charge_at_ph);
        assert_eq!(params.charge_at_ph_level, 9.0);
    }

    #[test]
    fn unknown_selection_keys_are_rejected_with_the_valid_set() {
        let mut params = FeatureParams::default();
        let err = select_feature(&mut params, "bomann").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("bomann"));
        assert!(msg.contains("boman_index"));

        let mut plots = PlotParams::default();
        assert!(select_plot(&mut plots, "rainclouds").is_err());
    }

    #[test]
    fn group_options_fan_out_to_every_grouped_plot() {
        let args = PlotsArgs {
            dataset: None,
            metadata: None,
            seq: None,
            output_dir: "out".into(),
            config: None,
            all: true,
            plots: vec![],
            order_by: None,
            show_all: false,
            classify_by: None,
            feature_a: None,
            feature_b: None,
            group_by: Some("Group".into()),
            intensity_threshold: Some(500.0),
            log_scaled: false,
            group_a: None,
            group_b: None,
            alternative: None,
        };
        let params = plot_params(&args).unwrap();
        assert_eq!(params.compare_features_group_by.as_deref(), Some("Group"));
        assert_eq!(params.raincloud_group_by.as_deref(), Some("Group"));
        assert_eq!(params.mann_whitney_group_by.as_deref(), Some("Group"));
        assert_eq!(params.compare_feature_intensity_threshold, Some(500.0));
    }
}

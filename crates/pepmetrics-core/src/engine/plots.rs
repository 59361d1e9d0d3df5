//! Plot registry and the dispatch engine that renders selected figures
//! for a sequence of interest and a feature-annotated dataset.

use super::error::EngineError;
use super::figures::distribution::{self, Ordering};
use super::figures::profile;
use super::figures::{Figure, comparison, raincloud};
use super::stats::Alternative;
use crate::core::features::sequence::Taxonomy;
use crate::core::table::DataTable;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Whether a plot describes one sequence or a whole dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlotScope {
    Sequence,
    Dataset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlotId {
    AaDistribution,
    HydropathyProfile,
    Classification,
    TitrationCurve,
    CompareFeatures,
    CompareFeature,
    Raincloud,
    MannWhitney,
}

#[derive(Debug, Clone, Copy)]
pub struct PlotSpec {
    pub id: PlotId,
    pub key: &'static str,
    pub label: &'static str,
    pub scope: PlotScope,
}

pub static PLOTS: &[PlotSpec] = &[
    PlotSpec {
        id: PlotId::AaDistribution,
        key: "aa_distribution",
        label: "Amino acid distribution",
        scope: PlotScope::Sequence,
    },
    PlotSpec {
        id: PlotId::HydropathyProfile,
        key: "hydropathy_profile",
        label: "Hydropathy profile",
        scope: PlotScope::Sequence,
    },
    PlotSpec {
        id: PlotId::Classification,
        key: "classification",
        label: "Classification",
        scope: PlotScope::Sequence,
    },
    PlotSpec {
        id: PlotId::TitrationCurve,
        key: "titration_curve",
        label: "Titration curve",
        scope: PlotScope::Sequence,
    },
    PlotSpec {
        id: PlotId::CompareFeatures,
        key: "compare_features",
        label: "Compare features",
        scope: PlotScope::Dataset,
    },
    PlotSpec {
        id: PlotId::CompareFeature,
        key: "compare_feature",
        label: "Compare feature",
        scope: PlotScope::Dataset,
    },
    PlotSpec {
        id: PlotId::Raincloud,
        key: "raincloud",
        label: "Raincloud",
        scope: PlotScope::Dataset,
    },
    PlotSpec {
        id: PlotId::MannWhitney,
        key: "mann_whitney",
        label: "Mann-Whitney U",
        scope: PlotScope::Dataset,
    },
];

/// Plot selection flags and per-plot options. Feature-valued options
/// fall back to GRAVY and grouping options to a "group" keyword column
/// when left unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotParams {
    pub select_all: bool,
    pub aa_distribution: bool,
    pub aa_distribution_order_by: Ordering,
    pub aa_distribution_show_all: bool,
    pub hydropathy_profile: bool,
    pub classification: bool,
    pub classification_classify_by: Taxonomy,
    pub titration_curve: bool,
    pub compare_features: bool,
    pub compare_features_a: Option<String>,
    pub compare_features_b: Option<String>,
    pub compare_features_group_by: Option<String>,
    pub compare_features_intensity_threshold: Option<f64>,
    pub compare_feature: bool,
    pub compare_feature_a: Option<String>,
    pub compare_feature_group_by: Option<String>,
    pub compare_feature_intensity_threshold: Option<f64>,
    pub raincloud: bool,
    pub raincloud_feature: Option<String>,
    pub raincloud_group_by: Option<String>,
    pub raincloud_log_scaled: bool,
    pub mann_whitney: bool,
    pub mann_whitney_feature: Option<String>,
    pub mann_whitney_group_by: Option<String>,
    pub mann_whitney_group_a: Option<String>,
    pub mann_whitney_group_b: Option<String>,
    pub mann_whitney_alternative: Alternative,
}

impl Default for PlotParams {
    fn default() -> Self {
        Self {
            select_all: false,
            aa_distribution: false,
            aa_distribution_order_by: Ordering::default(),
            aa_distribution_show_all: false,
            hydropathy_profile: false,
            classification: false,
            classification_classify_by: Taxonomy::default(),
            titration_curve: false,
            compare_features: false,
            compare_features_a: None,
            compare_features_b: None,
            compare_features_group_by: None,
            compare_features_intensity_threshold: None,
            compare_feature: false,
            compare_feature_a: None,
            compare_feature_group_by: None,
            compare_feature_intensity_threshold: None,
            raincloud: false,
            raincloud_feature: None,
            raincloud_group_by: None,
            raincloud_log_scaled: false,
            mann_whitney: false,
            mann_whitney_feature: None,
            mann_whitney_group_by: None,
            mann_whitney_group_a: None,
            mann_whitney_group_b: None,
            mann_whitney_alternative: Alternative::default(),
        }
    }
}

impl PlotParams {
    /// All plots with default options.
    pub fn all() -> Self {
        Self {
            select_all: true,
            ..Self::default()
        }
    }

    pub fn is_selected(&self, id: PlotId) -> bool {
        if self.select_all {
            return true;
        }
        match id {
            PlotId::AaDistribution => self.aa_distribution,
            PlotId::HydropathyProfile => self.hydropathy_profile,
            PlotId::Classification => self.classification,
            PlotId::TitrationCurve => self.titration_curve,
            PlotId::CompareFeatures => self.compare_features,
            PlotId::CompareFeature => self.compare_feature,
            PlotId::Raincloud => self.raincloud,
            PlotId::MannWhitney => self.mann_whitney,
        }
    }
}

const DEFAULT_FEATURE: &str = "GRAVY";
const DEFAULT_GROUP_KEYWORD: &str = "group";

fn sequence_figure(
    id: PlotId,
    seq: &str,
    params: &PlotParams,
) -> Result<Figure, EngineError> {
    match id {
        PlotId::AaDistribution => distribution::aa_distribution(
            seq,
            params.aa_distribution_order_by,
            params.aa_distribution_show_all,
        ),
        PlotId::HydropathyProfile => profile::hydropathy_profile(seq),
        PlotId::Classification => {
            distribution::classification_chart(seq, params.classification_classify_by)
        }
        PlotId::TitrationCurve => profile::titration_curve(seq),
        _ => unreachable!("dataset plot dispatched as sequence plot"),
    }
}

fn dataset_figure(
    id: PlotId,
    df: &DataTable,
    params: &PlotParams,
) -> Result<Figure, EngineError> {
    match id {
        PlotId::CompareFeatures => comparison::compare_features(
            df,
            params
                .compare_features_a
                .as_deref()
                .unwrap_or("Molecular weight"),
            params.compare_features_b.as_deref().unwrap_or(DEFAULT_FEATURE),
            params.compare_features_group_by.as_deref(),
            params.compare_features_intensity_threshold,
        ),
        PlotId::CompareFeature => comparison::compare_feature(
            df,
            params.compare_feature_a.as_deref().unwrap_or(DEFAULT_FEATURE),
            params.compare_feature_group_by.as_deref(),
            params.compare_feature_intensity_threshold,
        ),
        PlotId::Raincloud => raincloud::raincloud(
            df,
            params.raincloud_feature.as_deref().unwrap_or(DEFAULT_FEATURE),
            params.raincloud_group_by.as_deref(),
            params.raincloud_log_scaled,
        ),
        PlotId::MannWhitney => comparison::mann_whitney(
            df,
            params.mann_whitney_feature.as_deref().unwrap_or(DEFAULT_FEATURE),
            params
                .mann_whitney_group_by
                .as_deref()
                .unwrap_or(DEFAULT_GROUP_KEYWORD),
            params.mann_whitney_group_a.as_deref(),
            params.mann_whitney_group_b.as_deref(),
            params.mann_whitney_alternative,
        ),
        _ => unreachable!("sequence plot dispatched as dataset plot"),
    }
}

/// Renders the selected figures. Sequence-scoped plots require `seq`,
/// dataset-scoped plots require a feature-annotated `dataset`; plots
/// whose input is absent are skipped.
pub fn generate_plots(
    params: &PlotParams,
    seq: Option<&str>,
    dataset: Option<&DataTable>,
) -> Result<(Vec<Figure>, Vec<Figure>), EngineError> {
    let mut seq_figures = Vec::new();
    let mut data_figures = Vec::new();

    for spec in PLOTS {
        if !params.is_selected(spec.id) {
            continue;
        }
        match (spec.scope, seq, dataset) {
            (PlotScope::Sequence, Some(seq), _) => {
                debug!(plot = spec.key, "rendering sequence figure");
                seq_figures.push(sequence_figure(spec.id, seq, params)?);
            }
            (PlotScope::Dataset, _, Some(df)) => {
                debug!(plot = spec.key, "rendering dataset figure");
                data_figures.push(dataset_figure(spec.id, df, params)?);
            }
            _ => {}
        }
    }

    Ok((seq_figures, data_figures))
}

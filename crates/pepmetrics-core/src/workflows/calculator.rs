//! Session facade over the feature and plot engines.

use crate::core::sequence;
use crate::core::table::DataTable;
use crate::engine::error::EngineError;
use crate::engine::features::{self, FeatureInput, FeatureParams};
use crate::engine::figures::Figure;
use crate::engine::plots::{self, PlotParams};
use tracing::{info, instrument};

/// Caller-owned session state: inputs are attached with explicit
/// setters, outputs are pulled with `get_*` methods. Every getter
/// reports all of its missing prerequisites at once.
#[derive(Debug, Default)]
pub struct Calculator {
    dataset: Option<DataTable>,
    metadata: Option<DataTable>,
    seq: Option<String>,
    feature_params: FeatureParams,
    plot_params: PlotParams,
    features: Option<DataTable>,
}

impl Calculator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches the peptide dataset. Invalidates previously computed
    /// features.
    pub fn set_dataset(&mut self, dataset: DataTable) {
        self.dataset = Some(dataset);
        self.features = None;
    }

    /// Attaches sample metadata. The first metadata column is the join
    /// key against the dataset.
    pub fn set_metadata(&mut self, metadata: DataTable) {
        self.metadata = Some(metadata);
        self.features = None;
    }

    /// Attaches the sequence of interest after sanitizing case and
    /// whitespace. Residues outside the alphabet are rejected.
    pub fn set_seq(&mut self, raw: &str) -> Result<(), EngineError> {
        let seq = sequence::sanitize(raw);
        sequence::validate_non_empty(&seq, "sequence of interest")?;
        self.seq = Some(seq);
        Ok(())
    }

    pub fn set_feature_params(&mut self, params: FeatureParams) {
        self.feature_params = params;
        self.features = None;
    }

    pub fn set_plot_params(&mut self, params: PlotParams) {
        self.plot_params = params;
    }

    /// Column names of the attached metadata, for group-by selection.
    pub fn metadata_columns(&self) -> Result<&[String], EngineError> {
        self.ensure(&[(self.metadata.is_some(), "metadata")])?;
        Ok(self
            .metadata
            .as_ref()
            .map(|m| m.columns())
            .unwrap_or_default())
    }

    fn ensure(&self, requirements: &[(bool, &'static str)]) -> Result<(), EngineError> {
        let missing: Vec<&'static str> = requirements
            .iter()
            .filter(|(present, _)| !present)
            .map(|&(_, name)| name)
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(EngineError::MissingPrerequisites { attributes: missing })
        }
    }

    /// Dataset merged with metadata, when metadata is attached.
    fn merged_dataset(&self) -> Result<Option<DataTable>, EngineError> {
        let Some(dataset) = &self.dataset else {
            return Ok(None);
        };
        match &self.metadata {
            Some(metadata) => {
                let key = metadata
                    .columns()
                    .first()
                    .cloned()
                    .unwrap_or_default();
                Ok(Some(dataset.left_join(metadata, &key)?))
            }
            None => Ok(Some(dataset.clone())),
        }
    }

    /// Computes the selected features over the dataset (merged with
    /// metadata when present) and caches the result.
    #[instrument(skip_all)]
    pub fn get_features(&mut self) -> Result<DataTable, EngineError> {
        self.ensure(&[(self.dataset.is_some(), "dataset")])?;
        let merged = self.merged_dataset()?.unwrap_or_default();
        let table = features::compute_features(&self.feature_params, FeatureInput::Dataset(&merged))?;
        info!(rows = table.n_rows(), columns = table.columns().len(), "features computed");
        self.features = Some(table.clone());
        Ok(table)
    }

    /// Computes the selected features for the sequence of interest.
    #[instrument(skip_all)]
    pub fn get_peptide_features(&self) -> Result<DataTable, EngineError> {
        self.ensure(&[(self.seq.is_some(), "seq")])?;
        let seq = self.seq.as_deref().unwrap_or_default();
        features::compute_features(&self.feature_params, FeatureInput::Sequence(seq))
    }

    /// Renders the selected sequence-scoped figures.
    #[instrument(skip_all)]
    pub fn get_peptide_plots(&self) -> Result<Vec<Figure>, EngineError> {
        self.ensure(&[(self.seq.is_some(), "seq")])?;
        let (seq_figures, _) =
            plots::generate_plots(&self.plot_params, self.seq.as_deref(), None)?;
        Ok(seq_figures)
    }

    /// Renders the selected dataset-scoped figures over the computed
    /// feature table, computing it first when necessary.
    #[instrument(skip_all)]
    pub fn get_dataset_plots(&mut self) -> Result<Vec<Figure>, EngineError> {
        self.ensure(&[(self.dataset.is_some(), "dataset")])?;
        if self.features.is_none() {
            self.get_features()?;
        }
        let (_, data_figures) =
            plots::generate_plots(&self.plot_params, None, self.features.as_ref())?;
        Ok(data_figures)
    }

    /// Renders both figure families in one pass. Missing inputs are
    /// reported together.
    #[instrument(skip_all)]
    pub fn get_plots(&mut self) -> Result<(Vec<Figure>, Vec<Figure>), EngineError> {
        self.ensure(&[
            (self.seq.is_some(), "seq"),
            (self.dataset.is_some(), "dataset"),
        ])?;
        if self.features.is_none() {
            self.get_features()?;
        }
        plots::generate_plots(&self.plot_params, self.seq.as_deref(), self.features.as_ref())
    }
}

//! The `features` command: compute features for a dataset or a single
//! sequence and emit the resulting table as CSV.

use crate::cli::FeaturesArgs;
use crate::config;
use crate::data;
use crate::error::{CliError, Result};
use pepmetrics::workflows::Calculator;
use tracing::info;

pub fn run(args: FeaturesArgs) -> Result<()> {
    let params = config::feature_params(&args)?;

    let mut calc = Calculator::new();
    calc.set_feature_params(params);
    if let Some(path) = &args.dataset {
        calc.set_dataset(data::load_table(path)?);
    }
    if let Some(path) = &args.metadata {
        calc.set_metadata(data::load_table(path)?);
    }
    if let Some(seq) = &args.seq {
        calc.set_seq(seq)?;
    }

    let table = if args.dataset.is_some() {
        info!("computing features over the dataset");
        calc.get_features()?
    } else if args.seq.is_some() {
        info!("computing features for the sequence of interest");
        calc.get_peptide_features()?
    } else {
        return Err(CliError::Argument(
            "provide a dataset (--dataset) or a sequence (--seq)".to_string(),
        ));
    };

    data::write_table(&table, args.output.as_deref())
}

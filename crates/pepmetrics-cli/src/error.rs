use pepmetrics::core::features::FeatureError;
use pepmetrics::core::table::TableError;
use pepmetrics::engine::error::EngineError;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse file '{path}': {source}", path = path.display())]
    FileParsing {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid argument: {0}")]
    Argument(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<FeatureError> for CliError {
    fn from(err: FeatureError) -> Self {
        Self::Engine(err.into())
    }
}

impl From<TableError> for CliError {
    fn from(err: TableError) -> Self {
        Self::Engine(err.into())
    }
}

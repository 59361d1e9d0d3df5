use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "Jonas Hartkopf",
    version,
    about = "pepmetrics - physicochemical feature computation and figure generation for peptidomics datasets.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compute physicochemical features for a dataset or a single sequence.
    Features(FeaturesArgs),
    /// Render analysis figures as SVG files.
    Plots(PlotsArgs),
}

/// Arguments for the `features` subcommand.
#[derive(Args, Debug)]
pub struct FeaturesArgs {
    /// Path to the peptide dataset in CSV format. The sequence column is
    /// discovered by the "sequence" keyword.
    #[arg(short, long, value_name = "PATH")]
    pub dataset: Option<PathBuf>,

    /// Path to the sample metadata in CSV format. The first column is the
    /// join key against the dataset.
    #[arg(short, long, value_name = "PATH")]
    pub metadata: Option<PathBuf>,

    /// A single sequence of interest in one-letter code.
    #[arg(short, long, value_name = "SEQUENCE")]
    pub seq: Option<String>,

    /// Path for the output CSV. Defaults to standard output.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Path to a parameter file in TOML format. Command-line flags take
    /// precedence over values from the file.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Select every feature with its default options.
    #[arg(short, long)]
    pub all: bool,

    /// Select a feature by its registry key (e.g. 'gravy',
    /// 'molecular_weight'). Can be used multiple times.
    #[arg(short, long = "feature", value_name = "KEY")]
    pub features: Vec<String>,

    /// Override the pH at which the net charge is evaluated.
    #[arg(long, value_name = "FLOAT")]
    pub ph: Option<f64>,

    /// Override the pH at which the charge density is evaluated.
    #[arg(long, value_name = "FLOAT")]
    pub density_ph: Option<f64>,

    /// Isoelectric point estimation strategy ('titration' or 'model').
    #[arg(long, value_name = "METHOD")]
    pub pi_method: Option<String>,

    /// Weights file for the regression isoelectric point model.
    #[arg(long, value_name = "PATH")]
    pub pi_model: Option<PathBuf>,

    /// Count cystine bridges in the extinction coefficient.
    #[arg(long)]
    pub oxidized: bool,
}

/// Arguments for the `plots` subcommand.
#[derive(Args, Debug)]
pub struct PlotsArgs {
    /// Path to the peptide dataset in CSV format.
    #[arg(short, long, value_name = "PATH")]
    pub dataset: Option<PathBuf>,

    /// Path to the sample metadata in CSV format.
    #[arg(short, long, value_name = "PATH")]
    pub metadata: Option<PathBuf>,

    /// A single sequence of interest in one-letter code.
    #[arg(short, long, value_name = "SEQUENCE")]
    pub seq: Option<String>,

    /// Directory the SVG files are written to.
    #[arg(short, long, required = true, value_name = "DIR")]
    pub output_dir: PathBuf,

    /// Path to a parameter file in TOML format. Command-line flags take
    /// precedence over values from the file.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Select every plot with its default options.
    #[arg(short, long)]
    pub all: bool,

    /// Select a plot by its registry key (e.g. 'raincloud',
    /// 'titration_curve'). Can be used multiple times.
    #[arg(short, long = "plot", value_name = "KEY")]
    pub plots: Vec<String>,

    /// Bar ordering of the amino acid distribution ('frequency',
    /// 'alphabetical', 'classes chemical', 'classes charge', 'hydropathy'
    /// or 'weight').
    #[arg(long, value_name = "ORDER")]
    pub order_by: Option<String>,

    /// Keep zero-count residues visible in the amino acid distribution.
    #[arg(long)]
    pub show_all: bool,

    /// Classification taxonomy ('chemical' or 'charge').
    #[arg(long, value_name = "TAXONOMY")]
    pub classify_by: Option<String>,

    /// First feature of the comparison plots.
    #[arg(long, value_name = "LABEL")]
    pub feature_a: Option<String>,

    /// Second feature of the feature-versus-feature scatter.
    #[arg(long, value_name = "LABEL")]
    pub feature_b: Option<String>,

    /// Metadata column the grouped plots split on.
    #[arg(short, long, value_name = "COLUMN")]
    pub group_by: Option<String>,

    /// Drop observations below this intensity.
    #[arg(long, value_name = "FLOAT")]
    pub intensity_threshold: Option<f64>,

    /// Log10-scale the raincloud intensities.
    #[arg(long)]
    pub log_scaled: bool,

    /// First group of the Mann-Whitney comparison.
    #[arg(long, value_name = "GROUP")]
    pub group_a: Option<String>,

    /// Second group of the Mann-Whitney comparison.
    #[arg(long, value_name = "GROUP")]
    pub group_b: Option<String>,

    /// Alternative hypothesis of the Mann-Whitney test ('two-sided',
    /// 'greater' or 'less').
    #[arg(long, value_name = "ALTERNATIVE")]
    pub alternative: Option<String>,
}

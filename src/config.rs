use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};

use crate::pipeline::{LogisticRegressionTrainer, PipelineBuilder};

/// Where synthetic samples draw their measurement ranges from
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RangeSource {
    /// Fixed plausible ranges for Iris flowers
    Documented,
    /// Minimum and maximum of each column in the training data
    Dataset,
}

/// Train an Iris species classifier and classify random flowers
///
/// Loads the training data, fits the pipeline, then prints one random sample
/// and its predicted species per key press. Escape quits.
#[derive(Parser, Debug, Clone)]
#[command(name = "iris-predictor", version)]
pub struct Config {
    /// Training data: four measurements and a label per row, comma-separated, no header
    #[arg(long, short = 'd', default_value = "data/iris-data.txt")]
    pub data: PathBuf,

    /// Seed for the sample generator; random when omitted
    #[arg(long)]
    pub seed: Option<u64>,

    /// Make this many predictions without waiting for key presses
    #[arg(long, short = 'n', value_parser = clap::value_parser!(u64).range(1..))]
    pub count: Option<u64>,

    /// Source of the sampling range for each measurement
    #[arg(long, value_enum, default_value_t = RangeSource::Documented)]
    pub ranges: RangeSource,

    /// Maximum optimizer iterations for the trainer
    #[arg(long, default_value_t = 100)]
    pub max_iterations: u64,

    /// L2 regularization strength for the trainer
    #[arg(long, default_value_t = 0.1)]
    pub l2: f64,

    /// Skip mean/variance normalization of the feature vector
    #[arg(long)]
    pub no_normalize: bool,

    /// Print accuracy and the confusion matrix on the training data after fitting
    #[arg(long)]
    pub evaluate: bool,

    /// More log output on stderr (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Config {
    /// Pipeline declaration matching the trainer flags
    pub fn pipeline(&self) -> PipelineBuilder {
        PipelineBuilder::new()
            .normalize(!self.no_normalize)
            .trainer(LogisticRegressionTrainer {
                max_iterations: self.max_iterations,
                l2_regularization: self.l2,
                ..Default::default()
            })
    }

    /// Default log filter when `RUST_LOG` is not set
    pub fn log_directive(&self) -> &'static str {
        match self.verbose {
            0 => "iris_predictor=warn",
            1 => "iris_predictor=info",
            _ => "iris_predictor=debug",
        }
    }
}

//! Startup sequence: load, declare, train, then hand over to the prediction loop.
use std::io::{self, Write};
use std::time::Instant;

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use crate::config::{Config, RangeSource};
use crate::data::load_dataset;
use crate::sampling::{FeatureRanges, SampleGenerator};
use crate::session::{run_predictions, FixedCount, KeySource, TerminalKeys};

/// Runs the program against stdout, reading keys from the terminal unless
/// `--count` was given.
pub fn run(config: &Config) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match config.count {
        Some(count) => run_with(config, &mut FixedCount::new(count), &mut out)?,
        None => run_with(config, &mut TerminalKeys, &mut out)?,
    };
    Ok(())
}

/// Runs the whole program with the given key source and output.
///
/// # Returns
/// The number of predictions made
pub fn run_with<K: KeySource, W: Write>(config: &Config, keys: &mut K, out: &mut W) -> Result<u64> {
    write!(out, "Loading dataset... ")?;
    out.flush()?;
    let started = Instant::now();
    let dataset = load_dataset(&config.data)
        .with_context(|| format!("loading dataset from {}", config.data.display()))?;
    let pipeline = config.pipeline().build().context("declaring the pipeline")?;
    writeln!(out, "{} ms", started.elapsed().as_millis())?;
    info!(
        rows = dataset.samples().len(),
        labels = ?dataset.distinct_labels(),
        "dataset loaded"
    );

    write!(out, "Training the model... ")?;
    out.flush()?;
    let started = Instant::now();
    let model = pipeline.fit(&dataset).context("training the model")?;
    writeln!(out, "{} ms\n", started.elapsed().as_millis())?;

    if config.evaluate {
        let metrics = model
            .evaluate(&dataset)
            .context("evaluating on the training data")?;
        writeln!(out, "{}", metrics)?;
    }

    let ranges = match config.ranges {
        RangeSource::Documented => FeatureRanges::documented(),
        RangeSource::Dataset => {
            FeatureRanges::from_dataset(&dataset).context("the dataset has no rows")?
        }
    };
    let rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut samples = SampleGenerator::new(ranges, rng);

    let rounds = run_predictions(&model, &mut samples, keys, out).context("prediction loop")?;
    info!(rounds, "session finished");
    Ok(rounds)
}

//! Iris predictor: trains a species classifier on the Iris measurements and
//! classifies random flowers until Escape is pressed.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use iris_predictor::{app, Config};

fn main() -> Result<()> {
    let config = Config::parse();

    // Logs go to stderr so they never interleave with the predictions on stdout
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_directive()))?;
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    app::run(&config)
}

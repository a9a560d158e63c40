pub mod app;
pub mod config;
pub mod data;
pub mod error;
pub mod pipeline;
pub mod sampling;
pub mod session;

pub use config::Config;
pub use data::{load_dataset, IrisDataset, IrisSample};
pub use error::{DataError, PipelineError, SessionError};
pub use pipeline::{FittedModel, Pipeline, PipelineBuilder, Prediction};

pub mod dataset;
pub mod loader;
pub mod record;
pub use dataset::{Dataset, IrisDataset};
pub use loader::{load_dataset, read_dataset};
pub use record::{Feature, IrisSample, NUM_FEATURES};

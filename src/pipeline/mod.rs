//! Declarative training pipeline.
//!
//! A [`Pipeline`] is declared up front with [`PipelineBuilder`] and does no work
//! until [`Pipeline::fit`] runs its steps, in this fixed order, over a dataset:
//!
//! 1. `MapValueToKey` encodes the label strings as dense numeric keys
//! 2. `Concatenate` gathers the measurement columns into one feature vector
//! 3. `NormalizeMeanVariance` (optional) standardizes the feature vector
//! 4. the multiclass trainer fits a classifier on features and keys
//! 5. `MapKeyToValue` decodes predicted keys back into labels
pub mod features;
pub mod keys;
pub mod model;
pub mod trainer;

use std::fmt;

use ndarray::Array1;
use tracing::{debug, info};

use crate::data::{Feature, IrisDataset};
use crate::error::PipelineError;
use features::{Concatenate, MeanVarianceNormalizer};
use keys::ValueToKey;
pub use model::{ClassificationMetrics, FittedModel, Prediction};
pub use trainer::{KeyClassifier, LogisticModel, LogisticRegressionTrainer, MulticlassTrainer};

/// Column holding the encoded label
pub const LABEL_COLUMN: &str = "Label";
/// Column holding the concatenated feature vector
pub const FEATURES_COLUMN: &str = "Features";
/// Column holding the decoded prediction
pub const PREDICTED_LABEL_COLUMN: &str = "PredictedLabel";

/// Description of one pipeline stage
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    MapValueToKey {
        column: &'static str,
    },
    Concatenate {
        output: &'static str,
        inputs: Vec<Feature>,
    },
    NormalizeMeanVariance {
        column: &'static str,
    },
    Train {
        trainer: &'static str,
        label: &'static str,
        features: &'static str,
    },
    MapKeyToValue {
        column: &'static str,
    },
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::MapValueToKey { column } => write!(f, "MapValueToKey({})", column),
            Step::Concatenate { output, inputs } => {
                let names: Vec<&str> = inputs.iter().map(|input| input.name()).collect();
                write!(f, "Concatenate({} <- {})", output, names.join(", "))
            }
            Step::NormalizeMeanVariance { column } => {
                write!(f, "NormalizeMeanVariance({})", column)
            }
            Step::Train {
                trainer,
                label,
                features,
            } => write!(f, "{}(label: {}, features: {})", trainer, label, features),
            Step::MapKeyToValue { column } => write!(f, "MapKeyToValue({})", column),
        }
    }
}

/// Declares a pipeline without touching any data
#[derive(Debug, Clone)]
pub struct PipelineBuilder<T = LogisticRegressionTrainer> {
    features: Vec<Feature>,
    normalize: bool,
    trainer: T,
}

impl PipelineBuilder<LogisticRegressionTrainer> {
    pub fn new() -> Self {
        PipelineBuilder {
            features: Feature::ALL.to_vec(),
            normalize: true,
            trainer: LogisticRegressionTrainer::default(),
        }
    }
}

impl Default for PipelineBuilder<LogisticRegressionTrainer> {
    fn default() -> Self {
        PipelineBuilder::new()
    }
}

impl<T: MulticlassTrainer> PipelineBuilder<T> {
    /// Measurement columns to concatenate, in order
    pub fn concatenate(mut self, features: impl IntoIterator<Item = Feature>) -> Self {
        self.features = features.into_iter().collect();
        self
    }

    pub fn normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }

    pub fn trainer<U: MulticlassTrainer>(self, trainer: U) -> PipelineBuilder<U> {
        PipelineBuilder {
            features: self.features,
            normalize: self.normalize,
            trainer,
        }
    }

    /// Validates the declaration and freezes it into a [`Pipeline`]
    pub fn build(self) -> Result<Pipeline<T>, PipelineError> {
        let concat = Concatenate::new(self.features)?;
        self.trainer.validate()?;
        Ok(Pipeline {
            concat,
            normalize: self.normalize,
            trainer: self.trainer,
        })
    }
}

/// A validated, not yet fitted, pipeline
#[derive(Debug, Clone)]
pub struct Pipeline<T = LogisticRegressionTrainer> {
    concat: Concatenate,
    normalize: bool,
    trainer: T,
}

impl<T: MulticlassTrainer> Pipeline<T> {
    /// The stages `fit` will run, in order
    pub fn steps(&self) -> Vec<Step> {
        let mut steps = vec![
            Step::MapValueToKey {
                column: LABEL_COLUMN,
            },
            Step::Concatenate {
                output: FEATURES_COLUMN,
                inputs: self.concat.columns().to_vec(),
            },
        ];
        if self.normalize {
            steps.push(Step::NormalizeMeanVariance {
                column: FEATURES_COLUMN,
            });
        }
        steps.push(Step::Train {
            trainer: self.trainer.name(),
            label: LABEL_COLUMN,
            features: FEATURES_COLUMN,
        });
        steps.push(Step::MapKeyToValue {
            column: PREDICTED_LABEL_COLUMN,
        });
        steps
    }

    pub fn trainer(&self) -> &T {
        &self.trainer
    }

    /// Runs every step over `dataset` and returns the fitted model
    pub fn fit(&self, dataset: &IrisDataset) -> Result<FittedModel<T::Model>, PipelineError> {
        let samples = dataset.samples();
        if samples.is_empty() {
            return Err(PipelineError::EmptyDataset);
        }
        for step in self.steps() {
            debug!(%step, "pipeline step");
        }

        let labels = samples
            .iter()
            .enumerate()
            .map(|(row, sample)| sample.label().ok_or(PipelineError::MissingLabel(row)))
            .collect::<Result<Vec<&str>, _>>()?;
        let value_to_key = ValueToKey::fit(labels.iter().copied());
        let keys: Array1<usize> = labels
            .iter()
            .map(|label| {
                value_to_key
                    .key(label)
                    .ok_or_else(|| PipelineError::UnknownLabel(label.to_string()))
            })
            .collect::<Result<_, _>>()?;

        let mut features = self.concat.matrix(dataset);
        let normalizer = if self.normalize {
            let normalizer = MeanVarianceNormalizer::fit(&features);
            normalizer.transform(&mut features);
            Some(normalizer)
        } else {
            None
        };
        let records = features.mapv(f64::from);

        info!(
            rows = samples.len(),
            labels = value_to_key.len(),
            trainer = self.trainer.name(),
            "fitting pipeline"
        );
        let classifier = self.trainer.fit(&records, &keys, value_to_key.len())?;

        Ok(FittedModel::new(
            value_to_key,
            self.concat.clone(),
            normalizer,
            classifier,
        ))
    }
}

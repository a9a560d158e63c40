use linfa::traits::Fit;
use linfa::DatasetBase;
use linfa_logistic::{MultiFittedLogisticRegression, MultiLogisticRegression};
use ndarray::{Array1, Array2};
use tracing::debug;

use crate::error::PipelineError;

/// A fitted classifier that scores feature rows against dense keys `0..num_keys`.
pub trait KeyClassifier {
    /// Per-key probabilities, one row per input row `[N x num_keys]`
    fn probabilities(&self, records: &Array2<f64>) -> Array2<f64>;
}

/// Trains a multiclass classifier on a feature matrix and dense label keys.
pub trait MulticlassTrainer {
    type Model: KeyClassifier;

    /// Name shown in pipeline step descriptions
    fn name(&self) -> &'static str;

    /// Rejects option values the trainer cannot work with
    fn validate(&self) -> Result<(), PipelineError> {
        Ok(())
    }

    fn fit(
        &self,
        records: &Array2<f64>,
        keys: &Array1<usize>,
        num_keys: usize,
    ) -> Result<Self::Model, PipelineError>;
}

/// Multinomial logistic regression, delegated to `linfa-logistic`.
#[derive(Debug, Clone, PartialEq)]
pub struct LogisticRegressionTrainer {
    pub max_iterations: u64,
    /// L2 penalty on the weights
    pub l2_regularization: f64,
    pub gradient_tolerance: f64,
}

impl Default for LogisticRegressionTrainer {
    fn default() -> Self {
        LogisticRegressionTrainer {
            max_iterations: 100,
            l2_regularization: 0.1,
            gradient_tolerance: 1e-4,
        }
    }
}

impl MulticlassTrainer for LogisticRegressionTrainer {
    type Model = LogisticModel;

    fn name(&self) -> &'static str {
        "MultinomialLogisticRegression"
    }

    fn validate(&self) -> Result<(), PipelineError> {
        if self.max_iterations == 0 {
            return Err(PipelineError::InvalidOption(
                "max_iterations must be at least 1".to_string(),
            ));
        }
        if !self.l2_regularization.is_finite() || self.l2_regularization < 0.0 {
            return Err(PipelineError::InvalidOption(format!(
                "l2_regularization must be a non-negative number, got {}",
                self.l2_regularization
            )));
        }
        if !self.gradient_tolerance.is_finite() || self.gradient_tolerance <= 0.0 {
            return Err(PipelineError::InvalidOption(format!(
                "gradient_tolerance must be positive, got {}",
                self.gradient_tolerance
            )));
        }
        Ok(())
    }

    fn fit(
        &self,
        records: &Array2<f64>,
        keys: &Array1<usize>,
        num_keys: usize,
    ) -> Result<LogisticModel, PipelineError> {
        // A single class leaves nothing to discriminate
        if num_keys == 1 {
            debug!("single label in training data, using a constant model");
            return Ok(LogisticModel::Constant { key: 0 });
        }

        let dataset = DatasetBase::new(records.clone(), keys.clone());
        let model = MultiLogisticRegression::<f64>::default()
            .alpha(self.l2_regularization)
            .max_iterations(self.max_iterations)
            .gradient_tolerance(self.gradient_tolerance)
            .fit(&dataset)?;

        Ok(LogisticModel::Fitted(model))
    }
}

/// Model produced by [`LogisticRegressionTrainer`]
#[derive(Debug)]
pub enum LogisticModel {
    Constant { key: usize },
    Fitted(MultiFittedLogisticRegression<f64, usize>),
}

impl KeyClassifier for LogisticModel {
    fn probabilities(&self, records: &Array2<f64>) -> Array2<f64> {
        match self {
            LogisticModel::Constant { key } => {
                let mut scores = Array2::zeros((records.nrows(), key + 1));
                scores.column_mut(*key).fill(1.0);
                scores
            }
            // Every key occurs in the training rows, so the model's sorted
            // classes are exactly `0..num_keys` and columns line up with keys.
            LogisticModel::Fitted(model) => model.predict_probabilities(records),
        }
    }
}

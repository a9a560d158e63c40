use std::fmt;

use ndarray::{Array2, ArrayView1};
use tracing::debug;

use super::features::{Concatenate, MeanVarianceNormalizer};
use super::keys::{KeyToValue, ValueToKey};
use super::trainer::KeyClassifier;
use crate::data::{Dataset, IrisSample};
use crate::error::PipelineError;

/// Result of classifying one sample
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    /// Predicted species label
    pub label: String,
    /// Probability the model assigns to `label`
    pub score: f32,
    /// Probability of every training label, in key order
    pub scores: Vec<(String, f32)>,
}

/// A pipeline fitted to a training set: the learned transforms plus the trained classifier.
///
/// Immutable once built. Every prediction goes through the same concatenation and
/// normalization the training rows did, then the classifier, then key decoding.
#[derive(Debug)]
pub struct FittedModel<M> {
    value_to_key: ValueToKey,
    key_to_value: KeyToValue,
    concat: Concatenate,
    normalizer: Option<MeanVarianceNormalizer>,
    classifier: M,
}

impl<M: KeyClassifier> FittedModel<M> {
    pub(crate) fn new(
        value_to_key: ValueToKey,
        concat: Concatenate,
        normalizer: Option<MeanVarianceNormalizer>,
        classifier: M,
    ) -> Self {
        FittedModel {
            key_to_value: value_to_key.inverse(),
            value_to_key,
            concat,
            normalizer,
            classifier,
        }
    }

    /// Labels seen during training, indexed by key
    pub fn labels(&self) -> &[String] {
        self.key_to_value.values()
    }

    pub fn normalizer(&self) -> Option<&MeanVarianceNormalizer> {
        self.normalizer.as_ref()
    }

    /// Predicts the label of a single sample. Any label on the sample is ignored.
    ///
    /// Fails on measurements that are negative or not finite, and on inputs so large
    /// that they overflow once normalized.
    pub fn predict(&self, sample: &IrisSample) -> Result<Prediction, PipelineError> {
        sample.validate().map_err(PipelineError::InvalidSample)?;
        let features = self.featurize(self.concat.row(sample));
        if !features.iter().all(|v| v.is_finite()) {
            return Err(PipelineError::InvalidSample(
                "measurements overflow after normalization".to_string(),
            ));
        }
        let scores = self.classifier.probabilities(&features);
        let prediction = self.decode(scores.row(0))?;
        debug!(
            features = ?sample.features(),
            label = %prediction.label,
            score = prediction.score,
            "predicted"
        );
        Ok(prediction)
    }

    /// Computes accuracy and the confusion matrix over labeled samples
    pub fn evaluate<D: Dataset<IrisSample>>(
        &self,
        dataset: &D,
    ) -> Result<ClassificationMetrics, PipelineError> {
        let num_labels = self.labels().len();
        let mut confusion_matrix = vec![vec![0; num_labels]; num_labels];

        for index in 0..dataset.len() {
            let sample = dataset.get_sample(index);
            let label = sample.label().ok_or(PipelineError::MissingLabel(index))?;
            let true_key = self
                .value_to_key
                .key(label)
                .ok_or_else(|| PipelineError::UnknownLabel(label.to_string()))?;
            let prediction = self.predict(&sample)?;
            let pred_key = self
                .value_to_key
                .key(&prediction.label)
                .ok_or_else(|| PipelineError::UnknownLabel(prediction.label.clone()))?;
            confusion_matrix[true_key][pred_key] += 1;
        }

        Ok(ClassificationMetrics::from_confusion(
            self.labels().to_vec(),
            confusion_matrix,
        ))
    }

    fn featurize(&self, mut features: Array2<f32>) -> Array2<f64> {
        if let Some(normalizer) = &self.normalizer {
            normalizer.transform(&mut features);
        }
        features.mapv(f64::from)
    }

    fn decode(&self, scores: ArrayView1<'_, f64>) -> Result<Prediction, PipelineError> {
        // Ties go to the lowest key
        let mut best: Option<(usize, f64)> = None;
        for (key, &score) in scores.iter().enumerate() {
            if !score.is_finite() {
                return Err(PipelineError::NonFiniteScore(key));
            }
            if best.map_or(true, |(_, top)| score > top) {
                best = Some((key, score));
            }
        }
        let (key, score) = best.ok_or(PipelineError::NoScores)?;

        let label = self
            .key_to_value
            .value(key)
            .ok_or(PipelineError::UnknownKey(key))?
            .to_string();
        let scores = self
            .labels()
            .iter()
            .enumerate()
            .map(|(k, name)| (name.clone(), scores.get(k).copied().unwrap_or(0.0) as f32))
            .collect();

        Ok(Prediction {
            label,
            score: score as f32,
            scores,
        })
    }
}

/// Evaluation metrics for classification
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationMetrics {
    /// Labels in key order; rows and columns of the confusion matrix follow it
    pub labels: Vec<String>,
    /// Overall accuracy
    pub accuracy: f32,
    /// Per-label accuracy (recall); 0 for labels with no rows
    pub per_class_accuracy: Vec<f32>,
    /// Confusion matrix [true_label x predicted_label]
    pub confusion_matrix: Vec<Vec<usize>>,
}

impl ClassificationMetrics {
    pub fn from_confusion(labels: Vec<String>, confusion_matrix: Vec<Vec<usize>>) -> Self {
        let total: usize = confusion_matrix.iter().flatten().sum();
        let correct: usize = (0..confusion_matrix.len())
            .map(|i| confusion_matrix[i][i])
            .sum();
        let accuracy = if total > 0 {
            correct as f32 / total as f32
        } else {
            0.0
        };
        let per_class_accuracy = confusion_matrix
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let row_total: usize = row.iter().sum();
                if row_total > 0 {
                    row[i] as f32 / row_total as f32
                } else {
                    0.0
                }
            })
            .collect();

        ClassificationMetrics {
            labels,
            accuracy,
            per_class_accuracy,
            confusion_matrix,
        }
    }
}

impl fmt::Display for ClassificationMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.labels.iter().map(String::len).max().unwrap_or(0).max(6);

        writeln!(f, "Overall accuracy: {:.2}%", self.accuracy * 100.0)?;
        writeln!(f, "Per-class accuracy:")?;
        for (label, acc) in self.labels.iter().zip(&self.per_class_accuracy) {
            writeln!(f, "  {:<width$}  {:.2}%", label, acc * 100.0)?;
        }
        writeln!(f, "Confusion matrix (rows: true, columns: predicted):")?;
        write!(f, "  {:<width$}", "")?;
        for label in &self.labels {
            write!(f, "  {:>width$}", label)?;
        }
        writeln!(f)?;
        for (label, row) in self.labels.iter().zip(&self.confusion_matrix) {
            write!(f, "  {:<width$}", label)?;
            for count in row {
                write!(f, "  {:>width$}", count)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

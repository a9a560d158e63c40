use ndarray::{Array1, Array2, Axis};

use crate::data::{Feature, IrisDataset, IrisSample};
use crate::error::PipelineError;

/// Minimum standard deviation threshold to avoid division by zero
const MIN_STD_DEV: f32 = 1e-6;

/// Concatenates scalar measurement columns into one feature vector.
#[derive(Debug, Clone, PartialEq)]
pub struct Concatenate {
    columns: Vec<Feature>,
}

impl Concatenate {
    /// Selects `columns` in the given order; at least one, none repeated.
    pub fn new(columns: Vec<Feature>) -> Result<Self, PipelineError> {
        if columns.is_empty() {
            return Err(PipelineError::NoFeatures);
        }
        for (i, column) in columns.iter().enumerate() {
            if columns[..i].contains(column) {
                return Err(PipelineError::DuplicateFeature(column.name()));
            }
        }
        Ok(Concatenate { columns })
    }

    pub fn columns(&self) -> &[Feature] {
        &self.columns
    }

    /// Feature matrix for every row of the dataset `[N x columns]`
    pub fn matrix(&self, dataset: &IrisDataset) -> Array2<f32> {
        dataset.feature_matrix(&self.columns)
    }

    /// Feature matrix for a single sample `[1 x columns]`
    pub fn row(&self, sample: &IrisSample) -> Array2<f32> {
        Array2::from_shape_fn((1, self.columns.len()), |(_, col)| {
            sample.value(self.columns[col])
        })
    }
}

impl Default for Concatenate {
    fn default() -> Self {
        Concatenate {
            columns: Feature::ALL.to_vec(),
        }
    }
}

/// Mean/variance statistics learned from the training features.
///
/// Columns are shifted to zero mean and scaled to unit (population) variance.
/// A column whose spread is below `MIN_STD_DEV` is only shifted.
#[derive(Debug, Clone, PartialEq)]
pub struct MeanVarianceNormalizer {
    means: Array1<f32>,
    stds: Array1<f32>,
}

impl MeanVarianceNormalizer {
    pub fn fit(features: &Array2<f32>) -> Self {
        let n_rows = features.nrows().max(1) as f32;
        let means = features.sum_axis(Axis(0)) / n_rows;
        let stds = features
            .axis_iter(Axis(1))
            .zip(means.iter())
            .map(|(col, &mean)| {
                let sum_squared_deviations: f32 = col.iter().map(|&val| (val - mean).powi(2)).sum();
                let std_dev = (sum_squared_deviations / n_rows).sqrt();
                if std_dev < MIN_STD_DEV {
                    1.0
                } else {
                    std_dev
                }
            })
            .collect();

        MeanVarianceNormalizer { means, stds }
    }

    /// Normalizes `features` in place with the fitted statistics
    pub fn transform(&self, features: &mut Array2<f32>) {
        for mut row in features.rows_mut() {
            row -= &self.means;
            row /= &self.stds;
        }
    }

    pub fn means(&self) -> &Array1<f32> {
        &self.means
    }

    pub fn stds(&self) -> &Array1<f32> {
        &self.stds
    }
}

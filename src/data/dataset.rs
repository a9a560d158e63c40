use ndarray::Array2;

use super::record::{Feature, IrisSample};

pub trait Dataset<Sample> {
    /// Returns the number of samples in the dataset.
    fn len(&self) -> usize;

    /// Retrieves a sample by its index.
    fn get_sample(&self, index: usize) -> Sample;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The training table: every row of the data file, in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IrisDataset {
    samples: Vec<IrisSample>,
}

impl IrisDataset {
    pub fn new(samples: Vec<IrisSample>) -> Self {
        IrisDataset { samples }
    }

    pub fn samples(&self) -> &[IrisSample] {
        &self.samples
    }

    /// Builds the `[N x columns.len()]` matrix of the selected measurement columns
    pub fn feature_matrix(&self, columns: &[Feature]) -> Array2<f32> {
        Array2::from_shape_fn((self.samples.len(), columns.len()), |(row, col)| {
            self.samples[row].value(columns[col])
        })
    }

    /// Labels in order of first occurrence, without repeats
    pub fn distinct_labels(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = Vec::new();
        for label in self.samples.iter().filter_map(IrisSample::label) {
            if !labels.contains(&label) {
                labels.push(label);
            }
        }
        labels
    }
}

impl Dataset<IrisSample> for IrisDataset {
    fn len(&self) -> usize {
        self.samples.len()
    }

    fn get_sample(&self, index: usize) -> IrisSample {
        self.samples[index].clone()
    }
}

impl FromIterator<IrisSample> for IrisDataset {
    fn from_iter<I: IntoIterator<Item = IrisSample>>(iter: I) -> Self {
        IrisDataset::new(iter.into_iter().collect())
    }
}

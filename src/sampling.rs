use rand::Rng;

use crate::data::{Feature, IrisDataset, IrisSample, NUM_FEATURES};

/// Inclusive range a synthetic measurement is drawn from, in centimeters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureRange {
    min: f32,
    max: f32,
}

impl FeatureRange {
    /// `None` unless both ends are finite and `min <= max`
    pub fn new(min: f32, max: f32) -> Option<Self> {
        (min.is_finite() && max.is_finite() && min <= max).then_some(FeatureRange { min, max })
    }

    pub fn min(&self) -> f32 {
        self.min
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    pub fn contains(&self, value: f32) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

/// One sampling range per measurement column.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRanges {
    ranges: [FeatureRange; NUM_FEATURES],
}

impl FeatureRanges {
    /// The fixed, documented per-column ranges of the Iris measurements
    pub fn documented() -> Self {
        FeatureRanges {
            ranges: Feature::ALL.map(|feature| {
                let (min, max) = feature.documented_range();
                FeatureRange { min, max }
            }),
        }
    }

    /// Per-column minimum and maximum of the dataset; `None` when it has no rows.
    pub fn from_dataset(dataset: &IrisDataset) -> Option<Self> {
        let first = dataset.samples().first()?;
        let mut ranges = Feature::ALL.map(|feature| FeatureRange {
            min: first.value(feature),
            max: first.value(feature),
        });
        for sample in dataset.samples() {
            for (range, feature) in ranges.iter_mut().zip(Feature::ALL) {
                let value = sample.value(feature);
                range.min = range.min.min(value);
                range.max = range.max.max(value);
            }
        }
        Some(FeatureRanges { ranges })
    }

    pub fn get(&self, feature: Feature) -> FeatureRange {
        self.ranges[feature as usize]
    }

    pub fn contains(&self, sample: &IrisSample) -> bool {
        Feature::ALL
            .iter()
            .all(|&feature| self.get(feature).contains(sample.value(feature)))
    }
}

impl Default for FeatureRanges {
    fn default() -> Self {
        FeatureRanges::documented()
    }
}

/// Draws unlabeled samples, each measurement uniform over its range.
///
/// Never exhausted as an iterator.
pub struct SampleGenerator<R> {
    ranges: FeatureRanges,
    rng: R,
}

impl<R: Rng> SampleGenerator<R> {
    pub fn new(ranges: FeatureRanges, rng: R) -> Self {
        SampleGenerator { ranges, rng }
    }

    pub fn next_sample(&mut self) -> IrisSample {
        let features = Feature::ALL.map(|feature| {
            let range = self.ranges.get(feature);
            self.rng.gen_range(range.min..=range.max)
        });
        IrisSample::new(features)
    }
}

impl<R: Rng> Iterator for SampleGenerator<R> {
    type Item = IrisSample;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.next_sample())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_documented_ranges() {
        let ranges = FeatureRanges::documented();
        assert_eq!(ranges.get(Feature::SepalLength), FeatureRange::new(4.3, 7.9).unwrap());
        assert_eq!(ranges.get(Feature::SepalWidth), FeatureRange::new(2.0, 4.4).unwrap());
        assert_eq!(ranges.get(Feature::PetalLength), FeatureRange::new(1.0, 6.9).unwrap());
        assert_eq!(ranges.get(Feature::PetalWidth), FeatureRange::new(0.0, 2.4).unwrap());
    }

    #[test]
    fn test_range_rejects_inverted_bounds() {
        assert!(FeatureRange::new(2.0, 1.0).is_none());
        assert!(FeatureRange::new(f32::NAN, 1.0).is_none());
        let point = FeatureRange::new(1.0, 1.0).unwrap();
        assert_eq!((point.min(), point.max()), (1.0, 1.0));
        assert!(point.contains(1.0) && !point.contains(1.1));
    }

    #[test]
    fn test_samples_stay_in_range() {
        let ranges = FeatureRanges::documented();
        let generator = SampleGenerator::new(ranges.clone(), StdRng::seed_from_u64(7));
        for sample in generator.take(10_000) {
            assert!(ranges.contains(&sample), "{:?} out of range", sample);
            assert!(sample.label().is_none());
        }
    }

    #[test]
    fn test_seeded_generators_repeat() {
        let a: Vec<IrisSample> =
            SampleGenerator::new(FeatureRanges::documented(), StdRng::seed_from_u64(42))
                .take(5)
                .collect();
        let b: Vec<IrisSample> =
            SampleGenerator::new(FeatureRanges::documented(), StdRng::seed_from_u64(42))
                .take(5)
                .collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_ranges_from_dataset() {
        let dataset = IrisDataset::new(vec![
            IrisSample::labeled([5.1, 3.5, 1.4, 0.2], "setosa"),
            IrisSample::labeled([7.0, 3.2, 4.7, 1.4], "versicolor"),
            IrisSample::labeled([6.3, 3.3, 6.0, 2.5], "virginica"),
        ]);
        let ranges = FeatureRanges::from_dataset(&dataset).unwrap();
        assert_eq!(ranges.get(Feature::SepalLength), FeatureRange::new(5.1, 7.0).unwrap());
        assert_eq!(ranges.get(Feature::PetalWidth), FeatureRange::new(0.2, 2.5).unwrap());
        assert!(FeatureRanges::from_dataset(&IrisDataset::default()).is_none());

        let mut generator = SampleGenerator::new(ranges.clone(), StdRng::seed_from_u64(1));
        for _ in 0..1_000 {
            assert!(ranges.contains(&generator.next_sample()));
        }
    }

    #[test]
    fn test_degenerate_range_yields_constant() {
        let dataset = IrisDataset::new(vec![IrisSample::labeled([5.0, 3.0, 1.5, 0.2], "A")]);
        let ranges = FeatureRanges::from_dataset(&dataset).unwrap();
        let sample = SampleGenerator::new(ranges, StdRng::seed_from_u64(3)).next_sample();
        assert_eq!(sample.features(), [5.0, 3.0, 1.5, 0.2]);
    }
}

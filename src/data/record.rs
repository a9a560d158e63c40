use std::fmt;

use serde::Deserialize;

/// The number of measurement columns in an Iris row
pub const NUM_FEATURES: usize = 4;

/// One of the four measurement columns, in file order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    SepalLength,
    SepalWidth,
    PetalLength,
    PetalWidth,
}

impl Feature {
    /// All columns in the order they appear in the data file
    pub const ALL: [Feature; NUM_FEATURES] = [
        Feature::SepalLength,
        Feature::SepalWidth,
        Feature::PetalLength,
        Feature::PetalWidth,
    ];

    /// Column name used in pipeline step descriptions
    pub fn name(self) -> &'static str {
        match self {
            Feature::SepalLength => "SepalLength",
            Feature::SepalWidth => "SepalWidth",
            Feature::PetalLength => "PetalLength",
            Feature::PetalWidth => "PetalWidth",
        }
    }

    /// Human-readable caption printed next to a sampled value
    pub fn caption(self) -> &'static str {
        match self {
            Feature::SepalLength => "Sepal length",
            Feature::SepalWidth => "Sepal width",
            Feature::PetalLength => "Petal length",
            Feature::PetalWidth => "Petal width",
        }
    }

    /// Plausible measurement range in centimeters, inclusive on both ends.
    pub fn documented_range(self) -> (f32, f32) {
        match self {
            Feature::SepalLength => (4.3, 7.9),
            Feature::SepalWidth => (2.0, 4.4),
            Feature::PetalLength => (1.0, 6.9),
            Feature::PetalWidth => (0.0, 2.4),
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single flower: four measurements in centimeters and, for training rows, a species label.
#[derive(Debug, Clone, PartialEq)]
pub struct IrisSample {
    pub sepal_length: f32,
    pub sepal_width: f32,
    pub petal_length: f32,
    pub petal_width: f32,
    pub label: Option<String>,
}

impl IrisSample {
    /// Creates an unlabeled sample from measurements in file order
    pub fn new(features: [f32; NUM_FEATURES]) -> Self {
        let [sepal_length, sepal_width, petal_length, petal_width] = features;
        IrisSample {
            sepal_length,
            sepal_width,
            petal_length,
            petal_width,
            label: None,
        }
    }

    /// Creates a labeled training sample
    pub fn labeled(features: [f32; NUM_FEATURES], label: impl Into<String>) -> Self {
        IrisSample {
            label: Some(label.into()),
            ..IrisSample::new(features)
        }
    }

    pub fn value(&self, feature: Feature) -> f32 {
        match feature {
            Feature::SepalLength => self.sepal_length,
            Feature::SepalWidth => self.sepal_width,
            Feature::PetalLength => self.petal_length,
            Feature::PetalWidth => self.petal_width,
        }
    }

    /// Extracts the measurements as an array in file order
    pub fn features(&self) -> [f32; NUM_FEATURES] {
        Feature::ALL.map(|feature| self.value(feature))
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Checks the measurement and label invariants, returning the first violation.
    pub fn validate(&self) -> Result<(), String> {
        for feature in Feature::ALL {
            let value = self.value(feature);
            if !value.is_finite() {
                return Err(format!("{} is not a finite number", feature.name()));
            }
            if value < 0.0 {
                return Err(format!("{} is negative ({})", feature.name(), value));
            }
        }
        if matches!(self.label(), Some(label) if label.is_empty()) {
            return Err("label is empty".to_string());
        }
        Ok(())
    }
}

/// A row of the data file, columns matched by position
#[derive(Debug, Deserialize)]
pub(crate) struct IrisRecord {
    sepal_length: f32,
    sepal_width: f32,
    petal_length: f32,
    petal_width: f32,
    label: String,
}

impl IrisRecord {
    pub(crate) fn into_sample(self) -> IrisSample {
        IrisSample::labeled(
            [
                self.sepal_length,
                self.sepal_width,
                self.petal_length,
                self.petal_width,
            ],
            self.label,
        )
    }
}

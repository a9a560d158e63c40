use std::io::{self, Write};
use std::path::PathBuf;

use clap::Parser;
use tempfile::NamedTempFile;

use iris_predictor::app::run_with;
use iris_predictor::data::{Dataset, Feature};
use iris_predictor::session::{FixedCount, KeySource, LoopAction};
use iris_predictor::{load_dataset, Config, DataError, IrisSample, PipelineBuilder};

const THREE_ROWS: &str = "5.1,3.5,1.4,0.2,setosa\n\
                          7.0,3.2,4.7,1.4,versicolor\n\
                          6.3,3.3,6.0,2.5,virginica\n";

fn bundled_data() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data/iris-data.txt")
}

fn write_dataset(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

/// Continues a fixed number of times, then presses Escape
struct PressKeys {
    continues: usize,
}

impl KeySource for PressKeys {
    fn next_action(&mut self) -> io::Result<LoopAction> {
        if self.continues == 0 {
            return Ok(LoopAction::Quit);
        }
        self.continues -= 1;
        Ok(LoopAction::Continue)
    }

    fn prompt(&self) -> Option<&str> {
        Some("Esc to quit...")
    }
}

#[test]
fn test_load_round_trip() {
    let file = write_dataset(THREE_ROWS);
    let dataset = load_dataset(file.path()).unwrap();
    assert_eq!(dataset.len(), 3);
    assert_eq!(
        dataset.samples(),
        &[
            IrisSample::labeled([5.1, 3.5, 1.4, 0.2], "setosa"),
            IrisSample::labeled([7.0, 3.2, 4.7, 1.4], "versicolor"),
            IrisSample::labeled([6.3, 3.3, 6.0, 2.5], "virginica"),
        ]
    );
}

#[test]
fn test_bundled_dataset_loads() {
    let dataset = load_dataset(bundled_data()).unwrap();
    assert_eq!(dataset.len(), 150);
    assert_eq!(
        dataset.distinct_labels(),
        vec!["Iris-setosa", "Iris-versicolor", "Iris-virginica"]
    );
    let sepal_lengths = dataset.feature_matrix(&[Feature::SepalLength]);
    let min = sepal_lengths.iter().cloned().fold(f32::INFINITY, f32::min);
    let max = sepal_lengths.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
    assert_eq!((min, max), (4.3, 7.9));
}

#[test]
fn test_malformed_files_fail_the_same_way_twice() {
    for contents in ["5.1,3.5,1.4,setosa\n", "5.1,3.5,x,0.2,setosa\n"] {
        let file = write_dataset(contents);
        let first = load_dataset(file.path()).unwrap_err().to_string();
        let second = load_dataset(file.path()).unwrap_err().to_string();
        assert_eq!(first, second);
    }
    let file = write_dataset("5.1,3.5,1.4,setosa\n");
    assert!(matches!(
        load_dataset(file.path()),
        Err(DataError::ColumnCount { .. })
    ));
}

#[test]
fn test_bundled_dataset_trains_well() {
    let dataset = load_dataset(bundled_data()).unwrap();
    let model = PipelineBuilder::new().build().unwrap().fit(&dataset).unwrap();
    let metrics = model.evaluate(&dataset).unwrap();
    assert!(metrics.accuracy > 0.9, "training accuracy {}", metrics.accuracy);

    let prediction = model.predict(&IrisSample::new([5.0, 3.4, 1.5, 0.2])).unwrap();
    assert_eq!(prediction.label, "Iris-setosa");
    let prediction = model.predict(&IrisSample::new([7.7, 3.0, 6.1, 2.3])).unwrap();
    assert_eq!(prediction.label, "Iris-virginica");
}

#[test]
fn test_session_until_escape() {
    let file = write_dataset(THREE_ROWS);
    let config = Config::parse_from([
        "iris-predictor",
        "--data",
        file.path().to_str().unwrap(),
        "--seed",
        "5",
    ]);
    let mut out = Vec::new();
    let rounds = run_with(&config, &mut PressKeys { continues: 2 }, &mut out).unwrap();
    assert_eq!(rounds, 3);

    let text = String::from_utf8(out).unwrap();
    let mut lines = text.lines();
    let loading = lines.next().unwrap();
    assert!(loading.starts_with("Loading dataset... ") && loading.ends_with(" ms"));
    let training = lines.next().unwrap();
    assert!(training.starts_with("Training the model... ") && training.ends_with(" ms"));
    assert_eq!(lines.next(), Some(""));

    let predicted: Vec<&str> = text
        .lines()
        .filter_map(|line| line.strip_prefix("Predicted flower type is: "))
        .collect();
    assert_eq!(predicted.len(), 3);
    for label in predicted {
        assert!(["setosa", "versicolor", "virginica"].contains(&label));
    }
    assert_eq!(text.matches("Esc to quit...").count(), 3);
}

#[test]
fn test_evaluate_and_dataset_ranges() {
    let config = Config::parse_from([
        "iris-predictor",
        "--data",
        bundled_data().to_str().unwrap(),
        "--seed",
        "1",
        "--ranges",
        "dataset",
        "--evaluate",
    ]);
    let mut out = Vec::new();
    let rounds = run_with(&config, &mut FixedCount::new(2), &mut out).unwrap();
    assert_eq!(rounds, 2);

    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("Overall accuracy: "));
    assert!(text.contains("Confusion matrix"));
    assert_eq!(text.matches("Predicted flower type is: ").count(), 2);
}

#[test]
fn test_missing_file_is_reported() {
    let config = Config::parse_from(["iris-predictor", "--data", "no/such/iris-data.txt"]);
    let mut out = Vec::new();
    let err = run_with(&config, &mut FixedCount::new(1), &mut out).unwrap_err();
    let message = format!("{:#}", err);
    assert!(message.contains("no/such/iris-data.txt"), "{}", message);
    assert!(err.downcast_ref::<DataError>().is_some());
}

#[test]
fn test_single_label_file() {
    let file = write_dataset("5.1,3.5,1.4,0.2,A\n4.9,3.0,1.4,0.2,A\n");
    let config = Config::parse_from([
        "iris-predictor",
        "--data",
        file.path().to_str().unwrap(),
        "--seed",
        "3",
    ]);
    let mut out = Vec::new();
    run_with(&config, &mut FixedCount::new(20), &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text
        .lines()
        .filter_map(|line| line.strip_prefix("Predicted flower type is: "))
        .all(|label| label == "A"));
}

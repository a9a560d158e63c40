use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::debug;

use super::dataset::IrisDataset;
use super::record::{IrisRecord, NUM_FEATURES};
use crate::error::DataError;

/// Columns per row: the measurements followed by the label
pub const NUM_COLUMNS: usize = NUM_FEATURES + 1;

/// Loads the Iris dataset from a headerless, comma-separated file
///
/// # Arguments
/// * `path` - Path to the data file
///
/// # Returns
/// Every row of the file as a labeled sample, in file order
pub fn load_dataset(path: impl AsRef<Path>) -> Result<IrisDataset, DataError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let dataset = read_dataset(file)?;
    debug!(path = %path.display(), rows = dataset.samples().len(), "dataset loaded");
    Ok(dataset)
}

/// Parses Iris rows from any reader.
///
/// Blank lines are skipped. Every other row must hold exactly four numeric
/// measurements and a non-empty label; the first row that does not fails the
/// whole load.
pub fn read_dataset<R: Read>(reader: R) -> Result<IrisDataset, DataError> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut samples = Vec::new();
    let mut row = StringRecord::new();
    while rdr.read_record(&mut row)? {
        let line = row.position().map_or(0, |pos| pos.line());

        // Whitespace-only lines come through as a single empty field
        if row.len() == 1 && row[0].is_empty() {
            continue;
        }
        if row.len() != NUM_COLUMNS {
            return Err(DataError::ColumnCount {
                line,
                expected: NUM_COLUMNS,
                found: row.len(),
            });
        }

        let record: IrisRecord = row.deserialize(None)?;
        let sample = record.into_sample();
        sample
            .validate()
            .map_err(|reason| DataError::Invalid { line, reason })?;
        samples.push(sample);
    }

    Ok(IrisDataset::new(samples))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::record::IrisSample;

    const THREE_ROWS: &str = "5.1,3.5,1.4,0.2,setosa\n\
                              7.0,3.2,4.7,1.4,versicolor\n\
                              6.3,3.3,6.0,2.5,virginica\n";

    #[test]
    fn test_read_well_formed_rows() {
        let dataset = read_dataset(THREE_ROWS.as_bytes()).unwrap();
        assert_eq!(dataset.samples().len(), 3);
        assert_eq!(
            dataset.samples()[1],
            IrisSample::labeled([7.0, 3.2, 4.7, 1.4], "versicolor")
        );
        assert_eq!(dataset.samples()[2].label(), Some("virginica"));
    }

    #[test]
    fn test_blank_lines_and_padding_are_ignored() {
        let text = "\n 5.1 , 3.5,1.4,0.2, Iris-setosa \n\n6.3,3.3,6.0,2.5,Iris-virginica\n\n";
        let dataset = read_dataset(text.as_bytes()).unwrap();
        assert_eq!(dataset.samples().len(), 2);
        assert_eq!(dataset.samples()[0].sepal_length, 5.1);
        assert_eq!(dataset.samples()[0].label(), Some("Iris-setosa"));
    }

    #[test]
    fn test_missing_column_fails() {
        let text = "5.1,3.5,1.4,0.2,setosa\n7.0,3.2,4.7,versicolor\n";
        match read_dataset(text.as_bytes()) {
            Err(DataError::ColumnCount { line, found, .. }) => {
                assert_eq!(line, 2);
                assert_eq!(found, 4);
            }
            other => panic!("expected a column count error, got {:?}", other),
        }
    }

    #[test]
    fn test_extra_column_fails() {
        let text = "5.1,3.5,1.4,0.2,setosa,extra\n";
        assert!(matches!(
            read_dataset(text.as_bytes()),
            Err(DataError::ColumnCount { found: 6, .. })
        ));
    }

    #[test]
    fn test_non_numeric_feature_fails() {
        let text = "5.1,3.5,1.4,0.2,setosa\n7.0,wide,4.7,1.4,versicolor\n";
        assert!(matches!(
            read_dataset(text.as_bytes()),
            Err(DataError::Csv(_))
        ));
    }

    #[test]
    fn test_negative_measurement_fails() {
        let text = "5.1,3.5,-1.4,0.2,setosa\n";
        assert!(matches!(
            read_dataset(text.as_bytes()),
            Err(DataError::Invalid { line: 1, .. })
        ));
    }

    #[test]
    fn test_empty_label_fails() {
        let text = "5.1,3.5,1.4,0.2,\n";
        assert!(matches!(
            read_dataset(text.as_bytes()),
            Err(DataError::Invalid { .. })
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_dataset("definitely/not/here/iris-data.txt").unwrap_err();
        assert!(matches!(err, DataError::Io { .. }));
        assert!(err.to_string().contains("iris-data.txt"));
    }
}

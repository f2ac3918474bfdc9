//! CSV loading

use dedupx_core::{Dataset, Error, Record, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Read a CSV file into a dataset of normalized records.
///
/// Record IDs are 0-based data row positions. Rows with a different number
/// of fields than the header are an error.
pub fn load_dataset(path: &Path) -> Result<Dataset> {
    let file = File::open(path)?;
    let dataset = read_dataset(file)?;
    debug!("Loaded {} records from {:?}", dataset.len(), path);
    Ok(dataset)
}

pub fn read_dataset<R: Read>(reader: R) -> Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);

    let headers = reader.headers().map_err(csv_error)?.clone();
    let mut dataset = Dataset::new(headers.iter().map(str::to_string).collect());

    for row in reader.records() {
        let row = row.map_err(csv_error)?;
        dataset.push(Record::from_raw(headers.iter().zip(row.iter())));
    }

    Ok(dataset)
}

pub(crate) fn csv_error(e: csv::Error) -> Error {
    if e.is_io_error() {
        match e.into_kind() {
            csv::ErrorKind::Io(io) => Error::Io(io),
            other => Error::Csv(format!("{:?}", other)),
        }
    } else {
        Error::Csv(e.to_string())
    }
}

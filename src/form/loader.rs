//! Load applicant form states from a CSV export
//!
//! The header row holds field keys; each following row is one applicant.
//! Empty cells are left out so the engine sees them as missing inputs.

use super::{FieldValue, FormState};
use crate::error::TableError;
use csv::Reader;
use std::path::Path;

/// Default path to the sample applicants file
pub const DEFAULT_APPLICANTS_PATH: &str = "data/applicants.csv";

/// Load every applicant from a CSV file
pub fn load_applicants<P: AsRef<Path>>(path: P) -> Result<Vec<FormState>, TableError> {
    let path = path.as_ref();
    let csv_error = |source| TableError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = Reader::from_path(path).map_err(csv_error)?;
    let headers = reader.headers().map_err(csv_error)?.clone();
    let mut applicants = Vec::new();

    for result in reader.records() {
        let record = result.map_err(csv_error)?;
        let state: FormState = headers
            .iter()
            .zip(record.iter())
            .filter(|(_, cell)| !cell.trim().is_empty())
            .map(|(key, cell)| (key.trim().to_string(), FieldValue::from(cell.trim())))
            .collect();
        applicants.push(state);
    }

    log::info!("loaded {} applicants from {}", applicants.len(), path.display());
    Ok(applicants)
}

/// Load the sample applicants shipped with the crate
pub fn load_default_applicants() -> Result<Vec<FormState>, TableError> {
    load_applicants(DEFAULT_APPLICANTS_PATH)
}

//! In-memory cost of attendance table loaded from CSV

use super::CostLookup;
use crate::engine::CostRow;
use crate::error::{CostLookupError, TableError};
use crate::form::FieldValue;
use csv::Reader;
use serde::Deserialize;
use std::collections::HashMap;
use std::future::Future;
use std::path::Path;

/// Default path to the cost of attendance table
pub const DEFAULT_COSTS_PATH: &str = "data/cost_of_attendance.csv";

/// One row of the cost CSV; empty cells are None
#[derive(Debug, Clone, Deserialize)]
struct CostCsvRow {
    key: String,
    tuition: Option<f64>,
    room_and_board: Option<f64>,
    books: Option<f64>,
    miscellaneous: Option<f64>,
    transportation: Option<f64>,
    federal_stafford_loan_fee: Option<f64>,
    dependent_living_with_parents: Option<f64>,
    dependent_living_without_parents: Option<f64>,
    independent_off_campus: Option<f64>,
}

impl CostCsvRow {
    fn into_entry(self) -> (String, CostRow) {
        let cell = |value: Option<f64>| value.map(FieldValue::Number);
        let row = CostRow {
            tuition: cell(self.tuition),
            room_and_board: cell(self.room_and_board),
            books: cell(self.books),
            miscellaneous: cell(self.miscellaneous),
            transportation: cell(self.transportation),
            federal_stafford_loan_fee: cell(self.federal_stafford_loan_fee),
            dependent_living_with_parents: cell(self.dependent_living_with_parents),
            dependent_living_without_parents: cell(self.dependent_living_without_parents),
            independent_off_campus: cell(self.independent_off_campus),
        };
        (self.key.trim().to_string(), row)
    }
}

/// Cost rows keyed by lookup key
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CostTable {
    rows: HashMap<String, CostRow>,
}

impl CostTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the table from the default location
    pub fn from_csv() -> Result<Self, TableError> {
        Self::from_csv_path(Path::new(DEFAULT_COSTS_PATH))
    }

    pub fn from_csv_path(path: &Path) -> Result<Self, TableError> {
        let csv_error = |source| TableError::Csv {
            path: path.to_path_buf(),
            source,
        };
        let mut reader = Reader::from_path(path).map_err(csv_error)?;

        let mut table = Self::new();
        for result in reader.deserialize::<CostCsvRow>() {
            let (key, row) = result.map_err(csv_error)?.into_entry();
            if key.is_empty() {
                return Err(TableError::invalid(&path.display().to_string(), "row with an empty key"));
            }
            table.insert(key, row);
        }

        log::info!("loaded {} cost of attendance rows from {}", table.len(), path.display());
        Ok(table)
    }

    /// Add or replace a row
    pub fn insert(&mut self, key: impl Into<String>, row: CostRow) {
        self.rows.insert(key.into(), row);
    }

    pub fn get(&self, key: &str) -> Option<&CostRow> {
        self.rows.get(key)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl CostLookup for CostTable {
    fn fetch(&self, key: &str) -> impl Future<Output = Result<Option<CostRow>, CostLookupError>> + Send {
        let row = self.get(key).cloned();
        async move { Ok(row) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_shipped_costs() {
        let table = CostTable::from_csv().unwrap();
        let resident = table.get("fall_2026_on-campus_resident").unwrap();
        assert_eq!(resident.tuition, Some(FieldValue::Number(48950.0)));
        assert_eq!(resident.living_allowance(), None);
        assert_eq!(resident.totals(true).total, 48950.0 + 15800.0 + 1200.0 + 1850.0 + 900.0 + 69.0);

        let independent = table.get("fall_2026_off-campus_independent").unwrap();
        assert_eq!(independent.living_allowance(), Some(&FieldValue::Number(15900.0)));
        assert!(table.get("summer_2026_on-campus_resident").is_none());
    }

    #[test]
    fn test_empty_key_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "key,tuition,room_and_board,books,miscellaneous,transportation,federal_stafford_loan_fee,\
             dependent_living_with_parents,dependent_living_without_parents,independent_off_campus"
        )
        .unwrap();
        writeln!(file, " ,1000,,,,,,,,").unwrap();
        assert!(matches!(
            CostTable::from_csv_path(file.path()),
            Err(TableError::Invalid { .. })
        ));
    }

    #[tokio::test]
    async fn test_fetch_hit_and_miss() {
        let mut table = CostTable::new();
        table.insert(
            "fall_2026_commuter",
            CostRow {
                tuition: Some(FieldValue::Number(30000.0)),
                ..CostRow::default()
            },
        );
        assert!(table.fetch("fall_2026_commuter").await.unwrap().is_some());
        assert!(table.fetch("spring_2027_commuter").await.unwrap().is_none());
    }
}

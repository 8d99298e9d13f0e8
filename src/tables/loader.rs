//! CSV overlays for the annual table refresh
//!
//! Each file in the tables directory is optional. A file that is present
//! replaces the built-in values it covers; everything else keeps the
//! built-in award-year values.

use super::{AllowanceTable, FamilySizeSchedule, MeritTable, PovertyRegion, RateTables};
use crate::error::TableError;
use csv::Reader;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Default path to the tables directory
pub const DEFAULT_TABLES_PATH: &str = "data/tables";

pub const ALLOWANCE_FILE: &str = "income_protection_allowance.csv";
pub const ALLOWANCE_INCREMENTS_FILE: &str = "income_protection_increments.csv";
pub const POVERTY_FILE: &str = "poverty_guidelines.csv";
pub const POVERTY_INCREMENTS_FILE: &str = "poverty_increments.csv";
pub const MERIT_FILE: &str = "merit_awards.csv";

#[derive(Debug, Clone, Deserialize)]
pub struct AllowanceRow {
    pub table: AllowanceTable,
    pub family_size: u32,
    pub amount: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AllowanceIncrementRow {
    pub table: AllowanceTable,
    pub increment: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PovertyRow {
    pub region: PovertyRegion,
    pub family_size: u32,
    pub amount: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PovertyIncrementRow {
    pub region: PovertyRegion,
    pub increment: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MeritRow {
    pub rating: u32,
    pub amount: f64,
}

/// Read every row of an optional CSV file; None when the file is absent
fn load_optional<T: DeserializeOwned>(dir: &Path, file: &str) -> Result<Option<Vec<T>>, TableError> {
    let path = dir.join(file);
    if !path.exists() {
        return Ok(None);
    }

    let mut reader = Reader::from_path(&path).map_err(|source| TableError::Csv {
        path: path.clone(),
        source,
    })?;
    let mut rows = Vec::new();
    for result in reader.deserialize() {
        let row: T = result.map_err(|source| TableError::Csv {
            path: path.clone(),
            source,
        })?;
        rows.push(row);
    }
    Ok(Some(rows))
}

fn check_amount(file: &str, amount: f64) -> Result<(), TableError> {
    if amount.is_finite() && amount >= 0.0 {
        Ok(())
    } else {
        Err(TableError::invalid(file, format!("amount {} must be a non-negative number", amount)))
    }
}

/// Every overlay file found in a tables directory
#[derive(Debug, Clone, Default)]
pub struct LoadedTables {
    pub allowances: Option<Vec<AllowanceRow>>,
    pub allowance_increments: Option<Vec<AllowanceIncrementRow>>,
    pub poverty: Option<Vec<PovertyRow>>,
    pub poverty_increments: Option<Vec<PovertyIncrementRow>>,
    pub merit: Option<Vec<MeritRow>>,
}

impl LoadedTables {
    /// Load overlays from the default path
    pub fn load_default() -> Result<Self, TableError> {
        Self::load_from(Path::new(DEFAULT_TABLES_PATH))
    }

    /// Load overlays from a specific path
    pub fn load_from(path: &Path) -> Result<Self, TableError> {
        if !path.is_dir() {
            return Err(TableError::Io {
                path: path.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "tables directory not found"),
            });
        }

        Ok(Self {
            allowances: load_optional(path, ALLOWANCE_FILE)?,
            allowance_increments: load_optional(path, ALLOWANCE_INCREMENTS_FILE)?,
            poverty: load_optional(path, POVERTY_FILE)?,
            poverty_increments: load_optional(path, POVERTY_INCREMENTS_FILE)?,
            merit: load_optional(path, MERIT_FILE)?,
        })
    }

    /// Number of overlay files that were present
    pub fn file_count(&self) -> usize {
        [
            self.allowances.is_some(),
            self.allowance_increments.is_some(),
            self.poverty.is_some(),
            self.poverty_increments.is_some(),
            self.merit.is_some(),
        ]
        .iter()
        .filter(|present| **present)
        .count()
    }

    /// Replace the covered parts of `tables` with the loaded values
    pub fn apply(&self, tables: &mut RateTables) -> Result<(), TableError> {
        if let Some(rows) = &self.allowances {
            let mut by_table: BTreeMap<u8, (AllowanceTable, Vec<(u32, f64)>)> = BTreeMap::new();
            for row in rows {
                check_amount(ALLOWANCE_FILE, row.amount)?;
                by_table
                    .entry(row.table as u8)
                    .or_insert_with(|| (row.table, Vec::new()))
                    .1
                    .push((row.family_size, row.amount));
            }
            for (table, sizes) in by_table.into_values() {
                let schedule = tables.allowances.schedule_mut(table);
                *schedule = FamilySizeSchedule::from_rows(&sizes, schedule.increment())
                    .map_err(|msg| TableError::invalid(ALLOWANCE_FILE, format!("{:?}: {}", table, msg)))?;
            }
        }

        if let Some(rows) = &self.allowance_increments {
            for row in rows {
                check_amount(ALLOWANCE_INCREMENTS_FILE, row.increment)?;
                tables.allowances.schedule_mut(row.table).set_increment(row.increment);
            }
        }

        if let Some(rows) = &self.poverty {
            let mut by_region: BTreeMap<u8, (PovertyRegion, Vec<(u32, f64)>)> = BTreeMap::new();
            for row in rows {
                check_amount(POVERTY_FILE, row.amount)?;
                by_region
                    .entry(row.region as u8)
                    .or_insert_with(|| (row.region, Vec::new()))
                    .1
                    .push((row.family_size, row.amount));
            }
            for (region, sizes) in by_region.into_values() {
                if sizes.iter().all(|(size, _)| *size != 1) {
                    return Err(TableError::invalid(
                        POVERTY_FILE,
                        format!("{:?} guidelines must start at family size 1", region),
                    ));
                }
                let schedule = tables.poverty.schedule_mut(region);
                *schedule = FamilySizeSchedule::from_rows(&sizes, schedule.increment())
                    .map_err(|msg| TableError::invalid(POVERTY_FILE, format!("{:?}: {}", region, msg)))?;
            }
        }

        if let Some(rows) = &self.poverty_increments {
            for row in rows {
                check_amount(POVERTY_INCREMENTS_FILE, row.increment)?;
                tables.poverty.schedule_mut(row.region).set_increment(row.increment);
            }
        }

        if let Some(rows) = &self.merit {
            for row in rows {
                check_amount(MERIT_FILE, row.amount)?;
            }
            tables.merit = MeritTable::from_rows(rows.iter().map(|row| (row.rating, row.amount)));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_shipped_tables_match_built_in_values() {
        let loaded = LoadedTables::load_default();
        assert!(loaded.is_ok(), "Failed to load tables: {:?}", loaded.err());
        let loaded = loaded.unwrap();
        assert_eq!(loaded.file_count(), 5);

        let mut tables = RateTables::institutional();
        loaded.apply(&mut tables).unwrap();
        assert_eq!(tables, RateTables::institutional());
    }

    #[test]
    fn test_partial_overlay() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(MERIT_FILE), "rating,amount\n20,30000\n10,15000\n").unwrap();
        fs::write(dir.path().join(POVERTY_INCREMENTS_FILE), "region,increment\nalaska,7000\n").unwrap();

        let loaded = LoadedTables::load_from(dir.path()).unwrap();
        assert_eq!(loaded.file_count(), 2);

        let mut tables = RateTables::institutional();
        loaded.apply(&mut tables).unwrap();
        assert_eq!(tables.merit.award(20), 30000.0);
        // merit file replaces the whole table
        assert_eq!(tables.merit.award(23), 0.0);
        assert_eq!(tables.poverty.guideline(PovertyRegion::Alaska, 9), Some(67710.0 + 7000.0));
        // untouched tables keep the built-in values
        assert_eq!(tables.allowances, RateTables::institutional().allowances);
    }

    #[test]
    fn test_allowance_overlay_rebuilds_schedule() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(ALLOWANCE_FILE),
            "table,family_size,amount\ndependent_parents,2,28000\ndependent_parents,3,35000\n",
        )
        .unwrap();

        let mut tables = RateTables::institutional();
        LoadedTables::load_from(dir.path()).unwrap().apply(&mut tables).unwrap();
        assert_eq!(tables.allowances.allowance(AllowanceTable::DependentParents, 3), 35000.0);
        assert_eq!(tables.allowances.allowance(AllowanceTable::DependentParents, 4), 35000.0 + 6610.0);
        assert_eq!(tables.allowances.allowance(AllowanceTable::IndependentMarried, 3), 54580.0);
    }

    #[test]
    fn test_invalid_overlays_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(POVERTY_FILE), "region,family_size,amount\ncontiguous,2,21150\n").unwrap();
        let mut tables = RateTables::institutional();
        let err = LoadedTables::load_from(dir.path()).unwrap().apply(&mut tables).unwrap_err();
        assert!(matches!(err, TableError::Invalid { .. }));

        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(MERIT_FILE), "rating,amount\n20,-5\n").unwrap();
        let err = LoadedTables::load_from(dir.path()).unwrap().apply(&mut tables).unwrap_err();
        assert!(matches!(err, TableError::Invalid { .. }));

        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(MERIT_FILE), "rating,amount\ntwenty,5\n").unwrap();
        assert!(matches!(LoadedTables::load_from(dir.path()), Err(TableError::Csv { .. })));

        assert!(LoadedTables::load_from(Path::new("no/such/dir")).is_err());
    }
}

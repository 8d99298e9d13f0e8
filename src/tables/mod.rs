//! Federal and institutional rate tables used by the aid calculation

mod allowance;
mod awards;
mod gift_aid;
mod poverty;
mod quality;
pub mod loader;

pub use allowance::{AllowanceTable, FamilySizeSchedule, IncomeProtectionTables};
pub use awards::{AddOnGrants, MeritTable, PackagingRules, PellParameters};
pub use gift_aid::{AidGroup, GiftAidEntry, GiftAidMatrix, NeedBracket, RatingBand};
pub use loader::LoadedTables;
pub use poverty::{PovertyGuidelines, PovertyRegion};
pub use quality::{ApplicantSex, QualityChart, QualityRow, RowCriteria, ScoreRange};

use crate::error::TableError;
use std::path::Path;
use std::sync::{Arc, OnceLock};

/// Container for every table the engine reads; immutable once built
#[derive(Debug, Clone, PartialEq)]
pub struct RateTables {
    pub allowances: IncomeProtectionTables,
    pub poverty: PovertyGuidelines,
    pub pell: PellParameters,
    pub quality: QualityChart,
    pub merit: MeritTable,
    pub add_ons: AddOnGrants,
    pub gift_aid: GiftAidMatrix,
    pub packaging: PackagingRules,
}

static INSTITUTIONAL: OnceLock<Arc<RateTables>> = OnceLock::new();

impl RateTables {
    /// Built-in tables for the current award year
    pub fn institutional() -> Self {
        Self {
            allowances: IncomeProtectionTables::award_year(),
            poverty: PovertyGuidelines::current(),
            pell: PellParameters::award_year(),
            quality: QualityChart::institutional(),
            merit: MeritTable::institutional(),
            add_ons: AddOnGrants::institutional(),
            gift_aid: GiftAidMatrix::institutional(),
            packaging: PackagingRules::institutional(),
        }
    }

    /// Process-wide shared copy of the built-in tables, built on first use
    pub fn shared() -> Arc<RateTables> {
        INSTITUTIONAL
            .get_or_init(|| Arc::new(Self::institutional()))
            .clone()
    }

    /// Built-in tables with overlays from the default location (data/tables/)
    pub fn from_csv() -> Result<Self, TableError> {
        Self::from_csv_path(Path::new(loader::DEFAULT_TABLES_PATH))
    }

    /// Built-in tables with overlays from a specific directory
    pub fn from_csv_path(path: &Path) -> Result<Self, TableError> {
        let loaded = LoadedTables::load_from(path)?;
        let mut tables = Self::institutional();
        loaded.apply(&mut tables)?;
        log::info!(
            "applied {} table overlay file(s) from {}",
            loaded.file_count(),
            path.display()
        );
        Ok(tables)
    }
}

impl Default for RateTables {
    fn default() -> Self {
        Self::institutional()
    }
}

//! Recalculation engine: need analysis, award packaging, and the stage pipeline

pub mod award;
pub mod cost;
pub mod need;
pub mod pipeline;
pub mod summary;

pub use award::{package_awards, AwardInputs, AwardPackage, DisplayBand};
pub use cost::{resolve_key, CostOutcome, CostRow, CostTotals};
pub use need::{PellOutcome, sai_and_pell};
pub use pipeline::{AidEngine, Pipeline, Stage};
pub use summary::{EstimateSummary, APPLICANT_ID};

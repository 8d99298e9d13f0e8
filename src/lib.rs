//! Aid Estimator - Net price engine for prospective student financial aid forms
//!
//! This library provides:
//! - Cost of attendance lookup from a CSV table or the institution's query service
//! - Federal need analysis (income protection allowance, poverty guideline, SAI, Pell)
//! - Institutional award packaging (quality rating, merit, add-ons, need-based gift aid)
//! - Net price estimates with display bands
//! - Session state persistence and batch scoring

pub mod cost_source;
pub mod engine;
pub mod error;
pub mod form;
pub mod orchestrator;
pub mod scenario;
pub mod tables;

// Re-export commonly used types
pub use cost_source::{CostLookup, CostSource, CostTable, HttpCostSource};
pub use engine::{AidEngine, EstimateSummary, Pipeline};
pub use error::{CostLookupError, PipelineError, StoreError, TableError};
pub use form::{FieldValue, FormState};
pub use orchestrator::{FoldOutcome, Orchestrator};
pub use scenario::EstimateRunner;
pub use tables::RateTables;

//! Merit awards, add-on grants, federal Pell parameters, and packaging constants

use std::collections::BTreeMap;

/// Merit award by quality rating
#[derive(Debug, Clone, PartialEq)]
pub struct MeritTable {
    awards: BTreeMap<u32, f64>,
}

impl MeritTable {
    pub fn institutional() -> Self {
        let mut awards = BTreeMap::new();
        for rating in 50..=54 {
            awards.insert(rating, 32500.0);
        }
        for (rating, amount) in [
            (23, 31500.0),
            (22, 31000.0),
            (21, 30500.0),
            (20, 29500.0),
            (19, 29500.0),
            (18, 29000.0),
            (17, 29000.0),
            (16, 28500.0),
            (15, 28000.0),
            (14, 27500.0),
            (13, 26500.0),
            (12, 25500.0),
            (11, 20000.0),
            (10, 14500.0),
            (1, 0.0),
        ] {
            awards.insert(rating, amount);
        }
        Self { awards }
    }

    pub fn from_rows(rows: impl IntoIterator<Item = (u32, f64)>) -> Self {
        Self {
            awards: rows.into_iter().collect(),
        }
    }

    /// Award for a rating; unmapped ratings get nothing
    pub fn award(&self, rating: u32) -> f64 {
        self.awards.get(&rating).copied().unwrap_or(0.0)
    }

    pub fn set(&mut self, rating: u32, amount: f64) {
        self.awards.insert(rating, amount);
    }

    pub fn len(&self) -> usize {
        self.awards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.awards.is_empty()
    }
}

impl Default for MeritTable {
    fn default() -> Self {
        Self::institutional()
    }
}

/// Grants added on top of merit for applicants rated high enough
#[derive(Debug, Clone, PartialEq)]
pub struct AddOnGrants {
    /// Add-ons apply only at or above this rating
    pub minimum_rating: u32,
    /// Non-cohort applicants from outside the excluded states
    pub residency: f64,
    pub residency_excluded_states: Vec<String>,
    /// Applicants living in a residence hall
    pub resident_hall: f64,
    pub resident_hall_status: String,
    /// Non-cohort male applicants
    pub sex: f64,
}

impl AddOnGrants {
    pub fn institutional() -> Self {
        Self {
            minimum_rating: 10,
            residency: 2500.0,
            residency_excluded_states: [
                "Massachusetts",
                "Connecticut",
                "Rhode Island",
                "New York",
                "New Jersey",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            resident_hall: 3500.0,
            resident_hall_status: "on-campus_resident".to_string(),
            sex: 2000.0,
        }
    }

    pub fn is_excluded_state(&self, state: &str) -> bool {
        self.residency_excluded_states.iter().any(|s| s == state)
    }
}

impl Default for AddOnGrants {
    fn default() -> Self {
        Self::institutional()
    }
}

/// Federal Pell Grant parameters for the award year
#[derive(Debug, Clone, PartialEq)]
pub struct PellParameters {
    pub maximum_award: f64,
    pub minimum_award: f64,
    /// Lowest SAI the federal formula produces
    pub sai_floor: f64,
    /// AGI ceiling for single-parent households, as a multiple of the guideline
    pub single_parent_multiple: f64,
    /// AGI ceiling for every other household shape
    pub other_household_multiple: f64,
    /// SAI ceiling for the minimum Pell indicator, as a multiple of the guideline
    pub minimum_indicator_multiple: f64,
    /// Filing statuses that count as a single-parent household
    pub single_filing_statuses: Vec<String>,
}

impl PellParameters {
    pub fn award_year() -> Self {
        Self {
            maximum_award: 7395.0,
            minimum_award: 740.0,
            sai_floor: -1500.0,
            single_parent_multiple: 2.25,
            other_household_multiple: 1.75,
            minimum_indicator_multiple: 2.0,
            single_filing_statuses: ["Single", "Head of Household", "Qualifying Surviving Spouse"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }

    pub fn is_single_filing_status(&self, status: &str) -> bool {
        self.single_filing_statuses.iter().any(|s| s == status)
    }
}

impl Default for PellParameters {
    fn default() -> Self {
        Self::award_year()
    }
}

/// Self-help aid and display rules used when packaging the award
#[derive(Debug, Clone, PartialEq)]
pub struct PackagingRules {
    pub work_study: f64,
    /// Work-study is offered when need is at least this much
    pub work_study_minimum_need: f64,
    pub federal_loans: f64,
    /// Displayed estimates round to this step
    pub rounding_step: f64,
    /// Half-width of the displayed low/high band
    pub band_width: f64,
}

impl PackagingRules {
    pub fn institutional() -> Self {
        Self {
            work_study: 3000.0,
            work_study_minimum_need: 1.0,
            federal_loans: 5500.0,
            rounding_step: 10.0,
            band_width: 1500.0,
        }
    }
}

impl Default for PackagingRules {
    fn default() -> Self {
        Self::institutional()
    }
}

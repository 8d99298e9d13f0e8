//! Quality rating chart: GPA and composite score ranges per rating
//!
//! Cohort applicants are rated on the five cohort rows. Everyone else is rated
//! on the general rows, with separate ranges for male and female applicants.

use serde::{Deserialize, Serialize};

/// Applicant sex as recorded by the platform (first letter of `sys:sex`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApplicantSex {
    Male,
    Female,
    Unspecified,
}

impl ApplicantSex {
    /// "Male", "m", "M" all read as male; anything not starting with M or F
    /// is unspecified
    pub fn from_field(value: &str) -> Self {
        match value.trim().chars().next().map(|c| c.to_ascii_uppercase()) {
            Some('M') => ApplicantSex::Male,
            Some('F') => ApplicantSex::Female,
            _ => ApplicantSex::Unspecified,
        }
    }
}

/// Half-open range [low, high)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreRange {
    pub low: f64,
    pub high: f64,
}

impl ScoreRange {
    pub const fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.low && value < self.high
    }
}

/// How a chart row qualifies an applicant
#[derive(Debug, Clone, PartialEq)]
pub enum RowCriteria {
    /// Shared ranges for cohort applicants
    Cohort { gpa: ScoreRange, composite: ScoreRange },
    /// Sex-specific ranges for everyone else; rows without score ranges can
    /// only be reached through GPA
    General {
        gpa_female: ScoreRange,
        gpa_male: ScoreRange,
        composite_female: Option<ScoreRange>,
        composite_male: Option<ScoreRange>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct QualityRow {
    pub rating: u32,
    pub criteria: RowCriteria,
}

impl QualityRow {
    fn gpa_range(&self, cohort: bool, sex: ApplicantSex) -> Option<ScoreRange> {
        match (&self.criteria, cohort) {
            (RowCriteria::Cohort { gpa, .. }, true) => Some(*gpa),
            (RowCriteria::General { gpa_female, gpa_male, .. }, false) => {
                Some(if sex == ApplicantSex::Male { *gpa_male } else { *gpa_female })
            }
            _ => None,
        }
    }

    fn composite_range(&self, cohort: bool, sex: ApplicantSex) -> Option<ScoreRange> {
        match (&self.criteria, cohort) {
            (RowCriteria::Cohort { composite, .. }, true) => Some(*composite),
            (
                RowCriteria::General {
                    composite_female,
                    composite_male,
                    ..
                },
                false,
            ) => {
                if sex == ApplicantSex::Male {
                    *composite_male
                } else {
                    *composite_female
                }
            }
            _ => None,
        }
    }
}

/// The ordered rating chart; the first matching row wins
#[derive(Debug, Clone, PartialEq)]
pub struct QualityChart {
    rows: Vec<QualityRow>,
}

fn cohort(rating: u32, gpa: (f64, f64), composite: (f64, f64)) -> QualityRow {
    QualityRow {
        rating,
        criteria: RowCriteria::Cohort {
            gpa: ScoreRange::new(gpa.0, gpa.1),
            composite: ScoreRange::new(composite.0, composite.1),
        },
    }
}

fn general(rating: u32, gpa_female: (f64, f64), gpa_male: (f64, f64), composite: Option<(f64, f64)>) -> QualityRow {
    let composite = composite.map(|(low, high)| ScoreRange::new(low, high));
    QualityRow {
        rating,
        criteria: RowCriteria::General {
            gpa_female: ScoreRange::new(gpa_female.0, gpa_female.1),
            gpa_male: ScoreRange::new(gpa_male.0, gpa_male.1),
            composite_female: composite,
            composite_male: composite,
        },
    }
}

impl QualityChart {
    pub fn new(rows: Vec<QualityRow>) -> Self {
        Self { rows }
    }

    /// The institution's current chart
    pub fn institutional() -> Self {
        Self::new(vec![
            cohort(54, (3.75, 5.0), (1300.0, 9999.0)),
            cohort(53, (3.5, 3.75), (1200.0, 1300.0)),
            cohort(52, (3.31, 3.5), (1100.0, 1200.0)),
            cohort(51, (3.1, 3.3), (0.0, 1100.0)),
            cohort(50, (0.0, 3.1), (0.0, 0.0)),
            general(23, (4.1, 5.0), (4.1, 5.0), Some((1350.0, 9999.0))),
            general(22, (4.0, 4.1), (4.0, 4.1), Some((1300.0, 1350.0))),
            general(21, (4.0, 4.0), (3.9, 4.0), Some((1250.0, 1300.0))),
            general(20, (3.9, 4.0), (3.8, 3.9), Some((1250.0, 1300.0))),
            general(19, (3.8, 3.9), (3.7, 3.8), Some((1250.0, 1300.0))),
            general(18, (3.75, 3.8), (3.6, 3.7), Some((1250.0, 1300.0))),
            general(17, (3.7, 3.75), (3.5, 3.6), Some((1200.0, 1250.0))),
            general(16, (3.6, 3.7), (3.4, 3.5), Some((1200.0, 1250.0))),
            general(15, (3.5, 3.6), (3.3, 3.4), Some((1200.0, 1250.0))),
            general(14, (3.45, 3.5), (3.2, 3.3), Some((1150.0, 1200.0))),
            general(13, (3.4, 3.45), (3.1, 3.2), Some((1150.0, 1200.0))),
            general(12, (3.3, 3.4), (3.0, 3.1), Some((1150.0, 1200.0))),
            general(11, (3.2, 3.3), (2.9, 3.0), None),
            general(10, (2.9, 3.2), (2.75, 2.9), None),
            general(1, (0.0, 2.9), (0.0, 2.75), Some((0.0, 1150.0))),
        ])
    }

    pub fn rows(&self) -> &[QualityRow] {
        &self.rows
    }

    /// Rating earned by GPA alone; 0 when no row matches
    pub fn gpa_rating(&self, gpa: f64, cohort: bool, sex: ApplicantSex) -> u32 {
        self.rows
            .iter()
            .find(|row| row.gpa_range(cohort, sex).is_some_and(|r| r.contains(gpa)))
            .map(|row| row.rating)
            .unwrap_or(0)
    }

    /// Rating earned by composite score alone; 0 when no row matches
    pub fn composite_rating(&self, composite: f64, cohort: bool, sex: ApplicantSex) -> u32 {
        self.rows
            .iter()
            .find(|row| row.composite_range(cohort, sex).is_some_and(|r| r.contains(composite)))
            .map(|row| row.rating)
            .unwrap_or(0)
    }

    /// Quality rating: the better of the GPA and composite ratings
    pub fn rating(&self, gpa: f64, composite: f64, cohort: bool, sex: ApplicantSex) -> u32 {
        self.gpa_rating(gpa, cohort, sex)
            .max(self.composite_rating(composite, cohort, sex))
    }
}

impl Default for QualityChart {
    fn default() -> Self {
        Self::institutional()
    }
}

//! Gift-aid packaging matrix: need brackets by aid group and quality rating
//!
//! Each entry turns an applicant's merit award and total need into a target,
//! a minimum, and a maximum amount of gift aid.

use super::quality::ApplicantSex;
use serde::{Deserialize, Serialize};

/// Applicant population with its own packaging matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AidGroup {
    #[serde(rename = "SOC")]
    Cohort,
    #[serde(rename = "Non-SOC-F")]
    NonCohortFemale,
    #[serde(rename = "Non-SOC-M")]
    NonCohortMale,
}

impl AidGroup {
    /// Cohort first, then female, with everyone else on the male matrix
    pub fn for_applicant(cohort: bool, sex: ApplicantSex) -> Self {
        if cohort {
            AidGroup::Cohort
        } else if sex == ApplicantSex::Female {
            AidGroup::NonCohortFemale
        } else {
            AidGroup::NonCohortMale
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AidGroup::Cohort => "SOC",
            AidGroup::NonCohortFemale => "Non-SOC-F",
            AidGroup::NonCohortMale => "Non-SOC-M",
        }
    }
}

/// Gift-aid amounts for one applicant
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GiftAidEntry {
    pub target: f64,
    pub minimum: f64,
    pub maximum: f64,
}

impl GiftAidEntry {
    /// Amount to package: the target, but never below the minimum
    pub fn packaged(&self) -> f64 {
        self.target.max(self.minimum)
    }
}

/// Consecutive ratings that share a need share and floors
#[derive(Debug, Clone, PartialEq)]
pub struct RatingBand {
    pub first_rating: u32,
    pub last_rating: u32,
    /// Fraction of total need offered as gift aid
    pub need_share: f64,
    pub minimum_floor: f64,
    pub maximum_floor: f64,
}

impl RatingBand {
    pub fn covers(&self, rating: u32) -> bool {
        rating >= self.first_rating && rating <= self.last_rating
    }

    /// Entry for an applicant; merit always sets the lower bound
    pub fn entry(&self, merit: f64, need: f64) -> GiftAidEntry {
        GiftAidEntry {
            target: merit.max(self.need_share * need),
            minimum: merit.max(self.minimum_floor),
            maximum: merit.max(self.maximum_floor),
        }
    }
}

/// Inclusive range of total need
#[derive(Debug, Clone, PartialEq)]
pub struct NeedBracket {
    pub min_need: f64,
    pub max_need: f64,
    pub bands: Vec<RatingBand>,
}

impl NeedBracket {
    pub fn contains(&self, need: f64) -> bool {
        need >= self.min_need && need <= self.max_need
    }

    pub fn band(&self, rating: u32) -> Option<&RatingBand> {
        self.bands.iter().find(|band| band.covers(rating))
    }
}

fn band(ratings: (u32, u32), need_share: f64, minimum_floor: f64, maximum_floor: f64) -> RatingBand {
    RatingBand {
        first_rating: ratings.0,
        last_rating: ratings.1,
        need_share,
        minimum_floor,
        maximum_floor,
    }
}

/// Zero-need bracket: every general rating gets exactly its merit award
fn zero_need_bracket() -> NeedBracket {
    NeedBracket {
        min_need: 0.0,
        max_need: 0.0,
        bands: vec![band((1, 23), 0.0, 0.0, 0.0)],
    }
}

fn bracket(min_need: f64, max_need: f64, bands: Vec<RatingBand>) -> NeedBracket {
    NeedBracket {
        min_need,
        max_need,
        bands,
    }
}

/// Packaging matrices for all three aid groups
#[derive(Debug, Clone, PartialEq)]
pub struct GiftAidMatrix {
    pub cohort: Vec<NeedBracket>,
    pub non_cohort_female: Vec<NeedBracket>,
    pub non_cohort_male: Vec<NeedBracket>,
}

impl GiftAidMatrix {
    pub fn institutional() -> Self {
        let cohort = vec![
            zero_need_bracket(),
            bracket(
                5001.0,
                40000.0,
                vec![
                    band((50, 50), 0.63, 40000.0, 40000.0),
                    band((51, 51), 0.64, 40000.0, 40000.0),
                    band((52, 52), 0.69, 40000.0, 40000.0),
                    band((53, 53), 0.73, 40000.0, 40000.0),
                    band((54, 54), 0.75, 40000.0, 40000.0),
                ],
            ),
            bracket(
                40001.0,
                65000.0,
                vec![
                    band((50, 50), 0.61, 40000.0, 40000.0),
                    band((51, 51), 0.62, 40000.0, 40300.0),
                    band((52, 52), 0.64, 40000.0, 41600.0),
                    band((53, 53), 0.69, 40000.0, 44850.0),
                    band((54, 54), 0.71, 40000.0, 46150.0),
                ],
            ),
            bracket(
                65001.0,
                100000.0,
                vec![
                    band((50, 50), 0.49, 40000.0, 40000.0),
                    band((51, 51), 0.52, 40300.0, 41800.0),
                    band((52, 52), 0.53, 41600.0, 42583.0),
                    band((53, 53), 0.58, 44850.0, 46600.0),
                    band((54, 54), 0.60, 46150.0, 48200.0),
                ],
            ),
        ];

        let non_cohort_female = vec![
            zero_need_bracket(),
            bracket(
                1.0,
                40000.0,
                vec![
                    band((1, 11), 0.48, 0.0, 19200.0),
                    band((12, 14), 0.58, 0.0, 23200.0),
                    band((15, 17), 0.64, 0.0, 25600.0),
                    band((18, 20), 0.67, 0.0, 26800.0),
                    band((21, 23), 0.69, 0.0, 27600.0),
                ],
            ),
            bracket(
                40001.0,
                65000.0,
                vec![
                    band((1, 11), 0.46, 19200.0, 29900.0),
                    band((12, 14), 0.55, 23200.0, 35750.0),
                    band((15, 17), 0.57, 25600.0, 37050.0),
                    band((18, 20), 0.59, 26800.0, 38350.0),
                    band((21, 23), 0.61, 27600.0, 39650.0),
                ],
            ),
            bracket(
                65001.0,
                100000.0,
                vec![
                    band((1, 11), 0.44, 29900.0, 35400.0),
                    band((12, 14), 0.46, 35750.0, 36200.0),
                    band((15, 17), 0.46, 37050.0, 37762.0),
                    band((18, 20), 0.50, 38350.0, 40200.0),
                    band((21, 23), 0.52, 39650.0, 41800.0),
                ],
            ),
        ];

        let non_cohort_male = vec![
            zero_need_bracket(),
            bracket(
                1.0,
                40000.0,
                vec![
                    band((1, 11), 0.51, 0.0, 20400.0),
                    band((12, 14), 0.60, 0.0, 24000.0),
                    band((15, 17), 0.67, 0.0, 26800.0),
                    band((18, 20), 0.70, 0.0, 28000.0),
                    band((21, 23), 0.72, 0.0, 28800.0),
                ],
            ),
            bracket(
                40001.0,
                65000.0,
                vec![
                    band((1, 11), 0.46, 20400.0, 29900.0),
                    band((12, 14), 0.55, 24000.0, 35750.0),
                    band((15, 17), 0.57, 26800.0, 37050.0),
                    band((18, 20), 0.58, 28000.0, 37700.0),
                    band((21, 23), 0.60, 28800.0, 39000.0),
                ],
            ),
            bracket(
                65001.0,
                100000.0,
                vec![
                    band((1, 11), 0.42, 29900.0, 33700.0),
                    band((12, 14), 0.45, 35750.0, 36200.0),
                    band((15, 17), 0.47, 37050.0, 37762.0),
                    band((18, 20), 0.50, 37700.0, 40200.0),
                    band((21, 23), 0.52, 39000.0, 41800.0),
                ],
            ),
        ];

        Self {
            cohort,
            non_cohort_female,
            non_cohort_male,
        }
    }

    pub fn brackets(&self, group: AidGroup) -> &[NeedBracket] {
        match group {
            AidGroup::Cohort => &self.cohort,
            AidGroup::NonCohortFemale => &self.non_cohort_female,
            AidGroup::NonCohortMale => &self.non_cohort_male,
        }
    }

    /// First bracket containing the need
    pub fn bracket_for(&self, group: AidGroup, need: f64) -> Option<&NeedBracket> {
        self.brackets(group).iter().find(|b| b.contains(need))
    }

    /// Entry for an applicant, or None when no bracket or rating applies
    pub fn entry(&self, group: AidGroup, rating: u32, need: f64, merit: f64) -> Option<GiftAidEntry> {
        self.bracket_for(group, need)?
            .band(rating)
            .map(|band| band.entry(merit, need))
    }

    /// Gift aid to package; 0 when the matrix has no entry
    pub fn target(&self, group: AidGroup, rating: u32, need: f64, merit: f64) -> f64 {
        self.entry(group, rating, need, merit)
            .map(|entry| entry.packaged())
            .unwrap_or(0.0)
    }
}

impl Default for GiftAidMatrix {
    fn default() -> Self {
        Self::institutional()
    }
}

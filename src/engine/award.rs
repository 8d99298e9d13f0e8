//! Award packaging: quality rating, merit and add-on grants, need-based gift
//! aid, self-help aid, and the net price estimate

use super::pipeline::Stage;
use crate::form::fields;
use crate::form::{format_currency, round_to_nearest, FormState};
use crate::tables::{AidGroup, ApplicantSex, PackagingRules, RateTables};
use serde::Serialize;

/// Everything the award calculation reads from the form
#[derive(Debug, Clone, PartialEq)]
pub struct AwardInputs {
    pub gpa: f64,
    pub composite_score: f64,
    /// Answered "Yes" to the cohort question
    pub cohort: bool,
    /// Answered "No" to the cohort question; a blank answer is neither
    pub non_cohort: bool,
    pub sex: ApplicantSex,
    pub state_of_residence: String,
    pub housing_status: String,
    pub cost_of_attendance: f64,
    pub sai: f64,
    pub pell: f64,
}

impl AwardInputs {
    pub fn from_state(state: &FormState) -> Self {
        Self {
            gpa: state.leading_float(fields::GPA).unwrap_or(0.0),
            composite_score: state.leading_int(fields::COMPOSITE_SCORE).unwrap_or(0) as f64,
            cohort: state.is_yes(fields::COHORT),
            non_cohort: state.is_no(fields::COHORT),
            sex: ApplicantSex::from_field(&state.text(fields::SEX)),
            state_of_residence: state.text(fields::STATE_OF_RESIDENCE),
            housing_status: state.text(fields::HOUSING_STATUS),
            cost_of_attendance: state.amount(fields::TOTAL_COST),
            sai: state.amount(fields::SAI),
            pell: state.amount(fields::PELL_AMOUNT),
        }
    }
}

/// A displayed estimate: rounded value with a low/high band around it
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct DisplayBand {
    pub rounded: f64,
    pub low: f64,
    pub high: f64,
}

impl DisplayBand {
    pub fn around(value: f64, rules: &PackagingRules) -> Self {
        let rounded = round_to_nearest(value, rules.rounding_step);
        Self {
            rounded,
            low: rounded - rules.band_width,
            high: rounded + rules.band_width,
        }
    }
}

/// Complete award package for one applicant
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AwardPackage {
    pub quality_rating: u32,
    pub merit_award: f64,
    pub residency_add_on: f64,
    pub resident_hall_grant: f64,
    pub sex_add_on: f64,
    /// Merit plus add-ons
    pub total_awards: f64,
    pub total_need: f64,
    pub aid_group: AidGroup,
    pub gift_aid_target: f64,
    /// Non-need awards plus Pell
    pub subtotal: f64,
    pub need_based_aid: f64,
    pub total_gift_aid: f64,
    pub work_study: f64,
    pub federal_loans: f64,
    pub other_aid: f64,
    pub net_price: f64,
    pub cost_minus_awards: f64,
    pub net_price_band: DisplayBand,
    pub gift_aid_band: DisplayBand,
    pub cost_minus_awards_band: DisplayBand,
}

pub fn package_awards(inputs: &AwardInputs, tables: &RateTables) -> AwardPackage {
    let rating = tables
        .quality
        .rating(inputs.gpa, inputs.composite_score, inputs.cohort, inputs.sex);
    let merit = tables.merit.award(rating);

    let add_ons = &tables.add_ons;
    let (mut residency, mut resident_hall, mut sex_add_on) = (0.0, 0.0, 0.0);
    if rating >= add_ons.minimum_rating {
        if inputs.non_cohort && !add_ons.is_excluded_state(&inputs.state_of_residence) {
            residency = add_ons.residency;
        }
        if inputs.housing_status == add_ons.resident_hall_status {
            resident_hall = add_ons.resident_hall;
        }
        if inputs.non_cohort && inputs.sex == ApplicantSex::Male {
            sex_add_on = add_ons.sex;
        }
    }
    let total_awards = merit + residency + resident_hall + sex_add_on;

    let total_need = (inputs.cost_of_attendance - inputs.sai).max(0.0);
    let aid_group = AidGroup::for_applicant(inputs.cohort, inputs.sex);
    let gift_aid_target = tables.gift_aid.target(aid_group, rating, total_need, merit);

    let rules = &tables.packaging;
    let subtotal = total_awards + inputs.pell;
    let need_based_aid = (gift_aid_target - subtotal).max(0.0);
    let total_gift_aid = subtotal + need_based_aid;
    let work_study = if total_need >= rules.work_study_minimum_need {
        rules.work_study
    } else {
        0.0
    };
    let federal_loans = rules.federal_loans;
    let net_price = inputs.cost_of_attendance - total_gift_aid;
    let cost_minus_awards = net_price - work_study - federal_loans;

    AwardPackage {
        quality_rating: rating,
        merit_award: merit,
        residency_add_on: residency,
        resident_hall_grant: resident_hall,
        sex_add_on,
        total_awards,
        total_need,
        aid_group,
        gift_aid_target,
        subtotal,
        need_based_aid,
        total_gift_aid,
        work_study,
        federal_loans,
        other_aid: work_study + federal_loans,
        net_price,
        cost_minus_awards,
        net_price_band: DisplayBand::around(net_price, rules),
        gift_aid_band: DisplayBand::around(total_gift_aid, rules),
        cost_minus_awards_band: DisplayBand::around(cost_minus_awards, rules),
    }
}

impl AwardPackage {
    /// Write every award field; zero amounts display blank
    pub fn write_to(&self, state: &mut FormState) {
        state.set(fields::QUALITY_RATING, self.quality_rating);
        let amounts = [
            (fields::MERIT_AWARD, self.merit_award),
            (fields::RESIDENCY_ADD_ON, self.residency_add_on),
            (fields::RESIDENT_HALL_GRANT, self.resident_hall_grant),
            (fields::SEX_ADD_ON, self.sex_add_on),
            (fields::TOTAL_AWARDS, self.total_awards),
            (fields::TOTAL_NEED, self.total_need),
            (fields::GIFT_AID_TARGET, self.gift_aid_target),
            (fields::SUBTOTAL, self.subtotal),
            (fields::NEED_BASED_AID, self.need_based_aid),
            (fields::TOTAL_GIFT_AID, self.total_gift_aid),
            (fields::NET_PRICE, self.net_price),
            (fields::COST_MINUS_AWARDS, self.cost_minus_awards),
            (fields::NET_PRICE_ROUNDED, self.net_price_band.rounded),
            (fields::NET_PRICE_LOW, self.net_price_band.low),
            (fields::NET_PRICE_HIGH, self.net_price_band.high),
            (fields::GIFT_AID_ROUNDED, self.gift_aid_band.rounded),
            (fields::GIFT_AID_LOW, self.gift_aid_band.low),
            (fields::GIFT_AID_HIGH, self.gift_aid_band.high),
            (fields::COST_MINUS_AWARDS_ROUNDED, self.cost_minus_awards_band.rounded),
            (fields::COST_MINUS_AWARDS_LOW, self.cost_minus_awards_band.low),
            (fields::COST_MINUS_AWARDS_HIGH, self.cost_minus_awards_band.high),
            (fields::FEDERAL_LOANS, self.federal_loans),
            (fields::WORK_STUDY, self.work_study),
            (fields::OTHER_AID, self.other_aid),
        ];
        for (key, amount) in amounts {
            state.set(key, format_currency(amount));
        }
    }
}

#[derive(Debug, Default)]
pub struct AwardStage;

impl Stage for AwardStage {
    fn name(&self) -> &'static str {
        "awards"
    }

    fn inputs(&self) -> &'static [&'static str] {
        &[
            fields::GPA,
            fields::COMPOSITE_SCORE,
            fields::COHORT,
            fields::SEX,
            fields::STATE_OF_RESIDENCE,
            fields::HOUSING_STATUS,
            fields::TOTAL_COST,
            fields::SAI,
            fields::PELL_AMOUNT,
        ]
    }

    fn outputs(&self) -> &'static [&'static str] {
        &[
            fields::QUALITY_RATING,
            fields::MERIT_AWARD,
            fields::RESIDENCY_ADD_ON,
            fields::RESIDENT_HALL_GRANT,
            fields::SEX_ADD_ON,
            fields::TOTAL_AWARDS,
            fields::TOTAL_NEED,
            fields::GIFT_AID_TARGET,
            fields::SUBTOTAL,
            fields::NEED_BASED_AID,
            fields::TOTAL_GIFT_AID,
            fields::NET_PRICE,
            fields::COST_MINUS_AWARDS,
            fields::NET_PRICE_ROUNDED,
            fields::NET_PRICE_LOW,
            fields::NET_PRICE_HIGH,
            fields::GIFT_AID_ROUNDED,
            fields::GIFT_AID_LOW,
            fields::GIFT_AID_HIGH,
            fields::COST_MINUS_AWARDS_ROUNDED,
            fields::COST_MINUS_AWARDS_LOW,
            fields::COST_MINUS_AWARDS_HIGH,
            fields::FEDERAL_LOANS,
            fields::WORK_STUDY,
            fields::OTHER_AID,
        ]
    }

    fn apply(&self, state: &mut FormState, tables: &RateTables) {
        let inputs = AwardInputs::from_state(state);
        let package = package_awards(&inputs, tables);
        log::debug!(
            "rating {} merit {} need {} gift aid {} net price {}",
            package.quality_rating,
            package.merit_award,
            package.total_need,
            package.total_gift_aid,
            package.net_price
        );
        package.write_to(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::{QualityChart, QualityRow, RowCriteria, ScoreRange};
    use approx::assert_relative_eq;

    fn inputs() -> AwardInputs {
        AwardInputs {
            gpa: 3.85,
            composite_score: 1260.0,
            cohort: false,
            non_cohort: true,
            sex: ApplicantSex::Female,
            state_of_residence: "Ohio".to_string(),
            housing_status: "on-campus_resident".to_string(),
            cost_of_attendance: 68769.0,
            sai: 18500.0,
            pell: 0.0,
        }
    }

    #[test]
    fn test_non_cohort_female_package() {
        let tables = RateTables::institutional();
        let package = package_awards(&inputs(), &tables);

        // gpa 3.85 is rating 19 on the female ranges; 1260 is 18..21, first row 21
        assert_eq!(package.quality_rating, 21);
        assert_relative_eq!(package.merit_award, 30500.0);
        assert_relative_eq!(package.residency_add_on, 2500.0);
        assert_relative_eq!(package.resident_hall_grant, 3500.0);
        assert_relative_eq!(package.sex_add_on, 0.0);
        assert_relative_eq!(package.total_awards, 36500.0);
        assert_relative_eq!(package.total_need, 50269.0);
        assert_eq!(package.aid_group, AidGroup::NonCohortFemale);
        // max(30500, 0.61 * 50269) = 30664.09 vs floor max(30500, 27600)
        assert_relative_eq!(package.gift_aid_target, 0.61 * 50269.0);
        assert_relative_eq!(package.need_based_aid, 0.0);
        assert_relative_eq!(package.total_gift_aid, 36500.0);
        assert_relative_eq!(package.work_study, 3000.0);
        assert_relative_eq!(package.net_price, 68769.0 - 36500.0);
        assert_relative_eq!(package.cost_minus_awards, 68769.0 - 36500.0 - 3000.0 - 5500.0);
        assert_relative_eq!(package.net_price_band.rounded, 32270.0);
        assert_relative_eq!(package.net_price_band.low, 30770.0);
        assert_relative_eq!(package.net_price_band.high, 33770.0);
    }

    #[test]
    fn test_need_based_aid_fills_gap_to_target() {
        let tables = RateTables::institutional();
        let applicant = AwardInputs {
            gpa: 3.0,
            composite_score: 0.0,
            sex: ApplicantSex::Male,
            state_of_residence: "New York".to_string(),
            housing_status: "off-campus_with_parents".to_string(),
            cost_of_attendance: 60000.0,
            sai: 0.0,
            pell: 7395.0,
            ..inputs()
        };
        let package = package_awards(&applicant, &tables);

        // male gpa 3.0 is rating 12: merit 25500, sex add-on only
        assert_eq!(package.quality_rating, 12);
        assert_relative_eq!(package.residency_add_on, 0.0);
        assert_relative_eq!(package.resident_hall_grant, 0.0);
        assert_relative_eq!(package.sex_add_on, 2000.0);
        // need 60000: max(25500, 0.55 * 60000) = 33000 vs floor 24000
        assert_relative_eq!(package.gift_aid_target, 33000.0);
        assert_relative_eq!(package.subtotal, 25500.0 + 2000.0 + 7395.0);
        assert_relative_eq!(package.need_based_aid, 0.0);
        assert_relative_eq!(package.total_gift_aid, 34895.0);
    }

    #[test]
    fn test_add_ons_require_rating_ten() {
        let tables = RateTables::institutional();
        let applicant = AwardInputs {
            gpa: 2.0,
            composite_score: 900.0,
            sex: ApplicantSex::Male,
            ..inputs()
        };
        let package = package_awards(&applicant, &tables);
        assert_eq!(package.quality_rating, 1);
        assert_relative_eq!(package.total_awards, 0.0);
    }

    #[test]
    fn test_blank_cohort_answer_gets_no_residency_add_on() {
        let tables = RateTables::institutional();
        let applicant = AwardInputs {
            non_cohort: false,
            sex: ApplicantSex::Male,
            ..inputs()
        };
        let package = package_awards(&applicant, &tables);
        assert_relative_eq!(package.residency_add_on, 0.0);
        assert_relative_eq!(package.sex_add_on, 0.0);
        assert_relative_eq!(package.resident_hall_grant, 3500.0);
    }

    #[test]
    fn test_non_cohort_rating_above_matrix_has_no_target() {
        let tables = RateTables::institutional();
        let mut state = FormState::new();
        state.set(fields::GPA, "3.9");
        state.set(fields::COMPOSITE_SCORE, "1280");
        state.set(fields::COHORT, "No");
        state.set(fields::SEX, "Male");
        state.set(fields::STATE_OF_RESIDENCE, "Ohio");
        state.set(fields::TOTAL_COST, "$68,500");
        state.set(fields::SAI, "18500.00");
        state.set(fields::PELL_AMOUNT, "$0");
        // the built-in chart never rates non-cohort applicants above 23
        let mut chart_tables = tables.clone();
        chart_tables.quality = QualityChart::new(vec![QualityRow {
            rating: 54,
            criteria: RowCriteria::General {
                gpa_female: ScoreRange::new(0.0, 5.0),
                gpa_male: ScoreRange::new(0.0, 5.0),
                composite_female: None,
                composite_male: None,
            },
        }]);

        AwardStage.apply(&mut state, &chart_tables);
        assert_eq!(state.text(fields::QUALITY_RATING), "54");
        assert_eq!(state.text(fields::MERIT_AWARD), "$32,500");
        assert_eq!(state.text(fields::RESIDENCY_ADD_ON), "$2,500");
        assert_eq!(state.text(fields::SEX_ADD_ON), "$2,000");
        assert_eq!(state.text(fields::TOTAL_NEED), "$50,000");
        assert_eq!(state.text(fields::GIFT_AID_TARGET), "");
        assert_eq!(state.text(fields::TOTAL_GIFT_AID), "$37,000");
    }

    #[test]
    fn test_gift_aid_covers_awards_and_pell() {
        let tables = RateTables::institutional();
        for (gpa, cost, sai, pell) in [
            (3.95, 70000.0, 0.0, 7395.0),
            (3.2, 55000.0, 12000.0, 0.0),
            (2.5, 45000.0, -1500.0, 7395.0),
            (4.2, 80000.0, 90000.0, 0.0),
        ] {
            let applicant = AwardInputs {
                gpa,
                cost_of_attendance: cost,
                sai,
                pell,
                ..inputs()
            };
            let package = package_awards(&applicant, &tables);
            assert!(package.total_gift_aid >= package.total_awards + pell);
            assert_relative_eq!(package.net_price + package.total_gift_aid, cost);
            assert!(package.total_need >= 0.0);
        }
    }

    #[test]
    fn test_display_band() {
        let rules = PackagingRules::institutional();
        let band = DisplayBand::around(32269.0, &rules);
        assert_eq!(band, DisplayBand { rounded: 32270.0, low: 30770.0, high: 33770.0 });
        let band = DisplayBand::around(-1505.0, &rules);
        assert_eq!(band.rounded, -1500.0);
    }
}

//! Need analysis: income protection allowance, poverty guideline, Pell
//! indicators, Student Aid Index, and Pell Grant amount
//!
//! A non-zero known SAI (`sai_amount_known`) overrides the whole analysis:
//! the derived figures are cleared and the known SAI is used as is.

use super::pipeline::Stage;
use crate::form::fields;
use crate::form::{format_dollars, FieldValue, FormState};
use crate::tables::{AllowanceTable, PellParameters, PovertyRegion, RateTables};

/// Known SAI entered by the applicant, when non-zero
pub fn sai_override(state: &FormState) -> Option<f64> {
    let known = state.amount(fields::SAI_OVERRIDE);
    (known != 0.0).then_some(known)
}

/// Household family size; missing or unparseable reads as 0
fn family_size(state: &FormState) -> i64 {
    state.leading_int(fields::FAMILY_SIZE).unwrap_or(0)
}

/// Allowance schedule for the household, if any applies
pub fn allowance_table(state: &FormState) -> Option<AllowanceTable> {
    if state.is_no(fields::INDEPENDENCE) {
        Some(AllowanceTable::DependentParents)
    } else if state.is_yes(fields::INDEPENDENCE) && state.is_yes(fields::MARITAL_STATUS) {
        Some(AllowanceTable::IndependentMarried)
    } else if state.is_yes(fields::INDEPENDENCE) && state.is_yes(fields::HAS_DEPENDENTS) {
        Some(AllowanceTable::IndependentWithDependents)
    } else {
        None
    }
}

#[derive(Debug, Default)]
pub struct IncomeProtectionStage;

impl Stage for IncomeProtectionStage {
    fn name(&self) -> &'static str {
        "income_protection_allowance"
    }

    fn inputs(&self) -> &'static [&'static str] {
        &[
            fields::SAI_OVERRIDE,
            fields::INDEPENDENCE,
            fields::MARITAL_STATUS,
            fields::HAS_DEPENDENTS,
            fields::FAMILY_SIZE,
        ]
    }

    fn outputs(&self) -> &'static [&'static str] {
        &[fields::PARENT_IPA, fields::STUDENT_IPA]
    }

    fn apply(&self, state: &mut FormState, tables: &RateTables) {
        state.clear(fields::PARENT_IPA);
        state.clear(fields::STUDENT_IPA);
        if sai_override(state).is_some() {
            return;
        }

        if let Some(table) = allowance_table(state) {
            let allowance = tables.allowances.allowance(table, family_size(state));
            let key = match table {
                AllowanceTable::DependentParents => fields::PARENT_IPA,
                _ => fields::STUDENT_IPA,
            };
            state.set(key, allowance);
        }
    }
}

/// Poverty guideline for the household; None when the size is unusable
pub fn poverty_guideline(state: &FormState, tables: &RateTables) -> Option<f64> {
    let region = PovertyRegion::from_state(&state.text(fields::STATE_OF_RESIDENCE));
    let size = state.leading_int(fields::FAMILY_SIZE)?;
    tables.poverty.guideline(region, size)
}

#[derive(Debug, Default)]
pub struct PovertyGuidelineStage;

impl Stage for PovertyGuidelineStage {
    fn name(&self) -> &'static str {
        "poverty_guideline"
    }

    fn inputs(&self) -> &'static [&'static str] {
        &[fields::SAI_OVERRIDE, fields::STATE_OF_RESIDENCE, fields::FAMILY_SIZE]
    }

    fn outputs(&self) -> &'static [&'static str] {
        &[fields::POVERTY_GUIDELINE]
    }

    fn apply(&self, state: &mut FormState, tables: &RateTables) {
        let guideline = match sai_override(state) {
            Some(_) => None,
            None => poverty_guideline(state, tables),
        };
        match guideline {
            Some(amount) => state.set(fields::POVERTY_GUIDELINE, format_dollars(amount)),
            None => state.clear(fields::POVERTY_GUIDELINE),
        }
    }
}

/// Maximum Pell indicator from tax filing and AGI against the guideline
///
/// 1: did not file; 2: single-parent household within 225% of the
/// guideline; 3: any other household within 175%. None otherwise.
pub fn maximum_pell_indicator(state: &FormState, pell: &PellParameters) -> Option<u8> {
    let guideline = state.amount(fields::POVERTY_GUIDELINE);
    let (filed, agi, single_parent) = if state.is_no(fields::INDEPENDENCE) {
        (
            state.text(fields::PARENT_FILED_TAXES),
            state.amount(fields::PARENT_AGI),
            pell.is_single_filing_status(&state.text(fields::PARENT_FILING_STATUS)),
        )
    } else {
        (
            state.text(fields::STUDENT_FILED_TAXES),
            state.amount(fields::STUDENT_AGI),
            pell.is_single_filing_status(&state.text(fields::STUDENT_FILING_STATUS))
                && state.is_yes(fields::HAS_DEPENDENTS),
        )
    };

    if filed == "No" {
        return Some(1);
    }
    if agi <= 0.0 {
        return None;
    }
    if single_parent && agi <= pell.single_parent_multiple * guideline {
        Some(2)
    } else if !single_parent && agi <= pell.other_household_multiple * guideline {
        Some(3)
    } else {
        None
    }
}

#[derive(Debug, Default)]
pub struct MaximumPellStage;

impl Stage for MaximumPellStage {
    fn name(&self) -> &'static str {
        "maximum_pell_indicator"
    }

    fn inputs(&self) -> &'static [&'static str] {
        &[
            fields::SAI_OVERRIDE,
            fields::INDEPENDENCE,
            fields::PARENT_FILED_TAXES,
            fields::PARENT_AGI,
            fields::PARENT_FILING_STATUS,
            fields::STUDENT_FILED_TAXES,
            fields::STUDENT_AGI,
            fields::STUDENT_FILING_STATUS,
            fields::HAS_DEPENDENTS,
            fields::POVERTY_GUIDELINE,
        ]
    }

    fn outputs(&self) -> &'static [&'static str] {
        &[fields::MAX_PELL_INDICATOR]
    }

    fn apply(&self, state: &mut FormState, tables: &RateTables) {
        let indicator = match sai_override(state) {
            Some(_) => None,
            None => maximum_pell_indicator(state, &tables.pell),
        };
        match indicator {
            Some(value) => state.set(fields::MAX_PELL_INDICATOR, value),
            None => state.clear(fields::MAX_PELL_INDICATOR),
        }
    }
}

/// SAI and Pell result for one applicant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PellOutcome {
    pub sai: f64,
    /// None when a known SAI overrides the analysis
    pub minimum_indicator: Option<u8>,
    pub eligible: bool,
    pub amount: f64,
}

/// SAI from the maximum Pell indicator and the upstream contribution figure
pub fn student_aid_index(max_indicator: i64, contribution: f64, pell: &PellParameters) -> f64 {
    match max_indicator {
        1 => pell.sai_floor,
        2 | 3 => contribution.min(0.0),
        _ => contribution.max(pell.sai_floor),
    }
}

/// Pell Grant amount for an eligible applicant
pub fn pell_amount(max_indicator: i64, sai: f64, pell: &PellParameters) -> f64 {
    if max_indicator == 1 {
        pell.maximum_award
    } else if sai < pell.maximum_award {
        (pell.maximum_award - sai)
            .min(pell.maximum_award)
            .max(pell.minimum_award)
    } else {
        0.0
    }
}

pub fn sai_and_pell(state: &FormState, pell: &PellParameters) -> PellOutcome {
    if let Some(known) = sai_override(state) {
        return PellOutcome {
            sai: known,
            minimum_indicator: None,
            eligible: false,
            amount: 0.0,
        };
    }

    let max_indicator = state.leading_int(fields::MAX_PELL_INDICATOR).unwrap_or(0);
    let contribution = state.leading_float(fields::CONTRIBUTION_FROM_AAI).unwrap_or(0.0);
    let sai = student_aid_index(max_indicator, contribution, pell);

    let guideline = state.amount(fields::POVERTY_GUIDELINE);
    let minimum_indicator = u8::from(max_indicator == 0 && sai < pell.minimum_indicator_multiple * guideline);
    let eligible = max_indicator > 0 || minimum_indicator > 0 || sai < pell.maximum_award;
    let amount = if eligible {
        pell_amount(max_indicator, sai, pell)
    } else {
        0.0
    };

    PellOutcome {
        sai,
        minimum_indicator: Some(minimum_indicator),
        eligible,
        amount,
    }
}

#[derive(Debug, Default)]
pub struct SaiAndPellStage;

impl Stage for SaiAndPellStage {
    fn name(&self) -> &'static str {
        "sai_and_pell"
    }

    fn inputs(&self) -> &'static [&'static str] {
        &[
            fields::SAI_OVERRIDE,
            fields::MAX_PELL_INDICATOR,
            fields::CONTRIBUTION_FROM_AAI,
            fields::POVERTY_GUIDELINE,
        ]
    }

    fn outputs(&self) -> &'static [&'static str] {
        &[fields::SAI, fields::MIN_PELL_INDICATOR, fields::PELL_FLAG, fields::PELL_AMOUNT]
    }

    fn apply(&self, state: &mut FormState, tables: &RateTables) {
        let outcome = sai_and_pell(state, &tables.pell);
        log::debug!(
            "sai {:.2}, pell eligible {}, pell {}",
            outcome.sai,
            outcome.eligible,
            outcome.amount
        );

        state.set(fields::SAI, format!("{:.2}", outcome.sai));
        match outcome.minimum_indicator {
            Some(indicator) => state.set(fields::MIN_PELL_INDICATOR, indicator),
            None => state.clear(fields::MIN_PELL_INDICATOR),
        }
        state.set(fields::PELL_FLAG, if outcome.eligible { "Yes" } else { "No" });
        state.set(fields::PELL_AMOUNT, format_dollars(outcome.amount));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tables() -> RateTables {
        RateTables::institutional()
    }

    fn run(stage: &dyn Stage, state: &mut FormState) {
        stage.apply(state, &tables());
    }

    fn dependent(family_size: &str) -> FormState {
        let mut state = FormState::new();
        state.set(fields::INDEPENDENCE, "No");
        state.set(fields::FAMILY_SIZE, family_size);
        state
    }

    #[test]
    fn test_dependent_allowance() {
        let mut state = dependent("4");
        run(&IncomeProtectionStage, &mut state);
        assert_eq!(state.get(fields::PARENT_IPA), Some(&FieldValue::Number(42430.0)));
        assert!(state.get(fields::STUDENT_IPA).unwrap().is_blank());
    }

    #[test]
    fn test_independent_allowances() {
        let mut married = FormState::new();
        married.set(fields::INDEPENDENCE, "Yes");
        married.set(fields::MARITAL_STATUS, "Yes");
        married.set(fields::HAS_DEPENDENTS, "Yes");
        married.set(fields::FAMILY_SIZE, "8");
        run(&IncomeProtectionStage, &mut married);
        // married wins over dependents
        assert_eq!(married.amount(fields::STUDENT_IPA), 93010.0 + 2.0 * 10510.0);
        assert!(married.get(fields::PARENT_IPA).unwrap().is_blank());

        let mut single_parent = FormState::new();
        single_parent.set(fields::INDEPENDENCE, "Yes");
        single_parent.set(fields::MARITAL_STATUS, "No");
        single_parent.set(fields::HAS_DEPENDENTS, "Yes");
        single_parent.set(fields::FAMILY_SIZE, "2");
        run(&IncomeProtectionStage, &mut single_parent);
        assert_eq!(single_parent.amount(fields::STUDENT_IPA), 51960.0);
    }

    #[test]
    fn test_allowance_cleared_without_a_schedule() {
        let mut state = FormState::new();
        state.set(fields::INDEPENDENCE, "Yes");
        state.set(fields::FAMILY_SIZE, "3");
        state.set(fields::PARENT_IPA, 34350.0);
        run(&IncomeProtectionStage, &mut state);
        assert!(state.get(fields::PARENT_IPA).unwrap().is_blank());
        assert!(state.get(fields::STUDENT_IPA).unwrap().is_blank());

        let mut small = dependent("1");
        run(&IncomeProtectionStage, &mut small);
        assert_eq!(small.get(fields::PARENT_IPA), Some(&FieldValue::Number(0.0)));
    }

    #[test]
    fn test_override_clears_need_analysis() {
        let mut state = dependent("4");
        state.set(fields::SAI_OVERRIDE, "5000");
        state.set(fields::PARENT_FILED_TAXES, "No");
        for stage in [
            &IncomeProtectionStage as &dyn Stage,
            &PovertyGuidelineStage,
            &MaximumPellStage,
            &SaiAndPellStage,
        ] {
            run(stage, &mut state);
        }

        assert!(state.get(fields::PARENT_IPA).unwrap().is_blank());
        assert!(state.get(fields::POVERTY_GUIDELINE).unwrap().is_blank());
        assert!(state.get(fields::MAX_PELL_INDICATOR).unwrap().is_blank());
        assert!(state.get(fields::MIN_PELL_INDICATOR).unwrap().is_blank());
        assert_eq!(state.text(fields::SAI), "5000.00");
        assert_eq!(state.text(fields::PELL_FLAG), "No");
        assert_eq!(state.text(fields::PELL_AMOUNT), "$0");
    }

    #[test]
    fn test_poverty_guideline_by_region() {
        let mut state = dependent("10");
        state.set(fields::STATE_OF_RESIDENCE, "HI");
        run(&PovertyGuidelineStage, &mut state);
        assert_eq!(state.text(fields::POVERTY_GUIDELINE), "$74,960");

        let mut state = dependent("4");
        state.set(fields::STATE_OF_RESIDENCE, "Ohio");
        run(&PovertyGuidelineStage, &mut state);
        assert_eq!(state.text(fields::POVERTY_GUIDELINE), "$32,150");

        for size in ["0", "-2", "many", ""] {
            let mut state = dependent(size);
            run(&PovertyGuidelineStage, &mut state);
            assert!(state.get(fields::POVERTY_GUIDELINE).unwrap().is_blank(), "size {size:?}");
        }
    }

    #[test]
    fn test_maximum_pell_indicator() {
        let pell = PellParameters::award_year();

        let mut state = dependent("4");
        state.set(fields::POVERTY_GUIDELINE, "$32,150");
        state.set(fields::PARENT_FILED_TAXES, "No");
        assert_eq!(maximum_pell_indicator(&state, &pell), Some(1));

        state.set(fields::PARENT_FILED_TAXES, "Yes");
        state.set(fields::PARENT_FILING_STATUS, "Head of Household");
        state.set(fields::PARENT_AGI, "72000");
        // 2.25 * 32150 = 72337.5
        assert_eq!(maximum_pell_indicator(&state, &pell), Some(2));

        state.set(fields::PARENT_FILING_STATUS, "Married Filing Jointly");
        // 1.75 * 32150 = 56262.5
        assert_eq!(maximum_pell_indicator(&state, &pell), None);
        state.set(fields::PARENT_AGI, "56000");
        assert_eq!(maximum_pell_indicator(&state, &pell), Some(3));

        state.set(fields::PARENT_AGI, "0");
        assert_eq!(maximum_pell_indicator(&state, &pell), None);
    }

    #[test]
    fn test_independent_single_parent_needs_dependents() {
        let pell = PellParameters::award_year();
        let mut state = FormState::new();
        state.set(fields::INDEPENDENCE, "Yes");
        state.set(fields::POVERTY_GUIDELINE, "$21,150");
        state.set(fields::STUDENT_FILED_TAXES, "Yes");
        state.set(fields::STUDENT_FILING_STATUS, "Single");
        state.set(fields::STUDENT_AGI, "40000");

        // without dependents the household is not single-parent: 40000 > 1.75 * 21150
        assert_eq!(maximum_pell_indicator(&state, &pell), None);
        state.set(fields::HAS_DEPENDENTS, "Yes");
        assert_eq!(maximum_pell_indicator(&state, &pell), Some(2));
    }

    #[test]
    fn test_sai_from_indicator() {
        let pell = PellParameters::award_year();
        assert_eq!(student_aid_index(1, 12000.0, &pell), -1500.0);
        assert_eq!(student_aid_index(2, 12000.0, &pell), 0.0);
        assert_eq!(student_aid_index(3, -800.0, &pell), -800.0);
        assert_eq!(student_aid_index(0, 12000.0, &pell), 12000.0);
        assert_eq!(student_aid_index(0, -900.0, &pell), -900.0);
        assert_eq!(student_aid_index(0, -4000.0, &pell), -1500.0);
    }

    #[test]
    fn test_did_not_file_gets_maximum_pell() {
        let mut state = dependent("4");
        state.set(fields::PARENT_FILED_TAXES, "No");
        state.set(fields::CONTRIBUTION_FROM_AAI, "18000");
        for stage in [&PovertyGuidelineStage as &dyn Stage, &MaximumPellStage, &SaiAndPellStage] {
            run(stage, &mut state);
        }
        assert_eq!(state.text(fields::MAX_PELL_INDICATOR), "1");
        assert_eq!(state.text(fields::SAI), "-1500.00");
        assert_eq!(state.text(fields::MIN_PELL_INDICATOR), "0");
        assert_eq!(state.text(fields::PELL_FLAG), "Yes");
        assert_eq!(state.text(fields::PELL_AMOUNT), "$7,395");
    }

    #[test]
    fn test_pell_amounts() {
        let pell = PellParameters::award_year();
        assert_eq!(pell_amount(0, -1500.0, &pell), 7395.0);
        assert_eq!(pell_amount(0, 0.0, &pell), 7395.0);
        assert_eq!(pell_amount(0, 3000.0, &pell), 4395.0);
        // small awards are raised to the minimum
        assert_eq!(pell_amount(0, 7000.0, &pell), 740.0);
        assert_eq!(pell_amount(0, 7395.0, &pell), 0.0);
        assert_eq!(pell_amount(1, 50000.0, &pell), 7395.0);
    }

    #[test]
    fn test_pell_monotonic_in_sai() {
        let pell = PellParameters::award_year();
        let mut previous = f64::INFINITY;
        let mut sai = -1500.0;
        while sai < 20000.0 {
            let mut state = FormState::new();
            state.set(fields::CONTRIBUTION_FROM_AAI, format!("{sai}"));
            let outcome = sai_and_pell(&state, &pell);
            assert!(outcome.amount <= previous, "pell rose at sai {sai}");
            if outcome.sai >= pell.maximum_award {
                assert_eq!(outcome.amount, 0.0);
                assert!(!outcome.eligible);
            }
            previous = outcome.amount;
            sai += 125.0;
        }
    }

    #[test]
    fn test_minimum_pell_indicator() {
        let pell = PellParameters::award_year();
        let mut state = FormState::new();
        state.set(fields::POVERTY_GUIDELINE, "$32,150");
        state.set(fields::CONTRIBUTION_FROM_AAI, "60000");
        let outcome = sai_and_pell(&state, &pell);
        assert_eq!(outcome.minimum_indicator, Some(1));
        assert!(outcome.eligible);
        assert_eq!(outcome.amount, 0.0);

        state.set(fields::CONTRIBUTION_FROM_AAI, "70000");
        let outcome = sai_and_pell(&state, &pell);
        assert_eq!(outcome.minimum_indicator, Some(0));
        assert!(!outcome.eligible);
    }
}

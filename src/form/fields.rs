//! Field keys exported by the aid form
//!
//! Keys split into two disjoint sets: inputs the applicant (or the platform)
//! provides, and calculated fields only the engine writes.

// Inputs: enrollment and demographics
pub const ENTRY_TERM: &str = "sys:field:prospect_entry_term";
pub const HOUSING_STATUS: &str = "on_campus";
pub const GRADUATE_STUDENT: &str = "student_graduate_student";
pub const GRADE_LEVEL: &str = "student_current_grade_level";
pub const STATE_OF_RESIDENCE: &str = "state_of_residence";
pub const COHORT: &str = "soc";
pub const SEX: &str = "sys:sex";
pub const BIRTHDATE: &str = "sys:birthdate";

// Inputs: dependency and household
pub const SAI_KNOWN: &str = "student_sai_known";
pub const SAI_OVERRIDE: &str = "sai_amount_known";
pub const INDEPENDENCE: &str = "student_independence";
pub const MARITAL_STATUS: &str = "student_marital_status";
pub const HAS_DEPENDENTS: &str = "student_dependents";
pub const FAMILY_SIZE: &str = "student_number_in_family";
pub const FAMILY_IN_COLLEGE: &str = "student_number_of_family_members_in_college";

// Inputs: tax filing
pub const PARENT_FILED_TAXES: &str = "parent_filed_tax_returns";
pub const PARENT_FILING_STATUS: &str = "parent_filing_status";
pub const PARENT_AGI: &str = "parent_adjusted_gross_income";
pub const STUDENT_FILED_TAXES: &str = "student_filed_tax_returns";
pub const STUDENT_FILING_STATUS: &str = "student_filing_status";
pub const STUDENT_AGI: &str = "student_adjusted_gross_income";

/// Student contribution from adjusted available income, produced by the
/// federal worksheet upstream of this engine
pub const CONTRIBUTION_FROM_AAI: &str = "student_total_student_contribution_from_aai";

// Inputs: academics
pub const GPA: &str = "gpa";
pub const HAS_TAKEN_TEST: &str = "has_student_taken_test";
pub const HIGHEST_SAT: &str = "highest_sat";
pub const HIGHEST_ACT: &str = "highest_act";
pub const COMPOSITE_SCORE: &str = "highest_composite_score";

// Calculated: cost of attendance
pub const COA_KEY: &str = "sys:field:coa_person_entry_term";
pub const TUITION_AND_FEES: &str = "tuition_and_fees";
pub const HOUSING_AND_FOOD: &str = "housing_and_food";
pub const BOOKS_AND_SUPPLIES: &str = "books_and_supplies";
pub const PERSONAL_EXPENSES: &str = "personal_expenses";
pub const TRANSPORTATION: &str = "transportation";
pub const LOAN_FEES: &str = "loan_fees";
pub const LIVING_ALLOWANCE: &str = "off_campus_living_allowance";
pub const TOTAL_DIRECT: &str = "total_direct_billed_charges";
pub const TOTAL_INDIRECT: &str = "total_indirect_education_expenses";
pub const TOTAL_COST: &str = "total_estimated_cost_of_attendance";

// Calculated: need analysis
pub const PARENT_IPA: &str = "parent_income_protection_allowance";
pub const STUDENT_IPA: &str = "student_income_protection_allowance";
pub const POVERTY_GUIDELINE: &str = "poverty_guideline";
pub const MAX_PELL_INDICATOR: &str = "maximum_pell_indicator";
pub const MIN_PELL_INDICATOR: &str = "minimum_pell_indicator";
pub const SAI: &str = "sai_amount_calculated";
pub const PELL_FLAG: &str = "pell_grant_flag";
pub const PELL_AMOUNT: &str = "pell_grant_amount";

// Calculated: awards
pub const QUALITY_RATING: &str = "quality_rating";
pub const MERIT_AWARD: &str = "merit_award";
pub const RESIDENCY_ADD_ON: &str = "add_on_grant_residency";
pub const RESIDENT_HALL_GRANT: &str = "resident_grant";
pub const SEX_ADD_ON: &str = "add_on_grant_sex";
pub const TOTAL_AWARDS: &str = "total_awards";
pub const TOTAL_NEED: &str = "total_need";
pub const GIFT_AID_TARGET: &str = "gift_aid_target";
pub const SUBTOTAL: &str = "subtotal";
pub const NEED_BASED_AID: &str = "total_need_based";
pub const TOTAL_GIFT_AID: &str = "total_gift_aid";
pub const NET_PRICE: &str = "net_price";
pub const COST_MINUS_AWARDS: &str = "cost_of_attendance_minus_awards";
pub const NET_PRICE_ROUNDED: &str = "net_price_rounded";
pub const NET_PRICE_LOW: &str = "net_price_low";
pub const NET_PRICE_HIGH: &str = "net_price_high";
pub const GIFT_AID_ROUNDED: &str = "total_gift_aid_rounded";
pub const GIFT_AID_LOW: &str = "total_gift_aid_low";
pub const GIFT_AID_HIGH: &str = "total_gift_aid_high";
pub const COST_MINUS_AWARDS_ROUNDED: &str = "cost_of_attendance_minus_awards_rounded";
pub const COST_MINUS_AWARDS_LOW: &str = "cost_of_attendance_minus_awards_low";
pub const COST_MINUS_AWARDS_HIGH: &str = "cost_of_attendance_minus_awards_high";
pub const FEDERAL_LOANS: &str = "federal_loans";
pub const WORK_STUDY: &str = "federal_work_study";
pub const OTHER_AID: &str = "other_aid";

/// Every input the form exports, in form order
pub const INPUT_FIELDS: &[&str] = &[
    ENTRY_TERM,
    HOUSING_STATUS,
    GRADUATE_STUDENT,
    GRADE_LEVEL,
    STATE_OF_RESIDENCE,
    COHORT,
    SEX,
    SAI_KNOWN,
    SAI_OVERRIDE,
    PARENT_FILED_TAXES,
    INDEPENDENCE,
    MARITAL_STATUS,
    "student_pursuing_a_teaching_certification",
    "student_children_of_fallen_heroes",
    "student_iraq_afghanistan_service_grant_indicator",
    HAS_DEPENDENTS,
    FAMILY_SIZE,
    FAMILY_IN_COLLEGE,
    PARENT_FILING_STATUS,
    PARENT_AGI,
    "parent_deductible_payments_to_ira_keogh_other",
    "parent_untaxed_portions_of_ira_distributions",
    "parent_untaxed_portions_of_pensions",
    "parent_tax_exempt_interest_income",
    "parent_foreign_income_exclusion",
    "parent_education_credits",
    "parent_federal_workstudy",
    "parent_taxable_college_grant_and_scholarship_aid",
    "parent_annual_child_support_received_for_the_last_complete_calendar_year",
    "parent_cash_savings_and_checking_accounts",
    "parent_net_worth_of_current_investments",
    "parent_net_worth_of_businesses_and_or_investment_farms",
    STUDENT_FILED_TAXES,
    STUDENT_FILING_STATUS,
    STUDENT_AGI,
    "student_deductible_payments_to_ira_keogh_other",
    "student_tax_exempt_interest_income",
    "student_untaxed_portions_of_ira_distributions",
    "student_untaxed_portions_of_pensions",
    "student_foreign_income_exclusion",
    "student_taxable_college_grant_and_scholarship_aid",
    "student_education_credits",
    "student_federal_workstudy",
    "student_annual_child_support_received_for_the_last_complete_calendar_year",
    "student_cash_savings_and_checking_accounts",
    "student_net_worth_of_current_investments",
    "student_net_worth_of_businesses_and_or_investment_farms",
    CONTRIBUTION_FROM_AAI,
    GPA,
    HAS_TAKEN_TEST,
    HIGHEST_SAT,
    HIGHEST_ACT,
    COMPOSITE_SCORE,
    "opt_in_to_receive_results",
    BIRTHDATE,
];

/// Cost fields, produced by folding a cost lookup result into the state
pub const COST_FIELDS: &[&str] = &[
    TUITION_AND_FEES,
    HOUSING_AND_FOOD,
    BOOKS_AND_SUPPLIES,
    PERSONAL_EXPENSES,
    TRANSPORTATION,
    LOAN_FEES,
    LIVING_ALLOWANCE,
    TOTAL_DIRECT,
    TOTAL_INDIRECT,
    TOTAL_COST,
];

/// Every field the engine writes
pub const CALCULATED_FIELDS: &[&str] = &[
    COA_KEY,
    TUITION_AND_FEES,
    HOUSING_AND_FOOD,
    BOOKS_AND_SUPPLIES,
    PERSONAL_EXPENSES,
    TRANSPORTATION,
    LOAN_FEES,
    LIVING_ALLOWANCE,
    TOTAL_DIRECT,
    TOTAL_INDIRECT,
    TOTAL_COST,
    PARENT_IPA,
    STUDENT_IPA,
    POVERTY_GUIDELINE,
    MAX_PELL_INDICATOR,
    MIN_PELL_INDICATOR,
    SAI,
    PELL_FLAG,
    PELL_AMOUNT,
    QUALITY_RATING,
    MERIT_AWARD,
    RESIDENCY_ADD_ON,
    RESIDENT_HALL_GRANT,
    SEX_ADD_ON,
    TOTAL_AWARDS,
    TOTAL_NEED,
    GIFT_AID_TARGET,
    SUBTOTAL,
    NEED_BASED_AID,
    TOTAL_GIFT_AID,
    NET_PRICE,
    COST_MINUS_AWARDS,
    NET_PRICE_ROUNDED,
    NET_PRICE_LOW,
    NET_PRICE_HIGH,
    GIFT_AID_ROUNDED,
    GIFT_AID_LOW,
    GIFT_AID_HIGH,
    COST_MINUS_AWARDS_ROUNDED,
    COST_MINUS_AWARDS_LOW,
    COST_MINUS_AWARDS_HIGH,
    FEDERAL_LOANS,
    WORK_STUDY,
    OTHER_AID,
];

/// Which side of the input/calculated split a key belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Input,
    Calculated,
}

/// Look up a key in the registry
pub fn kind_of(key: &str) -> Option<FieldKind> {
    if CALCULATED_FIELDS.contains(&key) {
        Some(FieldKind::Calculated)
    } else if INPUT_FIELDS.contains(&key) {
        Some(FieldKind::Input)
    } else {
        None
    }
}

/// Classify an export key found on a form that is not in the registry
///
/// `*_calculated` keys are engine output; platform (`sys:`) keys and
/// single-word keys are inputs. Anything else is ignored.
pub fn classify_export_key(key: &str) -> Option<FieldKind> {
    if let Some(kind) = kind_of(key) {
        return Some(kind);
    }
    if key.ends_with("_calculated") {
        Some(FieldKind::Calculated)
    } else if key.starts_with("sys:") || !key.contains('_') {
        Some(FieldKind::Input)
    } else {
        None
    }
}

//! Cost of attendance: lookup key, row normalisation, and the cost fields
//!
//! The cost itself comes from an external lookup. This module builds the key
//! for that lookup and folds whatever came back into the form state.

use super::pipeline::Stage;
use crate::form::fields::{self, COST_FIELDS};
use crate::form::{format_currency, FieldValue, FormState};
use crate::tables::RateTables;
use serde::{Deserialize, Serialize};

/// One cost-of-attendance row as the lookup returns it
///
/// Cells may arrive as numbers or as strings; missing cells are None.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CostRow {
    #[serde(default)]
    pub tuition: Option<FieldValue>,
    #[serde(default)]
    pub room_and_board: Option<FieldValue>,
    #[serde(default)]
    pub books: Option<FieldValue>,
    #[serde(default)]
    pub miscellaneous: Option<FieldValue>,
    #[serde(default)]
    pub transportation: Option<FieldValue>,
    #[serde(default)]
    pub federal_stafford_loan_fee: Option<FieldValue>,
    #[serde(default)]
    pub dependent_living_with_parents: Option<FieldValue>,
    #[serde(default)]
    pub dependent_living_without_parents: Option<FieldValue>,
    #[serde(default)]
    pub independent_off_campus: Option<FieldValue>,
}

fn amount_of(value: &Option<FieldValue>) -> f64 {
    value.as_ref().map(FieldValue::amount).unwrap_or(0.0)
}

fn raw_or_blank(value: &Option<FieldValue>) -> FieldValue {
    match value {
        Some(FieldValue::Null) | None => FieldValue::blank(),
        Some(v) => v.clone(),
    }
}

impl CostRow {
    /// First non-empty living allowance variant
    pub fn living_allowance(&self) -> Option<&FieldValue> {
        [
            &self.dependent_living_with_parents,
            &self.dependent_living_without_parents,
            &self.independent_off_campus,
        ]
        .into_iter()
        .flatten()
        .find(|value| value.is_truthy())
    }

    /// Direct, indirect, and total cost for a housing status
    pub fn totals(&self, on_campus: bool) -> CostTotals {
        let direct = amount_of(&self.tuition) + amount_of(&self.room_and_board);
        let mut indirect = amount_of(&self.books)
            + amount_of(&self.miscellaneous)
            + amount_of(&self.transportation)
            + amount_of(&self.federal_stafford_loan_fee);
        if !on_campus {
            indirect += self.living_allowance().map(FieldValue::amount).unwrap_or(0.0);
        }
        CostTotals {
            direct,
            indirect,
            total: direct + indirect,
        }
    }
}

/// Cost of attendance totals
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CostTotals {
    pub direct: f64,
    pub indirect: f64,
    pub total: f64,
}

/// Result of one cost lookup
#[derive(Debug, Clone, PartialEq)]
pub enum CostOutcome {
    Found(CostRow),
    /// The lookup answered but has no row for the key
    NotFound,
    /// The lookup could not be reached or answered garbage
    Unavailable(String),
}

/// Lookup key: entry term label lower-cased with whitespace runs joined by
/// '_', then '_' and the housing status
pub fn resolve_key(state: &FormState) -> String {
    let housing = state.text(fields::HOUSING_STATUS);
    let term = state.text(fields::ENTRY_TERM);
    if term.is_empty() {
        return housing;
    }
    let term = term
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_");
    format!("{}_{}", term, housing)
}

/// Housing status counts as on campus when it mentions both "on" and "campus"
pub fn is_on_campus(housing_status: &str) -> bool {
    let status = housing_status.to_lowercase();
    status.contains("on") && status.contains("campus")
}

/// Write a found row into the cost fields
pub fn apply_cost_row(state: &mut FormState, row: &CostRow) {
    state.set(fields::TUITION_AND_FEES, raw_or_blank(&row.tuition));
    state.set(fields::HOUSING_AND_FOOD, raw_or_blank(&row.room_and_board));
    state.set(fields::BOOKS_AND_SUPPLIES, raw_or_blank(&row.books));
    state.set(fields::PERSONAL_EXPENSES, raw_or_blank(&row.miscellaneous));
    state.set(fields::TRANSPORTATION, raw_or_blank(&row.transportation));
    state.set(fields::LOAN_FEES, raw_or_blank(&row.federal_stafford_loan_fee));

    let on_campus = is_on_campus(&state.text(fields::HOUSING_STATUS));
    let living = if on_campus {
        FieldValue::blank()
    } else {
        row.living_allowance().cloned().unwrap_or_default()
    };
    state.set(fields::LIVING_ALLOWANCE, living);

    let totals = row.totals(on_campus);
    state.set(fields::TOTAL_DIRECT, format_currency(totals.direct));
    state.set(fields::TOTAL_INDIRECT, format_currency(totals.indirect));
    state.set(fields::TOTAL_COST, format_currency(totals.total));
}

/// Blank every cost-derived field
pub fn clear_cost_fields(state: &mut FormState) {
    for key in COST_FIELDS {
        state.clear(key);
    }
}

/// Fold a lookup outcome into the state; a miss and a failure both clear
pub fn fold_cost(state: &mut FormState, outcome: &CostOutcome) {
    match outcome {
        CostOutcome::Found(row) => apply_cost_row(state, row),
        CostOutcome::NotFound => {
            log::info!("no cost of attendance row for key {:?}", state.text(fields::COA_KEY));
            clear_cost_fields(state);
        }
        CostOutcome::Unavailable(reason) => {
            log::warn!("cost of attendance lookup failed: {}", reason);
            clear_cost_fields(state);
        }
    }
}

/// Writes the lookup key so it is ready before any fetch
#[derive(Debug, Default)]
pub struct CostKeyStage;

impl Stage for CostKeyStage {
    fn name(&self) -> &'static str {
        "cost_key"
    }

    fn inputs(&self) -> &'static [&'static str] {
        &[fields::ENTRY_TERM, fields::HOUSING_STATUS]
    }

    fn outputs(&self) -> &'static [&'static str] {
        &[fields::COA_KEY]
    }

    fn apply(&self, state: &mut FormState, _tables: &RateTables) {
        let key = resolve_key(state);
        state.set(fields::COA_KEY, key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resident_row() -> CostRow {
        CostRow {
            tuition: Some(48950.0.into()),
            room_and_board: Some("15800".into()),
            books: Some(1200.0.into()),
            miscellaneous: Some(1850.0.into()),
            transportation: Some(900.0.into()),
            federal_stafford_loan_fee: Some(69.0.into()),
            dependent_living_with_parents: None,
            dependent_living_without_parents: Some("".into()),
            independent_off_campus: Some(15900.0.into()),
        }
    }

    fn state_with(term: &str, housing: &str) -> FormState {
        let mut state = FormState::new();
        state.set(fields::ENTRY_TERM, term);
        state.set(fields::HOUSING_STATUS, housing);
        state
    }

    #[test]
    fn test_resolve_key() {
        assert_eq!(
            resolve_key(&state_with("Fall 2026", "on-campus_resident")),
            "fall_2026_on-campus_resident"
        );
        assert_eq!(resolve_key(&state_with("Spring   2027 ", " commuter ")), "spring_2027_commuter");
        assert_eq!(resolve_key(&state_with("", "on-campus_resident")), "on-campus_resident");
        assert_eq!(resolve_key(&FormState::new()), "");
    }

    #[test]
    fn test_on_campus_detection() {
        assert!(is_on_campus("on-campus_resident"));
        assert!(is_on_campus("On Campus"));
        assert!(!is_on_campus("off-campus_with_parents"));
        assert!(!is_on_campus(""));
    }

    #[test]
    fn test_living_allowance_takes_first_present_variant() {
        let row = resident_row();
        assert_eq!(row.living_allowance(), Some(&FieldValue::Number(15900.0)));
        assert_eq!(CostRow::default().living_allowance(), None);
    }

    #[test]
    fn test_apply_on_campus_row() {
        let mut state = state_with("Fall 2026", "on-campus_resident");
        apply_cost_row(&mut state, &resident_row());

        assert_eq!(state.get(fields::TUITION_AND_FEES), Some(&FieldValue::Number(48950.0)));
        assert_eq!(state.text(fields::HOUSING_AND_FOOD), "15800");
        assert!(state.get(fields::LIVING_ALLOWANCE).unwrap().is_blank());
        assert_eq!(state.text(fields::TOTAL_DIRECT), "$64,750");
        assert_eq!(state.text(fields::TOTAL_INDIRECT), "$4,019");
        assert_eq!(state.text(fields::TOTAL_COST), "$68,769");
    }

    #[test]
    fn test_apply_off_campus_row_adds_living_allowance() {
        let mut state = state_with("Fall 2026", "off-campus_independent");
        apply_cost_row(&mut state, &resident_row());

        assert_eq!(state.amount(fields::LIVING_ALLOWANCE), 15900.0);
        assert_eq!(state.text(fields::TOTAL_INDIRECT), "$19,919");
        assert_eq!(state.amount(fields::TOTAL_COST), 48950.0 + 15800.0 + 19919.0);
    }

    #[test]
    fn test_miss_and_failure_clear_the_same_fields() {
        let mut found = state_with("Fall 2026", "on-campus_resident");
        fold_cost(&mut found, &CostOutcome::Found(resident_row()));

        let mut missed = found.clone();
        fold_cost(&mut missed, &CostOutcome::NotFound);
        let mut failed = found.clone();
        fold_cost(&mut failed, &CostOutcome::Unavailable("timeout".into()));

        assert_eq!(missed, failed);
        for key in COST_FIELDS {
            assert!(missed.get(key).unwrap().is_blank(), "{key} not cleared");
        }
        assert_eq!(missed.text(fields::HOUSING_STATUS), "on-campus_resident");
    }

    #[test]
    fn test_cost_row_from_json() {
        let json = r#"{"tuition":"48950","room_and_board":15800,"books":null,"extra":"ignored"}"#;
        let row: CostRow = serde_json::from_str(json).unwrap();
        assert_eq!(row.tuition, Some(FieldValue::Text("48950".into())));
        assert_eq!(row.room_and_board, Some(FieldValue::Number(15800.0)));
        assert_eq!(row.books, None);
        assert_eq!(row.totals(true).direct, 64750.0);
    }
}

//! Flat field-key to value mapping shared by every stage of the calculation

use super::currency::{leading_float, leading_int, parse_currency};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single form value as stored in the session
///
/// The form stores whatever the widget produced: free text, a number written
/// by the engine, or nothing at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
    Null,
}

impl FieldValue {
    /// The cleared value written when a calculated field has no result
    pub fn blank() -> Self {
        FieldValue::Text(String::new())
    }

    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Number(_) => false,
            FieldValue::Text(s) => s.trim().is_empty(),
            FieldValue::Null => true,
        }
    }

    /// Whether the value counts as present: non-empty text or a non-zero number
    pub fn is_truthy(&self) -> bool {
        match self {
            FieldValue::Number(n) => *n != 0.0 && !n.is_nan(),
            FieldValue::Text(s) => !s.is_empty(),
            FieldValue::Null => false,
        }
    }

    /// Text rendering; whole numbers print without a fractional part
    pub fn as_text(&self) -> String {
        match self {
            FieldValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{}", *n as i64),
            FieldValue::Number(n) => n.to_string(),
            FieldValue::Text(s) => s.clone(),
            FieldValue::Null => String::new(),
        }
    }

    /// Recoverable monetary amount (0 when absent or unparseable)
    pub fn amount(&self) -> f64 {
        match self {
            FieldValue::Number(n) if n.is_finite() => *n,
            FieldValue::Number(_) => 0.0,
            FieldValue::Text(s) => parse_currency(s),
            FieldValue::Null => 0.0,
        }
    }
}

impl Default for FieldValue {
    fn default() -> Self {
        FieldValue::blank()
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<u32> for FieldValue {
    fn from(value: u32) -> Self {
        FieldValue::Number(f64::from(value))
    }
}

impl From<u8> for FieldValue {
    fn from(value: u8) -> Self {
        FieldValue::Number(f64::from(value))
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

/// Session form state: every input and calculated field by key
///
/// Serializes as the flat JSON object the form keeps in session storage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormState {
    fields: BTreeMap<String, FieldValue>,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn set(&mut self, key: &str, value: impl Into<FieldValue>) {
        self.fields.insert(key.to_string(), value.into());
    }

    /// Write the blank value for a calculated field
    pub fn clear(&mut self, key: &str) {
        self.set(key, FieldValue::blank());
    }

    pub fn remove(&mut self, key: &str) -> Option<FieldValue> {
        self.fields.remove(key)
    }

    /// Trimmed text of a field; missing fields read as ""
    pub fn text(&self, key: &str) -> String {
        self.get(key)
            .map(|v| v.as_text().trim().to_string())
            .unwrap_or_default()
    }

    /// Monetary amount of a field; missing or unparseable fields read as 0
    pub fn amount(&self, key: &str) -> f64 {
        self.get(key).map(FieldValue::amount).unwrap_or(0.0)
    }

    /// Leading integer of a field (family sizes, indicators, test scores)
    pub fn leading_int(&self, key: &str) -> Option<i64> {
        match self.get(key)? {
            FieldValue::Number(n) if n.is_finite() => Some(n.trunc() as i64),
            FieldValue::Number(_) | FieldValue::Null => None,
            FieldValue::Text(s) => leading_int(s),
        }
    }

    /// Leading decimal of a field (GPA, worksheet figures)
    pub fn leading_float(&self, key: &str) -> Option<f64> {
        match self.get(key)? {
            FieldValue::Number(n) if n.is_finite() => Some(*n),
            FieldValue::Number(_) | FieldValue::Null => None,
            FieldValue::Text(s) => leading_float(s),
        }
    }

    /// Exact "Yes" answer on a radio field
    pub fn is_yes(&self, key: &str) -> bool {
        self.text(key) == "Yes"
    }

    /// Exact "No" answer on a radio field
    pub fn is_no(&self, key: &str) -> bool {
        self.text(key) == "No"
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldValue)> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FromIterator<(String, FieldValue)> for FormState {
    fn from_iter<T: IntoIterator<Item = (String, FieldValue)>>(iter: T) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_readers_default_on_missing_input() {
        let state = FormState::new();
        assert_eq!(state.text("gpa"), "");
        assert_eq!(state.amount("parent_adjusted_gross_income"), 0.0);
        assert_eq!(state.leading_int("student_number_in_family"), None);
        assert_eq!(state.leading_float("gpa"), None);
        assert!(!state.is_yes("soc"));
        assert!(!state.is_no("soc"));
    }

    #[test]
    fn test_mixed_value_readers() {
        let mut state = FormState::new();
        state.set("student_number_in_family", "4");
        state.set("parent_income_protection_allowance", 42430.0);
        state.set("total_estimated_cost_of_attendance", "$61,250");
        state.set("gpa", " 3.62 ");
        state.set("soc", "No");

        assert_eq!(state.leading_int("student_number_in_family"), Some(4));
        assert_eq!(state.amount("parent_income_protection_allowance"), 42430.0);
        assert_eq!(state.text("parent_income_protection_allowance"), "42430");
        assert_eq!(state.amount("total_estimated_cost_of_attendance"), 61250.0);
        assert_eq!(state.leading_float("gpa"), Some(3.62));
        assert!(state.is_no("soc"));
    }

    #[test]
    fn test_json_shape_is_flat() {
        let json = r#"{"gpa":"3.9","quality_rating":20,"merit_award":"$29,500","minimum_pell_indicator":"","other":null}"#;
        let state: FormState = serde_json::from_str(json).unwrap();

        assert_eq!(state.get("quality_rating"), Some(&FieldValue::Number(20.0)));
        assert_eq!(state.get("other"), Some(&FieldValue::Null));
        assert!(state.get("minimum_pell_indicator").unwrap().is_blank());
        assert_eq!(state.amount("merit_award"), 29500.0);

        let round_trip: FormState = serde_json::from_str(&serde_json::to_string(&state).unwrap()).unwrap();
        assert_eq!(round_trip, state);
    }
}

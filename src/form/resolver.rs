//! Field resolver interface between the engine and whatever renders the form
//!
//! The engine never touches presentation. A resolver reads the current widget
//! values for inputs and receives calculated values to display.

use super::fields::{CALCULATED_FIELDS, INPUT_FIELDS};
use super::{FieldValue, FormState};
use std::collections::HashMap;

/// Read/write access to rendered form fields
pub trait FieldResolver {
    /// Current value of a field, or None when it is not shown
    fn read(&self, key: &str) -> Option<FieldValue>;

    /// Display a value in a field
    fn write(&mut self, key: &str, value: &FieldValue);
}

/// Copy every visible input into the state
///
/// Inputs the resolver cannot see keep their stored value. Returns the
/// number of inputs captured.
pub fn capture_inputs<R: FieldResolver + ?Sized>(resolver: &R, state: &mut FormState) -> usize {
    let mut captured = 0;
    for key in INPUT_FIELDS {
        if let Some(value) = resolver.read(key) {
            state.set(key, value);
            captured += 1;
        }
    }
    captured
}

/// Push every stored input and calculated value back to the form
pub fn populate_fields<R: FieldResolver + ?Sized>(resolver: &mut R, state: &FormState) {
    for key in INPUT_FIELDS.iter().chain(CALCULATED_FIELDS) {
        if let Some(value) = state.get(key) {
            resolver.write(key, value);
        }
    }
}

/// Push only calculated values, after a recalculation pass
pub fn publish_calculated<R: FieldResolver + ?Sized>(resolver: &mut R, state: &FormState) {
    for key in CALCULATED_FIELDS {
        if let Some(value) = state.get(key) {
            resolver.write(key, value);
        }
    }
}

/// Resolver backed by a plain map, used by the CLI and tests
#[derive(Debug, Clone, Default)]
pub struct MemoryResolver {
    values: HashMap<String, FieldValue>,
}

impl MemoryResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a widget value as if the applicant had typed it
    pub fn enter(&mut self, key: &str, value: impl Into<FieldValue>) {
        self.values.insert(key.to_string(), value.into());
    }

    pub fn value(&self, key: &str) -> Option<&FieldValue> {
        self.values.get(key)
    }
}

impl FieldResolver for MemoryResolver {
    fn read(&self, key: &str) -> Option<FieldValue> {
        self.values.get(key).map(|value| match value {
            FieldValue::Text(s) => FieldValue::Text(s.trim().to_string()),
            other => other.clone(),
        })
    }

    fn write(&mut self, key: &str, value: &FieldValue) {
        self.values.insert(key.to_string(), value.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::fields;

    #[test]
    fn test_capture_only_visible_inputs() {
        let mut resolver = MemoryResolver::new();
        resolver.enter(fields::GPA, " 3.8 ");
        resolver.enter(fields::FAMILY_SIZE, "4");
        // calculated keys are never captured as inputs
        resolver.enter(fields::SAI, "999");

        let mut state = FormState::new();
        state.set(fields::COHORT, "No");

        let captured = capture_inputs(&resolver, &mut state);
        assert_eq!(captured, 2);
        assert_eq!(state.text(fields::GPA), "3.8");
        assert_eq!(state.text(fields::COHORT), "No");
        assert!(!state.contains(fields::SAI));
    }

    #[test]
    fn test_populate_writes_back_known_fields() {
        let mut state = FormState::new();
        state.set(fields::GPA, "3.8");
        state.set(fields::MERIT_AWARD, "$29,500");
        state.set("unregistered_key", "ignored");

        let mut resolver = MemoryResolver::new();
        populate_fields(&mut resolver, &state);
        assert_eq!(resolver.value(fields::MERIT_AWARD), Some(&FieldValue::from("$29,500")));
        assert_eq!(resolver.value(fields::GPA), Some(&FieldValue::from("3.8")));
        assert!(resolver.value("unregistered_key").is_none());

        let mut calculated_only = MemoryResolver::new();
        publish_calculated(&mut calculated_only, &state);
        assert!(calculated_only.value(fields::GPA).is_none());
        assert!(calculated_only.value(fields::MERIT_AWARD).is_some());
    }
}

//! # Model State
//!
//! The full set of named parameters and simulated signals describing the
//! greenhouse at one instant, grouped into categories (`"p"` structural
//! parameters and setpoints, `"a"` auxiliary fluxes, `"x"` climate states,
//! and whatever else the stepper maintains).
//!
//! The orchestrator treats the state as an opaque bag: it forwards it to the
//! stepper verbatim and only reads the small enumerated list of extraction
//! signals in [`crate::extract`]. The stepper returns a fresh state each
//! step; the previous one is dropped.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Nested mapping of category name -> signal name -> scalar value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelState(BTreeMap<String, BTreeMap<String, f64>>);

impl ModelState {
    /// Create an empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a single named signal.
    pub fn signal(&self, category: &str, name: &str) -> Option<f64> {
        self.0.get(category).and_then(|c| c.get(name)).copied()
    }

    /// Insert or overwrite a signal, creating the category if needed.
    pub fn set(&mut self, category: &str, name: &str, value: f64) {
        self.0
            .entry(category.to_string())
            .or_default()
            .insert(name.to_string(), value);
    }

    /// Builder-style [`set`](Self::set), for assembling initial states.
    pub fn with(mut self, category: &str, name: &str, value: f64) -> Self {
        self.set(category, name, value);
        self
    }

    /// All signals in one category, if present.
    pub fn category(&self, category: &str) -> Option<&BTreeMap<String, f64>> {
        self.0.get(category)
    }

    /// Iterate over category names.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Total number of signals across all categories.
    pub fn len(&self) -> usize {
        self.0.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.0.values().all(BTreeMap::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get_signal() {
        let mut state = ModelState::new();
        state.set("p", "aFlr", 4e4);

        assert_eq!(state.signal("p", "aFlr"), Some(4e4));
        assert_eq!(state.signal("p", "missing"), None);
        assert_eq!(state.signal("a", "aFlr"), None);
    }

    #[test]
    fn test_builder_style() {
        let state = ModelState::new()
            .with("p", "tSpDay", 19.5)
            .with("a", "qLampIn", 100.0);

        assert_eq!(state.len(), 2);
        assert_eq!(state.signal("p", "tSpDay"), Some(19.5));
        assert_eq!(state.signal("a", "qLampIn"), Some(100.0));
    }

    #[test]
    fn test_overwrite_keeps_single_entry() {
        let mut state = ModelState::new();
        state.set("x", "tAir", 18.0);
        state.set("x", "tAir", 21.0);

        assert_eq!(state.len(), 1);
        assert_eq!(state.signal("x", "tAir"), Some(21.0));
    }

    #[test]
    fn test_serde_round_trip() {
        let state = ModelState::new()
            .with("p", "pBoil", 300.0 * 4e4)
            .with("a", "mcFruitHar", 6000.0);

        let json = serde_json::to_string(&state).unwrap();
        let back: ModelState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }
}

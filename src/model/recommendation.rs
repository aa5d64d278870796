//! Recommendation: the engine's advice for one observation.

use serde::{Deserialize, Serialize};

use super::CarPosition;

/// Advice produced by one matching rule.
///
/// Only the four text fields are stored in a log record; the car
/// suggestion is flattened into the record's own car columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    /// What to do now.
    pub call: String,

    /// Why it works.
    pub why: String,

    /// What to do after.
    pub next: String,

    /// What to do if it doesn't work.
    #[serde(rename = "ifthen")]
    pub if_then: String,

    /// Suggested car position; equal to the current one when no move is advised.
    #[serde(skip)]
    pub car_suggested: Option<CarPosition>,
}

impl Recommendation {
    pub fn new(
        call: impl Into<String>,
        why: impl Into<String>,
        next: impl Into<String>,
        if_then: impl Into<String>,
    ) -> Self {
        Self {
            call: call.into(),
            why: why.into(),
            next: next.into(),
            if_then: if_then.into(),
            car_suggested: None,
        }
    }

    #[must_use]
    pub fn with_car(mut self, car: Option<CarPosition>) -> Self {
        self.car_suggested = car;
        self
    }
}

//! Observation: one look at the conditions, as handed to the engine.

use super::{BoatMode, CarPosition, SailMode, Symptom};

/// The full input vector for one engine evaluation.
///
/// `T` is the sail-specific telltale vocabulary.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation<T> {
    pub sail_mode: SailMode,

    /// Direction the true wind blows from, in `[0, 360)`.
    pub wind_direction_true_deg: Option<f64>,

    /// True wind speed in knots, never negative.
    pub wind_speed_kt: Option<f64>,

    /// Only meaningful upwind.
    pub boat_mode: BoatMode,

    pub symptom: Symptom,

    pub telltales: T,

    /// Current jib car position. `None` for sails without a car.
    pub car_position: Option<CarPosition>,
}

impl<T: Default> Default for Observation<T> {
    fn default() -> Self {
        Self {
            sail_mode: SailMode::Upwind,
            wind_direction_true_deg: None,
            wind_speed_kt: None,
            boat_mode: BoatMode::Speed,
            symptom: Symptom::Normal,
            telltales: T::default(),
            car_position: None,
        }
    }
}

impl<T> Observation<T> {
    /// The boat mode as recorded: only present when sailing upwind.
    pub fn effective_boat_mode(&self) -> Option<BoatMode> {
        match self.sail_mode {
            SailMode::Upwind => Some(self.boat_mode),
            SailMode::Downwind => None,
        }
    }
}

//! Session: the inputs shared by both trim views.
//!
//! One value, passed explicitly to whichever engine is evaluated. It is
//! loaded from stored preferences at the start and saved back at the end.
//! Text setters are the input boundary: bad numbers are rejected here and
//! the previous value is kept, so the engine never sees NaN.

use crate::course::classify_sail_mode;
use crate::geometry::wrap_angle;
use crate::model::{BoatMode, CarPosition, Observation, SailMode, Symptom};
use crate::storage::{Preferences, Storage};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub sail_mode: SailMode,
    wind_direction_deg: Option<f64>,
    wind_speed_kt: Option<f64>,
    car_position: CarPosition,
    pub boat_mode: BoatMode,
    pub symptom: Symptom,
}

impl Session {
    /// Prefills from stored preferences; anything absent keeps its default.
    pub fn load(storage: &Storage) -> Self {
        let prefs = storage.load_preferences();
        Self {
            sail_mode: prefs.sail_mode.unwrap_or_default(),
            wind_direction_deg: prefs.wind_direction_deg.map(wrap_angle),
            wind_speed_kt: prefs.wind_speed_kt.filter(|kt| *kt >= 0.0),
            car_position: prefs.car_position.unwrap_or_default(),
            ..Self::default()
        }
    }

    pub fn save(&self, storage: &Storage) {
        storage.save_preferences(&Preferences {
            sail_mode: Some(self.sail_mode),
            wind_direction_deg: self.wind_direction_deg,
            wind_speed_kt: self.wind_speed_kt,
            car_position: Some(self.car_position),
        });
    }

    pub fn wind_direction_deg(&self) -> Option<f64> {
        self.wind_direction_deg
    }

    pub fn wind_speed_kt(&self) -> Option<f64> {
        self.wind_speed_kt
    }

    pub fn car_position(&self) -> CarPosition {
        self.car_position
    }

    /// Sets the true wind direction from text. Empty clears it.
    ///
    /// Returns `false` (keeping the old value) when the text isn't a number.
    pub fn set_wind_direction(&mut self, input: &str) -> bool {
        match parse_optional(input) {
            Ok(value) => {
                self.wind_direction_deg = value.map(wrap_angle);
                true
            }
            Err(()) => reject("wind direction", input),
        }
    }

    /// Sets the wind speed from text. Empty clears it; negatives are rejected.
    pub fn set_wind_speed(&mut self, input: &str) -> bool {
        match parse_optional(input) {
            Ok(Some(kt)) if kt < 0.0 => reject("wind speed", input),
            Ok(value) => {
                self.wind_speed_kt = value;
                true
            }
            Err(()) => reject("wind speed", input),
        }
    }

    /// Sets the jib car position from text, clamped to the track.
    pub fn set_car_position(&mut self, input: &str) -> bool {
        match parse_optional(input) {
            Ok(Some(raw)) => {
                self.car_position = CarPosition::clamped(raw);
                true
            }
            Ok(None) | Err(()) => reject("car position", input),
        }
    }

    /// Switches sail mode from a GPS course when it is clearly up or downwind.
    ///
    /// Reaches and unknown wind leave the mode alone. Returns the new mode
    /// when it changed.
    pub fn apply_course(&mut self, course_over_ground_deg: Option<f64>) -> Option<SailMode> {
        let cog = course_over_ground_deg?;
        let wind = self.wind_direction_deg?;
        let mode = classify_sail_mode(cog, wind).sail_mode()?;
        if mode == self.sail_mode {
            return None;
        }
        log::debug!("course {cog:.0} vs wind {wind:.0}: switching to {mode}");
        self.sail_mode = mode;
        Some(mode)
    }

    /// Builds the engine input. The car is only included for sails that have one.
    pub fn observation<T>(&self, telltales: T, with_car: bool) -> Observation<T> {
        Observation {
            sail_mode: self.sail_mode,
            wind_direction_true_deg: self.wind_direction_deg,
            wind_speed_kt: self.wind_speed_kt,
            boat_mode: self.boat_mode,
            symptom: self.symptom,
            telltales,
            car_position: with_car.then_some(self.car_position),
        }
    }
}

fn parse_optional(input: &str) -> Result<Option<f64>, ()> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    match trimmed.parse::<f64>() {
        Ok(n) if n.is_finite() => Ok(Some(n)),
        _ => Err(()),
    }
}

fn reject(field: &str, input: &str) -> bool {
    log::warn!("ignoring invalid {field} '{input}', keeping previous value");
    false
}

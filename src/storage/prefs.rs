//! Session preferences: the last inputs, used to prefill the next session.
//!
//! Stored as plain text under small keys. Garbage reads as absent.

use crate::model::{CarPosition, SailMode};

use super::Storage;

const MODE_KEY: &str = "trim-mode";
const WIND_DIR_KEY: &str = "wind-dir-deg";
const WIND_SPD_KEY: &str = "wind-spd-kt";
const CAR_POS_KEY: &str = "jib-car-pos-screw-v1";

/// Last-used inputs. Every field may be absent.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Preferences {
    pub sail_mode: Option<SailMode>,
    pub wind_direction_deg: Option<f64>,
    pub wind_speed_kt: Option<f64>,
    pub car_position: Option<CarPosition>,
}

impl Storage {
    pub fn load_preferences(&self) -> Preferences {
        Preferences {
            sail_mode: self.read_pref(MODE_KEY).and_then(|v| v.parse().ok()),
            wind_direction_deg: self.read_number(WIND_DIR_KEY),
            wind_speed_kt: self.read_number(WIND_SPD_KEY),
            car_position: self.read_number(CAR_POS_KEY).map(CarPosition::clamped),
        }
    }

    /// Writes the present fields. Absent fields keep their stored value.
    pub fn save_preferences(&self, prefs: &Preferences) {
        if let Some(mode) = prefs.sail_mode {
            self.write_pref(MODE_KEY, mode.to_string());
        }
        if let Some(dir) = prefs.wind_direction_deg {
            self.write_pref(WIND_DIR_KEY, dir.to_string());
        }
        if let Some(speed) = prefs.wind_speed_kt {
            self.write_pref(WIND_SPD_KEY, speed.to_string());
        }
        if let Some(car) = prefs.car_position {
            self.write_pref(CAR_POS_KEY, car.to_string());
        }
    }

    fn read_pref(&self, key: &str) -> Option<String> {
        match self.read_key(key) {
            Ok(value) => value.map(|v| v.trim().to_string()),
            Err(e) => {
                log::warn!("preference {key} unreadable: {e}");
                None
            }
        }
    }

    fn read_number(&self, key: &str) -> Option<f64> {
        self.read_pref(key)?
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
    }

    fn write_pref(&self, key: &str, value: String) {
        if let Err(e) = self.write_key(key, &value) {
            log::warn!("could not save preference {key}: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::storage::test_support::test_storage;

    #[test]
    fn absent_preferences_load_as_none() {
        let (_dir, storage) = test_storage();
        assert_eq!(storage.load_preferences(), Preferences::default());
    }

    #[test]
    fn save_and_load() {
        let (_dir, storage) = test_storage();
        let prefs = Preferences {
            sail_mode: Some(SailMode::Downwind),
            wind_direction_deg: Some(225.0),
            wind_speed_kt: Some(12.5),
            car_position: Some(CarPosition::clamped(9.0)),
        };
        storage.save_preferences(&prefs);
        assert_eq!(storage.load_preferences(), prefs);
    }

    #[test]
    fn garbage_reads_as_absent() {
        let (_dir, storage) = test_storage();
        storage.write_key(MODE_KEY, "sideways").unwrap();
        storage.write_key(WIND_SPD_KEY, "fast").unwrap();
        storage.write_key(WIND_DIR_KEY, "NaN").unwrap();
        storage.write_key(CAR_POS_KEY, "99").unwrap();

        let prefs = storage.load_preferences();
        assert!(prefs.sail_mode.is_none());
        assert!(prefs.wind_speed_kt.is_none());
        assert!(prefs.wind_direction_deg.is_none());
        // Out-of-range car positions clamp rather than vanish.
        assert_eq!(prefs.car_position.map(CarPosition::get), Some(24));
    }

    #[test]
    fn absent_fields_keep_stored_values() {
        let (_dir, storage) = test_storage();
        storage.save_preferences(&Preferences {
            wind_speed_kt: Some(8.0),
            ..Preferences::default()
        });
        storage.save_preferences(&Preferences {
            sail_mode: Some(SailMode::Upwind),
            ..Preferences::default()
        });
        let prefs = storage.load_preferences();
        assert_eq!(prefs.wind_speed_kt, Some(8.0));
        assert_eq!(prefs.sail_mode, Some(SailMode::Upwind));
    }
}

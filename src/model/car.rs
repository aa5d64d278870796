//! Jib car position on its track.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A jib car position, always within `1..=24`.
///
/// Higher numbers are further aft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct CarPosition(u8);

impl CarPosition {
    pub const MIN: Self = Self(1);
    pub const MAX: Self = Self(24);

    /// Rounds to the nearest position and clamps into `1..=24`.
    ///
    /// NaN clamps to the forward end.
    pub fn clamped(raw: f64) -> Self {
        if raw.is_nan() {
            return Self::MIN;
        }
        let rounded = raw.round().clamp(f64::from(Self::MIN.0), f64::from(Self::MAX.0));
        Self(rounded as u8)
    }

    /// The position `delta` holes away, clamped to the track.
    pub fn offset(self, delta: i32) -> Self {
        let target = (i32::from(self.0) + delta).clamp(i32::from(Self::MIN.0), i32::from(Self::MAX.0));
        Self(target as u8)
    }

    /// Signed distance from `self` to `to`; positive is aft.
    pub fn delta_to(self, to: Self) -> i32 {
        i32::from(to.0) - i32::from(self.0)
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for CarPosition {
    fn default() -> Self {
        Self::MIN
    }
}

impl TryFrom<i64> for CarPosition {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if (i64::from(Self::MIN.0)..=i64::from(Self::MAX.0)).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(format!("car position {value} outside 1..=24"))
        }
    }
}

impl From<CarPosition> for u8 {
    fn from(value: CarPosition) -> Self {
        value.0
    }
}

impl fmt::Display for CarPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

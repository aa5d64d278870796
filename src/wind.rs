//! Wind banding: coarse wind-speed classes that scale recommendation aggressiveness.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A coarse wind-speed classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindBand {
    Light,
    Medium,
    Heavy,
    Unknown,
}

impl WindBand {
    /// Classifies a wind speed in knots.
    ///
    /// Under 8 kt is light, 8 through 14 kt is medium, anything above is heavy.
    pub fn from_speed(speed_kt: Option<f64>) -> Self {
        match speed_kt {
            None => Self::Unknown,
            Some(kt) if kt.is_nan() => Self::Unknown,
            Some(kt) if kt < 8.0 => Self::Light,
            Some(kt) if kt <= 14.0 => Self::Medium,
            Some(_) => Self::Heavy,
        }
    }

    /// Car step for routine adjustments.
    pub fn step_small(self) -> i32 {
        if self == Self::Heavy { 2 } else { 1 }
    }

    /// Car step for large adjustments.
    pub fn step_big(self) -> i32 {
        if self == Self::Heavy { 3 } else { 2 }
    }
}

impl fmt::Display for WindBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Light => "light",
            Self::Medium => "medium",
            Self::Heavy => "heavy",
            Self::Unknown => "unknown",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn breakpoints() {
        let cases = [
            (None, WindBand::Unknown),
            (Some(0.0), WindBand::Light),
            (Some(7.99), WindBand::Light),
            (Some(8.0), WindBand::Medium),
            (Some(14.0), WindBand::Medium),
            (Some(14.01), WindBand::Heavy),
            (Some(30.0), WindBand::Heavy),
        ];
        for (speed, expected) in cases {
            assert_eq!(WindBand::from_speed(speed), expected, "speed {speed:?}");
        }
    }

    #[test]
    fn nan_is_unknown() {
        assert_eq!(WindBand::from_speed(Some(f64::NAN)), WindBand::Unknown);
    }

    #[test]
    fn heavy_widens_steps() {
        assert_eq!(WindBand::Medium.step_small(), 1);
        assert_eq!(WindBand::Medium.step_big(), 2);
        assert_eq!(WindBand::Heavy.step_small(), 2);
        assert_eq!(WindBand::Heavy.step_big(), 3);
        assert_eq!(WindBand::Unknown.step_small(), 1);
    }
}

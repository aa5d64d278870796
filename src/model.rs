//! Core data model for Layline.
//!
//! These types describe what the trimmer sees (observations), what the
//! engine says (recommendations), and what the log remembers (records).

mod car;
mod gps;
mod log;
mod observation;
mod recommendation;
mod telltales;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use car::CarPosition;
pub use gps::{GpsPermission, GpsSnapshot};
pub use log::{LogRecord, LogStatus, Rating};
pub use observation::Observation;
pub use recommendation::Recommendation;
pub use telltales::{JibTelltales, MainTelltales};

/// An enum with a stable snake_case token, as stored in records and typed at the prompt.
pub trait Token: Sized + Copy + 'static {
    /// Every variant, in display order.
    const ALL: &'static [Self];

    /// The stored token, e.g. `"cant_hold_lane"`.
    fn as_str(self) -> &'static str;
}

/// Parses a token, accepting `-` in place of `_`.
pub fn parse_token<T: Token>(input: &str) -> Result<T, String> {
    let normalized = input.trim().to_ascii_lowercase().replace('-', "_");
    T::ALL
        .iter()
        .copied()
        .find(|v| v.as_str() == normalized)
        .ok_or_else(|| {
            let expected: Vec<&str> = T::ALL.iter().map(|v| v.as_str()).collect();
            format!("unknown value '{input}', expected one of: {}", expected.join(", "))
        })
}

/// Whether the boat is working to windward or running off.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SailMode {
    #[default]
    Upwind,
    Downwind,
}

impl Token for SailMode {
    const ALL: &'static [Self] = &[Self::Upwind, Self::Downwind];

    fn as_str(self) -> &'static str {
        match self {
            Self::Upwind => "upwind",
            Self::Downwind => "downwind",
        }
    }
}

/// Upwind intent: what the helm is trying to optimize.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoatMode {
    #[default]
    Speed,
    Pointing,
    Control,
}

impl Token for BoatMode {
    const ALL: &'static [Self] = &[Self::Speed, Self::Pointing, Self::Control];

    fn as_str(self) -> &'static str {
        match self {
            Self::Speed => "speed",
            Self::Pointing => "pointing",
            Self::Control => "control",
        }
    }
}

/// What the boat feels like right now.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Symptom {
    #[default]
    Normal,
    Slow,
    Pinching,
    Overpowered,
    #[serde(rename = "badair")]
    BadAir,
    CantHoldLane,
}

impl Token for Symptom {
    const ALL: &'static [Self] = &[
        Self::Normal,
        Self::Slow,
        Self::Pinching,
        Self::Overpowered,
        Self::BadAir,
        Self::CantHoldLane,
    ];

    fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Slow => "slow",
            Self::Pinching => "pinching",
            Self::Overpowered => "overpowered",
            Self::BadAir => "badair",
            Self::CantHoldLane => "cant_hold_lane",
        }
    }
}

macro_rules! token_impls {
    ($($ty:ty),* $(,)?) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.as_str())
                }
            }

            impl FromStr for $ty {
                type Err = String;

                fn from_str(s: &str) -> Result<Self, Self::Err> {
                    parse_token(s)
                }
            }
        )*
    };
}

token_impls!(
    SailMode,
    BoatMode,
    Symptom,
    JibTelltales,
    MainTelltales,
    Rating,
    LogStatus,
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_kebab_case() {
        assert_eq!(
            "cant-hold-lane".parse::<Symptom>().unwrap(),
            Symptom::CantHoldLane
        );
        assert_eq!(
            "Leeward_Stalled".parse::<JibTelltales>().unwrap(),
            JibTelltales::LeewardStalled
        );
    }

    #[test]
    fn parse_rejects_unknown_with_choices() {
        let err = "sideways".parse::<SailMode>().unwrap_err();
        assert!(err.contains("upwind, downwind"));
    }

    #[test]
    fn tokens_match_serde_names() {
        for symptom in Symptom::ALL {
            let json = serde_json::to_string(symptom).unwrap();
            assert_eq!(json, format!("\"{}\"", symptom.as_str()));
        }
        for reading in JibTelltales::ALL {
            let json = serde_json::to_string(reading).unwrap();
            assert_eq!(json, format!("\"{}\"", reading.as_str()));
        }
        for reading in MainTelltales::ALL {
            let json = serde_json::to_string(reading).unwrap();
            assert_eq!(json, format!("\"{}\"", reading.as_str()));
        }
    }
}

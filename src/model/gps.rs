//! GPS snapshot types: what the course provider last reported.

use serde::{Deserialize, Serialize};

/// Location permission as reported by the device.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GpsPermission {
    #[default]
    Unknown,
    Granted,
    Denied,
}

/// Position and course at the moment a recommendation was made.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GpsSnapshot {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub cog_deg: Option<f64>,
    pub sog_mps: Option<f64>,
    pub accuracy_m: Option<f64>,
}

//! Course tracking from raw position fixes.
//!
//! Acquisition happens elsewhere; this only turns fixes into the snapshot
//! the engine and the log consume. Course is the device heading when it
//! reports one, otherwise the bearing from the previous fix.

use crate::geometry::{bearing, wrap_angle};
use crate::model::{GpsPermission, GpsSnapshot};

/// One position report from the device.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Fix {
    pub lat: f64,
    pub lon: f64,
    pub speed_mps: Option<f64>,
    pub heading_deg: Option<f64>,
    pub accuracy_m: Option<f64>,
}

/// Why a position request failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GpsFailure {
    PermissionDenied,
    PositionUnavailable,
    Timeout,
}

/// Latest course state, as shown to the trimmer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CourseState {
    pub permission: GpsPermission,
    pub cog_deg: Option<f64>,
    pub sog_mps: Option<f64>,
    pub accuracy_m: Option<f64>,
    pub error: Option<String>,
}

#[derive(Debug, Default)]
pub struct CourseTracker {
    last: Option<Fix>,
    state: CourseState,
}

impl CourseTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds a new fix into the course state.
    pub fn update(&mut self, fix: Fix) {
        let cog = match fix.heading_deg.filter(|h| h.is_finite()) {
            Some(heading) => Some(wrap_angle(heading)),
            None => self
                .last
                .map(|prev| bearing(prev.lat, prev.lon, fix.lat, fix.lon)),
        };

        self.last = Some(fix);
        self.state = CourseState {
            permission: GpsPermission::Granted,
            cog_deg: cog,
            sog_mps: fix.speed_mps,
            accuracy_m: fix.accuracy_m,
            error: None,
        };
    }

    /// Records a failed request. Only a permission denial changes permission.
    pub fn fail(&mut self, failure: GpsFailure, message: impl Into<String>) {
        if failure == GpsFailure::PermissionDenied {
            self.state.permission = GpsPermission::Denied;
        }
        self.state.error = Some(message.into());
    }

    pub fn state(&self) -> &CourseState {
        &self.state
    }

    /// The snapshot to store with a record.
    ///
    /// Position is only included when `with_position` is set.
    pub fn snapshot(&self, with_position: bool) -> GpsSnapshot {
        let position = self.last.filter(|_| with_position);
        GpsSnapshot {
            lat: position.map(|f| f.lat),
            lon: position.map(|f| f.lon),
            cog_deg: self.state.cog_deg,
            sog_mps: self.state.sog_mps,
            accuracy_m: self.state.accuracy_m,
        }
    }
}

//! Log records: one per recommendation trial, with a rating lifecycle.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{
    BoatMode, CarPosition, GpsSnapshot, Observation, Recommendation, SailMode, Symptom, Token,
};

/// Where a trial stands in its lifecycle.
///
/// `Pending` and `Unrated` can both be rated; `Rated` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogStatus {
    /// Just recommended, waiting for feedback.
    Pending,
    /// The feedback window closed without a rating.
    Unrated,
    /// The trimmer said how it went.
    Rated,
}

impl Token for LogStatus {
    const ALL: &'static [Self] = &[Self::Pending, Self::Unrated, Self::Rated];

    fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Unrated => "unrated",
            Self::Rated => "rated",
        }
    }
}

/// How the boat went after following the advice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rating {
    Better,
    Same,
    Worse,
}

impl Token for Rating {
    const ALL: &'static [Self] = &[Self::Better, Self::Same, Self::Worse];

    fn as_str(self) -> &'static str {
        match self {
            Self::Better => "better",
            Self::Same => "same",
            Self::Worse => "worse",
        }
    }
}

/// A logged recommendation trial.
///
/// Records are created through [`LogRecord::pending`] and only change through
/// [`LogRecord::finalize_unrated`] and [`LogRecord::rate`], which keep `rating`
/// present exactly when `status` is `Rated`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogRecord {
    pub id: String,

    #[serde(rename = "createdAtISO")]
    pub created_at: Timestamp,

    #[serde(rename = "updatedAtISO")]
    pub updated_at: Timestamp,

    #[serde(
        rename = "autoFinalizedAtISO",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub auto_finalized_at: Option<Timestamp>,

    pub status: LogStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<Rating>,

    /// Which trim view produced it, e.g. `/trim/jib`.
    pub page: String,

    pub sail_mode: SailMode,
    pub wind_dir_true_from_deg: Option<f64>,
    pub wind_speed_kt: Option<f64>,
    pub boat_mode: Option<BoatMode>,
    pub symptom: Symptom,

    /// Sail-specific telltale token; `page` says which vocabulary.
    pub telltales: String,

    pub car_before: Option<CarPosition>,
    pub car_suggested: Option<CarPosition>,
    /// `car_suggested - car_before`, positive is aft.
    pub car_delta: Option<i32>,

    pub recommendation: Recommendation,

    #[serde(default)]
    pub gps: Option<GpsSnapshot>,

    /// Which rule-table revision produced the recommendation.
    pub logic_version: String,
}

impl LogRecord {
    /// Builds a fresh pending record with a new id.
    pub fn pending<T: Token>(
        page: &str,
        observation: &Observation<T>,
        recommendation: &Recommendation,
        gps: Option<GpsSnapshot>,
        logic_version: &str,
        now: Timestamp,
    ) -> Self {
        let car_before = observation.car_position;
        let car_suggested = car_before.map(|before| recommendation.car_suggested.unwrap_or(before));
        let car_delta = car_before
            .zip(car_suggested)
            .map(|(before, suggested)| before.delta_to(suggested));

        Self {
            id: Uuid::new_v4().to_string(),
            created_at: now,
            updated_at: now,
            auto_finalized_at: None,
            status: LogStatus::Pending,
            rating: None,
            page: page.to_string(),
            sail_mode: observation.sail_mode,
            wind_dir_true_from_deg: observation.wind_direction_true_deg,
            wind_speed_kt: observation.wind_speed_kt,
            boat_mode: observation.effective_boat_mode(),
            symptom: observation.symptom,
            telltales: observation.telltales.as_str().to_string(),
            car_before,
            car_suggested,
            car_delta,
            recommendation: Recommendation {
                car_suggested: None,
                ..recommendation.clone()
            },
            gps,
            logic_version: logic_version.to_string(),
        }
    }

    /// Closes the feedback window. Returns `false` unless the record was pending.
    pub fn finalize_unrated(&mut self, now: Timestamp) -> bool {
        if self.status != LogStatus::Pending {
            return false;
        }
        self.status = LogStatus::Unrated;
        self.auto_finalized_at = Some(now);
        self.updated_at = now;
        true
    }

    /// Records a rating, from either pending or unrated.
    pub fn rate(&mut self, rating: Rating, now: Timestamp) {
        self.status = LogStatus::Rated;
        self.rating = Some(rating);
        self.updated_at = now;
    }
}

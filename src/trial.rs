//! One trial: evaluate the engine, score confidence, optionally log it.

use crate::confidence::{Confidence, Similarity, confidence};
use crate::engine::{Evaluation, Sail, evaluate};
use crate::model::{GpsSnapshot, LogRecord, Observation, Token};
use crate::storage::Storage;

/// What the trimmer is shown for one observation.
#[derive(Debug, Clone, PartialEq)]
pub struct Advice {
    pub evaluation: Evaluation,
    pub confidence: Confidence,
}

/// Evaluates the sail's rules and scores them against past rated trials.
pub fn advise<S: Sail>(storage: &Storage, observation: &Observation<S::Telltales>) -> Advice {
    let evaluation = evaluate::<S>(observation);
    let query = Similarity {
        page: S::PAGE,
        sail_mode: observation.sail_mode,
        wind_speed_kt: observation.wind_speed_kt,
        telltales: observation.telltales.as_str(),
    };
    let confidence = confidence(&query, &storage.load_logs());
    Advice {
        evaluation,
        confidence,
    }
}

/// Logs the advice as the new pending trial.
pub fn record<S: Sail>(
    storage: &Storage,
    observation: &Observation<S::Telltales>,
    advice: &Advice,
    gps: Option<GpsSnapshot>,
) -> LogRecord {
    storage.create_pending(
        S::PAGE,
        observation,
        &advice.evaluation.recommendation,
        gps,
        S::LOGIC_VERSION,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::confidence::ConfidenceLabel;
    use crate::engine::{Jib, Mainsail};
    use crate::model::{
        CarPosition, JibTelltales, LogStatus, MainTelltales, Rating, SailMode, Symptom,
    };
    use crate::storage::test_support::test_storage;

    fn leeward_stalled() -> Observation<JibTelltales> {
        Observation {
            wind_speed_kt: Some(10.0),
            telltales: JibTelltales::LeewardStalled,
            car_position: Some(CarPosition::clamped(5.0)),
            ..Observation::default()
        }
    }

    #[test]
    fn fresh_store_has_no_confidence() {
        let (_dir, storage) = test_storage();
        let advice = advise::<Jib>(&storage, &leeward_stalled());
        assert_eq!(advice.confidence.label, ConfidenceLabel::None);
        assert_eq!(
            advice.evaluation.recommendation.car_suggested.map(CarPosition::get),
            Some(6)
        );
    }

    #[test]
    fn recorded_trials_feed_later_confidence() {
        let (_dir, storage) = test_storage();
        let observation = leeward_stalled();
        for _ in 0..4 {
            let advice = advise::<Jib>(&storage, &observation);
            let record = record::<Jib>(&storage, &observation, &advice, None);
            storage.rate(&record.id, Rating::Better);
        }
        let advice = advise::<Jib>(&storage, &observation);
        assert_eq!(advice.confidence.label, ConfidenceLabel::Medium);
        assert_eq!(advice.confidence.n, 4);
    }

    #[test]
    fn record_tags_page_and_logic_version() {
        let (_dir, storage) = test_storage();
        let observation = Observation {
            sail_mode: SailMode::Upwind,
            symptom: Symptom::Slow,
            telltales: MainTelltales::TooClosed,
            ..Observation::default()
        };
        let advice = advise::<Mainsail>(&storage, &observation);
        let record = record::<Mainsail>(&storage, &observation, &advice, None);

        assert_eq!(record.status, LogStatus::Pending);
        assert_eq!(record.page, "/trim/main");
        assert_eq!(record.logic_version, "main_v2_telltales");
        assert_eq!(record.telltales, "too_closed");
        assert!(record.car_before.is_none());
        assert_eq!(storage.pending_id(), Some(record.id));
    }
}

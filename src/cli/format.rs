//! Output formatting for CLI display.

use crate::model::{CarPosition, LogRecord, LogStatus};
use crate::storage::LogCounts;
use crate::trial::Advice;

/// First eight characters of an id, as shown in listings.
pub(crate) fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

/// The four-part recommendation, the car move, and the confidence line.
pub(crate) fn format_advice(advice: &Advice, car_before: Option<CarPosition>) -> String {
    let rec = &advice.evaluation.recommendation;
    let mut lines = vec![
        format!("Call:       {}", rec.call),
        format!("Why:        {}", rec.why),
        format!("Next:       {}", rec.next),
        format!("If/then:    {}", rec.if_then),
    ];
    if let (Some(before), Some(after)) = (car_before, rec.car_suggested) {
        let car = if before == after {
            format!("hold at {before}")
        } else {
            format!("{before} → {after}")
        };
        lines.push(format!("Car:        {car}"));
    }
    lines.push(format!("Confidence: {}", advice.confidence));
    lines.join("\n")
}

/// The session inputs behind the advice: true wind and, for the jib, the car.
pub(crate) fn format_conditions(
    wind_dir_deg: Option<f64>,
    wind_speed_kt: Option<f64>,
    car: Option<CarPosition>,
) -> String {
    let dir = wind_dir_deg.map_or_else(|| "?°".to_string(), |deg| format!("{deg:.0}°"));
    let speed = wind_speed_kt.map_or_else(|| "?kt".to_string(), |kt| format!("{kt:.1}kt"));
    let mut line = format!("Wind:       {dir} {speed}");
    if let Some(car) = car {
        line.push_str(&format!("  car {car}"));
    }
    line
}

pub(crate) fn format_status(record: &LogRecord) -> String {
    match (record.status, record.rating) {
        (LogStatus::Rated, Some(rating)) => format!("rated {rating}"),
        (status, _) => status.to_string(),
    }
}

/// One listing line: id, time, status, conditions, call.
pub(crate) fn format_log_line(record: &LogRecord) -> String {
    let wind = record
        .wind_speed_kt
        .map_or_else(|| "?".to_string(), |kt| format!("{kt:.0}"));
    let car = match (record.car_before, record.car_suggested) {
        (Some(before), Some(after)) if before != after => format!("  car {before}→{after}"),
        _ => String::new(),
    };
    format!(
        "{}  {}  [{}]  {} {} {}kt {} {}{car}  {}",
        short_id(&record.id),
        record.created_at.strftime("%Y-%m-%d %H:%M"),
        format_status(record),
        record.page.trim_start_matches("/trim/"),
        record.sail_mode,
        wind,
        record.symptom,
        record.telltales,
        record.recommendation.call,
    )
}

pub(crate) fn format_counts(counts: &LogCounts) -> String {
    format!(
        "{} logs: {} pending, {} unrated, {} rated",
        counts.all, counts.pending, counts.unrated, counts.rated
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    use jiff::Timestamp;

    use crate::confidence::{Confidence, ConfidenceLabel};
    use crate::engine::Evaluation;
    use crate::model::{JibTelltales, Observation, Rating, Recommendation};

    fn advice(car: Option<u8>) -> Advice {
        Advice {
            evaluation: Evaluation {
                rule: "test",
                recommendation: Recommendation::new("Ease", "Stalled", "Watch", "If x, y")
                    .with_car(car.map(|c| CarPosition::clamped(f64::from(c)))),
            },
            confidence: Confidence {
                label: ConfidenceLabel::None,
                n: 0,
                better_fraction: None,
            },
        }
    }

    #[test]
    fn short_id_tolerates_short_input() {
        assert_eq!(short_id("abc"), "abc");
        assert_eq!(short_id("0123456789"), "01234567");
    }

    #[test]
    fn advice_shows_car_move() {
        let text = format_advice(&advice(Some(7)), Some(CarPosition::clamped(5.0)));
        assert!(text.contains("Call:       Ease"));
        assert!(text.contains("Car:        5 → 7"));
        assert!(text.ends_with("Confidence: None (no similar rated trials)"));
    }

    #[test]
    fn advice_without_car_omits_car_line() {
        let text = format_advice(&advice(None), None);
        assert!(!text.contains("Car:"));
    }

    #[test]
    fn conditions_mark_missing_wind() {
        assert_eq!(format_conditions(None, None, None), "Wind:       ?° ?kt");
        assert_eq!(
            format_conditions(Some(225.0), Some(12.5), Some(CarPosition::clamped(5.0))),
            "Wind:       225° 12.5kt  car 5"
        );
    }

    #[test]
    fn log_line_shows_rating() {
        let observation = Observation {
            wind_speed_kt: Some(12.4),
            telltales: JibTelltales::AllFlowing,
            ..Observation::<JibTelltales>::default()
        };
        let mut record = LogRecord::pending(
            "/trim/jib",
            &observation,
            &Recommendation::new("Hold", "w", "n", "i"),
            None,
            "v",
            Timestamp::now(),
        );
        record.id = "abcdef0123".to_string();
        record.rate(Rating::Better, Timestamp::now());

        let line = format_log_line(&record);
        assert!(line.starts_with("abcdef01  "));
        assert!(line.contains("[rated better]"));
        assert!(line.contains("jib upwind 12kt normal all_flowing"));
        assert!(line.ends_with("Hold"));
    }
}

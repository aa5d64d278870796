//! Confidence: how similar past trials were rated.
//!
//! Recomputed from the full record set on every query. It only informs what
//! is displayed; the rule tables never change because of it.

use std::fmt;

use crate::model::{LogRecord, LogStatus, Rating, SailMode};
use crate::wind::WindBand;

/// Minimum similar trials for a `High` label.
const HIGH_MIN_TRIALS: usize = 8;

/// Minimum share rated better for a `High` label.
const HIGH_MIN_BETTER: f64 = 0.65;

/// Minimum similar trials for a `Medium` label.
const MEDIUM_MIN_TRIALS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfidenceLabel {
    None,
    Low,
    Medium,
    High,
}

impl fmt::Display for ConfidenceLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::None => "None",
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Confidence {
    pub label: ConfidenceLabel,
    /// Number of similar rated trials.
    pub n: usize,
    /// Share of those rated better; `None` when there are none.
    pub better_fraction: Option<f64>,
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.better_fraction {
            Some(better) => write!(
                f,
                "{} ({} similar, {:.0}% better)",
                self.label,
                self.n,
                better * 100.0
            ),
            None => write!(f, "{} (no similar rated trials)", self.label),
        }
    }
}

/// Which past trials count as similar.
#[derive(Debug, Clone, Copy)]
pub struct Similarity<'a> {
    pub page: &'a str,
    pub sail_mode: SailMode,
    pub wind_speed_kt: Option<f64>,
    pub telltales: &'a str,
}

impl Similarity<'_> {
    fn matches(&self, band: WindBand, record: &LogRecord) -> bool {
        record.status == LogStatus::Rated
            && record.page == self.page
            && record.sail_mode == self.sail_mode
            && WindBand::from_speed(record.wind_speed_kt) == band
            && record.telltales == self.telltales
    }
}

/// Scores how similar rated trials turned out.
pub fn confidence(query: &Similarity<'_>, logs: &[LogRecord]) -> Confidence {
    let band = WindBand::from_speed(query.wind_speed_kt);
    let (n, better) = logs
        .iter()
        .filter(|l| query.matches(band, l))
        .fold((0usize, 0usize), |(n, better), l| {
            (n + 1, better + usize::from(l.rating == Some(Rating::Better)))
        });

    if n == 0 {
        return Confidence {
            label: ConfidenceLabel::None,
            n: 0,
            better_fraction: None,
        };
    }

    #[allow(clippy::cast_precision_loss)]
    let better_fraction = better as f64 / n as f64;

    let label = if n >= HIGH_MIN_TRIALS && better_fraction >= HIGH_MIN_BETTER {
        ConfidenceLabel::High
    } else if n >= MEDIUM_MIN_TRIALS {
        ConfidenceLabel::Medium
    } else {
        ConfidenceLabel::Low
    };

    Confidence {
        label,
        n,
        better_fraction: Some(better_fraction),
    }
}

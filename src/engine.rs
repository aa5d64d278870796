//! Recommendation engine: ordered rule tables and the interpreter that walks them.
//!
//! Each sail has its own table of guarded rules. Evaluation is first match
//! wins, top to bottom; the table's fallback answers when nothing else does.
//! Tables are fixed per logic version: the log never feeds back into them.

mod jib;
mod main_sail;

use crate::model::{CarPosition, Observation, Recommendation, Token};
use crate::wind::WindBand;

pub use jib::Jib;
pub use main_sail::Mainsail;

/// A sail with its own telltale vocabulary and rule table.
pub trait Sail {
    type Telltales: Token + Default + std::fmt::Debug + PartialEq;

    /// Page identifier stored on every record this sail produces.
    const PAGE: &'static str;

    /// Revision tag of the rule table; bump whenever advice changes.
    const LOGIC_VERSION: &'static str;

    /// Human-readable sail name.
    const NAME: &'static str;

    /// Whether the sail is led through an adjustable car.
    const HAS_CAR: bool;

    fn table() -> &'static RuleTable<Self::Telltales>;
}

/// What a rule sees: the observation plus derived wind band.
pub struct Situation<'a, T> {
    pub observation: &'a Observation<T>,
    pub band: WindBand,
}

impl<'a, T> Situation<'a, T> {
    pub fn new(observation: &'a Observation<T>) -> Self {
        Self {
            observation,
            band: WindBand::from_speed(observation.wind_speed_kt),
        }
    }

    /// Current car position; a missing position reads as the forward stop.
    pub fn car(&self) -> CarPosition {
        self.observation.car_position.unwrap_or_default()
    }

    /// Car position `delta` holes away; positive is aft.
    pub fn car_by(&self, delta: i32) -> CarPosition {
        self.car().offset(delta)
    }
}

/// A guarded rule: when `applies` holds, `respond` produces the advice.
pub struct Rule<T: 'static> {
    pub name: &'static str,
    pub applies: fn(&Situation<'_, T>) -> bool,
    pub respond: fn(&Situation<'_, T>) -> Recommendation,
}

/// An ordered decision list with a catch-all.
pub struct RuleTable<T: 'static> {
    pub rules: &'static [Rule<T>],
    pub fallback: Rule<T>,
}

impl<T> RuleTable<T> {
    /// The rule that answers for this situation.
    pub fn select(&self, situation: &Situation<'_, T>) -> &Rule<T> {
        self.rules
            .iter()
            .find(|rule| (rule.applies)(situation))
            .unwrap_or(&self.fallback)
    }
}

/// The outcome of one engine run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    /// Name of the rule that matched.
    pub rule: &'static str,
    pub recommendation: Recommendation,
}

/// Evaluates `observation` against the sail's rule table.
pub fn evaluate<S: Sail>(observation: &Observation<S::Telltales>) -> Evaluation {
    let situation = Situation::new(observation);
    let rule = S::table().select(&situation);
    let recommendation = (rule.respond)(&situation);
    log::debug!(
        "{} rule '{}' matched (band {})",
        S::NAME,
        rule.name,
        situation.band
    );
    Evaluation {
        rule: rule.name,
        recommendation,
    }
}

/// `"+2 (5 → 7)"`-style description of an aft move.
fn aft_move(from: CarPosition, to: CarPosition) -> String {
    format!("+{} ({from} → {to})", from.delta_to(to))
}

/// `"1 (5 → 4)"`-style description of a forward move.
fn forward_move(from: CarPosition, to: CarPosition) -> String {
    format!("{} ({from} → {to})", to.delta_to(from))
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::model::{BoatMode, JibTelltales, MainTelltales, SailMode, Symptom};

    fn assert_complete(rec: &Recommendation) {
        assert!(!rec.call.is_empty());
        assert!(!rec.why.is_empty());
        assert!(!rec.next.is_empty());
        assert!(!rec.if_then.is_empty());
    }

    fn jib_grid() -> Vec<Observation<JibTelltales>> {
        let mut grid = Vec::new();
        for &telltales in JibTelltales::ALL {
            for &symptom in Symptom::ALL {
                for &boat_mode in BoatMode::ALL {
                    for &sail_mode in SailMode::ALL {
                        for wind in [None, Some(5.0), Some(10.0), Some(20.0)] {
                            for car in [1.0, 12.0, 24.0] {
                                grid.push(Observation {
                                    sail_mode,
                                    wind_direction_true_deg: None,
                                    wind_speed_kt: wind,
                                    boat_mode,
                                    symptom,
                                    telltales,
                                    car_position: Some(CarPosition::clamped(car)),
                                });
                            }
                        }
                    }
                }
            }
        }
        grid
    }

    #[test]
    fn every_jib_rule_fills_every_field() {
        for observation in jib_grid() {
            let evaluation = evaluate::<Jib>(&observation);
            assert_complete(&evaluation.recommendation);
            assert!(evaluation.recommendation.car_suggested.is_some());
        }
    }

    #[test]
    fn every_main_rule_fills_every_field() {
        for &telltales in MainTelltales::ALL {
            for &symptom in Symptom::ALL {
                for &boat_mode in BoatMode::ALL {
                    for &sail_mode in SailMode::ALL {
                        for wind in [None, Some(5.0), Some(20.0)] {
                            let observation = Observation {
                                sail_mode,
                                wind_direction_true_deg: None,
                                wind_speed_kt: wind,
                                boat_mode,
                                symptom,
                                telltales,
                                car_position: None,
                            };
                            let evaluation = evaluate::<Mainsail>(&observation);
                            assert_complete(&evaluation.recommendation);
                            assert!(evaluation.recommendation.car_suggested.is_none());
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn evaluation_is_deterministic() {
        for observation in jib_grid() {
            let first = evaluate::<Jib>(&observation);
            let second = evaluate::<Jib>(&observation);
            assert_eq!(first, second);
        }
    }

    #[test]
    fn move_descriptions() {
        let five = CarPosition::clamped(5.0);
        assert_eq!(aft_move(five, CarPosition::clamped(7.0)), "+2 (5 → 7)");
        assert_eq!(forward_move(five, CarPosition::clamped(4.0)), "1 (5 → 4)");
    }
}

//! Course classification: is the boat sailing upwind, downwind, or reaching?

use crate::geometry::smallest_angle_between;
use crate::model::SailMode;

/// Relative wind angle at or below which the boat is sailing upwind.
pub const UPWIND_MAX_DEG: f64 = 70.0;

/// Relative wind angle at or above which the boat is sailing downwind.
pub const DOWNWIND_MIN_DEG: f64 = 110.0;

/// Result of classifying a course against the true wind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CourseClass {
    Upwind,
    Downwind,
    /// A reach: ambiguous, the caller keeps its previous sail mode.
    Reach,
}

impl CourseClass {
    /// The sail mode this class implies, if it is unambiguous.
    pub fn sail_mode(self) -> Option<SailMode> {
        match self {
            Self::Upwind => Some(SailMode::Upwind),
            Self::Downwind => Some(SailMode::Downwind),
            Self::Reach => None,
        }
    }
}

/// Classifies a course over ground against the direction the true wind blows from.
pub fn classify_sail_mode(course_over_ground_deg: f64, true_wind_from_deg: f64) -> CourseClass {
    let relative = smallest_angle_between(course_over_ground_deg, true_wind_from_deg);
    if relative <= UPWIND_MAX_DEG {
        CourseClass::Upwind
    } else if relative >= DOWNWIND_MIN_DEG {
        CourseClass::Downwind
    } else {
        CourseClass::Reach
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use proptest::prelude::*;

    #[test]
    fn boundaries_are_inclusive() {
        assert_eq!(classify_sail_mode(70.0, 0.0), CourseClass::Upwind);
        assert_eq!(classify_sail_mode(110.0, 0.0), CourseClass::Downwind);
        assert_eq!(classify_sail_mode(90.0, 0.0), CourseClass::Reach);
    }

    #[test]
    fn wraps_across_north() {
        // Wind from 350, heading 20: 30 degrees off the wind.
        assert_eq!(classify_sail_mode(20.0, 350.0), CourseClass::Upwind);
        // Wind from 10, heading 200: 170 degrees off.
        assert_eq!(classify_sail_mode(200.0, 10.0), CourseClass::Downwind);
    }

    #[test]
    fn reach_implies_no_mode() {
        assert_eq!(CourseClass::Reach.sail_mode(), None);
        assert_eq!(CourseClass::Upwind.sail_mode(), Some(SailMode::Upwind));
    }

    proptest! {
        #[test]
        fn prop_classifier_is_total_and_consistent(
            cog in -720.0f64..720.0,
            wind in -720.0f64..720.0,
        ) {
            let relative = smallest_angle_between(cog, wind);
            let class = classify_sail_mode(cog, wind);
            match class {
                CourseClass::Upwind => prop_assert!(relative <= UPWIND_MAX_DEG),
                CourseClass::Downwind => prop_assert!(relative >= DOWNWIND_MIN_DEG),
                CourseClass::Reach => {
                    prop_assert!(relative > UPWIND_MAX_DEG && relative < DOWNWIND_MIN_DEG);
                }
            }
        }
    }
}

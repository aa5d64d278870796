//! Headsail rule table.
//!
//! Order matters. Unreliable telltale reads come first so they can suppress
//! car moves, then clean telltale patterns, then downwind, then symptoms,
//! then the upwind boat mode.

use crate::model::{BoatMode, JibTelltales, Recommendation, SailMode, Symptom};
use crate::wind::WindBand;

use super::{Rule, RuleTable, Sail, Situation, aft_move, forward_move};

/// The headsail, trimmed with sheet and an adjustable car.
pub struct Jib;

impl Sail for Jib {
    type Telltales = JibTelltales;

    const PAGE: &'static str = "/trim/jib";
    const LOGIC_VERSION: &'static str = "jib_v1_2026-01-11";
    const NAME: &'static str = "jib";
    const HAS_CAR: bool = true;

    fn table() -> &'static RuleTable<JibTelltales> {
        &TABLE
    }
}

type JibSituation<'a> = Situation<'a, JibTelltales>;

static TABLE: RuleTable<JibTelltales> = RuleTable {
    rules: &[
        // Unreliable reads.
        Rule {
            name: "telltales_dead",
            applies: |s| s.observation.telltales == JibTelltales::DeadUnreliable,
            respond: telltales_dead,
        },
        Rule {
            name: "telltales_dirty_air",
            applies: |s| s.observation.telltales == JibTelltales::ErraticDirtyAir,
            respond: telltales_dirty_air,
        },
        Rule {
            name: "telltales_waves",
            applies: |s| s.observation.telltales == JibTelltales::ErraticWaves,
            respond: telltales_waves,
        },
        // Clean reads.
        Rule {
            name: "telltales_all_flowing",
            applies: |s| s.observation.telltales == JibTelltales::AllFlowing,
            respond: telltales_all_flowing,
        },
        Rule {
            name: "telltales_top_stalled",
            applies: |s| s.observation.telltales == JibTelltales::TopStalledBottomFlowing,
            respond: telltales_top_stalled,
        },
        Rule {
            name: "telltales_bottom_stalled",
            applies: |s| s.observation.telltales == JibTelltales::TopFlowingBottomStalled,
            respond: telltales_bottom_stalled,
        },
        Rule {
            name: "telltales_leeward_stalled",
            applies: |s| s.observation.telltales == JibTelltales::LeewardStalled,
            respond: telltales_leeward_stalled,
        },
        Rule {
            name: "telltales_windward_lifting",
            applies: |s| s.observation.telltales == JibTelltales::WindwardLifting,
            respond: telltales_windward_lifting,
        },
        Rule {
            name: "telltales_cycling",
            applies: |s| s.observation.telltales == JibTelltales::StreamingThenCollapsing,
            respond: telltales_cycling,
        },
        Rule {
            name: "downwind",
            applies: |s| s.observation.sail_mode == SailMode::Downwind,
            respond: downwind,
        },
        Rule {
            name: "symptom_bad_air",
            applies: |s| s.observation.symptom == Symptom::BadAir,
            respond: symptom_bad_air,
        },
        Rule {
            name: "symptom_slow",
            applies: |s| s.observation.symptom == Symptom::Slow,
            respond: symptom_slow,
        },
        Rule {
            name: "symptom_pinching",
            applies: |s| s.observation.symptom == Symptom::Pinching,
            respond: symptom_pinching,
        },
        Rule {
            name: "symptom_cant_hold_lane",
            applies: |s| s.observation.symptom == Symptom::CantHoldLane,
            respond: symptom_cant_hold_lane,
        },
        Rule {
            name: "symptom_overpowered",
            applies: |s| s.observation.symptom == Symptom::Overpowered,
            respond: symptom_overpowered,
        },
        Rule {
            name: "mode_speed",
            applies: |s| s.observation.boat_mode == BoatMode::Speed,
            respond: mode_speed,
        },
        Rule {
            name: "mode_pointing",
            applies: |s| s.observation.boat_mode == BoatMode::Pointing,
            respond: mode_pointing,
        },
    ],
    fallback: Rule {
        name: "mode_control",
        applies: |_| true,
        respond: mode_control,
    },
};

fn hold(s: &JibSituation<'_>, call: &str, why: &str, next: &str, if_then: &str) -> Recommendation {
    Recommendation::new(call, why, next, if_then).with_car(Some(s.car()))
}

fn telltales_dead(s: &JibSituation<'_>) -> Recommendation {
    hold(
        s,
        "Telltales look unreliable. Ignore them: build speed, watch helm load, and compare to a similar boat.",
        "If telltales are lying (wet, hidden, dead), chasing them creates random changes and bad data.",
        "Hold one setting 30-60 seconds. Make one change at a time.",
        "If still slow, ease sheet slightly OR confirm you're in clean air before moving the car.",
    )
}

fn telltales_dirty_air(s: &JibSituation<'_>) -> Recommendation {
    hold(
        s,
        "Dirty air: prioritize clean air first, then trim to the edge of stall.",
        "Dirty air makes telltales unreliable and speed inconsistent.",
        "Once clear, build speed first. Then press for pointing if needed.",
        "If you keep re-entering bad air, choose the next lane early rather than fighting for inches.",
    )
}

fn telltales_waves(s: &JibSituation<'_>) -> Recommendation {
    hold(
        s,
        "Chop: don't chase telltales. Keep a slightly eased sheet for groove and steer smoothly.",
        "In waves, telltale changes are often motion-driven, not trim-driven.",
        "Hold settings 30-60 seconds. Make one small change only if the pattern is consistent.",
        "If slow, ease a touch to keep flow, then consider a small car adjustment.",
    )
}

fn telltales_all_flowing(s: &JibSituation<'_>) -> Recommendation {
    hold(
        s,
        "All flowing: hold trim. Don't touch the car unless you have a clear symptom.",
        "Streaming telltales indicate attached flow.",
        "Use your objective: speed first, then pointing.",
        "If still slow, confirm clean air, then make a small sheet change before moving the car.",
    )
}

fn telltales_top_stalled(s: &JibSituation<'_>) -> Recommendation {
    let to = s.car_by(s.band.step_small());
    Recommendation::new(
        format!(
            "Top stalled, bottom flowing: move car aft {}.",
            aft_move(s.car(), to)
        ),
        "Top stalling first usually means you need more twist up high.",
        "After moving, re-check top telltales, then fine-tune with sheet.",
        "If bottom starts stalling, you moved too far aft; come forward 1.",
    )
    .with_car(Some(to))
}

fn telltales_bottom_stalled(s: &JibSituation<'_>) -> Recommendation {
    let to = s.car_by(-s.band.step_small());
    Recommendation::new(
        format!(
            "Top flowing, bottom stalled: move car forward {}.",
            forward_move(s.car(), to)
        ),
        "Bottom stalling can mean too much twist or an open leech down low.",
        "Trim sheet until inside telltales flow most of the time.",
        "If top stalls after the move, go back aft 1 and ease sheet slightly instead.",
    )
    .with_car(Some(to))
}

fn telltales_leeward_stalled(s: &JibSituation<'_>) -> Recommendation {
    let to = s.car_by(s.band.step_small());
    Recommendation::new(
        format!(
            "Leeward stalled: ease sheet slightly first. If still stalled, move car aft {}.",
            aft_move(s.car(), to)
        ),
        "Leeward stall usually means overtrim (or sailing too high for the trim).",
        "Make one change then hold 20-30 seconds.",
        "If easing makes you too low, head up slightly after flow returns; don't re-overtrim immediately.",
    )
    .with_car(Some(to))
}

fn telltales_windward_lifting(s: &JibSituation<'_>) -> Recommendation {
    let to = s.car_by(-1);
    Recommendation::new(
        format!(
            "Windward lifting: trim sheet slightly OR bear away a touch. If it feels too open, move car forward {}.",
            forward_move(s.car(), to)
        ),
        "Windward lift indicates under-trim (or you're sailing too low for your trim).",
        "Choose one change and confirm speed doesn't drop.",
        "If trimming stalls leeward quickly, widen groove (car aft) instead of more sheet.",
    )
    .with_car(Some(to))
}

fn telltales_cycling(s: &JibSituation<'_>) -> Recommendation {
    let to = s.car_by(1);
    Recommendation::new(
        format!(
            "Streaming then collapsing: ease sheet a touch to widen groove. If it keeps cycling, move car aft {}.",
            aft_move(s.car(), to)
        ),
        "In variable wind, a little more groove is faster than constant trimming.",
        "Hold through 2-3 cycles before changing again.",
        "If pointing drops too much, regain with steering and angle first, not by over-sheeting.",
    )
    .with_car(Some(to))
}

fn downwind(s: &JibSituation<'_>) -> Recommendation {
    hold(
        s,
        "Downwind jib: ease enough to keep it drawing through angle changes. Avoid overtrim and stall.",
        "Stability beats fiddling downwind.",
        "Make one small change then evaluate 20-30 seconds.",
        "If sticky, ease slightly. If collapsing, trim slightly and stabilize.",
    )
}

fn symptom_bad_air(s: &JibSituation<'_>) -> Recommendation {
    hold(
        s,
        "Bad air: prioritize clean air first. Then trim to the edge of stall.",
        "Dirty air makes feedback unreliable.",
        "After clearing, build speed before pressing.",
        "If you keep re-entering, choose a safer lane early.",
    )
}

fn symptom_slow(s: &JibSituation<'_>) -> Recommendation {
    let why = "Most slow moments are flow loss. Sheet fixes flow fastest.";
    let next = "Hold 30-60 seconds and compare to a similar boat.";
    let if_then = "If still slow, adjust halyard slightly or reduce sag with backstay if windy.";

    if s.band == WindBand::Heavy {
        let to = s.car_by(1);
        Recommendation::new(
            format!(
                "Slow: confirm clean air. Ease sheet slightly. In breeze, widen groove: move car aft {}.",
                aft_move(s.car(), to)
            ),
            why,
            next,
            if_then,
        )
        .with_car(Some(to))
    } else {
        hold(
            s,
            "Slow: confirm clean air. Ease sheet slightly. If still sticky, adjust car after sheet.",
            why,
            next,
            if_then,
        )
    }
}

fn symptom_pinching(s: &JibSituation<'_>) -> Recommendation {
    hold(
        s,
        "Pinching: ease sheet until flow returns, then sail slightly lower to rebuild speed.",
        "You can't point without flow and speed.",
        "Once fast, head up slowly to the edge of stall, then hold.",
        "If stall returns immediately, widen groove (car aft 1) before trying to point again.",
    )
}

fn symptom_cant_hold_lane(s: &JibSituation<'_>) -> Recommendation {
    hold(
        s,
        "Can't hold lane: foot slightly for speed and stability, then re-trim to keep flow.",
        "Lane-holding requires speed.",
        "Re-evaluate: do we have clean air for the next 30 seconds?",
        "If pinned, make one decisive move to clear air rather than small corrections while slow.",
    )
}

fn symptom_overpowered(s: &JibSituation<'_>) -> Recommendation {
    let step = if s.band == WindBand::Heavy {
        s.band.step_big()
    } else {
        s.band.step_small()
    };
    let to = s.car_by(step);
    Recommendation::new(
        format!(
            "Overpowered: move car aft {}, then add halyard tension.",
            aft_move(s.car(), to)
        ),
        "A flatter jib and wider groove reduce drag and helm load.",
        "Re-trim to the edge of stall and hold. Let the boat settle.",
        "If still overpowered, reduce sag with more backstay. If underpowered, come forward 1.",
    )
    .with_car(Some(to))
}

fn mode_speed(s: &JibSituation<'_>) -> Recommendation {
    hold(
        s,
        "Speed: keep inside telltales flowing most of the time. Sheet first, car second.",
        "Speed comes from attached flow and a wide groove.",
        "Trim to the edge of stall, then hold 30-60 seconds.",
        "If groove too narrow, move car aft 1. If too open, move forward 1.",
    )
}

fn mode_pointing(s: &JibSituation<'_>) -> Recommendation {
    hold(
        s,
        "Pointing: only press for angle once speed is stable. Never accept sustained stall.",
        "Pointing is the highest angle while maintaining flow.",
        "Fine-tune twist with small car moves, then re-check telltales.",
        "If speed drops, return to Speed mode (ease and rebuild) immediately.",
    )
}

fn mode_control(s: &JibSituation<'_>) -> Recommendation {
    hold(
        s,
        "Control: widen groove first. Favor steadier flow over max angle.",
        "Control is repeatable speed with predictable steering.",
        "Make one small change, then evaluate through a puff or wave set.",
        "If control improves but pointing drops, regain with angle and steering, not overtrim.",
    )
}

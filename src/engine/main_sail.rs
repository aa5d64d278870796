//! Mainsail rule table.
//!
//! Same priority shape as the jib: leech telltales, then downwind, then
//! symptoms, then boat mode. No car, so every rule leaves the car empty.

use crate::model::{BoatMode, MainTelltales, Recommendation, SailMode, Symptom};
use crate::wind::WindBand;

use super::{Rule, RuleTable, Sail, Situation};

/// The mainsail, trimmed with sheet, traveler, and the depowering controls.
pub struct Mainsail;

impl Sail for Mainsail {
    type Telltales = MainTelltales;

    const PAGE: &'static str = "/trim/main";
    const LOGIC_VERSION: &'static str = "main_v2_telltales";
    const NAME: &'static str = "main";
    const HAS_CAR: bool = false;

    fn table() -> &'static RuleTable<MainTelltales> {
        &TABLE
    }
}

type MainSituation<'a> = Situation<'a, MainTelltales>;

static TABLE: RuleTable<MainTelltales> = RuleTable {
    rules: &[
        Rule {
            name: "telltales_unreliable",
            applies: |s| s.observation.telltales == MainTelltales::Unreliable,
            respond: telltales_unreliable,
        },
        Rule {
            name: "telltales_balanced",
            applies: |s| s.observation.telltales == MainTelltales::Balanced,
            respond: telltales_balanced,
        },
        Rule {
            name: "telltales_too_closed",
            applies: |s| s.observation.telltales == MainTelltales::TooClosed,
            respond: telltales_too_closed,
        },
        Rule {
            name: "telltales_too_open",
            applies: |s| s.observation.telltales == MainTelltales::TooOpen,
            respond: telltales_too_open,
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
            name: "symptom_overpowered",
            applies: |s| s.observation.symptom == Symptom::Overpowered,
            respond: symptom_overpowered,
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
            name: "symptom_slow",
            applies: |s| s.observation.symptom == Symptom::Slow,
            respond: symptom_slow,
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

fn telltales_unreliable(_: &MainSituation<'_>) -> Recommendation {
    Recommendation::new(
        "Leech telltales look unreliable. Ignore them: steer for speed, keep the boat flat, and compare to a similar boat.",
        "Wet or wrapped leech telltales give random answers; chasing them adds noise to the log.",
        "Hold sheet and traveler 30-60 seconds. Make one change at a time.",
        "If still slow, confirm clean air before touching sheet or traveler.",
    )
}

fn telltales_balanced(_: &MainSituation<'_>) -> Recommendation {
    Recommendation::new(
        "Top telltale streaming most of the time: hold sheet and traveler.",
        "A top leech telltale that flies most of the time means twist is about right.",
        "Use your objective: speed first, then pointing with traveler up.",
        "If still slow, add a touch of depth (ease cunningham or outhaul) before trimming harder.",
    )
}

fn telltales_too_closed(_: &MainSituation<'_>) -> Recommendation {
    Recommendation::new(
        "Leech too closed: ease sheet slightly OR reduce leech tension (upwind: traveler and sheet balance).",
        "A hooked leech stalls the upper main and kills pointing and speed.",
        "Ease sheet a touch, then use traveler to recover height without re-hooking the leech.",
        "If easing sheet makes you too low, add a little traveler up instead of more sheet.",
    )
}

fn telltales_too_open(_: &MainSituation<'_>) -> Recommendation {
    Recommendation::new(
        "Leech too open: trim sheet slightly OR bring traveler up to add leech tension without over-sheeting.",
        "Too much twist can reduce pointing and make the main feel powerless.",
        "Trim sheet slightly, then fine-tune with traveler.",
        "If you start stalling up high, reverse the last change and prioritize flow (speed mode).",
    )
}

fn downwind(_: &MainSituation<'_>) -> Recommendation {
    Recommendation::new(
        "Downwind main: ease vang (mostly off), ease sheet for twist, and control with traveler if needed.",
        "Downwind you want an open leech and stable airflow. Vang on downwind can hook the leech and stall.",
        "Set vang light or off, ease sheet until the top opens, then stabilize with steering.",
        "If rolling or unstable, add a touch of vang only to stop boom bounce, without hooking the leech.",
    )
}

fn symptom_bad_air(_: &MainSituation<'_>) -> Recommendation {
    Recommendation::new(
        "Bad air: prioritize lane and clear air first, then reset main trim.",
        "Dirty air makes trim feedback unreliable.",
        "Once clear, build speed, then press for pointing.",
        "If pinned, make one decisive lane move rather than constant trim changes.",
    )
}

fn symptom_overpowered(_: &MainSituation<'_>) -> Recommendation {
    Recommendation::new(
        "Overpowered: depower main first. Flatten with outhaul and cunningham, add backstay, then drop the traveler.",
        "Flattening reduces heel and helm, and improves pointing and speed in breeze.",
        "Outhaul tight, cunningham on, backstay on, then traveler down enough to keep flow.",
        "If still loaded, ease sheet slightly to open the leech. If you lose too much height, bring traveler up a touch.",
    )
}

fn symptom_pinching(_: &MainSituation<'_>) -> Recommendation {
    Recommendation::new(
        "Pinching: open the leech slightly and rebuild speed. Traveler down a touch OR ease sheet slightly.",
        "Pinching often comes from too much leech tension or too narrow a groove.",
        "Ease sheet 1-2 inches OR drop traveler slightly, then steer for speed.",
        "If heel is the reason you're pinching, depower with outhaul, cunningham, and backstay first.",
    )
}

fn symptom_cant_hold_lane(_: &MainSituation<'_>) -> Recommendation {
    Recommendation::new(
        "Can't hold lane: prioritize speed and control. Ease sheet slightly, keep traveler in a stable range, and steer smoothly.",
        "Lane control requires speed and a forgiving groove.",
        "Open the leech slightly with sheet, keep the boat flat with traveler or backstay, then hold 30-60 seconds.",
        "If you're still getting rolled, shift lanes instead of fighting while slow.",
    )
}

fn symptom_slow(s: &MainSituation<'_>) -> Recommendation {
    let wind = if s.band == WindBand::Heavy {
        "heavy"
    } else {
        "up"
    };
    Recommendation::new(
        "Slow: build flow and power. Ease cunningham, ease outhaul slightly (if not windy), and trim sheet to the edge of stall.",
        "In lighter air, too flat means no power. You need depth and attached flow.",
        "Ease cunningham, ease outhaul a touch, then trim sheet until top telltales are just on the edge.",
        format!(
            "If wind is {wind} and you're still slow, check you're not over-depowered (traveler too low or too much backstay)."
        ),
    )
}

fn mode_speed(_: &MainSituation<'_>) -> Recommendation {
    Recommendation::new(
        "Speed: keep the main driving with attached flow. Use sheet for twist, traveler for angle.",
        "Sheet controls leech tension; traveler controls angle of attack.",
        "Trim to the edge of stall, keep the boat flat, then hold 30-60 seconds.",
        "If you're slow, add a touch of depth (ease cunningham or outhaul) before trimming harder.",
    )
}

fn mode_pointing(_: &MainSituation<'_>) -> Recommendation {
    Recommendation::new(
        "Pointing: only press once speed is stable. Traveler up first, then fine-tune with sheet.",
        "Traveler increases angle without immediately hooking the leech.",
        "Build speed, bring the traveler up slightly, then adjust sheet to keep the top flowing.",
        "If you stall, return to speed mode immediately (ease sheet or drop traveler slightly).",
    )
}

fn mode_control(_: &MainSituation<'_>) -> Recommendation {
    Recommendation::new(
        "Control: widen the groove and stabilize the boat. Keep the leech slightly open and avoid constant trimming.",
        "Control means repeatable speed through puffs and chop.",
        "Keep the boat flat with traveler or backstay as needed. Hold settings through one puff or wave set.",
        "If you're still unstable, depower with cunningham and outhaul before making large traveler moves.",
    )
}

//! Telltale vocabularies, one per sail.

use serde::{Deserialize, Serialize};

use super::Token;

/// What the jib telltales are doing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JibTelltales {
    #[default]
    Unknown,
    AllFlowing,
    LeewardStalled,
    WindwardLifting,
    TopStalledBottomFlowing,
    TopFlowingBottomStalled,
    ErraticWaves,
    ErraticDirtyAir,
    StreamingThenCollapsing,
    DeadUnreliable,
}

impl Token for JibTelltales {
    const ALL: &'static [Self] = &[
        Self::Unknown,
        Self::AllFlowing,
        Self::LeewardStalled,
        Self::WindwardLifting,
        Self::TopStalledBottomFlowing,
        Self::TopFlowingBottomStalled,
        Self::ErraticWaves,
        Self::ErraticDirtyAir,
        Self::StreamingThenCollapsing,
        Self::DeadUnreliable,
    ];

    fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::AllFlowing => "all_flowing",
            Self::LeewardStalled => "leeward_stalled",
            Self::WindwardLifting => "windward_lifting",
            Self::TopStalledBottomFlowing => "top_stalled_bottom_flowing",
            Self::TopFlowingBottomStalled => "top_flowing_bottom_stalled",
            Self::ErraticWaves => "erratic_waves",
            Self::ErraticDirtyAir => "erratic_dirty_air",
            Self::StreamingThenCollapsing => "streaming_then_collapsing",
            Self::DeadUnreliable => "dead_unreliable",
        }
    }
}

/// What the mainsail leech telltales say about twist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MainTelltales {
    #[default]
    Unknown,
    /// Wet, wrapped, or flicking with boat motion.
    Unreliable,
    /// Top leech telltale streaming most of the time.
    Balanced,
    /// Hooked leech: top telltale stalls behind the sail.
    TooClosed,
    /// Leech falling off: top telltale never stalls.
    TooOpen,
}

impl Token for MainTelltales {
    const ALL: &'static [Self] = &[
        Self::Unknown,
        Self::Unreliable,
        Self::Balanced,
        Self::TooClosed,
        Self::TooOpen,
    ];

    fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Unreliable => "unreliable",
            Self::Balanced => "balanced",
            Self::TooClosed => "too_closed",
            Self::TooOpen => "too_open",
        }
    }
}

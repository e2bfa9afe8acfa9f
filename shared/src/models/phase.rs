//! Roast phase models

use serde::{Deserialize, Serialize};

/// Roast phases in the only order a roast moves through them
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum RoastPhase {
    #[default]
    Drying,
    Maillard,
    Development,
    Cooling,
}

impl RoastPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoastPhase::Drying => "drying",
            RoastPhase::Maillard => "maillard",
            RoastPhase::Development => "development",
            RoastPhase::Cooling => "cooling",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "drying" => Some(RoastPhase::Drying),
            "maillard" => Some(RoastPhase::Maillard),
            "development" => Some(RoastPhase::Development),
            "cooling" => Some(RoastPhase::Cooling),
            _ => None,
        }
    }
}

impl std::fmt::Display for RoastPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoastPhase::Drying => write!(f, "Drying"),
            RoastPhase::Maillard => write!(f, "Maillard"),
            RoastPhase::Development => write!(f, "Development"),
            RoastPhase::Cooling => write!(f, "Cooling"),
        }
    }
}

/// Which milestones have been marked, independent of the current phase
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MilestonesMarked {
    pub dry_end: bool,
    pub first_crack: bool,
    pub second_crack: bool,
    pub cool: bool,
}

/// Phase state derived from an event list, recomputed wholesale on every change
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PhaseState {
    pub current_phase: RoastPhase,
    pub drying_time_s: u32,
    pub maillard_time_s: u32,
    pub development_time_s: u32,
    pub cooling_time_s: u32,
    pub milestones_marked: MilestonesMarked,
}

//! Roast event models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Kind of a roast event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventKind {
    /// Control change, optionally carrying a bean temperature reading
    Set,
    DryEnd,
    FirstCrack,
    SecondCrack,
    Cool,
    End,
}

impl EventKind {
    /// Milestone kinds, in roast order
    pub const MILESTONES: [EventKind; 5] = [
        EventKind::DryEnd,
        EventKind::FirstCrack,
        EventKind::SecondCrack,
        EventKind::Cool,
        EventKind::End,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Set => "SET",
            EventKind::DryEnd => "DRY_END",
            EventKind::FirstCrack => "FIRST_CRACK",
            EventKind::SecondCrack => "SECOND_CRACK",
            EventKind::Cool => "COOL",
            EventKind::End => "END",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "SET" => Some(EventKind::Set),
            "DRY_END" => Some(EventKind::DryEnd),
            "FIRST_CRACK" => Some(EventKind::FirstCrack),
            "SECOND_CRACK" => Some(EventKind::SecondCrack),
            "COOL" => Some(EventKind::Cool),
            "END" => Some(EventKind::End),
            _ => None,
        }
    }

    /// Every kind except `SET` is a once-per-roast milestone
    pub fn is_milestone(&self) -> bool {
        !matches!(self, EventKind::Set)
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventKind::Set => write!(f, "Set"),
            EventKind::DryEnd => write!(f, "Dry End"),
            EventKind::FirstCrack => write!(f, "First Crack"),
            EventKind::SecondCrack => write!(f, "Second Crack"),
            EventKind::Cool => write!(f, "Cool"),
            EventKind::End => write!(f, "End"),
        }
    }
}

/// An immutable fact about a roast, as returned by the event store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: Uuid,
    pub kind: EventKind,
    /// Seconds from roast start; the canonical temporal coordinate
    pub t_offset_sec: u32,
    /// Bean temperature in Fahrenheit. `0` means "unset".
    pub temp_f: Option<f64>,
    pub fan_level: Option<u8>,
    pub heat_level: Option<u8>,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Event {
    /// Temperature reading usable by computations.
    ///
    /// Zero is the "unset" sentinel and never counts as a reading.
    pub fn reading(&self) -> Option<f64> {
        self.temp_f.filter(|t| *t != 0.0 && t.is_finite())
    }
}

/// Input for appending an event; the event store assigns id, offset and timestamp
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct NewEvent {
    pub kind: Option<EventKind>,
    #[validate(range(max = 9))]
    pub fan_level: Option<u8>,
    #[validate(range(max = 9))]
    pub heat_level: Option<u8>,
    pub temp_f: Option<f64>,
    #[validate(length(max = 500))]
    pub note: Option<String>,
}

impl NewEvent {
    pub fn milestone(kind: EventKind) -> Self {
        Self {
            kind: Some(kind),
            ..Default::default()
        }
    }

    pub fn reading(temp_f: f64) -> Self {
        Self {
            kind: Some(EventKind::Set),
            temp_f: Some(temp_f),
            ..Default::default()
        }
    }

    /// Kind of the event to append; a bare control change is a `SET`
    pub fn resolved_kind(&self) -> EventKind {
        self.kind.unwrap_or(EventKind::Set)
    }

    /// Stamp the input into a stored event
    pub fn into_event(self, id: Uuid, t_offset_sec: u32, created_at: DateTime<Utc>) -> Event {
        Event {
            id,
            kind: self.resolved_kind(),
            t_offset_sec,
            temp_f: self.temp_f,
            fan_level: self.fan_level,
            heat_level: self.heat_level,
            note: self.note,
            created_at,
        }
    }
}

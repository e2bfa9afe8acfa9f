//! Milestone lookup over an unordered event list

use crate::models::{Event, EventKind, MilestonesMarked};

/// Offsets (seconds from start) of each milestone kind present in an event list.
///
/// When a kind appears more than once the earliest offset wins, so a
/// duplicated milestone leaves every derived value unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MilestoneOffsets {
    pub dry_end: Option<u32>,
    pub first_crack: Option<u32>,
    pub second_crack: Option<u32>,
    pub cool: Option<u32>,
    pub end: Option<u32>,
}

impl MilestoneOffsets {
    pub fn from_events(events: &[Event]) -> Self {
        let mut offsets = Self::default();
        for event in events {
            let Some(slot) = offsets.slot_mut(event.kind) else {
                continue;
            };
            *slot = Some(match *slot {
                Some(existing) => existing.min(event.t_offset_sec),
                None => event.t_offset_sec,
            });
        }
        offsets
    }

    pub fn offset(&self, kind: EventKind) -> Option<u32> {
        match kind {
            EventKind::Set => None,
            EventKind::DryEnd => self.dry_end,
            EventKind::FirstCrack => self.first_crack,
            EventKind::SecondCrack => self.second_crack,
            EventKind::Cool => self.cool,
            EventKind::End => self.end,
        }
    }

    pub fn marked(&self) -> MilestonesMarked {
        MilestonesMarked {
            dry_end: self.dry_end.is_some(),
            first_crack: self.first_crack.is_some(),
            second_crack: self.second_crack.is_some(),
            cool: self.cool.is_some(),
        }
    }

    fn slot_mut(&mut self, kind: EventKind) -> Option<&mut Option<u32>> {
        match kind {
            EventKind::Set => None,
            EventKind::DryEnd => Some(&mut self.dry_end),
            EventKind::FirstCrack => Some(&mut self.first_crack),
            EventKind::SecondCrack => Some(&mut self.second_crack),
            EventKind::Cool => Some(&mut self.cool),
            EventKind::End => Some(&mut self.end),
        }
    }
}

/// Bean temperature at a milestone.
///
/// Uses the milestone event's own reading when it carries one, otherwise the
/// latest `SET` reading at or before the milestone. Zero readings never count.
pub fn milestone_temperature(events: &[Event], kind: EventKind) -> Option<f64> {
    let milestone = events
        .iter()
        .filter(|e| e.kind == kind && kind.is_milestone())
        .min_by_key(|e| e.t_offset_sec)?;

    if let Some(temp) = milestone.reading() {
        return Some(temp);
    }

    events
        .iter()
        .filter(|e| e.kind == EventKind::Set && e.t_offset_sec <= milestone.t_offset_sec)
        .filter_map(|e| e.reading().map(|temp| (e.t_offset_sec, temp)))
        // Later offset wins; ties resolve to the later entry in the list
        .max_by_key(|(offset, _)| *offset)
        .map(|(_, temp)| temp)
}

//! Summary of a finished roast

use uuid::Uuid;

use crate::models::{
    calculate_dtr, calculate_weight_loss, Event, EventKind, RoastSummary, RoastWeights,
};

use super::milestones::{milestone_temperature, MilestoneOffsets};

/// Summarize a roast from its frozen milestones.
///
/// Total time runs to `END`, else `COOL`, else the latest event. Development
/// runs from first crack to `COOL` (or the total when the roast was never
/// cooled).
pub fn summarize_roast(
    roast_id: Uuid,
    events: &[Event],
    weights: Option<RoastWeights>,
) -> RoastSummary {
    let milestones = MilestoneOffsets::from_events(events);
    let last_offset = events.iter().map(|e| e.t_offset_sec).max().unwrap_or(0);
    let total = milestones.end.or(milestones.cool).unwrap_or(last_offset);
    let development_end = milestones.cool.unwrap_or(total);

    let (drying, maillard, development) = match (milestones.dry_end, milestones.first_crack) {
        (Some(dry_end), Some(first_crack)) => (
            dry_end,
            first_crack.saturating_sub(dry_end),
            development_end.saturating_sub(first_crack),
        ),
        (None, Some(first_crack)) => (first_crack, 0, development_end.saturating_sub(first_crack)),
        (Some(dry_end), None) => (dry_end, development_end.saturating_sub(dry_end), 0),
        (None, None) => (development_end, 0, 0),
    };

    RoastSummary {
        roast_id,
        total_time_s: total,
        drying_time_s: drying,
        maillard_time_s: maillard,
        development_time_s: development,
        dtr_percent: calculate_dtr(development, total),
        first_crack_temp_f: milestone_temperature(events, EventKind::FirstCrack),
        drop_temp_f: milestone_temperature(events, EventKind::Cool),
        weight_loss_percent: weights
            .map(|w| calculate_weight_loss(w.green_weight_g, w.roasted_weight_g)),
    }
}

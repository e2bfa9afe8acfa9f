//! Phase reconstruction from milestone events

use crate::models::{Event, PhaseState, RoastPhase};
use crate::types::{EpochMillis, EpochSeconds};

use super::milestones::MilestoneOffsets;

/// Longest development phase shown while first crack is the latest milestone
pub const MAX_DEVELOPMENT_SECS: i64 = 20 * 60;

/// Longest Maillard phase shown while dry end is the latest milestone
pub const MAX_MAILLARD_SECS: i64 = 30 * 60;

/// Derive the roast phase and per-phase durations from an event list.
///
/// The result depends only on the arguments: `start_ts` is the roast start in
/// epoch seconds, `now_ms` the current time in epoch milliseconds and
/// `paused_ms` the accumulated pause duration. While a session is paused the
/// caller passes the pause instant as `now_ms` (see [`PauseTracker::effective_now`]).
///
/// Which milestones exist decides the phase; durations are never estimated.
/// Events may be in any order and malformed events are taken as-is.
///
/// [`PauseTracker::effective_now`]: super::PauseTracker::effective_now
pub fn compute_phase_state(
    events: &[Event],
    start_ts: EpochSeconds,
    now_ms: EpochMillis,
    paused_ms: i64,
) -> PhaseState {
    let milestones = MilestoneOffsets::from_events(events);
    let start_ms = start_ts.saturating_mul(1000);
    let elapsed_ms = now_ms.saturating_sub(start_ms).saturating_sub(paused_ms);

    let mut state = PhaseState {
        milestones_marked: milestones.marked(),
        ..Default::default()
    };

    match (milestones.dry_end, milestones.first_crack, milestones.cool) {
        (dry_end, first_crack, Some(cool)) => {
            state.current_phase = RoastPhase::Cooling;
            match (dry_end, first_crack) {
                (Some(dry_end), Some(first_crack)) => {
                    state.drying_time_s = dry_end;
                    state.maillard_time_s = first_crack.saturating_sub(dry_end);
                    state.development_time_s = cool.saturating_sub(first_crack);
                }
                (None, Some(first_crack)) => {
                    state.drying_time_s = first_crack;
                    state.development_time_s = cool.saturating_sub(first_crack);
                }
                (Some(dry_end), None) => {
                    state.drying_time_s = dry_end;
                    state.maillard_time_s = cool.saturating_sub(dry_end);
                }
                (None, None) => {
                    state.drying_time_s = cool;
                }
            }
            let since_cool = elapsed_ms.div_euclid(1000) - i64::from(cool);
            state.cooling_time_s = clamp_secs(since_cool, i64::MAX);
        }
        (dry_end, Some(first_crack), None) => {
            state.current_phase = RoastPhase::Development;
            match dry_end {
                Some(dry_end) => {
                    state.drying_time_s = dry_end;
                    state.maillard_time_s = first_crack.saturating_sub(dry_end);
                }
                None => state.drying_time_s = first_crack,
            }
            let since_ms = elapsed_since(now_ms, start_ms, first_crack, paused_ms);
            state.development_time_s = clamp_secs(since_ms.div_euclid(1000), MAX_DEVELOPMENT_SECS);
        }
        (Some(dry_end), None, None) => {
            state.current_phase = RoastPhase::Maillard;
            state.drying_time_s = dry_end;
            let since_ms = elapsed_since(now_ms, start_ms, dry_end, paused_ms);
            state.maillard_time_s = clamp_secs(since_ms.div_euclid(1000), MAX_MAILLARD_SECS);
        }
        (None, None, None) => {
            state.current_phase = RoastPhase::Drying;
            state.drying_time_s = clamp_secs(elapsed_ms.max(0) / 1000, i64::MAX);
        }
    }

    state
}

/// Milliseconds from a milestone's absolute time to `now`, less paused time
fn elapsed_since(now_ms: EpochMillis, start_ms: EpochMillis, offset_sec: u32, paused_ms: i64) -> i64 {
    let milestone_ms = start_ms.saturating_add(i64::from(offset_sec) * 1000);
    now_ms.saturating_sub(milestone_ms).saturating_sub(paused_ms)
}

fn clamp_secs(secs: i64, max: i64) -> u32 {
    secs.clamp(0, max.min(i64::from(u32::MAX))) as u32
}

//! Memoization of derived roast data
//!
//! Phase state is keyed by the event list fingerprint, the roast start and the
//! pause-adjusted second being displayed; RoR is keyed by the fingerprint
//! alone. Keys are hashed from the events passed on every call, so a changed
//! list always misses; [`DerivedCache::invalidate`] just drops stale entries.

use sha2::{Digest, Sha256};
use shared::{EpochMillis, EpochSeconds, Event, PhaseState, RoRPoint};

/// SHA-256 over the content of an event list
pub type Fingerprint = [u8; 32];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PhaseKey {
    fingerprint: Fingerprint,
    start_ts: EpochSeconds,
    bucket: i64,
}

#[derive(Debug, Clone, Default)]
pub struct DerivedCache {
    phase: Option<(PhaseKey, PhaseState)>,
    ror: Option<(Fingerprint, Vec<RoRPoint>)>,
}

impl DerivedCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop everything derived from the current event list
    pub fn invalidate(&mut self) {
        *self = Self::default();
    }

    /// Phase state for the given inputs, computed only when the key changes
    pub fn phase_state(
        &mut self,
        events: &[Event],
        start_ts: EpochSeconds,
        now_ms: EpochMillis,
        paused_ms: i64,
        compute: impl FnOnce() -> PhaseState,
    ) -> PhaseState {
        let key = PhaseKey {
            fingerprint: fingerprint(events),
            start_ts,
            // Elapsed math floors (now - paused) to whole seconds, so this
            // bucket identifies the output exactly
            bucket: now_ms.saturating_sub(paused_ms).div_euclid(1000),
        };

        if let Some((cached_key, state)) = &self.phase {
            if *cached_key == key {
                return *state;
            }
        }

        let state = compute();
        self.phase = Some((key, state));
        state
    }

    /// RoR series for the current event list, computed once per fingerprint
    pub fn ror_series(
        &mut self,
        events: &[Event],
        compute: impl FnOnce() -> Vec<RoRPoint>,
    ) -> Vec<RoRPoint> {
        let key = fingerprint(events);
        if let Some((cached, series)) = &self.ror {
            if *cached == key {
                tracing::debug!("RoR cache hit");
                return series.clone();
            }
        }

        tracing::debug!("RoR cache miss, recomputing over {} events", events.len());
        let series = compute();
        self.ror = Some((key, series.clone()));
        series
    }
}

/// Fingerprint of an event list's full content, order included
pub fn fingerprint(events: &[Event]) -> Fingerprint {
    let mut hasher = Sha256::new();
    hasher.update((events.len() as u64).to_le_bytes());
    for event in events {
        hasher.update(event.id.as_bytes());
        hasher.update(event.kind.as_str().as_bytes());
        hasher.update(event.t_offset_sec.to_le_bytes());
        hash_option(&mut hasher, event.temp_f.map(|t| t.to_bits().to_le_bytes()));
        hash_option(&mut hasher, event.fan_level.map(|l| [l]));
        hash_option(&mut hasher, event.heat_level.map(|l| [l]));
        hash_option(&mut hasher, event.note.as_ref().map(|n| n.as_bytes()));
        hasher.update(event.created_at.timestamp_millis().to_le_bytes());
    }
    hasher.finalize().into()
}

fn hash_option(hasher: &mut Sha256, value: Option<impl AsRef<[u8]>>) {
    match value {
        Some(bytes) => {
            let bytes = bytes.as_ref();
            hasher.update([1u8]);
            hasher.update((bytes.len() as u64).to_le_bytes());
            hasher.update(bytes);
        }
        None => hasher.update([0u8]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use shared::{compute_phase_state, NewEvent};
    use uuid::Uuid;

    fn reading(temp: f64, offset: u32) -> Event {
        NewEvent::reading(temp).into_event(Uuid::new_v4(), offset, Utc::now())
    }

    #[test]
    fn test_fingerprint_tracks_content() {
        let a = reading(300.0, 60);
        let mut b = a.clone();
        assert_eq!(fingerprint(&[a.clone()]), fingerprint(&[b.clone()]));

        b.temp_f = Some(301.0);
        assert_ne!(fingerprint(&[a.clone()]), fingerprint(&[b]));

        let c = reading(310.0, 90);
        assert_ne!(
            fingerprint(&[a.clone(), c.clone()]),
            fingerprint(&[c, a])
        );
    }

    #[test]
    fn test_phase_cached_within_bucket() {
        let mut cache = DerivedCache::new();
        let events = vec![reading(300.0, 60)];
        let mut computed = 0;

        for now in [10_000, 10_400, 10_999] {
            cache.phase_state(&events, 0, now, 0, || {
                computed += 1;
                compute_phase_state(&events, 0, now, 0)
            });
        }
        assert_eq!(computed, 1);

        let state = cache.phase_state(&events, 0, 11_000, 0, || {
            computed += 1;
            compute_phase_state(&events, 0, 11_000, 0)
        });
        assert_eq!(computed, 2);
        assert_eq!(state.drying_time_s, 11);
    }

    #[test]
    fn test_invalidate_forces_recompute() {
        let mut cache = DerivedCache::new();
        let events = vec![reading(300.0, 60)];
        let mut computed = 0;

        cache.ror_series(&events, || {
            computed += 1;
            Vec::new()
        });
        cache.ror_series(&events, || {
            computed += 1;
            Vec::new()
        });
        assert_eq!(computed, 1);

        cache.invalidate();
        cache.ror_series(&events, || {
            computed += 1;
            Vec::new()
        });
        assert_eq!(computed, 2);
    }

    #[test]
    fn test_changed_events_miss_without_invalidate() {
        let mut cache = DerivedCache::new();
        let first = vec![reading(300.0, 60)];
        let second = vec![reading(300.0, 60), reading(320.0, 90)];

        let ror = cache.ror_series(&first, || vec![RoRPoint { time_min: 1.0, ror: 0.0 }]);
        assert_eq!(ror.len(), 1);
        let ror = cache.ror_series(&second, || {
            vec![
                RoRPoint { time_min: 1.0, ror: 0.0 },
                RoRPoint { time_min: 1.5, ror: 12.0 },
            ]
        });
        assert_eq!(ror.len(), 2);

        let dry_end = NewEvent::milestone(shared::EventKind::DryEnd)
            .into_event(Uuid::new_v4(), 5, Utc::now());
        let before = cache.phase_state(&first, 0, 10_000, 0, || {
            compute_phase_state(&first, 0, 10_000, 0)
        });
        let milestoned = vec![dry_end];
        let after = cache.phase_state(&milestoned, 0, 10_000, 0, || {
            compute_phase_state(&milestoned, 0, 10_000, 0)
        });
        assert_eq!(before.current_phase, shared::RoastPhase::Drying);
        assert_eq!(after.current_phase, shared::RoastPhase::Maillard);
    }
}

//! Session controller for one active roast
//!
//! Owns everything the engine needs for a roast (event list, start time,
//! pause accounting, last reported phase) and hands it to the pure engine
//! functions on every call. Assumes a single writer per roast.

use shared::{
    compute_phase_state, compute_ror_bounded, summarize_roast, temperature_samples, EpochMillis,
    EpochSeconds, Event, NewEvent, PauseTracker, PhaseState, RoRPoint, RoastPhase, RoastSession,
    RoastSummary, RoastWeights, RorBounds, SessionStatus, TemperatureSample,
};
use uuid::Uuid;

use crate::error::{SessionError, SessionResult};

use super::cache::DerivedCache;
use super::event_log::EventLog;

/// Controller settings taken from configuration
#[derive(Debug, Clone, Copy)]
pub struct SessionSettings {
    pub ror_bounds: RorBounds,
    /// Elapsed seconds past which a resumed, unfinished roast is flagged
    pub resume_warning_secs: i64,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            ror_bounds: RorBounds::default(),
            resume_warning_secs: 7200,
        }
    }
}

#[derive(Debug)]
pub struct RoastSessionController {
    roast_id: Uuid,
    start_ts: EpochSeconds,
    log: EventLog,
    pause: PauseTracker,
    current_phase: RoastPhase,
    status: SessionStatus,
    cache: DerivedCache,
    settings: SessionSettings,
}

impl RoastSessionController {
    /// Begin a new roast whose start time was assigned by the roast store
    pub fn start(roast_id: Uuid, start_ts: EpochSeconds, settings: SessionSettings) -> Self {
        tracing::info!("Roast {} started at {}", roast_id, start_ts);
        Self {
            roast_id,
            start_ts,
            log: EventLog::new(),
            pause: PauseTracker::new(),
            current_phase: RoastPhase::Drying,
            status: SessionStatus::Active,
            cache: DerivedCache::new(),
            settings,
        }
    }

    /// Rebuild a session after a reload from its fetched event list.
    ///
    /// `paused_ms` is the pause time already accumulated before the reload;
    /// the clock itself resumes running. A long-running roast without a
    /// terminal event is only flagged; what to do about it is the caller's
    /// decision.
    pub fn resume_from(
        roast_id: Uuid,
        start_ts: EpochSeconds,
        events: Vec<Event>,
        paused_ms: i64,
        now_ms: EpochMillis,
        settings: SessionSettings,
    ) -> Self {
        let mut controller = Self {
            roast_id,
            start_ts,
            log: EventLog::from_events(events),
            pause: PauseTracker::with_paused_ms(paused_ms),
            current_phase: RoastPhase::Drying,
            status: SessionStatus::Active,
            cache: DerivedCache::new(),
            settings,
        };

        let state = controller.compute(now_ms);
        controller.current_phase = state.current_phase;

        let elapsed_secs = now_ms.saturating_sub(start_ts.saturating_mul(1000)) / 1000;
        if !state.milestones_marked.cool && elapsed_secs > settings.resume_warning_secs {
            tracing::warn!(
                "Roast {} resumed {}s after start without a cool event",
                roast_id,
                elapsed_secs
            );
        }
        tracing::info!(
            "Roast {} resumed in {} with {} events",
            roast_id,
            state.current_phase,
            controller.log.len()
        );

        controller
    }

    pub fn roast_id(&self) -> Uuid {
        self.roast_id
    }

    pub fn start_ts(&self) -> EpochSeconds {
        self.start_ts
    }

    /// Events in insertion order
    pub fn events(&self) -> &[Event] {
        self.log.events()
    }

    pub fn current_phase(&self) -> RoastPhase {
        self.current_phase
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn is_paused(&self) -> bool {
        self.pause.is_paused()
    }

    pub fn snapshot(&self) -> RoastSession {
        RoastSession {
            roast_id: self.roast_id,
            start_ts: self.start_ts,
            paused_ms: self.pause.paused_ms(),
            pause_started_at: self.pause.pause_started_at(),
            current_phase: self.current_phase,
            status: self.status,
        }
    }

    // ========================================================================
    // Event Mutations
    // ========================================================================

    /// Append an event stamped at `now_ms`
    pub fn append_event(&mut self, input: NewEvent, now_ms: EpochMillis) -> SessionResult<Event> {
        self.ensure_active()?;
        let event = self.log.append(input, self.start_ts, now_ms)?.clone();
        self.cache.invalidate();
        tracing::debug!(
            "Roast {} logged {} at {}s",
            self.roast_id,
            event.kind,
            event.t_offset_sec
        );
        Ok(event)
    }

    pub fn edit_event(
        &mut self,
        id: Uuid,
        input: NewEvent,
        t_offset_sec: Option<u32>,
    ) -> SessionResult<Event> {
        self.ensure_active()?;
        let event = self.log.edit(id, input, t_offset_sec)?.clone();
        self.cache.invalidate();
        Ok(event)
    }

    pub fn delete_event(&mut self, id: Uuid) -> SessionResult<Event> {
        self.ensure_active()?;
        let event = self.log.delete(id)?;
        self.cache.invalidate();
        Ok(event)
    }

    // ========================================================================
    // Pause / Resume
    // ========================================================================

    pub fn pause(&mut self, now_ms: EpochMillis) {
        if !self.pause.is_paused() {
            tracing::info!("Roast {} paused", self.roast_id);
        }
        self.pause = self.pause.pause(now_ms);
    }

    pub fn resume(&mut self, now_ms: EpochMillis) {
        if self.pause.is_paused() {
            self.pause = self.pause.resume(now_ms);
            tracing::info!(
                "Roast {} resumed, {}ms paused in total",
                self.roast_id,
                self.pause.paused_ms()
            );
        }
    }

    // ========================================================================
    // Derived State
    // ========================================================================

    /// Phase state at `now_ms`, recorded as the session's current phase.
    ///
    /// Phase changes are logged; the engine guarantees they only move forward
    /// while events are only appended.
    pub fn phase_state(&mut self, now_ms: EpochMillis) -> PhaseState {
        let state = self.compute(now_ms);
        if state.current_phase != self.current_phase {
            tracing::info!(
                "Roast {} moved from {} to {}",
                self.roast_id,
                self.current_phase,
                state.current_phase
            );
            self.current_phase = state.current_phase;
        }
        state
    }

    /// Temperature samples in time order, zero readings excluded
    pub fn temperature_samples(&self) -> Vec<TemperatureSample> {
        temperature_samples(self.log.events())
    }

    /// RoR over the whole sample series, cached until the events change
    pub fn ror_series(&mut self) -> Vec<RoRPoint> {
        let bounds = self.settings.ror_bounds;
        let events = self.log.events();
        self.cache.ror_series(events, || {
            compute_ror_bounded(&temperature_samples(events), bounds)
        })
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Close the roast once its weight is recorded
    pub fn finalize(&mut self, weights: Option<RoastWeights>) -> SessionResult<RoastSummary> {
        self.ensure_active()?;
        self.status = SessionStatus::Finalized;
        let summary = summarize_roast(self.roast_id, self.log.events(), weights);
        tracing::info!(
            "Roast {} finalized: {}s total, DTR {}%",
            self.roast_id,
            summary.total_time_s,
            summary.dtr_percent.round_dp(1)
        );
        Ok(summary)
    }

    pub fn mark_deleted(&mut self) {
        self.status = SessionStatus::Deleted;
        self.cache.invalidate();
        tracing::info!("Roast {} deleted", self.roast_id);
    }

    fn compute(&mut self, now_ms: EpochMillis) -> PhaseState {
        let now = self.pause.effective_now(now_ms);
        let paused_ms = self.pause.paused_ms();
        let start_ts = self.start_ts;
        let events = self.log.events();
        self.cache.phase_state(events, start_ts, now, paused_ms, || {
            compute_phase_state(events, start_ts, now, paused_ms)
        })
    }

    fn ensure_active(&self) -> SessionResult<()> {
        match self.status {
            SessionStatus::Active => Ok(()),
            status => Err(SessionError::SessionClosed {
                roast_id: self.roast_id,
                status: status.as_str(),
            }),
        }
    }
}

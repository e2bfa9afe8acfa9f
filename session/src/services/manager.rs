//! Live session management
//!
//! Holds the single active roast session, drives it with the live ticker and
//! publishes every recomputed phase state on a watch channel. Mutations
//! publish immediately instead of waiting for the next tick.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use shared::{EpochSeconds, Event, NewEvent, PhaseState, RoRPoint, RoastSummary, RoastWeights};
use tokio::sync::watch;
use uuid::Uuid;

use crate::config::TimelineConfig;
use crate::error::{SessionError, SessionResult};

use super::clock::Clock;
use super::controller::{RoastSessionController, SessionSettings};
use super::ticker::TickerRegistry;

struct LiveSession {
    roast_id: Uuid,
    controller: Arc<Mutex<RoastSessionController>>,
    phase_tx: Arc<watch::Sender<PhaseState>>,
}

pub struct SessionManager {
    clock: Arc<dyn Clock>,
    settings: SessionSettings,
    tickers: TickerRegistry,
    live: Option<LiveSession>,
}

impl SessionManager {
    pub fn new(clock: Arc<dyn Clock>, settings: SessionSettings, tick_period: Duration) -> Self {
        Self {
            clock,
            settings,
            tickers: TickerRegistry::new(tick_period),
            live: None,
        }
    }

    pub fn from_config(clock: Arc<dyn Clock>, config: &TimelineConfig) -> Self {
        let settings = SessionSettings {
            ror_bounds: config.ror_bounds(),
            resume_warning_secs: config.session.resume_warning_secs,
        };
        Self::new(clock, settings, config.tick_period())
    }

    /// Start a new roast and its ticker
    pub fn begin(&mut self, roast_id: Uuid, start_ts: EpochSeconds) -> watch::Receiver<PhaseState> {
        let controller = RoastSessionController::start(roast_id, start_ts, self.settings);
        self.activate(controller)
    }

    /// Reopen a roast from its fetched events after a reload
    pub fn resume(
        &mut self,
        roast_id: Uuid,
        start_ts: EpochSeconds,
        events: Vec<Event>,
        paused_ms: i64,
    ) -> watch::Receiver<PhaseState> {
        let controller = RoastSessionController::resume_from(
            roast_id,
            start_ts,
            events,
            paused_ms,
            self.clock.now_ms(),
            self.settings,
        );
        self.activate(controller)
    }

    pub fn active_roast(&self) -> Option<Uuid> {
        self.live.as_ref().map(|live| live.roast_id)
    }

    pub fn ticker_running(&self, roast_id: Uuid) -> bool {
        self.tickers.is_running(roast_id)
    }

    pub fn active_tickers(&self) -> usize {
        self.tickers.active_count()
    }

    pub fn subscribe(&self) -> SessionResult<watch::Receiver<PhaseState>> {
        Ok(self.live()?.phase_tx.subscribe())
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    pub fn append_event(&self, input: NewEvent) -> SessionResult<Event> {
        let now = self.clock.now_ms();
        self.mutate(|controller| controller.append_event(input, now))
    }

    pub fn edit_event(
        &self,
        id: Uuid,
        input: NewEvent,
        t_offset_sec: Option<u32>,
    ) -> SessionResult<Event> {
        self.mutate(|controller| controller.edit_event(id, input, t_offset_sec))
    }

    pub fn delete_event(&self, id: Uuid) -> SessionResult<Event> {
        self.mutate(|controller| controller.delete_event(id))
    }

    pub fn pause(&self) -> SessionResult<()> {
        let now = self.clock.now_ms();
        self.mutate(|controller| {
            controller.pause(now);
            Ok(())
        })
    }

    pub fn resume_clock(&self) -> SessionResult<()> {
        let now = self.clock.now_ms();
        self.mutate(|controller| {
            controller.resume(now);
            Ok(())
        })
    }

    // ========================================================================
    // Derived State
    // ========================================================================

    pub fn phase_state(&self) -> SessionResult<PhaseState> {
        let live = self.live()?;
        Ok(lock(&live.controller).phase_state(self.clock.now_ms()))
    }

    pub fn ror_series(&self) -> SessionResult<Vec<RoRPoint>> {
        let live = self.live()?;
        Ok(lock(&live.controller).ror_series())
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Finalize the active roast, stopping its ticker
    pub fn finalize(&mut self, weights: Option<RoastWeights>) -> SessionResult<RoastSummary> {
        let live = self.live()?;
        let summary = lock(&live.controller).finalize(weights)?;
        self.close();
        Ok(summary)
    }

    /// Delete the active roast, stopping its ticker
    pub fn delete(&mut self) -> SessionResult<Uuid> {
        let live = self.live()?;
        let roast_id = live.roast_id;
        lock(&live.controller).mark_deleted();
        self.close();
        Ok(roast_id)
    }

    /// Stop every ticker and forget the active session
    pub fn shutdown(&mut self) {
        self.tickers.cancel_all();
        self.live = None;
        tracing::info!("Session manager shut down");
    }

    fn activate(&mut self, controller: RoastSessionController) -> watch::Receiver<PhaseState> {
        if let Some(previous) = self.live.take() {
            tracing::info!("Ending session for roast {}", previous.roast_id);
            self.tickers.cancel(previous.roast_id);
        }

        let roast_id = controller.roast_id();
        let controller = Arc::new(Mutex::new(controller));
        let initial = lock(&controller).phase_state(self.clock.now_ms());
        let (phase_tx, phase_rx) = watch::channel(initial);
        let phase_tx = Arc::new(phase_tx);

        let tick_controller = Arc::clone(&controller);
        let tick_tx = Arc::clone(&phase_tx);
        let clock = Arc::clone(&self.clock);
        self.tickers.start(roast_id, move || {
            let state = lock(&tick_controller).phase_state(clock.now_ms());
            tracing::trace!("Tick for roast {}: {:?}", roast_id, state.current_phase);
            tick_tx.send_replace(state);
        });

        self.live = Some(LiveSession {
            roast_id,
            controller,
            phase_tx,
        });
        phase_rx
    }

    fn close(&mut self) {
        if let Some(live) = self.live.take() {
            self.tickers.cancel(live.roast_id);
        }
    }

    fn mutate<R>(
        &self,
        f: impl FnOnce(&mut RoastSessionController) -> SessionResult<R>,
    ) -> SessionResult<R> {
        let live = self.live()?;
        let mut controller = lock(&live.controller);
        let result = f(&mut *controller)?;
        let state = controller.phase_state(self.clock.now_ms());
        live.phase_tx.send_replace(state);
        Ok(result)
    }

    fn live(&self) -> SessionResult<&LiveSession> {
        self.live.as_ref().ok_or(SessionError::NoActiveSession)
    }
}

fn lock(controller: &Mutex<RoastSessionController>) -> MutexGuard<'_, RoastSessionController> {
    controller.lock().unwrap_or_else(PoisonError::into_inner)
}

//! Offline replay of a recorded roast
//!
//! A replay file holds a roast's start time and its full event list, as the
//! event store returns them:
//!
//! ```json
//! { "roast_id": "…", "start_ts": 1700000000, "events": [ … ] }
//! ```

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use shared::{
    compute_phase_state, compute_ror_bounded, resample_bounded, summarize_roast,
    temperature_samples, EpochMillis, EpochSeconds, Event, GridRow, PhaseState, RoRPoint,
    RoastSeries, RoastSummary, RoastWeights, TemperatureSample, TemperatureUnit,
};
use uuid::Uuid;

use crate::config::TimelineConfig;
use crate::error::SessionResult;
use crate::services::{ManualClock, SessionManager};

#[derive(Debug, Clone, Deserialize)]
pub struct ReplayFile {
    pub roast_id: Uuid,
    pub start_ts: EpochSeconds,
    #[serde(default)]
    pub paused_ms: i64,
    pub events: Vec<Event>,
    #[serde(default)]
    pub weights: Option<RoastWeights>,
    /// Wall clock to evaluate the phase state at
    #[serde(default)]
    pub now_ms: Option<EpochMillis>,
}

impl ReplayFile {
    /// `now_ms` from the file, else the moment of the last recorded event
    pub fn evaluation_time(&self) -> EpochMillis {
        self.now_ms.unwrap_or_else(|| {
            let last = self.events.iter().map(|e| e.t_offset_sec).max().unwrap_or(0);
            self.start_ts
                .saturating_mul(1000)
                .saturating_add(i64::from(last) * 1000)
                .saturating_add(self.paused_ms)
        })
    }
}

/// Everything derived from one replay file, in the display unit
#[derive(Debug, Clone, Serialize)]
pub struct ReplayReport {
    pub roast_id: Uuid,
    pub unit: TemperatureUnit,
    pub phase: PhaseState,
    pub samples: Vec<TemperatureSample>,
    pub ror: Vec<RoRPoint>,
    pub summary: RoastSummary,
}

pub fn load_replay(path: impl AsRef<Path>) -> SessionResult<ReplayFile> {
    let path = path.as_ref();
    tracing::debug!("Reading replay file {}", path.display());
    let raw = std::fs::read_to_string(path)?;
    let file: ReplayFile = serde_json::from_str(&raw)?;
    tracing::info!(
        "Loaded roast {} with {} events from {}",
        file.roast_id,
        file.events.len(),
        path.display()
    );
    Ok(file)
}

/// Derive the phase state, RoR series and summary of a replayed roast.
///
/// RoR runs on Fahrenheit samples with the configured bounds and is converted
/// afterwards, same as the samples.
pub fn build_report(file: &ReplayFile, config: &TimelineConfig, now_ms: EpochMillis) -> ReplayReport {
    let unit = config.display.unit;
    let phase = compute_phase_state(&file.events, file.start_ts, now_ms, file.paused_ms);
    let samples_f = temperature_samples(&file.events);
    let ror = compute_ror_bounded(&samples_f, config.ror_bounds())
        .into_iter()
        .map(|p| RoRPoint {
            time_min: p.time_min,
            ror: unit.convert_rate(p.ror),
        })
        .collect();
    let samples = samples_f
        .into_iter()
        .map(|s| TemperatureSample::new(s.time_min, unit.convert_temp(s.temp)))
        .collect();

    ReplayReport {
        roast_id: file.roast_id,
        unit,
        phase,
        samples,
        ror,
        summary: summarize_roast(file.roast_id, &file.events, file.weights),
    }
}

/// Comparison grid over several replayed roasts, in the display unit
pub fn compare(files: &[ReplayFile], config: &TimelineConfig) -> Vec<GridRow> {
    let unit = config.display.unit;
    let roasts: Vec<RoastSeries> = files
        .iter()
        .map(|f| RoastSeries::from_events(f.roast_id, &f.events))
        .collect();
    let mut grid = resample_bounded(&roasts, config.comparison.max_points, config.ror_bounds());
    for row in &mut grid {
        for temp in row.temps.values_mut().flatten() {
            *temp = unit.convert_temp(*temp);
        }
        for rate in row.ror.values_mut().flatten() {
            *rate = unit.convert_rate(*rate);
        }
    }
    grid
}

/// Run a replayed roast through the live session runtime.
///
/// The roast is resumed at `clock`'s current time and the clock is advanced
/// by one tick period after every published state, so the states move
/// forward as they would in a live session. Returns the states received.
pub async fn run_live(
    file: ReplayFile,
    config: &TimelineConfig,
    clock: Arc<ManualClock>,
    ticks: u32,
) -> Vec<PhaseState> {
    let step_ms = i64::try_from(config.tick_period().as_millis()).unwrap_or(i64::MAX);
    let mut manager = SessionManager::from_config(clock.clone(), config);
    let mut updates = manager.resume(file.roast_id, file.start_ts, file.events, file.paused_ms);

    let mut states = Vec::with_capacity(ticks as usize);
    for tick in 1..=ticks {
        if updates.changed().await.is_err() {
            tracing::warn!("Ticker for roast {} stopped early", file.roast_id);
            break;
        }
        let state = *updates.borrow_and_update();
        tracing::info!(
            "Tick {}/{}: {} (drying {}s, maillard {}s, development {}s, cooling {}s)",
            tick,
            ticks,
            state.current_phase,
            state.drying_time_s,
            state.maillard_time_s,
            state.development_time_s,
            state.cooling_time_s
        );
        states.push(state);
        clock.advance_ms(step_ms);
    }

    manager.shutdown();
    states
}

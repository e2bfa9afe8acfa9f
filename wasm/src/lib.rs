//! WebAssembly module for the roast timeline engine
//!
//! Provides client-side computation for:
//! - Phase reconstruction from a roast's event list
//! - Rate of Rise over temperature samples
//! - Multi-roast comparison grids
//! - Temperature unit conversion
//!
//! Inputs and outputs are JSON strings shaped like the `shared` models.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use shared::{
    compute_phase_state, compute_ror, resample, temperature_samples, EpochMillis, Event,
    PhaseState, RoRPoint, RoastSeries, TemperatureSample, TemperatureUnit,
};

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {}

/// Phase state of a roast at `now_ms`
#[wasm_bindgen]
pub fn compute_phase_state_json(
    events_json: &str,
    start_ts: f64,
    now_ms: f64,
    paused_ms: f64,
) -> Result<String, JsValue> {
    phase_state_from_json(events_json, start_ts as i64, now_ms as EpochMillis, paused_ms as i64)
        .map_err(|e| js_error("events", e))
}

/// Phase state of a roast at the browser's current time
#[wasm_bindgen]
pub fn compute_phase_state_now_json(
    events_json: &str,
    start_ts: f64,
    paused_ms: f64,
) -> Result<String, JsValue> {
    compute_phase_state_json(events_json, start_ts, js_sys::Date::now(), paused_ms)
}

/// Rate of Rise in °F/min for time-ordered samples
#[wasm_bindgen]
pub fn compute_ror_json(samples_json: &str) -> Result<String, JsValue> {
    ror_from_json(samples_json).map_err(|e| js_error("samples", e))
}

/// Comparison grid for several roasts
#[wasm_bindgen]
pub fn resample_json(roasts_json: &str, max_points: usize) -> Result<String, JsValue> {
    grid_from_json(roasts_json, max_points).map_err(|e| js_error("roasts", e))
}

/// Temperature samples extracted from a roast's event list
#[wasm_bindgen]
pub fn samples_from_events_json(events_json: &str) -> Result<String, JsValue> {
    samples_from_json(events_json).map_err(|e| js_error("events", e))
}

/// Convert a Fahrenheit temperature to `unit` ("f" / "c"); unknown units stay Fahrenheit
#[wasm_bindgen]
pub fn convert_temperature(temp_f: f64, unit: &str) -> f64 {
    TemperatureUnit::from_str(unit)
        .unwrap_or_default()
        .convert_temp(temp_f)
}

/// Convert a Fahrenheit rate to `unit`
#[wasm_bindgen]
pub fn convert_rate(rate_f: f64, unit: &str) -> f64 {
    TemperatureUnit::from_str(unit)
        .unwrap_or_default()
        .convert_rate(rate_f)
}

fn phase_state_from_json(
    events_json: &str,
    start_ts: i64,
    now_ms: EpochMillis,
    paused_ms: i64,
) -> serde_json::Result<String> {
    let events: Vec<Event> = serde_json::from_str(events_json)?;
    let state: PhaseState = compute_phase_state(&events, start_ts, now_ms, paused_ms);
    to_json(&state)
}

fn ror_from_json(samples_json: &str) -> serde_json::Result<String> {
    let samples: Vec<TemperatureSample> = serde_json::from_str(samples_json)?;
    let ror: Vec<RoRPoint> = compute_ror(&samples);
    to_json(&ror)
}

fn grid_from_json(roasts_json: &str, max_points: usize) -> serde_json::Result<String> {
    let roasts: Vec<RoastSeries> = serde_json::from_str(roasts_json)?;
    to_json(&resample(&roasts, max_points))
}

fn samples_from_json(events_json: &str) -> serde_json::Result<String> {
    let events: Vec<Event> = serde_json::from_str(events_json)?;
    to_json(&temperature_samples(&events))
}

fn to_json<T: Serialize>(value: &T) -> serde_json::Result<String> {
    serde_json::to_string(value)
}

fn js_error(input: &str, err: serde_json::Error) -> JsValue {
    let message = format!("Invalid {} JSON: {}", input, err);
    web_sys::console::error_1(&JsValue::from_str(&message));
    JsValue::from_str(&message)
}

//! Temperature sample extraction

use crate::models::{Event, EventKind, TemperatureSample};

/// Temperature samples from the `SET` events of a roast, ordered by offset.
///
/// Event lists arrive in insertion order, so the result is sorted here. Events
/// without a usable reading (missing, zero or non-finite) are skipped.
pub fn temperature_samples(events: &[Event]) -> Vec<TemperatureSample> {
    let mut readings: Vec<(u32, f64)> = events
        .iter()
        .filter(|e| e.kind == EventKind::Set)
        .filter_map(|e| e.reading().map(|temp| (e.t_offset_sec, temp)))
        .collect();
    readings.sort_by_key(|(offset, _)| *offset);

    readings
        .into_iter()
        .map(|(offset, temp)| TemperatureSample::new(f64::from(offset) / 60.0, temp))
        .collect()
}

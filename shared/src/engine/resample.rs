//! Common time grid for comparing several roasts

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Event, EventKind, RoRPoint, RorBounds, TemperatureSample};

use super::milestones::MilestoneOffsets;
use super::ror::{compute_ror_bounded, truncate_at_cool, usable_samples};
use super::samples::temperature_samples;

/// Finest grid step, in minutes
pub const MIN_GRID_INTERVAL_MIN: f64 = 0.5;

/// One roast's input to a comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoastSeries {
    pub id: Uuid,
    /// Temperature samples; unordered or zero readings are tidied before use
    pub samples: Vec<TemperatureSample>,
    /// Minute of the roast's `COOL` event, if it has one
    pub cool_offset_min: Option<f64>,
}

impl RoastSeries {
    /// Build a series from a roast's raw event list
    pub fn from_events(id: Uuid, events: &[Event]) -> Self {
        let cool = MilestoneOffsets::from_events(events).offset(EventKind::Cool);
        Self {
            id,
            samples: temperature_samples(events),
            cool_offset_min: cool.map(|secs| f64::from(secs) / 60.0),
        }
    }

    /// Samples that take part in a comparison, in time order and nothing past `COOL`
    pub fn comparison_samples(&self) -> Vec<TemperatureSample> {
        let usable = usable_samples(&self.samples);
        truncate_at_cool(&usable, self.cool_offset_min).to_vec()
    }

    /// Last minute this roast contributes to the grid span
    fn horizon(&self, samples: &[TemperatureSample]) -> Option<f64> {
        self.cool_offset_min
            .or_else(|| samples.last().map(|s| s.time_min))
    }

    fn covers(&self, time_min: f64) -> bool {
        self.cool_offset_min.map_or(true, |cool| time_min <= cool)
    }
}

/// One row of the comparison grid.
///
/// Serializes as `{"time": .., "<roast id>": temp|null, .., "ror": {..}}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridRow {
    pub time: f64,
    #[serde(flatten)]
    pub temps: BTreeMap<Uuid, Option<f64>>,
    pub ror: BTreeMap<Uuid, Option<f64>>,
}

/// Place several roasts on a shared time grid.
///
/// The grid runs from 0 to the longest roast's horizon (its `COOL` minute, or
/// its last sample without one) in steps of at least half a minute and at
/// most `max_points` steps. Cells hold the nearest sample's temperature, and
/// become `None` once a roast has passed its `COOL` point, which leaves a
/// break in the chart instead of an extrapolated line. RoR is computed over
/// each roast's own samples and looked up at the nearest grid time.
pub fn resample(roasts: &[RoastSeries], max_points: usize) -> Vec<GridRow> {
    resample_bounded(roasts, max_points, RorBounds::default())
}

/// [`resample`] with explicit RoR bounds
pub fn resample_bounded(roasts: &[RoastSeries], max_points: usize, bounds: RorBounds) -> Vec<GridRow> {
    if roasts.is_empty() {
        return Vec::new();
    }

    let samples: Vec<Vec<TemperatureSample>> =
        roasts.iter().map(RoastSeries::comparison_samples).collect();

    let span = roasts
        .iter()
        .zip(&samples)
        .filter_map(|(roast, samples)| roast.horizon(samples))
        .fold(0.0_f64, f64::max);
    let interval = (span / max_points.max(1) as f64).max(MIN_GRID_INTERVAL_MIN);
    let steps = (span / interval + 1e-9).floor() as usize;

    let rors: Vec<Vec<RoRPoint>> = samples
        .iter()
        .map(|samples| compute_ror_bounded(samples, bounds))
        .collect();

    (0..=steps)
        .map(|step| {
            let time = step as f64 * interval;
            let mut temps = BTreeMap::new();
            let mut ror = BTreeMap::new();
            for ((roast, samples), points) in roasts.iter().zip(&samples).zip(&rors) {
                let visible = roast.covers(time);
                let temp = nearest(samples, time, |s| s.time_min)
                    .filter(|_| visible)
                    .map(|s| s.temp);
                let rate = nearest(points, time, |p| p.time_min)
                    .filter(|_| visible)
                    .map(|p| p.ror);
                temps.insert(roast.id, temp);
                ror.insert(roast.id, rate);
            }
            GridRow { time, temps, ror }
        })
        .collect()
}

/// Item closest in time to `time`; ties go to the earlier item
fn nearest<T>(items: &[T], time: f64, time_of: impl Fn(&T) -> f64) -> Option<&T> {
    items.iter().min_by(|a, b| {
        let da = (time_of(a) - time).abs();
        let db = (time_of(b) - time).abs();
        da.total_cmp(&db)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linear_roast(id: Uuid, until_min: f64, cool_offset_min: Option<f64>) -> RoastSeries {
        let samples = (0..=(until_min * 2.0) as usize)
            .map(|i| {
                let t = i as f64 * 0.5;
                TemperatureSample::new(t, 200.0 + t * 20.0)
            })
            .collect();
        RoastSeries {
            id,
            samples,
            cool_offset_min,
        }
    }

    #[test]
    fn test_empty_input() {
        assert!(resample(&[], 100).is_empty());
    }

    #[test]
    fn test_span_and_interval() {
        let a = linear_roast(Uuid::new_v4(), 10.0, Some(8.0));
        let b = linear_roast(Uuid::new_v4(), 12.0, Some(12.0));
        let rows = resample(&[a, b], 12);
        // span 12 over 12 points -> 1 minute steps, 0..=12
        assert_eq!(rows.len(), 13);
        assert_eq!(rows[0].time, 0.0);
        assert_eq!(rows[12].time, 12.0);
    }

    #[test]
    fn test_interval_has_floor() {
        let a = linear_roast(Uuid::new_v4(), 4.0, None);
        let rows = resample(&[a], 1000);
        assert_eq!(rows.len(), 9);
        assert!((rows[1].time - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_roast_breaks_after_cool() {
        let short = Uuid::new_v4();
        let long = Uuid::new_v4();
        let rows = resample(
            &[
                linear_roast(short, 10.0, Some(8.0)),
                linear_roast(long, 12.0, Some(12.0)),
            ],
            24,
        );
        for row in &rows {
            if row.time <= 8.0 {
                assert!(row.temps[&short].is_some(), "missing at {}", row.time);
                assert!(row.ror[&short].is_some());
            } else {
                assert_eq!(row.temps[&short], None);
                assert_eq!(row.ror[&short], None);
            }
            assert!(row.temps[&long].is_some());
        }
    }

    #[test]
    fn test_nearest_neighbor_without_interpolation() {
        let id = Uuid::new_v4();
        let roast = RoastSeries {
            id,
            samples: vec![
                TemperatureSample::new(0.0, 200.0),
                TemperatureSample::new(1.4, 260.0),
                TemperatureSample::new(3.0, 300.0),
            ],
            cool_offset_min: None,
        };
        let rows = resample(&[roast], 6);
        let at = |t: f64| rows.iter().find(|r| (r.time - t).abs() < 1e-9).unwrap();
        assert_eq!(at(0.5).temps[&id], Some(200.0));
        assert_eq!(at(1.0).temps[&id], Some(260.0));
        assert_eq!(at(2.5).temps[&id], Some(300.0));
    }

    #[test]
    fn test_series_from_events_truncates_after_cool() {
        use crate::models::NewEvent;
        use chrono::Utc;

        let stamp = |input: NewEvent, offset: u32| input.into_event(Uuid::new_v4(), offset, Utc::now());
        let events = vec![
            stamp(NewEvent::reading(300.0), 60),
            stamp(NewEvent::milestone(EventKind::Cool), 480),
            stamp(NewEvent::reading(380.0), 420),
            stamp(NewEvent::reading(350.0), 540),
            stamp(NewEvent::reading(0.0), 30),
        ];
        let series = RoastSeries::from_events(Uuid::new_v4(), &events);
        assert_eq!(series.cool_offset_min, Some(8.0));
        assert_eq!(series.samples.len(), 3);
        assert_eq!(series.comparison_samples().len(), 2);
    }

    #[test]
    fn test_unsorted_samples_stop_at_cool() {
        let id = Uuid::new_v4();
        let roast = RoastSeries {
            id,
            samples: vec![
                TemperatureSample::new(9.0, 400.0),
                TemperatureSample::new(1.0, 250.0),
                TemperatureSample::new(4.0, 330.0),
            ],
            cool_offset_min: Some(8.0),
        };
        assert_eq!(roast.comparison_samples().len(), 2);

        let rows = resample(&[roast], 100);
        assert!((rows.last().unwrap().time - 8.0).abs() < 1e-9);
        for row in &rows {
            assert_ne!(row.temps[&id], Some(400.0), "minute {}", row.time);
        }
        let at = |t: f64| rows.iter().find(|r| (r.time - t).abs() < 1e-9).unwrap();
        assert_eq!(at(7.5).temps[&id], Some(330.0));
        assert_eq!(at(8.0).temps[&id], Some(330.0));
    }

    #[test]
    fn test_horizon_ignores_zero_and_unordered_readings() {
        let id = Uuid::new_v4();
        let roast = RoastSeries {
            id,
            samples: vec![
                TemperatureSample::new(6.0, 0.0),
                TemperatureSample::new(3.0, 300.0),
                TemperatureSample::new(0.0, 200.0),
            ],
            cool_offset_min: None,
        };
        let rows = resample(&[roast], 100);
        assert!((rows.last().unwrap().time - 3.0).abs() < 1e-9);
        assert!(rows.iter().all(|r| r.temps[&id] != Some(0.0)));
    }

    #[test]
    fn test_grid_row_serializes_flat() {
        let id = Uuid::new_v4();
        let rows = resample(&[linear_roast(id, 1.0, None)], 2);
        let json = serde_json::to_value(&rows[0]).unwrap();
        assert_eq!(json["time"], 0.0);
        assert_eq!(json[id.to_string()], 200.0);
        assert_eq!(json["ror"][id.to_string()], 0.0);
    }
}

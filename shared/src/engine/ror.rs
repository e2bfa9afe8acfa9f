//! Rate of Rise estimation
//!
//! Turns sparse, irregular temperature samples into a smoothed first
//! derivative in four stages, applied in this order:
//!
//! 1. windowed least-squares slope (two-point slope when the window is thin)
//! 2. exponential smoothing
//! 3. blend with a short trailing average of the smoothed series
//! 4. clamp to physical bounds

use crate::models::{RoRPoint, RorBounds, TemperatureSample};

/// Regression window when samples are sparse (minutes)
pub const SPARSE_WINDOW_MIN: f64 = 1.0;

/// Regression window when samples are dense (minutes)
pub const DENSE_WINDOW_MIN: f64 = 0.5;

/// Samples per minute at which the narrower window is used
pub const DENSE_SAMPLES_PER_MIN: f64 = 2.0;

/// Weight of the new raw value in exponential smoothing
pub const SMOOTHING_ALPHA: f64 = 0.4;

/// Number of smoothed values in the trailing average, current included
pub const TRAILING_WINDOW: usize = 3;

/// Weight of the smoothed value against the trailing average
pub const BLEND_WEIGHT: f64 = 0.6;

/// Rate of Rise in °F/min with the default bounds.
///
/// Samples may arrive in any order; see [`usable_samples`]. The output has one
/// point per usable sample, in time order, and the first point is always zero.
pub fn compute_ror(samples: &[TemperatureSample]) -> Vec<RoRPoint> {
    compute_ror_bounded(samples, RorBounds::default())
}

/// Rate of Rise clamped to the given bounds
pub fn compute_ror_bounded(samples: &[TemperatureSample], bounds: RorBounds) -> Vec<RoRPoint> {
    let samples = usable_samples(samples);
    if samples.is_empty() {
        return Vec::new();
    }
    let samples = samples.as_slice();

    let window = regression_window(samples);
    let raw: Vec<f64> = (0..samples.len())
        .map(|i| if i == 0 { 0.0 } else { raw_slope(samples, i, window) })
        .collect();

    let mut smoothed = Vec::with_capacity(raw.len());
    let mut previous = 0.0;
    for (i, value) in raw.iter().enumerate() {
        let current = if i == 0 {
            0.0
        } else {
            SMOOTHING_ALPHA * value + (1.0 - SMOOTHING_ALPHA) * previous
        };
        smoothed.push(current);
        previous = current;
    }

    samples
        .iter()
        .enumerate()
        .map(|(i, sample)| {
            let ror = if i == 0 {
                0.0
            } else {
                let tail = &smoothed[(i + 1).saturating_sub(TRAILING_WINDOW)..=i];
                let average = tail.iter().sum::<f64>() / tail.len() as f64;
                let blended = BLEND_WEIGHT * smoothed[i] + (1.0 - BLEND_WEIGHT) * average;
                bounds.clamp(finite_or_zero(blended))
            };
            RoRPoint {
                time_min: sample.time_min,
                ror,
            }
        })
        .collect()
}

/// Samples that carry a reading, stably sorted by time.
///
/// Zero is the "unset" sentinel; zero and non-finite values are dropped.
pub fn usable_samples(samples: &[TemperatureSample]) -> Vec<TemperatureSample> {
    let mut usable: Vec<TemperatureSample> = samples
        .iter()
        .copied()
        .filter(|s| s.time_min.is_finite() && s.temp.is_finite() && s.temp != 0.0)
        .collect();
    usable.sort_by(|a, b| a.time_min.total_cmp(&b.time_min));
    usable
}

/// Samples up to and including the cool point; everything when there is none.
///
/// `samples` must already be ordered by time.
pub fn truncate_at_cool(samples: &[TemperatureSample], cool_min: Option<f64>) -> &[TemperatureSample] {
    match cool_min {
        Some(cool) => {
            let end = samples.partition_point(|s| s.time_min <= cool);
            &samples[..end]
        }
        None => samples,
    }
}

/// Window width chosen from the overall sample density
fn regression_window(samples: &[TemperatureSample]) -> f64 {
    let (first, last) = match (samples.first(), samples.last()) {
        (Some(first), Some(last)) => (first.time_min, last.time_min),
        _ => return SPARSE_WINDOW_MIN,
    };
    let density = samples.len() as f64 / (last - first);
    // A zero span gives an infinite density, which counts as dense
    if density >= DENSE_SAMPLES_PER_MIN {
        DENSE_WINDOW_MIN
    } else {
        SPARSE_WINDOW_MIN
    }
}

fn raw_slope(samples: &[TemperatureSample], i: usize, window: f64) -> f64 {
    let current = samples[i];
    let from = current.time_min - window;
    let in_window: Vec<&TemperatureSample> = samples
        .iter()
        .filter(|s| s.time_min >= from && s.time_min <= current.time_min)
        .collect();

    if in_window.len() < 2 {
        let previous = samples[i - 1];
        let slope = (current.temp - previous.temp) / (current.time_min - previous.time_min);
        return finite_or_zero(slope);
    }

    let n = in_window.len() as f64;
    let (sum_x, sum_y, sum_xy, sum_xx) = in_window.iter().fold(
        (0.0, 0.0, 0.0, 0.0),
        |(sx, sy, sxy, sxx), s| {
            (
                sx + s.time_min,
                sy + s.temp,
                sxy + s.time_min * s.temp,
                sxx + s.time_min * s.time_min,
            )
        },
    );
    finite_or_zero((n * sum_xy - sum_x * sum_y) / (n * sum_xx - sum_x * sum_x))
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TemperatureUnit;

    fn samples(points: &[(f64, f64)]) -> Vec<TemperatureSample> {
        points
            .iter()
            .map(|(t, temp)| TemperatureSample::new(*t, *temp))
            .collect()
    }

    #[test]
    fn test_empty_and_single_sample() {
        assert!(compute_ror(&[]).is_empty());
        let out = compute_ror(&samples(&[(0.0, 200.0)]));
        assert_eq!(out, vec![RoRPoint { time_min: 0.0, ror: 0.0 }]);
    }

    #[test]
    fn test_dense_pipeline_values() {
        let input = samples(&[(0.0, 200.0), (0.5, 205.0), (1.0, 215.0), (1.5, 212.0)]);
        let out = compute_ror(&input);
        assert_eq!(out.len(), 4);
        assert_eq!(out[0].ror, 0.0);

        // Raw slopes over 0.5 min windows are 10, 20, -6; smoothed 4, 10.4, 3.84
        let expected_1 = 0.6 * 4.0 + 0.4 * ((0.0 + 4.0) / 2.0);
        let expected_2 = 0.6 * 10.4 + 0.4 * ((0.0 + 4.0 + 10.4) / 3.0);
        let expected_3 = 0.6 * 3.84 + 0.4 * ((4.0 + 10.4 + 3.84) / 3.0);
        assert!((out[1].ror - expected_1).abs() < 1e-9);
        assert!((out[2].ror - expected_2).abs() < 1e-9);
        assert!((out[3].ror - expected_3).abs() < 1e-9);
        assert_eq!(out[3].time_min, 1.5);
    }

    #[test]
    fn test_sparse_samples_use_wide_window() {
        // 3 samples over 4 minutes: density below 2, window 1.0 min, so every
        // window holds a single sample and the two-point slope is used
        let input = samples(&[(0.0, 300.0), (2.0, 340.0), (4.0, 360.0)]);
        assert_eq!(regression_window(&input), SPARSE_WINDOW_MIN);
        assert!((raw_slope(&input, 1, SPARSE_WINDOW_MIN) - 20.0).abs() < 1e-9);
        assert!((raw_slope(&input, 2, SPARSE_WINDOW_MIN) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_duplicate_timestamps_do_not_produce_nan() {
        let input = samples(&[(1.0, 300.0), (1.0, 310.0), (1.0, 320.0)]);
        let out = compute_ror(&input);
        assert!(out.iter().all(|p| p.ror.is_finite()));
        assert!(out.iter().all(|p| p.ror == 0.0));
    }

    #[test]
    fn test_spike_is_clamped() {
        let input = samples(&[(0.0, 300.0), (1.0 / 60.0, 350.0)]);
        let out = compute_ror(&input);
        assert_eq!(out[1].ror, RorBounds::FAHRENHEIT_MAX);

        let input = samples(&[(0.0, 400.0), (1.0 / 60.0, 300.0), (2.0 / 60.0, 200.0)]);
        let out = compute_ror(&input);
        assert!(out.iter().all(|p| p.ror >= RorBounds::FAHRENHEIT_MIN));
    }

    #[test]
    fn test_celsius_bounds() {
        let bounds = RorBounds::for_unit(TemperatureUnit::Celsius);
        let input = samples(&[(0.0, 150.0), (1.0 / 60.0, 200.0)]);
        let out = compute_ror_bounded(&input, bounds);
        assert!((out[1].ror - bounds.max).abs() < 1e-9);
    }

    #[test]
    fn test_zero_readings_are_dropped() {
        let with_zero = samples(&[(0.0, 200.0), (0.5, 0.0), (1.0, 210.0), (1.5, 215.0)]);
        let without = samples(&[(0.0, 200.0), (1.0, 210.0), (1.5, 215.0)]);
        let out = compute_ror(&with_zero);
        assert_eq!(out.len(), 3);
        assert_eq!(out, compute_ror(&without));
        assert!(out.iter().all(|p| p.ror >= 0.0));
    }

    #[test]
    fn test_unsorted_samples_are_ordered_first() {
        let shuffled = samples(&[(1.0, 215.0), (0.0, 200.0), (1.5, 212.0), (0.5, 205.0)]);
        let ordered = samples(&[(0.0, 200.0), (0.5, 205.0), (1.0, 215.0), (1.5, 212.0)]);
        assert_eq!(compute_ror(&shuffled), compute_ror(&ordered));
        assert_eq!(usable_samples(&shuffled), ordered);
    }

    #[test]
    fn test_truncate_at_cool() {
        let input = samples(&[(0.0, 200.0), (8.0, 420.0), (8.5, 380.0)]);
        assert_eq!(truncate_at_cool(&input, Some(8.0)).len(), 2);
        assert_eq!(truncate_at_cool(&input, None).len(), 3);
        assert!(truncate_at_cool(&input, Some(-1.0)).is_empty());
    }
}

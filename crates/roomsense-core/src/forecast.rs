//! Short-horizon trend forecasting.
//!
//! Given one sensor's time-ordered history, select the slice of it that is
//! relevant for the current trend, fit an ordinary least-squares line, and
//! project the next six hours in quarter-hour steps.
//!
//! Window selection, in order:
//!
//! 1. Default: the samples within two hours of the most recent one.
//!    Light is the exception and always uses the entire history; light
//!    levels are too noisy and bimodal for a short window.
//! 2. Turning-point refinement: for kinds other than noise level,
//!    occupancy, and light, scan the full series backward for the most
//!    recent strict local extremum. When one exists, the window becomes
//!    everything from that extremum on, overriding step 1. When none
//!    exists the step-1 window stands.
//!
//! The caller passes "now" explicitly, so the whole computation is a pure
//! function of its inputs and reproducible in tests.

use time::{Duration, OffsetDateTime};
use tracing::debug;

use roomsense_types::{ForecastPoint, Sample, SensorKind};

use crate::error::{Error, Result};

/// Number of future points produced per forecast.
pub const FORECAST_STEPS: usize = 25;

/// Spacing between forecast points, in minutes.
pub const STEP_MINUTES: i64 = 15;

/// Minimum history length the forecaster accepts.
const MIN_SAMPLES: usize = 2;

/// Span of the default history window.
const DEFAULT_WINDOW: Duration = Duration::hours(2);

/// Kinds excluded from the turning-point refinement.
///
/// Noise and occupancy jump around too much for a local extremum to mark a
/// trend change; light skips the refinement because it already fits over
/// its full history.
fn skips_turning_point(kind: SensorKind) -> bool {
    matches!(
        kind,
        SensorKind::NoiseLevel | SensorKind::Occupancy | SensorKind::Light
    )
}

/// Forecast the next six hours of one sensor's readings.
///
/// Produces exactly [`FORECAST_STEPS`] points spaced [`STEP_MINUTES`] apart,
/// starting at `now` floored to the quarter hour, so the first point may
/// lie slightly before the actual current instant. Every
/// prediction is clamped to a floor of zero.
///
/// `samples` must already be filtered to `timestamp <= now` (see
/// [`roomsense_types::SensorSeries::samples_until`]) and ordered ascending.
///
/// # Errors
///
/// - [`Error::InsufficientData`] with fewer than two samples. Callers are
///   expected to check beforehand and skip forecasting silently.
/// - [`Error::DegenerateFit`] when the selected window spans no time, so no
///   line is defined. Treat identically to "no prediction available".
pub fn forecast(
    kind: SensorKind,
    samples: &[Sample],
    now: OffsetDateTime,
) -> Result<Vec<ForecastPoint>> {
    if samples.len() < MIN_SAMPLES {
        return Err(Error::insufficient_data(MIN_SAMPLES, samples.len()));
    }

    let window = select_window(kind, samples);
    let (slope, intercept) = fit_line(window)?;

    debug!(
        kind = %kind,
        window = window.len(),
        total = samples.len(),
        slope,
        "fitted forecast window"
    );

    let origin = window[0].timestamp;
    let start = quarter_hour_floor(now);

    let points = (0..FORECAST_STEPS)
        .map(|i| {
            let timestamp = start + Duration::minutes(STEP_MINUTES * i as i64);
            let t = (timestamp - origin).as_seconds_f64();
            ForecastPoint {
                timestamp,
                predicted: (slope * t + intercept).max(0.0),
            }
        })
        .collect();

    Ok(points)
}

/// Pick the history slice the line is fitted over.
fn select_window(kind: SensorKind, samples: &[Sample]) -> &[Sample] {
    // Light uses the entire history; everything else starts from the
    // two-hour default.
    let mut window = if kind == SensorKind::Light {
        samples
    } else {
        recent_window(samples)
    };

    if !skips_turning_point(kind) {
        if let Some(at) = last_turning_point(samples) {
            window = &samples[at..];
        }
    }

    window
}

/// The samples within [`DEFAULT_WINDOW`] of the most recent one.
fn recent_window(samples: &[Sample]) -> &[Sample] {
    // samples is non-empty here; the length guard in `forecast` ran first
    let Some(last) = samples.last() else {
        return samples;
    };
    let cutoff = last.timestamp - DEFAULT_WINDOW;
    let start = samples.partition_point(|s| s.timestamp < cutoff);
    &samples[start..]
}

/// Most recent strict local extremum in the full series.
///
/// Scans from the second-to-last index backward to index 1; endpoints are
/// never turning points. Equal neighbors do not qualify.
fn last_turning_point(samples: &[Sample]) -> Option<usize> {
    if samples.len() < 3 {
        return None;
    }
    (1..=samples.len() - 2).rev().find(|&i| {
        let (prev, here, next) = (
            samples[i - 1].value,
            samples[i].value,
            samples[i + 1].value,
        );
        (here > prev && here > next) || (here < prev && here < next)
    })
}

/// Ordinary least-squares line over elapsed seconds since the window start.
fn fit_line(window: &[Sample]) -> Result<(f64, f64)> {
    let degenerate = Error::DegenerateFit {
        samples: window.len(),
    };
    let Some(first) = window.first() else {
        return Err(degenerate);
    };

    let n = window.len() as f64;
    let xs = window
        .iter()
        .map(|s| (s.timestamp - first.timestamp).as_seconds_f64());
    let mean_x = xs.clone().sum::<f64>() / n;
    let mean_y = window.iter().map(|s| s.value).sum::<f64>() / n;

    let mut var_x = 0.0;
    let mut cov_xy = 0.0;
    for (x, s) in xs.zip(window) {
        var_x += (x - mean_x) * (x - mean_x);
        cov_xy += (x - mean_x) * (s.value - mean_y);
    }

    if var_x == 0.0 {
        return Err(degenerate);
    }

    let slope = cov_xy / var_x;
    let intercept = mean_y - slope * mean_x;
    Ok((slope, intercept))
}

/// Floor an instant to the nearest quarter hour.
fn quarter_hour_floor(now: OffsetDateTime) -> OffsetDateTime {
    let secs = now.unix_timestamp();
    let floored = secs - secs.rem_euclid(15 * 60);
    // In range whenever `now` is; the fallback is unreachable
    OffsetDateTime::from_unix_timestamp(floored).unwrap_or(now)
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2023-11-14 22:13:20 UTC
    const BASE: i64 = 1_700_000_000;

    fn at(secs_after_base: i64) -> OffsetDateTime {
        OffsetDateTime::from_unix_timestamp(BASE + secs_after_base).unwrap()
    }

    fn sample(value: f64, secs_after_base: i64) -> Sample {
        Sample::new(value, at(secs_after_base))
    }

    /// Reference regression for cross-checking window selection.
    fn reference_fit(window: &[Sample]) -> (f64, f64) {
        fit_line(window).unwrap()
    }

    fn predict(slope: f64, intercept: f64, origin: OffsetDateTime, t: OffsetDateTime) -> f64 {
        (slope * (t - origin).as_seconds_f64() + intercept).max(0.0)
    }

    #[test]
    fn test_point_count_and_spacing() {
        let samples: Vec<Sample> = (0..8).map(|i| sample(400.0 + i as f64, i * 600)).collect();
        let now = at(4500);

        let points = forecast(SensorKind::Co2, &samples, now).unwrap();

        assert_eq!(points.len(), FORECAST_STEPS);
        for pair in points.windows(2) {
            assert_eq!(pair[1].timestamp - pair[0].timestamp, Duration::minutes(15));
        }
    }

    #[test]
    fn test_first_point_is_quarter_hour_floor_of_now() {
        let samples = vec![sample(400.0, 0), sample(420.0, 600)];
        let now = at(700);

        let points = forecast(SensorKind::Co2, &samples, now).unwrap();

        let first = points[0].timestamp;
        assert!(first <= now);
        assert!(now - first < Duration::minutes(15));
        assert_eq!(first.unix_timestamp() % (15 * 60), 0);
    }

    #[test]
    fn test_idempotent_for_fixed_now() {
        let samples: Vec<Sample> = (0..10)
            .map(|i| sample(500.0 + (i * 7 % 13) as f64, i * 900))
            .collect();
        let now = at(10_000);

        let a = forecast(SensorKind::Temperature, &samples, now).unwrap();
        let b = forecast(SensorKind::Temperature, &samples, now).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_insufficient_data() {
        let err = forecast(SensorKind::Co2, &[sample(400.0, 0)], at(600)).unwrap_err();
        assert!(matches!(
            err,
            Error::InsufficientData { needed: 2, actual: 1 }
        ));
    }

    #[test]
    fn test_degenerate_window() {
        // Two samples on the same instant: no time variance to fit over
        let samples = vec![sample(400.0, 0), sample(500.0, 0)];
        let err = forecast(SensorKind::Co2, &samples, at(600)).unwrap_err();
        assert!(matches!(err, Error::DegenerateFit { samples: 2 }));
    }

    #[test]
    fn test_predictions_clamped_at_zero() {
        // Steeply falling trend would go far below zero within six hours
        let samples = vec![
            sample(300.0, 0),
            sample(200.0, 900),
            sample(100.0, 1800),
        ];
        let points = forecast(SensorKind::Light, &samples, at(2000)).unwrap();

        assert!(points.iter().all(|p| p.predicted >= 0.0));
        assert_eq!(points.last().unwrap().predicted, 0.0);
    }

    #[test]
    fn test_turning_point_window_overrides_default() {
        // Rise to a local maximum at index 3, then fall. The fit must use
        // only samples[3..], not the full two-hour window.
        let samples = vec![
            sample(400.0, 0),
            sample(500.0, 900),
            sample(600.0, 1800),
            sample(700.0, 2700), // local maximum
            sample(650.0, 3600),
            sample(600.0, 4500),
        ];
        let now = at(5000);

        let points = forecast(SensorKind::Co2, &samples, now).unwrap();

        let (slope, intercept) = reference_fit(&samples[3..]);
        let origin = samples[3].timestamp;
        for p in &points {
            let expected = predict(slope, intercept, origin, p.timestamp);
            assert!(
                (p.predicted - expected).abs() < 1e-9,
                "prediction diverged from regression over the turning-point slice"
            );
        }
        assert!(slope < 0.0);
    }

    #[test]
    fn test_most_recent_turning_point_wins() {
        // Two extrema; the scan runs backward and must anchor on the later one
        let samples = vec![
            sample(400.0, 0),
            sample(700.0, 900),  // local maximum (earlier)
            sample(500.0, 1800),
            sample(300.0, 2700), // local minimum (later)
            sample(450.0, 3600),
            sample(600.0, 4500),
        ];

        let points = forecast(SensorKind::Co2, &samples, at(5000)).unwrap();

        let (slope, intercept) = reference_fit(&samples[3..]);
        let origin = samples[3].timestamp;
        let expected = predict(slope, intercept, origin, points[0].timestamp);
        assert!((points[0].predicted - expected).abs() < 1e-9);
    }

    #[test]
    fn test_monotone_series_falls_back_to_two_hour_window() {
        // Strictly increasing: no turning point anywhere. Samples span five
        // hours, so the fallback must be the two-hour slice, not the whole
        // series.
        let samples: Vec<Sample> = (0..20)
            .map(|i| sample(400.0 + (i * i) as f64, i * 900))
            .collect();
        let last_ts = samples.last().unwrap().timestamp;
        let cutoff = last_ts - Duration::hours(2);
        let start = samples.partition_point(|s| s.timestamp < cutoff);
        assert!(start > 0, "test series must exceed the default window");

        let points = forecast(SensorKind::Co2, &samples, at(20 * 900)).unwrap();

        let (slope, intercept) = reference_fit(&samples[start..]);
        let origin = samples[start].timestamp;
        for p in &points {
            let expected = predict(slope, intercept, origin, p.timestamp);
            assert!((p.predicted - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn test_light_uses_full_history() {
        // Light has a clear turning point and more than two hours of data,
        // but must still fit over the entire series.
        let samples = vec![
            sample(100.0, 0),
            sample(900.0, 3600), // local maximum, also beyond the 2h window
            sample(700.0, 7200),
            sample(650.0, 10800),
            sample(600.0, 14400),
        ];

        let points = forecast(SensorKind::Light, &samples, at(15_000)).unwrap();

        let (slope, intercept) = reference_fit(&samples);
        let origin = samples[0].timestamp;
        for p in &points {
            let expected = predict(slope, intercept, origin, p.timestamp);
            assert!(
                (p.predicted - expected).abs() < 1e-9,
                "light forecast must regress over the full series"
            );
        }
    }

    #[test]
    fn test_noise_level_skips_turning_point_refinement() {
        // Same shape as the turning-point test, but for a kind in the
        // exclusion set: the two-hour window applies, extremum or not.
        let samples = vec![
            sample(40.0, 0),
            sample(70.0, 900),
            sample(55.0, 1800), // would be a turning point for other kinds
            sample(50.0, 2700),
            sample(45.0, 3600),
        ];

        let points = forecast(SensorKind::NoiseLevel, &samples, at(4000)).unwrap();

        // All samples are within two hours, so the window is the full slice
        let (slope, intercept) = reference_fit(&samples);
        let origin = samples[0].timestamp;
        let expected = predict(slope, intercept, origin, points[0].timestamp);
        assert!((points[0].predicted - expected).abs() < 1e-9);
    }

    #[test]
    fn test_plateau_is_not_a_turning_point() {
        // Equal neighbors never qualify as an extremum; this series rises,
        // plateaus, then rises again: fallback window applies.
        let samples = vec![
            sample(400.0, 0),
            sample(500.0, 900),
            sample(500.0, 1800),
            sample(550.0, 2700),
        ];

        let points = forecast(SensorKind::Co2, &samples, at(3000)).unwrap();

        let (slope, intercept) = reference_fit(&samples);
        let origin = samples[0].timestamp;
        let expected = predict(slope, intercept, origin, points[0].timestamp);
        assert!((points[0].predicted - expected).abs() < 1e-9);
    }

    #[test]
    fn test_flat_series_forecasts_flat() {
        let samples: Vec<Sample> = (0..5).map(|i| sample(450.0, i * 900)).collect();
        let points = forecast(SensorKind::Co2, &samples, at(4000)).unwrap();
        for p in &points {
            assert!((p.predicted - 450.0).abs() < 1e-9);
        }
    }
}

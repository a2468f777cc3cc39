//! Synthetic sensor data for source outages.
//!
//! When the live or historical source is unreachable the refresher falls
//! back to plausible generated data so the dashboard keeps rendering.
//! Values are drawn per kind from the ranges a real office multisensor
//! reports; history covers the working day in half-hour steps.

use rand::Rng;
use time::{Duration, OffsetDateTime, PrimitiveDateTime, Time};

use roomsense_types::{Room, Sample, SensorKind, SensorSeries, Value};

/// Number of generated history points per sensor (06:00 to 17:30).
const POINTS: usize = 24;

/// Spacing between generated points.
const STEP: Duration = Duration::minutes(30);

/// First generated point: 06:00 UTC of the current day.
const START_HOUR: u8 = 6;

/// Fill every sensor of every room with generated data.
///
/// Replaces each channel's history with [`POINTS`] half-hour samples
/// starting at 06:00 UTC and sets the current value to the last of them.
pub fn populate(rooms: &mut [Room], now: OffsetDateTime) {
    let mut rng = rand::rng();
    let timestamps = day_timestamps(now);

    for room in rooms {
        for (kind, state) in room.sensors.iter_mut() {
            let samples: Vec<Sample> = timestamps
                .iter()
                .map(|&ts| Sample::new(random_value(&mut rng, *kind), ts))
                .collect();

            if let Some(last) = samples.last() {
                state.current = Value::Known(last.value);
            }
            state.history = SensorSeries::from_samples(samples);
        }
    }
}

fn day_timestamps(now: OffsetDateTime) -> Vec<OffsetDateTime> {
    let start_time = Time::from_hms(START_HOUR, 0, 0).unwrap_or(Time::MIDNIGHT);
    let start = PrimitiveDateTime::new(now.date(), start_time).assume_utc();
    (0..POINTS).map(|i| start + STEP * i as i32).collect()
}

fn random_value(rng: &mut impl Rng, kind: SensorKind) -> f64 {
    match kind {
        SensorKind::Temperature => round_tenth(rng.random_range(18.0..=26.0)),
        SensorKind::Humidity => f64::from(rng.random_range(30..=70)),
        SensorKind::Co2 => f64::from(rng.random_range(400..=1000)),
        SensorKind::Pressure => round_tenth(rng.random_range(950.0..=1050.0)),
        SensorKind::Light => f64::from(rng.random_range(100..=1000)),
        SensorKind::UvIndex => round_tenth(rng.random_range(0.0..=10.0)),
        SensorKind::GasResistance => f64::from(rng.random_range(100..=10_000)),
        SensorKind::Iaq => f64::from(rng.random_range(0..=500)),
        SensorKind::NoiseLevel => round_tenth(rng.random_range(20.0..=80.0)),
        SensorKind::Occupancy => f64::from(rng.random_range(0..=10)),
        // `SensorKind` is `#[non_exhaustive]`; all current variants are
        // handled above, so this arm is unreachable for today's enum.
        _ => unreachable!("unhandled SensorKind variant"),
    }
}

fn round_tenth(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

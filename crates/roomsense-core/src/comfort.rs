//! Comfort-range evaluation for sensor readings.
//!
//! A static per-kind table maps readings to a human-readable assessment.
//! Bounds are strict: a reading exactly on a threshold is still in range.
//! The low bound is checked before the high bound and the first breach wins.
//!
//! # Example
//!
//! ```
//! use roomsense_core::comfort;
//! use roomsense_types::{SensorKind, Value};
//!
//! let a = comfort::evaluate(SensorKind::Temperature, Value::Known(17.0));
//! assert!(!a.in_range);
//!
//! let a = comfort::evaluate(SensorKind::Temperature, Value::Unknown);
//! assert!(a.in_range);
//! assert_eq!(a.message, "Temperature has no current value.");
//! ```

use serde::{Deserialize, Serialize};

use roomsense_types::{SensorKind, Value};

/// Result of evaluating one reading against the comfort table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assessment {
    /// Human-readable message: a warning, the in-range confirmation, or
    /// the no-current-value note.
    pub message: String,
    /// Whether the reading is inside the comfortable range. A missing
    /// measurement counts as in range; absence of data is never itself
    /// a warning.
    pub in_range: bool,
}

/// The comfortable band for one sensor kind, for gauge-style display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComfortRange {
    /// Lower edge of the comfortable band.
    pub low: f64,
    /// Upper edge of the comfortable band.
    pub high: f64,
    /// The value the dashboard treats as ideal for delta coloring.
    pub ideal: f64,
}

struct Bound {
    threshold: f64,
    message: &'static str,
}

struct KindThresholds {
    too_low: Option<Bound>,
    too_high: Option<Bound>,
}

// Kinds with only a high bound have no low check at all: an arbitrarily
// small reading never produces a low-bound message.
fn thresholds(kind: SensorKind) -> KindThresholds {
    match kind {
        SensorKind::Temperature => KindThresholds {
            too_low: Some(Bound {
                threshold: 18.0,
                message: "It's too cold to concentrate. Consider turning up the heat.",
            }),
            too_high: Some(Bound {
                threshold: 26.0,
                message: "It's too hot to concentrate. Consider opening a window.",
            }),
        },
        SensorKind::Humidity => KindThresholds {
            too_low: Some(Bound {
                threshold: 30.0,
                message: "The air is too dry. Consider increasing ventilation or opening a window.",
            }),
            too_high: Some(Bound {
                threshold: 60.0,
                message: "The air is too humid. Consider opening a window.",
            }),
        },
        SensorKind::Co2 => KindThresholds {
            too_low: None,
            too_high: Some(Bound {
                threshold: 1000.0,
                message: "CO2 levels are high. Open a window for fresh air.",
            }),
        },
        SensorKind::Iaq => KindThresholds {
            too_low: None,
            too_high: Some(Bound {
                threshold: 100.0,
                message:
                    "Indoor Air Quality is poor. Consider increasing ventilation or opening a window.",
            }),
        },
        SensorKind::UvIndex => KindThresholds {
            too_low: None,
            too_high: Some(Bound {
                threshold: 6.0,
                message:
                    "UV Index is high. Consider closing the blinds or staying out of direct sunlight.",
            }),
        },
        SensorKind::NoiseLevel => KindThresholds {
            too_low: None,
            too_high: Some(Bound {
                threshold: 80.0,
                message:
                    "Noise levels are high. Consider reducing the noise or moving to a quieter space.",
            }),
        },
        SensorKind::Pressure => KindThresholds {
            too_low: Some(Bound {
                threshold: 980.0,
                message:
                    "Atmospheric pressure is low. It might feel stuffy. Consider opening a window.",
            }),
            too_high: Some(Bound {
                threshold: 1030.0,
                message:
                    "Atmospheric pressure is high. Consider opening a window to ventilate the room.",
            }),
        },
        SensorKind::Light => KindThresholds {
            too_low: Some(Bound {
                threshold: 50.0,
                message: "Light levels are too low. Consider turning on more lights.",
            }),
            too_high: Some(Bound {
                threshold: 1000.0,
                message: "Light levels are too bright. Consider adjusting the lighting.",
            }),
        },
        SensorKind::GasResistance => KindThresholds {
            too_low: None,
            too_high: Some(Bound {
                threshold: 1000.0,
                message: "Gas resistance is high. Open a window or ventilate the room.",
            }),
        },
        SensorKind::Occupancy => KindThresholds {
            too_low: None,
            too_high: Some(Bound {
                threshold: 10.0,
                message: "Too many people in the room. Consider moving to a less crowded room.",
            }),
        },
        // `SensorKind` is `#[non_exhaustive]`; all current variants are
        // handled above, so this arm is unreachable for today's enum.
        _ => unreachable!("unhandled SensorKind variant"),
    }
}

/// Evaluate a reading against the comfort table.
///
/// Pure and total: an unknown value yields the no-current-value note with
/// `in_range = true`. Raw strings that cannot be decoded at all fail
/// earlier, at [`roomsense_types::Value::parse`].
#[must_use]
pub fn evaluate(kind: SensorKind, value: Value) -> Assessment {
    let Some(v) = value.as_f64() else {
        return Assessment {
            message: format!("{kind} has no current value."),
            in_range: true,
        };
    };

    let table = thresholds(kind);
    if let Some(low) = table.too_low {
        if v < low.threshold {
            return Assessment {
                message: low.message.to_string(),
                in_range: false,
            };
        }
    }
    if let Some(high) = table.too_high {
        if v > high.threshold {
            return Assessment {
                message: high.message.to_string(),
                in_range: false,
            };
        }
    }

    Assessment {
        message: format!("{kind} value is within a comfortable range."),
        in_range: true,
    }
}

/// The comfortable band and ideal value for gauge display.
#[must_use]
pub fn comfort_range(kind: SensorKind) -> ComfortRange {
    match kind {
        SensorKind::Temperature => ComfortRange { low: 18.0, high: 26.0, ideal: 21.0 },
        SensorKind::Humidity => ComfortRange { low: 30.0, high: 60.0, ideal: 45.0 },
        SensorKind::Co2 => ComfortRange { low: 0.0, high: 1000.0, ideal: 400.0 },
        SensorKind::Iaq => ComfortRange { low: 0.0, high: 100.0, ideal: 50.0 },
        SensorKind::UvIndex => ComfortRange { low: 0.0, high: 6.0, ideal: 0.0 },
        SensorKind::NoiseLevel => ComfortRange { low: 0.0, high: 80.0, ideal: 40.0 },
        SensorKind::Pressure => ComfortRange { low: 980.0, high: 1030.0, ideal: 1013.0 },
        SensorKind::Light => ComfortRange { low: 50.0, high: 1000.0, ideal: 400.0 },
        SensorKind::GasResistance => ComfortRange { low: 0.0, high: 1000.0, ideal: 200.0 },
        SensorKind::Occupancy => ComfortRange { low: 0.0, high: 10.0, ideal: 1.0 },
        // `SensorKind` is `#[non_exhaustive]`; all current variants are
        // handled above, so this arm is unreachable for today's enum.
        _ => unreachable!("unhandled SensorKind variant"),
    }
}

//! CO2-based occupancy estimation.
//!
//! Humans exhale CO2, so its concentration above an empty-room baseline
//! tracks the number of occupants. The estimate:
//!
//! ```text
//! people = ((co2 - baseline) * volume / 1000) / (emission_rate * (elapsed / 3600))
//! ```
//!
//! with the CO2 surplus in ppm converted to liters through the room volume,
//! divided by the liters one person emits over the elapsed interval.
//! Accuracy degrades with open windows, ventilation, and varying activity
//! levels; the result is an estimate, not a count.

use serde::{Deserialize, Serialize};

use roomsense_types::Value;

/// Parameters of the CO2 occupancy model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OccupancyParams {
    /// CO2 concentration of an unoccupied room, in ppm.
    pub baseline_co2: f64,
    /// CO2 emitted per person, in liters per hour.
    pub emission_rate: f64,
    /// Time since the baseline measurement, in seconds.
    pub elapsed_secs: f64,
}

impl Default for OccupancyParams {
    fn default() -> Self {
        Self {
            baseline_co2: 550.0,
            emission_rate: 18.0,
            elapsed_secs: 3600.0,
        }
    }
}

/// Estimate the number of people in a room from its CO2 concentration.
///
/// Returns 0 when no CO2 measurement is available, when the room has no
/// volume, or when the parameters would make the denominator zero. The
/// caller-supplied defaults make the zero-denominator case unreachable in
/// practice, but the estimator defends against it rather than failing.
///
/// # Examples
///
/// ```
/// use roomsense_core::{OccupancyParams, estimate_occupancy};
/// use roomsense_types::Value;
///
/// let people = estimate_occupancy(Value::Known(1000.0), 67.39, &OccupancyParams::default());
/// assert_eq!(people, 2);
///
/// let people = estimate_occupancy(Value::Unknown, 50.0, &OccupancyParams::default());
/// assert_eq!(people, 0);
/// ```
#[must_use]
pub fn estimate_occupancy(current_co2: Value, volume_m3: f64, params: &OccupancyParams) -> u32 {
    let Some(co2) = current_co2.as_f64() else {
        return 0;
    };

    let hours = params.elapsed_secs / 3600.0;
    let denominator = params.emission_rate * hours;
    if denominator == 0.0 {
        return 0;
    }

    let co2_surplus = co2 - params.baseline_co2; // ppm
    let co2_produced = co2_surplus * volume_m3 / 1000.0; // liters
    let people = co2_produced / denominator;

    if people.is_finite() && people > 0.0 {
        people.round() as u32
    } else {
        0
    }
}

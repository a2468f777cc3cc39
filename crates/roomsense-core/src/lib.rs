//! Estimation core for roomsense.
//!
//! Three pure components, each a function of its inputs alone:
//!
//! - **Comfort evaluation** ([`comfort`]): maps a sensor kind and current
//!   value to a human-readable assessment against a static comfort-range
//!   table.
//! - **Occupancy estimation** ([`occupancy`]): converts a CO₂ concentration
//!   into an estimated headcount from room volume and a per-person emission
//!   rate.
//! - **Trend forecasting** ([`forecast`]): selects a relevant window of a
//!   sensor's history, fits a linear trend, and projects the next six hours
//!   in quarter-hour steps.
//!
//! None of these block, retry, or perform I/O; the store invokes them
//! against point-in-time snapshots. All failure modes are local and
//! recoverable: the caller skips the affected display element and moves on.
//!
//! # Example
//!
//! ```
//! use roomsense_core::comfort;
//! use roomsense_types::{SensorKind, Value};
//!
//! let assessment = comfort::evaluate(SensorKind::Co2, Value::Known(1240.0));
//! assert!(!assessment.in_range);
//! assert_eq!(assessment.message, "CO2 levels are high. Open a window for fresh air.");
//! ```

pub mod comfort;
pub mod error;
pub mod forecast;
pub mod occupancy;

pub use comfort::{Assessment, ComfortRange};
pub use error::{Error, Result};
pub use forecast::{FORECAST_STEPS, STEP_MINUTES, forecast};
pub use occupancy::{OccupancyParams, estimate_occupancy};

//! Core types for roomsense environmental monitoring.
//!
//! This crate defines the data model shared by the store, the estimation
//! core, and the service layer:
//!
//! - [`SensorKind`]: the fixed set of sensor channels a room multisensor
//!   exposes, with their display labels, units, and entity-id suffixes
//! - [`Value`]: a current reading that is either a known number or the
//!   "no measurement available" state
//! - [`Sample`] / [`SensorSeries`]: timestamped history for one sensor
//! - [`Room`] / [`SensorState`]: the per-room state the store maintains
//! - [`ForecastPoint`]: one projected future reading
//!
//! # Example
//!
//! ```
//! use roomsense_types::{Room, SensorKind, Value};
//!
//! let mut room = Room::new("Conference-Space", "multisensor_115", 67.39);
//! room.sensor_mut(SensorKind::Co2).current = Value::Known(840.0);
//!
//! assert_eq!(room.current(SensorKind::Co2), Value::Known(840.0));
//! assert_eq!(room.current(SensorKind::Temperature), Value::Unknown);
//! ```

pub mod error;
pub mod kind;
pub mod reading;
pub mod room;

pub use error::{ParseError, ParseResult};
pub use kind::SensorKind;
pub use reading::{ForecastPoint, Sample, SensorSeries, Value};
pub use room::{Room, SensorState};

//! The fixed set of sensor channels a room multisensor exposes.

use core::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// A sensor channel on a room multisensor.
///
/// Each kind carries a human-readable label (used in messages and by the
/// dashboard), a unit string, and the entity-id suffix under which the
/// live and historical data sources publish it.
///
/// `Occupancy` is special: its current value is not measured but computed
/// from CO2 by the occupancy estimator and written back by the store.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new channels
/// in future versions without breaking downstream code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[non_exhaustive]
pub enum SensorKind {
    /// Ambient temperature in °C.
    Temperature,
    /// Relative humidity in %.
    Humidity,
    /// CO2 concentration in ppm.
    Co2,
    /// Indoor air quality index.
    Iaq,
    /// UV index.
    UvIndex,
    /// Microphone noise level.
    NoiseLevel,
    /// Atmospheric pressure in hPa.
    Pressure,
    /// Illuminance in lx.
    Light,
    /// Gas resistance in Ω.
    GasResistance,
    /// Estimated number of people in the room.
    Occupancy,
}

impl SensorKind {
    /// All sensor kinds, in dashboard display order.
    pub const ALL: [SensorKind; 10] = [
        SensorKind::Occupancy,
        SensorKind::Humidity,
        SensorKind::Temperature,
        SensorKind::Co2,
        SensorKind::Iaq,
        SensorKind::UvIndex,
        SensorKind::NoiseLevel,
        SensorKind::Pressure,
        SensorKind::Light,
        SensorKind::GasResistance,
    ];

    /// Human-readable label, as used in warning messages.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            SensorKind::Temperature => "Temperature",
            SensorKind::Humidity => "Humidity",
            SensorKind::Co2 => "CO2",
            SensorKind::Iaq => "IAQ",
            SensorKind::UvIndex => "UV Index",
            SensorKind::NoiseLevel => "Microphone Noise Level",
            SensorKind::Pressure => "Pressure",
            SensorKind::Light => "Light",
            SensorKind::GasResistance => "Gas Resistance",
            SensorKind::Occupancy => "Occupancy",
        }
    }

    /// Unit string for this channel.
    #[must_use]
    pub fn unit(&self) -> &'static str {
        match self {
            SensorKind::Temperature => "°C",
            SensorKind::Humidity => "%",
            SensorKind::Co2 => "ppm",
            SensorKind::Iaq => "IAQ",
            SensorKind::UvIndex => "UVI",
            SensorKind::NoiseLevel => "Volume",
            SensorKind::Pressure => "hPa",
            SensorKind::Light => "lx",
            SensorKind::GasResistance => "Ω",
            SensorKind::Occupancy => "People",
        }
    }

    /// Entity-id suffix under which the external sources publish this
    /// channel (e.g. `sensor.multisensor_115_scd30_co2`).
    #[must_use]
    pub fn entity_suffix(&self) -> &'static str {
        match self {
            SensorKind::Temperature => "_bme680_temperature",
            SensorKind::Humidity => "_bme680_humidity",
            SensorKind::Co2 => "_scd30_co2",
            SensorKind::Iaq => "_bme680_iaq",
            SensorKind::UvIndex => "_ltr390_uv_index",
            SensorKind::NoiseLevel => "_microphone_noise_level",
            SensorKind::Pressure => "_bme680_pressure",
            SensorKind::Light => "_ltr390_light",
            SensorKind::GasResistance => "_bme680_gas_resistance",
            SensorKind::Occupancy => "_people",
        }
    }

    /// URL-safe identifier used in API paths and config keys.
    #[must_use]
    pub fn slug(&self) -> &'static str {
        match self {
            SensorKind::Temperature => "temperature",
            SensorKind::Humidity => "humidity",
            SensorKind::Co2 => "co2",
            SensorKind::Iaq => "iaq",
            SensorKind::UvIndex => "uv_index",
            SensorKind::NoiseLevel => "noise_level",
            SensorKind::Pressure => "pressure",
            SensorKind::Light => "light",
            SensorKind::GasResistance => "gas_resistance",
            SensorKind::Occupancy => "occupancy",
        }
    }

    /// Match an entity id against the known suffixes.
    ///
    /// Returns the kind whose suffix terminates `entity_id`, if any.
    ///
    /// # Examples
    ///
    /// ```
    /// use roomsense_types::SensorKind;
    ///
    /// assert_eq!(
    ///     SensorKind::from_entity_suffix("sensor.multisensor_110_scd30_co2"),
    ///     Some(SensorKind::Co2)
    /// );
    /// assert_eq!(SensorKind::from_entity_suffix("sensor.multisensor_110_battery"), None);
    /// ```
    #[must_use]
    pub fn from_entity_suffix(entity_id: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| entity_id.ends_with(kind.entity_suffix()))
    }
}

impl FromStr for SensorKind {
    type Err = ParseError;

    /// Parse a kind from its slug or its display label.
    ///
    /// # Examples
    ///
    /// ```
    /// use roomsense_types::SensorKind;
    ///
    /// assert_eq!("co2".parse::<SensorKind>().unwrap(), SensorKind::Co2);
    /// assert_eq!("Microphone Noise Level".parse::<SensorKind>().unwrap(), SensorKind::NoiseLevel);
    /// assert!("radon".parse::<SensorKind>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.slug() == s || kind.label() == s)
            .ok_or_else(|| ParseError::UnknownKind(s.to_string()))
    }
}

impl fmt::Display for SensorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

//! Per-room sensor state.

use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::kind::SensorKind;
use crate::reading::{SensorSeries, Value};

/// State of one sensor channel within a room.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SensorState {
    /// The latest reported value.
    pub current: Value,
    /// Append-only history for the channel.
    pub history: SensorSeries,
    /// Warning messages produced by the last evaluation pass.
    pub warnings: Vec<String>,
}

/// One monitored room with its multisensor.
///
/// Rooms are created once at startup, one entry per configured room with
/// every [`SensorKind`] present and empty, and then mutated in place by the
/// store on each refresh tick. Rooms are never removed.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Room {
    /// Display name, e.g. `"Conference-Space"`.
    pub name: String,
    /// Multisensor entity id, e.g. `"multisensor_115"`.
    pub entity_id: String,
    /// Room volume in m³. Zero is valid for volumeless spaces (hallways);
    /// the occupancy estimator yields 0 for those rather than dividing.
    pub volume_m3: f64,
    /// Per-channel state, keyed by kind.
    pub sensors: BTreeMap<SensorKind, SensorState>,
}

impl Room {
    /// Create a room with every sensor kind initialized empty.
    #[must_use]
    pub fn new(name: impl Into<String>, entity_id: impl Into<String>, volume_m3: f64) -> Self {
        let sensors = SensorKind::ALL
            .into_iter()
            .map(|kind| (kind, SensorState::default()))
            .collect();
        Self {
            name: name.into(),
            entity_id: entity_id.into(),
            volume_m3,
            sensors,
        }
    }

    /// Shared access to one channel, if the room carries it.
    ///
    /// Rooms built through [`Room::new`] carry every kind.
    #[must_use]
    pub fn sensor(&self, kind: SensorKind) -> Option<&SensorState> {
        self.sensors.get(&kind)
    }

    /// Mutable access to one channel, creating it empty if absent.
    #[must_use]
    pub fn sensor_mut(&mut self, kind: SensorKind) -> &mut SensorState {
        self.sensors.entry(kind).or_default()
    }

    /// The current value of one channel, [`Value::Unknown`] if absent.
    #[must_use]
    pub fn current(&self, kind: SensorKind) -> Value {
        self.sensor(kind).map_or(Value::Unknown, |s| s.current)
    }
}

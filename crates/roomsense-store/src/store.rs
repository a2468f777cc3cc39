//! The long-lived sensor store and its per-tick evaluation pass.

use std::sync::Arc;

use time::OffsetDateTime;
use tokio::sync::{Mutex, watch};
use tracing::{debug, warn};

use roomsense_core::{OccupancyParams, comfort, estimate_occupancy, forecast};
use roomsense_types::{Room, Sample, SensorKind, Value};

use crate::snapshot::Snapshot;
use crate::synthetic;

/// One decoded reading from the live-data source.
#[derive(Debug, Clone, PartialEq)]
pub struct LiveReading {
    /// Multisensor entity id, e.g. `"multisensor_110"`.
    pub entity_id: String,
    /// Which channel the reading belongs to.
    pub kind: SensorKind,
    /// The decoded state.
    pub value: Value,
}

/// One sensor's history as returned by the historical-data source.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryBatch {
    /// Multisensor entity id.
    pub entity_id: String,
    /// Which channel the samples belong to.
    pub kind: SensorKind,
    /// Timestamp-ordered samples since the start of the query range.
    pub samples: Vec<Sample>,
}

/// Owns all room state and publishes immutable snapshots.
///
/// Rooms are created once at construction and mutated in place on each
/// refresh; nothing is ever removed. The refresher is the only writer; the
/// watch channel exists so that readers never touch the mutable state at
/// all.
pub struct SensorStore {
    rooms: Mutex<Vec<Room>>,
    snapshot_tx: watch::Sender<Arc<Snapshot>>,
    params: OccupancyParams,
}

impl SensorStore {
    /// Create a store over the configured rooms with default occupancy
    /// parameters.
    #[must_use]
    pub fn new(rooms: Vec<Room>) -> Self {
        Self::with_params(rooms, OccupancyParams::default())
    }

    /// Create a store with explicit occupancy parameters.
    #[must_use]
    pub fn with_params(rooms: Vec<Room>, params: OccupancyParams) -> Self {
        let initial = Arc::new(Snapshot::empty(
            rooms.clone(),
            OffsetDateTime::UNIX_EPOCH,
        ));
        let (snapshot_tx, _) = watch::channel(initial);
        Self {
            rooms: Mutex::new(rooms),
            snapshot_tx,
            params,
        }
    }

    /// The most recently published snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.snapshot_tx.borrow().clone()
    }

    /// Subscribe to snapshot updates.
    pub fn subscribe(&self) -> watch::Receiver<Arc<Snapshot>> {
        self.snapshot_tx.subscribe()
    }

    /// Apply one tick's worth of source data, evaluate, and publish.
    ///
    /// Live readings overwrite current values; history batches replace the
    /// corresponding series wholesale (the sources re-deliver the full
    /// range each tick). Readings for unconfigured entities are logged and
    /// dropped.
    pub async fn refresh(
        &self,
        live: Vec<LiveReading>,
        history: Vec<HistoryBatch>,
        now: OffsetDateTime,
    ) {
        let mut rooms = self.rooms.lock().await;

        for reading in live {
            match room_mut(&mut rooms, &reading.entity_id) {
                Some(room) => room.sensor_mut(reading.kind).current = reading.value,
                None => debug!(entity = %reading.entity_id, "live reading for unknown room"),
            }
        }

        for batch in history {
            match room_mut(&mut rooms, &batch.entity_id) {
                Some(room) => {
                    let state = room.sensor_mut(batch.kind);
                    state.history =
                        roomsense_types::SensorSeries::from_samples(batch.samples);
                }
                None => debug!(entity = %batch.entity_id, "history batch for unknown room"),
            }
        }

        evaluate_rooms(&mut rooms, &self.params, now);
        self.publish(&rooms, now);
    }

    /// Populate every room with synthetic data, evaluate, and publish.
    ///
    /// Used when either source is unreachable; downstream consumers cannot
    /// and should not distinguish synthetic from live data.
    pub async fn refresh_synthetic(&self, now: OffsetDateTime) {
        warn!("populating synthetic sensor data");
        let mut rooms = self.rooms.lock().await;
        synthetic::populate(&mut rooms, now);
        evaluate_rooms(&mut rooms, &self.params, now);
        self.publish(&rooms, now);
    }

    fn publish(&self, rooms: &[Room], now: OffsetDateTime) {
        let snapshot = Arc::new(Snapshot {
            taken_at: now,
            rooms: rooms.to_vec(),
        });
        // send_replace never fails; a send() would, with no receivers yet
        self.snapshot_tx.send_replace(snapshot);
    }
}

fn room_mut<'a>(rooms: &'a mut [Room], entity_id: &str) -> Option<&'a mut Room> {
    rooms.iter_mut().find(|r| r.entity_id == entity_id)
}

/// The per-tick evaluation pass.
///
/// Order matters: the occupancy write-back runs first so the Occupancy
/// channel's warnings and forecast see the fresh estimate. A failure in one
/// sensor's forecast never prevents the rest of the pass.
fn evaluate_rooms(rooms: &mut [Room], params: &OccupancyParams, now: OffsetDateTime) {
    for room in rooms {
        write_back_occupancy(room, params);

        for (kind, state) in room.sensors.iter_mut() {
            let mut warnings = Vec::new();

            let assessment = comfort::evaluate(*kind, state.current);
            let current_in_range = assessment.in_range;
            if !current_in_range {
                warnings.push(assessment.message);
            }

            // The look-ahead warning only supplements an in-range current
            // value; a sensor that already warns does not warn twice.
            let visible = state.history.samples_until(now);
            if current_in_range && visible.len() >= 2 {
                match forecast(*kind, visible, now) {
                    Ok(points) => {
                        if let Some(first) = points.first() {
                            let ahead =
                                comfort::evaluate(*kind, Value::Known(first.predicted));
                            if !ahead.in_range {
                                warnings.push(format!("In 15 minutes: {}", ahead.message));
                            }
                        }
                    }
                    Err(err) => {
                        debug!(kind = %kind, %err, "skipping forecast warning");
                    }
                }
            }

            state.warnings = warnings;
        }
    }
}

/// Estimate occupancy from the room's CO2 and store it as the Occupancy
/// channel's current value.
fn write_back_occupancy(room: &mut Room, params: &OccupancyParams) {
    let co2 = room.current(SensorKind::Co2);
    let people = estimate_occupancy(co2, room.volume_m3, params);
    if let Some(state) = room.sensors.get_mut(&SensorKind::Occupancy) {
        state.current = Value::Known(f64::from(people));
    }
}

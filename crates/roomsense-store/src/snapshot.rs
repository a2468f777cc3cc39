//! Immutable point-in-time views of all rooms.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use roomsense_types::Room;

/// A consistent view of every room's sensor state, taken at one instant.
///
/// Snapshots are published as `Arc<Snapshot>` and never mutated after
/// publication; readers clone the `Arc`, not the data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    /// When the snapshot was taken.
    #[serde(with = "time::serde::rfc3339")]
    pub taken_at: OffsetDateTime,
    /// All rooms, in configuration order.
    pub rooms: Vec<Room>,
}

impl Snapshot {
    /// An empty snapshot, published before the first refresh completes.
    #[must_use]
    pub fn empty(rooms: Vec<Room>, taken_at: OffsetDateTime) -> Self {
        Self { taken_at, rooms }
    }

    /// Look a room up by entity id or display name.
    #[must_use]
    pub fn room(&self, key: &str) -> Option<&Room> {
        self.rooms
            .iter()
            .find(|r| r.entity_id == key || r.name == key)
    }
}

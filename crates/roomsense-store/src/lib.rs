//! In-memory sensor store for roomsense.
//!
//! This crate owns the live mapping of room → sensor → {current value,
//! history, warnings}. A background refresher feeds it once per tick with
//! whatever the live and historical sources returned; the store applies the
//! update, runs the evaluation pass (occupancy write-back, comfort warnings,
//! forecast look-ahead warnings), and publishes an immutable
//! [`Snapshot`] through a watch channel.
//!
//! Readers grab the current `Arc<Snapshot>` atomically, so they observe
//! either a fully-pre-update or fully-post-update state per room, never a
//! history list mid-append.
//!
//! # Example
//!
//! ```
//! use roomsense_store::SensorStore;
//! use roomsense_types::Room;
//! use time::OffsetDateTime;
//!
//! # async fn demo() {
//! let store = SensorStore::new(vec![Room::new("Focus-Space", "multisensor_109", 162.24)]);
//! store.refresh_synthetic(OffsetDateTime::now_utc()).await;
//!
//! let snapshot = store.snapshot();
//! assert_eq!(snapshot.rooms.len(), 1);
//! # }
//! ```

mod error;
pub mod labels;
mod snapshot;
mod store;
pub mod synthetic;

pub use error::{Error, Result};
pub use labels::{LabelLog, LabelRecord};
pub use snapshot::Snapshot;
pub use store::{HistoryBatch, LiveReading, SensorStore};

/// Default training-label log path following platform conventions.
///
/// - Linux: `~/.local/share/roomsense/training_data.csv`
/// - macOS: `~/Library/Application Support/roomsense/training_data.csv`
/// - Windows: `C:\Users\<user>\AppData\Local\roomsense\training_data.csv`
pub fn default_labels_path() -> std::path::PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join("roomsense")
        .join("training_data.csv")
}

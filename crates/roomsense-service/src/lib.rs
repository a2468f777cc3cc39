//! Roomsense service: background refresher and HTTP REST API.
//!
//! The service owns the process-level wiring: it loads configuration,
//! builds the room registry and the [`roomsense_store::SensorStore`],
//! starts the 60-second background refresher that pulls the live and
//! historical sources, and serves the REST API the dashboard reads.
//!
//! The estimation logic itself lives in `roomsense-core`; this crate only
//! schedules it and exposes its results.

pub mod api;
pub mod config;
pub mod error;
pub mod refresher;
pub mod sources;
pub mod state;

pub use api::router;
pub use config::{Config, ConfigError};
pub use error::{SourceError, SourceResult};
pub use refresher::Refresher;
pub use state::AppState;

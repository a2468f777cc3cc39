//! Application state shared across handlers and the refresher.

use std::sync::Arc;

use roomsense_store::{LabelLog, SensorStore};

use crate::config::Config;
use crate::error::SourceResult;
use crate::sources::{HistoryClient, LiveClient};

/// Shared application state.
///
/// Everything here is either immutable after startup (config, clients,
/// room entity list) or internally synchronized (the store). Handlers read
/// snapshots; only the refresher writes.
pub struct AppState {
    /// The sensor store; the single writer is the refresher.
    pub store: SensorStore,
    /// Configuration, fixed for the process lifetime.
    pub config: Config,
    /// Training-label sink.
    pub labels: LabelLog,
    /// Live-state source client.
    pub live: LiveClient,
    /// Historical source client.
    pub history: HistoryClient,
    /// Room entity ids, in configuration order.
    pub entities: Vec<String>,
}

impl AppState {
    /// Build the state from validated configuration.
    pub fn new(config: Config) -> SourceResult<Arc<Self>> {
        let live = LiveClient::new(&config.live_source)?;
        let history = HistoryClient::new(&config.history_source)?;
        let rooms = config.build_rooms();
        let entities = rooms.iter().map(|r| r.entity_id.clone()).collect();
        let store = SensorStore::with_params(rooms, config.occupancy);
        let labels = LabelLog::new(&config.labels.path);

        Ok(Arc::new(Self {
            store,
            config,
            labels,
            live,
            history,
            entities,
        }))
    }
}

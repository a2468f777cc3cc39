//! Client for the live-state source.
//!
//! The source exposes the current state of every entity it tracks as one
//! JSON array. Multisensor readings are identified by an entity id of the
//! form `sensor.<room entity><kind suffix>`, e.g.
//! `sensor.multisensor_110_scd30_co2`; everything else is ignored.

use std::time::Duration;

use serde::Deserialize;
use tracing::warn;

use roomsense_store::LiveReading;
use roomsense_types::{SensorKind, Value};

use crate::config::LiveSourceConfig;
use crate::error::{SourceError, SourceResult};

const ENTITY_PREFIX: &str = "sensor.multisensor_";

/// One entity state as the source reports it.
#[derive(Debug, Clone, Deserialize)]
pub struct EntityState {
    /// Fully qualified entity id.
    pub entity_id: String,
    /// Raw state string; numeric text or "unknown"/"unavailable".
    pub state: String,
}

/// HTTP client for the live-state endpoint.
pub struct LiveClient {
    http: reqwest::Client,
    url: String,
    token: String,
}

impl LiveClient {
    /// Build a client from configuration.
    pub fn new(config: &LiveSourceConfig) -> SourceResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            url: config.url.clone(),
            token: config.token.clone(),
        })
    }

    /// Fetch and decode the current multisensor states.
    pub async fn fetch(&self) -> SourceResult<Vec<LiveReading>> {
        let mut request = self.http.get(&self.url);
        if !self.token.is_empty() {
            request = request.header(reqwest::header::AUTHORIZATION, &self.token);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(SourceError::Status {
                status: response.status(),
                url: self.url.clone(),
            });
        }

        let states: Vec<EntityState> = response.json().await?;
        Ok(decode_states(&states))
    }
}

/// Decode raw entity states into store ingest readings.
///
/// Entities outside the multisensor namespace or with an unrecognized kind
/// suffix are skipped silently; states that are neither numeric nor a
/// no-measurement sentinel are a source contract violation and are logged
/// and dropped so one bad entity cannot spoil the tick.
pub fn decode_states(states: &[EntityState]) -> Vec<LiveReading> {
    states
        .iter()
        .filter_map(|entity| match decode_state(entity) {
            Ok(reading) => reading,
            Err(err) => {
                warn!(entity = %entity.entity_id, %err, "dropping undecodable state");
                None
            }
        })
        .collect()
}

fn decode_state(entity: &EntityState) -> Result<Option<LiveReading>, roomsense_types::ParseError> {
    let Some(rest) = entity.entity_id.strip_prefix(ENTITY_PREFIX) else {
        return Ok(None);
    };
    let Some(kind) = SensorKind::from_entity_suffix(&entity.entity_id) else {
        return Ok(None);
    };
    // rest = "<number><suffix>"; recover the bare room entity id
    let Some(number) = rest.strip_suffix(kind.entity_suffix()) else {
        return Ok(None);
    };

    let value = Value::parse(&entity.state)?;
    Ok(Some(LiveReading {
        entity_id: format!("multisensor_{number}"),
        kind,
        value,
    }))
}

//! Client for the historical-data source (InfluxDB 1.x).
//!
//! The recorder writes one measurement per unit string ("ppm", "°C", ...),
//! tagged with the fully suffixed entity id. Each refresh queries every
//! (room, kind) pair for the samples since the start of the monitoring day
//! and hands them to the store as [`HistoryBatch`]es.

use std::time::Duration;

use serde::Deserialize;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::debug;

use roomsense_store::HistoryBatch;
use roomsense_types::{Sample, SensorKind};

use crate::config::HistorySourceConfig;
use crate::error::{SourceError, SourceResult};

/// HTTP client for the InfluxDB query endpoint.
pub struct HistoryClient {
    http: reqwest::Client,
    url: String,
    database: String,
    username: String,
    password: String,
}

impl HistoryClient {
    /// Build a client from configuration.
    pub fn new(config: &HistorySourceConfig) -> SourceResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            url: config.url.clone(),
            database: config.database.clone(),
            username: config.username.clone(),
            password: config.password.clone(),
        })
    }

    /// Fetch history for every (room, kind) pair since `since`.
    ///
    /// Pairs the source has no data for simply produce no batch; a
    /// transport or payload failure aborts the whole fetch so the caller
    /// can fall back for the tick.
    pub async fn fetch_all(
        &self,
        entities: &[String],
        since: OffsetDateTime,
    ) -> SourceResult<Vec<HistoryBatch>> {
        let mut batches = Vec::new();
        for entity in entities {
            for kind in SensorKind::ALL {
                let samples = self.fetch_series(entity, kind, since).await?;
                if samples.is_empty() {
                    continue;
                }
                batches.push(HistoryBatch {
                    entity_id: entity.clone(),
                    kind,
                    samples,
                });
            }
        }
        Ok(batches)
    }

    /// Fetch one sensor's samples since `since`, oldest first.
    pub async fn fetch_series(
        &self,
        entity: &str,
        kind: SensorKind,
        since: OffsetDateTime,
    ) -> SourceResult<Vec<Sample>> {
        let query = build_query(entity, kind, since)?;
        debug!(entity, kind = %kind, "querying history source");

        let url = format!("{}/query", self.url.trim_end_matches('/'));
        let mut request = self
            .http
            .get(&url)
            .query(&[("db", self.database.as_str()), ("q", query.as_str())]);
        if !self.username.is_empty() {
            request = request.basic_auth(&self.username, Some(&self.password));
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(SourceError::Status {
                status: response.status(),
                url,
            });
        }

        let payload: QueryResponse = response.json().await?;
        parse_response(&payload, &url)
    }
}

fn build_query(entity: &str, kind: SensorKind, since: OffsetDateTime) -> SourceResult<String> {
    let since_rfc3339 = since
        .format(&Rfc3339)
        .map_err(|_| SourceError::InvalidTimestamp(since.to_string()))?;
    Ok(format!(
        "SELECT time, entity_id, value FROM \"{}\" WHERE \"entity_id\" = '{}{}' \
         AND time >= '{}' ORDER BY time ASC",
        kind.unit(),
        entity,
        kind.entity_suffix(),
        since_rfc3339,
    ))
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    results: Vec<QueryResult>,
}

#[derive(Debug, Deserialize)]
struct QueryResult {
    #[serde(default)]
    series: Vec<Series>,
}

#[derive(Debug, Deserialize)]
struct Series {
    columns: Vec<String>,
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

fn parse_response(payload: &QueryResponse, url: &str) -> SourceResult<Vec<Sample>> {
    let mut samples = Vec::new();

    for result in &payload.results {
        for series in &result.series {
            let time_idx = column_index(series, "time", url)?;
            let value_idx = column_index(series, "value", url)?;

            for row in &series.values {
                let Some(raw_time) = row.get(time_idx).and_then(|v| v.as_str()) else {
                    continue;
                };
                // Rows recorded while the sensor was offline carry null
                // values; skip them rather than failing the batch.
                let Some(value) = row.get(value_idx).and_then(|v| v.as_f64()) else {
                    continue;
                };
                let timestamp = OffsetDateTime::parse(raw_time, &Rfc3339)
                    .map_err(|_| SourceError::InvalidTimestamp(raw_time.to_string()))?;
                samples.push(Sample::new(value, timestamp));
            }
        }
    }

    Ok(samples)
}

fn column_index(series: &Series, name: &str, url: &str) -> SourceResult<usize> {
    series
        .columns
        .iter()
        .position(|c| c == name)
        .ok_or_else(|| SourceError::Payload {
            url: url.to_string(),
            message: format!("missing '{name}' column"),
        })
}

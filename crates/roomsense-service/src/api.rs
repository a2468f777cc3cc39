//! REST API endpoints for roomsense.
//!
//! The (external) dashboard consumes these to render rooms, gauges,
//! warnings, and forecast charts. Handlers only ever read published
//! snapshots (the store's single writer is the background refresher), so
//! no handler can observe a partially refreshed room.
//!
//! # Endpoints
//!
//! - `GET /api/health`: liveness and version
//! - `GET /api/rooms`: all rooms with their current values
//! - `GET /api/rooms/{room}`: one room's full sensor state
//! - `GET /api/rooms/{room}/sensors/{kind}`: one sensor's detail view
//! - `GET /api/rooms/{room}/sensors/{kind}/forecast`: six-hour projection
//! - `GET /api/warnings`: every active warning across all rooms
//! - `POST /api/labels`: submit a ground-truth occupancy headcount

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::debug;

use roomsense_core::{Assessment, ComfortRange, comfort, forecast};
use roomsense_store::LabelRecord;
use roomsense_types::{ForecastPoint, Room, Sample, SensorKind, Value};

use crate::state::AppState;

/// Create the API router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/rooms", get(list_rooms))
        .route("/api/rooms/{room}", get(get_room))
        .route("/api/rooms/{room}/sensors/{kind}", get(get_sensor))
        .route(
            "/api/rooms/{room}/sensors/{kind}/forecast",
            get(get_forecast),
        )
        .route("/api/warnings", get(list_warnings))
        .route("/api/labels", post(submit_label))
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

/// Health check endpoint.
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: OffsetDateTime::now_utc(),
    })
}

/// One room in the list view.
#[derive(Debug, Serialize)]
pub struct RoomSummary {
    pub name: String,
    pub entity_id: String,
    pub volume_m3: f64,
    /// Current value per channel, keyed by kind slug.
    pub current: BTreeMap<SensorKind, Value>,
}

impl RoomSummary {
    fn from_room(room: &Room) -> Self {
        Self {
            name: room.name.clone(),
            entity_id: room.entity_id.clone(),
            volume_m3: room.volume_m3,
            current: room
                .sensors
                .iter()
                .map(|(kind, state)| (*kind, state.current))
                .collect(),
        }
    }
}

/// List all rooms with their current values.
async fn list_rooms(State(state): State<Arc<AppState>>) -> Json<Vec<RoomSummary>> {
    let snapshot = state.store.snapshot();
    Json(snapshot.rooms.iter().map(RoomSummary::from_room).collect())
}

/// One sensor channel in the room view.
#[derive(Debug, Serialize)]
pub struct SensorOverview {
    pub kind: SensorKind,
    pub label: &'static str,
    pub unit: &'static str,
    pub current: Value,
    pub assessment: Assessment,
    pub warnings: Vec<String>,
}

/// Full room state.
#[derive(Debug, Serialize)]
pub struct RoomResponse {
    pub name: String,
    pub entity_id: String,
    pub volume_m3: f64,
    pub sensors: Vec<SensorOverview>,
}

/// Get one room's full sensor state.
async fn get_room(
    State(state): State<Arc<AppState>>,
    Path(room): Path<String>,
) -> Result<Json<RoomResponse>, ApiError> {
    let snapshot = state.store.snapshot();
    let room = snapshot
        .room(&room)
        .ok_or_else(|| ApiError::RoomNotFound(room.clone()))?;

    let sensors = room
        .sensors
        .iter()
        .map(|(kind, sensor)| SensorOverview {
            kind: *kind,
            label: kind.label(),
            unit: kind.unit(),
            current: sensor.current,
            assessment: comfort::evaluate(*kind, sensor.current),
            warnings: sensor.warnings.clone(),
        })
        .collect();

    Ok(Json(RoomResponse {
        name: room.name.clone(),
        entity_id: room.entity_id.clone(),
        volume_m3: room.volume_m3,
        sensors,
    }))
}

/// One sensor's detail view: gauge inputs, delta, and visible history.
#[derive(Debug, Serialize)]
pub struct SensorResponse {
    pub room: String,
    pub kind: SensorKind,
    pub label: &'static str,
    pub unit: &'static str,
    pub current: Value,
    /// Most recent historical value at or before now.
    pub previous: Option<f64>,
    /// Change of the current value against `previous`.
    pub delta: Option<f64>,
    pub assessment: Assessment,
    pub range: ComfortRange,
    pub warnings: Vec<String>,
    /// History with future-stamped entries filtered out.
    pub history: Vec<Sample>,
}

/// Get one sensor's detail view.
async fn get_sensor(
    State(state): State<Arc<AppState>>,
    Path((room, kind)): Path<(String, String)>,
) -> Result<Json<SensorResponse>, ApiError> {
    let kind: SensorKind = kind.parse().map_err(|_| ApiError::UnknownKind(kind))?;
    let snapshot = state.store.snapshot();
    let room = snapshot
        .room(&room)
        .ok_or_else(|| ApiError::RoomNotFound(room.clone()))?;
    let sensor = room
        .sensor(kind)
        .ok_or_else(|| ApiError::SensorNotFound {
            room: room.name.clone(),
            kind,
        })?;

    let now = OffsetDateTime::now_utc();
    let visible = sensor.history.samples_until(now);
    let previous = visible.last().map(|s| s.value);
    let delta = match (sensor.current.as_f64(), previous) {
        (Some(current), Some(prev)) => Some(current - prev),
        _ => None,
    };

    Ok(Json(SensorResponse {
        room: room.name.clone(),
        kind,
        label: kind.label(),
        unit: kind.unit(),
        current: sensor.current,
        previous,
        delta,
        assessment: comfort::evaluate(kind, sensor.current),
        range: comfort::comfort_range(kind),
        warnings: sensor.warnings.clone(),
        history: visible.to_vec(),
    }))
}

/// Six-hour projection for one sensor.
#[derive(Debug, Serialize)]
pub struct ForecastResponse {
    pub room: String,
    pub kind: SensorKind,
    pub unit: &'static str,
    /// False when the history cannot support a fit; the dashboard skips
    /// the forecast panel in that case.
    pub available: bool,
    pub points: Vec<ForecastPoint>,
}

/// Get one sensor's forecast.
async fn get_forecast(
    State(state): State<Arc<AppState>>,
    Path((room, kind)): Path<(String, String)>,
) -> Result<Json<ForecastResponse>, ApiError> {
    let kind: SensorKind = kind.parse().map_err(|_| ApiError::UnknownKind(kind))?;
    let snapshot = state.store.snapshot();
    let room = snapshot
        .room(&room)
        .ok_or_else(|| ApiError::RoomNotFound(room.clone()))?;
    let sensor = room
        .sensor(kind)
        .ok_or_else(|| ApiError::SensorNotFound {
            room: room.name.clone(),
            kind,
        })?;

    let now = OffsetDateTime::now_utc();
    let visible = sensor.history.samples_until(now);

    // Too little history, or a degenerate window, both mean the same thing
    // to the caller: no forecast panel this time around.
    let points = if visible.len() < 2 {
        None
    } else {
        match forecast(kind, visible, now) {
            Ok(points) => Some(points),
            Err(err) => {
                debug!(room = %room.name, kind = %kind, %err, "forecast unavailable");
                None
            }
        }
    };

    Ok(Json(ForecastResponse {
        room: room.name.clone(),
        kind,
        unit: kind.unit(),
        available: points.is_some(),
        points: points.unwrap_or_default(),
    }))
}

/// One active warning.
#[derive(Debug, Serialize)]
pub struct WarningEntry {
    pub room: String,
    pub sensor: &'static str,
    pub message: String,
}

/// List every active warning across all rooms.
async fn list_warnings(State(state): State<Arc<AppState>>) -> Json<Vec<WarningEntry>> {
    let snapshot = state.store.snapshot();
    let warnings = snapshot
        .rooms
        .iter()
        .flat_map(|room| {
            room.sensors.iter().flat_map(|(kind, sensor)| {
                sensor.warnings.iter().map(|message| WarningEntry {
                    room: room.name.clone(),
                    sensor: kind.label(),
                    message: message.clone(),
                })
            })
        })
        .collect();
    Json(warnings)
}

/// A ground-truth occupancy submission.
#[derive(Debug, Deserialize)]
pub struct LabelRequest {
    /// Room entity id or display name.
    pub room: String,
    /// The observed number of people.
    pub people: u32,
}

/// Label submission confirmation.
#[derive(Debug, Serialize)]
pub struct LabelResponse {
    pub saved: bool,
    pub room: String,
    #[serde(with = "time::serde::rfc3339")]
    pub recorded_at: OffsetDateTime,
}

/// Append a training label with the room's contemporaneous readings.
async fn submit_label(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LabelRequest>,
) -> Result<(StatusCode, Json<LabelResponse>), ApiError> {
    let snapshot = state.store.snapshot();
    let room = snapshot
        .room(&request.room)
        .ok_or_else(|| ApiError::RoomNotFound(request.room.clone()))?;

    let recorded_at = OffsetDateTime::now_utc();
    let record = LabelRecord::from_room(room, request.people, recorded_at);
    state.labels.append(&record).map_err(ApiError::Label)?;

    Ok((
        StatusCode::CREATED,
        Json(LabelResponse {
            saved: true,
            room: room.name.clone(),
            recorded_at,
        }),
    ))
}

/// API errors, rendered as structured JSON.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Room not found: {0}")]
    RoomNotFound(String),

    #[error("Sensor {kind} not found in room {room}")]
    SensorNotFound { room: String, kind: SensorKind },

    #[error("Unknown sensor kind: {0}")]
    UnknownKind(String),

    #[error("Failed to store label: {0}")]
    Label(roomsense_store::Error),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::RoomNotFound(_)
            | ApiError::SensorNotFound { .. }
            | ApiError::UnknownKind(_) => StatusCode::NOT_FOUND,
            ApiError::Label(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = Json(ErrorBody {
            error: self.to_string(),
        });
        (status, body).into_response()
    }
}

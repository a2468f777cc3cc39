//! Service configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use roomsense_core::OccupancyParams;
use roomsense_types::Room;

/// Service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server settings.
    pub server: ServerConfig,
    /// Refresh cadence and history range.
    pub refresh: RefreshConfig,
    /// Live-state source (Home-Assistant-style states endpoint).
    pub live_source: LiveSourceConfig,
    /// Historical source (InfluxDB 1.x query endpoint).
    pub history_source: HistorySourceConfig,
    /// CO2 occupancy model parameters.
    pub occupancy: OccupancyParams,
    /// Training-label log location.
    pub labels: LabelsConfig,
    /// Monitored rooms.
    pub rooms: Vec<RoomConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            refresh: RefreshConfig::default(),
            live_source: LiveSourceConfig::default(),
            history_source: HistorySourceConfig::default(),
            occupancy: OccupancyParams::default(),
            labels: LabelsConfig::default(),
            rooms: default_rooms(),
        }
    }
}

impl Config {
    /// Load configuration from the default path.
    pub fn load_default() -> Result<Self, ConfigError> {
        let path = default_config_path();
        if path.exists() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Read {
            path: path.as_ref().to_path_buf(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.as_ref().to_path_buf(),
            source: e,
        })
    }

    /// Save configuration to a file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self).map_err(ConfigError::Serialize)?;

        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Write {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        std::fs::write(path.as_ref(), content).map_err(|e| ConfigError::Write {
            path: path.as_ref().to_path_buf(),
            source: e,
        })
    }

    /// Validate the configuration and return any errors.
    ///
    /// This checks:
    /// - Server bind address is valid (host:port format)
    /// - Refresh interval is non-zero, history start hour is a valid hour
    /// - Room entities and names are non-empty, volumes non-negative
    /// - No duplicate room entity ids
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        errors.extend(self.server.validate());
        errors.extend(self.refresh.validate());

        let mut seen_entities = std::collections::HashSet::new();
        for (i, room) in self.rooms.iter().enumerate() {
            let prefix = format!("rooms[{i}]");
            errors.extend(room.validate(&prefix));

            if !seen_entities.insert(room.entity.to_lowercase()) {
                errors.push(ValidationError {
                    field: format!("{prefix}.entity"),
                    message: format!("duplicate room entity '{}'", room.entity),
                });
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Build the startup room set from the configuration.
    #[must_use]
    pub fn build_rooms(&self) -> Vec<Room> {
        self.rooms.iter().map(RoomConfig::to_room).collect()
    }
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1:8080").
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8080".to_string(),
        }
    }
}

impl ServerConfig {
    /// Validate server configuration.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if self.bind.is_empty() {
            errors.push(ValidationError {
                field: "server.bind".to_string(),
                message: "bind address cannot be empty".to_string(),
            });
        } else {
            let parts: Vec<&str> = self.bind.rsplitn(2, ':').collect();
            if parts.len() != 2 {
                errors.push(ValidationError {
                    field: "server.bind".to_string(),
                    message: format!(
                        "invalid bind address '{}': expected format 'host:port'",
                        self.bind
                    ),
                });
            } else {
                match parts[0].parse::<u16>() {
                    Ok(0) => {
                        errors.push(ValidationError {
                            field: "server.bind".to_string(),
                            message: "port cannot be 0".to_string(),
                        });
                    }
                    Err(_) => {
                        errors.push(ValidationError {
                            field: "server.bind".to_string(),
                            message: format!(
                                "invalid port '{}': must be a number 1-65535",
                                parts[0]
                            ),
                        });
                    }
                    Ok(_) => {}
                }
            }
        }

        errors
    }
}

/// Refresh cadence and history-query range.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RefreshConfig {
    /// Seconds between refresh ticks.
    pub interval_secs: u64,
    /// UTC hour the history query range starts at, each day.
    pub history_start_hour: u8,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval_secs: 60,
            history_start_hour: 6,
        }
    }
}

impl RefreshConfig {
    /// Validate refresh configuration.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if self.interval_secs == 0 {
            errors.push(ValidationError {
                field: "refresh.interval_secs".to_string(),
                message: "refresh interval cannot be 0".to_string(),
            });
        }
        if self.history_start_hour > 23 {
            errors.push(ValidationError {
                field: "refresh.history_start_hour".to_string(),
                message: format!(
                    "invalid hour {}: must be 0-23",
                    self.history_start_hour
                ),
            });
        }

        errors
    }
}

/// Live-state source settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LiveSourceConfig {
    /// States endpoint URL.
    pub url: String,
    /// Bearer token sent in the Authorization header.
    pub token: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for LiveSourceConfig {
    fn default() -> Self {
        Self {
            url: "http://homeassistant.local:8123/api/states".to_string(),
            token: String::new(),
            timeout_secs: 10,
        }
    }
}

/// Historical source settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HistorySourceConfig {
    /// InfluxDB base URL.
    pub url: String,
    /// Database name.
    pub database: String,
    /// Username, empty for no auth.
    pub username: String,
    /// Password, empty for no auth.
    pub password: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for HistorySourceConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:8086".to_string(),
            database: "home_assistant".to_string(),
            username: String::new(),
            password: String::new(),
            timeout_secs: 10,
        }
    }
}

/// Training-label log settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelsConfig {
    /// CSV file the labels are appended to.
    pub path: PathBuf,
}

impl Default for LabelsConfig {
    fn default() -> Self {
        Self {
            path: roomsense_store::default_labels_path(),
        }
    }
}

/// One monitored room.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomConfig {
    /// Multisensor entity id, e.g. "multisensor_115".
    pub entity: String,
    /// Display name.
    pub name: String,
    /// Room volume in m³; 0 for volumeless spaces.
    #[serde(default)]
    pub volume_m3: f64,
}

impl RoomConfig {
    fn to_room(&self) -> Room {
        Room::new(&self.name, &self.entity, self.volume_m3)
    }

    /// Validate one room entry.
    pub fn validate(&self, prefix: &str) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if self.entity.is_empty() {
            errors.push(ValidationError {
                field: format!("{prefix}.entity"),
                message: "entity id cannot be empty".to_string(),
            });
        }
        if self.name.is_empty() {
            errors.push(ValidationError {
                field: format!("{prefix}.name"),
                message: "room name cannot be empty".to_string(),
            });
        }
        if self.volume_m3 < 0.0 {
            errors.push(ValidationError {
                field: format!("{prefix}.volume_m3"),
                message: format!("volume cannot be negative (got {})", self.volume_m3),
            });
        }

        errors
    }
}

/// A single validation failure.
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// The configuration field that failed.
    pub field: String,
    /// Why it failed.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config from {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Failed to serialize config: {0}")]
    Serialize(toml::ser::Error),

    #[error("Failed to write config to {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid configuration: {}", format_validation_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ValidationError::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Default configuration path following platform conventions.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("roomsense")
        .join("config.toml")
}

/// The building's room registry: entity id, display name, and volume
/// (floor area × 3.2 m ceiling). Hallway and the printing space are open
/// connecting areas with no usable volume for the CO2 model.
fn default_rooms() -> Vec<RoomConfig> {
    let rooms: [(&str, &str, f64); 13] = [
        ("multisensor_115", "Conference-Space", 21.06 * 3.2),
        ("multisensor_108", "zwischen Conference-Space und Robot-Space", 14.04 * 3.2),
        ("multisensor_107", "Robot-Space", 30.03 * 3.2),
        ("multisensor_114", "Empfang", 31.27 * 3.2),
        ("multisensor_110", "zwischen Empfang und Focus-Space", 13.26 * 3.2),
        ("multisensor_109", "Focus-Space", 50.7 * 3.2),
        ("multisensor_104", "Experience-Hub", 88.27 * 3.2),
        ("multisensor_106", "Design-Thinking-Space", 43.86 * 3.2),
        ("multisensor_111", "Co-Working-Space (Left in Picture)", 48.0 * 3.2),
        ("multisensor_103", "Co-Working-Space (Right in Picture)", 46.35 * 3.2),
        ("multisensor_113", "Social Lounge", 34.74 * 3.2),
        ("multisensor_112", "Hallway", 0.0),
        ("multisensor_105", "3D Printing-Space", 0.0),
    ];

    rooms
        .into_iter()
        .map(|(entity, name, volume_m3)| RoomConfig {
            entity: entity.to_string(),
            name: name.to_string(),
            volume_m3,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        config.validate().expect("default config should be valid");
        assert_eq!(config.rooms.len(), 13);
        assert_eq!(config.refresh.interval_secs, 60);
    }

    #[test]
    fn test_validate_rejects_zero_interval() {
        let mut config = Config::default();
        config.refresh.interval_secs = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("interval"));
    }

    #[test]
    fn test_validate_rejects_port_zero() {
        let mut config = Config::default();
        config.server.bind = "127.0.0.1:0".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("port cannot be 0"));
    }

    #[test]
    fn test_validate_rejects_duplicate_entities() {
        let mut config = Config::default();
        let duplicate = config.rooms[0].clone();
        config.rooms.push(duplicate);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("duplicate room entity"));
    }

    #[test]
    fn test_validate_rejects_bad_hour() {
        let mut config = Config::default();
        config.refresh.history_start_hour = 24;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_build_rooms_carries_volumes() {
        let config = Config::default();
        let rooms = config.build_rooms();
        let conference = rooms.iter().find(|r| r.entity_id == "multisensor_115").unwrap();
        assert!((conference.volume_m3 - 67.392).abs() < 1e-9);
        let hallway = rooms.iter().find(|r| r.entity_id == "multisensor_112").unwrap();
        assert_eq!(hallway.volume_m3, 0.0);
    }

    #[test]
    fn test_toml_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.server.bind = "0.0.0.0:9090".to_string();
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.server.bind, "0.0.0.0:9090");
        assert_eq!(loaded.rooms.len(), 13);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[server]\nbind = \"0.0.0.0:8000\"\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.server.bind, "0.0.0.0:8000");
        assert_eq!(config.refresh.interval_secs, 60);
        assert_eq!(config.rooms.len(), 13);
    }
}

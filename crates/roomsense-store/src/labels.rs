//! Append-only training-label log.
//!
//! Every user-submitted ground-truth headcount is appended to a CSV file
//! together with the room's contemporaneous readings and volume, for a
//! future occupancy model to train on. Nothing in this repository reads
//! the file back; it is purely a sink.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use time::OffsetDateTime;

use roomsense_types::{Room, SensorKind, Value};

use crate::error::{Error, Result};

const HEADER: [&str; 11] = [
    "CO2",
    "Temperature",
    "Humidity",
    "IAQ",
    "Noise_Level",
    "Pressure",
    "Light_Level",
    "Gas_Resistance",
    "Room_Volume",
    "Datetime",
    "Label",
];

/// One training-label row.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelRecord {
    pub co2: Value,
    pub temperature: Value,
    pub humidity: Value,
    pub iaq: Value,
    pub noise_level: Value,
    pub pressure: Value,
    pub light_level: Value,
    pub gas_resistance: Value,
    pub room_volume: f64,
    pub recorded_at: OffsetDateTime,
    /// The user-supplied headcount.
    pub label: u32,
}

impl LabelRecord {
    /// Capture a room's contemporaneous readings together with the
    /// user-supplied headcount.
    #[must_use]
    pub fn from_room(room: &Room, label: u32, recorded_at: OffsetDateTime) -> Self {
        Self {
            co2: room.current(SensorKind::Co2),
            temperature: room.current(SensorKind::Temperature),
            humidity: room.current(SensorKind::Humidity),
            iaq: room.current(SensorKind::Iaq),
            noise_level: room.current(SensorKind::NoiseLevel),
            pressure: room.current(SensorKind::Pressure),
            light_level: room.current(SensorKind::Light),
            gas_resistance: room.current(SensorKind::GasResistance),
            room_volume: room.volume_m3,
            recorded_at,
            label,
        }
    }

    fn fields(&self) -> [String; 11] {
        [
            self.co2.to_string(),
            self.temperature.to_string(),
            self.humidity.to_string(),
            self.iaq.to_string(),
            self.noise_level.to_string(),
            self.pressure.to_string(),
            self.light_level.to_string(),
            self.gas_resistance.to_string(),
            self.room_volume.to_string(),
            format_datetime(self.recorded_at),
            self.label.to_string(),
        ]
    }
}

/// Appender for the training-label CSV.
#[derive(Debug, Clone)]
pub struct LabelLog {
    path: PathBuf,
}

impl LabelLog {
    /// Create a log writing to `path`. The file is created lazily on the
    /// first append.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Create a log at the platform default location.
    #[must_use]
    pub fn default_location() -> Self {
        Self::new(crate::default_labels_path())
    }

    /// The log file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record, writing the header first if the file is new.
    pub fn append(&self, record: &LabelRecord) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|source| Error::CreateDirectory {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        let is_new = !self.path.exists();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|source| Error::OpenLog {
                path: self.path.clone(),
                source,
            })?;

        let mut writer = csv::Writer::from_writer(file);
        if is_new {
            writer.write_record(HEADER)?;
        }
        writer.write_record(record.fields())?;
        writer.flush()?;
        Ok(())
    }
}

fn format_datetime(ts: OffsetDateTime) -> String {
    format!(
        "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
        ts.year(),
        u8::from(ts.month()),
        ts.day(),
        ts.hour(),
        ts.minute(),
        ts.second()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> LabelRecord {
        let mut room = Room::new("Social Lounge", "multisensor_113", 111.17);
        room.sensor_mut(SensorKind::Co2).current = Value::Known(820.0);
        room.sensor_mut(SensorKind::Temperature).current = Value::Known(22.5);
        LabelRecord::from_room(
            &room,
            4,
            OffsetDateTime::from_unix_timestamp(1_700_049_600).unwrap(),
        )
    }

    #[test]
    fn test_header_written_exactly_once() {
        let dir = tempfile::tempdir().unwrap();
        let log = LabelLog::new(dir.path().join("training_data.csv"));

        log.append(&record()).unwrap();
        log.append(&record()).unwrap();

        let contents = std::fs::read_to_string(log.path()).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("CO2,Temperature,Humidity"));
        assert!(!lines[1].starts_with("CO2,"));
    }

    #[test]
    fn test_row_contents() {
        let dir = tempfile::tempdir().unwrap();
        let log = LabelLog::new(dir.path().join("training_data.csv"));

        log.append(&record()).unwrap();

        let contents = std::fs::read_to_string(log.path()).unwrap();
        let row = contents.lines().nth(1).unwrap();
        assert!(row.starts_with("820,22.5,unknown,"));
        assert!(row.contains("111.17"));
        assert!(row.contains("2023-11-15 12:00:00"));
        assert!(row.ends_with(",4"));
    }

    #[test]
    fn test_creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let log = LabelLog::new(dir.path().join("nested").join("labels.csv"));

        log.append(&record()).unwrap();
        assert!(log.path().exists());
    }

    #[test]
    fn test_from_room_captures_volume_and_values() {
        let r = record();
        assert_eq!(r.room_volume, 111.17);
        assert_eq!(r.co2, Value::Known(820.0));
        assert_eq!(r.humidity, Value::Unknown);
        assert_eq!(r.label, 4);
    }
}

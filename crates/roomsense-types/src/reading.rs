//! Current values, historical samples, and forecast points.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use time::OffsetDateTime;

use crate::error::ParseError;

/// A current sensor value.
///
/// The external sources report a sensor without a measurement as the literal
/// state `"unknown"` (or `"unavailable"` while an entity is offline). That
/// state must stay distinguishable from a numeric zero, so it is modeled as
/// its own variant rather than a sentinel number.
///
/// Serialized as the number itself, or `null` when unknown.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Value {
    /// A measured value.
    Known(f64),
    /// No measurement is currently available.
    #[default]
    Unknown,
}

impl Value {
    /// Decode a raw state string from a data source.
    ///
    /// Accepts numeric text, or (case-insensitively) `"unknown"`,
    /// `"unavailable"`, and `"none"` as [`Value::Unknown`].
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::InvalidValue`] for anything else. This is a
    /// contract violation by the source, not an expected runtime state.
    ///
    /// # Examples
    ///
    /// ```
    /// use roomsense_types::Value;
    ///
    /// assert_eq!(Value::parse("21.5").unwrap(), Value::Known(21.5));
    /// assert_eq!(Value::parse("unknown").unwrap(), Value::Unknown);
    /// assert!(Value::parse("n/a").is_err());
    /// ```
    pub fn parse(raw: &str) -> Result<Self, ParseError> {
        let trimmed = raw.trim();
        if trimmed.eq_ignore_ascii_case("unknown")
            || trimmed.eq_ignore_ascii_case("unavailable")
            || trimmed.eq_ignore_ascii_case("none")
        {
            return Ok(Value::Unknown);
        }
        trimmed
            .parse::<f64>()
            .map(Value::Known)
            .map_err(|_| ParseError::InvalidValue(raw.to_string()))
    }

    /// The numeric value, if one is known.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Known(v) => Some(*v),
            Value::Unknown => None,
        }
    }

    /// Whether a measurement is available.
    #[must_use]
    pub fn is_known(&self) -> bool {
        matches!(self, Value::Known(_))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Known(v)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Known(v) => write!(f, "{v}"),
            Value::Unknown => f.write_str("unknown"),
        }
    }
}

#[cfg(feature = "serde")]
impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Known(v) => serializer.serialize_some(v),
            Value::Unknown => serializer.serialize_none(),
        }
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let opt = Option::<f64>::deserialize(deserializer)?;
        Ok(opt.map_or(Value::Unknown, Value::Known))
    }
}

/// One timestamped historical reading.
///
/// History only ever contains measured values; the unknown state occurs in
/// current values alone.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Sample {
    /// The measured value.
    pub value: f64,
    /// When the value was recorded.
    #[cfg_attr(feature = "serde", serde(with = "time::serde::rfc3339"))]
    pub timestamp: OffsetDateTime,
}

impl Sample {
    /// Create a sample.
    #[must_use]
    pub fn new(value: f64, timestamp: OffsetDateTime) -> Self {
        Self { value, timestamp }
    }
}

/// Time-ordered history for one (room, sensor) pair.
///
/// Samples are kept in timestamp-ascending order; duplicate timestamps are
/// permitted and not deduplicated. The sources occasionally deliver entries
/// stamped in the future (clock skew on the recording side); those are kept
/// in the series but excluded by [`SensorSeries::samples_until`], which is
/// what forecasting and display read from.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct SensorSeries {
    samples: Vec<Sample>,
}

impl SensorSeries {
    /// Create an empty series.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a series from samples, sorting them by timestamp.
    ///
    /// The sort is stable, so same-timestamp duplicates keep their source
    /// order.
    #[must_use]
    pub fn from_samples(mut samples: Vec<Sample>) -> Self {
        samples.sort_by_key(|s| s.timestamp);
        Self { samples }
    }

    /// Append a sample, keeping the ascending-timestamp invariant.
    ///
    /// Out-of-order arrivals are inserted at their sorted position (after
    /// any equal timestamps already present).
    pub fn push(&mut self, sample: Sample) {
        let at = self
            .samples
            .partition_point(|s| s.timestamp <= sample.timestamp);
        self.samples.insert(at, sample);
    }

    /// All samples, oldest first.
    #[must_use]
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// The samples recorded at or before `now`.
    ///
    /// Future-stamped entries must not reach the forecaster or the
    /// dashboard; this is the accessor both read through.
    #[must_use]
    pub fn samples_until(&self, now: OffsetDateTime) -> &[Sample] {
        let end = self.samples.partition_point(|s| s.timestamp <= now);
        &self.samples[..end]
    }

    /// The most recent sample, if any.
    #[must_use]
    pub fn last(&self) -> Option<&Sample> {
        self.samples.last()
    }

    /// Number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the series is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Drop all samples.
    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

/// One projected future reading.
///
/// Predictions are clamped to a floor of zero before they are stored here;
/// the physical quantities tracked are non-negative by convention.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ForecastPoint {
    /// The future instant the prediction applies to.
    #[cfg_attr(feature = "serde", serde(with = "time::serde::rfc3339"))]
    pub timestamp: OffsetDateTime,
    /// The predicted value, >= 0.
    pub predicted: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Duration;

    fn ts(secs: i64) -> OffsetDateTime {
        OffsetDateTime::from_unix_timestamp(1_700_000_000 + secs).unwrap()
    }

    #[test]
    fn test_value_parse_numbers() {
        assert_eq!(Value::parse("450").unwrap(), Value::Known(450.0));
        assert_eq!(Value::parse(" 21.5 ").unwrap(), Value::Known(21.5));
        assert_eq!(Value::parse("-3.2").unwrap(), Value::Known(-3.2));
    }

    #[test]
    fn test_value_parse_sentinels() {
        assert_eq!(Value::parse("unknown").unwrap(), Value::Unknown);
        assert_eq!(Value::parse("Unavailable").unwrap(), Value::Unknown);
        assert_eq!(Value::parse("None").unwrap(), Value::Unknown);
    }

    #[test]
    fn test_value_parse_rejects_garbage() {
        let err = Value::parse("n/a").unwrap_err();
        assert!(err.to_string().contains("n/a"));
    }

    #[test]
    fn test_value_serde() {
        assert_eq!(serde_json::to_string(&Value::Known(42.5)).unwrap(), "42.5");
        assert_eq!(serde_json::to_string(&Value::Unknown).unwrap(), "null");
        assert_eq!(serde_json::from_str::<Value>("null").unwrap(), Value::Unknown);
        assert_eq!(serde_json::from_str::<Value>("7.0").unwrap(), Value::Known(7.0));
    }

    #[test]
    fn test_series_push_keeps_order() {
        let mut series = SensorSeries::new();
        series.push(Sample::new(2.0, ts(120)));
        series.push(Sample::new(1.0, ts(60)));
        series.push(Sample::new(3.0, ts(180)));

        let values: Vec<f64> = series.samples().iter().map(|s| s.value).collect();
        assert_eq!(values, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_series_allows_duplicate_timestamps() {
        let mut series = SensorSeries::new();
        series.push(Sample::new(1.0, ts(60)));
        series.push(Sample::new(2.0, ts(60)));
        assert_eq!(series.len(), 2);
    }

    #[test]
    fn test_samples_until_excludes_future() {
        let series = SensorSeries::from_samples(vec![
            Sample::new(1.0, ts(0)),
            Sample::new(2.0, ts(60)),
            Sample::new(3.0, ts(60) + Duration::hours(5)),
        ]);

        let visible = series.samples_until(ts(120));
        assert_eq!(visible.len(), 2);
        assert_eq!(visible.last().unwrap().value, 2.0);
    }

    #[test]
    fn test_samples_until_boundary_is_inclusive() {
        let series = SensorSeries::from_samples(vec![Sample::new(1.0, ts(60))]);
        assert_eq!(series.samples_until(ts(60)).len(), 1);
        assert_eq!(series.samples_until(ts(59)).len(), 0);
    }

    #[test]
    fn test_from_samples_sorts() {
        let series = SensorSeries::from_samples(vec![
            Sample::new(3.0, ts(180)),
            Sample::new(1.0, ts(0)),
            Sample::new(2.0, ts(90)),
        ]);
        let values: Vec<f64> = series.samples().iter().map(|s| s.value).collect();
        assert_eq!(values, vec![1.0, 2.0, 3.0]);
    }
}

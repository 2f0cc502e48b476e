//! Typing log record types

use chrono::{DateTime, NaiveDateTime};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One key activation as written by the capturing tool.
///
/// Every field is optional: older log versions omit some of them, and the
/// analyzers check [`Dataset::has`](super::Dataset::has) before relying on one.
/// A value of the wrong type (or an unparseable timestamp) reads as `None`
/// for that field only; the rest of the record is kept.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct TypingEvent {
    /// Run of the capturing tool this event belongs to
    #[serde(deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    /// Wall-clock time as recorded (no timezone normalisation)
    #[serde(
        deserialize_with = "deserialize_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub timestamp: Option<NaiveDateTime>,
    /// Held trigger key (e.g. "Space")
    #[serde(deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub activation_key_name: Option<String>,
    /// Key pressed while the trigger was held (e.g. "P")
    #[serde(deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub source_key_name: Option<String>,
    /// Remapped output key (e.g. "Backspace")
    #[serde(deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub target_key_name: Option<String>,
    /// Key pressed immediately before this one
    #[serde(deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub previous_key: Option<String>,
    /// Milliseconds between activation-key press and this key
    #[serde(deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub elapsed_ms: Option<f64>,
    /// Milliseconds since the previous key event
    #[serde(deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub time_since_last_key: Option<f64>,
    #[serde(deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub marked_as_mistake: Option<bool>,
    #[serde(deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub rollover_detected: Option<bool>,
    /// "mapped", "rollover" or "unmapped"
    #[serde(deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub event_type: Option<String>,
    #[serde(deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub process_name: Option<String>,
    #[serde(deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub training_mode: Option<bool>,
}

/// Placeholder used in key pairs when there is no previous key.
pub const START_OF_SEQUENCE: &str = "(start)";

impl TypingEvent {
    /// "Activation + Source" label, if both key names are known.
    pub fn key_combo(&self) -> Option<String> {
        match (&self.activation_key_name, &self.source_key_name) {
            (Some(activation), Some(source)) => Some(format!("{} + {}", activation, source)),
            _ => None,
        }
    }

    /// "Previous → Source" label. A missing or blank previous key becomes
    /// [`START_OF_SEQUENCE`].
    pub fn key_pair(&self) -> Option<String> {
        let source = self.source_key_name.as_ref()?;
        let previous = self
            .previous_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .unwrap_or(START_OF_SEQUENCE);
        Some(format!("{} → {}", previous, source))
    }

    /// Hour of day (0-23) of the recorded timestamp.
    pub fn hour(&self) -> Option<u32> {
        use chrono::Timelike;
        self.timestamp.map(|ts| ts.hour())
    }

    /// Whether this record carries a non-null value for `field`.
    pub fn has(&self, field: Field) -> bool {
        match field {
            Field::SessionId => self.session_id.is_some(),
            Field::Timestamp => self.timestamp.is_some(),
            Field::ActivationKeyName => self.activation_key_name.is_some(),
            Field::SourceKeyName => self.source_key_name.is_some(),
            Field::TargetKeyName => self.target_key_name.is_some(),
            Field::PreviousKey => self.previous_key.is_some(),
            Field::ElapsedMs => self.elapsed_ms.is_some(),
            Field::TimeSinceLastKey => self.time_since_last_key.is_some(),
            Field::MarkedAsMistake => self.marked_as_mistake.is_some(),
            Field::RolloverDetected => self.rollover_detected.is_some(),
            Field::EventType => self.event_type.is_some(),
            Field::ProcessName => self.process_name.is_some(),
            Field::TrainingMode => self.training_mode.is_some(),
        }
    }
}

/// Known log columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    SessionId,
    Timestamp,
    ActivationKeyName,
    SourceKeyName,
    TargetKeyName,
    PreviousKey,
    ElapsedMs,
    TimeSinceLastKey,
    MarkedAsMistake,
    RolloverDetected,
    EventType,
    ProcessName,
    TrainingMode,
}

impl Field {
    /// Column name as it appears in the log.
    pub fn key(&self) -> &'static str {
        match self {
            Self::SessionId => "SessionId",
            Self::Timestamp => "Timestamp",
            Self::ActivationKeyName => "ActivationKeyName",
            Self::SourceKeyName => "SourceKeyName",
            Self::TargetKeyName => "TargetKeyName",
            Self::PreviousKey => "PreviousKey",
            Self::ElapsedMs => "ElapsedMs",
            Self::TimeSinceLastKey => "TimeSinceLastKey",
            Self::MarkedAsMistake => "MarkedAsMistake",
            Self::RolloverDetected => "RolloverDetected",
            Self::EventType => "EventType",
            Self::ProcessName => "ProcessName",
            Self::TrainingMode => "TrainingMode",
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parses a log timestamp, keeping the wall-clock time as written.
///
/// Offsets such as `Z` or `+09:00` are accepted but dropped, so the hour of
/// `2025-01-15T09:30:00+09:00` is 9.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

/// Reads any JSON value, keeping it only if it has the expected type.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value::<Option<T>>(value).ok().flatten())
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_str().and_then(parse_timestamp))
}

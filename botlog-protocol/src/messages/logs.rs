use crate::identity::DeviceIdentity;
use log::debug;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// A payload published on a device's log topic
#[derive(Clone, Debug)]
pub struct LogMsg {
    /// The publishing device
    pub device: DeviceIdentity,

    /// The raw payload. Use [`is_log`] before trusting its shape
    pub body: Value,
}

/// A single log record emitted by the device
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Log {
    /// Database ID, present once the log was persisted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    /// Severity/category tag (e.g. "error", "success")
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub log_type: Option<String>,

    /// Free text
    pub message: String,

    /// Names of the delivery channels (e.g. "toast", "espeak")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channels: Option<Vec<String>>,

    /// Legacy fields, from firmware versions which nested them under "meta"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Map<String, Value>>,

    /// X position when the log was emitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,

    /// Y position when the log was emitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,

    /// Z position when the log was emitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<f64>,

    /// Verbosity level
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verbosity: Option<i64>,

    /// Firmware major version
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub major_version: Option<i64>,

    /// Firmware minor version
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minor_version: Option<i64>,

    /// Creation time, in seconds since the epoch
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
}

/// TRUE if the payload has the shape of a log record:
/// a JSON object with a string "message"
pub fn is_log(value: &Value) -> bool {
    match value.get("message") {
        Some(message) => value.is_object() && message.is_string(),
        None => false,
    }
}

/// Fields which older firmware nested under "meta", now expected at the top level
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum LegacyField {
    /// "type"
    Type,
    /// "x"
    X,
    /// "y"
    Y,
    /// "z"
    Z,
    /// "verbosity"
    Verbosity,
    /// "major_version"
    MajorVersion,
    /// "minor_version"
    MinorVersion,
}

impl LegacyField {
    /// All the legacy fields
    pub const ALL: [LegacyField; 7] = [
        LegacyField::Type,
        LegacyField::X,
        LegacyField::Y,
        LegacyField::Z,
        LegacyField::Verbosity,
        LegacyField::MajorVersion,
        LegacyField::MinorVersion,
    ];

    /// The field's name, both at the top level and under "meta"
    pub fn name(self) -> &'static str {
        match self {
            LegacyField::Type => "type",
            LegacyField::X => "x",
            LegacyField::Y => "y",
            LegacyField::Z => "z",
            LegacyField::Verbosity => "verbosity",
            LegacyField::MajorVersion => "major_version",
            LegacyField::MinorVersion => "minor_version",
        }
    }
}

impl fmt::Display for LegacyField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl Log {
    /// Decodes a log record from a raw payload.
    /// Returns None for payloads which are not log-shaped.
    /// Optional fields of an unexpected type are dropped, the rest of the log is kept.
    pub fn from_value(value: &Value) -> Option<Log> {
        if !is_log(value) {
            return None;
        }

        let fields = value.as_object()?;
        let message = fields.get("message")?.as_str()?.to_owned();

        Some(Log {
            id: decode_field(fields, "id"),
            log_type: decode_field(fields, "type"),
            message,
            channels: decode_channels(fields),
            meta: decode_meta(fields),
            x: decode_field(fields, "x"),
            y: decode_field(fields, "y"),
            z: decode_field(fields, "z"),
            verbosity: decode_field(fields, "verbosity"),
            major_version: decode_field(fields, "major_version"),
            minor_version: decode_field(fields, "minor_version"),
            created_at: decode_field(fields, "created_at"),
        })
    }

    /// Copies every absent legacy field from "meta".
    /// Present values are kept even if they are zero, false or empty.
    pub fn backfill_legacy_fields(mut self) -> Log {
        for field in LegacyField::ALL.iter() {
            self.backfill(*field);
        }
        self
    }

    fn backfill(&mut self, field: LegacyField) {
        let meta = self.meta.as_ref();
        match field {
            LegacyField::Type => fill_from_meta(&mut self.log_type, meta, field),
            LegacyField::X => fill_from_meta(&mut self.x, meta, field),
            LegacyField::Y => fill_from_meta(&mut self.y, meta, field),
            LegacyField::Z => fill_from_meta(&mut self.z, meta, field),
            LegacyField::Verbosity => fill_from_meta(&mut self.verbosity, meta, field),
            LegacyField::MajorVersion => fill_from_meta(&mut self.major_version, meta, field),
            LegacyField::MinorVersion => fill_from_meta(&mut self.minor_version, meta, field),
        }
    }

    /// TRUE if the channel name appears in the log's channels
    pub fn has_channel(&self, name: &str) -> bool {
        match &self.channels {
            Some(channels) => channels.iter().any(|c| c == name),
            None => false,
        }
    }

    /// The log type, if it is a known one
    pub fn kind(&self) -> Option<LogType> {
        self.log_type.as_deref().and_then(LogType::from_name)
    }
}

fn fill_from_meta<T: DeserializeOwned>(
    slot: &mut Option<T>,
    meta: Option<&Map<String, Value>>,
    field: LegacyField,
) {
    if slot.is_some() {
        return;
    }

    if let Some(meta) = meta {
        *slot = decode_field(meta, field.name());
    }
}

/// Absent, null and mistyped values all decode to None
fn decode_field<T: DeserializeOwned>(fields: &Map<String, Value>, name: &str) -> Option<T> {
    let value = fields.get(name)?;
    if value.is_null() {
        return None;
    }

    match serde_json::from_value(value.clone()) {
        Ok(v) => Some(v),
        Err(_e) => {
            debug!("Ignoring {} of unexpected type: {}", name, value);
            None
        }
    }
}

fn decode_channels(fields: &Map<String, Value>) -> Option<Vec<String>> {
    match fields.get("channels")? {
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(|item| match item.as_str() {
                    Some(name) => Some(name.to_owned()),
                    None => {
                        debug!("Ignoring channel of unexpected type: {}", item);
                        None
                    }
                })
                .collect(),
        ),
        Value::Null => None,
        other => {
            debug!("Ignoring channels of unexpected type: {}", other);
            None
        }
    }
}

fn decode_meta(fields: &Map<String, Value>) -> Option<Map<String, Value>> {
    match fields.get("meta")? {
        Value::Object(meta) => Some(meta.clone()),
        Value::Null => None,
        other => {
            debug!("Ignoring meta of unexpected type: {}", other);
            None
        }
    }
}

/// Known log types
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LogType {
    /// "success"
    Success,
    /// "busy"
    Busy,
    /// "warn"
    Warn,
    /// "error"
    Error,
    /// "info"
    Info,
    /// "fun"
    Fun,
    /// "debug"
    Debug,
    /// "assertion"
    Assertion,
}

impl LogType {
    /// Parses a log type name
    pub fn from_name(name: &str) -> Option<LogType> {
        match name {
            "success" => Some(LogType::Success),
            "busy" => Some(LogType::Busy),
            "warn" => Some(LogType::Warn),
            "error" => Some(LogType::Error),
            "info" => Some(LogType::Info),
            "fun" => Some(LogType::Fun),
            "debug" => Some(LogType::Debug),
            "assertion" => Some(LogType::Assertion),
            _other => None,
        }
    }
}

/// Known delivery channels
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum LogChannel {
    /// On-screen notification
    Toast,
    /// Speech synthesis
    Espeak,
    /// Email digest
    Email,
    /// Immediate email
    FatalEmail,
    /// Status ticker
    Ticker,
}

impl LogChannel {
    /// The channel's wire name
    pub fn name(self) -> &'static str {
        match self {
            LogChannel::Toast => "toast",
            LogChannel::Espeak => "espeak",
            LogChannel::Email => "email",
            LogChannel::FatalEmail => "fatal_email",
            LogChannel::Ticker => "ticker",
        }
    }

    /// Parses a channel's wire name
    pub fn from_name(name: &str) -> Option<LogChannel> {
        match name {
            "toast" => Some(LogChannel::Toast),
            "espeak" => Some(LogChannel::Espeak),
            "email" => Some(LogChannel::Email),
            "fatal_email" => Some(LogChannel::FatalEmail),
            "ticker" => Some(LogChannel::Ticker),
            _other => None,
        }
    }
}

impl fmt::Display for LogChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decode(value: Value) -> Log {
        Log::from_value(&value).unwrap()
    }

    #[test]
    fn test_is_log() {
        assert!(is_log(&json!({ "message": "hello" })));
        assert!(is_log(&json!({ "message": "", "type": "info" })));
        assert!(!is_log(&json!({ "message": 5 })));
        assert!(!is_log(&json!({ "msg": "hello" })));
        assert!(!is_log(&json!(["message"])));
        assert!(!is_log(&json!("message")));
        assert!(!is_log(&Value::Null));
    }

    #[test]
    fn test_from_value_drops_mistyped_fields() {
        let log = decode(json!({
            "type": "error",
            "message": "Pump is offline",
            "x": "far",
            "verbosity": 1.5,
            "channels": ["toast", 3, null, "espeak"],
            "meta": "legacy",
            "created_at": 1500000000
        }));

        assert_eq!(log.log_type.as_deref(), Some("error"));
        assert_eq!(log.message, "Pump is offline");
        assert_eq!(log.x, None);
        assert_eq!(log.verbosity, None);
        assert_eq!(
            log.channels,
            Some(vec!["toast".to_owned(), "espeak".to_owned()])
        );
        assert_eq!(log.meta, None);
        assert_eq!(log.created_at, Some(1500000000));

        let log = decode(json!({ "message": "m", "type": 7, "channels": "toast" }));
        assert_eq!(log.log_type, None);
        assert_eq!(log.channels, None);
    }

    #[test]
    fn test_backfill_from_meta() {
        let log = decode(json!({
            "message": "moving",
            "meta": {
                "type": "busy",
                "x": 5, "y": 6.5, "z": -1,
                "verbosity": 2,
                "major_version": 8, "minor_version": 1
            }
        }))
        .backfill_legacy_fields();

        assert_eq!(log.log_type.as_deref(), Some("busy"));
        assert_eq!(log.x, Some(5.0));
        assert_eq!(log.y, Some(6.5));
        assert_eq!(log.z, Some(-1.0));
        assert_eq!(log.verbosity, Some(2));
        assert_eq!(log.major_version, Some(8));
        assert_eq!(log.minor_version, Some(1));
    }

    #[test]
    fn test_backfill_keeps_present_zero_and_empty_values() {
        let log = decode(json!({
            "message": "moving",
            "type": "",
            "x": 0, "verbosity": 0, "major_version": 0,
            "meta": { "type": "error", "x": 5, "verbosity": 3, "major_version": 9 }
        }))
        .backfill_legacy_fields();

        assert_eq!(log.log_type.as_deref(), Some(""));
        assert_eq!(log.x, Some(0.0));
        assert_eq!(log.verbosity, Some(0));
        assert_eq!(log.major_version, Some(0));
    }

    #[test]
    fn test_backfill_without_meta() {
        let log = decode(json!({ "message": "hi", "y": 3 })).backfill_legacy_fields();
        assert_eq!(log.x, None);
        assert_eq!(log.y, Some(3.0));
        assert_eq!(log.log_type, None);
    }

    #[test]
    fn test_backfill_ignores_mistyped_meta() {
        let log = decode(json!({ "message": "hi", "meta": { "x": "left", "verbosity": null } }))
            .backfill_legacy_fields();
        assert_eq!(log.x, None);
        assert_eq!(log.verbosity, None);
    }

    #[test]
    fn test_backfill_idempotent() {
        let once = decode(json!({
            "message": "hi",
            "z": 0,
            "meta": { "x": 1, "z": 4, "minor_version": 2 }
        }))
        .backfill_legacy_fields();
        let twice = once.clone().backfill_legacy_fields();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_has_channel() {
        let log = decode(json!({ "message": "hi", "channels": ["toast", "toast", "email"] }));
        assert!(log.has_channel("toast"));
        assert!(log.has_channel("email"));
        assert!(!log.has_channel("espeak"));

        let log = decode(json!({ "message": "hi" }));
        assert!(!log.has_channel("toast"));
    }

    #[test]
    fn test_names_round_trip() {
        for field in LegacyField::ALL.iter() {
            assert!(!field.name().is_empty());
        }
        assert_eq!(LogChannel::from_name("fatal_email"), Some(LogChannel::FatalEmail));
        assert_eq!(LogChannel::from_name("sms"), None);
        assert_eq!(LogType::from_name("warn"), Some(LogType::Warn));
        assert_eq!(LogType::from_name("WARN"), None);
    }

    #[test]
    fn test_serialize_uses_wire_names() {
        let log = decode(json!({ "message": "hi", "type": "info" }));
        let value = serde_json::to_value(&log).unwrap();
        assert_eq!(value, json!({ "message": "hi", "type": "info" }));
    }
}

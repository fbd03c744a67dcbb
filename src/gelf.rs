//! Contains common definitions for building GELF payloads.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// GELF Message fields. Definitions from <https://docs.graylog.org/docs/gelf>.
pub mod gelf_fields {

    /// (not a field) The latest version of the GELF specification.
    pub const GELF_VERSION: &str = "1.1";

    /// (required) GELF spec version
    pub const VERSION: &str = "version";

    /// (required) The name of the host, source or application that sent this message.
    pub const HOST: &str = "host";

    /// (required) A short descriptive message.
    pub const SHORT_MESSAGE: &str = "short_message";

    /// (optional) A long message that can i.e. contain a backtrace
    pub const FULL_MESSAGE: &str = "full_message";

    /// (optional) Seconds since UNIX epoch with optional decimal places for milliseconds.
    pub const TIMESTAMP: &str = "timestamp";

    /// (optional) The level equal to the standard syslog levels. default is 1 (ALERT).
    pub const LEVEL: &str = "level";

    // < Every field with an underscore (_) prefix will be treated as an additional field. >
}

use gelf_fields::GELF_VERSION;

/// A minimal GELF 1.1 message.
///
/// The writer itself sends arbitrary bytes; this is a convenience for producing a
/// well-formed payload.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct GelfMessage {
    version: &'static str,
    host: String,
    short_message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    full_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    timestamp: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    level: Option<u8>,
    #[serde(flatten)]
    additional: BTreeMap<String, serde_json::Value>,
}

impl GelfMessage {
    pub fn new(host: impl Into<String>, short_message: impl Into<String>) -> Self {
        Self {
            version: GELF_VERSION,
            host: host.into(),
            short_message: short_message.into(),
            full_message: None,
            timestamp: None,
            level: None,
            additional: BTreeMap::new(),
        }
    }

    pub fn with_full_message(mut self, full_message: impl Into<String>) -> Self {
        self.full_message = Some(full_message.into());
        self
    }

    /// Sets the timestamp, kept to millisecond precision.
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp.timestamp_millis() as f64 / 1000.0);
        self
    }

    /// Syslog severity, 0 (emergency) through 7 (debug).
    pub fn with_level(mut self, level: u8) -> Self {
        self.level = Some(level);
        self
    }

    /// Adds an additional field. The `_` prefix GELF requires is added when missing.
    pub fn with_field(mut self, name: &str, value: impl Into<serde_json::Value>) -> Self {
        let name = if name.starts_with('_') {
            name.to_owned()
        } else {
            format!("_{name}")
        };
        self.additional.insert(name, value.into());
        self
    }

    /// Renders the message as JSON.
    pub fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use serde_json::json;
    use similar_asserts::assert_eq;

    use super::{GelfMessage, gelf_fields::*};

    #[test]
    fn minimal_message() {
        let bytes = GelfMessage::new("h", "Test Message").to_bytes().unwrap();
        assert_eq!(
            bytes,
            br#"{"version":"1.1","host":"h","short_message":"Test Message"}"#.to_vec()
        );
    }

    #[test]
    fn full_message() {
        let timestamp = Utc.timestamp_millis_opt(1_385_053_862_500).unwrap();
        let message = GelfMessage::new("example.org", "A short message")
            .with_full_message("Backtrace here\n\nmore stuff")
            .with_timestamp(timestamp)
            .with_level(1)
            .with_field("user_id", 9001)
            .with_field("_some_info", "foo");

        let value: serde_json::Value = serde_json::from_slice(&message.to_bytes().unwrap()).unwrap();
        assert_eq!(
            value,
            json!({
                VERSION: GELF_VERSION,
                HOST: "example.org",
                SHORT_MESSAGE: "A short message",
                FULL_MESSAGE: "Backtrace here\n\nmore stuff",
                TIMESTAMP: 1385053862.5,
                LEVEL: 1,
                "_user_id": 9001,
                "_some_info": "foo",
            })
        );
    }
}

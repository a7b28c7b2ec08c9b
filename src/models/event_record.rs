use derive_more::Display;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::utils;

#[derive(Debug, Display, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecordKind {
    #[display("URL_VERIFICATION")]
    UrlVerification,
    #[display("EVENT_RECEIVED")]
    EventReceived,
    #[display("ERROR")]
    Error,
}

/// One entry of the in-memory diagnostic log.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    pub timestamp: String,
    #[serde(rename = "type")]
    pub kind: RecordKind,
    pub method: String,
    pub payload: Value,
    pub source_ip: String,
}

impl EventRecord {
    pub fn new(kind: RecordKind, method: &str, payload: Value, source_ip: &str) -> Self {
        Self {
            timestamp: utils::now_iso_timestamp(),
            kind,
            method: method.to_string(),
            payload,
            source_ip: source_ip.to_string(),
        }
    }

    pub fn url_verification(query: Value, source_ip: &str) -> Self {
        Self::new(RecordKind::UrlVerification, "GET", query, source_ip)
    }

    pub fn event_received(method: &str, body: Value, source_ip: &str) -> Self {
        Self::new(RecordKind::EventReceived, method, body, source_ip)
    }

    /// Error records carry the failure message and whatever trace was captured
    pub fn error(method: &str, error: &str, stack: &str, source_ip: &str) -> Self {
        Self::new(
            RecordKind::Error,
            method,
            json!({ "error": error, "stack": stack }),
            source_ip,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_serializes_with_wire_names() {
        let record = EventRecord::event_received(
            "POST",
            json!({"eventType": "VISITOR_ARRIVAL"}),
            "10.0.0.1",
        );

        let value = serde_json::to_value(&record).unwrap();

        assert_eq!(value["type"], "EVENT_RECEIVED");
        assert_eq!(value["method"], "POST");
        assert_eq!(value["sourceIp"], "10.0.0.1");
        assert_eq!(value["payload"]["eventType"], "VISITOR_ARRIVAL");
        assert!(chrono::DateTime::parse_from_rfc3339(value["timestamp"].as_str().unwrap()).is_ok());
    }

    #[test]
    fn test_error_record_payload() {
        let record = EventRecord::error("POST", "boom", "at handler", "unknown");

        assert_eq!(record.kind, RecordKind::Error);
        assert_eq!(record.payload, json!({"error": "boom", "stack": "at handler"}));
        assert_eq!(record.kind.to_string(), "ERROR");
    }
}

//! Payloads pushed by the HikVision event subscription.
//!
//! Only `eventType` is structurally significant. Known kinds are parsed into
//! typed variants, everything else lands in [InboundEvent::Unknown] with the raw
//! payload so nothing is dropped on the floor.

use derive_more::Display;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;

/// Query parameters of the URL ownership challenge.
///
/// `signature` is accepted but never validated, the platform's signing
/// scheme is not implemented.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct VerificationQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nonce: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub echostr: Option<String>,
}

impl VerificationQuery {
    /// The challenge token, ignoring an empty `echostr=`
    pub fn challenge(&self) -> Option<&str> {
        self.echostr.as_deref().filter(|echostr| !echostr.is_empty())
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VisitorArrival {
    pub visitor_name: Option<String>,
    pub visit_time: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VisitorLeave {
    pub visitor_name: Option<String>,
    pub leave_time: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeviceStatusChange {
    pub device_id: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    #[display("VISITOR_ARRIVAL")]
    VisitorArrival,
    #[display("VISITOR_LEAVE")]
    VisitorLeave,
    #[display("PERMISSION_GROUP_UPDATE")]
    PermissionGroupUpdate,
    #[display("DEVICE_STATUS_CHANGE")]
    DeviceStatusChange,
    #[display("UNKNOWN")]
    Unknown,
}

impl EventKind {
    pub fn from_event_type(event_type: &str) -> Self {
        match event_type {
            "VISITOR_ARRIVAL" => Self::VisitorArrival,
            "VISITOR_LEAVE" => Self::VisitorLeave,
            "PERMISSION_GROUP_UPDATE" => Self::PermissionGroupUpdate,
            "DEVICE_STATUS_CHANGE" => Self::DeviceStatusChange,
            _ => Self::Unknown,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum InboundEvent {
    VisitorArrival(VisitorArrival),
    VisitorLeave(VisitorLeave),
    PermissionGroupUpdate(Value),
    DeviceStatusChange(DeviceStatusChange),
    Unknown {
        event_type: Option<String>,
        payload: Value,
    },
}

/// Reads the known fields of a payload, falling back to an empty struct when
/// a field carries an unexpected type.
fn parse_fields<T: DeserializeOwned + Default>(payload: &Value) -> T {
    T::deserialize(payload).unwrap_or_else(|e| {
        logfire::warn!(
            "Event fields could not be parsed: {error}",
            error = e.to_string()
        );
        T::default()
    })
}

impl InboundEvent {
    pub fn from_payload(payload: &Value) -> Self {
        let event_type = payload.get("eventType").and_then(Value::as_str);

        match event_type.map(EventKind::from_event_type) {
            Some(EventKind::VisitorArrival) => Self::VisitorArrival(parse_fields(payload)),
            Some(EventKind::VisitorLeave) => Self::VisitorLeave(parse_fields(payload)),
            Some(EventKind::PermissionGroupUpdate) => Self::PermissionGroupUpdate(payload.clone()),
            Some(EventKind::DeviceStatusChange) => Self::DeviceStatusChange(parse_fields(payload)),
            Some(EventKind::Unknown) | None => Self::Unknown {
                event_type: payload
                    .get("eventType")
                    .filter(|v| !v.is_null())
                    .map(|v| v.as_str().map_or_else(|| v.to_string(), str::to_string)),
                payload: payload.clone(),
            },
        }
    }

    pub fn kind(&self) -> EventKind {
        match self {
            Self::VisitorArrival(_) => EventKind::VisitorArrival,
            Self::VisitorLeave(_) => EventKind::VisitorLeave,
            Self::PermissionGroupUpdate(_) => EventKind::PermissionGroupUpdate,
            Self::DeviceStatusChange(_) => EventKind::DeviceStatusChange,
            Self::Unknown { .. } => EventKind::Unknown,
        }
    }
}

/// The platform's `eventId`, accepted as a string or a number
pub fn event_id(payload: &Value) -> Option<String> {
    match payload.get("eventId")? {
        Value::String(id) if !id.is_empty() => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

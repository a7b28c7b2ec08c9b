//! # Webhook response schemas
//!
//! Bodies returned to the platform. Error envelopes live in
//! [`errors`](crate::errors).

use serde::{Deserialize, Serialize};

use crate::{consts, models::event_record::EventRecord, utils};

/// Answer to a GET without `echostr`
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusReport {
    pub code: i32,
    pub message: String,
    pub service: String,
    pub timestamp: String,
    pub events_count: usize,
    pub recent_events: Vec<EventRecord>,
}

impl StatusReport {
    pub fn new(service: &str, events_count: usize, recent_events: Vec<EventRecord>) -> Self {
        Self {
            code: 0,
            message: consts::STATUS_MESSAGE.to_string(),
            service: service.to_string(),
            timestamp: utils::now_iso_timestamp(),
            events_count,
            recent_events,
        }
    }
}

/// Acknowledgement of an event notification
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventAck {
    pub code: i32,
    pub message: String,
    pub event_id: String,
    pub received_at: String,
}

impl EventAck {
    pub fn success(event_id: String) -> Self {
        Self {
            code: 0,
            message: consts::SUCCESS_MESSAGE.to_string(),
            event_id,
            received_at: utils::now_iso_timestamp(),
        }
    }
}

/// Outcome of a GET on the webhook URL
#[derive(Debug)]
pub enum VerificationOutcome {
    /// Echo this token back as `text/plain`
    Challenge(String),
    Status(StatusReport),
}

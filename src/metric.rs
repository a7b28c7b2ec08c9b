//! Webhook traffic counters exported through logfire.

use opentelemetry::{KeyValue, metrics::UpDownCounter};
use std::sync::LazyLock;

use crate::models::hik_event::EventKind;

static WEBHOOK_TRAFFIC: LazyLock<UpDownCounter<i64>> = LazyLock::new(|| {
    logfire::i64_up_down_counter("hik_webhook_traffic")
        .with_description("HikVision webhook calls by method, event kind and handler failure")
        .with_unit("request")
        .build()
});

fn count(dimension: &'static str, value: String) {
    WEBHOOK_TRAFFIC.add(1, &[KeyValue::new(dimension, value)]);
}

pub fn count_request(method: &str) {
    count("request_method", method.to_string())
}

pub fn count_event(kind: EventKind) {
    count("event_kind", kind.to_string())
}

pub fn count_handler_failure(kind: EventKind) {
    count("handler_failure", kind.to_string())
}

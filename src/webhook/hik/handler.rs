//! # HikVision webhook handler
//!
//! Business side of the webhook: records every call in the diagnostic log,
//! answers the URL ownership challenge and forwards classified events to the
//! configured [`EventHandler`](crate::services::EventHandler).

use ntex::web::types::Query;
use serde_json::{Value, json};
use std::backtrace::Backtrace;

use super::schemas::{EventAck, StatusReport, VerificationOutcome};
use crate::{
    errors::WebhookError,
    metric,
    models::{
        event_record::EventRecord,
        hik_event::{self, InboundEvent, VerificationQuery},
    },
    webhook::AppState,
};

/// Parses the challenge parameters, treating a malformed query string as empty.
///
/// A repeated parameter keeps its first value, so `echostr=a&echostr=b`
/// echoes `a`.
pub fn parse_verification_query(query_string: &str) -> VerificationQuery {
    let pairs = match Query::<Vec<(String, String)>>::from_query(query_string) {
        Ok(pairs) => pairs.into_inner(),
        Err(e) => {
            logfire::warn!(
                "Malformed verification query string: {error}",
                error = e.to_string()
            );
            return VerificationQuery::default();
        }
    };

    let first = |key: &str| {
        pairs
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.clone())
    };

    VerificationQuery {
        signature: first("signature"),
        timestamp: first("timestamp"),
        nonce: first("nonce"),
        echostr: first("echostr"),
    }
}

/// Parses a notification body.
///
/// An empty or non-JSON body is tolerated and read as `{}`: the platform's
/// payload shape is not guaranteed and it must still get an acknowledgement.
pub fn parse_body(body: &[u8]) -> Value {
    if body.iter().all(u8::is_ascii_whitespace) {
        return json!({});
    }

    serde_json::from_slice(body).unwrap_or_else(|e| {
        logfire::warn!(
            "Event body is not valid JSON, treating it as empty: {error}",
            error = e.to_string()
        );
        json!({})
    })
}

/// Handles a GET on the webhook URL.
///
/// The call is recorded before branching. With a non-empty `echostr` the token
/// must be echoed verbatim, otherwise a status report is returned.
pub async fn verify_url(
    query_string: &str,
    client_ip: &str,
    app_state: &AppState,
) -> VerificationOutcome {
    let query = parse_verification_query(query_string);

    logfire::info!(
        "URL verification request: signature={signature}, timestamp={timestamp}, nonce={nonce}, echostr={echostr}",
        signature = query.signature.as_deref().unwrap_or("-").to_string(),
        timestamp = query.timestamp.as_deref().unwrap_or("-").to_string(),
        nonce = query.nonce.as_deref().unwrap_or("-").to_string(),
        echostr = query.echostr.as_deref().unwrap_or("-").to_string()
    );

    let recorded_query = serde_json::to_value(&query).unwrap_or_else(|_| json!({}));
    app_state
        .event_log
        .push(EventRecord::url_verification(recorded_query, client_ip))
        .await;

    if let Some(echostr) = query.challenge() {
        logfire::info!("URL verification answered with echostr");
        return VerificationOutcome::Challenge(echostr.to_string());
    }

    VerificationOutcome::Status(StatusReport::new(
        &app_state.service_name,
        app_state.event_log.len().await,
        app_state
            .event_log
            .recent(app_state.status_recent_events)
            .await,
    ))
}

/// Handles an event notification.
///
/// The record is appended before the event handler runs, so a failing
/// handler still leaves the received payload visible in the log.
pub async fn receive_notification(
    method: &str,
    body: &[u8],
    client_ip: &str,
    app_state: &AppState,
) -> Result<EventAck, WebhookError> {
    let payload = parse_body(body);
    logfire::info!("Received event payload: {payload}", payload = payload.to_string());

    let record = EventRecord::event_received(method, payload, client_ip);
    let fallback_event_id = record.timestamp.clone();
    let event = InboundEvent::from_payload(&record.payload);
    let event_id = hik_event::event_id(&record.payload).unwrap_or(fallback_event_id);

    app_state.event_log.push(record).await;

    let kind = event.kind();
    metric::count_event(kind);

    if let Err(e) = app_state.event_handler.handle(&event).await {
        metric::count_handler_failure(kind);
        logfire::error!(
            "Failed to handle {kind} event: {error}",
            kind = kind.to_string(),
            error = format!("{e:?}")
        );
        return Err(WebhookError::internal(
            format!("{e:#}"),
            format!("{e:?}\n\n{}", Backtrace::force_capture()),
        ));
    }

    Ok(EventAck::success(event_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::event_record::RecordKind,
        services::{MockEventHandler, event_handler::LoggingEventHandler, event_log::EventLog},
    };
    use std::sync::Arc;

    fn app_state(handler: crate::services::ImplEventHandler) -> AppState {
        AppState {
            service_name: "test service".into(),
            status_recent_events: 5,
            event_log: EventLog::new(100),
            event_handler: handler,
        }
    }

    #[test]
    fn test_parse_body_tolerates_garbage() {
        assert_eq!(parse_body(b""), json!({}));
        assert_eq!(parse_body(b"  \n"), json!({}));
        assert_eq!(parse_body(b"{not json"), json!({}));
        assert_eq!(parse_body(br#"{"eventType":"X"}"#), json!({"eventType": "X"}));
    }

    #[test]
    fn test_parse_verification_query() {
        let query = parse_verification_query("signature=test&timestamp=123&nonce=456&echostr=789");

        assert_eq!(query.signature.as_deref(), Some("test"));
        assert_eq!(query.timestamp.as_deref(), Some("123"));
        assert_eq!(query.nonce.as_deref(), Some("456"));
        assert_eq!(query.challenge(), Some("789"));
        assert_eq!(parse_verification_query(""), VerificationQuery::default());
    }

    #[test]
    fn test_repeated_query_parameter_keeps_first_value() {
        let query = parse_verification_query("echostr=a&nonce=1&echostr=b&nonce=2");

        assert_eq!(query.challenge(), Some("a"));
        assert_eq!(query.nonce.as_deref(), Some("1"));
        assert_eq!(query.signature, None);
    }

    #[ntex::test]
    async fn test_verify_url_echoes_challenge_and_records() {
        let state = app_state(Arc::new(LoggingEventHandler));

        let outcome = verify_url("echostr=abc%20def", "1.2.3.4", &state).await;

        assert!(matches!(outcome, VerificationOutcome::Challenge(ref token) if token == "abc def"));
        let records = state.event_log.snapshot().await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].kind, RecordKind::UrlVerification);
        assert_eq!(records[0].method, "GET");
        assert_eq!(records[0].source_ip, "1.2.3.4");
        assert_eq!(records[0].payload, json!({"echostr": "abc def"}));
    }

    #[ntex::test]
    async fn test_verify_url_without_echostr_reports_status() {
        let state = app_state(Arc::new(LoggingEventHandler));
        for n in 0..7 {
            state
                .event_log
                .push(EventRecord::event_received("POST", json!({ "n": n }), "x"))
                .await;
        }

        let outcome = verify_url("nonce=1", "1.2.3.4", &state).await;

        let VerificationOutcome::Status(report) = outcome else {
            panic!("expected a status report");
        };
        assert_eq!(report.code, 0);
        assert_eq!(report.service, "test service");
        assert_eq!(report.events_count, 8);
        assert_eq!(report.recent_events.len(), 5);
        assert_eq!(
            report.recent_events.last().unwrap().kind,
            RecordKind::UrlVerification
        );
    }

    #[ntex::test]
    async fn test_receive_notification_echoes_event_id() {
        let mut handler = MockEventHandler::new();
        handler
            .expect_handle()
            .withf(|event| matches!(event, InboundEvent::VisitorArrival(_)))
            .times(1)
            .returning(|_| Ok(()));
        let state = app_state(Arc::new(handler));

        let ack = receive_notification(
            "POST",
            br#"{"eventType":"VISITOR_ARRIVAL","eventId":"e1"}"#,
            "1.2.3.4",
            &state,
        )
        .await
        .unwrap();

        assert_eq!(ack.code, 0);
        assert_eq!(ack.message, "success");
        assert_eq!(ack.event_id, "e1");
        assert_eq!(state.event_log.len().await, 1);
    }

    #[ntex::test]
    async fn test_receive_notification_falls_back_to_record_timestamp() {
        let state = app_state(Arc::new(LoggingEventHandler));

        let ack = receive_notification("POST", b"not json", "1.2.3.4", &state)
            .await
            .unwrap();

        let records = state.event_log.snapshot().await;
        assert_eq!(ack.event_id, records[0].timestamp);
        assert_eq!(records[0].payload, json!({}));
    }

    #[ntex::test]
    async fn test_receive_notification_handler_failure_is_internal_error() {
        let mut handler = MockEventHandler::new();
        handler
            .expect_handle()
            .times(1)
            .returning(|_| Err(anyhow::anyhow!("push service unavailable")));
        let state = app_state(Arc::new(handler));

        let result = receive_notification(
            "POST",
            br#"{"eventType":"DEVICE_STATUS_CHANGE"}"#,
            "1.2.3.4",
            &state,
        )
        .await;

        let Err(WebhookError::InternalError { message, stack }) = result else {
            panic!("expected an internal error");
        };
        assert_eq!(message, "push service unavailable");
        assert!(stack.starts_with("push service unavailable"));
        assert_ne!(stack.trim_end(), "push service unavailable");
        assert_eq!(state.event_log.len().await, 1);
    }
}

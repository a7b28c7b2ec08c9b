use async_trait::async_trait;

use crate::models::hik_event::InboundEvent;

/// Default [EventHandler](crate::services::EventHandler): logs what arrived and
/// does nothing else.
#[derive(Clone, Default)]
pub struct LoggingEventHandler;

const UNKNOWN_VISITOR: &str = "unknown visitor";
const UNKNOWN_TIME: &str = "unknown time";

#[async_trait]
impl crate::services::EventHandler for LoggingEventHandler {
    async fn handle(&self, event: &InboundEvent) -> anyhow::Result<()> {
        match event {
            InboundEvent::VisitorArrival(arrival) => {
                logfire::info!(
                    "Visitor {visitor} arrived at {time}",
                    visitor = arrival.visitor_name.as_deref().unwrap_or(UNKNOWN_VISITOR).to_string(),
                    time = arrival.visit_time.as_deref().unwrap_or(UNKNOWN_TIME).to_string()
                );
            }
            InboundEvent::VisitorLeave(leave) => {
                logfire::info!(
                    "Visitor {visitor} left at {time}",
                    visitor = leave.visitor_name.as_deref().unwrap_or(UNKNOWN_VISITOR).to_string(),
                    time = leave.leave_time.as_deref().unwrap_or(UNKNOWN_TIME).to_string()
                );
            }
            InboundEvent::PermissionGroupUpdate(payload) => {
                logfire::info!(
                    "Permission group updated: {payload}",
                    payload = payload.to_string()
                );
            }
            InboundEvent::DeviceStatusChange(change) => {
                logfire::info!(
                    "Device {device} changed status to {status}",
                    device = change.device_id.as_deref().unwrap_or("unknown device").to_string(),
                    status = change.status.as_deref().unwrap_or("unknown status").to_string()
                );
            }
            InboundEvent::Unknown {
                event_type: Some(event_type),
                ..
            } => {
                logfire::warn!(
                    "Unrecognized event type: {event_type}",
                    event_type = event_type.clone()
                );
            }
            InboundEvent::Unknown {
                event_type: None,
                payload,
            } => {
                logfire::warn!(
                    "Event without eventType: {payload}",
                    payload = payload.to_string()
                );
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::EventHandler;
    use serde_json::json;

    #[ntex::test]
    async fn test_logging_handler_accepts_every_kind() {
        let handler = LoggingEventHandler;
        let payloads = [
            json!({"eventType": "VISITOR_ARRIVAL", "visitorName": "Han Meimei"}),
            json!({"eventType": "VISITOR_LEAVE"}),
            json!({"eventType": "PERMISSION_GROUP_UPDATE", "groupId": "g1"}),
            json!({"eventType": "DEVICE_STATUS_CHANGE", "deviceId": "d1", "status": "offline"}),
            json!({"eventType": "SOMETHING_ELSE"}),
            json!({}),
        ];

        for payload in payloads {
            let event = InboundEvent::from_payload(&payload);
            assert!(handler.handle(&event).await.is_ok());
        }
    }
}

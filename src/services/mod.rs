pub mod event_handler;
pub mod event_log;

use crate::models::hik_event::InboundEvent;
use async_trait::async_trait;
use std::sync::Arc;

/// Business reaction to a classified platform event.
///
/// The webhook acknowledges the platform only after `handle` returns; an
/// `Err` is reported to the platform as a 500 so it can re-deliver.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventHandler {
    async fn handle(&self, event: &InboundEvent) -> anyhow::Result<()>;
}

pub type ImplEventHandler = Arc<dyn EventHandler + Send + Sync>;

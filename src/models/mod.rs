//! Domain types shared by the webhook surface and the services behind it.
//!
//! - [`event_record`] - entries of the in-memory diagnostic log
//! - [`hik_event`] - challenge query and event notifications from the platform

pub mod event_record;
pub mod hik_event;

//! HikVision event subscription integration
//!
//! ## Submodules
//!
//! - [`client_ip`] - best-effort caller address extractor
//! - [`handler`] - URL challenge and event notification logic
//! - [`routes`] - method dispatch and the top-level failure boundary
//! - [`schemas`] - JSON bodies returned to the platform

pub mod client_ip;
pub mod handler;
pub mod routes;
pub mod schemas;

pub use routes::receive_event;

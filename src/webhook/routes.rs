use ntex::web;

/// Configures the HikVision event subscription route.
///
/// The platform calls a single URL with every method, so the resource takes
/// all of them and [`receive_event`](super::hik::receive_event) dispatches.
///
/// # Routes
/// - `OPTIONS {path}` - CORS preflight
/// - `GET {path}` - URL ownership challenge or service status
/// - `POST {path}` - event notification
/// - `HEAD {path}` - health check
///
/// Event bodies up to `max_body_bytes` are read; group and roster updates are
/// well beyond ntex's 256 KiB default.
pub fn hik_events(cfg: &mut web::ServiceConfig, path: &str, max_body_bytes: usize) {
    cfg.service(
        web::resource(path)
            .state(web::types::PayloadConfig::new(max_body_bytes))
            .to(super::hik::receive_event),
    );
}

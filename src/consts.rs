pub const DEFAULT_WEBHOOK_PATH: &str = "/api/event";
pub const DEFAULT_MAX_BODY_BYTES: usize = 4 * 1024 * 1024;

pub const STATUS_MESSAGE: &str = "HikVision event subscription service is running";
pub const SUCCESS_MESSAGE: &str = "success";

pub const ALLOWED_METHODS: [&str; 4] = ["GET", "POST", "OPTIONS", "HEAD"];
pub const CORS_ALLOW_METHODS: &str = "GET, POST, OPTIONS, HEAD";
pub const CORS_ALLOW_HEADERS: &str = "Content-Type, Authorization";

pub const FORWARDED_FOR_HEADER: &str = "x-forwarded-for";
pub const UNKNOWN_SOURCE_IP: &str = "unknown";

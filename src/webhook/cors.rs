//! Uniform CORS handling.
//!
//! The platform and the browser-based test tools call from arbitrary origins,
//! so every response allows any origin. Preflights are answered even on
//! unknown paths.

use ntex::{http::Method, web};

use crate::{consts, errors::WebhookError};

/// Headers added to every response of the application
pub fn cors_headers() -> web::middleware::DefaultHeaders {
    web::middleware::DefaultHeaders::new()
        .header("Access-Control-Allow-Origin", "*")
        .header("Access-Control-Allow-Methods", consts::CORS_ALLOW_METHODS)
        .header("Access-Control-Allow-Headers", consts::CORS_ALLOW_HEADERS)
}

/// Empty 200 answer to a preflight request
pub fn preflight() -> web::HttpResponse {
    web::HttpResponse::Ok().finish()
}

/// Default service: answers preflights on any path, 404 otherwise
pub async fn preflight_or_not_found(
    req: web::HttpRequest,
) -> Result<web::HttpResponse, web::Error> {
    if *req.method() == Method::OPTIONS {
        return Ok(preflight());
    }

    Err(WebhookError::NotFound.into())
}

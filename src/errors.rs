use derive_more::{Display, Error};
use log::error;
use ntex::{
    http,
    web::{self, error::WebResponseError},
};
use serde_json::json;

use crate::consts;

/// Failures surfaced to the caller as a JSON envelope whose `code` mirrors the
/// HTTP status.
#[derive(Debug, Display, Error)]
pub enum WebhookError {
    #[display("Bad Request: {_0}")]
    BadRequest(#[error(not(source))] String),
    #[display("Method Not Allowed: {_0}")]
    MethodNotAllowed(#[error(not(source))] String),
    #[display("Not Found")]
    NotFound,
    /// `stack` is kept for the diagnostic log and never sent to the caller
    #[display("Internal Server Error: {message}")]
    InternalError { message: String, stack: String },
}

impl WebhookError {
    pub fn internal(message: impl Into<String>, stack: impl Into<String>) -> Self {
        WebhookError::InternalError {
            message: message.into(),
            stack: stack.into(),
        }
    }

    fn get_error_message(&self) -> String {
        match self {
            WebhookError::BadRequest(msg) => format!("[BadRequest] {:#?}", msg),
            WebhookError::MethodNotAllowed(method) => format!("[MethodNotAllowed] {:#?}", method),
            WebhookError::NotFound => "[NotFound]".to_string(),
            WebhookError::InternalError { message, .. } => {
                format!("[InternalError] {:#?}", message)
            }
        }
    }

    fn body(&self) -> serde_json::Value {
        let code = self.status_code().as_u16();

        match self {
            WebhookError::BadRequest(msg) => json!({
                "code": code,
                "message": "Bad Request",
                "error": msg,
            }),
            WebhookError::MethodNotAllowed(_) => json!({
                "code": code,
                "message": "Method Not Allowed",
                "allowed": consts::ALLOWED_METHODS,
            }),
            WebhookError::NotFound => json!({
                "code": code,
                "message": "Not Found",
            }),
            WebhookError::InternalError { message, .. } => json!({
                "code": code,
                "message": "Internal Server Error",
                "error": message,
            }),
        }
    }
}

impl WebResponseError for WebhookError {
    fn error_response(&self, _: &web::HttpRequest) -> web::HttpResponse {
        error!("{}", self.get_error_message());

        let mut response = web::HttpResponse::build(self.status_code());
        if let WebhookError::MethodNotAllowed(_) = self {
            response.set_header("allow", consts::CORS_ALLOW_METHODS);
        }

        response.json(&self.body())
    }

    fn status_code(&self) -> http::StatusCode {
        match *self {
            WebhookError::BadRequest(_) => http::StatusCode::BAD_REQUEST,
            WebhookError::MethodNotAllowed(_) => http::StatusCode::METHOD_NOT_ALLOWED,
            WebhookError::NotFound => http::StatusCode::NOT_FOUND,
            WebhookError::InternalError { .. } => http::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

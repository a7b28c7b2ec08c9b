//! HikVision webhook endpoint
//!
//! The platform uses one URL for everything: a GET carrying `echostr` proves
//! ownership of the URL when the subscription is created, POSTs deliver
//! events afterwards. Browsers and health checkers add OPTIONS and HEAD.
//!
//! Every call goes through [`receive_event`], which dispatches on the method
//! inside a boundary that turns errors and panics into a logged `ERROR` record
//! and a JSON error envelope.

use futures::FutureExt;
use ntex::{util::Bytes, web};
use std::{
    any::Any,
    backtrace::Backtrace,
    cell::RefCell,
    panic::{self, AssertUnwindSafe},
    sync::Once,
};
use tracing::Instrument;

use super::{client_ip::ClientIp, handler, schemas::VerificationOutcome};
use crate::{
    errors::WebhookError,
    metric,
    models::event_record::EventRecord,
    webhook::{AppState, cors},
};

thread_local! {
    static PANIC_TRACE: RefCell<Option<String>> = const { RefCell::new(None) };
}

static PANIC_TRACE_HOOK: Once = Once::new();

/// Chains a panic hook that keeps the stack of the panicking thread, so the
/// `ERROR` record of a panicked request points at the panic site rather than
/// at the boundary. The previously installed hook still runs.
pub fn install_panic_trace_hook() {
    PANIC_TRACE_HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            let trace = Backtrace::force_capture().to_string();
            PANIC_TRACE.with(|slot| *slot.borrow_mut() = Some(trace));
            previous(info);
        }));
    });
}

fn take_panic_trace() -> String {
    PANIC_TRACE
        .with(|slot| slot.borrow_mut().take())
        .unwrap_or_else(|| Backtrace::force_capture().to_string())
}

fn panic_message(panic: Box<dyn Any + Send>) -> String {
    if let Some(msg) = panic.downcast_ref::<&str>() {
        return msg.to_string();
    }
    if let Some(msg) = panic.downcast_ref::<String>() {
        return msg.clone();
    }

    "handler panicked".to_string()
}

async fn dispatch(
    req: &web::HttpRequest,
    client_ip: &ClientIp,
    body: &Bytes,
    app_state: &AppState,
) -> Result<web::HttpResponse, WebhookError> {
    match req.method().as_str() {
        "OPTIONS" => Ok(cors::preflight()),
        "HEAD" => Ok(web::HttpResponse::Ok().finish()),
        "GET" => {
            let outcome =
                handler::verify_url(req.query_string(), client_ip.as_str(), app_state).await;

            Ok(match outcome {
                VerificationOutcome::Challenge(echostr) => web::HttpResponse::Ok()
                    .content_type("text/plain; charset=utf-8")
                    .body(echostr),
                VerificationOutcome::Status(report) => web::HttpResponse::Ok().json(&report),
            })
        }
        "POST" => {
            let ack = handler::receive_notification(
                req.method().as_str(),
                body,
                client_ip.as_str(),
                app_state,
            )
            .await?;

            Ok(web::HttpResponse::Ok().json(&ack))
        }
        other => {
            logfire::warn!("Unsupported request method: {method}", method = other.to_string());
            Err(WebhookError::MethodNotAllowed(other.to_string()))
        }
    }
}

/// Webhook endpoint, every method
///
/// # Returns
/// - 200 for OPTIONS, HEAD, GET and POST
/// - 405 with the allowed methods for anything else
/// - 500 when handling fails, with the failure recorded in the event log
pub async fn receive_event(
    req: web::HttpRequest,
    client_ip: ClientIp,
    body: Bytes,
    app_state: web::types::State<AppState>,
) -> Result<web::HttpResponse, web::Error> {
    let method = req.method().as_str().to_string();
    metric::count_request(&method);

    logfire::info!(
        "HikVision event subscription request: {method} {path}?{query}",
        method = method.clone(),
        path = req.path().to_string(),
        query = req.query_string().to_string()
    );
    logfire::debug!(
        "Request headers: {headers}",
        headers = format!("{:?}", req.headers())
    );

    let span = logfire::span!("hik_event_request {method}", method = method.clone());
    let outcome = AssertUnwindSafe(dispatch(&req, &client_ip, &body, &app_state))
        .catch_unwind()
        .instrument(span)
        .await;

    let error = match outcome {
        Ok(Ok(response)) => return Ok(response),
        Ok(Err(e)) => e,
        Err(panic) => WebhookError::internal(panic_message(panic), take_panic_trace()),
    };

    logfire::error!(
        "Failed to handle {method} request: {error}",
        method = method.clone(),
        error = error.to_string()
    );

    let (message, stack) = match &error {
        WebhookError::InternalError { message, stack } => (message.clone(), stack.clone()),
        other => (other.to_string(), Backtrace::force_capture().to_string()),
    };
    app_state
        .event_log
        .push(EventRecord::error(&method, &message, &stack, client_ip.as_str()))
        .await;

    Err(error.into())
}

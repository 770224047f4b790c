use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde_json::error::Category;
use tracing::{error, info, warn};

use crate::contact::models::{ContactRequest, ContactResponse, Screening};
use crate::contact::notification::{build_notification, Notification};
use crate::contact::validation::{screen, validate};
use crate::errors::AppError;
use crate::mailer::Mailer;
use crate::state::AppState;

pub const SENT_MESSAGE: &str = "Your message has been sent successfully!";
pub const RECEIVED_MESSAGE: &str = "Your message has been received!";

/// What happened to the owner notification for an accepted submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Delivered,
    /// No relay configured.
    Skipped,
    /// The relay errored. Logged, never shown to the sender.
    Failed,
}

/// POST /api/contact
pub async fn handle_contact(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<ContactResponse>, AppError> {
    let body = body.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge
        } else {
            AppError::MalformedRequest(rejection.body_text())
        }
    })?;

    // Parsing comes before the honeypot screen: a body that is not the submission
    // shape is rejected even when its honeypot is filled.
    let request = parse_request(&body)?;
    let response = process_submission(request, state.mailer.clone()).await?;
    Ok(Json(response))
}

/// Non-JSON bodies are internal errors; JSON of the wrong shape is the caller's to fix.
pub fn parse_request(body: &[u8]) -> Result<ContactRequest, AppError> {
    serde_json::from_slice(body).map_err(|e| match e.classify() {
        Category::Data => AppError::MalformedRequest(format!("Invalid request body: {e}")),
        Category::Syntax | Category::Eof | Category::Io => {
            AppError::Internal(anyhow::Error::new(e).context("Contact form body is not valid JSON"))
        }
    })
}

/// Runs one submission through spam screening, validation and dispatch.
///
/// Spam gets the same response as a delivered message and sends nothing.
/// Relay failures are swallowed: the sender still sees success.
pub async fn process_submission(
    request: ContactRequest,
    mailer: Option<Arc<dyn Mailer>>,
) -> Result<ContactResponse, AppError> {
    let request = match screen(request) {
        Screening::Spam => {
            warn!("Honeypot filled, suppressing contact form submission");
            return Ok(ContactResponse::ok(SENT_MESSAGE));
        }
        Screening::Candidate(request) => request,
    };

    let submission = validate(&request).map_err(|e| {
        info!("Rejected contact form submission: {e}");
        e
    })?;

    info!(
        "Contact form submission from {} <{}> (phone: {}, {} chars)",
        submission.name,
        submission.email,
        if submission.phone.is_some() { "yes" } else { "no" },
        submission.message.chars().count()
    );

    let notification = build_notification(&submission, Utc::now());
    let message = match dispatch(mailer, notification).await {
        Delivery::Delivered | Delivery::Skipped => SENT_MESSAGE,
        Delivery::Failed => RECEIVED_MESSAGE,
    };

    Ok(ContactResponse::ok(message))
}

async fn dispatch(mailer: Option<Arc<dyn Mailer>>, notification: Notification) -> Delivery {
    let Some(mailer) = mailer else {
        info!("Email not sent: mail relay is not configured");
        return Delivery::Skipped;
    };

    // Spawned so that a client disconnect does not cancel a send already under way.
    let task = tokio::spawn(async move { mailer.send(&notification).await });

    match task.await {
        Ok(Ok(())) => {
            info!("Email sent successfully");
            Delivery::Delivered
        }
        Ok(Err(e)) => {
            error!("Error sending email: {e}");
            Delivery::Failed
        }
        Err(e) => {
            error!("Email delivery task did not complete: {e}");
            Delivery::Failed
        }
    }
}

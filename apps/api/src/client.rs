//! Form client for `POST /api/contact`.
//!
//! `ContactClient` is the raw request/response exchange. `ContactForm` models one
//! form instance: editable fields, a visible status and a submit that never has
//! two requests in flight at once. No automatic retry; the user re-submits.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Mutex, MutexGuard, PoisonError,
};
use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::contact::models::ContactRequest;
use crate::contact::validation::validate;
use crate::errors::AppError;

const CONTACT_PATH: &str = "/api/contact";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_ACCEPTED_MESSAGE: &str = "Your message has been sent successfully!";

/// Shown when the request never produced a readable reply.
pub const NETWORK_FAILURE_MESSAGE: &str = "Something went wrong. Please try again later.";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected reply (status {status}): {body}")]
    UnexpectedReply { status: u16, body: String },
}

/// The user-editable fields plus the hidden honeypot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormFields {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
    pub honeypot: String,
}

impl From<&FormFields> for ContactRequest {
    fn from(fields: &FormFields) -> Self {
        ContactRequest {
            name: Some(fields.name.clone()),
            email: Some(fields.email.clone()),
            phone: Some(fields.phone.clone()),
            message: Some(fields.message.clone()),
            honeypot: Some(fields.honeypot.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactReply {
    Accepted(String),
    /// The handler refused the submission; the text is meant for the user.
    Rejected(String),
}

#[derive(Deserialize)]
struct AcceptedBody {
    message: Option<String>,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Clone)]
pub struct ContactClient {
    client: Client,
    endpoint: String,
}

impl ContactClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Ok(Self {
            client: Client::builder().timeout(REQUEST_TIMEOUT).build()?,
            endpoint: format!("{}{CONTACT_PATH}", base_url.trim_end_matches('/')),
        })
    }

    /// Posts the fields once as JSON.
    pub async fn send(&self, fields: &FormFields) -> Result<ContactReply, ClientError> {
        let response = self.client.post(&self.endpoint).json(fields).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            let accepted: AcceptedBody =
                serde_json::from_str(&body).map_err(|_| ClientError::UnexpectedReply {
                    status: status.as_u16(),
                    body: body.clone(),
                })?;
            return Ok(ContactReply::Accepted(
                accepted
                    .message
                    .unwrap_or_else(|| DEFAULT_ACCEPTED_MESSAGE.to_string()),
            ));
        }

        match serde_json::from_str::<ErrorBody>(&body) {
            Ok(err) => Ok(ContactReply::Rejected(err.error)),
            Err(_) => Err(ClientError::UnexpectedReply {
                status: status.as_u16(),
                body,
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormStatus {
    Idle,
    Pending,
    Succeeded(String),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// A previous submit was still pending; nothing was sent.
    Ignored,
    /// Client-side checks failed; nothing was sent.
    Invalid(String),
    Accepted(String),
    Rejected(String),
    NetworkFailure,
}

/// One contact form instance. Safe to share between tasks.
pub struct ContactForm {
    client: ContactClient,
    fields: Mutex<FormFields>,
    status: Mutex<FormStatus>,
    in_flight: AtomicBool,
}

impl ContactForm {
    pub fn new(client: ContactClient) -> Self {
        Self {
            client,
            fields: Mutex::new(FormFields::default()),
            status: Mutex::new(FormStatus::Idle),
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn fields(&self) -> FormFields {
        lock(&self.fields).clone()
    }

    pub fn status(&self) -> FormStatus {
        lock(&self.status).clone()
    }

    pub fn set_name(&self, value: impl Into<String>) {
        lock(&self.fields).name = value.into();
    }

    pub fn set_email(&self, value: impl Into<String>) {
        lock(&self.fields).email = value.into();
    }

    pub fn set_phone(&self, value: impl Into<String>) {
        lock(&self.fields).phone = value.into();
    }

    pub fn set_message(&self, value: impl Into<String>) {
        lock(&self.fields).message = value.into();
    }

    /// The honeypot is off-screen and out of the tab order; people never fill it.
    pub fn set_honeypot(&self, value: impl Into<String>) {
        lock(&self.fields).honeypot = value.into();
    }

    /// Submits the current fields. Returns `Ignored` without sending anything while
    /// an earlier submit is pending.
    pub async fn submit(&self) -> SubmitOutcome {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("Submit ignored: request already pending");
            return SubmitOutcome::Ignored;
        }
        let _pending = PendingGuard { form: self };

        let fields = self.fields();
        if let Err(AppError::Validation(msg)) = validate(&ContactRequest::from(&fields)) {
            self.set_status(FormStatus::Failed(msg.clone()));
            return SubmitOutcome::Invalid(msg);
        }

        self.set_status(FormStatus::Pending);
        match self.client.send(&fields).await {
            Ok(ContactReply::Accepted(msg)) => {
                *lock(&self.fields) = FormFields::default();
                self.set_status(FormStatus::Succeeded(msg.clone()));
                SubmitOutcome::Accepted(msg)
            }
            Ok(ContactReply::Rejected(msg)) => {
                self.set_status(FormStatus::Failed(msg.clone()));
                SubmitOutcome::Rejected(msg)
            }
            Err(e) => {
                warn!("Contact form submit failed: {e}");
                self.set_status(FormStatus::Failed(NETWORK_FAILURE_MESSAGE.to_string()));
                SubmitOutcome::NetworkFailure
            }
        }
    }

    fn set_status(&self, status: FormStatus) {
        *lock(&self.status) = status;
    }
}

/// Releases the in-flight flag even if the submit future is dropped mid-request.
struct PendingGuard<'a> {
    form: &'a ContactForm,
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        let mut status = lock(&self.form.status);
        if *status == FormStatus::Pending {
            *status = FormStatus::Idle;
        }
        drop(status);
        self.form.in_flight.store(false, Ordering::Release);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

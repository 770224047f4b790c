//! Mail relay. The handler only sees the `Mailer` trait; `AppState` carries an
//! `Option<Arc<dyn Mailer>>` that is `None` when no relay credentials are configured.

use async_trait::async_trait;
use lettre::{
    address::AddressError,
    message::{Mailbox, MultiPart},
    transport::smtp::authentication::Credentials,
    Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::MailRelayConfig;
use crate::contact::notification::Notification;

const FROM_NAME: &str = "Portfolio Contact Form";

#[derive(Debug, Error)]
pub enum MailError {
    #[error("Invalid address: {0}")]
    Address(#[from] AddressError),

    #[error("Could not build message: {0}")]
    Build(#[from] lettre::error::Error),

    #[error("SMTP error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),
}

/// Delivers one notification. No retry contract: a failed send is reported once.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, notification: &Notification) -> Result<(), MailError>;
}

/// SMTP relay over implicit TLS, authenticated with the configured account.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
}

impl SmtpMailer {
    /// Builds the transport and parses the fixed mailboxes. Does not connect.
    pub fn new(config: &MailRelayConfig) -> Result<Self, MailError> {
        let from = Mailbox::new(Some(FROM_NAME.to_string()), config.username.parse()?);
        let to = Mailbox::new(None, config.recipient.parse()?);

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)?
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ));
        if let Some(port) = config.smtp_port {
            builder = builder.port(port);
        }

        Ok(Self {
            transport: builder.build(),
            from,
            to,
        })
    }

    fn compose(&self, notification: &Notification) -> Result<Message, MailError> {
        let mut builder = Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(notification.subject.clone());

        // The form accepts a looser address shape than RFC 5322; skip Reply-To rather than fail.
        match notification.reply_email.parse::<Address>() {
            Ok(address) => {
                builder = builder.reply_to(Mailbox::new(
                    Some(notification.reply_name.clone()),
                    address,
                ));
            }
            Err(e) => warn!(
                "Omitting Reply-To, sender address '{}' rejected: {e}",
                notification.reply_email
            ),
        }

        Ok(builder.multipart(MultiPart::alternative_plain_html(
            notification.text_body.clone(),
            notification.html_body.clone(),
        ))?)
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, notification: &Notification) -> Result<(), MailError> {
        let message = self.compose(notification)?;
        let response = self.transport.send(message).await?;
        debug!("SMTP relay accepted message: code={}", response.code());
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn relay_config() -> MailRelayConfig {
        MailRelayConfig {
            username: "owner@example.com".to_string(),
            password: "app-password".to_string(),
            smtp_host: "smtp.example.com".to_string(),
            smtp_port: Some(2465),
            recipient: "inbox@example.com".to_string(),
        }
    }

    fn notification(reply_email: &str) -> Notification {
        Notification {
            subject: "New Contact Form Submission from Jane Doe".to_string(),
            text_body: "Name: Jane Doe".to_string(),
            html_body: "<p>Jane Doe</p>".to_string(),
            reply_name: "Jane Doe".to_string(),
            reply_email: reply_email.to_string(),
        }
    }

    fn headers(message: &Message) -> String {
        String::from_utf8_lossy(&message.formatted()).into_owned()
    }

    fn header_line<'a>(raw: &'a str, name: &str) -> Option<&'a str> {
        raw.lines().find(|line| line.starts_with(&format!("{name}: ")))
    }

    #[tokio::test]
    async fn test_builds_with_valid_config() {
        assert!(SmtpMailer::new(&relay_config()).is_ok());
    }

    #[tokio::test]
    async fn test_rejects_invalid_recipient() {
        let mut config = relay_config();
        config.recipient = "not an address".to_string();
        assert!(matches!(
            SmtpMailer::new(&config),
            Err(MailError::Address(_))
        ));
    }

    #[tokio::test]
    async fn test_compose_sets_envelope_headers() {
        let mailer = SmtpMailer::new(&relay_config()).unwrap();
        let message = mailer.compose(&notification("jane@example.com")).unwrap();
        let raw = headers(&message);

        let from = header_line(&raw, "From").unwrap();
        assert!(from.contains("Portfolio Contact Form"));
        assert!(from.contains("<owner@example.com>"));
        assert!(header_line(&raw, "To").unwrap().contains("inbox@example.com"));
        assert!(header_line(&raw, "Reply-To")
            .unwrap()
            .contains("jane@example.com"));
        assert_eq!(
            header_line(&raw, "Subject"),
            Some("Subject: New Contact Form Submission from Jane Doe")
        );
        assert!(raw.contains("multipart/alternative"));
    }

    #[tokio::test]
    async fn test_compose_omits_unparseable_reply_to() {
        let mailer = SmtpMailer::new(&relay_config()).unwrap();
        let message = mailer.compose(&notification("ja,ne@example.com")).unwrap();
        assert!(header_line(&headers(&message), "Reply-To").is_none());
    }
}

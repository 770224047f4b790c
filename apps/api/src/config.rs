use std::fmt;

use anyhow::{bail, Context, Result};

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";

/// Mail-relay account used to deliver contact notifications.
#[derive(Clone, PartialEq, Eq)]
pub struct MailRelayConfig {
    pub username: String,
    pub password: String,
    pub smtp_host: String,
    /// Overrides the relay's implicit-TLS port when set.
    pub smtp_port: Option<u16>,
    pub recipient: String,
}

impl fmt::Debug for MailRelayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailRelayConfig")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("recipient", &self.recipient)
            .finish()
    }
}

/// Application configuration loaded from environment variables.
/// Read once at startup and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// `None` when `EMAIL_PASS` is unset: submissions are accepted but not delivered.
    pub mail: Option<MailRelayConfig>,
    pub allowed_origin: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match get("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            None => DEFAULT_PORT,
        };

        let mail = match get("EMAIL_PASS") {
            Some(password) => {
                let Some(username) = get("EMAIL_USER") else {
                    bail!("EMAIL_USER must be set when EMAIL_PASS is set");
                };
                let smtp_port = get("SMTP_PORT")
                    .map(|raw| raw.trim().parse::<u16>())
                    .transpose()
                    .context("SMTP_PORT must be a valid port number")?;

                Some(MailRelayConfig {
                    recipient: get("CONTACT_RECIPIENT").unwrap_or_else(|| username.clone()),
                    smtp_host: get("SMTP_HOST").unwrap_or_else(|| DEFAULT_SMTP_HOST.to_string()),
                    smtp_port,
                    username,
                    password,
                })
            }
            None => None,
        };

        Ok(Config {
            port,
            rust_log: get("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            mail,
            allowed_origin: get("ALLOWED_ORIGIN"),
        })
    }
}

use eyre::{eyre, Result};
use serde::Deserialize;
use std::env;

pub const DEFAULT_ADMIN_EMAIL: &str = "admin@healtharmy.com";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;

/// Configuration for registration emails.
///
/// Delivery goes through an HTTP email API. Without both its URL and key the
/// notifier runs disabled and only logs what it would have sent.
#[derive(Debug, Clone, Deserialize)]
pub struct NotifierConfig {
    /// Base URL of the email API; messages go to `{api_url}/notification/email`
    pub api_url: Option<String>,
    /// Bearer token for the email API
    pub api_key: Option<String>,
    /// Recipient of new-registration alerts
    pub admin_email: String,
    /// Per-request timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            api_url: None,
            api_key: None,
            admin_email: DEFAULT_ADMIN_EMAIL.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
        }
    }
}

impl NotifierConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let api_url = non_empty_var("NOTIFICATION_API_URL");
        let api_key = non_empty_var("NOTIFICATION_API_KEY");

        let admin_email = non_empty_var("ADMIN_EMAIL").unwrap_or_else(|| DEFAULT_ADMIN_EMAIL.to_string());

        let timeout_seconds = match env::var("NOTIFICATION_TIMEOUT_SECONDS") {
            Ok(value) => value
                .parse::<u64>()
                .map_err(|_| eyre!("NOTIFICATION_TIMEOUT_SECONDS must be a whole number of seconds"))?,
            Err(_) => DEFAULT_TIMEOUT_SECONDS,
        };

        Ok(Self {
            api_url,
            api_key,
            admin_email,
            timeout_seconds,
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.api_url.is_some() && self.api_key.is_some()
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

//! Registration emails over an HTTP email API.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use eyre::{eyre, Result, WrapErr};
use healtharmy_core::notify::{NotificationSink, RegistrationNotice};
use serde::Serialize;
use tracing::info;

pub mod config;
pub mod templates;

use config::NotifierConfig;

/// Body accepted by the email API.
#[derive(Debug, Clone, Serialize)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// Posts each message as JSON to `{api_url}/notification/email` with bearer
/// authentication. A non-2xx reply counts as a failed delivery.
pub struct HttpNotifier {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    admin_email: String,
}

impl HttpNotifier {
    pub fn new(api_url: &str, api_key: impl Into<String>, admin_email: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .wrap_err("Failed to build email API client")?;

        Ok(Self {
            client,
            endpoint: format!("{}/notification/email", api_url.trim_end_matches('/')),
            api_key: api_key.into(),
            admin_email: admin_email.into(),
        })
    }

    pub async fn send(&self, message: &EmailMessage) -> Result<()> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(message)
            .send()
            .await
            .wrap_err_with(|| format!("Failed to reach email API at {}", self.endpoint))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(eyre!("Email API rejected message with {status}: {error_text}"));
        }

        info!(to = %message.to, subject = %message.subject, "Email sent");
        Ok(())
    }
}

#[async_trait]
impl NotificationSink for HttpNotifier {
    async fn notify_volunteer(&self, notice: &RegistrationNotice) -> Result<()> {
        self.send(&EmailMessage {
            to: notice.email.clone(),
            subject: templates::CONFIRMATION_SUBJECT.to_string(),
            html: templates::confirmation_email(notice),
        })
        .await
    }

    async fn notify_admin(&self, notice: &RegistrationNotice) -> Result<()> {
        self.send(&EmailMessage {
            to: self.admin_email.clone(),
            subject: templates::admin_subject(notice),
            html: templates::admin_alert_email(notice),
        })
        .await
    }
}

/// Stand-in used when no email API is configured.
pub struct DisabledNotifier;

#[async_trait]
impl NotificationSink for DisabledNotifier {
    async fn notify_volunteer(&self, notice: &RegistrationNotice) -> Result<()> {
        info!(volunteer_id = notice.volunteer_id, "Email delivery disabled; skipping confirmation");
        Ok(())
    }

    async fn notify_admin(&self, notice: &RegistrationNotice) -> Result<()> {
        info!(volunteer_id = notice.volunteer_id, "Email delivery disabled; skipping admin alert");
        Ok(())
    }
}

/// Picks the HTTP notifier when the email API is fully configured.
pub fn build_notifier(config: &NotifierConfig) -> Result<Arc<dyn NotificationSink>> {
    match (&config.api_url, &config.api_key) {
        (Some(url), Some(key)) => {
            info!(admin_email = %config.admin_email, "Email notifications enabled");
            let notifier = HttpNotifier::new(
                url,
                key.clone(),
                config.admin_email.clone(),
                Duration::from_secs(config.timeout_seconds),
            )?;
            Ok(Arc::new(notifier))
        }
        _ => {
            info!("NOTIFICATION_API_URL or NOTIFICATION_API_KEY not set; email notifications disabled");
            Ok(Arc::new(DisabledNotifier))
        }
    }
}

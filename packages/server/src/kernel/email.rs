//! Email backends.
//!
//! Two implementations of `BaseEmailService`, selected once at startup:
//! an HTTP transactional-email API client for production and a
//! console-logging backend for development. The orchestrator treats both
//! as fire-and-forget.

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Serialize;

use crate::config::Config;
use crate::kernel::BaseEmailService;

// =============================================================================
// HTTP API backend
// =============================================================================

#[derive(Debug, Serialize)]
struct EmailAddress {
    email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SendEmailBody {
    sender: EmailAddress,
    to: Vec<EmailAddress>,
    subject: String,
    text_content: String,
}

/// Transactional-email API client (Brevo-compatible endpoint).
pub struct HttpEmailService {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    sender_email: String,
}

impl HttpEmailService {
    pub fn new(endpoint: String, api_key: String, sender_email: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
            api_key,
            sender_email,
        }
    }

    async fn send(&self, to: &str, subject: &str, text: String) -> Result<()> {
        let body = SendEmailBody {
            sender: EmailAddress {
                email: self.sender_email.clone(),
                name: Some("Membership Registry".to_string()),
            },
            to: vec![EmailAddress {
                email: to.to_string(),
                name: None,
            }],
            subject: subject.to_string(),
            text_content: text,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header("api-key", &self.api_key)
            .header("Accept", "application/json")
            .json(&body)
            .send()
            .await
            .context("email API request failed")?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            anyhow::bail!("email API returned {}: {}", status, detail);
        }

        Ok(())
    }
}

#[async_trait]
impl BaseEmailService for HttpEmailService {
    async fn send_magic_link(&self, email: &str, link_url: &str) -> Result<()> {
        let text = format!(
            "Hello,\n\nUse the link below to continue. It expires in 30 minutes.\n\n{}\n",
            link_url
        );
        self.send(email, "Membership verification link", text).await
    }

    async fn send_approval(&self, email: &str, member_name: &str) -> Result<()> {
        let text = format!(
            "Hello {},\n\nYour membership registration has been approved. Welcome!\n",
            member_name
        );
        self.send(email, "Membership approved", text).await
    }

    async fn send_rejection(&self, email: &str, member_name: &str) -> Result<()> {
        let text = format!(
            "Hello {},\n\nUnfortunately your membership registration was not approved.\n",
            member_name
        );
        self.send(email, "Membership registration result", text)
            .await
    }
}

// =============================================================================
// Console backend (development)
// =============================================================================

/// Logs outbound mail instead of sending it.
pub struct ConsoleEmailService;

#[async_trait]
impl BaseEmailService for ConsoleEmailService {
    async fn send_magic_link(&self, email: &str, link_url: &str) -> Result<()> {
        tracing::info!(to = %email, link = %link_url, "[EMAIL] magic link");
        Ok(())
    }

    async fn send_approval(&self, email: &str, member_name: &str) -> Result<()> {
        tracing::info!(to = %email, name = %member_name, "[EMAIL] approval notification");
        Ok(())
    }

    async fn send_rejection(&self, email: &str, member_name: &str) -> Result<()> {
        tracing::info!(to = %email, name = %member_name, "[EMAIL] rejection notification");
        Ok(())
    }
}

/// Select the email backend from configuration.
pub fn create_email_service(config: &Config) -> Arc<dyn BaseEmailService> {
    match (&config.email_api_key, &config.email_sender) {
        (Some(api_key), Some(sender)) => {
            tracing::info!(endpoint = %config.email_api_endpoint, "Using HTTP email backend");
            Arc::new(HttpEmailService::new(
                config.email_api_endpoint.clone(),
                api_key.clone(),
                sender.clone(),
            ))
        }
        _ => {
            tracing::info!("EMAIL_API_KEY not set; logging outbound mail to console");
            Arc::new(ConsoleEmailService)
        }
    }
}

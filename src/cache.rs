//! Stale-path signaling for the presentation layer's render cache.
//!
//! A revalidation failure never fails the action that triggered it; the
//! write has already committed.

use async_trait::async_trait;
use serde_json::json;

use crate::config;

#[async_trait]
pub trait Revalidator: Send + Sync {
    /// Mark cached renderings of `path` as stale.
    async fn revalidate(&self, path: &str);
}

/// Posts stale paths to the front end's revalidation webhook. With no
/// webhook configured the signal is log-only.
pub struct WebhookRevalidator {
    http: reqwest::Client,
}

impl WebhookRevalidator {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
        }
    }
}

impl Default for WebhookRevalidator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Revalidator for WebhookRevalidator {
    async fn revalidate(&self, path: &str) {
        let webhook = &config::config().server.revalidate_webhook;
        if webhook.is_empty() {
            tracing::debug!("revalidate (no webhook): {}", path);
            return;
        }

        let result = self
            .http
            .post(webhook)
            .json(&json!({ "path": path }))
            .send()
            .await;

        match result {
            Ok(response) if response.status().is_success() => {}
            Ok(response) => {
                tracing::warn!("revalidation of {} returned {}", path, response.status())
            }
            Err(e) => tracing::warn!("revalidation of {} failed: {}", path, e),
        }
    }
}

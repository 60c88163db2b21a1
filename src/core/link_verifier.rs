use crate::config::{LinkCheck, LinksConfig};
use crate::utils::error::{AuditError, Result};
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;

/// The only label that gets a diagnostic second request when it comes back empty.
pub const DEBUG_RETRY_LABEL: &str = "Region (EU)";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkOutcome {
    pub label: String,
    pub url: String,
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug_retry: Option<DebugRetry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DebugRetry {
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Counts the items of a listing response: a bare array, or an object whose `data` is an array.
pub fn count_items(body: &Value) -> Result<usize> {
    match body {
        Value::Array(items) => Ok(items.len()),
        Value::Object(obj) => match obj.get("data") {
            None => Ok(0),
            Some(Value::Array(items)) => Ok(items.len()),
            Some(other) => Err(AuditError::MalformedResponseError {
                source_name: "listing".to_string(),
                message: format!("`data` is not a list: {}", other),
            }),
        },
        other => Err(AuditError::MalformedResponseError {
            source_name: "listing".to_string(),
            message: format!("expected a list or an object, got {}", other),
        }),
    }
}

pub struct LinkVerifier {
    client: Client,
    config: LinksConfig,
}

impl LinkVerifier {
    pub fn new(config: LinksConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    pub fn link_url(&self, check: &LinkCheck) -> String {
        format!(
            "{}?{}&pagination[limit]={}",
            self.config.base_url, check.filter, self.config.page_size
        )
    }

    /// Status codes are not inspected; whatever body comes back is counted.
    pub async fn fetch_count(&self, url: &str) -> Result<usize> {
        tracing::debug!("GET {}", url);
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            tracing::warn!("{} answered {}", url, status);
        }

        let body = response.text().await?;
        let value: Value =
            serde_json::from_str(&body).map_err(|e| AuditError::MalformedResponseError {
                source_name: url.to_string(),
                message: e.to_string(),
            })?;
        count_items(&value)
    }

    /// Checks every configured link in order. A failing link is recorded and the rest still run.
    pub async fn verify_all(&self) -> Vec<LinkOutcome> {
        let mut outcomes = Vec::with_capacity(self.config.checks.len());
        for check in &self.config.checks {
            outcomes.push(self.verify(check).await);
        }
        outcomes
    }

    pub async fn verify(&self, check: &LinkCheck) -> LinkOutcome {
        let url = self.link_url(check);
        let mut outcome = LinkOutcome {
            label: check.label.clone(),
            url: url.clone(),
            count: None,
            error: None,
            debug_retry: None,
        };

        match self.fetch_count(&url).await {
            Ok(count) => {
                tracing::info!("{}: {} items", check.label, count);
                outcome.count = Some(count);
                if count == 0 && check.label == DEBUG_RETRY_LABEL {
                    tracing::info!("{} returned nothing, retrying once", check.label);
                    outcome.debug_retry = Some(match self.fetch_count(&url).await {
                        Ok(count) => DebugRetry { count: Some(count), error: None },
                        Err(e) => DebugRetry {
                            count: None,
                            error: Some(e.user_friendly_message()),
                        },
                    });
                }
            }
            Err(e) => {
                tracing::error!("{} failed: {} ({:?})", check.label, e, e.kind());
                outcome.error = Some(e.user_friendly_message());
            }
        }

        outcome
    }
}

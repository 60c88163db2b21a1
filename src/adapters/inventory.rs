use crate::config::InventoryConfig;
use crate::domain::model::CatalogPackage;
use crate::domain::ports::PackageSource;
use crate::utils::error::{AuditError, Result};
use reqwest::Client;
use serde::Deserialize;

pub const ACCESS_CODE_HEADER: &str = "RT-AccessCode";
pub const SECRET_KEY_HEADER: &str = "RT-SecretKey";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PackageListResponse {
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    error_msg: Option<String>,
    #[serde(default)]
    obj: Option<PackageListBody>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PackageListBody {
    #[serde(default)]
    package_list: Option<Vec<CatalogPackage>>,
}

/// Client for the inventory service's package list endpoint.
pub struct InventoryClient {
    client: Client,
    config: InventoryConfig,
}

impl InventoryClient {
    pub fn new(config: InventoryConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    pub fn with_client(client: Client, config: InventoryConfig) -> Self {
        Self { client, config }
    }

    /// Pulls `obj.packageList` out of a response body. A missing `obj` or `packageList` is an
    /// empty catalog; anything that is not JSON of that shape is malformed.
    pub fn parse_package_list(&self, body: &str) -> Result<Vec<CatalogPackage>> {
        let response: PackageListResponse =
            serde_json::from_str(body).map_err(|e| AuditError::MalformedResponseError {
                source_name: self.config.endpoint.clone(),
                message: e.to_string(),
            })?;

        if response.success == Some(false) {
            tracing::warn!(
                "Inventory reported failure: {}",
                response.error_msg.as_deref().unwrap_or("no error message")
            );
        }

        let packages = response
            .obj
            .and_then(|obj| obj.package_list)
            .unwrap_or_default();
        if packages.is_empty() {
            tracing::warn!("Inventory returned no packages");
        }
        Ok(packages)
    }
}

#[async_trait::async_trait]
impl PackageSource for InventoryClient {
    async fn fetch_packages(&self) -> Result<Vec<CatalogPackage>> {
        tracing::debug!("Making API request to: {}", self.config.endpoint);
        let response = self
            .client
            .post(&self.config.endpoint)
            .header(ACCESS_CODE_HEADER, &self.config.access_code)
            .header(SECRET_KEY_HEADER, &self.config.secret_key)
            .json(&serde_json::json!({}))
            .send()
            .await?;

        tracing::debug!("API response status: {}", response.status());

        if response.status() != reqwest::StatusCode::OK {
            return Err(AuditError::StatusError {
                endpoint: self.config.endpoint.clone(),
                status: response.status().as_u16(),
            });
        }

        let body = response.text().await?;
        self.parse_package_list(&body)
    }
}

use crate::domain::model::CatalogPackage;
use crate::utils::error::Result;
use async_trait::async_trait;

/// Source of the remote package catalog.
#[async_trait]
pub trait PackageSource: Send + Sync {
    async fn fetch_packages(&self) -> Result<Vec<CatalogPackage>>;
}

/// Channel that runs one read-only SQL statement against the internal store and
/// returns its raw text output.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run_query(&self, sql: &str) -> Result<String>;
}

use crate::config::DatabaseConfig;
use crate::domain::ports::CommandRunner;
use crate::utils::error::{AuditError, Result};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InternalCounts {
    pub total: u64,
    pub unlimited: u64,
}

/// Counts rows of the internal catalog through a [`CommandRunner`].
pub struct InternalCountRetriever<R: CommandRunner> {
    runner: R,
    total_query: String,
    unlimited_query: String,
}

impl<R: CommandRunner> InternalCountRetriever<R> {
    pub fn new(runner: R, config: &DatabaseConfig) -> Self {
        Self {
            runner,
            total_query: config.total_query(),
            unlimited_query: config.unlimited_query(),
        }
    }

    /// Total first, then unlimited. Either failure fails the whole retrieval.
    pub async fn fetch_counts(&self) -> Result<InternalCounts> {
        let total = self.scalar(&self.total_query).await?;
        tracing::debug!("Internal total: {}", total);
        let unlimited = self.scalar(&self.unlimited_query).await?;
        tracing::debug!("Internal unlimited: {}", unlimited);
        Ok(InternalCounts { total, unlimited })
    }

    async fn scalar(&self, query: &str) -> Result<u64> {
        let output = self.runner.run_query(query).await?;
        parse_scalar(query, &output)
    }
}

pub fn parse_scalar(query: &str, output: &str) -> Result<u64> {
    let trimmed = output.trim();
    trimmed
        .parse::<u64>()
        .map_err(|_| AuditError::NonNumericScalarError {
            query: query.to_string(),
            output: trimmed.to_string(),
        })
}

use crate::core::classifier;
use crate::core::internal_counts::InternalCountRetriever;
use crate::core::reconcile::reconcile;
use crate::core::report::{AuditReport, InternalSummary, RemoteSummary};
use crate::domain::ports::{CommandRunner, PackageSource};

/// Runs the three reconciliation stages in order. Stage failures end up in the report; they
/// never stop a later stage.
pub struct AuditEngine<P: PackageSource, R: CommandRunner> {
    source: P,
    counts: InternalCountRetriever<R>,
}

impl<P: PackageSource, R: CommandRunner> AuditEngine<P, R> {
    pub fn new(source: P, counts: InternalCountRetriever<R>) -> Self {
        Self { source, counts }
    }

    pub async fn run(&self) -> AuditReport {
        tracing::info!("Fetching remote catalog...");
        let remote = self.remote_stage().await;

        tracing::info!("Counting internal catalog...");
        let internal = self.internal_stage().await;

        let reconciliation = reconcile(remote.total, internal.total);
        match &reconciliation {
            Some(result) => tracing::info!("Difference {}: {}", result.diff, result.verdict),
            None => tracing::warn!("Comparison skipped, a total is unavailable"),
        }

        AuditReport::new(remote, internal, reconciliation)
    }

    async fn remote_stage(&self) -> RemoteSummary {
        match self.source.fetch_packages().await {
            Ok(packages) => {
                let tally = classifier::tally(&packages);
                tracing::info!("Remote catalog: {} packages", packages.len());
                RemoteSummary {
                    total: Some(packages.len() as u64),
                    tally: Some(tally),
                    error: None,
                }
            }
            Err(e) => {
                tracing::error!("❌ Remote catalog fetch failed: {} ({:?})", e, e.kind());
                tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
                RemoteSummary {
                    total: None,
                    tally: None,
                    error: Some(e.user_friendly_message()),
                }
            }
        }
    }

    async fn internal_stage(&self) -> InternalSummary {
        match self.counts.fetch_counts().await {
            Ok(counts) => InternalSummary {
                total: Some(counts.total),
                unlimited: Some(counts.unlimited),
                error: None,
            },
            Err(e) => {
                tracing::error!("❌ Internal count failed: {} ({:?})", e, e.kind());
                tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
                InternalSummary {
                    total: None,
                    unlimited: None,
                    error: Some(e.user_friendly_message()),
                }
            }
        }
    }
}

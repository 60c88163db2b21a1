use crate::core::link_verifier::LinkOutcome;
use crate::domain::model::{
    serialize_sentinel, sentinel, Category, ClassificationTally, ReconciliationResult,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Serialize)]
pub struct RemoteSummary {
    #[serde(serialize_with = "serialize_sentinel")]
    pub total: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tally: Option<ClassificationTally>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InternalSummary {
    #[serde(serialize_with = "serialize_sentinel")]
    pub total: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unlimited: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AuditReport {
    pub generated_at: DateTime<Utc>,
    pub remote: RemoteSummary,
    pub internal: InternalSummary,
    pub reconciliation: Option<ReconciliationResult>,
}

impl AuditReport {
    pub fn new(
        remote: RemoteSummary,
        internal: InternalSummary,
        reconciliation: Option<ReconciliationResult>,
    ) -> Self {
        Self {
            generated_at: Utc::now(),
            remote,
            internal,
            reconciliation,
        }
    }

    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for AuditReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.remote.error {
            Some(error) => writeln!(f, "Error fetching remote catalog: {}", error)?,
            None => {
                writeln!(f, "Remote catalog total: {}", sentinel(self.remote.total))?;
                if let Some(tally) = &self.remote.tally {
                    for category in Category::ALL {
                        writeln!(f, "  - {} (approx): {}", category, tally.get(category))?;
                    }
                }
            }
        }

        writeln!(f)?;
        match &self.internal.error {
            Some(error) => writeln!(f, "Error counting internal store: {}", error)?,
            None => {
                writeln!(f, "Internal store total: {}", sentinel(self.internal.total))?;
                if let Some(unlimited) = self.internal.unlimited {
                    writeln!(f, "  - unlimited in internal store: {}", unlimited)?;
                }
            }
        }

        if let Some(result) = &self.reconciliation {
            writeln!(f)?;
            writeln!(f, "Difference: {}", result.diff)?;
            writeln!(f, "Verdict: {}", result.verdict)?;
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LinkReport {
    pub generated_at: DateTime<Utc>,
    pub base_url: String,
    pub links: Vec<LinkOutcome>,
}

impl LinkReport {
    pub fn new(base_url: String, links: Vec<LinkOutcome>) -> Self {
        Self {
            generated_at: Utc::now(),
            base_url,
            links,
        }
    }

    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for LinkReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for link in &self.links {
            match (&link.count, &link.error) {
                (_, Some(error)) => writeln!(f, "{}: Error - {}", link.label, error)?,
                (Some(count), None) => writeln!(f, "{}: {} items found", link.label, count)?,
                (None, None) => writeln!(f, "{}: no result", link.label)?,
            }

            if let Some(retry) = &link.debug_retry {
                writeln!(f, "  Debug {}: retrying once...", link.label)?;
                match &retry.error {
                    Some(error) => writeln!(f, "  Debug {} retry: Error - {}", link.label, error)?,
                    None => writeln!(
                        f,
                        "  Debug {} retry: {} items found",
                        link.label,
                        retry.count.unwrap_or_default()
                    )?,
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::link_verifier::DebugRetry;
    use crate::domain::model::Verdict;

    fn remote_ok() -> RemoteSummary {
        RemoteSummary {
            total: Some(150),
            tally: Some(ClassificationTally {
                unlimited: 20,
                local: 100,
                global: 5,
                region: 15,
                topup: 10,
            }),
            error: None,
        }
    }

    fn internal_ok(total: u64) -> InternalSummary {
        InternalSummary {
            total: Some(total),
            unlimited: Some(18),
            error: None,
        }
    }

    #[test]
    fn test_render_full_report() {
        let report = AuditReport::new(
            remote_ok(),
            internal_ok(145),
            Some(ReconciliationResult {
                diff: 5,
                verdict: Verdict::Missing(5),
            }),
        );

        let text = report.render();
        assert!(text.contains("Remote catalog total: 150"));
        assert!(text.contains("  - unlimited (approx): 20"));
        assert!(text.contains("  - topup (approx): 10"));
        assert!(text.contains("Internal store total: 145"));
        assert!(text.contains("  - unlimited in internal store: 18"));
        assert!(text.contains("Difference: 5"));
        assert!(text.contains("Verdict: missing 5 records"));
    }

    #[test]
    fn test_display_writes_report_line_by_line() {
        let report = AuditReport::new(
            remote_ok(),
            internal_ok(150),
            Some(ReconciliationResult {
                diff: 0,
                verdict: Verdict::Complete,
            }),
        );

        let text = format!("{}", report);
        assert_eq!(text, report.render());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Remote catalog total: 150",
                "  - unlimited (approx): 20",
                "  - local (approx): 100",
                "  - global (approx): 5",
                "  - region (approx): 15",
                "  - topup (approx): 10",
                "",
                "Internal store total: 150",
                "  - unlimited in internal store: 18",
                "",
                "Difference: 0",
                "Verdict: complete",
            ]
        );
    }

    #[test]
    fn test_render_failed_fetch_has_no_tally_or_verdict() {
        let report = AuditReport::new(
            RemoteSummary {
                total: None,
                tally: None,
                error: Some("status 500".to_string()),
            },
            internal_ok(145),
            None,
        );

        let text = report.render();
        assert!(text.contains("Error fetching remote catalog: status 500"));
        assert!(!text.contains("(approx)"));
        assert!(!text.contains("Verdict"));
        assert!(!text.contains("Difference"));
    }

    #[test]
    fn test_json_uses_sentinel_for_unavailable_totals() {
        let report = AuditReport::new(
            remote_ok(),
            InternalSummary {
                total: None,
                unlimited: None,
                error: Some("Remote command failed (exit status: 255)".to_string()),
            },
            None,
        );

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["remote"]["total"], 150);
        assert_eq!(value["internal"]["total"], -1);
        assert!(value["internal"].get("unlimited").is_none());
        assert!(value["reconciliation"].is_null());
    }

    #[test]
    fn test_render_links() {
        let report = LinkReport::new(
            "http://localhost".to_string(),
            vec![
                LinkOutcome {
                    label: "Global".to_string(),
                    url: "http://localhost?filters[type][]=global".to_string(),
                    count: Some(1),
                    error: None,
                    debug_retry: None,
                },
                LinkOutcome {
                    label: "Region (EU)".to_string(),
                    url: "http://localhost?filters[region][]=EU".to_string(),
                    count: Some(0),
                    error: None,
                    debug_retry: Some(DebugRetry {
                        count: Some(0),
                        error: None,
                    }),
                },
                LinkOutcome {
                    label: "Country (ES)".to_string(),
                    url: "http://localhost?filters[country][]=ES".to_string(),
                    count: None,
                    error: Some("could not connect".to_string()),
                    debug_retry: None,
                },
            ],
        );

        let text = report.render();
        assert_eq!(text, report.to_string());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Global: 1 items found",
                "Region (EU): 0 items found",
                "  Debug Region (EU): retrying once...",
                "  Debug Region (EU) retry: 0 items found",
                "Country (ES): Error - could not connect",
            ]
        );
    }
}

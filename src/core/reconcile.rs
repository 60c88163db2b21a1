use crate::domain::model::{ReconciliationResult, Verdict};

/// Compares the two totals. Returns `None` when either side is unavailable.
pub fn reconcile(remote_total: Option<u64>, internal_total: Option<u64>) -> Option<ReconciliationResult> {
    let remote = i64::try_from(remote_total?).ok()?;
    let internal = i64::try_from(internal_total?).ok()?;
    let diff = remote - internal;

    let verdict = match diff {
        0 => Verdict::Complete,
        d if d > 0 => Verdict::Missing(d.unsigned_abs()),
        d => Verdict::Extra(d.unsigned_abs()),
    };

    Some(ReconciliationResult { diff, verdict })
}

use tracing::warn;

use crate::audit::Auditor;
use crate::error::Result;
use crate::keyring::{DeleteOutcome, Keyring};
use crate::stats::KeyStatistics;
use crate::types::KeyRecord;

/// Run configuration for a scan.
///
/// These used to be process-wide flags in older keyring cleaners; here
/// every scan carries its own copy. Printing and prompting stay with the
/// binary, which observes the scan through [`ScanEvent`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScanOptions {
    /// Report matches without deleting anything.
    pub dry_run: bool,
    /// Tally keys by validity and owner trust.
    pub stats: bool,
}

/// Progress updates emitted while scanning the keyring.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ScanEvent {
    /// A key matched the active criteria.
    Matched(KeyRecord),
    /// A matched key was deleted.
    Deleted(KeyRecord),
    /// A matched key was skipped because it still has a secret key.
    SecretKeySkipped(KeyRecord),
    /// Deleting a matched key failed; the scan moves on to the next key.
    DeleteFailed(KeyRecord),
}

/// What a scan did.
#[derive(Debug, Clone, Default)]
pub struct ScanReport {
    /// Keys actually deleted (always 0 for dry runs).
    pub deleted: usize,
    /// Keys that matched the criteria.
    pub matched: usize,
    /// Matched keys whose deletion failed.
    pub failed: usize,
    pub stats: Option<KeyStatistics>,
}

/// Scans the keyring, deleting every key the auditor approves.
///
/// Keys are processed strictly sequentially: each one is tested and, on a
/// match, deleted before the next is considered. With an empty criteria
/// set nothing matches, which is how a statistics-only run works.
pub async fn scan<F>(
    keyring: &Keyring,
    auditor: &Auditor,
    options: &ScanOptions,
    callback: F,
) -> Result<ScanReport>
where
    F: Fn(ScanEvent),
{
    let keys = keyring.list_keys().await?;

    let mut report = ScanReport::default();
    let mut stats = options.stats.then(KeyStatistics::new);
    let audit_enabled = !auditor.criteria().is_empty();

    for key in keys {
        if let Some(ref mut stats) = stats {
            stats.record(&key);
        }

        if !audit_enabled || !auditor.should_delete(&key) {
            continue;
        }

        report.matched += 1;
        callback(ScanEvent::Matched(key.clone()));

        if options.dry_run {
            continue;
        }

        // a key that cannot be deleted must not stop the scan; the
        // remaining keys still get their turn
        match keyring.delete_key(&key).await {
            Ok(DeleteOutcome::Deleted) => {
                report.deleted += 1;
                callback(ScanEvent::Deleted(key));
            }
            Ok(DeleteOutcome::SecretKeySkipped) => {
                callback(ScanEvent::SecretKeySkipped(key));
            }
            Err(err) => {
                warn!(key_id = %key.key_id, error = %err, "failed to delete key");
                report.failed += 1;
                callback(ScanEvent::DeleteFailed(key));
            }
        }
    }

    report.stats = stats;
    Ok(report)
}

//! Batch operation engine
//!
//! Applies one operation to every member of a selection snapshot. The loop
//! is strictly sequential — no concurrent fan-out — which bounds backend
//! load and keeps the failure report order-stable. One bad record never
//! aborts the batch: its failure is recorded and the loop moves on.

use tracing::{info, warn};

use crate::errors::{ConsoleError, Result};
use crate::gateway::LinkGateway;
use crate::models::LinkRecord;

// ============ Report ============

/// One failed item inside a batch
#[derive(Debug, Clone)]
pub struct BatchItemError {
    pub code: String,
    pub reason: String,
}

/// Coarse batch outcome for notification purposes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchOutcome {
    AllSucceeded,
    /// Some items failed but at least one succeeded — still reported as a
    /// success notification, with the failure count attached
    PartialSuccess,
    AllFailed,
}

/// Aggregated accounting for one batch run. This is a result value, not an
/// error: per-item failures are swallowed here by design.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub total: usize,
    pub success_count: usize,
    pub failed_count: usize,
    pub errors: Vec<BatchItemError>,
}

impl BatchReport {
    fn record_failure(&mut self, code: &str, err: &ConsoleError) {
        self.failed_count += 1;
        self.errors.push(BatchItemError {
            code: code.to_string(),
            reason: err.to_string(),
        });
    }

    pub fn outcome(&self) -> BatchOutcome {
        if self.failed_count == 0 {
            BatchOutcome::AllSucceeded
        } else if self.success_count > 0 {
            BatchOutcome::PartialSuccess
        } else {
            BatchOutcome::AllFailed
        }
    }
}

// ============ Delete ============

/// Soft-delete every code in the snapshot, one call per item, in selection
/// order. Never returns an error for item failures.
pub async fn run_batch_delete(gateway: &dyn LinkGateway, codes: &[String]) -> BatchReport {
    let mut report = BatchReport {
        total: codes.len(),
        ..BatchReport::default()
    };

    for code in codes {
        match gateway.soft_delete_link(code).await {
            Ok(()) => report.success_count += 1,
            Err(err) => {
                warn!(code = %code, error = %err, "batch delete: item failed");
                report.record_failure(code, &err);
            }
        }
    }

    info!(
        total = report.total,
        success = report.success_count,
        failed = report.failed_count,
        "batch delete finished"
    );
    report
}

// ============ Export ============

/// Fixed column order of the export artifact
const EXPORT_HEADER: [&str; 6] = [
    "code",
    "service_type",
    "status",
    "targets",
    "visit_count",
    "created_at",
];

/// Result of a batch export: the CSV artifact plus the fetch accounting.
/// Items whose detail fetch failed are skipped, not fatal; with zero rows
/// the artifact is still produced (header only).
#[derive(Debug, Clone)]
pub struct BatchExport {
    pub csv: String,
    pub report: BatchReport,
}

/// Fetch full detail for every selected code and render one CSV table.
/// Values containing the delimiter are quoted by the writer.
pub async fn run_batch_export(gateway: &dyn LinkGateway, codes: &[String]) -> Result<BatchExport> {
    let mut report = BatchReport {
        total: codes.len(),
        ..BatchReport::default()
    };
    let mut records: Vec<LinkRecord> = Vec::with_capacity(codes.len());

    for code in codes {
        match gateway.get_link(code).await {
            Ok(record) => {
                report.success_count += 1;
                records.push(record);
            }
            Err(err) => {
                warn!(code = %code, error = %err, "batch export: skipping item");
                report.record_failure(code, &err);
            }
        }
    }

    let csv = render_csv(&records)?;
    info!(
        total = report.total,
        exported = report.success_count,
        skipped = report.failed_count,
        "batch export finished"
    );
    Ok(BatchExport { csv, report })
}

fn render_csv(records: &[LinkRecord]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(EXPORT_HEADER)?;
    for record in records {
        writer.write_record([
            record.short_code.clone(),
            record.service_type.to_string(),
            record.status.to_string(),
            serde_json::to_string(&record.targets)?,
            record.visit_count.to_string(),
            record.created_at.to_rfc3339(),
        ])?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| ConsoleError::serialization(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| ConsoleError::serialization(e.to_string()))
}

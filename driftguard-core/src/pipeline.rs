//! Drift check pipeline shared by the CLI and the HTTP service.
//!
//! Loads both snapshots, picks the numeric columns they share, and runs the
//! evaluator and aggregator. When nothing numeric is shared the core is never
//! called and the report is `no_numeric_columns`.

use crate::data::{Dataset, common_numeric_columns, load_dataset};
use crate::drift::{DriftReport, RETRAIN_PSI_THRESHOLD, evaluate};
use crate::error::DriftError;
use std::path::Path;

/// Evaluate two in-memory datasets.
pub fn check_datasets(reference: &Dataset, current: &Dataset, buckets: usize) -> DriftReport {
    let columns = common_numeric_columns(reference, current);
    if columns.is_empty() {
        tracing::warn!("No numeric columns in common; nothing to check");
        return DriftReport::no_numeric_columns();
    }
    tracing::info!(count = columns.len(), "Numeric columns in common");

    let report = DriftReport::aggregate(evaluate(reference, current, &columns, buckets));
    match report.max_psi {
        Some(max_psi) => tracing::info!(
            max_psi,
            threshold = RETRAIN_PSI_THRESHOLD,
            status = %report.status,
            "Drift evaluated"
        ),
        None => tracing::info!(status = %report.status, "No defined PSI; no drift decision"),
    }
    report
}

/// Load the reference and current files and evaluate them.
pub async fn check_files(
    reference_path: &Path,
    current_path: &Path,
    buckets: usize,
) -> Result<DriftReport, DriftError> {
    let reference = load_dataset(reference_path).await?;
    let current = load_dataset(current_path).await?;
    Ok(check_datasets(&reference, &current, buckets))
}

//! Aggregation of per-feature metrics into a retrain decision.

use super::DriftMetrics;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Max PSI at or above which retraining is advised.
pub const RETRAIN_PSI_THRESHOLD: f64 = 0.25;

/// Outcome of a drift evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriftStatus {
    Ok,
    Retrain,
    NoNumericColumns,
}

impl DriftStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Retrain => "retrain",
            Self::NoNumericColumns => "no_numeric_columns",
        }
    }

    /// Process exit code for the reporting CLI: only `Retrain` is non-zero.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Retrain => 2,
            Self::Ok | Self::NoNumericColumns => 0,
        }
    }
}

impl std::fmt::Display for DriftStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The drift report emitted by both the CLI and the HTTP service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriftReport {
    pub max_psi: Option<f64>,
    pub per_feature: BTreeMap<String, DriftMetrics>,
    pub status: DriftStatus,
}

impl DriftReport {
    /// Reduce per-feature metrics to the max defined PSI and classify it.
    pub fn aggregate(per_feature: BTreeMap<String, DriftMetrics>) -> Self {
        let max_psi = per_feature
            .values()
            .filter_map(|m| m.psi)
            .reduce(f64::max);
        let status = match max_psi {
            Some(value) if value >= RETRAIN_PSI_THRESHOLD => DriftStatus::Retrain,
            _ => DriftStatus::Ok,
        };
        Self {
            max_psi,
            per_feature,
            status,
        }
    }

    /// Report for datasets that share no numeric column.
    pub fn no_numeric_columns() -> Self {
        Self {
            max_psi: None,
            per_feature: BTreeMap::new(),
            status: DriftStatus::NoNumericColumns,
        }
    }

    pub fn needs_retrain(&self) -> bool {
        self.status == DriftStatus::Retrain
    }
}

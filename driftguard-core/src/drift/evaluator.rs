//! Per-feature drift evaluation.

use super::{Sample, ks_test, psi};
use crate::data::Dataset;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Drift metrics for one feature. `None` means undefined for this input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DriftMetrics {
    pub psi: Option<f64>,
    pub ks_stat: Option<f64>,
    pub ks_pvalue: Option<f64>,
}

impl DriftMetrics {
    /// Compute PSI and KS for one reference/current pair.
    pub fn compute(reference: &Sample, current: &Sample, buckets: usize) -> Self {
        let ks = ks_test(reference, current);
        Self {
            psi: psi(reference, current, buckets),
            ks_stat: ks.map(|r| r.statistic),
            ks_pvalue: ks.map(|r| r.p_value),
        }
    }
}

/// Evaluate every named column present in both datasets.
///
/// Columns missing from either side are skipped. Each column is computed
/// independently; the result is keyed by name.
pub fn evaluate<S: AsRef<str>>(
    reference: &Dataset,
    current: &Dataset,
    columns: &[S],
    buckets: usize,
) -> BTreeMap<String, DriftMetrics> {
    let mut results = BTreeMap::new();
    for name in columns.iter().map(AsRef::as_ref) {
        if !(reference.has_column(name) && current.has_column(name)) {
            tracing::debug!(column = name, "Skipping column absent from one dataset");
            continue;
        }
        let ref_sample = reference.sample(name).unwrap_or_default();
        let cur_sample = current.sample(name).unwrap_or_default();
        let metrics = DriftMetrics::compute(&ref_sample, &cur_sample, buckets);
        tracing::debug!(
            column = name,
            reference_n = ref_sample.len(),
            current_n = cur_sample.len(),
            psi = ?metrics.psi,
            ks_stat = ?metrics.ks_stat,
            "Evaluated feature drift"
        );
        results.insert(name.to_string(), metrics);
    }
    results
}

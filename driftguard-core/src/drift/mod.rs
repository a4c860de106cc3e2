//! Drift quantification engine: PSI, KS and the retrain decision.
//!
//! Everything under this module is pure and total: degenerate inputs (empty
//! samples, constant columns, missing columns) become `None` metrics instead
//! of errors, so one bad feature never aborts a whole report.

pub mod binning;
pub mod evaluator;
pub mod ks;
pub mod psi;
pub mod report;

pub use binning::{BinEdges, Binning};
pub use evaluator::{DriftMetrics, evaluate};
pub use ks::{KsResult, ks_test};
pub use psi::{MIN_PROPORTION, psi};
pub use report::{DriftReport, DriftStatus, RETRAIN_PSI_THRESHOLD};

use serde::{Deserialize, Serialize};

/// Default number of histogram buckets for PSI.
pub const DEFAULT_BUCKETS: usize = 10;

/// Upper bound on histogram buckets; larger requests are clamped.
pub const MAX_BUCKETS: usize = 10_000;

/// One feature's observed values in one dataset snapshot, missing entries removed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sample(Vec<f64>);

impl Sample {
    /// Build a sample from raw observations, dropping `None` and NaN.
    pub fn from_observations<I>(observations: I) -> Self
    where
        I: IntoIterator<Item = Option<f64>>,
    {
        Self(
            observations
                .into_iter()
                .flatten()
                .filter(|v| !v.is_nan())
                .collect(),
        )
    }

    pub fn values(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Observed `(min, max)`, or `None` for an empty sample.
    pub fn range(&self) -> Option<(f64, f64)> {
        self.0.iter().fold(None, |acc, &v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
    }

    /// Values in ascending order.
    pub fn sorted(&self) -> Vec<f64> {
        let mut v = self.0.clone();
        v.sort_by(f64::total_cmp);
        v
    }
}

impl From<Vec<f64>> for Sample {
    fn from(values: Vec<f64>) -> Self {
        Self::from_observations(values.into_iter().map(Some))
    }
}

impl From<&[f64]> for Sample {
    fn from(values: &[f64]) -> Self {
        Self::from_observations(values.iter().copied().map(Some))
    }
}

impl FromIterator<Option<f64>> for Sample {
    fn from_iter<I: IntoIterator<Item = Option<f64>>>(iter: I) -> Self {
        Self::from_observations(iter)
    }
}

//! Histogram bucketing derived from the reference sample.

use super::{MAX_BUCKETS, Sample};

/// How a reference sample partitions the real line for PSI.
#[derive(Debug, Clone, PartialEq)]
pub enum Binning {
    /// Reference has zero range: a single bucket at this exact value.
    Constant { value: f64 },
    /// Edges collapsed (underflow or a non-finite range): one bucket holding all mass on both sides.
    Degenerate,
    /// Regular histogram over the reference range.
    Edges(BinEdges),
}

impl Binning {
    /// Derive the binning for `reference`. Returns `None` for an empty sample.
    ///
    /// The bucket count is clamped into `1..=MAX_BUCKETS`.
    pub fn from_reference(reference: &Sample, buckets: usize) -> Option<Self> {
        let (lo, hi) = reference.range()?;
        if lo == hi {
            return Some(Self::Constant { value: lo });
        }
        Some(match BinEdges::linspace(lo, hi, buckets.clamp(1, MAX_BUCKETS)) {
            Some(edges) => Self::Edges(edges),
            None => Self::Degenerate,
        })
    }
}

/// Ordered bucket boundaries; `len() == bucket_count + 1`.
///
/// Buckets are half-open `[e_i, e_{i+1})` except the last, which also includes
/// the upper edge. Values outside the edges land in the nearest end bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct BinEdges(Vec<f64>);

impl BinEdges {
    /// Evenly spaced edges from `lo` to `hi` inclusive, with the last edge pinned to `hi`.
    ///
    /// Returns `None` when the edges would have no spread or `buckets` is outside
    /// `1..=MAX_BUCKETS`.
    pub fn linspace(lo: f64, hi: f64, buckets: usize) -> Option<Self> {
        if !(1..=MAX_BUCKETS).contains(&buckets) {
            return None;
        }
        let span = hi - lo;
        let step = span / buckets as f64;
        if !span.is_finite() || step == 0.0 || !step.is_finite() {
            return None;
        }
        let mut edges: Vec<f64> = (0..buckets).map(|i| lo + i as f64 * step).collect();
        edges.push(hi);

        let spread = edges[buckets] - edges[0];
        if spread == 0.0 || !spread.is_finite() {
            return None;
        }
        Some(Self(edges))
    }

    pub fn edges(&self) -> &[f64] {
        &self.0
    }

    pub fn bucket_count(&self) -> usize {
        self.0.len() - 1
    }

    /// Index of the bucket holding `value`.
    pub fn bucket_index(&self, value: f64) -> usize {
        let above = self.0.partition_point(|&edge| edge <= value);
        above.saturating_sub(1).min(self.bucket_count() - 1)
    }

    /// Per-bucket counts for `sample`.
    pub fn counts(&self, sample: &Sample) -> Vec<usize> {
        let mut counts = vec![0usize; self.bucket_count()];
        for &v in sample.values() {
            counts[self.bucket_index(v)] += 1;
        }
        counts
    }

    /// Fraction of `sample` in each bucket, over the sample's own size.
    pub fn proportions(&self, sample: &Sample) -> Vec<f64> {
        let total = sample.len().max(1) as f64;
        self.counts(sample)
            .into_iter()
            .map(|c| c as f64 / total)
            .collect()
    }
}

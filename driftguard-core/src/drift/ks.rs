//! Two-sample Kolmogorov–Smirnov test.

use super::Sample;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// KS statistic and its two-sided asymptotic p-value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KsResult {
    pub statistic: f64,
    pub p_value: f64,
}

/// Two-sample KS test. Returns `None` when either sample is empty.
pub fn ks_test(reference: &Sample, current: &Sample) -> Option<KsResult> {
    if reference.is_empty() || current.is_empty() {
        return None;
    }
    let statistic = ks_statistic(&reference.sorted(), &current.sorted());
    let (n, m) = (reference.len() as f64, current.len() as f64);
    let effective_n = (n * m / (n + m)).sqrt();
    Some(KsResult {
        statistic,
        p_value: kolmogorov_sf(effective_n * statistic),
    })
}

/// Largest absolute gap between the ECDFs of two sorted, non-empty slices.
///
/// Ties are consumed on both sides before comparing, so equal values never
/// produce a spurious gap.
fn ks_statistic(a: &[f64], b: &[f64]) -> f64 {
    let (n, m) = (a.len() as f64, b.len() as f64);
    let (mut i, mut j) = (0usize, 0usize);
    let mut d: f64 = 0.0;
    while i < a.len() && j < b.len() {
        let x = a[i].min(b[j]);
        while i < a.len() && a[i] <= x {
            i += 1;
        }
        while j < b.len() && b[j] <= x {
            j += 1;
        }
        d = d.max((i as f64 / n - j as f64 / m).abs());
    }
    d
}

/// Survival function of the Kolmogorov distribution, `P(K > lambda)`.
fn kolmogorov_sf(lambda: f64) -> f64 {
    // Below this the complement series is 1 to well past f64 precision.
    if lambda < 0.1 {
        return 1.0;
    }
    let p = if lambda < 1.18 {
        // Jacobi theta form converges fast for small lambda.
        let coef = (2.0 * PI).sqrt() / lambda;
        let denom = 8.0 * lambda * lambda;
        let cdf: f64 = (1..=20)
            .map(|k| {
                let odd = f64::from(2 * k - 1);
                (-(odd * odd) * PI * PI / denom).exp()
            })
            .sum::<f64>()
            * coef;
        1.0 - cdf
    } else {
        let mut sum = 0.0;
        for k in 1..=100 {
            let sign = if k % 2 == 1 { 1.0 } else { -1.0 };
            let term = sign * (-2.0 * f64::from(k).powi(2) * lambda * lambda).exp();
            sum += term;
            if term.abs() < 1e-16 {
                break;
            }
        }
        2.0 * sum
    };
    p.clamp(0.0, 1.0)
}

//! Population Stability Index.

use super::Sample;
use super::binning::Binning;

/// Floor for any bucket proportion so the logarithm stays finite.
pub const MIN_PROPORTION: f64 = 1e-10;

/// Absolute tolerance for matching current values against a constant reference.
pub const CONSTANT_TOLERANCE: f64 = 1e-10;

/// Population Stability Index between `reference` and `current`.
///
/// Returns `None` when either sample is empty. Otherwise the result is always
/// finite. `buckets` is clamped into `1..=MAX_BUCKETS`; every proportion is
/// clamped into `[1e-10, 1]` and every ratio into `[1e-10, 1e10]` before taking
/// the logarithm.
pub fn psi(reference: &Sample, current: &Sample, buckets: usize) -> Option<f64> {
    if current.is_empty() {
        return None;
    }
    let binning = Binning::from_reference(reference, buckets)?;

    let (expected, actual) = match binning {
        Binning::Constant { value } => {
            let in_bucket = current
                .values()
                .iter()
                .filter(|&&v| (v - value).abs() <= CONSTANT_TOLERANCE)
                .count();
            let share = in_bucket as f64 / current.len() as f64;
            (vec![1.0], vec![clamp_proportion(share)])
        }
        Binning::Degenerate => (vec![1.0], vec![1.0]),
        Binning::Edges(edges) => {
            let expected = edges
                .proportions(reference)
                .into_iter()
                .map(clamp_proportion)
                .collect();
            let actual = edges
                .proportions(current)
                .into_iter()
                .map(clamp_proportion)
                .collect();
            (expected, actual)
        }
    };

    Some(divergence(&expected, &actual))
}

fn clamp_proportion(p: f64) -> f64 {
    p.clamp(MIN_PROPORTION, 1.0)
}

/// `Σ (actual − expected) · ln(actual / expected)` over matching buckets.
fn divergence(expected: &[f64], actual: &[f64]) -> f64 {
    expected
        .iter()
        .zip(actual)
        .map(|(&e, &a)| {
            let ratio = (a / e).clamp(MIN_PROPORTION, 1.0 / MIN_PROPORTION);
            (a - e) * ratio.ln()
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drift::DEFAULT_BUCKETS;

    fn sample(values: &[f64]) -> Sample {
        Sample::from(values)
    }

    #[test]
    fn test_identical_samples_have_zero_psi() {
        let s = sample(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(psi(&s, &s, DEFAULT_BUCKETS), Some(0.0));
    }

    #[test]
    fn test_empty_reference_or_current_is_undefined() {
        let s = sample(&[1.0, 2.0]);
        assert_eq!(psi(&Sample::default(), &s, DEFAULT_BUCKETS), None);
        assert_eq!(psi(&s, &Sample::default(), DEFAULT_BUCKETS), None);
    }

    #[test]
    fn test_all_missing_is_undefined() {
        let missing = Sample::from(vec![f64::NAN, f64::NAN]);
        let s = sample(&[1.0, 2.0]);
        assert_eq!(psi(&missing, &s, DEFAULT_BUCKETS), None);
    }

    #[test]
    fn test_constant_reference_same_constant_current() {
        let r = sample(&[4.2; 20]);
        let c = sample(&[4.2; 7]);
        assert_eq!(psi(&r, &c, DEFAULT_BUCKETS), Some(0.0));
    }

    #[test]
    fn test_constant_reference_disjoint_current_is_large_but_finite() {
        let r = sample(&[1.0; 10]);
        let c = sample(&[2.0, 3.0, 4.0]);
        let value = psi(&r, &c, DEFAULT_BUCKETS).unwrap();
        let expected = (MIN_PROPORTION - 1.0) * MIN_PROPORTION.ln();
        assert!(value.is_finite());
        assert!((value - expected).abs() < 1e-9);
        assert!(value > 23.0);
    }

    #[test]
    fn test_constant_reference_half_shifted() {
        let r = sample(&[1.0; 100]);
        let mut current = vec![1.0; 50];
        current.extend(vec![5.0; 50]);
        let value = psi(&r, &sample(&current), DEFAULT_BUCKETS).unwrap();
        // (0.5 - 1) * ln(0.5)
        assert!((value - 0.5 * std::f64::consts::LN_2).abs() < 1e-12);
        assert!(value > 0.25);
    }

    #[test]
    fn test_constant_reference_tolerance() {
        let r = sample(&[1.0; 5]);
        let c = sample(&[1.0 + 1e-12, 1.0 - 1e-12]);
        assert_eq!(psi(&r, &c, DEFAULT_BUCKETS), Some(0.0));
    }

    #[test]
    fn test_shifted_distribution_has_positive_psi() {
        let r: Vec<f64> = (0..100).map(f64::from).collect();
        let c: Vec<f64> = (50..150).map(f64::from).collect();
        let value = psi(&sample(&r), &sample(&c), DEFAULT_BUCKETS).unwrap();
        assert!(value > 0.25, "psi = {value}");
        assert!(value.is_finite());
    }

    #[test]
    fn test_psi_is_non_negative_for_small_shift() {
        let r = sample(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let c = sample(&[1.1, 2.1, 3.1, 4.1, 5.1]);
        let value = psi(&r, &c, DEFAULT_BUCKETS).unwrap();
        assert!(value >= 0.0);
        assert!(value.is_finite());
    }

    #[test]
    fn test_huge_bucket_count_is_total() {
        let r = sample(&[1.0, 2.0, 3.0]);
        assert_eq!(psi(&r, &r, usize::MAX), Some(0.0));
        let c = sample(&[2.5, 3.5]);
        assert!(psi(&r, &c, usize::MAX).is_some_and(f64::is_finite));
    }

    #[test]
    fn test_degenerate_edges_give_zero() {
        let r = sample(&[0.0, f64::INFINITY]);
        let c = sample(&[100.0, 200.0]);
        assert_eq!(psi(&r, &c, DEFAULT_BUCKETS), Some(0.0));
    }

    #[test]
    fn test_divergence_is_symmetric_in_sign() {
        let a = [0.2, 0.8];
        let b = [0.5, 0.5];
        assert!(divergence(&a, &b) > 0.0);
        assert!(divergence(&b, &a) > 0.0);
    }
}

use tracing::warn;

use super::quantile::{quantile, sorted_non_nan};
use crate::error::{Error, Result};
use crate::BootstrapResult;

/// Percentile interval over a bootstrap distribution.
///
/// For confidence level `c`, with `α = (1 − c) / 2`, the bounds are the `α`
/// and `1 − α` quantiles and the point value is the median. Quantiles use
/// linear interpolation ([`quantile`]).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PercentileInterval {
    confidence_level: f64,
}

impl PercentileInterval {
    /// # Errors
    /// [`Error::InvalidConfidenceLevel`] unless `0 < confidence_level < 1`.
    pub fn new(confidence_level: f64) -> Result<Self> {
        if confidence_level > 0.0 && confidence_level < 1.0 {
            Ok(Self { confidence_level })
        } else {
            Err(Error::InvalidConfidenceLevel(confidence_level))
        }
    }

    /// Confidence level of the interval.
    pub fn confidence_level(&self) -> f64 {
        self.confidence_level
    }

    /// Tail probability `α = (1 − c) / 2`.
    pub fn alpha(&self) -> f64 {
        (1.0 - self.confidence_level) / 2.0
    }

    /// Reduce a distribution of resampled statistic values.
    ///
    /// Iteration order does not matter. NaN values are dropped; a single
    /// remaining value collapses the interval to a point.
    ///
    /// # Errors
    /// [`Error::EmptyDistribution`] when nothing but NaN is left.
    pub fn estimate(&self, distribution: &[f64]) -> Result<BootstrapResult> {
        let sorted = sorted_non_nan(distribution);

        let dropped = distribution.len() - sorted.len();
        if dropped > 0 {
            warn!(dropped, total = distribution.len(), "ignoring NaN bootstrap values");
        }
        match sorted.len() {
            0 => return Err(Error::EmptyDistribution),
            1 => warn!("single bootstrap value, interval is degenerate"),
            _ => {}
        }

        let alpha = self.alpha();
        BootstrapResult::new(
            quantile(&sorted, alpha),
            quantile(&sorted, 0.5),
            quantile(&sorted, 1.0 - alpha),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn reduces_one_to_ten_at_eighty_percent() {
        let distribution: Vec<f64> = (1..=10).map(f64::from).collect();
        let r = PercentileInterval::new(0.8).unwrap().estimate(&distribution).unwrap();

        assert_abs_diff_eq!(r.lower_bound(), 1.9, epsilon = 1e-9);
        assert_abs_diff_eq!(r.value(), 5.5, epsilon = 1e-9);
        assert_abs_diff_eq!(r.upper_bound(), 9.1, epsilon = 1e-9);
    }

    #[test]
    fn order_of_distribution_is_irrelevant() {
        let interval = PercentileInterval::new(0.9).unwrap();
        let a = interval.estimate(&[3.0, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0, 6.0]).unwrap();
        let b = interval.estimate(&[1.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 9.0]).unwrap();
        assert_eq!(a, b);
        assert!(a.lower_bound() <= a.value() && a.value() <= a.upper_bound());
    }

    #[test]
    fn single_value_collapses() {
        let r = PercentileInterval::new(0.95).unwrap().estimate(&[2.5]).unwrap();
        assert_eq!((r.lower_bound(), r.value(), r.upper_bound()), (2.5, 2.5, 2.5));
    }

    #[test]
    fn confidence_level_must_be_open_unit() {
        for c in [0.0, 1.0, -0.1, 1.2, f64::NAN] {
            assert!(matches!(
                PercentileInterval::new(c),
                Err(Error::InvalidConfidenceLevel(_))
            ));
        }
    }

    #[test]
    fn all_nan_distribution_fails() {
        let err = PercentileInterval::new(0.95)
            .unwrap()
            .estimate(&[f64::NAN, f64::NAN])
            .unwrap_err();
        assert!(matches!(err, Error::EmptyDistribution));
    }

    #[test]
    fn infinite_values_keep_bounds_ordered() {
        let inf = f64::INFINITY;
        let mut distribution = vec![0.5, 1.0, 2.0];
        distribution.extend([inf; 7]);

        let r = PercentileInterval::new(0.9).unwrap().estimate(&distribution).unwrap();
        assert_abs_diff_eq!(r.lower_bound(), 0.725, epsilon = 1e-12);
        assert_eq!(r.value(), inf);
        assert_eq!(r.upper_bound(), inf);

        let r = PercentileInterval::new(0.9)
            .unwrap()
            .estimate(&[-inf, -inf, 1.0, inf, inf])
            .unwrap();
        assert_eq!(r.lower_bound(), -inf);
        assert_abs_diff_eq!(r.value(), 1.0);
        assert_eq!(r.upper_bound(), inf);
    }

    #[test]
    fn nan_values_are_skipped() {
        let interval = PercentileInterval::new(0.5).unwrap();
        let with_nan = interval.estimate(&[1.0, f64::NAN, 3.0, 2.0]).unwrap();
        let without = interval.estimate(&[1.0, 3.0, 2.0]).unwrap();
        assert_eq!(with_nan, without);
    }
}

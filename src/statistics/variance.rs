use num_traits::{Float, FromPrimitive};

use super::{Mean, Statistic};

/// Variance with a degrees-of-freedom adjustment.
///
/// Returns NaN when the sample has no more than `ddof` observations.
#[derive(Debug, Clone, Copy)]
pub struct Variance {
    /// Delta degrees of freedom: 0 for the population variance, 1 for the
    /// unbiased sample variance.
    pub ddof: usize,
}

impl Variance {
    /// Creates a new `Variance` estimator with the given degrees of freedom adjustment.
    pub fn new(ddof: usize) -> Self {
        Variance { ddof }
    }
}

impl Default for Variance {
    /// Returns a `Variance` estimator with `ddof = 1` (unbiased sample variance).
    fn default() -> Self {
        Variance { ddof: 1 }
    }
}

impl<D, T> Statistic<D, T> for Variance
where
    D: AsRef<[T]> + ?Sized,
    T: Float + FromPrimitive,
{
    fn compute(&self, data: &D) -> T {
        let slice = data.as_ref();

        if slice.len() <= self.ddof {
            return T::nan();
        }

        let mean: T = Mean.compute(slice);

        // Kahan summation for squared deviations
        let mut sq_sum = T::zero();
        let mut c2 = T::zero();
        for &x in slice {
            let dev = x - mean;
            let y = dev * dev - c2;
            let t = sq_sum + y;
            c2 = (t - sq_sum) - y;
            sq_sum = t;
        }

        match T::from_usize(slice.len() - self.ddof) {
            Some(dof) => sq_sum / dof,
            None => T::nan(),
        }
    }
}

/// Standard deviation: square root of [`Variance`].
#[derive(Debug, Clone, Copy, Default)]
pub struct StdDev {
    /// Underlying variance estimator.
    pub variance: Variance,
}

impl<D, T> Statistic<D, T> for StdDev
where
    D: AsRef<[T]> + ?Sized,
    T: Float + FromPrimitive,
{
    fn compute(&self, data: &D) -> T {
        let var: T = self.variance.compute(data);
        var.sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn sample_and_population_variance() {
        let data = [2.0_f64, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let population: f64 = Variance::new(0).compute(&data);
        let sample: f64 = Variance::default().compute(&data);
        let sd: f64 = StdDev { variance: Variance::new(0) }.compute(&data);
        assert_abs_diff_eq!(population, 4.0, epsilon = 1e-12);
        assert_abs_diff_eq!(sample, 32.0 / 7.0, epsilon = 1e-12);
        assert_abs_diff_eq!(sd, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn too_few_observations_is_nan() {
        let v: f64 = Variance::default().compute(&[3.0_f64]);
        assert!(v.is_nan());
        let v: f64 = Variance::new(0).compute(&[3.0_f64]);
        assert_abs_diff_eq!(v, 0.0);
    }
}

use num_traits::{Float, FromPrimitive};

use super::Statistic;

/// Arithmetic mean with **Kahan summation**, so long resamples of values
/// with a wide dynamic range keep their precision.
///
/// An empty sample yields NaN; NaN and infinite observations propagate as
/// in plain summation.
#[derive(Debug, Clone, Copy, Default)]
pub struct Mean;

impl<D, T> Statistic<D, T> for Mean
where
    D: AsRef<[T]> + ?Sized,
    T: Float + FromPrimitive,
{
    fn compute(&self, data: &D) -> T {
        let slice: &[T] = data.as_ref();

        let mut sum = T::zero();
        let mut c = T::zero();

        for &x in slice {
            let y = x - c;
            let t = sum + y;
            // An infinite running sum has no rounding error to carry
            c = if t.is_finite() { (t - sum) - y } else { T::zero() };
            sum = t;
        }

        match T::from_usize(slice.len()) {
            Some(n) => sum / n,
            None => T::nan(),
        }
    }
}

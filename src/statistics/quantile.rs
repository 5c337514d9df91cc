use num_traits::{Float, FromPrimitive};

use super::Statistic;

/// Linear-interpolation quantile of already sorted data.
///
/// With `h = q·(n − 1)`:
/// ```text
/// Q(q) = x[⌊h⌋] + (h − ⌊h⌋)·(x[⌈h⌉] − x[⌊h⌋])
/// ```
/// This is R's type=7 definition, the default of most numeric libraries.
/// Returns NaN for empty input; `q` is clamped to `[0, 1]`. An infinite
/// neighbour is returned instead of interpolated, so the result is NaN only
/// for empty input.
#[allow(clippy::cast_precision_loss, clippy::cast_sign_loss)]
pub fn quantile(sorted: &[f64], q: f64) -> f64 {
    let n = sorted.len();
    if n == 0 {
        return f64::NAN;
    }

    let h = q.clamp(0.0, 1.0) * (n - 1) as f64;
    let lo = h.floor() as usize;
    let hi = h.ceil().min((n - 1) as f64) as usize;

    let (a, b) = (sorted[lo], sorted[hi]);
    if lo == hi || a == b {
        return a;
    }

    // Interpolating towards an infinity gives that infinity; inf - inf is NaN
    let t = h - lo as f64;
    match (a.is_infinite(), b.is_infinite()) {
        (true, true) => {
            if t < 0.5 {
                a
            } else {
                b
            }
        }
        (true, false) => a,
        (false, true) => b,
        (false, false) => a + t * (b - a),
    }
}

/// Sorted copy of `data` with NaNs removed; infinities are kept.
pub(crate) fn sorted_non_nan<T: Float>(data: &[T]) -> Vec<T> {
    let mut sorted: Vec<T> = data.iter().copied().filter(|x| !x.is_nan()).collect();
    // NaNs filtered above, so the ordering is total
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    sorted
}

/// Quantile estimator at probability `p` (linear interpolation).
///
/// NaN observations are ignored; an empty sample yields NaN.
#[derive(Debug, Clone, Copy)]
pub struct Quantile {
    p: f64,
}

impl Quantile {
    /// Creates a quantile estimator for probability `p ∈ [0, 1]`.
    #[inline]
    pub fn new(p: f64) -> Self {
        debug_assert!((0.0..=1.0).contains(&p), "Quantile p must be in [0,1]");
        Self { p }
    }

    /// Probability this estimator targets.
    pub fn p(&self) -> f64 {
        self.p
    }
}

impl<D, T> Statistic<D, T> for Quantile
where
    D: AsRef<[T]> + ?Sized,
    T: Float + FromPrimitive,
{
    fn compute(&self, data: &D) -> T {
        let sorted: Vec<f64> = sorted_non_nan(data.as_ref())
            .into_iter()
            .filter_map(|x| x.to_f64())
            .collect();
        T::from_f64(quantile(&sorted, self.p)).unwrap_or_else(T::nan)
    }
}

/// Sample median, the 0.5 [`Quantile`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Median;

impl<D, T> Statistic<D, T> for Median
where
    D: AsRef<[T]> + ?Sized,
    T: Float + FromPrimitive,
{
    fn compute(&self, data: &D) -> T {
        Quantile::new(0.5).compute(data)
    }
}

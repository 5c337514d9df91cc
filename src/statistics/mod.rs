use std::fmt;
use std::sync::Arc;

use crate::error::{Error, Result, StatisticFailure};
use crate::{BootstrapResult, Table};

/// Pure computation of a value of type `T` from data `D`.
///
/// Calling `compute` twice on the same data must give the same result.
pub trait Statistic<D: ?Sized, T> {
    /// Compute the statistic.
    fn compute(&self, data: &D) -> T;
}

mod interval;
mod mean;
mod quantile;
mod variance;

pub use interval::PercentileInterval;
pub use mean::Mean;
pub use quantile::{quantile, Median, Quantile};
pub use variance::{StdDev, Variance};

/// What a statistic function may return: a bare scalar or a compound
/// estimate whose central value stands for it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StatisticOutput {
    /// Plain value.
    Scalar(f64),
    /// Bound estimate; its `value` is used.
    Estimate(BootstrapResult),
}

impl StatisticOutput {
    /// Normalize to a scalar.
    #[inline]
    pub fn value(self) -> f64 {
        match self {
            StatisticOutput::Scalar(x) => x,
            StatisticOutput::Estimate(r) => r.value(),
        }
    }
}

impl From<f64> for StatisticOutput {
    fn from(x: f64) -> Self {
        StatisticOutput::Scalar(x)
    }
}

impl From<BootstrapResult> for StatisticOutput {
    fn from(r: BootstrapResult) -> Self {
        StatisticOutput::Estimate(r)
    }
}

type StatisticFn =
    dyn Fn(&[f64]) -> std::result::Result<StatisticOutput, StatisticFailure> + Send + Sync;

/// A statistic function with the name it is reported under.
///
/// Cheap to clone; the function is shared.
#[derive(Clone)]
pub struct NamedStatistic {
    name: String,
    func: Arc<StatisticFn>,
}

impl NamedStatistic {
    /// Wrap an infallible function.
    ///
    /// ```
    /// use bootstrapped::NamedStatistic;
    ///
    /// let range = NamedStatistic::new("range", |xs: &[f64]| {
    ///     let max = xs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    ///     let min = xs.iter().copied().fold(f64::INFINITY, f64::min);
    ///     max - min
    /// });
    /// assert_eq!(range.name(), "range");
    /// ```
    pub fn new<F, O>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&[f64]) -> O + Send + Sync + 'static,
        O: Into<StatisticOutput>,
    {
        Self {
            name: name.into(),
            func: Arc::new(
                move |xs: &[f64]| -> std::result::Result<StatisticOutput, StatisticFailure> {
                    Ok(f(xs).into())
                },
            ),
        }
    }

    /// Wrap a function that may fail. Any failure aborts the simulation.
    pub fn try_new<F, O, E>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&[f64]) -> std::result::Result<O, E> + Send + Sync + 'static,
        O: Into<StatisticOutput>,
        E: Into<StatisticFailure>,
    {
        Self {
            name: name.into(),
            func: Arc::new(
                move |xs: &[f64]| -> std::result::Result<StatisticOutput, StatisticFailure> {
                    f(xs).map(Into::into).map_err(Into::into)
                },
            ),
        }
    }

    /// Wrap any [`Statistic`] over `f64` slices.
    pub fn from_statistic<S>(name: impl Into<String>, statistic: S) -> Self
    where
        S: Statistic<[f64], f64> + Send + Sync + 'static,
    {
        Self::new(name, move |xs: &[f64]| statistic.compute(xs))
    }

    /// Arithmetic mean, reported as `mean`.
    pub fn mean() -> Self {
        Self::from_statistic("mean", Mean)
    }

    /// Median, reported as `median`.
    pub fn median() -> Self {
        Self::from_statistic("median", Median)
    }

    /// Unbiased sample variance, reported as `variance`.
    pub fn variance() -> Self {
        Self::from_statistic("variance", Variance::default())
    }

    /// Sample standard deviation, reported as `std_dev`.
    pub fn std_dev() -> Self {
        Self::from_statistic("std_dev", StdDev::default())
    }

    /// Name used as the result key.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Apply the function to one column of values.
    ///
    /// # Errors
    /// Whatever the wrapped function returns.
    pub fn call(&self, data: &[f64]) -> std::result::Result<StatisticOutput, StatisticFailure> {
        (self.func)(data)
    }
}

impl fmt::Debug for NamedStatistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NamedStatistic").field("name", &self.name).finish_non_exhaustive()
    }
}

/// Evaluate `statistic` on column `column` of a resampled table.
///
/// A failure is annotated with the column, statistic and iteration it came
/// from; a column position past the end is [`Error::IndexOutOfRange`].
pub fn evaluate(
    statistic: &NamedStatistic,
    resampled: &Table,
    column: usize,
    iteration: usize,
) -> Result<f64> {
    let values = resampled
        .column_at(column)
        .ok_or(Error::IndexOutOfRange {
            index: column,
            len: resampled.column_count(),
        })?
        .values();

    statistic
        .call(&values)
        .map(StatisticOutput::value)
        .map_err(|source| Error::StatisticEvaluation {
            column: resampled.names()[column].clone(),
            statistic: statistic.name().to_owned(),
            iteration,
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ToTable;

    #[test]
    fn scalar_and_estimate_outputs_normalize() {
        assert_eq!(StatisticOutput::Scalar(2.5).value(), 2.5);
        let estimate = BootstrapResult::new(1.0, 4.0, 9.0).unwrap();
        assert_eq!(StatisticOutput::Estimate(estimate).value(), 4.0);
    }

    #[test]
    fn compound_statistic_uses_central_value() {
        let stat = NamedStatistic::new("spread", |xs: &[f64]| {
            let lo = xs.iter().copied().fold(f64::INFINITY, f64::min);
            let hi = xs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            BootstrapResult::new(lo, (lo + hi) / 2.0, hi).unwrap()
        });
        let table = vec![2.0_f64, 8.0, 4.0].to_table().unwrap();

        assert_eq!(evaluate(&stat, &table, 0, 0).unwrap(), 5.0);
    }

    #[test]
    fn integer_columns_are_seen_as_floats() {
        let table = vec![1_i64, 2, 3, 6].to_table().unwrap();
        assert_eq!(evaluate(&NamedStatistic::mean(), &table, 0, 0).unwrap(), 3.0);
        assert_eq!(evaluate(&NamedStatistic::median(), &table, 0, 0).unwrap(), 2.5);
    }

    #[test]
    fn missing_column_is_out_of_range() {
        let table = vec![1.0_f64].to_table().unwrap();
        let err = evaluate(&NamedStatistic::mean(), &table, 3, 0).unwrap_err();
        assert!(matches!(err, Error::IndexOutOfRange { index: 3, len: 1 }));
    }

    #[test]
    fn evaluation_is_repeatable() {
        let table = vec![0.3_f64, 1.7, 2.2, 9.1].to_table().unwrap();
        let stat = NamedStatistic::std_dev();
        assert_eq!(
            evaluate(&stat, &table, 0, 0).unwrap(),
            evaluate(&stat, &table, 0, 0).unwrap()
        );
    }

    #[test]
    fn failures_carry_their_origin() {
        let stat = NamedStatistic::try_new("picky", |xs: &[f64]| {
            if xs.iter().any(|&x| x > 2.0) {
                Err("value above two")
            } else {
                Ok(0.0)
            }
        });
        let table = vec![("weights", vec![1.0_f64, 3.0])].to_table().unwrap();

        let err = evaluate(&stat, &table, 0, 7).unwrap_err();
        match err {
            Error::StatisticEvaluation { column, statistic, iteration, source } => {
                assert_eq!(column, "weights");
                assert_eq!(statistic, "picky");
                assert_eq!(iteration, 7);
                assert_eq!(source.to_string(), "value above two");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}

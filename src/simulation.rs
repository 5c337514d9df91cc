//! Bootstrap entry point: resample every column, evaluate every statistic
//! on every resample, and reduce each distribution to an interval.
//!
//! Iterations only read the observed table and their own index column, so
//! with the `rayon` feature they run in parallel; results are collected in
//! iteration order and are identical to a sequential run.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use rand::rngs::StdRng;
use tracing::{debug, instrument, warn};

#[cfg(feature = "rayon")]
use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::report::{BootstrapReport, ColumnReport};
use crate::statistics::evaluate;
#[cfg(not(feature = "rayon"))]
use crate::Re;
use crate::{create_index_matrix_with, IndexPlan, NamedStatistic, PercentileInterval, Table, ToTable};

/// Cooperative cancellation flag, checked before each bootstrap iteration.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Fresh, not yet cancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation of every run holding a clone of this token.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Check if cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Configured bootstrap run.
///
/// Defaults: confidence level 0.95, 100 resamples, seed 10, full-size
/// resamples drawn with replacement.
///
/// ```
/// use bootstrapped::{NamedStatistic, Simulation};
///
/// let report = Simulation::new()
///     .n_bootstraps(200)
///     .seed(7)
///     .run(vec![vec![1.0_f64, 2.0, 3.0, 4.0, 5.0], vec![10.0, 20.0, 30.0, 40.0, 50.0]],
///          &[NamedStatistic::mean()])
///     .unwrap();
///
/// let mean = report.get("1", "mean").unwrap();
/// assert!(mean.lower_bound() <= mean.value() && mean.value() <= mean.upper_bound());
/// ```
#[derive(Debug, Clone)]
pub struct Simulation {
    confidence_level: f64,
    n_bootstraps: usize,
    seed: u64,
    fraction: f64,
    with_replacement: bool,
    cancel: Option<CancelToken>,
}

impl Default for Simulation {
    fn default() -> Self {
        Self {
            confidence_level: 0.95,
            n_bootstraps: 100,
            seed: 10,
            fraction: 1.0,
            with_replacement: true,
            cancel: None,
        }
    }
}

impl Simulation {
    /// Simulation with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the confidence level, in `(0, 1)`.
    #[must_use]
    pub fn confidence_level(mut self, confidence_level: f64) -> Self {
        self.confidence_level = confidence_level;
        self
    }

    /// Set the number of resamples.
    #[must_use]
    pub fn n_bootstraps(mut self, n_bootstraps: usize) -> Self {
        self.n_bootstraps = n_bootstraps;
        self
    }

    /// Set the seed of the index generator.
    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Resample `round(fraction · rows)` rows per iteration.
    #[must_use]
    pub fn fraction(mut self, fraction: f64) -> Self {
        self.fraction = fraction;
        self
    }

    /// Draw rows with (default) or without replacement.
    #[must_use]
    pub fn with_replacement(mut self, with_replacement: bool) -> Self {
        self.with_replacement = with_replacement;
        self
    }

    /// Attach a cancellation token.
    #[must_use]
    pub fn cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Run the bootstrap over `observed` for every statistic.
    ///
    /// All parameters and the input shape are validated before any
    /// resampling; any failure aborts the run with no partial result.
    ///
    /// # Errors
    /// - [`Error::InvalidConfidenceLevel`], [`Error::NoStatistics`],
    ///   [`Error::DuplicateStatisticName`] for bad arguments
    /// - conversion errors of [`ToTable`] ([`Error::Shape`], ...)
    /// - [`Error::InvalidShape`] / [`Error::InvalidFraction`] from the
    ///   index generator
    /// - [`Error::StatisticEvaluation`] when a statistic fails
    /// - [`Error::Cancelled`] when the token fires mid-run
    #[instrument(
        skip_all,
        fields(
            n_bootstraps = self.n_bootstraps,
            confidence_level = self.confidence_level,
            seed = self.seed
        )
    )]
    pub fn run<O: ToTable>(&self, observed: O, statistics: &[NamedStatistic]) -> Result<BootstrapReport> {
        let interval = PercentileInterval::new(self.confidence_level)?;
        check_statistics(statistics)?;
        let table = observed.to_table()?;

        let plan = IndexPlan {
            n_rows: table.row_count(),
            n_bootstraps: self.n_bootstraps,
            fraction: self.fraction,
            seed: self.seed,
            with_replacement: self.with_replacement,
        };
        let matrix = create_index_matrix_with::<StdRng>(&plan)?;

        if self.n_bootstraps == 1 {
            warn!("a single resample gives degenerate intervals");
        }

        debug!(
            columns = table.column_count(),
            rows = table.row_count(),
            statistics = statistics.len(),
            "resampling"
        );

        let total = self.n_bootstraps;
        let done = AtomicUsize::new(0);
        let step = |(iteration, resampled): (usize, Result<Table>)| -> Result<Vec<f64>> {
            if self.cancel.as_ref().is_some_and(CancelToken::is_cancelled) {
                return Err(Error::Cancelled {
                    completed: done.load(Ordering::Relaxed),
                    total,
                });
            }
            let row = evaluate_resample(&resampled?, statistics, iteration)?;
            done.fetch_add(1, Ordering::Relaxed);
            Ok(row)
        };

        #[cfg(feature = "rayon")]
        let rows = matrix
            .par_columns()
            .enumerate()
            .map(|(i, idx)| (i, table.gather(idx)))
            .map(step)
            .collect::<Result<Vec<_>>>()?;
        #[cfg(not(feature = "rayon"))]
        let rows = matrix
            .re(&table)
            .enumerate()
            .map(step)
            .collect::<Result<Vec<_>>>()?;

        debug!("reducing bootstrap distributions");

        let n_stats = statistics.len();
        let columns = table
            .names()
            .iter()
            .enumerate()
            .map(|(c, name)| {
                let results = statistics
                    .iter()
                    .enumerate()
                    .map(|(s, statistic)| {
                        let slot = c * n_stats + s;
                        let distribution: Vec<f64> = rows.iter().map(|row| row[slot]).collect();
                        interval
                            .estimate(&distribution)
                            .map(|r| (statistic.name().to_owned(), r))
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok(ColumnReport::new(name.clone(), results))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(BootstrapReport::new(columns, self.confidence_level, self.n_bootstraps))
    }
}

/// Estimate confidence intervals for every `(column, statistic)` pair of
/// `observed` by ordinary case resampling.
///
/// Shorthand for [`Simulation`] with full-size resamples drawn with
/// replacement.
pub fn bootstrap_simulation<O: ToTable>(
    observed: O,
    statistics: &[NamedStatistic],
    confidence_level: f64,
    n_bootstraps: usize,
    seed: u64,
) -> Result<BootstrapReport> {
    Simulation::new()
        .confidence_level(confidence_level)
        .n_bootstraps(n_bootstraps)
        .seed(seed)
        .run(observed, statistics)
}

fn check_statistics(statistics: &[NamedStatistic]) -> Result<()> {
    if statistics.is_empty() {
        return Err(Error::NoStatistics);
    }
    for (i, s) in statistics.iter().enumerate() {
        if statistics[..i].iter().any(|t| t.name() == s.name()) {
            return Err(Error::DuplicateStatisticName(s.name().to_owned()));
        }
    }
    Ok(())
}

/// One row of scalars for a resample, laid out column-major:
/// slot `c * statistics.len() + s`.
fn evaluate_resample(resampled: &Table, statistics: &[NamedStatistic], iteration: usize) -> Result<Vec<f64>> {
    let mut row = Vec::with_capacity(resampled.column_count() * statistics.len());
    for c in 0..resampled.column_count() {
        for statistic in statistics {
            row.push(evaluate(statistic, resampled, c, iteration)?);
        }
    }
    Ok(row)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statistic_list_is_checked() {
        assert!(matches!(
            bootstrap_simulation(vec![1.0_f64, 2.0], &[], 0.95, 10, 1),
            Err(Error::NoStatistics)
        ));

        let stats = [NamedStatistic::mean(), NamedStatistic::new("mean", |_: &[f64]| 0.0)];
        assert!(matches!(
            bootstrap_simulation(vec![1.0_f64, 2.0], &stats, 0.95, 10, 1),
            Err(Error::DuplicateStatisticName(ref n)) if n == "mean"
        ));
    }

    #[test]
    fn arguments_are_validated_before_resampling() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let stats = [NamedStatistic::new("count", move |_: &[f64]| {
            counter.fetch_add(1, Ordering::Relaxed);
            0.0
        })];

        assert!(matches!(
            bootstrap_simulation(vec![1.0_f64, 2.0], &stats, 1.0, 10, 1),
            Err(Error::InvalidConfidenceLevel(_))
        ));
        assert!(matches!(
            bootstrap_simulation(vec![vec![1.0_f64, 2.0], vec![3.0]], &stats, 0.9, 10, 1),
            Err(Error::Shape { .. })
        ));
        assert!(matches!(
            bootstrap_simulation(vec![1.0_f64, 2.0], &stats, 0.9, 0, 1),
            Err(Error::InvalidShape { .. })
        ));
        assert!(matches!(
            Simulation::new().fraction(0.0).run(vec![1.0_f64, 2.0], &stats),
            Err(Error::InvalidFraction { .. })
        ));
        assert_eq!(calls.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn statistic_is_called_once_per_column_and_iteration() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let stats = [NamedStatistic::new("count", move |_: &[f64]| {
            counter.fetch_add(1, Ordering::Relaxed);
            1.0
        })];

        let report = bootstrap_simulation(vec![vec![1_i32, 2, 3], vec![4, 5, 6]], &stats, 0.9, 25, 3).unwrap();
        assert_eq!(calls.load(Ordering::Relaxed), 2 * 25);
        assert_eq!(report.get("0", "count"), Some(&crate::BootstrapResult::point(1.0)));
    }

    #[test]
    fn cancelled_token_aborts_run() {
        let token = CancelToken::new();
        token.cancel();

        let err = Simulation::new()
            .cancel_token(token)
            .run(vec![1.0_f64, 2.0, 3.0], &[NamedStatistic::mean()])
            .unwrap_err();
        assert!(matches!(err, Error::Cancelled { completed: 0, total: 100 }));
    }

    #[test]
    fn cancelling_mid_run_stops_early() {
        let token = CancelToken::new();
        let trigger = token.clone();
        let stats = [NamedStatistic::new("cancel_after_first", move |xs: &[f64]| {
            trigger.cancel();
            xs[0]
        })];

        let err = Simulation::new()
            .n_bootstraps(50)
            .cancel_token(token)
            .run(vec![1.0_f64, 2.0, 3.0], &stats)
            .unwrap_err();
        assert!(matches!(err, Error::Cancelled { total: 50, .. }));
    }
}

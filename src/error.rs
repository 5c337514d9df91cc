//! Error type shared by every stage of a bootstrap run.

use thiserror::Error;

/// Failure raised by a caller-supplied statistic.
pub type StatisticFailure = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors produced while building tables, generating indices, evaluating
/// statistics or reducing distributions.
#[derive(Error, Debug)]
pub enum Error {
    /// Columns of an input table have different lengths.
    #[error("column `{column}` has {actual} rows, expected {expected}")]
    Shape {
        column: String,
        expected: usize,
        actual: usize,
    },

    /// The input contains no columns at all.
    #[error("input table has no columns")]
    EmptyTable,

    /// Two input columns share a name.
    #[error("duplicate column name `{0}`")]
    DuplicateColumnName(String),

    /// Index matrix requested with zero rows or zero bootstraps.
    #[error("invalid index matrix shape: n_rows = {n_rows}, n_bootstraps = {n_bootstraps}")]
    InvalidShape { n_rows: usize, n_bootstraps: usize },

    /// Resampling fraction outside `(0, 1]` or yielding an empty resample.
    #[error("invalid resampling fraction {fraction}: {reason}")]
    InvalidFraction { fraction: f64, reason: &'static str },

    /// A gather index points past the end of a column.
    #[error("index {index} out of range for {len} rows")]
    IndexOutOfRange { index: usize, len: usize },

    /// Confidence level outside the open interval `(0, 1)`.
    #[error("confidence level {0} must lie in (0, 1)")]
    InvalidConfidenceLevel(f64),

    /// Lower bound greater than upper bound.
    #[error("lower_bound must not exceed upper_bound (lower_bound: {lower}, upper_bound: {upper})")]
    InvalidInterval { lower: f64, upper: f64 },

    /// Relative error requested for a zero point estimate.
    #[error("error fraction undefined for a zero-valued estimate")]
    DivisionByZero,

    /// No statistics were supplied to a simulation.
    #[error("at least one statistic is required")]
    NoStatistics,

    /// Two statistics share a name.
    #[error("duplicate statistic name `{0}`")]
    DuplicateStatisticName(String),

    /// A statistic failed on one resample.
    #[error("statistic `{statistic}` failed on column `{column}` at iteration {iteration}: {source}")]
    StatisticEvaluation {
        column: String,
        statistic: String,
        iteration: usize,
        #[source]
        source: StatisticFailure,
    },

    /// Every value in a distribution was NaN.
    #[error("distribution has no finite-comparable values")]
    EmptyDistribution,

    /// The run was cancelled before all iterations completed.
    #[error("bootstrap cancelled after {completed} of {total} iterations")]
    Cancelled { completed: usize, total: usize },

    /// Serialized data is internally inconsistent.
    #[error("corrupt serialized data: {0}")]
    Corrupt(String),

    /// I/O error while reading input.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed CSV input.
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    /// A CSV field is not a number.
    #[error("column `{column}` row {row}: `{value}` is not a number")]
    Parse {
        column: String,
        row: usize,
        value: String,
    },
}

/// Result alias over [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

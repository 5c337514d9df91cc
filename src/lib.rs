//! Bootstrap confidence intervals for arbitrary statistics over one or more
//! observed samples.
//!
//! ```
//! use bootstrapped::{bootstrap_simulation, NamedStatistic};
//!
//! let report = bootstrap_simulation(
//!     vec![vec![1.0_f64, 2.0, 3.0, 4.0, 5.0], vec![10.0, 20.0, 30.0, 40.0, 50.0]],
//!     &[NamedStatistic::mean(), NamedStatistic::median()],
//!     0.95,
//!     100,
//!     10,
//! )
//! .unwrap();
//!
//! println!("{report}");
//! ```

mod display;
mod error;
mod report;
mod resample;
mod result;
mod simulation;
mod statistics;
mod table;

pub use crate::error::{Error, Result, StatisticFailure};
pub use crate::report::{BootstrapReport, ColumnReport};
pub use crate::resample::*;
pub use crate::result::{BootstrapResult, Significance};
pub use crate::simulation::{bootstrap_simulation, CancelToken, Simulation};
pub use crate::statistics::*;
pub use crate::table::{Column, DType, Element, Table, ToTable};
pub use rand;

/// Resampling scheme producing resamples of `T`.
pub trait Re<T> {
    /// One resample.
    type Item;
    /// Iterate over the resamples of `t`.
    fn re<'a>(&'a self, t: &'a T) -> impl Iterator<Item = Self::Item> + 'a;
}

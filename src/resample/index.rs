use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[cfg(feature = "rayon")]
use rayon::prelude::*;

use crate::error::{Error, Result};

/// Parameters of an index matrix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndexPlan {
    /// Rows in the observed table.
    pub n_rows: usize,
    /// Number of bootstrap iterations (matrix columns).
    pub n_bootstraps: usize,
    /// Share of `n_rows` drawn per iteration, in `(0, 1]`.
    pub fraction: f64,
    /// Seed of the generator.
    pub seed: u64,
    /// Draw with replacement (ordinary bootstrap) or without (subsampling).
    pub with_replacement: bool,
}

impl IndexPlan {
    /// Plan for a full-size resample with replacement and the default seed.
    pub fn new(n_rows: usize, n_bootstraps: usize) -> Self {
        Self {
            n_rows,
            n_bootstraps,
            fraction: 1.0,
            seed: 10,
            with_replacement: true,
        }
    }

    /// Set the resampled share of rows.
    #[must_use]
    pub fn fraction(mut self, fraction: f64) -> Self {
        self.fraction = fraction;
        self
    }

    /// Set the generator seed.
    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Choose between drawing with or without replacement.
    #[must_use]
    pub fn with_replacement(mut self, with_replacement: bool) -> Self {
        self.with_replacement = with_replacement;
        self
    }

    /// Rows drawn per iteration: `round(fraction * n_rows)`.
    #[allow(clippy::cast_precision_loss, clippy::cast_sign_loss)]
    pub fn resample_size(&self) -> usize {
        (self.fraction * self.n_rows as f64).round() as usize
    }

    /// Check the plan before any drawing happens.
    ///
    /// # Errors
    /// - [`Error::InvalidShape`] when `n_rows` or `n_bootstraps` is zero
    /// - [`Error::InvalidFraction`] when `fraction ∉ (0, 1]` or rounds to an
    ///   empty resample
    pub fn validate(&self) -> Result<()> {
        if self.n_rows == 0 || self.n_bootstraps == 0 {
            return Err(Error::InvalidShape {
                n_rows: self.n_rows,
                n_bootstraps: self.n_bootstraps,
            });
        }
        // NaN fails both comparisons
        if !(self.fraction > 0.0 && self.fraction <= 1.0) {
            return Err(Error::InvalidFraction {
                fraction: self.fraction,
                reason: "must lie in (0, 1]",
            });
        }
        if self.resample_size() == 0 {
            return Err(Error::InvalidFraction {
                fraction: self.fraction,
                reason: "rounds to an empty resample",
            });
        }
        Ok(())
    }
}

/// Row-selection vectors, one column per bootstrap iteration.
///
/// Stored column-major: column `i` occupies `data[i * len..(i + 1) * len]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawIndexMatrix")]
pub struct IndexMatrix {
    data: Vec<usize>,
    n_rows: usize,
    len: usize,
    n_bootstraps: usize,
}

#[derive(Deserialize)]
struct RawIndexMatrix {
    data: Vec<usize>,
    n_rows: usize,
    len: usize,
    n_bootstraps: usize,
}

impl TryFrom<RawIndexMatrix> for IndexMatrix {
    type Error = Error;

    fn try_from(raw: RawIndexMatrix) -> Result<Self> {
        if raw.n_rows == 0 || raw.n_bootstraps == 0 {
            return Err(Error::InvalidShape {
                n_rows: raw.n_rows,
                n_bootstraps: raw.n_bootstraps,
            });
        }
        if raw.len == 0 || raw.len > raw.n_rows {
            return Err(Error::Corrupt(format!(
                "column length {} outside 1..={}",
                raw.len, raw.n_rows
            )));
        }
        if raw.data.len() != raw.len * raw.n_bootstraps {
            return Err(Error::Corrupt(format!(
                "{} indices for {} columns of {}",
                raw.data.len(),
                raw.n_bootstraps,
                raw.len
            )));
        }
        if let Some(&index) = raw.data.iter().find(|&&i| i >= raw.n_rows) {
            return Err(Error::IndexOutOfRange { index, len: raw.n_rows });
        }

        Ok(Self {
            data: raw.data,
            n_rows: raw.n_rows,
            len: raw.len,
            n_bootstraps: raw.n_bootstraps,
        })
    }
}

impl IndexMatrix {
    /// Number of columns (bootstrap iterations).
    pub fn n_bootstraps(&self) -> usize {
        self.n_bootstraps
    }

    /// Length of each column.
    pub fn column_len(&self) -> usize {
        self.len
    }

    /// Row count of the table the indices point into.
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// Indices for iteration `i`.
    pub fn column(&self, i: usize) -> Option<&[usize]> {
        (i < self.n_bootstraps).then(|| &self.data[i * self.len..(i + 1) * self.len])
    }

    /// Iterate over columns in iteration order.
    pub fn columns(&self) -> std::slice::ChunksExact<'_, usize> {
        self.data.chunks_exact(self.len)
    }

    /// Parallel iterator over columns in iteration order.
    #[cfg(feature = "rayon")]
    pub fn par_columns(&self) -> rayon::slice::ChunksExact<'_, usize> {
        self.data.par_chunks_exact(self.len)
    }
}

/// Generate a reproducible index matrix with [`StdRng`].
///
/// Same plan (seed included) always yields the same matrix.
pub fn create_index_matrix(
    n_rows: usize,
    n_bootstraps: usize,
    fraction: f64,
    seed: u64,
    with_replacement: bool,
) -> Result<IndexMatrix> {
    let plan = IndexPlan {
        n_rows,
        n_bootstraps,
        fraction,
        seed,
        with_replacement,
    };
    create_index_matrix_with::<StdRng>(&plan)
}

/// Generate an index matrix with a caller-chosen generator.
///
/// Column `i` is drawn from `R::seed_from_u64(seed + i)`, so columns are
/// independent of each other and of the order they are produced in.
pub fn create_index_matrix_with<R>(plan: &IndexPlan) -> Result<IndexMatrix>
where
    R: Rng + SeedableRng,
{
    plan.validate()?;

    let len = plan.resample_size();
    debug!(
        n_rows = plan.n_rows,
        n_bootstraps = plan.n_bootstraps,
        len,
        seed = plan.seed,
        with_replacement = plan.with_replacement,
        "generating index matrix"
    );

    let mut data = vec![0usize; len * plan.n_bootstraps];
    let fill = |(i, column): (usize, &mut [usize])| {
        let mut rng = R::seed_from_u64(plan.seed.wrapping_add(i as u64));
        if plan.with_replacement {
            draw_with_replacement(&mut rng, plan.n_rows, column);
        } else {
            draw_without_replacement(&mut rng, plan.n_rows, column);
        }
    };

    #[cfg(feature = "rayon")]
    data.par_chunks_exact_mut(len).enumerate().for_each(fill);
    #[cfg(not(feature = "rayon"))]
    data.chunks_exact_mut(len).enumerate().for_each(fill);

    Ok(IndexMatrix {
        data,
        n_rows: plan.n_rows,
        len,
        n_bootstraps: plan.n_bootstraps,
    })
}

#[inline]
fn draw_with_replacement<R: Rng>(rng: &mut R, n: usize, out: &mut [usize]) {
    for slot in out {
        *slot = rng.gen_range(0..n);
    }
}

/// Partial Fisher-Yates: shuffle the tail `k` positions of `0..n` and keep them.
fn draw_without_replacement<R: Rng>(rng: &mut R, n: usize, out: &mut [usize]) {
    let k = out.len();
    let mut pool: Vec<usize> = (0..n).collect();
    for i in (n - k..n).rev() {
        let j = rng.gen_range(0..=i);
        pool.swap(i, j);
    }
    out.copy_from_slice(&pool[n - k..]);
}

use std::iter::FusedIterator;

use super::IndexMatrix;
use crate::error::Result;
use crate::{Re, Table};

impl Re<Table> for IndexMatrix {
    type Item = Result<Table>;

    fn re<'a>(&'a self, table: &'a Table) -> impl Iterator<Item = Self::Item> + 'a {
        Gather::new(table, self)
    }
}

/// Resampled tables, one per index-matrix column, in iteration order.
///
/// Each item is built fresh from the shared observed table and dropped by
/// the caller once its statistics are computed.
pub struct Gather<'a> {
    table: &'a Table,
    columns: std::slice::ChunksExact<'a, usize>,
}

impl<'a> Gather<'a> {
    /// Iterate over the resamples of `table` selected by `matrix`.
    pub fn new(table: &'a Table, matrix: &'a IndexMatrix) -> Self {
        Self {
            table,
            columns: matrix.columns(),
        }
    }
}

impl Iterator for Gather<'_> {
    type Item = Result<Table>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.columns.next().map(|idx| self.table.gather(idx))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.columns.size_hint()
    }
}

impl ExactSizeIterator for Gather<'_> {}
impl FusedIterator for Gather<'_> {}

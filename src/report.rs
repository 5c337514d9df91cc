use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::BootstrapResult;

/// Results for one input column, keyed by statistic name in call order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnReport {
    name: String,
    results: Vec<(String, BootstrapResult)>,
}

impl ColumnReport {
    pub(crate) fn new(name: String, results: Vec<(String, BootstrapResult)>) -> Self {
        Self { name, results }
    }

    /// Column name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Result for a statistic.
    pub fn get(&self, statistic: &str) -> Option<&BootstrapResult> {
        self.results
            .iter()
            .find(|(name, _)| name == statistic)
            .map(|(_, r)| r)
    }

    /// `(statistic, result)` pairs in call order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BootstrapResult)> {
        self.results.iter().map(|(n, r)| (n.as_str(), r))
    }

    /// Number of statistics.
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Check if no statistic was computed.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// Mapping from column name to statistic name to [`BootstrapResult`],
/// ordered as the input columns and statistics were given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BootstrapReport {
    columns: Vec<ColumnReport>,
    confidence_level: f64,
    n_bootstraps: usize,
}

impl BootstrapReport {
    pub(crate) fn new(columns: Vec<ColumnReport>, confidence_level: f64, n_bootstraps: usize) -> Self {
        Self {
            columns,
            confidence_level,
            n_bootstraps,
        }
    }

    /// Results for one column.
    pub fn column(&self, name: &str) -> Option<&ColumnReport> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Result for a `(column, statistic)` pair.
    pub fn get(&self, column: &str, statistic: &str) -> Option<&BootstrapResult> {
        self.column(column).and_then(|c| c.get(statistic))
    }

    /// Column reports in input order.
    pub fn columns(&self) -> &[ColumnReport] {
        &self.columns
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Check if the report holds no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Confidence level the intervals were built at.
    pub fn confidence_level(&self) -> f64 {
        self.confidence_level
    }

    /// Number of resamples behind each interval.
    pub fn n_bootstraps(&self) -> usize {
        self.n_bootstraps
    }

    /// Nested map view, sorted by name.
    pub fn to_map(&self) -> BTreeMap<String, BTreeMap<String, BootstrapResult>> {
        self.columns
            .iter()
            .map(|c| (c.name.clone(), c.results.iter().cloned().collect()))
            .collect()
    }
}

impl<'a> IntoIterator for &'a BootstrapReport {
    type Item = &'a ColumnReport;
    type IntoIter = std::slice::Iter<'a, ColumnReport>;

    fn into_iter(self) -> Self::IntoIter {
        self.columns.iter()
    }
}

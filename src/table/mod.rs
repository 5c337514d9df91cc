mod convert;
mod read;

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub use convert::{Element, ToTable};

/// Storage kind of a [`Column`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DType {
    /// Signed 64-bit integers.
    Int,
    /// 64-bit floats.
    Float,
}

/// A homogeneous column of observations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Column {
    /// Integer observations.
    Int(Vec<i64>),
    /// Floating-point observations.
    Float(Vec<f64>),
}

impl Column {
    /// Number of rows in the column.
    pub fn len(&self) -> usize {
        match self {
            Column::Int(v) => v.len(),
            Column::Float(v) => v.len(),
        }
    }

    /// Check if the column holds no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Storage kind.
    pub fn dtype(&self) -> DType {
        match self {
            Column::Int(_) => DType::Int,
            Column::Float(_) => DType::Float,
        }
    }

    /// View the column as floats, borrowing when it already is one.
    pub fn values(&self) -> Cow<'_, [f64]> {
        match self {
            Column::Float(v) => Cow::Borrowed(v),
            #[allow(clippy::cast_precision_loss)]
            Column::Int(v) => Cow::Owned(v.iter().map(|&x| x as f64).collect()),
        }
    }

    /// Select rows at `indices`, preserving the storage kind.
    ///
    /// Fails with [`Error::IndexOutOfRange`] on the first index past the end.
    pub fn gather(&self, indices: &[usize]) -> Result<Column> {
        fn pick<T: Copy>(data: &[T], indices: &[usize]) -> Result<Vec<T>> {
            indices
                .iter()
                .map(|&i| {
                    data.get(i).copied().ok_or(Error::IndexOutOfRange {
                        index: i,
                        len: data.len(),
                    })
                })
                .collect()
        }

        Ok(match self {
            Column::Int(v) => Column::Int(pick(v, indices)?),
            Column::Float(v) => Column::Float(pick(v, indices)?),
        })
    }
}

impl From<Vec<f64>> for Column {
    fn from(v: Vec<f64>) -> Self {
        Column::Float(v)
    }
}

impl From<Vec<i64>> for Column {
    fn from(v: Vec<i64>) -> Self {
        Column::Int(v)
    }
}

/// Column-oriented table of named observations with equal lengths.
///
/// Immutable once built: resampling produces new tables through
/// [`Table::gather`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTable")]
pub struct Table {
    names: Vec<String>,
    columns: Vec<Column>,
    row_count: usize,
}

#[derive(Deserialize)]
struct RawTable {
    names: Vec<String>,
    columns: Vec<Column>,
    row_count: usize,
}

impl TryFrom<RawTable> for Table {
    type Error = Error;

    fn try_from(raw: RawTable) -> Result<Self> {
        if raw.names.len() != raw.columns.len() {
            return Err(Error::Corrupt(format!(
                "{} column names for {} columns",
                raw.names.len(),
                raw.columns.len()
            )));
        }
        let table = Table::new(raw.names.into_iter().zip(raw.columns))?;
        if table.row_count != raw.row_count {
            return Err(Error::Corrupt(format!(
                "row_count {} but columns hold {} rows",
                raw.row_count, table.row_count
            )));
        }
        Ok(table)
    }
}

impl Table {
    /// Build a table from ordered `(name, column)` pairs.
    ///
    /// # Errors
    /// - [`Error::EmptyTable`] when `columns` is empty
    /// - [`Error::DuplicateColumnName`] when two names coincide
    /// - [`Error::Shape`] when lengths differ from the first column
    pub fn new<S: Into<String>>(columns: impl IntoIterator<Item = (S, Column)>) -> Result<Self> {
        let (names, columns): (Vec<String>, Vec<Column>) = columns
            .into_iter()
            .map(|(name, column)| (name.into(), column))
            .unzip();

        let Some(first) = columns.first() else {
            return Err(Error::EmptyTable);
        };
        let row_count = first.len();

        for (i, (name, column)) in names.iter().zip(&columns).enumerate() {
            if names[..i].contains(name) {
                return Err(Error::DuplicateColumnName(name.clone()));
            }
            if column.len() != row_count {
                return Err(Error::Shape {
                    column: name.clone(),
                    expected: row_count,
                    actual: column.len(),
                });
            }
        }

        Ok(Self { names, columns, row_count })
    }

    /// Number of rows shared by every column.
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Column names in order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Column by position.
    pub fn column_at(&self, i: usize) -> Option<&Column> {
        self.columns.get(i)
    }

    /// Column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| &self.columns[i])
    }

    /// Iterate over `(name, column)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Column)> {
        self.names.iter().map(String::as_str).zip(&self.columns)
    }

    /// Gather the rows at `indices` from every column into a new table.
    ///
    /// Names, order and storage kinds are preserved; `self` is untouched.
    pub fn gather(&self, indices: &[usize]) -> Result<Table> {
        let columns = self
            .columns
            .iter()
            .map(|c| c.gather(indices))
            .collect::<Result<Vec<_>>>()?;

        Ok(Table {
            names: self.names.clone(),
            columns,
            row_count: indices.len(),
        })
    }
}

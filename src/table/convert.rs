use num_traits::ToPrimitive;

use super::{Column, Table};
use crate::error::Result;

/// Conversion of caller input into a [`Table`].
///
/// Flat sequences become one column named `"0"`; nested sequences become one
/// column per inner sequence, named by position.
pub trait ToTable {
    /// Normalize `self` into a table.
    ///
    /// # Errors
    /// [`crate::Error::Shape`] for ragged nested input,
    /// [`crate::Error::EmptyTable`] when there is nothing to convert.
    fn to_table(self) -> Result<Table>;
}

/// Numeric element accepted by the [`ToTable`] conversions.
pub trait Element: Copy + ToPrimitive {
    /// Collect values into a column of the matching storage kind.
    fn column<I: IntoIterator<Item = Self>>(values: I) -> Column;
}

macro_rules! element {
    (int: $($t:ty),*) => {$(
        impl Element for $t {
            fn column<I: IntoIterator<Item = Self>>(values: I) -> Column {
                Column::Int(values.into_iter().map(i64::from).collect())
            }
        }
    )*};
    (float: $($t:ty),*) => {$(
        impl Element for $t {
            fn column<I: IntoIterator<Item = Self>>(values: I) -> Column {
                Column::Float(values.into_iter().map(f64::from).collect())
            }
        }
    )*};
}

element!(int: i64, i32, i16, i8, u32, u16, u8);
element!(float: f64, f32);

fn positional<C: IntoIterator<Item = Column>>(columns: C) -> Result<Table> {
    Table::new(
        columns
            .into_iter()
            .enumerate()
            .map(|(i, c)| (i.to_string(), c)),
    )
}

macro_rules! to_table {
    ($($t:ty),*) => {$(
        impl ToTable for Vec<$t> {
            fn to_table(self) -> Result<Table> {
                positional([<$t>::column(self)])
            }
        }

        impl ToTable for &[$t] {
            fn to_table(self) -> Result<Table> {
                positional([<$t>::column(self.iter().copied())])
            }
        }

        impl<const N: usize> ToTable for [$t; N] {
            fn to_table(self) -> Result<Table> {
                positional([<$t>::column(self)])
            }
        }

        impl ToTable for Vec<Vec<$t>> {
            fn to_table(self) -> Result<Table> {
                positional(self.into_iter().map(<$t>::column))
            }
        }

        impl ToTable for &[Vec<$t>] {
            fn to_table(self) -> Result<Table> {
                positional(self.iter().map(|v| <$t>::column(v.iter().copied())))
            }
        }

        impl<const N: usize, const M: usize> ToTable for [[$t; N]; M] {
            fn to_table(self) -> Result<Table> {
                positional(self.into_iter().map(<$t>::column))
            }
        }

        impl<S: Into<String>> ToTable for Vec<(S, Vec<$t>)> {
            fn to_table(self) -> Result<Table> {
                Table::new(self.into_iter().map(|(name, v)| (name, <$t>::column(v))))
            }
        }
    )*};
}

to_table!(f64, f32, i64, i32, i16, i8, u32, u16, u8);

impl ToTable for Table {
    fn to_table(self) -> Result<Table> {
        Ok(self)
    }
}

impl ToTable for &Table {
    fn to_table(self) -> Result<Table> {
        Ok(self.clone())
    }
}

impl<S: Into<String>> ToTable for Vec<(S, Column)> {
    fn to_table(self) -> Result<Table> {
        Table::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn flat_sequence_is_one_column() {
        let table = vec![1.0_f64, 2.0, 3.0, 4.0].to_table().unwrap();
        assert_eq!(table.names(), ["0"]);
        assert_eq!(table.row_count(), 4);
        assert_eq!(table.column("0"), Some(&Column::Float(vec![1.0, 2.0, 3.0, 4.0])));
    }

    #[test]
    fn nested_sequences_are_named_by_position() {
        let table = vec![vec![10_i64, 20, 30, 40], vec![100, 200, 300, 400]]
            .to_table()
            .unwrap();

        assert_eq!(table.names(), ["0", "1"]);
        assert_eq!(table.row_count(), 4);
        assert_eq!(table.column("1"), Some(&Column::Int(vec![100, 200, 300, 400])));
    }

    #[test]
    fn arrays_and_slices_convert() {
        let table = [[1_u8, 2, 3], [7, 8, 9]].to_table().unwrap();
        assert_eq!(table.column_count(), 2);
        assert_eq!(table.column("0"), Some(&Column::Int(vec![1, 2, 3])));

        let data = [0.5_f32, 1.5];
        let table = data.as_slice().to_table().unwrap();
        assert_eq!(table.column("0"), Some(&Column::Float(vec![0.5, 1.5])));
    }

    #[test]
    fn labelled_columns_keep_names() {
        let table = vec![("col1", vec![1_i32, 2, 3]), ("col2", vec![4, 5, 6])]
            .to_table()
            .unwrap();
        assert_eq!(table.names(), ["col1", "col2"]);
    }

    #[test]
    fn ragged_nested_input_fails() {
        let err = vec![vec![1.0_f64, 2.0], vec![3.0]].to_table().unwrap_err();
        assert!(matches!(err, Error::Shape { expected: 2, actual: 1, .. }));
    }

    #[test]
    fn empty_outer_sequence_fails() {
        let err = Vec::<Vec<f64>>::new().to_table().unwrap_err();
        assert!(matches!(err, Error::EmptyTable));
    }
}

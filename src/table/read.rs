use std::io;
use std::path::Path;

use csv::ReaderBuilder;

use super::{Column, Table};
use crate::error::{Error, Result};

impl Table {
    /// Read a table from a CSV file whose header row names the columns.
    ///
    /// Columns whose every field parses as an integer are stored as
    /// [`Column::Int`], everything else as [`Column::Float`].
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        let rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
        Self::from_csv(rdr)
    }

    /// Read a headered CSV table from any reader.
    pub fn from_reader<R: io::Read>(reader: R) -> Result<Self> {
        let rdr = ReaderBuilder::new().has_headers(true).from_reader(reader);
        Self::from_csv(rdr)
    }

    fn from_csv<R: io::Read>(mut rdr: csv::Reader<R>) -> Result<Self> {
        let names: Vec<String> = rdr.headers()?.iter().map(|h| h.trim().to_owned()).collect();
        let mut raw: Vec<Vec<String>> = vec![Vec::new(); names.len()];

        for record in rdr.records() {
            let record = record?;
            for (field, column) in record.iter().zip(raw.iter_mut()) {
                column.push(field.trim().to_owned());
            }
        }

        if raw.first().is_none_or(Vec::is_empty) {
            return Err(Error::EmptyTable);
        }

        let columns = names
            .iter()
            .zip(raw)
            .map(|(name, fields)| parse_column(name, &fields))
            .collect::<Result<Vec<_>>>()?;

        Table::new(names.into_iter().zip(columns))
    }
}

fn parse_column(name: &str, fields: &[String]) -> Result<Column> {
    if let Ok(ints) = fields.iter().map(|f| f.parse::<i64>()).collect::<std::result::Result<Vec<_>, _>>() {
        return Ok(Column::Int(ints));
    }

    fields
        .iter()
        .enumerate()
        .map(|(row, f)| {
            f.parse::<f64>().map_err(|_| Error::Parse {
                column: name.to_owned(),
                row,
                value: f.clone(),
            })
        })
        .collect::<Result<Vec<_>>>()
        .map(Column::Float)
}

//! CSV tables read and written through polars.
//!
//! Every column is read as text: codes keep their zero padding and counts are
//! carried verbatim until a stage needs them as numbers.

use std::fs::{self, File};
use std::path::Path;

use polars::prelude::*;

use crate::error::{Error, Result};

pub fn read_csv(path: &Path) -> Result<DataFrame> {
    let file = File::open(path)?;
    log::debug!("Reading {}", path.display());
    Ok(CsvReader::new(file)
        .has_header(true)
        .infer_schema(Some(0))
        .finish()?)
}

pub fn write_csv(path: &Path, df: &mut DataFrame) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    CsvWriter::new(&mut file).finish(df)?;
    Ok(())
}

/// Text column for writing; empty values become nulls so the CSV field stays bare.
pub fn text_series<'a, I>(name: &str, values: I) -> Series
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let values: Vec<Option<&str>> = values
        .into_iter()
        .map(|value| value.filter(|v| !v.is_empty()))
        .collect();
    Series::new(name, values)
}

/// Text values of `column`; empty fields come back as `None`.
pub fn text_column<'a>(
    df: &'a DataFrame,
    table: &str,
    column: &str,
) -> Result<Vec<Option<&'a str>>> {
    let series = df.column(column).map_err(|_| Error::MissingColumn {
        table: table.to_string(),
        column: column.to_string(),
    })?;
    Ok(series
        .str()?
        .into_iter()
        .map(|value| value.filter(|v| !v.is_empty()))
        .collect())
}

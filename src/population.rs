//! Census population extraction.

use census::{PopulationRow, CENSUS_CODE, CENSUS_POPULATION, POPULATION, POSTCODE};
use polars::prelude::*;

use crate::config::Config;
use crate::error::Result;
use crate::table;

const TABLE: &str = "census";

/// Projects the census table onto postcode and population, in input order.
pub fn extract_rows(census: &DataFrame) -> Result<Vec<PopulationRow>> {
    let codes = table::text_column(census, TABLE, CENSUS_CODE)?;
    let populations = table::text_column(census, TABLE, CENSUS_POPULATION)?;
    Ok(codes
        .into_iter()
        .zip(populations)
        .map(|(code, population)| PopulationRow {
            code: census::strip_prefix(code.unwrap_or_default()).to_string(),
            population: population.unwrap_or_default().to_string(),
        })
        .collect())
}

pub fn to_frame(rows: &[PopulationRow]) -> Result<DataFrame> {
    Ok(DataFrame::new(vec![
        table::text_series(POSTCODE, rows.iter().map(|row| Some(row.code.as_str()))),
        table::text_series(
            POPULATION,
            rows.iter().map(|row| Some(row.population.as_str())),
        ),
    ])?)
}

/// Reads the extracted population table back.
pub fn read_rows(df: &DataFrame) -> Result<Vec<PopulationRow>> {
    let codes = table::text_column(df, "population", POSTCODE)?;
    let populations = table::text_column(df, "population", POPULATION)?;
    Ok(codes
        .into_iter()
        .zip(populations)
        .map(|(code, population)| PopulationRow {
            code: code.unwrap_or_default().to_string(),
            population: population.unwrap_or_default().to_string(),
        })
        .collect())
}

pub fn run(config: &Config) -> Result<usize> {
    let census = table::read_csv(&config.census)?;
    let rows = extract_rows(&census)?;
    let mut out = to_frame(&rows)?;
    table::write_csv(&config.population, &mut out)?;
    log::info!(
        "Extracted {} postcodes with population data to {}",
        rows.len(),
        config.population.display()
    );
    Ok(rows.len())
}

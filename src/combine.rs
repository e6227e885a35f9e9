//! Joins firearms counts onto population by postcode and derives the rate.

use std::collections::HashMap;
use std::fmt;

use census::{PopulationRow, PostcodeRecord, Rate, FIREARMS, FIREARMS_PER_1000, POPULATION, POSTCODE};
use polars::prelude::*;

use crate::config::Config;
use crate::error::Result;
use crate::{population, table};

const TABLE: &str = "firearms";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CombineSummary {
    pub total: usize,
    pub with_population: usize,
    pub without_population: usize,
}

impl CombineSummary {
    pub fn of(records: &[PostcodeRecord]) -> Self {
        let with_population = records.iter().filter(|r| r.population.is_some()).count();
        Self {
            total: records.len(),
            with_population,
            without_population: records.len() - with_population,
        }
    }
}

impl fmt::Display for CombineSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total postcodes: {}", self.total)?;
        writeln!(f, "Postcodes with population data: {}", self.with_population)?;
        write!(f, "Postcodes without population data: {}", self.without_population)
    }
}

/// Combines in firearms order; a repeated population postcode keeps its last value.
pub fn combine<'a, I>(population: &[PopulationRow], firearms: I) -> Vec<PostcodeRecord>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let lookup: HashMap<&str, &str> = population
        .iter()
        .map(|row| (row.code.as_str(), row.population.as_str()))
        .collect();

    firearms
        .into_iter()
        .map(|(code, count)| {
            let population = lookup.get(code).map(|p| p.to_string());
            PostcodeRecord::new(code.to_string(), population, count.to_string())
        })
        .collect()
}

pub fn to_frame(records: &[PostcodeRecord]) -> Result<DataFrame> {
    let rates: Vec<String> = records.iter().map(|r| r.rate.to_string()).collect();
    Ok(DataFrame::new(vec![
        table::text_series(POSTCODE, records.iter().map(|r| Some(r.code.as_str()))),
        table::text_series(
            POPULATION,
            records.iter().map(|r| Some(r.population_field())),
        ),
        table::text_series(FIREARMS, records.iter().map(|r| Some(r.firearms.as_str()))),
        table::text_series(FIREARMS_PER_1000, rates.iter().map(|r| Some(r.as_str()))),
    ])?)
}

/// Reads a combined table back into records.
pub fn read_records(df: &DataFrame) -> Result<Vec<PostcodeRecord>> {
    let name = "combined";
    let codes = table::text_column(df, name, POSTCODE)?;
    let populations = table::text_column(df, name, POPULATION)?;
    let firearms = table::text_column(df, name, FIREARMS)?;
    let rates = table::text_column(df, name, FIREARMS_PER_1000)?;

    Ok(codes
        .into_iter()
        .zip(populations)
        .zip(firearms.into_iter().zip(rates))
        .map(|((code, population), (firearms, rate))| PostcodeRecord {
            code: code.unwrap_or_default().to_string(),
            population: population
                .filter(|p| *p != census::NOT_AVAILABLE)
                .map(str::to_string),
            firearms: firearms.unwrap_or_default().to_string(),
            rate: Rate::parse(rate.unwrap_or_default()),
        })
        .collect())
}

pub fn run(config: &Config) -> Result<CombineSummary> {
    let population_df = table::read_csv(&config.population)?;
    let population = population::read_rows(&population_df)?;

    let firearms_df = table::read_csv(&config.firearms)?;
    let codes = table::text_column(&firearms_df, TABLE, POSTCODE)?;
    let counts = table::text_column(&firearms_df, TABLE, FIREARMS)?;
    let pairs = codes
        .into_iter()
        .zip(counts)
        .map(|(code, count)| (code.unwrap_or_default(), count.unwrap_or_default()));

    let records = combine(&population, pairs);
    let unavailable = records
        .iter()
        .filter(|r| r.rate == Rate::NotAvailable)
        .count();
    if unavailable > 0 {
        log::debug!("{unavailable} postcodes have no computable rate");
    }

    let mut out = to_frame(&records)?;
    table::write_csv(&config.combined, &mut out)?;
    log::info!("Combined data written to {}", config.combined.display());
    Ok(CombineSummary::of(&records))
}

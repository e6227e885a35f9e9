//! Error handling for the map pipeline.

use std::io;

use polars::prelude::PolarsError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("table error: {0}")]
    Polars(#[from] PolarsError),
    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("column {column} missing from {table}")]
    MissingColumn { table: String, column: String },
    #[error("boundary feature {index} has no {attribute} attribute")]
    MissingCode { index: usize, attribute: &'static str },
    #[error("no boundary with prefix {prefix} has a firearms rate")]
    NothingToMap { prefix: &'static str },
    #[error("boundary {code} has unsupported geometry: {kind}")]
    UnsupportedGeometry { code: String, kind: String },
}

pub type Result<T> = std::result::Result<T, Error>;

pub mod boundary;
pub mod combine;
pub mod config;
pub mod error;
pub mod maps;
pub mod population;
pub mod render;
pub mod scale;
pub mod stats;
pub mod table;
pub mod topology;

pub use config::{Config, MapOptions};
pub use error::{Error, Result};

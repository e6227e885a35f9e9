//! Project layout and map settings.

use std::path::{Path, PathBuf};

/// Input and output locations, relative to a project root.
#[derive(Debug, Clone)]
pub struct Config {
    pub census: PathBuf,
    pub population: PathBuf,
    pub firearms: PathBuf,
    pub combined: PathBuf,
    pub boundaries: PathBuf,
    pub choropleth_html: PathBuf,
    pub markers_html: PathBuf,
    /// Written by both the optimized and the pages map.
    pub site_html: PathBuf,
    pub site_topojson: PathBuf,
    pub map: MapOptions,
}

impl Config {
    pub fn with_root(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            census: root.join(
                "data/raw/2021_GCP_POA_for_NSW_short-header/\
                 2021 Census GCP Postal Areas for NSW/2021Census_G01_NSW_POA.csv",
            ),
            population: root.join("data/processed/postcode_population.csv"),
            firearms: root.join("data/raw/postcode_firearms.csv"),
            combined: root.join("data/processed/postcode_population_firearms.csv"),
            boundaries: root.join("data/raw/poa_2021/POA_2021_AUST_GDA2020.geojson"),
            choropleth_html: root.join("output/nsw_firearms_choropleth.html"),
            markers_html: root.join("output/nsw_firearms_heatmap.html"),
            site_html: root.join("map.html"),
            site_topojson: root.join("data.topojson"),
            map: MapOptions::default(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::with_root(".")
    }
}

/// Rendering settings shared by every map document.
#[derive(Debug, Clone)]
pub struct MapOptions {
    /// Map centre as (latitude, longitude).
    pub center: (f64, f64),
    pub zoom: u8,
    /// Douglas-Peucker tolerance in degrees (about 1 km).
    pub simplify_tolerance: f64,
    /// Positions per axis used when quantizing TopoJSON.
    pub quantization: u32,
    pub title: String,
    /// Above this the pages-hosted document is flagged as too large.
    pub max_site_bytes: u64,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            center: (-32.5, 147.0),
            zoom: 7,
            simplify_tolerance: 0.01,
            quantization: 10_000,
            title: "NSW Firearms Ownership by Postcode (2021)".to_string(),
            max_site_bytes: 90 * 1024 * 1024,
        }
    }
}

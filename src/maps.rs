//! Map commands: join, color and write the documents.

use std::fs;
use std::path::{Path, PathBuf};

use crate::boundary::{self, BoundaryFeature, REGION_PREFIX};
use crate::combine;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::render::{self, Marker};
use crate::scale::ColorScale;
use crate::stats::RateStats;
use crate::table;
use crate::topology;

/// Boundaries of the mapped region with their rate summary.
pub struct MapData {
    pub features: Vec<BoundaryFeature>,
    pub stats: RateStats,
}

impl MapData {
    pub fn load(config: &Config, simplify: Option<f64>) -> Result<Self> {
        log::info!("Loading postcode boundary data...");
        let boundaries = boundary::load_boundaries(&config.boundaries)?;
        log::info!("Loaded {} postcode boundaries", boundaries.len());

        log::info!("Loading firearms/population data...");
        let records = combine::read_records(&table::read_csv(&config.combined)?)?;

        let features = boundary::select_region(boundaries, &records, simplify);
        let stats = boundary::stats(&features).ok_or(Error::NothingToMap {
            prefix: REGION_PREFIX,
        })?;
        Ok(Self { features, stats })
    }
}

/// What a map command wrote.
#[derive(Debug, Clone)]
pub struct Written {
    pub stats: RateStats,
    pub files: Vec<(PathBuf, u64)>,
}

impl Written {
    pub fn total_bytes(&self) -> u64 {
        self.files.iter().map(|(_, size)| size).sum()
    }
}

fn write_document(path: &Path, html: &str) -> Result<u64> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, html)?;
    Ok(fs::metadata(path)?.len())
}

/// Self-contained choropleth, optionally with thinned polygons.
pub fn choropleth(config: &Config, simplify: Option<f64>, output: &Path) -> Result<Written> {
    let data = MapData::load(config, simplify)?;
    let scale = ColorScale::CHOROPLETH;
    let collection = boundary::to_collection(&data.features, Some((&scale, &data.stats)));
    let html = render::choropleth_document(&collection, &data.stats, &scale, &config.map);
    let size = write_document(output, &html)?;
    log::info!("Choropleth map saved to {}", output.display());
    Ok(Written {
        stats: data.stats,
        files: vec![(output.to_path_buf(), size)],
    })
}

/// The optimized single-file map published with the site.
pub fn optimized(config: &Config) -> Result<Written> {
    let written = choropleth(
        config,
        Some(config.map.simplify_tolerance),
        &config.site_html,
    )?;
    check_site_size(config, written.total_bytes());
    Ok(written)
}

/// TopoJSON plus a document that fetches it next to itself.
pub fn pages(config: &Config) -> Result<Written> {
    let data = MapData::load(config, None)?;
    log::info!("Converting {} postcodes to TopoJSON...", data.features.len());
    let topology = topology::encode(&data.features, config.map.quantization);
    let topology_size = topology::write(&config.site_topojson, &topology)?;

    let url = relative_url(&config.site_html, &config.site_topojson);
    let html = render::pages_document(&url, &data.stats, &ColorScale::CHOROPLETH, &config.map);
    let html_size = write_document(&config.site_html, &html)?;

    let written = Written {
        stats: data.stats,
        files: vec![
            (config.site_topojson.clone(), topology_size),
            (config.site_html.clone(), html_size),
        ],
    };
    check_site_size(config, written.total_bytes());
    Ok(written)
}

/// Circle markers at the boundary centroids.
pub fn markers(config: &Config) -> Result<Written> {
    let data = MapData::load(config, None)?;
    let scale = ColorScale::MARKERS;
    let markers: Vec<Marker> = data
        .features
        .iter()
        .filter_map(|f| Marker::from_feature(f, &scale, &data.stats))
        .collect();
    if markers.len() < data.features.len() {
        log::warn!(
            "{} postcodes have no centroid and were skipped",
            data.features.len() - markers.len()
        );
    }
    let html = render::markers_document(&markers, &data.stats, &config.map)?;
    let size = write_document(&config.markers_html, &html)?;
    log::info!("Marker map saved to {}", config.markers_html.display());
    Ok(Written {
        stats: data.stats,
        files: vec![(config.markers_html.clone(), size)],
    })
}

fn check_site_size(config: &Config, bytes: u64) {
    if bytes > config.map.max_site_bytes {
        log::warn!(
            "Site output is {:.2} MB, which may be too large to host",
            bytes as f64 / (1024.0 * 1024.0)
        );
    }
}

/// Path of `target` as seen from the directory holding `document`.
fn relative_url(document: &Path, target: &Path) -> String {
    let relative = match document.parent() {
        Some(dir) => target.strip_prefix(dir).unwrap_or(target),
        None => target,
    };
    relative.to_string_lossy().replace('\\', "/")
}

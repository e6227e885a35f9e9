//! Postal-area boundaries joined with the combined table.

use std::collections::HashMap;
use std::path::Path;

use census::{PostcodeRecord, BOUNDARY_CODE, NOT_AVAILABLE};
use geo::{Centroid, Geometry, Point, Simplify};
use geojson::{Feature, FeatureCollection, JsonValue};

use crate::error::{Error, Result};
use crate::scale::ColorScale;
use crate::stats::RateStats;

/// Only postcodes of this region are mapped.
pub const REGION_PREFIX: &str = "2";

pub const RATE_PROPERTY: &str = "firearms_rate";
pub const POPULATION_PROPERTY: &str = "population";
pub const FIREARMS_PROPERTY: &str = "firearms";
pub const FILL_PROPERTY: &str = "fill_color";

#[derive(Debug, Clone, PartialEq)]
pub struct Attributes {
    pub rate: f64,
    pub population: String,
    pub firearms: String,
}

#[derive(Debug, Clone)]
pub struct BoundaryFeature {
    pub code: String,
    pub geometry: Geometry<f64>,
    /// `None` when the postcode has no rate in the combined table.
    pub attributes: Option<Attributes>,
}

impl BoundaryFeature {
    pub fn rate(&self) -> Option<f64> {
        self.attributes.as_ref().map(|a| a.rate)
    }

    pub fn in_region(&self) -> bool {
        self.code.starts_with(REGION_PREFIX) && self.rate().is_some()
    }

    pub fn centroid(&self) -> Option<Point<f64>> {
        self.geometry.centroid()
    }

    pub fn simplified(mut self, tolerance: f64) -> Self {
        self.geometry = match self.geometry {
            Geometry::Polygon(polygon) => Geometry::Polygon(polygon.simplify(&tolerance)),
            Geometry::MultiPolygon(multi) => Geometry::MultiPolygon(multi.simplify(&tolerance)),
            other => other,
        };
        self
    }

    pub fn properties(&self) -> Vec<(&'static str, JsonValue)> {
        let (rate, population, firearms) = match &self.attributes {
            Some(a) => (Some(a.rate), a.population.as_str(), a.firearms.as_str()),
            None => (None, NOT_AVAILABLE, NOT_AVAILABLE),
        };
        vec![
            (BOUNDARY_CODE, JsonValue::from(self.code.as_str())),
            (RATE_PROPERTY, JsonValue::from(rate)),
            (POPULATION_PROPERTY, JsonValue::from(population)),
            (FIREARMS_PROPERTY, JsonValue::from(firearms)),
        ]
    }

    pub fn to_feature(&self, fill_color: Option<&str>) -> Feature {
        let mut feature = Feature {
            bbox: None,
            geometry: Some(geojson::Geometry::new(geojson::Value::from(&self.geometry))),
            id: None,
            properties: None,
            foreign_members: None,
        };
        for (key, value) in self.properties() {
            feature.set_property(key, value);
        }
        if let Some(color) = fill_color {
            feature.set_property(FILL_PROPERTY, color);
        }
        feature
    }
}

pub fn load_boundaries(path: &Path) -> Result<Vec<BoundaryFeature>> {
    let gj: FeatureCollection = std::fs::read_to_string(path)?.parse()?;
    parse_boundaries(gj)
}

pub fn parse_boundaries(gj: FeatureCollection) -> Result<Vec<BoundaryFeature>> {
    gj.features
        .into_iter()
        .enumerate()
        .map(|(index, feature)| {
            let code = match feature.property(BOUNDARY_CODE) {
                Some(JsonValue::String(code)) => code.clone(),
                Some(JsonValue::Number(code)) => code.to_string(),
                _ => {
                    return Err(Error::MissingCode {
                        index,
                        attribute: BOUNDARY_CODE,
                    })
                }
            };
            let Some(geometry) = feature.geometry else {
                return Err(Error::UnsupportedGeometry {
                    code,
                    kind: "none".to_string(),
                });
            };
            let geometry = match Geometry::<f64>::try_from(geometry.value)? {
                g @ (Geometry::Polygon(_) | Geometry::MultiPolygon(_)) => g,
                other => {
                    return Err(Error::UnsupportedGeometry {
                        code,
                        kind: kind_name(&other).to_string(),
                    })
                }
            };
            Ok(BoundaryFeature {
                code,
                geometry,
                attributes: None,
            })
        })
        .collect()
}

fn kind_name(geometry: &Geometry<f64>) -> &'static str {
    match geometry {
        Geometry::Point(_) => "Point",
        Geometry::Line(_) => "Line",
        Geometry::LineString(_) => "LineString",
        Geometry::Polygon(_) => "Polygon",
        Geometry::MultiPoint(_) => "MultiPoint",
        Geometry::MultiLineString(_) => "MultiLineString",
        Geometry::MultiPolygon(_) => "MultiPolygon",
        Geometry::GeometryCollection(_) => "GeometryCollection",
        Geometry::Rect(_) => "Rect",
        Geometry::Triangle(_) => "Triangle",
    }
}

/// Postcodes with a defined rate; a repeated postcode keeps its last row.
pub fn rate_lookup(records: &[PostcodeRecord]) -> HashMap<&str, Attributes> {
    records
        .iter()
        .filter_map(|record| {
            let rate = record.rate.value()?;
            Some((
                record.code.as_str(),
                Attributes {
                    rate,
                    population: record.population_field().to_string(),
                    firearms: record.firearms.clone(),
                },
            ))
        })
        .collect()
}

pub fn attach(boundaries: &mut [BoundaryFeature], records: &[PostcodeRecord]) {
    let lookup = rate_lookup(records);
    for boundary in boundaries.iter_mut() {
        boundary.attributes = lookup.get(boundary.code.as_str()).cloned();
    }
}

/// Joins, keeps the mapped region and optionally thins the polygons.
pub fn select_region(
    mut boundaries: Vec<BoundaryFeature>,
    records: &[PostcodeRecord],
    simplify: Option<f64>,
) -> Vec<BoundaryFeature> {
    let total = boundaries.len();
    attach(&mut boundaries, records);
    let selected: Vec<BoundaryFeature> = boundaries
        .into_iter()
        .filter(BoundaryFeature::in_region)
        .map(|feature| match simplify {
            Some(tolerance) => feature.simplified(tolerance),
            None => feature,
        })
        .collect();
    log::info!(
        "Kept {} of {} boundaries with prefix {REGION_PREFIX} and a rate",
        selected.len(),
        total
    );
    selected
}

pub fn stats(features: &[BoundaryFeature]) -> Option<RateStats> {
    RateStats::from_rates(features.iter().filter_map(BoundaryFeature::rate))
}

/// GeoJSON of the features, colored ahead of time when a scale is given.
pub fn to_collection(
    features: &[BoundaryFeature],
    coloring: Option<(&ColorScale, &RateStats)>,
) -> FeatureCollection {
    features
        .iter()
        .map(|feature| {
            let color = match (coloring, feature.rate()) {
                (Some((scale, stats)), Some(rate)) => {
                    Some(scale.color_for(rate, stats.min, stats.max))
                }
                _ => None,
            };
            feature.to_feature(color)
        })
        .collect()
}

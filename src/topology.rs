//! Quantized TopoJSON output.
//!
//! Every ring becomes its own delta-encoded arc. Shared borders are not
//! merged; the size win comes from quantization and integer deltas.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use geo::{CoordsIter, Geometry, LineString, Polygon};
use serde_json::{json, Map, Value};

use crate::boundary::BoundaryFeature;
use crate::error::Result;

/// Object name the map document reads features from.
pub const OBJECT_NAME: &str = "data";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub scale: [f64; 2],
    pub translate: [f64; 2],
}

impl Transform {
    fn fit(features: &[BoundaryFeature], quantization: u32) -> (Self, [f64; 4]) {
        let mut bbox = [f64::INFINITY, f64::INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY];
        for coord in features.iter().flat_map(|f| f.geometry.coords_iter()) {
            bbox[0] = bbox[0].min(coord.x);
            bbox[1] = bbox[1].min(coord.y);
            bbox[2] = bbox[2].max(coord.x);
            bbox[3] = bbox[3].max(coord.y);
        }
        if !bbox[0].is_finite() {
            bbox = [0.0, 0.0, 0.0, 0.0];
        }
        let steps = f64::from(quantization.max(2) - 1);
        let step = |lo: f64, hi: f64| if hi > lo { (hi - lo) / steps } else { 1.0 };
        let transform = Self {
            scale: [step(bbox[0], bbox[2]), step(bbox[1], bbox[3])],
            translate: [bbox[0], bbox[1]],
        };
        (transform, bbox)
    }

    fn quantize(&self, x: f64, y: f64) -> [i64; 2] {
        [
            ((x - self.translate[0]) / self.scale[0]).round() as i64,
            ((y - self.translate[1]) / self.scale[1]).round() as i64,
        ]
    }
}

struct Encoder {
    transform: Transform,
    arcs: Vec<Vec<[i64; 2]>>,
}

impl Encoder {
    /// Stores `ring` as a new arc and returns its index.
    fn ring(&mut self, ring: &LineString<f64>) -> usize {
        let mut arc = Vec::with_capacity(ring.0.len());
        let mut previous: Option<[i64; 2]> = None;
        for coord in ring.coords() {
            let point = self.transform.quantize(coord.x, coord.y);
            match previous {
                None => arc.push(point),
                Some(prev) if prev != point => arc.push([point[0] - prev[0], point[1] - prev[1]]),
                Some(_) => continue,
            }
            previous = Some(point);
        }
        self.arcs.push(arc);
        self.arcs.len() - 1
    }

    fn polygon(&mut self, polygon: &Polygon<f64>) -> Vec<Vec<usize>> {
        std::iter::once(polygon.exterior())
            .chain(polygon.interiors())
            .map(|ring| vec![self.ring(ring)])
            .collect()
    }

    fn geometry(&mut self, feature: &BoundaryFeature) -> Value {
        let properties: Map<String, Value> = feature
            .properties()
            .into_iter()
            .map(|(key, value)| (key.to_string(), value))
            .collect();
        match &feature.geometry {
            Geometry::Polygon(polygon) => json!({
                "type": "Polygon",
                "arcs": self.polygon(polygon),
                "properties": properties,
            }),
            Geometry::MultiPolygon(multi) => {
                let arcs: Vec<_> = multi.iter().map(|p| self.polygon(p)).collect();
                json!({
                    "type": "MultiPolygon",
                    "arcs": arcs,
                    "properties": properties,
                })
            }
            _ => json!({ "type": null, "properties": properties }),
        }
    }
}

/// Encodes the features as a single-object topology.
pub fn encode(features: &[BoundaryFeature], quantization: u32) -> Value {
    let (transform, bbox) = Transform::fit(features, quantization);
    let mut encoder = Encoder {
        transform,
        arcs: Vec::new(),
    };
    let geometries: Vec<Value> = features.iter().map(|f| encoder.geometry(f)).collect();

    let mut objects = Map::new();
    objects.insert(
        OBJECT_NAME.to_string(),
        json!({ "type": "GeometryCollection", "geometries": geometries }),
    );
    json!({
        "type": "Topology",
        "bbox": bbox,
        "transform": {
            "scale": transform.scale,
            "translate": transform.translate,
        },
        "objects": objects,
        "arcs": encoder.arcs,
    })
}

/// Writes the topology and returns the file size in bytes.
pub fn write(path: &Path, topology: &Value) -> Result<u64> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer(&mut writer, topology)?;
    writer.flush()?;
    Ok(fs::metadata(path)?.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::Attributes;
    use geo::{polygon, MultiPolygon};

    fn feature(code: &str, geometry: Geometry<f64>) -> BoundaryFeature {
        BoundaryFeature {
            code: code.to_string(),
            geometry,
            attributes: Some(Attributes {
                rate: 5.0,
                population: "9000".to_string(),
                firearms: "45".to_string(),
            }),
        }
    }

    fn decode(topology: &Value, arc: usize) -> Vec<(f64, f64)> {
        let scale = &topology["transform"]["scale"];
        let translate = &topology["transform"]["translate"];
        let (mut x, mut y) = (0i64, 0i64);
        topology["arcs"][arc]
            .as_array()
            .unwrap()
            .iter()
            .map(|delta| {
                x += delta[0].as_i64().unwrap();
                y += delta[1].as_i64().unwrap();
                (
                    x as f64 * scale[0].as_f64().unwrap() + translate[0].as_f64().unwrap(),
                    y as f64 * scale[1].as_f64().unwrap() + translate[1].as_f64().unwrap(),
                )
            })
            .collect()
    }

    #[test]
    fn test_polygon_with_hole() {
        let poly = polygon!(
            exterior: [
                (x: 150.0, y: -34.0),
                (x: 151.0, y: -34.0),
                (x: 151.0, y: -33.0),
                (x: 150.0, y: -33.0),
                (x: 150.0, y: -34.0),
            ],
            interiors: [[
                (x: 150.25, y: -33.75),
                (x: 150.75, y: -33.75),
                (x: 150.75, y: -33.25),
                (x: 150.25, y: -33.75),
            ]]
        );
        let topology = encode(&[feature("2000", Geometry::Polygon(poly))], 10_000);

        assert_eq!(topology["type"], "Topology");
        let geometry = &topology["objects"]["data"]["geometries"][0];
        assert_eq!(geometry["type"], "Polygon");
        assert_eq!(geometry["arcs"], json!([[0], [1]]));
        assert_eq!(geometry["properties"]["POA_CODE21"], "2000");
        assert_eq!(geometry["properties"]["firearms_rate"], 5.0);

        let exterior = decode(&topology, 0);
        assert_eq!(exterior.len(), 5);
        assert_eq!(exterior.first(), exterior.last());
        let tolerance = 1.0 / 9_999.0;
        for ((x, y), (ex, ey)) in exterior.iter().zip([
            (150.0, -34.0),
            (151.0, -34.0),
            (151.0, -33.0),
            (150.0, -33.0),
            (150.0, -34.0),
        ]) {
            assert!((x - ex).abs() <= tolerance && (y - ey).abs() <= tolerance);
        }
    }

    #[test]
    fn test_duplicate_positions_collapse() {
        let poly = polygon![
            (x: 0.0, y: 0.0),
            (x: 0.00001, y: 0.0),
            (x: 10.0, y: 0.0),
            (x: 10.0, y: 10.0),
            (x: 0.0, y: 0.0),
        ];
        let topology = encode(&[feature("2000", Geometry::Polygon(poly))], 100);
        assert_eq!(decode(&topology, 0).len(), 4);
    }

    #[test]
    fn test_multipolygon_arcs() {
        let a = polygon![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0), (x: 1.0, y: 1.0), (x: 0.0, y: 0.0)];
        let b = polygon![(x: 2.0, y: 2.0), (x: 3.0, y: 2.0), (x: 3.0, y: 3.0), (x: 2.0, y: 2.0)];
        let topology = encode(
            &[feature("2000", Geometry::MultiPolygon(MultiPolygon::new(vec![a, b])))],
            10_000,
        );
        let geometry = &topology["objects"]["data"]["geometries"][0];
        assert_eq!(geometry["type"], "MultiPolygon");
        assert_eq!(geometry["arcs"], json!([[[0]], [[1]]]));
        assert_eq!(topology["bbox"], json!([0.0, 0.0, 3.0, 3.0]));
    }

    #[test]
    fn test_write_reports_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.topojson");
        let topology = encode(&[], 10_000);
        let size = write(&path, &topology).unwrap();
        assert_eq!(size, std::fs::metadata(&path).unwrap().len());
        let back: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(back, topology);
    }
}

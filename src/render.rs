//! Leaflet map documents.
//!
//! Leaflet and topojson-client are pulled from a CDN when the page is viewed;
//! everything else (data, colors, legend) is written into the document.

use std::fmt::Write;

use geojson::FeatureCollection;
use serde::Serialize;

use crate::boundary::BoundaryFeature;
use crate::config::MapOptions;
use crate::error::Result;
use crate::scale::ColorScale;
use crate::stats::RateStats;

const LEAFLET_CSS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.css";
const LEAFLET_JS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.js";
const TOPOJSON_JS: &str = "https://unpkg.com/topojson@3.0.2/dist/topojson.min.js";

const STYLE: &str = r#"
        body { margin: 0; padding: 0; }
        #map { position: absolute; top: 0; bottom: 0; width: 100%; }
        .info { padding: 10px; background: white; border-radius: 5px; box-shadow: 0 0 15px rgba(0,0,0,0.2); font: 12px/1.4 Arial, sans-serif; }
        .info h4 { margin: 0 0 5px; color: #777; }
        .legend { line-height: 18px; color: #555; }
        .legend i { width: 18px; height: 18px; float: left; margin-right: 8px; opacity: 0.7; }
        .title { position: fixed; top: 10px; left: 50px; z-index: 9999; max-width: 500px; }
        .title h3 { margin: 0; }
        .title p { margin: 5px 0 0 0; font-size: 11px; }
"#;

// Shared by every document: base layers, hover panel and the popup text.
const MAP_SCRIPT: &str = r#"
        const light = L.tileLayer('https://{s}.basemaps.cartocdn.com/light_all/{z}/{x}/{y}{r}.png', {
            attribution: '&copy; OpenStreetMap &copy; CartoDB', maxZoom: 20
        }).addTo(map);
        const osm = L.tileLayer('https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png', {
            attribution: '&copy; OpenStreetMap', maxZoom: 19
        });
        const dark = L.tileLayer('https://{s}.basemaps.cartocdn.com/dark_all/{z}/{x}/{y}{r}.png', {
            attribution: '&copy; OpenStreetMap &copy; CartoDB', maxZoom: 20
        });
        const layers = L.control.layers({'CartoDB positron': light, 'OpenStreetMap': osm, 'CartoDB dark_matter': dark}).addTo(map);

        function describe(p) {
            return '<b>Postcode ' + p.POA_CODE21 + '</b><br>' +
                'Population: ' + p.population + '<br>' +
                'Firearms: ' + p.firearms + '<br>' +
                'Per 1000: ' + Number(p.firearms_rate).toFixed(2);
        }

        const info = L.control();
        info.onAdd = function() {
            this._div = L.DomUtil.create('div', 'info');
            this.update();
            return this._div;
        };
        info.update = function(props) {
            this._div.innerHTML = '<h4>Firearms per 1000 people</h4>' +
                (props ? describe(props) : 'Hover over a postcode');
        };
        info.addTo(map);
"#;

/// A postcode drawn as a circle at its boundary centroid.
#[derive(Debug, Clone, Serialize)]
pub struct Marker {
    pub lat: f64,
    pub lon: f64,
    #[serde(rename = "POA_CODE21")]
    pub postcode: String,
    pub population: String,
    pub firearms: String,
    pub firearms_rate: f64,
    pub color: &'static str,
}

impl Marker {
    pub fn from_feature(feature: &BoundaryFeature, scale: &ColorScale, stats: &RateStats) -> Option<Self> {
        let attributes = feature.attributes.as_ref()?;
        let centroid = feature.centroid()?;
        Some(Self {
            lat: centroid.y(),
            lon: centroid.x(),
            postcode: feature.code.clone(),
            population: attributes.population.clone(),
            firearms: attributes.firearms.clone(),
            firearms_rate: attributes.rate,
            color: scale.color_for(attributes.rate, stats.min, stats.max),
        })
    }
}

/// Self-contained map with the polygons and their colors embedded.
pub fn choropleth_document(
    collection: &FeatureCollection,
    stats: &RateStats,
    scale: &ColorScale,
    options: &MapOptions,
) -> String {
    let mut script = String::new();
    let _ = writeln!(script, "        const data = {};", script_json(&collection.to_string()));
    script.push_str(
        r#"
        let geojsonLayer;
        geojsonLayer = L.geoJson(data, {
            style: function(feature) {
                return { fillColor: feature.properties.fill_color, weight: 1, opacity: 0.5, color: 'white', fillOpacity: 0.7 };
            },
            onEachFeature: function(feature, layer) {
                layer.on({ mouseover: highlightFeature, mouseout: resetHighlight });
                layer.bindTooltip(describe(feature.properties));
            }
        }).addTo(map);
        layers.addOverlay(geojsonLayer, 'Firearms per 1000 people');
"#,
    );
    document(options, stats, scale, false, &script)
}

/// Map that loads `topology_url` and colors it in the browser.
pub fn pages_document(
    topology_url: &str,
    stats: &RateStats,
    scale: &ColorScale,
    options: &MapOptions,
) -> String {
    let mut script = String::new();
    script.push_str(&indent(&scale.to_javascript(stats.min, stats.max), 8));
    let _ = write!(
        script,
        r#"
        let geojsonLayer;
        fetch({url})
            .then(response => response.json())
            .then(data => {{
                const geojson = topojson.feature(data, data.objects.{object});
                geojsonLayer = L.geoJson(geojson, {{
                    style: function(feature) {{
                        return {{ fillColor: getColor(feature.properties.firearms_rate), weight: 1, opacity: 0.5, color: 'white', fillOpacity: 0.7 }};
                    }},
                    onEachFeature: function(feature, layer) {{
                        layer.on({{ mouseover: highlightFeature, mouseout: resetHighlight }});
                        layer.bindPopup(describe(feature.properties));
                    }}
                }}).addTo(map);
                layers.addOverlay(geojsonLayer, 'Firearms per 1000 people');
            }});
"#,
        url = script_json(&serde_json::Value::from(topology_url).to_string()),
        object = crate::topology::OBJECT_NAME,
    );
    document(options, stats, scale, true, &script)
}

/// Circle markers at each postcode centroid.
pub fn markers_document(
    markers: &[Marker],
    stats: &RateStats,
    options: &MapOptions,
) -> Result<String> {
    let data = serde_json::to_string(markers)?;
    let mut script = String::new();
    let _ = writeln!(script, "        const markers = {};", script_json(&data));
    script.push_str(
        r#"
        const group = L.layerGroup();
        markers.forEach(function(m) {
            L.circleMarker([m.lat, m.lon], {
                radius: 8, color: m.color, fillColor: m.color, fillOpacity: 0.7, weight: 2
            })
                .bindPopup(describe(m))
                .bindTooltip('Postcode ' + m.POA_CODE21 + ': ' + m.firearms_rate.toFixed(2) + ' per 1000')
                .on('mouseover', function() { info.update(m); })
                .on('mouseout', function() { info.update(); })
                .addTo(group);
        });
        group.addTo(map);
        layers.addOverlay(group, 'Postcodes');
"#,
    );
    Ok(document(options, stats, &ColorScale::MARKERS, false, &script))
}

fn document(
    options: &MapOptions,
    stats: &RateStats,
    scale: &ColorScale,
    with_topojson: bool,
    data_script: &str,
) -> String {
    let topojson = if with_topojson {
        format!("    <script src=\"{TOPOJSON_JS}\"></script>\n")
    } else {
        String::new()
    };
    let (lat, lon) = options.center;
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <link rel="stylesheet" href="{LEAFLET_CSS}" />
    <script src="{LEAFLET_JS}"></script>
{topojson}    <style>{STYLE}    </style>
</head>
<body>
    <div id="map"></div>
    <div class="info title">
        <h3>{title}</h3>
        <p>Hover over postcodes for details. {count} postcodes, {min:.2} to {max:.2} per 1000 (mean {mean:.2}).</p>
    </div>
    <script>
        const map = L.map('map').setView([{lat}, {lon}], {zoom});
{MAP_SCRIPT}
        function highlightFeature(e) {{
            const layer = e.target;
            layer.setStyle({{ weight: 3, color: '#666', fillOpacity: 0.9 }});
            layer.bringToFront();
            info.update(layer.feature.properties);
        }}

        function resetHighlight(e) {{
            geojsonLayer.resetStyle(e.target);
            info.update();
        }}

        const legend = L.control({{position: 'bottomright'}});
        legend.onAdd = function() {{
            const div = L.DomUtil.create('div', 'info legend');
            div.innerHTML = {legend};
            return div;
        }};
        legend.addTo(map);

{data_script}    </script>
</body>
</html>
"#,
        title = escape_html(&options.title),
        count = stats.count,
        min = stats.min,
        max = stats.max,
        mean = stats.mean,
        zoom = options.zoom,
        legend = script_json(&serde_json::Value::from(legend_html(scale, stats)).to_string()),
    )
}

/// Legend rows for the scale over the observed range.
pub fn legend_html(scale: &ColorScale, stats: &RateStats) -> String {
    let precision = if stats.max - stats.min < 50.0 { 1 } else { 0 };
    let mut html = String::from("<h4>Firearms per 1000</h4>");
    for entry in scale.legend(stats.min, stats.max) {
        let _ = write!(
            html,
            "<i style=\"background:{}\"></i> {}<br>",
            entry.color,
            entry.label(precision)
        );
    }
    html
}

/// JSON is valid JavaScript, but `</script>` inside it would end the block.
fn script_json(json: &str) -> String {
    json.replace("</", "<\\/")
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn indent(text: &str, width: usize) -> String {
    let pad = " ".repeat(width);
    text.lines()
        .map(|line| format!("{pad}{line}\n"))
        .collect()
}

//! Choropleth color binning.
//!
//! A rate is normalized against the (min, max) of the mapped set and placed in
//! the bucket of the highest threshold it reaches. The same table drives the
//! colors computed here and the `getColor` function emitted for the browser.

use std::fmt::Write;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorScale {
    /// Ascending lower bounds of every bucket after the first.
    pub thresholds: &'static [f64],
    /// One more color than thresholds, lowest bucket first.
    pub colors: &'static [&'static str],
}

impl ColorScale {
    /// Yellow-orange-red ramp of the polygon maps.
    pub const CHOROPLETH: Self = Self {
        thresholds: &[0.02, 0.05, 0.1, 0.2, 0.4, 0.6, 0.8],
        colors: &[
            "#FFEDA0", "#FED976", "#FEB24C", "#FD8D3C", "#FC4E2A", "#E31A1C", "#BD0026",
            "#800026",
        ],
    };

    /// Green to red ramp of the centroid marker map.
    pub const MARKERS: Self = Self {
        thresholds: &[0.2, 0.4, 0.6, 0.8],
        colors: &["#00ff00", "#7fff00", "#ffff00", "#ff7f00", "#ff0000"],
    };

    pub fn bucket(&self, normalized: f64) -> usize {
        self.thresholds
            .iter()
            .take_while(|threshold| normalized >= **threshold)
            .count()
    }

    pub fn color(&self, normalized: f64) -> &'static str {
        self.colors[self.bucket(normalized)]
    }

    pub fn color_for(&self, rate: f64, min: f64, max: f64) -> &'static str {
        self.color(normalize(rate, min, max))
    }

    /// Rate range covered by each bucket, lowest first.
    pub fn legend(&self, min: f64, max: f64) -> Vec<LegendEntry> {
        let span = max - min;
        let bounds: Vec<f64> = std::iter::once(0.0)
            .chain(self.thresholds.iter().copied())
            .map(|t| min + t * span)
            .collect();
        bounds
            .iter()
            .enumerate()
            .map(|(i, lower)| LegendEntry {
                lower: *lower,
                upper: bounds.get(i + 1).copied(),
                color: self.colors[i],
            })
            .collect()
    }

    /// Browser-side twin of [`ColorScale::color_for`].
    pub fn to_javascript(&self, min: f64, max: f64) -> String {
        let mut js = String::new();
        let _ = writeln!(js, "function getColor(rate) {{");
        let _ = writeln!(js, "    const min = {min};");
        let _ = writeln!(js, "    const max = {max};");
        let _ = writeln!(
            js,
            "    const normalized = max === min ? 0 : (rate - min) / (max - min);"
        );
        let _ = write!(js, "    return ");
        for (threshold, color) in self.thresholds.iter().zip(&self.colors[1..]).rev() {
            let _ = write!(js, "normalized >= {threshold} ? '{color}' :\n           ");
        }
        let _ = writeln!(js, "'{}';", self.colors[0]);
        js.push_str("}\n");
        js
    }
}

/// `(rate - min) / (max - min)`, or 0 when every rate is the same.
pub fn normalize(rate: f64, min: f64, max: f64) -> f64 {
    if max == min {
        0.0
    } else {
        (rate - min) / (max - min)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LegendEntry {
    pub lower: f64,
    /// `None` for the open-ended top bucket.
    pub upper: Option<f64>,
    pub color: &'static str,
}

impl LegendEntry {
    pub fn label(&self, precision: usize) -> String {
        match self.upper {
            Some(upper) => format!("{:.p$}&ndash;{:.p$}", self.lower, upper, p = precision),
            None => format!("{:.p$}+", self.lower, p = precision),
        }
    }
}

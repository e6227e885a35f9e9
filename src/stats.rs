//! Summary statistics over the mapped rates.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateStats {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
}

impl RateStats {
    /// `None` when there is nothing to summarize.
    pub fn from_rates<I: IntoIterator<Item = f64>>(rates: I) -> Option<Self> {
        let mut sorted: Vec<f64> = rates.into_iter().filter(|r| r.is_finite()).collect();
        if sorted.is_empty() {
            return None;
        }
        sorted.sort_by(f64::total_cmp);

        let count = sorted.len();
        let mid = count / 2;
        let median = if count % 2 == 0 {
            (sorted[mid - 1] + sorted[mid]) / 2.0
        } else {
            sorted[mid]
        };
        Some(Self {
            count,
            min: sorted[0],
            max: sorted[count - 1],
            mean: sorted.iter().sum::<f64>() / count as f64,
            median,
        })
    }
}

impl fmt::Display for RateStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Statistics:")?;
        writeln!(f, "  Min rate: {:.2} per 1000", self.min)?;
        writeln!(f, "  Max rate: {:.2} per 1000", self.max)?;
        writeln!(f, "  Mean rate: {:.2} per 1000", self.mean)?;
        write!(f, "  Median rate: {:.2} per 1000", self.median)
    }
}

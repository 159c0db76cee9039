//! Series Summary Module
//! Descriptive statistics shown under each chart panel.

use statrs::statistics::{Data, Distribution, Max, Median, Min};

/// Descriptive statistics of one plotted series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesSummary {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
}

impl Default for SeriesSummary {
    fn default() -> Self {
        Self {
            count: 0,
            mean: f64::NAN,
            median: f64::NAN,
            std: f64::NAN,
            min: f64::NAN,
            max: f64::NAN,
        }
    }
}

impl SeriesSummary {
    /// Compute statistics; NaN values are ignored.
    pub fn from_values(values: &[f64]) -> Self {
        let clean: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
        let n = clean.len();
        if n == 0 {
            return Self::default();
        }

        let data = Data::new(clean);
        // Sample standard deviation; a single point has no spread.
        let std = if n > 1 {
            data.std_dev().unwrap_or(f64::NAN)
        } else {
            0.0
        };

        Self {
            count: n,
            mean: data.mean().unwrap_or(f64::NAN),
            median: data.median(),
            std,
            min: data.min(),
            max: data.max(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// One-line text used under plots.
    pub fn describe(&self) -> String {
        if self.is_empty() {
            return "no deals".to_string();
        }
        format!(
            "n={}  mean={:.0}  median={:.0}  std={:.0}  min={:.0}  max={:.0}",
            self.count, self.mean, self.median, self.std, self.min, self.max
        )
    }
}

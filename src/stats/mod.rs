//! Statistics module - descriptive statistics of chart series

mod summary;

pub use summary::SeriesSummary;

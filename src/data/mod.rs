//! Data module - deal CSV loading and aggregation

mod aggregator;
mod loader;
mod model;

pub use aggregator::{AggregateError, Aggregator};
pub use loader::DataLoader;
#[cfg(test)]
pub(crate) use loader::normalized_fixture;
pub use model::{
    date_from_epoch_days, epoch_days, DateWindow, HouseType, HouseTypeSeries, RegionBar,
    SeriesPoint,
};

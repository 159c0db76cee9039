//! Deal Aggregator Module
//! Filter → group-by → aggregate queries feeding the dashboard charts.

use crate::data::model::{
    date_from_epoch_days, DateWindow, HouseType, HouseTypeSeries, RegionBar, SeriesPoint,
    AMOUNT_COL, DEAL_DATE_COL, HOUSE_TYPE_COL, REGION_COL, VALUE_COL,
};
use polars::prelude::*;
use rayon::prelude::*;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum AggregateError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

/// Stateless aggregation queries over the normalized deal table.
pub struct Aggregator;

impl Aggregator {
    /// Rows of `region` whose deal date lies inside `window` (inclusive).
    pub fn filter_region_window(df: &DataFrame, region: &str, window: &DateWindow) -> LazyFrame {
        df.clone().lazy().filter(
            col(REGION_COL)
                .eq(lit(region))
                .and(col(DEAL_DATE_COL).gt_eq(lit(window.start)))
                .and(col(DEAL_DATE_COL).lt_eq(lit(window.end))),
        )
    }

    /// Mean deal amount per (date, house type), split into one series per fixed house type.
    pub fn mean_by_date_and_type(
        df: &DataFrame,
        region: &str,
        window: &DateWindow,
    ) -> Result<Vec<HouseTypeSeries>, AggregateError> {
        let grouped = Self::filter_region_window(df, region, window)
            .group_by([col(DEAL_DATE_COL), col(HOUSE_TYPE_COL)])
            .agg([col(AMOUNT_COL).mean().alias(VALUE_COL)])
            .collect()?;

        debug!(region, groups = grouped.height(), "mean by date and house type");

        HouseType::ALL
            .iter()
            .map(|&house_type| {
                let type_df = grouped
                    .clone()
                    .lazy()
                    .filter(col(HOUSE_TYPE_COL).eq(lit(house_type.label())))
                    .collect()?;
                Ok(HouseTypeSeries {
                    house_type,
                    points: Self::collect_points(&type_df)?,
                })
            })
            .collect()
    }

    /// Number of deals per date for one house type.
    pub fn count_by_date(
        df: &DataFrame,
        region: &str,
        window: &DateWindow,
        house_type: HouseType,
    ) -> Result<HouseTypeSeries, AggregateError> {
        let grouped = Self::filter_region_window(df, region, window)
            .filter(col(HOUSE_TYPE_COL).eq(lit(house_type.label())))
            .group_by([col(DEAL_DATE_COL)])
            .agg([len().alias(VALUE_COL)])
            .collect()?;

        Ok(HouseTypeSeries {
            house_type,
            points: Self::collect_points(&grouped)?,
        })
    }

    /// [`Self::count_by_date`] for every house type, evaluated in parallel.
    pub fn count_by_date_and_type(
        df: &DataFrame,
        region: &str,
        window: &DateWindow,
    ) -> Result<Vec<HouseTypeSeries>, AggregateError> {
        HouseType::ALL
            .as_slice()
            .par_iter()
            .map(|&house_type| Self::count_by_date(df, region, window, house_type))
            .collect()
    }

    /// Mean deal amount per region for one calendar month (any year) and house type.
    ///
    /// Sorted by descending mean; equal means fall back to region name.
    pub fn mean_by_region(
        df: &DataFrame,
        month: u32,
        house_type: &str,
    ) -> Result<Vec<RegionBar>, AggregateError> {
        let grouped = df
            .clone()
            .lazy()
            .filter(
                col(DEAL_DATE_COL)
                    .dt()
                    .month()
                    .cast(DataType::Int32)
                    .eq(lit(month as i32))
                    .and(col(HOUSE_TYPE_COL).eq(lit(house_type))),
            )
            .group_by([col(REGION_COL)])
            .agg([col(AMOUNT_COL).mean().alias(VALUE_COL)])
            .collect()?;

        let regions = grouped.column(REGION_COL)?.str()?;
        let values = grouped.column(VALUE_COL)?.cast(&DataType::Float64)?;
        let values = values.f64()?;

        let mut bars: Vec<RegionBar> = regions
            .into_iter()
            .zip(values.into_iter())
            .filter_map(|(region, value)| match (region, value) {
                (Some(region), Some(value)) if !value.is_nan() => Some(RegionBar {
                    region: region.to_string(),
                    value,
                }),
                _ => None,
            })
            .collect();

        bars.sort_by(|a, b| {
            b.value
                .total_cmp(&a.value)
                .then_with(|| a.region.cmp(&b.region))
        });

        debug!(month, house_type, regions = bars.len(), "mean by region");
        Ok(bars)
    }

    /// Read (`DEAL_YMD`, `value`) pairs from an aggregated frame, ordered by date.
    fn collect_points(df: &DataFrame) -> Result<Vec<SeriesPoint>, AggregateError> {
        let days = df.column(DEAL_DATE_COL)?.cast(&DataType::Int32)?;
        let days = days.i32()?;
        let values = df.column(VALUE_COL)?.cast(&DataType::Float64)?;
        let values = values.f64()?;

        let mut points: Vec<SeriesPoint> = days
            .into_iter()
            .zip(values.into_iter())
            .filter_map(|(day, value)| {
                let date = date_from_epoch_days(day?)?;
                let value = value?;
                (!value.is_nan()).then_some(SeriesPoint { date, value })
            })
            .collect();

        points.sort_by_key(|p| p.date);
        Ok(points)
    }
}

//! Deal Model
//! Canonical column names and value types shared by loading and aggregation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Canonical column names after loading.
pub const REGION_COL: &str = "SGG_NM";
pub const HOUSE_TYPE_COL: &str = "HOUSE_TYPE";
pub const DEAL_DATE_COL: &str = "DEAL_YMD";
pub const AMOUNT_COL: &str = "OBJ_AMT";

/// Output column of every aggregation.
pub const VALUE_COL: &str = "value";

/// The four fixed housing categories, in panel order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HouseType {
    Apartment,
    DetachedMulti,
    Officetel,
    RowMulti,
}

impl HouseType {
    pub const ALL: [HouseType; 4] = [
        HouseType::Apartment,
        HouseType::DetachedMulti,
        HouseType::Officetel,
        HouseType::RowMulti,
    ];

    /// Value stored in the `HOUSE_TYPE` column.
    pub fn label(self) -> &'static str {
        match self {
            HouseType::Apartment => "아파트",
            HouseType::DetachedMulti => "단독다가구",
            HouseType::Officetel => "오피스텔",
            HouseType::RowMulti => "연립다세대",
        }
    }

    pub fn english_name(self) -> &'static str {
        match self {
            HouseType::Apartment => "Apartment",
            HouseType::DetachedMulti => "Detached / multi-household",
            HouseType::Officetel => "Officetel",
            HouseType::RowMulti => "Row house / multi-family",
        }
    }
}

/// Inclusive date range applied to the trend views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Default for DateWindow {
    fn default() -> Self {
        Self {
            start: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default(),
            end: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap_or_default(),
        }
    }
}

/// One aggregated value on a date axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// Aggregated series of a single house type, ordered by date.
#[derive(Debug, Clone, PartialEq)]
pub struct HouseTypeSeries {
    pub house_type: HouseType,
    pub points: Vec<SeriesPoint>,
}

impl HouseTypeSeries {
    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }
}

/// Mean deal amount of one region.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionBar {
    pub region: String,
    pub value: f64,
}

/// Convert days since the Unix epoch (polars `Date` physical type) to a date.
pub fn date_from_epoch_days(days: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(1970, 1, 1)?.checked_add_signed(chrono::Duration::days(days as i64))
}

/// Inverse of [`date_from_epoch_days`], used as the plot x coordinate.
pub fn epoch_days(date: NaiveDate) -> i64 {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or_default();
    (date - epoch).num_days()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_house_type_labels_are_distinct() {
        let labels: std::collections::HashSet<&str> =
            HouseType::ALL.iter().map(|t| t.label()).collect();
        assert_eq!(labels.len(), 4);
        assert_eq!(HouseType::ALL[0].label(), "아파트");
        assert_eq!(HouseType::ALL[3].english_name(), "Row house / multi-family");
    }

    #[test]
    fn test_window_fields_default_independently() {
        let window: DateWindow = serde_json::from_str(r#"{ "start": "2024-06-01" }"#).unwrap();
        assert_eq!(window.start, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
        assert_eq!(window.end, DateWindow::default().end);

        let window: DateWindow = serde_json::from_str("{}").unwrap();
        assert_eq!(window, DateWindow::default());
    }

    #[test]
    fn test_epoch_days() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let days = epoch_days(date);
        assert_eq!(date_from_epoch_days(days as i32), Some(date));
        assert_eq!(epoch_days(NaiveDate::from_ymd_opt(1970, 1, 2).unwrap()), 1);
    }
}

//! Chart Builder Module
//! Turns aggregated series into chart specifications shared by the
//! interactive plotter and the static PNG renderer.

use crate::data::{DateWindow, HouseType, HouseTypeSeries, RegionBar};
use crate::stats::SeriesSummary;

/// What a panel chart measures; selects its fixed texts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelMetric {
    MeanPrice,
    TransactionCount,
}

impl PanelMetric {
    pub fn title(self) -> &'static str {
        match self {
            PanelMetric::MeanPrice => "Average deal price by house type",
            PanelMetric::TransactionCount => "Transaction count by house type",
        }
    }

    pub fn y_title(self) -> &'static str {
        match self {
            PanelMetric::MeanPrice => "Deal price (KRW)",
            PanelMetric::TransactionCount => "Transactions",
        }
    }

    fn series_name(self, house_type: HouseType) -> String {
        match self {
            PanelMetric::MeanPrice => format!("{} average price", house_type.label()),
            PanelMetric::TransactionCount => format!("{} transactions", house_type.label()),
        }
    }
}

/// One subplot of the 2x2 grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub title: String,
    pub series_name: String,
    pub series: HouseTypeSeries,
    pub summary: SeriesSummary,
}

/// Four line charts, one per house type, sharing both axes.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelChartSpec {
    pub metric: PanelMetric,
    pub title: String,
    pub region: String,
    pub y_title: String,
    pub panels: Vec<Panel>,
    /// Global (min, max) across all panels; `None` when every series is empty.
    pub y_range: Option<(f64, f64)>,
    pub x_window: DateWindow,
}

/// Single bar chart, bars ordered by descending value.
#[derive(Debug, Clone, PartialEq)]
pub struct BarChartSpec {
    pub title: String,
    pub x_title: String,
    pub y_title: String,
    pub month: u32,
    pub house_type: String,
    pub bars: Vec<RegionBar>,
    /// `(0, max)`; `None` without bars.
    pub y_range: Option<(f64, f64)>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChartSpec {
    Panels(PanelChartSpec),
    Bars(BarChartSpec),
}

impl ChartSpec {
    pub fn title(&self) -> &str {
        match self {
            ChartSpec::Panels(spec) => &spec.title,
            ChartSpec::Bars(spec) => &spec.title,
        }
    }
}

/// Fixed `.0f` tick format used by every chart.
pub fn format_tick(value: f64) -> String {
    format!("{:.0}", value)
}

pub struct ChartBuilder;

impl ChartBuilder {
    /// Build the 2x2 panel chart. Missing house types get an empty panel.
    pub fn panel_chart(
        metric: PanelMetric,
        region: &str,
        window: DateWindow,
        series: Vec<HouseTypeSeries>,
    ) -> PanelChartSpec {
        let panels: Vec<Panel> = HouseType::ALL
            .iter()
            .map(|&house_type| {
                let series = series
                    .iter()
                    .find(|s| s.house_type == house_type)
                    .cloned()
                    .unwrap_or(HouseTypeSeries {
                        house_type,
                        points: Vec::new(),
                    });
                let summary = SeriesSummary::from_values(&series.values());
                Panel {
                    title: format!("{} · {}", house_type.label(), house_type.english_name()),
                    series_name: metric.series_name(house_type),
                    series,
                    summary,
                }
            })
            .collect();

        let y_range = Self::global_range(panels.iter().flat_map(|p| p.series.values()));

        PanelChartSpec {
            metric,
            title: metric.title().to_string(),
            region: region.to_string(),
            y_title: metric.y_title().to_string(),
            panels,
            y_range,
            x_window: window,
        }
    }

    /// Build the regional bar chart; bars are re-sorted by descending value.
    pub fn bar_chart(month: u32, house_type: &str, mut bars: Vec<RegionBar>) -> BarChartSpec {
        bars.sort_by(|a, b| {
            b.value
                .total_cmp(&a.value)
                .then_with(|| a.region.cmp(&b.region))
        });
        let y_range = bars.first().map(|top| (0.0, top.value));

        BarChartSpec {
            title: "Average price by region".to_string(),
            x_title: "Region".to_string(),
            y_title: "Average price (10k KRW)".to_string(),
            month,
            house_type: house_type.to_string(),
            bars,
            y_range,
        }
    }

    /// (min, max) over all values, ignoring NaN.
    pub fn global_range(values: impl IntoIterator<Item = f64>) -> Option<(f64, f64)> {
        values
            .into_iter()
            .filter(|v| !v.is_nan())
            .fold(None, |range, v| match range {
                None => Some((v, v)),
                Some((lo, hi)) => Some((f64::min(lo, v), f64::max(hi, v))),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::SeriesPoint;
    use chrono::NaiveDate;

    fn series(house_type: HouseType, values: &[f64]) -> HouseTypeSeries {
        HouseTypeSeries {
            house_type,
            points: values
                .iter()
                .enumerate()
                .map(|(i, &value)| SeriesPoint {
                    date: NaiveDate::from_ymd_opt(2024, 1, 1 + i as u32).unwrap(),
                    value,
                })
                .collect(),
        }
    }

    #[test]
    fn test_panel_chart_shares_global_range() {
        let spec = ChartBuilder::panel_chart(
            PanelMetric::MeanPrice,
            "종로구",
            DateWindow::default(),
            vec![
                series(HouseType::Apartment, &[500.0, 900.0]),
                series(HouseType::DetachedMulti, &[300.0]),
                series(HouseType::Officetel, &[120.0, 150.0]),
                series(HouseType::RowMulti, &[1000.0, 200.0]),
            ],
        );

        assert_eq!(spec.y_range, Some((120.0, 1000.0)));
        assert_eq!(spec.panels.len(), 4);
        assert_eq!(spec.title, "Average deal price by house type");
        assert_eq!(spec.y_title, "Deal price (KRW)");
        assert_eq!(spec.panels[2].title, "오피스텔 · Officetel");
        assert_eq!(spec.panels[0].summary.count, 2);
    }

    #[test]
    fn test_panel_chart_fills_missing_house_types() {
        let spec = ChartBuilder::panel_chart(
            PanelMetric::TransactionCount,
            "종로구",
            DateWindow::default(),
            vec![series(HouseType::Officetel, &[3.0])],
        );

        let order: Vec<HouseType> = spec.panels.iter().map(|p| p.series.house_type).collect();
        assert_eq!(order, HouseType::ALL.to_vec());
        assert!(spec.panels[0].series.points.is_empty());
        assert_eq!(spec.y_range, Some((3.0, 3.0)));
        assert_eq!(spec.panels[2].series_name, "오피스텔 transactions");
    }

    #[test]
    fn test_empty_panel_chart_has_no_range() {
        let spec = ChartBuilder::panel_chart(
            PanelMetric::MeanPrice,
            "종로구",
            DateWindow::default(),
            Vec::new(),
        );
        assert_eq!(spec.y_range, None);
    }

    #[test]
    fn test_bar_chart_descending() {
        let bars = vec![
            RegionBar {
                region: "A".to_string(),
                value: 150.0,
            },
            RegionBar {
                region: "B".to_string(),
                value: 300.0,
            },
            RegionBar {
                region: "C".to_string(),
                value: 200.0,
            },
        ];

        let spec = ChartBuilder::bar_chart(3, "아파트", bars);
        let order: Vec<&str> = spec.bars.iter().map(|b| b.region.as_str()).collect();
        assert_eq!(order, vec!["B", "C", "A"]);
        assert_eq!(spec.y_range, Some((0.0, 300.0)));
        assert_eq!(ChartSpec::Bars(spec).title(), "Average price by region");
    }

    #[test]
    fn test_format_tick() {
        assert_eq!(format_tick(1234.56), "1235");
        assert_eq!(format_tick(0.0), "0");
    }
}

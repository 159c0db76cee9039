//! View Selector
//! Maps the chart menu selection plus filter values to one of the chart flows.

use crate::charts::{ChartBuilder, ChartSpec, PanelMetric};
use crate::data::{AggregateError, Aggregator, DateWindow};
use polars::prelude::DataFrame;
use tracing::{debug, warn};

/// The dashboard's chart flows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    PriceTrend,
    TransactionCount,
    RegionalBar,
}

/// Filter widgets a view exposes besides the menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewFilter {
    Region,
    Month,
    HouseType,
}

/// Current widget selections.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewFilters {
    pub region: String,
    pub month: u32,
    pub house_type: String,
    pub window: DateWindow,
}

type RenderFn = fn(&DataFrame, &ViewFilters) -> Result<ChartSpec, AggregateError>;

pub struct ViewEntry {
    pub kind: ViewKind,
    pub label: &'static str,
    pub heading: &'static str,
    pub filters: &'static [ViewFilter],
    render: RenderFn,
}

/// Menu entries in display order.
pub static VIEWS: [ViewEntry; 3] = [
    ViewEntry {
        kind: ViewKind::PriceTrend,
        label: "Average price trend",
        heading: "Average price trend by house type",
        filters: &[ViewFilter::Region],
        render: render_price_trend,
    },
    ViewEntry {
        kind: ViewKind::TransactionCount,
        label: "Transaction count trend",
        heading: "Transaction count trend by house type",
        filters: &[ViewFilter::Region],
        render: render_transaction_count,
    },
    ViewEntry {
        kind: ViewKind::RegionalBar,
        label: "Average price by region",
        heading: "Average price by region",
        filters: &[ViewFilter::Month, ViewFilter::HouseType],
        render: render_regional_bar,
    },
];

impl ViewKind {
    pub fn entry(self) -> &'static ViewEntry {
        match self {
            ViewKind::PriceTrend => &VIEWS[0],
            ViewKind::TransactionCount => &VIEWS[1],
            ViewKind::RegionalBar => &VIEWS[2],
        }
    }

    pub fn label(self) -> &'static str {
        self.entry().label
    }
}

impl ViewEntry {
    pub fn uses(&self, filter: ViewFilter) -> bool {
        self.filters.contains(&filter)
    }

    pub fn render(&self, df: &DataFrame, filters: &ViewFilters) -> Result<ChartSpec, AggregateError> {
        (self.render)(df, filters)
    }
}

/// Result of rendering a menu selection.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewOutcome {
    Chart {
        heading: &'static str,
        spec: ChartSpec,
    },
    Warning(String),
}

/// Look up a menu label.
pub fn select_view(label: &str) -> Option<&'static ViewEntry> {
    VIEWS.iter().find(|entry| entry.label == label)
}

/// Render the view named by `label`; unknown labels produce a warning and no chart.
pub fn render_view(
    label: &str,
    df: &DataFrame,
    filters: &ViewFilters,
) -> Result<ViewOutcome, AggregateError> {
    let Some(entry) = select_view(label) else {
        warn!(selection = label, "unrecognized chart menu selection");
        return Ok(ViewOutcome::Warning(format!(
            "Unrecognized chart menu selection: {label}"
        )));
    };

    debug!(view = ?entry.kind, region = %filters.region, month = filters.month, "rendering view");
    let spec = entry.render(df, filters)?;
    Ok(ViewOutcome::Chart {
        heading: entry.heading,
        spec,
    })
}

fn render_price_trend(df: &DataFrame, filters: &ViewFilters) -> Result<ChartSpec, AggregateError> {
    let series = Aggregator::mean_by_date_and_type(df, &filters.region, &filters.window)?;
    Ok(ChartSpec::Panels(ChartBuilder::panel_chart(
        PanelMetric::MeanPrice,
        &filters.region,
        filters.window,
        series,
    )))
}

fn render_transaction_count(
    df: &DataFrame,
    filters: &ViewFilters,
) -> Result<ChartSpec, AggregateError> {
    let series = Aggregator::count_by_date_and_type(df, &filters.region, &filters.window)?;
    Ok(ChartSpec::Panels(ChartBuilder::panel_chart(
        PanelMetric::TransactionCount,
        &filters.region,
        filters.window,
        series,
    )))
}

fn render_regional_bar(df: &DataFrame, filters: &ViewFilters) -> Result<ChartSpec, AggregateError> {
    let bars = Aggregator::mean_by_region(df, filters.month, &filters.house_type)?;
    Ok(ChartSpec::Bars(ChartBuilder::bar_chart(
        filters.month,
        &filters.house_type,
        bars,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::normalized_fixture;
    use polars::prelude::*;

    fn fixture() -> DataFrame {
        normalized_fixture(
            df!(
                "SGG_NM" => &["종로구", "종로구", "종로구", "강남구"],
                "HOUSE_TYPE" => &["아파트", "아파트", "오피스텔", "아파트"],
                "DEAL_YMD" => &["2024-01-10", "2024-01-10", "2024-02-01", "2024-01-20"],
                "OBJ_AMT" => &[100.0, 300.0, 50.0, 700.0]
            )
            .unwrap(),
        )
    }

    fn filters() -> ViewFilters {
        ViewFilters {
            region: "종로구".to_string(),
            month: 1,
            house_type: "아파트".to_string(),
            window: DateWindow::default(),
        }
    }

    #[test]
    fn test_lookup_table_matches_kinds() {
        for entry in &VIEWS {
            assert_eq!(entry.kind.entry().label, entry.label);
            assert_eq!(select_view(entry.label).map(|e| e.kind), Some(entry.kind));
        }
        assert!(ViewKind::RegionalBar.entry().uses(ViewFilter::Month));
        assert!(!ViewKind::PriceTrend.entry().uses(ViewFilter::HouseType));
    }

    #[test]
    fn test_unrecognized_view_warns() {
        let outcome = render_view("Pie chart", &fixture(), &filters()).unwrap();
        match outcome {
            ViewOutcome::Warning(message) => assert!(message.contains("Pie chart")),
            other => panic!("expected warning, got {other:?}"),
        }
        assert!(select_view("").is_none());
    }

    #[test]
    fn test_price_trend_view() {
        let outcome =
            render_view(ViewKind::PriceTrend.label(), &fixture(), &filters()).unwrap();
        let ViewOutcome::Chart { heading, spec } = outcome else {
            panic!("expected chart");
        };
        assert_eq!(heading, "Average price trend by house type");
        let ChartSpec::Panels(panels) = spec else {
            panic!("expected panel chart");
        };
        assert_eq!(panels.metric, PanelMetric::MeanPrice);
        assert_eq!(panels.panels[0].series.values(), vec![200.0]);
        assert_eq!(panels.y_range, Some((50.0, 200.0)));
    }

    #[test]
    fn test_transaction_count_view() {
        let outcome =
            render_view(ViewKind::TransactionCount.label(), &fixture(), &filters()).unwrap();
        let ViewOutcome::Chart {
            spec: ChartSpec::Panels(panels),
            ..
        } = outcome
        else {
            panic!("expected panel chart");
        };
        assert_eq!(panels.panels[0].series.values(), vec![2.0]);
        assert_eq!(panels.panels[2].series.values(), vec![1.0]);
    }

    #[test]
    fn test_regional_bar_view() {
        let outcome =
            render_view(ViewKind::RegionalBar.label(), &fixture(), &filters()).unwrap();
        let ViewOutcome::Chart {
            spec: ChartSpec::Bars(bars),
            ..
        } = outcome
        else {
            panic!("expected bar chart");
        };
        let regions: Vec<&str> = bars.bars.iter().map(|b| b.region.as_str()).collect();
        assert_eq!(regions, vec!["강남구", "종로구"]);
        assert_eq!(bars.y_range, Some((0.0, 700.0)));
    }
}

//! Chart Plotter Module
//! Draws chart specifications interactively using egui_plot.

use crate::charts::builder::{format_tick, BarChartSpec, ChartSpec, Panel, PanelChartSpec};
use crate::data::{date_from_epoch_days, epoch_days};
use egui::{Color32, RichText};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoint, PlotPoints, Points};

/// One color per house type panel, in panel order.
pub const PALETTE: [Color32; 4] = [
    Color32::from_rgb(52, 152, 219), // Blue
    Color32::from_rgb(231, 76, 60),  // Red
    Color32::from_rgb(46, 204, 113), // Green
    Color32::from_rgb(155, 89, 182), // Purple
];

pub const BAR_COLOR: Color32 = Color32::from_rgb(99, 110, 250);

const PANEL_HEIGHT: f32 = 240.0;
const BAR_CHART_HEIGHT: f32 = 420.0;
const PANEL_SPACING: f32 = 15.0;

pub struct ChartPlotter;

impl ChartPlotter {
    pub fn draw(ui: &mut egui::Ui, spec: &ChartSpec) {
        match spec {
            ChartSpec::Panels(panels) => Self::draw_panel_chart(ui, panels),
            ChartSpec::Bars(bars) => Self::draw_bar_chart(ui, bars),
        }
    }

    /// Format a plot x coordinate (days since epoch) as a date.
    pub fn format_date_tick(x: f64) -> String {
        if x.fract().abs() > 1e-6 {
            return String::new();
        }
        date_from_epoch_days(x as i32)
            .map(|date| date.format("%Y-%m-%d").to_string())
            .unwrap_or_default()
    }

    /// Region label for a bar slot, empty between slots.
    pub fn bar_label(labels: &[String], x: f64) -> String {
        let idx = x.round();
        if (x - idx).abs() > 1e-6 || idx < 0.0 {
            return String::new();
        }
        labels.get(idx as usize).cloned().unwrap_or_default()
    }

    /// 2x2 grid of line charts sharing the x window and y range.
    pub fn draw_panel_chart(ui: &mut egui::Ui, spec: &PanelChartSpec) {
        ui.label(
            RichText::new(format!("{} · {}", spec.title, spec.region))
                .size(16.0)
                .strong(),
        );
        ui.add_space(8.0);

        let panel_width = ((ui.available_width() - PANEL_SPACING) / 2.0).max(200.0);

        egui::Grid::new("house_type_panels")
            .num_columns(2)
            .spacing([PANEL_SPACING, PANEL_SPACING])
            .show(ui, |ui| {
                for (i, panel) in spec.panels.iter().enumerate() {
                    ui.vertical(|ui| {
                        ui.set_width(panel_width);
                        Self::draw_panel(ui, spec, panel, i, panel_width);
                    });
                    if i % 2 == 1 {
                        ui.end_row();
                    }
                }
            });
    }

    fn draw_panel(
        ui: &mut egui::Ui,
        spec: &PanelChartSpec,
        panel: &Panel,
        index: usize,
        width: f32,
    ) {
        let color = PALETTE[index % PALETTE.len()];
        ui.label(RichText::new(&panel.title).size(14.0).strong().color(color));

        let mut plot = Plot::new(format!("panel_{:?}_{}", spec.metric, index))
            .height(PANEL_HEIGHT)
            .width(width)
            .allow_scroll(false)
            .y_axis_label(spec.y_title.clone())
            .include_x(epoch_days(spec.x_window.start) as f64)
            .include_x(epoch_days(spec.x_window.end) as f64)
            .x_axis_formatter(|mark, _range| Self::format_date_tick(mark.value))
            .y_axis_formatter(|mark, _range| format_tick(mark.value))
            .label_formatter(|name, value: &PlotPoint| {
                let date = Self::format_date_tick(value.x.round());
                if name.is_empty() {
                    format!("{}: {}", date, format_tick(value.y))
                } else {
                    format!("{}\n{}: {}", name, date, format_tick(value.y))
                }
            })
            .legend(Legend::default());

        if let Some((lo, hi)) = spec.y_range {
            plot = plot.include_y(lo).include_y(hi);
        }

        let points: Vec<[f64; 2]> = panel
            .series
            .points
            .iter()
            .map(|p| [epoch_days(p.date) as f64, p.value])
            .collect();

        plot.show(ui, |plot_ui| {
            if points.is_empty() {
                return;
            }
            plot_ui.line(
                Line::new(PlotPoints::from(points.clone()))
                    .color(color)
                    .width(1.5)
                    .name(&panel.series_name),
            );
            plot_ui.points(
                Points::new(PlotPoints::from(points))
                    .radius(3.0)
                    .color(color)
                    .name(&panel.series_name),
            );
        });

        ui.label(
            RichText::new(panel.summary.describe())
                .size(11.0)
                .color(Color32::GRAY),
        );
    }

    /// Single bar chart, regions in descending order of value.
    pub fn draw_bar_chart(ui: &mut egui::Ui, spec: &BarChartSpec) {
        ui.label(
            RichText::new(format!(
                "{} · month {} · {}",
                spec.title, spec.month, spec.house_type
            ))
            .size(16.0)
            .strong(),
        );
        ui.add_space(8.0);

        if spec.bars.is_empty() {
            ui.label(RichText::new("No deals for this month and house type").color(Color32::GRAY));
            return;
        }

        let labels: Vec<String> = spec.bars.iter().map(|b| b.region.clone()).collect();
        let bars: Vec<Bar> = spec
            .bars
            .iter()
            .enumerate()
            .map(|(i, bar)| {
                Bar::new(i as f64, bar.value)
                    .name(&bar.region)
                    .width(0.6)
                    .fill(BAR_COLOR)
            })
            .collect();

        let mut plot = Plot::new("regional_bar_chart")
            .height(BAR_CHART_HEIGHT)
            .allow_scroll(false)
            .x_axis_label(spec.x_title.clone())
            .y_axis_label(spec.y_title.clone())
            .x_axis_formatter(move |mark, _range| Self::bar_label(&labels, mark.value))
            .y_axis_formatter(|mark, _range| format_tick(mark.value));

        if let Some((lo, hi)) = spec.y_range {
            plot = plot.include_y(lo).include_y(hi);
        }

        plot.show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name(&spec.title).color(BAR_COLOR));
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_format_date_tick() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 17).unwrap();
        let x = epoch_days(date) as f64;
        assert_eq!(ChartPlotter::format_date_tick(x), "2024-05-17");
        assert_eq!(ChartPlotter::format_date_tick(x + 0.5), "");
    }

    #[test]
    fn test_bar_label() {
        let labels = vec!["종로구".to_string(), "강남구".to_string()];
        assert_eq!(ChartPlotter::bar_label(&labels, 1.0), "강남구");
        assert_eq!(ChartPlotter::bar_label(&labels, 0.5), "");
        assert_eq!(ChartPlotter::bar_label(&labels, 2.0), "");
        assert_eq!(ChartPlotter::bar_label(&labels, -1.0), "");
    }
}

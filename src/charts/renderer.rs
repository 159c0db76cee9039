//! Static Chart Renderer
//! Draws the current chart specification with plotters and encodes it as PNG.
//!
//! Layout mirrors the interactive view:
//! - panel charts: title line, then a 2x2 grid (one line chart per house type)
//!   sharing the date window and the global y range
//! - bar chart: one chart, regions left to right by descending value

use crate::charts::builder::{format_tick, BarChartSpec, ChartSpec, PanelChartSpec};
use crate::data::epoch_days;
use crate::charts::ChartPlotter;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::io::Cursor;
use std::path::Path;
use thiserror::Error;
use tracing::info;

const SERIES_COLORS: [RGBColor; 4] = [
    RGBColor(52, 152, 219),
    RGBColor(231, 76, 60),
    RGBColor(46, 204, 113),
    RGBColor(155, 89, 182),
];
const BAR_COLOR: RGBColor = RGBColor(99, 110, 250);
const FONT: &str = "sans-serif";

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Drawing failed: {0}")]
    Drawing(String),
    #[error("Image buffer does not match {0}x{1}")]
    Buffer(u32, u32),
    #[error("PNG encoding failed: {0}")]
    Encode(#[from] image::ImageError),
    #[error("Failed to write image: {0}")]
    Io(#[from] std::io::Error),
}

fn drawing_error<E: std::fmt::Display>(e: E) -> RenderError {
    RenderError::Drawing(e.to_string())
}

type Area<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render to in-memory PNG bytes.
    pub fn render_png(spec: &ChartSpec, width: u32, height: u32) -> Result<Vec<u8>, RenderError> {
        let mut buffer = vec![0u8; width as usize * height as usize * 3];
        {
            let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
            root.fill(&WHITE).map_err(drawing_error)?;
            match spec {
                ChartSpec::Panels(panels) => Self::draw_panels(&root, panels)?,
                ChartSpec::Bars(bars) => Self::draw_bars(&root, bars)?,
            }
            root.present().map_err(drawing_error)?;
        }

        let img = image::RgbImage::from_raw(width, height, buffer)
            .ok_or(RenderError::Buffer(width, height))?;
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)?;
        Ok(bytes)
    }

    /// Render and write a PNG file.
    pub fn export_png(
        spec: &ChartSpec,
        width: u32,
        height: u32,
        output_path: &Path,
    ) -> Result<(), RenderError> {
        let bytes = Self::render_png(spec, width, height)?;
        std::fs::write(output_path, &bytes)?;
        info!(title = spec.title(), path = %output_path.display(), bytes = bytes.len(), "chart exported");
        Ok(())
    }

    /// Widen a degenerate range so plotters has something to scale.
    pub fn drawable_range(range: Option<(f64, f64)>) -> (f64, f64) {
        match range {
            Some((lo, hi)) if hi > lo => (lo, hi),
            Some((lo, _)) => (lo - 1.0, lo + 1.0),
            None => (0.0, 1.0),
        }
    }

    fn draw_panels(root: &Area<'_>, spec: &PanelChartSpec) -> Result<(), RenderError> {
        let root = root
            .titled(&format!("{} - {}", spec.title, spec.region), (FONT, 24))
            .map_err(drawing_error)?;

        let x_lo = epoch_days(spec.x_window.start) as f64;
        let x_hi = (epoch_days(spec.x_window.end) as f64).max(x_lo + 1.0);
        let (y_lo, y_hi) = Self::drawable_range(spec.y_range);

        for (i, (area, panel)) in root
            .split_evenly((2, 2))
            .iter()
            .zip(spec.panels.iter())
            .enumerate()
        {
            let color = SERIES_COLORS[i % SERIES_COLORS.len()];

            let mut chart = ChartBuilder::on(area)
                .caption(&panel.title, (FONT, 18))
                .margin(10)
                .x_label_area_size(30)
                .y_label_area_size(70)
                .build_cartesian_2d(x_lo..x_hi, y_lo..y_hi)
                .map_err(drawing_error)?;

            chart
                .configure_mesh()
                .x_labels(4)
                .x_label_formatter(&|x| ChartPlotter::format_date_tick(x.round()))
                .y_label_formatter(&|y| format_tick(*y))
                .y_desc(spec.y_title.as_str())
                .draw()
                .map_err(drawing_error)?;

            let points: Vec<(f64, f64)> = panel
                .series
                .points
                .iter()
                .map(|p| (epoch_days(p.date) as f64, p.value))
                .collect();

            chart
                .draw_series(LineSeries::new(points.iter().copied(), color.stroke_width(2)))
                .map_err(drawing_error)?;
            chart
                .draw_series(points.iter().map(|&p| Circle::new(p, 3, color.filled())))
                .map_err(drawing_error)?;
        }

        Ok(())
    }

    fn draw_bars(root: &Area<'_>, spec: &BarChartSpec) -> Result<(), RenderError> {
        let slots = spec.bars.len().max(1);
        let (_, y_hi) = Self::drawable_range(spec.y_range);
        let labels: Vec<String> = spec.bars.iter().map(|b| b.region.clone()).collect();

        let mut chart = ChartBuilder::on(root)
            .caption(
                format!("{} (month {}, {})", spec.title, spec.month, spec.house_type),
                (FONT, 24),
            )
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(80)
            .build_cartesian_2d(-0.5f64..(slots as f64 - 0.5), 0f64..y_hi)
            .map_err(drawing_error)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(slots)
            .x_label_formatter(&|x| ChartPlotter::bar_label(&labels, *x))
            .y_label_formatter(&|y| format_tick(*y))
            .x_desc(spec.x_title.as_str())
            .y_desc(spec.y_title.as_str())
            .draw()
            .map_err(drawing_error)?;

        chart
            .draw_series(spec.bars.iter().enumerate().map(|(i, bar)| {
                let x = i as f64;
                Rectangle::new([(x - 0.3, 0.0), (x + 0.3, bar.value)], BAR_COLOR.filled())
            }))
            .map_err(drawing_error)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::{ChartBuilder as SpecBuilder, PanelMetric};
    use crate::data::{DateWindow, HouseType, HouseTypeSeries, RegionBar, SeriesPoint};
    use chrono::NaiveDate;

    #[test]
    fn test_drawable_range() {
        assert_eq!(StaticChartRenderer::drawable_range(Some((1.0, 5.0))), (1.0, 5.0));
        assert_eq!(StaticChartRenderer::drawable_range(Some((3.0, 3.0))), (2.0, 4.0));
        assert_eq!(StaticChartRenderer::drawable_range(None), (0.0, 1.0));
    }

    const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn test_render_bar_chart_png() {
        let spec = ChartSpec::Bars(SpecBuilder::bar_chart(
            1,
            "아파트",
            vec![
                RegionBar {
                    region: "A".to_string(),
                    value: 150.0,
                },
                RegionBar {
                    region: "B".to_string(),
                    value: 300.0,
                },
            ],
        ));

        let bytes = StaticChartRenderer::render_png(&spec, 320, 240).unwrap();
        assert_eq!(&bytes[..8], &PNG_SIGNATURE);
    }

    #[test]
    fn test_render_empty_panel_chart_png() {
        let spec = SpecBuilder::panel_chart(
            PanelMetric::MeanPrice,
            "종로구",
            DateWindow::default(),
            Vec::new(),
        );
        assert_eq!(spec.y_range, None);

        let bytes = StaticChartRenderer::render_png(&ChartSpec::Panels(spec), 640, 480).unwrap();
        assert_eq!(&bytes[..8], &PNG_SIGNATURE);
    }

    #[test]
    fn test_render_panel_chart_png() {
        let point = |day: u32, value: f64| SeriesPoint {
            date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
            value,
        };
        let series = vec![
            HouseTypeSeries {
                house_type: HouseType::Apartment,
                points: vec![point(1, 100.0), point(15, 300.0)],
            },
            HouseTypeSeries {
                house_type: HouseType::Officetel,
                points: vec![point(10, 50.0)],
            },
        ];
        let spec = SpecBuilder::panel_chart(
            PanelMetric::TransactionCount,
            "종로구",
            DateWindow::default(),
            series,
        );
        assert_eq!(spec.y_range, Some((50.0, 300.0)));

        let bytes = StaticChartRenderer::render_png(&ChartSpec::Panels(spec), 640, 480).unwrap();
        assert_eq!(&bytes[..8], &PNG_SIGNATURE);
    }

    #[test]
    fn test_export_png_writes_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("chart.png");
        let spec = ChartSpec::Bars(SpecBuilder::bar_chart(2, "아파트", Vec::new()));

        StaticChartRenderer::export_png(&spec, 320, 240, &path).unwrap();
        assert_eq!(&std::fs::read(&path).unwrap()[..8], &PNG_SIGNATURE);
    }
}

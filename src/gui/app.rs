//! Real Estate Dashboard Main Application
//! Main window with control panel and chart viewer.

use crate::charts::StaticChartRenderer;
use crate::config::DashboardConfig;
use crate::data::DataLoader;
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction};
use crate::views::{render_view, ViewFilters, ViewOutcome};
use egui::SidePanel;
use polars::prelude::DataFrame;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver};
use std::sync::Arc;
use std::thread;
use tracing::{error, info, warn};

/// CSV loading result from background thread
enum LoadResult {
    Progress(String),
    Complete { df: DataFrame, path: PathBuf },
    Error(String),
}

/// Main application window.
pub struct DashboardApp {
    config: DashboardConfig,
    loader: DataLoader,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,

    // Async CSV loading
    load_rx: Option<Receiver<LoadResult>>,
    is_loading: bool,
}

impl DashboardApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: DashboardConfig) -> Self {
        if let Some(font_path) = &config.font_path {
            Self::install_font(&cc.egui_ctx, font_path);
        }

        let mut app = Self {
            control_panel: ControlPanel::new(&config.default_view),
            config,
            loader: DataLoader::new(),
            chart_viewer: ChartViewer::new(),
            load_rx: None,
            is_loading: false,
        };

        if let Some(path) = app.config.csv_path.clone() {
            app.start_loading(path);
        }
        app
    }

    /// Add a Hangul-capable font ahead of egui's defaults.
    fn install_font(ctx: &egui::Context, path: &Path) {
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "font not loaded");
                return;
            }
        };

        let mut fonts = egui::FontDefinitions::default();
        fonts
            .font_data
            .insert("hangul".to_owned(), Arc::new(egui::FontData::from_owned(bytes)));
        for family in [egui::FontFamily::Proportional, egui::FontFamily::Monospace] {
            fonts
                .families
                .entry(family)
                .or_default()
                .insert(0, "hangul".to_owned());
        }
        ctx.set_fonts(fonts);
        info!(path = %path.display(), "font installed");
    }

    /// Handle CSV file selection
    fn handle_browse_csv(&mut self) {
        if self.is_loading {
            return; // Already loading
        }

        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .pick_file()
        {
            self.start_loading(path);
        }
    }

    /// Load the CSV in a background thread.
    fn start_loading(&mut self, path: PathBuf) {
        self.chart_viewer.clear();
        self.control_panel.export_enabled = false;
        self.control_panel.settings.csv_path = Some(path.clone());
        self.control_panel.set_progress(0.0, "Loading CSV file...");
        self.is_loading = true;

        let (tx, rx) = channel();
        self.load_rx = Some(rx);

        let columns = self.config.columns.clone();
        let date_format = self.config.date_format.clone();

        thread::spawn(move || {
            let _ = tx.send(LoadResult::Progress("Reading CSV file...".to_string()));

            match DataLoader::read_csv(&path, &columns, &date_format) {
                Ok(df) => {
                    let _ = tx.send(LoadResult::Complete { df, path });
                }
                Err(e) => {
                    let _ = tx.send(LoadResult::Error(e.to_string()));
                }
            }
        });
    }

    /// Check for CSV loading results
    fn check_load_results(&mut self) {
        let rx = self.load_rx.take();
        if let Some(rx) = rx {
            let mut should_keep_receiver = true;

            while let Ok(result) = rx.try_recv() {
                match result {
                    LoadResult::Progress(status) => {
                        self.control_panel.set_progress(10.0, &status);
                    }
                    LoadResult::Complete { df, path } => {
                        self.loader.set_dataframe(df, Some(path));
                        let row_count = self.loader.get_row_count();
                        info!(
                            path = ?self.loader.get_file_path(),
                            rows = row_count,
                            "deal table ready"
                        );
                        self.control_panel.update_choices(
                            self.loader.get_regions(),
                            self.loader.get_months(),
                            self.loader.get_house_types(),
                        );
                        self.control_panel
                            .set_progress(100.0, &format!("Loaded {} deals", row_count));
                        self.is_loading = false;
                        should_keep_receiver = false;
                        self.refresh_chart();
                    }
                    LoadResult::Error(message) => {
                        error!(error = %message, "CSV load failed");
                        self.control_panel
                            .set_progress(0.0, &format!("Error: {}", message));
                        self.is_loading = false;
                        should_keep_receiver = false;
                    }
                }
            }

            if should_keep_receiver {
                self.load_rx = Some(rx);
            }
        }
    }

    /// Re-run the selected view against the loaded table.
    fn refresh_chart(&mut self) {
        let Some(df) = self.loader.get_dataframe() else {
            return;
        };

        let settings = &self.control_panel.settings;
        let filters = ViewFilters {
            region: settings.region.clone(),
            month: settings.month,
            house_type: settings.house_type.clone(),
            window: self.config.window,
        };

        match render_view(&settings.view_label, df, &filters) {
            Ok(outcome) => {
                self.control_panel.export_enabled =
                    matches!(outcome, ViewOutcome::Chart { .. });
                self.chart_viewer.set_outcome(outcome);
            }
            Err(e) => {
                error!(error = %e, "chart aggregation failed");
                self.chart_viewer.clear();
                self.control_panel.export_enabled = false;
                self.control_panel
                    .set_progress(0.0, &format!("Error: {}", e));
            }
        }
    }

    /// Handle PNG export of the chart on screen
    fn handle_export_png(&mut self) {
        let Some(spec) = self.chart_viewer.current_spec() else {
            self.control_panel.set_progress(0.0, "No chart to export");
            return;
        };

        let Some(output_path) = rfd::FileDialog::new()
            .add_filter("PNG Image", &["png"])
            .set_file_name("realestate_chart.png")
            .save_file()
        else {
            return; // User cancelled
        };

        let export = self.config.export;
        match StaticChartRenderer::export_png(spec, export.width, export.height, &output_path) {
            Ok(()) => {
                self.control_panel.set_progress(
                    100.0,
                    &format!("PNG exported: {}", output_path.display()),
                );
                if let Err(e) = open::that(&output_path) {
                    warn!(error = %e, "could not open exported image");
                }
            }
            Err(e) => {
                error!(error = %e, "PNG export failed");
                self.control_panel
                    .set_progress(0.0, &format!("Error: {}", e));
            }
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Check for background results
        self.check_load_results();

        // Request repaint while loading
        if self.is_loading {
            ctx.request_repaint();
        }

        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(300.0)
            .max_width(350.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let action = self.control_panel.show(ui);

                    match action {
                        ControlPanelAction::BrowseCsv => self.handle_browse_csv(),
                        ControlPanelAction::SelectionChanged => self.refresh_chart(),
                        ControlPanelAction::ExportPng => self.handle_export_png(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Chart Viewer
        egui::CentralPanel::default().show(ctx, |ui| {
            self.chart_viewer.show(ui);
        });
    }
}

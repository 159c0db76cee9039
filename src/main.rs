//! Real Estate Dashboard - regional deal price and transaction trends
//!
//! Loads a transaction CSV and charts it by region, house type and month.

mod charts;
mod config;
mod data;
mod gui;
mod stats;
mod views;

use anyhow::{Context, Result};
use config::DashboardConfig;
use eframe::egui;
use gui::DashboardApp;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

fn main() -> Result<()> {
    init_logging();

    // Optional config path as the only argument
    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = DashboardConfig::resolve(config_path.as_deref())
        .context("Failed to load dashboard configuration")?;

    info!(
        "Real Estate Dashboard v{} (window {} .. {})",
        env!("CARGO_PKG_VERSION"),
        config.window.start,
        config.window.end
    );

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([1100.0, 700.0])
            .with_title("Real Estate Dashboard"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "Real Estate Dashboard",
        options,
        Box::new(move |cc| Ok(Box::new(DashboardApp::new(cc, config)))),
    )
    .map_err(|e| anyhow::anyhow!("Dashboard window failed: {e}"))
}

//! Chart Viewer Widget
//! Central scrollable area showing the selected view's chart or its warning.

use crate::charts::{ChartPlotter, ChartSpec};
use crate::views::ViewOutcome;
use egui::{Color32, RichText, ScrollArea};

/// Holds the outcome of the last render.
#[derive(Default)]
pub struct ChartViewer {
    pub outcome: Option<ViewOutcome>,
}

impl ChartViewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.outcome = None;
    }

    pub fn set_outcome(&mut self, outcome: ViewOutcome) {
        self.outcome = Some(outcome);
    }

    /// Chart currently on screen, if any.
    pub fn current_spec(&self) -> Option<&ChartSpec> {
        match &self.outcome {
            Some(ViewOutcome::Chart { spec, .. }) => Some(spec),
            _ => None,
        }
    }

    pub fn show(&self, ui: &mut egui::Ui) {
        match &self.outcome {
            None => {
                ui.centered_and_justified(|ui| {
                    ui.label(RichText::new("No Data").size(20.0));
                });
            }
            Some(ViewOutcome::Warning(message)) => {
                egui::Frame::none()
                    .rounding(8.0)
                    .stroke(egui::Stroke::new(2.0, Color32::from_rgb(255, 193, 7)))
                    .inner_margin(12.0)
                    .show(ui, |ui| {
                        ui.label(
                            RichText::new(format!("⚠ {}", message))
                                .size(16.0)
                                .color(Color32::from_rgb(255, 193, 7)),
                        );
                    });
            }
            Some(ViewOutcome::Chart { heading, spec }) => {
                ScrollArea::vertical()
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        ui.heading(*heading);
                        ui.add_space(10.0);
                        ChartPlotter::draw(ui, spec);
                    });
            }
        }
    }
}

//! Control Panel Widget
//! Left side panel: data source, chart menu, per-view filters and export.

use crate::views::{select_view, ViewFilter, VIEWS};
use egui::{Color32, ComboBox, RichText};
use std::path::PathBuf;

/// Current widget selections.
#[derive(Default, Clone)]
pub struct UserSettings {
    pub csv_path: Option<PathBuf>,
    pub view_label: String,
    pub region: String,
    pub month: u32,
    pub house_type: String,
}

/// Left side control panel.
pub struct ControlPanel {
    pub settings: UserSettings,
    pub regions: Vec<String>,
    pub months: Vec<u32>,
    pub house_types: Vec<String>,
    pub progress: f32,
    pub status: String,
    pub export_enabled: bool,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            settings: UserSettings::default(),
            regions: Vec::new(),
            months: Vec::new(),
            house_types: Vec::new(),
            progress: 0.0,
            status: "Ready".to_string(),
            export_enabled: false,
        }
    }
}

/// Keep `current` if it is still offered, else fall back to the first choice.
fn keep_or_first<T: Clone + PartialEq + Default>(current: &T, choices: &[T]) -> T {
    if choices.contains(current) {
        current.clone()
    } else {
        choices.first().cloned().unwrap_or_default()
    }
}

impl ControlPanel {
    pub fn new(view_label: &str) -> Self {
        let mut panel = Self::default();
        panel.settings.view_label = view_label.to_string();
        panel
    }

    /// Replace the filter choices after a load, keeping valid selections.
    pub fn update_choices(&mut self, regions: Vec<String>, months: Vec<u32>, house_types: Vec<String>) {
        self.settings.region = keep_or_first(&self.settings.region, &regions);
        self.settings.month = keep_or_first(&self.settings.month, &months);
        self.settings.house_type = keep_or_first(&self.settings.house_type, &house_types);
        self.regions = regions;
        self.months = months;
        self.house_types = house_types;
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("🏠 Real Estate Dashboard")
                    .size(20.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== CSV File Section =====
        ui.label(RichText::new("📁 Data Source").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    let path_text = self
                        .settings
                        .csv_path
                        .as_ref()
                        .and_then(|p| p.file_name())
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_else(|| "No file selected".to_string());

                    ui.label(RichText::new(&path_text).size(12.0).color(
                        if self.settings.csv_path.is_some() {
                            Color32::WHITE
                        } else {
                            Color32::GRAY
                        },
                    ));

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("📂 Browse").clicked() {
                            action = ControlPanelAction::BrowseCsv;
                        }
                    });
                });
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Chart Menu Section =====
        ui.label(RichText::new("📈 Chart Menu").size(14.0).strong());
        ui.add_space(5.0);

        for entry in VIEWS.iter() {
            if ui
                .radio_value(
                    &mut self.settings.view_label,
                    entry.label.to_string(),
                    entry.label,
                )
                .changed()
            {
                action = ControlPanelAction::SelectionChanged;
            }
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Filter Section =====
        ui.label(RichText::new("🔧 Filters").size(14.0).strong());
        ui.add_space(8.0);

        if self.show_filters(ui) {
            action = ControlPanelAction::SelectionChanged;
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Action Buttons =====
        ui.vertical_centered(|ui| {
            ui.add_enabled_ui(self.export_enabled, |ui| {
                let button = egui::Button::new(RichText::new("🖼 Export PNG").size(14.0))
                    .min_size(egui::vec2(150.0, 30.0));
                if ui.add(button).clicked() {
                    action = ControlPanelAction::ExportPng;
                }
            });
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Progress Section =====
        ui.label(RichText::new("📊 Status").size(14.0).strong());
        ui.add_space(5.0);

        ui.add(
            egui::ProgressBar::new(self.progress / 100.0)
                .show_percentage()
                .animate(self.progress > 0.0 && self.progress < 100.0),
        );

        ui.add_space(5.0);

        let status_color = if self.status.contains("Error") {
            Color32::from_rgb(220, 53, 69)
        } else if self.status.contains("Loaded") || self.status.contains("exported") {
            Color32::from_rgb(40, 167, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }

    /// Filter widgets of the selected view. Returns true when a value changed.
    fn show_filters(&mut self, ui: &mut egui::Ui) -> bool {
        let Some(entry) = select_view(&self.settings.view_label) else {
            ui.label(RichText::new("No filters").color(Color32::GRAY));
            return false;
        };

        let label_width = 90.0;
        let combo_width = 160.0;
        let mut changed = false;

        if entry.uses(ViewFilter::Region) {
            ui.horizontal(|ui| {
                ui.add_sized([label_width, 20.0], egui::Label::new("Region:"));
                ComboBox::from_id_salt("region")
                    .width(combo_width)
                    .selected_text(&self.settings.region)
                    .show_ui(ui, |ui| {
                        for region in &self.regions {
                            if ui
                                .selectable_label(self.settings.region == *region, region)
                                .clicked()
                            {
                                self.settings.region = region.clone();
                                changed = true;
                            }
                        }
                    });
            });
            ui.add_space(5.0);
        }

        if entry.uses(ViewFilter::Month) {
            ui.horizontal(|ui| {
                ui.add_sized([label_width, 20.0], egui::Label::new("Month:"));
                ComboBox::from_id_salt("month")
                    .width(combo_width)
                    .selected_text(self.settings.month.to_string())
                    .show_ui(ui, |ui| {
                        for &month in &self.months {
                            if ui
                                .selectable_label(self.settings.month == month, month.to_string())
                                .clicked()
                            {
                                self.settings.month = month;
                                changed = true;
                            }
                        }
                    });
            });
            ui.add_space(5.0);
        }

        if entry.uses(ViewFilter::HouseType) {
            ui.horizontal(|ui| {
                ui.add_sized([label_width, 20.0], egui::Label::new("House Type:"));
                ComboBox::from_id_salt("house_type")
                    .width(combo_width)
                    .selected_text(&self.settings.house_type)
                    .show_ui(ui, |ui| {
                        for house_type in &self.house_types {
                            if ui
                                .selectable_label(self.settings.house_type == *house_type, house_type)
                                .clicked()
                            {
                                self.settings.house_type = house_type.clone();
                                changed = true;
                            }
                        }
                    });
            });
        }

        changed
    }

    /// Set progress and status
    pub fn set_progress(&mut self, progress: f32, status: &str) {
        self.progress = progress;
        self.status = status.to_string();
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    BrowseCsv,
    SelectionChanged,
    ExportPng,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_choices_defaults_to_first() {
        let mut panel = ControlPanel::new("Average price trend");
        panel.update_choices(
            vec!["강남구".to_string(), "종로구".to_string()],
            vec![1, 2, 12],
            vec!["아파트".to_string()],
        );

        assert_eq!(panel.settings.region, "강남구");
        assert_eq!(panel.settings.month, 1);
        assert_eq!(panel.settings.house_type, "아파트");
        assert_eq!(panel.settings.view_label, "Average price trend");
    }

    #[test]
    fn test_update_choices_keeps_valid_selection() {
        let mut panel = ControlPanel::new("Average price by region");
        panel.settings.region = "종로구".to_string();
        panel.settings.month = 12;
        panel.update_choices(
            vec!["강남구".to_string(), "종로구".to_string()],
            vec![1, 12],
            Vec::new(),
        );

        assert_eq!(panel.settings.region, "종로구");
        assert_eq!(panel.settings.month, 12);
        assert_eq!(panel.settings.house_type, "");
    }
}

use egui::{RichText, Ui};

use crate::model::GroupBy;
use crate::ui::theme;

/// View actions requested from the toolbar, applied by the app afterwards
/// (the viewport anchor needs the chart rect, which the toolbar closure
/// doesn't have).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarAction {
    None,
    ZoomIn,
    ZoomOut,
    FitToView,
    ResetView,
    LayoutChanged,
}

pub fn show_toolbar(group_by: &mut GroupBy, propagate: &mut bool, ui: &mut Ui) -> ToolbarAction {
    let mut action = ToolbarAction::None;

    ui.horizontal(|ui| {
        ui.label(RichText::new("Group by").color(theme::TEXT_SECONDARY));
        for key in [GroupBy::Owner, GroupBy::Status, GroupBy::Priority] {
            if ui.selectable_value(group_by, key, key.label()).clicked() {
                action = ToolbarAction::LayoutChanged;
            }
        }

        ui.separator();

        if ui.checkbox(propagate, "Roll up status").changed() {
            action = ToolbarAction::LayoutChanged;
        }

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.button("Reset").clicked() {
                action = ToolbarAction::ResetView;
            }
            if ui.button("Fit").clicked() {
                action = ToolbarAction::FitToView;
            }
            if ui.button("−").clicked() {
                action = ToolbarAction::ZoomOut;
            }
            if ui.button("+").clicked() {
                action = ToolbarAction::ZoomIn;
            }
            ui.label(RichText::new("View").color(theme::TEXT_SECONDARY));
        });
    });

    action
}

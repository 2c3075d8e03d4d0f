// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Toolbar and mode selection UI.
//!
//! This module provides the toolbar for switching the editing mode,
//! stepping through images, saving, and sizing keypoints.

use simple_annotator::editor::Mode;

/// Result of toolbar interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarAction {
    None,
    SwitchMode,
    PrevImage,
    NextImage,
    Save,
}

/// What the toolbar needs to know to enable its buttons.
pub struct ToolbarState {
    pub mode: Mode,
    pub has_prev: bool,
    pub has_next: bool,
    pub can_save: bool,
}

/// Display the toolbar. The point size is edited in place.
pub fn show(ui: &mut egui::Ui, state: &ToolbarState, point_size: &mut u32) -> ToolbarAction {
    let mut action = ToolbarAction::None;

    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        if ui
            .button(format!("Switch Mode (Current: {})", state.mode.label()))
            .clicked()
        {
            action = ToolbarAction::SwitchMode;
        }

        ui.separator();

        if ui
            .add_enabled(state.has_prev, egui::Button::new("◀ Prev image"))
            .clicked()
        {
            action = ToolbarAction::PrevImage;
        }
        if ui
            .add_enabled(state.has_next, egui::Button::new("Next image ▶"))
            .clicked()
        {
            action = ToolbarAction::NextImage;
        }
        if ui
            .add_enabled(state.can_save, egui::Button::new("Save"))
            .clicked()
        {
            action = ToolbarAction::Save;
        }

        ui.separator();

        ui.add(egui::Slider::new(point_size, 1..=100).text("Point size"));

        ui.separator();

        // Mode description
        let mode_text = match state.mode {
            Mode::Keypoints => {
                "Click to add a keypoint, drag to move it, drop it outside the image to delete"
            }
            Mode::BoundingBoxes => {
                "Drag to draw a box, drag a corner to resize, invert or drag out to delete"
            }
        };
        ui.label(egui::RichText::new(mode_text).italics().weak());
    });

    action
}

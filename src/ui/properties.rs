// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Properties panel.
//!
//! This module provides the side panel listing the classes (with their
//! colors), the images of the open directory and the annotations of the
//! current image. Annotation lines can be edited in place.

use simple_annotator::models::annotation::{Annotation, AnnotationType};
use simple_annotator::models::classes::{ClassRegistry, Color};
use simple_annotator::io::serialization::format_line;
use std::path::PathBuf;

/// Result of properties panel interaction.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertiesAction {
    None,
    SelectClass(usize),
    SetColor(usize, Color),
    GoToImage(usize),
    /// Replace annotation `index` with the parsed text.
    CommitLine(usize, String),
    DeleteAnnotation(usize),
}

/// An annotation line being edited.
#[derive(Debug, Clone)]
pub struct LineEdit {
    pub index: usize,
    pub text: String,
    focused: bool,
}

impl LineEdit {
    pub fn new(index: usize, text: String) -> Self {
        Self {
            index,
            text,
            focused: false,
        }
    }
}

/// What the panel displays this frame.
pub struct PropertiesView<'a> {
    pub classes: Option<&'a ClassRegistry>,
    pub active_class: Option<usize>,
    pub images: &'a [PathBuf],
    pub current_image: Option<usize>,
    pub annotations: &'a [Annotation],
}

/// Display the properties panel.
pub fn show(
    ui: &mut egui::Ui,
    view: &PropertiesView<'_>,
    edit: &mut Option<LineEdit>,
) -> PropertiesAction {
    let mut action = PropertiesAction::None;

    ui.heading("Classes");
    ui.separator();
    match view.classes {
        Some(classes) => {
            for (index, name) in classes.names().iter().enumerate() {
                ui.horizontal(|ui| {
                    if let Ok(color) = classes.color_of(index) {
                        let mut rgb = [color.r, color.g, color.b];
                        if ui.color_edit_button_srgb(&mut rgb).changed() {
                            action = PropertiesAction::SetColor(
                                index,
                                Color::rgb(rgb[0], rgb[1], rgb[2]),
                            );
                        }
                    }
                    let label = if name.is_empty() { "(unnamed)" } else { name.as_str() };
                    if ui
                        .radio(view.active_class == Some(index), format!("{index}: {label}"))
                        .clicked()
                    {
                        action = PropertiesAction::SelectClass(index);
                    }
                });
            }
        }
        None => {
            ui.label("No directory open");
        }
    }

    ui.add_space(10.0);
    ui.heading("Images");
    ui.separator();
    egui::ScrollArea::vertical()
        .id_source("image_list")
        .max_height(200.0)
        .show(ui, |ui| {
            if view.images.is_empty() {
                ui.label("No images");
            }
            for (index, path) in view.images.iter().enumerate() {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string());
                if ui
                    .selectable_label(view.current_image == Some(index), name)
                    .clicked()
                {
                    action = PropertiesAction::GoToImage(index);
                }
            }
        });

    ui.add_space(10.0);
    ui.heading(format!("Annotations ({})", view.annotations.len()));
    ui.separator();
    egui::ScrollArea::vertical()
        .id_source("annotation_list")
        .show(ui, |ui| {
            for (index, annotation) in view.annotations.iter().enumerate() {
                ui.horizontal(|ui| {
                    if let Some(current) = edit.as_mut().filter(|e| e.index == index) {
                        let response = ui.add(
                            egui::TextEdit::singleline(&mut current.text)
                                .font(egui::TextStyle::Monospace)
                                .desired_width(f32::INFINITY),
                        );
                        if !current.focused {
                            response.request_focus();
                            current.focused = true;
                        }
                        if response.lost_focus() {
                            if ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                                action = PropertiesAction::CommitLine(index, current.text.clone());
                            } else {
                                log::debug!("Cancelled edit of annotation {}", index);
                            }
                            *edit = None;
                        }
                        return;
                    }

                    if ui.small_button("🗑").on_hover_text("Delete").clicked() {
                        action = PropertiesAction::DeleteAnnotation(index);
                    }
                    let line = format_line(annotation);
                    if ui
                        .add(
                            egui::Label::new(egui::RichText::new(&line).monospace())
                                .sense(egui::Sense::click()),
                        )
                        .on_hover_text(match annotation.annotation_type() {
                            AnnotationType::Keypoint => "Keypoint, click to edit",
                            AnnotationType::BoundingBox => "Bounding box, click to edit",
                        })
                        .clicked()
                    {
                        *edit = Some(LineEdit::new(index, line));
                    }
                });
            }
        });

    action
}

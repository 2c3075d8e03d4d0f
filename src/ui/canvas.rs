// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Drawing canvas for image display and annotation.
//!
//! This module provides the main canvas area: it paints the current image
//! and the core's render list, and translates egui pointer input into image
//! pixel space for the editing state machine.

use simple_annotator::editor::{DrawItem, PointerButton, PointerEvent, PointerPhase};
use simple_annotator::models::classes::Color;
use simple_annotator::util::geometry::{Frame, PixelPos};

/// Zoom step per mouse wheel notch.
const ZOOM_STEP: f32 = 1.25;
const MIN_ZOOM: f32 = 0.1;
const MAX_ZOOM: f32 = 10.0;

/// Result of canvas interaction.
pub struct CanvasOutput {
    /// Pointer events in image pixel space, in the order they happened.
    pub events: Vec<PointerEvent>,
    /// Zoom factor after this frame's wheel input.
    pub zoom: f32,
}

/// What the canvas displays this frame.
pub struct CanvasView<'a> {
    pub texture: Option<&'a egui::TextureHandle>,
    pub frame: Option<Frame>,
    pub items: &'a [DrawItem],
    pub point_size: u32,
    pub zoom: f32,
    pub status: &'a str,
}

fn color32(color: Color) -> egui::Color32 {
    egui::Color32::from_rgb(color.r, color.g, color.b)
}

fn pointer_button(button: egui::PointerButton) -> PointerButton {
    match button {
        egui::PointerButton::Primary => PointerButton::Primary,
        egui::PointerButton::Secondary => PointerButton::Secondary,
        _ => PointerButton::Middle,
    }
}

/// Scale that fits a `width x height` image into `available`.
fn fit_scale(width: u32, height: u32, available: egui::Vec2) -> f32 {
    (available.x / width as f32).min(available.y / height as f32)
}

/// Translate one frame's raw egui events into image-space pointer events.
///
/// `primary_down` is the button state after all of `events`. The held state
/// is replayed event by event, so a press, drag and release arriving in the
/// same frame keep their order and button state. Presses are only kept where
/// `accepts_press` allows; releases are delivered wherever they happen.
fn collect_pointer_events(
    events: &[egui::Event],
    primary_down: bool,
    accepts_press: impl Fn(egui::Pos2) -> bool,
    to_image: impl Fn(egui::Pos2) -> (f64, f64),
) -> Vec<PointerEvent> {
    let mut primary_held = events
        .iter()
        .find_map(|event| match event {
            egui::Event::PointerButton {
                button: egui::PointerButton::Primary,
                pressed,
                ..
            } => Some(!*pressed),
            _ => None,
        })
        .unwrap_or(primary_down);

    let mut collected = Vec::new();
    for event in events {
        match event {
            egui::Event::PointerButton {
                pos,
                button,
                pressed,
                ..
            } => {
                if *button == egui::PointerButton::Primary {
                    primary_held = *pressed;
                }
                if *pressed && !accepts_press(*pos) {
                    continue;
                }
                let (x, y) = to_image(*pos);
                collected.push(PointerEvent {
                    phase: if *pressed {
                        PointerPhase::Press
                    } else {
                        PointerPhase::Release
                    },
                    button: pointer_button(*button),
                    x,
                    y,
                    primary_held,
                });
            }
            egui::Event::PointerMoved(pos) => {
                let (x, y) = to_image(*pos);
                collected.push(PointerEvent {
                    phase: PointerPhase::Move,
                    button: PointerButton::Primary,
                    x,
                    y,
                    primary_held,
                });
            }
            _ => {}
        }
    }
    collected
}

/// Display the main canvas area and collect pointer input.
pub fn show(ui: &mut egui::Ui, view: CanvasView<'_>) -> CanvasOutput {
    let mut output = CanvasOutput {
        events: Vec::new(),
        zoom: view.zoom,
    };
    // Set background color
    ui.style_mut().visuals.extreme_bg_color = egui::Color32::from_gray(40);

    let available_size = (ui.available_size() - egui::vec2(0.0, 24.0)).max(egui::Vec2::ZERO);

    egui::Frame::canvas(ui.style()).show(ui, |ui| {
        ui.set_min_size(available_size);
        let canvas_rect = ui.max_rect();

        let (Some(texture), Some(frame)) = (view.texture, view.frame) else {
            show_placeholder(ui);
            return;
        };

        let scale = fit_scale(frame.width, frame.height, canvas_rect.size()) * view.zoom;
        let display_size = egui::vec2(frame.width as f32 * scale, frame.height as f32 * scale);
        let image_rect = egui::Rect::from_center_size(canvas_rect.center(), display_size);

        let response = ui.allocate_rect(canvas_rect, egui::Sense::click_and_drag());
        let hovered = response.hovered();

        let to_image = |pos: egui::Pos2| {
            (
                ((pos.x - image_rect.min.x) / scale) as f64,
                ((pos.y - image_rect.min.y) / scale) as f64,
            )
        };
        let to_screen = |pixel: PixelPos| {
            egui::pos2(
                image_rect.min.x + pixel.x as f32 * scale,
                image_rect.min.y + pixel.y as f32 * scale,
            )
        };

        ui.input(|i| {
            output.events = collect_pointer_events(
                &i.events,
                i.pointer.primary_down(),
                |pos| hovered && canvas_rect.contains(pos),
                to_image,
            );

            if hovered && i.raw_scroll_delta.y != 0.0 {
                let factor = if i.raw_scroll_delta.y > 0.0 {
                    ZOOM_STEP
                } else {
                    1.0 / ZOOM_STEP
                };
                output.zoom = (view.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
            }
        });

        let painter = ui.painter_at(canvas_rect);
        painter.image(
            texture.id(),
            image_rect,
            egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
            egui::Color32::WHITE,
        );

        let point_radius = (view.point_size as f32 * scale / 2.0).max(1.0);
        for item in view.items {
            match *item {
                DrawItem::Point { center, color } => {
                    painter.circle_filled(to_screen(center), point_radius, color32(color));
                }
                DrawItem::Rect {
                    min,
                    max,
                    color,
                    pending,
                } => {
                    let width = if pending { 1.0 } else { 2.0 };
                    painter.rect_stroke(
                        egui::Rect::from_min_max(to_screen(min), to_screen(max)),
                        0.0,
                        egui::Stroke::new(width, color32(color)),
                    );
                }
            }
        }
    });

    // Status line at the bottom
    ui.separator();
    ui.label(view.status);

    output
}

/// Welcome message when no image is loaded.
fn show_placeholder(ui: &mut egui::Ui) {
    ui.centered_and_justified(|ui| {
        ui.vertical_centered(|ui| {
            ui.add_space(20.0);
            ui.heading(
                egui::RichText::new("Simple Image Annotator")
                    .size(32.0)
                    .color(egui::Color32::from_gray(200)),
            );
            ui.add_space(20.0);
            ui.label(
                egui::RichText::new("Open a directory with a classes.txt to begin annotating")
                    .color(egui::Color32::from_gray(180)),
            );
            ui.add_space(10.0);
            ui.label(
                egui::RichText::new("File → Open Directory...")
                    .weak()
                    .color(egui::Color32::from_gray(130)),
            );
        });
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_scale_uses_tighter_side() {
        assert_eq!(fit_scale(200, 100, egui::vec2(100.0, 100.0)), 0.5);
        assert_eq!(fit_scale(100, 400, egui::vec2(100.0, 100.0)), 0.25);
    }

    fn button(x: f32, y: f32, pressed: bool) -> egui::Event {
        egui::Event::PointerButton {
            pos: egui::pos2(x, y),
            button: egui::PointerButton::Primary,
            pressed,
            modifiers: egui::Modifiers::default(),
        }
    }

    fn identity(pos: egui::Pos2) -> (f64, f64) {
        (pos.x as f64, pos.y as f64)
    }

    #[test]
    fn test_drag_within_one_frame_keeps_button_held() {
        let events = vec![
            button(10.0, 10.0, true),
            egui::Event::PointerMoved(egui::pos2(40.0, 30.0)),
            button(40.0, 30.0, false),
        ];
        let collected = collect_pointer_events(&events, false, |_| true, identity);

        assert_eq!(
            collected,
            vec![
                PointerEvent::press(10.0, 10.0),
                PointerEvent::drag_to(40.0, 30.0),
                PointerEvent::release(40.0, 30.0),
            ]
        );
    }

    #[test]
    fn test_moves_without_button_events_use_current_state() {
        let events = vec![egui::Event::PointerMoved(egui::pos2(5.0, 6.0))];
        assert_eq!(
            collect_pointer_events(&events, true, |_| true, identity),
            vec![PointerEvent::drag_to(5.0, 6.0)]
        );
        assert_eq!(
            collect_pointer_events(&events, false, |_| true, identity),
            vec![PointerEvent::hover(5.0, 6.0)]
        );
    }

    #[test]
    fn test_press_off_canvas_is_dropped_but_release_is_kept() {
        let events = vec![
            button(-5.0, 10.0, true),
            egui::Event::PointerMoved(egui::pos2(20.0, 20.0)),
            button(20.0, 20.0, false),
        ];
        let collected = collect_pointer_events(&events, false, |pos| pos.x >= 0.0, identity);

        assert_eq!(
            collected,
            vec![
                PointerEvent::drag_to(20.0, 20.0),
                PointerEvent::release(20.0, 20.0),
            ]
        );
    }
}

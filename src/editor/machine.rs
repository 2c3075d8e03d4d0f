// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Pointer-driven editing of the annotation store.
//!
//! The shell maps device coordinates to image pixels and feeds press, move
//! and release events into [`handle_pointer`]. The handler hit-tests the
//! store, runs the drag lifecycle and applies the resulting mutations.
//!
//! Hit-testing uses a fixed tolerance in image pixels. It does not follow
//! the display zoom, so at high zoom the grab area looks smaller on screen.

use super::state::{Interaction, Mode, SessionState};
use crate::error::{AnnotatorError, IndexKind, Result};
use crate::models::annotation::{Annotation, Corner};
use crate::models::store::AnnotationStore;
use crate::util::geometry::{normalize_pixel, pixel_of, Frame, PixelPos};

/// Default grab distance around keypoints and box corners, in pixels.
pub const DEFAULT_HIT_TOLERANCE: i64 = 5;

/// Asks the user which class a new annotation belongs to.
///
/// The call blocks the current transition until answered. `None` means the
/// user cancelled, which leaves the store untouched.
pub trait ClassPrompt {
    fn prompt_for_class(&mut self, class_names: &[String]) -> Option<usize>;
}

impl<F> ClassPrompt for F
where
    F: FnMut(&[String]) -> Option<usize>,
{
    fn prompt_for_class(&mut self, class_names: &[String]) -> Option<usize> {
        self(class_names)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerPhase {
    Press,
    Move,
    Release,
}

/// A pointer event in image pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub phase: PointerPhase,
    /// Button that changed state. Ignored for moves.
    pub button: PointerButton,
    pub x: f64,
    pub y: f64,
    /// Whether the primary button is held while this event happens.
    pub primary_held: bool,
}

impl PointerEvent {
    pub fn press(x: f64, y: f64) -> Self {
        Self {
            phase: PointerPhase::Press,
            button: PointerButton::Primary,
            x,
            y,
            primary_held: true,
        }
    }

    /// A move with the primary button held.
    pub fn drag_to(x: f64, y: f64) -> Self {
        Self {
            phase: PointerPhase::Move,
            button: PointerButton::Primary,
            x,
            y,
            primary_held: true,
        }
    }

    /// A move with no button held.
    pub fn hover(x: f64, y: f64) -> Self {
        Self {
            primary_held: false,
            ..Self::drag_to(x, y)
        }
    }

    pub fn release(x: f64, y: f64) -> Self {
        Self {
            phase: PointerPhase::Release,
            button: PointerButton::Primary,
            x,
            y,
            primary_held: false,
        }
    }

    pub fn with_button(self, button: PointerButton) -> Self {
        Self { button, ..self }
    }

    fn pixel(&self) -> PixelPos {
        PixelPos::containing(self.x, self.y)
    }
}

/// Everything an event handler needs besides the session state.
pub struct EditContext<'a> {
    pub store: &'a mut AnnotationStore,
    pub frame: Frame,
    pub class_names: &'a [String],
    pub prompt: &'a mut dyn ClassPrompt,
    pub hit_tolerance: i64,
}

impl EditContext<'_> {
    fn ask_class(&mut self) -> Result<Option<usize>> {
        match self.prompt.prompt_for_class(self.class_names) {
            Some(class) if class >= self.class_names.len() => Err(AnnotatorError::Index {
                kind: IndexKind::Class,
                index: class,
                len: self.class_names.len(),
            }),
            answer => Ok(answer),
        }
    }
}

/// Apply one pointer event and return the next session state.
///
/// Errors only arise from contract violations (a stale annotation index or a
/// prompt answering with an unknown class); callers should reset the session
/// when one is returned.
pub fn handle_pointer(
    state: SessionState,
    event: &PointerEvent,
    ctx: &mut EditContext<'_>,
) -> Result<SessionState> {
    match event.phase {
        PointerPhase::Press if event.button == PointerButton::Primary => {
            on_press(state.reset(), event.pixel(), ctx)
        }
        PointerPhase::Move => on_move(state, event, ctx),
        PointerPhase::Release if event.button == PointerButton::Primary => {
            on_release(state, event.pixel(), ctx)
        }
        _ => Ok(state),
    }
}

fn on_press(state: SessionState, pixel: PixelPos, ctx: &mut EditContext<'_>) -> Result<SessionState> {
    match state.mode {
        Mode::Keypoints => {
            if let Some(index) = hit_keypoint(ctx.store, pixel, ctx.frame, ctx.hit_tolerance) {
                log::debug!("Grabbed keypoint {}", index);
                return Ok(state.with_interaction(Interaction::DraggingKeypoint { index }));
            }
            if !ctx.frame.contains(pixel) {
                return Ok(state);
            }
            match ctx.ask_class()? {
                Some(class_index) => {
                    let position = normalize_pixel(pixel, ctx.frame);
                    ctx.store
                        .append(Annotation::keypoint(class_index, position.x, position.y));
                    log::info!(
                        "Added keypoint ({:.4}, {:.4}) of class {}, total: {}",
                        position.x,
                        position.y,
                        class_index,
                        ctx.store.len()
                    );
                }
                None => log::debug!("Keypoint creation cancelled"),
            }
            Ok(state)
        }
        Mode::BoundingBoxes => {
            if let Some((index, corner)) =
                hit_box_corner(ctx.store, pixel, ctx.frame, ctx.hit_tolerance)
            {
                log::debug!("Grabbed {:?} corner of box {}", corner, index);
                return Ok(state.with_interaction(Interaction::DraggingCorner { index, corner }));
            }
            if !ctx.frame.contains(pixel) {
                return Ok(state);
            }
            Ok(state.with_interaction(Interaction::DrawingBox {
                anchor: pixel,
                far_corner: None,
            }))
        }
    }
}

fn on_move(
    mut state: SessionState,
    event: &PointerEvent,
    ctx: &mut EditContext<'_>,
) -> Result<SessionState> {
    let pixel = event.pixel();
    match state.interaction {
        Interaction::DraggingKeypoint { index } => {
            let to = normalize_pixel(pixel, ctx.frame);
            ctx.store.update(index, |annotation| {
                if let Annotation::Keypoint { position, .. } = annotation {
                    *position = to;
                }
            })?;
        }
        Interaction::DraggingCorner { index, corner } => {
            let to = normalize_pixel(pixel, ctx.frame);
            ctx.store
                .update(index, |annotation| annotation.move_corner(corner, to))?;
        }
        Interaction::DrawingBox { anchor, .. } if event.primary_held => {
            state.interaction = Interaction::DrawingBox {
                anchor,
                far_corner: Some(pixel),
            };
        }
        _ => {}
    }
    Ok(state)
}

fn on_release(
    state: SessionState,
    pixel: PixelPos,
    ctx: &mut EditContext<'_>,
) -> Result<SessionState> {
    match state.interaction {
        Interaction::Idle => return Ok(state),
        Interaction::DraggingKeypoint { index } => {
            if !ctx.frame.contains(pixel) {
                ctx.store.remove(index)?;
                log::info!(
                    "Dropped keypoint {} outside the image, total: {}",
                    index,
                    ctx.store.len()
                );
            }
        }
        Interaction::DraggingCorner { index, .. } => {
            if !box_survives_release(ctx.store.get(index)?, ctx.frame) {
                ctx.store.remove(index)?;
                log::info!(
                    "Removed degenerate or out-of-bounds box {}, total: {}",
                    index,
                    ctx.store.len()
                );
            }
        }
        Interaction::DrawingBox { anchor, far_corner } => {
            if far_corner.is_none() {
                log::debug!("Release without drag, no new box");
            } else {
                match ctx.ask_class()? {
                    Some(class_index) => {
                        let top_left = normalize_pixel(anchor, ctx.frame);
                        let bottom_right = normalize_pixel(pixel, ctx.frame);
                        ctx.store.append(Annotation::bounding_box(
                            class_index,
                            top_left,
                            bottom_right,
                        ));
                        log::info!(
                            "Added box of class {}, total: {}",
                            class_index,
                            ctx.store.len()
                        );
                    }
                    None => log::debug!("Box creation cancelled"),
                }
            }
        }
    }
    Ok(state.reset())
}

/// Index of the first keypoint within tolerance of `pixel`.
pub fn hit_keypoint(
    store: &AnnotationStore,
    pixel: PixelPos,
    frame: Frame,
    tolerance: i64,
) -> Option<usize> {
    store
        .all()
        .iter()
        .enumerate()
        .find_map(|(index, annotation)| match annotation {
            Annotation::Keypoint { position, .. }
                if pixel_of(position, frame).is_near(pixel, tolerance) =>
            {
                Some(index)
            }
            _ => None,
        })
}

/// First box corner within tolerance of `pixel`, boxes in store order and
/// corners in [`Corner::HIT_ORDER`].
pub fn hit_box_corner(
    store: &AnnotationStore,
    pixel: PixelPos,
    frame: Frame,
    tolerance: i64,
) -> Option<(usize, Corner)> {
    store
        .all()
        .iter()
        .enumerate()
        .find_map(|(index, annotation)| {
            Corner::HIT_ORDER.iter().find_map(|&corner| {
                let point = annotation.corner(corner)?;
                pixel_of(&point, frame)
                    .is_near(pixel, tolerance)
                    .then_some((index, corner))
            })
        })
}

/// A box survives a corner drag when it is neither inverted nor empty and
/// both stored corners lie inside the frame.
fn box_survives_release(annotation: &Annotation, frame: Frame) -> bool {
    let (Some(top_left), Some(bottom_right)) = (
        annotation.corner(Corner::TopLeft),
        annotation.corner(Corner::BottomRight),
    ) else {
        return true;
    };
    let tl = pixel_of(&top_left, frame);
    let br = pixel_of(&bottom_right, frame);
    tl.x < br.x && tl.y < br.y && frame.contains(tl) && frame.contains(br)
}

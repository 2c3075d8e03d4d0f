// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Render list for the current image.
//!
//! Everything here is in image pixel space; the shell scales it to the
//! screen. Stored annotations come first, in store order, followed by the
//! box being drawn (if any).

use super::state::SessionState;
use crate::error::Result;
use crate::models::annotation::Annotation;
use crate::models::classes::{ClassRegistry, Color};
use crate::models::store::AnnotationStore;
use crate::util::geometry::{pixel_of, Frame, PixelPos};

/// Color of the rubber-band rectangle while a new box is drawn.
pub const PENDING_BOX_COLOR: Color = Color::GREEN;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawItem {
    Point {
        center: PixelPos,
        color: Color,
    },
    /// `min`/`max` are ordered even when the stored box is inverted.
    Rect {
        min: PixelPos,
        max: PixelPos,
        color: Color,
        pending: bool,
    },
}

fn ordered_rect(a: PixelPos, b: PixelPos) -> (PixelPos, PixelPos) {
    (
        PixelPos::new(a.x.min(b.x), a.y.min(b.y)),
        PixelPos::new(a.x.max(b.x), a.y.max(b.y)),
    )
}

/// Build the draw list. Fails if an annotation refers to a class the
/// registry does not know.
pub fn draw_list(
    store: &AnnotationStore,
    classes: &ClassRegistry,
    frame: Frame,
    session: &SessionState,
) -> Result<Vec<DrawItem>> {
    let mut items = Vec::with_capacity(store.len() + 1);
    for annotation in store.all() {
        let color = classes.color_of(annotation.class_index())?;
        items.push(match annotation {
            Annotation::Keypoint { position, .. } => DrawItem::Point {
                center: pixel_of(position, frame),
                color,
            },
            Annotation::BoundingBox {
                top_left,
                bottom_right,
                ..
            } => {
                let (min, max) =
                    ordered_rect(pixel_of(top_left, frame), pixel_of(bottom_right, frame));
                DrawItem::Rect {
                    min,
                    max,
                    color,
                    pending: false,
                }
            }
        });
    }

    if let Some((anchor, far)) = session.pending_box() {
        let (min, max) = ordered_rect(anchor, far);
        items.push(DrawItem::Rect {
            min,
            max,
            color: PENDING_BOX_COLOR,
            pending: true,
        });
    }
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::state::{Interaction, Mode};
    use crate::error::AnnotatorError;
    use crate::models::annotation::Point;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn classes() -> ClassRegistry {
        let mut rng = StdRng::seed_from_u64(1);
        ClassRegistry::with_rng(vec!["a".into(), "b".into()], &mut rng)
    }

    #[test]
    fn test_draw_list_orders_inverted_boxes() {
        let classes = classes();
        let mut store = AnnotationStore::new();
        store.append(Annotation::keypoint(0, 0.5, 0.5));
        store.append(Annotation::bounding_box(
            1,
            Point::new(0.5, 0.5),
            Point::new(0.25, 0.25),
        ));
        let frame = Frame::new(100, 100).unwrap();
        let items = draw_list(&store, &classes, frame, &SessionState::default()).unwrap();

        assert_eq!(
            items,
            vec![
                DrawItem::Point {
                    center: PixelPos::new(50, 50),
                    color: classes.color_of(0).unwrap(),
                },
                DrawItem::Rect {
                    min: PixelPos::new(25, 25),
                    max: PixelPos::new(50, 50),
                    color: classes.color_of(1).unwrap(),
                    pending: false,
                },
            ]
        );
    }

    #[test]
    fn test_pending_box_is_drawn_last() {
        let classes = classes();
        let store = AnnotationStore::new();
        let session = SessionState {
            mode: Mode::BoundingBoxes,
            interaction: Interaction::DrawingBox {
                anchor: PixelPos::new(30, 40),
                far_corner: Some(PixelPos::new(10, 5)),
            },
        };
        let items = draw_list(&store, &classes, Frame::new(64, 64).unwrap(), &session).unwrap();
        assert_eq!(
            items,
            vec![DrawItem::Rect {
                min: PixelPos::new(10, 5),
                max: PixelPos::new(30, 40),
                color: PENDING_BOX_COLOR,
                pending: true,
            }]
        );
    }

    #[test]
    fn test_unknown_class_fails() {
        let classes = classes();
        let mut store = AnnotationStore::new();
        store.append(Annotation::keypoint(4, 0.5, 0.5));
        let result = draw_list(
            &store,
            &classes,
            Frame::new(10, 10).unwrap(),
            &SessionState::default(),
        );
        assert!(matches!(result, Err(AnnotatorError::Index { index: 4, .. })));
    }
}

// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Annotation data structures.
//!
//! This module defines the two annotation kinds (keypoints and bounding
//! boxes) together with the box corner tags used while dragging.

/// A 2D point with normalized coordinates (0.0 to 1.0 inside the image).
///
/// Values outside that range are legal: a drag may carry a point past the
/// image border before the release decides whether it survives.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// One of the four corners of a bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corner {
    TopLeft,
    BottomRight,
    TopRight,
    BottomLeft,
}

impl Corner {
    /// Hit-test order for the corners of a single box.
    pub const HIT_ORDER: [Corner; 4] = [
        Corner::TopLeft,
        Corner::BottomRight,
        Corner::TopRight,
        Corner::BottomLeft,
    ];
}

/// The two annotation kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnotationType {
    Keypoint,
    BoundingBox,
}

/// A single annotation tagged with a zero-based class index.
#[derive(Debug, Clone, PartialEq)]
pub enum Annotation {
    Keypoint {
        class_index: usize,
        position: Point,
    },
    BoundingBox {
        class_index: usize,
        top_left: Point,
        bottom_right: Point,
    },
}

impl Annotation {
    /// Create a keypoint annotation.
    pub fn keypoint(class_index: usize, x: f64, y: f64) -> Self {
        Annotation::Keypoint {
            class_index,
            position: Point::new(x, y),
        }
    }

    /// Create a bounding box annotation from its two stored corners.
    ///
    /// The corners are kept as given; no min/max reordering happens here.
    pub fn bounding_box(class_index: usize, top_left: Point, bottom_right: Point) -> Self {
        Annotation::BoundingBox {
            class_index,
            top_left,
            bottom_right,
        }
    }

    pub fn class_index(&self) -> usize {
        match self {
            Annotation::Keypoint { class_index, .. } => *class_index,
            Annotation::BoundingBox { class_index, .. } => *class_index,
        }
    }

    pub fn annotation_type(&self) -> AnnotationType {
        match self {
            Annotation::Keypoint { .. } => AnnotationType::Keypoint,
            Annotation::BoundingBox { .. } => AnnotationType::BoundingBox,
        }
    }

    /// Move one corner of a bounding box, leaving the opposite corner's
    /// fields untouched. Does nothing for keypoints.
    ///
    /// The derived corners share fields with the stored ones: top-right owns
    /// `top_left.y` and `bottom_right.x`, bottom-left owns `top_left.x` and
    /// `bottom_right.y`.
    pub fn move_corner(&mut self, corner: Corner, to: Point) {
        if let Annotation::BoundingBox {
            top_left,
            bottom_right,
            ..
        } = self
        {
            match corner {
                Corner::TopLeft => *top_left = to,
                Corner::BottomRight => *bottom_right = to,
                Corner::TopRight => {
                    top_left.y = to.y;
                    bottom_right.x = to.x;
                }
                Corner::BottomLeft => {
                    top_left.x = to.x;
                    bottom_right.y = to.y;
                }
            }
        }
    }

    /// Normalized position of a box corner, `None` for keypoints.
    pub fn corner(&self, corner: Corner) -> Option<Point> {
        match self {
            Annotation::Keypoint { .. } => None,
            Annotation::BoundingBox {
                top_left,
                bottom_right,
                ..
            } => Some(match corner {
                Corner::TopLeft => *top_left,
                Corner::BottomRight => *bottom_right,
                Corner::TopRight => Point::new(bottom_right.x, top_left.y),
                Corner::BottomLeft => Point::new(top_left.x, bottom_right.y),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_box() -> Annotation {
        Annotation::bounding_box(1, Point::new(0.1, 0.2), Point::new(0.5, 0.6))
    }

    #[test]
    fn test_derived_corners() {
        let bbox = sample_box();
        assert_eq!(bbox.corner(Corner::TopRight), Some(Point::new(0.5, 0.2)));
        assert_eq!(bbox.corner(Corner::BottomLeft), Some(Point::new(0.1, 0.6)));
        assert_eq!(Annotation::keypoint(0, 0.3, 0.3).corner(Corner::TopLeft), None);
    }

    #[test]
    fn test_move_top_right_keeps_opposite_fields() {
        let mut bbox = sample_box();
        bbox.move_corner(Corner::TopRight, Point::new(0.9, 0.05));
        assert_eq!(
            bbox,
            Annotation::bounding_box(1, Point::new(0.1, 0.05), Point::new(0.9, 0.6))
        );
    }

    #[test]
    fn test_move_bottom_left_keeps_opposite_fields() {
        let mut bbox = sample_box();
        bbox.move_corner(Corner::BottomLeft, Point::new(0.0, 0.7));
        assert_eq!(
            bbox,
            Annotation::bounding_box(1, Point::new(0.0, 0.2), Point::new(0.5, 0.7))
        );
    }

    #[test]
    fn test_move_corner_ignores_keypoints() {
        let mut keypoint = Annotation::keypoint(2, 0.4, 0.4);
        keypoint.move_corner(Corner::TopLeft, Point::new(0.0, 0.0));
        assert_eq!(keypoint, Annotation::keypoint(2, 0.4, 0.4));
        assert_eq!(keypoint.annotation_type(), AnnotationType::Keypoint);
        assert_eq!(keypoint.class_index(), 2);
    }
}

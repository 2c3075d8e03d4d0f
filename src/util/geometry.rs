// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Geometric utility functions.
//!
//! This module provides utilities for coordinate transformations between
//! pixel coordinates and normalized coordinates, relative to the frame of
//! the currently displayed (resized) image.

use crate::models::annotation::Point;

/// Number of decimal digits kept for normalized coordinates.
pub const COORD_DECIMALS: i32 = 4;

/// Dimensions of the displayed raster. Both sides are non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
}

impl Frame {
    /// Create a frame, rejecting empty dimensions.
    pub fn new(width: u32, height: u32) -> Option<Self> {
        (width > 0 && height > 0).then_some(Self { width, height })
    }

    /// Whether a pixel lies inside `[0, width) x [0, height)`.
    pub fn contains(&self, pixel: PixelPos) -> bool {
        pixel.x >= 0
            && pixel.y >= 0
            && pixel.x < i64::from(self.width)
            && pixel.y < i64::from(self.height)
    }
}

/// Integer pixel position in image space. May lie outside the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelPos {
    pub x: i64,
    pub y: i64,
}

impl PixelPos {
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// The pixel containing a floating point image-space position.
    pub fn containing(x: f64, y: f64) -> Self {
        Self {
            x: x.floor() as i64,
            y: y.floor() as i64,
        }
    }

    /// Whether `other` is strictly closer than `tolerance` on both axes.
    pub fn is_near(&self, other: PixelPos, tolerance: i64) -> bool {
        (self.x - other.x).abs() < tolerance && (self.y - other.y).abs() < tolerance
    }
}

/// Convert pixel coordinates to normalized coordinates (0.0 to 1.0).
pub fn normalize_coordinates(pixel_x: f64, pixel_y: f64, width: u32, height: u32) -> Point {
    Point {
        x: pixel_x / width as f64,
        y: pixel_y / height as f64,
    }
}

/// Convert normalized coordinates to pixel coordinates.
pub fn denormalize_coordinates(point: &Point, width: u32, height: u32) -> (f64, f64) {
    (point.x * width as f64, point.y * height as f64)
}

/// Normalize an integer pixel and round it to [`COORD_DECIMALS`] digits.
pub fn normalize_pixel(pixel: PixelPos, frame: Frame) -> Point {
    let point = normalize_coordinates(pixel.x as f64, pixel.y as f64, frame.width, frame.height);
    Point::new(quantize(point.x), quantize(point.y))
}

/// The pixel a stored normalized point currently falls on.
pub fn pixel_of(point: &Point, frame: Frame) -> PixelPos {
    let (x, y) = denormalize_coordinates(point, frame.width, frame.height);
    PixelPos::containing(x, y)
}

/// Round a normalized value to [`COORD_DECIMALS`] digits.
pub fn quantize(value: f64) -> f64 {
    let scale = 10f64.powi(COORD_DECIMALS);
    (value * scale).round() / scale
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_denormalize_roundtrip() {
        let width = 1920;
        let height = 1080;
        let pixel_x = 960.0;
        let pixel_y = 540.0;

        let normalized = normalize_coordinates(pixel_x, pixel_y, width, height);
        let (denorm_x, denorm_y) = denormalize_coordinates(&normalized, width, height);

        assert!((denorm_x - pixel_x).abs() < 0.0001);
        assert!((denorm_y - pixel_y).abs() < 0.0001);
    }

    #[test]
    fn test_normalize_corners() {
        let width = 1920;
        let height = 1080;

        // Top-left corner
        let tl = normalize_coordinates(0.0, 0.0, width, height);
        assert_eq!(tl.x, 0.0);
        assert_eq!(tl.y, 0.0);

        // Bottom-right corner
        let br = normalize_coordinates(1920.0, 1080.0, width, height);
        assert_eq!(br.x, 1.0);
        assert_eq!(br.y, 1.0);
    }

    #[test]
    fn test_frame_rejects_empty() {
        assert!(Frame::new(0, 10).is_none());
        assert!(Frame::new(10, 0).is_none());
        assert!(Frame::new(1, 1).is_some());
    }

    #[test]
    fn test_frame_contains_is_half_open() {
        let frame = Frame::new(100, 50).unwrap();
        assert!(frame.contains(PixelPos::new(0, 0)));
        assert!(frame.contains(PixelPos::new(99, 49)));
        assert!(!frame.contains(PixelPos::new(100, 10)));
        assert!(!frame.contains(PixelPos::new(10, 50)));
        assert!(!frame.contains(PixelPos::new(-1, 10)));
    }

    #[test]
    fn test_pixel_containing_floors_negative_positions() {
        assert_eq!(PixelPos::containing(-0.5, 3.9), PixelPos::new(-1, 3));
    }

    #[test]
    fn test_quantized_pixel_survives_text_roundtrip() {
        let frame = Frame::new(640, 1920).unwrap();
        let point = normalize_pixel(PixelPos::new(333, 1001), frame);
        let text = format!("{:.4}", point.x);
        assert_eq!(text.parse::<f64>().unwrap(), point.x);
        assert_eq!(point.y, 0.5214);
    }

    #[test]
    fn test_pixel_of_matches_press_location() {
        let frame = Frame::new(200, 100).unwrap();
        let point = normalize_pixel(PixelPos::new(57, 81), frame);
        assert!(pixel_of(&point, frame).is_near(PixelPos::new(57, 81), 2));
    }
}

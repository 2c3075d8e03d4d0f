// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Aspect-preserving target dimensions for displayed images.

/// Computes the size an image is scaled to so that it fits a target box.
///
/// The side that overflows its target the most is scaled to match it
/// exactly; the other side follows with the same ratio. Images smaller than
/// the target are scaled up by the same rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resizer {
    target_height: u32,
    target_width: u32,
}

impl Resizer {
    pub fn new(target_height: u32, target_width: u32) -> Self {
        Self {
            target_height,
            target_width,
        }
    }

    fn resize_factor(&self, width: u32, height: u32) -> f64 {
        let height_ratio = height as f64 / self.target_height as f64;
        let width_ratio = width as f64 / self.target_width as f64;
        height_ratio.max(width_ratio)
    }

    /// Scaled `(height, width)` for an image of `width x height` pixels.
    pub fn scaled_dims(&self, width: u32, height: u32) -> (u32, u32) {
        let ratio = self.resize_factor(width, height);
        (
            (height as f64 / ratio).round() as u32,
            (width as f64 / ratio).round() as u32,
        )
    }
}

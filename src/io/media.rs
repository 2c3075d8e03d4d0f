// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Media file loading.
//!
//! This module discovers images in a directory and decodes them, scaled to
//! the display target, into RGBA buffers suitable for display in egui.

use crate::error::Result;
use crate::util::geometry::Frame;
use crate::util::resize::Resizer;
use image::imageops::FilterType;
use std::path::{Path, PathBuf};

/// A decoded image at display size.
#[derive(Debug, Clone)]
pub struct LoadedImage {
    pub width: u32,
    pub height: u32,
    /// RGBA8, row-major.
    pub pixels: Vec<u8>,
    /// Size of the file before resizing.
    pub original_size: (u32, u32),
}

impl LoadedImage {
    /// The frame normalized coordinates refer to.
    pub fn frame(&self) -> Option<Frame> {
        Frame::new(self.width, self.height)
    }
}

/// List image files in `dir` whose names end with one of `extensions`.
///
/// The order is whatever the file system reports; it is not sorted.
pub fn discover_images(dir: &Path, extensions: &[String]) -> Result<Vec<PathBuf>> {
    let mut images = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            log::warn!("Skipping non UTF-8 file name {:?}", entry.path());
            continue;
        };
        if extensions.iter().any(|ext| name.ends_with(ext.as_str())) {
            images.push(entry.path());
        }
    }
    log::debug!("Found {} images in {}", images.len(), dir.display());
    Ok(images)
}

/// Decode an image and scale it to the resizer's target dimensions.
pub fn load_image(path: &Path, resizer: &Resizer) -> Result<LoadedImage> {
    let img = image::open(path)?;
    let original_size = (img.width(), img.height());
    let (height, width) = resizer.scaled_dims(img.width(), img.height());
    let (width, height) = (width.max(1), height.max(1));

    let rgba = img
        .resize_exact(width, height, FilterType::Triangle)
        .to_rgba8();
    log::info!(
        "Loaded image {} ({}x{} -> {}x{})",
        path.display(),
        original_size.0,
        original_size.1,
        width,
        height
    );

    Ok(LoadedImage {
        width,
        height,
        pixels: rgba.into_raw(),
        original_size,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnnotatorConfig;
    use tempfile::tempdir;

    #[test]
    fn test_discover_images_filters_extensions() {
        let dir = tempdir().expect("Failed to create temp dir");
        for name in ["a.jpg", "b.png", "c.txt", "classes.txt", "d.jpeg", "e.PNG"] {
            std::fs::write(dir.path().join(name), b"").unwrap();
        }
        std::fs::create_dir(dir.path().join("sub.png")).unwrap();

        let extensions = AnnotatorConfig::default().image_extensions;
        let mut names: Vec<String> = discover_images(dir.path(), &extensions)
            .unwrap()
            .iter()
            .filter_map(|p| p.file_name()?.to_str().map(String::from))
            .collect();
        names.sort();
        assert_eq!(names, vec!["a.jpg", "b.png", "d.jpeg"]);
    }

    #[test]
    fn test_load_image_resizes_to_target() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("tall.png");
        image::RgbImage::new(10, 30).save(&path).unwrap();

        let loaded = load_image(&path, &Resizer::new(60, 60)).unwrap();
        assert_eq!((loaded.width, loaded.height), (20, 60));
        assert_eq!(loaded.original_size, (10, 30));
        assert_eq!(loaded.pixels.len(), 20 * 60 * 4);
        assert_eq!(loaded.frame(), Frame::new(20, 60));
    }

    #[test]
    fn test_load_missing_image_fails() {
        let dir = tempdir().expect("Failed to create temp dir");
        assert!(load_image(&dir.path().join("nope.png"), &Resizer::new(10, 10)).is_err());
    }
}

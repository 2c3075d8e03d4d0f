// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Directory session and per-image document state.
//!
//! A directory session owns what is shared by all images of one directory
//! (class list, colors, image list). An image document owns what belongs to
//! one image (frame, annotations, interaction state) and is replaced on every
//! navigation.

use super::annotation::Annotation;
use super::classes::ClassRegistry;
use super::store::AnnotationStore;
use crate::config::AnnotatorConfig;
use crate::editor::state::{Mode, SessionState};
use crate::error::Result;
use crate::io::{media, serialization};
use crate::util::geometry::Frame;
use std::path::{Path, PathBuf};

/// State shared by every image of an opened directory.
#[derive(Debug, Clone)]
pub struct DirectorySession {
    pub directory: PathBuf,
    pub classes: ClassRegistry,
    pub images: Vec<PathBuf>,
    current: Option<usize>,
}

impl DirectorySession {
    /// Open a directory: read its class list, assign colors and list its
    /// images. A missing or empty class list makes the whole open fail.
    pub fn open(directory: &Path, config: &AnnotatorConfig) -> Result<Self> {
        let names = serialization::read_class_list(&directory.join(&config.class_file))?;
        let images = media::discover_images(directory, &config.image_extensions)?;
        log::info!(
            "Opened {} with {} classes and {} images",
            directory.display(),
            names.len(),
            images.len()
        );
        Ok(Self::from_parts(
            directory.to_path_buf(),
            ClassRegistry::new(names),
            images,
        ))
    }

    pub fn from_parts(directory: PathBuf, classes: ClassRegistry, images: Vec<PathBuf>) -> Self {
        let current = (!images.is_empty()).then_some(0);
        Self {
            directory,
            classes,
            images,
            current,
        }
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current_image(&self) -> Option<&Path> {
        self.current.map(|i| self.images[i].as_path())
    }

    /// Index of the next image, `None` at the end of the list.
    pub fn next_index(&self) -> Option<usize> {
        self.current
            .map(|i| i + 1)
            .filter(|&i| i < self.images.len())
    }

    /// Index of the previous image, `None` at the start of the list.
    pub fn prev_index(&self) -> Option<usize> {
        self.current.and_then(|i| i.checked_sub(1))
    }

    /// Make `index` the current image. Returns `false` when out of range.
    pub fn go_to(&mut self, index: usize) -> bool {
        if index < self.images.len() {
            self.current = Some(index);
            true
        } else {
            false
        }
    }
}

/// One loaded image and its annotations.
#[derive(Debug, Clone)]
pub struct ImageDocument {
    pub image_path: PathBuf,
    pub frame: Frame,
    pub store: AnnotationStore,
    pub session: SessionState,
}

impl ImageDocument {
    pub fn new(image_path: PathBuf, frame: Frame, annotations: Vec<Annotation>, mode: Mode) -> Self {
        Self {
            image_path,
            frame,
            store: AnnotationStore::from_annotations(annotations),
            session: SessionState::new(mode),
        }
    }

    pub fn annotation_path(&self) -> PathBuf {
        serialization::annotation_path_for(&self.image_path)
    }

    /// Write all annotations to `path`, replacing its content, and mark the
    /// store clean.
    pub fn save_to(&mut self, path: &Path) -> Result<()> {
        serialization::write_annotation_file(path, self.store.all())?;
        self.store.mark_saved();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnnotatorError;
    use tempfile::tempdir;

    fn session_with(images: usize) -> DirectorySession {
        let paths = (0..images)
            .map(|i| PathBuf::from(format!("/data/{i}.png")))
            .collect();
        DirectorySession::from_parts(
            PathBuf::from("/data"),
            ClassRegistry::new(vec!["a".into()]),
            paths,
        )
    }

    #[test]
    fn test_navigation_does_not_wrap() {
        let mut session = session_with(3);
        assert_eq!(session.current_index(), Some(0));
        assert_eq!(session.prev_index(), None);
        assert_eq!(session.next_index(), Some(1));

        assert!(session.go_to(2));
        assert_eq!(session.next_index(), None);
        assert_eq!(session.prev_index(), Some(1));
        assert!(!session.go_to(3));
        assert_eq!(session.current_image(), Some(Path::new("/data/2.png")));
    }

    #[test]
    fn test_empty_directory_has_no_current_image() {
        let session = session_with(0);
        assert_eq!(session.current_image(), None);
        assert_eq!(session.next_index(), None);
        assert_eq!(session.prev_index(), None);
    }

    #[test]
    fn test_open_requires_class_list() {
        let dir = tempdir().expect("Failed to create temp dir");
        std::fs::write(dir.path().join("a.png"), b"").unwrap();
        let result = DirectorySession::open(dir.path(), &AnnotatorConfig::default());
        assert!(matches!(result, Err(AnnotatorError::MissingFile(_))));

        std::fs::write(dir.path().join("classes.txt"), "cat\ndog\n").unwrap();
        let session = DirectorySession::open(dir.path(), &AnnotatorConfig::default()).unwrap();
        assert_eq!(session.classes.names(), &["cat", "dog"]);
        assert_eq!(session.images.len(), 1);
    }

    #[test]
    fn test_save_overwrites_and_cleans() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("img.txt");
        std::fs::write(&path, "stale content that is no longer valid\n").unwrap();

        let mut doc = ImageDocument::new(
            dir.path().join("img.png"),
            Frame::new(10, 10).unwrap(),
            Vec::new(),
            Mode::Keypoints,
        );
        doc.store.append(Annotation::keypoint(0, 0.5, 0.5));
        assert!(doc.store.is_dirty());

        doc.save_to(&doc.annotation_path()).unwrap();
        assert!(!doc.store.is_dirty());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "0, 0.5000, 0.5000\n");
    }
}

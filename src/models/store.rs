// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Ordered annotation storage for the current image.
//!
//! Insertion order is meaningful: it is the display order, the save order,
//! and the index used for editing and deletion. Removing an entry shifts all
//! later indices down by one.

use super::annotation::Annotation;
use crate::error::{AnnotatorError, IndexKind, Result};
use crate::io::serialization;

/// Annotations of one image plus an "unsaved changes" flag.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnnotationStore {
    annotations: Vec<Annotation>,
    dirty: bool,
}

impl AnnotationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from already parsed annotations. The result is clean.
    pub fn from_annotations(annotations: Vec<Annotation>) -> Self {
        Self {
            annotations,
            dirty: false,
        }
    }

    /// Parse annotation file content. Either every line parses and a clean
    /// store is returned, or nothing is.
    pub fn load_from_text(text: &str, class_count: usize) -> Result<Self> {
        serialization::parse_annotations(text, class_count).map(Self::from_annotations)
    }

    /// Serialize in store order.
    pub fn to_text(&self) -> String {
        serialization::format_annotations(&self.annotations)
    }

    pub fn append(&mut self, annotation: Annotation) {
        self.annotations.push(annotation);
        self.dirty = true;
    }

    pub fn get(&self, index: usize) -> Result<&Annotation> {
        self.annotations
            .get(index)
            .ok_or_else(|| self.out_of_range(index))
    }

    pub fn set(&mut self, index: usize, annotation: Annotation) -> Result<()> {
        let len = self.annotations.len();
        let slot = self.annotations.get_mut(index).ok_or(AnnotatorError::Index {
            kind: IndexKind::Annotation,
            index,
            len,
        })?;
        *slot = annotation;
        self.dirty = true;
        Ok(())
    }

    /// Mutate an annotation in place. Marks the store dirty.
    pub fn update<F>(&mut self, index: usize, f: F) -> Result<()>
    where
        F: FnOnce(&mut Annotation),
    {
        let len = self.annotations.len();
        let slot = self.annotations.get_mut(index).ok_or(AnnotatorError::Index {
            kind: IndexKind::Annotation,
            index,
            len,
        })?;
        f(slot);
        self.dirty = true;
        Ok(())
    }

    pub fn remove(&mut self, index: usize) -> Result<Annotation> {
        if index >= self.annotations.len() {
            return Err(self.out_of_range(index));
        }
        self.dirty = true;
        Ok(self.annotations.remove(index))
    }

    pub fn all(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Clear the dirty flag after the content was persisted.
    pub fn mark_saved(&mut self) {
        self.dirty = false;
    }

    fn out_of_range(&self, index: usize) -> AnnotatorError {
        AnnotatorError::Index {
            kind: IndexKind::Annotation,
            index,
            len: self.annotations.len(),
        }
    }
}

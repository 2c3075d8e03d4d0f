// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Error types for the annotation core.

use std::path::PathBuf;
use thiserror::Error;

/// What kind of index went out of range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexKind {
    Annotation,
    Class,
}

impl std::fmt::Display for IndexKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IndexKind::Annotation => write!(f, "annotation"),
            IndexKind::Class => write!(f, "class"),
        }
    }
}

#[derive(Error, Debug)]
pub enum AnnotatorError {
    /// Malformed annotation text. `line` is 1-based.
    #[error("parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    /// Out-of-range class or annotation index. This is a contract violation
    /// by the caller, not a user error.
    #[error("{kind} index {index} out of range (len {len})")]
    Index {
        kind: IndexKind,
        index: usize,
        len: usize,
    },

    #[error("file not found: {}", .0.display())]
    MissingFile(PathBuf),

    #[error("class list is empty: {}", .0.display())]
    EmptyClassList(PathBuf),

    #[error("invalid color: {0}")]
    InvalidColor(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

impl AnnotatorError {
    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        AnnotatorError::Parse {
            line,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AnnotatorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AnnotatorError::parse(3, "expected 3 or 5 fields, found 4");
        assert_eq!(
            err.to_string(),
            "parse error on line 3: expected 3 or 5 fields, found 4"
        );

        let err = AnnotatorError::Index {
            kind: IndexKind::Class,
            index: 7,
            len: 2,
        };
        assert_eq!(err.to_string(), "class index 7 out of range (len 2)");

        let err = AnnotatorError::MissingFile(PathBuf::from("data/classes.txt"));
        assert_eq!(err.to_string(), "file not found: data/classes.txt");
    }
}

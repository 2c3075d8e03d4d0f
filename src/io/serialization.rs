// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Annotation text serialization and deserialization.
//!
//! Annotations are stored one per line, fields separated by commas:
//!
//! ```text
//! <class>, <x>, <y>                     keypoint
//! <class>, <tl_x>, <tl_y>, <br_x>, <br_y>   bounding box
//! ```
//!
//! The field count alone tells the two kinds apart. Coordinates are written
//! with four decimals and read back with any float syntax.

use crate::error::{AnnotatorError, Result};
use crate::models::annotation::{Annotation, Point};
use std::path::{Path, PathBuf};

/// Separator written between fields.
pub const FIELD_SEPARATOR: &str = ", ";

/// Format a single annotation as a text line (without newline).
pub fn format_line(annotation: &Annotation) -> String {
    match annotation {
        Annotation::Keypoint {
            class_index,
            position,
        } => format!(
            "{class_index}{FIELD_SEPARATOR}{:.4}{FIELD_SEPARATOR}{:.4}",
            position.x, position.y
        ),
        Annotation::BoundingBox {
            class_index,
            top_left,
            bottom_right,
        } => format!(
            "{class_index}{sep}{:.4}{sep}{:.4}{sep}{:.4}{sep}{:.4}",
            top_left.x,
            top_left.y,
            bottom_right.x,
            bottom_right.y,
            sep = FIELD_SEPARATOR
        ),
    }
}

/// Parse a single annotation line. `line_number` is 1-based and only used in
/// error messages.
pub fn parse_line(line: &str, line_number: usize, class_count: usize) -> Result<Annotation> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();

    let class_index: usize = fields[0].parse().map_err(|_| {
        AnnotatorError::parse(line_number, format!("invalid class index {:?}", fields[0]))
    })?;
    if class_index >= class_count {
        return Err(AnnotatorError::parse(
            line_number,
            format!("class index {class_index} out of range ({class_count} classes)"),
        ));
    }

    let coord = |i: usize| -> Result<f64> {
        fields[i].parse::<f64>().map_err(|_| {
            AnnotatorError::parse(line_number, format!("invalid coordinate {:?}", fields[i]))
        })
    };

    match fields.len() {
        3 => Ok(Annotation::Keypoint {
            class_index,
            position: Point::new(coord(1)?, coord(2)?),
        }),
        5 => Ok(Annotation::BoundingBox {
            class_index,
            top_left: Point::new(coord(1)?, coord(2)?),
            bottom_right: Point::new(coord(3)?, coord(4)?),
        }),
        n => Err(AnnotatorError::parse(
            line_number,
            format!("expected 3 or 5 fields, found {n}"),
        )),
    }
}

/// Parse a whole annotation file. Fails on the first malformed line without
/// returning any partial result. Whitespace-only lines are skipped.
pub fn parse_annotations(text: &str, class_count: usize) -> Result<Vec<Annotation>> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| parse_line(line, i + 1, class_count))
        .collect()
}

/// Format annotations as file content, one line each, newline-terminated.
pub fn format_annotations(annotations: &[Annotation]) -> String {
    annotations
        .iter()
        .map(|annotation| format_line(annotation) + "\n")
        .collect()
}

/// Annotation file that belongs to an image: `<stem>.txt` in the same
/// directory, where the stem ends at the first `.` of the file name.
pub fn annotation_path_for(image_path: &Path) -> PathBuf {
    let file_name = image_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem = file_name.split('.').next().unwrap_or_default();
    image_path.with_file_name(format!("{stem}.txt"))
}

/// Read the annotations stored for an image. A missing file is not an error:
/// the image simply has no annotations yet.
pub fn read_annotation_file(path: &Path, class_count: usize) -> Result<Vec<Annotation>> {
    if !path.exists() {
        log::debug!("No annotation file at {}", path.display());
        return Ok(Vec::new());
    }
    let text = std::fs::read_to_string(path)?;
    let annotations = parse_annotations(&text, class_count)?;
    log::info!(
        "Read {} annotations from {}",
        annotations.len(),
        path.display()
    );
    Ok(annotations)
}

/// Overwrite an annotation file with the given annotations.
pub fn write_annotation_file(path: &Path, annotations: &[Annotation]) -> Result<()> {
    std::fs::write(path, format_annotations(annotations))?;
    log::info!(
        "Wrote {} annotations to {}",
        annotations.len(),
        path.display()
    );
    Ok(())
}

/// Read the class list: one class name per line, index = line number.
///
/// Line endings and trailing whitespace are stripped. Trailing blank lines
/// are dropped; blank lines in between keep their index.
pub fn read_class_list(path: &Path) -> Result<Vec<String>> {
    if !path.exists() {
        return Err(AnnotatorError::MissingFile(path.to_path_buf()));
    }
    let text = std::fs::read_to_string(path)?;
    let mut names: Vec<String> = text.lines().map(|line| line.trim_end().to_string()).collect();
    while names.last().is_some_and(|name| name.is_empty()) {
        names.pop();
    }
    if names.is_empty() {
        return Err(AnnotatorError::EmptyClassList(path.to_path_buf()));
    }
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_format_keypoint_line() {
        let line = format_line(&Annotation::keypoint(2, 0.5, 0.12346));
        assert_eq!(line, "2, 0.5000, 0.1235");
    }

    #[test]
    fn test_format_box_line() {
        let line = format_line(&Annotation::bounding_box(
            0,
            Point::new(0.1, 0.2),
            Point::new(0.3, 0.4),
        ));
        assert_eq!(line, "0, 0.1000, 0.2000, 0.3000, 0.4000");
    }

    #[test]
    fn test_parse_tolerates_whitespace_and_precision() {
        let annotation = parse_line("  1 ,0.123456789,   7e-1 ", 1, 2).unwrap();
        assert_eq!(annotation, Annotation::keypoint(1, 0.123456789, 0.7));
    }

    #[test]
    fn test_parse_box_line() {
        let annotation = parse_line("0,0.1,0.2,0.3,0.4", 1, 1).unwrap();
        assert_eq!(
            annotation,
            Annotation::bounding_box(0, Point::new(0.1, 0.2), Point::new(0.3, 0.4))
        );
    }

    #[test]
    fn test_parse_rejects_wrong_field_count() {
        let err = parse_line("0, 0.1, 0.2, 0.3", 4, 1).unwrap_err();
        assert!(matches!(err, AnnotatorError::Parse { line: 4, .. }));
    }

    #[test]
    fn test_parse_rejects_non_numeric_coordinate() {
        let err = parse_line("0, abc, 0.2", 1, 1).unwrap_err();
        assert!(matches!(err, AnnotatorError::Parse { line: 1, .. }));
    }

    #[test]
    fn test_parse_rejects_bad_class_index() {
        assert!(matches!(
            parse_line("-1, 0.1, 0.2", 1, 3),
            Err(AnnotatorError::Parse { .. })
        ));
        assert!(matches!(
            parse_line("3, 0.1, 0.2", 1, 3),
            Err(AnnotatorError::Parse { .. })
        ));
    }

    #[test]
    fn test_parse_annotations_preserves_order_and_skips_blank_lines() {
        let text = "1, 0.1, 0.1\n\n0, 0.1, 0.2, 0.3, 0.4\r\n0, 0.9, 0.9\n";
        let annotations = parse_annotations(text, 2).unwrap();
        assert_eq!(annotations.len(), 3);
        assert_eq!(annotations[0], Annotation::keypoint(1, 0.1, 0.1));
        assert_eq!(annotations[2], Annotation::keypoint(0, 0.9, 0.9));
    }

    #[test]
    fn test_parse_annotations_reports_line_number() {
        let text = "0, 0.1, 0.1\n0, 0.1, 0.1, 0.2\n";
        let err = parse_annotations(text, 1).unwrap_err();
        assert!(matches!(err, AnnotatorError::Parse { line: 2, .. }));
    }

    #[test]
    fn test_annotation_path_uses_first_dot() {
        let path = annotation_path_for(Path::new("/data/img.v2.png"));
        assert_eq!(path, PathBuf::from("/data/img.txt"));
    }

    #[test]
    fn test_missing_annotation_file_is_empty() {
        let dir = tempdir().expect("Failed to create temp dir");
        let annotations = read_annotation_file(&dir.path().join("none.txt"), 3).unwrap();
        assert!(annotations.is_empty());
    }

    #[test]
    fn test_write_then_read_annotation_file() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("img.txt");
        let annotations = vec![
            Annotation::keypoint(1, 0.25, 0.75),
            Annotation::bounding_box(0, Point::new(0.5, 0.5), Point::new(0.125, 0.0625)),
        ];
        write_annotation_file(&path, &annotations).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            text,
            "1, 0.2500, 0.7500\n0, 0.5000, 0.5000, 0.1250, 0.0625\n"
        );
        assert_eq!(read_annotation_file(&path, 2).unwrap(), annotations);
    }

    #[test]
    fn test_read_class_list() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("classes.txt");
        std::fs::write(&path, "cat\r\n\ndog  \n\n\n").unwrap();
        assert_eq!(read_class_list(&path).unwrap(), vec!["cat", "", "dog"]);
    }

    #[test]
    fn test_read_class_list_errors() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("classes.txt");
        assert!(matches!(
            read_class_list(&path),
            Err(AnnotatorError::MissingFile(_))
        ));

        std::fs::write(&path, "\n\n").unwrap();
        assert!(matches!(
            read_class_list(&path),
            Err(AnnotatorError::EmptyClassList(_))
        ));
    }
}

// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Class names and their display colors.
//!
//! Both are loaded once per directory and shared by every image in it.
//! Colors start out random and can be changed per class; duplicates across
//! classes are possible and allowed.

use crate::error::{AnnotatorError, IndexKind, Result};
use rand::Rng;
use std::fmt;
use std::str::FromStr;

/// A 24-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const GREEN: Color = Color::rgb(0, 255, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// A uniformly random 24-bit color.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let [_, r, g, b] = rng.gen_range(0..=0xFF_FF_FFu32).to_be_bytes();
        Self { r, g, b }
    }

    /// `#RRGGBB`, upper case.
    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Color {
    type Err = AnnotatorError;

    /// Parse `#RRGGBB` (case-insensitive, surrounding whitespace ignored).
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || AnnotatorError::InvalidColor(s.to_string());
        let hex = s.trim().strip_prefix('#').ok_or_else(invalid)?;
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let value = u32::from_str_radix(hex, 16).map_err(|_| invalid())?;
        let [_, r, g, b] = value.to_be_bytes();
        Ok(Self { r, g, b })
    }
}

/// Class names and one color per class.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassRegistry {
    names: Vec<String>,
    colors: Vec<Color>,
}

impl ClassRegistry {
    /// Register the classes with freshly generated random colors.
    pub fn new(names: Vec<String>) -> Self {
        Self::with_rng(names, &mut rand::thread_rng())
    }

    /// Same as [`ClassRegistry::new`] with a caller-provided generator.
    pub fn with_rng<R: Rng + ?Sized>(names: Vec<String>, rng: &mut R) -> Self {
        let colors = names.iter().map(|_| Color::random(rng)).collect();
        Self { names, colors }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn name_of(&self, class_index: usize) -> Result<&str> {
        self.names
            .get(class_index)
            .map(String::as_str)
            .ok_or_else(|| self.out_of_range(class_index))
    }

    pub fn color_of(&self, class_index: usize) -> Result<Color> {
        self.colors
            .get(class_index)
            .copied()
            .ok_or_else(|| self.out_of_range(class_index))
    }

    /// Overwrite the color of one class. Annotation data is not touched;
    /// every annotation of the class picks the new color on the next render.
    pub fn set_color(&mut self, class_index: usize, color: Color) -> Result<()> {
        let len = self.colors.len();
        let slot = self.colors.get_mut(class_index).ok_or(AnnotatorError::Index {
            kind: IndexKind::Class,
            index: class_index,
            len,
        })?;
        *slot = color;
        log::debug!("Class {} color set to {}", class_index, color);
        Ok(())
    }

    fn out_of_range(&self, class_index: usize) -> AnnotatorError {
        AnnotatorError::Index {
            kind: IndexKind::Class,
            index: class_index,
            len: self.names.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::annotation::Annotation;
    use crate::models::store::AnnotationStore;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn registry() -> ClassRegistry {
        let mut rng = StdRng::seed_from_u64(7);
        ClassRegistry::with_rng(vec!["cat".into(), "dog".into()], &mut rng)
    }

    #[test]
    fn test_one_color_per_class() {
        let registry = registry();
        assert_eq!(registry.len(), 2);
        assert!(registry.color_of(0).is_ok());
        assert!(registry.color_of(1).is_ok());
        assert_eq!(registry.name_of(1).unwrap(), "dog");
    }

    #[test]
    fn test_color_of_out_of_range() {
        let registry = registry();
        assert!(matches!(
            registry.color_of(2),
            Err(AnnotatorError::Index {
                kind: IndexKind::Class,
                index: 2,
                len: 2
            })
        ));
        assert!(registry.name_of(5).is_err());
    }

    #[test]
    fn test_set_color_twice_keeps_coordinates() {
        let mut registry = registry();
        let mut store = AnnotationStore::new();
        store.append(Annotation::keypoint(1, 0.25, 0.5));
        let before = store.clone();

        let color: Color = "#12ab34".parse().unwrap();
        registry.set_color(1, color).unwrap();
        registry.set_color(1, color).unwrap();

        assert_eq!(registry.color_of(1).unwrap(), Color::rgb(0x12, 0xAB, 0x34));
        assert_eq!(store, before);
        assert!(registry.set_color(2, color).is_err());
    }

    #[test]
    fn test_hex_format_and_parse() {
        let color = Color::rgb(255, 0, 16);
        assert_eq!(color.to_hex(), "#FF0010");
        assert_eq!(" #ff0010 ".parse::<Color>().unwrap(), color);
        assert!("ff0010".parse::<Color>().is_err());
        assert!("#ff001".parse::<Color>().is_err());
        assert!("#gg0010".parse::<Color>().is_err());
    }
}

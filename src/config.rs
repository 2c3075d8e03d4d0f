// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Application configuration.
//!
//! Settings come from the file named by `ANNOTATOR_CONFIG` (YAML or JSON,
//! chosen by extension). Any field missing from the file keeps its default.

use crate::error::{AnnotatorError, Result};
use crate::editor::machine::DEFAULT_HIT_TOLERANCE;
use crate::util::resize::Resizer;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable pointing at a configuration file.
pub const CONFIG_ENV_VAR: &str = "ANNOTATOR_CONFIG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotatorConfig {
    /// Target box images are resized to fit, in pixels.
    pub target_height: u32,
    pub target_width: u32,
    /// Grab distance around keypoints and box corners, in image pixels.
    pub hit_tolerance_px: i64,
    /// Initial keypoint size on screen (1 to 100).
    pub point_size: u32,
    /// File name suffixes treated as images.
    pub image_extensions: Vec<String>,
    /// Class list file inside the image directory.
    pub class_file: String,
}

impl Default for AnnotatorConfig {
    fn default() -> Self {
        Self {
            target_height: 1920,
            target_width: 1080,
            hit_tolerance_px: DEFAULT_HIT_TOLERANCE,
            point_size: 5,
            image_extensions: [".jpg", ".png", ".gif", ".jpeg"]
                .into_iter()
                .map(String::from)
                .collect(),
            class_file: "classes.txt".to_string(),
        }
    }
}

impl AnnotatorConfig {
    /// Load from `ANNOTATOR_CONFIG` if set, defaults otherwise.
    pub fn from_env() -> Result<Self> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => Self::load(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }

    /// Load from a YAML or JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let extension = path.extension().and_then(|s| s.to_str());
        let config: Self = match extension {
            Some("yaml") | Some("yml") => serde_yaml::from_str(&text)
                .map_err(|e| AnnotatorError::Config(format!("{}: {}", path.display(), e)))?,
            Some("json") => serde_json::from_str(&text)
                .map_err(|e| AnnotatorError::Config(format!("{}: {}", path.display(), e)))?,
            _ => {
                return Err(AnnotatorError::Config(format!(
                    "unsupported config extension: {:?}",
                    extension
                )))
            }
        };
        config.validate()?;
        log::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.target_height == 0 || self.target_width == 0 {
            return Err(AnnotatorError::Config(
                "target dimensions must be non-zero".to_string(),
            ));
        }
        if self.hit_tolerance_px < 1 {
            return Err(AnnotatorError::Config(
                "hit_tolerance_px must be at least 1".to_string(),
            ));
        }
        if !(1..=100).contains(&self.point_size) {
            return Err(AnnotatorError::Config(
                "point_size must be between 1 and 100".to_string(),
            ));
        }
        Ok(())
    }

    pub fn resizer(&self) -> Resizer {
        Resizer::new(self.target_height, self.target_width)
    }
}

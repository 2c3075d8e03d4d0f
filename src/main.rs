// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Simple Image Annotator
//!
//! A cross-platform desktop application for labelling the images of a
//! directory with keypoints and bounding boxes.

mod app;
mod ui;

use anyhow::{Context, Result};
use app::AnnotatorApp;
use simple_annotator::config::AnnotatorConfig;
use std::path::PathBuf;

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    let config = AnnotatorConfig::from_env().context("Failed to load configuration")?;

    // Optional directory to open on startup
    let directory = std::env::args_os().nth(1).map(PathBuf::from);

    // Configure egui options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([800.0, 600.0])
            .with_title("Simple Image Annotator"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "Simple Image Annotator",
        options,
        Box::new(|_cc| Ok(Box::new(AnnotatorApp::new(config, directory)))),
    )
    .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}

// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Simple Image Annotator core.
//!
//! Keypoint and bounding-box annotation of images, stored as one text file of
//! normalized coordinates per image. This crate holds everything that does
//! not depend on the GUI: the data model, the pointer state machine, the
//! render list and file I/O. The desktop shell lives in the binary.

pub mod config;
pub mod editor;
pub mod error;
pub mod io;
pub mod models;
pub mod util;

pub use error::{AnnotatorError, Result};

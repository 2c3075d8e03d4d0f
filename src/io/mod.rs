// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! I/O operations for images, class lists and annotation files.

pub mod media;
pub mod serialization;

// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Data model: annotations, their per-image store, classes and the
//! directory session.

pub mod annotation;
pub mod classes;
pub mod project;
pub mod store;

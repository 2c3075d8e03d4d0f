// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Coordinate and sizing helpers.

pub mod geometry;
pub mod resize;

// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! I/O operations for images, annotation files and the review backend.

pub mod api;
pub mod loader;
pub mod media;
pub mod serialization;

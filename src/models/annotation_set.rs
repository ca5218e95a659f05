// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Persisted annotation records.
//!
//! An [`AnnotationSet`] is the complete, ordered collection of shapes for one
//! review session. Shape order is z-order: later shapes draw on top.

use super::shape::Shape;
use serde::{Deserialize, Serialize};

/// Canvas dimensions the shapes were drawn against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

/// Complete annotation data for one image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotationSet {
    pub shapes: Vec<Shape>,
    /// ISO-8601 time of the save that produced this set.
    pub timestamp: String,
    pub image_size: ImageSize,
}

impl AnnotationSet {
    /// Create a new set with the given shapes and canvas size.
    pub fn new(shapes: Vec<Shape>, timestamp: String, image_size: ImageSize) -> Self {
        Self {
            shapes,
            timestamp,
            image_size,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

/// Artifacts handed to the save callback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavePayload {
    pub annotation_data: AnnotationSet,
    /// Composite raster encoded as a `data:` URL.
    pub annotated_image_data_url: String,
}

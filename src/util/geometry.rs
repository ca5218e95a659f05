// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Geometric utility functions.
//!
//! This module sizes the annotation canvas for a loaded image and converts
//! pointer positions on screen into canvas-pixel coordinates.

use crate::models::annotation_set::ImageSize;
use crate::models::shape::Point;

/// Natural and display dimensions of the loaded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanvasGeometry {
    pub natural_width: u32,
    pub natural_height: u32,
    pub display_width: u32,
    pub display_height: u32,
}

impl CanvasGeometry {
    /// Fit the natural size inside `max_width` x `max_height`, never upscaling.
    ///
    /// Width is clamped first, then the resulting height. The two passes run
    /// on unrounded values and only the final size is floored, so the result
    /// can differ by a pixel from a single `min` scale (e.g. 801x2136 gives
    /// 224x600 here, 225x600 with a single scale).
    pub fn fit(natural_width: u32, natural_height: u32, max_width: u32, max_height: u32) -> Self {
        let max_width = max_width as f64;
        let max_height = max_height as f64;
        let mut width = natural_width as f64;
        let mut height = natural_height as f64;

        if width > max_width {
            height = height * max_width / width;
            width = max_width;
        }
        if height > max_height {
            width = width * max_height / height;
            height = max_height;
        }

        Self {
            natural_width,
            natural_height,
            display_width: (width.floor() as u32).max(1),
            display_height: (height.floor() as u32).max(1),
        }
    }

    pub fn display_size(&self) -> ImageSize {
        ImageSize {
            width: self.display_width,
            height: self.display_height,
        }
    }
}

/// On-screen placement of the canvas, in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderedRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// Converts pointer positions into the coordinate space shapes are stored in.
pub trait CoordinateMapper: Send {
    fn to_canvas(&self, pointer: Point, rendered: &RenderedRect, geometry: &CanvasGeometry) -> Point;
}

/// Maps viewport positions to canvas pixels by the ratio of the canvas's
/// intrinsic size to its rendered size.
///
/// Nothing is cached: the rendered rect is read on every event so window
/// resizes are picked up immediately.
#[derive(Debug, Clone, Copy, Default)]
pub struct CanvasPixelMapper;

impl CoordinateMapper for CanvasPixelMapper {
    fn to_canvas(&self, pointer: Point, rendered: &RenderedRect, geometry: &CanvasGeometry) -> Point {
        let scale_x = ratio(geometry.display_width as f64, rendered.width);
        let scale_y = ratio(geometry.display_height as f64, rendered.height);
        Point {
            x: (pointer.x - rendered.left) * scale_x,
            y: (pointer.y - rendered.top) * scale_y,
        }
    }
}

fn ratio(intrinsic: f64, rendered: f64) -> f64 {
    if rendered > 0.0 {
        intrinsic / rendered
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn naive_fit(width: u32, height: u32) -> (u32, u32) {
        let scale = 1f64.min(800.0 / width as f64).min(600.0 / height as f64);
        (
            (width as f64 * scale).floor() as u32,
            (height as f64 * scale).floor() as u32,
        )
    }

    #[test]
    fn test_small_images_are_not_upscaled() {
        for (w, h) in [(800, 600), (640, 480), (1, 1), (799, 20), (100, 600)] {
            let geometry = CanvasGeometry::fit(w, h, 800, 600);
            assert_eq!((geometry.display_width, geometry.display_height), (w, h));
        }
    }

    #[test]
    fn test_wide_and_tall_images() {
        let wide = CanvasGeometry::fit(2000, 100, 800, 600);
        assert_eq!((wide.display_width, wide.display_height), (800, 40));

        let tall = CanvasGeometry::fit(100, 2000, 800, 600);
        assert_eq!((tall.display_width, tall.display_height), (30, 600));

        let both = CanvasGeometry::fit(1600, 1500, 800, 600);
        assert_eq!((both.display_width, both.display_height), (640, 600));
    }

    #[test]
    fn test_cascade_differs_from_single_scale() {
        let geometry = CanvasGeometry::fit(801, 2136, 800, 600);
        assert_eq!((geometry.display_width, geometry.display_height), (224, 600));
        assert_eq!(naive_fit(801, 2136), (225, 600));

        let geometry = CanvasGeometry::fit(801, 2248, 800, 600);
        assert_eq!((geometry.display_width, geometry.display_height), (213, 600));
        assert_eq!(naive_fit(801, 2248), (213, 599));
    }

    #[test]
    fn test_degenerate_size_is_at_least_one_pixel() {
        let geometry = CanvasGeometry::fit(1, 5000, 800, 600);
        assert_eq!(geometry.display_width, 1);
        assert_eq!(geometry.display_height, 600);
    }

    #[test]
    fn test_pointer_mapping_scales_to_intrinsic_size() {
        let geometry = CanvasGeometry::fit(800, 600, 800, 600);
        // Canvas shown at half size, offset in the viewport.
        let rendered = RenderedRect {
            left: 100.0,
            top: 50.0,
            width: 400.0,
            height: 300.0,
        };
        let p = CanvasPixelMapper.to_canvas(Point::new(300.0, 200.0), &rendered, &geometry);
        assert_eq!(p, Point::new(400.0, 300.0));
    }

    #[test]
    fn test_pointer_mapping_tracks_resize() {
        let geometry = CanvasGeometry::fit(800, 600, 800, 600);
        let mapper = CanvasPixelMapper;
        let pointer = Point::new(200.0, 150.0);

        let before = RenderedRect {
            left: 0.0,
            top: 0.0,
            width: 800.0,
            height: 600.0,
        };
        let after = RenderedRect {
            width: 400.0,
            height: 300.0,
            ..before
        };

        assert_eq!(mapper.to_canvas(pointer, &before, &geometry), pointer);
        assert_eq!(
            mapper.to_canvas(pointer, &after, &geometry),
            Point::new(400.0, 300.0)
        );
    }
}

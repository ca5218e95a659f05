// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Drawing engine.
//!
//! `render` is a pure function of the base image and the shape list: it
//! always starts from a cleared surface, so the same inputs produce the same
//! pixels byte for byte.

use crate::models::shape::{arrowhead, parse_hex_color, Point, Shape};
use crate::util::geometry::CanvasGeometry;
use anyhow::{anyhow, Result};
use image::imageops::{self, FilterType};
use image::{DynamicImage, RgbaImage};
use std::borrow::Cow;
use tiny_skia::{
    Color, ColorU8, LineCap, LineJoin, Paint, PathBuilder, Pixmap, Rect, Stroke, Transform,
};

/// Stroke width for every shape, in canvas pixels.
pub const STROKE_WIDTH: f32 = 3.0;

const FALLBACK_COLOR: [u8; 4] = [255, 0, 0, 255];

/// Scale a decoded image to the canvas display size.
pub fn scale_to_canvas(image: &DynamicImage, geometry: &CanvasGeometry) -> RgbaImage {
    let rgba = image.to_rgba8();
    if rgba.dimensions() == (geometry.display_width, geometry.display_height) {
        return rgba;
    }
    imageops::resize(
        &rgba,
        geometry.display_width,
        geometry.display_height,
        FilterType::Triangle,
    )
}

/// Render the base image and all shapes, in list order, into a new bitmap.
pub fn render(base: &RgbaImage, geometry: &CanvasGeometry, shapes: &[Shape]) -> Result<RgbaImage> {
    let (width, height) = (geometry.display_width, geometry.display_height);
    let mut pixmap =
        Pixmap::new(width, height).ok_or_else(|| anyhow!("cannot allocate {width}x{height} canvas"))?;

    pixmap.fill(Color::TRANSPARENT);

    let base = if base.dimensions() == (width, height) {
        Cow::Borrowed(base)
    } else {
        Cow::Owned(imageops::resize(base, width, height, FilterType::Triangle))
    };
    copy_base_image(&base, &mut pixmap);

    let stroke = Stroke {
        width: STROKE_WIDTH,
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        ..Stroke::default()
    };

    for shape in shapes {
        stroke_shape(&mut pixmap, shape, &stroke);
    }

    let mut data = Vec::with_capacity(pixmap.data().len());
    for pixel in pixmap.pixels() {
        let color = pixel.demultiply();
        data.extend_from_slice(&[color.red(), color.green(), color.blue(), color.alpha()]);
    }

    RgbaImage::from_raw(width, height, data).ok_or_else(|| anyhow!("cannot construct output image"))
}

fn copy_base_image(base: &RgbaImage, pixmap: &mut Pixmap) {
    for (dst, src) in pixmap.pixels_mut().iter_mut().zip(base.pixels()) {
        let [r, g, b, a] = src.0;
        *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
    }
}

fn stroke_shape(pixmap: &mut Pixmap, shape: &Shape, stroke: &Stroke) {
    let [r, g, b, a] = parse_hex_color(shape.color()).unwrap_or_else(|| {
        log::warn!("Unrecognized shape color {:?}, using fallback", shape.color());
        FALLBACK_COLOR
    });
    let mut paint = Paint::default();
    paint.set_color_rgba8(r, g, b, a);
    paint.anti_alias = true;

    let path = match shape {
        Shape::Rectangle {
            x, y, width, height, ..
        } => Rect::from_xywh(*x as f32, *y as f32, *width as f32, *height as f32)
            .map(PathBuilder::from_rect),
        Shape::Circle { x, y, radius, .. } => {
            PathBuilder::from_circle(*x as f32, *y as f32, *radius as f32)
        }
        Shape::Arrow {
            start_x,
            start_y,
            end_x,
            end_y,
            ..
        } => {
            let start = Point::new(*start_x, *start_y);
            let end = Point::new(*end_x, *end_y);
            let mut pb = PathBuilder::new();
            pb.move_to(start.x as f32, start.y as f32);
            pb.line_to(end.x as f32, end.y as f32);
            for (tip, wing) in arrowhead(start, end) {
                pb.move_to(tip.x as f32, tip.y as f32);
                pb.line_to(wing.x as f32, wing.y as f32);
            }
            pb.finish()
        }
    };

    match path {
        Some(path) => pixmap.stroke_path(&path, &paint, stroke, Transform::identity(), None),
        None => log::warn!("Skipping degenerate shape: {}", shape.describe()),
    }
}

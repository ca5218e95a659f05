// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Annotation shape data structures.
//!
//! This module defines the closed set of shapes a clinician can draw over a
//! dental photograph, the rules that turn a pointer gesture into a shape, and
//! the arrowhead geometry shared by the renderer and the canvas preview.
//!
//! All coordinates are in canvas-pixel space (the display-scaled image).

use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_6;

/// Rectangles must be wider and taller than this to be kept.
pub const MIN_RECT_SIDE: f64 = 5.0;
/// Circles must have a larger radius than this to be kept.
pub const MIN_CIRCLE_RADIUS: f64 = 5.0;
/// Arrows must be longer than this to be kept.
pub const MIN_ARROW_LENGTH: f64 = 10.0;

/// Length of each arrowhead segment in canvas pixels.
pub const ARROWHEAD_LENGTH: f64 = 15.0;
/// Angle between the shaft and each arrowhead segment.
pub const ARROWHEAD_ANGLE: f64 = FRAC_PI_6;

/// Default drawing palette.
pub const DEFAULT_PALETTE: [&str; 6] = [
    "#FF0000", "#00FF00", "#0000FF", "#FFFF00", "#FF00FF", "#000000",
];

/// A 2D point in canvas-pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance(&self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

/// Current drawing tool selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    #[default]
    Rectangle,
    Circle,
    Arrow,
}

impl Tool {
    pub const ALL: [Tool; 3] = [Tool::Rectangle, Tool::Circle, Tool::Arrow];

    pub fn label(self) -> &'static str {
        match self {
            Tool::Rectangle => "Rectangle",
            Tool::Circle => "Circle",
            Tool::Arrow => "Arrow",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Tool::Rectangle => "▭",
            Tool::Circle => "◯",
            Tool::Arrow => "➜",
        }
    }
}

/// A single annotation drawn over the base image.
///
/// Serialized with a `type` tag and camelCase fields so persisted sets keep
/// the `{ "type": "arrow", "startX": .. }` layout the backend stores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Shape {
    Rectangle {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        color: String,
    },
    Circle {
        x: f64,
        y: f64,
        radius: f64,
        color: String,
    },
    #[serde(rename_all = "camelCase")]
    Arrow {
        start_x: f64,
        start_y: f64,
        end_x: f64,
        end_y: f64,
        color: String,
    },
}

impl Shape {
    /// Build the candidate shape for a completed drag gesture.
    ///
    /// Returns `None` when the candidate fails the minimum-size filter, so
    /// accidental clicks never become annotations.
    pub fn from_gesture(tool: Tool, start: Point, end: Point, color: &str) -> Option<Shape> {
        let shape = Self::candidate(tool, start, end, color);
        if shape.is_significant() {
            Some(shape)
        } else {
            None
        }
    }

    /// Build the candidate shape for a gesture without applying the size filter.
    pub fn candidate(tool: Tool, start: Point, end: Point, color: &str) -> Shape {
        let color = color.to_string();
        match tool {
            Tool::Rectangle => Shape::Rectangle {
                x: start.x.min(end.x),
                y: start.y.min(end.y),
                width: (end.x - start.x).abs(),
                height: (end.y - start.y).abs(),
                color,
            },
            Tool::Circle => Shape::Circle {
                x: start.x,
                y: start.y,
                radius: start.distance(end),
                color,
            },
            Tool::Arrow => Shape::Arrow {
                start_x: start.x,
                start_y: start.y,
                end_x: end.x,
                end_y: end.y,
                color,
            },
        }
    }

    /// Check the minimum-size filter.
    pub fn is_significant(&self) -> bool {
        match self {
            Shape::Rectangle { width, height, .. } => {
                *width > MIN_RECT_SIDE && *height > MIN_RECT_SIDE
            }
            Shape::Circle { radius, .. } => *radius > MIN_CIRCLE_RADIUS,
            Shape::Arrow {
                start_x,
                start_y,
                end_x,
                end_y,
                ..
            } => Point::new(*start_x, *start_y).distance(Point::new(*end_x, *end_y)) > MIN_ARROW_LENGTH,
        }
    }

    pub fn color(&self) -> &str {
        match self {
            Shape::Rectangle { color, .. }
            | Shape::Circle { color, .. }
            | Shape::Arrow { color, .. } => color,
        }
    }

    pub fn tool(&self) -> Tool {
        match self {
            Shape::Rectangle { .. } => Tool::Rectangle,
            Shape::Circle { .. } => Tool::Circle,
            Shape::Arrow { .. } => Tool::Arrow,
        }
    }

    /// Short human readable description used by the shape list.
    pub fn describe(&self) -> String {
        match self {
            Shape::Rectangle {
                x, y, width, height, ..
            } => format!("Rectangle at ({x:.0}, {y:.0}) {width:.0}x{height:.0}"),
            Shape::Circle { x, y, radius, .. } => {
                format!("Circle at ({x:.0}, {y:.0}) r={radius:.0}")
            }
            Shape::Arrow {
                start_x,
                start_y,
                end_x,
                end_y,
                ..
            } => format!("Arrow ({start_x:.0}, {start_y:.0}) -> ({end_x:.0}, {end_y:.0})"),
        }
    }
}

/// The two V segments of an arrowhead, each running from the tip outwards.
///
/// Each segment is rotated by ±30° from the shaft direction and is
/// [`ARROWHEAD_LENGTH`] long.
pub fn arrowhead(start: Point, end: Point) -> [(Point, Point); 2] {
    let angle = (end.y - start.y).atan2(end.x - start.x);
    let wing = |offset: f64| {
        Point::new(
            end.x - ARROWHEAD_LENGTH * (angle - offset).cos(),
            end.y - ARROWHEAD_LENGTH * (angle - offset).sin(),
        )
    };
    [(end, wing(ARROWHEAD_ANGLE)), (end, wing(-ARROWHEAD_ANGLE))]
}

/// Parse `#RGB`, `#RRGGBB` or `#RRGGBBAA` into RGBA bytes.
pub fn parse_hex_color(value: &str) -> Option<[u8; 4]> {
    let hex = value.trim().strip_prefix('#')?;
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    match hex.len() {
        3 => {
            let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|n| n * 17);
            Some([nibble(0)?, nibble(1)?, nibble(2)?, 255])
        }
        6 => Some([byte(0)?, byte(2)?, byte(4)?, 255]),
        8 => Some([byte(0)?, byte(2)?, byte(4)?, byte(6)?]),
        _ => None,
    }
}

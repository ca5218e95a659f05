// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! UI components for the Toothmark application.

pub mod canvas;
pub mod properties;
pub mod toolbar;

use crate::models::shape::parse_hex_color;

/// egui color for a hex string; unknown colors show as gray.
pub(crate) fn color32(hex: &str) -> egui::Color32 {
    match parse_hex_color(hex) {
        Some([r, g, b, a]) => egui::Color32::from_rgba_unmultiplied(r, g, b, a),
        None => egui::Color32::GRAY,
    }
}

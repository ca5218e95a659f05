// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Annotation list panel.
//!
//! Lists shapes in drawing order: the first entry is at the bottom, the last
//! one is drawn on top.

use super::color32;
use crate::models::shape::Shape;

/// Display the shape list.
pub fn show(ui: &mut egui::Ui, shapes: &[Shape]) {
    ui.heading("Annotations");
    ui.separator();

    if shapes.is_empty() {
        ui.label(egui::RichText::new("Drag on the image to add an annotation").weak());
        return;
    }

    egui::ScrollArea::vertical().show(ui, |ui| {
        for (index, shape) in shapes.iter().enumerate() {
            ui.horizontal(|ui| {
                let (rect, _) = ui.allocate_exact_size(egui::vec2(12.0, 12.0), egui::Sense::hover());
                ui.painter().rect_filled(rect, 2.0, color32(shape.color()));
                ui.label(format!("{}. {} {}", index + 1, shape.tool().icon(), shape.describe()));
            });
        }
    });
}

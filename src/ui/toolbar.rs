// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Toolbar with tool, color and edit controls.
//!
//! Tool and color stay selectable while the editor is disabled; the edit
//! buttons do not.

use super::color32;
use crate::editor::AnnotationEditor;
use crate::models::shape::Tool;

/// Edit operations requested from the toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarAction {
    None,
    Undo,
    Redo,
    Clear,
    Save,
}

/// Display the toolbar.
pub fn show(ui: &mut egui::Ui, editor: &mut AnnotationEditor, saving: bool) -> ToolbarAction {
    let mut action = ToolbarAction::None;

    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        ui.label("Tools:");
        ui.separator();

        for tool in Tool::ALL {
            if ui
                .selectable_label(editor.tool() == tool, format!("{} {}", tool.icon(), tool.label()))
                .clicked()
            {
                editor.set_tool(tool);
            }
        }

        ui.separator();

        let palette = editor.palette().to_vec();
        for color in &palette {
            let selected = editor.color().eq_ignore_ascii_case(color);
            let (rect, response) =
                ui.allocate_exact_size(egui::vec2(20.0, 20.0), egui::Sense::click());
            ui.painter().rect_filled(rect.shrink(2.0), 3.0, color32(color));
            if selected {
                ui.painter()
                    .rect_stroke(rect, 3.0, egui::Stroke::new(2.0, egui::Color32::WHITE));
            }
            if response.on_hover_text(color.as_str()).clicked() {
                editor.set_color(color);
            }
        }

        ui.separator();

        let enabled = !editor.is_disabled();
        if ui
            .add_enabled(enabled && editor.can_undo(), egui::Button::new("↶ Undo"))
            .clicked()
        {
            action = ToolbarAction::Undo;
        }
        if ui
            .add_enabled(enabled && editor.can_redo(), egui::Button::new("↷ Redo"))
            .clicked()
        {
            action = ToolbarAction::Redo;
        }
        if ui
            .add_enabled(enabled && !editor.shapes().is_empty(), egui::Button::new("Clear"))
            .clicked()
        {
            action = ToolbarAction::Clear;
        }

        ui.separator();

        let save_label = if saving { "Saving..." } else { "💾 Save" };
        if ui
            .add_enabled(enabled && !saving, egui::Button::new(save_label))
            .clicked()
        {
            action = ToolbarAction::Save;
        }
    });

    action
}

// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Drawing canvas for the annotated image.
//!
//! The canvas shows the editor's composite as a texture, reports pointer
//! gestures back to the application, and paints a live preview of the shape
//! being dragged out.

use super::color32;
use crate::editor::AnnotationEditor;
use crate::models::shape::{arrowhead, Point, Shape};
use crate::render::draw::STROKE_WIDTH;
use crate::util::geometry::RenderedRect;

/// Pointer events on the canvas, in viewport coordinates.
pub enum CanvasAction {
    PointerDown(Point, RenderedRect),
    PointerMove(Point, RenderedRect),
    PointerUp(Point, RenderedRect),
}

/// Texture cache for the composite.
#[derive(Default)]
pub struct CanvasView {
    texture: Option<egui::TextureHandle>,
    revision: Option<u64>,
    /// Last pointer position reported during the current drag
    last_drag_pos: Option<egui::Pos2>,
}

impl CanvasView {
    /// Re-upload the composite when the editor has redrawn it.
    fn sync(&mut self, ctx: &egui::Context, editor: &AnnotationEditor) {
        if self.revision == Some(editor.revision()) {
            return;
        }
        self.revision = Some(editor.revision());

        let Some(composite) = editor.composite() else {
            self.texture = None;
            return;
        };
        let size = [composite.width() as usize, composite.height() as usize];
        let color_image = egui::ColorImage::from_rgba_unmultiplied(size, composite.as_raw());
        match &mut self.texture {
            Some(texture) => texture.set(color_image, egui::TextureOptions::LINEAR),
            None => {
                self.texture =
                    Some(ctx.load_texture("composite", color_image, egui::TextureOptions::LINEAR));
            }
        }
    }
}

/// Display the canvas area and collect pointer interactions.
pub fn show(
    ui: &mut egui::Ui,
    view: &mut CanvasView,
    editor: &AnnotationEditor,
    loading_message: Option<&str>,
) -> Vec<CanvasAction> {
    let mut actions = Vec::new();
    view.sync(ui.ctx(), editor);

    ui.style_mut().visuals.extreme_bg_color = egui::Color32::from_gray(40);
    let available_size = ui.available_size();

    egui::Frame::canvas(ui.style()).show(ui, |ui| {
        ui.set_min_size(available_size);

        if let Some(message) = loading_message {
            ui.centered_and_justified(|ui| {
                ui.vertical_centered(|ui| {
                    ui.add_space(20.0);
                    ui.spinner();
                    ui.add_space(10.0);
                    ui.label(
                        egui::RichText::new(message)
                            .size(16.0)
                            .color(egui::Color32::from_gray(200)),
                    );
                });
            });
            return;
        }

        let (Some(texture), Some(geometry)) = (&view.texture, editor.geometry()) else {
            welcome(ui);
            return;
        };

        // Shrink to fit the panel, never enlarge past the canvas size.
        let available = ui.available_size();
        let canvas_size = egui::vec2(geometry.display_width as f32, geometry.display_height as f32);
        let fit = (available.x / canvas_size.x)
            .min(available.y / canvas_size.y)
            .min(1.0)
            .max(0.05);
        let display_size = canvas_size * fit;
        let offset = (available - display_size) * 0.5;
        let image_rect =
            egui::Rect::from_min_size(ui.min_rect().min + offset.max(egui::Vec2::ZERO), display_size);

        let response = ui.allocate_rect(image_rect, egui::Sense::click_and_drag());
        let painter = ui.painter_at(image_rect);
        painter.image(
            texture.id(),
            image_rect,
            egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
            egui::Color32::WHITE,
        );

        let rendered = RenderedRect {
            left: image_rect.min.x as f64,
            top: image_rect.min.y as f64,
            width: image_rect.width() as f64,
            height: image_rect.height() as f64,
        };
        let current_pos = response
            .interact_pointer_pos()
            .or_else(|| ui.input(|i| i.pointer.latest_pos()));

        let press_origin = ui.input(|i| i.pointer.press_origin());
        if response.drag_started() {
            view.last_drag_pos = None;
            if let Some(pos) = press_origin.or(current_pos) {
                actions.push(CanvasAction::PointerDown(to_point(pos), rendered));
            }
        }
        if response.dragged() {
            if let Some(pos) = current_pos {
                view.last_drag_pos = Some(pos);
                actions.push(CanvasAction::PointerMove(to_point(pos), rendered));
            }
        }
        if response.drag_stopped() {
            // Released outside the window: finish where the pointer was last seen.
            let release = release_position(current_pos, view.last_drag_pos.take(), press_origin);
            if let Some(pos) = release {
                actions.push(CanvasAction::PointerUp(to_point(pos), rendered));
            }
        }

        if let Some(shape) = editor.preview() {
            let scale = image_rect.width() / canvas_size.x;
            draw_preview(&painter, &shape, image_rect.min, scale);
        }

        if editor.is_disabled() {
            response.on_hover_cursor(egui::CursorIcon::NotAllowed);
        } else {
            response.on_hover_cursor(egui::CursorIcon::Crosshair);
        }
    });

    // Status line at the bottom
    ui.separator();
    ui.horizontal(|ui| {
        ui.label(format!("Tool: {}", editor.tool().label()));
        ui.separator();
        match editor.geometry() {
            Some(geometry) => ui.label(format!(
                "Image {}x{} shown at {}x{}",
                geometry.natural_width,
                geometry.natural_height,
                geometry.display_width,
                geometry.display_height
            )),
            None => ui.label("No image loaded"),
        };
        ui.separator();
        ui.label(format!("{} annotations", editor.shapes().len()));
    });

    actions
}

fn welcome(ui: &mut egui::Ui) {
    ui.centered_and_justified(|ui| {
        ui.vertical_centered(|ui| {
            ui.add_space(20.0);
            ui.heading(
                egui::RichText::new("Toothmark")
                    .size(32.0)
                    .color(egui::Color32::from_gray(200)),
            );
            ui.label(
                egui::RichText::new("Dental image review")
                    .size(14.0)
                    .color(egui::Color32::from_gray(150)),
            );
            ui.add_space(20.0);
            ui.label(
                egui::RichText::new("Open a patient image to begin annotating")
                    .color(egui::Color32::from_gray(180)),
            );
        });
    });
}

/// Where a drag ends: the current pointer, else the last drag position,
/// else where it started.
fn release_position(
    current: Option<egui::Pos2>,
    last_drag: Option<egui::Pos2>,
    press_origin: Option<egui::Pos2>,
) -> Option<egui::Pos2> {
    current.or(last_drag).or(press_origin)
}

fn to_point(pos: egui::Pos2) -> Point {
    Point::new(pos.x as f64, pos.y as f64)
}

/// Paint the in-progress shape over the composite.
fn draw_preview(painter: &egui::Painter, shape: &Shape, origin: egui::Pos2, scale: f32) {
    let to_screen = |p: Point| origin + egui::vec2(p.x as f32, p.y as f32) * scale;
    let stroke = egui::Stroke::new(STROKE_WIDTH * scale, color32(shape.color()));

    // Undersized candidates are drawn faintly; they will be dropped on release.
    let stroke = if shape.is_significant() {
        stroke
    } else {
        egui::Stroke::new(stroke.width, stroke.color.gamma_multiply(0.4))
    };

    match shape {
        Shape::Rectangle {
            x, y, width, height, ..
        } => {
            let min = to_screen(Point::new(*x, *y));
            let max = to_screen(Point::new(x + width, y + height));
            painter.rect_stroke(egui::Rect::from_min_max(min, max), 0.0, stroke);
        }
        Shape::Circle { x, y, radius, .. } => {
            painter.circle_stroke(to_screen(Point::new(*x, *y)), *radius as f32 * scale, stroke);
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
            painter.line_segment([to_screen(start), to_screen(end)], stroke);
            for (tip, wing) in arrowhead(start, end) {
                painter.line_segment([to_screen(tip), to_screen(wing)], stroke);
            }
        }
    }
}

// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Annotation editor state.
//!
//! The editor owns the base image, the canvas geometry and the ordered shape
//! list for one review session. All mutations happen through the methods
//! below, each followed by a redraw of the composite, so the composite always
//! reflects the current shape list.

use crate::config::EditorConfig;
use crate::models::annotation_set::{AnnotationSet, SavePayload};
use crate::models::history::RedoHistory;
use crate::models::shape::{Point, Shape, Tool};
use crate::render::{draw, export};
use crate::util::geometry::{CanvasGeometry, CanvasPixelMapper, CoordinateMapper, RenderedRect};
use chrono::{DateTime, SecondsFormat, Utc};
use image::{DynamicImage, RgbaImage};

/// Errors the editor reports to its caller.
#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    #[error("Failed to load image: {0}")]
    ImageLoad(String),
    #[error("Please add at least one annotation before saving")]
    EmptyAnnotation,
    #[error("The image is not ready yet")]
    UninitializedCanvas,
    #[error("Rendered image is only {size} bytes (expected at least {min}); rendering failed")]
    Rasterization { size: usize, min: usize },
    #[error("Rendering failed: {0}")]
    Render(String),
    #[error("Annotations are read-only right now")]
    Disabled,
}

/// Identifies one image load request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

/// Pointer gesture state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    Idle,
    Drawing { start: Point, current: Point },
}

struct PendingLoad {
    ticket: LoadTicket,
    seed: Option<AnnotationSet>,
}

/// Interactive annotation session over one image.
pub struct AnnotationEditor {
    config: EditorConfig,
    mapper: Box<dyn CoordinateMapper>,
    geometry: Option<CanvasGeometry>,
    /// Base image already scaled to the display size
    base: Option<RgbaImage>,
    shapes: Vec<Shape>,
    history: RedoHistory,
    tool: Tool,
    color: String,
    gesture: Gesture,
    disabled: bool,
    last_ticket: u64,
    pending: Option<PendingLoad>,
    composite: Option<RgbaImage>,
    /// Bumped whenever the composite changes
    revision: u64,
}

impl AnnotationEditor {
    /// Create an editor that stores shapes in canvas-pixel space.
    pub fn new(config: &EditorConfig) -> Self {
        Self::with_mapper(config, Box::new(CanvasPixelMapper))
    }

    pub fn with_mapper(config: &EditorConfig, mapper: Box<dyn CoordinateMapper>) -> Self {
        let color = config
            .palette
            .first()
            .cloned()
            .unwrap_or_else(|| "#FF0000".to_string());
        Self {
            config: config.clone(),
            mapper,
            geometry: None,
            base: None,
            shapes: Vec::new(),
            history: RedoHistory::new(config.history_limit),
            tool: Tool::default(),
            color,
            gesture: Gesture::Idle,
            disabled: false,
            last_ticket: 0,
            pending: None,
            composite: None,
            revision: 0,
        }
    }

    /// Start loading a new image, optionally seeded with saved annotations.
    ///
    /// The editor is inert until the matching [`finish_image_load`] call.
    ///
    /// [`finish_image_load`]: AnnotationEditor::finish_image_load
    pub fn begin_image_load(&mut self, seed: Option<AnnotationSet>) -> LoadTicket {
        self.last_ticket += 1;
        let ticket = LoadTicket(self.last_ticket);
        self.pending = Some(PendingLoad { ticket, seed });
        self.geometry = None;
        self.base = None;
        self.shapes.clear();
        self.history.clear();
        self.gesture = Gesture::Idle;
        self.composite = None;
        self.revision += 1;
        ticket
    }

    /// Apply the outcome of a load request.
    ///
    /// Returns `Ok(false)` when the ticket belongs to a load that has since
    /// been superseded; its result is discarded.
    pub fn finish_image_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<DynamicImage, String>,
    ) -> Result<bool, EditorError> {
        let pending = match self.pending.take() {
            Some(pending) if pending.ticket == ticket => pending,
            other => {
                self.pending = other;
                log::debug!("Discarding stale image load {:?}", ticket);
                return Ok(false);
            }
        };

        let image = match result {
            Ok(image) => image,
            Err(message) => {
                log::error!("Image load failed: {}", message);
                return Err(EditorError::ImageLoad(message));
            }
        };

        let geometry = CanvasGeometry::fit(
            image.width(),
            image.height(),
            self.config.max_canvas_width,
            self.config.max_canvas_height,
        );
        log::info!(
            "Loaded image {}x{}, canvas {}x{}",
            geometry.natural_width,
            geometry.natural_height,
            geometry.display_width,
            geometry.display_height
        );

        self.base = Some(draw::scale_to_canvas(&image, &geometry));
        self.geometry = Some(geometry);

        // Seeds apply even while disabled.
        match pending.seed {
            Some(seed) => self.apply_set(geometry, seed),
            None => self.redraw(),
        }
        Ok(true)
    }

    /// Replace the shape list with a saved annotation set.
    ///
    /// Shapes are kept as saved even when the set was drawn on a canvas of a
    /// different size; the mismatch is only logged.
    pub fn restore(&mut self, set: AnnotationSet) -> Result<(), EditorError> {
        let Some(geometry) = self.geometry else {
            return Err(EditorError::UninitializedCanvas);
        };
        if self.disabled {
            return Err(EditorError::Disabled);
        }
        self.apply_set(geometry, set);
        Ok(())
    }

    fn apply_set(&mut self, geometry: CanvasGeometry, set: AnnotationSet) {
        if set.image_size != geometry.display_size() {
            log::warn!(
                "Saved annotations were drawn on a {}x{} canvas, current canvas is {}x{}",
                set.image_size.width,
                set.image_size.height,
                geometry.display_width,
                geometry.display_height
            );
        }
        log::info!("Restored {} saved annotations", set.shapes.len());
        self.shapes = set.shapes;
        self.history.clear();
        self.gesture = Gesture::Idle;
        self.redraw();
    }

    /// Load an already decoded image.
    pub fn load_image(
        &mut self,
        image: DynamicImage,
        seed: Option<AnnotationSet>,
    ) -> Result<(), EditorError> {
        let ticket = self.begin_image_load(seed);
        self.finish_image_load(ticket, Ok(image)).map(|_| ())
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    pub fn geometry(&self) -> Option<&CanvasGeometry> {
        self.geometry.as_ref()
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn set_tool(&mut self, tool: Tool) {
        self.tool = tool;
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    pub fn set_color(&mut self, color: &str) {
        self.color = color.to_string();
    }

    pub fn palette(&self) -> &[String] {
        &self.config.palette
    }

    pub fn gesture(&self) -> Gesture {
        self.gesture
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Block or unblock editing (e.g. while a save is in flight).
    ///
    /// Disabling drops any gesture in progress.
    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
        if disabled {
            self.gesture = Gesture::Idle;
        }
    }

    /// Composite of the base image and all shapes, if an image is loaded.
    pub fn composite(&self) -> Option<&RgbaImage> {
        self.composite.as_ref()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn can_undo(&self) -> bool {
        !self.disabled && !self.shapes.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.disabled && self.history.can_redo()
    }

    /// Map a viewport position onto the canvas.
    pub fn map_pointer(&self, pointer: Point, rendered: &RenderedRect) -> Option<Point> {
        let geometry = self.geometry.as_ref()?;
        Some(self.mapper.to_canvas(pointer, rendered, geometry))
    }

    pub fn pointer_down(&mut self, position: Point) {
        if self.disabled || self.geometry.is_none() {
            return;
        }
        self.gesture = Gesture::Drawing {
            start: position,
            current: position,
        };
    }

    pub fn pointer_move(&mut self, position: Point) {
        if let Gesture::Drawing { current, .. } = &mut self.gesture {
            *current = position;
        }
    }

    /// Finish the gesture. Returns `true` if a shape was added.
    pub fn pointer_up(&mut self, position: Point) -> bool {
        if self.disabled {
            return false;
        }
        let Gesture::Drawing { start, .. } = self.gesture else {
            return false;
        };
        self.gesture = Gesture::Idle;

        match Shape::from_gesture(self.tool, start, position, &self.color) {
            Some(shape) => {
                log::info!("Added {}", shape.describe());
                self.shapes.push(shape);
                self.history.clear();
                self.redraw();
                true
            }
            None => {
                log::debug!("Ignoring {:?} gesture below minimum size", self.tool);
                false
            }
        }
    }

    pub fn pointer_down_at(&mut self, pointer: Point, rendered: &RenderedRect) {
        if let Some(position) = self.map_pointer(pointer, rendered) {
            self.pointer_down(position);
        }
    }

    pub fn pointer_move_at(&mut self, pointer: Point, rendered: &RenderedRect) {
        if let Some(position) = self.map_pointer(pointer, rendered) {
            self.pointer_move(position);
        }
    }

    pub fn pointer_up_at(&mut self, pointer: Point, rendered: &RenderedRect) -> bool {
        match self.map_pointer(pointer, rendered) {
            Some(position) => self.pointer_up(position),
            None => false,
        }
    }

    /// Shape the current gesture would produce, before size filtering.
    pub fn preview(&self) -> Option<Shape> {
        match self.gesture {
            Gesture::Drawing { start, current } => {
                Some(Shape::candidate(self.tool, start, current, &self.color))
            }
            Gesture::Idle => None,
        }
    }

    /// Remove the most recently added shape.
    pub fn undo(&mut self) -> bool {
        if self.disabled {
            return false;
        }
        match self.shapes.pop() {
            Some(shape) => {
                log::info!("Undo, {} shapes left", self.shapes.len());
                self.history.push(shape);
                self.redraw();
                true
            }
            None => false,
        }
    }

    /// Re-append the most recently undone shape.
    pub fn redo(&mut self) -> bool {
        if self.disabled {
            return false;
        }
        match self.history.pop() {
            Some(shape) => {
                log::info!("Redo {}", shape.describe());
                self.shapes.push(shape);
                self.redraw();
                true
            }
            None => false,
        }
    }

    /// Remove every shape.
    pub fn clear(&mut self) {
        if self.disabled {
            return;
        }
        self.history.clear();
        if self.shapes.is_empty() {
            return;
        }
        log::info!("Cleared {} shapes", self.shapes.len());
        self.shapes.clear();
        self.redraw();
    }

    /// Validate, render and hand the annotation set and composite to `on_save`.
    pub fn save<R>(&mut self, on_save: impl FnOnce(SavePayload) -> R) -> Result<R, EditorError> {
        self.save_at(Utc::now(), on_save)
    }

    /// Like [`save`](AnnotationEditor::save) with an explicit timestamp.
    pub fn save_at<R>(
        &mut self,
        timestamp: DateTime<Utc>,
        on_save: impl FnOnce(SavePayload) -> R,
    ) -> Result<R, EditorError> {
        let (Some(geometry), Some(base)) = (self.geometry, self.base.as_ref()) else {
            return Err(EditorError::UninitializedCanvas);
        };
        if self.shapes.is_empty() {
            return Err(EditorError::EmptyAnnotation);
        }

        let composite = draw::render(base, &geometry, &self.shapes)
            .map_err(|e| EditorError::Render(format!("{e:#}")))?;
        let format = self.config.export_format;
        let bytes = export::encode_composite(&composite, format, self.config.jpeg_quality)
            .map_err(|e| EditorError::Render(format!("{e:#}")))?;
        if bytes.len() < self.config.min_export_bytes {
            log::error!("Composite is only {} bytes, refusing to save", bytes.len());
            return Err(EditorError::Rasterization {
                size: bytes.len(),
                min: self.config.min_export_bytes,
            });
        }

        let payload = SavePayload {
            annotation_data: AnnotationSet::new(
                self.shapes.clone(),
                timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
                geometry.display_size(),
            ),
            annotated_image_data_url: export::to_data_url(&bytes, format),
        };
        log::info!(
            "Saving {} shapes with a {} byte composite",
            self.shapes.len(),
            bytes.len()
        );

        self.composite = Some(composite);
        self.revision += 1;
        Ok(on_save(payload))
    }

    fn redraw(&mut self) {
        self.revision += 1;
        let (Some(geometry), Some(base)) = (self.geometry.as_ref(), self.base.as_ref()) else {
            self.composite = None;
            return;
        };
        match draw::render(base, geometry, &self.shapes) {
            Ok(composite) => self.composite = Some(composite),
            Err(e) => {
                log::error!("Failed to render canvas: {:#}", e);
                self.composite = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::annotation_set::ImageSize;
    use chrono::TimeZone;
    use image::{Rgba, RgbaImage};

    fn textured(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_fn(width, height, |x, y| {
            Rgba([(x * 7 ^ y * 13) as u8, (x * y) as u8, (x + y * 3) as u8, 255])
        }))
    }

    fn loaded_editor() -> AnnotationEditor {
        let mut editor = AnnotationEditor::new(&EditorConfig::default());
        editor.load_image(textured(200, 150), None).unwrap();
        editor
    }

    fn drag(editor: &mut AnnotationEditor, from: (f64, f64), to: (f64, f64)) -> bool {
        editor.pointer_down(Point::new(from.0, from.1));
        editor.pointer_move(Point::new(to.0, to.1));
        editor.pointer_up(Point::new(to.0, to.1))
    }

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 10, 0, 0).unwrap()
    }

    #[test]
    fn test_rectangle_gesture_appends_shape() {
        let mut editor = loaded_editor();
        editor.set_tool(Tool::Rectangle);
        editor.set_color("#FF0000");

        assert!(drag(&mut editor, (10.0, 10.0), (50.0, 80.0)));
        assert_eq!(
            editor.shapes(),
            &[Shape::Rectangle {
                x: 10.0,
                y: 10.0,
                width: 40.0,
                height: 70.0,
                color: "#FF0000".to_string(),
            }]
        );
        assert_eq!(editor.gesture(), Gesture::Idle);
    }

    #[test]
    fn test_click_does_not_add_shape() {
        let mut editor = loaded_editor();
        editor.set_tool(Tool::Rectangle);

        assert!(!drag(&mut editor, (10.0, 10.0), (12.0, 12.0)));
        assert!(editor.shapes().is_empty());
        assert_eq!(editor.gesture(), Gesture::Idle);
    }

    #[test]
    fn test_pointer_up_without_down_is_ignored() {
        let mut editor = loaded_editor();
        assert!(!editor.pointer_up(Point::new(100.0, 100.0)));
        assert!(editor.shapes().is_empty());
    }

    #[test]
    fn test_undo_on_empty_is_noop() {
        let mut editor = loaded_editor();
        assert!(!editor.undo());
        assert!(editor.shapes().is_empty());
    }

    #[test]
    fn test_undo_removes_last_and_redo_restores_it() {
        let mut editor = loaded_editor();
        editor.set_tool(Tool::Circle);
        drag(&mut editor, (50.0, 50.0), (70.0, 50.0));
        editor.set_tool(Tool::Arrow);
        drag(&mut editor, (10.0, 10.0), (100.0, 10.0));

        assert!(editor.undo());
        assert_eq!(editor.shapes().len(), 1);
        assert_eq!(editor.shapes()[0].tool(), Tool::Circle);

        assert!(editor.redo());
        assert_eq!(editor.shapes()[1].tool(), Tool::Arrow);
        assert!(!editor.redo());
    }

    #[test]
    fn test_new_shape_drops_redo() {
        let mut editor = loaded_editor();
        drag(&mut editor, (10.0, 10.0), (50.0, 50.0));
        editor.undo();
        drag(&mut editor, (60.0, 60.0), (90.0, 90.0));

        assert!(!editor.can_redo());
        assert!(!editor.redo());
        assert_eq!(editor.shapes().len(), 1);
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut editor = loaded_editor();
        drag(&mut editor, (10.0, 10.0), (50.0, 50.0));
        editor.clear();
        editor.clear();
        assert!(editor.shapes().is_empty());
        assert!(!editor.undo());
    }

    #[test]
    fn test_disabled_editor_ignores_pointer() {
        let mut editor = loaded_editor();
        editor.pointer_down(Point::new(10.0, 10.0));
        editor.set_disabled(true);
        assert_eq!(editor.gesture(), Gesture::Idle);

        assert!(!drag(&mut editor, (10.0, 10.0), (50.0, 50.0)));
        assert!(editor.shapes().is_empty());

        // Tool and color stay selectable.
        editor.set_tool(Tool::Arrow);
        editor.set_color("#0000FF");
        assert_eq!(editor.tool(), Tool::Arrow);

        editor.set_disabled(false);
        assert!(drag(&mut editor, (10.0, 10.0), (50.0, 50.0)));
        assert_eq!(editor.shapes()[0].color(), "#0000FF");
    }

    #[test]
    fn test_disabled_editor_ignores_undo_redo_and_clear() {
        let mut editor = loaded_editor();
        drag(&mut editor, (10.0, 10.0), (50.0, 50.0));
        drag(&mut editor, (60.0, 60.0), (90.0, 90.0));
        editor.undo();
        let revision = editor.revision();

        editor.set_disabled(true);
        assert!(!editor.can_undo());
        assert!(!editor.can_redo());
        assert!(!editor.undo());
        assert!(!editor.redo());
        editor.clear();

        assert_eq!(editor.shapes().len(), 1);
        assert_eq!(editor.revision(), revision);

        editor.set_disabled(false);
        assert!(editor.redo());
        assert_eq!(editor.shapes().len(), 2);
    }

    #[test]
    fn test_pointer_before_image_is_ignored() {
        let mut editor = AnnotationEditor::new(&EditorConfig::default());
        assert!(!drag(&mut editor, (10.0, 10.0), (50.0, 50.0)));
        assert!(editor.shapes().is_empty());
    }

    #[test]
    fn test_preview_follows_pointer() {
        let mut editor = loaded_editor();
        editor.set_tool(Tool::Circle);
        editor.pointer_down(Point::new(20.0, 20.0));
        editor.pointer_move(Point::new(23.0, 24.0));

        match editor.preview() {
            Some(Shape::Circle { radius, .. }) => assert!((radius - 5.0).abs() < 1e-9),
            other => panic!("unexpected preview: {:?}", other),
        }
        editor.pointer_up(Point::new(23.0, 24.0));
        assert!(editor.preview().is_none());
    }

    #[test]
    fn test_viewport_pointer_is_mapped_to_canvas() {
        let mut editor = loaded_editor();
        // 200x150 canvas displayed at double size.
        let rendered = RenderedRect {
            left: 10.0,
            top: 20.0,
            width: 400.0,
            height: 300.0,
        };
        editor.pointer_down_at(Point::new(30.0, 40.0), &rendered);
        assert!(editor.pointer_up_at(Point::new(110.0, 180.0), &rendered));
        assert_eq!(
            editor.shapes()[0],
            Shape::Rectangle {
                x: 10.0,
                y: 10.0,
                width: 40.0,
                height: 70.0,
                color: "#FF0000".to_string(),
            }
        );
    }

    #[test]
    fn test_save_after_undo_contains_remaining_shapes() {
        let mut editor = loaded_editor();
        drag(&mut editor, (10.0, 10.0), (50.0, 50.0));
        editor.set_tool(Tool::Circle);
        drag(&mut editor, (100.0, 60.0), (120.0, 60.0));
        editor.set_tool(Tool::Arrow);
        drag(&mut editor, (20.0, 120.0), (150.0, 100.0));

        let first = editor.save_at(fixed_time(), |payload| payload).unwrap();
        assert_eq!(first.annotation_data.shapes.len(), 3);

        editor.undo();
        let second = editor.save_at(fixed_time(), |payload| payload).unwrap();
        assert_eq!(
            second.annotation_data.shapes,
            first.annotation_data.shapes[..2].to_vec()
        );
        assert_eq!(second.annotation_data.timestamp, "2025-03-01T10:00:00.000Z");
        assert_eq!(second.annotation_data.image_size.width, 200);
        assert!(second
            .annotated_image_data_url
            .starts_with("data:image/jpeg;base64,"));
    }

    #[test]
    fn test_save_rejects_empty_set() {
        let mut editor = loaded_editor();
        let mut called = false;
        let result = editor.save(|_| called = true);
        assert!(matches!(result, Err(EditorError::EmptyAnnotation)));
        assert!(!called);
    }

    #[test]
    fn test_save_rejects_uninitialized_canvas() {
        let mut editor = AnnotationEditor::new(&EditorConfig::default());
        let result = editor.save(|_| ());
        assert!(matches!(result, Err(EditorError::UninitializedCanvas)));
    }

    #[test]
    fn test_save_rejects_tiny_raster() {
        let config = EditorConfig {
            min_export_bytes: usize::MAX,
            ..EditorConfig::default()
        };
        let mut editor = AnnotationEditor::new(&config);
        editor.load_image(textured(200, 150), None).unwrap();
        drag(&mut editor, (10.0, 10.0), (50.0, 50.0));

        let mut called = false;
        let result = editor.save(|_| called = true);
        assert!(matches!(result, Err(EditorError::Rasterization { .. })));
        assert!(!called);
    }

    #[test]
    fn test_stale_load_is_discarded() {
        let mut editor = AnnotationEditor::new(&EditorConfig::default());
        let first = editor.begin_image_load(None);
        let second = editor.begin_image_load(None);

        assert!(!editor.finish_image_load(first, Ok(textured(1600, 1200))).unwrap());
        assert!(editor.geometry().is_none());

        assert!(editor.finish_image_load(second, Ok(textured(200, 150))).unwrap());
        let geometry = editor.geometry().unwrap();
        assert_eq!((geometry.display_width, geometry.display_height), (200, 150));
        assert!(!editor.is_loading());
    }

    #[test]
    fn test_failed_load_leaves_editor_inert() {
        let mut editor = AnnotationEditor::new(&EditorConfig::default());
        let ticket = editor.begin_image_load(None);
        let result = editor.finish_image_load(ticket, Err("404 Not Found".to_string()));

        assert!(matches!(result, Err(EditorError::ImageLoad(_))));
        assert!(editor.geometry().is_none());
        assert!(editor.composite().is_none());
        assert!(!drag(&mut editor, (10.0, 10.0), (50.0, 50.0)));
    }

    #[test]
    fn test_reloading_seed_reproduces_composite() {
        let mut editor = loaded_editor();
        drag(&mut editor, (10.0, 10.0), (50.0, 80.0));
        editor.set_tool(Tool::Arrow);
        editor.set_color("#00FF00");
        drag(&mut editor, (150.0, 20.0), (60.0, 100.0));

        let payload = editor.save_at(fixed_time(), |payload| payload).unwrap();
        let json = serde_json::to_string(&payload.annotation_data).unwrap();
        let restored: AnnotationSet = serde_json::from_str(&json).unwrap();

        let mut reopened = AnnotationEditor::new(&EditorConfig::default());
        reopened.load_image(textured(200, 150), Some(restored)).unwrap();

        assert_eq!(reopened.shapes(), editor.shapes());
        assert_eq!(
            reopened.composite().unwrap().as_raw(),
            editor.composite().unwrap().as_raw()
        );
    }

    #[test]
    fn test_restore_replaces_shapes() {
        let mut editor = loaded_editor();
        drag(&mut editor, (10.0, 10.0), (50.0, 50.0));
        editor.undo();

        let set = AnnotationSet::new(
            vec![Shape::Circle {
                x: 100.0,
                y: 75.0,
                radius: 20.0,
                color: "#0000FF".to_string(),
            }],
            "2025-03-01T10:00:00.000Z".to_string(),
            ImageSize {
                width: 640,
                height: 480,
            },
        );
        editor.restore(set).unwrap();

        assert_eq!(editor.shapes().len(), 1);
        assert!(!editor.can_redo());
        assert!(editor.composite().is_some());
    }

    #[test]
    fn test_restore_is_rejected_while_disabled() {
        let mut editor = loaded_editor();
        drag(&mut editor, (10.0, 10.0), (50.0, 50.0));
        let before = editor.shapes().to_vec();
        editor.set_disabled(true);

        let set = AnnotationSet::new(
            Vec::new(),
            "2025-03-01T10:00:00.000Z".to_string(),
            ImageSize {
                width: 200,
                height: 150,
            },
        );
        assert!(matches!(editor.restore(set), Err(EditorError::Disabled)));
        assert_eq!(editor.shapes(), before.as_slice());
    }

    #[test]
    fn test_seed_is_applied_while_disabled() {
        let mut editor = AnnotationEditor::new(&EditorConfig::default());
        let seed = AnnotationSet::new(
            vec![Shape::Circle {
                x: 100.0,
                y: 75.0,
                radius: 20.0,
                color: "#0000FF".to_string(),
            }],
            "2025-03-01T10:00:00.000Z".to_string(),
            ImageSize {
                width: 200,
                height: 150,
            },
        );
        let ticket = editor.begin_image_load(Some(seed));
        editor.set_disabled(true);

        assert!(editor.finish_image_load(ticket, Ok(textured(200, 150))).unwrap());
        assert_eq!(editor.shapes().len(), 1);
    }

    #[test]
    fn test_restore_requires_image() {
        let mut editor = AnnotationEditor::new(&EditorConfig::default());
        let set = AnnotationSet::new(
            Vec::new(),
            String::new(),
            ImageSize {
                width: 1,
                height: 1,
            },
        );
        assert!(matches!(
            editor.restore(set),
            Err(EditorError::UninitializedCanvas)
        ));
    }

    #[test]
    fn test_revision_tracks_mutations() {
        let mut editor = loaded_editor();
        let before = editor.revision();
        drag(&mut editor, (10.0, 10.0), (50.0, 50.0));
        assert!(editor.revision() > before);

        let after_draw = editor.revision();
        drag(&mut editor, (10.0, 10.0), (11.0, 11.0));
        assert_eq!(editor.revision(), after_draw);
    }
}

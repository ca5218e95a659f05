// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Main application state and egui App implementation.
//!
//! This module wires the annotation editor to the UI components, the
//! background image loader and the review backend. Long-running work
//! (downloads, uploads) runs on worker threads and reports back over
//! channels polled once per frame.

use crate::config::EditorConfig;
use crate::editor::AnnotationEditor;
use crate::io::api::ApiClient;
use crate::io::loader::ImageLoader;
use crate::io::media::ImageSource;
use crate::io::serialization;
use crate::models::annotation_set::{AnnotationSet, SavePayload};
use crate::models::submission::{Submission, SubmissionStatus};
use crate::render::export::{decode_data_url, ExportFormat};
use crate::ui::{canvas, properties, toolbar};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver};

/// What to open at startup.
#[derive(Debug, Clone, Default)]
pub struct LaunchOptions {
    pub image: Option<String>,
    pub annotations: Option<PathBuf>,
    pub submission: Option<String>,
}

/// Message shown in the status bar.
enum Status {
    Info(String),
    Error(String),
}

/// Main application state.
pub struct ToothmarkApp {
    config: EditorConfig,
    editor: AnnotationEditor,
    loader: ImageLoader,
    api: ApiClient,
    canvas: canvas::CanvasView,

    /// Submission being reviewed, when working against the backend
    submission: Option<Submission>,
    /// Pending submission fetch
    submission_loader: Option<Receiver<Result<Submission, String>>>,
    /// Pending upload of a saved annotation set
    save_task: Option<Receiver<Result<Submission, String>>>,
    /// Reported submissions are read-only
    locked: bool,

    loading_message: Option<String>,
    status: Option<Status>,
}

impl ToothmarkApp {
    /// Create a new application instance.
    pub fn new(config: EditorConfig, launch: LaunchOptions) -> Self {
        let mut app = Self {
            editor: AnnotationEditor::new(&config),
            loader: ImageLoader::new(),
            api: ApiClient::new(&config),
            canvas: canvas::CanvasView::default(),
            submission: None,
            submission_loader: None,
            save_task: None,
            locked: false,
            loading_message: None,
            status: None,
            config,
        };

        if let Some(id) = launch.submission {
            app.open_submission(id);
        } else if let Some(image) = launch.image {
            let seed = match launch.annotations.as_deref().map(serialization::import_annotations) {
                Some(Ok(set)) => Some(set),
                Some(Err(e)) => {
                    log::error!("{:#}", e);
                    app.status = Some(Status::Error(format!("{e:#}")));
                    None
                }
                None => None,
            };
            app.open_image(&image, seed);
        }

        app
    }

    /// Fetch a submission from the backend (asynchronously).
    fn open_submission(&mut self, id: String) {
        self.abandon_background_tasks();
        let (sender, receiver) = channel();
        self.submission_loader = Some(receiver);
        self.loading_message = Some(format!("Loading submission {id}..."));

        let api = self.api.clone();
        std::thread::spawn(move || {
            let result = api.fetch_submission(&id).map_err(|e| e.to_string());
            let _ = sender.send(result);
        });
    }

    /// Switch to a local image, detached from any submission.
    fn open_local_image(&mut self, reference: &str) {
        self.abandon_background_tasks();
        self.submission = None;
        self.locked = false;
        self.editor.set_disabled(false);
        self.open_image(reference, None);
    }

    /// Drop pending fetches and uploads. Their workers keep running but the
    /// results can no longer reach this session.
    fn abandon_background_tasks(&mut self) {
        if self.submission_loader.take().is_some() {
            log::info!("Abandoning pending submission fetch");
        }
        if self.save_task.take().is_some() {
            log::info!("Abandoning pending upload result");
        }
    }

    /// Load an image reference, optionally seeded with saved annotations.
    fn open_image(&mut self, reference: &str, seed: Option<AnnotationSet>) {
        let source = match ImageSource::resolve(reference, &self.config) {
            Ok(source) => source,
            Err(e) => {
                log::error!("Cannot open image {}: {:#}", reference, e);
                self.status = Some(Status::Error(format!("Failed to load image: {e:#}")));
                return;
            }
        };
        let ticket = self.editor.begin_image_load(seed);
        self.loading_message = Some("Loading image...".to_string());
        self.loader.spawn(ticket, source, &self.config);
    }

    /// Collect finished background work.
    fn poll_background(&mut self) {
        if let Some(receiver) = &self.submission_loader {
            if let Ok(result) = receiver.try_recv() {
                self.submission_loader = None;
                self.loading_message = None;
                match result {
                    Ok(submission) => self.apply_submission(submission),
                    Err(e) => {
                        log::error!("Failed to load submission: {}", e);
                        self.status = Some(Status::Error(format!("Failed to load submission: {e}")));
                    }
                }
            }
        }

        while let Some(loaded) = self.loader.poll() {
            match self.editor.finish_image_load(loaded.ticket, loaded.result) {
                Ok(true) => {
                    self.loading_message = None;
                    self.status = Some(Status::Info(format!("Loaded {}", loaded.source)));
                }
                Ok(false) => {}
                Err(e) => {
                    self.loading_message = None;
                    self.status = Some(Status::Error(e.to_string()));
                }
            }
        }

        if let Some(receiver) = &self.save_task {
            if let Ok(result) = receiver.try_recv() {
                self.save_task = None;
                self.editor.set_disabled(self.locked);
                match result {
                    Ok(submission) => {
                        log::info!("Submission {} is now {:?}", submission.id, submission.status);
                        self.status = Some(Status::Info("Annotations saved".to_string()));
                        self.submission = Some(submission);
                    }
                    Err(e) => {
                        log::error!("Failed to save annotations: {}", e);
                        self.status = Some(Status::Error(format!("Failed to save annotations: {e}")));
                    }
                }
            }
        }
    }

    fn apply_submission(&mut self, submission: Submission) {
        self.locked = !submission.is_editable();
        if self.locked {
            self.status = Some(Status::Info(
                "This submission has already been reported; annotations are read-only".to_string(),
            ));
        }
        let image_url = submission.image_url.clone();
        let seed = submission.annotation_data.clone();
        self.submission = Some(submission);
        self.open_image(&image_url, seed);
        self.editor.set_disabled(self.locked);
    }

    /// Save through the editor and hand the artifacts to the backend or disk.
    fn save(&mut self) {
        let submission_id = self.submission.as_ref().map(|s| s.id.clone());
        match submission_id {
            Some(id) => {
                let api = self.api.clone();
                let result = self.editor.save(move |payload| {
                    let (sender, receiver) = channel();
                    std::thread::spawn(move || {
                        let result = api.save_annotations(&id, &payload).map_err(|e| e.to_string());
                        let _ = sender.send(result);
                    });
                    receiver
                });
                match result {
                    Ok(receiver) => {
                        self.save_task = Some(receiver);
                        self.editor.set_disabled(true);
                        self.status = Some(Status::Info("Saving annotations...".to_string()));
                    }
                    Err(e) => self.status = Some(Status::Error(e.to_string())),
                }
            }
            None => {
                let Some(path) = rfd::FileDialog::new()
                    .add_filter("Annotations", &["json", "yaml", "yml"])
                    .set_file_name("annotations.json")
                    .save_file()
                else {
                    return;
                };
                match self.editor.save(|payload| save_to_disk(&payload, &path)) {
                    Ok(Ok(image_path)) => {
                        self.status = Some(Status::Info(format!(
                            "Saved {} and {}",
                            path.display(),
                            image_path.display()
                        )));
                    }
                    Ok(Err(e)) => {
                        log::error!("{:#}", e);
                        self.status = Some(Status::Error(format!("{e:#}")));
                    }
                    Err(e) => self.status = Some(Status::Error(e.to_string())),
                }
            }
        }
    }

    fn current_annotation_set(&self) -> Option<AnnotationSet> {
        let geometry = self.editor.geometry()?;
        Some(AnnotationSet::new(
            self.editor.shapes().to_vec(),
            chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            geometry.display_size(),
        ))
    }

    fn export_annotations(&mut self, path: PathBuf) {
        let Some(set) = self.current_annotation_set() else {
            return;
        };
        match serialization::export_annotations(&set, &path) {
            Ok(()) => {
                log::info!("Exported annotations to {}", path.display());
                self.status = Some(Status::Info(format!("Exported {}", path.display())));
            }
            Err(e) => {
                log::error!("{:#}", e);
                self.status = Some(Status::Error(format!("{e:#}")));
            }
        }
    }

    fn export_image(&mut self, path: PathBuf) {
        let Some(composite) = self.editor.composite() else {
            return;
        };
        match serialization::export_composite(composite, &path, self.config.jpeg_quality) {
            Ok(()) => self.status = Some(Status::Info(format!("Exported {}", path.display()))),
            Err(e) => {
                log::error!("{:#}", e);
                self.status = Some(Status::Error(format!("{e:#}")));
            }
        }
    }

    /// Replace the shapes on the current image with a saved annotation file.
    fn import_annotations(&mut self, path: PathBuf) {
        let set = match serialization::import_annotations(&path) {
            Ok(set) => set,
            Err(e) => {
                log::error!("{:#}", e);
                self.status = Some(Status::Error(format!("{e:#}")));
                return;
            }
        };
        if set.is_empty() {
            log::warn!("{} contains no annotations", path.display());
        }
        match self.editor.restore(set) {
            Ok(()) => self.status = Some(Status::Info(format!("Loaded {}", path.display()))),
            Err(e) => self.status = Some(Status::Error(e.to_string())),
        }
    }

    fn menu_bar(&mut self, ui: &mut egui::Ui) {
        egui::menu::bar(ui, |ui| {
            ui.menu_button("File", |ui| {
                if ui.button("Open Image...").clicked() {
                    if let Some(path) = rfd::FileDialog::new()
                        .add_filter("Images", &["jpg", "jpeg", "png", "bmp", "webp"])
                        .pick_file()
                    {
                        self.open_local_image(&path.to_string_lossy());
                    }
                    ui.close_menu();
                }
                let has_image = self.editor.geometry().is_some();
                let can_edit = has_image && !self.editor.is_disabled();
                if ui
                    .add_enabled(can_edit, egui::Button::new("Load Annotations..."))
                    .clicked()
                {
                    if let Some(path) = rfd::FileDialog::new()
                        .add_filter("Annotations", &["yaml", "yml", "json"])
                        .pick_file()
                    {
                        self.import_annotations(path);
                    }
                    ui.close_menu();
                }
                ui.separator();
                ui.add_enabled_ui(has_image, |ui| {
                    ui.menu_button("Export Annotations", |ui| {
                        if ui.button("Export as JSON...").clicked() {
                            if let Some(path) = rfd::FileDialog::new()
                                .add_filter("JSON", &["json"])
                                .set_file_name("annotations.json")
                                .save_file()
                            {
                                self.export_annotations(path);
                            }
                            ui.close_menu();
                        }
                        if ui.button("Export as YAML...").clicked() {
                            if let Some(path) = rfd::FileDialog::new()
                                .add_filter("YAML", &["yaml", "yml"])
                                .set_file_name("annotations.yaml")
                                .save_file()
                            {
                                self.export_annotations(path);
                            }
                            ui.close_menu();
                        }
                    });
                    if ui.button("Export Annotated Image...").clicked() {
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("Images", &["png", "jpg", "jpeg"])
                            .set_file_name("annotated.png")
                            .save_file()
                        {
                            self.export_image(path);
                        }
                        ui.close_menu();
                    }
                });
                ui.separator();
                if ui.button("Quit").clicked() {
                    ui.ctx().send_viewport_cmd(egui::ViewportCommand::Close);
                }
            });

            ui.menu_button("Edit", |ui| {
                if ui
                    .add_enabled(self.editor.can_undo(), egui::Button::new("Undo (Ctrl+Z)"))
                    .clicked()
                {
                    self.editor.undo();
                    ui.close_menu();
                }
                if ui
                    .add_enabled(self.editor.can_redo(), egui::Button::new("Redo (Ctrl+Shift+Z)"))
                    .clicked()
                {
                    self.editor.redo();
                    ui.close_menu();
                }
                ui.separator();
                let can_clear = !self.editor.is_disabled() && !self.editor.shapes().is_empty();
                if ui.add_enabled(can_clear, egui::Button::new("Clear All")).clicked() {
                    self.editor.clear();
                    ui.close_menu();
                }
            });
        });
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        if ctx.wants_keyboard_input() {
            return;
        }
        // Handle undo (Ctrl+Z)
        if ctx.input(|i| i.modifiers.command && i.key_pressed(egui::Key::Z) && !i.modifiers.shift) {
            self.editor.undo();
        }
        // Handle redo (Ctrl+Shift+Z or Ctrl+Y)
        if ctx.input(|i| {
            (i.modifiers.command && i.modifiers.shift && i.key_pressed(egui::Key::Z))
                || (i.modifiers.command && i.key_pressed(egui::Key::Y))
        }) {
            self.editor.redo();
        }
    }
}

impl eframe::App for ToothmarkApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_background();

        // Keep polling while background work is outstanding
        if self.loading_message.is_some() || self.save_task.is_some() || self.editor.is_loading() {
            ctx.request_repaint();
        }

        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| self.menu_bar(ui));

        let saving = self.save_task.is_some();
        let toolbar_action = egui::TopBottomPanel::top("toolbar")
            .show(ctx, |ui| toolbar::show(ui, &mut self.editor, saving))
            .inner;
        match toolbar_action {
            toolbar::ToolbarAction::Undo => {
                self.editor.undo();
            }
            toolbar::ToolbarAction::Redo => {
                self.editor.redo();
            }
            toolbar::ToolbarAction::Clear => self.editor.clear(),
            toolbar::ToolbarAction::Save => self.save(),
            toolbar::ToolbarAction::None => {}
        }

        self.handle_shortcuts(ctx);

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if let Some(submission) = &self.submission {
                    ui.label(format!("Submission {}", submission.id));
                    let status = match submission.status {
                        SubmissionStatus::Uploaded => "uploaded",
                        SubmissionStatus::Annotated => "annotated",
                        SubmissionStatus::Reported => "reported",
                    };
                    ui.label(egui::RichText::new(status).weak());
                    ui.separator();
                }
                match &self.status {
                    Some(Status::Info(message)) => {
                        ui.label(message);
                    }
                    Some(Status::Error(message)) => {
                        ui.colored_label(egui::Color32::from_rgb(230, 80, 80), message);
                    }
                    None => {
                        ui.label("Ready");
                    }
                }
            });
        });

        egui::SidePanel::right("properties")
            .default_width(250.0)
            .show(ctx, |ui| properties::show(ui, self.editor.shapes()));

        let loading = self.loading_message.clone();
        let actions = egui::CentralPanel::default()
            .show(ctx, |ui| canvas::show(ui, &mut self.canvas, &self.editor, loading.as_deref()))
            .inner;

        for action in actions {
            match action {
                canvas::CanvasAction::PointerDown(pos, rendered) => {
                    self.editor.pointer_down_at(pos, &rendered)
                }
                canvas::CanvasAction::PointerMove(pos, rendered) => {
                    self.editor.pointer_move_at(pos, &rendered)
                }
                canvas::CanvasAction::PointerUp(pos, rendered) => {
                    self.editor.pointer_up_at(pos, &rendered);
                }
            }
        }
    }
}

/// Write the annotation file and the composite image next to it.
fn save_to_disk(payload: &SavePayload, path: &Path) -> Result<PathBuf> {
    serialization::export_annotations(&payload.annotation_data, path)?;

    let (mime, bytes) = decode_data_url(&payload.annotated_image_data_url)?;
    let format = ExportFormat::from_mime_type(&mime)
        .ok_or_else(|| anyhow::anyhow!("Unexpected composite type {mime}"))?;
    let image_path = path.with_extension(format.extension());
    std::fs::write(&image_path, bytes)
        .with_context(|| format!("Failed to write {}", image_path.display()))?;

    log::info!(
        "Saved annotations to {} and composite to {}",
        path.display(),
        image_path.display()
    );
    Ok(image_path)
}

// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Background image loading.
//!
//! Each load runs on its own thread and reports back over a shared channel,
//! tagged with the editor's load ticket so superseded results can be told
//! apart from the current one.

use super::media::{self, ImageSource};
use crate::config::EditorConfig;
use crate::editor::LoadTicket;
use image::DynamicImage;
use std::sync::mpsc::{channel, Receiver, Sender};

/// Result of a background image load.
pub struct LoadedImage {
    pub ticket: LoadTicket,
    pub source: String,
    pub result: Result<DynamicImage, String>,
}

pub struct ImageLoader {
    sender: Sender<LoadedImage>,
    receiver: Receiver<LoadedImage>,
}

impl Default for ImageLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageLoader {
    pub fn new() -> Self {
        let (sender, receiver) = channel();
        Self { sender, receiver }
    }

    /// Fetch and decode `source` on a worker thread.
    pub fn spawn(&self, ticket: LoadTicket, source: ImageSource, config: &EditorConfig) {
        let sender = self.sender.clone();
        let config = config.clone();

        std::thread::spawn(move || {
            let description = source.describe();
            log::info!("Loading image {}", description);
            let result = media::load_image(&source, &config).map_err(|e| format!("{e:#}"));
            if let Ok(image) = &result {
                log::info!(
                    "Decoded image: {} ({}x{})",
                    description,
                    image.width(),
                    image.height()
                );
            }
            let _ = sender.send(LoadedImage {
                ticket,
                source: description,
                result,
            });
        });
    }

    /// Next finished load, if any.
    pub fn poll(&self) -> Option<LoadedImage> {
        self.receiver.try_recv().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::AnnotationEditor;
    use crate::render::export::{encode_composite, ExportFormat};
    use image::{Rgba, RgbaImage};
    use std::time::{Duration, Instant};

    fn wait_for(loader: &ImageLoader) -> LoadedImage {
        let deadline = Instant::now() + Duration::from_secs(10);
        loop {
            if let Some(loaded) = loader.poll() {
                return loaded;
            }
            assert!(Instant::now() < deadline, "image load timed out");
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn test_background_load_reaches_editor() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tooth.png");
        let image = RgbaImage::from_pixel(30, 20, Rgba([200, 200, 200, 255]));
        std::fs::write(&path, encode_composite(&image, ExportFormat::Png, 95).unwrap()).unwrap();

        let config = EditorConfig::default();
        let mut editor = AnnotationEditor::new(&config);
        let loader = ImageLoader::new();

        let ticket = editor.begin_image_load(None);
        loader.spawn(ticket, ImageSource::File(path), &config);

        let loaded = wait_for(&loader);
        assert_eq!(loaded.ticket, ticket);
        assert!(editor.finish_image_load(loaded.ticket, loaded.result).unwrap());
        assert_eq!(editor.geometry().unwrap().display_width, 30);
    }

    #[test]
    fn test_missing_file_reports_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = EditorConfig::default();
        let mut editor = AnnotationEditor::new(&config);
        let loader = ImageLoader::new();

        let ticket = editor.begin_image_load(None);
        loader.spawn(ticket, ImageSource::File(dir.path().join("nope.png")), &config);

        let loaded = wait_for(&loader);
        assert!(loaded.result.is_err());
        assert!(editor.finish_image_load(loaded.ticket, loaded.result).is_err());
        assert!(editor.geometry().is_none());
    }
}

// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Image source resolution and decoding.
//!
//! A source reference may be an absolute URL, a URL relative to the
//! configured API base, a local file path, or a base64 `data:` URL.

use crate::config::EditorConfig;
use crate::io::api::ApiClient;
use crate::render::export::decode_data_url;
use anyhow::{anyhow, Context, Result};
use image::DynamicImage;
use std::path::{Path, PathBuf};

/// Where to read an image from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    Url(String),
    File(PathBuf),
    DataUrl(String),
}

impl ImageSource {
    /// Classify a reference, resolving relative URLs against `apiBaseUrl`.
    pub fn resolve(reference: &str, config: &EditorConfig) -> Result<Self> {
        let reference = reference.trim();
        if reference.is_empty() {
            return Err(anyhow!("empty image reference"));
        }
        if reference.to_ascii_lowercase().starts_with("data:") {
            return Ok(ImageSource::DataUrl(reference.to_string()));
        }
        if Path::new(reference).is_file() {
            return Ok(ImageSource::File(PathBuf::from(reference)));
        }
        config
            .resolve_url(reference)
            .map(ImageSource::Url)
            .ok_or_else(|| anyhow!("relative image URL {reference:?} needs apiBaseUrl to be configured"))
    }

    /// Short description for log and status messages.
    pub fn describe(&self) -> String {
        match self {
            ImageSource::Url(url) => url.clone(),
            ImageSource::File(path) => path.display().to_string(),
            ImageSource::DataUrl(url) => format!("data URL ({} chars)", url.len()),
        }
    }
}

/// Fetch and decode an image. Blocking; run it off the UI thread.
pub fn load_image(source: &ImageSource, config: &EditorConfig) -> Result<DynamicImage> {
    let bytes = match source {
        ImageSource::Url(url) => ApiClient::new(config)
            .fetch_bytes(url)
            .with_context(|| format!("cannot download {url}"))?,
        ImageSource::File(path) => {
            std::fs::read(path).with_context(|| format!("cannot read {}", path.display()))?
        }
        ImageSource::DataUrl(url) => decode_data_url(url)?.1,
    };
    decode_image(&bytes)
}

pub fn decode_image(bytes: &[u8]) -> Result<DynamicImage> {
    image::load_from_memory(bytes).context("cannot decode image")
}

// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Editor configuration.
//!
//! The configuration is loaded once at startup and passed explicitly to the
//! editor and the API client.

use crate::models::shape::DEFAULT_PALETTE;
use crate::render::export::ExportFormat;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Settings for the annotation editor and its backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    /// Base URL of the review backend; relative image URLs resolve against it.
    pub api_base_url: String,
    /// Bearer token forwarded to the backend, if any.
    pub api_token: Option<String>,
    pub max_canvas_width: u32,
    pub max_canvas_height: u32,
    pub export_format: ExportFormat,
    /// JPEG quality, 1-100.
    pub jpeg_quality: u8,
    /// Encoded composites smaller than this are treated as failed renders.
    pub min_export_bytes: usize,
    pub palette: Vec<String>,
    /// How many undone shapes can be redone.
    pub history_limit: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            api_base_url: String::new(),
            api_token: None,
            max_canvas_width: 800,
            max_canvas_height: 600,
            export_format: ExportFormat::Jpeg,
            jpeg_quality: 95,
            min_export_bytes: 1000,
            palette: DEFAULT_PALETTE.iter().map(|c| c.to_string()).collect(),
            history_limit: 50,
        }
    }
}

impl EditorConfig {
    /// Load configuration from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let yaml = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read config {}", path.display()))?;
        let config: EditorConfig = serde_yaml::from_str(&yaml)
            .with_context(|| format!("invalid config {}", path.display()))?;
        Ok(config.sanitized())
    }

    /// Load from an explicit path, else the per-user config file, else defaults.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match default_config_path() {
            Some(path) if path.exists() => {
                log::info!("Using config {}", path.display());
                Self::load(&path)
            }
            _ => Ok(Self::default()),
        }
    }

    /// Resolve an image or API reference against `api_base_url`.
    ///
    /// Absolute `http(s)` and `data:` URLs are returned unchanged. Returns
    /// `None` for a relative reference when no base URL is configured.
    pub fn resolve_url(&self, reference: &str) -> Option<String> {
        let reference = reference.trim();
        if is_absolute_url(reference) {
            return Some(reference.to_string());
        }
        let base = self.api_base_url.trim().trim_end_matches('/');
        if base.is_empty() {
            return None;
        }
        Some(format!("{}/{}", base, reference.trim_start_matches('/')))
    }

    fn sanitized(mut self) -> Self {
        if self.palette.is_empty() {
            self.palette = Self::default().palette;
        }
        self.max_canvas_width = self.max_canvas_width.max(1);
        self.max_canvas_height = self.max_canvas_height.max(1);
        self.jpeg_quality = self.jpeg_quality.clamp(1, 100);
        self
    }
}

pub fn is_absolute_url(reference: &str) -> bool {
    let lower = reference.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://") || lower.starts_with("data:")
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("toothmark").join("config.yaml"))
}

// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Annotation data serialization and deserialization.
//!
//! This module handles exporting and importing annotation sets in YAML
//! and JSON formats, and writing the composite image to disk.

use crate::models::annotation_set::AnnotationSet;
use crate::render::export::{encode_composite, ExportFormat};
use anyhow::{bail, Context, Result};
use image::RgbaImage;
use std::path::Path;

/// Export an annotation set to YAML format.
pub fn export_yaml(data: &AnnotationSet, path: &Path) -> Result<()> {
    let yaml = serde_yaml::to_string(data)?;
    std::fs::write(path, yaml)?;
    Ok(())
}

/// Export an annotation set to JSON format.
pub fn export_json(data: &AnnotationSet, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(data)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Import an annotation set from YAML format.
pub fn import_yaml(path: &Path) -> Result<AnnotationSet> {
    let yaml = std::fs::read_to_string(path)?;
    let data = serde_yaml::from_str(&yaml)?;
    Ok(data)
}

/// Import an annotation set from JSON format.
pub fn import_json(path: &Path) -> Result<AnnotationSet> {
    let json = std::fs::read_to_string(path)?;
    let data = serde_json::from_str(&json)?;
    Ok(data)
}

/// Export using the format implied by the file extension.
pub fn export_annotations(data: &AnnotationSet, path: &Path) -> Result<()> {
    let result = match extension(path).as_deref() {
        Some("yaml") | Some("yml") => export_yaml(data, path),
        Some("json") => export_json(data, path),
        other => bail!("Unsupported annotation file extension: {:?}", other),
    };
    result.with_context(|| format!("Failed to export annotations to {}", path.display()))
}

/// Import using the format implied by the file extension.
pub fn import_annotations(path: &Path) -> Result<AnnotationSet> {
    let result = match extension(path).as_deref() {
        Some("yaml") | Some("yml") => import_yaml(path),
        Some("json") => import_json(path),
        other => bail!("Unsupported annotation file extension: {:?}", other),
    };
    result.with_context(|| format!("Failed to import annotations from {}", path.display()))
}

/// Write the composite as PNG or JPEG depending on the file extension.
pub fn export_composite(image: &RgbaImage, path: &Path, jpeg_quality: u8) -> Result<()> {
    let format = match extension(path).as_deref() {
        Some("png") => ExportFormat::Png,
        Some("jpg") | Some("jpeg") => ExportFormat::Jpeg,
        other => bail!("Unsupported image file extension: {:?}", other),
    };
    let bytes = encode_composite(image, format, jpeg_quality)?;
    std::fs::write(path, bytes)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::annotation_set::ImageSize;
    use crate::models::shape::Shape;

    fn sample() -> AnnotationSet {
        AnnotationSet::new(
            vec![
                Shape::Arrow {
                    start_x: 5.0,
                    start_y: 5.0,
                    end_x: 120.0,
                    end_y: 40.5,
                    color: "#FFFF00".to_string(),
                },
                Shape::Rectangle {
                    x: 10.0,
                    y: 10.0,
                    width: 40.0,
                    height: 70.0,
                    color: "#FF0000".to_string(),
                },
            ],
            "2025-03-01T10:00:00.000Z".to_string(),
            ImageSize {
                width: 640,
                height: 480,
            },
        )
    }

    #[test]
    fn test_json_file_roundtrip_preserves_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("annotations.json");

        export_annotations(&sample(), &path).unwrap();
        let loaded = import_annotations(&path).unwrap();
        assert_eq!(loaded, sample());
    }

    #[test]
    fn test_yaml_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("annotations.YML");

        export_annotations(&sample(), &path).unwrap();
        assert_eq!(import_annotations(&path).unwrap(), sample());
    }

    #[test]
    fn test_unknown_extension_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        assert!(export_annotations(&sample(), &dir.path().join("a.txt")).is_err());
        assert!(import_annotations(&dir.path().join("a")).is_err());
    }

    #[test]
    fn test_export_composite_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("composite.png");
        let image = RgbaImage::from_pixel(20, 10, image::Rgba([1, 2, 3, 255]));

        export_composite(&image, &path, 95).unwrap();
        let decoded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(decoded.as_raw(), image.as_raw());
    }
}

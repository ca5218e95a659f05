// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Toothmark - dental image annotation editor
//!
//! A desktop application for marking up patient photographs with rectangles,
//! circles and arrows, and exporting the annotated composite to a review
//! backend or to disk.

mod app;
mod config;
mod editor;
mod io;
mod models;
mod render;
mod ui;
mod util;

use anyhow::Result;
use app::{LaunchOptions, ToothmarkApp};
use clap::Parser;
use config::EditorConfig;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "toothmark")]
#[command(author, version, about = "Annotate dental images", long_about = None)]
struct Cli {
    /// Image to open (file path, URL, or data: URL)
    image: Option<String>,

    /// Saved annotation set (JSON or YAML) to restore onto the image
    #[arg(short, long, requires = "image")]
    annotations: Option<PathBuf>,

    /// Submission id to load from the review backend
    #[arg(short, long, conflicts_with = "image")]
    submission: Option<String>,

    /// Configuration file (YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    let cli = Cli::parse();
    let config = EditorConfig::discover(cli.config.as_deref())?;
    let launch = LaunchOptions {
        image: cli.image,
        annotations: cli.annotations,
        submission: cli.submission,
    };

    // Configure egui options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([800.0, 600.0])
            .with_title("Toothmark - Dental Image Annotation"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "Toothmark",
        options,
        Box::new(|_cc| Ok(Box::new(ToothmarkApp::new(config, launch)))),
    )
    .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}

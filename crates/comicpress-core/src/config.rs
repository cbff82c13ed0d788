// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Application configuration, persisted as pretty-printed JSON.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{ComicpressError, Result};
use crate::types::CanvasSize;

/// Pixel bands used by banner detection.
///
/// A dimension difference below the noise floor is scan jitter; one above the
/// ceiling is an unrelated page (a spread, a cover), not a banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BannerThresholds {
    pub width_noise_px: u32,
    pub width_ceiling_px: u32,
    pub height_noise_px: u32,
    pub height_ceiling_px: u32,
    /// Height of the strip added below width-padded pages.
    pub width_banner_px: u32,
}

impl BannerThresholds {
    pub fn validate(&self) -> Result<()> {
        if self.width_noise_px > self.width_ceiling_px {
            return Err(ComicpressError::Config(format!(
                "width noise floor {} exceeds ceiling {}",
                self.width_noise_px, self.width_ceiling_px
            )));
        }
        if self.height_noise_px > self.height_ceiling_px {
            return Err(ComicpressError::Config(format!(
                "height noise floor {} exceeds ceiling {}",
                self.height_noise_px, self.height_ceiling_px
            )));
        }
        if self.width_banner_px == 0 {
            return Err(ComicpressError::Config(
                "width banner height must be non-zero".into(),
            ));
        }
        Ok(())
    }

    /// Whether a width difference counts as a banner candidate.
    pub fn width_diverges(&self, diff: u32) -> bool {
        (self.width_noise_px..=self.width_ceiling_px).contains(&diff)
    }

    /// Whether a height difference counts as a banner candidate.
    pub fn height_diverges(&self, diff: u32) -> bool {
        (self.height_noise_px..=self.height_ceiling_px).contains(&diff)
    }
}

impl Default for BannerThresholds {
    fn default() -> Self {
        Self {
            width_noise_px: 30,
            width_ceiling_px: 100,
            height_noise_px: 50,
            height_ceiling_px: 200,
            width_banner_px: 50,
        }
    }
}

/// Persistent application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Output page size.
    pub canvas: CanvasSize,
    /// Banner detection bands.
    pub thresholds: BannerThresholds,
    /// Assumed long/short edge ratio of landscape pages.
    pub landscape_aspect: f32,
    /// Derive the canvas height from the reference page.
    pub adaptive_canvas: bool,
    /// Position of the page whose size counts as "normal".
    pub reference_index: usize,
    /// File listing `name;source` entries, one per line.
    pub entries_file: PathBuf,
    /// Working copies of the pages, one subdirectory per comic.
    pub work_dir: PathBuf,
    /// Where finished PDFs are written.
    pub output_dir: PathBuf,
    /// Quality used when re-encoding cropped JPEG pages (1-100).
    pub jpeg_quality: u8,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            canvas: CanvasSize::default(),
            thresholds: BannerThresholds::default(),
            landscape_aspect: 4.0 / 3.0,
            adaptive_canvas: false,
            reference_index: 1,
            entries_file: PathBuf::from("links.txt"),
            work_dir: PathBuf::from("imgs"),
            output_dir: PathBuf::from("pdfs"),
            jpeg_quality: 90,
        }
    }
}

impl AppConfig {
    /// Load the config from `path`, falling back to defaults when the file
    /// does not exist.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&data)?;
        config.validate()?;
        info!(path = %path.display(), "config loaded");
        Ok(config)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        self.canvas.validate()?;
        self.thresholds.validate()?;
        if !(self.landscape_aspect > 0.0) {
            return Err(ComicpressError::Config(format!(
                "landscape aspect must be positive, got {}",
                self.landscape_aspect
            )));
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(ComicpressError::Config(format!(
                "jpeg quality must be 1-100, got {}",
                self.jpeg_quality
            )));
        }
        Ok(())
    }
}

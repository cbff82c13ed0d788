// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for Comicpress: canvas geometry, banner geometry,
// rotation sets and per-page placement instructions.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::{ComicpressError, Result};

/// Output canvas size in millimetres (portrait: `height_mm >= width_mm`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width_mm: f32,
    pub height_mm: f32,
}

impl CanvasSize {
    pub fn new(width_mm: f32, height_mm: f32) -> Self {
        Self {
            width_mm,
            height_mm,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.width_mm > 0.0 && self.height_mm > 0.0) {
            return Err(ComicpressError::Config(format!(
                "canvas must be positive, got {}x{} mm",
                self.width_mm, self.height_mm
            )));
        }
        Ok(())
    }

    /// Keep the canvas width and take the height from a reference page's
    /// aspect ratio. Degenerate pixel sizes leave the canvas unchanged.
    pub fn adapted_to(&self, width_px: u32, height_px: u32) -> Self {
        if width_px == 0 || height_px == 0 {
            return *self;
        }
        let aspect = height_px as f32 / width_px as f32;
        Self {
            width_mm: self.width_mm,
            height_mm: self.width_mm * aspect,
        }
    }

    /// Horizontal offset that centres a landscape source of the given
    /// aspect ratio (long / short edge) on a turned page whose short edge
    /// is `width_mm`.
    ///
    /// Depends only on the canvas, never on the image being placed.
    pub fn landscape_offset_x(&self, landscape_aspect: f32) -> f32 {
        (self.height_mm - self.width_mm * landscape_aspect) / 2.0
    }
}

impl Default for CanvasSize {
    fn default() -> Self {
        Self::new(200.0, 300.0)
    }
}

/// Page orientation on the output canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Orientation {
    Portrait,
    /// Page turned by 90°: the canvas width becomes the page height.
    Landscape,
}

impl Orientation {
    /// Page size (width, height) in millimetres for this orientation.
    pub fn page_size_mm(&self, canvas: CanvasSize) -> (f32, f32) {
        match self {
            Self::Portrait => (canvas.width_mm, canvas.height_mm),
            Self::Landscape => (canvas.height_mm, canvas.width_mm),
        }
    }
}

/// How the host inserted its banner into the batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BannerGeometry {
    /// Banner pages are taller: a strip was appended below the page.
    HeightPadding {
        actual_height: u32,
        banner_height: u32,
    },
    /// Banner pages are narrower: the page was shrunk and a fixed-height
    /// strip added at the bottom.
    WidthPadding {
        banner_width: u32,
        banner_height_px: u32,
    },
    None,
}

impl BannerGeometry {
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

/// Result of the forward scan for the first page that diverges from the
/// reference size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanOutcome {
    Found(usize),
    NotFound,
}

/// Indices of landscape pages (wider than tall).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotationSet(BTreeSet<usize>);

impl RotationSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, index: usize) -> bool {
        self.0.insert(index)
    }

    pub fn contains(&self, index: usize) -> bool {
        self.0.contains(&index)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Indices in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<usize> for RotationSet {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Where and how to draw one page, in millimetres from the page's
/// top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlacementInstruction {
    pub index: usize,
    pub orientation: Orientation,
    pub x_offset: f32,
    pub y_offset: f32,
    /// Rendered height; the width follows the image's aspect ratio.
    pub target_height: f32,
    /// Nominal width of the placement box.
    pub target_width: f32,
}

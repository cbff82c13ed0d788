// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page layout planner — pure geometry, no I/O.
//
// Portrait pages fill the canvas height from the top-left corner. Landscape
// pages go on a turned page whose height is the canvas width; the source is
// assumed to have a fixed aspect ratio (4:3 by default) and is centred
// horizontally with an offset that depends only on the canvas.

use comicpress_core::types::{CanvasSize, Orientation, PlacementInstruction, RotationSet};
use tracing::debug;

use crate::raster::PageImage;

/// Computes one `PlacementInstruction` per page.
#[derive(Debug, Clone, Copy)]
pub struct PageLayoutPlanner {
    /// Long / short edge ratio assumed for landscape pages.
    landscape_aspect: f32,
}

impl Default for PageLayoutPlanner {
    fn default() -> Self {
        Self::new(4.0 / 3.0)
    }
}

impl PageLayoutPlanner {
    pub fn new(landscape_aspect: f32) -> Self {
        Self { landscape_aspect }
    }

    /// Plan every page of a normalized batch, in index order.
    pub fn plan(
        &self,
        pages: &[PageImage],
        rotation: &RotationSet,
        canvas: CanvasSize,
    ) -> Vec<PlacementInstruction> {
        self.plan_indices(pages.iter().map(PageImage::index), rotation, canvas)
    }

    /// Same as [`plan`](Self::plan) but for bare page indices.
    pub fn plan_indices(
        &self,
        indices: impl IntoIterator<Item = usize>,
        rotation: &RotationSet,
        canvas: CanvasSize,
    ) -> Vec<PlacementInstruction> {
        let offset_x = canvas.landscape_offset_x(self.landscape_aspect);

        let plan: Vec<PlacementInstruction> = indices
            .into_iter()
            .map(|index| {
                if rotation.contains(index) {
                    PlacementInstruction {
                        index,
                        orientation: Orientation::Landscape,
                        x_offset: offset_x,
                        y_offset: 0.0,
                        target_height: canvas.width_mm,
                        target_width: canvas.width_mm * self.landscape_aspect,
                    }
                } else {
                    PlacementInstruction {
                        index,
                        orientation: Orientation::Portrait,
                        x_offset: 0.0,
                        y_offset: 0.0,
                        target_height: canvas.height_mm,
                        target_width: canvas.width_mm,
                    }
                }
            })
            .collect();

        debug!(
            pages = plan.len(),
            landscape = rotation.len(),
            offset_x,
            "layout planned"
        );
        plan
    }
}

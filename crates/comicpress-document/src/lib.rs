// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// comicpress-document — Page processing for Comicpress.
//
// Provides banner detection and removal across a batch of comic pages, the
// page layout planner, PDF assembly, and the page store the pages live in
// between those steps.

pub mod layout;
pub mod normalize;
pub mod pdf;
pub mod progress;
pub mod raster;
pub mod store;

// Re-export the primary structs so callers can use `comicpress_document::BannerNormalizer` etc.
pub use layout::PageLayoutPlanner;
pub use normalize::{BannerNormalizer, NormalizedBatch};
pub use pdf::ComicPdfWriter;
pub use progress::{BatchProgress, NoProgress, Phase, ProgressReporter};
pub use raster::{ImageProcessor, PageImage};
pub use store::{DirectoryStore, PageStore};

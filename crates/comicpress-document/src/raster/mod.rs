// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Raster module — page images and the processor that crops and re-encodes them.

pub mod page;
pub mod processor;

pub use page::PageImage;
pub use processor::ImageProcessor;

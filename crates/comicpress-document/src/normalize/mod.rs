// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Normalize module — banner detection and removal.

pub mod banner;

pub use banner::{BannerNormalizer, NormalizedBatch};

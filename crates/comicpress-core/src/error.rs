// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Comicpress.
//
// Every variant is batch-scoped: a failure aborts the comic being processed,
// never the whole run.

use thiserror::Error;

/// Top-level error type for all Comicpress operations.
#[derive(Debug, Error)]
pub enum ComicpressError {
    // -- Normalization errors --
    #[error("a batch needs at least 2 pages, found {found}")]
    InsufficientPages { found: usize },

    #[error("banner geometry is ambiguous: page and banner height are both {height}px")]
    AmbiguousBanner { height: u32 },

    // -- Source / decode errors --
    #[error("failed to decode page {index}: {reason}")]
    Decode { index: usize, reason: String },

    #[error("page selection mismatch: {0}")]
    SourceSelectorMismatch(String),

    // -- Document errors --
    #[error("image processing failed: {0}")]
    ImageError(String),

    #[error("PDF operation failed: {0}")]
    PdfError(String),

    // -- Configuration --
    #[error("invalid configuration: {0}")]
    Config(String),

    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, ComicpressError>;

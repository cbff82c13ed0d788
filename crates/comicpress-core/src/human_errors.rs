// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for a skipped comic.
//
// Every technical error is mapped to plain English with a suggestion. The
// severity tells the batch runner whether running the same entry again could
// help.

use crate::error::ComicpressError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Disk hiccup or similar; running again may succeed.
    Transient,
    /// The user must fix something (entries file, config, source folder).
    ActionRequired,
    /// The comic itself cannot be normalized by this heuristic.
    Permanent,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// One-line summary.
    pub message: String,
    /// What the user should try.
    pub suggestion: String,
    /// Whether re-running the entry could succeed.
    pub retriable: bool,
    pub severity: Severity,
}

/// Convert a `ComicpressError` into a `HumanError` for the console report.
pub fn humanize_error(err: &ComicpressError) -> HumanError {
    match err {
        ComicpressError::InsufficientPages { found } => HumanError {
            message: format!("Only {found} page(s) found; comics need at least 2."),
            suggestion: "Single-image comics are not supported. Check that the source folder holds every page.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        ComicpressError::AmbiguousBanner { .. } => HumanError {
            message: "Could not tell the banner apart from the page.".into(),
            suggestion: "The reference page looks unusual for this comic. Try a different reference page in the config.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        ComicpressError::Decode { index, .. } => HumanError {
            message: format!("Page {index} could not be read."),
            suggestion: "The image may be damaged or truncated. Replace it and try again.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        ComicpressError::SourceSelectorMismatch(detail) => HumanError {
            message: "No usable pages were found for this entry.".into(),
            suggestion: format!("Check the entry line and its source folder. ({detail})"),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        ComicpressError::ImageError(_) => HumanError {
            message: "A page could not be processed.".into(),
            suggestion: "The image may be in an unusual format. Try saving it as a JPEG or PNG first.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        ComicpressError::PdfError(_) => HumanError {
            message: "The PDF could not be assembled.".into(),
            suggestion: "If this keeps happening, please report it.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        ComicpressError::Config(detail) => HumanError {
            message: "The configuration is not valid.".into(),
            suggestion: format!("Fix the config file and run again. ({detail})"),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        ComicpressError::Io(io_err) => {
            if io_err.kind() == std::io::ErrorKind::NotFound {
                HumanError {
                    message: "A file or folder couldn't be found.".into(),
                    suggestion: "It may have been moved or deleted. Check the paths in the entries file.".into(),
                    retriable: false,
                    severity: Severity::ActionRequired,
                }
            } else if io_err.kind() == std::io::ErrorKind::PermissionDenied {
                HumanError {
                    message: "Permission denied while reading or writing pages.".into(),
                    suggestion: "Check the permissions of the work and output folders.".into(),
                    retriable: false,
                    severity: Severity::ActionRequired,
                }
            } else {
                HumanError {
                    message: "There was a problem reading or writing a file.".into(),
                    suggestion: "If this keeps happening, your disk may be full.".into(),
                    retriable: true,
                    severity: Severity::Transient,
                }
            }
        }

        ComicpressError::Serialization(_) => HumanError {
            message: "The config file could not be read.".into(),
            suggestion: "Check that it is valid JSON, or delete it to use the defaults.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },
    }
}

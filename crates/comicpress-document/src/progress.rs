// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Progress notifications. Reporters only observe; nothing they do feeds back
// into processing.

/// Processing phases of one comic, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Fetching,
    Cropping,
    AddingPages,
    Exporting,
    Complete,
}

impl Phase {
    pub const ALL: [Phase; 5] = [
        Phase::Fetching,
        Phase::Cropping,
        Phase::AddingPages,
        Phase::Exporting,
        Phase::Complete,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Fetching => "Fetching",
            Self::Cropping => "Cropping",
            Self::AddingPages => "Adding Pages",
            Self::Exporting => "Exporting PDF",
            Self::Complete => "Complete!",
        }
    }

    /// Zero-based position among all phases.
    pub fn step(&self) -> usize {
        match self {
            Self::Fetching => 0,
            Self::Cropping => 1,
            Self::AddingPages => 2,
            Self::Exporting => 3,
            Self::Complete => 4,
        }
    }

    /// Length of the longest label.
    pub fn max_label_len() -> usize {
        Self::ALL.iter().map(|p| p.label().len()).max().unwrap_or(0)
    }
}

/// Receives `(name, phase, current, total)` after each unit of work.
pub trait ProgressReporter {
    fn report(&self, name: &str, phase: Phase, current: usize, total: usize);
}

/// Reporter that discards everything.
pub struct NoProgress;

impl ProgressReporter for NoProgress {
    fn report(&self, _name: &str, _phase: Phase, _current: usize, _total: usize) {}
}

static NO_PROGRESS: NoProgress = NoProgress;

/// A reporter bound to the comic currently being processed.
#[derive(Clone, Copy)]
pub struct BatchProgress<'a> {
    name: &'a str,
    reporter: &'a dyn ProgressReporter,
}

impl<'a> BatchProgress<'a> {
    pub fn new(name: &'a str, reporter: &'a dyn ProgressReporter) -> Self {
        Self { name, reporter }
    }

    pub fn silent() -> BatchProgress<'static> {
        BatchProgress {
            name: "",
            reporter: &NO_PROGRESS,
        }
    }

    pub fn name(&self) -> &str {
        self.name
    }

    pub fn report(&self, phase: Phase, current: usize, total: usize) {
        self.reporter.report(self.name, phase, current, total);
    }
}

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Console progress line: comic title, current phase, and a bar split into one
// equal segment per phase. The line is redrawn in place until the comic
// completes.

use std::io::Write;

use comicpress_document::{Phase, ProgressReporter};

/// Total width of the bar, excluding brackets.
pub const BAR_LEN: usize = 50;
/// Width the title is padded to.
const TITLE_LEN: usize = 40;

fn step_size() -> usize {
    BAR_LEN / Phase::ALL.len()
}

/// `[|||||     …]` for `current` of `total` within `phase`.
pub fn progress_bar(phase: Phase, current: usize, total: usize) -> String {
    let step = step_size();
    let filled = (phase.step() * step + step * current / total.max(1)).min(BAR_LEN);
    format!("[{:<width$}]", "|".repeat(filled), width = BAR_LEN)
}

pub fn status_line(name: &str, phase: Phase, current: usize, total: usize) -> String {
    format!(
        "{:<title$}{:^status$}{}",
        name,
        phase.label(),
        progress_bar(phase, current, total),
        title = TITLE_LEN,
        status = Phase::max_label_len() + 1,
    )
}

/// Draws the status line on stdout.
pub struct ConsoleProgress;

impl ProgressReporter for ConsoleProgress {
    fn report(&self, name: &str, phase: Phase, current: usize, total: usize) {
        let line = status_line(name, phase, current, total);
        let mut out = std::io::stdout().lock();
        // Progress output is best effort; a closed stdout must not fail the batch.
        let _ = if phase == Phase::Complete {
            writeln!(out, "{line}")
        } else {
            write!(out, "{line}\r")
        };
        let _ = out.flush();
    }
}

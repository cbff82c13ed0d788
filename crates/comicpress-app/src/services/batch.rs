// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Batch runner — takes each comic from its source folder to a finished PDF.
//
// Every error is scoped to one comic: it is reported with its name and the
// run moves on to the next entry.

use std::path::PathBuf;

use comicpress_core::AppConfig;
use comicpress_core::error::{ComicpressError, Result};
use comicpress_core::human_errors::{HumanError, Severity, humanize_error};
use comicpress_core::types::CanvasSize;
use comicpress_document::{
    BannerNormalizer, BatchProgress, ComicPdfWriter, DirectoryStore, PageImage,
    PageLayoutPlanner, PageStore, Phase, ProgressReporter,
};
use tracing::{error, info, instrument, warn};

use super::entries::{Entry, ParsedLine};

/// Tally of a run over the entries file.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub succeeded: usize,
    pub failed: usize,
}

impl RunSummary {
    /// True when there was work and none of it succeeded.
    pub fn all_failed(&self) -> bool {
        self.failed > 0 && self.succeeded == 0
    }
}

pub struct BatchRunner<'a> {
    config: AppConfig,
    normalizer: BannerNormalizer,
    planner: PageLayoutPlanner,
    reporter: &'a dyn ProgressReporter,
}

impl<'a> BatchRunner<'a> {
    pub fn new(config: AppConfig, reporter: &'a dyn ProgressReporter) -> Self {
        let normalizer =
            BannerNormalizer::new(config.thresholds).with_reference_index(config.reference_index);
        let planner = PageLayoutPlanner::new(config.landscape_aspect);
        Self {
            config,
            normalizer,
            planner,
            reporter,
        }
    }

    /// Process one comic and return the path of its PDF.
    #[instrument(skip(self), fields(name = %entry.name))]
    pub fn run_entry(&self, entry: &Entry) -> Result<PathBuf> {
        let progress = BatchProgress::new(&entry.name, self.reporter);

        let store =
            DirectoryStore::open(&self.config.work_dir, &entry.name, self.config.jpeg_quality)?;
        store.ingest_from(&entry.source, progress)?;
        let pages = store.load_all()?;

        let normalized = self.normalizer.normalize(pages, &store, progress)?;

        let canvas = self.canvas_for(&normalized.pages);

        let plan = self
            .planner
            .plan(&normalized.pages, &normalized.rotation, canvas);

        std::fs::create_dir_all(&self.config.output_dir)?;
        let output = self.config.output_dir.join(format!("{}.pdf", entry.name));
        let mut writer = ComicPdfWriter::new(canvas);
        writer.set_title(entry.name.clone());
        writer.write_to_file(&plan, normalized.pages, progress, &output)?;

        progress.report(Phase::Complete, 1, 1);
        info!(
            path = %output.display(),
            cropped = normalized.cropped,
            landscape = normalized.rotation.len(),
            "comic complete"
        );
        Ok(output)
    }

    /// Canvas for a normalized comic: the configured one, or with adaptive
    /// canvas on, one shaped like the reference page.
    pub fn canvas_for(&self, pages: &[PageImage]) -> CanvasSize {
        if !self.config.adaptive_canvas {
            return self.config.canvas;
        }
        pages
            .get(self.config.reference_index)
            .map(|page| {
                let (width, height) = page.dimensions();
                self.config.canvas.adapted_to(width, height)
            })
            .unwrap_or(self.config.canvas)
    }

    /// Process every parsed line, skipping failed ones.
    pub fn run_all(&self, lines: &[ParsedLine]) -> RunSummary {
        let mut summary = RunSummary::default();
        for line in lines {
            match &line.entry {
                Ok(entry) => match self.run_entry(entry) {
                    Ok(_) => summary.succeeded += 1,
                    Err(err) => {
                        summary.failed += 1;
                        report_failure(&entry.name, &err);
                    }
                },
                Err(err) => {
                    summary.failed += 1;
                    report_failure(&format!("line {}", line.line_no), err);
                }
            }
        }
        summary
    }
}

/// Tell the user which comic was skipped and why.
fn report_failure(name: &str, err: &ComicpressError) {
    let human = humanize_error(err);
    match human.severity {
        Severity::Transient => warn!(name, error = %err, "comic skipped"),
        Severity::ActionRequired | Severity::Permanent => {
            error!(name, error = %err, "comic skipped")
        }
    }
    println!("\n{}", failure_line(name, &human));
}

/// `name: message suggestion`, plus a hint when running again could help.
fn failure_line(name: &str, human: &HumanError) -> String {
    let mut line = format!("{name}: {} {}", human.message, human.suggestion);
    if human.retriable {
        line.push_str(" Running again may help.");
    }
    line
}

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF writer — assemble a comic from placement instructions using `printpdf`
// 0.8.
//
// printpdf 0.8 uses a data-oriented API: documents are built by constructing
// `PdfPage` structs containing `Vec<Op>` operation lists, then serialised via
// `PdfDocument::save()`. Its origin is the bottom-left corner, while
// placement instructions measure from the top-left.

use std::path::Path;

use comicpress_core::error::{ComicpressError, Result};
use comicpress_core::types::{CanvasSize, PlacementInstruction};
use printpdf::{
    Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Pt, RawImage, RawImageData,
    RawImageFormat, XObjectTransform,
};
use tracing::{debug, info, instrument};

use crate::progress::{BatchProgress, Phase};
use crate::raster::PageImage;

/// Images are embedded at 72 dpi so one pixel is one point before scaling.
const EMBED_DPI: f32 = 72.0;

/// Lays out one PDF page per placement instruction.
pub struct ComicPdfWriter {
    canvas: CanvasSize,
    /// Title metadata embedded in the PDF /Info dictionary.
    title: Option<String>,
}

impl ComicPdfWriter {
    pub fn new(canvas: CanvasSize) -> Self {
        Self {
            canvas,
            title: None,
        }
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    /// Build the document. `pages` must line up with `instructions` index for
    /// index; each page is dropped once embedded.
    #[instrument(skip_all, fields(pages = pages.len()))]
    pub fn render(
        &self,
        instructions: &[PlacementInstruction],
        pages: Vec<PageImage>,
        progress: BatchProgress<'_>,
    ) -> Result<Vec<u8>> {
        if instructions.len() != pages.len() {
            return Err(ComicpressError::PdfError(format!(
                "{} placement instructions for {} pages",
                instructions.len(),
                pages.len()
            )));
        }

        let title = self.title.as_deref().unwrap_or("Comicpress Comic");
        info!(title, canvas = ?self.canvas, "Creating comic PDF");

        let mut doc = PdfDocument::new(title);
        let mut pdf_pages: Vec<PdfPage> = Vec::with_capacity(pages.len());
        let total = pages.len();

        for (position, (placement, page)) in instructions.iter().zip(pages).enumerate() {
            if placement.index != page.index() {
                return Err(ComicpressError::PdfError(format!(
                    "instruction for page {} paired with page {}",
                    placement.index,
                    page.index()
                )));
            }
            progress.report(Phase::AddingPages, position + 1, total);

            let (page_w_mm, page_h_mm) = placement.orientation.page_size_mm(self.canvas);
            let (img_w, img_h) = page.dimensions();
            if img_h == 0 {
                return Err(ComicpressError::PdfError(format!(
                    "page {} has zero height",
                    placement.index
                )));
            }

            let rgb = page.into_image().into_rgb8();
            let raw = RawImage {
                pixels: RawImageData::U8(rgb.into_raw()),
                width: img_w as usize,
                height: img_h as usize,
                data_format: RawImageFormat::RGB8,
                tag: Vec::new(),
            };
            let xobject_id = doc.add_image(&raw);

            let target_h_pt = Mm(placement.target_height).into_pt().0;
            let scale = target_h_pt / img_h as f32;
            let page_h_pt = Mm(page_h_mm).into_pt().0;
            let x_pt = Mm(placement.x_offset).into_pt().0;
            let y_pt = page_h_pt - Mm(placement.y_offset).into_pt().0 - target_h_pt;

            let ops = vec![Op::UseXobject {
                id: xobject_id,
                transform: XObjectTransform {
                    translate_x: Some(Pt(x_pt)),
                    translate_y: Some(Pt(y_pt)),
                    scale_x: Some(scale),
                    scale_y: Some(scale),
                    dpi: Some(EMBED_DPI),
                    rotate: None,
                },
            }];

            debug!(
                index = placement.index,
                orientation = ?placement.orientation,
                scale,
                "page placed"
            );
            pdf_pages.push(PdfPage::new(Mm(page_w_mm), Mm(page_h_mm), ops));
        }

        doc.with_pages(pdf_pages);

        progress.report(Phase::Exporting, 0, 1);
        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let output = doc.save(&PdfSaveOptions::default(), &mut warnings);
        debug!(bytes = output.len(), warnings = warnings.len(), "PDF serialised");

        Ok(output)
    }

    /// Render and write the PDF to `path`.
    pub fn write_to_file(
        &self,
        instructions: &[PlacementInstruction],
        pages: Vec<PageImage>,
        progress: BatchProgress<'_>,
        path: impl AsRef<Path>,
    ) -> Result<()> {
        let bytes = self.render(instructions, pages, progress)?;
        std::fs::write(path.as_ref(), &bytes)?;
        info!("Wrote comic PDF to {}", path.as_ref().display());
        Ok(())
    }
}

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Banner normalization — find how the host inserted its advertising banner
// and crop it off every affected page.
//
// The host uses one of two layouts per comic:
//
// * taller pages: the banner is a strip appended below the page, so banner
//   pages share the normal width but are taller;
// * narrower pages: the page was shrunk and a fixed-height strip added at
//   the bottom, so banner pages share the normal height but are narrower.
//
// Detection compares every portrait page against a reference page (the second
// one by default, since first pages are often covers of odd size) and picks
// the first page whose width or height differs by a plausible banner amount.

use comicpress_core::config::BannerThresholds;
use comicpress_core::error::{ComicpressError, Result};
use comicpress_core::types::{BannerGeometry, RotationSet, ScanOutcome};
use tracing::{debug, info, instrument, warn};

use crate::progress::{BatchProgress, Phase};
use crate::raster::PageImage;
use crate::store::PageStore;

/// Outcome of normalizing one batch.
#[derive(Debug)]
pub struct NormalizedBatch {
    /// Pages in index order, cropped where the banner was found.
    pub pages: Vec<PageImage>,
    pub geometry: BannerGeometry,
    /// Landscape pages, to be placed on turned pages.
    pub rotation: RotationSet,
    /// Number of pages that were cropped.
    pub cropped: usize,
}

/// Detects and removes banners across a batch of pages.
///
/// Holds no state between batches; one normalizer can process any number of
/// comics.
#[derive(Debug, Clone)]
pub struct BannerNormalizer {
    thresholds: BannerThresholds,
    reference_index: usize,
}

impl Default for BannerNormalizer {
    fn default() -> Self {
        Self::new(BannerThresholds::default())
    }
}

impl BannerNormalizer {
    pub fn new(thresholds: BannerThresholds) -> Self {
        Self {
            thresholds,
            reference_index: 1,
        }
    }

    /// Measure divergence against page `index` instead of the second page.
    pub fn with_reference_index(mut self, index: usize) -> Self {
        self.reference_index = index;
        self
    }

    /// Indices of all pages wider than tall.
    pub fn classify(pages: &[PageImage]) -> RotationSet {
        pages
            .iter()
            .filter(|p| p.is_landscape())
            .map(PageImage::index)
            .collect()
    }

    /// Reference `(width, height)`, checking the batch is large enough.
    fn reference(&self, dims: &[(u32, u32)]) -> Result<(u32, u32)> {
        if dims.len() < 2 {
            return Err(ComicpressError::InsufficientPages { found: dims.len() });
        }
        dims.get(self.reference_index).copied().ok_or_else(|| {
            ComicpressError::Config(format!(
                "reference page {} is outside a batch of {} pages",
                self.reference_index,
                dims.len()
            ))
        })
    }

    /// Find the first portrait page whose width or height differs from the
    /// reference by an amount inside the configured band. Landscape pages
    /// never stop the scan; the reference page is used as is.
    pub fn scan(&self, dims: &[(u32, u32)]) -> Result<ScanOutcome> {
        let (width_a, height_a) = self.reference(dims)?;
        let found = dims.iter().position(|&(width, height)| {
            width <= height
                && (self.thresholds.width_diverges(width.abs_diff(width_a))
                    || self.thresholds.height_diverges(height.abs_diff(height_a)))
        });
        Ok(match found {
            Some(index) => ScanOutcome::Found(index),
            None => ScanOutcome::NotFound,
        })
    }

    /// Derive the batch's banner geometry from page dimensions.
    #[instrument(skip_all, fields(pages = dims.len()))]
    pub fn detect(&self, dims: &[(u32, u32)]) -> Result<BannerGeometry> {
        let (width_a, height_a) = self.reference(dims)?;

        let index = match self.scan(dims)? {
            ScanOutcome::Found(index) => index,
            ScanOutcome::NotFound => {
                debug!("no page diverges from the reference");
                return Ok(BannerGeometry::None);
            }
        };
        let (width_b, height_b) = dims[index];
        debug!(index, width_a, height_a, width_b, height_b, "divergent page");

        if width_b == width_a {
            let actual_height = height_a.min(height_b);
            let banner_height = height_a.max(height_b);
            if actual_height == banner_height {
                return Err(ComicpressError::AmbiguousBanner {
                    height: actual_height,
                });
            }
            Ok(BannerGeometry::HeightPadding {
                actual_height,
                banner_height,
            })
        } else if height_b == height_a {
            Ok(BannerGeometry::WidthPadding {
                banner_width: width_a.min(width_b),
                banner_height_px: self.thresholds.width_banner_px,
            })
        } else {
            debug!("divergent page differs in both dimensions");
            Ok(BannerGeometry::None)
        }
    }

    /// Classify, detect and crop a whole batch.
    ///
    /// Every cropped page is persisted through `store` right after cropping.
    /// Page order and indices are preserved.
    #[instrument(skip_all, fields(name = progress.name(), pages = pages.len()))]
    pub fn normalize(
        &self,
        pages: Vec<PageImage>,
        store: &dyn PageStore,
        progress: BatchProgress<'_>,
    ) -> Result<NormalizedBatch> {
        let rotation = Self::classify(&pages);
        let dims: Vec<(u32, u32)> = pages.iter().map(PageImage::dimensions).collect();
        let geometry = self.detect(&dims)?;
        info!(?geometry, landscape = rotation.len(), "banner geometry detected");

        let (pages, cropped) = self.apply(geometry, &rotation, pages, store, progress)?;
        info!(cropped, "banner removal complete");

        Ok(NormalizedBatch {
            pages,
            geometry,
            rotation,
            cropped,
        })
    }

    /// Crop every page matching `geometry`, returning the pages and the crop
    /// count. Pages that no longer match (e.g. already cropped) are left alone.
    pub fn apply(
        &self,
        geometry: BannerGeometry,
        rotation: &RotationSet,
        pages: Vec<PageImage>,
        store: &dyn PageStore,
        progress: BatchProgress<'_>,
    ) -> Result<(Vec<PageImage>, usize)> {
        if geometry.is_none() {
            return Ok((pages, 0));
        }

        let total = pages.len();
        let mut cropped = 0;
        let mut out = Vec::with_capacity(total);

        for (position, page) in pages.into_iter().enumerate() {
            progress.report(Phase::Cropping, position + 1, total);
            let index = page.index();
            let page = match geometry {
                BannerGeometry::HeightPadding {
                    actual_height,
                    banner_height,
                } => {
                    if page.height() == banner_height {
                        Some(page.crop_to_height(actual_height))
                    } else {
                        out.push(page);
                        None
                    }
                }
                BannerGeometry::WidthPadding {
                    banner_width,
                    banner_height_px,
                } => {
                    if rotation.contains(index) {
                        out.push(page);
                        continue;
                    }
                    if page.width() != banner_width {
                        out.push(page);
                        None
                    } else if page.height() <= banner_height_px {
                        warn!(
                            index,
                            height = page.height(),
                            "page shorter than banner, left as is"
                        );
                        out.push(page);
                        None
                    } else {
                        let height = page.height() - banner_height_px;
                        Some(page.crop_to_height(height))
                    }
                }
                BannerGeometry::None => {
                    out.push(page);
                    None
                }
            };

            if let Some(page) = page {
                store.persist(&page)?;
                debug!(index, width = page.width(), height = page.height(), "page cropped");
                cropped += 1;
                out.push(page);
            }
        }

        Ok((out, cropped))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::ProgressReporter;
    use image::{DynamicImage, Rgb, RgbImage};
    use std::cell::RefCell;

    /// Reporter that keeps every `(phase, current, total)` it sees.
    #[derive(Default)]
    struct PhaseLog(RefCell<Vec<(Phase, usize, usize)>>);

    impl ProgressReporter for PhaseLog {
        fn report(&self, _name: &str, phase: Phase, current: usize, total: usize) {
            self.0.borrow_mut().push((phase, current, total));
        }
    }

    /// Store that records which pages were persisted.
    #[derive(Default)]
    struct RecordingStore {
        persisted: RefCell<Vec<(usize, u32, u32)>>,
    }

    impl PageStore for RecordingStore {
        fn load_all(&self) -> Result<Vec<PageImage>> {
            Ok(Vec::new())
        }

        fn persist(&self, page: &PageImage) -> Result<()> {
            self.persisted
                .borrow_mut()
                .push((page.index(), page.width(), page.height()));
            Ok(())
        }
    }

    fn batch(dims: &[(u32, u32)]) -> Vec<PageImage> {
        dims.iter()
            .enumerate()
            .map(|(i, &(w, h))| {
                PageImage::new(
                    i,
                    DynamicImage::ImageRgb8(RgbImage::from_pixel(w, h, Rgb([255, 255, 255]))),
                )
            })
            .collect()
    }

    fn dims_of(pages: &[PageImage]) -> Vec<(u32, u32)> {
        pages.iter().map(PageImage::dimensions).collect()
    }

    #[test]
    fn taller_pages_select_height_padding() {
        // Scenario A
        let normalizer = BannerNormalizer::default();
        let dims = [(800, 1200), (800, 1200), (800, 1300), (800, 1200)];
        assert_eq!(normalizer.scan(&dims).unwrap(), ScanOutcome::Found(2));
        assert_eq!(
            normalizer.detect(&dims).unwrap(),
            BannerGeometry::HeightPadding {
                actual_height: 1200,
                banner_height: 1300
            }
        );
    }

    #[test]
    fn height_padding_crops_every_tall_page() {
        let store = RecordingStore::default();
        let pages = batch(&[(800, 1300), (800, 1200), (800, 1300), (800, 1200)]);
        let result = BannerNormalizer::default()
            .normalize(pages, &store, BatchProgress::silent())
            .unwrap();

        assert_eq!(result.cropped, 2);
        assert!(dims_of(&result.pages).iter().all(|&d| d == (800, 1200)));
        assert_eq!(
            *store.persisted.borrow(),
            vec![(0, 800, 1200), (2, 800, 1200)]
        );
    }

    #[test]
    fn height_padding_also_crops_landscape_pages() {
        // A landscape page that happens to have the banner height is cropped
        // too; only the width branch exempts landscape pages.
        let store = RecordingStore::default();
        let pages = batch(&[(800, 1200), (800, 1200), (800, 1300), (1400, 1300)]);
        let result = BannerNormalizer::default()
            .normalize(pages, &store, BatchProgress::silent())
            .unwrap();

        assert!(result.rotation.contains(3));
        assert_eq!(result.pages[3].dimensions(), (1400, 1200));
        assert_eq!(result.cropped, 2);
    }

    #[test]
    fn landscape_page_does_not_hide_later_banner() {
        // The spread's height differs by 150 but it is landscape, so the scan
        // moves on to the real banner pages behind it.
        let dims = [(800, 1200), (800, 1200), (1400, 1050), (800, 1300), (800, 1300)];
        let normalizer = BannerNormalizer::default();
        assert_eq!(normalizer.scan(&dims).unwrap(), ScanOutcome::Found(3));

        let store = RecordingStore::default();
        let result = normalizer
            .normalize(batch(&dims), &store, BatchProgress::silent())
            .unwrap();
        assert_eq!(
            result.geometry,
            BannerGeometry::HeightPadding {
                actual_height: 1200,
                banner_height: 1300
            }
        );
        assert_eq!(
            dims_of(&result.pages),
            vec![(800, 1200), (800, 1200), (1400, 1050), (800, 1200), (800, 1200)]
        );
        assert!(result.rotation.contains(2));
    }

    #[test]
    fn narrower_pages_select_width_padding() {
        // Scenario B
        let dims = [(800, 1200), (800, 1200), (750, 1200), (800, 1200)];
        assert_eq!(
            BannerNormalizer::default().detect(&dims).unwrap(),
            BannerGeometry::WidthPadding {
                banner_width: 750,
                banner_height_px: 50
            }
        );
    }

    #[test]
    fn width_padding_skips_landscape_pages() {
        // Scenario D
        let store = RecordingStore::default();
        let pages = batch(&[(800, 1200), (800, 1200), (750, 1200), (750, 1200), (1200, 800)]);
        let result = BannerNormalizer::default()
            .normalize(pages, &store, BatchProgress::silent())
            .unwrap();

        assert!(result.rotation.contains(4));
        assert_eq!(
            dims_of(&result.pages),
            vec![(800, 1200), (800, 1200), (750, 1150), (750, 1150), (1200, 800)]
        );
        let touched: Vec<usize> = store.persisted.borrow().iter().map(|p| p.0).collect();
        assert_eq!(touched, vec![2, 3]);
    }

    #[test]
    fn width_padding_never_crops_rotated_index_even_if_width_matches() {
        let normalizer = BannerNormalizer::default();
        let store = RecordingStore::default();
        let geometry = BannerGeometry::WidthPadding {
            banner_width: 900,
            banner_height_px: 50,
        };
        let rotation: RotationSet = [0].into_iter().collect();
        let pages = batch(&[(900, 600), (900, 1300)]);

        let (pages, cropped) = normalizer
            .apply(geometry, &rotation, pages, &store, BatchProgress::silent())
            .unwrap();
        assert_eq!(cropped, 1);
        assert_eq!(pages[0].dimensions(), (900, 600));
        assert_eq!(pages[1].dimensions(), (900, 1250));
    }

    #[test]
    fn cropping_progress_reaches_total() {
        let log = PhaseLog::default();
        let store = RecordingStore::default();
        let pages = batch(&[(800, 1200), (800, 1200), (750, 1200), (1200, 800)]);
        BannerNormalizer::default()
            .normalize(pages, &store, BatchProgress::new("Saga", &log))
            .unwrap();

        let seen = log.0.borrow();
        let counts: Vec<usize> = seen.iter().map(|&(_, current, _)| current).collect();
        assert_eq!(counts, vec![1, 2, 3, 4]);
        assert!(seen.iter().all(|&(phase, _, total)| phase == Phase::Cropping && total == 4));
    }

    #[test]
    fn single_page_is_rejected() {
        // Scenario C
        let store = RecordingStore::default();
        let result =
            BannerNormalizer::default().normalize(batch(&[(800, 1200)]), &store, BatchProgress::silent());
        assert!(matches!(
            result,
            Err(ComicpressError::InsufficientPages { found: 1 })
        ));
    }

    #[test]
    fn empty_batch_is_rejected() {
        let result = BannerNormalizer::default().detect(&[]);
        assert!(matches!(
            result,
            Err(ComicpressError::InsufficientPages { found: 0 })
        ));
    }

    #[test]
    fn uniform_batch_passes_through() {
        let store = RecordingStore::default();
        let dims = [(800, 1200), (810, 1210), (790, 1195), (800, 1200)];
        let result = BannerNormalizer::default()
            .normalize(batch(&dims), &store, BatchProgress::silent())
            .unwrap();

        assert_eq!(result.geometry, BannerGeometry::None);
        assert_eq!(result.cropped, 0);
        assert_eq!(dims_of(&result.pages), dims.to_vec());
        assert!(store.persisted.borrow().is_empty());
    }

    #[test]
    fn implausible_differences_are_ignored() {
        // A double-page spread is far wider than any banner shift.
        let dims = [(800, 1200), (800, 1200), (1600, 1200), (800, 1500)];
        let normalizer = BannerNormalizer::default();
        assert_eq!(normalizer.scan(&dims).unwrap(), ScanOutcome::NotFound);
        assert_eq!(normalizer.detect(&dims).unwrap(), BannerGeometry::None);
    }

    #[test]
    fn scan_reports_first_page_even_before_reference() {
        let dims = [(800, 1300), (800, 1200), (800, 1200)];
        let normalizer = BannerNormalizer::default();
        assert_eq!(normalizer.scan(&dims).unwrap(), ScanOutcome::Found(0));
        assert_eq!(
            normalizer.detect(&dims).unwrap(),
            BannerGeometry::HeightPadding {
                actual_height: 1200,
                banner_height: 1300
            }
        );
    }

    #[test]
    fn both_dimensions_changed_means_no_crop() {
        let dims = [(800, 1200), (800, 1200), (740, 1290)];
        assert_eq!(
            BannerNormalizer::default().detect(&dims).unwrap(),
            BannerGeometry::None
        );
    }

    #[test]
    fn collapsed_heights_are_ambiguous() {
        // With the height noise floor at zero, an identical page "diverges"
        // and the detected heights collapse.
        let thresholds = BannerThresholds {
            height_noise_px: 0,
            ..BannerThresholds::default()
        };
        let dims = [(800, 1200), (800, 1200)];
        let result = BannerNormalizer::new(thresholds).detect(&dims);
        assert!(matches!(
            result,
            Err(ComicpressError::AmbiguousBanner { height: 1200 })
        ));
    }

    #[test]
    fn height_crop_is_idempotent() {
        let normalizer = BannerNormalizer::default();
        let store = RecordingStore::default();
        let geometry = BannerGeometry::HeightPadding {
            actual_height: 1200,
            banner_height: 1300,
        };
        let rotation = RotationSet::new();
        let pages = batch(&[(800, 1300), (800, 1200), (800, 1300)]);

        let (pages, first) = normalizer
            .apply(geometry, &rotation, pages, &store, BatchProgress::silent())
            .unwrap();
        let (pages, second) = normalizer
            .apply(geometry, &rotation, pages, &store, BatchProgress::silent())
            .unwrap();

        assert_eq!(first, 2);
        assert_eq!(second, 0);
        assert!(dims_of(&pages).iter().all(|&d| d == (800, 1200)));
    }

    #[test]
    fn custom_reference_page() {
        let dims = [(800, 1200), (800, 1300), (800, 1300)];
        let normalizer = BannerNormalizer::default().with_reference_index(0);
        assert_eq!(normalizer.scan(&dims).unwrap(), ScanOutcome::Found(1));
    }

    #[test]
    fn reference_outside_batch_is_config_error() {
        let normalizer = BannerNormalizer::default().with_reference_index(5);
        let result = normalizer.detect(&[(1, 1), (1, 1)]);
        assert!(matches!(result, Err(ComicpressError::Config(_))));
    }
}

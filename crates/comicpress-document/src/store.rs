// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page storage — where a comic's page images live between fetching, cropping
// and PDF assembly.
//
// Pages are stored as `<work_dir>/<clean_name>/<index>.<ext>`. Cropping
// overwrites a page in place; the file is found by its `<index>` stem.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use comicpress_core::error::{ComicpressError, Result};
use image::ImageFormat;
use tracing::{debug, info, instrument, warn};

use crate::progress::{BatchProgress, Phase};
use crate::raster::{ImageProcessor, PageImage};

/// Source and sink of a batch's page images.
pub trait PageStore {
    /// Decode every page in index order. The first page that fails to decode
    /// aborts the whole batch.
    fn load_all(&self) -> Result<Vec<PageImage>>;

    /// Write `page` back to its slot, replacing what was there.
    fn persist(&self, page: &PageImage) -> Result<()>;
}

/// Name used for a comic's working directory: spaces become underscores.
pub fn clean_name(name: &str) -> String {
    name.trim().replace(' ', "_")
}

/// Pages kept as numbered files in a directory.
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    dir: PathBuf,
    jpeg_quality: u8,
    /// Page files seen by the last `load_all`, keyed by index.
    paths: RefCell<BTreeMap<usize, PathBuf>>,
}

impl DirectoryStore {
    /// Open (creating if needed) the store for comic `name` under `work_dir`.
    pub fn open(work_dir: impl AsRef<Path>, name: &str, jpeg_quality: u8) -> Result<Self> {
        let dir = work_dir.as_ref().join(clean_name(name));
        std::fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            jpeg_quality,
            paths: RefCell::new(BTreeMap::new()),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Copy the images of `source` into the store as `0.<ext>`, `1.<ext>`, …
    /// in natural page order, replacing any pages from an earlier run.
    ///
    /// Returns the number of pages stored. A source without any image is a
    /// selector mismatch.
    #[instrument(skip_all, fields(source = %source.as_ref().display()))]
    pub fn ingest_from(
        &self,
        source: impl AsRef<Path>,
        progress: BatchProgress<'_>,
    ) -> Result<usize> {
        let source = source.as_ref();
        if !source.is_dir() {
            return Err(ComicpressError::SourceSelectorMismatch(format!(
                "{} is not a directory",
                source.display()
            )));
        }

        let pages = list_images(source)?;
        if pages.is_empty() {
            return Err(ComicpressError::SourceSelectorMismatch(format!(
                "no page images in {}",
                source.display()
            )));
        }

        for (_, stale) in self.page_paths()? {
            std::fs::remove_file(&stale)?;
        }
        self.paths.borrow_mut().clear();

        let total = pages.len();
        for (index, path) in pages.iter().enumerate() {
            progress.report(Phase::Fetching, index + 1, total);
            let ext = path
                .extension()
                .and_then(|e| e.to_str())
                .map(str::to_ascii_lowercase)
                .unwrap_or_else(|| "jpg".into());
            let target = self.dir.join(format!("{index}.{ext}"));
            std::fs::copy(path, &target)?;
            debug!(index, from = %path.display(), "page stored");
        }

        info!(pages = total, dir = %self.dir.display(), "pages fetched");
        Ok(total)
    }

    /// Stored page files with their indices, in index order.
    fn page_paths(&self) -> Result<Vec<(usize, PathBuf)>> {
        let mut numbered: Vec<(usize, PathBuf)> = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if !path.is_file() || ImageFormat::from_path(&path).is_err() {
                continue;
            }
            match path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(|s| s.parse::<usize>().ok())
            {
                Some(index) => numbered.push((index, path)),
                None => warn!(path = %path.display(), "ignoring unnumbered file in store"),
            }
        }
        numbered.sort_by_key(|(index, _)| *index);
        Ok(numbered)
    }

    /// File holding page `index`, whatever its extension.
    fn path_for(&self, index: usize) -> Result<PathBuf> {
        if let Some(path) = self.paths.borrow().get(&index) {
            return Ok(path.clone());
        }
        let path = self
            .page_paths()?
            .into_iter()
            .find(|(stored, _)| *stored == index)
            .map(|(_, path)| path)
            .ok_or_else(|| {
                ComicpressError::SourceSelectorMismatch(format!(
                    "page {index} missing from {}",
                    self.dir.display()
                ))
            })?;
        self.paths.borrow_mut().insert(index, path.clone());
        Ok(path)
    }
}

impl PageStore for DirectoryStore {
    #[instrument(skip(self), fields(dir = %self.dir.display()))]
    fn load_all(&self) -> Result<Vec<PageImage>> {
        let paths = self.page_paths()?;
        let mut pages = Vec::with_capacity(paths.len());
        for (index, path) in &paths {
            let image = ImageProcessor::open(path)
                .map_err(|err| ComicpressError::Decode {
                    index: *index,
                    reason: err.to_string(),
                })?
                .into_dynamic();
            pages.push(PageImage::new(*index, image));
        }
        debug!(pages = pages.len(), "pages decoded");
        *self.paths.borrow_mut() = paths.into_iter().collect();
        Ok(pages)
    }

    fn persist(&self, page: &PageImage) -> Result<()> {
        let path = self.path_for(page.index())?;
        ImageProcessor::from_dynamic(page.image().clone()).save(&path, self.jpeg_quality)
    }
}

/// Image files directly inside `dir`, numeric stems first (by value), then
/// the rest by name.
fn list_images(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && ImageFormat::from_path(&path).is_ok() {
            files.push(path);
        }
    }
    files.sort_by_key(|path| {
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_owned();
        let number = stem.parse::<u64>().ok();
        (number.is_none(), number, stem)
    });
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, Rgb, RgbImage};

    fn write_png(dir: &Path, file: &str, width: u32, height: u32) {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([9, 9, 9])));
        img.save(dir.join(file)).unwrap();
    }

    #[test]
    fn clean_name_replaces_spaces() {
        assert_eq!(clean_name(" Saga Vol 1 "), "Saga_Vol_1");
    }

    #[test]
    fn ingest_orders_pages_naturally() {
        let source = tempfile::tempdir().unwrap();
        write_png(source.path(), "10.png", 10, 20);
        write_png(source.path(), "2.png", 2, 20);
        write_png(source.path(), "1.png", 1, 20);
        std::fs::write(source.path().join("notes.txt"), "skip me").unwrap();

        let work = tempfile::tempdir().unwrap();
        let store = DirectoryStore::open(work.path(), "My Comic", 90).unwrap();
        let count = store.ingest_from(source.path(), BatchProgress::silent()).unwrap();
        assert_eq!(count, 3);
        assert!(store.dir().ends_with("My_Comic"));

        let widths: Vec<u32> = store.load_all().unwrap().iter().map(|p| p.width()).collect();
        assert_eq!(widths, vec![1, 2, 10]);
    }

    #[test]
    fn empty_source_is_selector_mismatch() {
        let source = tempfile::tempdir().unwrap();
        let work = tempfile::tempdir().unwrap();
        let store = DirectoryStore::open(work.path(), "empty", 90).unwrap();
        let result = store.ingest_from(source.path(), BatchProgress::silent());
        assert!(matches!(result, Err(ComicpressError::SourceSelectorMismatch(_))));
    }

    #[test]
    fn corrupt_page_fails_whole_batch() {
        let work = tempfile::tempdir().unwrap();
        let store = DirectoryStore::open(work.path(), "broken", 90).unwrap();
        write_png(store.dir(), "0.png", 4, 6);
        std::fs::write(store.dir().join("1.png"), b"definitely not png").unwrap();

        let result = store.load_all();
        assert!(matches!(result, Err(ComicpressError::Decode { index: 1, .. })));
    }

    #[test]
    fn persist_overwrites_in_place() {
        let work = tempfile::tempdir().unwrap();
        let store = DirectoryStore::open(work.path(), "crop", 90).unwrap();
        write_png(store.dir(), "0.png", 8, 13);
        write_png(store.dir(), "1.png", 8, 12);

        let pages = store.load_all().unwrap();
        let cropped = pages[0].clone().crop_to_height(12);
        store.persist(&cropped).unwrap();

        let reloaded = store.load_all().unwrap();
        assert_eq!(reloaded[0].dimensions(), (8, 12));
        assert_eq!(reloaded.len(), 2);
    }

    #[test]
    fn persist_finds_page_by_its_number() {
        // No page 1 on disk: page 2 must still land in `2.png`, not in the
        // second file of the listing.
        let work = tempfile::tempdir().unwrap();
        let store = DirectoryStore::open(work.path(), "gaps", 90).unwrap();
        write_png(store.dir(), "0.png", 8, 12);
        write_png(store.dir(), "2.jpg", 8, 13);
        write_png(store.dir(), "3.png", 8, 12);

        let pages = store.load_all().unwrap();
        let indices: Vec<usize> = pages.iter().map(PageImage::index).collect();
        assert_eq!(indices, vec![0, 2, 3]);

        store.persist(&pages[1].clone().crop_to_height(12)).unwrap();
        let reloaded = store.load_all().unwrap();
        assert_eq!(reloaded[1].dimensions(), (8, 12));
        assert_eq!(reloaded[2].dimensions(), (8, 12));
        assert!(store.dir().join("2.jpg").exists());
    }

    #[test]
    fn persist_without_load_looks_up_the_file() {
        let work = tempfile::tempdir().unwrap();
        let store = DirectoryStore::open(work.path(), "cold", 90).unwrap();
        write_png(store.dir(), "0.png", 6, 9);
        write_png(store.dir(), "1.png", 6, 9);

        let page = PageImage::new(
            1,
            image::DynamicImage::ImageRgb8(image::RgbImage::new(6, 7)),
        );
        store.persist(&page).unwrap();
        assert_eq!(store.load_all().unwrap()[1].dimensions(), (6, 7));

        let missing = PageImage::new(
            5,
            image::DynamicImage::ImageRgb8(image::RgbImage::new(6, 7)),
        );
        assert!(matches!(
            store.persist(&missing),
            Err(ComicpressError::SourceSelectorMismatch(_))
        ));
    }

    #[test]
    fn reingest_drops_stale_pages() {
        let work = tempfile::tempdir().unwrap();
        let store = DirectoryStore::open(work.path(), "again", 90).unwrap();

        let first = tempfile::tempdir().unwrap();
        for i in 0..3 {
            write_png(first.path(), &format!("{i}.png"), 4, 4);
        }
        store.ingest_from(first.path(), BatchProgress::silent()).unwrap();

        let second = tempfile::tempdir().unwrap();
        write_png(second.path(), "a.png", 4, 4);
        write_png(second.path(), "b.png", 4, 4);
        store.ingest_from(second.path(), BatchProgress::silent()).unwrap();

        assert_eq!(store.load_all().unwrap().len(), 2);
    }
}

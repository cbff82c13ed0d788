// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// A decoded comic page together with its position in download order.

use image::DynamicImage;

use super::processor::ImageProcessor;

/// One page of a batch.
///
/// `index` is the page's position in the original download order and never
/// changes, even after cropping.
#[derive(Debug, Clone)]
pub struct PageImage {
    index: usize,
    image: DynamicImage,
}

impl PageImage {
    pub fn new(index: usize, image: DynamicImage) -> Self {
        Self { index, image }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.image.width(), self.image.height())
    }

    /// Wider than tall; such pages go on a turned page in the PDF.
    pub fn is_landscape(&self) -> bool {
        self.width() > self.height()
    }

    pub fn image(&self) -> &DynamicImage {
        &self.image
    }

    pub fn into_image(self) -> DynamicImage {
        self.image
    }

    /// Keep the top `height` rows, dropping everything below.
    pub fn crop_to_height(self, height: u32) -> Self {
        let width = self.width();
        let cropped = ImageProcessor::from_dynamic(self.image)
            .crop(0, 0, width, height)
            .into_dynamic();
        Self {
            index: self.index,
            image: cropped,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn page(index: usize, width: u32, height: u32) -> PageImage {
        PageImage::new(
            index,
            DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([0, 0, 0]))),
        )
    }

    #[test]
    fn landscape_means_strictly_wider() {
        assert!(page(0, 12, 8).is_landscape());
        assert!(!page(0, 8, 12).is_landscape());
        assert!(!page(0, 10, 10).is_landscape());
    }

    #[test]
    fn crop_keeps_index_and_width() {
        let cropped = page(4, 8, 13).crop_to_height(12);
        assert_eq!(cropped.index(), 4);
        assert_eq!(cropped.dimensions(), (8, 12));
    }
}

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Binary rasters. Ink is 0, background is 255; every stage downstream of
// binarization relies on that convention.

use image::GrayImage;

/// Intensity of an ink (foreground) pixel.
pub const INK: u8 = 0;

/// Intensity of a background pixel.
pub const BACKGROUND: u8 = 255;

/// Read access to an 8-bit grid, implemented by whole rasters and fragments.
pub trait InkGrid {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// Intensity at column `x`, row `y`. Callers stay within bounds.
    fn level(&self, x: u32, y: u32) -> u8;

    fn is_ink(&self, x: u32, y: u32) -> bool {
        self.level(x, y) == INK
    }

    /// Number of ink and background pixels. Pixels at any other level count
    /// as neither.
    fn level_counts(&self) -> LevelCounts {
        let mut counts = LevelCounts::default();
        for y in 0..self.height() {
            for x in 0..self.width() {
                match self.level(x, y) {
                    INK => counts.ink += 1,
                    BACKGROUND => counts.background += 1,
                    _ => {}
                }
            }
        }
        counts.area = self.width() as u64 * self.height() as u64;
        counts
    }
}

/// Ink/background tallies for a raster or fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LevelCounts {
    pub ink: u64,
    pub background: u64,
    pub area: u64,
}

impl InkGrid for GrayImage {
    fn width(&self) -> u32 {
        self.dimensions().0
    }

    fn height(&self) -> u32 {
        self.dimensions().1
    }

    fn level(&self, x: u32, y: u32) -> u8 {
        self.get_pixel(x, y).0[0]
    }
}

/// A binary raster following the ink=0 / background=255 convention.
///
/// The convention is not checked on construction. A raster holding other
/// levels is not an error, it simply yields sparse or empty histograms.
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryRaster {
    image: GrayImage,
}

impl BinaryRaster {
    /// Wrap an already-binarised grayscale image.
    pub fn from_gray(image: GrayImage) -> Self {
        Self { image }
    }

    /// Borrow the underlying image.
    pub fn as_gray(&self) -> &GrayImage {
        &self.image
    }

    /// Consume the raster and return the underlying image.
    pub fn into_gray(self) -> GrayImage {
        self.image
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }
}

impl InkGrid for BinaryRaster {
    fn width(&self) -> u32 {
        self.image.width()
    }

    fn height(&self) -> u32 {
        self.image.height()
    }

    fn level(&self, x: u32, y: u32) -> u8 {
        self.image.get_pixel(x, y).0[0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn level_counts_ignore_intermediate_grays() {
        let mut img = GrayImage::from_pixel(4, 3, Luma([BACKGROUND]));
        img.put_pixel(0, 0, Luma([INK]));
        img.put_pixel(1, 0, Luma([INK]));
        img.put_pixel(2, 2, Luma([128]));

        let counts = BinaryRaster::from_gray(img).level_counts();
        assert_eq!(
            counts,
            LevelCounts {
                ink: 2,
                background: 9,
                area: 12
            }
        );
    }

    #[test]
    fn raster_and_image_agree() {
        let mut img = GrayImage::from_pixel(5, 5, Luma([BACKGROUND]));
        img.put_pixel(3, 1, Luma([INK]));
        let raster = BinaryRaster::from_gray(img.clone());
        assert!(raster.is_ink(3, 1));
        assert!(img.is_ink(3, 1));
        assert!(!raster.is_ink(1, 3));
        assert_eq!(raster.dimensions(), (5, 5));
        assert_eq!(raster.into_gray(), img);
    }
}

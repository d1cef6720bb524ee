// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Grayscale to binary conversion: Otsu, fixed-level and local adaptive
// thresholding. Dark pixels become ink (0), light pixels background (255).
// Otsu's level comes from imageproc, which picks the level maximising
// between-class variance with `[0, level]` as the darker class.

use image::{GrayImage, Luma};
use imageproc::contrast::otsu_level;
use imageproc::definitions::Image;
use imageproc::integral_image::integral_image;
use slant_core::BinarizationPolicy;
use tracing::{debug, instrument};

use crate::raster::{BACKGROUND, BinaryRaster, INK};

/// Binarise `gray` under `policy`.
#[instrument(skip(gray), fields(width = gray.width(), height = gray.height()))]
pub fn binarize(gray: &GrayImage, policy: BinarizationPolicy) -> BinaryRaster {
    let image = match policy {
        BinarizationPolicy::Otsu => {
            let level = otsu_level(gray);
            debug!(level, "Otsu threshold computed");
            threshold_global(gray, level)
        }
        BinarizationPolicy::Fixed { level } => threshold_global(gray, level),
        BinarizationPolicy::Adaptive {
            block_radius,
            offset,
        } => threshold_adaptive(gray, block_radius, offset),
    };
    BinaryRaster::from_gray(image)
}

/// Pixels strictly above `level` become background, the rest ink.
fn threshold_global(gray: &GrayImage, level: u8) -> GrayImage {
    let mut output = gray.clone();
    for pixel in output.pixels_mut() {
        pixel.0[0] = if pixel.0[0] > level { BACKGROUND } else { INK };
    }
    output
}

/// Local mean thresholding: a pixel darker than the mean of its
/// `(2r+1)²` neighbourhood minus `offset` becomes ink.
fn threshold_adaptive(gray: &GrayImage, block_radius: u32, offset: i32) -> GrayImage {
    let (width, height) = gray.dimensions();
    let sums = integral_image::<_, u64>(gray);

    GrayImage::from_fn(width, height, |x, y| {
        let local_mean = window_mean(&sums, x, y, block_radius);
        let threshold = (local_mean as i32).saturating_sub(offset).clamp(0, 255);
        let value = gray.get_pixel(x, y).0[0] as i32;
        Luma([if value < threshold { INK } else { BACKGROUND }])
    })
}

/// Mean intensity of the square window of `radius` around `(cx, cy)`,
/// clipped to the image. `sums` is the zero-padded summed-area table of the
/// image, one pixel wider and taller than it.
fn window_mean(sums: &Image<Luma<u64>>, cx: u32, cy: u32, radius: u32) -> f64 {
    let (width, height) = (sums.width() - 1, sums.height() - 1);
    let left = cx.saturating_sub(radius);
    let top = cy.saturating_sub(radius);
    let right = cx.saturating_add(radius).saturating_add(1).min(width);
    let bottom = cy.saturating_add(radius).saturating_add(1).min(height);

    let at = |x: u32, y: u32| sums.get_pixel(x, y).0[0];
    let total = at(right, bottom) + at(left, top) - at(right, top) - at(left, bottom);
    let area = (right - left) as u64 * (bottom - top) as u64;
    total as f64 / area as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::InkGrid;

    /// Left half dark "ink" at 40, right half paper at 210.
    fn two_tone(width: u32, height: u32) -> GrayImage {
        GrayImage::from_fn(width, height, |x, _| {
            Luma([if x < width / 2 { 40 } else { 210 }])
        })
    }

    #[test]
    fn otsu_splits_bimodal_image_between_modes() {
        let level = otsu_level(&two_tone(20, 10));
        assert!((40..210).contains(&level), "level {level} not between modes");
    }

    #[test]
    fn otsu_binarization_maps_dark_to_ink() {
        let raster = binarize(&two_tone(20, 10), BinarizationPolicy::Otsu);
        assert!(raster.is_ink(0, 0));
        assert!(raster.is_ink(9, 9));
        assert!(!raster.is_ink(10, 0));
        let counts = raster.level_counts();
        assert_eq!(counts.ink, 100);
        assert_eq!(counts.background, 100);
    }

    #[test]
    fn uniform_page_is_all_background_under_otsu() {
        let blank = GrayImage::from_pixel(16, 16, Luma([230]));
        let raster = binarize(&blank, BinarizationPolicy::Otsu);
        assert_eq!(raster.level_counts().ink, 0);
    }

    #[test]
    fn fixed_level_is_strictly_above_for_background() {
        let img = GrayImage::from_fn(3, 1, |x, _| Luma([[126u8, 127, 128][x as usize]]));
        let raster = binarize(&img, BinarizationPolicy::FIXED_MIDPOINT);
        assert!(raster.is_ink(0, 0));
        assert!(raster.is_ink(1, 0));
        assert!(!raster.is_ink(2, 0));
    }

    #[test]
    fn adaptive_picks_out_stroke_on_uneven_background() {
        // Background brightens left to right; a darker vertical stroke sits at
        // x = 30 and should still be ink after local thresholding.
        let img = GrayImage::from_fn(60, 20, |x, _| {
            let paper = 120 + (x * 2) as u8;
            Luma([if x == 30 { paper - 60 } else { paper }])
        });
        let raster = binarize(&img, BinarizationPolicy::ADAPTIVE_DEFAULT);
        for y in 0..20 {
            assert!(raster.is_ink(30, y));
            assert!(!raster.is_ink(10, y));
            assert!(!raster.is_ink(50, y));
        }
    }

    #[test]
    fn window_mean_of_constant_image() {
        let img = GrayImage::from_pixel(8, 8, Luma([100]));
        let sums = integral_image::<_, u64>(&img);
        assert!((window_mean(&sums, 0, 0, 3) - 100.0).abs() < 1e-9);
        assert!((window_mean(&sums, 4, 4, 10) - 100.0).abs() < 1e-9);
        assert!((window_mean(&sums, 7, 7, u32::MAX) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn window_mean_is_clipped_to_the_image() {
        // Left column 0, the rest 90: a radius-1 window at the corner
        // covers two zero pixels and two 90s.
        let img = GrayImage::from_fn(6, 6, |x, _| Luma([if x == 0 { 0 } else { 90 }]));
        let sums = integral_image::<_, u64>(&img);
        assert!((window_mean(&sums, 0, 0, 1) - 45.0).abs() < 1e-9);
    }

    #[test]
    fn extreme_adaptive_offsets_saturate() {
        let img = GrayImage::from_pixel(12, 12, Luma([100]));

        // Threshold pinned at 255: every pixel below it is ink.
        let all_ink = binarize(
            &img,
            BinarizationPolicy::Adaptive {
                block_radius: 3,
                offset: i32::MIN,
            },
        );
        assert_eq!(all_ink.level_counts().ink, 144);

        // Threshold pinned at 0: nothing is darker.
        let no_ink = binarize(
            &img,
            BinarizationPolicy::Adaptive {
                block_radius: 3,
                offset: i32::MAX,
            },
        );
        assert_eq!(no_ink.level_counts().ink, 0);
    }
}

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Morphological stroke boundary: 5x5 gradient masked by the binary raster,
// then inverted back to the ink=0 convention.

use image::GrayImage;
use imageproc::distance_transform::Norm;
use imageproc::morphology::{dilate, erode};
use tracing::{debug, instrument};

use crate::raster::BinaryRaster;

/// Chebyshev radius of the square structuring element (radius 2 gives 5x5).
pub const STRUCTURING_RADIUS: u8 = 2;

/// Intermediate images of the boundary computation.
#[derive(Debug, Clone)]
pub struct BoundaryStages {
    pub dilated: GrayImage,
    pub eroded: GrayImage,
    /// The final outline raster, ink=0 / background=255.
    pub boundary: BinaryRaster,
}

/// Extract the stroke outline of a binary raster.
///
/// Morphology treats non-zero pixels as set, so on an ink=0 raster the
/// operations act on the paper. Dilation minus erosion leaves a band two
/// pixels either side of every ink/paper edge. Masking that band with the
/// binary raster keeps the paper side of the band, and inverting turns it
/// into a thin ink outline hugging each stroke.
#[instrument(skip(binary), fields(width = binary.dimensions().0, height = binary.dimensions().1))]
pub fn stroke_boundary(binary: &BinaryRaster) -> BoundaryStages {
    let source = binary.as_gray();
    let dilated = dilate(source, Norm::LInf, STRUCTURING_RADIUS);
    let eroded = erode(source, Norm::LInf, STRUCTURING_RADIUS);

    let mut boundary = GrayImage::new(source.width(), source.height());
    let mut outline_pixels: u64 = 0;
    for (((out, d), e), b) in boundary
        .pixels_mut()
        .zip(dilated.pixels())
        .zip(eroded.pixels())
        .zip(source.pixels())
    {
        let gradient = d.0[0].saturating_sub(e.0[0]);
        let masked = gradient & b.0[0];
        if masked != 0 {
            outline_pixels += 1;
        }
        out.0[0] = !masked;
    }
    debug!(outline_pixels, "Stroke boundary extracted");

    BoundaryStages {
        dilated,
        eroded,
        boundary: BinaryRaster::from_gray(boundary),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::{BACKGROUND, INK, InkGrid};
    use image::Luma;

    /// A 30x30 page with a solid 10x10 ink block at [10, 20) × [10, 20).
    fn block_page() -> BinaryRaster {
        BinaryRaster::from_gray(GrayImage::from_fn(30, 30, |x, y| {
            let inside = (10..20).contains(&x) && (10..20).contains(&y);
            Luma([if inside { INK } else { BACKGROUND }])
        }))
    }

    #[test]
    fn blank_page_has_no_boundary() {
        let blank = BinaryRaster::from_gray(GrayImage::from_pixel(20, 20, Luma([BACKGROUND])));
        let stages = stroke_boundary(&blank);
        assert_eq!(stages.boundary.level_counts().ink, 0);
    }

    #[test]
    fn boundary_is_a_ring_around_the_block() {
        let stages = stroke_boundary(&block_page());
        let out = &stages.boundary;

        // Paper within two pixels of the block is outline.
        assert!(out.is_ink(8, 15));
        assert!(out.is_ink(9, 15));
        assert!(out.is_ink(20, 15));
        assert!(out.is_ink(21, 15));
        assert!(out.is_ink(15, 8));
        assert!(out.is_ink(15, 21));

        // The block interior and far paper are not.
        assert!(!out.is_ink(15, 15));
        assert!(!out.is_ink(10, 15));
        assert!(!out.is_ink(7, 15));
        assert!(!out.is_ink(2, 2));
    }

    #[test]
    fn boundary_stays_binary() {
        let stages = stroke_boundary(&block_page());
        let counts = stages.boundary.level_counts();
        assert_eq!(counts.ink + counts.background, counts.area);
        // 14x14 square minus the 10x10 block.
        assert_eq!(counts.ink, 14 * 14 - 10 * 10);
    }

    #[test]
    fn stages_bracket_the_block() {
        let stages = stroke_boundary(&block_page());
        // Paper grows over the block edge when dilated, ink grows outwards
        // when eroded; the block centre survives both.
        assert_eq!(stages.dilated.get_pixel(10, 15).0[0], BACKGROUND);
        assert_eq!(stages.dilated.get_pixel(12, 15).0[0], INK);
        assert_eq!(stages.eroded.get_pixel(8, 15).0[0], INK);
        assert_eq!(stages.eroded.get_pixel(7, 15).0[0], BACKGROUND);
        assert_eq!(stages.dilated.get_pixel(15, 15).0[0], INK);
    }

    #[test]
    fn input_is_left_untouched() {
        let page = block_page();
        let before = page.clone();
        let _ = stroke_boundary(&page);
        assert_eq!(page, before);
    }
}

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Slant histogram extraction. Every ink pixel is tested against 17
// four-pixel directional templates; each template that is fully inked adds
// one to its bin.

use slant_core::{BIN_COUNT, RawHistogram};
use tracing::{debug, instrument};

use crate::raster::InkGrid;

/// Pixels kept clear on the top, left and right edges. Templates reach at
/// most four pixels up or sideways and never downwards, so the bottom row is
/// scanned too.
pub const MARGIN: u32 = 4;

/// `(Δrow, Δcol)` offsets of one template; negative rows point up.
pub type Template = [(i32, i32); 4];

/// Directional templates, bin `k` approximating a run at `k × 180/17`
/// degrees counter-clockwise from rightward horizontal.
///
/// Two pairs of bins share their offsets: 9 with 15, and 10 with 14. The
/// duplicates are kept so vectors stay comparable with previously extracted
/// reference data, which means bin 15 always equals bin 9 and bin 14 always
/// equals bin 10.
pub const TEMPLATES: [Template; BIN_COUNT] = [
    [(0, 1), (0, 2), (0, 3), (0, 4)],
    [(0, 1), (-1, 2), (-1, 3), (-1, 4)],
    [(-1, 1), (-1, 2), (-2, 3), (-2, 4)],
    [(-1, 1), (-2, 2), (-2, 3), (-3, 4)],
    [(-1, 1), (-2, 2), (-3, 3), (-4, 4)],
    [(-1, 1), (-2, 2), (-3, 2), (-4, 3)],
    [(-1, 1), (-2, 1), (-3, 2), (-4, 2)],
    [(-1, 0), (-2, 1), (-3, 1), (-4, 1)],
    [(-1, 0), (-2, 0), (-3, 0), (-4, 0)],
    [(-1, 0), (-2, -1), (-3, -1), (-4, -1)],
    [(-1, -1), (-2, -1), (-3, -2), (-4, -2)],
    [(-1, -1), (-2, -2), (-3, -3), (-4, -3)],
    [(-1, -1), (-2, -2), (-3, -3), (-4, -4)],
    [(-1, -1), (-2, -2), (-3, -2), (-4, -3)],
    [(-1, -1), (-2, -1), (-3, -2), (-4, -2)],
    [(-1, 0), (-2, -1), (-3, -1), (-4, -1)],
    [(0, -1), (0, -2), (0, -3), (0, -4)],
];

/// Count template matches over every ink pixel of `grid` inside the margin.
///
/// Rasters narrower than `2 × MARGIN + 1` or shorter than `MARGIN + 1`
/// produce an all-zero histogram, as does a raster without ink.
#[instrument(skip(grid), fields(width = grid.width(), height = grid.height()))]
pub fn extract_histogram<G: InkGrid + ?Sized>(grid: &G) -> RawHistogram {
    let mut counts = [0u64; BIN_COUNT];
    let (width, height) = (grid.width(), grid.height());
    let x_end = width.saturating_sub(MARGIN);

    for y in MARGIN..height {
        for x in MARGIN..x_end {
            if !grid.is_ink(x, y) {
                continue;
            }
            for (bin, template) in TEMPLATES.iter().enumerate() {
                if matches_template(grid, x, y, template) {
                    counts[bin] += 1;
                }
            }
        }
    }

    let histogram = RawHistogram::from(counts);
    debug!(total = histogram.total(), "Slant histogram extracted");
    histogram
}

/// All four template offsets from `(x, y)` are ink. An offset that falls
/// outside the grid counts as a miss.
fn matches_template<G: InkGrid + ?Sized>(grid: &G, x: u32, y: u32, template: &Template) -> bool {
    template.iter().all(|&(dy, dx)| {
        match (x.checked_add_signed(dx), y.checked_add_signed(dy)) {
            (Some(nx), Some(ny)) if nx < grid.width() && ny < grid.height() => grid.is_ink(nx, ny),
            _ => false,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::{BACKGROUND, BinaryRaster, INK};
    use image::{GrayImage, Luma};

    fn blank(width: u32, height: u32) -> GrayImage {
        GrayImage::from_pixel(width, height, Luma([BACKGROUND]))
    }

    #[test]
    fn templates_stay_within_margin_and_above_centre() {
        for template in TEMPLATES.iter() {
            for &(dy, dx) in template {
                assert!((-(MARGIN as i32)..=0).contains(&dy));
                assert!(dx.unsigned_abs() <= MARGIN);
                assert!((dy, dx) != (0, 0));
            }
        }
    }

    #[test]
    fn only_the_known_pairs_share_offsets() {
        assert_eq!(TEMPLATES[9], TEMPLATES[15]);
        assert_eq!(TEMPLATES[10], TEMPLATES[14]);
        for (i, a) in TEMPLATES.iter().enumerate() {
            for (j, b) in TEMPLATES.iter().enumerate().skip(i + 1) {
                if (i, j) != (9, 15) && (i, j) != (10, 14) {
                    assert_ne!(a, b, "bins {i} and {j} unexpectedly identical");
                }
            }
        }
    }

    #[test]
    fn all_background_gives_zero_histogram() {
        assert!(extract_histogram(&blank(32, 32)).is_empty());
    }

    #[test]
    fn undersized_raster_gives_zero_histogram() {
        let ink = GrayImage::from_pixel(8, 8, Luma([INK]));
        assert!(extract_histogram(&ink).is_empty());
    }

    #[test]
    fn single_hole_fixture_pins_template_semantics() {
        // 9x9 all ink except (row 4, col 4). Only column 4 lies inside the
        // horizontal margin, rows 4..9 are scanned and the hole itself is
        // skipped. Templates stepping straight up through (4, 4) are the only
        // ones that fail: bin 8 for every row, and bins 7, 9, 15 for row 5.
        let mut img = GrayImage::from_pixel(9, 9, Luma([INK]));
        img.put_pixel(4, 4, Luma([BACKGROUND]));

        let hist = extract_histogram(&BinaryRaster::from_gray(img));
        let expected: [u64; BIN_COUNT] = [4, 4, 4, 4, 4, 4, 4, 3, 0, 3, 4, 4, 4, 4, 4, 3, 4];
        assert_eq!(hist.counts(), &expected);
    }

    #[test]
    fn rising_diagonal_lands_in_bin_four() {
        // One-pixel line from bottom-left to top-right: row + col = 19.
        let mut img = blank(20, 20);
        for x in 0..20 {
            img.put_pixel(x, 19 - x, Luma([INK]));
        }
        let hist = extract_histogram(&img);

        // Columns 4..16 are scanned, every one of them matches bin 4 only.
        assert_eq!(hist.counts()[4], 12);
        assert_eq!(hist.total(), 12);
        assert_eq!(hist.dominant().index(), 4);
    }

    #[test]
    fn vertical_stroke_lands_in_bin_eight() {
        let mut img = blank(12, 12);
        for y in 0..12 {
            img.put_pixel(6, y, Luma([INK]));
        }
        let hist = extract_histogram(&img);
        // Rows 4..12 each see four ink pixels straight above.
        assert_eq!(hist.counts()[8], 8);
        assert_eq!(hist.total(), 8);
    }

    #[test]
    fn horizontal_stroke_fills_both_horizontal_bins() {
        let mut img = blank(16, 10);
        for x in 0..16 {
            img.put_pixel(x, 6, Luma([INK]));
        }
        let hist = extract_histogram(&img);
        // Scanned columns 4..12; rightward and leftward runs both fit.
        assert_eq!(hist.counts()[0], 8);
        assert_eq!(hist.counts()[16], 8);
        assert_eq!(hist.total(), 16);
    }

    #[test]
    fn bottom_row_is_scanned() {
        let mut img = blank(9, 9);
        for y in 4..9 {
            img.put_pixel(4, y, Luma([INK]));
        }
        let hist = extract_histogram(&img);
        // Only (row 8, col 4) has four ink pixels above it.
        assert_eq!(hist.counts()[8], 1);
    }

    #[test]
    fn templates_reaching_off_the_grid_do_not_match() {
        let ink = GrayImage::from_pixel(9, 9, Luma([INK]));
        // From the top-left corner only the rightward run stays on the grid.
        assert!(matches_template(&ink, 0, 0, &TEMPLATES[0]));
        assert!(!matches_template(&ink, 0, 0, &TEMPLATES[8]));
        assert!(!matches_template(&ink, 0, 0, &TEMPLATES[16]));
        // From the bottom-right corner the rightward run runs off the edge.
        assert!(!matches_template(&ink, 8, 8, &TEMPLATES[0]));
        assert!(matches_template(&ink, 8, 8, &TEMPLATES[12]));
        assert!(!matches_template(&ink, u32::MAX, u32::MAX, &TEMPLATES[4]));
    }

    #[test]
    fn extraction_is_deterministic() {
        let img = GrayImage::from_fn(30, 30, |x, y| {
            Luma([if (x * 7 + y * 3) % 5 < 2 { INK } else { BACKGROUND }])
        });
        let first = extract_histogram(&img);
        let second = extract_histogram(&img);
        assert_eq!(first, second);
        assert!(!first.is_empty());
    }
}

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Fragment sampling: grid partition, ink-density filter, and random
// selection of a fixed number of fragments.

use image::{GrayImage, Luma};
use rand::Rng;
use rand::seq::SliceRandom;
use slant_core::GridConfig;
use tracing::{debug, instrument};

use crate::raster::{BinaryRaster, InkGrid};

/// Read-only rectangular view into a [`BinaryRaster`], tagged with its grid
/// cell.
#[derive(Debug, Clone, Copy)]
pub struct Fragment<'a> {
    raster: &'a BinaryRaster,
    row: u32,
    col: u32,
    x0: u32,
    y0: u32,
    width: u32,
    height: u32,
}

impl Fragment<'_> {
    /// Grid row (0 is the top band).
    pub fn row(&self) -> u32 {
        self.row
    }

    /// Grid column (0 is the left band).
    pub fn col(&self) -> u32 {
        self.col
    }

    /// Top-left corner in raster coordinates.
    pub fn origin(&self) -> (u32, u32) {
        (self.x0, self.y0)
    }

    /// Copy the viewed pixels into an owned image.
    pub fn to_image(&self) -> GrayImage {
        GrayImage::from_fn(self.width, self.height, |x, y| Luma([self.level(x, y)]))
    }
}

impl InkGrid for Fragment<'_> {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn level(&self, x: u32, y: u32) -> u8 {
        self.raster.level(self.x0 + x, self.y0 + y)
    }
}

/// Splits a raster into a grid and samples informative fragments.
#[derive(Debug, Clone, Copy, Default)]
pub struct Fragmenter {
    grid: GridConfig,
}

impl Fragmenter {
    pub fn new(grid: GridConfig) -> Self {
        Self { grid }
    }

    pub fn grid(&self) -> &GridConfig {
        &self.grid
    }

    /// Every cell of the grid in row-major order.
    ///
    /// Cells are `floor(height / rows)` by `floor(width / cols)`; leftover rows
    /// and columns at the bottom and right are not covered. A raster smaller
    /// than the grid yields no fragments.
    pub fn partition<'a>(&self, raster: &'a BinaryRaster) -> Vec<Fragment<'a>> {
        let (width, height) = raster.dimensions();
        let (rows, cols) = (self.grid.rows, self.grid.cols);
        if rows == 0 || cols == 0 {
            return Vec::new();
        }
        let cell_h = height / rows;
        let cell_w = width / cols;
        if cell_h == 0 || cell_w == 0 {
            return Vec::new();
        }

        let mut fragments = Vec::with_capacity((rows * cols) as usize);
        for row in 0..rows {
            for col in 0..cols {
                fragments.push(Fragment {
                    raster,
                    row,
                    col,
                    x0: col * cell_w,
                    y0: row * cell_h,
                    width: cell_w,
                    height: cell_h,
                });
            }
        }
        fragments
    }

    /// Whether both the ink and the background fraction of `fragment` exceed
    /// the configured minimum.
    pub fn is_informative(&self, fragment: &Fragment<'_>) -> bool {
        let counts = fragment.level_counts();
        let floor = self.grid.min_fraction * counts.area as f64;
        counts.ink as f64 > floor && counts.background as f64 > floor
    }

    /// Partition, filter, shuffle with `rng`, and keep at most
    /// `sample_count` fragments. Fewer survivors than that are all returned.
    #[instrument(skip(self, raster, rng), fields(rows = self.grid.rows, cols = self.grid.cols))]
    pub fn segment<'a, R: Rng + ?Sized>(
        &self,
        raster: &'a BinaryRaster,
        rng: &mut R,
    ) -> Vec<Fragment<'a>> {
        let mut survivors: Vec<Fragment<'a>> = self
            .partition(raster)
            .into_iter()
            .filter(|fragment| self.is_informative(fragment))
            .collect();
        debug!(survivors = survivors.len(), "Fragments passed density filter");

        survivors.shuffle(rng);
        survivors.truncate(self.grid.sample_count);
        survivors
    }
}

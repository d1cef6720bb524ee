// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for axial slant extraction.

use serde::{Deserialize, Serialize};

/// Number of discretised stroke orientations.
pub const BIN_COUNT: usize = 17;

/// Angular width of one bin, in degrees.
pub const BIN_WIDTH_DEGREES: f64 = 180.0 / BIN_COUNT as f64;

/// One of the 17 stroke-orientation buckets covering 0°–180°.
///
/// Bin `k` is nominally `k × 180/17` degrees, measured counter-clockwise from
/// a stroke running rightwards along the row: bin 0 is horizontal, bin 4 is
/// the rising 45° diagonal, bin 8 is vertical and bin 12 is the falling
/// diagonal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AngleBin(u8);

impl AngleBin {
    /// Returns `None` when `index >= BIN_COUNT`.
    pub fn new(index: usize) -> Option<Self> {
        (index < BIN_COUNT).then_some(Self(index as u8))
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Nominal orientation of this bin in degrees.
    pub fn degrees(self) -> f64 {
        self.0 as f64 * BIN_WIDTH_DEGREES
    }

    /// All bins in index order.
    pub fn all() -> impl Iterator<Item = AngleBin> {
        (0..BIN_COUNT as u8).map(AngleBin)
    }
}

impl std::fmt::Display for AngleBin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "bin {} ({:.2}°)", self.0, self.degrees())
    }
}

/// Per-bin count of ink pixels whose neighbourhood matched that bin's
/// directional template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RawHistogram([u64; BIN_COUNT]);

impl RawHistogram {
    pub fn new(counts: [u64; BIN_COUNT]) -> Self {
        Self(counts)
    }

    pub fn counts(&self) -> &[u64; BIN_COUNT] {
        &self.0
    }

    pub fn get(&self, bin: AngleBin) -> u64 {
        self.0[bin.index()]
    }

    pub fn total(&self) -> u64 {
        self.0.iter().sum()
    }

    /// True when no template matched anywhere.
    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|&c| c == 0)
    }

    pub fn min(&self) -> u64 {
        self.0.iter().copied().min().unwrap_or(0)
    }

    pub fn max(&self) -> u64 {
        self.0.iter().copied().max().unwrap_or(0)
    }

    /// The bin with the highest count (lowest index wins ties).
    pub fn dominant(&self) -> AngleBin {
        let mut best = 0;
        for (k, &count) in self.0.iter().enumerate() {
            if count > self.0[best] {
                best = k;
            }
        }
        AngleBin(best as u8)
    }
}

impl From<[u64; BIN_COUNT]> for RawHistogram {
    fn from(counts: [u64; BIN_COUNT]) -> Self {
        Self(counts)
    }
}

/// Normalised histogram handed to the downstream classifier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector([f64; BIN_COUNT]);

impl FeatureVector {
    pub fn new(values: [f64; BIN_COUNT]) -> Self {
        Self(values)
    }

    pub fn values(&self) -> &[f64; BIN_COUNT] {
        &self.0
    }

    pub fn get(&self, bin: AngleBin) -> f64 {
        self.0[bin.index()]
    }

    pub fn sum(&self) -> f64 {
        self.0.iter().sum()
    }

    pub fn min(&self) -> f64 {
        self.0.iter().copied().fold(f64::INFINITY, f64::min)
    }

    pub fn max(&self) -> f64 {
        self.0.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.0.to_vec()
    }
}

/// How a raw histogram is rescaled into a feature vector.
///
/// The two policies are numerically incompatible: features compared against
/// a reference set must be produced with the same policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NormalizationPolicy {
    /// Divide each count by the total; the vector sums to 1.
    #[default]
    Sum,
    /// Map the smallest count to 0 and the largest to 1.
    MinMax,
}

impl std::fmt::Display for NormalizationPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NormalizationPolicy::Sum => write!(f, "sum"),
            NormalizationPolicy::MinMax => write!(f, "min-max"),
        }
    }
}

/// How a grayscale scan is split into ink (0) and background (255).
///
/// Fixed per deployment: adaptive thresholding shifts the ink/background
/// ratio that fragment filtering relies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum BinarizationPolicy {
    /// Global threshold chosen by Otsu's method.
    #[default]
    Otsu,
    /// Global constant threshold. Pixels strictly above `level` are background.
    Fixed { level: u8 },
    /// Local mean over a `(2r+1)²` window minus `offset`.
    Adaptive { block_radius: u32, offset: i32 },
}

impl BinarizationPolicy {
    /// Constant threshold at mid-gray.
    pub const FIXED_MIDPOINT: BinarizationPolicy = BinarizationPolicy::Fixed { level: 127 };

    /// Adaptive thresholding with a 31×31 window and offset 10.
    pub const ADAPTIVE_DEFAULT: BinarizationPolicy = BinarizationPolicy::Adaptive {
        block_radius: 15,
        offset: 10,
    };
}

/// Fragment grid, density filter and sample size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Number of fragment rows (image height is split into this many bands).
    pub rows: u32,
    /// Number of fragment columns.
    pub cols: u32,
    /// A fragment is kept only if both its ink and its background fractions
    /// are strictly greater than this.
    pub min_fraction: f64,
    /// Maximum number of fragments returned after shuffling.
    pub sample_count: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            rows: 6,
            cols: 4,
            min_fraction: 0.01,
            sample_count: 5,
        }
    }
}

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// slant-features — Axial slant feature extraction for manuscript images.
//
// Provides preprocessing (grayscale decoding, Otsu / fixed / adaptive
// binarization, morphological stroke boundary), fragment sampling (grid
// partition, ink-density filter, random selection), the 17-bin directional
// slant histogram, and sum / min-max normalization.

pub mod extract;
pub mod fragment;
pub mod normalize;
pub mod pipeline;
pub mod preprocess;
pub mod raster;

// Re-export the primary entry points so callers can use
// `slant_features::FeatureExtractor` etc.
pub use extract::{TEMPLATES, extract_histogram};
pub use fragment::{Fragment, Fragmenter};
pub use normalize::normalize;
pub use pipeline::{FeatureExtractor, FragmentFeatures, extract_features, extract_fragment_features};
pub use preprocess::{PreprocessedImage, Preprocessor, preprocess};
pub use raster::{BinaryRaster, InkGrid};

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Preprocessing pipeline: decode, binarize, and extract the stroke boundary
// raster consumed by the slant extractor.

pub mod binarize;
pub mod boundary;

use std::path::Path;

use image::GrayImage;
use slant_core::{BinarizationPolicy, Result, SlantError};
use tracing::{debug, info, instrument};

pub use binarize::binarize;
pub use boundary::{BoundaryStages, stroke_boundary};

use crate::raster::BinaryRaster;

/// Smallest side length the extractor's 4-pixel margin can scan.
pub const MIN_SIDE: u32 = 9;

/// Output of [`Preprocessor`]: the thresholded page and its stroke outline.
#[derive(Debug, Clone)]
pub struct PreprocessedImage {
    /// Decoded single-channel page.
    pub grayscale: GrayImage,
    /// Thresholded page, ink=0 / background=255.
    pub binary: BinaryRaster,
    /// Stroke outline, ink=0 / background=255. This is what gets scanned.
    pub boundary: BinaryRaster,
}

/// Turns encoded manuscript scans into boundary rasters.
#[derive(Debug, Clone, Copy, Default)]
pub struct Preprocessor {
    policy: BinarizationPolicy,
}

impl Preprocessor {
    pub fn new(policy: BinarizationPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> BinarizationPolicy {
        self.policy
    }

    /// Decode `data` and run the full preprocessing chain.
    #[instrument(skip(self, data), fields(data_len = data.len(), policy = ?self.policy))]
    pub fn preprocess_bytes(&self, data: &[u8]) -> Result<PreprocessedImage> {
        let gray = decode_grayscale(data)?;
        self.preprocess_gray(gray)
    }

    /// Load a file and run the full preprocessing chain.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn preprocess_path(&self, path: impl AsRef<Path>) -> Result<PreprocessedImage> {
        let image = image::open(path.as_ref()).map_err(|err| {
            SlantError::Decode(format!(
                "failed to open {}: {}",
                path.as_ref().display(),
                err
            ))
        })?;
        self.preprocess_gray(image.to_luma8())
    }

    /// Binarise an already-decoded page and extract its stroke boundary.
    pub fn preprocess_gray(&self, gray: GrayImage) -> Result<PreprocessedImage> {
        let (width, height) = gray.dimensions();
        if width < MIN_SIDE || height < MIN_SIDE {
            return Err(SlantError::InvalidDimensions {
                width,
                height,
                min: MIN_SIDE,
            });
        }

        let binary = binarize(&gray, self.policy);
        let boundary = stroke_boundary(&binary).boundary;
        info!(width, height, "Page preprocessed");

        Ok(PreprocessedImage {
            grayscale: gray,
            binary,
            boundary,
        })
    }
}

/// Decode encoded image bytes (PNG, BMP, JPEG, TIFF, …) to 8-bit grayscale.
pub fn decode_grayscale(data: &[u8]) -> Result<GrayImage> {
    let image = image::load_from_memory(data)
        .map_err(|err| SlantError::Decode(format!("failed to decode image: {}", err)))?;
    debug!(
        width = image.width(),
        height = image.height(),
        "Image decoded from bytes"
    );
    Ok(image.to_luma8())
}

/// Shorthand for `Preprocessor::default().preprocess_bytes(data)` returning
/// only the boundary raster.
pub fn preprocess(data: &[u8]) -> Result<BinaryRaster> {
    Ok(Preprocessor::default().preprocess_bytes(data)?.boundary)
}

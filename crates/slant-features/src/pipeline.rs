// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// End-to-end feature extraction: preprocess, optionally sample fragments,
// build slant histograms, normalise.

use std::path::Path;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use slant_core::{
    ExtractionConfig, FeatureVector, GridConfig, NormalizationPolicy, RawHistogram, Result,
};
use tracing::{debug, info, instrument, warn};

use crate::extract::extract_histogram;
use crate::fragment::{Fragment, Fragmenter};
use crate::normalize::normalize;
use crate::preprocess::{PreprocessedImage, Preprocessor};
use crate::raster::BinaryRaster;

/// Feature vector of one sampled fragment, with the grid cell it came from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FragmentFeatures {
    pub row: u32,
    pub col: u32,
    pub features: FeatureVector,
}

/// Runs the whole pipeline under one [`ExtractionConfig`].
///
/// Holds no mutable state, so one extractor can be shared across threads
/// and fed independent images concurrently.
#[derive(Debug, Clone)]
pub struct FeatureExtractor {
    config: ExtractionConfig,
    preprocessor: Preprocessor,
    fragmenter: Fragmenter,
}

impl FeatureExtractor {
    /// Validate `config` and build an extractor from it.
    pub fn new(config: ExtractionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            preprocessor: Preprocessor::new(config.binarization),
            fragmenter: Fragmenter::new(config.grid),
            config,
        })
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    // -- Whole image ----------------------------------------------------------

    /// Feature vector of a whole encoded image.
    #[instrument(skip(self, data), fields(data_len = data.len()))]
    pub fn extract_features(&self, data: &[u8]) -> Result<FeatureVector> {
        let page = self.preprocessor.preprocess_bytes(data)?;
        self.features_of_raster(&page.boundary)
    }

    /// Feature vector of a whole image file.
    pub fn extract_features_from_path(&self, path: impl AsRef<Path>) -> Result<FeatureVector> {
        let page = self.preprocessor.preprocess_path(path)?;
        self.features_of_raster(&page.boundary)
    }

    /// Histogram and normalise an already-preprocessed boundary raster.
    pub fn features_of_raster(&self, raster: &BinaryRaster) -> Result<FeatureVector> {
        let histogram = extract_histogram(raster);
        let features = normalize(&histogram, self.config.normalization)?;
        info!(
            total = histogram.total(),
            dominant = %histogram.dominant(),
            "Slant features extracted"
        );
        Ok(features)
    }

    // -- Fragments ------------------------------------------------------------

    /// Feature vectors of up to `sample_count` fragments of an encoded image.
    ///
    /// Sampling uses the configured seed if there is one, otherwise the
    /// thread-local generator.
    pub fn extract_fragment_features(&self, data: &[u8]) -> Result<Vec<FragmentFeatures>> {
        let page = self.preprocessor.preprocess_bytes(data)?;
        self.sample_with_configured_rng(&page)
    }

    /// As [`extract_fragment_features`](Self::extract_fragment_features),
    /// reading the image from a file.
    pub fn extract_fragment_features_from_path(
        &self,
        path: impl AsRef<Path>,
    ) -> Result<Vec<FragmentFeatures>> {
        let page = self.preprocessor.preprocess_path(path)?;
        self.sample_with_configured_rng(&page)
    }

    /// As [`extract_fragment_features`](Self::extract_fragment_features),
    /// drawing the sample from `rng`.
    pub fn extract_fragment_features_with_rng<R: Rng + ?Sized>(
        &self,
        data: &[u8],
        rng: &mut R,
    ) -> Result<Vec<FragmentFeatures>> {
        let page = self.preprocessor.preprocess_bytes(data)?;
        Ok(self.fragment_features(&page.boundary, rng))
    }

    fn sample_with_configured_rng(&self, page: &PreprocessedImage) -> Result<Vec<FragmentFeatures>> {
        Ok(match self.config.seed {
            Some(seed) => self.fragment_features(&page.boundary, &mut StdRng::seed_from_u64(seed)),
            None => self.fragment_features(&page.boundary, &mut rand::thread_rng()),
        })
    }

    /// Sample fragments of `raster` and turn each into a feature vector.
    ///
    /// A fragment whose histogram cannot be normalised is logged and left
    /// out, so the result can be shorter than the sample.
    #[instrument(skip(self, raster, rng))]
    pub fn fragment_features<R: Rng + ?Sized>(
        &self,
        raster: &BinaryRaster,
        rng: &mut R,
    ) -> Vec<FragmentFeatures> {
        let fragments = self.fragmenter.segment(raster, rng);
        let sampled = fragments.len();

        let features: Vec<FragmentFeatures> = fragments
            .iter()
            .filter_map(|fragment| self.features_of_fragment(fragment))
            .collect();

        info!(sampled, kept = features.len(), "Fragment features extracted");
        features
    }

    fn features_of_fragment(&self, fragment: &Fragment<'_>) -> Option<FragmentFeatures> {
        let histogram: RawHistogram = extract_histogram(fragment);
        match normalize(&histogram, self.config.normalization) {
            Ok(features) => {
                debug!(row = fragment.row(), col = fragment.col(), "Fragment histogram normalised");
                Some(FragmentFeatures {
                    row: fragment.row(),
                    col: fragment.col(),
                    features,
                })
            }
            Err(err) => {
                warn!(
                    row = fragment.row(),
                    col = fragment.col(),
                    error = %err,
                    "Skipping fragment"
                );
                None
            }
        }
    }
}

// -- Entry points ---------------------------------------------------------------

/// Feature vector of a whole encoded image, Otsu-binarised and normalised
/// under `policy`.
pub fn extract_features(data: &[u8], policy: NormalizationPolicy) -> Result<FeatureVector> {
    let extractor = FeatureExtractor::new(ExtractionConfig {
        normalization: policy,
        ..Default::default()
    })?;
    extractor.extract_features(data)
}

/// Feature vectors of up to `grid.sample_count` randomly sampled fragments of
/// an encoded image, Otsu-binarised and normalised under `policy`.
pub fn extract_fragment_features(
    data: &[u8],
    grid: GridConfig,
    policy: NormalizationPolicy,
) -> Result<Vec<FeatureVector>> {
    let extractor = FeatureExtractor::new(ExtractionConfig {
        normalization: policy,
        grid,
        ..Default::default()
    })?;
    Ok(extractor
        .extract_fragment_features(data)?
        .into_iter()
        .map(|f| f.features)
        .collect())
}

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Extraction configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SlantError};
use crate::types::{BinarizationPolicy, GridConfig, NormalizationPolicy};

/// Offsets beyond this shift the local threshold past the whole 8-bit range.
const ADAPTIVE_OFFSET_RANGE: std::ops::RangeInclusive<i32> = -255..=255;

/// Settings for one deployment of the feature extractor.
///
/// Every field has a default, so a JSON file only needs to name what it
/// overrides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Grayscale-to-binary policy (default: Otsu).
    pub binarization: BinarizationPolicy,
    /// Histogram rescaling policy (default: sum).
    pub normalization: NormalizationPolicy,
    /// Fragment grid used by the fragment-sampling path.
    pub grid: GridConfig,
    /// Seed for fragment sampling. `None` draws from the thread-local RNG.
    pub seed: Option<u64>,
}

impl ExtractionConfig {
    /// Parse and validate a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&json)
    }

    /// Reject settings that would make the pipeline meaningless.
    pub fn validate(&self) -> Result<()> {
        let grid = &self.grid;
        if grid.rows == 0 || grid.cols == 0 {
            return Err(SlantError::InvalidConfig(format!(
                "fragment grid must be at least 1x1, got {}x{}",
                grid.rows, grid.cols
            )));
        }
        if grid.sample_count == 0 {
            return Err(SlantError::InvalidConfig(
                "sample_count must be at least 1".into(),
            ));
        }
        if !(0.0..1.0).contains(&grid.min_fraction) {
            return Err(SlantError::InvalidConfig(format!(
                "min_fraction must lie in [0, 1), got {}",
                grid.min_fraction
            )));
        }
        if let BinarizationPolicy::Adaptive {
            block_radius,
            offset,
        } = self.binarization
        {
            if block_radius == 0 {
                return Err(SlantError::InvalidConfig(
                    "adaptive block_radius must be at least 1".into(),
                ));
            }
            if !ADAPTIVE_OFFSET_RANGE.contains(&offset) {
                return Err(SlantError::InvalidConfig(format!(
                    "adaptive offset must lie in [-255, 255], got {offset}"
                )));
            }
        }
        Ok(())
    }
}

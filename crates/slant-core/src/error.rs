// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for slant extraction.

use thiserror::Error;

use crate::types::NormalizationPolicy;

/// Top-level error type for all slant extraction operations.
#[derive(Debug, Error)]
pub enum SlantError {
    // -- Input errors --
    #[error("failed to decode image: {0}")]
    Decode(String),

    #[error("image is {width}x{height}, both sides must be at least {min} pixels")]
    InvalidDimensions { width: u32, height: u32, min: u32 },

    // -- Feature errors --
    #[error("degenerate histogram under {policy} normalization: {reason}")]
    DegenerateHistogram {
        policy: NormalizationPolicy,
        reason: &'static str,
    },

    // -- Configuration --
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SlantError {
    /// Whether a batch caller can drop the offending image or fragment and
    /// carry on with the rest.
    pub fn is_skippable(&self) -> bool {
        matches!(
            self,
            SlantError::Decode(_)
                | SlantError::InvalidDimensions { .. }
                | SlantError::DegenerateHistogram { .. }
        )
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, SlantError>;

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Histogram normalization under the sum and min-max policies.

use slant_core::{BIN_COUNT, FeatureVector, NormalizationPolicy, RawHistogram, Result, SlantError};

/// Rescale `histogram` into a feature vector.
///
/// Fails with [`SlantError::DegenerateHistogram`] where the policy would
/// divide by zero: an empty histogram under [`NormalizationPolicy::Sum`], or
/// one with all counts equal under [`NormalizationPolicy::MinMax`].
pub fn normalize(histogram: &RawHistogram, policy: NormalizationPolicy) -> Result<FeatureVector> {
    match policy {
        NormalizationPolicy::Sum => normalize_sum(histogram),
        NormalizationPolicy::MinMax => normalize_min_max(histogram),
    }
}

fn normalize_sum(histogram: &RawHistogram) -> Result<FeatureVector> {
    let total = histogram.total();
    if total == 0 {
        return Err(SlantError::DegenerateHistogram {
            policy: NormalizationPolicy::Sum,
            reason: "histogram has no counts",
        });
    }

    let total = total as f64;
    let mut values = [0.0; BIN_COUNT];
    for (value, &count) in values.iter_mut().zip(histogram.counts()) {
        *value = count as f64 / total;
    }
    Ok(FeatureVector::new(values))
}

fn normalize_min_max(histogram: &RawHistogram) -> Result<FeatureVector> {
    let (min, max) = (histogram.min(), histogram.max());
    if min == max {
        return Err(SlantError::DegenerateHistogram {
            policy: NormalizationPolicy::MinMax,
            reason: "all counts are equal",
        });
    }

    let range = (max - min) as f64;
    let mut values = [0.0; BIN_COUNT];
    for (value, &count) in values.iter_mut().zip(histogram.counts()) {
        *value = (count - min) as f64 / range;
    }
    Ok(FeatureVector::new(values))
}

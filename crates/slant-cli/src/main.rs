// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// slant — print axial slant feature vectors for manuscript images.
//
// Entry point. Initialises logging, builds the extraction configuration from
// an optional JSON file plus flag overrides, then writes one JSON line per
// feature vector to stdout. Logs go to stderr.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use serde::Serialize;
use slant_core::{BinarizationPolicy, ExtractionConfig, FeatureVector, NormalizationPolicy};
use slant_features::FeatureExtractor;

#[derive(Parser, Debug)]
#[command(name = "slant")]
#[command(about = "Extract axial slant feature vectors from manuscript images")]
struct Cli {
    /// Image files to process.
    #[arg(required = true)]
    images: Vec<PathBuf>,
    /// JSON extraction configuration; flags below override it.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Emit one vector per sampled fragment instead of one per image.
    #[arg(long)]
    fragments: bool,
    #[arg(long, value_enum)]
    normalization: Option<NormalizationArg>,
    #[arg(long, value_enum)]
    binarization: Option<BinarizationArg>,
    /// Number of fragments sampled per image.
    #[arg(long)]
    samples: Option<usize>,
    /// Seed for fragment sampling.
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum NormalizationArg {
    Sum,
    MinMax,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum BinarizationArg {
    Otsu,
    Fixed,
    Adaptive,
}

impl From<NormalizationArg> for NormalizationPolicy {
    fn from(arg: NormalizationArg) -> Self {
        match arg {
            NormalizationArg::Sum => NormalizationPolicy::Sum,
            NormalizationArg::MinMax => NormalizationPolicy::MinMax,
        }
    }
}

impl From<BinarizationArg> for BinarizationPolicy {
    fn from(arg: BinarizationArg) -> Self {
        match arg {
            BinarizationArg::Otsu => BinarizationPolicy::Otsu,
            BinarizationArg::Fixed => BinarizationPolicy::FIXED_MIDPOINT,
            BinarizationArg::Adaptive => BinarizationPolicy::ADAPTIVE_DEFAULT,
        }
    }
}

/// One output line.
#[derive(Debug, Serialize)]
struct Record<'a> {
    path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    row: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    col: Option<u32>,
    features: &'a FeatureVector,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = build_config(&cli)?;
    tracing::info!(images = cli.images.len(), fragments = cli.fragments, "slant starting");

    let extractor = FeatureExtractor::new(config).context("invalid extraction configuration")?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    let mut skipped = 0usize;
    for path in &cli.images {
        match run_image(&extractor, path, cli.fragments, &mut out) {
            Ok(()) => {}
            Err(err) if err.is_skippable() => {
                tracing::warn!(path = %path.display(), error = %err, "skipping image");
                skipped += 1;
            }
            Err(err) => {
                return Err(err).with_context(|| format!("processing {}", path.display()));
            }
        }
    }

    out.flush().context("flushing stdout")?;
    tracing::info!(processed = cli.images.len() - skipped, skipped, "slant finished");
    if skipped == cli.images.len() {
        bail!("no image produced features");
    }
    Ok(())
}

/// Merge the optional config file with flag overrides.
fn build_config(cli: &Cli) -> Result<ExtractionConfig> {
    let mut config = match &cli.config {
        Some(path) => ExtractionConfig::from_json_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ExtractionConfig::default(),
    };
    if let Some(norm) = cli.normalization {
        config.normalization = norm.into();
    }
    if let Some(bin) = cli.binarization {
        config.binarization = bin.into();
    }
    if let Some(samples) = cli.samples {
        config.grid.sample_count = samples;
    }
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    Ok(config)
}

fn run_image(
    extractor: &FeatureExtractor,
    path: &Path,
    fragments: bool,
    out: &mut impl Write,
) -> slant_core::Result<()> {
    let display = path.display().to_string();
    if fragments {
        for fragment in extractor.extract_fragment_features_from_path(path)? {
            write_record(
                out,
                &Record {
                    path: display.clone(),
                    row: Some(fragment.row),
                    col: Some(fragment.col),
                    features: &fragment.features,
                },
            )?;
        }
    } else {
        let features = extractor.extract_features_from_path(path)?;
        write_record(
            out,
            &Record {
                path: display,
                row: None,
                col: None,
                features: &features,
            },
        )?;
    }
    Ok(())
}

fn write_record(out: &mut impl Write, record: &Record<'_>) -> slant_core::Result<()> {
    serde_json::to_writer(&mut *out, record)?;
    writeln!(out)?;
    Ok(())
}

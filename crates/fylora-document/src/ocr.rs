// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Text recognition for scanned pages using the `ocrs` crate, a pure-Rust OCR
// engine backed by neural network models executed via `rten`.
//
// The engine uses the fixed ocrs model pair (text detection + text
// recognition). Models are looked up in the configured directory, or the
// standard cache directory (`$XDG_CACHE_HOME/ocrs`, typically
// `~/.cache/ocrs`). They can be fetched once with the `ocrs-cli` tool.
//
// Compiled only when the `ocr` feature is enabled. Release mode strongly
// recommended: debug builds of the inference stack are 10-100x slower.

use std::path::{Path, PathBuf};

use fylora_core::config::EngineConfig;
use fylora_core::error::{FyloraError, Result};
use image::DynamicImage;
use ocrs::{ImageSource, OcrEngine as OcrsEngine, OcrEngineParams};
use rten::Model;
use tracing::{debug, info, instrument};

const DETECTION_MODEL_FILENAME: &str = "text-detection.rten";
const RECOGNITION_MODEL_FILENAME: &str = "text-recognition.rten";

/// Standard cache directory for OCR model files, following the XDG Base
/// Directory specification.
fn default_model_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CACHE_HOME") {
        PathBuf::from(xdg).join("ocrs")
    } else if let Ok(home) = std::env::var("HOME") {
        PathBuf::from(home).join(".cache").join("ocrs")
    } else {
        PathBuf::from("ocrs-models")
    }
}

/// Resolved locations of the two model files.
#[derive(Debug, Clone)]
pub struct OcrModelPaths {
    pub detection: PathBuf,
    pub recognition: PathBuf,
}

impl OcrModelPaths {
    /// Resolve model paths from engine configuration, falling back to the
    /// standard cache directory.
    pub fn from_config(config: &EngineConfig) -> Self {
        let dir = config
            .ocr_model_dir
            .clone()
            .unwrap_or_else(default_model_dir);
        Self::from_dir(dir)
    }

    /// Expect both model files inside `dir`.
    pub fn from_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            detection: dir.join(DETECTION_MODEL_FILENAME),
            recognition: dir.join(RECOGNITION_MODEL_FILENAME),
        }
    }

    /// Verify that both model files exist.
    pub fn validate(&self) -> Result<()> {
        for path in [&self.detection, &self.recognition] {
            if !path.exists() {
                return Err(FyloraError::Ocr(format!(
                    "OCR model not found at {}; run `ocrs-cli` once to download models",
                    path.display()
                )));
            }
        }
        Ok(())
    }
}

/// Text recognizer for rendered page images.
///
/// Model loading is the expensive step — construct once and reuse across
/// pages.
pub struct TextRecognizer {
    engine: OcrsEngine,
}

impl TextRecognizer {
    /// Load the model pair and initialise the recognition engine.
    #[instrument(skip_all, fields(
        detection = %paths.detection.display(),
        recognition = %paths.recognition.display(),
    ))]
    pub fn new(paths: &OcrModelPaths) -> Result<Self> {
        paths.validate()?;

        info!("Loading OCR models");
        let detection_model = Model::load_file(&paths.detection).map_err(|err| {
            FyloraError::Ocr(format!(
                "failed to load detection model from {}: {}",
                paths.detection.display(),
                err
            ))
        })?;
        let recognition_model = Model::load_file(&paths.recognition).map_err(|err| {
            FyloraError::Ocr(format!(
                "failed to load recognition model from {}: {}",
                paths.recognition.display(),
                err
            ))
        })?;

        let engine = OcrsEngine::new(OcrEngineParams {
            detection_model: Some(detection_model),
            recognition_model: Some(recognition_model),
            ..Default::default()
        })
        .map_err(|err| FyloraError::Ocr(format!("failed to initialise OCR engine: {err}")))?;

        info!("OCR engine ready");
        Ok(Self { engine })
    }

    /// Recognize all text in a page image, returned as newline-separated
    /// lines.
    #[instrument(skip_all, fields(width = image.width(), height = image.height()))]
    pub fn recognize(&self, image: &DynamicImage) -> Result<String> {
        let rgb = image.to_rgb8();
        let (width, height) = rgb.dimensions();

        let source = ImageSource::from_bytes(rgb.as_raw(), (width, height)).map_err(|err| {
            FyloraError::Ocr(format!(
                "failed to create image source ({width}x{height}): {err}"
            ))
        })?;
        let input = self
            .engine
            .prepare_input(source)
            .map_err(|err| FyloraError::Ocr(format!("OCR preprocessing failed: {err}")))?;

        let text = self
            .engine
            .get_text(&input)
            .map_err(|err| FyloraError::Ocr(format!("OCR text recognition failed: {err}")))?;

        debug!(
            line_count = text.lines().count(),
            char_count = text.len(),
            "OCR recognition complete"
        );
        Ok(text)
    }
}

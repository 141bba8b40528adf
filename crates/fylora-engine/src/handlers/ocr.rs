// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// OCR — recognize text on the first page only. Single-page scope is a
// deliberate boundary of this handler, not a missing loop.

use fylora_core::config::EngineConfig;
use fylora_core::error::Result;
use fylora_core::types::InputFile;

/// Render page 1 at scale 2.0 and run it through the text recognizer,
/// returning plain text.
#[cfg(feature = "ocr")]
#[tracing::instrument(skip_all, fields(name = %file.name))]
pub fn recognize_first_page(config: &EngineConfig, file: &InputFile) -> Result<Vec<u8>> {
    use fylora_core::error::FyloraError;
    use fylora_document::{OcrModelPaths, Rasterizer, TextRecognizer};

    const OCR_SCALE: f32 = 2.0;

    let rasterizer = Rasterizer::new(config)?;
    // The rasterizer consumes its buffer.
    let document = rasterizer.open(file.data.clone())?;
    if document.page_count() == 0 {
        return Err(FyloraError::Render("document has no pages".into()));
    }
    let frame = document.render_page(0, OCR_SCALE)?;

    let recognizer = TextRecognizer::new(&OcrModelPaths::from_config(config))?;
    let text = recognizer.recognize(frame.as_image())?;

    tracing::info!(chars = text.len(), "OCR complete");
    Ok(text.into_bytes())
}

/// Builds without the `ocr` feature have no recognition engine to run.
#[cfg(not(feature = "ocr"))]
pub fn recognize_first_page(_config: &EngineConfig, _file: &InputFile) -> Result<Vec<u8>> {
    Err(fylora_core::error::FyloraError::Ocr(
        "OCR support is not compiled into this build (enable the `ocr` feature)".into(),
    ))
}

#[cfg(all(test, not(feature = "ocr")))]
mod tests {
    use super::*;
    use crate::testpdf::sample_pdf;

    #[test]
    fn without_the_feature_the_handler_fails_cleanly() {
        let file = InputFile::pdf("doc.pdf", sample_pdf(&["scanned"]));
        let err = recognize_first_page(&EngineConfig::default(), &file).unwrap_err();
        assert!(matches!(err, fylora_core::error::FyloraError::Ocr(_)));
    }
}

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Transformation dispatcher — one typed operation in, one typed artifact
// out. Selection maps each operation to exactly one handler; there is no
// handler composition and no partial success.

use fylora_core::config::EngineConfig;
use fylora_core::error::Result;
use fylora_core::types::{InputFile, Operation, OperationOptions, OutputArtifact};
use tracing::{info, instrument};

use crate::handlers::{
    self, annotate, compress, convert, extract, merge, ocr, protect, redact, reorder, rotate,
    split, unlock, watermark,
};

/// The transformation engine.
///
/// Holds only configuration — every call loads its own in-memory documents,
/// so concurrent calls on different input sets are independent. Inputs are
/// never mutated; handlers that feed the consuming rasterizer copy first.
#[derive(Debug, Default)]
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Dispatch by string operation id, resolving the option bag first.
    ///
    /// Fails with `UnsupportedOperation` for unknown ids, and with the
    /// relevant missing-option error before any document I/O.
    #[instrument(skip(self, files, options), fields(file_count = files.len()))]
    pub fn process(
        &self,
        operation_id: &str,
        files: &[InputFile],
        options: &OperationOptions,
    ) -> Result<OutputArtifact> {
        let operation = Operation::resolve(operation_id, options)?;
        self.run(&operation, files)
    }

    /// Dispatch an already-typed operation.
    pub fn run(&self, operation: &Operation, files: &[InputFile]) -> Result<OutputArtifact> {
        info!(id = operation.id(), "Dispatching operation");

        let bytes = match operation {
            Operation::Merge => merge::merge(files)?,
            Operation::Split => split::split(handlers::primary(files)?)?,
            Operation::Rotate { angle } => rotate::rotate(handlers::primary(files)?, *angle)?,
            Operation::Compress { level } => {
                compress::compress(&self.config, handlers::primary(files)?, *level)?
            }
            Operation::Watermark { text } => {
                watermark::watermark(handlers::primary(files)?, text)?
            }
            Operation::Reorder => reorder::reorder(handlers::primary(files)?)?,
            Operation::Protect { password } => {
                protect::protect(handlers::primary(files)?, password)?
            }
            Operation::Unlock { password } => unlock::unlock(handlers::primary(files)?, password)?,
            Operation::PdfToText => extract::plain_text(handlers::primary(files)?)?,
            Operation::PdfToMarkdown => extract::markdown(handlers::primary(files)?)?,
            Operation::ImageToPdf => convert::images_to_pdf(files)?,
            Operation::PdfToImage => {
                convert::pdf_to_images(&self.config, handlers::primary(files)?)?
            }
            Operation::Ocr => ocr::recognize_first_page(&self.config, handlers::primary(files)?)?,
            Operation::Annotate { search_text, kind } => {
                annotate::annotate(handlers::primary(files)?, search_text, *kind)?
            }
            Operation::Redact => redact::redact(handlers::primary(files)?)?,
        };

        Ok(OutputArtifact::new(operation.output_kind(), bytes))
    }
}

/// One-shot dispatch with default configuration.
pub fn process(
    operation_id: &str,
    files: &[InputFile],
    options: &OperationOptions,
) -> Result<OutputArtifact> {
    Engine::default().process(operation_id, files, options)
}

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// fylora-document — Document model, rasterizer, and text extraction for the
// Fylora engine.
//
// Provides the structured PDF editor (load, create, save, page copying,
// rotation, content-stream drawing), the pdfium-backed page rasterizer with
// encodable raster frames, positioned text extraction, and the optional OCR
// recognizer.

pub mod pdf;
pub mod raster;

#[cfg(feature = "ocr")]
pub mod ocr;

// Re-export the primary types so callers can use `fylora_document::PdfEditor` etc.
pub use pdf::{Color, ImagePdfWriter, JpegPageImage, Overlay, OverlayFont, PdfEditor, TextRun};
pub use raster::{RasterDocument, RasterFrame, Rasterizer};

#[cfg(feature = "ocr")]
pub use ocr::{OcrModelPaths, TextRecognizer};

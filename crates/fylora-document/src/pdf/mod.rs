// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF module — structured editing, overlay drawing, raster page composition,
// image-document creation, and positioned text extraction.

pub mod compose;
pub mod draw;
pub mod editor;
pub mod text;
pub mod writer;

#[cfg(test)]
pub(crate) mod testdoc;

pub use compose::JpegPageImage;
pub use draw::{Color, Overlay, OverlayFont};
pub use editor::PdfEditor;
pub use text::{TextRun, extract_page_runs, page_plain_text};
pub use writer::ImagePdfWriter;

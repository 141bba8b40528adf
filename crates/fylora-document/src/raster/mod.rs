// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page rasterization using pdfium-render (dynamic linking — requires the
// platform pdfium library at runtime).

pub mod frame;

pub use frame::RasterFrame;

use fylora_core::config::EngineConfig;
use fylora_core::error::{FyloraError, Result};
use pdfium_render::prelude::*;
use tracing::{debug, info, instrument};

/// Handle to the pdfium rendering subsystem.
///
/// Construction fails with [`FyloraError::Render`] when no pdfium library can
/// be bound; callers with a fallback strategy (compression) recover from
/// that, callers without one (OCR, page export) surface it.
pub struct Rasterizer {
    pdfium: Pdfium,
}

impl Rasterizer {
    /// Bind to the pdfium library: an explicitly configured directory first,
    /// otherwise next to the executable, otherwise the system library path.
    #[instrument(skip_all)]
    pub fn new(config: &EngineConfig) -> Result<Self> {
        let bindings = match &config.pdfium_library_dir {
            Some(dir) => {
                Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(dir))
            }
            None => {
                Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
                    .or_else(|_| Pdfium::bind_to_system_library())
            }
        }
        .map_err(|err| FyloraError::Render(format!("pdfium is unavailable: {err}")))?;

        info!("pdfium bound");
        Ok(Self {
            pdfium: Pdfium::new(bindings),
        })
    }

    /// Open a document for rendering.
    ///
    /// Takes the byte buffer **by value**: the rendering subsystem owns the
    /// bytes for the lifetime of the document. Callers that still need the
    /// original buffer afterwards must pass an independent copy.
    pub fn open(&self, data: Vec<u8>) -> Result<RasterDocument<'_>> {
        let document = self
            .pdfium
            .load_pdf_from_byte_vec(data, None)
            .map_err(|err| {
                FyloraError::Render(format!("failed to open document for rendering: {err}"))
            })?;
        Ok(RasterDocument { document })
    }
}

/// A document opened for page rendering.
pub struct RasterDocument<'a> {
    document: PdfDocument<'a>,
}

impl RasterDocument<'_> {
    /// Number of renderable pages.
    pub fn page_count(&self) -> u16 {
        self.document.pages().len()
    }

    /// Render the page at `index` (0-based) at `scale` × its point size.
    ///
    /// A scale of 1.0 yields one pixel per point; 2.0 doubles both axes.
    #[instrument(skip(self))]
    pub fn render_page(&self, index: u16, scale: f32) -> Result<RasterFrame> {
        let pages = self.document.pages();
        let page = pages
            .get(index)
            .map_err(|err| FyloraError::Render(format!("failed to get page {index}: {err}")))?;

        let width_pt = page.width().value;
        let height_pt = page.height().value;
        let target_width = (width_pt * scale).ceil().max(1.0) as i32;
        let target_height = (height_pt * scale).ceil().max(1.0) as i32;

        let config = PdfRenderConfig::new()
            .set_target_width(target_width)
            .set_target_height(target_height);

        let bitmap = page
            .render_with_config(&config)
            .map_err(|err| FyloraError::Render(format!("failed to render page {index}: {err}")))?;

        debug!(target_width, target_height, "Page rendered");
        Ok(RasterFrame::new(bitmap.as_image()))
    }
}

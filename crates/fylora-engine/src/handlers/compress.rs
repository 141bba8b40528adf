// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Compress — rasterize every page to a lossy JPEG at a level-dependent scale
// and quality, with a two-tier fallback to structural compaction.
//
// The fallback ladder is modelled as an explicit state machine so each
// transition is independently testable:
//
//   Raster ──ok──▶ SizeCheck ──smaller──▶ done
//     │                │
//     │ render/encode  │ not smaller
//     ▼ failed         ▼
//   Deflate ◀──────────┘        (silent deflation: compaction only)

use fylora_core::config::EngineConfig;
use fylora_core::error::Result;
use fylora_core::types::{CompressLevel, InputFile, RasterPolicy};
use fylora_document::{JpegPageImage, PdfEditor, Rasterizer};
use tracing::{debug, info, instrument, warn};

enum CompressState {
    /// Primary strategy: render and re-encode every page.
    Raster,
    /// Raster output ready; accept it only if it actually shrank the file.
    SizeCheck(Vec<u8>),
    /// Silent deflation: reload and re-save with compaction only.
    Deflate,
}

/// Compress one PDF according to the level's raster policy, never returning
/// a rasterised result that is larger than the input.
#[instrument(skip_all, fields(name = %file.name, ?level, input_bytes = file.data.len()))]
pub fn compress(config: &EngineConfig, file: &InputFile, level: CompressLevel) -> Result<Vec<u8>> {
    let policy = level.policy();
    let mut state = CompressState::Raster;

    loop {
        state = match state {
            CompressState::Raster => match rasterize(config, &file.data, policy) {
                Ok(bytes) => CompressState::SizeCheck(bytes),
                Err(err) => {
                    warn!(%err, "Raster compression failed, falling back to deflation");
                    CompressState::Deflate
                }
            },
            CompressState::SizeCheck(bytes) => {
                if bytes.len() < file.data.len() {
                    debug!(output_bytes = bytes.len(), "Raster output accepted");
                    return Ok(bytes);
                }
                info!("Raster output did not shrink the file, using silent deflation");
                CompressState::Deflate
            }
            CompressState::Deflate => return deflate_only(&file.data),
        };
    }
}

/// Render every page at the policy scale, encode as JPEG at the policy
/// quality, and assemble an image-per-page document.
fn rasterize(config: &EngineConfig, data: &[u8], policy: RasterPolicy) -> Result<Vec<u8>> {
    let rasterizer = Rasterizer::new(config)?;
    // The rasterizer consumes its buffer; hand it a copy so the original
    // input stays available for the size check and the deflation fallback.
    let document = rasterizer.open(data.to_vec())?;

    let mut output = PdfEditor::empty();
    for index in 0..document.page_count() {
        let frame = document.render_page(index, policy.scale)?;
        let jpeg = frame.to_jpeg(policy.quality)?;
        output.append_jpeg_page(&JpegPageImage {
            data: jpeg,
            width: frame.width(),
            height: frame.height(),
        })?;
    }

    output.save_compacted()
}

/// Silent deflation: reload the original bytes (metadata untouched) and
/// re-save with structural compaction only. Page content is preserved
/// byte-for-byte at the visual level.
pub(crate) fn deflate_only(data: &[u8]) -> Result<Vec<u8>> {
    let mut editor = PdfEditor::from_bytes(data)?;
    editor.save_compacted()
}

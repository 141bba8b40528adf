// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Watermark — diagonal text stamped across every page.

use fylora_core::error::Result;
use fylora_core::types::InputFile;
use fylora_document::{Color, Overlay, OverlayFont, PdfEditor};
use tracing::{info, instrument};

const WATERMARK_SIZE: f32 = 50.0;
const WATERMARK_OPACITY: f32 = 0.3;
const WATERMARK_ANGLE: f32 = 45.0;
const WATERMARK_GRAY: Color = Color::new(0.75, 0.75, 0.75);

/// Draw `text` rotated 45° near the centre of every page, light gray at 30%
/// opacity.
///
/// Horizontal centering uses a character-count heuristic (15 units per
/// character), not measured glyph widths, so long strings sit left of true
/// centre. Known approximation, kept stable deliberately.
#[instrument(skip_all, fields(name = %file.name, text))]
pub fn watermark(file: &InputFile, text: &str) -> Result<Vec<u8>> {
    let mut editor = PdfEditor::from_bytes(&file.data)?;

    for index in 0..editor.page_count() {
        let (width, height) = editor.page_size(index)?;
        let x = width / 2.0 - text.chars().count() as f32 * 15.0;
        let y = height / 2.0;

        let mut overlay = Overlay::new();
        overlay.text(
            text,
            x,
            y,
            WATERMARK_SIZE,
            OverlayFont::HelveticaBold,
            WATERMARK_GRAY,
            WATERMARK_OPACITY,
            WATERMARK_ANGLE,
        );
        overlay.apply(&mut editor, index)?;
    }

    info!(pages = editor.page_count(), "Watermark applied");
    editor.save()
}

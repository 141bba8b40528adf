// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Redact — fixed-position opaque masking on the first page.
//
// Placeholder policy: one solid black rectangle at a fixed offset, not
// content-aware redaction. It does not search for sensitive content.

use fylora_core::error::Result;
use fylora_core::types::InputFile;
use fylora_document::{Color, Overlay, PdfEditor};
use tracing::{info, instrument};

const MASK_X: f32 = 50.0;
const MASK_TOP_OFFSET: f32 = 150.0;
const MASK_WIDTH: f32 = 250.0;
const MASK_HEIGHT: f32 = 40.0;

/// Draw one opaque black rectangle at `(50, height - 150)`, 250×40, on the
/// first page (if any page exists).
#[instrument(skip_all, fields(name = %file.name))]
pub fn redact(file: &InputFile) -> Result<Vec<u8>> {
    let mut editor = PdfEditor::from_bytes(&file.data)?;

    if editor.page_count() > 0 {
        let (_, height) = editor.page_size(0)?;
        let mut overlay = Overlay::new();
        overlay.fill_rect(
            MASK_X,
            height - MASK_TOP_OFFSET,
            MASK_WIDTH,
            MASK_HEIGHT,
            Color::BLACK,
            1.0,
        );
        overlay.apply(&mut editor, 0)?;
        info!("Redaction mask drawn");
    }

    editor.save()
}

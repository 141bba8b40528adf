// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Text and markdown extraction — page text items joined with single spaces,
// delimited per page. No layout reconstruction: reading order is whatever
// content-stream extraction yields.

use std::fmt::Write;

use fylora_core::error::Result;
use fylora_core::types::InputFile;
use fylora_document::PdfEditor;
use fylora_document::pdf::page_plain_text;
use tracing::{info, instrument};

/// Plain-text extraction with a `--- Page N ---` delimiter per page.
#[instrument(skip_all, fields(name = %file.name))]
pub fn plain_text(file: &InputFile) -> Result<Vec<u8>> {
    let editor = PdfEditor::from_bytes(&file.data)?;

    let mut text = String::new();
    for (index, page_id) in editor.page_ids().iter().enumerate() {
        let page_text = page_plain_text(editor.document(), *page_id)?;
        let _ = write!(text, "--- Page {} ---\n{}\n\n", index + 1, page_text);
    }

    info!(pages = editor.page_count(), chars = text.len(), "Text extracted");
    Ok(text.into_bytes())
}

/// Markdown extraction: a top-level heading naming the source file, then a
/// `## Page N` section per page.
#[instrument(skip_all, fields(name = %file.name))]
pub fn markdown(file: &InputFile) -> Result<Vec<u8>> {
    let editor = PdfEditor::from_bytes(&file.data)?;

    let mut md = format!("# Extracted Markdown ({})\n\n", file.name);
    for (index, page_id) in editor.page_ids().iter().enumerate() {
        let page_text = page_plain_text(editor.document(), *page_id)?;
        let _ = write!(md, "## Page {}\n{}\n\n", index + 1, page_text);
    }

    info!(pages = editor.page_count(), chars = md.len(), "Markdown extracted");
    Ok(md.into_bytes())
}

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Merge — concatenate the pages of every input, in input order.

use fylora_core::error::{FyloraError, Result};
use fylora_core::types::InputFile;
use fylora_document::PdfEditor;
use tracing::{info, instrument};

/// Append copies of every page of every input file, preserving both the
/// file order and each file's internal page order.
#[instrument(skip_all, fields(file_count = files.len()))]
pub fn merge(files: &[InputFile]) -> Result<Vec<u8>> {
    if files.is_empty() {
        return Err(FyloraError::NoInput);
    }

    let mut merged = PdfEditor::empty();
    for file in files {
        let source = PdfEditor::from_bytes(&file.data)?;
        merged.append_all_pages_from(&source)?;
    }

    info!(pages = merged.page_count(), "Merge complete");
    merged.save()
}

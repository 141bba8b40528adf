// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Split — one single-page PDF per page, archived under deterministic names.

use fylora_core::error::Result;
use fylora_core::types::InputFile;
use fylora_document::PdfEditor;
use tracing::{info, instrument};

use crate::archive::ArchiveBuilder;

/// Build a `page_<n>.pdf` (1-based) archive entry per page, in page order.
#[instrument(skip_all, fields(name = %file.name))]
pub fn split(file: &InputFile) -> Result<Vec<u8>> {
    let source = PdfEditor::from_bytes(&file.data)?;
    let mut archive = ArchiveBuilder::new();

    for index in 0..source.page_count() {
        let mut single = PdfEditor::empty();
        single.append_page_from(&source, index)?;
        archive.add_entry(&format!("page_{}.pdf", index + 1), &single.save()?)?;
    }

    info!(pages = source.page_count(), "Split complete");
    archive.finish()
}

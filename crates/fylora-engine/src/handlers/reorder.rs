// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Reorder — rebuild the document with its page order reversed.
//
// Named for the caller-facing "reorder pages" tool; full reversal is the
// sole implemented policy.

use fylora_core::error::Result;
use fylora_core::types::InputFile;
use fylora_document::PdfEditor;
use tracing::{info, instrument};

/// Produce a new document whose page order is the exact reverse of the
/// input's.
#[instrument(skip_all, fields(name = %file.name))]
pub fn reorder(file: &InputFile) -> Result<Vec<u8>> {
    let source = PdfEditor::from_bytes(&file.data)?;

    let mut reversed = PdfEditor::empty();
    for index in (0..source.page_count()).rev() {
        reversed.append_page_from(&source, index)?;
    }

    info!(pages = reversed.page_count(), "Pages reversed");
    reversed.save()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testpdf::sample_pdf;

    fn page_texts(bytes: &[u8]) -> Vec<String> {
        let editor = PdfEditor::from_bytes(bytes).unwrap();
        editor
            .page_ids()
            .iter()
            .map(|id| fylora_document::pdf::page_plain_text(editor.document(), *id).unwrap())
            .collect()
    }

    #[test]
    fn reverses_page_order() {
        let file = InputFile::pdf("doc.pdf", sample_pdf(&["first", "second", "third"]));
        let reversed = reorder(&file).unwrap();
        assert_eq!(page_texts(&reversed), ["third", "second", "first"]);
    }

    #[test]
    fn reorder_is_an_involution() {
        let original = sample_pdf(&["a", "b", "c", "d"]);
        let once = reorder(&InputFile::pdf("doc.pdf", original.clone())).unwrap();
        let twice = reorder(&InputFile::pdf("doc.pdf", once)).unwrap();
        assert_eq!(page_texts(&twice), page_texts(&original));
    }
}

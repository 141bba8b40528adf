// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Rotate — add an angle to every page's declared rotation.

use fylora_core::error::Result;
use fylora_core::types::InputFile;
use fylora_document::PdfEditor;
use tracing::instrument;

/// Set every page's rotation to `(current + angle) mod 360`.
#[instrument(skip_all, fields(name = %file.name, angle))]
pub fn rotate(file: &InputFile, angle: i32) -> Result<Vec<u8>> {
    let mut editor = PdfEditor::from_bytes(&file.data)?;
    editor.rotate_all(angle)?;
    editor.save()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testpdf::sample_pdf;

    #[test]
    fn four_quarter_turns_are_identity() {
        let mut bytes = sample_pdf(&["p1", "p2"]);
        for _ in 0..4 {
            bytes = rotate(&InputFile::pdf("doc.pdf", bytes), 90).unwrap();
        }
        let editor = PdfEditor::from_bytes(&bytes).unwrap();
        for index in 0..editor.page_count() {
            assert_eq!(editor.rotation(index).unwrap(), 0);
        }
    }

    #[test]
    fn rotation_accumulates() {
        let file = InputFile::pdf("doc.pdf", sample_pdf(&["p1"]));
        let once = rotate(&file, 180).unwrap();
        let twice = rotate(&InputFile::pdf("doc.pdf", once), 270).unwrap();

        let editor = PdfEditor::from_bytes(&twice).unwrap();
        assert_eq!(editor.rotation(0).unwrap(), 90);
    }
}

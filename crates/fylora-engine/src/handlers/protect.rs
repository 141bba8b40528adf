// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Protect — apply RC4-128 standard-handler encryption with the supplied
// password as both user and owner credential.

use fylora_core::error::Result;
use fylora_core::types::InputFile;
use fylora_document::PdfEditor;
use fylora_security::encrypt_document;
use tracing::{info, instrument};

/// Encrypt the document in place and serialise it. No page-copy round-trip:
/// the original object graph is preserved, only strings and streams are
/// enciphered.
#[instrument(skip_all, fields(name = %file.name))]
pub fn protect(file: &InputFile, password: &str) -> Result<Vec<u8>> {
    let mut editor = PdfEditor::from_bytes(&file.data)?;
    encrypt_document(editor.document_mut(), password)?;

    info!("Document protected");
    editor.save()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testpdf::sample_pdf;

    #[test]
    fn output_carries_encrypt_dictionary() {
        let file = InputFile::pdf("doc.pdf", sample_pdf(&["secret page"]));
        let output = protect(&file, "hunter2").unwrap();

        let editor = PdfEditor::from_bytes(&output).unwrap();
        assert!(editor.is_encrypted());
        assert_eq!(editor.page_count(), 1);
    }

    #[test]
    fn page_text_is_no_longer_readable_in_the_clear() {
        let file = InputFile::pdf("doc.pdf", sample_pdf(&["top secret phrase"]));
        let output = protect(&file, "hunter2").unwrap();

        let editor = PdfEditor::from_bytes(&output).unwrap();
        let text =
            fylora_document::pdf::page_plain_text(editor.document(), editor.page_id(0).unwrap())
                .unwrap_or_default();
        assert!(!text.contains("top secret phrase"));
    }
}

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unlock — authenticate, decrypt, and strip encryption via a three-tier
// recovery ladder modelled as an explicit state machine:
//
//   PasswordLoad ──decrypted──▶ CopyStrip ──▶ done
//        │
//        ├─ wrong password ──▶ IncorrectPassword (terminal, no retry)
//        │
//        └─ any other failure ──▶ FallbackLoad ──▶ plain re-save,
//                                    or CorruptedDocument with the
//                                    original error detail

use fylora_core::error::{FyloraError, Result};
use fylora_core::types::InputFile;
use fylora_document::PdfEditor;
use fylora_security::decrypt_document;
use tracing::{info, instrument, warn};

enum UnlockState {
    /// Load and authenticate with the supplied password.
    PasswordLoad,
    /// Decryption succeeded; rebuild into a fresh document so no encryption
    /// metadata can survive a re-save.
    CopyStrip(Box<PdfEditor>),
    /// Non-password failure; attempt an unauthenticated load and re-save.
    FallbackLoad(FyloraError),
}

/// Remove password protection from a document.
#[instrument(skip_all, fields(name = %file.name))]
pub fn unlock(file: &InputFile, password: &str) -> Result<Vec<u8>> {
    let mut state = UnlockState::PasswordLoad;

    loop {
        state = match state {
            UnlockState::PasswordLoad => match PdfEditor::from_bytes(&file.data) {
                Ok(mut editor) if editor.is_encrypted() => {
                    match decrypt_document(editor.document_mut(), password) {
                        Ok(()) => UnlockState::CopyStrip(Box::new(editor)),
                        Err(FyloraError::IncorrectPassword) => {
                            return Err(FyloraError::IncorrectPassword);
                        }
                        Err(err) => UnlockState::FallbackLoad(err),
                    }
                }
                // The file was never encrypted; a clean rebuild still yields
                // an unprotected document.
                Ok(editor) => UnlockState::CopyStrip(Box::new(editor)),
                Err(err) => UnlockState::FallbackLoad(err),
            },

            UnlockState::CopyStrip(source) => {
                let mut clean = PdfEditor::empty();
                clean.append_all_pages_from(&source)?;
                info!(pages = clean.page_count(), "Document unlocked");
                return clean.save();
            }

            UnlockState::FallbackLoad(original) => {
                warn!(%original, "Password load failed, attempting plain re-save");
                match PdfEditor::from_bytes(&file.data).and_then(|mut editor| editor.save()) {
                    Ok(bytes) => return Ok(bytes),
                    Err(_) => {
                        return Err(FyloraError::CorruptedDocument(original.to_string()));
                    }
                }
            }
        };
    }
}

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for the Fylora engine.

use thiserror::Error;

/// Top-level error type for all Fylora operations.
///
/// Every handler either recovers internally (compress, unlock) or surfaces
/// exactly one of these variants; the dispatcher never rewraps them.
#[derive(Debug, Error)]
pub enum FyloraError {
    // -- Dispatch errors --
    #[error("operation \"{0}\" is not supported")]
    UnsupportedOperation(String),

    #[error("no input file was supplied")]
    NoInput,

    // -- Credential errors --
    #[error("a password is required for this operation")]
    MissingPassword,

    #[error("incorrect password")]
    IncorrectPassword,

    // -- Document errors --
    #[error("document could not be parsed: {0}")]
    CorruptedDocument(String),

    #[error("PDF operation failed: {0}")]
    Pdf(String),

    #[error("image processing failed: {0}")]
    Image(String),

    // -- Annotation errors --
    #[error("search text is required for this operation")]
    MissingSearchText,

    #[error("could not find the text \"{0}\" anywhere in the document")]
    TextNotFound(String),

    // -- Rendering / recognition --
    #[error("page rendering failed: {0}")]
    Render(String),

    #[error("OCR failed: {0}")]
    Ocr(String),

    // -- Security --
    #[error("encryption failed: {0}")]
    Encryption(String),

    // -- Archives / I/O --
    #[error("archive error: {0}")]
    Archive(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, FyloraError>;

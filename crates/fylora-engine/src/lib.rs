// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// fylora-engine — Transformation dispatcher and operation handlers.
//
// The engine maps a requested operation over one or more in-memory PDF (or
// image) inputs and produces a single typed artifact: a PDF, a ZIP archive,
// plain text, or markdown. Everything runs in-process; there is no network,
// filesystem, or persisted state in this core.

pub mod archive;
pub mod dispatch;
pub mod handlers;

#[cfg(test)]
pub(crate) mod testpdf;

pub use dispatch::{Engine, process};

// Re-export the request/response vocabulary so callers need only this crate.
pub use fylora_core::config::EngineConfig;
pub use fylora_core::error::{FyloraError, Result};
pub use fylora_core::types::{
    AnnotationKind, ArtifactKind, CompressLevel, InputFile, MediaType, Operation,
    OperationCategory, OperationOptions, OutputArtifact,
};

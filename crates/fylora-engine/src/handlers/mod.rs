// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Operation handlers — one self-contained module per operation family.

pub mod annotate;
pub mod compress;
pub mod convert;
pub mod extract;
pub mod merge;
pub mod ocr;
pub mod protect;
pub mod redact;
pub mod reorder;
pub mod rotate;
pub mod split;
pub mod unlock;
pub mod watermark;

use fylora_core::error::{FyloraError, Result};
use fylora_core::types::InputFile;

/// Single-file operations consult only the first input.
pub(crate) fn primary(files: &[InputFile]) -> Result<&InputFile> {
    files.first().ok_or(FyloraError::NoInput)
}

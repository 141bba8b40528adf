// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Engine configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Configuration for constructing an engine instance.
///
/// Everything defaults to convention-based lookup; overrides exist for
/// sandboxed or bundled deployments where libraries and models live in
/// non-standard locations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Directory containing the platform pdfium library. When unset, the
    /// rasterizer looks next to the executable and then in system paths.
    pub pdfium_library_dir: Option<PathBuf>,
    /// Directory containing the OCR model files. When unset, the OCR engine
    /// uses the standard model cache directory.
    pub ocr_model_dir: Option<PathBuf>,
}

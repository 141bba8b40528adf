// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Fylora document engine.

use serde::{Deserialize, Serialize};

use crate::error::{FyloraError, Result};

/// Watermark text used when the caller supplies none.
pub const DEFAULT_WATERMARK_TEXT: &str = "FYLORA";

/// Rotation applied when the caller supplies no angle.
pub const DEFAULT_ROTATION_DEGREES: i32 = 90;

/// Declared media type of an input file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaType {
    Pdf,
    Png,
    Jpeg,
}

impl MediaType {
    /// MIME type string as declared by the uploader.
    pub fn mime(&self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
        }
    }

    /// Parse a MIME type string.
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime {
            "application/pdf" => Some(Self::Pdf),
            "image/png" => Some(Self::Png),
            "image/jpeg" | "image/jpg" => Some(Self::Jpeg),
            _ => None,
        }
    }

    /// Infer media type from a file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            _ => None,
        }
    }
}

/// A single input to an operation: an opaque binary payload with a declared
/// media type and a name.
///
/// Immutable once constructed — the engine never mutates input bytes, and
/// handlers that must hand a buffer to a consuming subsystem copy it first.
#[derive(Debug, Clone)]
pub struct InputFile {
    pub name: String,
    pub media_type: MediaType,
    pub data: Vec<u8>,
}

impl InputFile {
    pub fn new(name: impl Into<String>, media_type: MediaType, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            media_type,
            data,
        }
    }

    /// Convenience constructor for a PDF payload.
    pub fn pdf(name: impl Into<String>, data: Vec<u8>) -> Self {
        Self::new(name, MediaType::Pdf, data)
    }
}

/// The media type of a produced artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArtifactKind {
    Pdf,
    Zip,
    PlainText,
    Markdown,
}

impl ArtifactKind {
    /// MIME type the caller should tag the blob with.
    pub fn mime(&self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Zip => "application/zip",
            Self::PlainText => "text/plain",
            Self::Markdown => "text/markdown",
        }
    }

    /// Suggested file extension for downloads.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Zip => "zip",
            Self::PlainText => "txt",
            Self::Markdown => "md",
        }
    }
}

/// The typed binary blob returned by a successful operation.
///
/// Ephemeral — owned solely by the caller after return.
#[derive(Debug, Clone)]
pub struct OutputArtifact {
    pub kind: ArtifactKind,
    pub bytes: Vec<u8>,
}

impl OutputArtifact {
    pub fn new(kind: ArtifactKind, bytes: Vec<u8>) -> Self {
        Self { kind, bytes }
    }

    pub fn mime(&self) -> &'static str {
        self.kind.mime()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// Compression aggressiveness selected by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressLevel {
    Low,
    #[default]
    Balanced,
    High,
}

/// Raster scale and JPEG quality used by the compress pipeline for one level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterPolicy {
    /// Device-scale multiplier applied to page dimensions when rendering.
    pub scale: f32,
    /// JPEG encode quality factor in `0.0..=1.0`.
    pub quality: f32,
}

impl CompressLevel {
    /// Policy table: lower scale and quality yield smaller but lossier output.
    pub fn policy(&self) -> RasterPolicy {
        match self {
            Self::Low => RasterPolicy {
                scale: 2.0,
                quality: 0.8,
            },
            Self::Balanced => RasterPolicy {
                scale: 1.5,
                quality: 0.5,
            },
            Self::High => RasterPolicy {
                scale: 1.0,
                quality: 0.3,
            },
        }
    }
}

/// Kind of annotation drawn at matched text runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnotationKind {
    #[default]
    Highlight,
    Underline,
    Comment,
}

/// The untyped option bag accepted at the dispatch boundary.
///
/// Fields irrelevant to the requested operation are ignored, not validated.
/// Wire names match the caller-facing camelCase convention.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OperationOptions {
    pub password: Option<String>,
    pub watermark_text: Option<String>,
    pub rotation_angle: Option<i32>,
    pub compress_level: Option<CompressLevel>,
    pub search_text: Option<String>,
    pub annotation_type: Option<AnnotationKind>,
}

/// Coarse grouping of operations, mirrored from the caller-facing catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationCategory {
    Core,
    Convert,
    Advanced,
}

/// A fully-resolved operation: the closed set of transformations the engine
/// implements, each variant carrying its statically-typed option subset.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    Merge,
    Split,
    Rotate { angle: i32 },
    Compress { level: CompressLevel },
    Watermark { text: String },
    Reorder,
    Protect { password: String },
    Unlock { password: String },
    PdfToText,
    PdfToMarkdown,
    ImageToPdf,
    PdfToImage,
    Ocr,
    Annotate { search_text: String, kind: AnnotationKind },
    Redact,
}

impl Operation {
    /// Every operation id the engine recognizes, in catalog order.
    pub const ALL_IDS: [&'static str; 15] = [
        "merge",
        "split",
        "compress",
        "pdf-to-image",
        "image-to-pdf",
        "rotate",
        "reorder",
        "watermark",
        "protect",
        "unlock",
        "pdf-to-txt",
        "pdf-to-md",
        "ocr",
        "annotate",
        "redact",
    ];

    /// Resolve a string operation id and an option bag into a typed operation.
    ///
    /// Fills defaults, and rejects missing required options (password, search
    /// text) here, before any document I/O happens. An empty string counts as
    /// absent for required options.
    pub fn resolve(id: &str, options: &OperationOptions) -> Result<Self> {
        let op = match id {
            "merge" => Self::Merge,
            "split" => Self::Split,
            "rotate" => Self::Rotate {
                angle: options.rotation_angle.unwrap_or(DEFAULT_ROTATION_DEGREES),
            },
            "compress" => Self::Compress {
                level: options.compress_level.unwrap_or_default(),
            },
            "watermark" => Self::Watermark {
                text: options
                    .watermark_text
                    .clone()
                    .filter(|t| !t.is_empty())
                    .unwrap_or_else(|| DEFAULT_WATERMARK_TEXT.to_string()),
            },
            "reorder" => Self::Reorder,
            "protect" => Self::Protect {
                password: required_password(options)?,
            },
            "unlock" => Self::Unlock {
                password: required_password(options)?,
            },
            "pdf-to-txt" => Self::PdfToText,
            "pdf-to-md" => Self::PdfToMarkdown,
            "image-to-pdf" => Self::ImageToPdf,
            "pdf-to-image" => Self::PdfToImage,
            "ocr" => Self::Ocr,
            "annotate" => Self::Annotate {
                search_text: options
                    .search_text
                    .clone()
                    .filter(|t| !t.is_empty())
                    .ok_or(FyloraError::MissingSearchText)?,
                kind: options.annotation_type.unwrap_or_default(),
            },
            "redact" => Self::Redact,
            other => return Err(FyloraError::UnsupportedOperation(other.to_string())),
        };
        Ok(op)
    }

    /// Canonical string id of this operation.
    pub fn id(&self) -> &'static str {
        match self {
            Self::Merge => "merge",
            Self::Split => "split",
            Self::Rotate { .. } => "rotate",
            Self::Compress { .. } => "compress",
            Self::Watermark { .. } => "watermark",
            Self::Reorder => "reorder",
            Self::Protect { .. } => "protect",
            Self::Unlock { .. } => "unlock",
            Self::PdfToText => "pdf-to-txt",
            Self::PdfToMarkdown => "pdf-to-md",
            Self::ImageToPdf => "image-to-pdf",
            Self::PdfToImage => "pdf-to-image",
            Self::Ocr => "ocr",
            Self::Annotate { .. } => "annotate",
            Self::Redact => "redact",
        }
    }

    /// Short display name for capability listings.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Merge => "Merge PDF",
            Self::Split => "Split PDF",
            Self::Rotate { .. } => "Rotate PDF",
            Self::Compress { .. } => "Compress PDF",
            Self::Watermark { .. } => "Add Watermark",
            Self::Reorder => "Reorder Pages",
            Self::Protect { .. } => "Protect PDF",
            Self::Unlock { .. } => "Unlock PDF",
            Self::PdfToText => "PDF to Text",
            Self::PdfToMarkdown => "PDF to Markdown",
            Self::ImageToPdf => "Image to PDF",
            Self::PdfToImage => "PDF to Image",
            Self::Ocr => "OCR Extract",
            Self::Annotate { .. } => "Annotate PDF",
            Self::Redact => "Redact PDF",
        }
    }

    /// One-line description for capability listings.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Merge => "Combine multiple PDFs into one document",
            Self::Split => "Extract pages into separate files",
            Self::Rotate { .. } => "Rotate pages in any direction",
            Self::Compress { .. } => "Reduce file size while maintaining quality",
            Self::Watermark { .. } => "Add a text watermark to every page",
            Self::Reorder => "Rearrange the page order",
            Self::Protect { .. } => "Add password protection to a PDF",
            Self::Unlock { .. } => "Remove a password from a protected PDF",
            Self::PdfToText => "Extract plain text from PDF files",
            Self::PdfToMarkdown => "Convert PDF content to Markdown",
            Self::ImageToPdf => "Create a PDF from images",
            Self::PdfToImage => "Convert PDF pages to images",
            Self::Ocr => "Extract text from scanned documents",
            Self::Annotate { .. } => "Add highlights, underlines, and comments",
            Self::Redact => "Mask content with an opaque block",
        }
    }

    /// Catalog grouping for this operation.
    pub fn category(&self) -> OperationCategory {
        match self {
            Self::Merge
            | Self::Split
            | Self::Rotate { .. }
            | Self::Compress { .. }
            | Self::Watermark { .. }
            | Self::Reorder
            | Self::Protect { .. }
            | Self::Unlock { .. } => OperationCategory::Core,
            Self::PdfToText
            | Self::PdfToMarkdown
            | Self::ImageToPdf
            | Self::PdfToImage => OperationCategory::Convert,
            Self::Ocr | Self::Annotate { .. } | Self::Redact => OperationCategory::Advanced,
        }
    }

    /// The artifact kind this operation produces on success.
    pub fn output_kind(&self) -> ArtifactKind {
        match self {
            Self::Split | Self::PdfToImage => ArtifactKind::Zip,
            Self::PdfToText | Self::Ocr => ArtifactKind::PlainText,
            Self::PdfToMarkdown => ArtifactKind::Markdown,
            _ => ArtifactKind::Pdf,
        }
    }
}

fn required_password(options: &OperationOptions) -> Result<String> {
    options
        .password
        .clone()
        .filter(|p| !p.is_empty())
        .ok_or(FyloraError::MissingPassword)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_fills_defaults() {
        let options = OperationOptions::default();

        match Operation::resolve("rotate", &options).unwrap() {
            Operation::Rotate { angle } => assert_eq!(angle, 90),
            other => panic!("unexpected operation: {other:?}"),
        }
        match Operation::resolve("watermark", &options).unwrap() {
            Operation::Watermark { text } => assert_eq!(text, "FYLORA"),
            other => panic!("unexpected operation: {other:?}"),
        }
        match Operation::resolve("compress", &options).unwrap() {
            Operation::Compress { level } => assert_eq!(level, CompressLevel::Balanced),
            other => panic!("unexpected operation: {other:?}"),
        }
    }

    #[test]
    fn resolve_rejects_unknown_id() {
        let err = Operation::resolve("sign", &OperationOptions::default()).unwrap_err();
        assert!(matches!(err, FyloraError::UnsupportedOperation(id) if id == "sign"));
    }

    #[test]
    fn empty_password_counts_as_missing() {
        let options = OperationOptions {
            password: Some(String::new()),
            ..Default::default()
        };
        for id in ["protect", "unlock"] {
            let err = Operation::resolve(id, &options).unwrap_err();
            assert!(matches!(err, FyloraError::MissingPassword), "id {id}");
        }
    }

    #[test]
    fn annotate_requires_search_text() {
        let err = Operation::resolve("annotate", &OperationOptions::default()).unwrap_err();
        assert!(matches!(err, FyloraError::MissingSearchText));
    }

    #[test]
    fn every_catalog_id_resolves() {
        let options = OperationOptions {
            password: Some("secret".into()),
            search_text: Some("term".into()),
            ..Default::default()
        };
        for id in Operation::ALL_IDS {
            let op = Operation::resolve(id, &options).unwrap();
            assert_eq!(op.id(), id);
        }
    }

    #[test]
    fn options_deserialize_from_camel_case() {
        let options: OperationOptions = serde_json::from_str(
            r#"{"watermarkText":"DRAFT","rotationAngle":180,"compressLevel":"high","annotationType":"underline"}"#,
        )
        .unwrap();
        assert_eq!(options.watermark_text.as_deref(), Some("DRAFT"));
        assert_eq!(options.rotation_angle, Some(180));
        assert_eq!(options.compress_level, Some(CompressLevel::High));
        assert_eq!(options.annotation_type, Some(AnnotationKind::Underline));
    }

    #[test]
    fn compression_policy_table() {
        assert_eq!(
            CompressLevel::Low.policy(),
            RasterPolicy {
                scale: 2.0,
                quality: 0.8
            }
        );
        assert_eq!(
            CompressLevel::Balanced.policy(),
            RasterPolicy {
                scale: 1.5,
                quality: 0.5
            }
        );
        assert_eq!(
            CompressLevel::High.policy(),
            RasterPolicy {
                scale: 1.0,
                quality: 0.3
            }
        );
    }
}

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Positioned text extraction — interpret page content streams and yield text
// runs with their text-matrix anchor, in PDF coordinate space (bottom-up).
//
// This is a lightweight interpreter: it tracks the text and line matrices
// and the selected font size, but not glyph metrics or the graphics CTM.
// Anchors are exact for Td/TD/Tm-positioned text; run widths are not
// measured (callers fall back to character-count estimates), and successive
// show operators without repositioning report the same anchor.

use fylora_core::error::{FyloraError, Result};
use lopdf::content::Content;
use lopdf::{Document, Object, ObjectId};
use tracing::{debug, instrument};

use super::editor::number;

/// One text-showing operation from a page content stream.
#[derive(Debug, Clone)]
pub struct TextRun {
    pub text: String,
    /// Anchor x, from the text matrix translation.
    pub x: f32,
    /// Anchor y, from the text matrix translation (bottom-up).
    pub y: f32,
    /// Effective glyph height (font size × vertical matrix scale), when the
    /// content stream selected a font size.
    pub height: Option<f32>,
    /// Raw vertical scale of the text matrix.
    pub v_scale: Option<f32>,
    /// Measured advance width. Always `None` for this interpreter; kept in
    /// the shape so measuring backends can slot in.
    pub width: Option<f32>,
}

/// 2D affine matrix `[a b c d e f]` as used by PDF text state.
#[derive(Debug, Clone, Copy)]
struct Matrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
}

impl Matrix {
    const IDENTITY: Self = Self {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    /// Pre-translate: the result positions `(tx, ty)` in this matrix's space.
    fn translated(&self, tx: f32, ty: f32) -> Self {
        Self {
            e: tx * self.a + ty * self.c + self.e,
            f: tx * self.b + ty * self.d + self.f,
            ..*self
        }
    }
}

/// Extract all text runs from the page's content stream, in stream order.
#[instrument(skip_all)]
pub fn extract_page_runs(document: &Document, page_id: ObjectId) -> Result<Vec<TextRun>> {
    let content_data = document
        .get_page_content(page_id)
        .map_err(|err| FyloraError::Pdf(format!("failed to read page content: {err}")))?;
    let content = Content::decode(&content_data)
        .map_err(|err| FyloraError::Pdf(format!("failed to decode page content: {err}")))?;

    let mut runs = Vec::new();
    let mut text_matrix = Matrix::IDENTITY;
    let mut line_matrix = Matrix::IDENTITY;
    let mut font_size: f32 = 0.0;
    let mut leading: f32 = 0.0;

    for op in &content.operations {
        let operands = &op.operands;
        match op.operator.as_str() {
            "BT" => {
                text_matrix = Matrix::IDENTITY;
                line_matrix = Matrix::IDENTITY;
            }
            "ET" => {}
            "Tf" => {
                if let Some(size) = operands.get(1).and_then(number) {
                    font_size = size;
                }
            }
            "TL" => {
                if let Some(value) = operands.first().and_then(number) {
                    leading = value;
                }
            }
            "Td" => {
                if let (Some(tx), Some(ty)) = (
                    operands.first().and_then(number),
                    operands.get(1).and_then(number),
                ) {
                    line_matrix = line_matrix.translated(tx, ty);
                    text_matrix = line_matrix;
                }
            }
            "TD" => {
                if let (Some(tx), Some(ty)) = (
                    operands.first().and_then(number),
                    operands.get(1).and_then(number),
                ) {
                    leading = -ty;
                    line_matrix = line_matrix.translated(tx, ty);
                    text_matrix = line_matrix;
                }
            }
            "Tm" => {
                if operands.len() == 6 {
                    let values: Vec<f32> = operands.iter().filter_map(number).collect();
                    if values.len() == 6 {
                        line_matrix = Matrix {
                            a: values[0],
                            b: values[1],
                            c: values[2],
                            d: values[3],
                            e: values[4],
                            f: values[5],
                        };
                        text_matrix = line_matrix;
                    }
                }
            }
            "T*" => {
                line_matrix = line_matrix.translated(0.0, -leading);
                text_matrix = line_matrix;
            }
            "Tj" => {
                if let Some(text) = operands.first().and_then(decode_string) {
                    push_run(&mut runs, text, &text_matrix, font_size);
                }
            }
            "'" => {
                line_matrix = line_matrix.translated(0.0, -leading);
                text_matrix = line_matrix;
                if let Some(text) = operands.first().and_then(decode_string) {
                    push_run(&mut runs, text, &text_matrix, font_size);
                }
            }
            "\"" => {
                line_matrix = line_matrix.translated(0.0, -leading);
                text_matrix = line_matrix;
                if let Some(text) = operands.get(2).and_then(decode_string) {
                    push_run(&mut runs, text, &text_matrix, font_size);
                }
            }
            "TJ" => {
                if let Some(Object::Array(items)) = operands.first() {
                    let mut text = String::new();
                    for item in items {
                        if let Some(piece) = decode_string(item) {
                            text.push_str(&piece);
                        }
                    }
                    if !text.is_empty() {
                        push_run(&mut runs, text, &text_matrix, font_size);
                    }
                }
            }
            _ => {}
        }
    }

    debug!(runs = runs.len(), "Text runs extracted");
    Ok(runs)
}

/// Plain text of one page: its runs joined with single spaces. Reading order
/// is whatever the content stream yields.
pub fn page_plain_text(document: &Document, page_id: ObjectId) -> Result<String> {
    let runs = extract_page_runs(document, page_id)?;
    Ok(runs
        .iter()
        .map(|run| run.text.as_str())
        .collect::<Vec<_>>()
        .join(" "))
}

fn push_run(runs: &mut Vec<TextRun>, text: String, matrix: &Matrix, font_size: f32) {
    if text.is_empty() {
        return;
    }
    let v_scale = (matrix.d != 0.0).then(|| matrix.d.abs());
    let height = (font_size > 0.0 && matrix.d != 0.0).then(|| font_size * matrix.d.abs());
    runs.push(TextRun {
        text,
        x: matrix.e,
        y: matrix.f,
        height,
        v_scale,
        width: None,
    });
}

/// Decode a PDF string object: UTF-16BE when BOM-prefixed, Latin-1 otherwise.
fn decode_string(object: &Object) -> Option<String> {
    let Object::String(bytes, _) = object else {
        return None;
    };
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        Some(String::from_utf16_lossy(&utf16))
    } else {
        Some(bytes.iter().map(|&b| b as char).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::editor::PdfEditor;
    use crate::pdf::testdoc::sample_pdf;

    #[test]
    fn runs_carry_anchor_and_size() {
        let editor = PdfEditor::from_bytes(&sample_pdf(&["Invoice 42"])).unwrap();
        let runs = extract_page_runs(editor.document(), editor.page_id(0).unwrap()).unwrap();

        assert_eq!(runs.len(), 1);
        let run = &runs[0];
        assert_eq!(run.text, "Invoice 42");
        assert_eq!(run.x, 100.0);
        assert_eq!(run.y, 700.0);
        assert_eq!(run.height, Some(24.0));
        assert_eq!(run.width, None);
    }

    #[test]
    fn plain_text_joins_runs_with_spaces() {
        use lopdf::content::{Content, Operation};
        use lopdf::{Dictionary, Object, Stream};

        // Two separate show operations on one page.
        let mut editor = PdfEditor::from_bytes(&sample_pdf(&["first"])).unwrap();
        let extra = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![100.into(), 600.into()]),
                Operation::new("Tj", vec![Object::string_literal("second")]),
                Operation::new("ET", vec![]),
            ],
        };
        let page_id = editor.page_id(0).unwrap();
        let stream_id = editor.document_mut().add_object(Stream::new(
            Dictionary::new(),
            extra.encode().unwrap(),
        ));
        if let Ok(Object::Dictionary(dict)) = editor.document_mut().get_object_mut(page_id) {
            let existing = dict.get(b"Contents").unwrap().clone();
            dict.set(
                "Contents",
                Object::Array(vec![existing, Object::Reference(stream_id)]),
            );
        }

        let text = page_plain_text(editor.document(), page_id).unwrap();
        assert_eq!(text, "first second");
    }

    #[test]
    fn tm_positioning_is_respected() {
        use lopdf::content::{Content, Operation};

        let mut editor = PdfEditor::from_bytes(&sample_pdf(&["ignored"])).unwrap();
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 10.into()]),
                Operation::new(
                    "Tm",
                    vec![
                        Object::Real(2.0),
                        Object::Real(0.0),
                        Object::Real(0.0),
                        Object::Real(2.0),
                        Object::Real(50.0),
                        Object::Real(60.0),
                    ],
                ),
                Operation::new("Tj", vec![Object::string_literal("scaled")]),
                Operation::new("ET", vec![]),
            ],
        };
        let page_id = editor.page_id(0).unwrap();
        let encoded = content.encode().unwrap();
        let stream_id = editor
            .document_mut()
            .add_object(lopdf::Stream::new(lopdf::Dictionary::new(), encoded));
        if let Ok(Object::Dictionary(dict)) = editor.document_mut().get_object_mut(page_id) {
            dict.set("Contents", Object::Reference(stream_id));
        }

        let runs = extract_page_runs(editor.document(), page_id).unwrap();
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].x, 50.0);
        assert_eq!(runs[0].y, 60.0);
        assert_eq!(runs[0].height, Some(20.0));
        assert_eq!(runs[0].v_scale, Some(2.0));
    }
}

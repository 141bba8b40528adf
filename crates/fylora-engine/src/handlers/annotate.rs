// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Annotate — draw highlight, underline, or comment primitives anchored at
// every text run containing the search term (case-insensitive).

use fylora_core::error::{FyloraError, Result};
use fylora_core::types::{AnnotationKind, InputFile};
use fylora_document::{Color, Overlay, OverlayFont, PdfEditor, TextRun};
use fylora_document::pdf::extract_page_runs;
use tracing::{info, instrument};

const GOLDEN_YELLOW: Color = Color::new(1.0, 0.8, 0.0);
const DEEP_RED: Color = Color::new(0.8, 0.0, 0.0);
const LIGHT_RED: Color = Color::new(1.0, 0.9, 0.9);

/// Width of the fixed comment badge, in content-space units.
const COMMENT_BADGE_WIDTH: f32 = 70.0;

/// Search the whole document for `search_text` and draw one annotation per
/// matching text run. Zero matches anywhere fails with `TextNotFound` and
/// produces no output.
#[instrument(skip_all, fields(name = %file.name, search_text, ?kind))]
pub fn annotate(file: &InputFile, search_text: &str, kind: AnnotationKind) -> Result<Vec<u8>> {
    let mut editor = PdfEditor::from_bytes(&file.data)?;
    let needle = search_text.to_lowercase();
    let mut matches = 0usize;

    for index in 0..editor.page_count() {
        let page_id = editor.page_id(index)?;
        let runs = extract_page_runs(editor.document(), page_id)?;

        let mut overlay = Overlay::new();
        for run in runs
            .iter()
            .filter(|run| run.text.to_lowercase().contains(&needle))
        {
            draw_annotation(&mut overlay, run, kind);
            matches += 1;
        }
        if !overlay.is_empty() {
            overlay.apply(&mut editor, index)?;
        }
    }

    if matches == 0 {
        return Err(FyloraError::TextNotFound(search_text.to_string()));
    }

    info!(matches, "Annotations drawn");
    editor.save()
}

/// Font-size and width fallback ladders for a matched run.
///
/// Ordered approximations, preserved deliberately: measured height, then the
/// transform's vertical scale, then 12; measured width, then half the font
/// size per character. Downstream visuals depend on these exact offsets.
fn effective_metrics(run: &TextRun) -> (f32, f32) {
    let font_size = run.height.or(run.v_scale).unwrap_or(12.0).abs();
    let width = run
        .width
        .unwrap_or_else(|| run.text.chars().count() as f32 * font_size * 0.5);
    (font_size, width)
}

fn draw_annotation(overlay: &mut Overlay, run: &TextRun, kind: AnnotationKind) {
    let (font_size, width) = effective_metrics(run);

    match kind {
        AnnotationKind::Highlight => {
            // Dropped slightly below the baseline to cover descenders, with
            // padded height.
            overlay.fill_rect(
                run.x,
                run.y - font_size * 0.2,
                width,
                font_size * 1.2,
                GOLDEN_YELLOW,
                0.4,
            );
        }
        AnnotationKind::Underline => {
            overlay.stroke_line(
                (run.x, run.y - 2.0),
                (run.x + width, run.y - 2.0),
                (font_size * 0.1).max(1.0),
                DEEP_RED,
            );
        }
        AnnotationKind::Comment => {
            let badge_height = (font_size * 1.5).max(14.0);
            overlay.fill_rect(
                run.x + width + 8.0,
                run.y - badge_height * 0.2,
                COMMENT_BADGE_WIDTH,
                badge_height,
                LIGHT_RED,
                1.0,
            );
            overlay.text(
                "Annotated",
                run.x + width + 12.0,
                run.y,
                font_size * 0.8,
                OverlayFont::Helvetica,
                DEEP_RED,
                1.0,
                0.0,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testpdf::sample_pdf;

    #[test]
    fn absent_text_fails_and_produces_nothing() {
        let file = InputFile::pdf("doc.pdf", sample_pdf(&["nothing to see"]));
        let err = annotate(&file, "missing", AnnotationKind::Highlight).unwrap_err();
        assert!(matches!(err, FyloraError::TextNotFound(term) if term == "missing"));
    }

    #[test]
    fn match_is_case_insensitive() {
        let file = InputFile::pdf("doc.pdf", sample_pdf(&["Invoice 42"]));
        let output = annotate(&file, "invoice", AnnotationKind::Highlight).unwrap();
        assert!(PdfEditor::from_bytes(&output).is_ok());
    }

    #[test]
    fn one_match_yields_one_overlay_stream() {
        let file = InputFile::pdf("doc.pdf", sample_pdf(&["Invoice 42", "no match here"]));
        let output = annotate(&file, "Invoice", AnnotationKind::Underline).unwrap();

        let editor = PdfEditor::from_bytes(&output).unwrap();
        // Matched page gains a second content stream; unmatched page does not.
        let first = editor.document().get_object(editor.page_id(0).unwrap()).unwrap();
        let contents = first.as_dict().unwrap().get(b"Contents").unwrap();
        assert!(matches!(contents, lopdf::Object::Array(items) if items.len() == 2));

        let second = editor.document().get_object(editor.page_id(1).unwrap()).unwrap();
        let contents = second.as_dict().unwrap().get(b"Contents").unwrap();
        assert!(matches!(contents, lopdf::Object::Reference(_)));
    }

    #[test]
    fn metrics_fall_back_by_ladder() {
        let measured = TextRun {
            text: "abcd".into(),
            x: 0.0,
            y: 0.0,
            height: Some(20.0),
            v_scale: Some(1.0),
            width: Some(80.0),
        };
        assert_eq!(effective_metrics(&measured), (20.0, 80.0));

        let scale_only = TextRun {
            text: "abcd".into(),
            x: 0.0,
            y: 0.0,
            height: None,
            v_scale: Some(14.0),
            width: None,
        };
        // width estimate: 4 chars * 14 * 0.5
        assert_eq!(effective_metrics(&scale_only), (14.0, 28.0));

        let bare = TextRun {
            text: "ab".into(),
            x: 0.0,
            y: 0.0,
            height: None,
            v_scale: None,
            width: None,
        };
        assert_eq!(effective_metrics(&bare), (12.0, 12.0));
    }

    #[test]
    fn comment_kind_draws_badge_and_label() {
        let file = InputFile::pdf("doc.pdf", sample_pdf(&["flag this phrase"]));
        let output = annotate(&file, "phrase", AnnotationKind::Comment).unwrap();

        let editor = PdfEditor::from_bytes(&output).unwrap();
        let text =
            fylora_document::pdf::page_plain_text(editor.document(), editor.page_id(0).unwrap())
                .unwrap();
        assert!(text.contains("Annotated"));
    }
}

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Content-stream drawing — append text, rectangles, and lines to existing
// pages at absolute coordinates, with per-primitive colour and opacity.

use fylora_core::error::{FyloraError, Result};
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use tracing::{debug, instrument};

use super::editor::PdfEditor;

/// An RGB colour with components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0);
}

/// Built-in fonts available for overlay text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayFont {
    Helvetica,
    HelveticaBold,
}

impl OverlayFont {
    fn base_font(&self) -> &'static [u8] {
        match self {
            Self::Helvetica => b"Helvetica",
            Self::HelveticaBold => b"Helvetica-Bold",
        }
    }

    fn resource_name(&self) -> &'static str {
        match self {
            Self::Helvetica => "FyHv",
            Self::HelveticaBold => "FyHvB",
        }
    }
}

/// A batch of drawing primitives destined for one page.
///
/// Primitives accumulate as content operations; [`Overlay::apply`] appends
/// them to the page's content stream and registers the fonts and opacity
/// graphics states the batch needs. Each primitive is isolated in its own
/// q/Q pair so it cannot leak graphics state into the page.
pub struct Overlay {
    operations: Vec<Operation>,
    /// Distinct fill/stroke alphas that need an ExtGState entry.
    alphas: Vec<f32>,
    fonts: Vec<OverlayFont>,
}

impl Overlay {
    pub fn new() -> Self {
        Self {
            operations: Vec::new(),
            alphas: Vec::new(),
            fonts: Vec::new(),
        }
    }

    /// True when nothing has been drawn.
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    // -- Primitives -----------------------------------------------------------

    /// Fill an axis-aligned rectangle. `opacity` of 1.0 draws fully opaque.
    pub fn fill_rect(
        &mut self,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: Color,
        opacity: f32,
    ) {
        self.operations.push(Operation::new("q", vec![]));
        self.push_alpha(opacity);
        self.operations.push(Operation::new(
            "rg",
            vec![real(color.r), real(color.g), real(color.b)],
        ));
        self.operations.push(Operation::new(
            "re",
            vec![real(x), real(y), real(width), real(height)],
        ));
        self.operations.push(Operation::new("f", vec![]));
        self.operations.push(Operation::new("Q", vec![]));
    }

    /// Stroke a straight line of the given thickness.
    pub fn stroke_line(
        &mut self,
        from: (f32, f32),
        to: (f32, f32),
        thickness: f32,
        color: Color,
    ) {
        self.operations.push(Operation::new("q", vec![]));
        self.operations.push(Operation::new(
            "RG",
            vec![real(color.r), real(color.g), real(color.b)],
        ));
        self.operations
            .push(Operation::new("w", vec![real(thickness)]));
        self.operations
            .push(Operation::new("m", vec![real(from.0), real(from.1)]));
        self.operations
            .push(Operation::new("l", vec![real(to.0), real(to.1)]));
        self.operations.push(Operation::new("S", vec![]));
        self.operations.push(Operation::new("Q", vec![]));
    }

    /// Draw a text run at `(x, y)` with optional rotation about that point.
    #[allow(clippy::too_many_arguments)]
    pub fn text(
        &mut self,
        text: &str,
        x: f32,
        y: f32,
        size: f32,
        font: OverlayFont,
        color: Color,
        opacity: f32,
        rotate_degrees: f32,
    ) {
        if !self.fonts.contains(&font) {
            self.fonts.push(font);
        }

        self.operations.push(Operation::new("q", vec![]));
        self.push_alpha(opacity);
        self.operations.push(Operation::new(
            "rg",
            vec![real(color.r), real(color.g), real(color.b)],
        ));
        self.operations.push(Operation::new("BT", vec![]));
        self.operations.push(Operation::new(
            "Tf",
            vec![font.resource_name().into(), real(size)],
        ));

        let radians = rotate_degrees.to_radians();
        let (sin, cos) = radians.sin_cos();
        self.operations.push(Operation::new(
            "Tm",
            vec![
                real(cos),
                real(sin),
                real(-sin),
                real(cos),
                real(x),
                real(y),
            ],
        ));
        self.operations
            .push(Operation::new("Tj", vec![Object::string_literal(text)]));
        self.operations.push(Operation::new("ET", vec![]));
        self.operations.push(Operation::new("Q", vec![]));
    }

    // -- Application ----------------------------------------------------------

    /// Append the accumulated primitives to the page at `page_index`.
    ///
    /// Registers required font and ExtGState resources on the page (shadowing
    /// inherited resources with an extended inline copy when necessary).
    #[instrument(skip_all, fields(page_index, ops = self.operations.len()))]
    pub fn apply(self, editor: &mut PdfEditor, page_index: usize) -> Result<()> {
        if self.is_empty() {
            return Ok(());
        }

        let page_id = editor.page_id(page_index)?;
        let document = editor.document_mut();

        // Font objects must exist before the page dictionary is rewritten.
        let mut font_refs = Vec::with_capacity(self.fonts.len());
        for font in &self.fonts {
            let font_id = document.add_object(Dictionary::from_iter([
                ("Type", Object::Name(b"Font".to_vec())),
                ("Subtype", Object::Name(b"Type1".to_vec())),
                ("BaseFont", Object::Name(font.base_font().to_vec())),
            ]));
            font_refs.push((font.resource_name(), font_id));
        }

        let mut resources = resolved_resources(document, page_id);

        if !font_refs.is_empty() {
            let mut font_dict = resolved_subdict(document, &resources, b"Font");
            for (name, id) in font_refs {
                font_dict.set(name, Object::Reference(id));
            }
            resources.set("Font", Object::Dictionary(font_dict));
        }

        if !self.alphas.is_empty() {
            let mut gs_dict = resolved_subdict(document, &resources, b"ExtGState");
            for (index, alpha) in self.alphas.iter().enumerate() {
                gs_dict.set(
                    alpha_state_name(index),
                    Object::Dictionary(Dictionary::from_iter([
                        ("Type", Object::Name(b"ExtGState".to_vec())),
                        ("ca", Object::Real(*alpha)),
                        ("CA", Object::Real(*alpha)),
                    ])),
                );
            }
            resources.set("ExtGState", Object::Dictionary(gs_dict));
        }

        let encoded = Content {
            operations: self.operations,
        }
        .encode()
        .map_err(|err| FyloraError::Pdf(format!("failed to encode overlay content: {err}")))?;
        let content_id = document.add_object(Stream::new(Dictionary::new(), encoded));

        let page = document
            .get_object_mut(page_id)
            .map_err(|err| FyloraError::Pdf(format!("failed to get page: {err}")))?;
        let Object::Dictionary(page_dict) = page else {
            return Err(FyloraError::Pdf("page object is not a dictionary".into()));
        };

        page_dict.set("Resources", Object::Dictionary(resources));

        match page_dict.get(b"Contents").ok().cloned() {
            Some(Object::Reference(existing)) => {
                page_dict.set(
                    "Contents",
                    Object::Array(vec![
                        Object::Reference(existing),
                        Object::Reference(content_id),
                    ]),
                );
            }
            Some(Object::Array(mut items)) => {
                items.push(Object::Reference(content_id));
                page_dict.set("Contents", Object::Array(items));
            }
            _ => {
                page_dict.set("Contents", Object::Reference(content_id));
            }
        }

        debug!("Overlay applied");
        Ok(())
    }

    /// Record `alpha` for ExtGState registration and emit the matching `gs`
    /// operator. Fully opaque primitives skip the state change.
    fn push_alpha(&mut self, alpha: f32) {
        if alpha >= 1.0 {
            return;
        }
        let index = match self
            .alphas
            .iter()
            .position(|existing| (existing - alpha).abs() < f32::EPSILON)
        {
            Some(index) => index,
            None => {
                self.alphas.push(alpha);
                self.alphas.len() - 1
            }
        };
        self.operations.push(Operation::new(
            "gs",
            vec![Object::Name(alpha_state_name(index).into_bytes())],
        ));
    }
}

impl Default for Overlay {
    fn default() -> Self {
        Self::new()
    }
}

fn real(value: f32) -> Object {
    Object::Real(value)
}

fn alpha_state_name(index: usize) -> String {
    format!("FyGs{index}")
}

/// Clone of the page's effective Resources dictionary: inline if present,
/// dereferenced if indirect, inherited from ancestors otherwise, empty as a
/// last resort. The caller writes the extended copy back inline on the page.
fn resolved_resources(document: &Document, page_id: ObjectId) -> Dictionary {
    let mut current = page_id;
    for _ in 0..32 {
        let Some(dict) = document
            .get_object(current)
            .ok()
            .and_then(|obj| obj.as_dict().ok())
        else {
            break;
        };
        if let Ok(resources) = dict.get(b"Resources") {
            return match resources {
                Object::Dictionary(inline) => inline.clone(),
                Object::Reference(id) => document
                    .get_object(*id)
                    .ok()
                    .and_then(|obj| obj.as_dict().ok())
                    .cloned()
                    .unwrap_or_default(),
                _ => Dictionary::new(),
            };
        }
        match dict.get(b"Parent").and_then(|p| p.as_reference()) {
            Ok(parent) => current = parent,
            Err(_) => break,
        }
    }
    Dictionary::new()
}

/// Clone of a named sub-dictionary of `resources` (inline or indirect),
/// empty when absent.
fn resolved_subdict(document: &Document, resources: &Dictionary, key: &[u8]) -> Dictionary {
    match resources.get(key) {
        Ok(Object::Dictionary(inline)) => inline.clone(),
        Ok(Object::Reference(id)) => document
            .get_object(*id)
            .ok()
            .and_then(|obj| obj.as_dict().ok())
            .cloned()
            .unwrap_or_default(),
        _ => Dictionary::new(),
    }
}

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF writer — create new PDF documents from raster images using `printpdf` 0.8.
//
// printpdf 0.8 uses a data-oriented API: documents are built by constructing
// `PdfPage` structs containing `Vec<Op>` operation lists, then serialised via
// `PdfDocument::save()`.

use fylora_core::error::{FyloraError, Result};
use printpdf::{
    Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Pt, RawImage, RawImageData,
    RawImageFormat, XObjectTransform,
};
use tracing::{debug, info, instrument};

/// Points per pixel when pages are sized to image dimensions (1 px = 1 pt).
const PX_TO_MM: f32 = 25.4 / 72.0;

/// Creates new PDF documents whose pages are raster images.
///
/// Unlike print-oriented writers that fit images inside a paper size, every
/// page here is sized exactly to its image's native pixel dimensions and the
/// image fills the page edge to edge.
pub struct ImagePdfWriter {
    /// Title metadata embedded in the PDF /Info dictionary.
    title: String,
}

impl ImagePdfWriter {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }

    /// Create a PDF with one page per encoded image (PNG or JPEG bytes), in
    /// input order.
    #[instrument(skip_all, fields(images = images.len()))]
    pub fn create_from_images(&self, images: &[&[u8]]) -> Result<Vec<u8>> {
        info!(title = %self.title, "Creating image PDF");

        let mut doc = PdfDocument::new(self.title.as_str());
        let mut pages: Vec<PdfPage> = Vec::with_capacity(images.len());

        for (index, image_bytes) in images.iter().enumerate() {
            let dynamic_image = ::image::load_from_memory(image_bytes).map_err(|err| {
                FyloraError::Image(format!("failed to decode image #{}: {}", index + 1, err))
            })?;

            let img_width = dynamic_image.width() as usize;
            let img_height = dynamic_image.height() as usize;

            // Convert to RGB8 for printpdf.
            let rgb_image = dynamic_image.to_rgb8();
            let raw = RawImage {
                pixels: RawImageData::U8(rgb_image.into_raw()),
                width: img_width,
                height: img_height,
                data_format: RawImageFormat::RGB8,
                tag: Vec::new(),
            };
            let xobject_id = doc.add_image(&raw);

            // Page sized to the image: 1 pixel = 1 point. Placing the image
            // at 72 dpi with unit scale makes it fill the page exactly.
            let page_w = Mm(img_width as f32 * PX_TO_MM);
            let page_h = Mm(img_height as f32 * PX_TO_MM);

            let ops = vec![Op::UseXobject {
                id: xobject_id,
                transform: XObjectTransform {
                    translate_x: Some(Pt(0.0)),
                    translate_y: Some(Pt(0.0)),
                    scale_x: Some(1.0),
                    scale_y: Some(1.0),
                    dpi: Some(72.0),
                    rotate: None,
                },
            }];

            pages.push(PdfPage::new(page_w, page_h, ops));
            debug!(index, img_width, img_height, "Image page added");
        }

        doc.with_pages(pages);

        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let output = doc.save(&PdfSaveOptions::default(), &mut warnings);
        debug!(output_bytes = output.len(), "Image PDF serialised");

        Ok(output)
    }
}

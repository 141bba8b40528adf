// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Raster page composition — append pages that consist of a single full-bleed
// JPEG image, embedded as a DCT-encoded image stream (no re-encoding).

use fylora_core::error::{FyloraError, Result};
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Object, Stream};
use tracing::{debug, instrument};

use super::editor::PdfEditor;

/// A JPEG-encoded page image together with its pixel dimensions.
#[derive(Debug, Clone)]
pub struct JpegPageImage {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl PdfEditor {
    /// Append a new page sized exactly to the image's pixel dimensions, with
    /// the JPEG drawn filling the page.
    ///
    /// The JPEG payload is embedded verbatim behind a DCTDecode filter, so
    /// the bytes written by the encoder are the bytes stored in the file.
    #[instrument(skip_all, fields(width = image.width, height = image.height, jpeg_bytes = image.data.len()))]
    pub fn append_jpeg_page(&mut self, image: &JpegPageImage) -> Result<()> {
        if image.width == 0 || image.height == 0 {
            return Err(FyloraError::Image(
                "cannot build a page from an empty image".into(),
            ));
        }

        let document = self.document_mut();

        let image_id = document.add_object(Stream::new(
            Dictionary::from_iter([
                ("Type", Object::Name(b"XObject".to_vec())),
                ("Subtype", Object::Name(b"Image".to_vec())),
                ("Width", Object::Integer(image.width as i64)),
                ("Height", Object::Integer(image.height as i64)),
                ("ColorSpace", Object::Name(b"DeviceRGB".to_vec())),
                ("BitsPerComponent", Object::Integer(8)),
                ("Filter", Object::Name(b"DCTDecode".to_vec())),
            ]),
            image.data.clone(),
        ));

        let content = Content {
            operations: vec![
                Operation::new("q", vec![]),
                Operation::new(
                    "cm",
                    vec![
                        Object::Integer(image.width as i64),
                        0.into(),
                        0.into(),
                        Object::Integer(image.height as i64),
                        0.into(),
                        0.into(),
                    ],
                ),
                Operation::new("Do", vec!["Im0".into()]),
                Operation::new("Q", vec![]),
            ],
        };
        let content_id = document.add_object(Stream::new(
            Dictionary::new(),
            content
                .encode()
                .map_err(|err| FyloraError::Pdf(format!("failed to encode page content: {err}")))?,
        ));

        let page_id = document.add_object(Dictionary::from_iter([
            ("Type", Object::Name(b"Page".to_vec())),
            (
                "MediaBox",
                Object::Array(vec![
                    0.into(),
                    0.into(),
                    Object::Integer(image.width as i64),
                    Object::Integer(image.height as i64),
                ]),
            ),
            (
                "Resources",
                Object::Dictionary(Dictionary::from_iter([(
                    "XObject",
                    Object::Dictionary(Dictionary::from_iter([(
                        "Im0",
                        Object::Reference(image_id),
                    )])),
                )])),
            ),
            ("Contents", Object::Reference(content_id)),
        ]));

        self.attach_page(page_id)?;
        debug!("JPEG page appended");
        Ok(())
    }
}

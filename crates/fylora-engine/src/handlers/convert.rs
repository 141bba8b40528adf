// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image conversion — images into a PDF (one exact-size page per image) and
// PDF pages out to a PNG archive.

use fylora_core::config::EngineConfig;
use fylora_core::error::{FyloraError, Result};
use fylora_core::types::InputFile;
use fylora_document::{ImagePdfWriter, Rasterizer};
use tracing::{info, instrument};

use crate::archive::ArchiveBuilder;

/// Fixed render scale for page export.
const EXPORT_SCALE: f32 = 2.0;

/// Build a PDF with one page per input image (PNG or JPEG), each page sized
/// exactly to the image's native pixel dimensions, in input order.
#[instrument(skip_all, fields(image_count = files.len()))]
pub fn images_to_pdf(files: &[InputFile]) -> Result<Vec<u8>> {
    if files.is_empty() {
        return Err(FyloraError::NoInput);
    }

    let writer = ImagePdfWriter::new(&files[0].name);
    let images: Vec<&[u8]> = files.iter().map(|file| file.data.as_slice()).collect();
    let output = writer.create_from_images(&images)?;

    info!(pages = files.len(), "Images converted to PDF");
    Ok(output)
}

/// Render every page at scale 2.0 and archive the lossless PNGs as
/// `page_<n>.png` (1-based), in page order.
///
/// No fallback exists here: an unavailable renderer is surfaced as fatal.
#[instrument(skip_all, fields(name = %file.name))]
pub fn pdf_to_images(config: &EngineConfig, file: &InputFile) -> Result<Vec<u8>> {
    let rasterizer = Rasterizer::new(config)?;
    // The rasterizer consumes its buffer.
    let document = rasterizer.open(file.data.clone())?;

    let mut archive = ArchiveBuilder::new();
    for index in 0..document.page_count() {
        let frame = document.render_page(index, EXPORT_SCALE)?;
        archive.add_entry(&format!("page_{}.png", index + 1), &frame.to_png()?)?;
    }

    info!(pages = document.page_count(), "Pages exported as images");
    archive.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use fylora_core::types::MediaType;
    use fylora_document::PdfEditor;
    use image::{DynamicImage, RgbImage};

    fn png_file(name: &str, width: u32, height: u32) -> InputFile {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(
            width,
            height,
            image::Rgb([10, 20, 30]),
        ));
        let mut buffer = Vec::new();
        img.write_to(
            &mut std::io::Cursor::new(&mut buffer),
            image::ImageFormat::Png,
        )
        .unwrap();
        InputFile::new(name, MediaType::Png, buffer)
    }

    #[test]
    fn one_page_per_image() {
        let files = [png_file("a.png", 50, 40), png_file("b.png", 30, 80)];
        let pdf = images_to_pdf(&files).unwrap();

        let editor = PdfEditor::from_bytes(&pdf).unwrap();
        assert_eq!(editor.page_count(), 2);
    }

    #[test]
    fn no_images_is_rejected() {
        assert!(matches!(images_to_pdf(&[]), Err(FyloraError::NoInput)));
    }
}

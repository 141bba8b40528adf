// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Raster frame — a rendered page as a pixel buffer, encodable to JPEG at a
// caller-chosen quality factor or to lossless PNG.

use fylora_core::error::{FyloraError, Result};
use image::{DynamicImage, ImageFormat};
use tracing::debug;

/// A rendered page image in device pixels.
pub struct RasterFrame {
    image: DynamicImage,
}

impl RasterFrame {
    pub fn new(image: DynamicImage) -> Self {
        Self { image }
    }

    /// Frame width in device pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Frame height in device pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Borrow the underlying pixel buffer.
    pub fn as_image(&self) -> &DynamicImage {
        &self.image
    }

    /// Consume the frame and return the underlying pixel buffer.
    pub fn into_image(self) -> DynamicImage {
        self.image
    }

    /// Encode as lossy JPEG. `quality` is a factor in `0.0..=1.0`; values
    /// outside the range are clamped.
    pub fn to_jpeg(&self, quality: f32) -> Result<Vec<u8>> {
        let percent = (quality.clamp(0.0, 1.0) * 100.0).round().max(1.0) as u8;
        let mut buffer = Vec::new();
        let rgb = self.image.to_rgb8();
        let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buffer, percent);
        rgb.write_with_encoder(encoder)
            .map_err(|err| FyloraError::Image(format!("JPEG encoding failed: {err}")))?;
        debug!(
            percent,
            bytes = buffer.len(),
            "Frame encoded as JPEG"
        );
        Ok(buffer)
    }

    /// Encode as lossless PNG.
    pub fn to_png(&self) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        let mut cursor = std::io::Cursor::new(&mut buffer);
        self.image
            .write_to(&mut cursor, ImageFormat::Png)
            .map_err(|err| FyloraError::Image(format!("PNG encoding failed: {err}")))?;
        Ok(buffer)
    }
}

//! Panel rasterization
//!
//! Turning one rendered panel into an encoded bitmap is the pipeline's only
//! suspension point. The capability is a trait so hosts can plug in whatever
//! actually renders their UI; `BitmapRasterizer` covers the common case of
//! panels that already exist as in-memory RGBA buffers.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use image::codecs::jpeg::JpegEncoder;
use image::{RgbImage, RgbaImage};

use crate::error::Result;
use crate::RasterOptions;

/// Encoding of a captured panel image.
///
/// `Jpeg` is the preferred format: it honors the quality factor and embeds
/// directly into the PDF as a `/DCTDecode` stream. `Png` is accepted for
/// lossless captures but is re-encoded to raw samples at assembly time,
/// which produces notably larger documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RasterFormat {
    Jpeg,
    Png,
}

impl RasterFormat {
    /// IANA media type of the encoded bytes
    pub fn media_type(&self) -> &'static str {
        match self {
            RasterFormat::Jpeg => "image/jpeg",
            RasterFormat::Png => "image/png",
        }
    }
}

/// An encoded bitmap snapshot of one panel
///
/// Transient: the assembler owns it just long enough to place it on a page.
#[derive(Debug, Clone)]
pub struct RasterImage {
    /// Encoding of `bytes`
    pub format: RasterFormat,
    /// Pixel width of the capture
    pub width: u32,
    /// Pixel height of the capture
    pub height: u32,
    /// Encoded image data
    pub bytes: Vec<u8>,
}

impl RasterImage {
    /// Renders the image as a `data:` URI, the form host viewers expect.
    pub fn data_uri(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.format.media_type(),
            BASE64.encode(&self.bytes)
        )
    }
}

/// Capability that captures the rendered appearance of a panel.
///
/// The assembler awaits each capture before starting the next, so
/// implementations never see overlapping calls within one export.
#[allow(async_fn_in_trait)]
pub trait PanelRasterizer {
    /// The host's panel handle type.
    type Panel;

    /// Capture `panel` into an encoded bitmap.
    ///
    /// `options.background` replaces any transparency (a transparent region
    /// would otherwise render black once flattened into a lossy encoding);
    /// `options.quality` trades file size against fidelity.
    async fn rasterize(&self, panel: &Self::Panel, options: &RasterOptions) -> Result<RasterImage>;
}

/// Rasterizer for panels that are already in-memory RGBA bitmaps.
///
/// Flattens the alpha channel over the configured background and encodes
/// JPEG at the configured quality.
#[derive(Debug, Clone, Copy, Default)]
pub struct BitmapRasterizer;

impl BitmapRasterizer {
    pub fn new() -> Self {
        Self
    }
}

impl PanelRasterizer for BitmapRasterizer {
    type Panel = RgbaImage;

    async fn rasterize(&self, panel: &RgbaImage, options: &RasterOptions) -> Result<RasterImage> {
        let flat = flatten_onto(options.background, panel);
        let quality = (options.quality * 100.0).round().clamp(1.0, 100.0) as u8;

        let mut bytes = Vec::new();
        let mut encoder = JpegEncoder::new_with_quality(&mut bytes, quality);
        encoder.encode_image(&flat)?;

        Ok(RasterImage {
            format: RasterFormat::Jpeg,
            width: panel.width(),
            height: panel.height(),
            bytes,
        })
    }
}

/// Alpha-composites `image` over a solid background color.
fn flatten_onto(background: [u8; 3], image: &RgbaImage) -> RgbImage {
    RgbImage::from_fn(image.width(), image.height(), |x, y| {
        let px = image.get_pixel(x, y);
        let alpha = px[3] as u16;
        let mut out = [0u8; 3];
        for (i, channel) in out.iter_mut().enumerate() {
            let src = px[i] as u16;
            let bg = background[i] as u16;
            *channel = ((src * alpha + bg * (255 - alpha) + 127) / 255) as u8;
        }
        image::Rgb(out)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn flatten_replaces_full_transparency_with_background() {
        let image = RgbaImage::from_pixel(2, 2, Rgba([10, 20, 30, 0]));
        let flat = flatten_onto([255, 255, 255], &image);
        assert_eq!(flat.get_pixel(0, 0).0, [255, 255, 255]);
    }

    #[test]
    fn flatten_keeps_opaque_pixels() {
        let image = RgbaImage::from_pixel(1, 1, Rgba([10, 20, 30, 255]));
        let flat = flatten_onto([255, 255, 255], &image);
        assert_eq!(flat.get_pixel(0, 0).0, [10, 20, 30]);
    }

    #[test]
    fn data_uri_carries_media_type() {
        let raster = RasterImage {
            format: RasterFormat::Jpeg,
            width: 1,
            height: 1,
            bytes: vec![0xFF, 0xD8],
        };
        assert!(raster.data_uri().starts_with("data:image/jpeg;base64,"));
    }

    #[tokio::test]
    async fn bitmap_rasterizer_emits_jpeg_with_dimensions() {
        let panel = RgbaImage::from_pixel(8, 4, Rgba([100, 150, 200, 255]));
        let raster = BitmapRasterizer::new()
            .rasterize(&panel, &RasterOptions::default())
            .await
            .unwrap();
        assert_eq!(raster.format, RasterFormat::Jpeg);
        assert_eq!((raster.width, raster.height), (8, 4));
        // JPEG SOI marker
        assert_eq!(&raster.bytes[..2], &[0xFF, 0xD8]);
    }
}

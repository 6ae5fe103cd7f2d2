//! PDF assembly backend built on `lopdf`
//!
//! Pages are staged in memory while the assembler runs; the PDF object graph
//! (catalog, page tree, image XObjects, content streams) is built once at
//! serialization time. Nothing date- or ID-like is written, so identical
//! input produces byte-identical output.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

use crate::assemble::DocumentAssembly;
use crate::error::{Error, Result};
use crate::raster::{RasterFormat, RasterImage};
use crate::{Orientation, OutputPayload, PageSize};

/// Media type of the serialized artifact
pub const PDF_MEDIA_TYPE: &str = "application/pdf";

/// Image data prepared for embedding, plus its placement on the page.
struct Placement {
    pixel_width: u32,
    pixel_height: u32,
    samples: Vec<u8>,
    /// `Some("DCTDecode")` for passthrough JPEG, `None` for raw RGB samples
    filter: Option<&'static str>,
    rect: [f32; 4],
}

/// A PDF document under construction.
///
/// Freshly created documents hold one blank page: every placement targets
/// the last page, and [`DocumentAssembly::add_page`] opens the next one.
pub struct PdfDocument {
    width: f32,
    height: f32,
    pages: Vec<Option<Placement>>,
}

impl PdfDocument {
    /// Creates an empty document with the given fixed page geometry.
    pub fn new(page_size: PageSize, orientation: Orientation) -> Self {
        let (width, height) = orientation.apply(page_size);
        Self {
            width,
            height,
            pages: vec![None],
        }
    }

    /// Converts an encoded raster into embeddable PDF image data.
    ///
    /// JPEG bytes embed unchanged under `/DCTDecode`; PNG is decoded and
    /// embedded as raw 8-bit `/DeviceRGB` samples (lossless, larger).
    fn prepare(image: &RasterImage) -> Result<(u32, u32, Vec<u8>, Option<&'static str>)> {
        match image.format {
            RasterFormat::Jpeg => Ok((
                image.width,
                image.height,
                image.bytes.clone(),
                Some("DCTDecode"),
            )),
            RasterFormat::Png => {
                let decoded =
                    image::load_from_memory_with_format(&image.bytes, image::ImageFormat::Png)
                        .map_err(|err| Error::Assembly(format!("bad PNG data: {}", err)))?;
                let rgb = decoded.to_rgb8();
                let (width, height) = rgb.dimensions();
                Ok((width, height, rgb.into_raw(), None))
            }
        }
    }
}

impl DocumentAssembly for PdfDocument {
    fn page_size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn add_page(&mut self) {
        self.pages.push(None);
    }

    fn place_image(
        &mut self,
        image: &RasterImage,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    ) -> Result<()> {
        let (pixel_width, pixel_height, samples, filter) = Self::prepare(image)?;
        let current = self
            .pages
            .last_mut()
            .ok_or_else(|| Error::Assembly("document has no pages".into()))?;
        *current = Some(Placement {
            pixel_width,
            pixel_height,
            samples,
            filter,
            rect: [x, y, width, height],
        });
        Ok(())
    }

    fn delete_page(&mut self, page: usize) -> Result<()> {
        if page == 0 || page > self.pages.len() {
            return Err(Error::Assembly(format!(
                "page {} out of range (document has {})",
                page,
                self.pages.len()
            )));
        }
        self.pages.remove(page - 1);
        Ok(())
    }

    fn output(self) -> Result<OutputPayload> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let mut kids: Vec<Object> = Vec::with_capacity(self.pages.len());
        for placement in &self.pages {
            let mut page_dict = dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![0.into(), 0.into(), self.width.into(), self.height.into()],
            };

            if let Some(placed) = placement {
                let mut image_dict = dictionary! {
                    "Type" => "XObject",
                    "Subtype" => "Image",
                    "Width" => placed.pixel_width as i64,
                    "Height" => placed.pixel_height as i64,
                    "ColorSpace" => "DeviceRGB",
                    "BitsPerComponent" => 8,
                };
                if let Some(filter) = placed.filter {
                    image_dict.set("Filter", Object::Name(filter.into()));
                }
                let image_id = doc.add_object(Stream::new(image_dict, placed.samples.clone()));

                let [x, y, w, h] = placed.rect;
                let content = Content {
                    operations: vec![
                        Operation::new("q", vec![]),
                        Operation::new(
                            "cm",
                            vec![w.into(), 0.into(), 0.into(), h.into(), x.into(), y.into()],
                        ),
                        Operation::new("Do", vec![Object::Name("Im0".into())]),
                        Operation::new("Q", vec![]),
                    ],
                };
                let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));

                page_dict.set(
                    "Resources",
                    dictionary! { "XObject" => dictionary! { "Im0" => image_id } },
                );
                page_dict.set("Contents", content_id);
            }

            kids.push(doc.add_object(page_dict).into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes)
            .map_err(|err| Error::Assembly(err.to_string()))?;

        Ok(OutputPayload {
            bytes,
            media_type: PDF_MEDIA_TYPE,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn a4() -> PdfDocument {
        PdfDocument::new(PageSize::default(), Orientation::Portrait)
    }

    fn tiny_jpeg() -> RasterImage {
        // Content is never decoded for JPEG passthrough; any bytes will do.
        RasterImage {
            format: RasterFormat::Jpeg,
            width: 2,
            height: 2,
            bytes: vec![0xFF, 0xD8, 0xFF, 0xD9],
        }
    }

    #[test]
    fn starts_with_one_blank_page() {
        assert_eq!(a4().page_count(), 1);
    }

    #[test]
    fn landscape_swaps_axes() {
        let doc = PdfDocument::new(PageSize::default(), Orientation::Landscape);
        assert_eq!(doc.page_size(), (842.0, 595.0));
    }

    #[test]
    fn delete_page_rejects_out_of_range() {
        let mut doc = a4();
        assert!(doc.delete_page(0).is_err());
        assert!(doc.delete_page(2).is_err());
        assert!(doc.delete_page(1).is_ok());
        assert_eq!(doc.page_count(), 0);
    }

    #[test]
    fn output_serializes_a_pdf_header() {
        let mut doc = a4();
        doc.place_image(&tiny_jpeg(), 0.0, 0.0, 595.0, 842.0).unwrap();
        let payload = doc.output().unwrap();
        assert_eq!(payload.media_type, PDF_MEDIA_TYPE);
        assert!(payload.bytes.starts_with(b"%PDF-1.5"));
    }

    #[test]
    fn malformed_png_is_an_assembly_error() {
        let mut doc = a4();
        let bad = RasterImage {
            format: RasterFormat::Png,
            width: 1,
            height: 1,
            bytes: vec![1, 2, 3],
        };
        let err = doc.place_image(&bad, 0.0, 0.0, 10.0, 10.0).unwrap_err();
        assert!(matches!(err, Error::Assembly(_)));
    }
}

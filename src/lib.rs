//! Panelpdf
//!
//! Captures a sequence of rendered UI panels and assembles them into a
//! single multi-page PDF, one panel per page, handed back as an in-memory
//! payload.
//!
//! # Features
//!
//! - **Trait seams**: panel enumeration ([`PanelSource`]) and capture
//!   ([`PanelRasterizer`]) are injected capabilities, so any host UI can
//!   plug in
//! - **Built-in backends**: RGBA bitmap capture via the `image` crate and a
//!   deterministic `lopdf` PDF writer
//! - **All-or-nothing**: the first capture or assembly failure aborts the
//!   run; no partial document is ever exposed
//!
//! # Example
//!
//! ```no_run
//! use image::RgbaImage;
//! use panelpdf::{BitmapRasterizer, ExportConfig, Exporter, VecPanelSource};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // One RGBA panel per intended page, authored at the page aspect ratio.
//! let panels = vec![RgbaImage::new(1190, 1684), RgbaImage::new(1190, 1684)];
//!
//! let exporter = Exporter::new(
//!     VecPanelSource::new(panels),
//!     BitmapRasterizer::new(),
//!     ExportConfig::default(),
//! );
//!
//! let payload = tokio::runtime::Runtime::new()?.block_on(exporter.export())?;
//! assert_eq!(payload.media_type, "application/pdf");
//! # Ok(())
//! # }
//! ```

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use log::debug;
use serde::{Deserialize, Serialize};

pub mod error;
pub use error::{Error, Result};

pub mod panel;
pub use panel::{PanelSource, VecPanelSource};

pub mod raster;
pub use raster::{BitmapRasterizer, PanelRasterizer, RasterFormat, RasterImage};

pub mod assemble;
pub use assemble::{assemble, DocumentAssembly};

pub mod pdf;
pub use pdf::{PdfDocument, PDF_MEDIA_TYPE};

/// Fixed page geometry in PDF points, shared by every page of a document.
///
/// The default is 595x842 (A4 proportions). Panels should be authored at a
/// matching aspect ratio; content is stretched to fill the page exactly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageSize {
    pub width: f32,
    pub height: f32,
}

impl Default for PageSize {
    fn default() -> Self {
        Self {
            width: 595.0,
            height: 842.0,
        }
    }
}

/// Page orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

impl Orientation {
    /// Resolves a page size to effective (width, height) axes.
    pub fn apply(self, size: PageSize) -> (f32, f32) {
        match self {
            Orientation::Portrait => (size.width, size.height),
            Orientation::Landscape => (size.height, size.width),
        }
    }
}

/// Capture options passed to the rasterizer for every panel
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RasterOptions {
    /// Fill color substituted for transparent regions (RGB). Without it,
    /// transparency would come out black in the lossy encoding.
    pub background: [u8; 3],
    /// Lossy-encoding quality in (0, 1]; lower is smaller output.
    pub quality: f32,
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self {
            background: [255, 255, 255],
            quality: 1.0,
        }
    }
}

/// Configuration for one export invocation
///
/// Deserializable so hosts can ship it alongside their per-data-source
/// panel descriptors.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub page_size: PageSize,
    pub orientation: Orientation,
    pub raster: RasterOptions,
}

impl ExportConfig {
    /// Rejects configurations the pipeline cannot honor.
    pub fn validate(&self) -> Result<()> {
        if !(self.page_size.width.is_finite() && self.page_size.width > 0.0)
            || !(self.page_size.height.is_finite() && self.page_size.height > 0.0)
        {
            return Err(Error::Config(format!(
                "page size must be positive, got {}x{}",
                self.page_size.width, self.page_size.height
            )));
        }
        if !(self.raster.quality > 0.0 && self.raster.quality <= 1.0) {
            return Err(Error::Config(format!(
                "quality must be in (0, 1], got {}",
                self.raster.quality
            )));
        }
        Ok(())
    }
}

/// The finished artifact: serialized document bytes plus their media type.
///
/// Immutable once produced; ownership passes to the caller.
#[derive(Debug, Clone)]
pub struct OutputPayload {
    pub bytes: Vec<u8>,
    pub media_type: &'static str,
}

impl OutputPayload {
    /// Renders the payload as a `data:` URI for host-level presentation
    /// (e.g. opening the document in a viewer).
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.media_type, BASE64.encode(&self.bytes))
    }
}

/// Zero-argument export trigger binding a panel source, a rasterizer, and a
/// configuration.
///
/// Each [`export`](Exporter::export) call snapshots the panel list, builds a
/// fresh document, and runs the pipeline to completion; no state is shared
/// between invocations.
pub struct Exporter<S, R> {
    source: S,
    rasterizer: R,
    config: ExportConfig,
}

impl<S, R> Exporter<S, R>
where
    S: PanelSource,
    R: PanelRasterizer<Panel = S::Panel>,
{
    pub fn new(source: S, rasterizer: R, config: ExportConfig) -> Self {
        Self {
            source,
            rasterizer,
            config,
        }
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Runs the full pipeline: enumerate, capture, paginate, serialize.
    ///
    /// Returns [`Error::NotReady`] (benign, retry later) when the panel
    /// source has nothing to observe yet; any capture or assembly error
    /// aborts the run with no payload produced.
    pub async fn export(&self) -> Result<OutputPayload> {
        self.config.validate()?;

        let Some(panels) = self.source.panels() else {
            debug!("panel source not ready; skipping export");
            return Err(Error::NotReady);
        };

        let document = PdfDocument::new(self.config.page_size, self.config.orientation);
        assemble(&panels, &self.rasterizer, &self.config.raster, document).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ExportConfig::default();
        assert_eq!(config.page_size.width, 595.0);
        assert_eq!(config.page_size.height, 842.0);
        assert_eq!(config.orientation, Orientation::Portrait);
        assert_eq!(config.raster.quality, 1.0);
        assert_eq!(config.raster.background, [255, 255, 255]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_quality() {
        let mut config = ExportConfig::default();
        config.raster.quality = 0.0;
        assert!(matches!(config.validate(), Err(Error::Config(_))));
        config.raster.quality = 1.5;
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_validate_rejects_degenerate_page() {
        let mut config = ExportConfig::default();
        config.page_size.width = 0.0;
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_orientation_axes() {
        let size = PageSize::default();
        assert_eq!(Orientation::Portrait.apply(size), (595.0, 842.0));
        assert_eq!(Orientation::Landscape.apply(size), (842.0, 595.0));
    }

    #[test]
    fn test_config_deserializes_with_defaults() {
        let config: ExportConfig =
            serde_json::from_str(r#"{"orientation":"landscape","raster":{"quality":0.8}}"#)
                .unwrap();
        assert_eq!(config.orientation, Orientation::Landscape);
        assert_eq!(config.raster.quality, 0.8);
        assert_eq!(config.page_size, PageSize::default());
        assert_eq!(config.raster.background, [255, 255, 255]);
    }

    #[test]
    fn test_payload_data_uri() {
        let payload = OutputPayload {
            bytes: b"%PDF-1.5".to_vec(),
            media_type: PDF_MEDIA_TYPE,
        };
        assert!(payload.data_uri().starts_with("data:application/pdf;base64,"));
    }
}

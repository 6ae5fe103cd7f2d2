//! Page assembly
//!
//! Consumes the panel sequence one panel at a time: capture, place, turn the
//! page. The document backend behind [`DocumentAssembly`] always keeps one
//! blank page open as the current insertion point, so the loop finishes by
//! trimming the trailing blank page before serializing.

use log::{debug, warn};

use crate::error::Result;
use crate::raster::{PanelRasterizer, RasterImage};
use crate::{OutputPayload, RasterOptions};

/// Document assembly capability.
///
/// Models a paginated document under construction: a fixed page size, an
/// ordered page sequence, and a current page that images are placed onto.
/// A freshly created document has one (blank) page.
pub trait DocumentAssembly {
    /// Fixed (width, height) of every page, in points.
    fn page_size(&self) -> (f32, f32);

    /// Number of pages currently allocated, including the blank insertion
    /// point.
    fn page_count(&self) -> usize;

    /// Appends a new blank page and makes it the current page.
    fn add_page(&mut self);

    /// Places an image onto the current page, scaled to `width` x `height`
    /// points with its lower-left corner at (`x`, `y`).
    fn place_image(
        &mut self,
        image: &RasterImage,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    ) -> Result<()>;

    /// Removes the given page (1-indexed).
    fn delete_page(&mut self, page: usize) -> Result<()>;

    /// Serializes the finished document, consuming it.
    fn output(self) -> Result<OutputPayload>;
}

/// Assembles one page per panel, in input order, and serializes the result.
///
/// Panels are rasterized strictly sequentially: each capture is awaited
/// before the next begins, because every image is placed into the document
/// as it completes and the backend is not safe for concurrent mutation.
/// The first capture or placement error aborts the whole run; the partially
/// built document is dropped and never observable by the caller.
pub async fn assemble<R, D>(
    panels: &[R::Panel],
    rasterizer: &R,
    options: &RasterOptions,
    mut document: D,
) -> Result<OutputPayload>
where
    R: PanelRasterizer,
    D: DocumentAssembly,
{
    let total = panels.len();
    let (width, height) = document.page_size();
    debug!("assembling {} panel(s) at {}x{}pt", total, width, height);

    for (index, panel) in panels.iter().enumerate() {
        let raster = match rasterizer.rasterize(panel, options).await {
            Ok(raster) => raster,
            Err(err) => {
                warn!("aborting export at panel {}/{}: {}", index + 1, total, err);
                return Err(err);
            }
        };
        // Fill the page exactly; matching the panel aspect ratio to the page
        // is the caller's responsibility.
        document.place_image(&raster, 0.0, 0.0, width, height)?;
        document.add_page();
        debug!("placed panel {}/{}", index + 1, total);
    }

    // Every placement opened the next insertion point, so one blank page
    // always trails the content (the initial page, when no panels exist).
    // Trim it to restore page count == panel count.
    let trailing = document.page_count();
    document.delete_page(trailing)?;
    debug_assert_eq!(document.page_count(), total);

    document.output()
}

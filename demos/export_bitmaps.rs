//! End-to-end demo: render gradient panels into a two-page PDF on disk

use image::{Rgba, RgbaImage};
use panelpdf::{BitmapRasterizer, ExportConfig, Exporter, VecPanelSource};

fn gradient_panel(width: u32, height: u32, tint: u8) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x % 256) as u8, (y % 256) as u8, tint, 255])
    })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("panelpdf - bitmap export demo\n");

    // Panels authored at the A4 aspect ratio (595:842) so nothing stretches.
    let panels = vec![
        gradient_panel(1190, 1684, 60),
        gradient_panel(1190, 1684, 200),
    ];

    let mut config = ExportConfig::default();
    config.raster.quality = 0.85;

    let exporter = Exporter::new(VecPanelSource::new(panels), BitmapRasterizer::new(), config);

    let runtime = tokio::runtime::Builder::new_current_thread().build()?;
    let payload = runtime.block_on(exporter.export())?;

    println!("media type: {}", payload.media_type);
    println!("payload:    {} bytes", payload.bytes.len());

    std::fs::write("panels.pdf", &payload.bytes)?;
    println!("wrote panels.pdf");

    Ok(())
}

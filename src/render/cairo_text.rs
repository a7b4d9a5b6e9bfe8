use cairo::{Context, Format, ImageSurface};
use pango::FontDescription;

use crate::error::{ChartError, ChartResult};
use crate::render::{TextBitmap, TextRasterizer};

/// Pango-backed label rasterizer producing white text on transparency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CairoTextRasterizer {
    font: String,
}

impl Default for CairoTextRasterizer {
    fn default() -> Self {
        Self::new("Sans 10")
    }
}

impl CairoTextRasterizer {
    #[must_use]
    pub fn new(font: impl Into<String>) -> Self {
        Self { font: font.into() }
    }

    #[must_use]
    pub fn font(&self) -> &str {
        &self.font
    }

    fn measure(&self, text: &str) -> ChartResult<(i32, i32)> {
        let probe = ImageSurface::create(Format::ARgb32, 1, 1)
            .map_err(|err| map_backend_error("failed to create probe surface", err))?;
        let context = Context::new(&probe)
            .map_err(|err| map_backend_error("failed to create probe context", err))?;
        let layout = pangocairo::functions::create_layout(&context);
        layout.set_font_description(Some(&FontDescription::from_string(&self.font)));
        layout.set_text(text);
        Ok(layout.pixel_size())
    }
}

impl TextRasterizer for CairoTextRasterizer {
    fn rasterize(&self, text: &str) -> ChartResult<TextBitmap> {
        let (width, height) = self.measure(text)?;
        if width <= 0 || height <= 0 {
            return Ok(TextBitmap::empty());
        }

        let mut surface = ImageSurface::create(Format::ARgb32, width, height)
            .map_err(|err| map_backend_error("failed to create label surface", err))?;
        {
            let context = Context::new(&surface)
                .map_err(|err| map_backend_error("failed to create label context", err))?;
            context.set_source_rgba(1.0, 1.0, 1.0, 1.0);
            let layout = pangocairo::functions::create_layout(&context);
            layout.set_font_description(Some(&FontDescription::from_string(&self.font)));
            layout.set_text(text);
            pangocairo::functions::show_layout(&context, &layout);
        }
        surface.flush();

        let stride = surface.stride() as usize;
        let data = surface
            .data()
            .map_err(|err| ChartError::InvalidData(format!("label surface busy: {err}")))?;
        let mut pixels = Vec::with_capacity(width as usize * height as usize * 4);
        for row in data.chunks(stride).take(height as usize) {
            // Cairo stores premultiplied ARGB as native-endian u32.
            for argb in row[..width as usize * 4].chunks_exact(4) {
                let [alpha, red, green, blue] =
                    u32::from_ne_bytes([argb[0], argb[1], argb[2], argb[3]]).to_be_bytes();
                pixels.extend_from_slice(&[red, green, blue, alpha]);
            }
        }
        Ok(TextBitmap::new(width as u32, height as u32, pixels))
    }
}

fn map_backend_error(context: &str, err: cairo::Error) -> ChartError {
    ChartError::InvalidData(format!("{context}: {err}"))
}

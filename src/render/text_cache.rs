use std::sync::Arc;

use indexmap::IndexMap;
use tracing::{trace, warn};

use crate::error::ChartResult;

/// Rasterized label: tightly packed RGBA8 rows.
///
/// Cloning shares the pixel buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBitmap {
    width: u32,
    height: u32,
    pixels: Arc<[u8]>,
}

impl TextBitmap {
    #[must_use]
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        Self {
            width,
            height,
            pixels: pixels.into(),
        }
    }

    #[must_use]
    pub fn empty() -> Self {
        Self::new(0, 0, Vec::new())
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[must_use]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Both bitmaps point at the same pixel allocation.
    #[must_use]
    pub fn shares_pixels_with(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.pixels, &other.pixels)
    }
}

/// Turns a label into a bitmap.
pub trait TextRasterizer: Send {
    fn rasterize(&self, text: &str) -> ChartResult<TextBitmap>;
}

/// Dependency-free rasterizer: one solid cell per visible glyph.
///
/// Cell size matches the layout's glyph width and text height so bitmap
/// sizes agree with the label quads the scene builder emits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockTextRasterizer {
    pub glyph_width: u32,
    pub glyph_height: u32,
}

impl Default for BlockTextRasterizer {
    fn default() -> Self {
        Self {
            glyph_width: 10,
            glyph_height: 10,
        }
    }
}

impl TextRasterizer for BlockTextRasterizer {
    fn rasterize(&self, text: &str) -> ChartResult<TextBitmap> {
        let glyphs: Vec<char> = text.chars().collect();
        let width = self.glyph_width * glyphs.len() as u32;
        let height = self.glyph_height;
        let mut pixels = vec![0_u8; width as usize * height as usize * 4];
        let row_len = width as usize * 4;
        for (glyph_index, glyph) in glyphs.iter().enumerate() {
            if glyph.is_whitespace() {
                continue;
            }
            let cell_start = glyph_index * self.glyph_width as usize * 4;
            let cell_len = self.glyph_width as usize * 4;
            // Leave a one-pixel gutter between neighboring glyphs.
            let inked = cell_len.saturating_sub(4);
            for row in pixels.chunks_exact_mut(row_len.max(1)) {
                for pixel in row[cell_start..cell_start + inked].chunks_exact_mut(4) {
                    pixel.copy_from_slice(&[255, 255, 255, 255]);
                }
            }
        }
        Ok(TextBitmap::new(width, height, pixels))
    }
}

/// Memoizes label bitmaps for the lifetime of one chart.
///
/// Lookups are exact string matches and entries are never evicted. The cache
/// is not synchronized; the chart keeps it behind the scene lock.
pub struct TextCache {
    rasterizer: Box<dyn TextRasterizer>,
    entries: IndexMap<String, TextBitmap>,
    hits: usize,
    misses: usize,
}

impl TextCache {
    #[must_use]
    pub fn new(rasterizer: Box<dyn TextRasterizer>) -> Self {
        Self {
            rasterizer,
            entries: IndexMap::new(),
            hits: 0,
            misses: 0,
        }
    }

    pub fn get(&mut self, text: &str) -> TextBitmap {
        if let Some(bitmap) = self.entries.get(text) {
            self.hits += 1;
            return bitmap.clone();
        }

        self.misses += 1;
        let bitmap = match self.rasterizer.rasterize(text) {
            Ok(bitmap) => bitmap,
            Err(err) => {
                warn!(error = %err, text, "label rasterization failed, caching empty bitmap");
                TextBitmap::empty()
            }
        };
        trace!(
            text,
            width = bitmap.width(),
            height = bitmap.height(),
            "cached label bitmap"
        );
        self.entries.insert(text.to_owned(), bitmap.clone());
        bitmap
    }

    #[must_use]
    pub fn contains(&self, text: &str) -> bool {
        self.entries.contains_key(text)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn hits(&self) -> usize {
        self.hits
    }

    #[must_use]
    pub fn misses(&self) -> usize {
        self.misses
    }
}

impl Default for TextCache {
    fn default() -> Self {
        Self::new(Box::new(BlockTextRasterizer::default()))
    }
}

impl std::fmt::Debug for TextCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextCache")
            .field("entries", &self.entries.len())
            .field("hits", &self.hits)
            .field("misses", &self.misses)
            .finish_non_exhaustive()
    }
}

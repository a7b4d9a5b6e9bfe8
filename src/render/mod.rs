mod headless;
mod null_renderer;
mod primitives;
mod shapes;
mod surface;
mod text_cache;

pub use headless::{HeadlessRenderStats, HeadlessRenderer};
pub use null_renderer::NullRenderer;
pub use primitives::{Color, SERIES_PALETTE, series_color};
pub use shapes::{
    BarShape, CameraShape, LineShape, RectangleShape, ScreenTextShape, Shape, ShapeKind,
    TextShape,
};
pub use surface::{HeadlessSurface, RenderSurface};
pub use text_cache::{BlockTextRasterizer, TextBitmap, TextCache, TextRasterizer};

use crate::core::{CameraPose, ObjectId, PixelPoint, Viewport};

/// Contract implemented by any rendering backend.
///
/// Shapes are submitted one by one; `process_unrendered_shapes` then draws
/// the submitted batch. A backend keeps the last full batch so camera-only
/// frames and picking passes can redraw it without resubmission.
///
/// Every call happens under the chart's scene lock, on whichever thread
/// currently owns the render step.
pub trait Renderer: Send {
    fn init(&mut self) {}

    fn set_viewport_size(&mut self, viewport: Viewport);

    /// Drops uploaded label textures before a full re-render.
    fn release_text_textures(&mut self);

    /// Drops every retained shape ahead of a scene rebuild.
    fn release_shapes(&mut self) {}

    fn set_camera(&mut self, pose: &CameraPose);

    fn draw_bar(&mut self, bar: &BarShape);

    fn draw_line(&mut self, line: &LineShape);

    fn draw_rectangle(&mut self, rect: &RectangleShape);

    fn draw_text(&mut self, text: &TextShape);

    fn draw_screen_text(&mut self, text: &ScreenTextShape);

    /// Draws the submitted batch. `full_rebuild` replaces the retained set;
    /// otherwise the retained set is redrawn with the current camera.
    fn process_unrendered_shapes(&mut self, full_rebuild: bool);

    /// In picking mode every pickable shape is drawn with its id color.
    fn set_picking_mode(&mut self, enabled: bool);

    /// Reads the id color under a window pixel (top-left origin).
    fn resolve_pixel(&mut self, point: PixelPoint) -> ObjectId;

    fn set_scene_edge(&mut self, min_x: f32, max_x: f32);

    fn set_scroll(&mut self) {}

    fn set_scroll_speed(&mut self, _speed: f32) {}

    fn set_scroll_distance(&mut self, _distance: f32) {}

    fn begin_highlight(&mut self, _id: ObjectId) {}

    fn end_highlight(&mut self) {}

    fn release_screen_text_shapes(&mut self);
}

#[cfg(feature = "cairo-backend")]
mod cairo_text;
#[cfg(feature = "cairo-backend")]
pub use cairo_text::CairoTextRasterizer;

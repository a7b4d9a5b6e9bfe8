use crate::core::{CameraPose, ObjectId, PixelPoint, Viewport};
use crate::render::{
    BarShape, LineShape, RectangleShape, Renderer, ScreenTextShape, TextShape,
};

/// No-op renderer used by tests and headless scene building.
///
/// It only counts submissions; picking never hits anything.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct NullRenderer {
    pub viewport: Option<Viewport>,
    pub camera: Option<CameraPose>,
    pub bars_drawn: usize,
    pub lines_drawn: usize,
    pub rects_drawn: usize,
    pub texts_drawn: usize,
    pub screen_texts_drawn: usize,
    pub frames_processed: usize,
    pub full_frames_processed: usize,
    pub picking_enabled: bool,
    pub scene_edge: Option<(f32, f32)>,
}

impl Renderer for NullRenderer {
    fn set_viewport_size(&mut self, viewport: Viewport) {
        self.viewport = Some(viewport);
    }

    fn release_text_textures(&mut self) {}

    fn set_camera(&mut self, pose: &CameraPose) {
        self.camera = Some(*pose);
    }

    fn draw_bar(&mut self, _bar: &BarShape) {
        self.bars_drawn += 1;
    }

    fn draw_line(&mut self, _line: &LineShape) {
        self.lines_drawn += 1;
    }

    fn draw_rectangle(&mut self, _rect: &RectangleShape) {
        self.rects_drawn += 1;
    }

    fn draw_text(&mut self, _text: &TextShape) {
        self.texts_drawn += 1;
    }

    fn draw_screen_text(&mut self, _text: &ScreenTextShape) {
        self.screen_texts_drawn += 1;
    }

    fn process_unrendered_shapes(&mut self, full_rebuild: bool) {
        self.frames_processed += 1;
        if full_rebuild {
            self.full_frames_processed += 1;
        }
    }

    fn set_picking_mode(&mut self, enabled: bool) {
        self.picking_enabled = enabled;
    }

    fn resolve_pixel(&mut self, _point: PixelPoint) -> ObjectId {
        ObjectId::NONE
    }

    fn set_scene_edge(&mut self, min_x: f32, max_x: f32) {
        self.scene_edge = Some((min_x, max_x));
    }

    fn release_screen_text_shapes(&mut self) {}
}

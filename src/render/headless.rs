use glam::{Mat4, Vec2, Vec3, Vec4};
use tracing::trace;

use crate::core::{CameraPose, ObjectId, PixelPoint, Viewport};
use crate::render::{
    BarShape, LineShape, RectangleShape, Renderer, ScreenTextShape, TextShape,
};

/// Unit cube faces, two triangles each.
const CUBE_TRIANGLES: [[Vec3; 3]; 12] = {
    const P000: Vec3 = Vec3::new(0.0, 0.0, 0.0);
    const P100: Vec3 = Vec3::new(1.0, 0.0, 0.0);
    const P010: Vec3 = Vec3::new(0.0, 1.0, 0.0);
    const P110: Vec3 = Vec3::new(1.0, 1.0, 0.0);
    const P001: Vec3 = Vec3::new(0.0, 0.0, 1.0);
    const P101: Vec3 = Vec3::new(1.0, 0.0, 1.0);
    const P011: Vec3 = Vec3::new(0.0, 1.0, 1.0);
    const P111: Vec3 = Vec3::new(1.0, 1.0, 1.0);
    [
        [P000, P100, P110],
        [P000, P110, P010],
        [P001, P101, P111],
        [P001, P111, P011],
        [P000, P100, P101],
        [P000, P101, P001],
        [P010, P110, P111],
        [P010, P111, P011],
        [P000, P010, P011],
        [P000, P011, P001],
        [P100, P110, P111],
        [P100, P111, P101],
    ]
};

#[derive(Debug, Clone, Copy, PartialEq)]
enum PickTarget {
    Cube { transform: Mat4, id: ObjectId },
    Quad { corners: [Vec3; 4], id: ObjectId },
}

impl PickTarget {
    fn id(&self) -> ObjectId {
        match self {
            Self::Cube { id, .. } | Self::Quad { id, .. } => *id,
        }
    }

    fn for_each_triangle(&self, mut visit: impl FnMut([Vec3; 3])) {
        match self {
            Self::Cube { transform, .. } => {
                for triangle in &CUBE_TRIANGLES {
                    visit(triangle.map(|corner| transform.transform_point3(corner)));
                }
            }
            Self::Quad { corners, .. } => {
                visit([corners[0], corners[1], corners[2]]);
                visit([corners[0], corners[2], corners[3]]);
            }
        }
    }
}

/// Submission and frame counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeadlessRenderStats {
    pub frames: usize,
    pub full_frames: usize,
    pub picking_passes: usize,
    pub bars_submitted: usize,
    pub lines_submitted: usize,
    pub rects_submitted: usize,
    pub texts_submitted: usize,
    pub screen_texts_submitted: usize,
    pub text_texture_releases: usize,
}

/// Software renderer with a real picking pass.
///
/// Only the picking pass produces pixels: bars and rectangles are
/// rasterized into an id-color buffer with a depth test, using the same
/// right-handed perspective a GL backend would. Labels and lines are
/// recorded but never occlude.
#[derive(Debug, Clone)]
pub struct HeadlessRenderer {
    viewport: Viewport,
    camera: CameraPose,
    fov_y: f32,
    near: f32,
    far: f32,
    picking: bool,
    pending: Vec<PickTarget>,
    retained: Vec<PickTarget>,
    pending_labels: Vec<String>,
    retained_labels: Vec<String>,
    screen_texts: Vec<String>,
    id_buffer: Vec<[u8; 4]>,
    depth_buffer: Vec<f32>,
    highlight: Option<ObjectId>,
    scene_edge: Option<(f32, f32)>,
    scroll_enabled: bool,
    scroll_speed: f32,
    scroll_distance: f32,
    stats: HeadlessRenderStats,
}

impl Default for HeadlessRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            viewport: Viewport::new(0, 0),
            camera: CameraPose::initial(),
            fov_y: 30.0_f32.to_radians(),
            near: 1.0,
            far: 10_000.0,
            picking: false,
            pending: Vec::new(),
            retained: Vec::new(),
            pending_labels: Vec::new(),
            retained_labels: Vec::new(),
            screen_texts: Vec::new(),
            id_buffer: Vec::new(),
            depth_buffer: Vec::new(),
            highlight: None,
            scene_edge: None,
            scroll_enabled: false,
            scroll_speed: 0.0,
            scroll_distance: 0.0,
            stats: HeadlessRenderStats::default(),
        }
    }

    #[must_use]
    pub fn with_fov_y_degrees(mut self, degrees: f32) -> Self {
        self.fov_y = degrees.to_radians();
        self
    }

    #[must_use]
    pub fn with_depth_range(mut self, near: f32, far: f32) -> Self {
        self.near = near;
        self.far = far;
        self
    }

    #[must_use]
    pub fn stats(&self) -> HeadlessRenderStats {
        self.stats
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[must_use]
    pub fn camera(&self) -> CameraPose {
        self.camera
    }

    #[must_use]
    pub fn highlighted(&self) -> Option<ObjectId> {
        self.highlight
    }

    #[must_use]
    pub fn scene_edge(&self) -> Option<(f32, f32)> {
        self.scene_edge
    }

    #[must_use]
    pub fn is_picking(&self) -> bool {
        self.picking
    }

    #[must_use]
    pub fn scroll_enabled(&self) -> bool {
        self.scroll_enabled
    }

    #[must_use]
    pub fn scroll_speed(&self) -> f32 {
        self.scroll_speed
    }

    #[must_use]
    pub fn scroll_distance(&self) -> f32 {
        self.scroll_distance
    }

    /// Labels of the last full batch, in submission order.
    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.retained_labels
    }

    #[must_use]
    pub fn screen_texts(&self) -> &[String] {
        &self.screen_texts
    }

    /// Ids of the retained pickable shapes, in submission order.
    #[must_use]
    pub fn retained_ids(&self) -> Vec<ObjectId> {
        self.retained.iter().map(PickTarget::id).collect()
    }

    #[must_use]
    pub fn view_projection(&self) -> Mat4 {
        let aspect = if self.viewport.is_valid() {
            self.viewport.aspect_ratio()
        } else {
            1.0
        };
        Mat4::perspective_rh_gl(self.fov_y, aspect, self.near, self.far) * self.camera.view_matrix()
    }

    /// Window position (top-left origin) of a scene point, or `None` when it
    /// lies behind the camera.
    #[must_use]
    pub fn project_to_pixel(&self, point: Vec3) -> Option<Vec2> {
        let clip = self.view_projection() * point.extend(1.0);
        self.clip_to_window(clip).map(|window| window.truncate())
    }

    fn clip_to_window(&self, clip: Vec4) -> Option<Vec3> {
        if clip.w <= f32::EPSILON {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        Some(Vec3::new(
            (ndc.x * 0.5 + 0.5) * self.viewport.width as f32,
            (1.0 - (ndc.y * 0.5 + 0.5)) * self.viewport.height as f32,
            ndc.z,
        ))
    }

    fn rasterize_picking_buffer(&mut self) {
        let width = self.viewport.width as usize;
        let height = self.viewport.height as usize;
        self.id_buffer.clear();
        self.id_buffer.resize(width * height, [0; 4]);
        self.depth_buffer.clear();
        self.depth_buffer.resize(width * height, f32::INFINITY);
        if width == 0 || height == 0 {
            return;
        }

        let view_projection = self.view_projection();
        let targets = std::mem::take(&mut self.retained);
        for target in &targets {
            let color = target.id().to_picking_rgba();
            target.for_each_triangle(|triangle| {
                let clipped = triangle.map(|corner| {
                    self.clip_to_window(view_projection * corner.extend(1.0))
                });
                if let [Some(a), Some(b), Some(c)] = clipped {
                    self.fill_triangle([a, b, c], color);
                }
            });
        }
        self.retained = targets;
    }

    fn fill_triangle(&mut self, [a, b, c]: [Vec3; 3], color: [u8; 4]) {
        let area = edge(a, b, c);
        if area.abs() <= f32::EPSILON {
            return;
        }
        let width = self.viewport.width as usize;
        let max_x = (self.viewport.width - 1) as f32;
        let max_y = (self.viewport.height - 1) as f32;
        let min_px = a.x.min(b.x).min(c.x).floor().clamp(0.0, max_x) as usize;
        let max_px = a.x.max(b.x).max(c.x).ceil().clamp(0.0, max_x) as usize;
        let min_py = a.y.min(b.y).min(c.y).floor().clamp(0.0, max_y) as usize;
        let max_py = a.y.max(b.y).max(c.y).ceil().clamp(0.0, max_y) as usize;

        for py in min_py..=max_py {
            for px in min_px..=max_px {
                let sample = Vec3::new(px as f32 + 0.5, py as f32 + 0.5, 0.0);
                let w0 = edge(b, c, sample) / area;
                let w1 = edge(c, a, sample) / area;
                let w2 = edge(a, b, sample) / area;
                if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                    continue;
                }
                let depth = w0 * a.z + w1 * b.z + w2 * c.z;
                let index = py * width + px;
                if depth < self.depth_buffer[index] {
                    self.depth_buffer[index] = depth;
                    self.id_buffer[index] = color;
                }
            }
        }
    }
}

fn edge(a: Vec3, b: Vec3, point: Vec3) -> f32 {
    (b.x - a.x) * (point.y - a.y) - (b.y - a.y) * (point.x - a.x)
}

impl Renderer for HeadlessRenderer {
    fn set_viewport_size(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    fn release_text_textures(&mut self) {
        self.stats.text_texture_releases += 1;
    }

    fn release_shapes(&mut self) {
        self.pending.clear();
        self.retained.clear();
        self.pending_labels.clear();
        self.retained_labels.clear();
    }

    fn set_camera(&mut self, pose: &CameraPose) {
        self.camera = *pose;
    }

    fn draw_bar(&mut self, bar: &BarShape) {
        self.stats.bars_submitted += 1;
        self.pending.push(PickTarget::Cube {
            transform: bar.transform,
            id: bar.id,
        });
    }

    fn draw_line(&mut self, _line: &LineShape) {
        self.stats.lines_submitted += 1;
    }

    fn draw_rectangle(&mut self, rect: &RectangleShape) {
        self.stats.rects_submitted += 1;
        self.pending.push(PickTarget::Quad {
            corners: rect.corners(),
            id: rect.id,
        });
    }

    fn draw_text(&mut self, text: &TextShape) {
        self.stats.texts_submitted += 1;
        self.pending_labels.push(text.label.clone());
    }

    fn draw_screen_text(&mut self, text: &ScreenTextShape) {
        self.stats.screen_texts_submitted += 1;
        self.screen_texts.push(text.label.clone());
    }

    fn process_unrendered_shapes(&mut self, full_rebuild: bool) {
        self.stats.frames += 1;
        if full_rebuild {
            self.stats.full_frames += 1;
            self.retained = std::mem::take(&mut self.pending);
            self.retained_labels = std::mem::take(&mut self.pending_labels);
        } else {
            self.pending.clear();
            self.pending_labels.clear();
        }
        if self.picking {
            self.stats.picking_passes += 1;
            self.rasterize_picking_buffer();
            trace!(
                shapes = self.retained.len(),
                width = self.viewport.width,
                height = self.viewport.height,
                "picking pass rasterized"
            );
        }
    }

    fn set_picking_mode(&mut self, enabled: bool) {
        self.picking = enabled;
    }

    fn resolve_pixel(&mut self, point: PixelPoint) -> ObjectId {
        if !self.viewport.contains(point) {
            return ObjectId::NONE;
        }
        let index = point.y as usize * self.viewport.width as usize + point.x as usize;
        self.id_buffer
            .get(index)
            .copied()
            .map_or(ObjectId::NONE, ObjectId::from_picking_rgba)
    }

    fn set_scene_edge(&mut self, min_x: f32, max_x: f32) {
        self.scene_edge = Some((min_x, max_x));
    }

    fn set_scroll(&mut self) {
        self.scroll_enabled = true;
    }

    fn set_scroll_speed(&mut self, speed: f32) {
        self.scroll_speed = speed;
    }

    fn set_scroll_distance(&mut self, distance: f32) {
        self.scroll_distance = distance;
    }

    fn begin_highlight(&mut self, id: ObjectId) {
        self.highlight = Some(id);
    }

    fn end_highlight(&mut self) {
        self.highlight = None;
    }

    fn release_screen_text_shapes(&mut self) {
        self.screen_texts.clear();
    }
}

#[cfg(test)]
mod tests {
    use glam::{Mat4, Vec3};

    use super::HeadlessRenderer;
    use crate::core::{CameraPose, ObjectId, PixelPoint, Viewport};
    use crate::render::{BarShape, Color, Renderer};

    fn top_down_renderer() -> HeadlessRenderer {
        let mut renderer = HeadlessRenderer::new().with_fov_y_degrees(60.0);
        renderer.set_viewport_size(Viewport::new(200, 200));
        renderer.set_camera(
            &CameraPose::new(Vec3::new(0.0, 0.0, 500.0), Vec3::ZERO).with_up(Vec3::Y),
        );
        renderer
    }

    fn cube(origin: Vec3, size: f32, id: u32) -> BarShape {
        BarShape {
            transform: Mat4::from_translation(origin) * Mat4::from_scale(Vec3::splat(size)),
            color: Color::RED,
            id: ObjectId::new(id),
        }
    }

    #[test]
    fn scene_origin_projects_to_viewport_center() {
        let renderer = top_down_renderer();
        let pixel = renderer
            .project_to_pixel(Vec3::ZERO)
            .expect("origin in front of camera");
        assert!((pixel.x - 100.0).abs() < 1e-3);
        assert!((pixel.y - 100.0).abs() < 1e-3);
    }

    #[test]
    fn nearer_cube_wins_depth_test() {
        let mut renderer = top_down_renderer();
        renderer.draw_bar(&cube(Vec3::new(-20.0, -20.0, 0.0), 40.0, 1));
        renderer.draw_bar(&cube(Vec3::new(-10.0, -10.0, 100.0), 20.0, 11));
        renderer.set_picking_mode(true);
        renderer.process_unrendered_shapes(true);

        assert_eq!(renderer.resolve_pixel(PixelPoint::new(100, 100)), ObjectId::new(11));
        assert_eq!(renderer.resolve_pixel(PixelPoint::new(0, 0)), ObjectId::NONE);
        assert_eq!(renderer.stats().picking_passes, 1);
    }

    #[test]
    fn camera_only_frame_keeps_retained_batch() {
        let mut renderer = top_down_renderer();
        renderer.draw_bar(&cube(Vec3::new(-20.0, -20.0, 0.0), 40.0, 21));
        renderer.process_unrendered_shapes(true);
        renderer.set_picking_mode(true);
        renderer.process_unrendered_shapes(false);

        assert_eq!(renderer.retained_ids(), vec![ObjectId::new(21)]);
        assert_eq!(renderer.resolve_pixel(PixelPoint::new(100, 100)), ObjectId::new(21));
    }

    #[test]
    fn outside_viewport_resolves_to_nothing() {
        let mut renderer = top_down_renderer();
        assert_eq!(renderer.resolve_pixel(PixelPoint::new(-1, 5)), ObjectId::NONE);
        assert_eq!(renderer.resolve_pixel(PixelPoint::new(5, 200)), ObjectId::NONE);
    }
}

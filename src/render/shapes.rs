use glam::{Mat4, Vec2, Vec3};

use crate::core::{CameraPose, ObjectId};
use crate::render::{Color, Renderer, TextBitmap};

/// Camera entry of the scene; rendering it pushes the view transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraShape {
    pub pose: CameraPose,
}

/// Unit cube placed by `transform` (translate × scale).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarShape {
    pub transform: Mat4,
    pub color: Color,
    pub id: ObjectId,
}

impl BarShape {
    /// World-space center of the transformed unit cube.
    #[must_use]
    pub fn centroid(&self) -> Vec3 {
        self.transform.transform_point3(Vec3::splat(0.5))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineShape {
    pub begin: Vec3,
    pub end: Vec3,
    pub color: Color,
    pub id: ObjectId,
}

/// Planar quad from three corners; the fourth is derived.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectangleShape {
    pub top_left: Vec3,
    pub top_right: Vec3,
    pub bottom_right: Vec3,
    pub fill_color: Color,
    pub line_color: Color,
    pub id: ObjectId,
}

impl RectangleShape {
    #[must_use]
    pub fn bottom_left(&self) -> Vec3 {
        self.top_left + (self.bottom_right - self.top_right)
    }

    #[must_use]
    pub fn corners(&self) -> [Vec3; 4] {
        [
            self.top_left,
            self.top_right,
            self.bottom_right,
            self.bottom_left(),
        ]
    }
}

/// Label quad anchored in the 3D scene.
#[derive(Debug, Clone, PartialEq)]
pub struct TextShape {
    pub label: String,
    pub bitmap: TextBitmap,
    pub top_left: Vec3,
    pub top_right: Vec3,
    pub bottom_right: Vec3,
    pub id: ObjectId,
}

/// Heads-up label in normalized screen space (-1..=1 on both axes).
#[derive(Debug, Clone, PartialEq)]
pub struct ScreenTextShape {
    pub label: String,
    pub bitmap: TextBitmap,
    pub top_left: Vec2,
    pub bottom_right: Vec2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    Camera,
    Bar,
    Line,
    Rectangle,
    Text,
    ScreenText,
}

/// Renderable scene entry.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Camera(CameraShape),
    Bar(BarShape),
    Line(LineShape),
    Rectangle(RectangleShape),
    Text(TextShape),
    ScreenText(ScreenTextShape),
}

impl Shape {
    #[must_use]
    pub fn kind(&self) -> ShapeKind {
        match self {
            Self::Camera(_) => ShapeKind::Camera,
            Self::Bar(_) => ShapeKind::Bar,
            Self::Line(_) => ShapeKind::Line,
            Self::Rectangle(_) => ShapeKind::Rectangle,
            Self::Text(_) => ShapeKind::Text,
            Self::ScreenText(_) => ShapeKind::ScreenText,
        }
    }

    /// Identity used for picking; the camera and screen text have none.
    #[must_use]
    pub fn id(&self) -> ObjectId {
        match self {
            Self::Bar(bar) => bar.id,
            Self::Line(line) => line.id,
            Self::Rectangle(rect) => rect.id,
            Self::Text(text) => text.id,
            Self::Camera(_) | Self::ScreenText(_) => ObjectId::NONE,
        }
    }

    pub fn render<R: Renderer + ?Sized>(&self, renderer: &mut R) {
        match self {
            Self::Camera(camera) => renderer.set_camera(&camera.pose),
            Self::Bar(bar) => renderer.draw_bar(bar),
            Self::Line(line) => renderer.draw_line(line),
            Self::Rectangle(rect) => renderer.draw_rectangle(rect),
            Self::Text(text) => renderer.draw_text(text),
            Self::ScreenText(text) => renderer.draw_screen_text(text),
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::{Mat4, Vec3};

    use super::{BarShape, RectangleShape, Shape, ShapeKind};
    use crate::core::ObjectId;
    use crate::render::{Color, NullRenderer};

    #[test]
    fn rectangle_derives_fourth_corner() {
        let rect = RectangleShape {
            top_left: Vec3::ZERO,
            top_right: Vec3::new(80.0, 0.0, 0.0),
            bottom_right: Vec3::new(80.0, 20.0, 0.0),
            fill_color: Color::BLACK,
            line_color: Color::BLUE,
            id: ObjectId::new(3),
        };
        assert_eq!(rect.bottom_left(), Vec3::new(0.0, 20.0, 0.0));
    }

    #[test]
    fn bar_centroid_is_middle_of_scaled_cube() {
        let bar = BarShape {
            transform: Mat4::from_translation(Vec3::new(5.0, 5.0, 0.0))
                * Mat4::from_scale(Vec3::new(30.0, 5.0, 100.0)),
            color: Color::RED,
            id: ObjectId::new(1),
        };
        assert_eq!(bar.centroid(), Vec3::new(20.0, 7.5, 50.0));
    }

    #[test]
    fn render_dispatches_by_variant() {
        let bar = Shape::Bar(BarShape {
            transform: Mat4::IDENTITY,
            color: Color::GREEN,
            id: ObjectId::new(11),
        });
        assert_eq!(bar.kind(), ShapeKind::Bar);
        assert_eq!(bar.id(), ObjectId::new(11));

        let mut renderer = NullRenderer::default();
        bar.render(&mut renderer);
        assert_eq!(renderer.bars_drawn, 1);
    }
}

use glam::{EulerRot, Mat4, Vec2, Vec3};

use crate::interaction::CornerIndex;

/// Camera position, look-at target and up vector in scene space.
///
/// Bars grow along +Z, so the default up vector is +Z.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    pub direction: Vec3,
    pub up: Vec3,
}

impl CameraPose {
    #[must_use]
    pub fn new(position: Vec3, direction: Vec3) -> Self {
        Self {
            position,
            direction,
            up: Vec3::Z,
        }
    }

    #[must_use]
    pub fn with_up(mut self, up: Vec3) -> Self {
        self.up = up;
        self
    }

    /// Close-up of one bar: the eye sits `lift` above the bar top, centered
    /// on X and level with the bar front, looking at the center of the top
    /// face. `bar` is the bar origin with its height in `z`.
    #[must_use]
    pub fn bar_focus(bar: Vec3, bar_size: Vec2, lift: f32) -> Self {
        let position = bar + Vec3::new(bar_size.x / 2.0, 0.0, lift);
        let direction = bar + Vec3::new(bar_size.x / 2.0, bar_size.y / 2.0, 0.0);
        Self::new(position, direction)
    }

    /// Pose used before the first scene build.
    #[must_use]
    pub fn initial() -> Self {
        Self::new(Vec3::new(10.0, -50.0, 20.0), Vec3::ZERO)
    }

    /// Position and look-at target match; the up vector is ignored.
    #[must_use]
    pub fn same_placement(&self, other: &Self) -> bool {
        self.position == other.position && self.direction == other.direction
    }

    /// Moves the camera along its viewing ray; positive distances approach
    /// the look-at target.
    pub fn dolly(&mut self, distance: f32) {
        let towards_eye = (self.position - self.direction).normalize_or_zero();
        self.position -= towards_eye * distance;
    }

    /// View matrix; an up vector parallel to the viewing ray is swapped
    /// for the nearest usable axis.
    #[must_use]
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.direction, self.effective_up())
    }

    fn effective_up(&self) -> Vec3 {
        let forward = (self.direction - self.position).normalize_or_zero();
        [self.up, Vec3::Y, Vec3::X]
            .into_iter()
            .find(|up| forward.cross(up.normalize_or_zero()).length_squared() > 1e-8)
            .unwrap_or(self.up)
    }
}

impl Default for CameraPose {
    fn default() -> Self {
        Self::initial()
    }
}

/// Scene extents used for camera placement.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SceneExtents {
    pub max_x: f32,
    pub max_y: f32,
    /// Diagonal distance from the scene center to the default camera.
    pub distance: f32,
}

impl SceneExtents {
    #[must_use]
    pub fn center(self) -> Vec3 {
        Vec3::new(self.max_x / 2.0, self.max_y / 2.0, 0.0)
    }
}

/// Analytic camera placement derived from scene extents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPlacement {
    pub camera_height: f32,
    pub pitch: f32,
    pub roll: f32,
}

impl CameraPlacement {
    #[must_use]
    pub fn diagonal_distance(self, max_x: f32, max_y: f32) -> f32 {
        (max_x * max_x + max_y * max_y + self.camera_height * self.camera_height).sqrt()
    }

    /// Default pose: look at a point slightly off the scene center, back
    /// away by the diagonal distance, lift to twice the camera height and
    /// rotate by the fixed pitch and roll.
    #[must_use]
    pub fn default_pose(self, extents: SceneExtents) -> CameraPose {
        let direction = Vec3::new(extents.max_x * 0.4, extents.max_y * 0.35, 0.0);
        let unrotated = Vec3::new(
            direction.x,
            direction.y - extents.distance,
            self.camera_height * 2.0,
        );
        let rotation = Mat4::from_euler(EulerRot::YXZ, 0.0, self.pitch, self.roll);
        CameraPose::new(rotation.transform_point3(unrotated), direction)
    }

    /// One of four positions at ±45° around the scene center, indexed
    /// counter-clockwise starting at the front-left corner.
    #[must_use]
    pub fn corner_position(self, corner: CornerIndex, extents: SceneExtents) -> Vec3 {
        let offset = extents.distance * std::f32::consts::FRAC_PI_4.sin();
        let center = extents.center();
        let (sign_x, sign_y) = match corner.get() {
            0 => (-1.0, -1.0),
            1 => (1.0, -1.0),
            2 => (1.0, 1.0),
            _ => (-1.0, 1.0),
        };
        Vec3::new(
            center.x + sign_x * offset,
            center.y + sign_y * offset,
            self.camera_height * 2.0,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkProgress {
    Moved,
    Finished,
}

/// Linear camera interpolation over a fixed number of steps.
///
/// Each step adds `(target - start) / steps` to the pose; the last step
/// snaps onto the target so rounding never leaves a residual offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraWalk {
    target_position: Vec3,
    target_direction: Vec3,
    step_position: Vec3,
    step_direction: Vec3,
    steps_total: u32,
    steps_taken: u32,
}

impl CameraWalk {
    #[must_use]
    pub fn between(
        start: &CameraPose,
        target_position: Vec3,
        target_direction: Vec3,
        steps: u32,
    ) -> Self {
        let steps_total = steps.max(1);
        let divisor = steps_total as f32;
        Self {
            target_position,
            target_direction,
            step_position: (target_position - start.position) / divisor,
            step_direction: (target_direction - start.direction) / divisor,
            steps_total,
            steps_taken: 0,
        }
    }

    pub fn advance(&mut self, pose: &mut CameraPose) -> WalkProgress {
        if self.steps_taken >= self.steps_total {
            return WalkProgress::Finished;
        }
        self.steps_taken += 1;
        if self.steps_taken == self.steps_total {
            pose.position = self.target_position;
            pose.direction = self.target_direction;
        } else {
            pose.position += self.step_position;
            pose.direction += self.step_direction;
        }
        WalkProgress::Moved
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.steps_taken >= self.steps_total
    }

    #[must_use]
    pub fn steps_total(&self) -> u32 {
        self.steps_total
    }

    #[must_use]
    pub fn steps_taken(&self) -> u32 {
        self.steps_taken
    }

    #[must_use]
    pub fn target_position(&self) -> Vec3 {
        self.target_position
    }

    #[must_use]
    pub fn target_direction(&self) -> Vec3 {
        self.target_direction
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use glam::{Vec2, Vec3};

    use super::{CameraPlacement, CameraPose, CameraWalk, SceneExtents, WalkProgress};
    use crate::interaction::CornerIndex;

    fn placement() -> CameraPlacement {
        CameraPlacement {
            camera_height: 500.0,
            pitch: -std::f32::consts::PI / 6.5,
            roll: -std::f32::consts::PI / 8.0,
        }
    }

    #[test]
    fn walk_lands_exactly_on_target() {
        let mut pose = CameraPose::new(Vec3::new(0.1, 0.2, 0.3), Vec3::ZERO);
        let target = Vec3::new(1.0 / 3.0, 97.7, -12.9);
        let mut walk = CameraWalk::between(&pose, target, Vec3::ONE, 7);
        let mut moves = 0;
        while walk.advance(&mut pose) == WalkProgress::Moved {
            moves += 1;
        }
        assert_eq!(moves, 7);
        assert_eq!(pose.position, target);
        assert_eq!(pose.direction, Vec3::ONE);
        assert!(walk.is_finished());
    }

    #[test]
    fn zero_step_walk_still_reaches_target() {
        let mut pose = CameraPose::initial();
        let mut walk = CameraWalk::between(&pose, Vec3::X, Vec3::Y, 0);
        assert_eq!(walk.steps_total(), 1);
        assert_eq!(walk.advance(&mut pose), WalkProgress::Moved);
        assert_eq!(walk.advance(&mut pose), WalkProgress::Finished);
        assert_eq!(pose.position, Vec3::X);
    }

    #[test]
    fn default_pose_looks_at_offset_center() {
        let extents = SceneExtents {
            max_x: 145.0,
            max_y: 60.0,
            distance: placement().diagonal_distance(145.0, 60.0),
        };
        let pose = placement().default_pose(extents);
        assert_abs_diff_eq!(pose.direction.x, 58.0, epsilon = 1e-4);
        assert_abs_diff_eq!(pose.direction.y, 21.0, epsilon = 1e-4);
        assert_eq!(pose.direction.z, 0.0);
        assert!(pose.position.z > 0.0);
        assert!(pose.position.distance(pose.direction) > extents.distance);
    }

    #[test]
    fn corners_are_symmetric_around_center() {
        let extents = SceneExtents {
            max_x: 100.0,
            max_y: 50.0,
            distance: 200.0,
        };
        let corner_0 = placement().corner_position(CornerIndex::new(0), extents);
        let corner_2 = placement().corner_position(CornerIndex::new(2), extents);
        let midpoint = (corner_0 + corner_2) / 2.0;
        assert_abs_diff_eq!(midpoint.x, 50.0, epsilon = 1e-3);
        assert_abs_diff_eq!(midpoint.y, 25.0, epsilon = 1e-3);
        assert_eq!(corner_0.z, 1000.0);
    }

    #[test]
    fn dolly_moves_toward_target() {
        let mut pose = CameraPose::new(Vec3::new(0.0, -100.0, 0.0), Vec3::ZERO);
        pose.dolly(10.0);
        assert_abs_diff_eq!(pose.position.y, -90.0, epsilon = 1e-5);
    }

    #[test]
    fn bar_focus_keeps_bar_height_and_looks_down_at_an_angle() {
        let pose = CameraPose::bar_focus(Vec3::new(5.0, 5.0, 100.0), Vec2::new(30.0, 5.0), 240.0);
        assert_eq!(pose.position, Vec3::new(20.0, 5.0, 340.0));
        assert_eq!(pose.direction, Vec3::new(20.0, 7.5, 100.0));
        assert!(pose.view_matrix().is_finite());
    }

    #[test]
    fn vertical_view_ray_still_yields_finite_view_matrix() {
        let pose = CameraPose::new(Vec3::new(20.0, 7.5, 240.0), Vec3::new(20.0, 7.5, 0.0));
        let view = pose.view_matrix();
        assert!(view.is_finite());
        let eye_space = view.transform_point3(Vec3::new(20.0, 7.5, 0.0));
        assert_abs_diff_eq!(eye_space.z, -240.0, epsilon = 1e-3);
    }

    #[test]
    fn dolly_on_degenerate_ray_is_noop() {
        let mut pose = CameraPose::new(Vec3::ONE, Vec3::ONE);
        pose.dolly(10.0);
        assert_eq!(pose.position, Vec3::ONE);
    }
}

use std::sync::{Arc, Mutex};

use glam::Vec3;
use tracing::debug;

use crate::core::{CameraWalk, WalkProgress};
use crate::render::{RenderSurface, Renderer};

use super::frame_renderer::FrameRenderer;
use super::scene_state::{SceneCore, lock_core};

/// Camera target of an animated transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct TransitionTarget {
    pub(super) position: Vec3,
    pub(super) direction: Vec3,
    pub(super) steps: u32,
}

/// Worker body: one locked frame.
pub(super) fn render_single_frame<R: Renderer, S: RenderSurface>(core: &Mutex<SceneCore<R, S>>) {
    let mut guard = lock_core(core);
    FrameRenderer::render(&mut guard);
}

/// Worker body: walks the camera to `target`, one frame per step.
///
/// The lock is held for the whole walk. Screen-text overlays shown for the
/// walk are released once it lands.
pub(super) fn run_transition<R: Renderer, S: RenderSurface>(
    core: &Arc<Mutex<SceneCore<R, S>>>,
    target: TransitionTarget,
) {
    let mut guard = lock_core(core);
    let mut pose = guard.scene.camera_pose();
    let mut walk = CameraWalk::between(&pose, target.position, target.direction, target.steps);

    while walk.advance(&mut pose) == WalkProgress::Moved {
        guard.scene.set_camera_pose(pose);
        FrameRenderer::render(&mut guard);
    }

    guard.renderer.release_screen_text_shapes();
    guard.scene.remove_screen_texts();
    debug!(
        steps = walk.steps_taken(),
        x = pose.position.x,
        y = pose.position.y,
        z = pose.position.z,
        "transition finished"
    );
}

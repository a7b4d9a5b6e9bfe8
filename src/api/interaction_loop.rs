use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Instant;

use glam::{Vec2, Vec3};
use tracing::{debug, trace};

use crate::core::{CameraPose, CameraWalk, ObjectId, WalkProgress};
use crate::interaction::RenderEvent;
use crate::render::{RenderSurface, Renderer, ScreenTextShape};

use super::frame_renderer::FrameRenderer;
use super::scene_state::{SceneCore, lock_core};

const FPS_TOP_LEFT: Vec2 = Vec2::new(0.6, 0.9);
const FPS_BOTTOM_RIGHT: Vec2 = Vec2::new(0.9, 0.8);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WalkGoal {
    Bar(ObjectId),
    Default,
    Corner,
}

#[derive(Debug, Clone, Copy)]
struct ActiveWalk {
    walk: CameraWalk,
    goal: WalkGoal,
}

/// Answers an outstanding click with "nothing hit" however the loop exits.
struct PendingPickGuard<'a, R, S>(&'a Mutex<SceneCore<R, S>>);

impl<R, S> Drop for PendingPickGuard<'_, R, S> {
    fn drop(&mut self) {
        lock_core(self.0).answer_pick(None);
    }
}

/// State owned by the loop thread; never shared.
struct InteractionLoop {
    walk: Option<ActiveWalk>,
    fly_back_since: Option<Instant>,
    screen_text_at: Instant,
    fps_at: Instant,
    frames: u64,
}

/// Worker body of the continuous interaction loop.
///
/// Each iteration takes the scene lock once: refresh the overlay, service
/// the pending event, render a frame. The sleep happens unlocked.
pub(super) fn run_interaction_loop<R: Renderer, S: RenderSurface>(
    core: &Arc<Mutex<SceneCore<R, S>>>,
) {
    let shared: &Mutex<SceneCore<R, S>> = core;
    let _exit = PendingPickGuard(shared);
    let now = Instant::now();
    let mut state = InteractionLoop {
        walk: None,
        fly_back_since: None,
        screen_text_at: now,
        fps_at: now,
        frames: 0,
    };
    debug!("interaction loop started");

    loop {
        let sleep = {
            let mut guard = lock_core(shared);
            if guard.render_die {
                break;
            }
            state.update_screen_text(&mut guard);
            state.process_event(&mut guard);
            FrameRenderer::render(&mut guard);
            guard.config.animation.loop_sleep()
        };
        thread::sleep(sleep);
        state.frames += 1;
    }

    debug!("interaction loop stopped");
}

impl InteractionLoop {
    fn update_screen_text<R: Renderer, S: RenderSurface>(&mut self, core: &mut SceneCore<R, S>) {
        let animation = core.config.animation;
        if self.screen_text_at.elapsed() < animation.screen_text_interval() {
            return;
        }
        self.update_fps(core);
        self.screen_text_at = Instant::now();

        if !core.valid_context {
            return;
        }
        core.renderer.release_screen_text_shapes();
        if core.fps_label.is_empty() {
            return;
        }
        let bitmap = core.text_cache.get(&core.fps_label);
        core.renderer.draw_screen_text(&ScreenTextShape {
            label: core.fps_label.clone(),
            bitmap,
            top_left: FPS_TOP_LEFT,
            bottom_right: FPS_BOTTOM_RIGHT,
        });
    }

    fn update_fps<R, S>(&mut self, core: &mut SceneCore<R, S>) {
        let elapsed = self.fps_at.elapsed();
        if elapsed < core.config.animation.fps_interval() {
            return;
        }
        let elapsed_ms = elapsed.as_millis().max(1) as u64;
        let fps = self.frames * 1000 / elapsed_ms;
        core.fps_label = format!("Render FPS: {fps}");
        trace!(fps, "render rate updated");
        self.frames = 0;
        self.fps_at = Instant::now();
    }

    fn process_event<R: Renderer, S: RenderSurface>(&mut self, core: &mut SceneCore<R, S>) {
        self.poll_fly_back(core);
        match core.event {
            RenderEvent::Click => self.move_to_bar(core),
            RenderEvent::MoveToDefault => self.move_to_default(core),
            RenderEvent::DragLeft | RenderEvent::DragRight => self.move_to_corner(core),
            RenderEvent::Scroll => {
                // Camera scrolling already happened on the caller's side.
                trace!("scroll event has no loop-side handling");
                core.event = RenderEvent::None;
            }
            RenderEvent::None => {}
        }
    }

    fn poll_fly_back<R, S>(&mut self, core: &mut SceneCore<R, S>) {
        let Some(since) = self.fly_back_since else {
            return;
        };
        if self.walk.is_some() || !core.event.is_none() {
            return;
        }
        if since.elapsed() >= core.config.animation.fly_back_timeout() {
            debug!("fly-back timeout reached, returning to default camera");
            self.fly_back_since = None;
            core.event = RenderEvent::MoveToDefault;
        }
    }

    fn move_to_bar<R: Renderer, S: RenderSurface>(&mut self, core: &mut SceneCore<R, S>) {
        if self.walk.is_none() {
            let point = core.click_pos;
            let id = FrameRenderer::pick(core, point);
            let Some(selection) = core.scene.selection(id) else {
                debug!(x = point.x, y = point.y, %id, "click hit no bar");
                core.event = RenderEvent::None;
                core.answer_pick(None);
                return;
            };
            debug!(%id, value = selection.info.value, "click selected bar");
            core.selected = Some(selection);
            core.answer_pick(Some(selection));

            let layout = core.config.layout;
            let focus = CameraPose::bar_focus(
                selection.info.position,
                Vec2::new(layout.bar_size_x, layout.bar_size_y),
                core.config.animation.focus_z_offset as f32,
            );
            self.start_walk(core, focus.position, focus.direction, WalkGoal::Bar(id));
        }
        self.step(core);
    }

    fn move_to_default<R: Renderer, S: RenderSurface>(&mut self, core: &mut SceneCore<R, S>) {
        if self.walk.is_none() {
            core.renderer.end_highlight();
            self.fly_back_since = None;
            let default = core.scene.default_camera_pose();
            if core.scene.camera_pose().same_placement(&default) {
                core.event = RenderEvent::None;
                return;
            }
            self.start_walk(core, default.position, default.direction, WalkGoal::Default);
        }
        self.step(core);
    }

    fn move_to_corner<R: Renderer, S: RenderSurface>(&mut self, core: &mut SceneCore<R, S>) {
        if self.walk.is_none() {
            let extents = core.scene.extents();
            let target = core
                .config
                .layout
                .placement()
                .corner_position(core.corner, extents);
            self.start_walk(core, target, extents.center(), WalkGoal::Corner);
        }
        self.step(core);
    }

    fn start_walk<R, S>(
        &mut self,
        core: &SceneCore<R, S>,
        position: Vec3,
        direction: Vec3,
        goal: WalkGoal,
    ) {
        let walk = CameraWalk::between(
            &core.scene.camera_pose(),
            position,
            direction,
            core.config.animation.transition_steps,
        );
        trace!(?goal, steps = walk.steps_total(), "camera walk started");
        self.walk = Some(ActiveWalk { walk, goal });
    }

    fn step<R: Renderer, S: RenderSurface>(&mut self, core: &mut SceneCore<R, S>) {
        let Some(active) = self.walk.as_mut() else {
            return;
        };
        let mut pose = core.scene.camera_pose();
        if active.walk.advance(&mut pose) == WalkProgress::Moved {
            core.scene.set_camera_pose(pose);
        }
        if !active.walk.is_finished() {
            return;
        }

        let goal = active.goal;
        self.walk = None;
        core.event = RenderEvent::None;
        match goal {
            WalkGoal::Bar(id) => {
                core.renderer.begin_highlight(id);
                self.fly_back_since = Some(Instant::now());
            }
            WalkGoal::Default | WalkGoal::Corner => {
                self.fly_back_since = None;
            }
        }
        trace!(?goal, "camera walk finished");
    }
}

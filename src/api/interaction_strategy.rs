use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::Duration;

use glam::Vec2;
use tracing::debug;

use crate::core::{BarSelection, CameraPose, PixelPoint};
use crate::error::ChartResult;
use crate::interaction::{DragDirection, RenderEvent};
use crate::render::{RenderSurface, Renderer, ScreenTextShape, Shape};

use super::animation_worker::{TransitionTarget, render_single_frame, run_transition};
use super::chart_runtime::ChartRuntime;
use super::interaction_loop::run_interaction_loop;
use super::scene_state::SceneCore;
use super::InteractionStrategyKind;

const VALUE_TEXT_TOP_LEFT: Vec2 = Vec2::new(-0.9, 0.9);
const VALUE_TEXT_BOTTOM_RIGHT: Vec2 = Vec2::new(-0.6, 0.8);
const PICK_REPLY_POLL: Duration = Duration::from_millis(50);

/// How the chart turns operations into render work.
pub(super) trait InteractionStrategy<R, S>: Send {
    fn kind(&self) -> InteractionStrategyKind;

    fn scene_built(&mut self, runtime: &mut ChartRuntime<R, S>) -> ChartResult<()>;

    fn update(&mut self, runtime: &mut ChartRuntime<R, S>) -> ChartResult<()>;

    fn select(
        &mut self,
        runtime: &mut ChartRuntime<R, S>,
        point: PixelPoint,
    ) -> ChartResult<Option<BarSelection>>;

    fn move_to_default(&mut self, runtime: &mut ChartRuntime<R, S>) -> ChartResult<()>;

    fn move_to_corner(&mut self, runtime: &mut ChartRuntime<R, S>) -> ChartResult<()>;

    /// Called after the corner index already moved for `direction`.
    fn dragged(
        &mut self,
        runtime: &mut ChartRuntime<R, S>,
        direction: DragDirection,
    ) -> ChartResult<()>;

    /// Runs under the scene lock right after a scroll moved the camera.
    fn record_scroll(&mut self, _core: &mut SceneCore<R, S>) {}
}

pub(super) fn strategy_for<R, S>(kind: InteractionStrategyKind) -> Box<dyn InteractionStrategy<R, S>>
where
    R: Renderer + 'static,
    S: RenderSurface + 'static,
{
    match kind {
        InteractionStrategyKind::SingleShot => Box::new(SingleShotInteraction),
        InteractionStrategyKind::ContinuousLoop => Box::new(ContinuousLoopInteraction),
    }
}

/// Every operation spawns one short-lived worker.
pub(super) struct SingleShotInteraction;

impl SingleShotInteraction {
    fn transition<R, S>(
        runtime: &mut ChartRuntime<R, S>,
        target: TransitionTarget,
    ) -> ChartResult<()>
    where
        R: Renderer + 'static,
        S: RenderSurface + 'static,
    {
        runtime.launch("transition", move |core| run_transition(core, target))
    }
}

impl<R, S> InteractionStrategy<R, S> for SingleShotInteraction
where
    R: Renderer + 'static,
    S: RenderSurface + 'static,
{
    fn kind(&self) -> InteractionStrategyKind {
        InteractionStrategyKind::SingleShot
    }

    fn scene_built(&mut self, _runtime: &mut ChartRuntime<R, S>) -> ChartResult<()> {
        Ok(())
    }

    fn update(&mut self, runtime: &mut ChartRuntime<R, S>) -> ChartResult<()> {
        runtime.launch("frame", |core| render_single_frame(core))
    }

    fn select(
        &mut self,
        runtime: &mut ChartRuntime<R, S>,
        point: PixelPoint,
    ) -> ChartResult<Option<BarSelection>> {
        runtime.join()?;
        runtime.lock().renderer.set_picking_mode(true);
        self.update(runtime)?;
        runtime.join()?;
        let id = {
            let mut core = runtime.lock();
            let id = core.renderer.resolve_pixel(point);
            core.renderer.set_picking_mode(false);
            id
        };
        // Put a normal frame back on screen.
        self.update(runtime)?;

        let (selection, target) = {
            let mut core = runtime.lock();
            let Some(selection) = core.scene.selection(id) else {
                debug!(x = point.x, y = point.y, %id, "click hit no bar");
                return Ok(None);
            };
            core.selected = Some(selection);

            let label = format!("Value: {}", selection.info.value);
            let overlay = ScreenTextShape {
                bitmap: core.text_cache.get(&label),
                label,
                top_left: VALUE_TEXT_TOP_LEFT,
                bottom_right: VALUE_TEXT_BOTTOM_RIGHT,
            };
            core.renderer.draw_screen_text(&overlay);
            core.scene.push_shape(Shape::ScreenText(overlay));

            let layout = core.config.layout;
            let focus = CameraPose::bar_focus(
                selection.info.position,
                Vec2::new(layout.bar_size_x, layout.bar_size_y),
                core.config.animation.focus_z_offset as f32,
            );
            debug!(%id, value = selection.info.value, "click selected bar");
            (
                selection,
                TransitionTarget {
                    position: focus.position,
                    direction: focus.direction,
                    steps: core.config.animation.transition_steps,
                },
            )
        };
        Self::transition(runtime, target)?;
        Ok(Some(selection))
    }

    fn move_to_default(&mut self, runtime: &mut ChartRuntime<R, S>) -> ChartResult<()> {
        runtime.join()?;
        let target = {
            let mut core = runtime.lock();
            core.renderer.end_highlight();
            let default = core.scene.default_camera_pose();
            TransitionTarget {
                position: default.position,
                direction: default.direction,
                steps: core.config.animation.transition_steps,
            }
        };
        Self::transition(runtime, target)
    }

    fn move_to_corner(&mut self, runtime: &mut ChartRuntime<R, S>) -> ChartResult<()> {
        runtime.join()?;
        let target = {
            let core = runtime.lock();
            let extents = core.scene.extents();
            TransitionTarget {
                position: core
                    .config
                    .layout
                    .placement()
                    .corner_position(core.corner, extents),
                direction: extents.center(),
                steps: core.config.animation.transition_steps,
            }
        };
        Self::transition(runtime, target)
    }

    fn dragged(
        &mut self,
        runtime: &mut ChartRuntime<R, S>,
        _direction: DragDirection,
    ) -> ChartResult<()> {
        InteractionStrategy::<R, S>::move_to_corner(self, runtime)
    }
}

/// One long-lived loop renders continuously and services queued events.
pub(super) struct ContinuousLoopInteraction;

impl<R, S> InteractionStrategy<R, S> for ContinuousLoopInteraction
where
    R: Renderer + 'static,
    S: RenderSurface + 'static,
{
    fn kind(&self) -> InteractionStrategyKind {
        InteractionStrategyKind::ContinuousLoop
    }

    fn scene_built(&mut self, runtime: &mut ChartRuntime<R, S>) -> ChartResult<()> {
        if runtime.worker_running() {
            return Ok(());
        }
        {
            let mut core = runtime.lock();
            if core.config.scrolling_bars() {
                let layout = core.config.layout;
                let rate = core.config.scroll_rate.unwrap_or(1).max(1) as f32;
                core.renderer.set_scroll_speed(layout.pitch_x() / rate);
                core.renderer.set_scroll_distance(layout.pitch_x());
            }
        }
        runtime.launch("interaction-loop", |core| run_interaction_loop(core))
    }

    fn update(&mut self, _runtime: &mut ChartRuntime<R, S>) -> ChartResult<()> {
        Ok(())
    }

    fn select(
        &mut self,
        runtime: &mut ChartRuntime<R, S>,
        point: PixelPoint,
    ) -> ChartResult<Option<BarSelection>> {
        if !runtime.worker_running() {
            return Ok(None);
        }
        let (reply, answer) = mpsc::channel();
        {
            let mut core = runtime.lock();
            if !core.offer_event(RenderEvent::Click) {
                debug!(pending = ?core.event, "click ignored, event slot busy");
                return Ok(None);
            }
            core.click_pos = point;
            core.pick_reply = Some(reply);
        }

        loop {
            match answer.recv_timeout(PICK_REPLY_POLL) {
                Ok(selection) => return Ok(selection),
                Err(RecvTimeoutError::Disconnected) => return Ok(None),
                Err(RecvTimeoutError::Timeout) => {
                    if !runtime.worker_running() {
                        return Ok(None);
                    }
                }
            }
        }
    }

    fn move_to_default(&mut self, runtime: &mut ChartRuntime<R, S>) -> ChartResult<()> {
        runtime.lock().offer_event(RenderEvent::MoveToDefault);
        Ok(())
    }

    fn move_to_corner(&mut self, runtime: &mut ChartRuntime<R, S>) -> ChartResult<()> {
        // Both drag events walk to the current corner.
        runtime.lock().offer_event(RenderEvent::DragLeft);
        Ok(())
    }

    fn dragged(
        &mut self,
        runtime: &mut ChartRuntime<R, S>,
        direction: DragDirection,
    ) -> ChartResult<()> {
        runtime.lock().offer_event(direction.render_event());
        Ok(())
    }

    fn record_scroll(&mut self, core: &mut SceneCore<R, S>) {
        core.offer_event(RenderEvent::Scroll);
    }
}

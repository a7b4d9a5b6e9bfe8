mod animation_worker;
mod chart_config;
mod chart_runtime;
mod frame_renderer;
mod interaction_loop;
mod interaction_strategy;
mod render_worker;
mod scene_builder;
mod scene_state;

pub use chart_config::{AnimationConfig, ChartConfig, InteractionStrategyKind, SceneLayoutConfig};
pub use render_worker::WorkerStats;
pub use scene_builder::{BuildReport, SceneBuilder};
pub use scene_state::Scene;

use tracing::{debug, warn};

use crate::core::{BarSelection, CameraPose, CategoryProvider, ChartType, DataSeries, PixelPoint};
use crate::error::{ChartError, ChartResult};
use crate::interaction::{CornerIndex, DragDirection, MouseButton, RenderEvent};
use crate::render::{RenderSurface, Renderer, TextCache};

use chart_runtime::ChartRuntime;
use interaction_strategy::{InteractionStrategy, strategy_for};
use scene_state::SceneCore;

/// Interactive 3D bar chart bound to a renderer and a drawing surface.
///
/// All scene state sits behind one lock shared with at most one render
/// worker. Operations that start work first join the previous worker.
pub struct BarChart3D<R, S>
where
    R: Renderer + 'static,
    S: RenderSurface + 'static,
{
    runtime: ChartRuntime<R, S>,
    strategy: Box<dyn InteractionStrategy<R, S>>,
}

impl<R, S> BarChart3D<R, S>
where
    R: Renderer + 'static,
    S: RenderSurface + 'static,
{
    pub fn new(renderer: R, surface: S, config: ChartConfig) -> ChartResult<Self> {
        Self::new_with_text_cache(renderer, surface, config, TextCache::default())
    }

    /// Same as [`BarChart3D::new`] with a caller-provided label rasterizer.
    pub fn new_with_text_cache(
        mut renderer: R,
        mut surface: S,
        config: ChartConfig,
        text_cache: TextCache,
    ) -> ChartResult<Self> {
        config.validate()?;
        let size = surface.size_pixel();
        if !size.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: size.width,
                height: size.height,
            });
        }

        renderer.init();
        renderer.set_viewport_size(size);
        if config.scrolling_bars() {
            renderer.set_scroll();
        }
        surface.set_chart_attached(true);
        debug!(
            width = size.width,
            height = size.height,
            strategy = ?config.strategy,
            "bar chart attached"
        );

        Ok(Self {
            runtime: ChartRuntime::new(SceneCore::new(renderer, surface, text_cache, config)),
            strategy: strategy_for(config.strategy),
        })
    }

    /// Rebuilds the scene from `series`.
    ///
    /// In the continuous-loop strategy the first build also starts the loop.
    pub fn build_scene<C>(
        &mut self,
        series: &[DataSeries],
        categories: &C,
        chart_type: &ChartType,
    ) -> ChartResult<BuildReport>
    where
        C: CategoryProvider + ?Sized,
    {
        let report = {
            let mut guard = self.runtime.lock();
            let core = &mut *guard;
            let report = SceneBuilder::new(core.config.layout, &mut core.text_cache)
                .with_scrolling_bars(core.config.scrolling_bars())
                .build(
                    &mut core.scene,
                    &mut core.renderer,
                    series,
                    categories,
                    chart_type,
                );
            if report.first_build {
                core.corner = CornerIndex::default();
            }
            report
        };
        self.strategy.scene_built(&mut self.runtime)?;
        Ok(report)
    }

    /// Schedules one frame.
    pub fn update(&mut self) -> ChartResult<()> {
        self.strategy.update(&mut self.runtime)
    }

    pub fn render(&mut self) -> ChartResult<()> {
        self.update()
    }

    pub fn move_to_default(&mut self) -> ChartResult<()> {
        self.strategy.move_to_default(&mut self.runtime)
    }

    pub fn move_to_corner(&mut self) -> ChartResult<()> {
        self.strategy.move_to_corner(&mut self.runtime)
    }

    /// Right clicks return to the default camera; left clicks pick a bar
    /// and fly towards it.
    pub fn click(
        &mut self,
        point: PixelPoint,
        button: MouseButton,
    ) -> ChartResult<Option<BarSelection>> {
        match button {
            MouseButton::Right => {
                self.move_to_default()?;
                Ok(None)
            }
            MouseButton::Left => self.strategy.select(&mut self.runtime, point),
            MouseButton::Middle => Ok(None),
        }
    }

    /// Horizontal drags rotate the camera around the scene corners.
    pub fn drag_move(
        &mut self,
        start: PixelPoint,
        end: PixelPoint,
        _button: MouseButton,
    ) -> ChartResult<()> {
        let Some(direction) = DragDirection::from_delta(end.x - start.x) else {
            return Ok(());
        };
        {
            let mut core = self.runtime.lock();
            core.corner = core.corner.after_drag(direction);
            debug!(?direction, corner = core.corner.get(), "drag moved corner");
        }
        self.strategy.dragged(&mut self.runtime, direction)
    }

    /// Moves the camera along its viewing ray by `delta / scroll_divisor`.
    pub fn scroll(&mut self, delta: i32) -> ChartResult<()> {
        {
            let mut guard = self.runtime.lock();
            let core = &mut *guard;
            let divisor =
                i32::try_from(core.config.animation.scroll_divisor.max(1)).unwrap_or(i32::MAX);
            let mut pose = core.scene.camera_pose();
            pose.dolly((delta / divisor) as f32);
            core.scene.set_camera_pose(pose);
            self.strategy.record_scroll(core);
        }
        self.update()
    }

    /// The drawing context is gone; every later frame is skipped.
    pub fn context_destroyed(&mut self) {
        let mut core = self.runtime.lock();
        core.valid_context = false;
        debug!("render context destroyed");
    }

    /// Blocks until the current worker finished.
    ///
    /// The continuous loop only finishes when the chart is dropped.
    pub fn join_render_thread(&mut self) -> ChartResult<()> {
        self.runtime.join()
    }

    #[must_use]
    pub fn worker_stats(&self) -> WorkerStats {
        self.runtime.worker_stats()
    }

    #[must_use]
    pub fn strategy(&self) -> InteractionStrategyKind {
        self.strategy.kind()
    }

    #[must_use]
    pub fn config(&self) -> ChartConfig {
        self.runtime.lock().config
    }

    #[must_use]
    pub fn camera_pose(&self) -> CameraPose {
        self.runtime.lock().scene.camera_pose()
    }

    #[must_use]
    pub fn default_camera_pose(&self) -> CameraPose {
        self.runtime.lock().scene.default_camera_pose()
    }

    #[must_use]
    pub fn corner_index(&self) -> CornerIndex {
        self.runtime.lock().corner
    }

    #[must_use]
    pub fn pending_event(&self) -> RenderEvent {
        self.runtime.lock().event
    }

    /// Last bar a click resolved to.
    #[must_use]
    pub fn selected_bar(&self) -> Option<BarSelection> {
        self.runtime.lock().selected
    }

    /// Current `Render FPS: N` overlay text; empty until the loop measured.
    #[must_use]
    pub fn fps_label(&self) -> String {
        self.runtime.lock().fps_label.clone()
    }

    #[must_use]
    pub fn is_context_valid(&self) -> bool {
        self.runtime.lock().valid_context
    }

    pub fn with_scene<T>(&self, f: impl FnOnce(&Scene) -> T) -> T {
        f(&self.runtime.lock().scene)
    }

    pub fn with_renderer<T>(&self, f: impl FnOnce(&mut R) -> T) -> T {
        f(&mut self.runtime.lock().renderer)
    }

    pub fn with_surface<T>(&self, f: impl FnOnce(&mut S) -> T) -> T {
        f(&mut self.runtime.lock().surface)
    }

    pub fn with_text_cache<T>(&self, f: impl FnOnce(&TextCache) -> T) -> T {
        f(&self.runtime.lock().text_cache)
    }
}

impl<R, S> Drop for BarChart3D<R, S>
where
    R: Renderer + 'static,
    S: RenderSurface + 'static,
{
    fn drop(&mut self) {
        self.runtime.lock().render_die = true;
        if let Err(err) = self.runtime.join() {
            warn!(error = %err, "render worker failed during shutdown");
        }
        let mut core = self.runtime.lock();
        if core.valid_context {
            core.surface.set_chart_attached(false);
        }
        debug!("bar chart detached");
    }
}

use tracing::trace;

use crate::core::{ObjectId, PixelPoint};
use crate::render::{RenderSurface, Renderer, Shape};

use super::scene_state::SceneCore;

pub(super) struct FrameRenderer;

impl FrameRenderer {
    /// Draws one frame with the scene lock held.
    ///
    /// A full frame resubmits every shape; otherwise only the camera moves
    /// and the renderer redraws its retained batch.
    pub(super) fn render<R: Renderer, S: RenderSurface>(core: &mut SceneCore<R, S>) {
        if !core.valid_context {
            trace!("frame skipped, context invalid");
            return;
        }

        core.surface.make_current();
        let size = core.surface.size_pixel();
        core.renderer.set_viewport_size(size);

        let full = core.scene.needs_full_render();
        if full {
            core.renderer.release_text_textures();
            for shape in core.scene.shapes() {
                shape.render(&mut core.renderer);
            }
        } else if let Some(camera @ Shape::Camera(_)) = core.scene.shapes().first() {
            camera.render(&mut core.renderer);
        }

        core.renderer.process_unrendered_shapes(full);
        core.scene.clear_full_render();
        core.surface.swap_buffers();
    }

    /// Renders with id colors and reads the id under `point`.
    ///
    /// A pending full render is flushed first so the picking pass sees the
    /// current batch.
    pub(super) fn pick<R: Renderer, S: RenderSurface>(
        core: &mut SceneCore<R, S>,
        point: PixelPoint,
    ) -> ObjectId {
        if !core.valid_context {
            return ObjectId::NONE;
        }
        if core.scene.needs_full_render() {
            Self::render(core);
        }
        core.renderer.set_picking_mode(true);
        Self::render(core);
        let id = core.renderer.resolve_pixel(point);
        core.renderer.set_picking_mode(false);
        trace!(x = point.x, y = point.y, %id, "picking pass resolved");
        id
    }
}

use std::sync::mpsc;
use std::sync::{Mutex, MutexGuard, PoisonError};

use indexmap::IndexMap;
use tracing::warn;

use crate::core::{
    BarInformation, BarSelection, CameraPose, ObjectId, PixelPoint, SceneExtents,
};
use crate::interaction::{CornerIndex, RenderEvent};
use crate::render::{CameraShape, Shape, ShapeKind, TextCache};

use super::ChartConfig;

/// Built scene: the shape list, the bar map and the camera state.
///
/// Index 0 of the shape list is always the camera, before and after builds.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    shapes: Vec<Shape>,
    bars: IndexMap<ObjectId, BarInformation>,
    categories: Vec<String>,
    series_names: Vec<String>,
    camera: CameraPose,
    default_camera: CameraPose,
    camera_initialized: bool,
    extents: SceneExtents,
    needs_full_render: bool,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    #[must_use]
    pub fn new() -> Self {
        let camera = CameraPose::initial();
        Self {
            shapes: vec![Shape::Camera(CameraShape { pose: camera })],
            bars: IndexMap::new(),
            categories: Vec::new(),
            series_names: Vec::new(),
            camera,
            default_camera: camera,
            camera_initialized: false,
            extents: SceneExtents::default(),
            needs_full_render: true,
        }
    }

    #[must_use]
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    #[must_use]
    pub fn bars(&self) -> &IndexMap<ObjectId, BarInformation> {
        &self.bars
    }

    #[must_use]
    pub fn bar(&self, id: ObjectId) -> Option<&BarInformation> {
        self.bars.get(&id)
    }

    #[must_use]
    pub fn selection(&self, id: ObjectId) -> Option<BarSelection> {
        self.bar(id).map(|info| BarSelection { id, info: *info })
    }

    #[must_use]
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    #[must_use]
    pub fn series_names(&self) -> &[String] {
        &self.series_names
    }

    #[must_use]
    pub fn camera_pose(&self) -> CameraPose {
        self.camera
    }

    #[must_use]
    pub fn default_camera_pose(&self) -> CameraPose {
        self.default_camera
    }

    /// `false` until the first scene build placed the default camera.
    #[must_use]
    pub fn camera_initialized(&self) -> bool {
        self.camera_initialized
    }

    #[must_use]
    pub fn extents(&self) -> SceneExtents {
        self.extents
    }

    #[must_use]
    pub fn needs_full_render(&self) -> bool {
        self.needs_full_render
    }

    #[must_use]
    pub fn count_of(&self, kind: ShapeKind) -> usize {
        self.shapes.iter().filter(|shape| shape.kind() == kind).count()
    }

    /// Replaces the live pose and keeps the camera shape in sync.
    pub fn set_camera_pose(&mut self, pose: CameraPose) {
        self.camera = pose;
        if let Some(Shape::Camera(camera)) = self.shapes.first_mut() {
            camera.pose = pose;
        }
    }

    pub(crate) fn set_default_camera(&mut self, pose: CameraPose, extents: SceneExtents) {
        self.default_camera = pose;
        self.extents = extents;
        self.camera_initialized = true;
    }

    pub(crate) fn set_extents(&mut self, extents: SceneExtents) {
        self.extents = extents;
    }

    pub(crate) fn mark_full_render(&mut self) {
        self.needs_full_render = true;
    }

    pub(crate) fn clear_full_render(&mut self) {
        self.needs_full_render = false;
    }

    /// Drops everything but the camera entry.
    pub(crate) fn reset_contents(&mut self) {
        self.shapes.clear();
        self.shapes.push(Shape::Camera(CameraShape { pose: self.camera }));
        self.bars.clear();
        self.categories.clear();
        self.series_names.clear();
    }

    pub(crate) fn push_shape(&mut self, shape: Shape) {
        self.shapes.push(shape);
    }

    pub(crate) fn insert_bar(&mut self, id: ObjectId, info: BarInformation) {
        self.bars.insert(id, info);
    }

    pub(crate) fn push_category(&mut self, label: String) {
        self.categories.push(label);
    }

    pub(crate) fn push_series_name(&mut self, name: String) {
        self.series_names.push(name);
    }

    pub(crate) fn remove_screen_texts(&mut self) {
        self.shapes.retain(|shape| shape.kind() != ShapeKind::ScreenText);
    }
}

/// Everything guarded by the chart's scene lock.
pub(super) struct SceneCore<R, S> {
    pub(super) renderer: R,
    pub(super) surface: S,
    pub(super) text_cache: TextCache,
    pub(super) scene: Scene,
    pub(super) config: ChartConfig,
    pub(super) valid_context: bool,
    pub(super) event: RenderEvent,
    pub(super) click_pos: PixelPoint,
    pub(super) pick_reply: Option<mpsc::Sender<Option<BarSelection>>>,
    pub(super) selected: Option<BarSelection>,
    pub(super) corner: CornerIndex,
    pub(super) render_die: bool,
    pub(super) fps_label: String,
}

impl<R, S> SceneCore<R, S> {
    pub(super) fn new(renderer: R, surface: S, text_cache: TextCache, config: ChartConfig) -> Self {
        Self {
            renderer,
            surface,
            text_cache,
            scene: Scene::new(),
            config,
            valid_context: true,
            event: RenderEvent::None,
            click_pos: PixelPoint::default(),
            pick_reply: None,
            selected: None,
            corner: CornerIndex::default(),
            render_die: false,
            fps_label: String::new(),
        }
    }

    /// Stores `event` only when the slot is free.
    pub(super) fn offer_event(&mut self, event: RenderEvent) -> bool {
        if !self.event.is_none() {
            return false;
        }
        self.event = event;
        true
    }

    /// Answers an outstanding loop click, if any.
    pub(super) fn answer_pick(&mut self, selection: Option<BarSelection>) {
        if let Some(reply) = self.pick_reply.take() {
            // The caller may have given up waiting; nothing to do then.
            let _ = reply.send(selection);
        }
    }
}

/// Locks the scene, recovering the state of a worker that panicked.
pub(super) fn lock_core<R, S>(core: &Mutex<SceneCore<R, S>>) -> MutexGuard<'_, SceneCore<R, S>> {
    core.lock().unwrap_or_else(|poisoned: PoisonError<_>| {
        warn!("scene lock poisoned by a render worker, recovering");
        poisoned.into_inner()
    })
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::Scene;
    use crate::core::CameraPose;
    use crate::render::{Shape, ShapeKind};

    #[test]
    fn new_scene_starts_with_camera_entry() {
        let scene = Scene::new();
        assert_eq!(scene.shapes().len(), 1);
        assert_eq!(scene.shapes()[0].kind(), ShapeKind::Camera);
        assert!(scene.needs_full_render());
        assert!(!scene.camera_initialized());
    }

    #[test]
    fn camera_shape_follows_pose_updates() {
        let mut scene = Scene::new();
        let pose = CameraPose::new(Vec3::new(1.0, 2.0, 3.0), Vec3::ZERO);
        scene.set_camera_pose(pose);
        assert_eq!(scene.camera_pose(), pose);
        match &scene.shapes()[0] {
            Shape::Camera(camera) => assert_eq!(camera.pose, pose),
            other => panic!("unexpected first shape {other:?}"),
        }
    }

    #[test]
    fn reset_keeps_only_camera() {
        let mut scene = Scene::new();
        scene.push_category("Q1".to_owned());
        scene.reset_contents();
        assert_eq!(scene.shapes().len(), 1);
        assert!(scene.categories().is_empty());
    }
}

use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::ChartResult;
use crate::render::{RenderSurface, Renderer};

use super::WorkerStats;
use super::render_worker::RenderWorkerSlot;
use super::scene_state::{SceneCore, lock_core};

/// Shared scene plus the worker slot that may touch it.
pub(super) struct ChartRuntime<R, S> {
    core: Arc<Mutex<SceneCore<R, S>>>,
    worker: RenderWorkerSlot,
}

impl<R, S> ChartRuntime<R, S>
where
    R: Renderer + 'static,
    S: RenderSurface + 'static,
{
    pub(super) fn new(core: SceneCore<R, S>) -> Self {
        Self {
            core: Arc::new(Mutex::new(core)),
            worker: RenderWorkerSlot::default(),
        }
    }

    pub(super) fn lock(&self) -> MutexGuard<'_, SceneCore<R, S>> {
        lock_core(&self.core)
    }

    pub(super) fn join(&mut self) -> ChartResult<()> {
        self.worker.join()
    }

    pub(super) fn worker_running(&self) -> bool {
        self.worker.is_running()
    }

    pub(super) fn worker_stats(&self) -> WorkerStats {
        self.worker.stats()
    }

    /// Joins the held worker, hands the context over and starts `body`.
    ///
    /// Never call this with the scene lock held.
    pub(super) fn launch<F>(&mut self, name: &str, body: F) -> ChartResult<()>
    where
        F: FnOnce(&Arc<Mutex<SceneCore<R, S>>>) + Send + 'static,
    {
        self.worker.join()?;
        {
            let mut core = self.lock();
            let size = core.surface.size_pixel();
            core.surface.set_win_size(size);
            core.surface.reset_current();
        }
        let core = Arc::clone(&self.core);
        self.worker.launch(name, move || body(&core))
    }
}

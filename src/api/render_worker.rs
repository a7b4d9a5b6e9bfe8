use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread::{self, JoinHandle};

use tracing::{debug, warn};

use crate::error::{ChartError, ChartResult};

/// Launch counters of a chart's render worker slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerStats {
    pub launched: usize,
    /// Highest number of workers ever alive at once.
    pub peak_concurrent: usize,
}

#[derive(Debug, Default)]
struct WorkerCounters {
    launched: AtomicUsize,
    active: AtomicUsize,
    peak: AtomicUsize,
}

/// Counts a worker as alive until dropped, panics included.
struct ActiveWorker(Arc<WorkerCounters>);

impl ActiveWorker {
    fn enter(counters: Arc<WorkerCounters>) -> Self {
        let active = counters.active.fetch_add(1, Ordering::SeqCst) + 1;
        counters.peak.fetch_max(active, Ordering::SeqCst);
        Self(counters)
    }
}

impl Drop for ActiveWorker {
    fn drop(&mut self) {
        self.0.active.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Holder of the single render worker.
///
/// `launch` always joins the previous worker before spawning, so at most one
/// worker touches the scene at a time.
#[derive(Debug, Default)]
pub(super) struct RenderWorkerSlot {
    handle: Option<JoinHandle<()>>,
    counters: Arc<WorkerCounters>,
}

impl RenderWorkerSlot {
    pub(super) fn join(&mut self) -> ChartResult<()> {
        let Some(handle) = self.handle.take() else {
            return Ok(());
        };
        let name = handle.thread().name().unwrap_or("render").to_owned();
        handle.join().map_err(|_| {
            warn!(worker = %name, "render worker panicked");
            ChartError::RenderThread(format!("{name} worker panicked"))
        })?;
        debug!(worker = %name, "render worker joined");
        Ok(())
    }

    pub(super) fn launch<F>(&mut self, name: &str, body: F) -> ChartResult<()>
    where
        F: FnOnce() + Send + 'static,
    {
        self.join()?;

        let counters = Arc::clone(&self.counters);
        let launched = counters.launched.fetch_add(1, Ordering::SeqCst) + 1;
        let handle = thread::Builder::new()
            .name(format!("chart3d-{name}"))
            .spawn(move || {
                let _active = ActiveWorker::enter(counters);
                body();
            })
            .map_err(|e| ChartError::RenderThread(format!("failed to spawn {name} worker: {e}")))?;
        debug!(worker = name, launched, "render worker launched");
        self.handle = Some(handle);
        Ok(())
    }

    pub(super) fn is_running(&self) -> bool {
        self.handle
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    pub(super) fn stats(&self) -> WorkerStats {
        WorkerStats {
            launched: self.counters.launched.load(Ordering::SeqCst),
            peak_concurrent: self.counters.peak.load(Ordering::SeqCst),
        }
    }
}

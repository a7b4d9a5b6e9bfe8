use crate::core::Viewport;

/// Window/context collaborator the chart renders into.
pub trait RenderSurface: Send {
    fn size_pixel(&self) -> Viewport;

    /// Binds the drawing context to the calling thread.
    fn make_current(&mut self);

    /// Releases the drawing context from the calling thread so a worker can
    /// bind it.
    fn reset_current(&mut self);

    fn set_win_size(&mut self, size: Viewport);

    fn swap_buffers(&mut self);

    /// Told when a chart starts or stops rendering into this surface.
    fn set_chart_attached(&mut self, attached: bool);
}

/// In-memory surface for tests and offscreen use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadlessSurface {
    size: Viewport,
    win_size: Option<Viewport>,
    current: bool,
    attached: bool,
    swap_count: usize,
    make_current_count: usize,
}

impl HeadlessSurface {
    #[must_use]
    pub fn new(size: Viewport) -> Self {
        Self {
            size,
            win_size: None,
            current: false,
            attached: false,
            swap_count: 0,
            make_current_count: 0,
        }
    }

    pub fn resize(&mut self, size: Viewport) {
        self.size = size;
    }

    #[must_use]
    pub fn win_size(&self) -> Option<Viewport> {
        self.win_size
    }

    #[must_use]
    pub fn is_current(&self) -> bool {
        self.current
    }

    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    #[must_use]
    pub fn swap_count(&self) -> usize {
        self.swap_count
    }

    #[must_use]
    pub fn make_current_count(&self) -> usize {
        self.make_current_count
    }
}

impl RenderSurface for HeadlessSurface {
    fn size_pixel(&self) -> Viewport {
        self.size
    }

    fn make_current(&mut self) {
        self.current = true;
        self.make_current_count += 1;
    }

    fn reset_current(&mut self) {
        self.current = false;
    }

    fn set_win_size(&mut self, size: Viewport) {
        self.win_size = Some(size);
    }

    fn swap_buffers(&mut self) {
        self.swap_count += 1;
    }

    fn set_chart_attached(&mut self, attached: bool) {
        self.attached = attached;
    }
}

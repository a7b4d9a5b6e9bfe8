//! chart3d-rs: interactive 3D bar chart core.
//!
//! Data series become a scene of bars, axis lines, labels and a camera.
//! A single render worker draws frames, animates camera walks and answers
//! picking queries. The GPU backend and the window are external
//! collaborators behind the [`render::Renderer`] and
//! [`render::RenderSurface`] traits.

pub mod api;
pub mod core;
pub mod error;
pub mod interaction;
pub mod render;
pub mod telemetry;

pub use api::{BarChart3D, ChartConfig};
pub use error::{ChartError, ChartResult};

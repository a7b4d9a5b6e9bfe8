pub mod bar_info;
pub mod camera;
pub mod data_series;
pub mod ids;
pub mod primitives;
pub mod types;

pub use bar_info::{BarInformation, BarSelection};
pub use camera::{CameraPlacement, CameraPose, CameraWalk, SceneExtents, WalkProgress};
pub use data_series::{
    CategoryProvider, ChartType, DEFAULT_SERIES_LABEL_ROLE, DataSeries, FILL_COLOR_PROPERTY,
};
pub use ids::{IdAllocator, ObjectId};
pub use primitives::{bar_height, decimal_to_f64, height_normalizer, max_series_value};
pub use types::{PixelPoint, Viewport};

use glam::Vec3;

use crate::core::ObjectId;

/// Immutable record created for every bar at scene-build time.
///
/// `position` is the bar's base corner with `z` holding the normalized height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarInformation {
    pub position: Vec3,
    pub value: f64,
    pub point_index: usize,
    pub series_index: usize,
}

impl BarInformation {
    #[must_use]
    pub fn new(position: Vec3, value: f64, point_index: usize, series_index: usize) -> Self {
        Self {
            position,
            value,
            point_index,
            series_index,
        }
    }

    #[must_use]
    pub fn height(&self) -> f32 {
        self.position.z
    }
}

/// Outcome of a successful picking query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarSelection {
    pub id: ObjectId,
    pub info: BarInformation,
}

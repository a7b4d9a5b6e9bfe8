use std::f32::consts::PI;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::CameraPlacement;
use crate::error::{ChartError, ChartResult};

/// Geometry of the built scene and the default camera placement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SceneLayoutConfig {
    #[serde(default = "default_bar_size_x")]
    pub bar_size_x: f32,
    #[serde(default = "default_bar_size_y")]
    pub bar_size_y: f32,
    #[serde(default = "default_bar_gap")]
    pub bar_gap_x: f32,
    #[serde(default = "default_bar_gap")]
    pub bar_gap_y: f32,
    #[serde(default = "default_text_height")]
    pub text_height: f32,
    /// Horizontal advance per character of a label quad.
    #[serde(default = "default_glyph_width")]
    pub glyph_width: f32,
    #[serde(default = "default_camera_height")]
    pub camera_height: f32,
    #[serde(default = "default_id_stride")]
    pub id_stride: u32,
    #[serde(default = "default_first_id")]
    pub first_id: u32,
    /// Added to both scene extents.
    #[serde(default = "default_extent_padding")]
    pub extent_padding: f32,
    #[serde(default = "default_pitch")]
    pub default_pitch: f32,
    #[serde(default = "default_roll")]
    pub default_roll: f32,
}

impl Default for SceneLayoutConfig {
    fn default() -> Self {
        Self {
            bar_size_x: default_bar_size_x(),
            bar_size_y: default_bar_size_y(),
            bar_gap_x: default_bar_gap(),
            bar_gap_y: default_bar_gap(),
            text_height: default_text_height(),
            glyph_width: default_glyph_width(),
            camera_height: default_camera_height(),
            id_stride: default_id_stride(),
            first_id: default_first_id(),
            extent_padding: default_extent_padding(),
            default_pitch: default_pitch(),
            default_roll: default_roll(),
        }
    }
}

impl SceneLayoutConfig {
    #[must_use]
    pub fn with_bar_size(mut self, x: f32, y: f32) -> Self {
        self.bar_size_x = x;
        self.bar_size_y = y;
        self
    }

    #[must_use]
    pub fn with_bar_gap(mut self, x: f32, y: f32) -> Self {
        self.bar_gap_x = x;
        self.bar_gap_y = y;
        self
    }

    #[must_use]
    pub fn with_camera_height(mut self, camera_height: f32) -> Self {
        self.camera_height = camera_height;
        self
    }

    #[must_use]
    pub fn with_id_stride(mut self, first_id: u32, id_stride: u32) -> Self {
        self.first_id = first_id;
        self.id_stride = id_stride;
        self
    }

    #[must_use]
    pub fn with_default_angles(mut self, pitch: f32, roll: f32) -> Self {
        self.default_pitch = pitch;
        self.default_roll = roll;
        self
    }

    /// Distance between neighboring bar origins along X.
    #[must_use]
    pub fn pitch_x(&self) -> f32 {
        self.bar_size_x + self.bar_gap_x
    }

    /// Distance between neighboring series lanes along Y.
    #[must_use]
    pub fn pitch_y(&self) -> f32 {
        self.bar_size_y + self.bar_gap_y
    }

    #[must_use]
    pub fn placement(&self) -> CameraPlacement {
        CameraPlacement {
            camera_height: self.camera_height,
            pitch: self.default_pitch,
            roll: self.default_roll,
        }
    }

    fn validate(&self) -> ChartResult<()> {
        let sizes = [
            ("bar_size_x", self.bar_size_x),
            ("bar_size_y", self.bar_size_y),
            ("text_height", self.text_height),
            ("glyph_width", self.glyph_width),
            ("camera_height", self.camera_height),
        ];
        for (name, value) in sizes {
            if !value.is_finite() || value <= 0.0 {
                return Err(ChartError::InvalidConfig(format!(
                    "{name} must be finite and > 0, got {value}"
                )));
            }
        }
        let offsets = [
            ("bar_gap_x", self.bar_gap_x),
            ("bar_gap_y", self.bar_gap_y),
            ("extent_padding", self.extent_padding),
        ];
        for (name, value) in offsets {
            if !value.is_finite() || value < 0.0 {
                return Err(ChartError::InvalidConfig(format!(
                    "{name} must be finite and >= 0, got {value}"
                )));
            }
        }
        if !self.default_pitch.is_finite() || !self.default_roll.is_finite() {
            return Err(ChartError::InvalidConfig(
                "default camera angles must be finite".to_owned(),
            ));
        }
        if self.id_stride == 0 || self.first_id == 0 {
            return Err(ChartError::InvalidConfig(
                "first_id and id_stride must be > 0".to_owned(),
            ));
        }
        Ok(())
    }
}

/// Timing of camera transitions and of the continuous interaction loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimationConfig {
    #[serde(default = "default_transition_steps")]
    pub transition_steps: u32,
    /// Height above a clicked bar the camera walks to.
    #[serde(default = "default_focus_z_offset")]
    pub focus_z_offset: u32,
    #[serde(default = "default_fly_back_ms")]
    pub fly_back_ms: u64,
    #[serde(default = "default_screen_text_refresh_ms")]
    pub screen_text_refresh_ms: u64,
    #[serde(default = "default_fps_refresh_ms")]
    pub fps_refresh_ms: u64,
    #[serde(default = "default_loop_sleep_ms")]
    pub loop_sleep_ms: u64,
    /// Scroll deltas are divided by this before moving the camera.
    #[serde(default = "default_scroll_divisor")]
    pub scroll_divisor: u32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            transition_steps: default_transition_steps(),
            focus_z_offset: default_focus_z_offset(),
            fly_back_ms: default_fly_back_ms(),
            screen_text_refresh_ms: default_screen_text_refresh_ms(),
            fps_refresh_ms: default_fps_refresh_ms(),
            loop_sleep_ms: default_loop_sleep_ms(),
            scroll_divisor: default_scroll_divisor(),
        }
    }
}

impl AnimationConfig {
    #[must_use]
    pub fn with_transition_steps(mut self, steps: u32) -> Self {
        self.transition_steps = steps;
        self
    }

    #[must_use]
    pub fn with_fly_back_ms(mut self, fly_back_ms: u64) -> Self {
        self.fly_back_ms = fly_back_ms;
        self
    }

    #[must_use]
    pub fn with_loop_sleep_ms(mut self, loop_sleep_ms: u64) -> Self {
        self.loop_sleep_ms = loop_sleep_ms;
        self
    }

    #[must_use]
    pub fn fly_back_timeout(&self) -> Duration {
        Duration::from_millis(self.fly_back_ms)
    }

    #[must_use]
    pub fn screen_text_interval(&self) -> Duration {
        Duration::from_millis(self.screen_text_refresh_ms)
    }

    #[must_use]
    pub fn fps_interval(&self) -> Duration {
        Duration::from_millis(self.fps_refresh_ms)
    }

    #[must_use]
    pub fn loop_sleep(&self) -> Duration {
        Duration::from_millis(self.loop_sleep_ms)
    }

    fn validate(&self) -> ChartResult<()> {
        if self.transition_steps == 0 {
            return Err(ChartError::InvalidConfig(
                "transition_steps must be > 0".to_owned(),
            ));
        }
        if self.scroll_divisor == 0 {
            return Err(ChartError::InvalidConfig(
                "scroll_divisor must be > 0".to_owned(),
            ));
        }
        if self.fps_refresh_ms == 0 {
            return Err(ChartError::InvalidConfig(
                "fps_refresh_ms must be > 0".to_owned(),
            ));
        }
        Ok(())
    }
}

/// How clicks, drags and frames are driven.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InteractionStrategyKind {
    /// One worker per operation: single frames and animated transitions.
    #[default]
    SingleShot,
    /// One long-lived loop that renders continuously and services events.
    ContinuousLoop,
}

/// Public chart bootstrap configuration.
///
/// Serializable so hosts can persist chart setup alongside their own state.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ChartConfig {
    #[serde(default)]
    pub layout: SceneLayoutConfig,
    #[serde(default)]
    pub animation: AnimationConfig,
    #[serde(default)]
    pub strategy: InteractionStrategyKind,
    /// Enables scrolling bars in the continuous loop.
    #[serde(default)]
    pub scroll_rate: Option<u32>,
}

impl ChartConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_layout(mut self, layout: SceneLayoutConfig) -> Self {
        self.layout = layout;
        self
    }

    #[must_use]
    pub fn with_animation(mut self, animation: AnimationConfig) -> Self {
        self.animation = animation;
        self
    }

    #[must_use]
    pub fn with_strategy(mut self, strategy: InteractionStrategyKind) -> Self {
        self.strategy = strategy;
        self
    }

    #[must_use]
    pub fn with_scroll_rate(mut self, scroll_rate: Option<u32>) -> Self {
        self.scroll_rate = scroll_rate;
        self
    }

    /// Scrolling bars only run inside the continuous loop.
    #[must_use]
    pub fn scrolling_bars(&self) -> bool {
        self.strategy == InteractionStrategyKind::ContinuousLoop && self.scroll_rate.is_some()
    }

    pub fn validate(&self) -> ChartResult<()> {
        self.layout.validate()?;
        self.animation.validate()?;
        if self.scroll_rate == Some(0) {
            return Err(ChartError::InvalidConfig(
                "scroll_rate must be > 0 when set".to_owned(),
            ));
        }
        Ok(())
    }

    /// Serializes config to pretty JSON.
    pub fn to_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ChartError::InvalidData(format!("failed to serialize config: {e}")))
    }

    /// Deserializes config from JSON.
    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        serde_json::from_str(input)
            .map_err(|e| ChartError::InvalidData(format!("failed to parse config: {e}")))
    }
}

fn default_bar_size_x() -> f32 {
    30.0
}

fn default_bar_size_y() -> f32 {
    5.0
}

fn default_bar_gap() -> f32 {
    5.0
}

fn default_text_height() -> f32 {
    10.0
}

fn default_glyph_width() -> f32 {
    10.0
}

fn default_camera_height() -> f32 {
    500.0
}

fn default_id_stride() -> u32 {
    10
}

fn default_first_id() -> u32 {
    1
}

fn default_extent_padding() -> f32 {
    40.0
}

fn default_pitch() -> f32 {
    -PI / 6.5
}

fn default_roll() -> f32 {
    -PI / 8.0
}

fn default_transition_steps() -> u32 {
    200
}

fn default_focus_z_offset() -> u32 {
    240
}

fn default_fly_back_ms() -> u64 {
    10_000
}

fn default_screen_text_refresh_ms() -> u64 {
    20
}

fn default_fps_refresh_ms() -> u64 {
    500
}

fn default_loop_sleep_ms() -> u64 {
    1
}

fn default_scroll_divisor() -> u32 {
    10
}

#[cfg(test)]
mod tests {
    use super::{AnimationConfig, ChartConfig, InteractionStrategyKind, SceneLayoutConfig};

    #[test]
    fn empty_json_yields_defaults() {
        let config = ChartConfig::from_json_str("{}").expect("parse");
        assert_eq!(config, ChartConfig::default());
        assert_eq!(config.layout.id_stride, 10);
        assert_eq!(config.animation.transition_steps, 200);
        assert_eq!(config.strategy, InteractionStrategyKind::SingleShot);
    }

    #[test]
    fn json_round_trip_preserves_overrides() {
        let config = ChartConfig::new()
            .with_strategy(InteractionStrategyKind::ContinuousLoop)
            .with_scroll_rate(Some(4))
            .with_animation(AnimationConfig::default().with_transition_steps(12));
        let json = config.to_json_pretty().expect("serialize");
        let parsed = ChartConfig::from_json_str(&json).expect("parse");
        assert_eq!(parsed, config);
        assert!(parsed.scrolling_bars());
    }

    #[test]
    fn validation_rejects_degenerate_values() {
        let zero_stride = ChartConfig::new()
            .with_layout(SceneLayoutConfig::default().with_id_stride(1, 0));
        assert!(zero_stride.validate().is_err());

        let zero_steps = ChartConfig::new()
            .with_animation(AnimationConfig::default().with_transition_steps(0));
        assert!(zero_steps.validate().is_err());

        let nan_bar = ChartConfig::new()
            .with_layout(SceneLayoutConfig::default().with_bar_size(f32::NAN, 5.0));
        assert!(nan_bar.validate().is_err());

        assert!(ChartConfig::new().with_scroll_rate(Some(0)).validate().is_err());
        assert!(ChartConfig::new().validate().is_ok());
    }
}

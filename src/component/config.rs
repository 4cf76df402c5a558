//! Configuration for a component window

use serde::Deserialize;

/// Configuration options for a [`Window`](super::Window)
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WindowConfig {
    /// Window width in logical pixels
    pub width: f32,

    /// Window height in logical pixels
    pub height: f32,

    /// Frames per second used to convert animation durations to frames
    pub animation_fps: u32,

    /// Physical pixels per logical pixel
    pub scale_factor: f32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            animation_fps: 244,
            scale_factor: 1.0,
        }
    }
}

impl WindowConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the window size
    pub fn with_size(mut self, width: f32, height: f32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set the animation frame rate
    pub fn with_animation_fps(mut self, fps: u32) -> Self {
        self.animation_fps = fps;
        self
    }

    /// Set the physical pixel scale
    pub fn with_scale_factor(mut self, scale: f32) -> Self {
        self.scale_factor = scale;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = WindowConfig::default();
        assert_eq!(config.animation_fps, 244);
        assert_eq!(config.scale_factor, 1.0);
        assert_eq!((config.width, config.height), (800.0, 600.0));
    }

    #[test]
    fn test_builder_pattern() {
        let config = WindowConfig::new()
            .with_size(320.0, 240.0)
            .with_animation_fps(60)
            .with_scale_factor(2.0);
        assert_eq!(config.width, 320.0);
        assert_eq!(config.height, 240.0);
        assert_eq!(config.animation_fps, 60);
        assert_eq!(config.scale_factor, 2.0);
    }

    #[test]
    fn test_partial_toml() {
        let config: WindowConfig = toml::from_str("width = 100.0\nanimation_fps = 30").unwrap();
        assert_eq!(config.width, 100.0);
        assert_eq!(config.height, 600.0);
        assert_eq!(config.animation_fps, 30);
    }
}

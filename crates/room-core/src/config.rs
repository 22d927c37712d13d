//! Engine tuning knobs

use serde::{Deserialize, Serialize};

/// Editor engine configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EditorConfig {
    /// Maximum number of live objects (primitives and models combined)
    pub max_objects: usize,
    /// Translation applied per manipulation tick for each pressed direction
    pub nudge_step: f32,
    /// Step multiplier while the speed modifier is held
    pub fast_multiplier: f32,
    /// Whether moving objects are blocked by other objects at start-up
    pub collisions_enabled: bool,
    /// Appended to a model file stem to name its companion texture
    pub texture_suffix: String,
    /// Default height/width/depth factor for imported models
    pub default_model_factor: f32,
    /// First-person camera translation per navigation tick
    pub camera_speed: f32,
    /// Radians of camera rotation per unit of pointer movement
    pub look_sensitivity: f32,
    /// Install the ambient + directional default lights on start-up
    pub default_lights: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            max_objects: 10,
            nudge_step: 0.05,
            fast_multiplier: 3.0,
            collisions_enabled: true,
            texture_suffix: "_texture.png".to_string(),
            default_model_factor: 0.2,
            camera_speed: 0.1,
            look_sensitivity: 0.002,
            default_lights: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: EditorConfig = ron::from_str("(max_objects: 3)").unwrap();
        assert_eq!(config.max_objects, 3);
        assert_eq!(config.nudge_step, 0.05);
        assert_eq!(config.texture_suffix, "_texture.png");
    }
}

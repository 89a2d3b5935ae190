//! Viewer configuration
//!
//! The viewer has no config file; every tunable lives here with a fixed
//! default so that the window, camera and light are set up the same way on
//! every run.

use cgmath::Vector3;

/// Message shown when the user picks a file the viewer cannot load.
pub const UNSUPPORTED_FILE_MESSAGE: &str = "Please select a .gltf, .glb, or .babylon file.";

/// Extensions accepted by the file picker, lowercase and without the dot.
pub const SUPPORTED_EXTENSIONS: [&str; 3] = ["gltf", "glb", "babylon"];

/// Fixed settings for the viewer window, camera, light and normalization.
#[derive(Debug, Clone)]
pub struct ViewerConfig {
    pub window_title: String,
    pub window_size: (u32, u32),
    pub clear_color: wgpu::Color,
    pub camera: CameraConfig,
    pub light: LightConfig,
    /// Loaded models are scaled so that their largest half-extent times this
    /// factor becomes one world unit.
    pub normalization_factor: f32,
}

/// Initial orbit camera placement and controller speeds.
#[derive(Debug, Clone, Copy)]
pub struct CameraConfig {
    pub alpha: f32,
    pub beta: f32,
    pub radius: f32,
    pub target: Vector3<f32>,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
}

/// Hemispheric light: `sky_color` faces `direction`, `ground_color` faces away.
#[derive(Debug, Clone, Copy)]
pub struct LightConfig {
    pub direction: Vector3<f32>,
    pub sky_color: [f32; 3],
    pub ground_color: [f32; 3],
    pub intensity: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            alpha: 0.0,
            beta: 0.0,
            radius: 10.0,
            target: Vector3::new(0.0, 0.0, 0.0),
            rotate_speed: 0.005,
            zoom_speed: 0.1,
            pan_speed: 0.01,
        }
    }
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            direction: Vector3::new(0.0, 1.0, 0.0),
            sky_color: [1.0, 1.0, 1.0],
            ground_color: [0.0, 0.0, 0.0],
            intensity: 1.0,
        }
    }
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            window_title: "3D Model Viewer".to_string(),
            window_size: (1200, 800),
            clear_color: wgpu::Color {
                r: 0.2,
                g: 0.2,
                b: 0.3,
                a: 1.0,
            },
            camera: CameraConfig::default(),
            light: LightConfig::default(),
            normalization_factor: 1.5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_viewer_layout() {
        let config = ViewerConfig::default();
        assert_eq!(config.camera.radius, 10.0);
        assert_eq!(config.light.direction, Vector3::new(0.0, 1.0, 0.0));
        assert_eq!(config.normalization_factor, 1.5);
    }

    #[test]
    fn message_lists_every_extension() {
        for ext in SUPPORTED_EXTENSIONS {
            assert!(UNSUPPORTED_FILE_MESSAGE.contains(&format!(".{ext}")));
        }
    }
}

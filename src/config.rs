use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

use crate::color::Color;

pub const CONFIG_FILE: &str = "showcase.toml";

/// Everything tunable about the showcase. Every field has a default, so a
/// config file only needs to name what it changes.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ShowcaseConfig {
    pub window: WindowConfig,
    pub render: RenderConfig,
    pub camera: CameraConfig,
    pub motion: MotionConfig,
    pub page: PageConfig,
    pub customizer: CustomizerConfig,
}

impl ShowcaseConfig {
    /// Reads `path` if it exists, otherwise falls back to the defaults.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            log::info!("No {} found, using default configuration", path.display());
            return Ok(Self::default());
        }

        let source = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::from_toml(&source)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        log::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn from_toml(source: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.customizer.options.is_empty() {
            anyhow::bail!("customizer.options must not be empty");
        }
        if self.customizer.initial >= self.customizer.options.len() {
            anyhow::bail!(
                "customizer.initial is {} but there are only {} options",
                self.customizer.initial,
                self.customizer.options.len()
            );
        }
        if !(0.0..=1.0).contains(&self.motion.smoothing) {
            anyhow::bail!("motion.smoothing must be within [0, 1]");
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Chair Showcase".to_string(),
            width: 1280,
            height: 800,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub vsync: bool,
    pub background: u32,
    pub ambient_intensity: f32,
    pub sun_intensity: f32,
    pub sun_position: [f32; 3],
    pub watch_shaders: bool,
}

impl RenderConfig {
    pub fn background(&self) -> Color {
        Color::from_hex(self.background)
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            vsync: true,
            background: 0x0a0a0a,
            ambient_intensity: 0.6,
            sun_intensity: 1.0,
            sun_position: [5.0, 5.0, 5.0],
            watch_shaders: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view.
    pub fov_degrees: f32,
    pub distance: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 75.0,
            distance: 5.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Target tilt in radians per unit of normalized pointer offset.
    pub pointer_gain: f32,
    /// Fraction of the remaining distance covered each frame.
    pub smoothing: f32,
    /// Radians added to the yaw every frame.
    pub idle_spin: f32,
    pub bob_amplitude: f32,
    /// Radians per second.
    pub bob_speed: f32,
    pub scroll_turns: f32,
    pub scroll_lift: f32,
    pub intro_duration: f32,
    pub pulse_peak: f32,
    pub pulse_leg: f32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            pointer_gain: 0.05,
            smoothing: 0.05,
            idle_spin: 0.002,
            bob_amplitude: 0.05,
            bob_speed: 1.0,
            scroll_turns: 1.0,
            scroll_lift: 0.5,
            intro_duration: 2.0,
            pulse_peak: 1.1,
            pulse_leg: 0.3,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeatureCopy {
    pub title: String,
    pub body: String,
}

impl FeatureCopy {
    fn new(title: &str, body: &str) -> Self {
        Self {
            title: title.to_string(),
            body: body.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    pub headline: String,
    pub tagline: String,
    pub cta_label: String,
    pub features: Vec<FeatureCopy>,
    pub card_duration: f32,
    pub card_stagger: f32,
    /// Pixels an element rises while it fades in.
    pub entrance_rise: f32,
    /// Fraction of the viewport height an element's top must cross.
    pub entrance_line: f32,
    pub hero_intro_duration: f32,
    pub wheel_line_height: f32,
    pub cta_hover_scale: f32,
    pub cta_hover_duration: f32,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            headline: "Sit Better. Work Longer.".to_string(),
            tagline: "An ergonomic chair shaped around the way you actually work.".to_string(),
            cta_label: "Pre-order now".to_string(),
            features: vec![
                FeatureCopy::new(
                    "Adaptive lumbar support",
                    "The backrest follows your spine as you lean and shift.",
                ),
                FeatureCopy::new(
                    "Breathable mesh",
                    "Air moves through the seat so long sessions stay cool.",
                ),
                FeatureCopy::new(
                    "Four-way armrests",
                    "Height, depth, width and angle adjust without tools.",
                ),
            ],
            card_duration: 1.0,
            card_stagger: 0.2,
            entrance_rise: 50.0,
            entrance_line: 0.8,
            hero_intro_duration: 1.5,
            wheel_line_height: 100.0,
            cta_hover_scale: 1.05,
            cta_hover_duration: 0.3,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ColorOption {
    pub name: String,
    pub color: u32,
}

impl ColorOption {
    fn new(name: &str, color: u32) -> Self {
        Self {
            name: name.to_string(),
            color,
        }
    }

    pub fn color(&self) -> Color {
        Color::from_hex(self.color)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CustomizerConfig {
    pub options: Vec<ColorOption>,
    pub initial: usize,
}

impl Default for CustomizerConfig {
    fn default() -> Self {
        Self {
            options: vec![
                ColorOption::new("Purple", 0x6a11cb),
                ColorOption::new("Blue", 0x2575fc),
                ColorOption::new("Green", 0x2e8b57),
                ColorOption::new("Red", 0xff6347),
            ],
            initial: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_showcase_constants() {
        let config = ShowcaseConfig::default();

        assert_eq!(config.motion.pointer_gain, 0.05);
        assert_eq!(config.motion.idle_spin, 0.002);
        assert_eq!(config.camera.fov_degrees, 75.0);
        assert_eq!(config.render.background(), Color::from_hex(0x0a0a0a));
        assert_eq!(config.customizer.options[1].color(), Color::from_hex(0x2575fc));
        assert_eq!(config.page.features.len(), 3);
    }

    #[test]
    fn partial_files_keep_remaining_defaults() {
        let config = ShowcaseConfig::from_toml(
            r#"
            [motion]
            smoothing = 0.1

            [customizer]
            options = [{ name = "Black", color = 0x111111 }]
            "#,
        )
        .unwrap();

        assert_eq!(config.motion.smoothing, 0.1);
        assert_eq!(config.motion.idle_spin, 0.002);
        assert_eq!(config.customizer.options.len(), 1);
        assert_eq!(config.customizer.options[0].color, 0x111111);
        assert_eq!(config.window.width, 1280);
    }

    #[test]
    fn rejects_inconsistent_customizer() {
        let error = ShowcaseConfig::from_toml("[customizer]\noptions = []\n").unwrap_err();
        assert!(error.to_string().contains("options"));

        assert!(ShowcaseConfig::from_toml("[customizer]\ninitial = 9\n").is_err());
        assert!(ShowcaseConfig::from_toml("[motion]\nsmoothing = 2.0\n").is_err());
        assert!(ShowcaseConfig::from_toml("[motion\n").is_err());
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = ShowcaseConfig::load("does/not/exist.toml").unwrap();
        assert_eq!(config.window.title, "Chair Showcase");
    }
}

//! Configuration for backdrop: the page sections and the effect bound to each region.
//!
//! Loaded from `config.toml` in the platform config directory. A missing file yields the
//! built-in demo page.

use std::path::{Path, PathBuf};
use std::time::Duration;

use backdrop_core::{
    BoxesOptions, DotPatternOptions, EffectConfig, LightWavesOptions, Rgb, SnowOptions,
    SpotlightOptions, WaveGridOptions, parse_hex,
};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

const CONFIG_FILE: &str = "config.toml";

/// Errors raised while reading or writing the configuration file.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("no home directory to keep configuration in")]
    NoConfigDir,

    #[error("could not access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("could not serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// One page section, stacked top to bottom in configuration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionConfig {
    pub id: String,
    /// Heading drawn over the background.
    #[serde(default)]
    pub title: String,
    /// Share of the terminal height relative to the other sections.
    #[serde(default = "default_weight")]
    pub weight: u16,
}

impl SectionConfig {
    /// Id of the background region inside this section.
    pub fn region_id(&self) -> String {
        format!("{}-bg", self.id)
    }
}

fn default_weight() -> u16 {
    1
}

/// An effect bound to a host region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectBinding {
    pub region: String,
    pub effect: EffectConfig,
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Frames per second the host schedules at.
    pub frame_rate: u32,
    /// Physical pixels per logical pixel. A terminal cell is 8 x 16 logical pixels, so
    /// 0.125 maps one physical pixel to each half cell.
    pub device_pixel_ratio: f32,
    /// `tracing` filter level for the log file.
    pub log_level: String,
    /// Seed for reproducible effects; entropy when absent.
    pub seed: Option<u64>,
    /// `#rrggbb` color shown beneath every surface.
    pub backdrop: String,
    pub sections: Vec<SectionConfig>,
    pub effects: Vec<EffectBinding>,
}

impl Default for Config {
    fn default() -> Self {
        let section = |id: &str, title: &str, weight| SectionConfig {
            id: id.into(),
            title: title.into(),
            weight,
        };
        let bind = |region: &str, effect| EffectBinding {
            region: region.into(),
            effect,
        };

        Self {
            frame_rate: 30,
            device_pixel_ratio: 0.125,
            log_level: "info".into(),
            seed: None,
            backdrop: "#030712".into(),
            sections: vec![
                section("hero", "Hello, I build things", 3),
                section("about", "About", 2),
                section("projects", "Projects", 2),
                section("skills", "Skills", 2),
                section("contact", "Get in touch", 1),
            ],
            effects: vec![
                bind("hero-bg", EffectConfig::LightWaves(LightWavesOptions::default())),
                bind("about-bg", EffectConfig::Spotlight(SpotlightOptions::default())),
                // Dots sized to stay visible at one pixel per half cell.
                bind(
                    "projects-bg",
                    EffectConfig::DotPattern(DotPatternOptions {
                        dot_size: 8.0,
                        gap: 24.0,
                        proximity: 160.0,
                        ..DotPatternOptions::default()
                    }),
                ),
                bind("projects-bg", EffectConfig::Boxes(BoxesOptions::default())),
                bind("skills-bg", EffectConfig::Snow(SnowOptions::default())),
                bind("contact-bg", EffectConfig::WaveGrid(WaveGridOptions::default())),
            ],
        }
    }
}

impl Config {
    /// Path of the configuration file in the platform config directory.
    pub fn path() -> Result<PathBuf, ConfigError> {
        ProjectDirs::from("", "", "backdrop")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE))
            .ok_or(ConfigError::NoConfigDir)
    }

    /// Load from the platform config directory, or the defaults when no file exists.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Write as TOML, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let io = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io)?;
        }
        let text = toml::to_string_pretty(self)?;
        std::fs::write(path, text).map_err(io)
    }

    /// Time between scheduled frames; the rate is clamped to 1-120 fps.
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.frame_rate.clamp(1, 120) as f64)
    }

    /// The backdrop color, black when malformed.
    pub fn backdrop_color(&self) -> Rgb {
        parse_hex(&self.backdrop).unwrap_or_else(|| {
            tracing::warn!(backdrop = %self.backdrop, "expected #rrggbb, using black");
            Rgb::BLACK
        })
    }

    /// Effects bound to `region`, bottom layer first.
    pub fn effects_for<'a>(&'a self, region: &'a str) -> impl Iterator<Item = &'a EffectConfig> {
        self.effects
            .iter()
            .filter(move |binding| binding.region == region)
            .map(|binding| &binding.effect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("backdrop-config-{}-{name}", std::process::id()))
            .join(CONFIG_FILE)
    }

    #[test]
    fn test_default_demo_page() {
        let config = Config::default();
        let ids: Vec<&str> = config.sections.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["hero", "about", "projects", "skills", "contact"]);

        let projects: Vec<&str> = config.effects_for("projects-bg").map(|e| e.name()).collect();
        assert_eq!(projects, vec!["dot_pattern", "boxes"]);
        assert_eq!(config.effects_for("hero-bg").count(), 1);
        let contact: Vec<&str> = config.effects_for("contact-bg").map(|e| e.name()).collect();
        assert_eq!(contact, vec!["wave_grid"]);
    }

    #[test]
    fn test_region_id() {
        let section = SectionConfig {
            id: "skills".into(),
            title: String::new(),
            weight: 1,
        };
        assert_eq!(section.region_id(), "skills-bg");
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = toml::from_str(
            r##"
            frame_rate = 60

            [[sections]]
            id = "hero"

            [[effects]]
            region = "hero-bg"
            [effects.effect]
            kind = "snow"
            wind = -0.5
            "##,
        )
        .unwrap();

        assert_eq!(config.frame_rate, 60);
        assert_eq!(config.device_pixel_ratio, 0.125);
        assert_eq!(config.sections[0].weight, 1);
        match &config.effects[0].effect {
            EffectConfig::Snow(snow) => {
                assert_eq!(snow.wind, -0.5);
                assert_eq!(snow.count, 150);
            }
            other => panic!("unexpected effect {other:?}"),
        }
    }

    #[test]
    fn test_unknown_effect_is_an_error() {
        let result: Result<Config, _> = toml::from_str(
            r#"
            [[effects]]
            region = "hero-bg"
            [effects.effect]
            kind = "fireworks"
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_save_and_load() {
        let path = temp_path("save");
        let mut config = Config::default();
        config.seed = Some(42);
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_load_errors() {
        let missing = temp_path("missing");
        assert!(matches!(
            Config::load_from(&missing),
            Err(ConfigError::Io { .. })
        ));

        let bad = temp_path("bad");
        std::fs::create_dir_all(bad.parent().unwrap()).unwrap();
        std::fs::write(&bad, "frame_rate = \"fast\"").unwrap();
        assert!(matches!(
            Config::load_from(&bad),
            Err(ConfigError::Parse { .. })
        ));
        let _ = std::fs::remove_dir_all(bad.parent().unwrap());
    }

    #[test]
    fn test_frame_interval_clamped() {
        let config = Config {
            frame_rate: 0,
            ..Config::default()
        };
        assert_eq!(config.frame_interval(), Duration::from_secs(1));
        assert_eq!(Config::default().backdrop_color(), Rgb::new(3, 7, 18));
    }

    #[test]
    fn test_malformed_backdrop_is_black() {
        let config = Config {
            backdrop: "navy".into(),
            ..Config::default()
        };
        assert_eq!(config.backdrop_color(), Rgb::BLACK);
    }
}

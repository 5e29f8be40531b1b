//! Per-effect configuration options.
//!
//! Every option struct deserializes with `#[serde(default)]`, so any key left out of a
//! configuration file falls back to the values documented on the `Default` impl.

use serde::{Deserialize, Serialize};

use crate::timing::TimingBasis;

/// Which effect to run and how to configure it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EffectConfig {
    Bokeh(BokehOptions),
    DotPattern(DotPatternOptions),
    Snow(SnowOptions),
    LightWaves(LightWavesOptions),
    Spotlight(SpotlightOptions),
    Boxes(BoxesOptions),
    WaveGrid(WaveGridOptions),
}

impl EffectConfig {
    /// Short display name.
    pub fn name(&self) -> &'static str {
        match self {
            EffectConfig::Bokeh(_) => "bokeh",
            EffectConfig::DotPattern(_) => "dot_pattern",
            EffectConfig::Snow(_) => "snow",
            EffectConfig::LightWaves(_) => "light_waves",
            EffectConfig::Spotlight(_) => "spotlight",
            EffectConfig::Boxes(_) => "boxes",
            EffectConfig::WaveGrid(_) => "wave_grid",
        }
    }
}

/// Drifting translucent orbs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BokehOptions {
    pub count: usize,
    pub min_size: f32,
    pub max_size: f32,
    pub speed: f32,
    /// `rgba(...)` colors; the alpha argument is replaced per gradient stop.
    pub colors: Vec<String>,
    pub timing: TimingBasis,
}

impl Default for BokehOptions {
    fn default() -> Self {
        Self {
            count: 25,
            min_size: 50.0,
            max_size: 200.0,
            speed: 1.0,
            colors: vec![
                "rgba(255, 200, 120, 0.3)".into(),
                "rgba(255, 180, 100, 0.25)".into(),
                "rgba(255, 220, 150, 0.2)".into(),
                "rgba(255, 160, 80, 0.25)".into(),
                "rgba(255, 240, 200, 0.2)".into(),
            ],
            timing: TimingBasis::Tick,
        }
    }
}

/// Interactive dot grid that glows near the pointer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DotPatternOptions {
    pub dot_size: f32,
    pub gap: f32,
    pub base_color: String,
    pub glow_color: String,
    pub proximity: f32,
    pub glow_intensity: f32,
    pub wave_speed: f32,
    pub timing: TimingBasis,
}

impl Default for DotPatternOptions {
    fn default() -> Self {
        Self {
            dot_size: 2.0,
            gap: 24.0,
            base_color: "#404040".into(),
            glow_color: "#22d3ee".into(),
            proximity: 120.0,
            glow_intensity: 1.0,
            wave_speed: 0.5,
            timing: TimingBasis::Elapsed,
        }
    }
}

/// Falling, wind-blown snow in three depth layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnowOptions {
    pub count: usize,
    /// Multiplier on `count`.
    pub intensity: f32,
    /// Horizontal bias per frame; negative blows left.
    pub wind: f32,
    pub color: String,
    pub speed: f32,
    pub timing: TimingBasis,
}

impl Default for SnowOptions {
    fn default() -> Self {
        Self {
            count: 150,
            intensity: 1.0,
            wind: 0.3,
            color: "rgba(255, 255, 255, 0.9)".into(),
            speed: 1.0,
            timing: TimingBasis::Tick,
        }
    }
}

/// Flowing layered light waves over a dark gradient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightWavesOptions {
    /// Hex colors.
    pub colors: Vec<String>,
    pub speed: f32,
    pub intensity: f32,
    pub wave_count: usize,
    pub timing: TimingBasis,
}

impl Default for LightWavesOptions {
    fn default() -> Self {
        Self {
            colors: vec![
                "#0ea5e9".into(),
                "#8b5cf6".into(),
                "#06b6d4".into(),
                "#a855f7".into(),
                "#0284c7".into(),
            ],
            speed: 1.0,
            intensity: 0.6,
            wave_count: 5,
            timing: TimingBasis::Elapsed,
        }
    }
}

/// Soft colored glows that follow the pointer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpotlightOptions {
    /// One spotlight per color.
    pub colors: Vec<String>,
    pub size: f32,
    pub blur: f32,
    /// Fraction of the remaining distance covered per tick.
    pub smoothing: f32,
    /// Drift on its own once the pointer has been idle.
    pub ambient: bool,
    pub ambient_delay_ms: u64,
    pub opacity: f32,
    pub timing: TimingBasis,
}

impl Default for SpotlightOptions {
    fn default() -> Self {
        Self {
            colors: vec!["rgba(120, 119, 198, 0.3)".into()],
            size: 400.0,
            blur: 80.0,
            smoothing: 0.1,
            ambient: true,
            ambient_delay_ms: 2000,
            opacity: 1.0,
            timing: TimingBasis::Tick,
        }
    }
}

/// Grid of cells that flash a random color under the pointer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoxesOptions {
    pub colors: Vec<String>,
    pub cell_width: f32,
    pub cell_height: f32,
    pub max_rows: usize,
    pub max_cols: usize,
    pub fade_ms: u64,
    pub timing: TimingBasis,
}

impl Default for BoxesOptions {
    fn default() -> Self {
        Self {
            colors: vec![
                "rgb(125 211 252)".into(),
                "rgb(249 168 212)".into(),
                "rgb(134 239 172)".into(),
                "rgb(253 224 71)".into(),
                "rgb(252 165 165)".into(),
                "rgb(216 180 254)".into(),
                "rgb(147 197 253)".into(),
                "rgb(165 180 252)".into(),
                "rgb(196 181 253)".into(),
            ],
            cell_width: 64.0,
            cell_height: 32.0,
            max_rows: 100,
            max_cols: 80,
            fade_ms: 2000,
            timing: TimingBasis::Elapsed,
        }
    }
}

/// A perspective wireframe of rolling waves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveGridOptions {
    /// Hex line color.
    pub color: String,
    /// Hex fill behind the grid.
    pub background: String,
    /// Spacing between grid lines in world units.
    pub grid_size: f32,
    pub wave_height: f32,
    pub wave_speed: f32,
    /// Grid rows receding from the viewer.
    pub rows: usize,
    pub timing: TimingBasis,
}

impl Default for WaveGridOptions {
    fn default() -> Self {
        Self {
            color: "#06b6d4".into(),
            background: "#030712".into(),
            grid_size: 14.0,
            wave_height: 8.0,
            wave_speed: 0.9,
            rows: 8,
            timing: TimingBasis::Tick,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effect_names() {
        assert_eq!(EffectConfig::Snow(SnowOptions::default()).name(), "snow");
        assert_eq!(
            EffectConfig::DotPattern(DotPatternOptions::default()).name(),
            "dot_pattern"
        );
    }

    #[test]
    fn test_defaults_match_documented_values() {
        let dots = DotPatternOptions::default();
        assert_eq!(dots.proximity, 120.0);
        assert_eq!(dots.gap, 24.0);
        assert_eq!(dots.timing, TimingBasis::Elapsed);

        let bokeh = BokehOptions::default();
        assert_eq!(bokeh.count, 25);
        assert_eq!(bokeh.colors.len(), 5);
        assert_eq!(bokeh.timing, TimingBasis::Tick);

        let grid = WaveGridOptions::default();
        assert_eq!(grid.rows, 8);
        assert_eq!(grid.grid_size, 14.0);
        assert_eq!(grid.timing, TimingBasis::Tick);
    }
}

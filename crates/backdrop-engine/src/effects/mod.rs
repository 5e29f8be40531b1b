//! The concrete effects.

pub mod bokeh;
pub mod boxes;
pub mod dots;
pub mod snow;
pub mod spotlight;
pub mod wave_grid;
pub mod waves;

use backdrop_core::EffectConfig;

use crate::effect::Effect;

pub use bokeh::Bokeh;
pub use boxes::Boxes;
pub use dots::DotPattern;
pub use snow::Snow;
pub use spotlight::Spotlight;
pub use wave_grid::WaveGrid;
pub use waves::LightWaves;

/// Instantiate the effect a configuration names.
pub fn create(config: &EffectConfig) -> Box<dyn Effect> {
    match config {
        EffectConfig::Bokeh(options) => Box::new(Bokeh::new(options)),
        EffectConfig::DotPattern(options) => Box::new(DotPattern::new(options)),
        EffectConfig::Snow(options) => Box::new(Snow::new(options)),
        EffectConfig::LightWaves(options) => Box::new(LightWaves::new(options)),
        EffectConfig::Spotlight(options) => Box::new(Spotlight::new(options)),
        EffectConfig::Boxes(options) => Box::new(Boxes::new(options)),
        EffectConfig::WaveGrid(options) => Box::new(WaveGrid::new(options)),
    }
}

#[cfg(test)]
mod tests {
    use backdrop_core::{
        BokehOptions, BoxesOptions, DotPatternOptions, LightWavesOptions, SnowOptions,
        SpotlightOptions, WaveGridOptions,
    };

    use super::*;

    #[test]
    fn test_create_matches_config_name() {
        let configs = [
            EffectConfig::Bokeh(BokehOptions::default()),
            EffectConfig::DotPattern(DotPatternOptions::default()),
            EffectConfig::Snow(SnowOptions::default()),
            EffectConfig::LightWaves(LightWavesOptions::default()),
            EffectConfig::Spotlight(SpotlightOptions::default()),
            EffectConfig::Boxes(BoxesOptions::default()),
            EffectConfig::WaveGrid(WaveGridOptions::default()),
        ];
        for config in &configs {
            let effect = create(config);
            assert_eq!(effect.name(), config.name());
            assert_eq!(effect.entity_count(), 0);
        }
    }
}

//! Core types shared by the backdrop crates.
//!
//! Colors, logical geometry, easing, frame timing, and the per-effect option structs
//! that make up the instantiation interface.

mod color;
mod ease;
mod geometry;
mod options;
mod timing;

pub use color::{Rgb, Rgba, parse_hex, substitute_alpha};
pub use ease::{Proximity, lerp, smoothstep};
pub use geometry::{PhysicalSize, Point, Rect, Size};
pub use options::{
    BokehOptions, BoxesOptions, DotPatternOptions, EffectConfig, LightWavesOptions, SnowOptions,
    SpotlightOptions, WaveGridOptions,
};
pub use timing::{FrameTime, MAX_STEP_TICKS, NOMINAL_FPS, TimingBasis};

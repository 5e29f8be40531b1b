//! Frame timing and the tick-versus-elapsed timing basis.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Nominal frame rate used to convert between ticks and seconds.
pub const NOMINAL_FPS: f32 = 60.0;

/// Largest motion step, in nominal ticks, applied for a single frame.
pub const MAX_STEP_TICKS: f32 = 4.0;

/// What drives an effect's motion and oscillation.
///
/// `Tick` counts frames, so the animation runs faster on a faster display.
/// `Elapsed` uses wall-clock time and is independent of the frame rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimingBasis {
    #[default]
    Tick,
    Elapsed,
}

/// Timing information handed to a single frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameTime {
    /// Frames run so far, including this one.
    pub tick: u64,
    /// Time since the session started.
    pub elapsed: Duration,
    /// Time since the previous frame.
    pub delta: Duration,
}

impl FrameTime {
    /// Animation clock in nominal ticks.
    pub fn clock(&self, basis: TimingBasis) -> f32 {
        match basis {
            TimingBasis::Tick => self.tick as f32,
            TimingBasis::Elapsed => self.elapsed.as_secs_f32() * NOMINAL_FPS,
        }
    }

    /// Animation clock in seconds.
    pub fn seconds(&self, basis: TimingBasis) -> f32 {
        match basis {
            TimingBasis::Tick => self.tick as f32 / NOMINAL_FPS,
            TimingBasis::Elapsed => self.elapsed.as_secs_f32(),
        }
    }

    /// Per-frame motion multiplier, in nominal ticks.
    pub fn step(&self, basis: TimingBasis) -> f32 {
        match basis {
            TimingBasis::Tick => 1.0,
            TimingBasis::Elapsed => (self.delta.as_secs_f32() * NOMINAL_FPS).min(MAX_STEP_TICKS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(tick: u64, elapsed_ms: u64, delta_ms: u64) -> FrameTime {
        FrameTime {
            tick,
            elapsed: Duration::from_millis(elapsed_ms),
            delta: Duration::from_millis(delta_ms),
        }
    }

    #[test]
    fn test_tick_basis_ignores_wall_clock() {
        let time = frame(30, 5_000, 250);
        assert_eq!(time.clock(TimingBasis::Tick), 30.0);
        assert_eq!(time.seconds(TimingBasis::Tick), 0.5);
        assert_eq!(time.step(TimingBasis::Tick), 1.0);
    }

    #[test]
    fn test_elapsed_basis_uses_wall_clock() {
        let time = frame(3, 1_000, 50);
        assert_eq!(time.clock(TimingBasis::Elapsed), 60.0);
        assert_eq!(time.seconds(TimingBasis::Elapsed), 1.0);
        assert!((time.step(TimingBasis::Elapsed) - 3.0).abs() < 1e-4);
    }

    #[test]
    fn test_elapsed_step_is_capped() {
        let time = frame(2, 10_000, 9_000);
        assert_eq!(time.step(TimingBasis::Elapsed), MAX_STEP_TICKS);
    }
}

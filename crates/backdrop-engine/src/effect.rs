//! The strategy interface every background effect implements.

use std::time::Duration;

use backdrop_core::{FrameTime, Point, Size};

use crate::host::ListenerKind;
use crate::interaction::InteractionTracker;
use crate::store::{ResizePolicy, Sampler};
use crate::surface::Surface;

/// Where a listener attaches, relative to the session's own region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenScope {
    Window,
    Region,
    Section,
}

/// One host subscription an effect needs while running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Listen {
    pub scope: ListenScope,
    pub kind: ListenerKind,
}

impl Listen {
    pub const WINDOW_RESIZE: Listen = Listen {
        scope: ListenScope::Window,
        kind: ListenerKind::Resize,
    };
    pub const REGION_RESIZE: Listen = Listen {
        scope: ListenScope::Region,
        kind: ListenerKind::Resize,
    };

    pub const fn section(kind: ListenerKind) -> Listen {
        Listen {
            scope: ListenScope::Section,
            kind,
        }
    }
}

/// Everything a step needs for one frame.
pub struct StepContext<'a> {
    /// Region size in logical pixels.
    pub bounds: Size,
    pub pointer: &'a InteractionTracker,
    pub time: FrameTime,
    /// Host time of this frame, comparable with [`InteractionTracker::moved_at`].
    pub now: Duration,
    pub sampler: &'a mut Sampler,
}

/// A pluggable store/step/render strategy driven by a session.
pub trait Effect {
    fn name(&self) -> &'static str;

    /// Host signals to subscribe to for the lifetime of the session.
    fn listens(&self) -> &'static [Listen];

    fn resize_policy(&self) -> ResizePolicy;

    /// (Re)create the entity batch for `bounds`.
    fn build(&mut self, bounds: Size, sampler: &mut Sampler);

    /// Advance every entity by one frame.
    fn step(&mut self, ctx: &mut StepContext<'_>);

    /// Paint the current state. Entities are drawn in store order.
    fn render(&self, surface: &mut Surface);

    /// React to a discrete pointer move at a region-local `point`.
    fn on_pointer(&mut self, _point: Point, _time: FrameTime, _sampler: &mut Sampler) {}

    fn entity_count(&self) -> usize;

    /// Per-entity glow in store order, for inspection. Zero for effects without one.
    fn glow(&self) -> Vec<f32> {
        vec![0.0; self.entity_count()]
    }
}

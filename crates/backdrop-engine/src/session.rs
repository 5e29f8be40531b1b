//! Effect lifecycle: one running background bound to one host region.

use std::time::Duration;

use backdrop_core::{EffectConfig, FrameTime, Point, Size};

use crate::effect::{Effect, ListenScope, StepContext};
use crate::effects;
use crate::host::{FrameHandle, Host, ListenerId, Signal, SessionId, Target};
use crate::interaction::InteractionTracker;
use crate::store::{ResizePolicy, Sampler};
use crate::surface::Surface;

/// Lifecycle state. `Stopped` is terminal: a stopped session is never restarted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Running,
    Stopped,
}

/// A live effect instance and everything it owns: surface, entities, listeners and
/// its pending frame callback.
pub struct Session {
    id: SessionId,
    region_id: String,
    effect: Option<Box<dyn Effect>>,
    state: SessionState,
    surface: Option<Surface>,
    tracker: InteractionTracker,
    sampler: Sampler,
    frame: Option<FrameHandle>,
    listeners: Vec<ListenerId>,
    tick: u64,
    started_at: Duration,
    last_frame_at: Duration,
    origin: Point,
    bounds: Size,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("region_id", &self.region_id)
            .field("effect", &self.effect.as_ref().map(|e| e.name()))
            .field("state", &self.state)
            .field("tick", &self.tick)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Bind an effect to `region_id`.
    ///
    /// A missing region yields an inert session: `start` and `stop` do nothing.
    pub fn new(
        id: SessionId,
        host: &Host,
        region_id: &str,
        config: &EffectConfig,
        sampler: Sampler,
    ) -> Self {
        let effect = match host.region(region_id) {
            Some(_) => Some(effects::create(config)),
            None => {
                tracing::warn!(region = region_id, effect = config.name(), "host region not found, effect is inert");
                None
            }
        };
        Self::with_effect(id, region_id, effect, sampler)
    }

    /// Bind an already constructed effect.
    pub fn with_effect(
        id: SessionId,
        region_id: &str,
        effect: Option<Box<dyn Effect>>,
        sampler: Sampler,
    ) -> Self {
        Self {
            id,
            region_id: region_id.to_string(),
            effect,
            state: SessionState::Idle,
            surface: None,
            tracker: InteractionTracker::new(),
            sampler,
            frame: None,
            listeners: Vec::new(),
            tick: 0,
            started_at: Duration::ZERO,
            last_frame_at: Duration::ZERO,
            origin: Point::default(),
            bounds: Size::default(),
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn region_id(&self) -> &str {
        &self.region_id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_inert(&self) -> bool {
        self.effect.is_none()
    }

    pub fn surface(&self) -> Option<&Surface> {
        self.surface.as_ref()
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn effect(&self) -> Option<&dyn Effect> {
        self.effect.as_deref()
    }

    pub fn pointer(&self) -> &InteractionTracker {
        &self.tracker
    }

    /// Acquire the surface, register listeners, build entities and request the first
    /// frame. Does nothing unless the session is idle and has an effect.
    pub fn start(&mut self, host: &mut Host) {
        if self.state != SessionState::Idle {
            return;
        }
        let (Some(effect), Some(region)) = (self.effect.as_mut(), host.region(&self.region_id))
        else {
            return;
        };

        let origin = region.rect.origin;
        let bounds = region.rect.size;
        let section = region.section.clone();
        let Some(surface) = Surface::acquire(bounds, host.dpr()) else {
            tracing::warn!(region = %self.region_id, "no drawing surface available, effect is inert");
            self.effect = None;
            self.state = SessionState::Stopped;
            return;
        };

        for listen in effect.listens() {
            let target = match listen.scope {
                ListenScope::Window => Target::Window,
                ListenScope::Region => Target::Region(self.region_id.clone()),
                ListenScope::Section => Target::Section(section.clone()),
            };
            self.listeners.push(host.listen(self.id, target, listen.kind));
        }

        effect.build(bounds, &mut self.sampler);
        self.surface = Some(surface);
        self.origin = origin;
        self.bounds = bounds;
        self.started_at = host.now();
        self.last_frame_at = host.now();
        self.frame = Some(host.request_frame(self.id));
        self.state = SessionState::Running;

        tracing::debug!(
            session = self.id.0,
            region = %self.region_id,
            effect = effect.name(),
            entities = effect.entity_count(),
            "session started"
        );
    }

    /// Run one frame: step, render, then request the next frame.
    ///
    /// A handle that is not this session's pending frame is ignored.
    pub fn on_frame(&mut self, handle: FrameHandle, host: &mut Host) {
        if self.state != SessionState::Running || self.frame != Some(handle) {
            return;
        }
        self.frame = None;
        let (Some(effect), Some(surface)) = (self.effect.as_mut(), self.surface.as_mut()) else {
            return;
        };

        let now = host.now();
        self.tick += 1;
        let time = FrameTime {
            tick: self.tick,
            elapsed: now.saturating_sub(self.started_at),
            delta: now.saturating_sub(self.last_frame_at),
        };
        self.last_frame_at = now;

        let mut ctx = StepContext {
            bounds: self.bounds,
            pointer: &self.tracker,
            time,
            now,
            sampler: &mut self.sampler,
        };
        effect.step(&mut ctx);
        effect.render(surface);

        self.frame = Some(host.request_frame(self.id));
    }

    /// Handle a host signal routed to this session.
    pub fn on_signal(&mut self, signal: Signal, host: &Host) {
        if self.state != SessionState::Running {
            return;
        }
        match signal {
            Signal::Resize => self.reconfigure(host),
            Signal::Move(client) => {
                self.tracker.on_move(client, self.origin, host.now());
                let time = self.frame_time(host.now());
                if let Some(effect) = self.effect.as_mut() {
                    effect.on_pointer(self.tracker.point(), time, &mut self.sampler);
                }
            }
            Signal::Leave => self.tracker.on_leave(),
        }
    }

    /// Cancel the pending frame, unregister every listener and release the surface.
    ///
    /// Safe to call repeatedly and before `start`.
    pub fn stop(&mut self, host: &mut Host) {
        if let Some(handle) = self.frame.take() {
            host.cancel_frame(handle);
        }
        for id in self.listeners.drain(..) {
            host.unlisten(id);
        }
        self.surface = None;

        if self.state != SessionState::Stopped {
            tracing::debug!(session = self.id.0, region = %self.region_id, ticks = self.tick, "session stopped");
        }
        self.state = SessionState::Stopped;
    }

    /// Re-measure the region; resize the surface and rebuild entities per policy.
    fn reconfigure(&mut self, host: &Host) {
        let (Some(effect), Some(surface)) = (self.effect.as_mut(), self.surface.as_mut()) else {
            return;
        };
        let Some(region) = host.region(&self.region_id) else {
            return;
        };

        let bounds = region.rect.size;
        self.origin = region.rect.origin;
        if bounds == self.bounds && surface.dpr() == host.dpr() {
            return;
        }

        let Some(physical) = surface.configure(bounds, host.dpr()) else {
            // Frames stop at the next callback; `stop` still releases the listeners.
            tracing::warn!(
                region = %self.region_id,
                width = bounds.width,
                height = bounds.height,
                "region too large for a drawing surface, effect is inert"
            );
            self.effect = None;
            self.surface = None;
            return;
        };
        self.bounds = bounds;
        if effect.resize_policy() == ResizePolicy::Rebuild {
            effect.build(bounds, &mut self.sampler);
        }
        tracing::trace!(
            region = %self.region_id,
            width = physical.width,
            height = physical.height,
            "surface reconfigured"
        );
    }

    fn frame_time(&self, now: Duration) -> FrameTime {
        FrameTime {
            tick: self.tick,
            elapsed: now.saturating_sub(self.started_at),
            delta: Duration::ZERO,
        }
    }
}

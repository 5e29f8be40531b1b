//! The host page: regions, the frame scheduler, and listener registration.
//!
//! Sessions never hold references into the host. They register listeners and request
//! frames by id, and the host hands back [`Delivery`] lists that the caller routes to
//! the owning sessions.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use backdrop_core::{Point, Rect};

/// Identifies a session within a host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SessionId(pub u32);

/// A pending frame callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameHandle(u64);

/// A registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(u64);

/// Monotonic time source for the frame loop.
#[derive(Debug, Clone, Copy)]
pub struct FrameClock {
    origin: Instant,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Frame callbacks requested by sessions, fired once per host frame.
#[derive(Debug, Default)]
pub struct FrameScheduler {
    next: u64,
    pending: BTreeMap<FrameHandle, SessionId>,
}

impl FrameScheduler {
    pub fn request(&mut self, owner: SessionId) -> FrameHandle {
        self.next += 1;
        let handle = FrameHandle(self.next);
        self.pending.insert(handle, owner);
        handle
    }

    /// Cancel a pending callback. Returns `false` when it already fired or was cancelled.
    pub fn cancel(&mut self, handle: FrameHandle) -> bool {
        self.pending.remove(&handle).is_some()
    }

    /// Take every callback pending at the start of this frame, in request order.
    ///
    /// Callbacks requested while these run wait for the next frame.
    pub fn take_due(&mut self) -> Vec<(FrameHandle, SessionId)> {
        std::mem::take(&mut self.pending).into_iter().collect()
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}

/// What a listener is attached to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// Global viewport signals.
    Window,
    /// A host region (for region-scoped resize observers).
    Region(String),
    /// A page section (the interaction surface around a region).
    Section(String),
}

/// The kind of host signal a listener wants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerKind {
    Resize,
    MouseMove,
    MouseLeave,
    TouchMove,
    PointerMove,
}

impl ListenerKind {
    fn accepts(self, pointer: PointerKind) -> bool {
        matches!(
            (self, pointer),
            (ListenerKind::PointerMove, _)
                | (ListenerKind::MouseMove, PointerKind::Mouse)
                | (ListenerKind::TouchMove, PointerKind::Touch)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listener {
    pub owner: SessionId,
    pub target: Target,
    pub kind: ListenerKind,
}

/// Registered listeners, keyed by id so removal pairs 1:1 with registration.
#[derive(Debug, Default)]
pub struct ListenerRegistry {
    next: u64,
    entries: BTreeMap<ListenerId, Listener>,
}

impl ListenerRegistry {
    pub fn register(&mut self, owner: SessionId, target: Target, kind: ListenerKind) -> ListenerId {
        self.next += 1;
        let id = ListenerId(self.next);
        self.entries.insert(id, Listener { owner, target, kind });
        id
    }

    pub fn unregister(&mut self, id: ListenerId) -> bool {
        self.entries.remove(&id).is_some()
    }

    pub fn count(&self) -> usize {
        self.entries.len()
    }

    pub fn count_for(&self, owner: SessionId) -> usize {
        self.entries.values().filter(|l| l.owner == owner).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Listener> {
        self.entries.values()
    }
}

/// Pointer source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Mouse,
    Touch,
}

/// A signal for one session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Signal {
    Resize,
    /// Pointer moved; coordinates are host (client) logical pixels.
    Move(Point),
    Leave,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Delivery {
    pub session: SessionId,
    pub signal: Signal,
}

/// A page section's box.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionBox {
    pub id: String,
    pub rect: Rect,
}

/// A host region's box and the section that contains it.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionBox {
    pub id: String,
    pub section: String,
    pub rect: Rect,
}

/// Boxes for every section and region on the page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageLayout {
    pub sections: Vec<SectionBox>,
    pub regions: Vec<RegionBox>,
}

/// The page that sessions attach to.
#[derive(Debug)]
pub struct Host {
    layout: PageLayout,
    dpr: f32,
    now: Duration,
    scheduler: FrameScheduler,
    listeners: ListenerRegistry,
    hovered: Option<String>,
}

impl Host {
    pub fn new(layout: PageLayout, dpr: f32) -> Self {
        Self {
            layout,
            dpr,
            now: Duration::ZERO,
            scheduler: FrameScheduler::default(),
            listeners: ListenerRegistry::default(),
            hovered: None,
        }
    }

    pub fn dpr(&self) -> f32 {
        self.dpr
    }

    /// Host time of the current frame.
    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn region(&self, id: &str) -> Option<&RegionBox> {
        self.layout.regions.iter().find(|r| r.id == id)
    }

    /// Advance host time and take the frame callbacks due now.
    pub fn begin_frame(&mut self, now: Duration) -> Vec<(FrameHandle, SessionId)> {
        self.now = self.now.max(now);
        self.scheduler.take_due()
    }

    pub fn request_frame(&mut self, owner: SessionId) -> FrameHandle {
        self.scheduler.request(owner)
    }

    pub fn cancel_frame(&mut self, handle: FrameHandle) -> bool {
        self.scheduler.cancel(handle)
    }

    pub fn listen(&mut self, owner: SessionId, target: Target, kind: ListenerKind) -> ListenerId {
        self.listeners.register(owner, target, kind)
    }

    pub fn unlisten(&mut self, id: ListenerId) -> bool {
        self.listeners.unregister(id)
    }

    pub fn scheduler(&self) -> &FrameScheduler {
        &self.scheduler
    }

    pub fn listeners(&self) -> &ListenerRegistry {
        &self.listeners
    }

    /// Replace the page layout, notifying resize listeners.
    ///
    /// Window listeners always fire; region observers fire only when their region's
    /// box changed, appeared, or disappeared.
    pub fn relayout(&mut self, layout: PageLayout) -> Vec<Delivery> {
        let changed: Vec<&str> = layout
            .regions
            .iter()
            .filter(|new| self.region(&new.id).map(|old| old.rect) != Some(new.rect))
            .map(|r| r.id.as_str())
            .chain(
                self.layout
                    .regions
                    .iter()
                    .filter(|old| !layout.regions.iter().any(|r| r.id == old.id))
                    .map(|r| r.id.as_str()),
            )
            .collect();

        let mut deliveries = Vec::new();
        for listener in self.listeners.iter() {
            if listener.kind != ListenerKind::Resize {
                continue;
            }
            let fire = match &listener.target {
                Target::Window => true,
                Target::Region(id) => changed.contains(&id.as_str()),
                Target::Section(_) => false,
            };
            if fire {
                push_unique(&mut deliveries, listener.owner, Signal::Resize);
            }
        }

        self.layout = layout;
        deliveries
    }

    /// Route a pointer move at host `client` coordinates.
    ///
    /// Moving out of a section delivers [`Signal::Leave`] to its mouse-leave listeners.
    pub fn pointer(&mut self, client: Point, kind: PointerKind) -> Vec<Delivery> {
        let hit = self
            .layout
            .sections
            .iter()
            .find(|s| s.rect.contains(client))
            .map(|s| s.id.clone());

        let mut deliveries = Vec::new();
        if self.hovered != hit {
            if let Some(left) = self.hovered.take() {
                self.push_leave(&left, &mut deliveries);
            }
            self.hovered = hit.clone();
        }

        for listener in self.listeners.iter() {
            if !listener.kind.accepts(kind) {
                continue;
            }
            let fire = match &listener.target {
                Target::Window => true,
                Target::Section(id) => hit.as_deref() == Some(id.as_str()),
                Target::Region(id) => self.region(id).is_some_and(|r| r.rect.contains(client)),
            };
            if fire {
                push_unique(&mut deliveries, listener.owner, Signal::Move(client));
            }
        }
        deliveries
    }

    /// The pointer left the whole page (for example, the terminal lost focus).
    pub fn leave_all(&mut self) -> Vec<Delivery> {
        let mut deliveries = Vec::new();
        if let Some(left) = self.hovered.take() {
            self.push_leave(&left, &mut deliveries);
        }
        deliveries
    }

    fn push_leave(&self, section: &str, deliveries: &mut Vec<Delivery>) {
        for listener in self.listeners.iter() {
            let on_section = matches!(&listener.target, Target::Section(id) if id == section);
            if listener.kind == ListenerKind::MouseLeave && on_section {
                push_unique(deliveries, listener.owner, Signal::Leave);
            }
        }
    }
}

fn push_unique(deliveries: &mut Vec<Delivery>, session: SessionId, signal: Signal) {
    let delivery = Delivery { session, signal };
    if !deliveries.contains(&delivery) {
        deliveries.push(delivery);
    }
}

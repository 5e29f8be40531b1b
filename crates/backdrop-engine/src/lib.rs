//! Animation engine for backdrop.
//!
//! Effects are driven by [`Session`]s against a [`Host`] that owns the page layout, the
//! frame scheduler and the listener registry. Each session paints into its own
//! [`Surface`], which [`SurfaceView`] flattens into terminal cells.

mod color;
mod effect;
pub mod effects;
mod gradient;
mod host;
mod interaction;
mod present;
mod session;
mod store;
mod surface;

pub use color::{Blend, Pixel};
pub use effect::{Effect, Listen, ListenScope, StepContext};
pub use gradient::{Gradient, Paint};
pub use host::{
    Delivery, FrameClock, FrameHandle, FrameScheduler, Host, Listener, ListenerId, ListenerKind,
    ListenerRegistry, PageLayout, PointerKind, RegionBox, SectionBox, SessionId, Signal, Target,
};
pub use interaction::InteractionTracker;
pub use present::{CELL_HEIGHT, CELL_WIDTH, SurfaceView};
pub use session::{Session, SessionState};
pub use store::{EntityBatch, ResizePolicy, Sampler};
pub use surface::{MAX_SURFACE_PIXELS, Surface};

//! kinetype animation system
//!
//! Easing curves, tween timelines and the scheduler that plays them.
//!
//! # Features
//!
//! - **Easing**: GSAP-style curves (`power2.out`, `elastic.out(1, 0.3)`,
//!   `back.out(1.7)`) parsed from strings
//! - **Timelines**: paused-at-birth, restart-from-zero tween sequences over a
//!   glyph transform
//! - **Scheduler**: a frame clock with cancellable delayed calls and
//!   per-frame tick callbacks, advanced by wall clock or explicit deltas

pub mod easing;
pub mod scheduler;
pub mod timeline;
pub mod values;

pub use easing::{EaseDirection, EaseParseError, Easing, BACK_OVERSHOOT};
pub use scheduler::{
    AnimationScheduler, DelayedCallId, DelayedCallback, SchedulerHandle, TickCallback,
    TickCallbackId, TimelineId,
};
pub use timeline::{PlayState, Timeline};
pub use values::{Interpolate, TweenProps};

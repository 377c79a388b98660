//! Animation scheduler
//!
//! The frame clock every animation runs on. It owns:
//! - timelines, addressed by [`TimelineId`]
//! - cancellable delayed calls, addressed by [`DelayedCallId`]
//! - per-frame tick callbacks, addressed by [`TickCallbackId`]
//!
//! The scheduler is single-threaded. Components hold a [`SchedulerHandle`]
//! (a weak reference), so dropping the scheduler turns every handle
//! operation into a no-op instead of keeping animation state alive.
//!
//! # Frame order
//!
//! Each [`AnimationScheduler::advance`] runs, in order:
//! 1. every playing timeline advances by `dt`
//! 2. delayed calls that became due fire, earliest first
//! 3. tick callbacks run (typically painting sampled values)
//!
//! No borrow of the scheduler is held while user callbacks run, so callbacks
//! may restart timelines or schedule further calls.

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Instant;

use kinetype_core::GlyphTransform;
use slotmap::{new_key_type, SlotMap};

use crate::timeline::Timeline;

new_key_type! {
    /// Handle to a registered timeline
    pub struct TimelineId;
    /// Handle to a pending delayed call
    pub struct DelayedCallId;
    /// Handle to a registered tick callback
    pub struct TickCallbackId;
}

/// One-shot callback fired by [`SchedulerHandle::delayed_call`]
pub type DelayedCallback = Box<dyn FnOnce()>;

/// Callback run after every frame with the frame's `dt` in milliseconds
pub type TickCallback = Rc<dyn Fn(f32)>;

/// Slack when comparing a delayed call's due time with the clock, so a call
/// scheduled for 120ms fires on a frame that lands on 120ms.
const DUE_EPSILON_MS: f64 = 1e-6;

struct DelayedCall {
    due_ms: f64,
    seq: u64,
    callback: DelayedCallback,
}

/// Internal state of the animation scheduler
struct SchedulerInner {
    timelines: SlotMap<TimelineId, Timeline>,
    delayed: SlotMap<DelayedCallId, DelayedCall>,
    tick_callbacks: SlotMap<TickCallbackId, TickCallback>,
    /// Clock time in milliseconds since the scheduler was created
    now_ms: f64,
    last_frame: Instant,
    frame: u64,
    next_seq: u64,
}

/// The scheduler that advances all timelines and delayed calls
///
/// Typically owned by the host's frame loop and shared with components via
/// [`SchedulerHandle`].
///
/// ```rust
/// use kinetype_animation::{AnimationScheduler, Easing, Timeline, TweenProps};
///
/// let scheduler = AnimationScheduler::new();
/// let handle = scheduler.handle();
///
/// let mut tl = Timeline::new();
/// tl.to(TweenProps::new().rotation(360.0), 500.0, Easing::Linear);
/// let id = handle.register_timeline(tl).unwrap();
///
/// handle.restart_timeline(id);
/// scheduler.advance(250.0);
/// assert_eq!(handle.timeline_value(id).unwrap().rotation, 180.0);
/// ```
pub struct AnimationScheduler {
    inner: Rc<RefCell<SchedulerInner>>,
}

impl AnimationScheduler {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(SchedulerInner {
                timelines: SlotMap::with_key(),
                delayed: SlotMap::with_key(),
                tick_callbacks: SlotMap::with_key(),
                now_ms: 0.0,
                last_frame: Instant::now(),
                frame: 0,
                next_seq: 0,
            })),
        }
    }

    /// Get a handle to this scheduler for passing to components
    pub fn handle(&self) -> SchedulerHandle {
        SchedulerHandle {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Advance by the wall-clock time elapsed since the previous frame.
    ///
    /// Returns true if any work is still pending.
    pub fn tick(&self) -> bool {
        let dt_ms = {
            let mut inner = self.inner.borrow_mut();
            let now = Instant::now();
            let dt = (now - inner.last_frame).as_secs_f32() * 1000.0;
            inner.last_frame = now;
            dt
        };
        self.advance(dt_ms)
    }

    /// Advance the clock by exactly `dt_ms` milliseconds.
    ///
    /// Returns true if any timeline is still playing or any delayed call is
    /// still pending.
    pub fn advance(&self, dt_ms: f32) -> bool {
        let dt_ms = dt_ms.max(0.0);

        let due = {
            let mut guard = self.inner.borrow_mut();
            let inner = &mut *guard;
            inner.now_ms += f64::from(dt_ms);
            inner.frame += 1;

            for (_, timeline) in inner.timelines.iter_mut() {
                timeline.tick(dt_ms);
            }

            let now = inner.now_ms;
            let mut ready: Vec<(f64, u64, DelayedCallId)> = inner
                .delayed
                .iter()
                .filter(|(_, call)| call.due_ms <= now + DUE_EPSILON_MS)
                .map(|(id, call)| (call.due_ms, call.seq, id))
                .collect();
            ready.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

            let fired: Vec<DelayedCallback> = ready
                .into_iter()
                .filter_map(|(_, _, id)| inner.delayed.remove(id))
                .map(|call| call.callback)
                .collect();
            fired
        };

        if !due.is_empty() {
            tracing::trace!("firing {} delayed call(s)", due.len());
        }
        for callback in due {
            callback();
        }

        let tick_callbacks: Vec<TickCallback> = self
            .inner
            .borrow()
            .tick_callbacks
            .values()
            .map(Rc::clone)
            .collect();
        for callback in &tick_callbacks {
            callback(dt_ms);
        }

        self.has_active_animations()
    }

    /// Check if any timeline is playing or any delayed call is pending
    pub fn has_active_animations(&self) -> bool {
        let inner = self.inner.borrow();
        !inner.delayed.is_empty() || inner.timelines.values().any(Timeline::is_playing)
    }

    /// Clock time in milliseconds
    pub fn now_ms(&self) -> f64 {
        self.inner.borrow().now_ms
    }

    /// Number of frames advanced so far
    pub fn frame(&self) -> u64 {
        self.inner.borrow().frame
    }

    /// Get the number of registered timelines
    pub fn timeline_count(&self) -> usize {
        self.inner.borrow().timelines.len()
    }

    /// Get the number of delayed calls that have not fired yet
    pub fn pending_call_count(&self) -> usize {
        self.inner.borrow().delayed.len()
    }

    /// Get the number of registered tick callbacks
    pub fn tick_callback_count(&self) -> usize {
        self.inner.borrow().tick_callbacks.len()
    }
}

impl Default for AnimationScheduler {
    fn default() -> Self {
        Self::new()
    }
}

/// A weak handle to the animation scheduler
///
/// This is passed to components that need to register animations.
/// It won't prevent the scheduler from being dropped.
#[derive(Clone)]
pub struct SchedulerHandle {
    inner: Weak<RefCell<SchedulerInner>>,
}

impl SchedulerHandle {
    /// Check if the scheduler is still alive
    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }

    /// Clock time in milliseconds, if the scheduler is alive
    pub fn now_ms(&self) -> Option<f64> {
        self.inner.upgrade().map(|inner| inner.borrow().now_ms)
    }

    // =========================================================================
    // Timeline Operations
    // =========================================================================

    /// Register a timeline and return its ID. The timeline keeps its current
    /// play state; freshly built timelines stay paused.
    pub fn register_timeline(&self, timeline: Timeline) -> Option<TimelineId> {
        self.inner
            .upgrade()
            .map(|inner| inner.borrow_mut().timelines.insert(timeline))
    }

    /// Restart a timeline from 0
    pub fn restart_timeline(&self, id: TimelineId) {
        self.with_timeline(id, Timeline::restart);
    }

    /// Kill a timeline so it never advances again
    pub fn kill_timeline(&self, id: TimelineId) {
        self.with_timeline(id, Timeline::kill);
    }

    /// Remove a timeline
    pub fn remove_timeline(&self, id: TimelineId) -> Option<Timeline> {
        self.inner
            .upgrade()
            .and_then(|inner| inner.borrow_mut().timelines.remove(id))
    }

    /// Check if timeline is playing
    pub fn is_timeline_playing(&self, id: TimelineId) -> bool {
        self.with_timeline(id, |timeline| timeline.is_playing())
            .unwrap_or(false)
    }

    /// Current sampled transform of a timeline
    pub fn timeline_value(&self, id: TimelineId) -> Option<GlyphTransform> {
        self.with_timeline(id, |timeline| timeline.value())
    }

    /// Access a timeline mutably.
    ///
    /// Returns None if the scheduler is dropped or the timeline doesn't exist.
    pub fn with_timeline<F, R>(&self, id: TimelineId, f: F) -> Option<R>
    where
        F: FnOnce(&mut Timeline) -> R,
    {
        self.inner
            .upgrade()
            .and_then(|inner| inner.borrow_mut().timelines.get_mut(id).map(f))
    }

    // =========================================================================
    // Delayed Calls
    // =========================================================================

    /// Run `callback` once after `delay_ms` of clock time
    pub fn delayed_call<F>(&self, delay_ms: f32, callback: F) -> Option<DelayedCallId>
    where
        F: FnOnce() + 'static,
    {
        self.inner.upgrade().map(|inner| {
            let mut inner = inner.borrow_mut();
            let seq = inner.next_seq;
            inner.next_seq += 1;
            let due_ms = inner.now_ms + f64::from(delay_ms.max(0.0));
            inner.delayed.insert(DelayedCall {
                due_ms,
                seq,
                callback: Box::new(callback),
            })
        })
    }

    /// Cancel a pending delayed call. Returns false if it already fired or
    /// was cancelled.
    pub fn cancel_delayed_call(&self, id: DelayedCallId) -> bool {
        self.inner
            .upgrade()
            .is_some_and(|inner| inner.borrow_mut().delayed.remove(id).is_some())
    }

    /// Check if a delayed call has yet to fire
    pub fn is_call_pending(&self, id: DelayedCallId) -> bool {
        self.inner
            .upgrade()
            .is_some_and(|inner| inner.borrow().delayed.contains_key(id))
    }

    // =========================================================================
    // Tick Callbacks
    // =========================================================================

    /// Run `callback` after every frame
    pub fn add_tick_callback<F>(&self, callback: F) -> Option<TickCallbackId>
    where
        F: Fn(f32) + 'static,
    {
        self.inner
            .upgrade()
            .map(|inner| inner.borrow_mut().tick_callbacks.insert(Rc::new(callback)))
    }

    /// Remove a tick callback
    pub fn remove_tick_callback(&self, id: TickCallbackId) -> bool {
        self.inner.upgrade().is_some_and(|inner| {
            inner.borrow_mut().tick_callbacks.remove(id).is_some()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::easing::Easing;
    use crate::values::TweenProps;
    use std::cell::Cell;

    fn linear_rotation(duration_ms: f32) -> Timeline {
        let mut tl = Timeline::new();
        tl.to(TweenProps::new().rotation(360.0), duration_ms, Easing::Linear);
        tl
    }

    #[test]
    fn test_registered_timeline_stays_paused() {
        let scheduler = AnimationScheduler::new();
        let handle = scheduler.handle();
        let id = handle.register_timeline(linear_rotation(100.0)).unwrap();

        assert!(!scheduler.advance(50.0));
        assert_eq!(handle.timeline_value(id), Some(GlyphTransform::IDENTITY));
    }

    #[test]
    fn test_advance_moves_playing_timelines() {
        let scheduler = AnimationScheduler::new();
        let handle = scheduler.handle();
        let id = handle.register_timeline(linear_rotation(100.0)).unwrap();

        handle.restart_timeline(id);
        assert!(scheduler.advance(25.0));
        assert_eq!(handle.timeline_value(id).unwrap().rotation, 90.0);
        assert!(!scheduler.advance(100.0));
        assert!(!handle.is_timeline_playing(id));
    }

    #[test]
    fn test_delayed_call_fires_once_at_due_time() {
        let scheduler = AnimationScheduler::new();
        let handle = scheduler.handle();
        let fired = Rc::new(Cell::new(0));

        let f = Rc::clone(&fired);
        let id = handle
            .delayed_call(120.0, move || f.set(f.get() + 1))
            .unwrap();

        scheduler.advance(100.0);
        assert_eq!(fired.get(), 0);
        assert!(handle.is_call_pending(id));

        scheduler.advance(20.0);
        assert_eq!(fired.get(), 1);
        assert!(!handle.is_call_pending(id));

        scheduler.advance(200.0);
        assert_eq!(fired.get(), 1);
    }

    #[test]
    fn test_cancelled_call_never_fires() {
        let scheduler = AnimationScheduler::new();
        let handle = scheduler.handle();
        let fired = Rc::new(Cell::new(false));

        let f = Rc::clone(&fired);
        let id = handle.delayed_call(10.0, move || f.set(true)).unwrap();
        assert!(handle.cancel_delayed_call(id));
        assert!(!handle.cancel_delayed_call(id));

        scheduler.advance(50.0);
        assert!(!fired.get());
        assert_eq!(scheduler.pending_call_count(), 0);
    }

    #[test]
    fn test_delayed_calls_fire_in_due_order() {
        let scheduler = AnimationScheduler::new();
        let handle = scheduler.handle();
        let order = Rc::new(RefCell::new(Vec::new()));

        for (delay, tag) in [(30.0, "late"), (10.0, "early"), (10.0, "early-second")] {
            let o = Rc::clone(&order);
            handle.delayed_call(delay, move || o.borrow_mut().push(tag));
        }

        scheduler.advance(50.0);
        assert_eq!(*order.borrow(), vec!["early", "early-second", "late"]);
    }

    #[test]
    fn test_callback_may_use_scheduler() {
        let scheduler = AnimationScheduler::new();
        let handle = scheduler.handle();
        let id = handle.register_timeline(linear_rotation(100.0)).unwrap();

        let h = handle.clone();
        handle.delayed_call(10.0, move || h.restart_timeline(id));
        scheduler.advance(10.0);

        assert!(handle.is_timeline_playing(id));
        assert_eq!(handle.timeline_value(id).unwrap().rotation, 0.0);
    }

    #[test]
    fn test_tick_callbacks_run_after_timelines() {
        let scheduler = AnimationScheduler::new();
        let handle = scheduler.handle();
        let id = handle.register_timeline(linear_rotation(100.0)).unwrap();
        handle.restart_timeline(id);

        let seen = Rc::new(Cell::new(0.0));
        let s = Rc::clone(&seen);
        let h = handle.clone();
        let cb = handle
            .add_tick_callback(move |_| s.set(h.timeline_value(id).unwrap().rotation))
            .unwrap();

        scheduler.advance(50.0);
        assert_eq!(seen.get(), 180.0);

        assert!(handle.remove_tick_callback(cb));
        scheduler.advance(25.0);
        assert_eq!(seen.get(), 180.0);
        assert_eq!(scheduler.tick_callback_count(), 0);
    }

    #[test]
    fn test_handle_weak_reference() {
        let handle = {
            let scheduler = AnimationScheduler::new();
            scheduler.handle()
        };

        // Scheduler is dropped, handle should not be alive
        assert!(!handle.is_alive());

        // Operations should safely no-op
        assert!(handle.register_timeline(Timeline::new()).is_none());
        assert!(handle.delayed_call(0.0, || {}).is_none());
    }

    #[test]
    fn test_scheduler_counts() {
        let scheduler = AnimationScheduler::new();
        let handle = scheduler.handle();

        assert_eq!(scheduler.timeline_count(), 0);
        assert_eq!(scheduler.pending_call_count(), 0);

        let id = handle.register_timeline(Timeline::new()).unwrap();
        handle.delayed_call(5.0, || {});
        assert_eq!(scheduler.timeline_count(), 1);
        assert_eq!(scheduler.pending_call_count(), 1);

        assert!(handle.remove_timeline(id).is_some());
        assert_eq!(scheduler.timeline_count(), 0);
    }
}

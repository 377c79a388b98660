//! Interaction router
//!
//! Maps pointer events on character spans to timeline restarts and
//! transient styling.
//!
//! # Event flow
//!
//! ```text
//! pointer-enter(i)
//!     ↓ restart timeline i, paint hovered style on i
//!     ↓ adjacent_stagger > 0?
//! delayed_call(stagger) per existing neighbour
//!     ↓ fires on a later frame
//! restart neighbour timeline, paint hovered style on neighbour
//!
//! pointer-leave(i)
//!     ↓ paint baseline style on i (and neighbours when propagating)
//!     ↓ timelines keep playing
//! ```
//!
//! The router holds only weak references to the document and the scheduler.
//! Listeners and delayed calls hold weak references to the router, so once
//! its owner drops it nothing it registered can act again.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use kinetype_animation::{DelayedCallId, SchedulerHandle};
use kinetype_core::{event_types, Document, ListenerId, SharedDocument};
use smallvec::SmallVec;

use crate::config::HeadingConfig;
use crate::registry::CharacterUnit;
use crate::style::{apply_transient, TransientStyle};

/// Indices adjacent to `index` in a row of `len` units. Boundaries are
/// skipped, so the result has zero, one or two entries.
pub fn neighbours(index: usize, len: usize) -> SmallVec<[usize; 2]> {
    let mut out = SmallVec::new();
    if index >= len {
        return out;
    }
    if index > 0 {
        out.push(index - 1);
    }
    if index + 1 < len {
        out.push(index + 1);
    }
    out
}

/// Routes pointer events for one mounted heading
pub struct InteractionRouter {
    doc: Weak<RefCell<Document>>,
    scheduler: SchedulerHandle,
    config: HeadingConfig,
    units: RefCell<Vec<CharacterUnit>>,
    /// Propagation calls that may not have fired yet
    pending: RefCell<Vec<DelayedCallId>>,
    active: Cell<bool>,
}

impl InteractionRouter {
    pub fn new(
        doc: &SharedDocument,
        scheduler: SchedulerHandle,
        config: HeadingConfig,
        units: Vec<CharacterUnit>,
    ) -> Rc<Self> {
        Rc::new(Self {
            doc: Rc::downgrade(doc),
            scheduler,
            config,
            units: RefCell::new(units),
            pending: RefCell::new(Vec::new()),
            active: Cell::new(true),
        })
    }

    /// Attach enter/leave listeners to every unit's span.
    ///
    /// Returns the listener handles; the caller owns their disposal.
    pub fn bind(self: &Rc<Self>) -> Vec<ListenerId> {
        let Some(shared) = self.doc.upgrade() else {
            return Vec::new();
        };
        let mut doc = shared.borrow_mut();
        let targets: Vec<_> = self.units.borrow().iter().map(|u| (u.index, u.node)).collect();

        let mut listeners = Vec::with_capacity(targets.len() * 2);
        for (index, node) in targets {
            let router = Rc::downgrade(self);
            listeners.extend(doc.add_listener(node, event_types::POINTER_ENTER, move |_| {
                if let Some(router) = router.upgrade() {
                    router.pointer_enter(index);
                }
            }));

            let router = Rc::downgrade(self);
            listeners.extend(doc.add_listener(node, event_types::POINTER_LEAVE, move |_| {
                if let Some(router) = router.upgrade() {
                    router.pointer_leave(index);
                }
            }));
        }
        listeners
    }

    pub fn config(&self) -> &HeadingConfig {
        &self.config
    }

    pub fn is_active(&self) -> bool {
        self.active.get()
    }

    pub fn len(&self) -> usize {
        self.units.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.borrow().is_empty()
    }

    pub fn unit(&self, index: usize) -> Option<CharacterUnit> {
        self.units.borrow().get(index).copied()
    }

    pub fn units(&self) -> Vec<CharacterUnit> {
        self.units.borrow().clone()
    }

    // =========================================================================
    // Pointer events
    // =========================================================================

    /// Pointer entered unit `index`
    pub fn pointer_enter(self: &Rc<Self>, index: usize) {
        if !self.active.get() {
            return;
        }
        tracing::trace!("pointer enter on unit {}", index);

        self.trigger(index);

        if self.config.propagates() {
            let len = self.len();
            for neighbour in neighbours(index, len) {
                self.propagate_to(neighbour);
            }
        }
    }

    /// Pointer left unit `index`. Styles revert; timelines keep playing.
    pub fn pointer_leave(&self, index: usize) {
        if !self.active.get() {
            return;
        }
        tracing::trace!("pointer leave on unit {}", index);

        let baseline = TransientStyle::baseline();
        self.set_transient(index, baseline);
        if self.config.propagates() {
            for neighbour in neighbours(index, self.len()) {
                self.set_transient(neighbour, baseline);
            }
        }
    }

    /// Restart unit `index` and paint it hovered
    fn trigger(&self, index: usize) {
        let Some(unit) = self.unit(index) else {
            return;
        };
        self.scheduler.restart_timeline(unit.timeline);
        self.set_transient(index, TransientStyle::hovered(&self.config));
    }

    fn propagate_to(self: &Rc<Self>, neighbour: usize) {
        let router = Rc::downgrade(self);
        let id = self.scheduler.delayed_call(self.config.stagger_ms(), move || {
            if let Some(router) = router.upgrade() {
                if router.active.get() {
                    tracing::trace!("propagated hover reached unit {}", neighbour);
                    router.trigger(neighbour);
                }
            }
        });

        if let Some(id) = id {
            let mut pending = self.pending.borrow_mut();
            pending.retain(|id| self.scheduler.is_call_pending(*id));
            pending.push(id);
        }
    }

    /// Record and paint a transient style on one unit
    pub fn set_transient(&self, index: usize, style: TransientStyle) {
        let node = {
            let mut units = self.units.borrow_mut();
            let Some(unit) = units.get_mut(index) else {
                return;
            };
            unit.transient = style;
            unit.node
        };

        let Some(shared) = self.doc.upgrade() else {
            return;
        };
        let Ok(mut doc) = shared.try_borrow_mut() else {
            tracing::warn!("document busy, skipping style update for unit {}", index);
            return;
        };
        apply_transient(&mut doc, node, &style, &self.config);
    }

    // =========================================================================
    // Frame hook
    // =========================================================================

    /// Write every unit's sampled transform into its span's inline style
    pub fn paint_frame(&self) {
        if !self.active.get() {
            return;
        }
        let Some(shared) = self.doc.upgrade() else {
            return;
        };
        let Ok(mut doc) = shared.try_borrow_mut() else {
            tracing::warn!("document busy, skipping frame paint");
            return;
        };

        for unit in self.units.borrow().iter() {
            let Some(value) = self.scheduler.timeline_value(unit.timeline) else {
                continue;
            };
            let css = value.to_css();
            if doc.style(unit.node, "transform") != Some(css.as_str()) {
                doc.set_style(unit.node, "transform", &css);
            }
        }
    }

    // =========================================================================
    // Teardown
    // =========================================================================

    /// Stop reacting to events, frames and already scheduled propagation
    pub fn deactivate(&self) {
        self.active.set(false);
    }

    /// Cancel every propagation call that has not fired. Returns how many
    /// were cancelled.
    pub fn cancel_pending(&self) -> usize {
        self.pending
            .borrow_mut()
            .drain(..)
            .filter(|id| self.scheduler.cancel_delayed_call(*id))
            .count()
    }

    /// Number of propagation calls still waiting to fire
    pub fn pending_propagations(&self) -> usize {
        self.pending
            .borrow()
            .iter()
            .filter(|id| self.scheduler.is_call_pending(**id))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kinetype_animation::AnimationScheduler;
    use kinetype_core::Color;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::registry::register_units;
    use crate::segment::segment_element;

    fn setup(
        text: &str,
        config: HeadingConfig,
    ) -> (SharedDocument, AnimationScheduler, Rc<InteractionRouter>) {
        let doc = Document::new().into_shared();
        let scheduler = AnimationScheduler::new();
        let root = doc.borrow_mut().create_element("h1");
        let segments = segment_element(&mut doc.borrow_mut(), root, text);
        let units = register_units(
            &segments,
            &config,
            &scheduler.handle(),
            &mut StdRng::seed_from_u64(3),
        )
        .unwrap();
        let router = InteractionRouter::new(&doc, scheduler.handle(), config, units);
        (doc, scheduler, router)
    }

    fn playing(scheduler: &AnimationScheduler, router: &InteractionRouter) -> Vec<bool> {
        let handle = scheduler.handle();
        router
            .units()
            .iter()
            .map(|u| handle.is_timeline_playing(u.timeline))
            .collect()
    }

    #[test]
    fn test_neighbours_skip_boundaries() {
        assert!(neighbours(0, 1).is_empty());
        assert_eq!(neighbours(0, 3).as_slice(), &[1]);
        assert_eq!(neighbours(1, 3).as_slice(), &[0, 2]);
        assert_eq!(neighbours(2, 3).as_slice(), &[1]);
        assert!(neighbours(5, 3).is_empty());
        assert!(neighbours(0, 0).is_empty());
    }

    #[test]
    fn test_enter_restarts_unit_then_neighbours_after_stagger() {
        let config = HeadingConfig::default().with_adjacent_stagger(0.05);
        let (_doc, scheduler, router) = setup("abcde", config);

        router.pointer_enter(2);
        assert_eq!(playing(&scheduler, &router), [false, false, true, false, false]);
        assert_eq!(router.pending_propagations(), 2);

        scheduler.advance(49.0);
        assert_eq!(playing(&scheduler, &router), [false, false, true, false, false]);

        scheduler.advance(1.0);
        assert_eq!(playing(&scheduler, &router), [false, true, true, true, false]);
        assert_eq!(router.pending_propagations(), 0);
    }

    #[test]
    fn test_boundary_enter_schedules_one_call() {
        let (_doc, scheduler, router) = setup("abc", HeadingConfig::default());

        router.pointer_enter(0);
        assert_eq!(scheduler.pending_call_count(), 1);
        router.pointer_enter(2);
        assert_eq!(scheduler.pending_call_count(), 2);

        let (_doc, scheduler, router) = setup("a", HeadingConfig::default());
        router.pointer_enter(0);
        assert_eq!(scheduler.pending_call_count(), 0);
    }

    #[test]
    fn test_overlapping_propagations_each_restart_neighbour() {
        let config = HeadingConfig::default().with_adjacent_stagger(0.05);
        let (_doc, scheduler, router) = setup("abc", config);
        let middle = router.unit(1).unwrap().timeline;
        let state = || {
            scheduler
                .handle()
                .with_timeline(middle, |tl| (tl.playhead_ms(), tl.plays()))
        };

        router.pointer_enter(0);
        scheduler.advance(30.0);
        router.pointer_enter(2);
        assert_eq!(router.pending_propagations(), 2);

        // First call, scheduled from unit 0
        scheduler.advance(20.0);
        assert_eq!(state(), Some((0.0, 1)));

        // Second call, scheduled from unit 2, restarts it again
        scheduler.advance(30.0);
        assert_eq!(state(), Some((0.0, 2)));
        assert_eq!(router.pending_propagations(), 0);
    }

    #[test]
    fn test_zero_stagger_does_not_propagate() {
        let config = HeadingConfig::default().with_adjacent_stagger(0.0);
        let (_doc, scheduler, router) = setup("abc", config);

        router.pointer_enter(1);
        scheduler.advance(16.0);
        assert_eq!(scheduler.pending_call_count(), 0);
        assert_eq!(playing(&scheduler, &router), [false, true, false]);
    }

    #[test]
    fn test_leave_reverts_style_but_keeps_timeline_playing() {
        let config = HeadingConfig::default()
            .with_hover_color(Some(Color::from_hex(0x88CE02)))
            .with_glow(true);
        let (doc, scheduler, router) = setup("abc", config);
        let node = router.unit(1).unwrap().node;

        router.pointer_enter(1);
        scheduler.advance(100.0);
        assert_eq!(doc.borrow().style(node, "color"), Some("#88ce02"));
        assert!(doc.borrow().style(node, "text-shadow").is_some());

        router.pointer_leave(1);
        assert_eq!(doc.borrow().style(node, "color"), Some("#ffffff"));
        assert_eq!(doc.borrow().style(node, "text-shadow"), None);
        assert!(router.unit(1).unwrap().transient.is_baseline());

        let timeline = router.unit(1).unwrap().timeline;
        assert!(scheduler.handle().is_timeline_playing(timeline));
        scheduler.advance(100.0);
        assert_eq!(
            scheduler.handle().with_timeline(timeline, |tl| tl.playhead_ms()),
            Some(200.0)
        );
    }

    #[test]
    fn test_leave_reverts_neighbours_when_propagating() {
        let config = HeadingConfig::default().with_hover_color(Some(Color::RED));
        let (doc, scheduler, router) = setup("abc", config);
        let nodes: Vec<_> = router.units().iter().map(|u| u.node).collect();

        router.pointer_enter(1);
        scheduler.advance(50.0);
        assert!(nodes
            .iter()
            .all(|n| doc.borrow().style(*n, "color") == Some("#ff0000")));

        router.pointer_leave(1);
        assert!(nodes
            .iter()
            .all(|n| doc.borrow().style(*n, "color") == Some("#ffffff")));
    }

    #[test]
    fn test_repeated_enter_restarts_from_zero() {
        let (_doc, scheduler, router) = setup("a", HeadingConfig::default());
        let timeline = router.unit(0).unwrap().timeline;
        let handle = scheduler.handle();

        router.pointer_enter(0);
        scheduler.advance(300.0);
        router.pointer_enter(0);
        assert_eq!(handle.with_timeline(timeline, |tl| tl.playhead_ms()), Some(0.0));

        // Completion is measured from the latest trigger
        scheduler.advance(499.0);
        assert!(handle.is_timeline_playing(timeline));
        scheduler.advance(1.0);
        assert!(!handle.is_timeline_playing(timeline));
    }

    #[test]
    fn test_paint_frame_writes_transforms() {
        let (doc, scheduler, router) = setup("ab", HeadingConfig::default());
        let node = router.unit(0).unwrap().node;

        router.pointer_enter(0);
        scheduler.advance(100.0);
        router.paint_frame();

        let transform = doc.borrow().style(node, "transform").map(str::to_string);
        assert!(transform.unwrap().starts_with("translateY(-"));
    }

    #[test]
    fn test_listeners_route_dispatched_events() {
        let (doc, scheduler, router) = setup("ab", HeadingConfig::default());
        let listeners = router.bind();
        assert_eq!(listeners.len(), 4);

        let unit = router.unit(1).unwrap();
        assert_eq!(Document::dispatch(&doc, unit.node, event_types::POINTER_ENTER), 1);
        assert!(scheduler.handle().is_timeline_playing(unit.timeline));
    }

    #[test]
    fn test_deactivated_router_ignores_everything() {
        let (_doc, scheduler, router) = setup("abc", HeadingConfig::default());

        router.pointer_enter(1);
        router.deactivate();
        assert_eq!(router.cancel_pending(), 2);

        router.pointer_enter(0);
        scheduler.advance(100.0);
        let handle = scheduler.handle();
        let units = router.units();
        assert!(!handle.is_timeline_playing(units[0].timeline));
        assert!(!handle.is_timeline_playing(units[2].timeline));
    }
}

//! Heading lifecycle
//!
//! [`HeadingInstance`] owns everything one animated heading registers:
//! per-character timelines, pointer listeners, pending propagation calls and
//! the per-frame paint hook. Each is tracked by its handle and disposed of
//! explicitly on teardown.
//!
//! ```rust
//! use kinetype_animation::AnimationScheduler;
//! use kinetype_core::{event_types, Document};
//! use kinetype_heading::{HeadingConfig, HeadingInstance, Preset};
//!
//! let doc = Document::new().into_shared();
//! let h1 = doc.borrow_mut().create_text_element("h1", "Hi");
//! let scheduler = AnimationScheduler::new();
//!
//! let mut heading = HeadingInstance::mount(
//!     &doc,
//!     Some(h1),
//!     HeadingConfig::preset(Preset::Playful),
//!     &scheduler.handle(),
//! )
//! .unwrap();
//!
//! let first = heading.node_of(0).unwrap();
//! Document::dispatch(&doc, first, event_types::POINTER_ENTER);
//! scheduler.advance(16.0);
//!
//! heading.teardown();
//! assert_eq!(scheduler.timeline_count(), 0);
//! ```

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use kinetype_animation::{SchedulerHandle, TickCallbackId};
use kinetype_core::{Document, ListenerId, NodeId, SharedDocument};
use rand::Rng;

use crate::config::HeadingConfig;
use crate::registry::{register_units, CharacterUnit};
use crate::router::InteractionRouter;
use crate::segment::segment_element;

/// Resources registered by one build of the heading
struct Mounted {
    router: Rc<InteractionRouter>,
    listeners: Vec<ListenerId>,
    paint_hook: Option<TickCallbackId>,
}

/// A heading whose characters animate on hover
pub struct HeadingInstance {
    doc: Weak<RefCell<Document>>,
    root: NodeId,
    scheduler: SchedulerHandle,
    /// Text captured at the first mount; rebuilds reuse it
    raw_text: String,
    config: HeadingConfig,
    mounted: Option<Mounted>,
}

impl HeadingInstance {
    /// Mount on `root`.
    ///
    /// Returns `None` without touching anything when there is no attachment
    /// point, it is not in the document, or the scheduler is gone.
    pub fn mount(
        doc: &SharedDocument,
        root: Option<NodeId>,
        config: HeadingConfig,
        scheduler: &SchedulerHandle,
    ) -> Option<Self> {
        Self::mount_with_rng(doc, root, config, scheduler, &mut rand::rng())
    }

    /// Mount with an explicit random source for the `random` family
    pub fn mount_with_rng<R>(
        doc: &SharedDocument,
        root: Option<NodeId>,
        config: HeadingConfig,
        scheduler: &SchedulerHandle,
        rng: &mut R,
    ) -> Option<Self>
    where
        R: Rng + ?Sized,
    {
        let Some(root) = root else {
            tracing::debug!("heading mount skipped: no attachment point");
            return None;
        };
        if !doc.borrow().contains(root) {
            tracing::debug!("heading mount skipped: {:?} is not in the document", root);
            return None;
        }
        if !scheduler.is_alive() {
            tracing::debug!("heading mount skipped: scheduler dropped");
            return None;
        }
        if let Err(err) = config.validate() {
            tracing::warn!("mounting heading with questionable config: {}", err);
        }

        let raw_text = doc.borrow().text_content(root);
        let mut instance = Self {
            doc: Rc::downgrade(doc),
            root,
            scheduler: scheduler.clone(),
            raw_text,
            config,
            mounted: None,
        };
        instance.build(doc, rng);
        Some(instance)
    }

    fn build<R>(&mut self, doc: &SharedDocument, rng: &mut R) -> bool
    where
        R: Rng + ?Sized,
    {
        let segments = segment_element(&mut doc.borrow_mut(), self.root, &self.raw_text);
        let Some(units) = register_units(&segments, &self.config, &self.scheduler, rng) else {
            tracing::debug!("heading build skipped: scheduler dropped");
            return false;
        };

        let router = InteractionRouter::new(doc, self.scheduler.clone(), self.config.clone(), units);
        let listeners = router.bind();

        let painter = Rc::downgrade(&router);
        let paint_hook = self.scheduler.add_tick_callback(move |_| {
            if let Some(router) = painter.upgrade() {
                router.paint_frame();
            }
        });

        tracing::debug!(
            "mounted heading {:?}: {} unit(s), {} listener(s)",
            self.root,
            router.len(),
            listeners.len()
        );

        self.mounted = Some(Mounted {
            router,
            listeners,
            paint_hook,
        });
        true
    }

    /// Dispose of every timeline, listener, pending call and the paint hook.
    ///
    /// Inline style already painted (a glow, a mid-flight transform) stays as
    /// it is. Calling teardown twice is harmless.
    pub fn teardown(&mut self) {
        let Some(mounted) = self.mounted.take() else {
            return;
        };
        let router = mounted.router;
        router.deactivate();
        let cancelled = router.cancel_pending();

        let units = router.units();
        for unit in &units {
            self.scheduler.kill_timeline(unit.timeline);
            self.scheduler.remove_timeline(unit.timeline);
        }

        if let Some(id) = mounted.paint_hook {
            self.scheduler.remove_tick_callback(id);
        }

        if let Some(shared) = self.doc.upgrade() {
            match shared.try_borrow_mut() {
                Ok(mut doc) => {
                    for id in &mounted.listeners {
                        doc.remove_listener(*id);
                    }
                }
                // The router is already inactive, so stale listeners are inert
                Err(_) => tracing::warn!(
                    "document busy, leaving {} inactive listener(s) on {:?}",
                    mounted.listeners.len(),
                    self.root
                ),
            }
        }

        tracing::debug!(
            "tore down heading {:?}: {} timeline(s), {} listener(s), {} pending call(s)",
            self.root,
            units.len(),
            mounted.listeners.len(),
            cancelled
        );
    }

    /// Tear down and rebuild with a new configuration
    pub fn reconfigure(&mut self, config: HeadingConfig) -> bool {
        self.reconfigure_with_rng(config, &mut rand::rng())
    }

    /// Tear down and rebuild from the captured text. Returns false if the
    /// document or the scheduler is gone, leaving the instance torn down.
    pub fn reconfigure_with_rng<R>(&mut self, config: HeadingConfig, rng: &mut R) -> bool
    where
        R: Rng + ?Sized,
    {
        self.teardown();
        self.config = config;

        let Some(doc) = self.doc.upgrade() else {
            tracing::debug!("heading rebuild skipped: document dropped");
            return false;
        };
        if !doc.borrow().contains(self.root) || !self.scheduler.is_alive() {
            tracing::debug!("heading rebuild skipped: attachment point or scheduler gone");
            return false;
        }
        self.build(&doc, rng)
    }

    pub fn is_torn_down(&self) -> bool {
        self.mounted.is_none()
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    pub fn config(&self) -> &HeadingConfig {
        &self.config
    }

    /// Units in reading order; empty once torn down
    pub fn units(&self) -> Vec<CharacterUnit> {
        self.mounted
            .as_ref()
            .map(|m| m.router.units())
            .unwrap_or_default()
    }

    pub fn unit(&self, index: usize) -> Option<CharacterUnit> {
        self.mounted.as_ref().and_then(|m| m.router.unit(index))
    }

    pub fn node_of(&self, index: usize) -> Option<NodeId> {
        self.unit(index).map(|u| u.node)
    }

    pub fn len(&self) -> usize {
        self.mounted.as_ref().map_or(0, |m| m.router.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Listener handles currently registered
    pub fn listener_count(&self) -> usize {
        self.mounted.as_ref().map_or(0, |m| m.listeners.len())
    }

    /// Propagation calls scheduled but not yet fired
    pub fn pending_propagations(&self) -> usize {
        self.mounted
            .as_ref()
            .map_or(0, |m| m.router.pending_propagations())
    }

    /// Route a pointer-enter directly, bypassing the document
    pub fn pointer_enter(&self, index: usize) {
        if let Some(mounted) = &self.mounted {
            mounted.router.pointer_enter(index);
        }
    }

    /// Route a pointer-leave directly, bypassing the document
    pub fn pointer_leave(&self, index: usize) {
        if let Some(mounted) = &self.mounted {
            mounted.router.pointer_leave(index);
        }
    }
}

impl Drop for HeadingInstance {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kinetype_animation::AnimationScheduler;
    use kinetype_core::{event_types, Color};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::config::AnimationFamily;
    use crate::family::{ResolvedFamily, RANDOM_FAMILIES};

    fn heading(text: &str) -> (SharedDocument, NodeId, AnimationScheduler) {
        let doc = Document::new().into_shared();
        let h1 = doc.borrow_mut().create_text_element("h1", text);
        (doc, h1, AnimationScheduler::new())
    }

    #[test]
    fn test_missing_attachment_point_is_a_no_op() {
        let (doc, _h1, scheduler) = heading("Hi");
        let before = doc.borrow().node_count();

        let mounted =
            HeadingInstance::mount(&doc, None, HeadingConfig::default(), &scheduler.handle());
        assert!(mounted.is_none());
        assert_eq!(doc.borrow().node_count(), before);
        assert_eq!(scheduler.timeline_count(), 0);
    }

    #[test]
    fn test_dropped_scheduler_is_a_no_op() {
        let (doc, h1, _scheduler) = heading("Hi");
        let handle = AnimationScheduler::new().handle();
        assert!(HeadingInstance::mount(&doc, Some(h1), HeadingConfig::default(), &handle).is_none());
        assert_eq!(doc.borrow().text_content(h1), "Hi");
    }

    #[test]
    fn test_mount_registers_everything() {
        let (doc, h1, scheduler) = heading("Hey you");
        let instance =
            HeadingInstance::mount(&doc, Some(h1), HeadingConfig::default(), &scheduler.handle())
                .unwrap();

        assert_eq!(instance.len(), 7);
        assert_eq!(instance.raw_text(), "Hey you");
        assert_eq!(scheduler.timeline_count(), 7);
        assert_eq!(scheduler.tick_callback_count(), 1);
        assert_eq!(doc.borrow().total_listener_count(), 14);
        assert_eq!(instance.listener_count(), 14);
        assert_eq!(instance.unit(3).unwrap().source, ' ');
    }

    #[test]
    fn test_empty_text_mounts_empty_instance() {
        let (doc, h1, scheduler) = heading("");
        let instance =
            HeadingInstance::mount(&doc, Some(h1), HeadingConfig::default(), &scheduler.handle())
                .unwrap();
        assert!(instance.is_empty());
        assert_eq!(scheduler.timeline_count(), 0);
        assert_eq!(doc.borrow().total_listener_count(), 0);
    }

    #[test]
    fn test_teardown_cancels_all_work() {
        let (doc, h1, scheduler) = heading("abc");
        let mut instance =
            HeadingInstance::mount(&doc, Some(h1), HeadingConfig::default(), &scheduler.handle())
                .unwrap();
        let units = instance.units();

        instance.pointer_enter(1);
        assert_eq!(instance.pending_propagations(), 2);

        instance.teardown();
        assert!(instance.is_torn_down());
        assert_eq!(scheduler.timeline_count(), 0);
        assert_eq!(scheduler.pending_call_count(), 0);
        assert_eq!(scheduler.tick_callback_count(), 0);
        assert_eq!(doc.borrow().total_listener_count(), 0);

        // Nothing left to advance or fire
        assert!(!scheduler.advance(100.0));
        for unit in &units {
            assert_eq!(Document::dispatch(&doc, unit.node, event_types::POINTER_ENTER), 0);
        }

        instance.teardown();
    }

    #[test]
    fn test_drop_tears_down() {
        let (doc, h1, scheduler) = heading("abc");
        {
            let instance =
                HeadingInstance::mount(&doc, Some(h1), HeadingConfig::default(), &scheduler.handle())
                    .unwrap();
            instance.pointer_enter(0);
        }
        assert_eq!(scheduler.timeline_count(), 0);
        assert_eq!(scheduler.pending_call_count(), 0);
        assert_eq!(doc.borrow().total_listener_count(), 0);
    }

    #[test]
    fn test_drop_while_document_borrowed() {
        let (doc, h1, scheduler) = heading("abc");
        let instance =
            HeadingInstance::mount(&doc, Some(h1), HeadingConfig::default(), &scheduler.handle())
                .unwrap();
        let listeners = instance.listener_count();
        let node = instance.node_of(1).unwrap();
        instance.pointer_enter(0);

        {
            let _held = doc.borrow();
            drop(instance);
        }
        assert_eq!(scheduler.timeline_count(), 0);
        assert_eq!(scheduler.pending_call_count(), 0);
        assert_eq!(scheduler.tick_callback_count(), 0);

        // Listeners stay attached but no longer start anything
        assert_eq!(doc.borrow().total_listener_count(), listeners);
        Document::dispatch(&doc, node, event_types::POINTER_ENTER);
        assert_eq!(scheduler.timeline_count(), 0);
        assert_eq!(scheduler.pending_call_count(), 0);
    }

    #[test]
    fn test_reconfigure_rebuilds_from_captured_text() {
        let (doc, h1, scheduler) = heading("Hello");
        let mut instance =
            HeadingInstance::mount(&doc, Some(h1), HeadingConfig::default(), &scheduler.handle())
                .unwrap();
        let old = instance.units();

        let config = HeadingConfig::default()
            .with_family(AnimationFamily::Varied)
            .with_hover_color(Some(Color::RED));
        assert!(instance.reconfigure(config));

        assert_eq!(instance.len(), 5);
        assert_eq!(instance.raw_text(), "Hello");
        assert_eq!(doc.borrow().children(h1).len(), 5);
        assert_eq!(scheduler.timeline_count(), 5);
        assert_eq!(doc.borrow().total_listener_count(), 10);
        assert_eq!(instance.unit(1).unwrap().family, ResolvedFamily::Flip);
        assert!(old.iter().all(|u| !doc.borrow().contains(u.node)));
    }

    #[test]
    fn test_random_family_is_fixed_per_mount() {
        let (doc, h1, scheduler) = heading("randomness");
        let config = HeadingConfig::default().with_family(AnimationFamily::Random);
        let instance = HeadingInstance::mount_with_rng(
            &doc,
            Some(h1),
            config,
            &scheduler.handle(),
            &mut StdRng::seed_from_u64(9),
        )
        .unwrap();

        let families: Vec<_> = instance.units().iter().map(|u| u.family).collect();
        assert!(families.iter().all(|f| RANDOM_FAMILIES.contains(f)));

        // Hovering never re-rolls
        for i in 0..instance.len() {
            instance.pointer_enter(i);
        }
        scheduler.advance(16.0);
        let after: Vec<_> = instance.units().iter().map(|u| u.family).collect();
        assert_eq!(families, after);
    }
}

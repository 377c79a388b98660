//! Pointer hover tracking
//!
//! Turns "the pointer is now over node X" into POINTER_LEAVE / POINTER_ENTER
//! pairs, the way a browser does when the pointer crosses element borders.
//! Hit testing is the host's job; the tracker only sees the resulting node.

use crate::events::{event_types, EventType};
use crate::tree::{Document, NodeId, SharedDocument};

/// Tracks the hovered node and emits enter/leave transitions
#[derive(Clone, Debug, Default)]
pub struct PointerTracker {
    hovered: Option<NodeId>,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently hovered node
    pub fn hovered(&self) -> Option<NodeId> {
        self.hovered
    }

    /// Move the pointer over `target` (or off every node with `None`).
    ///
    /// Emits POINTER_LEAVE to the previous node before POINTER_ENTER to the
    /// new one. Returns the emitted events in order.
    pub fn move_to(
        &mut self,
        doc: &SharedDocument,
        target: Option<NodeId>,
    ) -> Vec<(NodeId, EventType)> {
        if target == self.hovered {
            return Vec::new();
        }

        let mut events = Vec::with_capacity(2);

        if let Some(old) = self.hovered.take() {
            Document::dispatch(doc, old, event_types::POINTER_LEAVE);
            events.push((old, event_types::POINTER_LEAVE));
        }

        if let Some(new) = target {
            Document::dispatch(doc, new, event_types::POINTER_ENTER);
            events.push((new, event_types::POINTER_ENTER));
        }

        self.hovered = target;
        events
    }

    /// Pointer left the window
    pub fn leave(&mut self, doc: &SharedDocument) -> Vec<(NodeId, EventType)> {
        self.move_to(doc, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_emits_leave_before_enter() {
        let doc = Document::new().into_shared();
        let (a, b) = {
            let mut d = doc.borrow_mut();
            (d.create_element("span"), d.create_element("span"))
        };

        let mut tracker = PointerTracker::new();
        assert_eq!(
            tracker.move_to(&doc, Some(a)),
            vec![(a, event_types::POINTER_ENTER)]
        );
        assert!(tracker.move_to(&doc, Some(a)).is_empty());
        assert_eq!(
            tracker.move_to(&doc, Some(b)),
            vec![
                (a, event_types::POINTER_LEAVE),
                (b, event_types::POINTER_ENTER)
            ]
        );
        assert_eq!(tracker.leave(&doc), vec![(b, event_types::POINTER_LEAVE)]);
        assert_eq!(tracker.hovered(), None);
    }
}

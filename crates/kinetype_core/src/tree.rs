//! Retained document tree
//!
//! A minimal element tree standing in for the host page: elements carry
//! optional text, inline style properties, a computed style snapshot,
//! `data-*` attributes and pointer listeners.
//!
//! Listeners are registered per node and event type and return a
//! [`ListenerId`]. Removing a listener by id is the only way to detach it, so
//! owners keep their ids and dispose of them explicitly.
//!
//! # Architecture
//!
//! ```text
//! Document (nodes + listeners)
//!     ↓ add_listener(node, POINTER_ENTER, |ctx| ...)
//! ListenerId (returned to the owner)
//!     ↓ Document::dispatch(&shared, node, POINTER_ENTER)
//! Callbacks cloned out, borrow released, callbacks invoked
//! ```

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};

use crate::events::{event_name, EventType};

new_key_type! {
    /// Handle to an element in a [`Document`]
    pub struct NodeId;
    /// Handle to a registered listener
    pub struct ListenerId;
}

/// Document shared between the host and the listeners it dispatches to
pub type SharedDocument = Rc<RefCell<Document>>;

/// Callback invoked for a dispatched event.
///
/// Uses Rc since the document is single-threaded; callbacks are cloned out of
/// the table before they run so they may borrow the document mutably.
pub type ListenerCallback = Rc<dyn Fn(&EventContext)>;

/// Context passed to listeners
#[derive(Clone, Copy, Debug)]
pub struct EventContext {
    pub event_type: EventType,
    pub node: NodeId,
}

/// Style values the host's layout engine computed for an element
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComputedStyle {
    pub letter_spacing: String,
    pub line_height: String,
}

impl Default for ComputedStyle {
    fn default() -> Self {
        Self {
            letter_spacing: "normal".to_string(),
            line_height: "normal".to_string(),
        }
    }
}

/// A single element
#[derive(Clone, Debug, Default)]
pub struct Node {
    tag: String,
    text: Option<String>,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
    style: BTreeMap<String, String>,
    computed: ComputedStyle,
    data: BTreeMap<String, String>,
}

impl Node {
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Text owned directly by this element (not its children)
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Inline style property
    pub fn style(&self, property: &str) -> Option<&str> {
        self.style.get(property).map(String::as_str)
    }

    pub fn computed(&self) -> &ComputedStyle {
        &self.computed
    }

    /// `data-*` attribute
    pub fn data(&self, key: &str) -> Option<&str> {
        self.data.get(key).map(String::as_str)
    }
}

struct Listener {
    node: NodeId,
    event_type: EventType,
    callback: ListenerCallback,
}

/// The element tree plus its listener table
#[derive(Default)]
pub struct Document {
    nodes: SlotMap<NodeId, Node>,
    listeners: SlotMap<ListenerId, Listener>,
    /// Listener ids per node, in registration order
    by_node: FxHashMap<NodeId, Vec<ListenerId>>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap the document for sharing with listeners
    pub fn into_shared(self) -> SharedDocument {
        Rc::new(RefCell::new(self))
    }

    // =========================================================================
    // Nodes
    // =========================================================================

    /// Create a detached element
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.nodes.insert(Node {
            tag: tag.to_string(),
            ..Node::default()
        })
    }

    /// Create a detached element holding `text`
    pub fn create_text_element(&mut self, tag: &str, text: &str) -> NodeId {
        let id = self.create_element(tag);
        self.set_text(id, text);
        id
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains_key(node)
    }

    pub fn node(&self, node: NodeId) -> Option<&Node> {
        self.nodes.get(node)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.nodes
            .get(node)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    /// Append `child` to `parent`, detaching it from any previous parent
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if parent == child || !self.contains(parent) || !self.contains(child) {
            return;
        }

        if let Some(old_parent) = self.nodes[child].parent {
            if let Some(p) = self.nodes.get_mut(old_parent) {
                p.children.retain(|c| *c != child);
            }
        }

        self.nodes[child].parent = Some(parent);
        self.nodes[parent].children.push(child);
    }

    /// Remove every descendant of `node` together with their listeners.
    /// The node's own text is cleared as well.
    pub fn clear_children(&mut self, node: NodeId) {
        let Some(n) = self.nodes.get_mut(node) else {
            return;
        };
        n.text = None;
        let children = std::mem::take(&mut n.children);
        for child in children {
            self.remove_subtree(child);
        }
    }

    fn remove_subtree(&mut self, node: NodeId) {
        if let Some(n) = self.nodes.remove(node) {
            if let Some(ids) = self.by_node.remove(&node) {
                for id in ids {
                    self.listeners.remove(id);
                }
            }
            for child in n.children {
                self.remove_subtree(child);
            }
        }
    }

    pub fn set_text(&mut self, node: NodeId, text: &str) {
        if let Some(n) = self.nodes.get_mut(node) {
            n.text = Some(text.to_string());
        }
    }

    /// Text of the element and all its descendants, in document order
    pub fn text_content(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(node, &mut out);
        out
    }

    fn collect_text(&self, node: NodeId, out: &mut String) {
        if let Some(n) = self.nodes.get(node) {
            if let Some(text) = &n.text {
                out.push_str(text);
            }
            for child in &n.children {
                self.collect_text(*child, out);
            }
        }
    }

    // =========================================================================
    // Styles and attributes
    // =========================================================================

    pub fn set_style(&mut self, node: NodeId, property: &str, value: &str) {
        if let Some(n) = self.nodes.get_mut(node) {
            n.style.insert(property.to_string(), value.to_string());
        }
    }

    pub fn remove_style(&mut self, node: NodeId, property: &str) {
        if let Some(n) = self.nodes.get_mut(node) {
            n.style.remove(property);
        }
    }

    pub fn style(&self, node: NodeId, property: &str) -> Option<&str> {
        self.nodes.get(node).and_then(|n| n.style(property))
    }

    pub fn computed_style(&self, node: NodeId) -> Option<&ComputedStyle> {
        self.nodes.get(node).map(|n| &n.computed)
    }

    /// Record what the host's layout computed for an element
    pub fn set_computed_style(&mut self, node: NodeId, computed: ComputedStyle) {
        if let Some(n) = self.nodes.get_mut(node) {
            n.computed = computed;
        }
    }

    pub fn set_data(&mut self, node: NodeId, key: &str, value: &str) {
        if let Some(n) = self.nodes.get_mut(node) {
            n.data.insert(key.to_string(), value.to_string());
        }
    }

    // =========================================================================
    // Listeners
    // =========================================================================

    /// Register a listener. Returns `None` if the node does not exist.
    pub fn add_listener<F>(
        &mut self,
        node: NodeId,
        event_type: EventType,
        callback: F,
    ) -> Option<ListenerId>
    where
        F: Fn(&EventContext) + 'static,
    {
        if !self.contains(node) {
            return None;
        }
        let id = self.listeners.insert(Listener {
            node,
            event_type,
            callback: Rc::new(callback),
        });
        self.by_node.entry(node).or_default().push(id);
        Some(id)
    }

    /// Detach a listener. Returns false if it was already gone.
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        let Some(listener) = self.listeners.remove(id) else {
            return false;
        };
        if let Some(ids) = self.by_node.get_mut(&listener.node) {
            ids.retain(|l| *l != id);
            if ids.is_empty() {
                self.by_node.remove(&listener.node);
            }
        }
        true
    }

    /// Number of listeners attached to `node`
    pub fn listener_count(&self, node: NodeId) -> usize {
        self.by_node.get(&node).map_or(0, Vec::len)
    }

    /// Number of listeners attached anywhere in the document
    pub fn total_listener_count(&self) -> usize {
        self.listeners.len()
    }

    fn callbacks_for(&self, node: NodeId, event_type: EventType) -> Vec<ListenerCallback> {
        self.by_node
            .get(&node)
            .into_iter()
            .flatten()
            .filter_map(|id| self.listeners.get(*id))
            .filter(|l| l.event_type == event_type)
            .map(|l| Rc::clone(&l.callback))
            .collect()
    }

    /// Dispatch an event to every listener of `node` for `event_type`.
    ///
    /// The document borrow is released before any callback runs. Returns the
    /// number of callbacks invoked.
    pub fn dispatch(doc: &SharedDocument, node: NodeId, event_type: EventType) -> usize {
        let callbacks = doc.borrow().callbacks_for(node, event_type);
        tracing::trace!(
            "dispatch {} to {:?} ({} listeners)",
            event_name(event_type),
            node,
            callbacks.len()
        );

        let ctx = EventContext { event_type, node };
        for callback in &callbacks {
            callback(&ctx);
        }
        callbacks.len()
    }
}

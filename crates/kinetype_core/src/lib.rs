//! kinetype core
//!
//! Foundational types shared by the animation engine and the heading
//! components:
//!
//! - **Color**: RGBA colors with CSS parsing (`#rrggbb`, `rgb()`, named)
//! - **GlyphTransform**: the per-character transform an animation drives
//! - **Document tree**: elements, inline styles and disposable listeners
//! - **Pointer tracking**: enter/leave transitions from hover changes
//!
//! # Example
//!
//! ```rust
//! use kinetype_core::{event_types, Document};
//!
//! let doc = Document::new().into_shared();
//! let span = doc.borrow_mut().create_text_element("span", "A");
//! let id = doc
//!     .borrow_mut()
//!     .add_listener(span, event_types::POINTER_ENTER, |ctx| {
//!         println!("entered {:?}", ctx.node);
//!     })
//!     .unwrap();
//!
//! assert_eq!(Document::dispatch(&doc, span, event_types::POINTER_ENTER), 1);
//! doc.borrow_mut().remove_listener(id);
//! ```

pub mod color;
pub mod events;
pub mod pointer;
pub mod transform;
pub mod tree;

pub use color::{Color, ColorParseError};
pub use events::{event_name, event_types, EventType};
pub use pointer::PointerTracker;
pub use transform::GlyphTransform;
pub use tree::{
    ComputedStyle, Document, EventContext, ListenerCallback, ListenerId, Node, NodeId,
    SharedDocument,
};

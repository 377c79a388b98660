//! Pointer event identifiers
//!
//! Event types are plain `u32` ids so listener tables can key on them
//! without caring which input backend produced the event.

/// Event type identifier
pub type EventType = u32;

/// Well-known event types
pub mod event_types {
    use super::EventType;

    pub const POINTER_ENTER: EventType = 1;
    pub const POINTER_LEAVE: EventType = 2;
    pub const POINTER_MOVE: EventType = 3;
    pub const POINTER_DOWN: EventType = 4;
    pub const POINTER_UP: EventType = 5;
}

/// Human readable event name, used in trace output
pub fn event_name(event_type: EventType) -> &'static str {
    match event_type {
        event_types::POINTER_ENTER => "pointerenter",
        event_types::POINTER_LEAVE => "pointerleave",
        event_types::POINTER_MOVE => "pointermove",
        event_types::POINTER_DOWN => "pointerdown",
        event_types::POINTER_UP => "pointerup",
        _ => "unknown",
    }
}

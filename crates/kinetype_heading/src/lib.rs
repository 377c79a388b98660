//! kinetype heading
//!
//! Per-character hover animations for headings.
//!
//! Mounting a [`HeadingInstance`] on an element:
//!
//! 1. **Segments** its text into one inline-block span per character
//! 2. **Registers** a paused timeline per character in the scheduler
//! 3. **Routes** pointer enter/leave on each span to timeline restarts,
//!    hover color/glow, and staggered propagation to neighbours
//! 4. **Tears down** every timeline, listener, pending call and the paint
//!    hook on [`HeadingInstance::teardown`], reconfigure or drop
//!
//! Configuration comes from [`HeadingConfig`], either built in code, loaded
//! from TOML, or taken from a named [`Preset`].

pub mod config;
pub mod error;
pub mod family;
pub mod instance;
pub mod presets;
pub mod registry;
pub mod router;
pub mod segment;
pub mod style;

pub use config::{AnimationFamily, HeadingConfig};
pub use error::{ConfigError, Result};
pub use family::{build_timeline, resolve_family, ResolvedFamily, RANDOM_FAMILIES, VARIED_FAMILIES};
pub use instance::HeadingInstance;
pub use presets::Preset;
pub use registry::{register_units, CharacterUnit};
pub use router::{neighbours, InteractionRouter};
pub use segment::{segment_element, segment_text, Segment, NBSP};
pub use style::{apply_transient, style_patch, TransientStyle, GLOW_SHADOW};

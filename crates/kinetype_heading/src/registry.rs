//! Per-unit animation registry
//!
//! Gives every segmented character its own paused timeline in the
//! scheduler. Timelines are built once per mount and never shared.

use kinetype_animation::{SchedulerHandle, TimelineId};
use kinetype_core::NodeId;
use rand::Rng;

use crate::config::{AnimationFamily, HeadingConfig};
use crate::family::{build_timeline, resolve_family, ResolvedFamily};
use crate::segment::Segment;
use crate::style::TransientStyle;

/// One interactive character
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CharacterUnit {
    /// Position in reading order; neighbours are `index - 1` and `index + 1`
    pub index: usize,
    pub source: char,
    pub glyph: char,
    /// Span displaying the character
    pub node: NodeId,
    /// Family chosen at mount, fixed for the instance lifetime
    pub family: ResolvedFamily,
    /// Timeline owned by this unit alone
    pub timeline: TimelineId,
    pub transient: TransientStyle,
}

/// Build and register one paused timeline per segment.
///
/// Returns `None` if the scheduler has been dropped.
pub fn register_units<R>(
    segments: &[(Segment, NodeId)],
    config: &HeadingConfig,
    scheduler: &SchedulerHandle,
    rng: &mut R,
) -> Option<Vec<CharacterUnit>>
where
    R: Rng + ?Sized,
{
    let varied = config.animation_family == AnimationFamily::Varied;

    let units = segments
        .iter()
        .enumerate()
        .map(|(index, (segment, node))| {
            let family = resolve_family(config.animation_family, index, rng);
            let timeline = scheduler.register_timeline(build_timeline(family, config, varied))?;
            Some(CharacterUnit {
                index,
                source: segment.source,
                glyph: segment.glyph,
                node: *node,
                family,
                timeline,
                transient: TransientStyle::baseline(),
            })
        })
        .collect::<Option<Vec<_>>>()?;

    tracing::debug!(
        "registered {} timeline(s) for family {}",
        units.len(),
        config.animation_family
    );
    Some(units)
}

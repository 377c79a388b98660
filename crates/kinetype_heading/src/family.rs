//! Per-character animation families
//!
//! A configured [`AnimationFamily`] resolves to one concrete
//! [`ResolvedFamily`] per character. The resolved family, together with the
//! `varied` flag, fully determines the timeline built for that character.
//!
//! Step tables are fractions of the configured duration, so every family
//! plays for exactly `duration` seconds.

use std::fmt;

use kinetype_animation::{EaseDirection, Easing, Timeline, TweenProps};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::{AnimationFamily, HeadingConfig};

/// Concrete animation a single character plays
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResolvedFamily {
    Bounce,
    Flip,
    Rotate,
    Elastic,
    Squeeze,
    Wave,
    Default,
}

/// Position-cycled families used by [`AnimationFamily::Varied`]
pub const VARIED_FAMILIES: [ResolvedFamily; 6] = [
    ResolvedFamily::Bounce,
    ResolvedFamily::Flip,
    ResolvedFamily::Rotate,
    ResolvedFamily::Elastic,
    ResolvedFamily::Squeeze,
    ResolvedFamily::Wave,
];

/// Families [`AnimationFamily::Random`] draws from
pub const RANDOM_FAMILIES: [ResolvedFamily; 3] = [
    ResolvedFamily::Bounce,
    ResolvedFamily::Rotate,
    ResolvedFamily::Wave,
];

impl ResolvedFamily {
    pub fn name(&self) -> &'static str {
        match self {
            ResolvedFamily::Bounce => "bounce",
            ResolvedFamily::Flip => "flip",
            ResolvedFamily::Rotate => "rotate",
            ResolvedFamily::Elastic => "elastic",
            ResolvedFamily::Squeeze => "squeeze",
            ResolvedFamily::Wave => "wave",
            ResolvedFamily::Default => "default",
        }
    }
}

impl fmt::Display for ResolvedFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Pick the family for the character at `index`.
///
/// Only [`AnimationFamily::Random`] consumes randomness.
pub fn resolve_family<R>(family: AnimationFamily, index: usize, rng: &mut R) -> ResolvedFamily
where
    R: Rng + ?Sized,
{
    match family {
        AnimationFamily::Bounce => ResolvedFamily::Bounce,
        AnimationFamily::Flip => ResolvedFamily::Flip,
        AnimationFamily::Rotate => ResolvedFamily::Rotate,
        AnimationFamily::Elastic => ResolvedFamily::Elastic,
        AnimationFamily::Squeeze => ResolvedFamily::Squeeze,
        AnimationFamily::Wave => ResolvedFamily::Wave,
        AnimationFamily::Default => ResolvedFamily::Default,
        AnimationFamily::Varied => VARIED_FAMILIES[index % VARIED_FAMILIES.len()],
        AnimationFamily::Random => RANDOM_FAMILIES[rng.random_range(0..RANDOM_FAMILIES.len())],
    }
}

const POWER2_OUT: Easing = Easing::power2_out();
const POWER2_IN: Easing = Easing::power2_in();
const POWER2_IN_OUT: Easing = Easing::power2_in_out();
const POWER1_IN_OUT: Easing = Easing::power(1, EaseDirection::InOut);

/// Build the paused timeline for one character.
///
/// `varied` selects the scale/squash variants used when the heading is
/// configured with [`AnimationFamily::Varied`].
pub fn build_timeline(family: ResolvedFamily, config: &HeadingConfig, varied: bool) -> Timeline {
    let d = config.duration_ms();
    let ease = config.ease;
    let mut tl = Timeline::new();

    match (family, varied) {
        (ResolvedFamily::Bounce, false) => {
            tl.to(TweenProps::new().y(-20.0), d * 0.4, POWER2_OUT)
                .to(TweenProps::new().y(0.0), d * 0.6, ease);
        }
        (ResolvedFamily::Bounce, true) => {
            let (lift, land) = if config.enable_squish {
                ((0.9, 1.3), (1.1, 0.9))
            } else {
                ((config.scale, config.scale), (1.0, 1.0))
            };
            tl.to(
                TweenProps::new().y(-20.0).scale_x(lift.0).scale_y(lift.1),
                d * 0.4,
                POWER2_OUT,
            )
            .to(
                TweenProps::new().y(0.0).scale_x(land.0).scale_y(land.1),
                d * 0.3,
                POWER2_IN,
            )
            .to(TweenProps::new().scale(1.0), d * 0.3, ease);
        }
        (ResolvedFamily::Flip, varied) => {
            let mut props = TweenProps::new().rotation_x(360.0);
            if varied {
                props = props.scale(config.scale);
            }
            tl.to(props, d, ease);
        }
        (ResolvedFamily::Rotate, varied) => {
            let mut props = TweenProps::new().rotation(360.0);
            if varied {
                props = props.scale(config.scale);
            }
            tl.to(props, d, ease);
        }
        (ResolvedFamily::Elastic, false) => {
            tl.to(TweenProps::new().y(-20.0), d * 0.3, POWER2_OUT)
                .to(TweenProps::new().y(5.0), d * 0.3, POWER2_IN)
                .to(TweenProps::new().y(0.0), d * 0.4, Easing::elastic_out(1.0, 0.5));
        }
        (ResolvedFamily::Elastic, true) => {
            tl.to(
                TweenProps::new().y(-15.0).scale_y(1.4).scale_x(0.8),
                d * 0.3,
                POWER2_OUT,
            )
            .to(
                TweenProps::new().y(0.0).scale_y(0.8).scale_x(1.2),
                d * 0.3,
                POWER2_IN,
            )
            .to(
                TweenProps::new().scale_y(1.1).scale_x(0.95),
                d * 0.2,
                POWER1_IN_OUT,
            )
            .to(TweenProps::new().scale(1.0), d * 0.2, Easing::elastic_out(1.0, 0.5));
        }
        (ResolvedFamily::Squeeze, false) => {
            tl.to(TweenProps::new().skew_x(10.0), d * 0.3, POWER2_IN_OUT)
                .to(TweenProps::new().skew_x(-10.0), d * 0.4, POWER2_IN_OUT)
                .to(TweenProps::new().skew_x(0.0), d * 0.3, Easing::elastic_out(1.0, 0.3));
        }
        (ResolvedFamily::Squeeze, true) => {
            tl.to(TweenProps::new().scale_x(1.5).scale_y(0.7), d * 0.3, POWER2_IN_OUT)
                .to(
                    TweenProps::new().scale_x(0.8).scale_y(1.3),
                    d * 0.4,
                    Easing::elastic_out(1.0, 0.4),
                )
                .to(TweenProps::new().scale(1.0), d * 0.3, Easing::elastic_out(1.0, 0.3));
        }
        // Wave has no scale variant
        (ResolvedFamily::Wave, _) => {
            tl.to(TweenProps::new().y(-15.0), d * 0.4, POWER2_OUT)
                .to(TweenProps::new().y(5.0), d * 0.3, POWER2_IN_OUT)
                .to(TweenProps::new().y(0.0), d * 0.3, Easing::elastic_out(1.0, 0.4));
        }
        (ResolvedFamily::Default, _) => {
            tl.to(TweenProps::new().y(-20.0), d * 0.5, POWER2_OUT)
                .to(TweenProps::new().y(0.0), d * 0.5, ease);
        }
    }

    tl
}

//! Named configurations
//!
//! Every preset except `varied` disables squish so letters keep their box.

use std::fmt;
use std::str::FromStr;

use kinetype_animation::{EaseDirection, Easing};
use kinetype_core::Color;
use serde::{Deserialize, Serialize};

use crate::config::{AnimationFamily, HeadingConfig};
use crate::error::ConfigError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Preset {
    Playful,
    Elegant,
    Energetic,
    Minimal,
    Dynamic,
    Chaotic,
    GsapStyle,
    Varied,
}

impl Preset {
    pub const ALL: [Preset; 8] = [
        Preset::Playful,
        Preset::Elegant,
        Preset::Energetic,
        Preset::Minimal,
        Preset::Dynamic,
        Preset::Chaotic,
        Preset::GsapStyle,
        Preset::Varied,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Preset::Playful => "playful",
            Preset::Elegant => "elegant",
            Preset::Energetic => "energetic",
            Preset::Minimal => "minimal",
            Preset::Dynamic => "dynamic",
            Preset::Chaotic => "chaotic",
            Preset::GsapStyle => "gsap-style",
            Preset::Varied => "varied",
        }
    }

    pub fn config(&self) -> HeadingConfig {
        let base = HeadingConfig::default().with_squish(false);
        match self {
            Preset::Playful => base
                .with_family(AnimationFamily::Bounce)
                .with_duration(0.6)
                .with_ease(Easing::elastic_out(1.0, 0.3))
                .with_scale(1.2),
            Preset::Elegant => base
                .with_family(AnimationFamily::Wave)
                .with_duration(0.8)
                .with_ease(Easing::power2_out())
                .with_scale(1.1),
            Preset::Energetic => base
                .with_family(AnimationFamily::Elastic)
                .with_duration(0.7)
                .with_ease(Easing::elastic_out(1.2, 0.4))
                .with_scale(1.3)
                .with_glow(true),
            Preset::Minimal => base
                .with_family(AnimationFamily::Squeeze)
                .with_duration(0.4)
                .with_ease(Easing::power(2, EaseDirection::InOut))
                .with_scale(1.1),
            Preset::Dynamic => base
                .with_family(AnimationFamily::Flip)
                .with_duration(0.5)
                .with_ease(Easing::back_out(1.7))
                .with_scale(1.15),
            Preset::Chaotic => base
                .with_family(AnimationFamily::Random)
                .with_duration(0.6)
                .with_ease(Easing::elastic_out(1.0, 0.3))
                .with_scale(1.2)
                .with_adjacent_stagger(0.08),
            Preset::GsapStyle => base
                .with_family(AnimationFamily::Bounce)
                .with_duration(0.5)
                .with_ease(Easing::power2_out())
                .with_scale(1.0)
                .with_hover_color(Some(Color::from_hex(0x88CE02)))
                .with_glow(false)
                .with_adjacent_stagger(0.0),
            Preset::Varied => base
                .with_family(AnimationFamily::Varied)
                .with_duration(2.0)
                .with_ease(Easing::elastic_out(1.0, 0.3))
                .with_scale(1.2)
                .with_squish(true)
                .with_hover_color(Some(Color::from_hex(0x4472CA)))
                .with_glow(true)
                .with_adjacent_stagger(0.12),
        }
    }
}

impl HeadingConfig {
    /// Configuration for a named preset
    pub fn preset(preset: Preset) -> Self {
        preset.config()
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        let wanted = if wanted == "gsapstyle" {
            "gsap-style".to_string()
        } else {
            wanted
        };
        Preset::ALL
            .into_iter()
            .find(|p| p.name() == wanted)
            .ok_or_else(|| ConfigError::UnknownPreset(s.to_string()))
    }
}

//! Heading animation configuration
//!
//! Read once at mount. Keys are kebab-case so a TOML file reads like:
//!
//! ```toml
//! animation-family = "varied"
//! duration = 2.0
//! ease = "elastic.out(1, 0.3)"
//! scale = 1.2
//! enable-squish = true
//! hover-color = "#4472ca"
//! add-glow = true
//! adjacent-stagger = 0.12
//! ```

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use kinetype_animation::Easing;
use kinetype_core::Color;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Which animation each character plays
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnimationFamily {
    /// Lift, then settle with the configured ease
    #[default]
    Bounce,
    /// Full turn around the X axis
    Flip,
    /// Full in-plane turn
    Rotate,
    /// Lift, dip below the baseline, elastic settle
    Elastic,
    /// Skew one way, then the other, then settle
    Squeeze,
    /// Gentler lift and dip
    Wave,
    /// Each character picks bounce, rotate or wave once per mount
    #[serde(alias = "random-per-mount")]
    Random,
    /// Families cycle by character position
    #[serde(alias = "varied-per-position")]
    Varied,
    /// Even lift/settle split
    Default,
}

impl AnimationFamily {
    pub const ALL: [AnimationFamily; 9] = [
        AnimationFamily::Bounce,
        AnimationFamily::Flip,
        AnimationFamily::Rotate,
        AnimationFamily::Elastic,
        AnimationFamily::Squeeze,
        AnimationFamily::Wave,
        AnimationFamily::Random,
        AnimationFamily::Varied,
        AnimationFamily::Default,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            AnimationFamily::Bounce => "bounce",
            AnimationFamily::Flip => "flip",
            AnimationFamily::Rotate => "rotate",
            AnimationFamily::Elastic => "elastic",
            AnimationFamily::Squeeze => "squeeze",
            AnimationFamily::Wave => "wave",
            AnimationFamily::Random => "random",
            AnimationFamily::Varied => "varied",
            AnimationFamily::Default => "default",
        }
    }
}

impl fmt::Display for AnimationFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AnimationFamily {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "random-per-mount" => Ok(AnimationFamily::Random),
            "varied-per-position" => Ok(AnimationFamily::Varied),
            other => AnimationFamily::ALL
                .into_iter()
                .find(|f| f.name() == other)
                .ok_or_else(|| format!("unknown animation family `{}`", s)),
        }
    }
}

/// Configuration for one animated heading
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct HeadingConfig {
    pub animation_family: AnimationFamily,
    /// Total length of one character's animation, in seconds
    pub duration: f32,
    /// Curve used for each family's settle step
    pub ease: Easing,
    /// Scale reached by the `varied` scale variants
    pub scale: f32,
    /// Squash and stretch in the `varied` bounce
    pub enable_squish: bool,
    /// Color applied while hovered; `None` leaves color untouched
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hover_color: Option<Color>,
    /// Text glow while hovered
    pub add_glow: bool,
    /// Delay before neighbours follow a hovered character, in seconds.
    /// Zero disables propagation.
    pub adjacent_stagger: f32,
    /// Color restored on pointer-leave when `hover_color` is set
    pub base_color: Color,
}

impl Default for HeadingConfig {
    fn default() -> Self {
        Self {
            animation_family: AnimationFamily::Bounce,
            duration: 0.5,
            ease: Easing::elastic_out(1.0, 0.3),
            scale: 1.2,
            enable_squish: true,
            hover_color: None,
            add_glow: false,
            adjacent_stagger: 0.05,
            base_color: Color::WHITE,
        }
    }
}

impl HeadingConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_family(mut self, family: AnimationFamily) -> Self {
        self.animation_family = family;
        self
    }

    pub fn with_duration(mut self, seconds: f32) -> Self {
        self.duration = seconds;
        self
    }

    pub fn with_ease(mut self, ease: Easing) -> Self {
        self.ease = ease;
        self
    }

    /// Set the ease from a GSAP-style string such as `power2.out`
    pub fn with_ease_str(self, ease: &str) -> Result<Self> {
        Ok(self.with_ease(Easing::parse(ease)?))
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_squish(mut self, enabled: bool) -> Self {
        self.enable_squish = enabled;
        self
    }

    pub fn with_hover_color(mut self, color: Option<Color>) -> Self {
        self.hover_color = color;
        self
    }

    /// Set the hover color from a CSS color string
    pub fn with_hover_color_str(self, color: &str) -> Result<Self> {
        Ok(self.with_hover_color(Some(Color::parse(color)?)))
    }

    pub fn with_glow(mut self, enabled: bool) -> Self {
        self.add_glow = enabled;
        self
    }

    pub fn with_adjacent_stagger(mut self, seconds: f32) -> Self {
        self.adjacent_stagger = seconds;
        self
    }

    pub fn with_base_color(mut self, color: Color) -> Self {
        self.base_color = color;
        self
    }

    pub fn duration_ms(&self) -> f32 {
        self.duration * 1000.0
    }

    pub fn stagger_ms(&self) -> f32 {
        self.adjacent_stagger * 1000.0
    }

    /// Whether hovering a character also triggers its neighbours
    pub fn propagates(&self) -> bool {
        self.adjacent_stagger > 0.0
    }

    /// Check numeric ranges
    pub fn validate(&self) -> Result<()> {
        if !(self.duration.is_finite() && self.duration > 0.0) {
            return Err(ConfigError::InvalidDuration(self.duration));
        }
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(ConfigError::InvalidScale(self.scale));
        }
        if !(self.adjacent_stagger.is_finite() && self.adjacent_stagger >= 0.0) {
            return Err(ConfigError::InvalidStagger(self.adjacent_stagger));
        }
        Ok(())
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: HeadingConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_hook_defaults() {
        let config = HeadingConfig::default();
        assert_eq!(config.animation_family, AnimationFamily::Bounce);
        assert_eq!(config.duration, 0.5);
        assert_eq!(config.ease, Easing::elastic_out(1.0, 0.3));
        assert_eq!(config.scale, 1.2);
        assert!(config.enable_squish);
        assert_eq!(config.hover_color, None);
        assert!(!config.add_glow);
        assert_eq!(config.adjacent_stagger, 0.05);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_toml() {
        let config = HeadingConfig::from_toml_str(
            r##"
            animation-family = "varied-per-position"
            duration = 2.0
            ease = "elastic.out(1, 0.3)"
            hover-color = "#4472ca"
            add-glow = true
            adjacent-stagger = 0.12
            "##,
        )
        .unwrap();

        assert_eq!(config.animation_family, AnimationFamily::Varied);
        assert_eq!(config.duration_ms(), 2000.0);
        assert_eq!(config.hover_color, Some(Color::from_hex(0x4472ca)));
        assert!(config.add_glow);
        assert!(config.propagates());
        // Unlisted keys keep their defaults
        assert_eq!(config.scale, 1.2);
    }

    #[test]
    fn test_toml_round_trip() {
        let config = HeadingConfig::default()
            .with_family(AnimationFamily::Squeeze)
            .with_hover_color(Some(Color::from_hex(0x88ce02)));
        let text = config.to_toml().unwrap();
        assert_eq!(HeadingConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            HeadingConfig::default().with_duration(0.0).validate(),
            Err(ConfigError::InvalidDuration(_))
        ));
        assert!(matches!(
            HeadingConfig::default().with_scale(-1.0).validate(),
            Err(ConfigError::InvalidScale(_))
        ));
        assert!(matches!(
            HeadingConfig::default()
                .with_adjacent_stagger(f32::NAN)
                .validate(),
            Err(ConfigError::InvalidStagger(_))
        ));
        assert!(matches!(
            HeadingConfig::from_toml_str(r#"ease = "wobble.out""#),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            HeadingConfig::default().with_ease_str("wobble"),
            Err(ConfigError::Ease(_))
        ));
        assert!(matches!(
            HeadingConfig::default().with_hover_color_str("nope"),
            Err(ConfigError::Color(_))
        ));
    }

    #[test]
    fn test_family_from_str() {
        assert_eq!("wave".parse::<AnimationFamily>(), Ok(AnimationFamily::Wave));
        assert_eq!(
            "random-per-mount".parse::<AnimationFamily>(),
            Ok(AnimationFamily::Random)
        );
        assert!("spin".parse::<AnimationFamily>().is_err());
    }

    #[test]
    fn test_zero_stagger_disables_propagation() {
        assert!(!HeadingConfig::default()
            .with_adjacent_stagger(0.0)
            .propagates());
    }
}

//! Animatable value types
//!
//! Linear interpolation for the values a timeline drives, and the partial
//! property sets a tween step targets.

use kinetype_core::{Color, GlyphTransform};

/// Trait for values that can be linearly interpolated
pub trait Interpolate: Clone {
    /// Linearly interpolate between self and other by factor t.
    ///
    /// `t` is not clamped: overshooting easings produce `t > 1.0` and the
    /// value is expected to overshoot with them.
    fn lerp(&self, other: &Self, t: f32) -> Self;

    /// Check if two values are approximately equal
    fn approx_eq(&self, other: &Self, epsilon: f32) -> bool;
}

// ============================================================================
// f32 Implementation
// ============================================================================

impl Interpolate for f32 {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        self + (other - self) * t
    }

    fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        (self - other).abs() < epsilon
    }
}

// ============================================================================
// GlyphTransform Implementation
// ============================================================================

impl Interpolate for GlyphTransform {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        GlyphTransform {
            y: self.y.lerp(&other.y, t),
            rotation: self.rotation.lerp(&other.rotation, t),
            rotation_x: self.rotation_x.lerp(&other.rotation_x, t),
            skew_x: self.skew_x.lerp(&other.skew_x, t),
            scale_x: self.scale_x.lerp(&other.scale_x, t),
            scale_y: self.scale_y.lerp(&other.scale_y, t),
        }
    }

    fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.y.approx_eq(&other.y, epsilon)
            && self.rotation.approx_eq(&other.rotation, epsilon)
            && self.rotation_x.approx_eq(&other.rotation_x, epsilon)
            && self.skew_x.approx_eq(&other.skew_x, epsilon)
            && self.scale_x.approx_eq(&other.scale_x, epsilon)
            && self.scale_y.approx_eq(&other.scale_y, epsilon)
    }
}

// ============================================================================
// Color Implementation
// ============================================================================

impl Interpolate for Color {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        Color::lerp(self, other, t)
    }

    fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        (self.r - other.r).abs() < epsilon
            && (self.g - other.g).abs() < epsilon
            && (self.b - other.b).abs() < epsilon
            && (self.a - other.a).abs() < epsilon
    }
}

// ============================================================================
// Tween targets
// ============================================================================

/// The properties a single tween step animates towards.
///
/// Unset properties keep whatever value the previous step left them at.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TweenProps {
    pub y: Option<f32>,
    pub rotation: Option<f32>,
    pub rotation_x: Option<f32>,
    pub skew_x: Option<f32>,
    pub scale_x: Option<f32>,
    pub scale_y: Option<f32>,
}

impl TweenProps {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn y(mut self, y: f32) -> Self {
        self.y = Some(y);
        self
    }

    pub fn rotation(mut self, degrees: f32) -> Self {
        self.rotation = Some(degrees);
        self
    }

    pub fn rotation_x(mut self, degrees: f32) -> Self {
        self.rotation_x = Some(degrees);
        self
    }

    pub fn skew_x(mut self, degrees: f32) -> Self {
        self.skew_x = Some(degrees);
        self
    }

    pub fn scale_x(mut self, scale: f32) -> Self {
        self.scale_x = Some(scale);
        self
    }

    pub fn scale_y(mut self, scale: f32) -> Self {
        self.scale_y = Some(scale);
        self
    }

    /// Uniform scale on both axes
    pub fn scale(self, scale: f32) -> Self {
        self.scale_x(scale).scale_y(scale)
    }

    /// The transform reached when this step completes from `from`
    pub fn resolve(&self, from: &GlyphTransform) -> GlyphTransform {
        GlyphTransform {
            y: self.y.unwrap_or(from.y),
            rotation: self.rotation.unwrap_or(from.rotation),
            rotation_x: self.rotation_x.unwrap_or(from.rotation_x),
            skew_x: self.skew_x.unwrap_or(from.skew_x),
            scale_x: self.scale_x.unwrap_or(from.scale_x),
            scale_y: self.scale_y.unwrap_or(from.scale_y),
        }
    }
}

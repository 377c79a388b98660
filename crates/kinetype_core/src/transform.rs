//! Per-glyph transform state
//!
//! The only properties a character unit animates. Everything is a transform,
//! never a layout property, so animating a glyph never reflows its siblings.

/// Transform applied to one glyph, in CSS units (px and degrees)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GlyphTransform {
    /// Vertical offset in px (negative is up)
    pub y: f32,
    /// In-plane rotation in degrees
    pub rotation: f32,
    /// Rotation around the X axis in degrees
    pub rotation_x: f32,
    /// Horizontal skew in degrees
    pub skew_x: f32,
    pub scale_x: f32,
    pub scale_y: f32,
}

impl GlyphTransform {
    pub const IDENTITY: GlyphTransform = GlyphTransform {
        y: 0.0,
        rotation: 0.0,
        rotation_x: 0.0,
        skew_x: 0.0,
        scale_x: 1.0,
        scale_y: 1.0,
    };

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// Render as a CSS `transform` value. Identity renders as `none`.
    pub fn to_css(&self) -> String {
        if self.is_identity() {
            return "none".to_string();
        }

        let mut out = String::new();
        let mut push = |part: String| {
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(&part);
        };

        if self.y != 0.0 {
            push(format!("translateY({}px)", self.y));
        }
        if self.rotation != 0.0 {
            push(format!("rotate({}deg)", self.rotation));
        }
        if self.rotation_x != 0.0 {
            push(format!("rotateX({}deg)", self.rotation_x));
        }
        if self.skew_x != 0.0 {
            push(format!("skewX({}deg)", self.skew_x));
        }
        if self.scale_x != 1.0 || self.scale_y != 1.0 {
            push(format!("scale({}, {})", self.scale_x, self.scale_y));
        }

        out
    }
}

impl Default for GlyphTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_renders_none() {
        assert_eq!(GlyphTransform::default().to_css(), "none");
    }

    #[test]
    fn test_css_lists_only_active_parts() {
        let t = GlyphTransform {
            y: -20.0,
            scale_x: 0.9,
            scale_y: 1.3,
            ..GlyphTransform::IDENTITY
        };
        assert_eq!(t.to_css(), "translateY(-20px) scale(0.9, 1.3)");
    }
}

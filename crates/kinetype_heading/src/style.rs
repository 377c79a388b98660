//! Transient hover styling
//!
//! Color and glow overrides painted on hover and reverted on leave. Both rely
//! on the CSS transitions each span carries, so they are written as plain
//! inline style rather than animated.

use kinetype_core::{Color, Document, NodeId};

use crate::config::HeadingConfig;

/// Text shadow painted while a glowing character is hovered
pub const GLOW_SHADOW: &str = "0 0 20px rgba(59, 130, 246, 0.8), 0 0 30px rgba(59, 130, 246, 0.5)";

/// Temporary color/glow override of one character
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TransientStyle {
    /// Hover color in effect, `None` at baseline
    pub color: Option<Color>,
    pub glow_active: bool,
}

impl TransientStyle {
    /// Style of a hovered character
    pub fn hovered(config: &HeadingConfig) -> Self {
        Self {
            color: config.hover_color,
            glow_active: config.add_glow,
        }
    }

    /// Style at rest
    pub fn baseline() -> Self {
        Self::default()
    }

    pub fn is_baseline(&self) -> bool {
        *self == Self::baseline()
    }
}

/// Inline style writes needed to show `style`. `None` removes the property.
///
/// Properties the configuration never touches are left out entirely, so a
/// heading without a hover color never overrides the host's text color.
pub fn style_patch(
    style: &TransientStyle,
    config: &HeadingConfig,
) -> Vec<(&'static str, Option<String>)> {
    let mut patch = Vec::with_capacity(2);

    if config.hover_color.is_some() {
        let color = style.color.unwrap_or(config.base_color);
        patch.push(("color", Some(color.to_css())));
    }

    if config.add_glow {
        let shadow = style.glow_active.then(|| GLOW_SHADOW.to_string());
        patch.push(("text-shadow", shadow));
    }

    patch
}

/// Paint `style` onto a character span
pub fn apply_transient(
    doc: &mut Document,
    node: NodeId,
    style: &TransientStyle,
    config: &HeadingConfig,
) {
    for (property, value) in style_patch(style, config) {
        match value {
            Some(value) => doc.set_style(node, property, &value),
            None => doc.remove_style(node, property),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(doc: &mut Document) -> NodeId {
        doc.create_text_element("span", "A")
    }

    #[test]
    fn test_no_hover_settings_touch_nothing() {
        let config = HeadingConfig::default();
        assert!(style_patch(&TransientStyle::hovered(&config), &config).is_empty());
        assert!(style_patch(&TransientStyle::baseline(), &config).is_empty());
    }

    #[test]
    fn test_hover_color_and_revert() {
        let config = HeadingConfig::default().with_hover_color(Some(Color::from_hex(0x88CE02)));
        let mut doc = Document::new();
        let node = span(&mut doc);

        apply_transient(&mut doc, node, &TransientStyle::hovered(&config), &config);
        assert_eq!(doc.style(node, "color"), Some("#88ce02"));
        assert_eq!(doc.style(node, "text-shadow"), None);

        apply_transient(&mut doc, node, &TransientStyle::baseline(), &config);
        assert_eq!(doc.style(node, "color"), Some("#ffffff"));
    }

    #[test]
    fn test_hover_color_strings_paint_as_written() {
        for (input, painted) in [("rgb(1, 1, 1)", "#010101"), ("orange", "#ffa500")] {
            let config = HeadingConfig::default().with_hover_color_str(input).unwrap();
            let mut doc = Document::new();
            let node = span(&mut doc);

            apply_transient(&mut doc, node, &TransientStyle::hovered(&config), &config);
            assert_eq!(doc.style(node, "color"), Some(painted), "{}", input);
        }
    }

    #[test]
    fn test_glow_and_revert() {
        let config = HeadingConfig::default().with_glow(true);
        let mut doc = Document::new();
        let node = span(&mut doc);

        apply_transient(&mut doc, node, &TransientStyle::hovered(&config), &config);
        assert_eq!(doc.style(node, "text-shadow"), Some(GLOW_SHADOW));
        assert_eq!(doc.style(node, "color"), None);

        apply_transient(&mut doc, node, &TransientStyle::baseline(), &config);
        assert_eq!(doc.style(node, "text-shadow"), None);
    }

    #[test]
    fn test_custom_base_color() {
        let config = HeadingConfig::default()
            .with_hover_color(Some(Color::RED))
            .with_base_color(Color::BLACK);
        let patch = style_patch(&TransientStyle::baseline(), &config);
        assert_eq!(patch, vec![("color", Some("#000000".to_string()))]);
    }
}

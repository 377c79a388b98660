//! Text segmentation
//!
//! Splits a heading's text into one unit per `char` and rebuilds the element
//! as a row of inline-block spans that can each be transformed without
//! shifting the line's layout.

use kinetype_core::{Document, NodeId};

/// Displayed in place of whitespace so word gaps keep their width once every
/// character sits in its own inline-block.
pub const NBSP: char = '\u{00A0}';

/// Inline style applied to every character span
const SPAN_STYLE: [(&str, &str); 9] = [
    ("display", "inline-block"),
    ("position", "relative"),
    ("cursor", "pointer"),
    ("transition", "text-shadow 0.3s ease, color 0.2s ease"),
    ("transform-origin", "center center"),
    ("will-change", "transform"),
    ("user-select", "none"),
    ("-webkit-user-select", "none"),
    ("transform", "none"),
];

/// One character of the source text
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Segment {
    /// Character as it appeared in the source text
    pub source: char,
    /// Character actually displayed
    pub glyph: char,
}

impl Segment {
    pub fn new(source: char) -> Self {
        let glyph = if source.is_whitespace() { NBSP } else { source };
        Self { source, glyph }
    }

    /// Rebuild the source text from its segments
    pub fn restore(segments: &[Segment]) -> String {
        segments.iter().map(|s| s.source).collect()
    }

    /// Text as displayed, with whitespace substituted
    pub fn display(segments: &[Segment]) -> String {
        segments.iter().map(|s| s.glyph).collect()
    }
}

/// Split text into one segment per character
pub fn segment_text(text: &str) -> Vec<Segment> {
    text.chars().map(Segment::new).collect()
}

/// Replace the contents of `root` with one span per character of `text`.
///
/// The element's computed letter spacing and line height are pinned as
/// inline style first, so splitting does not change the line metrics.
/// Returns each segment with the span created for it, in reading order.
pub fn segment_element(doc: &mut Document, root: NodeId, text: &str) -> Vec<(Segment, NodeId)> {
    if let Some(computed) = doc.computed_style(root).cloned() {
        doc.set_style(root, "letter-spacing", &computed.letter_spacing);
        doc.set_style(root, "line-height", &computed.line_height);
    }

    doc.clear_children(root);

    segment_text(text)
        .into_iter()
        .enumerate()
        .map(|(index, segment)| {
            let span = doc.create_text_element("span", segment.glyph.encode_utf8(&mut [0; 4]));
            for (property, value) in SPAN_STYLE {
                doc.set_style(span, property, value);
            }
            doc.set_data(span, "index", &index.to_string());
            doc.append_child(root, span);
            (segment, span)
        })
        .collect()
}

//! Headless hover session simulation
//!
//! Mounts a heading on an in-memory document, moves a virtual pointer over
//! its characters on a fixed schedule and records what every frame paints.

use anyhow::{bail, Context, Result};
use kinetype_animation::AnimationScheduler;
use kinetype_core::{Document, NodeId, PointerTracker};
use kinetype_heading::{HeadingConfig, HeadingInstance, ResolvedFamily};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

/// Where the pointer goes during a preview
#[derive(Clone, Debug, PartialEq)]
pub enum HoverPlan {
    /// Visit these character indices in order
    Indices(Vec<usize>),
    /// Visit every character left to right
    Sweep,
}

#[derive(Clone, Debug)]
pub struct PreviewOptions {
    pub text: String,
    pub config: HeadingConfig,
    pub plan: HoverPlan,
    /// How long the pointer rests on each character
    pub dwell_ms: f32,
    pub frames: usize,
    pub fps: f32,
    pub seed: Option<u64>,
}

/// What one character looked like at the end of a frame
#[derive(Clone, Debug, Serialize)]
pub struct UnitSnapshot {
    pub index: usize,
    pub glyph: char,
    pub family: ResolvedFamily,
    pub transform: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub glow: bool,
}

/// One rendered frame
#[derive(Clone, Debug, Serialize)]
pub struct FrameSnapshot {
    pub frame: usize,
    pub time_ms: f64,
    pub hovered: Option<usize>,
    pub units: Vec<UnitSnapshot>,
}

/// Frame at which the pointer moves, and where it goes
fn pointer_schedule(plan: &HoverPlan, len: usize, dwell_frames: usize) -> Vec<(usize, Option<usize>)> {
    let targets: Vec<usize> = match plan {
        HoverPlan::Indices(indices) => indices.clone(),
        HoverPlan::Sweep => (0..len).collect(),
    };

    let mut schedule: Vec<(usize, Option<usize>)> = targets
        .iter()
        .enumerate()
        .map(|(step, index)| (step * dwell_frames, Some(*index)))
        .collect();
    schedule.push((targets.len() * dwell_frames, None));
    schedule
}

/// Run a preview session and return every frame
pub fn run(options: &PreviewOptions) -> Result<Vec<FrameSnapshot>> {
    if !(options.fps.is_finite() && options.fps > 0.0) {
        bail!("fps must be positive, got {}", options.fps);
    }
    options
        .config
        .validate()
        .context("invalid heading configuration")?;

    let doc = Document::new().into_shared();
    let h1 = doc.borrow_mut().create_text_element("h1", &options.text);
    let scheduler = AnimationScheduler::new();

    let mut rng = match options.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_rng(&mut rand::rng()),
    };
    let heading = HeadingInstance::mount_with_rng(
        &doc,
        Some(h1),
        options.config.clone(),
        &scheduler.handle(),
        &mut rng,
    )
    .context("failed to mount heading")?;

    if let HoverPlan::Indices(indices) = &options.plan {
        if let Some(bad) = indices.iter().find(|i| **i >= heading.len()) {
            bail!(
                "hover index {} is out of range for {} character(s)",
                bad,
                heading.len()
            );
        }
    }

    let frame_ms = 1000.0 / options.fps;
    let dwell_frames = ((options.dwell_ms / frame_ms).ceil() as usize).max(1);
    let schedule = pointer_schedule(&options.plan, heading.len(), dwell_frames);
    tracing::debug!(
        "previewing {} frame(s) at {:.1}ms, {} pointer move(s)",
        options.frames,
        frame_ms,
        schedule.len()
    );

    let mut pointer = PointerTracker::new();
    let mut hovered = None;
    let mut frames = Vec::with_capacity(options.frames);

    for frame in 0..options.frames {
        for (_, target) in schedule.iter().filter(|(at, _)| *at == frame) {
            hovered = *target;
            pointer.move_to(&doc, target.and_then(|i| heading.node_of(i)));
        }

        scheduler.advance(frame_ms);

        let view = doc.borrow();
        let units = heading
            .units()
            .iter()
            .map(|unit| snapshot(&view, unit.node, unit.index, unit.glyph, unit.family))
            .collect();
        frames.push(FrameSnapshot {
            frame,
            time_ms: scheduler.now_ms(),
            hovered,
            units,
        });
    }

    Ok(frames)
}

fn snapshot(
    doc: &Document,
    node: NodeId,
    index: usize,
    glyph: char,
    family: ResolvedFamily,
) -> UnitSnapshot {
    UnitSnapshot {
        index,
        glyph,
        family,
        transform: doc.style(node, "transform").unwrap_or("none").to_string(),
        color: doc.style(node, "color").map(str::to_string),
        glow: doc.style(node, "text-shadow").is_some(),
    }
}

/// Render frames as a compact text log. Characters at rest are omitted.
pub fn render_text(frames: &[FrameSnapshot]) -> String {
    let mut out = String::new();
    for frame in frames {
        let hovered = frame
            .hovered
            .map_or_else(|| "-".to_string(), |i| i.to_string());
        out.push_str(&format!(
            "#{:<4} {:>8.1}ms  hover {:>2}",
            frame.frame, frame.time_ms, hovered
        ));

        for unit in frame.units.iter().filter(|u| u.transform != "none") {
            out.push_str(&format!("  [{} {}] {}", unit.index, unit.glyph, unit.transform));
        }
        out.push('\n');
    }
    out
}

//! Tween timelines
//!
//! A [`Timeline`] is an ordered sequence of tween steps played back to back
//! against a single [`GlyphTransform`]. Each step's starting values are fixed
//! when the step is appended (they are the previous step's end values), so
//! sampling is a pure function of the playhead and replaying a timeline
//! always looks the same.
//!
//! Timelines are created paused and only move when restarted:
//!
//! ```rust
//! use kinetype_animation::{Easing, Timeline, TweenProps};
//!
//! let mut tl = Timeline::new();
//! tl.to(TweenProps::new().y(-20.0), 200.0, Easing::power2_out())
//!     .to(TweenProps::new().y(0.0), 300.0, Easing::elastic_out(1.0, 0.3));
//!
//! assert!(!tl.is_playing());
//! tl.restart();
//! tl.tick(200.0);
//! assert!((tl.value().y - -20.0).abs() < 1e-4);
//! ```

use kinetype_core::GlyphTransform;

use crate::easing::Easing;
use crate::values::{Interpolate, TweenProps};

/// Playback state of a timeline
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PlayState {
    /// Not advancing; the initial state of every timeline
    #[default]
    Paused,
    Playing,
    /// Reached the end; holds the final values until restarted
    Complete,
    /// Permanently stopped; restart is a no-op
    Killed,
}

#[derive(Clone, Debug)]
struct Step {
    start_ms: f32,
    duration_ms: f32,
    from: GlyphTransform,
    to: GlyphTransform,
    easing: Easing,
}

/// An ordered, restartable sequence of tweens
#[derive(Clone, Debug, Default)]
pub struct Timeline {
    base: GlyphTransform,
    steps: Vec<Step>,
    playhead_ms: f32,
    state: PlayState,
    /// How many times the timeline has been (re)started
    plays: u32,
}

impl Timeline {
    /// Create an empty paused timeline starting from the identity transform
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty paused timeline starting from `base`
    pub fn with_base(base: GlyphTransform) -> Self {
        Self {
            base,
            ..Self::default()
        }
    }

    /// Append a tween towards `props` lasting `duration_ms`
    pub fn to(&mut self, props: TweenProps, duration_ms: f32, easing: Easing) -> &mut Self {
        let from = self.end_value();
        let start_ms = self.duration_ms();
        self.steps.push(Step {
            start_ms,
            duration_ms: duration_ms.max(0.0),
            from,
            to: props.resolve(&from),
            easing,
        });
        self
    }

    /// Total length of all steps
    pub fn duration_ms(&self) -> f32 {
        self.steps
            .last()
            .map_or(0.0, |s| s.start_ms + s.duration_ms)
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// Durations of every step, in order
    pub fn step_durations(&self) -> Vec<f32> {
        self.steps.iter().map(|s| s.duration_ms).collect()
    }

    pub fn state(&self) -> PlayState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlayState::Playing
    }

    pub fn is_killed(&self) -> bool {
        self.state == PlayState::Killed
    }

    pub fn playhead_ms(&self) -> f32 {
        self.playhead_ms
    }

    /// How many times the timeline has been restarted
    pub fn plays(&self) -> u32 {
        self.plays
    }

    /// Overall progress (0.0 to 1.0)
    pub fn progress(&self) -> f32 {
        let duration = self.duration_ms();
        if duration <= 0.0 {
            return if self.plays > 0 { 1.0 } else { 0.0 };
        }
        (self.playhead_ms / duration).clamp(0.0, 1.0)
    }

    /// Reset the playhead to 0 and play forward once.
    ///
    /// Restarting mid-flight discards the current run; nothing is queued.
    pub fn restart(&mut self) {
        if self.is_killed() {
            return;
        }
        self.playhead_ms = 0.0;
        self.state = PlayState::Playing;
        self.plays += 1;
    }

    pub fn pause(&mut self) {
        if self.is_playing() {
            self.state = PlayState::Paused;
        }
    }

    pub fn resume(&mut self) {
        if self.state == PlayState::Paused && self.playhead_ms < self.duration_ms() {
            self.state = PlayState::Playing;
        }
    }

    /// Move the playhead without changing the play state
    pub fn seek(&mut self, time_ms: f32) {
        if self.is_killed() {
            return;
        }
        self.playhead_ms = time_ms.clamp(0.0, self.duration_ms());
    }

    /// Stop permanently. A killed timeline never advances again.
    pub fn kill(&mut self) {
        self.state = PlayState::Killed;
    }

    /// Advance the playhead by `dt_ms` if playing
    pub fn tick(&mut self, dt_ms: f32) {
        if !self.is_playing() {
            return;
        }
        self.playhead_ms += dt_ms.max(0.0);
        let duration = self.duration_ms();
        if self.playhead_ms >= duration {
            self.playhead_ms = duration;
            self.state = PlayState::Complete;
        }
    }

    /// Transform at the current playhead
    pub fn value(&self) -> GlyphTransform {
        self.sample_at(self.playhead_ms)
    }

    /// Transform at an arbitrary time
    pub fn sample_at(&self, time_ms: f32) -> GlyphTransform {
        if time_ms <= 0.0 {
            return self.steps.first().map_or(self.base, |s| s.from);
        }

        for step in &self.steps {
            if time_ms < step.start_ms + step.duration_ms {
                let local = if step.duration_ms > 0.0 {
                    (time_ms - step.start_ms) / step.duration_ms
                } else {
                    1.0
                };
                return step.from.lerp(&step.to, step.easing.apply(local));
            }
        }

        self.end_value()
    }

    /// Transform once every step has completed
    pub fn end_value(&self) -> GlyphTransform {
        self.steps.last().map_or(self.base, |s| s.to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounce() -> Timeline {
        let mut tl = Timeline::new();
        tl.to(TweenProps::new().y(-20.0), 200.0, Easing::power2_out())
            .to(TweenProps::new().y(0.0), 300.0, Easing::elastic_out(1.0, 0.3));
        tl
    }

    #[test]
    fn test_new_timeline_is_paused() {
        let mut tl = bounce();
        assert_eq!(tl.state(), PlayState::Paused);
        tl.tick(100.0);
        assert_eq!(tl.playhead_ms(), 0.0);
        assert_eq!(tl.value(), GlyphTransform::IDENTITY);
    }

    #[test]
    fn test_plays_once_to_completion() {
        let mut tl = bounce();
        tl.restart();
        tl.tick(100.0);
        assert!(tl.value().y < 0.0);
        tl.tick(400.0);
        assert_eq!(tl.state(), PlayState::Complete);
        assert_eq!(tl.playhead_ms(), 500.0);
        assert!(tl.value().approx_eq(&GlyphTransform::IDENTITY, 1e-4));

        // Complete timelines stay put
        tl.tick(100.0);
        assert_eq!(tl.playhead_ms(), 500.0);
    }

    #[test]
    fn test_restart_mid_flight_resets_playhead() {
        let mut tl = bounce();
        tl.restart();
        tl.tick(350.0);
        tl.restart();
        assert_eq!(tl.playhead_ms(), 0.0);

        // A full duration is needed again from the latest restart
        tl.tick(499.0);
        assert!(tl.is_playing());
        tl.tick(1.0);
        assert_eq!(tl.state(), PlayState::Complete);
        assert_eq!(tl.plays(), 2);
    }

    #[test]
    fn test_step_boundaries() {
        let tl = bounce();
        assert_eq!(tl.duration_ms(), 500.0);
        assert_eq!(tl.step_durations(), vec![200.0, 300.0]);
        assert!((tl.sample_at(200.0).y - -20.0).abs() < 1e-4);
    }

    #[test]
    fn test_killed_timeline_ignores_restart() {
        let mut tl = bounce();
        tl.restart();
        tl.tick(50.0);
        tl.kill();
        let frozen = tl.playhead_ms();
        tl.restart();
        tl.tick(50.0);
        assert!(tl.is_killed());
        assert_eq!(tl.playhead_ms(), frozen);
    }

    #[test]
    fn test_pause_resume_seek() {
        let mut tl = bounce();
        tl.restart();
        tl.tick(100.0);
        tl.pause();
        tl.tick(100.0);
        assert_eq!(tl.playhead_ms(), 100.0);
        tl.resume();
        tl.seek(450.0);
        tl.tick(50.0);
        assert_eq!(tl.state(), PlayState::Complete);
    }

    #[test]
    fn test_empty_timeline_holds_base() {
        let base = GlyphTransform {
            rotation: 45.0,
            ..GlyphTransform::IDENTITY
        };
        let mut tl = Timeline::with_base(base);
        tl.restart();
        tl.tick(16.0);
        assert_eq!(tl.value(), base);
        assert_eq!(tl.state(), PlayState::Complete);
    }
}

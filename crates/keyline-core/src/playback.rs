//! # Playback Controller
//!
//! A logical clock driven by the host's tick loop. The controller never
//! mutates the project; it hands the new time back from [`PlaybackController::tick`]
//! and the caller applies it. Because ticks are pull-based, stopping the
//! controller synchronously guarantees no further time updates are emitted.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Playback state machine states.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackState {
    Stopped,
    Playing,
    Paused,
}

/// Advances a logical clock at a fixed frame rate with play/pause/seek/loop
/// semantics, independent of any rendering.
#[derive(Clone, Debug)]
pub struct PlaybackController {
    state: PlaybackState,
    time: f64,
    duration: f64,
    frame_rate: f64,
    looping: bool,
}

impl PlaybackController {
    pub fn new(duration: f64, frame_rate: f64) -> Self {
        Self {
            state: PlaybackState::Stopped,
            time: 0.0,
            duration: duration.max(0.0),
            frame_rate,
            looping: false,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn looping(&self) -> bool {
        self.looping
    }

    pub fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
    }

    /// Starts or resumes playback from the current time (any state).
    pub fn play(&mut self) {
        self.state = PlaybackState::Playing;
    }

    /// Freezes time; only meaningful while playing.
    pub fn pause(&mut self) {
        if self.state == PlaybackState::Playing {
            self.state = PlaybackState::Paused;
        }
    }

    /// Stops playback and resets the clock to zero.
    pub fn stop(&mut self) {
        self.state = PlaybackState::Stopped;
        self.time = 0.0;
    }

    /// Moves the clock without changing the play state.
    pub fn seek(&mut self, t: f64) {
        self.time = t.clamp(0.0, self.duration);
    }

    /// Advances the clock by `elapsed` wall-clock seconds.
    ///
    /// Returns the new time, snapped to the nearest frame boundary, or
    /// `None` when not playing (a paused/stopped controller can never emit
    /// a late tick). Reaching the end either wraps (loop) or parks on the
    /// last frame and transitions to `Paused`.
    pub fn tick(&mut self, elapsed: f64) -> Option<f64> {
        if self.state != PlaybackState::Playing {
            return None;
        }
        let mut t = self.time + elapsed.max(0.0);
        if t >= self.duration {
            if self.looping && self.duration > 0.0 {
                t %= self.duration;
            } else {
                debug!(time = self.duration, "playback reached the end");
                self.state = PlaybackState::Paused;
                t = self.duration;
            }
        }
        self.time = self.snap(t).clamp(0.0, self.duration);
        Some(self.time)
    }

    /// Snaps to the nearest frame boundary so displayed time always lands
    /// on an exact frame.
    fn snap(&self, t: f64) -> f64 {
        if self.frame_rate > 0.0 {
            (t * self.frame_rate).round() / self.frame_rate
        } else {
            t
        }
    }
}

use crate::{playlist::sequencer::Direction, transition::engine::SlideState};

/// Render clock lifecycle. `Playing` and `Paused` alternate; `Stopped` is
/// terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Ticks advance time and produce frames.
    Playing,
    /// Time is frozen; explicit redraws are still allowed.
    Paused,
    /// Session over, resources released.
    Stopped,
}

/// Discrete control commands the host may deliver at any time.
///
/// All of them are safe mid-transition: `Skip` forces the in-flight blend
/// to complete rather than leaving it partial.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Freeze playback (idempotent).
    Pause,
    /// Continue exactly where paused (idempotent, no time jump).
    Resume,
    /// Complete the current transition immediately, or advance to the next
    /// slide when steady.
    Skip,
    /// End the session and release resources.
    Stop,
}

/// Immutable per-tick view of playback state.
///
/// The render clock is the single writer; every other component reads a
/// snapshot taken at the top of the tick instead of locking mid-frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlaybackSnapshot {
    /// Playlist index of the slide on screen (the incoming one while
    /// transitioning).
    pub current: usize,
    /// Seconds the current slide has been on screen.
    pub elapsed_in_slide: f64,
    /// Lifecycle phase.
    pub phase: Phase,
    /// Most recent movement direction.
    pub direction: Direction,
    /// Steady or transitioning, with blend progress.
    pub slide: SlideState,
}

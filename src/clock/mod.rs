//! Playback scheduling: the render clock and its control surface.

pub mod scheduler;
pub mod state;

//! Driftshow is the real-time playback core of a photo slideshow player.
//!
//! It turns a folder of images plus a playback [`Profile`] into a stream of
//! composited frames: a deterministic pan/zoom motion planner (Ken Burns),
//! a transition engine for slide changes, a bounded prefetch cache fed by a
//! decode worker pool, and a render clock that ties them together one tick
//! at a time.
//!
//! # Pipeline overview
//!
//! 1. **Sequence**: `Sequencer` owns the playlist order (sorted or
//!    deterministically shuffled) and advance/rewind with failure skipping.
//! 2. **Prefetch**: `PrefetchCache` decodes a sliding window of upcoming
//!    images on worker threads, never blocking the render thread.
//! 3. **Plan**: `plan` derives each image's pan/zoom path from a seeded
//!    hash, so a given profile + folder + seed replays identically.
//! 4. **Compose**: `RenderClock::tick` samples and blends rasters into one
//!    viewport-sized [`Frame`] per tick.
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Never block the render thread**: decodes happen on the pool; when
//!   pixels are not ready the last composited frame is repeated.
//! - **Deterministic-by-default**: every per-image random choice derives
//!   from `hash(seed, index)`, never from a global RNG.
//! - **Premultiplied RGBA8** end-to-end: decoded rasters and composited
//!   frames all carry premultiplied pixels.
#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![allow(missing_docs_in_private_items)]

mod assets;
mod clock;
mod foundation;
mod motion;
mod playlist;
mod prefetch;
mod profile;
mod render;
mod transition;

pub use assets::decode::{
    DecodeRaster, FsDecoder, Raster, SVG_RASTER_BOX, decode_raster, supported_extension,
};
pub use clock::scheduler::{ClockOptions, RenderClock};
pub use clock::state::{Command, Phase, PlaybackSnapshot};
pub use foundation::core::{Affine, Point, Rect, Rgba8Premul, Vec2, Viewport};
pub use foundation::error::{DriftError, DriftResult};
pub use motion::ease::Ease;
pub use motion::planner::{MotionPath, plan};
pub use playlist::sequencer::{Direction, ImageRef, Sequencer};
pub use prefetch::cache::{CacheConfig, CacheState, CacheStats, PrefetchCache};
pub use profile::model::{DisplayMode, Profile, TransitionSpec};
pub use render::frame::Frame;
pub use render::sampler::sample_into;
pub use transition::engine::{ActiveStyle, SlideState, TransitionEngine};
pub use transition::kind::{SlideDir, TransitionKind, WipeDir, parse_transition};

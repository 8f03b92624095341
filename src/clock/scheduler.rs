use std::{path::PathBuf, sync::Arc, time::Duration};

use crate::{
    assets::decode::{DecodeRaster, FsDecoder, Raster},
    clock::state::{Command, Phase, PlaybackSnapshot},
    foundation::core::Viewport,
    foundation::error::DriftResult,
    motion::planner::{self, MotionPath},
    playlist::sequencer::{Direction, Sequencer},
    prefetch::cache::{CacheConfig, CacheState, PrefetchCache},
    profile::model::Profile,
    render::{frame::Frame, sampler},
    transition::engine::{SlideState, TransitionEngine},
    transition::kind::parse_transition,
};

/// Tuning knobs for a playback session.
#[derive(Clone, Copy, Debug)]
pub struct ClockOptions {
    /// Prefetch cache sizing and retry policy.
    pub cache: CacheConfig,
    /// Decode worker threads.
    pub decode_threads: usize,
}

impl Default for ClockOptions {
    fn default() -> Self {
        Self {
            cache: CacheConfig::default(),
            decode_threads: 2,
        }
    }
}

/// Single authority over playback time and frame production.
///
/// The host owns the tick cadence (fixed or adaptive) and feeds real
/// wall-clock deltas into [`tick`](RenderClock::tick); the clock advances
/// motion and transition state, warms the prefetch window, and composes one
/// frame per tick. It never blocks: when an upcoming raster is not decoded
/// yet the last composited frame is repeated, favoring smooth apparent
/// motion over pixel freshness.
#[derive(Debug)]
pub struct RenderClock {
    profile: Profile,
    viewport: Viewport,
    sequencer: Sequencer,
    cache: PrefetchCache,
    engine: TransitionEngine,
    /// Motion path of the slide on screen (incoming one mid-transition).
    current_path: Option<(usize, MotionPath)>,
    /// Outgoing slide's path, kept alive for transition blending.
    prev_path: Option<(usize, MotionPath)>,
    elapsed: f64,
    phase: Phase,
    force_advance: bool,
    last_frame: Option<Frame>,
}

impl RenderClock {
    /// Start a session with the filesystem decoder.
    pub fn new(profile: Profile, paths: Vec<PathBuf>, viewport: Viewport) -> DriftResult<Self> {
        Self::with_options(
            profile,
            paths,
            viewport,
            ClockOptions::default(),
            Arc::new(FsDecoder),
        )
    }

    /// Start a session with explicit options and a decoder seam.
    ///
    /// Fails fast on an invalid profile or an empty playlist; prefetching
    /// of the initial window starts immediately.
    pub fn with_options(
        profile: Profile,
        paths: Vec<PathBuf>,
        viewport: Viewport,
        options: ClockOptions,
        decoder: Arc<dyn DecodeRaster>,
    ) -> DriftResult<Self> {
        profile.validate()?;
        let kind = parse_transition(&profile.transition)?;
        let sequencer = Sequencer::new(paths, profile.shuffle, profile.seed)?;
        let cache = PrefetchCache::new(
            sequencer.refs(),
            decoder,
            options.cache,
            options.decode_threads,
        )?;
        let engine = TransitionEngine::new(
            kind,
            profile.transition.duration_secs,
            profile.seed,
            sequencer.current(),
        );

        cache.ensure(sequencer.current(), sequencer.direction());
        tracing::debug!(
            images = sequencer.len(),
            display_secs = profile.display_secs,
            "playback session started"
        );

        Ok(Self {
            profile,
            viewport,
            sequencer,
            cache,
            engine,
            current_path: None,
            prev_path: None,
            elapsed: 0.0,
            phase: Phase::Playing,
            force_advance: false,
            last_frame: None,
        })
    }

    /// Immutable state snapshot for this tick.
    pub fn snapshot(&self) -> PlaybackSnapshot {
        PlaybackSnapshot {
            current: self.sequencer.current(),
            elapsed_in_slide: self.elapsed,
            phase: self.phase,
            direction: self.sequencer.direction(),
            slide: self.engine.state(),
        }
    }

    /// Dispatch a discrete control command.
    pub fn command(&mut self, cmd: Command) {
        match cmd {
            Command::Pause => self.pause(),
            Command::Resume => self.resume(),
            Command::Skip => self.skip(),
            Command::Stop => self.stop(),
        }
    }

    /// Freeze playback time. Idempotent; a no-op once stopped.
    pub fn pause(&mut self) {
        if self.phase == Phase::Playing {
            self.phase = Phase::Paused;
        }
    }

    /// Continue playback exactly where it paused. Idempotent.
    pub fn resume(&mut self) {
        if self.phase == Phase::Paused {
            self.phase = Phase::Playing;
        }
    }

    /// Force the in-flight transition to complete, or schedule an immediate
    /// advance when steady.
    pub fn skip(&mut self) {
        if self.phase == Phase::Stopped {
            return;
        }
        if self.engine.skip().is_some() {
            self.prev_path = None;
        } else {
            self.force_advance = true;
        }
    }

    /// End the session: cancel in-flight decodes, release cached rasters.
    pub fn stop(&mut self) {
        if self.phase == Phase::Stopped {
            return;
        }
        self.phase = Phase::Stopped;
        self.cache.cancel();
        self.cache.wait_idle(Duration::from_millis(250));
        self.cache.clear();
        self.current_path = None;
        self.prev_path = None;
        self.last_frame = None;
        tracing::debug!(stats = ?self.cache.stats(), "playback session stopped");
    }

    /// Advance playback by a wall-clock delta and compose one frame.
    ///
    /// Returns `Ok(None)` when paused or stopped; while playing it always
    /// yields a frame (falling back to the last composited one when pixels
    /// are not ready).
    #[tracing::instrument(skip(self), fields(dt_ms = dt.as_millis() as u64))]
    pub fn tick(&mut self, dt: Duration) -> DriftResult<Option<Frame>> {
        if self.phase != Phase::Playing {
            return Ok(None);
        }
        let dt = dt.as_secs_f64().max(0.0);

        if self.engine.advance(dt).is_some() {
            self.prev_path = None;
        }
        self.elapsed += dt;

        self.ensure_current_path();

        if !self.engine.is_transitioning()
            && (self.force_advance || self.elapsed >= self.profile.display_secs)
        {
            self.try_advance();
        }

        self.cache
            .ensure(self.sequencer.current(), self.sequencer.direction());

        let frame = self.compose()?;
        self.last_frame = Some(frame.clone());
        Ok(Some(frame))
    }

    /// Compose one frame without advancing time (e.g. resize while paused).
    pub fn redraw(&mut self) -> DriftResult<Option<Frame>> {
        if self.phase == Phase::Stopped {
            return Ok(None);
        }
        self.ensure_current_path();
        let frame = self.compose()?;
        self.last_frame = Some(frame.clone());
        Ok(Some(frame))
    }

    /// Block until the prefetch workers drain, up to `timeout`.
    ///
    /// Test and teardown helper; playback never waits on decodes.
    pub fn wait_prefetch_idle(&self, timeout: Duration) -> bool {
        self.cache.wait_idle(timeout)
    }

    /// Prefetch cache counters, for diagnostics.
    pub fn cache_stats(&self) -> crate::prefetch::cache::CacheStats {
        self.cache.stats()
    }

    /// Plan the current slide's motion path once its raster is decoded.
    /// Covers session start and advances that were deferred on a raster
    /// that was still in flight.
    fn ensure_current_path(&mut self) {
        let current = self.sequencer.current();
        if self
            .current_path
            .as_ref()
            .is_some_and(|(idx, _)| *idx == current)
        {
            return;
        }
        if let CacheState::Ready(raster) = self.cache.get(current) {
            self.current_path = Some((current, self.plan_for(&raster, current)));
        }
    }

    fn plan_for(&self, raster: &Raster, index: usize) -> MotionPath {
        planner::plan(
            raster.width,
            raster.height,
            self.viewport,
            self.profile.display_mode,
            self.profile.ken_burns,
            self.profile.ken_intensity,
            self.profile.seed,
            index as u64,
        )
    }

    /// Fire a sequencer advance if the next viable slide's raster is ready;
    /// otherwise stay on the current slide and retry next tick.
    fn try_advance(&mut self) {
        let cache = &self.cache;
        let Some(next) = self.sequencer.peek_next(|i| cache.is_failed(i)) else {
            // Every entry is currently failed; keep showing what we have.
            self.force_advance = false;
            return;
        };

        let CacheState::Ready(raster) = self.cache.get(next) else {
            return;
        };

        let path = self.plan_for(&raster, next);
        self.prev_path = self.current_path.take();
        self.current_path = Some((next, path));
        self.sequencer.commit(next, Direction::Forward);
        self.engine.begin(next);
        if !self.engine.is_transitioning() {
            // Hard cut; no outgoing raster to blend.
            self.prev_path = None;
        }

        if self.force_advance {
            self.elapsed = 0.0;
            self.force_advance = false;
        } else {
            // Carry the overshoot so slide timing does not drift; after a
            // long decode stall, restart the slide timer instead.
            let rem = self.elapsed - self.profile.display_secs;
            self.elapsed = if rem >= self.profile.display_secs {
                0.0
            } else {
                rem.max(0.0)
            };
        }
    }

    fn compose(&mut self) -> DriftResult<Frame> {
        let fallback = |last: &Option<Frame>, viewport: Viewport| {
            last.clone().unwrap_or_else(|| Frame::black(viewport))
        };

        let frame = match self.engine.state() {
            SlideState::Steady(idx) => match self.steady_pixels(idx) {
                Some(rgba8_premul) => Frame {
                    width: self.viewport.width,
                    height: self.viewport.height,
                    rgba8_premul,
                    filename: self.overlay_filename(idx),
                },
                None => fallback(&self.last_frame, self.viewport),
            },
            SlideState::Transitioning {
                prev,
                next,
                progress,
            } => match self.transition_pixels(prev, next, progress)? {
                Some(rgba8_premul) => Frame {
                    width: self.viewport.width,
                    height: self.viewport.height,
                    rgba8_premul,
                    filename: self.overlay_filename(next),
                },
                None => fallback(&self.last_frame, self.viewport),
            },
        };
        Ok(frame)
    }

    fn steady_pixels(&self, idx: usize) -> Option<Vec<u8>> {
        let (path_idx, path) = self.current_path.as_ref()?;
        if *path_idx != idx {
            return None;
        }
        let CacheState::Ready(raster) = self.cache.get(idx) else {
            return None;
        };

        let t = (self.elapsed / self.profile.display_secs).clamp(0.0, 1.0);
        let mut buf = vec![0u8; self.viewport.byte_len()];
        sampler::sample_into(
            &mut buf,
            self.viewport,
            &raster,
            path.at(t),
            self.profile.display_mode,
        );
        Some(buf)
    }

    fn transition_pixels(
        &self,
        prev: usize,
        next: usize,
        progress: f64,
    ) -> DriftResult<Option<Vec<u8>>> {
        let Some(style) = self.engine.active_style() else {
            return Ok(None);
        };
        let Some((out_idx, out_path)) = self.prev_path.as_ref() else {
            return Ok(None);
        };
        let Some((in_idx, in_path)) = self.current_path.as_ref() else {
            return Ok(None);
        };
        if *out_idx != prev || *in_idx != next {
            return Ok(None);
        }
        let (CacheState::Ready(out_raster), CacheState::Ready(in_raster)) =
            (self.cache.get(prev), self.cache.get(next))
        else {
            return Ok(None);
        };

        // The outgoing slide's motion is frozen at its final framing; the
        // incoming one starts moving from the moment the transition began.
        let t_in = (self.elapsed / self.profile.display_secs).clamp(0.0, 1.0);
        let mut outgoing = vec![0u8; self.viewport.byte_len()];
        let mut incoming = vec![0u8; self.viewport.byte_len()];
        sampler::sample_into(
            &mut outgoing,
            self.viewport,
            &out_raster,
            out_path.at(1.0),
            self.profile.display_mode,
        );
        sampler::sample_into(
            &mut incoming,
            self.viewport,
            &in_raster,
            in_path.at(t_in),
            self.profile.display_mode,
        );

        let mut dst = vec![0u8; self.viewport.byte_len()];
        style.blend_into(&mut dst, &outgoing, &incoming, progress, self.viewport)?;
        Ok(Some(dst))
    }

    fn overlay_filename(&self, idx: usize) -> Option<String> {
        if !self.profile.show_filename {
            return None;
        }
        self.sequencer
            .refs()
            .get(idx)
            .and_then(|r| r.path.file_name().map(|n| n.to_string_lossy().into_owned()))
    }
}

impl Drop for RenderClock {
    fn drop(&mut self) {
        self.cache.cancel();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/clock/scheduler.rs"]
mod tests;

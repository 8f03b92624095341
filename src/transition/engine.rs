use crate::{
    foundation::core::Viewport,
    foundation::error::DriftResult,
    foundation::math::stable_hash64,
    transition::blend,
    transition::kind::{SlideDir, TransitionKind, WipeDir},
};

// Salts 0..=7 belong to the motion planner; direction resolution for the
// transition window uses its own.
const SALT_WIPE_DIR: u8 = 8;
const SALT_SLIDE_DIR: u8 = 9;

/// Per-slide-change state, exhaustively matched during composition.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SlideState {
    /// One image on screen, no blend in flight.
    Steady(usize),
    /// Outgoing and incoming images blended over the transition window.
    Transitioning {
        /// Playlist index of the outgoing image.
        prev: usize,
        /// Playlist index of the incoming image.
        next: usize,
        /// Blend progress, monotonic within `[0, 1]`.
        progress: f64,
    },
}

/// Transition style with per-slide direction choices resolved.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ActiveStyle {
    /// Linear alpha blend.
    Crossfade,
    /// Directional cutoff with optional feather.
    Wipe {
        /// Resolved travel direction.
        dir: WipeDir,
        /// Feather width fraction.
        soft_edge: f32,
    },
    /// Incoming slide pushes in.
    Slide {
        /// Resolved entry direction.
        dir: SlideDir,
    },
    /// Down to black, then up.
    FadeToBlack,
}

impl ActiveStyle {
    /// Blend outgoing `a` and incoming `b` into `dst` at progress `t`.
    pub fn blend_into(
        self,
        dst: &mut [u8],
        a: &[u8],
        b: &[u8],
        t: f64,
        viewport: Viewport,
    ) -> DriftResult<()> {
        let t = t as f32;
        match self {
            Self::Crossfade => blend::crossfade_in_place(dst, a, b, t),
            Self::Wipe { dir, soft_edge } => blend::wipe_in_place(
                dst,
                a,
                b,
                t,
                dir,
                soft_edge,
                viewport.width,
                viewport.height,
            ),
            Self::Slide { dir } => {
                blend::slide_in_place(dst, a, b, t, dir, viewport.width, viewport.height)
            }
            Self::FadeToBlack => blend::fade_black_in_place(dst, a, b, t),
        }
    }
}

/// Drives the `Steady -> Transitioning -> Steady` state machine.
///
/// Only one transition is in flight at a time. An advance requested while
/// transitioning is queued and starts only after the current window
/// completes deterministically at exactly 1.0; `skip` forces immediate
/// completion, never a partial jump into the next transition.
#[derive(Debug)]
pub struct TransitionEngine {
    kind: TransitionKind,
    duration_secs: f64,
    seed: u64,
    state: SlideState,
    active: Option<ActiveStyle>,
    queued: Option<usize>,
}

impl TransitionEngine {
    /// New engine showing `initial` in steady state.
    pub fn new(kind: TransitionKind, duration_secs: f64, seed: u64, initial: usize) -> Self {
        Self {
            kind,
            duration_secs,
            seed,
            state: SlideState::Steady(initial),
            active: None,
            queued: None,
        }
    }

    /// Current slide-change state.
    pub fn state(&self) -> SlideState {
        self.state
    }

    /// Resolved style of the in-flight transition, if any.
    pub fn active_style(&self) -> Option<ActiveStyle> {
        self.active
    }

    /// True while a blend window is in flight.
    pub fn is_transitioning(&self) -> bool {
        matches!(self.state, SlideState::Transitioning { .. })
    }

    /// Request a slide change to `next`.
    ///
    /// Returns `true` when the change took effect immediately (hard cut or
    /// transition started); `false` when it was queued behind an in-flight
    /// transition.
    pub fn begin(&mut self, next: usize) -> bool {
        match self.state {
            SlideState::Transitioning { .. } => {
                self.queued = Some(next);
                false
            }
            SlideState::Steady(current) => {
                if self.duration_secs <= 0.0 || self.kind == TransitionKind::None {
                    self.state = SlideState::Steady(next);
                    return true;
                }
                self.active = Some(self.resolve_style(next));
                self.state = SlideState::Transitioning {
                    prev: current,
                    next,
                    progress: 0.0,
                };
                true
            }
        }
    }

    /// Advance progress by `dt` seconds at a rate of `1 / duration`.
    ///
    /// Returns the incoming index when a transition completed during this
    /// call. Progress is monotonic and lands on exactly 1.0.
    pub fn advance(&mut self, dt: f64) -> Option<usize> {
        let SlideState::Transitioning {
            prev,
            next,
            progress,
        } = self.state
        else {
            return None;
        };

        let step = if self.duration_secs > 0.0 {
            dt / self.duration_secs
        } else {
            1.0
        };
        let progress = (progress + step.max(0.0)).min(1.0);

        if progress >= 1.0 {
            self.finish(next);
            return Some(next);
        }
        self.state = SlideState::Transitioning {
            prev,
            next,
            progress,
        };
        None
    }

    /// Force the in-flight transition to complete immediately.
    ///
    /// Returns the incoming index when a transition was cut short. Steady
    /// state is unaffected.
    pub fn skip(&mut self) -> Option<usize> {
        if let SlideState::Transitioning { next, .. } = self.state {
            self.finish(next);
            return Some(next);
        }
        None
    }

    fn finish(&mut self, next: usize) {
        self.state = SlideState::Steady(next);
        self.active = None;
        if let Some(queued) = self.queued.take() {
            self.begin(queued);
        }
    }

    fn resolve_style(&self, next: usize) -> ActiveStyle {
        match self.kind {
            // Cut paths never reach here; begin() short-circuits them.
            TransitionKind::None | TransitionKind::Crossfade => ActiveStyle::Crossfade,
            TransitionKind::FadeToBlack => ActiveStyle::FadeToBlack,
            TransitionKind::Wipe { dir, soft_edge } => ActiveStyle::Wipe {
                dir: dir.unwrap_or_else(|| {
                    match stable_hash64(self.seed, next as u64, SALT_WIPE_DIR) % 4 {
                        0 => WipeDir::LeftToRight,
                        1 => WipeDir::RightToLeft,
                        2 => WipeDir::TopToBottom,
                        _ => WipeDir::BottomToTop,
                    }
                }),
                soft_edge,
            },
            TransitionKind::Slide { dir } => ActiveStyle::Slide {
                dir: dir.unwrap_or_else(|| {
                    match stable_hash64(self.seed, next as u64, SALT_SLIDE_DIR) % 4 {
                        0 => SlideDir::FromLeft,
                        1 => SlideDir::FromRight,
                        2 => SlideDir::FromTop,
                        _ => SlideDir::FromBottom,
                    }
                }),
            },
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/transition/engine.rs"]
mod tests;

use std::{
    path::PathBuf,
    sync::{Arc, OnceLock},
};

use crate::{
    foundation::error::{DriftError, DriftResult},
    foundation::math::stable_hash64,
};

const SALT_SHUFFLE: u8 = 10;

/// Playback direction, used as the prefetch tie-break bias.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Direction {
    /// Advancing through the playlist.
    #[default]
    Forward,
    /// Rewinding through the playlist.
    Backward,
}

/// One playlist entry: a file path with its stable playback index.
///
/// Created once from the folder listing at session start and immutable
/// afterwards; intrinsic dimensions are observed lazily on first decode.
#[derive(Debug)]
pub struct ImageRef {
    /// Source file path.
    pub path: PathBuf,
    /// Stable index in playback order.
    pub index: usize,
    dims: OnceLock<(u32, u32)>,
}

impl ImageRef {
    /// Intrinsic (width, height), if a decode has observed them.
    pub fn intrinsic(&self) -> Option<(u32, u32)> {
        self.dims.get().copied()
    }

    /// Record intrinsic dimensions from the first successful decode.
    pub(crate) fn record_intrinsic(&self, width: u32, height: u32) {
        let _ = self.dims.set((width, height));
    }
}

/// Owns the ordered (or deterministically shuffled) playlist and the
/// advance/rewind logic.
///
/// Failure handling is delegated through a `skip` predicate: the render
/// clock passes the prefetch cache's failure sentinels, so entries that
/// exhausted their retry are skipped without the sequencer knowing about
/// decoding at all.
#[derive(Debug)]
pub struct Sequencer {
    refs: Arc<Vec<ImageRef>>,
    current: usize,
    direction: Direction,
}

impl Sequencer {
    /// Build a sequencer over `paths`, optionally shuffled by `seed`.
    ///
    /// Shuffling sorts entries by a seeded hash of their folder position,
    /// so the same seed and folder contents always produce the same order.
    pub fn new(paths: Vec<PathBuf>, shuffle: bool, seed: u64) -> DriftResult<Self> {
        if paths.is_empty() {
            return Err(DriftError::EmptyPlaylist);
        }

        let mut order: Vec<usize> = (0..paths.len()).collect();
        if shuffle {
            order.sort_by_key(|&i| (stable_hash64(seed, i as u64, SALT_SHUFFLE), i));
        }

        let mut paths: Vec<Option<PathBuf>> = paths.into_iter().map(Some).collect();
        let refs = order
            .into_iter()
            .enumerate()
            .map(|(index, folder_pos)| ImageRef {
                path: paths[folder_pos].take().unwrap_or_default(),
                index,
                dims: OnceLock::new(),
            })
            .collect();

        Ok(Self {
            refs: Arc::new(refs),
            current: 0,
            direction: Direction::Forward,
        })
    }

    /// Shared handle to the playlist entries, in playback order.
    pub fn refs(&self) -> Arc<Vec<ImageRef>> {
        Arc::clone(&self.refs)
    }

    /// Number of playlist entries.
    pub fn len(&self) -> usize {
        self.refs.len()
    }

    /// True when the playlist is empty (never, post-construction).
    pub fn is_empty(&self) -> bool {
        self.refs.is_empty()
    }

    /// Index of the entry currently on screen.
    pub fn current(&self) -> usize {
        self.current
    }

    /// Most recent movement direction.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Next viable index going forward, without committing to it.
    ///
    /// Wraps around; entries for which `skip` returns true are passed over.
    /// Returns `None` when every entry (including the current one) is
    /// skipped.
    pub fn peek_next(&self, skip: impl Fn(usize) -> bool) -> Option<usize> {
        self.scan(1, skip)
    }

    /// Next viable index going backward, without committing to it.
    pub fn peek_prev(&self, skip: impl Fn(usize) -> bool) -> Option<usize> {
        self.scan(-1, skip)
    }

    /// Commit a previously peeked index as current.
    pub fn commit(&mut self, index: usize, direction: Direction) {
        debug_assert!(index < self.refs.len());
        self.current = index;
        self.direction = direction;
    }

    /// Peek and commit in one step.
    pub fn advance(&mut self, skip: impl Fn(usize) -> bool) -> Option<usize> {
        let next = self.peek_next(skip)?;
        self.commit(next, Direction::Forward);
        Some(next)
    }

    /// Peek backward and commit in one step.
    pub fn rewind(&mut self, skip: impl Fn(usize) -> bool) -> Option<usize> {
        let prev = self.peek_prev(skip)?;
        self.commit(prev, Direction::Backward);
        Some(prev)
    }

    fn scan(&self, step: isize, skip: impl Fn(usize) -> bool) -> Option<usize> {
        let len = self.refs.len() as isize;
        for k in 1..=len {
            let idx = (self.current as isize + step * k).rem_euclid(len) as usize;
            if !skip(idx) {
                return Some(idx);
            }
        }
        None
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playlist/sequencer.rs"]
mod tests;

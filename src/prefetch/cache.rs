use std::{
    collections::{HashMap, HashSet},
    sync::{
        Arc, Condvar, Mutex,
        atomic::{AtomicBool, AtomicU64, Ordering},
    },
    time::Duration,
};

use crate::{
    assets::decode::{DecodeRaster, Raster},
    foundation::error::{DriftError, DriftResult},
    playlist::sequencer::{Direction, ImageRef},
};

/// Sizing and retry policy for the prefetch cache.
#[derive(Clone, Copy, Debug)]
pub struct CacheConfig {
    /// Indices decoded ahead of the current one.
    pub lookahead: usize,
    /// Indices kept behind the current one (transition blending needs the
    /// outgoing raster).
    pub margin: usize,
    /// Backpressure bound: no new decodes are issued while this many are in
    /// flight.
    pub max_pending: usize,
    /// Total decode attempts per entry per session (first try + retries).
    pub max_attempts: u8,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            lookahead: 3,
            margin: 1,
            max_pending: 8,
            max_attempts: 2,
        }
    }
}

impl CacheConfig {
    /// Largest number of entries the visibility window can pin.
    pub fn window_capacity(&self) -> usize {
        self.lookahead + self.margin + 1
    }
}

/// Non-blocking lookup result.
#[derive(Clone, Debug)]
pub enum CacheState {
    /// Decoded raster, pixel buffer shared, not copied.
    Ready(Raster),
    /// Not decoded yet (missing or in flight); caller repeats its last
    /// composited frame instead of stalling.
    NotReady,
    /// Decode failed; sentinel so the entry is not retried every tick.
    Failed,
}

/// Operation counters, mirrored from the worker side.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Successful decodes.
    pub decodes_ok: u64,
    /// Failed decode attempts.
    pub decodes_failed: u64,
    /// Tasks abandoned before decoding (cancelled or window moved on).
    pub decodes_abandoned: u64,
    /// Ready entries evicted.
    pub evictions: u64,
    /// Ensure passes that hit the pending backpressure bound.
    pub exhausted_passes: u64,
}

#[derive(Clone, Debug)]
enum Slot {
    Ready(Raster),
    Pending { attempts: u8 },
    Failed { attempts: u8 },
}

#[derive(Debug)]
struct Entry {
    slot: Slot,
    last_access: u64,
}

#[derive(Debug, Default)]
struct CacheMap {
    entries: HashMap<usize, Entry>,
    window: HashSet<usize>,
    pending: usize,
}

struct Shared {
    map: Mutex<CacheMap>,
    idle: Condvar,
    cancelled: AtomicBool,
    access_tick: AtomicU64,
    refs: Arc<Vec<ImageRef>>,
    decoder: Arc<dyn DecodeRaster>,
    config: CacheConfig,
    decodes_ok: AtomicU64,
    decodes_failed: AtomicU64,
    decodes_abandoned: AtomicU64,
    evictions: AtomicU64,
    exhausted_passes: AtomicU64,
}

/// Bounded cache of decoded rasters, populated by a fixed worker pool.
///
/// The entry map is the only structure touched by multiple threads; every
/// mutation goes through one mutex held for O(1) work only. Decoding itself
/// always happens outside the lock on a pool worker, and cancellation is
/// cooperative: each task re-checks the cancel flag and the live window
/// before spending any decode time.
pub struct PrefetchCache {
    shared: Arc<Shared>,
    pool: rayon::ThreadPool,
}

impl PrefetchCache {
    /// Build a cache over the playlist entries with `threads` decode
    /// workers.
    pub fn new(
        refs: Arc<Vec<ImageRef>>,
        decoder: Arc<dyn DecodeRaster>,
        config: CacheConfig,
        threads: usize,
    ) -> DriftResult<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads.max(1))
            .thread_name(|i| format!("driftshow-decode-{i}"))
            .build()
            .map_err(|e| DriftError::resource_exhausted(format!("decode pool: {e}")))?;

        Ok(Self {
            shared: Arc::new(Shared {
                map: Mutex::new(CacheMap::default()),
                idle: Condvar::new(),
                cancelled: AtomicBool::new(false),
                access_tick: AtomicU64::new(0),
                refs,
                decoder,
                config,
                decodes_ok: AtomicU64::new(0),
                decodes_failed: AtomicU64::new(0),
                decodes_abandoned: AtomicU64::new(0),
                evictions: AtomicU64::new(0),
                exhausted_passes: AtomicU64::new(0),
            }),
            pool,
        })
    }

    /// Warm the visibility window `[current-margin, current+lookahead]`.
    ///
    /// Missing indices are enqueued closest-first, ties broken toward the
    /// playback direction; entries already resident, in flight, or past
    /// their retry budget are left alone. Ready entries that fell outside
    /// the window are evicted in LRU order; in-window entries are pinned.
    pub fn ensure(&self, current: usize, direction: Direction) {
        if self.shared.cancelled.load(Ordering::Acquire) {
            return;
        }

        let targets = self.window_order(current, direction);
        let window: HashSet<usize> = targets.iter().copied().collect();
        let mut jobs = Vec::new();

        {
            let mut map = lock_map(&self.shared);
            map.window = window;

            for &idx in &targets {
                let attempts = match map.entries.get(&idx) {
                    None => 0,
                    Some(Entry {
                        slot: Slot::Failed { attempts },
                        ..
                    }) if *attempts < self.shared.config.max_attempts => *attempts,
                    _ => continue,
                };

                if map.pending >= self.shared.config.max_pending {
                    self.shared.exhausted_passes.fetch_add(1, Ordering::Relaxed);
                    tracing::debug!(
                        pending = map.pending,
                        "prefetch backpressure: deferring decode requests"
                    );
                    break;
                }

                map.entries.insert(
                    idx,
                    Entry {
                        slot: Slot::Pending { attempts },
                        last_access: self.next_tick(),
                    },
                );
                map.pending += 1;
                jobs.push(idx);
            }

            self.evict_locked(&mut map);
        }

        for idx in jobs {
            let shared = Arc::clone(&self.shared);
            self.pool.spawn(move || decode_task(&shared, idx));
        }
    }

    /// Non-blocking lookup; refreshes the LRU tick on a hit.
    pub fn get(&self, index: usize) -> CacheState {
        let mut map = lock_map(&self.shared);
        let tick = self.next_tick();
        match map.entries.get_mut(&index) {
            Some(Entry {
                slot: Slot::Ready(raster),
                last_access,
            }) => {
                *last_access = tick;
                CacheState::Ready(raster.clone())
            }
            Some(Entry {
                slot: Slot::Failed { .. },
                ..
            }) => CacheState::Failed,
            _ => CacheState::NotReady,
        }
    }

    /// True when the entry is currently marked failed (retry may still be
    /// pending in a later ensure pass).
    pub fn is_failed(&self, index: usize) -> bool {
        matches!(self.get(index), CacheState::Failed)
    }

    /// True once the entry has exhausted its decode attempts for the
    /// session.
    pub fn failed_permanently(&self, index: usize) -> bool {
        let map = lock_map(&self.shared);
        matches!(
            map.entries.get(&index),
            Some(Entry {
                slot: Slot::Failed { attempts },
                ..
            }) if *attempts >= self.shared.config.max_attempts
        )
    }

    /// Cooperatively cancel in-flight work; workers abandon tasks at their
    /// next check.
    pub fn cancel(&self) {
        self.shared.cancelled.store(true, Ordering::Release);
    }

    /// Drop every entry and forget the window. Failure sentinels are kept
    /// so exhausted entries stay skipped for the rest of the session.
    pub fn clear(&self) {
        let mut map = lock_map(&self.shared);
        map.window.clear();
        map.entries.retain(|_, e| matches!(e.slot, Slot::Failed { .. }));
    }

    /// Block until no decode is in flight, up to `timeout`.
    ///
    /// Used at session teardown and by tests; the render thread never calls
    /// this during playback.
    pub fn wait_idle(&self, timeout: Duration) -> bool {
        let mut map = lock_map(&self.shared);
        let deadline = std::time::Instant::now() + timeout;
        while map.pending > 0 {
            let now = std::time::Instant::now();
            if now >= deadline {
                return false;
            }
            let (guard, _) = self
                .shared
                .idle
                .wait_timeout(map, deadline - now)
                .unwrap_or_else(|e| e.into_inner());
            map = guard;
        }
        true
    }

    /// Number of ready entries inside the current window (pinned).
    pub fn pinned_ready(&self) -> usize {
        let map = lock_map(&self.shared);
        map.entries
            .iter()
            .filter(|(idx, e)| map.window.contains(idx) && matches!(e.slot, Slot::Ready(_)))
            .count()
    }

    /// Total ready entries resident in the cache.
    pub fn resident_ready(&self) -> usize {
        let map = lock_map(&self.shared);
        map.entries
            .values()
            .filter(|e| matches!(e.slot, Slot::Ready(_)))
            .count()
    }

    /// Snapshot of the operation counters.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            decodes_ok: self.shared.decodes_ok.load(Ordering::Relaxed),
            decodes_failed: self.shared.decodes_failed.load(Ordering::Relaxed),
            decodes_abandoned: self.shared.decodes_abandoned.load(Ordering::Relaxed),
            evictions: self.shared.evictions.load(Ordering::Relaxed),
            exhausted_passes: self.shared.exhausted_passes.load(Ordering::Relaxed),
        }
    }

    fn next_tick(&self) -> u64 {
        self.shared.access_tick.fetch_add(1, Ordering::Relaxed)
    }

    /// Window indices in decode priority order: ascending distance from
    /// `current`, ahead-of-playback first on ties.
    fn window_order(&self, current: usize, direction: Direction) -> Vec<usize> {
        let len = self.shared.refs.len() as isize;
        let ahead: isize = match direction {
            Direction::Forward => 1,
            Direction::Backward => -1,
        };
        let cfg = self.shared.config;

        let mut order = Vec::with_capacity(cfg.window_capacity());
        let mut seen = HashSet::new();
        let mut push = |idx: isize| {
            let idx = idx.rem_euclid(len) as usize;
            if seen.insert(idx) {
                order.push(idx);
            }
        };

        push(current as isize);
        for d in 1..=cfg.lookahead.max(cfg.margin) as isize {
            if d <= cfg.lookahead as isize {
                push(current as isize + ahead * d);
            }
            if d <= cfg.margin as isize {
                push(current as isize - ahead * d);
            }
        }
        order
    }

    fn evict_locked(&self, map: &mut CacheMap) {
        let capacity = self.shared.config.window_capacity();
        let ready: usize = map
            .entries
            .values()
            .filter(|e| matches!(e.slot, Slot::Ready(_)))
            .count();
        if ready <= capacity {
            return;
        }

        let mut evictable: Vec<(u64, usize)> = map
            .entries
            .iter()
            .filter(|(idx, e)| !map.window.contains(idx) && matches!(e.slot, Slot::Ready(_)))
            .map(|(idx, e)| (e.last_access, *idx))
            .collect();
        evictable.sort_unstable();

        let excess = ready - capacity;
        for &(_, idx) in evictable.iter().take(excess) {
            map.entries.remove(&idx);
            self.shared.evictions.fetch_add(1, Ordering::Relaxed);
            tracing::trace!(index = idx, "evicted raster outside visibility window");
        }
    }
}

impl std::fmt::Debug for PrefetchCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let map = lock_map(&self.shared);
        f.debug_struct("PrefetchCache")
            .field("entries", &map.entries.len())
            .field("pending", &map.pending)
            .field("window", &map.window.len())
            .finish()
    }
}

fn lock_map(shared: &Shared) -> std::sync::MutexGuard<'_, CacheMap> {
    shared.map.lock().unwrap_or_else(|e| e.into_inner())
}

fn decode_task(shared: &Shared, index: usize) {
    if shared.cancelled.load(Ordering::Acquire) {
        abandon(shared, index);
        return;
    }
    {
        let map = lock_map(shared);
        if !map.window.contains(&index) {
            drop(map);
            abandon(shared, index);
            return;
        }
    }

    let image = &shared.refs[index];
    let result = shared.decoder.decode(&image.path);

    let mut map = lock_map(shared);
    let attempts = match map.entries.get(&index) {
        Some(Entry {
            slot: Slot::Pending { attempts },
            ..
        }) => *attempts,
        // Entry vanished (cleared mid-decode); just settle the counter.
        _ => {
            settle_pending(shared, &mut map);
            shared.decodes_abandoned.fetch_add(1, Ordering::Relaxed);
            return;
        }
    };

    let tick = shared.access_tick.fetch_add(1, Ordering::Relaxed);
    match result {
        Ok(raster) => {
            image.record_intrinsic(raster.width, raster.height);
            tracing::trace!(
                index,
                width = raster.width,
                height = raster.height,
                "decoded raster"
            );
            map.entries.insert(
                index,
                Entry {
                    slot: Slot::Ready(raster),
                    last_access: tick,
                },
            );
            shared.decodes_ok.fetch_add(1, Ordering::Relaxed);
        }
        Err(err) => {
            let attempts = attempts.saturating_add(1);
            tracing::warn!(
                index,
                path = %image.path.display(),
                attempts,
                error = %err,
                "decode failed"
            );
            map.entries.insert(
                index,
                Entry {
                    slot: Slot::Failed { attempts },
                    last_access: tick,
                },
            );
            shared.decodes_failed.fetch_add(1, Ordering::Relaxed);
        }
    }
    settle_pending(shared, &mut map);
}

fn abandon(shared: &Shared, index: usize) {
    let mut map = lock_map(shared);
    if matches!(
        map.entries.get(&index),
        Some(Entry {
            slot: Slot::Pending { .. },
            ..
        })
    ) {
        map.entries.remove(&index);
    }
    shared.decodes_abandoned.fetch_add(1, Ordering::Relaxed);
    settle_pending(shared, &mut map);
}

fn settle_pending(shared: &Shared, map: &mut CacheMap) {
    map.pending = map.pending.saturating_sub(1);
    if map.pending == 0 {
        shared.idle.notify_all();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/prefetch/cache.rs"]
mod tests;

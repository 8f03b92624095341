use kurbo::{Affine, Rect, Vec2};

use crate::{
    foundation::core::Viewport,
    foundation::math::{hash01, hash_sign},
    motion::ease::Ease,
    profile::model::DisplayMode,
};

// Hash salts for the per-image motion parameters. Each independently
// varied framing choice gets its own salt.
const SALT_ZOOM_JITTER: u8 = 0;
const SALT_END_ZOOM: u8 = 1;
const SALT_START_DISTANCE: u8 = 2;
const SALT_START_SIGN_X: u8 = 3;
const SALT_START_SIGN_Y: u8 = 4;
const SALT_END_DISTANCE: u8 = 5;
const SALT_END_SIGN_X: u8 = 6;
const SALT_END_SIGN_Y: u8 = 7;

/// Time-parameterized pan/zoom path over one source raster.
///
/// The path is a pair of view rectangles in source pixel space plus an
/// easing curve; `at(t)` interpolates between them. Both endpoints are
/// clamped inside the source bounds at plan time, and corner interpolation
/// of two in-bounds rectangles stays in-bounds, so no frame ever samples
/// outside the raster.
#[derive(Clone, Debug, PartialEq)]
pub struct MotionPath {
    start: Rect,
    end: Rect,
    source: Rect,
    ease: Ease,
}

impl MotionPath {
    /// View rectangle at normalized time `t` (clamped to `[0, 1]`).
    pub fn at(&self, t: f64) -> Rect {
        let e = self.ease.apply(t);
        Rect::new(
            lerp(self.start.x0, self.end.x0, e),
            lerp(self.start.y0, self.end.y0, e),
            lerp(self.start.x1, self.end.x1, e),
            lerp(self.start.y1, self.end.y1, e),
        )
    }

    /// Affine mapping source pixel coordinates onto the viewport at time `t`.
    ///
    /// Pan-and-scan fills the viewport; letterbox scales uniformly and
    /// centers, leaving bars on the mismatched axis.
    pub fn transform_at(&self, t: f64, viewport: Viewport, mode: DisplayMode) -> Affine {
        let view = self.at(t);
        let vw = f64::from(viewport.width);
        let vh = f64::from(viewport.height);

        match mode {
            DisplayMode::PanScan => {
                let sx = vw / view.width();
                let sy = vh / view.height();
                Affine::scale_non_uniform(sx, sy)
                    * Affine::translate(Vec2::new(-view.x0, -view.y0))
            }
            DisplayMode::Letterbox => {
                let s = (vw / view.width()).min(vh / view.height());
                let dx = (vw - view.width() * s) / 2.0;
                let dy = (vh - view.height() * s) / 2.0;
                Affine::translate(Vec2::new(dx, dy))
                    * Affine::scale(s)
                    * Affine::translate(Vec2::new(-view.x0, -view.y0))
            }
        }
    }

    /// Starting view rectangle.
    pub fn start(&self) -> Rect {
        self.start
    }

    /// Ending view rectangle.
    pub fn end(&self) -> Rect {
        self.end
    }

    /// Full source bounds this path was planned against.
    pub fn source_bounds(&self) -> Rect {
        self.source
    }
}

/// Compute the pan/zoom path for one image entry.
///
/// Deterministic: every framing choice derives from `hash(seed, index)`, so
/// identical profile + folder + seed reproduce bit-identical paths. `index`
/// is the image's stable playlist index.
///
/// Pan-and-scan crops to the viewport aspect and drifts from an edge-biased
/// zoomed-in framing toward a near-centered one. Letterbox shows the full
/// image and degenerates to a centered zoom-out; with Ken Burns disabled the
/// path is static.
pub fn plan(
    raster_width: u32,
    raster_height: u32,
    viewport: Viewport,
    mode: DisplayMode,
    ken_burns: bool,
    intensity: u8,
    seed: u64,
    index: u64,
) -> MotionPath {
    let w = f64::from(raster_width.max(1));
    let h = f64::from(raster_height.max(1));
    let source = Rect::new(0.0, 0.0, w, h);

    let base = match mode {
        // Largest viewport-aspect rect that fits inside the source. When the
        // source is smaller than the viewport this still matches the aspect,
        // so the viewport mapping zooms up to cover with no letterbox gaps.
        DisplayMode::PanScan => {
            let va = viewport.aspect();
            if w / h > va {
                centered_rect(source, h * va, h)
            } else {
                centered_rect(source, w, w / va)
            }
        }
        DisplayMode::Letterbox => source,
    };

    if !ken_burns {
        return MotionPath {
            start: base,
            end: base,
            source,
            ease: Ease::Linear,
        };
    }

    let intensity_frac = f64::from(intensity.clamp(1, 10)) / 10.0;

    // Start zoomed in by 100% + intensity*10% with a deterministic +/-10%
    // jitter, clamped to 105%..200%; end almost fully zoomed out.
    let jitter = (hash01(seed, index, SALT_ZOOM_JITTER) - 0.5) * 0.2;
    let start_scale = (1.0 + intensity_frac + jitter).clamp(1.05, 2.0);
    let end_scale = 1.0 + 0.05 * hash01(seed, index, SALT_END_ZOOM);

    let (start, end) = match mode {
        DisplayMode::PanScan => {
            let start_size = (base.width() / start_scale, base.height() / start_scale);
            let end_size = (base.width() / end_scale, base.height() / end_scale);

            // Start near an edge (70-90% of the available offset), end
            // within a centered band (0-40%), both scaled by intensity.
            let start_dist =
                (0.7 + 0.2 * hash01(seed, index, SALT_START_DISTANCE)) * intensity_frac;
            let end_dist = 0.4 * hash01(seed, index, SALT_END_DISTANCE) * intensity_frac;

            let start = offset_rect(
                source,
                start_size,
                start_dist,
                hash_sign(seed, index, SALT_START_SIGN_X),
                hash_sign(seed, index, SALT_START_SIGN_Y),
            );
            let end = offset_rect(
                source,
                end_size,
                end_dist,
                hash_sign(seed, index, SALT_END_SIGN_X),
                hash_sign(seed, index, SALT_END_SIGN_Y),
            );
            (start, end)
        }
        DisplayMode::Letterbox => {
            // Zoom only: start inset around center, end on the full image.
            let start = centered_rect(source, w / start_scale, h / start_scale);
            (start, source)
        }
    };

    MotionPath {
        start: clamp_into(start, source),
        end: clamp_into(end, source),
        source,
        ease: Ease::InOutQuad,
    }
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

fn centered_rect(bounds: Rect, width: f64, height: f64) -> Rect {
    let cx = (bounds.x0 + bounds.x1) / 2.0;
    let cy = (bounds.y0 + bounds.y1) / 2.0;
    Rect::new(
        cx - width / 2.0,
        cy - height / 2.0,
        cx + width / 2.0,
        cy + height / 2.0,
    )
}

/// Rect of `size` whose center sits at `dist` of the maximum in-bounds
/// offset from the center of `bounds`, in the given sign directions.
fn offset_rect(bounds: Rect, size: (f64, f64), dist: f64, sign_x: f64, sign_y: f64) -> Rect {
    let (rw, rh) = size;
    let max_off_x = ((bounds.width() - rw) / 2.0).max(0.0);
    let max_off_y = ((bounds.height() - rh) / 2.0).max(0.0);
    let cx = (bounds.x0 + bounds.x1) / 2.0 + sign_x * max_off_x * dist;
    let cy = (bounds.y0 + bounds.y1) / 2.0 + sign_y * max_off_y * dist;
    Rect::new(cx - rw / 2.0, cy - rh / 2.0, cx + rw / 2.0, cy + rh / 2.0)
}

/// Translate `rect` so it lies inside `bounds` without resizing.
fn clamp_into(rect: Rect, bounds: Rect) -> Rect {
    let mut dx = 0.0;
    let mut dy = 0.0;
    if rect.x0 < bounds.x0 {
        dx = bounds.x0 - rect.x0;
    } else if rect.x1 > bounds.x1 {
        dx = bounds.x1 - rect.x1;
    }
    if rect.y0 < bounds.y0 {
        dy = bounds.y0 - rect.y0;
    } else if rect.y1 > bounds.y1 {
        dy = bounds.y1 - rect.y1;
    }
    Rect::new(rect.x0 + dx, rect.y0 + dy, rect.x1 + dx, rect.y1 + dy)
}

#[cfg(test)]
#[path = "../../tests/unit/motion/planner.rs"]
mod tests;

//! Pixel-level blend functions for the transition window.
//!
//! All buffers are premultiplied RGBA8 of identical viewport size; `t` is
//! the transition progress in `[0, 1]` (0 = outgoing only, 1 = incoming
//! only). Each function writes the blended result into `dst`.

use crate::{
    foundation::error::{DriftError, DriftResult},
    foundation::math::mul_div255_u8,
    transition::kind::{SlideDir, WipeDir},
};

pub(crate) type PremulRgba8 = [u8; 4];

pub(crate) fn crossfade_px(a: PremulRgba8, b: PremulRgba8, t: f32) -> PremulRgba8 {
    let t = t.clamp(0.0, 1.0);
    let tt = ((t * 255.0).round() as i32).clamp(0, 255) as u16;
    let it = 255u16 - tt;

    let mut out = [0u8; 4];
    for i in 0..4 {
        let av = mul_div255_u8(u16::from(a[i]), it);
        let bv = mul_div255_u8(u16::from(b[i]), tt);
        out[i] = av.saturating_add(bv);
    }
    out
}

/// Linear alpha blend of the full frame.
pub fn crossfade_in_place(dst: &mut [u8], a: &[u8], b: &[u8], t: f32) -> DriftResult<()> {
    check_buffers(dst, a, b, None)?;
    for ((d, a), b) in dst
        .chunks_exact_mut(4)
        .zip(a.chunks_exact(4))
        .zip(b.chunks_exact(4))
    {
        let out = crossfade_px([a[0], a[1], a[2], a[3]], [b[0], b[1], b[2], b[3]], t);
        d.copy_from_slice(&out);
    }
    Ok(())
}

/// Spatial cutoff travelling across the frame, optionally feathered.
pub fn wipe_in_place(
    dst: &mut [u8],
    a: &[u8],
    b: &[u8],
    t: f32,
    dir: WipeDir,
    soft_edge: f32,
    width: u32,
    height: u32,
) -> DriftResult<()> {
    check_buffers(dst, a, b, Some((width, height)))?;
    let t = t.clamp(0.0, 1.0);
    let soft = soft_edge.clamp(0.0, 1.0);
    // The boundary overshoots by the feather width so t=1 covers everything.
    let edge = t * (1.0 + soft);

    for y in 0..height as usize {
        for x in 0..width as usize {
            let u = match dir {
                WipeDir::LeftToRight => (x as f32 + 0.5) / width as f32,
                WipeDir::RightToLeft => 1.0 - (x as f32 + 0.5) / width as f32,
                WipeDir::TopToBottom => (y as f32 + 0.5) / height as f32,
                WipeDir::BottomToTop => 1.0 - (y as f32 + 0.5) / height as f32,
            };
            let alpha = if soft > 0.0 {
                ((edge - u) / soft).clamp(0.0, 1.0)
            } else if u <= edge {
                1.0
            } else {
                0.0
            };

            let i = (y * width as usize + x) * 4;
            let out = crossfade_px(
                [a[i], a[i + 1], a[i + 2], a[i + 3]],
                [b[i], b[i + 1], b[i + 2], b[i + 3]],
                alpha,
            );
            dst[i..i + 4].copy_from_slice(&out);
        }
    }
    Ok(())
}

/// Incoming slide pushes in over the outgoing one at a whole-pixel offset.
pub fn slide_in_place(
    dst: &mut [u8],
    a: &[u8],
    b: &[u8],
    t: f32,
    dir: SlideDir,
    width: u32,
    height: u32,
) -> DriftResult<()> {
    check_buffers(dst, a, b, Some((width, height)))?;
    let t = f64::from(t.clamp(0.0, 1.0));
    let w = width as i64;
    let h = height as i64;

    // Offset of the incoming frame's origin in viewport coordinates.
    let (off_x, off_y) = match dir {
        SlideDir::FromLeft => (-((1.0 - t) * w as f64).round() as i64, 0),
        SlideDir::FromRight => (((1.0 - t) * w as f64).round() as i64, 0),
        SlideDir::FromTop => (0, -((1.0 - t) * h as f64).round() as i64),
        SlideDir::FromBottom => (0, ((1.0 - t) * h as f64).round() as i64),
    };

    for y in 0..h {
        for x in 0..w {
            let i = ((y * w + x) * 4) as usize;
            let sx = x - off_x;
            let sy = y - off_y;
            if (0..w).contains(&sx) && (0..h).contains(&sy) {
                let j = ((sy * w + sx) * 4) as usize;
                dst[i..i + 4].copy_from_slice(&b[j..j + 4]);
            } else {
                dst[i..i + 4].copy_from_slice(&a[i..i + 4]);
            }
        }
    }
    Ok(())
}

/// Fade the outgoing frame to opaque black, then the incoming one up.
pub fn fade_black_in_place(dst: &mut [u8], a: &[u8], b: &[u8], t: f32) -> DriftResult<()> {
    check_buffers(dst, a, b, None)?;
    let t = t.clamp(0.0, 1.0);
    let (src, opacity) = if t < 0.5 {
        (a, 1.0 - 2.0 * t)
    } else {
        (b, 2.0 * t - 1.0)
    };
    let op = ((opacity * 255.0).round() as i32).clamp(0, 255) as u16;

    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        // Composite over an opaque black floor.
        d[0] = mul_div255_u8(u16::from(s[0]), op);
        d[1] = mul_div255_u8(u16::from(s[1]), op);
        d[2] = mul_div255_u8(u16::from(s[2]), op);
        d[3] = 255;
    }
    Ok(())
}

fn check_buffers(dst: &[u8], a: &[u8], b: &[u8], dims: Option<(u32, u32)>) -> DriftResult<()> {
    if dst.len() != a.len() || dst.len() != b.len() || !dst.len().is_multiple_of(4) {
        return Err(DriftError::validation(
            "blend expects equal-length rgba8 buffers",
        ));
    }
    if let Some((w, h)) = dims
        && dst.len() != w as usize * h as usize * 4
    {
        return Err(DriftError::validation(
            "blend buffer length does not match dimensions",
        ));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/transition/blend.rs"]
mod tests;

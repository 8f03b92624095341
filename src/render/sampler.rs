use kurbo::Rect;

use crate::{
    assets::decode::Raster, foundation::core::Viewport, profile::model::DisplayMode,
};

/// Sample the view rectangle of a source raster into a viewport-sized
/// premultiplied RGBA8 buffer.
///
/// Pan-and-scan stretches the view rect over the whole viewport (the motion
/// planner keeps its aspect matched, so the stretch is uniform in practice).
/// Letterbox scales uniformly, centers, and fills the bars with opaque
/// black. Sampling is bilinear with edge clamping; the view rect is already
/// guaranteed in-bounds by the planner.
pub fn sample_into(dst: &mut [u8], viewport: Viewport, raster: &Raster, view: Rect, mode: DisplayMode) {
    debug_assert_eq!(dst.len(), viewport.byte_len());

    let vw = f64::from(viewport.width);
    let vh = f64::from(viewport.height);

    // Destination rect the image occupies, and the dest->source scale.
    let (dest, sx, sy) = match mode {
        DisplayMode::PanScan => (
            Rect::new(0.0, 0.0, vw, vh),
            view.width() / vw,
            view.height() / vh,
        ),
        DisplayMode::Letterbox => {
            let s = (vw / view.width()).min(vh / view.height());
            let dw = view.width() * s;
            let dh = view.height() * s;
            let x0 = (vw - dw) / 2.0;
            let y0 = (vh - dh) / 2.0;
            (Rect::new(x0, y0, x0 + dw, y0 + dh), 1.0 / s, 1.0 / s)
        }
    };

    let src = raster.rgba8_premul.as_slice();
    for py in 0..viewport.height {
        let row = &mut dst[py as usize * viewport.width as usize * 4..][..viewport.width as usize * 4];
        let cy = f64::from(py) + 0.5;
        if cy < dest.y0 || cy >= dest.y1 {
            fill_black(row);
            continue;
        }
        let src_y = view.y0 + (cy - dest.y0) * sy;
        for px in 0..viewport.width {
            let cx = f64::from(px) + 0.5;
            let out = &mut row[px as usize * 4..][..4];
            if cx < dest.x0 || cx >= dest.x1 {
                out.copy_from_slice(&[0, 0, 0, 255]);
                continue;
            }
            let src_x = view.x0 + (cx - dest.x0) * sx;
            out.copy_from_slice(&bilinear(src, raster.width, raster.height, src_x, src_y));
        }
    }
}

fn fill_black(row: &mut [u8]) {
    for px in row.chunks_exact_mut(4) {
        px.copy_from_slice(&[0, 0, 0, 255]);
    }
}

/// Bilinear fetch at continuous source coordinates (pixel centers at +0.5),
/// clamping at the edges. Premultiplied channels interpolate linearly.
fn bilinear(src: &[u8], width: u32, height: u32, x: f64, y: f64) -> [u8; 4] {
    let max_x = (width - 1) as i64;
    let max_y = (height - 1) as i64;

    // Clamp before splitting into index + fraction, so samples past the
    // first or last pixel center collapse onto the edge pixel.
    let fx = (x - 0.5).clamp(0.0, max_x as f64);
    let fy = (y - 0.5).clamp(0.0, max_y as f64);
    let x0 = fx.floor() as i64;
    let y0 = fy.floor() as i64;
    let x1 = (x0 + 1).min(max_x);
    let y1 = (y0 + 1).min(max_y);
    let wx = fx - fx.floor();
    let wy = fy - fy.floor();

    let fetch = |px: i64, py: i64| -> [f64; 4] {
        let i = (py as usize * width as usize + px as usize) * 4;
        [
            f64::from(src[i]),
            f64::from(src[i + 1]),
            f64::from(src[i + 2]),
            f64::from(src[i + 3]),
        ]
    };

    let tl = fetch(x0, y0);
    let tr = fetch(x1, y0);
    let bl = fetch(x0, y1);
    let br = fetch(x1, y1);

    let mut out = [0u8; 4];
    for c in 0..4 {
        let top = tl[c] + (tr[c] - tl[c]) * wx;
        let bottom = bl[c] + (br[c] - bl[c]) * wx;
        out[c] = (top + (bottom - top) * wy).round().clamp(0.0, 255.0) as u8;
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/sampler.rs"]
mod tests;

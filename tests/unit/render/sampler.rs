use super::*;
use std::sync::Arc;
use std::time::Instant;

fn raster(width: u32, height: u32, pixels: Vec<u8>) -> Raster {
    assert_eq!(pixels.len(), (width * height * 4) as usize);
    Raster {
        width,
        height,
        rgba8_premul: Arc::new(pixels),
        decoded_at: Instant::now(),
    }
}

fn solid_raster(width: u32, height: u32, px: [u8; 4]) -> Raster {
    raster(width, height, px.repeat((width * height) as usize))
}

#[test]
fn pan_scan_fills_the_viewport_from_a_solid_source() {
    let viewport = Viewport::new(8, 6).unwrap();
    let src = solid_raster(4, 3, [10, 200, 30, 255]);
    let mut dst = vec![0u8; viewport.byte_len()];

    sample_into(&mut dst, viewport, &src, Rect::new(0.0, 0.0, 4.0, 3.0), DisplayMode::PanScan);
    assert!(dst.chunks_exact(4).all(|p| p == [10, 200, 30, 255]));
}

#[test]
fn letterbox_fills_the_bars_with_opaque_black() {
    // Square source on a wide viewport: pillarbox, two columns per side.
    let viewport = Viewport::new(8, 4).unwrap();
    let src = solid_raster(2, 2, [255, 255, 255, 255]);
    let mut dst = vec![0u8; viewport.byte_len()];

    sample_into(&mut dst, viewport, &src, Rect::new(0.0, 0.0, 2.0, 2.0), DisplayMode::Letterbox);

    for y in 0..4usize {
        for x in 0..8usize {
            let px = &dst[(y * 8 + x) * 4..][..4];
            if (2..6).contains(&x) {
                assert_eq!(px, [255, 255, 255, 255], "image area at ({x},{y})");
            } else {
                assert_eq!(px, [0, 0, 0, 255], "bar at ({x},{y})");
            }
        }
    }
}

#[test]
fn view_rect_crops_the_source() {
    // Left half red, right half blue; a view over the right half shows blue.
    let mut pixels = Vec::new();
    for _y in 0..2 {
        pixels.extend_from_slice(&[255, 0, 0, 255, 255, 0, 0, 255]);
        pixels.extend_from_slice(&[0, 0, 255, 255, 0, 0, 255, 255]);
    }
    let src = raster(4, 2, pixels);

    // 2x2 output puts every pixel center exactly on a source pixel center.
    let viewport = Viewport::new(2, 2).unwrap();
    let mut dst = vec![0u8; viewport.byte_len()];
    sample_into(&mut dst, viewport, &src, Rect::new(2.0, 0.0, 4.0, 2.0), DisplayMode::PanScan);
    assert!(
        dst.chunks_exact(4).all(|p| p == [0, 0, 255, 255]),
        "only the right half of the source is visible"
    );
}

#[test]
fn bilinear_midpoint_averages_neighbors() {
    // Two-pixel source, black then white, sampled exactly between centers.
    let src = raster(2, 1, vec![0, 0, 0, 255, 255, 255, 255, 255]);
    let viewport = Viewport::new(1, 1).unwrap();
    let mut dst = vec![0u8; viewport.byte_len()];

    // The single output pixel center maps to source x = 1.0, the midpoint.
    sample_into(&mut dst, viewport, &src, Rect::new(0.5, 0.0, 1.5, 1.0), DisplayMode::PanScan);
    assert_eq!(dst[3], 255);
    assert!(dst[0].abs_diff(128) <= 1, "got {}", dst[0]);
}

#[test]
fn edge_samples_clamp_instead_of_wrapping() {
    let src = raster(2, 1, vec![200, 0, 0, 255, 0, 200, 0, 255]);
    let viewport = Viewport::new(4, 1).unwrap();
    let mut dst = vec![0u8; viewport.byte_len()];

    sample_into(&mut dst, viewport, &src, Rect::new(0.0, 0.0, 2.0, 1.0), DisplayMode::PanScan);
    assert_eq!(&dst[0..4], &[200, 0, 0, 255], "left edge stays left");
    assert_eq!(&dst[12..16], &[0, 200, 0, 255], "right edge stays right");
}

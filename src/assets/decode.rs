use std::{
    path::Path,
    sync::Arc,
    time::Instant,
};

use anyhow::Context;

use crate::foundation::error::{DriftError, DriftResult};

/// Bounding box (pixels) an SVG is rasterized into, preserving aspect.
pub const SVG_RASTER_BOX: u32 = 1920;

/// Raster formats decoded through the `image` crate.
const NATIVE_RASTER_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "bmp", "gif", "webp", "tif", "tiff", "ico", "pbm", "pgm", "ppm", "tga",
];

/// Formats that need the optional extended-format decoder.
const EXTENDED_EXTENSIONS: &[&str] = &["avif", "heic", "heif", "jp2", "j2k"];

/// Decoded image in premultiplied RGBA8 form.
///
/// Owned by the prefetch cache; the motion planner and transition engine
/// borrow it through the `Arc` during a frame, never copying pixels.
#[derive(Clone, Debug)]
pub struct Raster {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
    /// When the decode finished.
    pub decoded_at: Instant,
}

/// Decoding seam between the prefetch workers and the image libraries.
///
/// Production uses [`FsDecoder`]; tests substitute synthetic decoders to
/// exercise failure and timing paths without touching the filesystem.
pub trait DecodeRaster: Send + Sync {
    /// Decode the file at `path` into a normalized raster.
    fn decode(&self, path: &Path) -> DriftResult<Raster>;
}

/// Filesystem-backed decoder covering the native format set.
#[derive(Clone, Copy, Debug, Default)]
pub struct FsDecoder;

impl DecodeRaster for FsDecoder {
    fn decode(&self, path: &Path) -> DriftResult<Raster> {
        decode_raster(path)
    }
}

/// True when the host's folder scan should include this file.
pub fn supported_extension(path: &Path) -> bool {
    let Some(ext) = extension_lowercase(path) else {
        return false;
    };
    if NATIVE_RASTER_EXTENSIONS.contains(&ext.as_str()) || ext == "svg" {
        return true;
    }
    if EXTENDED_EXTENSIONS.contains(&ext.as_str()) {
        return cfg!(feature = "extended-formats") && ext == "avif";
    }
    false
}

/// Decode the image at `path` into premultiplied RGBA8.
///
/// Routes on the file extension: SVG is rasterized into a
/// [`SVG_RASTER_BOX`]-bounded box, native raster formats go through the
/// `image` crate, and extended formats either use the optional decoder
/// (`extended-formats` feature, AVIF only) or report
/// [`DriftError::UnsupportedFormat`]. No caching happens here.
pub fn decode_raster(path: &Path) -> DriftResult<Raster> {
    let Some(ext) = extension_lowercase(path) else {
        return Err(DriftError::unsupported_format(format!(
            "'{}' has no recognizable extension",
            path.display()
        )));
    };

    if ext == "svg" {
        let bytes = read_bytes(path)?;
        return rasterize_svg(&bytes, path);
    }

    if EXTENDED_EXTENSIONS.contains(&ext.as_str()) {
        if !(cfg!(feature = "extended-formats") && ext == "avif") {
            return Err(DriftError::unsupported_format(format!(
                "'{}': .{ext} requires the extended-formats decoder",
                path.display()
            )));
        }
    } else if !NATIVE_RASTER_EXTENSIONS.contains(&ext.as_str()) {
        return Err(DriftError::unsupported_format(format!(
            "'{}': unknown image format .{ext}",
            path.display()
        )));
    }

    let dyn_img = image::open(path)
        .map_err(|e| DriftError::decode(format!("'{}': {e}", path.display())))?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Ok(Raster {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
        decoded_at: Instant::now(),
    })
}

fn rasterize_svg(bytes: &[u8], path: &Path) -> DriftResult<Raster> {
    let opts = usvg::Options::default();
    let tree = usvg::Tree::from_data(bytes, &opts)
        .map_err(|e| DriftError::decode(format!("'{}': parse svg: {e}", path.display())))?;

    let size = tree.size();
    if size.width() <= 0.0 || size.height() <= 0.0 {
        return Err(DriftError::decode(format!(
            "'{}': svg has empty intrinsic size",
            path.display()
        )));
    }

    let scale = f64::from(SVG_RASTER_BOX) / f64::from(size.width().max(size.height()));
    let width = (f64::from(size.width()) * scale).round().max(1.0) as u32;
    let height = (f64::from(size.height()) * scale).round().max(1.0) as u32;

    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height).ok_or_else(|| {
        DriftError::decode(format!(
            "'{}': cannot allocate {width}x{height} svg surface",
            path.display()
        ))
    })?;
    resvg::render(
        &tree,
        resvg::tiny_skia::Transform::from_scale(scale as f32, scale as f32),
        &mut pixmap.as_mut(),
    );

    // tiny-skia pixmaps are already premultiplied RGBA8.
    Ok(Raster {
        width,
        height,
        rgba8_premul: Arc::new(pixmap.take()),
        decoded_at: Instant::now(),
    })
}

fn extension_lowercase(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_ascii_lowercase())
}

fn read_bytes(path: &Path) -> DriftResult<Vec<u8>> {
    std::fs::read(path)
        .with_context(|| format!("read image bytes from '{}'", path.display()))
        .map_err(DriftError::from)
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 255 {
            continue;
        }
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;

use crate::foundation::core::Viewport;

/// One composited output frame, sized to the viewport.
///
/// Pixels are premultiplied RGBA8 like every buffer in the engine. The
/// display collaborator owns presentation; `filename` carries the current
/// file's name when the profile's overlay flag is set, and drawing it is the
/// host's concern.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Vec<u8>,
    /// Current file name for the overlay, when enabled.
    pub filename: Option<String>,
}

impl Frame {
    /// Opaque black frame, used before the first raster is ready.
    pub fn black(viewport: Viewport) -> Self {
        let mut rgba8_premul = vec![0u8; viewport.byte_len()];
        for px in rgba8_premul.chunks_exact_mut(4) {
            px[3] = 255;
        }
        Self {
            width: viewport.width,
            height: viewport.height,
            rgba8_premul,
            filename: None,
        }
    }
}

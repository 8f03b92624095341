use crate::foundation::error::{DriftError, DriftResult};

pub use kurbo::{Affine, Point, Rect, Vec2};

/// Fixed output surface the slideshow composes into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Viewport {
    /// Construct a viewport, rejecting zero-sized dimensions.
    pub fn new(width: u32, height: u32) -> DriftResult<Self> {
        if width == 0 || height == 0 {
            return Err(DriftError::validation("viewport dimensions must be > 0"));
        }
        Ok(Self { width, height })
    }

    /// Width / height ratio.
    pub fn aspect(self) -> f64 {
        f64::from(self.width) / f64::from(self.height)
    }

    /// Byte length of one composited RGBA8 frame.
    pub fn byte_len(self) -> usize {
        self.width as usize * self.height as usize * 4
    }
}

/// Premultiplied RGBA8 (r,g,b already multiplied by a).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgba8Premul {
    /// Red, premultiplied.
    pub r: u8,
    /// Green, premultiplied.
    pub g: u8,
    /// Blue, premultiplied.
    pub b: u8,
    /// Alpha.
    pub a: u8,
}

impl Rgba8Premul {
    /// Fully transparent black.
    pub fn transparent() -> Self {
        Self {
            r: 0,
            g: 0,
            b: 0,
            a: 0,
        }
    }

    /// Opaque black (letterbox bars, fade-to-black floor).
    pub fn black() -> Self {
        Self {
            r: 0,
            g: 0,
            b: 0,
            a: 255,
        }
    }
}

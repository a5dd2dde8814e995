use crate::foundation::error::{TwibbonError, TwibbonResult};

pub use kurbo::{Affine, Point, Rect, Vec2};

/// Pixel size of the preview area (the container the composite is shown in).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    /// Width in CSS-like pixels.
    pub width: u32,
    /// Height in CSS-like pixels.
    pub height: u32,
}

impl Viewport {
    /// Viewport of `width` x `height`.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Either side is zero.
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Fails with [`TwibbonError::InvalidViewport`] when either side is zero.
    pub fn ensure_non_empty(self) -> TwibbonResult<Self> {
        if self.is_empty() {
            return Err(TwibbonError::viewport(format!(
                "viewport {}x{} has zero area",
                self.width, self.height
            )));
        }
        Ok(self)
    }

    /// Center point in viewport coordinates.
    pub fn center(self) -> Point {
        Point::new(f64::from(self.width) / 2.0, f64::from(self.height) / 2.0)
    }
}

/// Decoded bitmap dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl PixelSize {
    /// `(width, height)` as a vector.
    pub fn as_vec2(self) -> Vec2 {
        Vec2::new(f64::from(self.width), f64::from(self.height))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;

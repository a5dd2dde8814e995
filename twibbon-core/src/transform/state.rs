//! Pan/zoom state of the user's photo.

use crate::foundation::core::{Affine, PixelSize, Point, Vec2};

/// Lower bound of the user scale band.
pub const MIN_SCALE: f64 = 0.5;
/// Upper bound of the user scale band.
pub const MAX_SCALE: f64 = 5.0;

/// Current placement of the user's photo under the frame.
///
/// `pan` is in preview pixels relative to the surface center. `scale` is the user
/// multiplier on top of `base_fit_scale` and always stays within
/// [`MIN_SCALE`]..=[`MAX_SCALE`].
///
/// Deserialized values go through the same checks as the mutators: the scale is clamped,
/// rotation is forced to zero, and a non-positive base fit or non-finite pan is rejected.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "StoredTransform")]
pub struct TransformState {
    pan: Vec2,
    scale: f64,
    base_fit_scale: f64,
    // Always zero: no gesture drives it.
    rotation_rad: f64,
}

#[derive(serde::Deserialize)]
struct StoredTransform {
    pan: Vec2,
    scale: f64,
    base_fit_scale: f64,
}

impl TryFrom<StoredTransform> for TransformState {
    type Error = String;

    fn try_from(stored: StoredTransform) -> Result<Self, Self::Error> {
        if !(stored.pan.x.is_finite() && stored.pan.y.is_finite()) {
            return Err(format!("pan ({}, {}) is not finite", stored.pan.x, stored.pan.y));
        }
        if !(stored.base_fit_scale.is_finite() && stored.base_fit_scale > 0.0) {
            return Err(format!(
                "base_fit_scale {} must be positive",
                stored.base_fit_scale
            ));
        }
        Ok(Self {
            pan: stored.pan,
            scale: clamp_scale(stored.scale),
            base_fit_scale: stored.base_fit_scale,
            rotation_rad: 0.0,
        })
    }
}

impl Default for TransformState {
    fn default() -> Self {
        Self {
            pan: Vec2::ZERO,
            scale: 1.0,
            base_fit_scale: 1.0,
            rotation_rad: 0.0,
        }
    }
}

impl TransformState {
    /// Offset from the surface center, in preview pixels.
    pub fn pan(&self) -> Vec2 {
        self.pan
    }

    /// User zoom multiplier.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Scale that fits the photo inside the viewport.
    pub fn base_fit_scale(&self) -> f64 {
        self.base_fit_scale
    }

    /// Always `0.0`.
    pub fn rotation_rad(&self) -> f64 {
        self.rotation_rad
    }

    /// `base_fit_scale * scale`.
    pub fn effective_scale(&self) -> f64 {
        self.base_fit_scale * self.scale
    }

    /// Inscribe a `user_w x user_h` photo inside a `view_w x view_h` surface.
    ///
    /// Returns `false` and leaves the state untouched when any dimension is not positive.
    pub fn set_base_fit(&mut self, user_w: f64, user_h: f64, view_w: f64, view_h: f64) -> bool {
        let dims = [user_w, user_h, view_w, view_h];
        if dims.iter().any(|d| !d.is_finite() || *d <= 0.0) {
            return false;
        }
        self.base_fit_scale = (view_w / user_w).min(view_h / user_h);
        true
    }

    /// Unbounded: the photo may be dragged entirely off the frame.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.pan += Vec2::new(dx, dy);
    }

    /// Multiply the user scale by `factor`, then clamp.
    pub fn zoom_by(&mut self, factor: f64) {
        self.zoom_to(self.scale * factor);
    }

    /// Set the user scale, truncated to the nearest bound when outside the band.
    pub fn zoom_to(&mut self, scale: f64) {
        self.scale = clamp_scale(scale);
    }

    /// Back to the defaults, including `base_fit_scale = 1`.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Restore the neutral pan/zoom while keeping the computed base fit.
    pub(crate) fn reset_keeping_base_fit(&mut self) {
        let base_fit_scale = self.base_fit_scale;
        *self = Self {
            base_fit_scale,
            ..Self::default()
        };
    }

    /// Placement on another surface: pan multiplied by `pan_ratio`, base fit replaced.
    pub(crate) fn reprojected(&self, pan_ratio: f64, base_fit_scale: f64) -> Placement {
        Placement {
            pan: self.pan * pan_ratio,
            effective_scale: base_fit_scale * self.scale,
        }
    }

    pub(crate) fn placement(&self) -> Placement {
        Placement {
            pan: self.pan,
            effective_scale: self.effective_scale(),
        }
    }
}

/// Resolved draw parameters for one render: photo center offset and total scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    /// Offset of the photo center from the surface center.
    pub pan: Vec2,
    /// Photo pixels to surface pixels.
    pub effective_scale: f64,
}

impl Placement {
    /// Map photo pixel space onto a `surface_w x surface_h` surface, photo centered at
    /// the surface center plus `pan`.
    pub fn photo_affine(&self, photo: PixelSize, surface_w: f64, surface_h: f64) -> Affine {
        let center = Point::new(surface_w / 2.0, surface_h / 2.0) + self.pan;
        Affine::translate(center.to_vec2())
            * Affine::scale(self.effective_scale)
            * Affine::translate(-photo.as_vec2() / 2.0)
    }
}

fn clamp_scale(scale: f64) -> f64 {
    if scale.is_nan() {
        return MIN_SCALE;
    }
    scale.clamp(MIN_SCALE, MAX_SCALE)
}

#[cfg(test)]
#[path = "../../tests/unit/transform/state.rs"]
mod tests;

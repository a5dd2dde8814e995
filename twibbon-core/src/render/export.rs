//! Fixed-resolution export of the current composite.
//!
//! The export reuses the interactive transform. Pan is re-projected by the single scalar
//! `export_size / viewport_width` on both axes, so a non-square viewport exports with a
//! different photo/frame relationship than the preview shows.

use std::io::Cursor;

use crate::{
    assets::decode::{Bitmap, unpremultiply_rgba8_in_place},
    foundation::{
        config::ExportFit,
        core::Viewport,
        error::{TwibbonError, TwibbonResult},
    },
    render::{
        compositor::{Compositor, RenderOutcome},
        surface::Surface,
    },
    transform::state::{Placement, TransformState},
};

/// Encoded export ready to be offered as a download or attached to a share.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportedImage {
    /// Suggested file name.
    pub file_name: String,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// PNG bytes (straight alpha).
    pub png: Vec<u8>,
}

/// Project the interactive transform onto a square `export_size` surface.
pub fn export_placement(
    transform: &TransformState,
    user: &Bitmap,
    viewport: Viewport,
    export_size: u32,
    fit: ExportFit,
) -> TwibbonResult<Placement> {
    if viewport.width == 0 {
        return Err(TwibbonError::viewport("cannot export from a zero-width viewport"));
    }
    let size = f64::from(export_size);
    let ratio = size / f64::from(viewport.width);
    let base_fit = match fit {
        ExportFit::ViewportRatio => transform.base_fit_scale() * ratio,
        ExportFit::Refit => (size / f64::from(user.width)).min(size / f64::from(user.height)),
    };
    Ok(transform.reprojected(ratio, base_fit))
}

/// Un-premultiply a surface and encode it as PNG.
pub fn encode_png(surface: &Surface) -> TwibbonResult<Vec<u8>> {
    let mut straight = surface.data().to_vec();
    unpremultiply_rgba8_in_place(&mut straight);
    let img = image::RgbaImage::from_raw(surface.width(), surface.height(), straight)
        .ok_or_else(|| TwibbonError::export_encode("invalid rgba buffer size"))?;

    let mut png = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
        .map_err(|e| TwibbonError::export_encode(e.to_string()))?;
    Ok(png)
}

/// Self-contained export work captured at click time.
///
/// Holds shared handles to the bitmaps and a copy of the placement, so it can run after
/// the session has moved on (or on another thread).
#[derive(Clone, Debug)]
pub struct ExportJob {
    pub(crate) user: Bitmap,
    pub(crate) frame: Bitmap,
    pub(crate) placement: Placement,
    pub(crate) size: u32,
    pub(crate) file_name: String,
}

impl ExportJob {
    /// Side length of the output.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Render into a fresh offscreen surface without encoding.
    pub fn render(&self) -> TwibbonResult<Surface> {
        let mut surface = Surface::new(self.size, self.size)?;
        let outcome = Compositor::new().render_placement(
            &mut surface,
            Some(&self.user),
            Some(&self.frame),
            self.placement,
        )?;
        debug_assert_eq!(outcome, RenderOutcome::Drawn);
        Ok(surface)
    }

    /// Render and encode.
    #[tracing::instrument(skip(self), fields(size = self.size))]
    pub fn run(self) -> TwibbonResult<ExportedImage> {
        let surface = self.render()?;
        let png = encode_png(&surface)?;
        tracing::info!(bytes = png.len(), file = %self.file_name, "export encoded");
        Ok(ExportedImage {
            file_name: self.file_name,
            width: surface.width(),
            height: surface.height(),
            png,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/export.rs"]
mod tests;

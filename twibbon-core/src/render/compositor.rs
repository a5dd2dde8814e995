//! Photo-under-frame compositing.
//!
//! One algorithm serves both the live preview and the fixed-size export:
//!
//! 1. clear the target,
//! 2. draw the photo centered at `surface_center + pan`, scaled by the effective scale,
//! 3. draw the frame stretched over the whole surface, on top.
//!
//! Output is a pure function of the inputs.

use std::sync::Arc;

use crate::{
    assets::decode::Bitmap,
    foundation::{
        core::Affine,
        error::{TwibbonError, TwibbonResult},
    },
    render::surface::Surface,
    transform::state::{Placement, TransformState},
};

/// Whether a render call drew anything.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderOutcome {
    /// The surface now holds a fresh composite.
    Drawn,
    /// A bitmap was missing or had a zero side; the surface was left untouched.
    Skipped,
}

struct CachedPaint {
    pixels: Arc<Vec<u8>>,
    paint: vello_cpu::Image,
}

/// CPU compositor. Keeps the rasterizer paints of the last photo and frame so repeated
/// preview renders during a gesture do not re-upload pixels.
#[derive(Default)]
pub struct Compositor {
    user_paint: Option<CachedPaint>,
    frame_paint: Option<CachedPaint>,
}

impl std::fmt::Debug for Compositor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Compositor")
            .field("user_cached", &self.user_paint.is_some())
            .field("frame_cached", &self.frame_paint.is_some())
            .finish()
    }
}

impl Compositor {
    /// Compositor with an empty paint cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget cached paints, e.g. after the session drops its bitmaps.
    pub fn clear_cache(&mut self) {
        self.user_paint = None;
        self.frame_paint = None;
    }

    /// Composite at preview scale using the interactive transform as-is.
    pub fn render(
        &mut self,
        surface: &mut Surface,
        user: Option<&Bitmap>,
        frame: Option<&Bitmap>,
        transform: &TransformState,
    ) -> TwibbonResult<RenderOutcome> {
        self.render_placement(surface, user, frame, transform.placement())
    }

    /// Composite with an explicit placement (used by export re-projection).
    pub fn render_placement(
        &mut self,
        surface: &mut Surface,
        user: Option<&Bitmap>,
        frame: Option<&Bitmap>,
        placement: Placement,
    ) -> TwibbonResult<RenderOutcome> {
        let (Some(user), Some(frame)) = (user, frame) else {
            return Ok(RenderOutcome::Skipped);
        };
        if [user.width, user.height, frame.width, frame.height].contains(&0) {
            tracing::debug!("bitmap with zero side; skipping render");
            return Ok(RenderOutcome::Skipped);
        }

        let user_paint = paint_for(&mut self.user_paint, user)?;
        let frame_paint = paint_for(&mut self.frame_paint, frame)?;

        let surface_w = f64::from(surface.width());
        let surface_h = f64::from(surface.height());
        let photo_transform = placement.photo_affine(user.size(), surface_w, surface_h);
        let frame_transform = Affine::scale_non_uniform(
            surface_w / f64::from(frame.width),
            surface_h / f64::from(frame.height),
        );

        surface.clear();
        let mut ctx = vello_cpu::RenderContext::new(surface.width_u16(), surface.height_u16());
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);

        fill_image(&mut ctx, user_paint, photo_transform, user);
        fill_image(&mut ctx, frame_paint, frame_transform, frame);

        ctx.flush();
        ctx.render_to_pixmap(&mut surface.pixmap);
        Ok(RenderOutcome::Drawn)
    }
}

fn fill_image(
    ctx: &mut vello_cpu::RenderContext,
    paint: vello_cpu::Image,
    transform: Affine,
    bitmap: &Bitmap,
) {
    ctx.set_transform(affine_to_cpu(transform));
    ctx.set_paint(paint);
    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
        0.0,
        0.0,
        f64::from(bitmap.width),
        f64::from(bitmap.height),
    ));
}

fn paint_for(
    slot: &mut Option<CachedPaint>,
    bitmap: &Bitmap,
) -> TwibbonResult<vello_cpu::Image> {
    if let Some(cached) = slot.as_ref()
        && Arc::ptr_eq(&cached.pixels, &bitmap.rgba8_premul)
    {
        return Ok(cached.paint.clone());
    }

    let pixmap = premul_bytes_to_pixmap(bitmap.rgba8_premul.as_slice(), bitmap.width, bitmap.height)?;
    let paint = vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    };
    *slot = Some(CachedPaint {
        pixels: Arc::clone(&bitmap.rgba8_premul),
        paint: paint.clone(),
    });
    Ok(paint)
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn premul_bytes_to_pixmap(
    rgba8_premul: &[u8],
    width: u32,
    height: u32,
) -> TwibbonResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| TwibbonError::Other(anyhow::anyhow!("image width exceeds u16")))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| TwibbonError::Other(anyhow::anyhow!("image height exceeds u16")))?;
    if rgba8_premul.len() != width as usize * height as usize * 4 {
        return Err(TwibbonError::Other(anyhow::anyhow!(
            "bitmap byte length mismatch"
        )));
    }

    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(width as usize * height as usize);
    for px in rgba8_premul.chunks_exact(4) {
        let a = px[3];
        may_have_opacities |= a != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a,
        });
    }

    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;

use crate::foundation::error::{TwibbonError, TwibbonResult};

/// Premultiplied RGBA8 render target backed by a CPU pixmap.
///
/// A surface never has zero area; construction fails instead.
pub struct Surface {
    width: u16,
    height: u16,
    pub(crate) pixmap: vello_cpu::Pixmap,
}

impl std::fmt::Debug for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Surface")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

impl Surface {
    /// Allocate a transparent `width x height` surface.
    pub fn new(width: u32, height: u32) -> TwibbonResult<Self> {
        if width == 0 || height == 0 {
            return Err(TwibbonError::viewport(format!(
                "surface {width}x{height} has zero area"
            )));
        }
        let width_u16: u16 = width
            .try_into()
            .map_err(|_| TwibbonError::viewport("surface width exceeds u16"))?;
        let height_u16: u16 = height
            .try_into()
            .map_err(|_| TwibbonError::viewport("surface height exceeds u16"))?;
        Ok(Self {
            width: width_u16,
            height: height_u16,
            pixmap: vello_cpu::Pixmap::new(width_u16, height_u16),
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        u32::from(self.width)
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        u32::from(self.height)
    }

    pub(crate) fn width_u16(&self) -> u16 {
        self.width
    }

    pub(crate) fn height_u16(&self) -> u16 {
        self.height
    }

    /// Reallocate when the requested size differs; contents are discarded either way.
    pub fn resize(&mut self, width: u32, height: u32) -> TwibbonResult<()> {
        if width == self.width() && height == self.height() {
            self.clear();
            return Ok(());
        }
        *self = Self::new(width, height)?;
        Ok(())
    }

    /// Fill with transparent black.
    pub fn clear(&mut self) {
        self.pixmap.data_as_u8_slice_mut().fill(0);
    }

    /// Row-major premultiplied RGBA8 bytes.
    pub fn data(&self) -> &[u8] {
        self.pixmap.data_as_u8_slice()
    }

    /// Premultiplied RGBA8 value at `(x, y)`, or `None` outside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        let idx = (y as usize * self.width() as usize + x as usize) * 4;
        let px = self.data().get(idx..idx + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }
}

//! Decoding of the two inputs of a composite: the uploaded photo and the frame overlay.

use std::{borrow::Cow, path::PathBuf, sync::Arc};

use anyhow::Context;

use crate::{
    assets::decode::{Bitmap, decode_image},
    foundation::error::{TwibbonError, TwibbonResult},
};

/// Which input a decode result belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DecodeRole {
    /// The user's uploaded photo.
    UserPhoto,
    /// The fixed frame overlay.
    Frame,
}

/// Location of the frame overlay. Treated as configuration, not user data.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FrameAsset {
    /// Image file on disk, read on every decode.
    Path(PathBuf),
    /// Encoded image bytes held in memory.
    Bytes(Arc<[u8]>),
}

impl FrameAsset {
    /// Encoded bytes of the frame image.
    pub fn read_bytes(&self) -> TwibbonResult<Cow<'_, [u8]>> {
        match self {
            Self::Path(path) => {
                let bytes = std::fs::read(path)
                    .with_context(|| format!("read frame asset '{}'", path.display()))?;
                Ok(Cow::Owned(bytes))
            }
            Self::Bytes(bytes) => Ok(Cow::Borrowed(bytes.as_ref())),
        }
    }
}

impl From<PathBuf> for FrameAsset {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

/// Decode the uploaded photo. Any failure, including a zero-sized image or one larger
/// than 65535 pixels on a side, is a
/// [`TwibbonError::UserImageDecode`].
pub fn decode_user_photo(bytes: &[u8]) -> TwibbonResult<Bitmap> {
    decode_for(DecodeRole::UserPhoto, bytes)
}

/// Read and decode the frame overlay. Any failure is a [`TwibbonError::FrameAssetDecode`].
pub fn decode_frame(asset: &FrameAsset) -> TwibbonResult<Bitmap> {
    let bytes = asset
        .read_bytes()
        .map_err(|e| classify(DecodeRole::Frame, e))?;
    decode_for(DecodeRole::Frame, &bytes)
}

/// Decode photo and frame concurrently. The results are independent; neither waits on
/// the other's success.
pub fn decode_pair(
    user_bytes: &[u8],
    frame: &FrameAsset,
) -> (TwibbonResult<Bitmap>, TwibbonResult<Bitmap>) {
    rayon::join(|| decode_user_photo(user_bytes), || decode_frame(frame))
}

fn decode_for(role: DecodeRole, bytes: &[u8]) -> TwibbonResult<Bitmap> {
    let bitmap = decode_image(bytes).map_err(|e| classify(role, e))?;
    let too_large = u16::try_from(bitmap.width).is_err() || u16::try_from(bitmap.height).is_err();
    if bitmap.width == 0 || bitmap.height == 0 || too_large {
        return Err(classify(
            role,
            TwibbonError::Other(anyhow::anyhow!(
                "decoded image is {}x{}",
                bitmap.width,
                bitmap.height
            )),
        ));
    }
    Ok(bitmap)
}

fn classify(role: DecodeRole, err: TwibbonError) -> TwibbonError {
    let detail = match &err {
        TwibbonError::Other(e) => format!("{e:#}"),
        other => other.to_string(),
    };
    match role {
        DecodeRole::UserPhoto => TwibbonError::user_image(detail),
        DecodeRole::Frame => TwibbonError::frame_asset(detail),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/loader.rs"]
mod tests;

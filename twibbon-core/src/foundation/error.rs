/// Convenience result type used across the crate.
pub type TwibbonResult<T> = Result<T, TwibbonError>;

/// Top-level error taxonomy used by the compositor and session APIs.
#[derive(thiserror::Error, Debug)]
pub enum TwibbonError {
    /// The uploaded photo could not be decoded into a usable bitmap.
    #[error("user image decode failed: {0}")]
    UserImageDecode(String),

    /// The frame overlay asset could not be read or decoded.
    #[error("frame asset decode failed: {0}")]
    FrameAssetDecode(String),

    /// The viewport or a render surface has zero area.
    #[error("invalid viewport geometry: {0}")]
    InvalidViewport(String),

    /// The export surface could not be encoded to PNG.
    #[error("export encode failed: {0}")]
    ExportEncode(String),

    /// The host share call failed for a reason other than user cancellation.
    #[error("share failed: {0}")]
    ShareFailed(String),

    /// The host exposes no share capability at all.
    #[error("share unsupported by host")]
    ShareUnsupported,

    /// Export or share was requested while no composite exists.
    #[error("no composited image")]
    NotComposited,

    /// Invalid configuration values.
    #[error("config error: {0}")]
    Config(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TwibbonError {
    /// Build a [`TwibbonError::UserImageDecode`] value.
    pub fn user_image(msg: impl Into<String>) -> Self {
        Self::UserImageDecode(msg.into())
    }

    /// Build a [`TwibbonError::FrameAssetDecode`] value.
    pub fn frame_asset(msg: impl Into<String>) -> Self {
        Self::FrameAssetDecode(msg.into())
    }

    /// Build a [`TwibbonError::InvalidViewport`] value.
    pub fn viewport(msg: impl Into<String>) -> Self {
        Self::InvalidViewport(msg.into())
    }

    /// Build a [`TwibbonError::ExportEncode`] value.
    pub fn export_encode(msg: impl Into<String>) -> Self {
        Self::ExportEncode(msg.into())
    }

    /// Build a [`TwibbonError::ShareFailed`] value.
    pub fn share(msg: impl Into<String>) -> Self {
        Self::ShareFailed(msg.into())
    }

    /// Build a [`TwibbonError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Whether this failure forces the session back to `Empty`.
    ///
    /// Upload-time failures reset everything; export and share failures only end the action.
    pub fn resets_session(&self) -> bool {
        matches!(
            self,
            Self::UserImageDecode(_) | Self::FrameAssetDecode(_) | Self::InvalidViewport(_)
        )
    }

    /// Human-readable notice surfaced to the user for this failure.
    pub fn user_message(&self) -> String {
        match self {
            Self::UserImageDecode(_) => {
                "Failed to load your photo! Make sure the file is a valid image.".to_owned()
            }
            Self::FrameAssetDecode(_) => {
                "Failed to load the frame! Make sure the frame image exists and its path is correct."
                    .to_owned()
            }
            Self::InvalidViewport(_) => {
                "Failed to load the images. Check the log for details.".to_owned()
            }
            Self::ExportEncode(_) => "Failed to produce the final image.".to_owned(),
            Self::ShareFailed(msg) => format!("Failed to share. Error: {msg}"),
            Self::ShareUnsupported => {
                "Your browser does not support sharing. Please download the image and share it manually."
                    .to_owned()
            }
            Self::NotComposited => "Please upload and edit your photo first.".to_owned(),
            Self::Config(msg) => format!("Configuration error: {msg}"),
            Self::Other(err) => err.to_string(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;

//! Twibbon is a photo-frame compositor.
//!
//! A user photo is placed under a fixed frame overlay (a PNG with a transparent window),
//! positioned interactively with drag, pinch and wheel gestures, and exported as a square
//! PNG or handed to a share host.
//!
//! # Pipeline overview
//!
//! 1. **Load**: photo bytes and the frame asset decode concurrently into premultiplied
//!    [`Bitmap`]s; the [`Session`] joins the two completions by count.
//! 2. **Place**: a [`TransformState`] holds pan, user zoom and the base fit scale that
//!    makes the photo cover the viewport.
//! 3. **Composite**: the [`Compositor`] draws photo then frame into a [`Surface`].
//! 4. **Export**: the placement is re-projected onto an `export_size` square canvas and
//!    encoded to PNG ([`ExportJob`]), or shared through a [`ShareHost`].
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Premultiplied RGBA8** internally; PNG output is straight alpha.
//! - **No globals**: all mutable state lives in a [`Session`] passed by `&mut`.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation {
    pub mod config;
    pub mod core;
    pub mod error;
}

mod transform {
    pub mod state;
}

mod gesture {
    pub mod event;
    pub mod interpreter;
}

mod assets {
    pub mod decode;
    pub mod loader;
}

mod render {
    pub mod compositor;
    pub mod export;
    pub mod surface;
}

mod session {
    pub mod controller;
    pub mod share;
    pub mod view;
}

pub use assets::decode::{Bitmap, decode_image};
pub use assets::loader::{DecodeRole, FrameAsset, decode_frame, decode_pair, decode_user_photo};
pub use foundation::config::{ExportFit, FRAME_PATH_ENV, ShareTexts, TwibbonConfig};
pub use foundation::core::{Affine, PixelSize, Point, Rect, Vec2, Viewport};
pub use foundation::error::{TwibbonError, TwibbonResult};
pub use gesture::event::{InputEvent, TouchId, TouchPoint};
pub use gesture::interpreter::{GestureInterpreter, GestureResponse, WHEEL_ZOOM_IN, WHEEL_ZOOM_OUT};
pub use render::compositor::{Compositor, RenderOutcome};
pub use render::export::{ExportJob, ExportedImage, encode_png, export_placement};
pub use render::surface::Surface;
pub use session::controller::{Session, UploadStatus, UploadTicket};
pub use session::share::{
    ShareCapabilities, ShareError, ShareHost, ShareOutcome, SharePayload,
};
pub use session::view::{EXPORT_LABEL_BUSY, EXPORT_LABEL_READY, SessionPhase, ViewState};
pub use transform::state::{MAX_SCALE, MIN_SCALE, Placement, TransformState};

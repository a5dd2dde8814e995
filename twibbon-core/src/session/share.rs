//! Host share-sheet seam.

use crate::{
    foundation::{
        config::ShareTexts,
        error::{TwibbonError, TwibbonResult},
    },
    render::export::ExportedImage,
};

/// What the host environment can share.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ShareCapabilities {
    /// Files (the exported PNG) can be attached.
    pub files: bool,
    /// A title/text/url link can be shared.
    pub link: bool,
}

/// One share request handed to the host.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SharePayload {
    /// Share sheet title.
    pub title: String,
    /// Message body.
    pub text: String,
    /// Page link.
    pub url: String,
    /// Attachments; empty for a link-only share.
    pub files: Vec<ExportedImage>,
}

/// Failure reported by the host share call.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ShareError {
    /// The user dismissed the share sheet. Not an error for the session.
    #[error("share cancelled")]
    Cancelled,
    /// Anything else.
    #[error("{0}")]
    Failed(String),
}

/// Native share integration provided by the embedding environment.
pub trait ShareHost {
    /// Capabilities of this host.
    fn capabilities(&self) -> ShareCapabilities;

    /// Present the share sheet and wait for it to close.
    fn share(&mut self, payload: &SharePayload) -> Result<(), ShareError>;
}

/// Successful end of a share action.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShareOutcome {
    /// The exported PNG was shared.
    SharedFile,
    /// Only the page link was shared.
    SharedLink,
    /// The user cancelled; nothing to report.
    Cancelled,
}

/// Pick the richest share the host supports. `export` is only called for file shares.
pub(crate) fn share_with<H, F>(
    host: &mut H,
    texts: &ShareTexts,
    export: F,
) -> TwibbonResult<ShareOutcome>
where
    H: ShareHost + ?Sized,
    F: FnOnce() -> TwibbonResult<ExportedImage>,
{
    let caps = host.capabilities();
    let (payload, shared) = if caps.files {
        let image = export()?;
        let payload = SharePayload {
            title: texts.title.clone(),
            text: texts.file_text.clone(),
            url: texts.page_url.clone(),
            files: vec![image],
        };
        (payload, ShareOutcome::SharedFile)
    } else if caps.link {
        let payload = SharePayload {
            title: texts.title.clone(),
            text: texts.link_text.clone(),
            url: texts.page_url.clone(),
            files: Vec::new(),
        };
        (payload, ShareOutcome::SharedLink)
    } else {
        return Err(TwibbonError::ShareUnsupported);
    };

    match host.share(&payload) {
        Ok(()) => Ok(shared),
        Err(ShareError::Cancelled) => Ok(ShareOutcome::Cancelled),
        Err(ShareError::Failed(msg)) => Err(TwibbonError::share(msg)),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/share.rs"]
mod tests;

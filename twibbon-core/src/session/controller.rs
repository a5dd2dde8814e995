//! Upload -> composite -> export/share lifecycle.
//!
//! The session owns every piece of mutable state (bitmaps, transform, gesture tracking,
//! preview surface) and is passed by `&mut` to whoever drives it. Photo and frame decodes
//! are independent completions joined by count; each upload gets a fresh generation and
//! completions from older generations are dropped.

use crate::{
    assets::{
        decode::Bitmap,
        loader::{DecodeRole, FrameAsset, decode_pair},
    },
    foundation::{
        config::TwibbonConfig,
        core::Viewport,
        error::{TwibbonError, TwibbonResult},
    },
    gesture::{event::InputEvent, interpreter::GestureInterpreter},
    render::{
        compositor::{Compositor, RenderOutcome},
        export::{ExportJob, ExportedImage, export_placement},
        surface::Surface,
    },
    session::{
        share::{ShareHost, ShareOutcome, share_with},
        view::{SessionPhase, ViewState},
    },
    transform::state::TransformState,
};

/// Handle identifying one upload attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct UploadTicket {
    generation: u64,
}

impl UploadTicket {
    /// Monotonic attempt number.
    pub fn generation(self) -> u64 {
        self.generation
    }
}

/// Where an upload stands after a decode completion was delivered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UploadStatus {
    /// One of the two decodes is still outstanding.
    Pending,
    /// Both decodes arrived; the session is composited.
    Composited,
    /// The completion belonged to a superseded or already failed attempt and was ignored.
    Stale,
}

#[derive(Debug)]
struct PendingUpload {
    generation: u64,
    user: Option<Bitmap>,
    frame: Option<Bitmap>,
}

impl PendingUpload {
    fn loaded(&self) -> usize {
        usize::from(self.user.is_some()) + usize::from(self.frame.is_some())
    }
}

/// One twibbon editing session.
#[derive(Debug)]
pub struct Session {
    config: TwibbonConfig,
    frame_asset: FrameAsset,
    viewport: Viewport,
    phase: SessionPhase,
    generation: u64,
    pending: Option<PendingUpload>,
    transform: TransformState,
    gestures: GestureInterpreter,
    compositor: Compositor,
    preview: Option<Surface>,
    user: Option<Bitmap>,
    frame: Option<Bitmap>,
    export_enabled: bool,
    notice: Option<String>,
}

impl Session {
    /// New `Empty` session reading the frame from `config.frame_path`.
    pub fn new(config: TwibbonConfig, viewport: Viewport) -> TwibbonResult<Self> {
        config.validate()?;
        let frame_asset = FrameAsset::Path(config.frame_path.clone());
        Ok(Self {
            config,
            frame_asset,
            viewport,
            phase: SessionPhase::Empty,
            generation: 0,
            pending: None,
            transform: TransformState::default(),
            gestures: GestureInterpreter::new(),
            compositor: Compositor::new(),
            preview: None,
            user: None,
            frame: None,
            export_enabled: true,
            notice: None,
        })
    }

    /// Replace where the frame comes from (e.g. bytes bundled by the host).
    pub fn with_frame_asset(mut self, frame_asset: FrameAsset) -> Self {
        self.frame_asset = frame_asset;
        self
    }

    /// Validated configuration.
    pub fn config(&self) -> &TwibbonConfig {
        &self.config
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Current photo placement.
    pub fn transform(&self) -> &TransformState {
        &self.transform
    }

    /// Last recorded viewport size.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Live preview, present only while composited.
    pub fn preview(&self) -> Option<&Surface> {
        self.preview.as_ref()
    }

    /// An upload attempt is waiting for decode completions.
    pub fn is_decoding(&self) -> bool {
        self.pending.is_some()
    }

    /// Visibility flags for the host page.
    pub fn view(&self) -> ViewState {
        ViewState::new(self.phase, self.export_enabled, self.is_decoding())
    }

    /// Most recent user-visible message, if any.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Take the pending notice, leaving none.
    pub fn take_notice(&mut self) -> Option<String> {
        self.notice.take()
    }

    /// Start an upload attempt. Any attempt still in flight is superseded.
    pub fn begin_upload(&mut self) -> UploadTicket {
        self.generation += 1;
        if let Some(prev) = self.pending.take() {
            tracing::debug!(superseded = prev.generation, "upload superseded");
        }
        self.pending = Some(PendingUpload {
            generation: self.generation,
            user: None,
            frame: None,
        });
        tracing::info!(generation = self.generation, "upload started");
        UploadTicket {
            generation: self.generation,
        }
    }

    /// Deliver one decode completion.
    ///
    /// A failed decode resets the session to `Empty` and is returned as the error.
    /// The second successful completion of the current attempt composites.
    pub fn complete_decode(
        &mut self,
        ticket: UploadTicket,
        role: DecodeRole,
        result: TwibbonResult<Bitmap>,
    ) -> TwibbonResult<UploadStatus> {
        let current = self
            .pending
            .as_ref()
            .is_some_and(|p| p.generation == ticket.generation);
        if !current {
            tracing::warn!(
                generation = ticket.generation,
                latest = self.generation,
                ?role,
                "discarding stale decode completion"
            );
            return Ok(UploadStatus::Stale);
        }

        let bitmap = match result {
            Ok(bitmap) => bitmap,
            Err(err) => return Err(self.fail(err)),
        };

        let Some(pending) = self.pending.as_mut() else {
            return Ok(UploadStatus::Stale);
        };
        match role {
            DecodeRole::UserPhoto => pending.user = Some(bitmap),
            DecodeRole::Frame => pending.frame = Some(bitmap),
        }
        tracing::debug!(generation = pending.generation, ?role, loaded = pending.loaded(), "decoded");
        if pending.loaded() < 2 {
            return Ok(UploadStatus::Pending);
        }

        match self.join() {
            Ok(()) => Ok(UploadStatus::Composited),
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Decode `bytes` and the frame concurrently and composite.
    #[tracing::instrument(skip(self, bytes), fields(len = bytes.len()))]
    pub fn upload(&mut self, bytes: &[u8]) -> TwibbonResult<UploadStatus> {
        let ticket = self.begin_upload();
        let (user, frame) = decode_pair(bytes, &self.frame_asset);
        self.complete_decode(ticket, DecodeRole::UserPhoto, user)?;
        self.complete_decode(ticket, DecodeRole::Frame, frame)
    }

    fn join(&mut self) -> TwibbonResult<()> {
        let Some(PendingUpload {
            user: Some(user),
            frame: Some(frame),
            ..
        }) = self.pending.take()
        else {
            return Err(TwibbonError::Other(anyhow::anyhow!(
                "join without both bitmaps"
            )));
        };

        let viewport = self.viewport.ensure_non_empty()?;
        let preview = match self.preview.take() {
            Some(mut surface) => {
                surface.resize(viewport.width, viewport.height)?;
                surface
            }
            None => Surface::new(viewport.width, viewport.height)?,
        };

        let mut transform = self.transform;
        if !transform.set_base_fit(
            f64::from(user.width),
            f64::from(user.height),
            f64::from(viewport.width),
            f64::from(viewport.height),
        ) {
            return Err(TwibbonError::viewport("cannot fit photo into viewport"));
        }
        transform.reset_keeping_base_fit();

        self.transform = transform;
        self.gestures.clear();
        self.compositor.clear_cache();
        self.preview = Some(preview);
        self.user = Some(user);
        self.frame = Some(frame);
        self.phase = SessionPhase::Composited;
        self.export_enabled = true;
        self.notice = None;
        tracing::info!(
            generation = self.generation,
            base_fit = self.transform.base_fit_scale(),
            "composited"
        );
        self.render_preview()?;
        Ok(())
    }

    /// Record the failure, reset to `Empty`, and hand the error back.
    fn fail(&mut self, err: TwibbonError) -> TwibbonError {
        let message = err.user_message();
        tracing::warn!(error = %err, "resetting to initial state");
        self.clear_to_empty();
        self.notice = Some(message);
        err
    }

    /// Drop everything and return to `Empty`. In-flight decodes become stale.
    pub fn reset(&mut self) {
        self.clear_to_empty();
        self.notice = None;
    }

    fn clear_to_empty(&mut self) {
        self.pending = None;
        self.phase = SessionPhase::Empty;
        self.user = None;
        self.frame = None;
        self.preview = None;
        self.transform.reset();
        self.gestures.clear();
        self.compositor.clear_cache();
        self.export_enabled = true;
    }

    /// Record a new viewport size.
    ///
    /// While composited the preview is resized and re-rendered; a zero-area size is
    /// rejected and the previous viewport kept. The base fit is not recomputed.
    pub fn set_viewport(&mut self, width: u32, height: u32) -> TwibbonResult<()> {
        let viewport = Viewport::new(width, height);
        if self.phase != SessionPhase::Composited {
            self.viewport = viewport;
            return Ok(());
        }
        viewport.ensure_non_empty()?;
        if let Some(surface) = self.preview.as_mut() {
            surface.resize(width, height)?;
        }
        self.viewport = viewport;
        self.render_preview()?;
        Ok(())
    }

    /// Feed one input event. Returns whether the preview was re-rendered.
    pub fn handle_input(&mut self, event: &InputEvent) -> TwibbonResult<bool> {
        if self.phase != SessionPhase::Composited {
            return Ok(false);
        }
        let response = self.gestures.apply(event, &mut self.transform);
        if !response.needs_render() {
            return Ok(false);
        }
        tracing::debug!(
            pan_x = self.transform.pan().x,
            pan_y = self.transform.pan().y,
            scale = self.transform.scale(),
            "transform changed"
        );
        Ok(self.render_preview()? == RenderOutcome::Drawn)
    }

    /// Re-render the preview from current state.
    pub fn render_preview(&mut self) -> TwibbonResult<RenderOutcome> {
        let Some(surface) = self.preview.as_mut() else {
            return Ok(RenderOutcome::Skipped);
        };
        self.compositor.render(
            surface,
            self.user.as_ref(),
            self.frame.as_ref(),
            &self.transform,
        )
    }

    fn export_job(&self) -> TwibbonResult<ExportJob> {
        let (SessionPhase::Composited, Some(user), Some(frame)) =
            (self.phase, self.user.as_ref(), self.frame.as_ref())
        else {
            return Err(TwibbonError::NotComposited);
        };
        let placement = export_placement(
            &self.transform,
            user,
            self.viewport,
            self.config.export_size,
            self.config.export_fit,
        )?;
        Ok(ExportJob {
            user: user.clone(),
            frame: frame.clone(),
            placement,
            size: self.config.export_size,
            file_name: self.config.download_file_name.clone(),
        })
    }

    /// Click on the export control.
    ///
    /// The control disables itself for good on the first click: a second call returns
    /// `Ok(None)` even if the first job has not run yet, and a failed export does not
    /// re-enable it. Only a new successful upload or a reset does.
    pub fn begin_export(&mut self) -> TwibbonResult<Option<ExportJob>> {
        if self.phase != SessionPhase::Composited {
            return Err(TwibbonError::NotComposited);
        }
        if !self.export_enabled {
            tracing::debug!("export control disabled; ignoring click");
            return Ok(None);
        }
        self.export_enabled = false;
        match self.export_job() {
            Ok(job) => Ok(Some(job)),
            Err(err) => Err(self.report(err)),
        }
    }

    /// [`Session::begin_export`] followed by running the job.
    pub fn request_export(&mut self) -> TwibbonResult<Option<ExportedImage>> {
        let Some(job) = self.begin_export()? else {
            return Ok(None);
        };
        match job.run() {
            Ok(image) => Ok(Some(image)),
            Err(err) => Err(self.report(err)),
        }
    }

    /// Share the current composite through `host`.
    ///
    /// Failures are reported but leave the session composited; cancellation is silent.
    pub fn share<H: ShareHost + ?Sized>(&mut self, host: &mut H) -> TwibbonResult<ShareOutcome> {
        let result = match self.export_job() {
            Ok(job) => share_with(host, &self.config.share, move || job.run()),
            Err(err) => Err(err),
        };
        match result {
            Ok(outcome) => {
                tracing::info!(?outcome, "share finished");
                Ok(outcome)
            }
            Err(err) => Err(self.report(err)),
        }
    }

    fn report(&mut self, err: TwibbonError) -> TwibbonError {
        tracing::warn!(error = %err, "action failed");
        self.notice = Some(err.user_message());
        err
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/controller.rs"]
mod tests;

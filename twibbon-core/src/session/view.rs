/// Label of the export control while it can be clicked.
pub const EXPORT_LABEL_READY: &str = "Unduh Gambar";
/// Label of the export control after it has been clicked.
pub const EXPORT_LABEL_BUSY: &str = "Memproses...";

/// Externally visible lifecycle state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum SessionPhase {
    /// No composite; the placeholder is shown.
    Empty,
    /// Photo and frame decoded and rendered into the preview surface.
    Composited,
}

/// What the page should currently show.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct ViewState {
    /// Lifecycle phase the flags derive from.
    pub phase: SessionPhase,
    /// Upload prompt shown instead of the composite.
    pub placeholder_visible: bool,
    /// Composite surface shown.
    pub surface_visible: bool,
    /// Export control shown.
    pub export_visible: bool,
    /// Share control shown.
    pub share_visible: bool,
    /// Export control clickable.
    pub export_enabled: bool,
    /// Export control caption.
    pub export_label: &'static str,
    /// An upload is waiting for its decodes.
    pub decoding: bool,
}

impl ViewState {
    pub(crate) fn new(phase: SessionPhase, export_enabled: bool, decoding: bool) -> Self {
        let composited = phase == SessionPhase::Composited;
        Self {
            phase,
            placeholder_visible: !composited,
            surface_visible: composited,
            export_visible: composited,
            share_visible: composited,
            export_enabled,
            export_label: if export_enabled {
                EXPORT_LABEL_READY
            } else {
                EXPORT_LABEL_BUSY
            },
            decoding,
        }
    }
}

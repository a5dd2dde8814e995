use crate::foundation::core::Point;

/// Host-assigned identifier of one touch contact.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TouchId(pub u64);

/// One active touch contact in viewport coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TouchPoint {
    /// Contact identifier.
    pub id: TouchId,
    /// Last known position.
    pub pos: Point,
}

impl TouchPoint {
    /// Touch `id` at `(x, y)`.
    pub fn new(id: u64, x: f64, y: f64) -> Self {
        Self {
            id: TouchId(id),
            pos: Point::new(x, y),
        }
    }
}

/// Raw input delivered by the host, in viewport pixel coordinates.
#[derive(Clone, Debug, PartialEq)]
pub enum InputEvent {
    /// Mouse/pen button pressed.
    PointerDown {
        /// Press position.
        pos: Point,
    },
    /// Cursor moved.
    PointerMove {
        /// New cursor position.
        pos: Point,
    },
    /// Button released.
    PointerUp,
    /// Cursor left the surface.
    PointerLeave,
    /// Wheel/trackpad scroll; only the sign of `delta_y` matters.
    Wheel {
        /// Vertical scroll amount; positive scrolls away from the user.
        delta_y: f64,
    },
    /// Contacts started; carries every currently active touch.
    TouchStart {
        /// All active touches after the start.
        touches: Vec<TouchPoint>,
    },
    /// Contacts moved; carries every currently active touch.
    TouchMove {
        /// All active touches at their new positions.
        touches: Vec<TouchPoint>,
    },
    /// Contacts lifted; carries the identifiers that ended.
    TouchEnd {
        /// Touches that are no longer active.
        ended: Vec<TouchId>,
    },
    /// The platform aborted the touch sequence.
    TouchCancel,
}
